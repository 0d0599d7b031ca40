//! Reassembly of fragmented utterances

use std::collections::HashMap;
use std::time::{Duration, Instant};

use bytes::{Bytes, BytesMut};

use crate::protocol::voice::{FrameFlag, VerifiedFrame, VoiceHeader};

/// A complete utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    /// Header of the first frame of the utterance
    pub header: VoiceHeader,
    /// Concatenated payloads
    pub audio: Bytes,
    /// Number of frames it arrived in
    pub frames: usize,
}

/// Why a frame was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Checksum mismatch
    Corrupted,
    /// `frame_flag` is 0
    UnknownFlag,
    /// Sequence number skipped; the partial utterance was dropped
    SequenceGap {
        /// Sequence number that should have arrived
        expected: u16,
        /// Sequence number that did arrive
        got: u16,
    },
    /// Remainder of an utterance already known to be damaged
    Resyncing,
}

/// Outcome of feeding one frame to the assembler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssemblyEvent {
    /// A `Full` frame, or a `Last` frame closing a fragmented utterance
    Complete(Utterance),
    /// A fragment was buffered
    Buffered {
        /// Bytes buffered so far for this device
        pending_bytes: usize,
    },
    /// The frame was dropped
    Rejected(RejectReason),
}

#[derive(Debug)]
struct Pending {
    header: VoiceHeader,
    audio: BytesMut,
    frames: usize,
    next_seq: u16,
}

#[derive(Debug)]
enum SlotState {
    Buffering(Pending),
    /// Dropping frames until the damaged utterance's `Last` or a `Full`
    Discarding,
}

#[derive(Debug)]
struct Slot {
    state: SlotState,
    last_seen: Instant,
}

/// Joins `Fragment` frames up to their `Last` frame, per device
///
/// A lost or corrupted fragment poisons the rest of its utterance: every
/// later frame up to and including the `Last` is rejected with
/// [`RejectReason::Resyncing`], so a truncated utterance is never reported
/// as complete. A `Full` frame always completes and ends resynchronisation.
///
/// Devices untouched for longer than the expiry are discarded by
/// [`evict_stale`](Self::evict_stale).
#[derive(Debug)]
pub struct FragmentAssembler {
    slots: HashMap<String, Slot>,
    expiry: Duration,
}

impl FragmentAssembler {
    /// Create an assembler dropping partial utterances idle for `expiry`
    #[must_use]
    pub fn new(expiry: Duration) -> Self {
        Self {
            slots: HashMap::new(),
            expiry,
        }
    }

    /// Feed one verified frame from `device`
    pub fn push(&mut self, device: &str, frame: &VerifiedFrame, now: Instant) -> AssemblyEvent {
        if !frame.valid {
            // The flag and sequence of a corrupted frame cannot be trusted
            if let Some(Slot {
                state: SlotState::Buffering(p),
                ..
            }) = self.slots.get(device)
            {
                tracing::warn!(
                    device,
                    dropped_bytes = p.audio.len(),
                    "corrupted fragment, discarding rest of utterance"
                );
            }
            self.discard(device, now);
            return AssemblyEvent::Rejected(RejectReason::Corrupted);
        }
        let Some(flag) = frame.header.frame_kind() else {
            return AssemblyEvent::Rejected(RejectReason::UnknownFlag);
        };

        if flag == FrameFlag::Full {
            self.slots.remove(device);
            return AssemblyEvent::Complete(Utterance {
                header: frame.header,
                audio: frame.payload.clone(),
                frames: 1,
            });
        }

        let seq = frame.header.frame_seq;
        match self.slots.get(device).map(|s| &s.state) {
            Some(SlotState::Discarding) => {
                if flag == FrameFlag::Last {
                    self.slots.remove(device);
                    tracing::debug!(device, seq, "resynchronised on last fragment");
                } else {
                    self.discard(device, now);
                }
                return AssemblyEvent::Rejected(RejectReason::Resyncing);
            }
            Some(SlotState::Buffering(p)) if p.next_seq != seq => {
                let expected = p.next_seq;
                tracing::warn!(device, expected, got = seq, "fragment sequence gap");
                if flag == FrameFlag::Last {
                    self.slots.remove(device);
                } else {
                    self.discard(device, now);
                }
                return AssemblyEvent::Rejected(RejectReason::SequenceGap { expected, got: seq });
            }
            _ => {}
        }

        let slot = self.slots.entry(device.to_string()).or_insert_with(|| Slot {
            state: SlotState::Buffering(Pending {
                header: frame.header,
                audio: BytesMut::new(),
                frames: 0,
                next_seq: seq,
            }),
            last_seen: now,
        });
        slot.last_seen = now;
        let SlotState::Buffering(entry) = &mut slot.state else {
            return AssemblyEvent::Rejected(RejectReason::Resyncing);
        };
        entry.audio.extend_from_slice(&frame.payload);
        entry.frames += 1;
        entry.next_seq = seq.wrapping_add(1);
        let pending_bytes = entry.audio.len();

        if flag == FrameFlag::Fragment {
            return AssemblyEvent::Buffered { pending_bytes };
        }

        let Some(Slot {
            state: SlotState::Buffering(done),
            ..
        }) = self.slots.remove(device)
        else {
            return AssemblyEvent::Buffered { pending_bytes };
        };
        tracing::debug!(
            device,
            frames = done.frames,
            bytes = done.audio.len(),
            "fragmented utterance complete"
        );
        AssemblyEvent::Complete(Utterance {
            header: done.header,
            audio: done.audio.freeze(),
            frames: done.frames,
        })
    }

    fn discard(&mut self, device: &str, now: Instant) {
        self.slots.insert(
            device.to_string(),
            Slot {
                state: SlotState::Discarding,
                last_seen: now,
            },
        );
    }

    /// Forget devices idle for longer than the expiry
    ///
    /// Covers both partial utterances and devices waiting to resynchronise.
    /// Returns the number of devices dropped.
    pub fn evict_stale(&mut self, now: Instant) -> usize {
        let before = self.slots.len();
        let expiry = self.expiry;
        self.slots.retain(|device, slot| {
            let keep = now.saturating_duration_since(slot.last_seen) <= expiry;
            if !keep {
                if let SlotState::Buffering(p) = &slot.state {
                    tracing::debug!(device = %device, bytes = p.audio.len(), "evicted stale fragments");
                }
            }
            keep
        });
        before - self.slots.len()
    }

    /// Number of devices with a partial utterance buffered
    #[must_use]
    pub fn pending(&self) -> usize {
        self.slots
            .values()
            .filter(|s| matches!(s.state, SlotState::Buffering(_)))
            .count()
    }

    /// Whether `device` is discarding the remainder of a damaged utterance
    #[must_use]
    pub fn is_resyncing(&self, device: &str) -> bool {
        matches!(
            self.slots.get(device),
            Some(Slot {
                state: SlotState::Discarding,
                ..
            })
        )
    }
}
