use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::protocol::voice::AudioFormat;
use crate::protocol::voice::constants::MAX_PAYLOAD_LEN;
use crate::transport::{Topic, TopicError};

/// Audio parameters stamped on every frame of a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Sample rate in Hz (default: 16000)
    pub sample_rate: u16,

    /// Channel count, 2 bits on the wire (default: 1, mono)
    pub channels: u8,

    /// Codec of the payload (default: Opus)
    pub format: AudioFormat,
}

impl AudioConfig {
    /// Create an audio config
    #[must_use]
    pub fn new(sample_rate: u16, channels: u8, format: AudioFormat) -> Self {
        Self {
            sample_rate,
            channels,
            format,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            channels: 1,
            format: AudioFormat::Opus,
        }
    }
}

/// Configuration for sending and receiving voice frames
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Audio parameters of outgoing frames
    pub audio: AudioConfig,

    /// Bus topic frames are published to
    pub topic: String,

    /// Largest payload per fragment when streaming (default: 1024 bytes)
    pub max_fragment_size: usize,

    /// How long an incomplete fragmented utterance is kept (default: 120 seconds)
    ///
    /// Serialized as fractional seconds.
    #[serde(with = "duration_secs")]
    pub fragment_expiry: Duration,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            audio: AudioConfig::default(),
            topic: "test/T0001/A0001/voice/server".to_string(),
            max_fragment_size: 1024,
            fragment_expiry: Duration::from_secs(120),
        }
    }
}

impl VoiceConfig {
    /// Create a new config builder
    #[must_use]
    pub fn builder() -> VoiceConfigBuilder {
        VoiceConfigBuilder::default()
    }

    /// Load a config from JSON; missing keys keep their defaults
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the document is malformed or any value is
    /// unusable.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an unparsable topic or an unusable fragment size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.topic()?;
        if self.max_fragment_size == 0 || self.max_fragment_size > MAX_PAYLOAD_LEN {
            return Err(ConfigError::InvalidFragmentSize(self.max_fragment_size));
        }
        Ok(())
    }

    /// Parsed publish topic
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidTopic` if `topic` is not a valid bus topic.
    pub fn topic(&self) -> Result<Topic, ConfigError> {
        Ok(self.topic.parse::<Topic>()?)
    }
}

/// Builder for `VoiceConfig`
#[derive(Debug, Clone, Default)]
pub struct VoiceConfigBuilder {
    config: VoiceConfig,
}

impl VoiceConfigBuilder {
    /// Set audio parameters
    #[must_use]
    pub fn audio(mut self, audio: AudioConfig) -> Self {
        self.config.audio = audio;
        self
    }

    /// Set publish topic
    #[must_use]
    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.config.topic = topic.into();
        self
    }

    /// Set maximum fragment payload size
    #[must_use]
    pub fn max_fragment_size(mut self, size: usize) -> Self {
        self.config.max_fragment_size = size;
        self
    }

    /// Set fragment expiry
    #[must_use]
    pub fn fragment_expiry(mut self, expiry: Duration) -> Self {
        self.config.fragment_expiry = expiry;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the assembled config does not validate.
    pub fn build(self) -> Result<VoiceConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Document is not valid JSON or has a value of the wrong type
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Topic string does not parse
    #[error("invalid topic: {0}")]
    InvalidTopic(#[from] TopicError),

    /// Fragment size is zero or exceeds the 16-bit length field
    #[error("invalid max fragment size: {0}")]
    InvalidFragmentSize(usize),
}

mod duration_secs {
    use std::time::Duration;

    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Duration::try_from_secs_f64(secs).map_err(D::Error::custom)
    }
}
