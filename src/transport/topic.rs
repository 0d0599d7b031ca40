use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Number of levels in a bus topic
pub const TOPIC_LEVELS: usize = 5;

/// Flow direction encoded in the last topic level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Device to server
    Server,
    /// Server to device
    Client,
}

impl Direction {
    fn as_str(self) -> &'static str {
        match self {
            Self::Server => "server",
            Self::Client => "client",
        }
    }
}

/// Message bus topic: `<vendor>/<device_type>/<device_sn>/<command>/<direction>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Topic {
    /// Vendor name
    pub vendor: String,
    /// Device model or class
    pub device_type: String,
    /// Device serial number, `[A-Za-z0-9_]+`
    pub device_sn: String,
    /// Command family, `voice` for audio frames
    pub command: String,
    /// Flow direction
    pub direction: Direction,
}

impl Topic {
    /// Topic a device publishes voice uplink frames on
    ///
    /// # Errors
    ///
    /// Returns `TopicError` if any part is empty or the serial number is malformed.
    pub fn voice_uplink(
        vendor: &str,
        device_type: &str,
        device_sn: &str,
    ) -> Result<Self, TopicError> {
        let topic = Self {
            vendor: vendor.to_string(),
            device_type: device_type.to_string(),
            device_sn: device_sn.to_string(),
            command: "voice".to_string(),
            direction: Direction::Server,
        };
        topic.validate()?;
        Ok(topic)
    }

    /// Same device and command, opposite direction
    #[must_use]
    pub fn reply(&self) -> Self {
        Self {
            direction: match self.direction {
                Direction::Server => Direction::Client,
                Direction::Client => Direction::Server,
            },
            ..self.clone()
        }
    }

    fn validate(&self) -> Result<(), TopicError> {
        for (level, value) in [
            ("vendor", &self.vendor),
            ("device_type", &self.device_type),
            ("command", &self.command),
        ] {
            if value.is_empty() {
                return Err(TopicError::EmptyLevel(level));
            }
        }
        if !is_valid_device_sn(&self.device_sn) {
            return Err(TopicError::InvalidDeviceSn(self.device_sn.clone()));
        }
        Ok(())
    }
}

fn is_valid_device_sn(sn: &str) -> bool {
    !sn.is_empty() && sn.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

impl FromStr for Topic {
    type Err = TopicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(TopicError::Empty);
        }

        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() < TOPIC_LEVELS {
            return Err(TopicError::TooFewLevels(parts.len()));
        }
        if parts.len() > TOPIC_LEVELS {
            return Err(TopicError::TooManyLevels(parts.len()));
        }

        let direction = match parts[4] {
            "server" => Direction::Server,
            "client" => Direction::Client,
            "" => return Err(TopicError::EmptyLevel("direction")),
            other => return Err(TopicError::InvalidDirection(other.to_string())),
        };

        let topic = Self {
            vendor: parts[0].to_string(),
            device_type: parts[1].to_string(),
            device_sn: parts[2].to_string(),
            command: parts[3].to_string(),
            direction,
        };
        topic.validate()?;
        Ok(topic)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}/{}",
            self.vendor,
            self.device_type,
            self.device_sn,
            self.command,
            self.direction.as_str()
        )
    }
}

/// Topic parse errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopicError {
    /// Empty topic string
    #[error("topic is empty")]
    Empty,

    /// Fewer than five `/`-separated levels
    #[error("topic has {0} levels, need 5")]
    TooFewLevels(usize),

    /// More than five `/`-separated levels
    #[error("topic has {0} levels, expected exactly 5")]
    TooManyLevels(usize),

    /// A required level is empty
    #[error("topic level {0} is empty")]
    EmptyLevel(&'static str),

    /// Serial number contains characters outside `[A-Za-z0-9_]`
    #[error("invalid device serial number: {0:?}")]
    InvalidDeviceSn(String),

    /// Last level is neither `server` nor `client`
    #[error("invalid direction: {0:?} (expected server or client)")]
    InvalidDirection(String),
}
