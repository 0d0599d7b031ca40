//! Core types module

mod config;


pub use config::{AudioConfig, ConfigError, VoiceConfig, VoiceConfigBuilder};
