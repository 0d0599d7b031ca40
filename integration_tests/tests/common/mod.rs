//! Common test utilities and fixtures
#![allow(dead_code)]

use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};
use voice_frame::VoiceConfig;

static INIT: Once = Once::new();

/// Initialize test logging (call once per test module)
pub fn init_logging() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::from_default_env().add_directive("voice_frame=debug".parse().unwrap());

        fmt().with_env_filter(filter).with_test_writer().init();
    });
}

/// Config for device `sn` with small fragments and a short expiry
pub fn test_config(sn: &str) -> VoiceConfig {
    VoiceConfig::builder()
        .topic(format!("test/T0001/{sn}/voice/server"))
        .max_fragment_size(64)
        .fragment_expiry(Duration::from_millis(200))
        .build()
        .unwrap()
}
