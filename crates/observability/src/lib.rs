//! # autoduck-observability
//!
//! Structured Logging fuer Hosts die die Ducking-Engine einbetten.
//! Die Engine selbst loggt nur ueber `tracing`; der Host installiert hier
//! den Subscriber passend zu `DuckingConfig::logging`.

pub mod logging;

pub use logging::{init_logging, log_format_from_env, log_format_valid, log_level_from_env, log_level_valid};
