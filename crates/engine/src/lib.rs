//! autoduck-engine – Pegelgesteuertes Ducking von Publikums-Mikrofonen
//!
//! Ueberwacht die VU-Meter der Presenter-Mikrofone und senkt die
//! Publikums-Mikrofone ab, solange ein Presenter spricht:
//! - Gleitender Mittelwert pro Mikrofon
//! - Hysterese mit zwei Schwellen (sofort ducken, verzoegert anheben)
//! - Halte-Timer gegen Flattern in Sprechpausen
//! - Drei Betriebsmodi (fest abgesenkt, fest offen, automatisch)
//!
//! Geraete-Zugriffe laufen ueber die Traits [`Actuator`], [`MeterSource`],
//! [`CallStateProvider`] und [`OperatorNotifier`].

pub mod actuator;
pub mod config;
pub mod debounce;
pub mod decode;
pub mod engine;
pub mod meter;
pub mod mode;
pub mod sample_buffer;
pub mod service;
pub mod session;
pub mod threshold;

#[cfg(test)]
pub(crate) mod testing;

// Bequeme Re-Exporte der wichtigsten Typen
pub use actuator::Actuator;
pub use config::{DuckingConfig, LevelConfig, LoggingConfig, MeterConfig, ModeConfig, ModeLabels};
pub use debounce::DebounceTimer;
pub use decode::decode;
pub use engine::{DuckingEngine, Transition};
pub use meter::{consolidate, LevelSink, MeterRequest, MeterSource, MeterSubscription, MeterTap};
pub use mode::ModeController;
pub use sample_buffer::{SampleBuffer, SampleWindow};
pub use service::{DuckingService, ServiceHandle};
pub use session::{CallStateProvider, OperatorNotifier, SilentNotifier};
pub use threshold::{ThresholdConfig, ThresholdEvaluator, ThresholdFlags, Zone};
