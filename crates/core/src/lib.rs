//! autoduck-core – Gemeinsame Typen, Ereignisse und Fehlertypen
//!
//! Dieses Crate stellt die Bausteine bereit, die Engine, Host und die
//! Adapter der Geraete-Schnittstellen gemeinsam nutzen.

pub mod error;
pub mod event;
pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use error::{DuckingError, Result};
pub use event::ControlEvent;
pub use types::{Connector, ConnectorType, LevelBatch, Mode};
