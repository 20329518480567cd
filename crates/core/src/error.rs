//! Fehlertypen fuer autoduck
//!
//! Zentraler Fehler-Enum fuer Engine, Konfiguration und die Adapter der
//! externen Kollaborateure (Actuator, MeterSource).

use thiserror::Error;

use crate::types::Connector;

/// Globaler Result-Alias fuer autoduck
pub type Result<T> = std::result::Result<T, DuckingError>;

/// Alle moeglichen Fehler im autoduck-System
#[derive(Debug, Error)]
pub enum DuckingError {
    // --- Actuator ---
    #[error("Nicht unterstuetzter Audio-Eingang: {0}")]
    UnsupportedConnector(String),

    #[error("Pegel {level} fuer {connector} konnte nicht gesetzt werden: {reason}")]
    ActuationFailure {
        connector: Connector,
        level: i32,
        reason: String,
    },

    // --- Messung ---
    #[error("VU-Meter-Fehler: {0}")]
    MeterSource(String),

    // --- Bedienung ---
    #[error("Unbekannter Modus: {0}")]
    UnknownMode(String),

    // --- Konfiguration ---
    #[error("Konfigurationsfehler: {0}")]
    Konfiguration(String),

    #[error("IO-Fehler: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl DuckingError {
    /// Erstellt einen Actuator-Fehler aus einer beliebigen Ursache
    pub fn actuation(connector: Connector, level: i32, reason: impl Into<String>) -> Self {
        Self::ActuationFailure {
            connector,
            level,
            reason: reason.into(),
        }
    }

    /// Gibt true zurueck wenn ein Host den Vorgang wiederholen koennte.
    /// Die Engine selbst wiederholt nie.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ActuationFailure { .. } | Self::MeterSource(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ConnectorType;

    #[test]
    fn fehler_anzeige() {
        let e = DuckingError::actuation(
            Connector::with_sub_id(ConnectorType::Ethernet, 1, 1),
            0,
            "Gain nicht verfuegbar",
        );
        assert_eq!(
            e.to_string(),
            "Pegel 0 fuer Ethernet.1.1 konnte nicht gesetzt werden: Gain nicht verfuegbar"
        );
    }

    #[test]
    fn transient_erkennung() {
        assert!(DuckingError::MeterSource("weg".into()).is_transient());
        assert!(!DuckingError::UnsupportedConnector("HDMI".into()).is_transient());
        assert!(!DuckingError::UnknownMode("x".into()).is_transient());
    }
}
