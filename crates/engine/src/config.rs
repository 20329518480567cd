//! Ducking-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! Standardwerte, sodass der Dienst ohne Konfigurationsdatei lauffaehig ist.

use autoduck_core::{Connector, ConnectorType, DuckingError, Mode, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

use crate::meter::MeterTap;
use crate::threshold::ThresholdConfig;

/// Vollstaendige Konfiguration des Ducking-Dienstes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DuckingConfig {
    /// Presenter-Mikrofone deren Pegel ueberwacht werden
    pub monitor: Vec<Connector>,
    /// Publikums-Mikrofone die abgesenkt werden
    pub duck: Vec<Connector>,
    pub threshold: ThresholdConfig,
    pub levels: LevelConfig,
    /// Wartezeit unter `low` bevor wieder angehoben wird
    pub hold_timeout_ms: u64,
    /// Laenge des gleitenden Mittelwerts
    pub samples: usize,
    pub meter: MeterConfig,
    pub modes: ModeConfig,
    pub logging: LoggingConfig,
}

impl Default for DuckingConfig {
    fn default() -> Self {
        Self {
            monitor: vec![Connector::new(ConnectorType::Microphone, 1)],
            duck: (1..=6)
                .map(|id| Connector::with_sub_id(ConnectorType::Ethernet, id, 1))
                .collect(),
            threshold: ThresholdConfig::default(),
            levels: LevelConfig::default(),
            hold_timeout_ms: 5000,
            samples: 4,
            meter: MeterConfig::default(),
            modes: ModeConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Zielpegel fuer die Publikums-Mikrofone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub duck: i32,
    pub unduck: i32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self { duck: 0, unduck: 30 }
    }
}

/// VU-Meter-Einstellungen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeterConfig {
    /// Messintervall in Millisekunden
    pub interval_ms: u64,
    pub tap: MeterTap,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            interval_ms: 100,
            tap: MeterTap::BeforeAec,
        }
    }
}

/// Modus-Einstellungen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeConfig {
    /// Modus nach Start einer neuen Session
    pub default: Mode,
    pub labels: ModeLabels,
}

/// Werte die die Bedienoberflaeche fuer die drei Modi sendet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeLabels {
    pub presenters_only: String,
    pub presenters_and_audience: String,
    pub auto_duck: String,
}

impl Default for ModeLabels {
    fn default() -> Self {
        Self {
            presenters_only: "presentersOnly".into(),
            presenters_and_audience: "presentersAndAudience".into(),
            auto_duck: "autoDuck".into(),
        }
    }
}

impl ModeLabels {
    pub fn label(&self, mode: Mode) -> &str {
        match mode {
            Mode::PresentersOnly => &self.presenters_only,
            Mode::PresentersAndAudience => &self.presenters_and_audience,
            Mode::AutoDuck => &self.auto_duck,
        }
    }

    /// Sucht den Modus zu einem Label der Oberflaeche
    pub fn parse(&self, label: &str) -> Result<Mode> {
        Mode::ALLE
            .into_iter()
            .find(|&m| self.label(m) == label)
            .ok_or_else(|| DuckingError::UnknownMode(label.to_string()))
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl LoggingConfig {
    /// Installiert den globalen tracing-Subscriber mit diesen Einstellungen.
    ///
    /// `AUTODUCK_LOG_LEVEL` / `AUTODUCK_LOG_FORMAT` haben Vorrang. Gibt false
    /// zurueck wenn bereits ein Subscriber installiert war.
    ///
    /// ```ignore
    /// let config = DuckingConfig::laden("autoduck.toml")?;
    /// config.logging.init();
    /// ```
    pub fn init(&self) -> bool {
        autoduck_observability::init_logging(&self.level, &self.format)
    }
}

impl DuckingConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => {
                let config = Self::from_toml(&inhalt)
                    .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }

    /// Parst und validiert eine Konfiguration aus TOML-Text
    pub fn from_toml(inhalt: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(inhalt).map_err(|e| DuckingError::Konfiguration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Prueft die Vorbedingungen der Engine
    pub fn validate(&self) -> Result<()> {
        if self.samples == 0 {
            return Err(DuckingError::Konfiguration(
                "samples muss mindestens 1 sein".into(),
            ));
        }
        if !self.threshold.is_valid() {
            return Err(DuckingError::Konfiguration(format!(
                "threshold.high ({}) muss groesser als threshold.low ({}) sein",
                self.threshold.high, self.threshold.low
            )));
        }
        if self.meter.interval_ms == 0 {
            return Err(DuckingError::Konfiguration(
                "meter.interval_ms muss groesser 0 sein".into(),
            ));
        }
        let labels: HashSet<&str> = Mode::ALLE
            .into_iter()
            .map(|m| self.modes.labels.label(m))
            .collect();
        if labels.len() != Mode::ALLE.len() {
            return Err(DuckingError::Konfiguration(
                "Modus-Labels muessen eindeutig sein".into(),
            ));
        }
        if !autoduck_observability::log_format_valid(&self.logging.format) {
            return Err(DuckingError::Konfiguration(format!(
                "logging.format '{}' ist ungueltig (text oder json)",
                self.logging.format
            )));
        }
        if self.monitor.is_empty() {
            tracing::warn!("Keine Mikrofone zur Ueberwachung konfiguriert");
        }
        Ok(())
    }

    pub fn hold_timeout(&self) -> Duration {
        Duration::from_millis(self.hold_timeout_ms)
    }

    pub fn meter_interval(&self) -> Duration {
        Duration::from_millis(self.meter.interval_ms)
    }
}
