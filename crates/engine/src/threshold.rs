//! Zwei-Schwellen-Komparator (Hysterese) ueber alle ueberwachten Quellen
//!
//! Beide Flags sind ODER-Verknuepfungen: eine laute Quelle reicht. Ducking
//! ist eine raumweite Entscheidung, kein Zustand pro Mikrofon.

use serde::{Deserialize, Serialize};

/// Schwellenwerte fuer die Pegel-Mittelwerte
///
/// Voraussetzung: `high > low`. Der Bereich dazwischen ist das Totband, in dem
/// sich der Zustand nie aendert.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Ueberschreitung loest sofortiges Ducking aus
    pub high: f64,
    /// Unterschreitung startet den Halte-Timer
    pub low: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            high: 30.0,
            low: 25.0,
        }
    }
}

impl ThresholdConfig {
    pub fn is_valid(&self) -> bool {
        self.high > self.low
    }
}

/// Ergebnis einer Auswertung
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThresholdFlags {
    pub above_high: bool,
    pub above_low: bool,
}

/// Einordnung der Flags fuer die Engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// Mindestens eine Quelle ueber `high`
    Loud,
    /// Zwischen den Schwellen
    DeadBand,
    /// Alle Quellen auf oder unter `low`
    Quiet,
}

impl ThresholdFlags {
    pub fn zone(&self) -> Zone {
        if self.above_high {
            Zone::Loud
        } else if self.above_low {
            Zone::DeadBand
        } else {
            Zone::Quiet
        }
    }
}

#[derive(Debug, Clone)]
pub struct ThresholdEvaluator {
    config: ThresholdConfig,
}

impl ThresholdEvaluator {
    pub fn new(config: ThresholdConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ThresholdConfig {
        &self.config
    }

    /// Wertet die Mittelwerte aller Quellen aus (strikte Vergleiche)
    pub fn evaluate<I>(&self, averages: I) -> ThresholdFlags
    where
        I: IntoIterator<Item = f64>,
    {
        averages
            .into_iter()
            .fold(ThresholdFlags::default(), |flags, avg| ThresholdFlags {
                above_high: flags.above_high || avg > self.config.high,
                above_low: flags.above_low || avg > self.config.low,
            })
    }
}
