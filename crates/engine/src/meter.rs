//! Schnittstelle zur VU-Meter-Quelle
//!
//! Die Engine abonniert die Pegel der ueberwachten Connectoren und erhaelt
//! pro Messintervall einen [`LevelBatch`]. Das Abonnement ist an den
//! Lebenszyklus von [`MeterSubscription`] gebunden: Drop meldet ab.

use autoduck_core::{Connector, LevelBatch, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

/// Messpunkt des VU-Meters relativ zur Echo-Unterdrueckung
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MeterTap {
    #[default]
    BeforeAec,
    AfterAec,
}

/// Was abonniert werden soll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeterRequest {
    /// Physische Anschluesse, einer pro Typ+Id
    pub connectors: Vec<Connector>,
    /// Messintervall
    pub interval: Duration,
    pub tap: MeterTap,
}

impl MeterRequest {
    pub fn new(monitored: &[Connector], interval: Duration, tap: MeterTap) -> Self {
        Self {
            connectors: consolidate(monitored),
            interval,
            tap,
        }
    }
}

/// Empfaenger fuer Messzyklen; wird von der Quelle aufgerufen
pub type LevelSink = Arc<dyn Fn(LevelBatch) + Send + Sync>;

/// Quelle fuer Pegelmessungen
pub trait MeterSource: Send + Sync + 'static {
    /// Startet die Messung und liefert Messzyklen an `sink` bis das
    /// zurueckgegebene Abonnement gedroppt wird.
    fn subscribe(&self, request: &MeterRequest, sink: LevelSink) -> Result<MeterSubscription>;
}

/// Aktives Abonnement. Meldet beim Drop genau einmal ab.
pub struct MeterSubscription {
    teardown: Option<Box<dyn FnOnce() + Send>>,
}

impl MeterSubscription {
    pub fn new<F>(teardown: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            teardown: Some(Box::new(teardown)),
        }
    }

    /// Meldet sofort ab
    pub fn unsubscribe(mut self) {
        self.run_teardown();
    }

    fn run_teardown(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl Drop for MeterSubscription {
    fn drop(&mut self) {
        self.run_teardown();
    }
}

impl std::fmt::Debug for MeterSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeterSubscription")
            .field("aktiv", &self.teardown.is_some())
            .finish()
    }
}

/// Reduziert Connectoren auf einen Eintrag pro Typ+Id.
///
/// Unterkanaele desselben Anschlusses teilen sich eine Messung. Die
/// Reihenfolge des ersten Auftretens bleibt erhalten.
pub fn consolidate(connectors: &[Connector]) -> Vec<Connector> {
    let mut gesehen = BTreeSet::new();
    connectors
        .iter()
        .map(Connector::physical)
        .filter(|c| gesehen.insert(*c))
        .collect()
}
