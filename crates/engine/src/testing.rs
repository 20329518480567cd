//! Aufzeichnende Test-Doubles fuer die externen Schnittstellen

use async_trait::async_trait;
use autoduck_core::{Connector, DuckingError, LevelBatch, Mode, Result};
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::actuator::Actuator;
use crate::meter::{LevelSink, MeterRequest, MeterSource, MeterSubscription};
use crate::session::{CallStateProvider, OperatorNotifier};

/// Laesst alle gespawnten Actuator-Tasks laufen (benoetigt pausierte Zeit)
pub(crate) async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

#[derive(Default)]
pub(crate) struct RecordingActuator {
    calls: Mutex<Vec<(Connector, i32)>>,
    ok: Mutex<Vec<(Connector, i32)>>,
    failing: BTreeSet<Connector>,
}

impl RecordingActuator {
    pub fn failing_on<I: IntoIterator<Item = Connector>>(connectors: I) -> Self {
        Self {
            failing: connectors.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Alle Aufrufe, sortiert
    pub fn calls(&self) -> Vec<(Connector, i32)> {
        let mut calls = self.calls.lock().clone();
        calls.sort();
        calls
    }

    pub fn succeeded(&self) -> Vec<(Connector, i32)> {
        let mut ok = self.ok.lock().clone();
        ok.sort();
        ok
    }
}

#[async_trait]
impl Actuator for RecordingActuator {
    async fn set_level(&self, connector: &Connector, level: i32) -> Result<()> {
        self.calls.lock().push((*connector, level));
        if self.failing.contains(connector) {
            return Err(DuckingError::UnsupportedConnector(
                connector.connector_type.to_string(),
            ));
        }
        self.ok.lock().push((*connector, level));
        Ok(())
    }
}

/// Actuator mit pegelabhaengiger Laufzeit, zeichnet in Abschluss-Reihenfolge auf
pub(crate) struct SlowActuator {
    duck_delay: Duration,
    other_delay: Duration,
    landed: Mutex<Vec<(Connector, i32)>>,
}

impl SlowActuator {
    /// `duck_delay` gilt fuer Pegel 0, `other_delay` fuer alle anderen
    pub fn new(duck_delay: Duration, other_delay: Duration) -> Self {
        Self {
            duck_delay,
            other_delay,
            landed: Mutex::new(Vec::new()),
        }
    }

    pub fn landed(&self) -> Vec<(Connector, i32)> {
        self.landed.lock().clone()
    }
}

#[async_trait]
impl Actuator for SlowActuator {
    async fn set_level(&self, connector: &Connector, level: i32) -> Result<()> {
        let dauer = if level == 0 { self.duck_delay } else { self.other_delay };
        tokio::time::sleep(dauer).await;
        self.landed.lock().push((*connector, level));
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct RecordingMeter {
    requests: Mutex<Vec<MeterRequest>>,
    sink: Mutex<Option<LevelSink>>,
    active: Arc<AtomicUsize>,
    fail: AtomicBool,
}

impl RecordingMeter {
    pub fn subscribe_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn last_request(&self) -> Option<MeterRequest> {
        self.requests.lock().last().cloned()
    }

    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Liefert einen Messzyklus an den letzten Abonnenten
    pub fn emit(&self, batch: LevelBatch) {
        if let Some(sink) = self.sink.lock().as_ref() {
            sink(batch);
        }
    }
}

impl MeterSource for RecordingMeter {
    fn subscribe(&self, request: &MeterRequest, sink: LevelSink) -> Result<MeterSubscription> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DuckingError::MeterSource("VU-Meter nicht verfuegbar".into()));
        }
        self.requests.lock().push(request.clone());
        *self.sink.lock() = Some(sink);
        self.active.fetch_add(1, Ordering::SeqCst);
        let active = Arc::clone(&self.active);
        Ok(MeterSubscription::new(move || {
            active.fetch_sub(1, Ordering::SeqCst);
        }))
    }
}

#[derive(Default)]
pub(crate) struct FakeCallState {
    active: AtomicBool,
}

impl FakeCallState {
    pub fn with_session(active: bool) -> Self {
        Self {
            active: AtomicBool::new(active),
        }
    }

    pub fn set(&self, active: bool) {
        self.active.store(active, Ordering::SeqCst);
    }
}

impl CallStateProvider for FakeCallState {
    fn is_session_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    resets: Mutex<Vec<Mode>>,
}

impl RecordingNotifier {
    pub fn resets(&self) -> Vec<Mode> {
        self.resets.lock().clone()
    }
}

impl OperatorNotifier for RecordingNotifier {
    fn mode_reset(&self, mode: Mode) {
        self.resets.lock().push(mode);
    }
}
