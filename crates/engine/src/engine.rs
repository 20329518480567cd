//! DuckingEngine – Pegelueberwachung und Ducking-Entscheidung
//!
//! Verarbeitet Messzyklen der Presenter-Mikrofone und steuert die Pegel der
//! Publikums-Mikrofone:
//!
//! - Mittelwert einer Quelle ueber `high` -> sofort ducken, laufenden
//!   Halte-Timer abbrechen
//! - alle Mittelwerte auf/unter `low` -> Halte-Timer starten (falls keiner
//!   laeuft), nach Ablauf wieder anheben
//! - dazwischen (Totband) -> nichts aendern
//!
//! Die Engine ist nicht thread-safe und wird ausschliesslich aus der
//! Ereignisschleife aufgerufen. Timer und VU-Meter liefern ihre Ereignisse
//! ueber denselben Kanal an diese Schleife.

use autoduck_core::{Connector, ControlEvent, LevelBatch, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, trace};

use crate::actuator::{ActuationQueue, Actuator};
use crate::config::{DuckingConfig, LevelConfig};
use crate::debounce::DebounceTimer;
use crate::meter::{LevelSink, MeterRequest, MeterSource, MeterSubscription};
use crate::sample_buffer::SampleBuffer;
use crate::threshold::{ThresholdEvaluator, ThresholdFlags, Zone};

/// Zustandswechsel der Engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Ducked,
    Unducked,
}

pub struct DuckingEngine {
    buffers: SampleBuffer,
    evaluator: ThresholdEvaluator,
    timer: DebounceTimer,
    /// Beabsichtigter Zustand, nicht der bestaetigte Hardware-Zustand
    ducked: bool,

    duck_set: Vec<Connector>,
    levels: LevelConfig,
    hold: Duration,
    request: MeterRequest,

    actuation: ActuationQueue,
    meter: Arc<dyn MeterSource>,
    events: UnboundedSender<ControlEvent>,
    subscription: Option<MeterSubscription>,
}

impl DuckingEngine {
    /// Erstellt die Engine im Ruhezustand (nicht geduckt, keine Ueberwachung).
    ///
    /// `config` muss validiert sein ([`DuckingConfig::validate`]).
    pub fn new(
        config: &DuckingConfig,
        actuator: Arc<dyn Actuator>,
        meter: Arc<dyn MeterSource>,
        events: UnboundedSender<ControlEvent>,
    ) -> Self {
        Self {
            buffers: SampleBuffer::new(config.monitor.iter().copied(), config.samples),
            evaluator: ThresholdEvaluator::new(config.threshold),
            timer: DebounceTimer::new(),
            ducked: false,
            duck_set: config.duck.clone(),
            levels: config.levels,
            hold: config.hold_timeout(),
            request: MeterRequest::new(&config.monitor, config.meter_interval(), config.meter.tap),
            actuation: ActuationQueue::new(actuator),
            meter,
            events,
            subscription: None,
        }
    }

    /// Abonniert das VU-Meter. Mehrfacher Aufruf ist ein No-op.
    ///
    /// Die Pegelfenster starten dabei wieder bei 0.
    pub fn start_monitoring(&mut self) -> Result<()> {
        if self.subscription.is_some() {
            trace!("Ueberwachung laeuft bereits");
            return Ok(());
        }

        let tx = self.events.clone();
        let sink: LevelSink = Arc::new(move |batch: LevelBatch| {
            let _ = tx.send(ControlEvent::Levels(batch));
        });
        let subscription = self.meter.subscribe(&self.request, sink)?;

        self.buffers.reset();
        self.subscription = Some(subscription);
        info!(
            connectors = ?self.request.connectors.iter().map(ToString::to_string).collect::<Vec<_>>(),
            intervall_ms = self.request.interval.as_millis() as u64,
            "Audio-Ueberwachung gestartet"
        );
        Ok(())
    }

    /// Meldet das VU-Meter ab und bricht den Halte-Timer ab.
    /// Der Ducking-Zustand bleibt unveraendert.
    pub fn stop_monitoring(&mut self) {
        let hatte_timer = self.timer.cancel();
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
            info!(halte_timer_abgebrochen = hatte_timer, "Audio-Ueberwachung gestoppt");
        }
    }

    pub fn is_monitoring(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn is_ducked(&self) -> bool {
        self.ducked
    }

    pub fn hold_pending(&self) -> bool {
        self.timer.is_pending()
    }

    pub fn buffers(&self) -> &SampleBuffer {
        &self.buffers
    }

    /// Verarbeitet einen Messzyklus.
    ///
    /// Zyklen die nach dem Abmelden noch in der Schleife lagen werden
    /// ignoriert.
    pub fn handle_levels(&mut self, batch: &LevelBatch) -> Option<Transition> {
        if !self.is_monitoring() {
            trace!("Messzyklus ohne aktive Ueberwachung verworfen");
            return None;
        }

        self.buffers.ingest(batch);
        let flags: ThresholdFlags = self.evaluator.evaluate(self.buffers.averages().map(|(_, avg)| avg));

        match flags.zone() {
            Zone::Loud => {
                if self.timer.cancel() {
                    debug!("Pegel ueber Schwelle, Unducking abgebrochen");
                }
                self.duck()
            }
            Zone::Quiet => {
                if !self.timer.is_pending() {
                    self.arm_hold();
                }
                None
            }
            Zone::DeadBand => None,
        }
    }

    /// Verarbeitet den Ablauf eines Halte-Timers
    pub fn handle_hold_elapsed(&mut self, token: u64) -> Option<Transition> {
        if !self.timer.complete(token) {
            trace!(token, "Veralteter Halte-Timer ignoriert");
            return None;
        }
        debug!("Halte-Zeit abgelaufen");
        self.unduck()
    }

    /// Setzt die Publikums-Mikrofone unbedingt auf den Duck-Pegel
    pub fn force_duck(&mut self) {
        info!(mics = self.duck_set.len(), "Publikums-Mikrofone fest abgesenkt");
        self.actuation.dispatch(&self.duck_set, self.levels.duck);
        self.ducked = true;
    }

    /// Setzt die Publikums-Mikrofone unbedingt auf den Unduck-Pegel
    pub fn force_unduck(&mut self) {
        info!(mics = self.duck_set.len(), "Publikums-Mikrofone fest angehoben");
        self.actuation.dispatch(&self.duck_set, self.levels.unduck);
        self.ducked = false;
    }

    fn duck(&mut self) -> Option<Transition> {
        if self.ducked {
            return None;
        }
        info!(mics = self.duck_set.len(), level = self.levels.duck, "Publikums-Mikrofone werden abgesenkt");
        self.actuation.dispatch(&self.duck_set, self.levels.duck);
        self.ducked = true;
        Some(Transition::Ducked)
    }

    fn unduck(&mut self) -> Option<Transition> {
        if !self.ducked {
            return None;
        }
        info!(mics = self.duck_set.len(), level = self.levels.unduck, "Publikums-Mikrofone werden angehoben");
        self.actuation.dispatch(&self.duck_set, self.levels.unduck);
        self.ducked = false;
        Some(Transition::Unducked)
    }

    fn arm_hold(&mut self) {
        let tx = self.events.clone();
        let token = self.timer.arm(self.hold, move |token| {
            let _ = tx.send(ControlEvent::HoldElapsed(token));
        });
        debug!(token, halte_ms = self.hold.as_millis() as u64, "Pegel unter Schwelle, Halte-Timer gestartet");
    }
}

impl Drop for DuckingEngine {
    fn drop(&mut self) {
        self.stop_monitoring();
    }
}
