//! Ducking-Dienst – Ereignisschleife
//!
//! Serialisiert alle Eingaben in einen einzigen tokio-Task. Pegel, Timer,
//! Bedienung und Anrufstatus werden strikt nacheinander verarbeitet; kein
//! Fehler verlaesst die Schleife, er wird geloggt.
//!
//! ```ignore
//! let (service, handle) = DuckingService::new(config, actuator, meter, call_state, notifier)?;
//! tokio::spawn(service.run());
//! handle.session_started();
//! handle.select_mode_label("autoDuck");
//! ```

use autoduck_core::{ControlEvent, Mode, Result};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::actuator::Actuator;
use crate::config::DuckingConfig;
use crate::engine::DuckingEngine;
use crate::meter::MeterSource;
use crate::mode::ModeController;
use crate::session::{CallStateProvider, OperatorNotifier};

/// Sendeseite der Ereignisschleife fuer Host, Bedienoberflaeche und
/// Anrufstatus-Adapter
#[derive(Debug, Clone)]
pub struct ServiceHandle {
    tx: UnboundedSender<ControlEvent>,
}

impl ServiceHandle {
    pub fn send(&self, event: ControlEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn select_mode(&self, mode: Mode) -> bool {
        self.send(ControlEvent::ModeSelected(mode))
    }

    pub fn select_mode_label(&self, label: impl Into<String>) -> bool {
        self.send(ControlEvent::ModeLabel(label.into()))
    }

    pub fn session_started(&self) -> bool {
        self.send(ControlEvent::SessionStarted)
    }

    pub fn session_ended(&self) -> bool {
        self.send(ControlEvent::SessionEnded)
    }

    pub fn shutdown(&self) -> bool {
        self.send(ControlEvent::Shutdown)
    }
}

pub struct DuckingService {
    controller: ModeController,
    rx: UnboundedReceiver<ControlEvent>,
}

impl DuckingService {
    /// Baut Engine und Modus-Steuerung aus einer Konfiguration
    pub fn new(
        config: DuckingConfig,
        actuator: Arc<dyn Actuator>,
        meter: Arc<dyn MeterSource>,
        call_state: Arc<dyn CallStateProvider>,
        notifier: Arc<dyn OperatorNotifier>,
    ) -> Result<(Self, ServiceHandle)> {
        config.validate()?;
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = DuckingEngine::new(&config, actuator, meter, tx.clone());
        let controller = ModeController::new(&config.modes, engine, call_state, notifier);
        Ok((Self { controller, rx }, ServiceHandle { tx }))
    }

    pub fn controller(&self) -> &ModeController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ModeController {
        &mut self.controller
    }

    /// Verarbeitet Ereignisse bis `Shutdown` eintrifft
    pub async fn run(mut self) {
        info!(mode = %self.controller.mode(), "Ducking-Dienst gestartet");
        while let Some(event) = self.rx.recv().await {
            if !self.handle(event) {
                break;
            }
        }
        self.controller.shutdown();
        info!("Ducking-Dienst beendet");
    }

    /// Verarbeitet ein einzelnes Ereignis. Gibt false bei `Shutdown` zurueck.
    pub fn handle(&mut self, event: ControlEvent) -> bool {
        let ergebnis = match event {
            ControlEvent::Levels(batch) => {
                if let Some(t) = self.controller.engine_mut().handle_levels(&batch) {
                    debug!(transition = ?t, "Zustandswechsel");
                }
                Ok(())
            }
            ControlEvent::HoldElapsed(token) => {
                if let Some(t) = self.controller.engine_mut().handle_hold_elapsed(token) {
                    debug!(transition = ?t, "Zustandswechsel");
                }
                Ok(())
            }
            ControlEvent::ModeSelected(mode) => self.controller.on_mode_selected(mode),
            ControlEvent::ModeLabel(label) => self.controller.on_mode_label(&label),
            ControlEvent::SessionStarted => self.controller.on_session_start(),
            ControlEvent::SessionEnded => {
                self.controller.on_session_end();
                Ok(())
            }
            ControlEvent::Shutdown => return false,
        };

        if let Err(e) = ergebnis {
            warn!(error = %e, "Ereignis konnte nicht verarbeitet werden");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{settle, FakeCallState, RecordingActuator, RecordingMeter, RecordingNotifier};
    use autoduck_core::{Connector, ConnectorType, LevelBatch};
    use std::time::Duration;

    fn mic() -> Connector {
        Connector::new(ConnectorType::Microphone, 1)
    }

    #[tokio::test(start_paused = true)]
    async fn ungueltige_konfiguration_wird_abgelehnt() {
        let config = DuckingConfig {
            samples: 0,
            ..Default::default()
        };
        let res = DuckingService::new(
            config,
            Arc::new(RecordingActuator::default()),
            Arc::new(RecordingMeter::default()),
            Arc::new(FakeCallState::default()),
            Arc::new(RecordingNotifier::default()),
        );
        assert!(res.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn schleife_verarbeitet_bis_shutdown() {
        let actuator = Arc::new(RecordingActuator::default());
        let meter = Arc::new(RecordingMeter::default());
        let (service, handle) = DuckingService::new(
            DuckingConfig::default(),
            actuator.clone(),
            meter.clone(),
            Arc::new(FakeCallState::with_session(true)),
            Arc::new(RecordingNotifier::default()),
        )
        .unwrap();
        let task = tokio::spawn(service.run());

        assert!(handle.select_mode_label("autoDuck"));
        settle().await;
        assert_eq!(meter.active(), 1);

        for _ in 0..4 {
            meter.emit([(mic(), 60)].into_iter().collect::<LevelBatch>());
        }
        settle().await;
        assert_eq!(actuator.calls().len(), 6);
        assert!(actuator.calls().iter().all(|(_, l)| *l == 0));

        // Unbekanntes Label beendet die Schleife nicht
        assert!(handle.select_mode_label("karaoke"));
        for _ in 0..4 {
            meter.emit([(mic(), 0)].into_iter().collect::<LevelBatch>());
        }
        tokio::time::sleep(Duration::from_millis(5100)).await;
        settle().await;
        assert_eq!(actuator.calls().iter().filter(|(_, l)| *l == 30).count(), 6);

        assert!(handle.shutdown());
        task.await.unwrap();
        assert_eq!(meter.active(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn session_ereignisse_steuern_den_modus() {
        let call = Arc::new(FakeCallState::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let actuator = Arc::new(RecordingActuator::default());
        let (mut service, _handle) = DuckingService::new(
            DuckingConfig::default(),
            actuator.clone(),
            Arc::new(RecordingMeter::default()),
            call.clone(),
            notifier.clone(),
        )
        .unwrap();

        assert!(service.handle(ControlEvent::ModeSelected(Mode::AutoDuck)));
        assert!(!service.controller().engine().is_monitoring());

        call.set(true);
        assert!(service.handle(ControlEvent::SessionStarted));
        assert_eq!(service.controller().mode(), Mode::PresentersOnly);
        assert_eq!(notifier.resets(), vec![Mode::PresentersOnly]);

        assert!(service.handle(ControlEvent::ModeSelected(Mode::AutoDuck)));
        assert!(service.controller().engine().is_monitoring());
        assert!(service.handle(ControlEvent::SessionEnded));
        assert!(!service.controller().engine().is_monitoring());

        assert!(!service.handle(ControlEvent::Shutdown));
        settle().await;
        assert_eq!(actuator.calls().len(), 6);
    }
}
