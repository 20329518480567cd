//! Modus-Steuerung
//!
//! Drei Modi, gewaehlt vom Bediener oder beim Start einer neuen Session
//! auf den Standardmodus zurueckgesetzt:
//! - `PresentersOnly`: Ueberwachung aus, Publikum fest abgesenkt
//! - `PresentersAndAudience`: Ueberwachung aus, Publikum fest angehoben
//! - `AutoDuck`: die [`DuckingEngine`] entscheidet
//!
//! Ein Modus wird nur angewendet wenn gerade eine Session aktiv ist.
//! Ohne Session wird er nur gespeichert und beim naechsten Session-Start
//! angewendet.

use autoduck_core::{Mode, Result};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{ModeConfig, ModeLabels};
use crate::engine::DuckingEngine;
use crate::session::{CallStateProvider, OperatorNotifier};

pub struct ModeController {
    mode: Mode,
    default_mode: Mode,
    labels: ModeLabels,
    engine: DuckingEngine,
    call_state: Arc<dyn CallStateProvider>,
    notifier: Arc<dyn OperatorNotifier>,
}

impl ModeController {
    /// Erstellt den Controller im Standardmodus. Es wird noch nichts angewendet.
    pub fn new(
        config: &ModeConfig,
        engine: DuckingEngine,
        call_state: Arc<dyn CallStateProvider>,
        notifier: Arc<dyn OperatorNotifier>,
    ) -> Self {
        Self {
            mode: config.default,
            default_mode: config.default,
            labels: config.labels.clone(),
            engine,
            call_state,
            notifier,
        }
    }

    /// Uebernimmt einen vom Host gespeicherten Modus (z.B. den letzten Wert
    /// der Bedienoberflaeche) und wendet ihn an.
    ///
    /// Leere oder fehlende Werte ergeben den Standardmodus; unbekannte Labels
    /// sind ein Fehler und lassen den Modus unveraendert.
    pub fn restore(&mut self, label: Option<&str>) -> Result<()> {
        self.mode = match label.map(str::trim).filter(|l| !l.is_empty()) {
            Some(label) => self.labels.parse(label)?,
            None => self.default_mode,
        };
        self.apply()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn labels(&self) -> &ModeLabels {
        &self.labels
    }

    pub fn engine(&self) -> &DuckingEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut DuckingEngine {
        &mut self.engine
    }

    /// Bediener hat einen Modus gewaehlt
    pub fn on_mode_selected(&mut self, mode: Mode) -> Result<()> {
        info!(mode = %mode, "Modus gewaehlt");
        self.mode = mode;
        self.apply()
    }

    /// Bediener hat einen Modus ueber sein Label gewaehlt
    pub fn on_mode_label(&mut self, label: &str) -> Result<()> {
        let mode = self.labels.parse(label)?;
        self.on_mode_selected(mode)
    }

    /// Neue Session: Standardmodus setzen, Bediener informieren, anwenden
    pub fn on_session_start(&mut self) -> Result<()> {
        info!(mode = %self.default_mode, "Neue Session, Modus wird zurueckgesetzt");
        self.mode = self.default_mode;
        self.notifier.mode_reset(self.mode);
        self.apply()
    }

    /// Session beendet: Ueberwachung stoppen, Modus bleibt gespeichert
    pub fn on_session_end(&mut self) {
        info!("Session beendet");
        self.engine.stop_monitoring();
    }

    /// Wendet den gespeicherten Modus an, sofern eine Session aktiv ist
    pub fn apply(&mut self) -> Result<()> {
        if !self.call_state.is_session_active() {
            debug!(mode = %self.mode, "Keine aktive Session, Modus nur gespeichert");
            return Ok(());
        }

        match self.mode {
            Mode::PresentersOnly => {
                self.engine.stop_monitoring();
                self.engine.force_duck();
            }
            Mode::PresentersAndAudience => {
                self.engine.stop_monitoring();
                self.engine.force_unduck();
            }
            Mode::AutoDuck => self.engine.start_monitoring()?,
        }
        Ok(())
    }

    /// Ueberwachung beenden, z.B. beim Herunterfahren
    pub fn shutdown(&mut self) {
        self.engine.stop_monitoring();
    }
}
