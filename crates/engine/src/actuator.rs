//! Schnittstelle zum Setzen von Eingangspegeln
//!
//! Die konkrete Implementierung (inklusive der Suche nach dem passenden
//! Parameternamen auf der jeweiligen Hardware) liegt beim Geraete-Adapter.
//! Die Engine ruft den Actuator fire-and-forget auf: Pegelbefehle landen in
//! einer Queue, ein einzelner Task arbeitet sie der Reihe nach ab. Fehler
//! werden nur geloggt.

use async_trait::async_trait;
use autoduck_core::{Connector, DuckingError, Result};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

/// Setzt den Gain/Pegel eines Audio-Eingangs
#[async_trait]
pub trait Actuator: Send + Sync + 'static {
    /// Setzt den Pegel. Darf mit `UnsupportedConnector` oder
    /// `ActuationFailure` fehlschlagen.
    async fn set_level(&self, connector: &Connector, level: i32) -> Result<()>;
}

/// Ein einzelner Pegelbefehl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LevelCommand {
    pub connector: Connector,
    pub level: i32,
}

/// Befehls-Queue vor dem Actuator
///
/// Befehle werden in Sende-Reihenfolge ausgefuehrt, der zuletzt gesendete
/// Pegel eines Connectors ist also auch der zuletzt gesetzte. Der Task
/// startet beim ersten Befehl und endet wenn die Queue gedroppt wird.
pub(crate) struct ActuationQueue {
    tx: UnboundedSender<LevelCommand>,
    worker: Option<(Arc<dyn Actuator>, UnboundedReceiver<LevelCommand>)>,
}

impl ActuationQueue {
    pub fn new(actuator: Arc<dyn Actuator>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            worker: Some((actuator, rx)),
        }
    }

    /// Reiht `level` fuer alle `targets` ein ohne auf das Ergebnis zu warten.
    ///
    /// Muss innerhalb einer tokio-Runtime aufgerufen werden.
    pub fn dispatch(&mut self, targets: &[Connector], level: i32) {
        if let Some((actuator, rx)) = self.worker.take() {
            tokio::spawn(actuation_loop(actuator, rx));
        }
        for &connector in targets {
            if self.tx.send(LevelCommand { connector, level }).is_err() {
                warn!(connector = %connector, level, "Actuator-Task beendet, Pegelbefehl verworfen");
            }
        }
    }
}

async fn actuation_loop(actuator: Arc<dyn Actuator>, mut rx: UnboundedReceiver<LevelCommand>) {
    while let Some(LevelCommand { connector, level }) = rx.recv().await {
        match actuator.set_level(&connector, level).await {
            Ok(()) => debug!(connector = %connector, level, "Pegel gesetzt"),
            Err(DuckingError::UnsupportedConnector(typ)) => warn!(
                connector = %connector,
                typ = %typ,
                "Audio-Eingang nicht unterstuetzt, Pegel unveraendert"
            ),
            Err(e) => warn!(connector = %connector, level, error = %e, "Pegel setzen fehlgeschlagen"),
        }
    }
    debug!("Actuator-Task beendet");
}
