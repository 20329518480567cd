//! Ereignisse der Ducking-Ereignisschleife
//!
//! Alle Eingaben (Pegelmessungen, Timer, Bedienung, Anrufstatus) werden als
//! `ControlEvent` in genau eine Schleife serialisiert. Jeder Handler laeuft
//! vollstaendig durch bevor das naechste Ereignis verarbeitet wird.

use crate::types::{LevelBatch, Mode};

/// Alle Ereignisse die der Ducking-Dienst verarbeitet
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    // --- Messung ---
    /// Ein Messzyklus der ueberwachten Connectoren
    Levels(LevelBatch),
    /// Der Halte-Timer mit diesem Token ist abgelaufen
    HoldElapsed(u64),

    // --- Bedienung ---
    /// Modus direkt gewaehlt
    ModeSelected(Mode),
    /// Modus als Label der Bedienoberflaeche gewaehlt
    ModeLabel(String),

    // --- Anrufstatus ---
    SessionStarted,
    SessionEnded,

    /// Ereignisschleife beenden
    Shutdown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Connector, ConnectorType};

    #[test]
    fn level_ereignis_vergleichbar() {
        let mut batch = LevelBatch::new();
        batch.insert(Connector::new(ConnectorType::Microphone, 1), 12);
        let a = ControlEvent::Levels(batch.clone());
        assert_eq!(a, ControlEvent::Levels(batch));
        assert_ne!(a, ControlEvent::Shutdown);
    }
}
