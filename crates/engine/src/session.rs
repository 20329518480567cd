//! Anrufstatus und Bediener-Benachrichtigung
//!
//! Beide Schnittstellen werden vom Host implementiert. Start und Ende einer
//! Session kommen als [`ControlEvent`](autoduck_core::ControlEvent) in die
//! Ereignisschleife; hier wird nur der aktuelle Status abgefragt.

use autoduck_core::Mode;

/// Liefert ob gerade ein Anruf/Session aktiv ist
pub trait CallStateProvider: Send + Sync + 'static {
    fn is_session_active(&self) -> bool;
}

/// Meldet dem Bediener Modus-Aenderungen die nicht von ihm ausgingen
pub trait OperatorNotifier: Send + Sync + 'static {
    /// Der Modus wurde beim Start einer neuen Session auf `mode` zurueckgesetzt
    fn mode_reset(&self, mode: Mode);
}

/// Notifier fuer Hosts ohne Bedienoberflaeche
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl OperatorNotifier for SilentNotifier {
    fn mode_reset(&self, mode: Mode) {
        tracing::debug!(mode = %mode, "Modus zurueckgesetzt (keine Oberflaeche)");
    }
}
