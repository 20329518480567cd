//! Halte-Timer fuer das verzoegerte Unducking
//!
//! Einmaliger, abbrechbarer Timer auf Basis von `tokio::time::sleep`. Der
//! Timer ruft `on_fire` mit seinem Token auf; der Callback stellt das
//! Ereignis in die Ereignisschleife. Erst wenn die Schleife das Ereignis
//! verarbeitet ([`DebounceTimer::complete`]), gilt der Timer als abgelaufen.
//! Ein Token das nicht mehr aktuell ist (abgebrochen, neu gestartet) wird
//! dort verworfen.

use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::trace;

struct PendingHold {
    token: u64,
    task: JoinHandle<()>,
}

/// Es ist hoechstens ein Timer gleichzeitig aktiv
#[derive(Default)]
pub struct DebounceTimer {
    pending: Option<PendingHold>,
    next_token: u64,
}

impl DebounceTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Startet den Timer und gibt sein Token zurueck.
    ///
    /// Ein noch laufender Timer wird vorher abgebrochen. Muss innerhalb einer
    /// tokio-Runtime aufgerufen werden.
    pub fn arm<F>(&mut self, duration: Duration, on_fire: F) -> u64
    where
        F: FnOnce(u64) + Send + 'static,
    {
        self.cancel();

        self.next_token += 1;
        let token = self.next_token;
        let task = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            on_fire(token);
        });
        trace!(token, dauer_ms = duration.as_millis() as u64, "Halte-Timer gestartet");

        self.pending = Some(PendingHold { token, task });
        token
    }

    /// Bricht den laufenden Timer ab. Gibt false zurueck wenn keiner lief.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(hold) => {
                hold.task.abort();
                trace!(token = hold.token, "Halte-Timer abgebrochen");
                true
            }
            None => false,
        }
    }

    /// Quittiert den Ablauf eines Timers.
    ///
    /// Gibt true zurueck wenn `token` der aktive Timer war; der Timer ist
    /// danach nicht mehr aktiv. Veraltete Token liefern false.
    pub fn complete(&mut self, token: u64) -> bool {
        match &self.pending {
            Some(hold) if hold.token == token => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_token(&self) -> Option<u64> {
        self.pending.as_ref().map(|h| h.token)
    }
}

impl Drop for DebounceTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn timer_feuert_nach_ablauf() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = DebounceTimer::new();
        let token = timer.arm(Duration::from_millis(2000), move |t| {
            let _ = tx.send(t);
        });

        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert!(rx.try_recv().is_err(), "Timer darf noch nicht gefeuert haben");

        assert_eq!(rx.recv().await, Some(token));
        assert!(timer.is_pending(), "Erst complete() beendet den Timer");
        assert!(timer.complete(token));
        assert!(!timer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn abgebrochener_timer_feuert_nicht() {
        let (tx, mut rx) = mpsc::unbounded_channel::<u64>();
        let mut timer = DebounceTimer::new();
        timer.arm(Duration::from_millis(500), move |t| {
            let _ = tx.send(t);
        });
        assert!(timer.cancel());
        assert!(!timer.cancel(), "Zweites cancel ist ein No-op");

        tokio::time::sleep(Duration::from_millis(1000)).await;
        // Sender wurde mit dem Task verworfen
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn veraltetes_token_wird_verworfen() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = DebounceTimer::new();
        let tx2 = tx.clone();
        let alt = timer.arm(Duration::from_millis(100), move |t| {
            let _ = tx.send(t);
        });
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(rx.recv().await, Some(alt));

        // Ereignis liegt schon in der Schleife, Timer wird trotzdem neu gestartet
        let neu = timer.arm(Duration::from_millis(100), move |t| {
            let _ = tx2.send(t);
        });
        assert_ne!(alt, neu);
        assert!(!timer.complete(alt));
        assert_eq!(timer.pending_token(), Some(neu));
    }

    #[tokio::test]
    async fn drop_bricht_timer_ab() {
        let (tx, mut rx) = mpsc::unbounded_channel::<u64>();
        {
            let mut timer = DebounceTimer::new();
            timer.arm(Duration::from_secs(60), move |t| {
                let _ = tx.send(t);
            });
        }
        assert!(rx.recv().await.is_none());
    }
}
