//! Gleitende Pegelfenster pro ueberwachtem Connector
//!
//! Jedes Fenster haelt genau N Messwerte (mit 0 initialisiert). Ein neuer
//! Wert verdraengt den aeltesten, die Laenge bleibt immer N.

use autoduck_core::{Connector, LevelBatch};
use std::collections::{BTreeMap, VecDeque};

/// Fenster fester Laenge fuer einen einzelnen Connector
#[derive(Debug, Clone)]
pub struct SampleWindow {
    samples: VecDeque<i32>,
}

impl SampleWindow {
    /// Erstellt ein mit Nullen gefuelltes Fenster. Ein Fenster der Laenge 0
    /// nimmt keine Werte auf und bleibt leer.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: std::iter::repeat(0).take(capacity).collect(),
        }
    }

    /// Haengt einen Wert an und verwirft den aeltesten
    pub fn push(&mut self, value: i32) {
        if self.samples.pop_front().is_none() {
            return;
        }
        self.samples.push_back(value);
    }

    /// Juengster Messwert
    pub fn last(&self) -> i32 {
        self.samples.back().copied().unwrap_or(0)
    }

    /// Arithmetisches Mittel des Fensters
    pub fn average(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let summe: i64 = self.samples.iter().map(|&s| i64::from(s)).sum();
        summe as f64 / self.samples.len() as f64
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &i32> {
        self.samples.iter()
    }

    /// Setzt alle Werte auf 0 zurueck
    pub fn reset(&mut self) {
        self.samples.iter_mut().for_each(|s| *s = 0);
    }
}

/// Alle Fenster der ueberwachten Connectoren
///
/// Schluessel ist der vollstaendige Connector (Typ, Id, SubId); doppelte
/// Eintraege in der Konfiguration ergeben ein einziges Fenster.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    windows: BTreeMap<Connector, SampleWindow>,
    capacity: usize,
}

impl SampleBuffer {
    pub fn new<I>(sources: I, capacity: usize) -> Self
    where
        I: IntoIterator<Item = Connector>,
    {
        let windows = sources
            .into_iter()
            .map(|c| (c, SampleWindow::new(capacity)))
            .collect();
        Self { windows, capacity }
    }

    /// Haengt einen Wert an das Fenster eines Connectors an.
    /// Gibt false zurueck wenn der Connector nicht ueberwacht wird.
    pub fn push(&mut self, key: &Connector, value: i32) -> bool {
        match self.windows.get_mut(key) {
            Some(window) => {
                window.push(value);
                true
            }
            None => false,
        }
    }

    /// Ein Aktualisierungszyklus ueber alle Fenster.
    ///
    /// Quellen ohne neuen Wert im Batch wiederholen ihren letzten Messwert.
    pub fn ingest(&mut self, batch: &LevelBatch) {
        for (connector, window) in self.windows.iter_mut() {
            let wert = batch.get(connector).copied().unwrap_or_else(|| window.last());
            window.push(wert);
        }
    }

    /// Mittelwert eines Connectors, `None` wenn nicht ueberwacht
    pub fn average(&self, key: &Connector) -> Option<f64> {
        self.windows.get(key).map(SampleWindow::average)
    }

    /// Mittelwerte aller Fenster
    pub fn averages(&self) -> impl Iterator<Item = (Connector, f64)> + '_ {
        self.windows.iter().map(|(c, w)| (*c, w.average()))
    }

    pub fn window(&self, key: &Connector) -> Option<&SampleWindow> {
        self.windows.get(key)
    }

    pub fn sources(&self) -> impl Iterator<Item = &Connector> {
        self.windows.keys()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn reset(&mut self) {
        self.windows.values_mut().for_each(SampleWindow::reset);
    }
}
