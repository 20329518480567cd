//! Dekodierung roher VU-Meter-Ereignisse
//!
//! Das Geraet liefert verschachtelte Ereignisse der Form
//!
//! ```json
//! {
//!   "Microphone": [{ "id": "1", "VuMeter": "23" }],
//!   "Ethernet":   [{ "id": "1", "SubId": [{ "id": "2", "VuMeter": "20" }] }]
//! }
//! ```
//!
//! Daraus wird ein flacher [`LevelBatch`] (`Microphone.1 -> 23`,
//! `Ethernet.1.2 -> 20`). Unbekannte Typen und unlesbare Werte werden
//! uebersprungen.

use autoduck_core::{Connector, ConnectorType, LevelBatch};
use serde_json::Value;
use tracing::trace;

const VU_METER: &str = "VuMeter";
const SUB_ID: &str = "SubId";

/// Flacht ein rohes Ereignis zu einem Messzyklus ab
pub fn decode(raw: &Value) -> LevelBatch {
    let mut batch = LevelBatch::new();
    let Some(typen) = raw.as_object() else {
        trace!("VU-Meter-Ereignis ist kein Objekt, ignoriert");
        return batch;
    };

    for (typ_name, eintraege) in typen {
        let typ = match typ_name.parse::<ConnectorType>() {
            Ok(typ) => typ,
            Err(_) => {
                trace!(typ = %typ_name, "Unbekannter Connector-Typ im VU-Meter-Ereignis");
                continue;
            }
        };

        for eintrag in entries(eintraege) {
            let Some(id) = eintrag.get("id").and_then(parse_int) else {
                continue;
            };
            let Ok(id) = u32::try_from(id) else {
                continue;
            };

            if let Some(level) = eintrag.get(VU_METER).and_then(parse_int) {
                batch.insert(Connector::new(typ, id), level);
            }

            if let Some(subs) = eintrag.get(SUB_ID) {
                for sub in entries(subs) {
                    let sub_id = sub
                        .get("id")
                        .and_then(parse_int)
                        .and_then(|s| u32::try_from(s).ok());
                    let level = sub.get(VU_METER).and_then(parse_int);
                    if let (Some(sub_id), Some(level)) = (sub_id, level) {
                        batch.insert(Connector::with_sub_id(typ, id, sub_id), level);
                    }
                }
            }
        }
    }

    batch
}

/// Einzelnes Objekt oder Liste von Objekten
fn entries(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(liste) => liste.iter().filter(|v| v.is_object()).collect(),
        Value::Object(_) => vec![value],
        _ => Vec::new(),
    }
}

/// Zahl oder Zahl-als-Text; Nachkommastellen werden abgeschnitten
fn parse_int(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .and_then(|v| i32::try_from(v).ok()),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i32>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i32))
        }
        _ => None,
    }
}
