//! Gemeinsame Identifikationstypen fuer autoduck
//!
//! Ein `Connector` adressiert einen Audio-Eingang des Geraets. Derselbe Typ
//! dient als Schluessel fuer Pegelmessungen und als Ziel fuer Gain-Aenderungen.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::DuckingError;

/// Art des Audio-Eingangs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConnectorType {
    /// Analoger Mikrofon-Eingang
    Microphone,
    /// Netzwerk-Mikrofon (Mehrkanal, adressiert ueber SubId)
    Ethernet,
    #[serde(rename = "USBMicrophone")]
    UsbMicrophone,
    #[serde(rename = "USBInterface")]
    UsbInterface,
}

impl ConnectorType {
    /// Name wie ihn das Geraet in Ereignissen und Konfigurationspfaden verwendet
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Microphone => "Microphone",
            Self::Ethernet => "Ethernet",
            Self::UsbMicrophone => "USBMicrophone",
            Self::UsbInterface => "USBInterface",
        }
    }
}

impl std::fmt::Display for ConnectorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConnectorType {
    type Err = DuckingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Microphone" => Ok(Self::Microphone),
            "Ethernet" => Ok(Self::Ethernet),
            "USBMicrophone" => Ok(Self::UsbMicrophone),
            "USBInterface" => Ok(Self::UsbInterface),
            other => Err(DuckingError::UnsupportedConnector(other.to_string())),
        }
    }
}

/// Audio-Eingang: Typ, Nummer und optionaler Unterkanal
///
/// Gleichheit ist strukturell. `Ethernet.1` und `Ethernet.1.1` sind
/// verschiedene Connectoren, teilen sich aber eine VU-Meter-Messung
/// (siehe [`Connector::physical`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Connector {
    #[serde(rename = "type")]
    pub connector_type: ConnectorType,
    pub id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_id: Option<u32>,
}

impl Connector {
    pub fn new(connector_type: ConnectorType, id: u32) -> Self {
        Self {
            connector_type,
            id,
            sub_id: None,
        }
    }

    pub fn with_sub_id(connector_type: ConnectorType, id: u32, sub_id: u32) -> Self {
        Self {
            connector_type,
            id,
            sub_id: Some(sub_id),
        }
    }

    /// Der physische Anschluss ohne Unterkanal
    pub fn physical(&self) -> Self {
        Self::new(self.connector_type, self.id)
    }
}

impl std::fmt::Display for Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.sub_id {
            Some(sub) => write!(f, "{}.{}.{}", self.connector_type, self.id, sub),
            None => write!(f, "{}.{}", self.connector_type, self.id),
        }
    }
}

impl FromStr for Connector {
    type Err = DuckingError;

    /// Parst die Textform `Typ.id[.subId]`, z.B. `Ethernet.2.1`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut teile = s.split('.');
        let typ: ConnectorType = teile
            .next()
            .ok_or_else(|| DuckingError::Konfiguration(format!("Leerer Connector: '{s}'")))?
            .parse()?;
        let id = teile
            .next()
            .and_then(|t| t.parse::<u32>().ok())
            .ok_or_else(|| DuckingError::Konfiguration(format!("Connector ohne Id: '{s}'")))?;
        let sub_id = match teile.next() {
            Some(t) => Some(t.parse::<u32>().map_err(|_| {
                DuckingError::Konfiguration(format!("Ungueltige SubId in '{s}'"))
            })?),
            None => None,
        };
        if teile.next().is_some() {
            return Err(DuckingError::Konfiguration(format!(
                "Zu viele Segmente in '{s}'"
            )));
        }
        Ok(Self {
            connector_type: typ,
            id,
            sub_id,
        })
    }
}

/// Ein Messzyklus: Pegel pro Connector
pub type LevelBatch = BTreeMap<Connector, i32>;

/// Betriebsmodus der Bedienoberflaeche
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    /// Publikumsmikrofone dauerhaft abgesenkt
    #[default]
    PresentersOnly,
    /// Alle Mikrofone offen, keine Ueberwachung
    PresentersAndAudience,
    /// Automatisches Ducking anhand der Presenter-Pegel
    AutoDuck,
}

impl Mode {
    pub const ALLE: [Mode; 3] = [Mode::PresentersOnly, Mode::PresentersAndAudience, Mode::AutoDuck];
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::PresentersOnly => "presentersOnly",
            Self::PresentersAndAudience => "presentersAndAudience",
            Self::AutoDuck => "autoDuck",
        };
        f.write_str(name)
    }
}
