//! Structured Logging Setup via tracing-subscriber
//!
//! Konfigurierbar per Umgebungsvariable:
//! - `AUTODUCK_LOG_LEVEL`: Log-Level oder Filter-Direktiven, Standard: info
//! - `AUTODUCK_LOG_FORMAT`: Format (text/json), Standard: text

use tracing_subscriber::{EnvFilter, fmt};

const LEVEL_ENV: &str = "AUTODUCK_LOG_LEVEL";
const FORMAT_ENV: &str = "AUTODUCK_LOG_FORMAT";

/// Initialisiert das Logging-System.
///
/// Umgebungsvariablen haben Vorrang vor `level` / `format` aus der
/// Konfiguration. Gibt false zurueck wenn bereits ein Subscriber
/// installiert war.
pub fn init_logging(level: &str, format: &str) -> bool {
    let filter = EnvFilter::try_from_env(LEVEL_ENV)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let format = std::env::var(FORMAT_ENV).unwrap_or_else(|_| format.to_string());

    let ergebnis = match format.as_str() {
        "json" => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_current_span(true)
            .try_init(),
        _ => fmt().with_env_filter(filter).with_target(true).try_init(),
    };
    if ergebnis.is_ok() {
        tracing::debug!(format = %format, "Logging initialisiert");
    }
    ergebnis.is_ok()
}

/// Gibt den konfigurierten Log-Level aus der Umgebung zurueck.
/// Fallback: "info"
pub fn log_level_from_env() -> String {
    std::env::var(LEVEL_ENV).unwrap_or_else(|_| "info".to_string())
}

/// Gibt das konfigurierte Log-Format aus der Umgebung zurueck.
/// Fallback: "text"
pub fn log_format_from_env() -> String {
    std::env::var(FORMAT_ENV).unwrap_or_else(|_| "text".to_string())
}

pub fn log_level_valid(level: &str) -> bool {
    matches!(level, "trace" | "debug" | "info" | "warn" | "error")
}

pub fn log_format_valid(format: &str) -> bool {
    matches!(format, "text" | "json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_werte() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            assert!(log_level_valid(level));
        }
        assert!(!log_level_valid("verbose"));
        assert!(!log_level_valid("INFO")); // Gross-/Kleinschreibung
    }

    #[test]
    fn log_format_werte() {
        assert!(log_format_valid("text"));
        assert!(log_format_valid("json"));
        assert!(!log_format_valid("xml"));
    }

    #[test]
    fn env_fallback_und_override() {
        // Ein Test fuer beide Variablen, damit parallele Tests sich nicht stoeren
        std::env::remove_var(LEVEL_ENV);
        std::env::remove_var(FORMAT_ENV);
        assert_eq!(log_level_from_env(), "info");
        assert_eq!(log_format_from_env(), "text");

        std::env::set_var(LEVEL_ENV, "debug");
        std::env::set_var(FORMAT_ENV, "json");
        assert_eq!(log_level_from_env(), "debug");
        assert_eq!(log_format_from_env(), "json");
        std::env::remove_var(LEVEL_ENV);
        std::env::remove_var(FORMAT_ENV);
    }

    #[test]
    fn zweite_initialisierung_wird_abgelehnt() {
        let erste = init_logging("warn", "text");
        assert!(!init_logging("debug", "json"));
        // Die erste kann fehlschlagen falls ein anderer Test schon initialisiert hat
        let _ = erste;
    }
}
