// Archivo: config.rs
// Propósito: configuración del motor del asistente, leída del entorno (con
// soporte de `.env` vía dotenvy).
use crate::domain::Locale;
use crate::errors::{Result, WizardError};
use chrono::Duration;

/// Variable con el TTL (segundos) de los estados abandonados.
pub const ENV_STATE_TTL: &str = "WIZARD_STATE_TTL_SECS";
/// Variable con el idioma por defecto (`en` / `fr`).
pub const ENV_DEFAULT_LOCALE: &str = "WIZARD_DEFAULT_LOCALE";

/// Configuración del `WizardEngine`.
///
/// `state_ttl` sólo se usa para construir almacenes con expiración; el motor
/// no expira estados por su cuenta.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardConfig {
    pub state_ttl: Option<Duration>,
    pub default_locale: Locale,
}

impl Default for WizardConfig {
    fn default() -> Self {
        WizardConfig { state_ttl: None, default_locale: Locale::En }
    }
}

impl WizardConfig {
    /// Carga `.env` (si existe) y lee la configuración del entorno.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Igual que `from_env` pero con una función de búsqueda arbitraria, para
    /// no depender del entorno global en pruebas.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = WizardConfig::default();
        if let Some(raw) = lookup(ENV_STATE_TTL) {
            let secs: i64 = raw.trim()
                               .parse()
                               .map_err(|_| WizardError::Config(format!("{} no es un entero: '{}'", ENV_STATE_TTL, raw)))?;
            if secs <= 0 {
                return Err(WizardError::Config(format!("{} debe ser positivo", ENV_STATE_TTL)));
            }
            cfg.state_ttl = Some(Duration::seconds(secs));
        }
        if let Some(raw) = lookup(ENV_DEFAULT_LOCALE) {
            cfg.default_locale =
                Locale::parse(&raw).ok_or_else(|| WizardError::Config(format!("{} inválido: '{}'", ENV_DEFAULT_LOCALE, raw)))?;
        }
        Ok(cfg)
    }
}
