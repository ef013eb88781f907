// Configuración del almacén SQL leída del entorno.
use crate::errors::{PersistenceError, Result};

/// URL de la base de datos. Si falta se usa `DATABASE_URL`.
pub const ENV_DB_URL: &str = "WIZARD_DB_URL";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
/// Tamaño máximo del pool de conexiones.
pub const ENV_POOL_SIZE: &str = "WIZARD_DB_POOL_SIZE";

pub const DEFAULT_POOL_SIZE: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceConfig {
  pub database_url: String,
  pub pool_size: u32,
}

impl PersistenceConfig {
  pub fn new(database_url: impl Into<String>) -> Self {
    Self { database_url: database_url.into(), pool_size: DEFAULT_POOL_SIZE }
  }

  /// Carga `.env` (si existe) y lee `WIZARD_DB_URL` / `DATABASE_URL`.
  pub fn from_env() -> Result<Self> {
    dotenvy::dotenv().ok();
    Self::from_lookup(|k| std::env::var(k).ok())
  }

  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let url = lookup(ENV_DB_URL).or_else(|| lookup(ENV_DATABASE_URL))
                                .filter(|u| !u.trim().is_empty())
                                .ok_or_else(|| {
                                  PersistenceError::Config(format!("{} / {} no definida", ENV_DB_URL, ENV_DATABASE_URL))
                                })?;
    let l = url.to_lowercase();
    if l.starts_with("postgres") || l.starts_with("mysql") {
      return Err(PersistenceError::Config(format!("{} debe apuntar a SQLite, no a '{}'", ENV_DB_URL, url)));
    }
    let pool_size = match lookup(ENV_POOL_SIZE) {
      None => DEFAULT_POOL_SIZE,
      Some(raw) => match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => n,
        _ => return Err(PersistenceError::Config(format!("{} inválido: '{}'", ENV_POOL_SIZE, raw))),
      },
    };
    Ok(Self { database_url: url, pool_size })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn lookup(pairs: &[(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
    let env: HashMap<&str, &str> = pairs.iter().copied().collect();
    move |k| env.get(k).map(|v| v.to_string())
  }

  #[test]
  fn prefers_wizard_url_over_database_url() {
    let cfg = PersistenceConfig::from_lookup(lookup(&[(ENV_DB_URL, "wizard.db"), (ENV_DATABASE_URL, "other.db")])).unwrap();
    assert_eq!(cfg.database_url, "wizard.db");
    assert_eq!(cfg.pool_size, DEFAULT_POOL_SIZE);
    let cfg = PersistenceConfig::from_lookup(lookup(&[(ENV_DATABASE_URL, "other.db"), (ENV_POOL_SIZE, "8")])).unwrap();
    assert_eq!(cfg.database_url, "other.db");
    assert_eq!(cfg.pool_size, 8);
  }

  #[test]
  fn rejects_missing_or_foreign_urls() {
    assert!(PersistenceConfig::from_lookup(lookup(&[])).is_err());
    assert!(PersistenceConfig::from_lookup(lookup(&[(ENV_DB_URL, "postgres://u@h/db")])).is_err());
    assert!(PersistenceConfig::from_lookup(lookup(&[(ENV_DB_URL, "a.db"), (ENV_POOL_SIZE, "0")])).is_err());
  }
}
