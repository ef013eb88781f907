use thiserror::Error;
use wizard_state::StoreError;

/// Errores al construir el almacén (configuración, pool, migraciones).
///
/// Los errores de las operaciones del almacén ya construido son
/// `StoreError`, el contrato de `StateStore`.
#[derive(Error, Debug)]
pub enum PersistenceError {
  #[error("Configuración de persistencia inválida: {0}")]
  Config(String),
  #[error("No se pudo crear el pool de conexiones: {0}")]
  Pool(#[from] r2d2::Error),
  #[error("Error de migraciones: {0}")]
  Migration(String),
  #[error(transparent)]
  Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, PersistenceError>;
