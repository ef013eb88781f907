// Archivo: repository.rs
// Propósito: contratos de los almacenes externos que usa el asistente:
// la sesión del navegador (`SessionStore`) y el almacén de estados del lado
// del servidor (`StateStore`). Las implementaciones concretas viven en
// `stubs.rs` (memoria) y en `wizard-persistence` (SQL).
use crate::domain::WizardStateId;
use crate::errors::StoreError;

/// Resultado de las operaciones de almacén.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Sesión de un navegador: pares clave/valor de texto.
///
/// La instancia ya está acotada a una sesión; el asistente sólo guarda en
/// ella el id del estado vinculado a cada tipo de flujo.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Borrar una clave inexistente no es un error.
    fn delete(&self, key: &str) -> StoreResult<()>;
}

/// Almacén de estados serializados (JSON) indexado por `WizardStateId`.
///
/// La expiración de estados abandonados es política del almacén: un
/// registro expirado debe comportarse como inexistente en `get`.
pub trait StateStore: Send + Sync {
    fn get(&self, id: &WizardStateId) -> StoreResult<Option<String>>;

    /// Inserta o reemplaza el registro (última escritura gana).
    fn set(&self, id: &WizardStateId, serialized: &str) -> StoreResult<()>;

    /// Borrar un registro inexistente no es un error.
    fn delete(&self, id: &WizardStateId) -> StoreResult<()>;

    /// Elimina los registros expirados y devuelve cuántos borró. Los
    /// almacenes sin TTL no tienen nada que purgar.
    fn purge_expired(&self) -> StoreResult<usize> {
        Ok(0)
    }
}
