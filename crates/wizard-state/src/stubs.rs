// Archivo: stubs.rs
// Propósito: implementaciones en memoria para pruebas y wiring rápido.
//
// Incluye una sesión de navegador en memoria (`InMemorySession`), un almacén
// de estados concurrente con TTL opcional (`InMemoryStateStore`) y un
// almacén que siempre falla (`UnavailableStateStore`) para ejercitar la ruta
// de error de infraestructura. Nada de esto es durable.
use crate::domain::WizardStateId;
use crate::errors::StoreError;
use crate::repository::{SessionStore, StateStore, StoreResult};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Sesión de un único navegador.
#[derive(Debug, Default)]
pub struct InMemorySession {
    values: Mutex<HashMap<String, String>>,
}

impl InMemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, HashMap<String, String>>> {
        self.values
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("mutex poisoned: {:?}", e)))
    }

    /// Número de claves guardadas (útil en pruebas).
    pub fn len(&self) -> usize {
        self.values.lock().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for InMemorySession {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct StoredState {
    payload: String,
    stored_at: DateTime<Utc>,
}

/// Almacén de estados en memoria, seguro entre hilos.
///
/// Con `ttl` configurado, un registro cuya última escritura sea más antigua
/// que el TTL se trata como inexistente y se borra al leerlo.
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    records: DashMap<WizardStateId, StoredState>,
    ttl: Option<Duration>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self { records: DashMap::new(), ttl: Some(ttl) }
    }

    fn is_expired(&self, record: &StoredState) -> bool {
        match self.ttl {
            Some(ttl) => Utc::now() - record.stored_at >= ttl,
            None => false,
        }
    }

    /// Número de registros, incluidos los expirados aún no purgados.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl StateStore for InMemoryStateStore {
    fn get(&self, id: &WizardStateId) -> StoreResult<Option<String>> {
        match self.records.get(id) {
            None => return Ok(None),
            Some(r) if !self.is_expired(&r) => return Ok(Some(r.payload.clone())),
            Some(_) => {}
        }
        self.records.remove_if(id, |_, r| self.is_expired(r));
        Ok(None)
    }

    fn set(&self, id: &WizardStateId, serialized: &str) -> StoreResult<()> {
        self.records.insert(*id, StoredState { payload: serialized.to_string(), stored_at: Utc::now() });
        Ok(())
    }

    fn delete(&self, id: &WizardStateId) -> StoreResult<()> {
        self.records.remove(id);
        Ok(())
    }

    fn purge_expired(&self) -> StoreResult<usize> {
        let before = self.records.len();
        self.records.retain(|_, r| !self.is_expired(r));
        Ok(before.saturating_sub(self.records.len()))
    }
}

/// Almacén caído: todas las operaciones fallan con `Unavailable`.
#[derive(Debug, Default)]
pub struct UnavailableStateStore;

impl StateStore for UnavailableStateStore {
    fn get(&self, _id: &WizardStateId) -> StoreResult<Option<String>> {
        Err(StoreError::Unavailable("state store offline".into()))
    }

    fn set(&self, _id: &WizardStateId, _serialized: &str) -> StoreResult<()> {
        Err(StoreError::Unavailable("state store offline".into()))
    }

    fn delete(&self, _id: &WizardStateId) -> StoreResult<()> {
        Err(StoreError::Unavailable("state store offline".into()))
    }
}
