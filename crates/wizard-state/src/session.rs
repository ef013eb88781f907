// Archivo: session.rs
// Propósito: vínculo entre la sesión del navegador y el id del estado activo
// de cada tipo de flujo (como mucho uno por flujo).
use crate::domain::WizardStateId;
use crate::repository::{SessionStore, StoreResult};
use log::warn;

/// Clave de sesión bajo la que se guarda el id del flujo `flow`.
pub fn binding_key(flow: &str) -> String {
    format!("{}-state-id", flow)
}

/// Asociación sesión -> id de estado para un tipo de flujo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionBinding {
    pub flow: String,
    pub state_id: WizardStateId,
}

impl SessionBinding {
    pub fn new(flow: &str, state_id: WizardStateId) -> Self {
        Self { flow: flow.to_string(), state_id }
    }

    /// Lee el vínculo actual. Un valor corrupto en la sesión se ignora
    /// (equivale a no tener vínculo).
    pub fn read(session: &dyn SessionStore, flow: &str) -> StoreResult<Option<Self>> {
        let Some(raw) = session.get(&binding_key(flow))? else {
            return Ok(None);
        };
        match WizardStateId::parse(&raw) {
            Some(state_id) => Ok(Some(Self::new(flow, state_id))),
            None => {
                warn!("vínculo de sesión ilegible para el flujo '{}'", flow);
                Ok(None)
            }
        }
    }

    /// Escribe el vínculo, reemplazando cualquier vínculo previo del mismo
    /// flujo.
    pub fn write(&self, session: &dyn SessionStore) -> StoreResult<()> {
        session.set(&binding_key(&self.flow), &self.state_id.to_string())
    }

    pub fn remove(session: &dyn SessionStore, flow: &str) -> StoreResult<()> {
        session.delete(&binding_key(flow))
    }
}
