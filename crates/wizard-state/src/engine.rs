// Archivo: engine.rs
// Propósito: implementar `WizardEngine`, el punto de entrada que usan los
// handlers de cada paso: iniciar flujo, cargar estado, validar+fusionar+
// persistir un paso, finalizar y limpiar.
//
// El motor no guarda estado propio entre peticiones: todo vive en el
// `StateStore` inyectado y en la sesión que recibe cada llamada.
use crate::config::WizardConfig;
use crate::domain::{Locale, StatePatch, StepData, WizardState, WizardStateId};
use crate::errors::{Result, WizardError};
use crate::finalize::Finalizer;
use crate::merge::merge_state;
use crate::repository::{SessionStore, StateStore};
use crate::session::SessionBinding;
use crate::validation::{FieldErrors, FormData, ValidationResult, Validator};
use chrono::Utc;
use log::{debug, info, warn};
use std::sync::Arc;

/// Resultado de enviar el formulario de un paso.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome<T> {
    /// Datos válidos, fusionados y persistidos.
    Saved { data: T, state: WizardState },
    /// Errores de campo para volver a pintar el formulario; el estado no
    /// cambió.
    Invalid { errors: FieldErrors, state: WizardState },
}

impl<T> StepOutcome<T> {
    pub fn state(&self) -> &WizardState {
        match self {
            StepOutcome::Saved { state, .. } | StepOutcome::Invalid { state, .. } => state,
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, StepOutcome::Saved { .. })
    }
}

/// Motor del asistente.
pub struct WizardEngine<S>
    where S: StateStore
{
    store: Arc<S>,
    config: WizardConfig,
}

impl<S> WizardEngine<S> where S: StateStore
{
    /// Crea el motor con el almacén inyectado.
    pub fn new(store: Arc<S>, config: WizardConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Inicia una instancia del flujo `flow`: genera id, guarda el estado
    /// vacío y vincula la sesión. Un vínculo previo del mismo flujo se
    /// reemplaza y su estado se descarta.
    pub fn start_flow(&self, session: &dyn SessionStore, flow: &str, locale: Option<Locale>) -> Result<WizardState> {
        if let Some(prev) = SessionBinding::read(session, flow)? {
            debug!("descartando estado previo {} del flujo '{}'", prev.state_id, flow);
            self.store.delete(&prev.state_id)?;
        }
        let state = WizardState::new(WizardStateId::new(), flow, locale.unwrap_or(self.config.default_locale));
        self.persist(&state)?;
        SessionBinding::new(flow, state.id).write(session)?;
        info!("flujo '{}' iniciado con estado {}", flow, state.id);
        Ok(state)
    }

    /// Carga el estado `requested_id` (segmento de URL) del flujo `flow`.
    ///
    /// Sólo tiene éxito si el id coincide con el vinculado a la sesión y el
    /// registro existe. Cualquier otro caso devuelve `StateNotFound`; el
    /// motivo concreto sólo queda en el log de auditoría.
    pub fn load_state(&self, session: &dyn SessionStore, flow: &str, requested_id: &str) -> Result<WizardState> {
        let Some(binding) = SessionBinding::read(session, flow)? else {
            warn!("auditoría: flujo '{}' sin estado vinculado a la sesión", flow);
            return Err(WizardError::StateNotFound);
        };
        match WizardStateId::parse(requested_id) {
            Some(id) if id == binding.state_id => {}
            _ => {
                warn!("auditoría: id '{}' no coincide con el vinculado a la sesión (flujo '{}')",
                      requested_id, flow);
                return Err(WizardError::StateNotFound);
            }
        }
        let Some(raw) = self.store.get(&binding.state_id)? else {
            warn!("auditoría: estado {} inexistente o expirado (flujo '{}')", binding.state_id, flow);
            return Err(WizardError::StateNotFound);
        };
        let state: WizardState = serde_json::from_str(&raw)?;
        if state.flow != flow {
            warn!("auditoría: estado {} pertenece al flujo '{}', no a '{}'", state.id, state.flow, flow);
            return Err(WizardError::StateNotFound);
        }
        Ok(state)
    }

    /// Carga, fusiona `patch` y persiste. Devuelve el estado nuevo.
    pub fn save_state(&self,
                      session: &dyn SessionStore,
                      flow: &str,
                      requested_id: &str,
                      patch: &StatePatch)
                      -> Result<WizardState> {
        let current = self.load_state(session, flow, requested_id)?;
        let mut next = merge_state(&current, patch);
        next.updated_at = Utc::now();
        self.persist(&next)?;
        debug!("estado {} actualizado ({:?})", next.id, patch.keys().collect::<Vec<_>>());
        Ok(next)
    }

    /// Handler genérico de un paso: carga, valida con el idioma del estado,
    /// fusiona el fragmento y persiste.
    pub fn submit_step<T, V>(&self,
                             session: &dyn SessionStore,
                             flow: &str,
                             requested_id: &str,
                             validator: &V,
                             raw: &FormData)
                             -> Result<StepOutcome<T>>
        where T: StepData,
              V: Validator<T> + ?Sized
    {
        self.submit_step_with(session, flow, requested_id, validator, raw, |_, _, patch| patch)
    }

    /// Como `submit_step`, pero `amend` puede ampliar el parche a partir del
    /// dato validado y del estado actual (por ejemplo, borrar un paso que
    /// deja de aplicar).
    pub fn submit_step_with<T, V, F>(&self,
                                     session: &dyn SessionStore,
                                     flow: &str,
                                     requested_id: &str,
                                     validator: &V,
                                     raw: &FormData,
                                     amend: F)
                                     -> Result<StepOutcome<T>>
        where T: StepData,
              V: Validator<T> + ?Sized,
              F: FnOnce(&T, &WizardState, StatePatch) -> StatePatch
    {
        let current = self.load_state(session, flow, requested_id)?;
        let data = match validator.validate(raw, current.locale) {
            ValidationResult::Valid(data) => data,
            ValidationResult::Invalid(errors) => {
                debug!("paso '{}' con {} errores de campo", T::STEP, errors.len());
                return Ok(StepOutcome::Invalid { errors, state: current });
            }
        };
        let patch = amend(&data, &current, StatePatch::step(&data)?.at_step(T::STEP));
        let mut next = merge_state(&current, &patch);
        next.updated_at = Utc::now();
        self.persist(&next)?;
        debug!("paso '{}' guardado en estado {}", T::STEP, next.id);
        Ok(StepOutcome::Saved { data, state: next })
    }

    /// Finaliza el flujo: carga el estado, produce los DTOs y, sólo si todo
    /// fue bien, borra el estado y el vínculo de sesión.
    pub fn complete<F>(&self,
                       session: &dyn SessionStore,
                       flow: &str,
                       requested_id: &str,
                       finalizer: &F)
                       -> Result<Vec<F::Dto>>
        where F: Finalizer + ?Sized
    {
        let state = self.load_state(session, flow, requested_id)?;
        let dtos = match finalizer.finalize(&state) {
            Ok(dtos) => dtos,
            Err(e) => {
                warn!("auditoría: no se pudo finalizar {} ({})", state.id, e);
                return Err(e);
            }
        };
        self.clear_state(session, flow, &state.id)?;
        info!("flujo '{}' finalizado: estado {} con {} envíos", flow, state.id, dtos.len());
        Ok(dtos)
    }

    /// Borra el registro y el vínculo de sesión. Una carga posterior con el
    /// mismo id falla con `StateNotFound`.
    pub fn clear_state(&self, session: &dyn SessionStore, flow: &str, id: &WizardStateId) -> Result<()> {
        self.store.delete(id)?;
        if let Some(binding) = SessionBinding::read(session, flow)? {
            if binding.state_id == *id {
                SessionBinding::remove(session, flow)?;
            }
        }
        debug!("estado {} eliminado", id);
        Ok(())
    }

    /// Abandono explícito: descarta el estado vinculado (si lo hay).
    pub fn abandon(&self, session: &dyn SessionStore, flow: &str) -> Result<()> {
        if let Some(binding) = SessionBinding::read(session, flow)? {
            self.clear_state(session, flow, &binding.state_id)?;
            info!("flujo '{}' abandonado (estado {})", flow, binding.state_id);
        }
        Ok(())
    }

    fn persist(&self, state: &WizardState) -> Result<()> {
        let raw = serde_json::to_string(state)?;
        self.store.set(&state.id, &raw)?;
        Ok(())
    }
}
