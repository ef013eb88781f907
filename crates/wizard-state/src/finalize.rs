// Archivo: finalize.rs
// Propósito: contrato del finalizador (estado completo -> DTOs de envío) y
// verificación de pasos obligatorios.
use crate::domain::{StepData, WizardState};
use crate::errors::{Result, WizardError};

/// Paso que debe estar presente en el estado para poder finalizar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredStep {
    pub step: &'static str,
    pub key: &'static str,
}

impl RequiredStep {
    pub fn of<T: StepData>() -> Self {
        Self { step: T::STEP, key: T::KEY }
    }
}

/// Pasos de `required` (en su orden) que faltan en `state`.
pub fn missing_steps(state: &WizardState, required: &[RequiredStep]) -> Vec<&'static str> {
    required.iter().filter(|r| !state.contains_key(r.key)).map(|r| r.step).collect()
}

/// Falla con `IncompleteState` nombrando el primer paso faltante.
pub fn ensure_complete(state: &WizardState, required: &[RequiredStep]) -> Result<()> {
    match missing_steps(state, required).first() {
        Some(step) => Err(WizardError::IncompleteState { step: step.to_string() }),
        None => Ok(()),
    }
}

/// Convierte un estado completo en uno o más DTOs de envío.
///
/// `finalize` es puro: no toca almacenes. Borrar el estado tras un envío
/// correcto es responsabilidad de `WizardEngine::complete`.
pub trait Finalizer: Send + Sync {
    type Dto;

    /// Pasos obligatorios para este estado, en orden de flujo. Puede
    /// depender del propio estado (pasos condicionales).
    fn required_steps(&self, state: &WizardState) -> Vec<RequiredStep>;

    /// Construye los DTOs asumiendo que los pasos obligatorios existen.
    fn build(&self, state: &WizardState) -> Result<Vec<Self::Dto>>;

    fn finalize(&self, state: &WizardState) -> Result<Vec<Self::Dto>> {
        ensure_complete(state, &self.required_steps(state))?;
        self.build(state)
    }
}
