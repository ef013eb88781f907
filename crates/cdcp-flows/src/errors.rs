use thiserror::Error;
use wizard_state::WizardError;

// Errores de la capa de flujos.
//
// Los errores de integridad del estado (`StateNotFound`, `IncompleteState`)
// no llegan aquí: los handlers los convierten en redirecciones. Sólo
// escapan los fallos de infraestructura y las rutas inexistentes.
#[derive(Error, Debug)]
pub enum FlowsError {
  /// Errores originados en el motor o en los almacenes.
  #[error("Error del asistente: {0}")]
  Wizard(#[from] WizardError),

  /// Paso que no existe en el flujo (URL manipulada o enlace roto).
  #[error("Paso desconocido '{step}' en el flujo '{flow}'")]
  UnknownStep { flow: String, step: String },

  /// Tipo de flujo desconocido.
  #[error("Flujo desconocido: {0}")]
  UnknownFlow(String),
}

pub type Result<T> = std::result::Result<T, FlowsError>;
