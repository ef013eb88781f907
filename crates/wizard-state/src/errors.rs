// Archivo: errors.rs
// Propósito: definir los errores del gestor de estado del asistente y el
// alias Result<T> usado por las APIs del crate.
use thiserror::Error;

/// Errores de los almacenes externos (sesión y estado).
///
/// - `Unavailable`: el almacén no responde (BD caída, pool agotado, etc.).
/// - `Serialization`: el valor guardado no se pudo (de)serializar.
/// - `Other`: cualquier otro error del almacén.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Almacén no disponible: {0}")]
    Unavailable(String),
    #[error("Error de serialización en almacén: {0}")]
    Serialization(String),
    #[error("Otro error de almacén: {0}")]
    Other(String),
}

/// Errores del asistente.
///
/// `StateNotFound` cubre tanto el registro inexistente como el id que no
/// coincide con el de la sesión: el llamador no puede distinguirlos.
#[derive(Error, Debug)]
pub enum WizardError {
    /// Estado inexistente, expirado o no vinculado a la sesión.
    #[error("Estado del asistente no encontrado")]
    StateNotFound,

    /// Falta un paso obligatorio al finalizar.
    #[error("Estado incompleto: falta el paso '{step}'")]
    IncompleteState { step: String },

    /// Fallo del almacén externo (no se reintenta).
    #[error("Error de almacén: {0}")]
    Store(#[from] StoreError),

    /// Fragmento guardado que no corresponde a su tipo.
    #[error("Error de serialización: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuración inválida en el entorno.
    #[error("Error de configuración: {0}")]
    Config(String),
}

/// Hacia dónde debe redirigir el handler ante un error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recovery {
    /// Volver al inicio del flujo (integridad del estado comprometida).
    RestartFlow,
    /// Volver al primer paso faltante.
    GoToStep(String),
    /// Página de error genérica.
    ServerError,
}

impl WizardError {
    /// Traduce el error a la acción de recuperación que ve el usuario.
    pub fn recovery(&self) -> Recovery {
        match self {
            WizardError::StateNotFound => Recovery::RestartFlow,
            WizardError::IncompleteState { step } => Recovery::GoToStep(step.clone()),
            WizardError::Store(_) | WizardError::Serialization(_) | WizardError::Config(_) => Recovery::ServerError,
        }
    }
}

/// Alias de resultado usado por las APIs del crate.
pub type Result<T> = std::result::Result<T, WizardError>;
