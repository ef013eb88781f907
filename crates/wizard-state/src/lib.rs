//! Crate `wizard-state`: estado de asistentes de varios pasos
//!
//! Define los tipos del estado acumulado (`WizardState`, `StatePatch`), los
//! contratos de los almacenes externos (`SessionStore`, `StateStore`), el
//! contrato de validación por paso (`Validator<T>`) y el motor
//! `WizardEngine` que encadena carga → validación → fusión → persistencia y
//! la finalización del flujo.
//!
//! Diseño resumido:
//! - El estado vive en el servidor, indexado por un id opaco que viaja en
//!   la URL y se contrasta con el vinculado a la sesión.
//! - Id ausente, distinto o expirado son el mismo error (`StateNotFound`).
//! - La fusión es pura: devuelve un estado nuevo y no toca el original.
//!
//! Ejemplo rápido:
//! ```rust
//! use std::sync::Arc;
//! use wizard_state::stubs::{InMemorySession, InMemoryStateStore};
//! use wizard_state::{WizardConfig, WizardEngine};
//! let engine = WizardEngine::new(Arc::new(InMemoryStateStore::new()), WizardConfig::default());
//! let session = InMemorySession::new();
//! let state = engine.start_flow(&session, "apply", None).unwrap();
//! let loaded = engine.load_state(&session, "apply", &state.id.to_string()).unwrap();
//! assert_eq!(loaded.id, state.id);
//! ```
pub mod config;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod finalize;
pub mod merge;
pub mod messages;
pub mod repository;
pub mod session;
pub mod stubs;
pub mod validation;

pub use config::WizardConfig;
pub use domain::*;
pub use engine::*;
pub use errors::*;
pub use finalize::*;
pub use merge::merge_state;
pub use messages::MessageCode;
pub use repository::*;
pub use session::*;
pub use validation::*;
