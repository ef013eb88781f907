//! cdcp-flows: flujos del portal de beneficios dentales
//!
//! Implementa, sobre `wizard-state`, los dos asistentes del portal:
//! solicitud nueva (`apply`) y renovación (`renew`). Cada flujo se describe
//! con una `FlowDefinition` (pasos, condiciones y salidas), cada paso con un
//! fragmento tipado y su validador, y la finalización produce los DTOs de
//! envío (`SubmissionDto`) con su huella SHA-256.

pub mod dto;
pub mod errors;
pub mod factory;
pub mod flow_type;
pub mod flows;
pub mod handler;
pub mod steps;

pub use dto::{SubmissionBody, SubmissionDto};
pub use errors::FlowsError;
pub use factory::FlowRegistry;
pub use flow_type::FlowType;
pub use flows::{FlowDefinition, Next};
pub use handler::{FlowHandler, StepResponse};
