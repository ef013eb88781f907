// Definiciones de flujo y finalizadores.
pub mod apply;
pub mod definition;
pub mod renew;

pub use apply::ApplyFinalizer;
pub use definition::{FlowDefinition, Next, StepSpec};
pub use renew::RenewFinalizer;

use crate::flow_type::FlowType;

/// Definición del flujo `flow`.
pub fn definition_for(flow: FlowType) -> FlowDefinition {
  match flow {
    FlowType::Apply => apply::definition(),
    FlowType::Renew => renew::definition(),
  }
}
