use crate::errors::{FlowsError, Result};
use crate::flow_type::FlowType;
use crate::handler::FlowHandler;
use std::collections::HashMap;
use std::sync::Arc;
use wizard_state::{StateStore, WizardConfig, WizardEngine};
/// Registro de handlers por tipo de flujo.
///
/// Es la raíz de composición del portal: recibe el almacén de estado ya
/// construido (memoria, SQLite, ...) y arma un único `WizardEngine`
/// compartido por los handlers de todos los flujos.
pub struct FlowRegistry<S>
  where S: StateStore
{
  engine: Arc<WizardEngine<S>>,
  handlers: HashMap<FlowType, FlowHandler<S>>,
}
impl<S> FlowRegistry<S> where S: StateStore
{
  pub fn new(store: Arc<S>, config: WizardConfig) -> Self {
    Self::with_engine(Arc::new(WizardEngine::new(store, config)))
  }
  /// Registra todos los flujos de `FlowType::ALL` sobre `engine`.
  pub fn with_engine(engine: Arc<WizardEngine<S>>) -> Self {
    let handlers = FlowType::ALL.iter().map(|flow| (*flow, FlowHandler::new(engine.clone(), *flow))).collect();
    Self { engine, handlers }
  }
  pub fn engine(&self) -> &Arc<WizardEngine<S>> {
    &self.engine
  }
  /// Handler del flujo. Todos los `FlowType` quedan registrados en la
  /// construcción.
  pub fn handler(&self, flow: FlowType) -> Result<&FlowHandler<S>> {
    self.handlers.get(&flow).ok_or_else(|| FlowsError::UnknownFlow(flow.to_string()))
  }
  /// Igual que `handler`, a partir del segmento de URL (`apply`, `renew`).
  pub fn handler_for(&self, raw: &str) -> Result<&FlowHandler<S>> {
    let flow = raw.parse::<FlowType>().map_err(|_| FlowsError::UnknownFlow(raw.to_string()))?;
    self.handler(flow)
  }
  /// Tipos de flujo registrados.
  pub fn flows(&self) -> Vec<FlowType> {
    let mut out: Vec<FlowType> = self.handlers.keys().copied().collect();
    out.sort_by_key(|f| f.as_str());
    out
  }
}
