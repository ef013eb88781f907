// definition.rs
//
// Definición declarativa de un flujo: pasos en orden, condiciones de
// aplicación (pasos condicionales) y salidas anticipadas. A partir de ella
// se derivan la navegación (siguiente / anterior) y los pasos obligatorios
// del finalizador.
use crate::flow_type::FlowType;
use wizard_state::{RequiredStep, StepData, WizardState};

fn always(_: &WizardState) -> bool {
  true
}

/// Un paso dentro de un flujo.
#[derive(Clone)]
pub struct StepSpec {
  pub name: &'static str,
  pub key: &'static str,
  applies: fn(&WizardState) -> bool,
  exit: Option<fn(&WizardState) -> Option<&'static str>>,
}

impl StepSpec {
  pub fn of<T: StepData>() -> Self {
    Self { name: T::STEP, key: T::KEY, applies: always, exit: None }
  }

  /// El paso sólo aplica si `applies` devuelve `true` para el estado.
  pub fn when(mut self, applies: fn(&WizardState) -> bool) -> Self {
    self.applies = applies;
    self
  }

  /// Tras guardar este paso, `exit` puede sacar al usuario del flujo hacia
  /// una página informativa (por ejemplo, si no declaró impuestos).
  pub fn exit_when(mut self, exit: fn(&WizardState) -> Option<&'static str>) -> Self {
    self.exit = Some(exit);
    self
  }

  pub fn applies(&self, state: &WizardState) -> bool {
    (self.applies)(state)
  }
}

impl std::fmt::Debug for StepSpec {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StepSpec").field("name", &self.name).field("key", &self.key).finish()
  }
}

/// Adónde ir tras guardar un paso.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
  Step(&'static str),
  /// Página de salida fuera del flujo.
  Exit(&'static str),
  /// Se guardó el paso terminal: toca finalizar.
  Complete,
}

#[derive(Debug, Clone)]
pub struct FlowDefinition {
  flow: FlowType,
  steps: Vec<StepSpec>,
}

impl FlowDefinition {
  /// `steps` debe terminar con el paso terminal (confirmación final).
  pub fn new(flow: FlowType, steps: Vec<StepSpec>) -> Self {
    Self { flow, steps }
  }

  pub fn flow(&self) -> FlowType {
    self.flow
  }

  pub fn steps(&self) -> &[StepSpec] {
    &self.steps
  }

  pub fn step(&self, name: &str) -> Option<&StepSpec> {
    self.steps.iter().find(|s| s.name == name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.step(name).is_some()
  }

  pub fn first_step(&self) -> Option<&'static str> {
    self.steps.first().map(|s| s.name)
  }

  pub fn terminal_step(&self) -> Option<&'static str> {
    self.steps.last().map(|s| s.name)
  }

  fn position(&self, name: &str) -> Option<usize> {
    self.steps.iter().position(|s| s.name == name)
  }

  /// Pasos que aplican al estado, en orden.
  pub fn active_steps<'a>(&'a self, state: &'a WizardState) -> impl Iterator<Item = &'a StepSpec> + 'a {
    self.steps.iter().filter(move |s| s.applies(state))
  }

  /// Pasos obligatorios para finalizar: todos los que aplican.
  pub fn required_steps(&self, state: &WizardState) -> Vec<RequiredStep> {
    self.active_steps(state).map(|s| RequiredStep { step: s.name, key: s.key }).collect()
  }

  /// Primer paso aplicable sin datos, sin contar el terminal.
  pub fn first_missing_step(&self, state: &WizardState) -> Option<&'static str> {
    let terminal = self.terminal_step();
    self.active_steps(state)
        .filter(|s| Some(s.name) != terminal)
        .find(|s| !state.contains_key(s.key))
        .map(|s| s.name)
  }

  /// Un paso es accesible si aplica y todos los pasos aplicables previos
  /// tienen datos.
  pub fn is_reachable(&self, state: &WizardState, name: &str) -> bool {
    let Some(pos) = self.position(name) else {
      return false;
    };
    if !self.steps[pos].applies(state) {
      return false;
    }
    self.steps[..pos].iter().filter(|s| s.applies(state)).all(|s| state.contains_key(s.key))
  }

  /// Navegación hacia delante tras guardar `from`.
  ///
  /// En modo edición se vuelve a la revisión, salvo que el cambio haya
  /// activado un paso condicional todavía vacío.
  pub fn next(&self, state: &WizardState, from: &str) -> Next {
    let Some(pos) = self.position(from) else {
      return self.first_step().map(Next::Step).unwrap_or(Next::Complete);
    };
    if let Some(exit) = self.steps[pos].exit.and_then(|f| f(state)) {
      return Next::Exit(exit);
    }
    if pos + 1 == self.steps.len() {
      return Next::Complete;
    }
    if state.edit_mode {
      return match self.first_missing_step(state) {
        Some(step) => Next::Step(step),
        None => self.terminal_step().map(Next::Step).unwrap_or(Next::Complete),
      };
    }
    self.steps[pos + 1..]
        .iter()
        .find(|s| s.applies(state))
        .map(|s| Next::Step(s.name))
        .unwrap_or(Next::Complete)
  }

  /// Paso aplicable anterior a `from` (botón "Atrás").
  pub fn previous(&self, state: &WizardState, from: &str) -> Option<&'static str> {
    let pos = self.position(from)?;
    self.steps[..pos].iter().rev().find(|s| s.applies(state)).map(|s| s.name)
  }
}
