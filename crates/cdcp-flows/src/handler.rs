// handler.rs
//
// Handlers de los pasos de un flujo. Traducen peticiones (flujo, idioma,
// id de la URL, paso y formulario) en llamadas al motor y devuelven la
// respuesta que pintaría la capa web: redirección, formulario o envío
// completado.
//
// Los errores de integridad del estado se convierten aquí en
// redirecciones; los fallos de almacén se propagan sin reintentar.
use crate::dto::SubmissionDto;
use crate::errors::{FlowsError, Result};
use crate::flow_type::FlowType;
use crate::flows::{definition_for, ApplyFinalizer, FlowDefinition, Next, RenewFinalizer};
use crate::steps::*;
use chrono::Utc;
use log::{debug, info};
use std::collections::BTreeMap;
use std::sync::Arc;
use wizard_state::{Finalizer, FormData, Locale, Recovery, SessionStore, StatePatch, StateStore, StepData,
                   StepOutcome, WizardEngine, WizardError, WizardState};

/// Respuesta de un handler.
#[derive(Debug, Clone, PartialEq)]
pub enum StepResponse {
  Redirect(String),
  /// Pintar el formulario de `step`, con errores de campo si los hay.
  Render {
    step: &'static str,
    previous: Option<String>,
    errors: BTreeMap<String, String>,
    state: WizardState,
  },
  /// Flujo finalizado: envíos para el cliente externo y página de
  /// confirmación.
  Completed {
    submissions: Vec<SubmissionDto>,
    redirect: String,
  },
}

impl StepResponse {
  pub fn redirect_target(&self) -> Option<&str> {
    match self {
      StepResponse::Redirect(url) | StepResponse::Completed { redirect: url, .. } => Some(url),
      StepResponse::Render { .. } => None,
    }
  }
}

// Descarta el dato tipado: al handler sólo le interesa si se guardó.
fn erase<T>(outcome: StepOutcome<T>) -> StepOutcome<()> {
  match outcome {
    StepOutcome::Saved { state, .. } => StepOutcome::Saved { data: (), state },
    StepOutcome::Invalid { errors, state } => StepOutcome::Invalid { errors, state },
  }
}

/// Handlers de un flujo concreto.
pub struct FlowHandler<S>
  where S: StateStore
{
  engine: Arc<WizardEngine<S>>,
  flow: FlowType,
  definition: FlowDefinition,
  finalizer: Box<dyn Finalizer<Dto = SubmissionDto>>,
}

impl<S> FlowHandler<S> where S: StateStore
{
  pub fn new(engine: Arc<WizardEngine<S>>, flow: FlowType) -> Self {
    let finalizer: Box<dyn Finalizer<Dto = SubmissionDto>> = match flow {
      FlowType::Apply => Box::new(ApplyFinalizer::new()),
      FlowType::Renew => Box::new(RenewFinalizer::new()),
    };
    Self { engine, flow, definition: definition_for(flow), finalizer }
  }

  pub fn flow(&self) -> FlowType {
    self.flow
  }

  pub fn definition(&self) -> &FlowDefinition {
    &self.definition
  }

  // ---- rutas ----

  pub fn start_url(&self, locale: Locale) -> String {
    format!("/{}/{}", locale, self.flow)
  }

  pub fn step_url(&self, locale: Locale, id: &str, step: &str) -> String {
    format!("/{}/{}/{}/{}", locale, self.flow, id, step)
  }

  pub fn exit_url(&self, locale: Locale, exit: &str) -> String {
    format!("/{}/{}/{}", locale, self.flow, exit)
  }

  pub fn confirmation_url(&self, locale: Locale) -> String {
    format!("/{}/{}/confirmation", locale, self.flow)
  }

  // ---- handlers ----

  /// Punto de entrada: nuevo estado y redirección al primer paso.
  pub fn start(&self, session: &dyn SessionStore, locale: Locale) -> Result<StepResponse> {
    let state = self.engine.start_flow(session, self.flow.as_str(), Some(locale))?;
    let first = self.definition.first_step().ok_or_else(|| FlowsError::UnknownFlow(self.flow.to_string()))?;
    Ok(StepResponse::Redirect(self.step_url(state.locale, &state.id.to_string(), first)))
  }

  /// GET de un paso. Un paso que todavía no toca (o que no aplica) manda
  /// al primer paso pendiente.
  pub fn show_step(&self, session: &dyn SessionStore, locale: Locale, id: &str, step: &str) -> Result<StepResponse> {
    let step = self.known_step(step)?;
    let state = match self.engine.load_state(session, self.flow.as_str(), id) {
      Ok(state) => state,
      Err(e) => return self.recover(locale, id, e),
    };
    if let Some(redirect) = self.unreachable_redirect(&state, id, step) {
      return Ok(redirect);
    }
    Ok(self.render(step, id, BTreeMap::new(), state))
  }

  /// POST de un paso: valida, guarda y navega. Un paso no accesible no se
  /// valida ni se guarda; redirige igual que `show_step`.
  pub fn submit_step(&self,
                     session: &dyn SessionStore,
                     locale: Locale,
                     id: &str,
                     step: &str,
                     raw: &FormData)
                     -> Result<StepResponse> {
    let step = self.known_step(step)?;
    let current = match self.engine.load_state(session, self.flow.as_str(), id) {
      Ok(state) => state,
      Err(e) => return self.recover(locale, id, e),
    };
    if let Some(redirect) = self.unreachable_redirect(&current, id, step) {
      return Ok(redirect);
    }
    let outcome = match self.dispatch(session, id, step, raw, &current) {
      Ok(Some(outcome)) => outcome,
      Ok(None) => return Err(self.unknown_step(step)),
      Err(e) => return self.recover(locale, id, e),
    };
    let state = match outcome {
      StepOutcome::Invalid { errors, state } => {
        return Ok(self.render(step, id, errors.into_messages(), state));
      }
      StepOutcome::Saved { state, .. } => state,
    };
    match self.definition.next(&state, step) {
      Next::Step(next) => Ok(StepResponse::Redirect(self.step_url(state.locale, id, next))),
      // El estado se conserva: desde la página de salida se puede volver.
      Next::Exit(exit) => {
        info!("flujo '{}' sale hacia '{}' (estado {})", self.flow, exit, state.id);
        Ok(StepResponse::Redirect(self.exit_url(state.locale, exit)))
      }
      Next::Complete => self.complete(session, state.locale, id),
    }
  }

  /// Enlace "Modificar" de la página de revisión: activa el modo edición y
  /// lleva al paso.
  pub fn edit_step(&self, session: &dyn SessionStore, locale: Locale, id: &str, step: &str) -> Result<StepResponse> {
    let step = self.known_step(step)?;
    let patch = StatePatch::new().with_edit_mode(true);
    match self.engine.save_state(session, self.flow.as_str(), id, &patch) {
      Ok(state) => Ok(StepResponse::Redirect(self.step_url(state.locale, id, step))),
      Err(e) => self.recover(locale, id, e),
    }
  }

  /// Finaliza el flujo con el estado actual.
  pub fn complete(&self, session: &dyn SessionStore, locale: Locale, id: &str) -> Result<StepResponse> {
    match self.engine.complete(session, self.flow.as_str(), id, self.finalizer.as_ref()) {
      Ok(submissions) => Ok(StepResponse::Completed { submissions, redirect: self.confirmation_url(locale) }),
      Err(e) => self.recover(locale, id, e),
    }
  }

  /// Abandono explícito ("Salir"): descarta el estado y vuelve al inicio.
  pub fn abandon(&self, session: &dyn SessionStore, locale: Locale) -> Result<StepResponse> {
    self.engine.abandon(session, self.flow.as_str())?;
    Ok(StepResponse::Redirect(self.start_url(locale)))
  }

  // ---- internos ----

  fn known_step(&self, step: &str) -> Result<&'static str> {
    self.definition.step(step).map(|s| s.name).ok_or_else(|| self.unknown_step(step))
  }

  fn unknown_step(&self, step: &str) -> FlowsError {
    FlowsError::UnknownStep { flow: self.flow.to_string(), step: step.to_string() }
  }

  // Redirección al primer paso pendiente si `step` todavía no toca o no
  // aplica al estado.
  fn unreachable_redirect(&self, state: &WizardState, id: &str, step: &'static str) -> Option<StepResponse> {
    if self.definition.is_reachable(state, step) {
      return None;
    }
    let target = self.definition
                     .first_missing_step(state)
                     .or_else(|| self.definition.terminal_step())
                     .unwrap_or(step);
    debug!("paso '{}' no accesible en {}, redirigiendo a '{}'", step, state.id, target);
    Some(StepResponse::Redirect(self.step_url(state.locale, id, target)))
  }

  fn render(&self, step: &'static str, id: &str, errors: BTreeMap<String, String>, state: WizardState) -> StepResponse {
    let previous = self.definition.previous(&state, step).map(|p| self.step_url(state.locale, id, p));
    StepResponse::Render { step, previous, errors, state }
  }

  fn recover(&self, locale: Locale, id: &str, err: WizardError) -> Result<StepResponse> {
    match err.recovery() {
      Recovery::RestartFlow => Ok(StepResponse::Redirect(self.start_url(locale))),
      Recovery::GoToStep(step) => Ok(StepResponse::Redirect(self.step_url(locale, id, &step))),
      Recovery::ServerError => Err(err.into()),
    }
  }

  // Elige validador y ajuste del parche según el paso. `None` si el paso
  // no tiene handler.
  fn dispatch(&self,
              session: &dyn SessionStore,
              id: &str,
              step: &str,
              raw: &FormData,
              current: &WizardState)
              -> wizard_state::Result<Option<StepOutcome<()>>> {
    let engine = &self.engine;
    let flow = self.flow.as_str();
    let outcome = match step {
      TaxFiling::STEP => erase(engine.submit_step(session, flow, id, &TaxFilingValidator, raw)?),
      ApplicantInformation::STEP => erase(engine.submit_step(session, flow, id, &ApplicantInformationValidator, raw)?),
      DateOfBirth::STEP => {
        let validator = DateOfBirthValidator::as_of(Utc::now().date_naive());
        erase(engine.submit_step(session, flow, id, &validator, raw)?)
      }
      MaritalStatus::STEP => {
        erase(engine.submit_step_with(session, flow, id, &MaritalStatusValidator, raw, |data: &MaritalStatus, _, patch| {
                      if data.status.requires_partner() {
                        patch
                      } else {
                        patch.remove::<PartnerInformation>()
                      }
                    })?)
      }
      PartnerInformation::STEP => {
        let validator = PartnerInformationValidator::for_state(current);
        erase(engine.submit_step(session, flow, id, &validator, raw)?)
      }
      ContactInfo::STEP => erase(engine.submit_step(session, flow, id, &ContactInfoValidator, raw)?),
      MailingAddress::STEP => erase(engine.submit_step(session, flow, id, &MailingAddressValidator, raw)?),
      CommunicationPreference::STEP => {
        erase(engine.submit_step(session, flow, id, &CommunicationPreferenceValidator, raw)?)
      }
      DentalInsurance::STEP => erase(engine.submit_step(session, flow, id, &DentalInsuranceValidator, raw)?),
      Submit::STEP => erase(engine.submit_step(session, flow, id, &SubmitValidator, raw)?),
      RenewalConfirmation::STEP => {
        erase(engine.submit_step_with(session,
                                      flow,
                                      id,
                                      &RenewalConfirmationValidator,
                                      raw,
                                      |data: &RenewalConfirmation, _, patch| {
                                        if data.has_changes {
                                          patch
                                        } else {
                                          patch.remove::<ContactInfo>().remove::<MailingAddress>()
                                        }
                                      })?)
      }
      _ => return Ok(None),
    };
    Ok(Some(outcome))
  }
}
