// apply.rs
//
// Flujo de solicitud nueva.
use super::definition::{FlowDefinition, StepSpec};
use crate::dto::{ApplicantDto, BenefitApplicationDto, PartnerDto, SubmissionBody, SubmissionDto};
use crate::flow_type::FlowType;
use crate::steps::*;
use wizard_state::{Finalizer, RequiredStep, Result, StepData, WizardError, WizardState};

/// Página de salida cuando el solicitante no declaró impuestos.
pub const EXIT_FILE_TAXES: &str = "file-your-taxes";

fn requires_partner(state: &WizardState) -> bool {
  matches!(state.get::<MaritalStatus>(), Ok(Some(m)) if m.status.requires_partner())
}

fn taxes_not_filed(state: &WizardState) -> Option<&'static str> {
  match state.get::<TaxFiling>() {
    Ok(Some(t)) if !t.filed_taxes => Some(EXIT_FILE_TAXES),
    _ => None,
  }
}

pub fn definition() -> FlowDefinition {
  FlowDefinition::new(FlowType::Apply,
                      vec![StepSpec::of::<TaxFiling>().exit_when(taxes_not_filed),
                           StepSpec::of::<ApplicantInformation>(),
                           StepSpec::of::<DateOfBirth>(),
                           StepSpec::of::<MaritalStatus>(),
                           StepSpec::of::<PartnerInformation>().when(requires_partner),
                           StepSpec::of::<ContactInfo>(),
                           StepSpec::of::<MailingAddress>(),
                           StepSpec::of::<CommunicationPreference>(),
                           StepSpec::of::<DentalInsurance>(),
                           StepSpec::of::<Submit>()])
}

fn incomplete<T: StepData>() -> WizardError {
  WizardError::IncompleteState { step: T::STEP.to_string() }
}

/// Convierte el estado de una solicitud en un `BenefitApplication`.
pub struct ApplyFinalizer {
  definition: FlowDefinition,
}

impl ApplyFinalizer {
  pub fn new() -> Self {
    Self { definition: definition() }
  }
}

impl Default for ApplyFinalizer {
  fn default() -> Self {
    Self::new()
  }
}

impl Finalizer for ApplyFinalizer {
  type Dto = SubmissionDto;

  fn required_steps(&self, state: &WizardState) -> Vec<RequiredStep> {
    self.definition.required_steps(state)
  }

  fn build(&self, state: &WizardState) -> Result<Vec<SubmissionDto>> {
    if !state.require::<TaxFiling>()?.filed_taxes {
      return Err(incomplete::<TaxFiling>());
    }
    if !state.require::<Submit>()?.is_confirmed() {
      return Err(incomplete::<Submit>());
    }
    let applicant = state.require::<ApplicantInformation>()?;
    let date_of_birth = state.require::<DateOfBirth>()?;
    let marital = state.require::<MaritalStatus>()?;
    let partner = if marital.status.requires_partner() {
      let p = state.require::<PartnerInformation>()?;
      Some(PartnerDto { first_name: p.first_name,
                        last_name: p.last_name,
                        social_insurance_number: p.social_insurance_number,
                        consent: p.consent })
    } else {
      None
    };
    let contact = state.require::<ContactInfo>()?;
    let mailing_address = state.require::<MailingAddress>()?;
    let communication = state.require::<CommunicationPreference>()?;
    // Avisos por correo electrónico sin correo registrado.
    if communication.preferred_method == CommunicationMethod::Email && contact.email.is_none() {
      return Err(incomplete::<ContactInfo>());
    }
    let dental = state.require::<DentalInsurance>()?;

    let body = BenefitApplicationDto { application_reference: state.id.to_string(),
                                       locale: state.locale,
                                       applicant: ApplicantDto { first_name: applicant.first_name,
                                                                 last_name: applicant.last_name,
                                                                 social_insurance_number: applicant.social_insurance_number,
                                                                 date_of_birth: Some(date_of_birth.date_of_birth),
                                                                 marital_status: Some(marital.status) },
                                       partner,
                                       contact,
                                       mailing_address,
                                       communication,
                                       has_dental_insurance: dental.has_access };
    Ok(vec![SubmissionDto::new(SubmissionBody::BenefitApplication(body))?])
  }
}
