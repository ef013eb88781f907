// renew.rs
//
// Flujo de renovación. Si el cliente declara cambios se piden de nuevo los
// datos de contacto y la dirección, y la finalización produce además una
// actualización de datos de contacto.
use super::definition::{FlowDefinition, StepSpec};
use crate::dto::{ApplicantDto, BenefitRenewalDto, ContactDetailsUpdateDto, SubmissionBody, SubmissionDto};
use crate::flow_type::FlowType;
use crate::steps::*;
use wizard_state::{Finalizer, RequiredStep, Result, StepData, WizardError, WizardState};

fn has_changes(state: &WizardState) -> bool {
  matches!(state.get::<RenewalConfirmation>(), Ok(Some(r)) if r.has_changes)
}

pub fn definition() -> FlowDefinition {
  FlowDefinition::new(FlowType::Renew,
                      vec![StepSpec::of::<RenewalConfirmation>(),
                           StepSpec::of::<ApplicantInformation>(),
                           StepSpec::of::<ContactInfo>().when(has_changes),
                           StepSpec::of::<MailingAddress>().when(has_changes),
                           StepSpec::of::<DentalInsurance>(),
                           StepSpec::of::<Submit>()])
}

pub struct RenewFinalizer {
  definition: FlowDefinition,
}

impl RenewFinalizer {
  pub fn new() -> Self {
    Self { definition: definition() }
  }
}

impl Default for RenewFinalizer {
  fn default() -> Self {
    Self::new()
  }
}

impl Finalizer for RenewFinalizer {
  type Dto = SubmissionDto;

  fn required_steps(&self, state: &WizardState) -> Vec<RequiredStep> {
    self.definition.required_steps(state)
  }

  fn build(&self, state: &WizardState) -> Result<Vec<SubmissionDto>> {
    if !state.require::<Submit>()?.is_confirmed() {
      return Err(WizardError::IncompleteState { step: Submit::STEP.to_string() });
    }
    let confirmation = state.require::<RenewalConfirmation>()?;
    let applicant = state.require::<ApplicantInformation>()?;
    let dental = state.require::<DentalInsurance>()?;
    let reference = state.id.to_string();

    let renewal = BenefitRenewalDto { application_reference: reference.clone(),
                                      locale: state.locale,
                                      client_number: confirmation.client_number.clone(),
                                      applicant: ApplicantDto { first_name: applicant.first_name,
                                                                last_name: applicant.last_name,
                                                                social_insurance_number: applicant.social_insurance_number,
                                                                date_of_birth: None,
                                                                marital_status: None },
                                      has_dental_insurance: dental.has_access,
                                      has_changes: confirmation.has_changes };
    let mut out = vec![SubmissionDto::new(SubmissionBody::BenefitRenewal(renewal))?];

    if confirmation.has_changes {
      let update = ContactDetailsUpdateDto { application_reference: reference,
                                             client_number: confirmation.client_number,
                                             contact: state.require::<ContactInfo>()?,
                                             mailing_address: state.require::<MailingAddress>()? };
      out.push(SubmissionDto::new(SubmissionBody::ContactDetailsUpdate(update))?);
    }
    Ok(out)
  }
}
