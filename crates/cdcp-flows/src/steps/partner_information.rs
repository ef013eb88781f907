use serde::{Deserialize, Serialize};
use wizard_state::{FormData, FormReader, Locale, MessageCode, StepData, ValidationResult, Validator, WizardState};

use super::ApplicantInformation;

/// Datos del cónyuge o pareja de hecho.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerInformation {
  pub first_name: String,
  pub last_name: String,
  pub social_insurance_number: String,
  /// La pareja autorizó compartir sus datos fiscales.
  pub consent: bool,
}

impl StepData for PartnerInformation {
  const STEP: &'static str = "partner-information";
  const KEY: &'static str = "partnerInformation";
}

/// El NAS de la pareja no puede repetir el del solicitante.
#[derive(Default)]
pub struct PartnerInformationValidator {
  pub applicant_sin: Option<String>,
}

impl PartnerInformationValidator {
  /// Construye el validador con el NAS ya guardado en el estado.
  pub fn for_state(state: &WizardState) -> Self {
    let applicant_sin = state.get::<ApplicantInformation>()
                             .ok()
                             .flatten()
                             .map(|a| a.social_insurance_number);
    Self { applicant_sin }
  }
}

impl Validator<PartnerInformation> for PartnerInformationValidator {
  fn validate(&self, raw: &FormData, locale: Locale) -> ValidationResult<PartnerInformation> {
    let mut form = FormReader::new(raw, locale);
    let first_name = form.name("firstName");
    let last_name = form.name("lastName");
    let sin = form.sin("socialInsuranceNumber");
    if sin.is_some() && sin == self.applicant_sin {
      form.fail("socialInsuranceNumber", MessageCode::SinMatchesApplicant);
    }
    let consent = form.confirmed("consent");
    form.finish(|| {
          Some(PartnerInformation { first_name: first_name?,
                                    last_name: last_name?,
                                    social_insurance_number: sin?,
                                    consent })
        })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use wizard_state::form;

  #[test]
  fn partner_sin_must_differ_from_applicant() {
    let validator = PartnerInformationValidator { applicant_sin: Some("046454286".into()) };
    let raw = form(&[("firstName", "Luc"),
                     ("lastName", "Roy"),
                     ("socialInsuranceNumber", "046 454 286"),
                     ("consent", "yes")]);
    let errors = validator.validate(&raw, Locale::En).into_result().unwrap_err();
    assert_eq!(errors.code("socialInsuranceNumber"), Some(MessageCode::SinMatchesApplicant));
    assert_eq!(errors.len(), 1);
  }

  #[test]
  fn consent_is_mandatory() {
    let raw = form(&[("firstName", "Luc"), ("lastName", "Roy"), ("socialInsuranceNumber", "800000002")]);
    let errors = PartnerInformationValidator::default().validate(&raw, Locale::En).into_result().unwrap_err();
    assert_eq!(errors.code("consent"), Some(MessageCode::MustConfirm));
  }
}
