use serde::{Deserialize, Serialize};
use wizard_state::{FormData, FormReader, Locale, StepData, ValidationResult, Validator};

/// Identidad del solicitante: nombre y NAS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantInformation {
  pub first_name: String,
  pub last_name: String,
  /// NAS normalizado a 9 dígitos.
  pub social_insurance_number: String,
}

impl StepData for ApplicantInformation {
  const STEP: &'static str = "applicant-information";
  const KEY: &'static str = "applicantInformation";
}

pub struct ApplicantInformationValidator;

impl Validator<ApplicantInformation> for ApplicantInformationValidator {
  fn validate(&self, raw: &FormData, locale: Locale) -> ValidationResult<ApplicantInformation> {
    let mut form = FormReader::new(raw, locale);
    let first_name = form.name("firstName");
    let last_name = form.name("lastName");
    let sin = form.sin("socialInsuranceNumber");
    form.finish(|| {
          Some(ApplicantInformation { first_name: first_name?,
                                      last_name: last_name?,
                                      social_insurance_number: sin? })
        })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use wizard_state::{form, MessageCode};

  #[test]
  fn reports_each_invalid_field_once() {
    let raw = form(&[("firstName", "Marie-Ève"), ("lastName", "Tr3mblay"), ("socialInsuranceNumber", "123")]);
    let errors = ApplicantInformationValidator.validate(&raw, Locale::En).into_result().unwrap_err();
    assert_eq!(errors.len(), 2);
    assert!(!errors.contains("firstName"));
    assert_eq!(errors.code("lastName"), Some(MessageCode::InvalidCharacters));
    assert_eq!(errors.code("socialInsuranceNumber"), Some(MessageCode::InvalidSin));
  }

  #[test]
  fn normalizes_sin() {
    let raw = form(&[("firstName", "Jean"), ("lastName", "O'Neil"), ("socialInsuranceNumber", "046-454-286")]);
    let data = ApplicantInformationValidator.validate(&raw, Locale::Fr).into_result().unwrap();
    assert_eq!(data.social_insurance_number, "046454286");
  }
}
