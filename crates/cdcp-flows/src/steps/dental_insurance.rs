use serde::{Deserialize, Serialize};
use wizard_state::{FormData, FormReader, Locale, StepData, ValidationResult, Validator};

/// Acceso a otro seguro dental (privado o de empleador).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DentalInsurance {
  pub has_access: bool,
}

impl StepData for DentalInsurance {
  const STEP: &'static str = "dental-insurance";
  const KEY: &'static str = "dentalInsurance";
}

pub struct DentalInsuranceValidator;

impl Validator<DentalInsurance> for DentalInsuranceValidator {
  fn validate(&self, raw: &FormData, locale: Locale) -> ValidationResult<DentalInsurance> {
    let mut form = FormReader::new(raw, locale);
    let has_access = form.yes_no("dentalInsurance");
    form.finish(|| Some(DentalInsurance { has_access: has_access? }))
  }
}
