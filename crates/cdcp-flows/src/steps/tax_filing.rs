use serde::{Deserialize, Serialize};
use wizard_state::{FormData, FormReader, Locale, StepData, ValidationResult, Validator};

/// Declaración de impuestos del último año. Sin ella no se puede
/// solicitar el plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxFiling {
  pub filed_taxes: bool,
}

impl StepData for TaxFiling {
  const STEP: &'static str = "tax-filing";
  const KEY: &'static str = "taxFiling";
}

pub struct TaxFilingValidator;

impl Validator<TaxFiling> for TaxFilingValidator {
  fn validate(&self, raw: &FormData, locale: Locale) -> ValidationResult<TaxFiling> {
    let mut form = FormReader::new(raw, locale);
    let filed_taxes = form.yes_no("filedTaxes");
    form.finish(|| Some(TaxFiling { filed_taxes: filed_taxes? }))
  }
}
