use serde::{Deserialize, Serialize};
use wizard_state::{FormData, FormReader, Locale, StepData, ValidationResult, Validator};

/// Confirmaciones finales de la página de revisión.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submit {
  pub acknowledge_terms: bool,
  pub acknowledge_privacy: bool,
}

impl Submit {
  pub fn is_confirmed(&self) -> bool {
    self.acknowledge_terms && self.acknowledge_privacy
  }
}

impl StepData for Submit {
  const STEP: &'static str = "submit";
  const KEY: &'static str = "submit";
}

pub struct SubmitValidator;

impl Validator<Submit> for SubmitValidator {
  fn validate(&self, raw: &FormData, locale: Locale) -> ValidationResult<Submit> {
    let mut form = FormReader::new(raw, locale);
    let acknowledge_terms = form.confirmed("acknowledgeTerms");
    let acknowledge_privacy = form.confirmed("acknowledgePrivacy");
    form.finish(|| Some(Submit { acknowledge_terms, acknowledge_privacy }))
  }
}
