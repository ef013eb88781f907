use serde::{Deserialize, Serialize};
use wizard_state::{FormData, FormReader, Locale, MessageCode, StepData, ValidationResult, Validator};

/// Primer paso de la renovación: número de cliente y si cambiaron los datos
/// de contacto o la dirección desde la última solicitud.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewalConfirmation {
  pub client_number: String,
  pub has_changes: bool,
}

impl StepData for RenewalConfirmation {
  const STEP: &'static str = "renewal-confirmation";
  const KEY: &'static str = "renewalConfirmation";
}

pub struct RenewalConfirmationValidator;

impl Validator<RenewalConfirmation> for RenewalConfirmationValidator {
  fn validate(&self, raw: &FormData, locale: Locale) -> ValidationResult<RenewalConfirmation> {
    let mut form = FormReader::new(raw, locale);
    let client_number = form.digits("clientNumber", 11, MessageCode::InvalidClientNumber);
    let has_changes = form.yes_no("hasChanges");
    form.finish(|| {
          Some(RenewalConfirmation { client_number: client_number?,
                                     has_changes: has_changes? })
        })
  }
}
