use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use wizard_state::{FormData, FormReader, Locale, StepData, ValidationResult, Validator};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateOfBirth {
  pub date_of_birth: NaiveDate,
}

impl StepData for DateOfBirth {
  const STEP: &'static str = "date-of-birth";
  const KEY: &'static str = "dateOfBirth";
}

/// Valida `dateOfBirthYear`, `dateOfBirthMonth` y `dateOfBirthDay`.
///
/// `today` es la fecha de referencia: la decide quien construye el
/// validador, no `validate`.
pub struct DateOfBirthValidator {
  pub today: NaiveDate,
}

impl DateOfBirthValidator {
  pub fn as_of(today: NaiveDate) -> Self {
    Self { today }
  }
}

impl Validator<DateOfBirth> for DateOfBirthValidator {
  fn validate(&self, raw: &FormData, locale: Locale) -> ValidationResult<DateOfBirth> {
    let mut form = FormReader::new(raw, locale);
    let date_of_birth = form.past_date("dateOfBirth", self.today);
    form.finish(|| Some(DateOfBirth { date_of_birth: date_of_birth? }))
  }
}
