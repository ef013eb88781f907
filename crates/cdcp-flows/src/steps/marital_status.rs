use serde::{Deserialize, Serialize};
use std::str::FromStr;
use wizard_state::{FormData, FormReader, Locale, StepData, ValidationResult, Validator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaritalStatusKind {
  Single,
  Married,
  CommonLaw,
  Separated,
  Divorced,
  Widowed,
}

impl MaritalStatusKind {
  /// Casado o en unión de hecho: el paso de pareja pasa a ser obligatorio.
  pub fn requires_partner(&self) -> bool {
    matches!(self, MaritalStatusKind::Married | MaritalStatusKind::CommonLaw)
  }
}

impl FromStr for MaritalStatusKind {
  type Err = ();

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "single" => Ok(MaritalStatusKind::Single),
      "married" => Ok(MaritalStatusKind::Married),
      "common-law" => Ok(MaritalStatusKind::CommonLaw),
      "separated" => Ok(MaritalStatusKind::Separated),
      "divorced" => Ok(MaritalStatusKind::Divorced),
      "widowed" => Ok(MaritalStatusKind::Widowed),
      _ => Err(()),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaritalStatus {
  pub status: MaritalStatusKind,
}

impl StepData for MaritalStatus {
  const STEP: &'static str = "marital-status";
  const KEY: &'static str = "maritalStatus";
}

pub struct MaritalStatusValidator;

impl Validator<MaritalStatus> for MaritalStatusValidator {
  fn validate(&self, raw: &FormData, locale: Locale) -> ValidationResult<MaritalStatus> {
    let mut form = FormReader::new(raw, locale);
    let status = form.choice::<MaritalStatusKind>("status");
    form.finish(|| Some(MaritalStatus { status: status? }))
  }
}
