use serde::{Deserialize, Serialize};
use std::str::FromStr;
use wizard_state::{FormData, FormReader, Locale, StepData, ValidationResult, Validator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommunicationMethod {
  Email,
  Mail,
}

impl FromStr for CommunicationMethod {
  type Err = ();

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "email" => Ok(CommunicationMethod::Email),
      "mail" => Ok(CommunicationMethod::Mail),
      _ => Err(()),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationPreference {
  pub preferred_language: Locale,
  pub preferred_method: CommunicationMethod,
}

impl StepData for CommunicationPreference {
  const STEP: &'static str = "communication-preference";
  const KEY: &'static str = "communicationPreference";
}

pub struct CommunicationPreferenceValidator;

impl Validator<CommunicationPreference> for CommunicationPreferenceValidator {
  fn validate(&self, raw: &FormData, locale: Locale) -> ValidationResult<CommunicationPreference> {
    let mut form = FormReader::new(raw, locale);
    let language = form.choice::<String>("preferredLanguage");
    let preferred_language = match language.as_deref().map(Locale::parse) {
      Some(Some(l)) => Some(l),
      Some(None) => {
        form.fail("preferredLanguage", wizard_state::MessageCode::InvalidChoice);
        None
      }
      None => None,
    };
    let preferred_method = form.choice::<CommunicationMethod>("preferredMethod");
    form.finish(|| {
          Some(CommunicationPreference { preferred_language: preferred_language?,
                                         preferred_method: preferred_method? })
        })
  }
}
