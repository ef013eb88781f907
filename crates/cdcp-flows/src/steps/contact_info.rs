use serde::{Deserialize, Serialize};
use wizard_state::{FormData, FormReader, Locale, StepData, ValidationResult, Validator};

/// Medios de contacto. Todos opcionales; el correo se pide dos veces.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub phone: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub alt_phone: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
}

impl StepData for ContactInfo {
  const STEP: &'static str = "contact-info";
  const KEY: &'static str = "contactInfo";
}

pub struct ContactInfoValidator;

impl Validator<ContactInfo> for ContactInfoValidator {
  fn validate(&self, raw: &FormData, locale: Locale) -> ValidationResult<ContactInfo> {
    let mut form = FormReader::new(raw, locale);
    let phone = form.phone("phone", false);
    let alt_phone = form.phone("altPhone", false);
    let email = form.email("email", false);
    form.confirm_email("confirmEmail", email.as_deref());
    form.finish(|| Some(ContactInfo { phone, alt_phone, email }))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use wizard_state::{form, MessageCode};

  #[test]
  fn phone_only_serializes_without_empty_fields() {
    let data = ContactInfoValidator.validate(&form(&[("phone", "514-555-1234")]), Locale::En)
                                   .into_result()
                                   .unwrap();
    assert_eq!(serde_json::to_value(&data).unwrap(), serde_json::json!({"phone": "5145551234"}));
  }

  #[test]
  fn email_confirmation_must_match() {
    let raw = form(&[("email", "Ana@Example.ca"), ("confirmEmail", "ana@example.com")]);
    let res = ContactInfoValidator.validate(&raw, Locale::Fr);
    let errors = res.errors().unwrap();
    assert_eq!(errors.code("confirmEmail"), Some(MessageCode::EmailMismatch));
    assert!(!errors.contains("email"));

    let raw = form(&[("email", "Ana@Example.ca"), ("confirmEmail", "ana@example.ca")]);
    let data = ContactInfoValidator.validate(&raw, Locale::Fr).into_result().unwrap();
    assert_eq!(data.email.as_deref(), Some("ana@example.ca"));
  }
}
