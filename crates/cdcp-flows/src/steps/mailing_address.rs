use serde::{Deserialize, Serialize};
use wizard_state::{FormData, FormReader, Locale, MessageCode, StepData, ValidationResult, Validator, MAX_TEXT_LEN};

/// Códigos de provincia y territorio aceptados para direcciones en Canadá.
pub const PROVINCES: [&str; 13] = ["AB", "BC", "MB", "NB", "NL", "NS", "NT", "NU", "ON", "PE", "QC", "SK", "YT"];

/// Código de país de Canadá (ISO 3166-1 alfa-3).
pub const CANADA: &str = "CAN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailingAddress {
  pub address: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub apartment: Option<String>,
  pub city: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub province: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub postal_code: Option<String>,
  pub country: String,
}

impl StepData for MailingAddress {
  const STEP: &'static str = "mailing-address";
  const KEY: &'static str = "mailingAddress";
}

/// Dirección postal. Para Canadá provincia y código postal son obligatorios
/// y se validan; para otros países son texto libre opcional.
pub struct MailingAddressValidator;

impl Validator<MailingAddress> for MailingAddressValidator {
  fn validate(&self, raw: &FormData, locale: Locale) -> ValidationResult<MailingAddress> {
    let mut form = FormReader::new(raw, locale);
    let address = form.required_text("address", MAX_TEXT_LEN);
    let apartment = form.optional_text("apartment", MAX_TEXT_LEN);
    let city = form.required_text("city", MAX_TEXT_LEN);
    let country = form.optional_text("country", 3)
                      .map(|c| c.to_uppercase())
                      .unwrap_or_else(|| CANADA.to_string());
    let (province, postal_code) = if country == CANADA {
      let province = form.required_text("province", 2).map(|p| p.to_uppercase());
      if let Some(p) = &province {
        if !PROVINCES.contains(&p.as_str()) {
          form.fail("province", MessageCode::InvalidChoice);
        }
      }
      (province, form.postal_code("postalCode", true))
    } else {
      (form.optional_text("province", MAX_TEXT_LEN), form.optional_text("postalCode", 20))
    };
    form.finish(|| {
          Some(MailingAddress { address: address?,
                                apartment,
                                city: city?,
                                province,
                                postal_code,
                                country })
        })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use wizard_state::form;

  #[test]
  fn canadian_address_requires_province_and_postal_code() {
    let raw = form(&[("address", "123 Rue Principale"), ("city", "Gatineau"), ("province", "XX")]);
    let errors = MailingAddressValidator.validate(&raw, Locale::Fr).into_result().unwrap_err();
    assert_eq!(errors.code("province"), Some(MessageCode::InvalidChoice));
    assert_eq!(errors.code("postalCode"), Some(MessageCode::Required));
    assert_eq!(errors.len(), 2);
  }

  #[test]
  fn foreign_address_accepts_free_form_region() {
    let raw = form(&[("address", "1 Main St"), ("city", "Boston"), ("country", "usa"), ("postalCode", "02108")]);
    let data = MailingAddressValidator.validate(&raw, Locale::En).into_result().unwrap();
    assert_eq!(data.country, "USA");
    assert_eq!(data.postal_code.as_deref(), Some("02108"));
    assert_eq!(data.province, None);
  }
}
