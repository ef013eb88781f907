// dto.rs
//
// DTOs de envío que produce la finalización de un flujo. Se entregan a un
// cliente externo (fuera de este crate). Cada DTO lleva una huella SHA-256
// de su contenido que sirve como clave de idempotencia.
use crate::steps::{CommunicationPreference, ContactInfo, MailingAddress, MaritalStatusKind};
use chrono::NaiveDate;
use serde::Serialize;
use sha2::{Digest, Sha256};
use wizard_state::{Locale, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantDto {
  pub first_name: String,
  pub last_name: String,
  pub social_insurance_number: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub date_of_birth: Option<NaiveDate>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub marital_status: Option<MaritalStatusKind>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerDto {
  pub first_name: String,
  pub last_name: String,
  pub social_insurance_number: String,
  pub consent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefitApplicationDto {
  /// Id del estado del que salió la solicitud.
  pub application_reference: String,
  pub locale: Locale,
  pub applicant: ApplicantDto,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub partner: Option<PartnerDto>,
  pub contact: ContactInfo,
  pub mailing_address: MailingAddress,
  pub communication: CommunicationPreference,
  pub has_dental_insurance: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefitRenewalDto {
  pub application_reference: String,
  pub locale: Locale,
  pub client_number: String,
  pub applicant: ApplicantDto,
  pub has_dental_insurance: bool,
  pub has_changes: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetailsUpdateDto {
  pub application_reference: String,
  pub client_number: String,
  pub contact: ContactInfo,
  pub mailing_address: MailingAddress,
}

/// Contenido de un envío.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SubmissionBody {
  BenefitApplication(BenefitApplicationDto),
  BenefitRenewal(BenefitRenewalDto),
  ContactDetailsUpdate(ContactDetailsUpdateDto),
}

/// Envío listo para el cliente externo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionDto {
  /// SHA-256 (hex) del contenido serializado.
  pub fingerprint: String,
  #[serde(flatten)]
  pub body: SubmissionBody,
}

impl SubmissionDto {
  pub fn new(body: SubmissionBody) -> Result<Self> {
    let bytes = serde_json::to_vec(&body)?;
    let fingerprint = format!("{:x}", Sha256::digest(&bytes));
    Ok(Self { fingerprint, body })
  }

  pub fn kind(&self) -> &'static str {
    match self.body {
      SubmissionBody::BenefitApplication(_) => "benefit-application",
      SubmissionBody::BenefitRenewal(_) => "benefit-renewal",
      SubmissionBody::ContactDetailsUpdate(_) => "contact-details-update",
    }
  }
}
