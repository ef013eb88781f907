// Fragmentos tipados y validadores de cada paso.
pub mod applicant_information;
pub mod communication_preference;
pub mod contact_info;
pub mod date_of_birth;
pub mod dental_insurance;
pub mod mailing_address;
pub mod marital_status;
pub mod partner_information;
pub mod renewal_confirmation;
pub mod submit;
pub mod tax_filing;

pub use applicant_information::{ApplicantInformation, ApplicantInformationValidator};
pub use communication_preference::{CommunicationMethod, CommunicationPreference, CommunicationPreferenceValidator};
pub use contact_info::{ContactInfo, ContactInfoValidator};
pub use date_of_birth::{DateOfBirth, DateOfBirthValidator};
pub use dental_insurance::{DentalInsurance, DentalInsuranceValidator};
pub use mailing_address::{MailingAddress, MailingAddressValidator};
pub use marital_status::{MaritalStatus, MaritalStatusKind, MaritalStatusValidator};
pub use partner_information::{PartnerInformation, PartnerInformationValidator};
pub use renewal_confirmation::{RenewalConfirmation, RenewalConfirmationValidator};
pub use submit::{Submit, SubmitValidator};
pub use tax_filing::{TaxFiling, TaxFilingValidator};
