// Archivo: messages.rs
// Propósito: catálogo bilingüe (en/fr) de los mensajes de validación que se
// muestran junto a cada campo del formulario.
use crate::domain::Locale;
use serde::{Deserialize, Serialize};

/// Código de error de campo. El texto final depende del `Locale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageCode {
    Required,
    TooLong,
    InvalidCharacters,
    InvalidPhone,
    InvalidEmail,
    EmailMismatch,
    InvalidPostalCode,
    InvalidSin,
    SinMatchesApplicant,
    InvalidDate,
    FutureDate,
    InvalidChoice,
    InvalidClientNumber,
    MustConfirm,
}

impl MessageCode {
    pub fn text(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => self.english(),
            Locale::Fr => self.french(),
        }
    }

    fn english(&self) -> &'static str {
        match self {
            MessageCode::Required => "This field is required.",
            MessageCode::TooLong => "This field is too long.",
            MessageCode::InvalidCharacters => "This field contains characters that are not allowed.",
            MessageCode::InvalidPhone => "Enter a valid 10-digit phone number.",
            MessageCode::InvalidEmail => "Enter a valid email address.",
            MessageCode::EmailMismatch => "The email addresses must match.",
            MessageCode::InvalidPostalCode => "Enter a valid postal code.",
            MessageCode::InvalidSin => "Enter a valid Social Insurance Number.",
            MessageCode::SinMatchesApplicant => "This Social Insurance Number is already used by the applicant.",
            MessageCode::InvalidDate => "Enter a valid date.",
            MessageCode::FutureDate => "The date cannot be in the future.",
            MessageCode::InvalidChoice => "Select one of the available options.",
            MessageCode::InvalidClientNumber => "Enter a valid 11-digit client number.",
            MessageCode::MustConfirm => "You must confirm to continue.",
        }
    }

    fn french(&self) -> &'static str {
        match self {
            MessageCode::Required => "Ce champ est obligatoire.",
            MessageCode::TooLong => "Ce champ est trop long.",
            MessageCode::InvalidCharacters => "Ce champ contient des caractères non autorisés.",
            MessageCode::InvalidPhone => "Entrez un numéro de téléphone valide à 10 chiffres.",
            MessageCode::InvalidEmail => "Entrez une adresse courriel valide.",
            MessageCode::EmailMismatch => "Les adresses courriel doivent correspondre.",
            MessageCode::InvalidPostalCode => "Entrez un code postal valide.",
            MessageCode::InvalidSin => "Entrez un numéro d'assurance sociale valide.",
            MessageCode::SinMatchesApplicant => "Ce numéro d'assurance sociale est déjà utilisé par le demandeur.",
            MessageCode::InvalidDate => "Entrez une date valide.",
            MessageCode::FutureDate => "La date ne peut pas être dans le futur.",
            MessageCode::InvalidChoice => "Sélectionnez l'une des options offertes.",
            MessageCode::InvalidClientNumber => "Entrez un numéro de client valide à 11 chiffres.",
            MessageCode::MustConfirm => "Vous devez confirmer pour continuer.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_code_has_distinct_english_and_french_text() {
        let codes = [MessageCode::Required,
                     MessageCode::TooLong,
                     MessageCode::InvalidCharacters,
                     MessageCode::InvalidPhone,
                     MessageCode::InvalidEmail,
                     MessageCode::EmailMismatch,
                     MessageCode::InvalidPostalCode,
                     MessageCode::InvalidSin,
                     MessageCode::SinMatchesApplicant,
                     MessageCode::InvalidDate,
                     MessageCode::FutureDate,
                     MessageCode::InvalidChoice,
                     MessageCode::InvalidClientNumber,
                     MessageCode::MustConfirm];
        for code in codes {
            assert!(!code.text(Locale::En).is_empty());
            assert_ne!(code.text(Locale::En), code.text(Locale::Fr), "{:?}", code);
        }
    }
}
