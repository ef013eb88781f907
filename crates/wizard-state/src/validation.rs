// Archivo: validation.rs
// Propósito: contrato `Validator<T>` para convertir el formulario crudo de un
// paso en un fragmento tipado, más el lector `FormReader` con las reglas de
// campo compartidas por todos los pasos.
//
// La validación es pura: no lee almacenes ni el reloj salvo a través de los
// parámetros que recibe, y nunca falla con error ante entrada del usuario.
use crate::domain::Locale;
use crate::messages::MessageCode;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Formulario crudo tal como llega del navegador (campo -> valor).
pub type FormData = BTreeMap<String, String>;

/// Construye un `FormData` a partir de pares; útil en handlers y pruebas.
pub fn form(pairs: &[(&str, &str)]) -> FormData {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

/// Error de un campo: código estable + texto localizado.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub code: MessageCode,
    pub message: String,
}

/// Errores por campo, uno como máximo por campo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra un error; si el campo ya tenía uno, se conserva el primero.
    pub fn add(&mut self, field: &str, code: MessageCode, locale: Locale) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| FieldError { code, message: code.text(locale).to_string() });
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn message(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(|e| e.message.as_str())
    }

    pub fn code(&self, field: &str) -> Option<MessageCode> {
        self.0.get(field).map(|e| e.code)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    /// Vista `campo -> mensaje` para volver a pintar el formulario.
    pub fn into_messages(self) -> BTreeMap<String, String> {
        self.0.into_iter().map(|(k, e)| (k, e.message)).collect()
    }
}

/// Resultado de validar un paso.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult<T> {
    Valid(T),
    Invalid(FieldErrors),
}

impl<T> ValidationResult<T> {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid(_))
    }

    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            ValidationResult::Valid(_) => None,
            ValidationResult::Invalid(e) => Some(e),
        }
    }

    pub fn into_result(self) -> std::result::Result<T, FieldErrors> {
        match self {
            ValidationResult::Valid(t) => Ok(t),
            ValidationResult::Invalid(e) => Err(e),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ValidationResult<U> {
        match self {
            ValidationResult::Valid(t) => ValidationResult::Valid(f(t)),
            ValidationResult::Invalid(e) => ValidationResult::Invalid(e),
        }
    }
}

/// Estrategia de validación de un paso: de formulario crudo a fragmento `T`.
///
/// Debe ser determinista: misma entrada y mismo `locale` producen el mismo
/// resultado.
pub trait Validator<T>: Send + Sync {
    fn validate(&self, raw: &FormData, locale: Locale) -> ValidationResult<T>;
}

static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\p{L}[\p{L} '.\-]*$").expect("regex de nombre"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("regex de correo"));
static POSTAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ABCEGHJ-NPRSTVXY]\d[ABCEGHJ-NPRSTV-Z]\d[ABCEGHJ-NPRSTV-Z]\d$").expect("regex de código postal")
});

/// Longitud máxima por defecto de los campos de texto libre.
pub const MAX_TEXT_LEN: usize = 100;

/// Normaliza un teléfono norteamericano a 10 dígitos. Acepta separadores y
/// el prefijo `1`.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let has_junk = raw.chars().any(|c| !(c.is_ascii_digit() || " ()-.+".contains(c)));
    if has_junk {
        return None;
    }
    let digits = match digits.len() {
        10 => digits,
        11 if digits.starts_with('1') => digits[1..].to_string(),
        _ => return None,
    };
    // el código de área no empieza por 0 ni 1
    match digits.chars().next() {
        Some('0') | Some('1') => None,
        _ => Some(digits),
    }
}

/// Normaliza un código postal canadiense a `A1A 1A1`.
pub fn normalize_postal_code(raw: &str) -> Option<String> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_uppercase();
    if POSTAL_RE.is_match(&compact) {
        Some(format!("{} {}", &compact[..3], &compact[3..]))
    } else {
        None
    }
}

/// Normaliza un NAS (9 dígitos) y comprueba el dígito de control (Luhn).
pub fn normalize_sin(raw: &str) -> Option<String> {
    let compact: String = raw.chars().filter(|c| !(c.is_whitespace() || *c == '-')).collect();
    if compact.len() != 9 || !compact.chars().all(|c| c.is_ascii_digit()) || compact == "000000000" {
        return None;
    }
    let sum: u32 = compact.chars()
                          .filter_map(|c| c.to_digit(10))
                          .enumerate()
                          .map(|(i, d)| {
                              if i % 2 == 1 {
                                  let dd = d * 2;
                                  if dd > 9 {
                                      dd - 9
                                  } else {
                                      dd
                                  }
                              } else {
                                  d
                              }
                          })
                          .sum();
    if sum % 10 == 0 {
        Some(compact)
    } else {
        None
    }
}

/// Lector de formulario que acumula errores por campo.
///
/// Cada método devuelve `Some` si el campo es válido (o `None` si es
/// opcional y vino vacío) y registra un error si no lo es. Al final,
/// `finish` produce el `ValidationResult`.
pub struct FormReader<'a> {
    raw: &'a FormData,
    locale: Locale,
    errors: FieldErrors,
}

impl<'a> FormReader<'a> {
    pub fn new(raw: &'a FormData, locale: Locale) -> Self {
        Self { raw, locale, errors: FieldErrors::new() }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Registra un error manual (reglas que cruzan campos).
    pub fn fail(&mut self, field: &str, code: MessageCode) {
        self.errors.add(field, code, self.locale);
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains(field)
    }

    /// Valor recortado; vacío cuenta como ausente.
    fn value(&self, field: &str) -> Option<&'a str> {
        self.raw.get(field).map(|v| v.trim()).filter(|v| !v.is_empty())
    }

    fn required_value(&mut self, field: &str) -> Option<&'a str> {
        let v = self.value(field);
        if v.is_none() {
            self.fail(field, MessageCode::Required);
        }
        v
    }

    pub fn optional_text(&mut self, field: &str, max_len: usize) -> Option<String> {
        let v = self.value(field)?;
        if v.chars().count() > max_len {
            self.fail(field, MessageCode::TooLong);
            return None;
        }
        Some(v.to_string())
    }

    pub fn required_text(&mut self, field: &str, max_len: usize) -> Option<String> {
        self.required_value(field)?;
        self.optional_text(field, max_len)
    }

    /// Nombre o apellido: letras (con acentos), espacios, apóstrofos,
    /// guiones y puntos.
    pub fn name(&mut self, field: &str) -> Option<String> {
        let v = self.required_text(field, MAX_TEXT_LEN)?;
        if NAME_RE.is_match(&v) {
            Some(v)
        } else {
            self.fail(field, MessageCode::InvalidCharacters);
            None
        }
    }

    pub fn phone(&mut self, field: &str, required: bool) -> Option<String> {
        let v = if required { self.required_value(field)? } else { self.value(field)? };
        let normalized = normalize_phone(v);
        if normalized.is_none() {
            self.fail(field, MessageCode::InvalidPhone);
        }
        normalized
    }

    pub fn email(&mut self, field: &str, required: bool) -> Option<String> {
        let v = if required { self.required_value(field)? } else { self.value(field)? };
        if v.chars().count() > 64 * 4 || !EMAIL_RE.is_match(v) {
            self.fail(field, MessageCode::InvalidEmail);
            return None;
        }
        Some(v.to_lowercase())
    }

    /// Confirma que `field` repite `email` (sin distinguir mayúsculas).
    pub fn confirm_email(&mut self, field: &str, email: Option<&str>) {
        let Some(expected) = email else {
            return;
        };
        match self.value(field) {
            None => self.fail(field, MessageCode::Required),
            Some(v) if v.to_lowercase() != expected => self.fail(field, MessageCode::EmailMismatch),
            Some(_) => {}
        }
    }

    pub fn postal_code(&mut self, field: &str, required: bool) -> Option<String> {
        let v = if required { self.required_value(field)? } else { self.value(field)? };
        let normalized = normalize_postal_code(v);
        if normalized.is_none() {
            self.fail(field, MessageCode::InvalidPostalCode);
        }
        normalized
    }

    pub fn sin(&mut self, field: &str) -> Option<String> {
        let v = self.required_value(field)?;
        let normalized = normalize_sin(v);
        if normalized.is_none() {
            self.fail(field, MessageCode::InvalidSin);
        }
        normalized
    }

    /// Exactamente `len` dígitos (números de cliente, etc.).
    pub fn digits(&mut self, field: &str, len: usize, code: MessageCode) -> Option<String> {
        let v = self.required_value(field)?;
        let compact: String = v.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.len() == len && compact.chars().all(|c| c.is_ascii_digit()) {
            Some(compact)
        } else {
            self.fail(field, code);
            None
        }
    }

    /// Fecha en tres campos (`{prefix}Year`, `{prefix}Month`, `{prefix}Day`)
    /// que no puede ser posterior a `today`. El error se registra bajo
    /// `prefix`.
    pub fn past_date(&mut self, prefix: &str, today: NaiveDate) -> Option<NaiveDate> {
        let year = self.value(&format!("{}Year", prefix));
        let month = self.value(&format!("{}Month", prefix));
        let day = self.value(&format!("{}Day", prefix));
        let (Some(year), Some(month), Some(day)) = (year, month, day) else {
            self.fail(prefix, MessageCode::Required);
            return None;
        };
        let parsed = match (year.parse::<i32>(), month.parse::<u32>(), day.parse::<u32>()) {
            (Ok(y), Ok(m), Ok(d)) if y >= 1900 => NaiveDate::from_ymd_opt(y, m, d),
            _ => None,
        };
        match parsed {
            None => {
                self.fail(prefix, MessageCode::InvalidDate);
                None
            }
            Some(date) if date > today => {
                self.fail(prefix, MessageCode::FutureDate);
                None
            }
            Some(date) => Some(date),
        }
    }

    /// Opción de una lista cerrada (radio o select).
    pub fn choice<E: FromStr>(&mut self, field: &str) -> Option<E> {
        let v = self.required_value(field)?;
        match v.parse::<E>() {
            Ok(e) => Some(e),
            Err(_) => {
                self.fail(field, MessageCode::InvalidChoice);
                None
            }
        }
    }

    /// Radio sí/no (`yes`/`no`, también `true`/`false`).
    pub fn yes_no(&mut self, field: &str) -> Option<bool> {
        let v = self.required_value(field)?;
        match v.to_lowercase().as_str() {
            "yes" | "true" | "oui" => Some(true),
            "no" | "false" | "non" => Some(false),
            _ => {
                self.fail(field, MessageCode::InvalidChoice);
                None
            }
        }
    }

    /// Casilla obligatoria. Devuelve `true` sólo si se marcó.
    pub fn confirmed(&mut self, field: &str) -> bool {
        let checked = matches!(self.value(field).map(|v| v.to_lowercase()).as_deref(),
                               Some("yes") | Some("on") | Some("true"));
        if !checked {
            self.fail(field, MessageCode::MustConfirm);
        }
        checked
    }

    /// Cierra la lectura. `build` sólo se invoca si no hubo errores; si aun
    /// así devuelve `None` el formulario se marca inválido en `_form`.
    pub fn finish<T>(mut self, build: impl FnOnce() -> Option<T>) -> ValidationResult<T> {
        if !self.errors.is_empty() {
            return ValidationResult::Invalid(self.errors);
        }
        match build() {
            Some(t) => ValidationResult::Valid(t),
            None => {
                self.fail("_form", MessageCode::Required);
                ValidationResult::Invalid(self.errors)
            }
        }
    }
}
