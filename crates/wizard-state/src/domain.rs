// Archivo: domain.rs
// Propósito: tipos del dominio del asistente: identificador opaco del
// estado, idioma activo, estado acumulado (`WizardState`), parches por paso
// (`StatePatch`) y el trait `StepData` que tipa cada fragmento.
use crate::errors::{Result, WizardError};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identificador opaco de una instancia de flujo. Viaja en la URL y se
/// contrasta con el que guarda la sesión.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WizardStateId(Uuid);

impl WizardStateId {
    /// Genera un id nuevo (UUID v4).
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Interpreta el segmento de URL. Cualquier texto que no sea un UUID
    /// devuelve `None`; el cargador lo trata igual que un id desconocido.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for WizardStateId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WizardStateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WizardStateId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Idioma del usuario. Decide el texto de los mensajes de validación.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Fr,
}

impl Locale {
    /// Acepta `en`, `fr` y variantes regionales (`fr-CA`, `en_CA`).
    pub fn parse(raw: &str) -> Option<Self> {
        let lower = raw.trim().to_lowercase();
        match lower.split(|c| c == '-' || c == '_').next() {
            Some("en") => Some(Locale::En),
            Some("fr") => Some(Locale::Fr),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Fr => "fr",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fragmento tipado y validado que produce un paso del asistente.
///
/// `STEP` es el nombre del paso (segmento de URL, por ejemplo
/// `marital-status`) y `KEY` la clave bajo la que se guarda el fragmento en
/// el estado (por ejemplo `maritalStatus`).
pub trait StepData: Serialize + DeserializeOwned {
    const STEP: &'static str;
    const KEY: &'static str;
}

/// Estado acumulado de una instancia de flujo.
///
/// Invariante: `fields` sólo contiene fragmentos de pasos visitados y cada
/// fragmento proviene de un validador; nunca se rellenan pasos con `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardState {
    pub id: WizardStateId,
    /// Tipo de flujo (`apply`, `renew`, ...).
    pub flow: String,
    pub locale: Locale,
    /// Último paso guardado.
    #[serde(default)]
    pub current_step: Option<String>,
    /// El usuario volvió desde la revisión para editar un paso.
    #[serde(default)]
    pub edit_mode: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub fields: IndexMap<String, JsonValue>,
}

impl WizardState {
    /// Estado vacío para un flujo recién iniciado.
    pub fn new(id: WizardStateId, flow: &str, locale: Locale) -> Self {
        let now = Utc::now();
        Self { id,
               flow: flow.to_string(),
               locale,
               current_step: None,
               edit_mode: false,
               created_at: now,
               updated_at: now,
               fields: IndexMap::new() }
    }

    /// Indica si el fragmento del paso `T` ya está en el estado.
    pub fn has<T: StepData>(&self) -> bool {
        self.fields.contains_key(T::KEY)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Rehidrata el fragmento del paso `T`. `Ok(None)` si el paso no se ha
    /// visitado.
    pub fn get<T: StepData>(&self) -> Result<Option<T>> {
        match self.fields.get(T::KEY) {
            Some(v) => Ok(Some(serde_json::from_value(v.clone())?)),
            None => Ok(None),
        }
    }

    /// Igual que `get` pero un paso ausente es `IncompleteState`.
    pub fn require<T: StepData>(&self) -> Result<T> {
        self.get::<T>()?
            .ok_or_else(|| WizardError::IncompleteState { step: T::STEP.to_string() })
    }
}

/// Actualización parcial del estado.
///
/// Cada entrada fija un fragmento (`Some`) o lo elimina (`None`). Sólo se
/// construye a partir de tipos `StepData`, es decir, de salidas de
/// validadores.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatePatch {
    pub(crate) fields: IndexMap<String, Option<JsonValue>>,
    pub(crate) current_step: Option<String>,
    pub(crate) edit_mode: Option<bool>,
}

impl StatePatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parche con el fragmento de un único paso.
    pub fn step<T: StepData>(data: &T) -> Result<Self> {
        Self::new().set(data)
    }

    /// Fija el fragmento de `T`.
    pub fn set<T: StepData>(mut self, data: &T) -> Result<Self> {
        self.fields.insert(T::KEY.to_string(), Some(serde_json::to_value(data)?));
        Ok(self)
    }

    /// Elimina el fragmento de `T` (paso que deja de aplicar).
    pub fn remove<T: StepData>(mut self) -> Self {
        self.fields.insert(T::KEY.to_string(), None);
        self
    }

    /// Marca el paso actual.
    pub fn at_step(mut self, step: &str) -> Self {
        self.current_step = Some(step.to_string());
        self
    }

    pub fn with_edit_mode(mut self, edit_mode: bool) -> Self {
        self.edit_mode = Some(edit_mode);
        self
    }

    /// Une dos parches; ante claves repetidas gana `other`.
    pub fn union(mut self, other: StatePatch) -> Self {
        for (k, v) in other.fields {
            self.fields.insert(k, v);
        }
        if other.current_step.is_some() {
            self.current_step = other.current_step;
        }
        if other.edit_mode.is_some() {
            self.edit_mode = other.edit_mode;
        }
        self
    }

    /// Claves de estado que toca el parche.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|k| k.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.current_step.is_none() && self.edit_mode.is_none()
    }
}
