use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tipos de flujo que soporta el portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowType {
  /// Solicitud nueva.
  Apply,
  /// Renovación de un cliente existente.
  Renew,
}

impl FlowType {
  pub const ALL: [FlowType; 2] = [FlowType::Apply, FlowType::Renew];

  /// Clave del flujo tal como aparece en la URL y en la sesión.
  pub fn as_str(&self) -> &'static str {
    match self {
      FlowType::Apply => "apply",
      FlowType::Renew => "renew",
    }
  }
}

impl fmt::Display for FlowType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for FlowType {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "apply" => Ok(FlowType::Apply),
      "renew" => Ok(FlowType::Renew),
      other => Err(format!("tipo de flujo desconocido: {}", other)),
    }
  }
}
