// Archivo: merge.rs
// Propósito: aplicar un `StatePatch` sobre un `WizardState` sin mutar el
// original.
use crate::domain::{StatePatch, WizardState};

/// Devuelve un estado nuevo con el parche aplicado.
///
/// - Claves del parche con valor: sobrescriben.
/// - Claves del parche marcadas para borrar: desaparecen del estado.
/// - El resto de claves de `current` se conservan tal cual.
///
/// No toca marcas de tiempo; eso lo hace quien persiste.
pub fn merge_state(current: &WizardState, patch: &StatePatch) -> WizardState {
    let mut next = current.clone();
    for (key, value) in patch.fields.iter() {
        match value {
            Some(v) => {
                next.fields.insert(key.clone(), v.clone());
            }
            None => {
                next.fields.shift_remove(key);
            }
        }
    }
    if let Some(step) = &patch.current_step {
        next.current_step = Some(step.clone());
    }
    if let Some(edit_mode) = patch.edit_mode {
        next.edit_mode = edit_mode;
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Locale, StepData, WizardStateId};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Colour {
        name: String,
    }
    impl StepData for Colour {
        const STEP: &'static str = "colour";
        const KEY: &'static str = "colour";
    }

    #[test]
    fn removal_drops_key_and_keeps_others() {
        let base = WizardState::new(WizardStateId::new(), "test", Locale::En);
        let with_colour = merge_state(&base, &StatePatch::step(&Colour { name: "red".into() }).unwrap());
        assert!(with_colour.has::<Colour>());

        let removed = merge_state(&with_colour, &StatePatch::new().remove::<Colour>());
        assert!(!removed.has::<Colour>());
        assert!(with_colour.has::<Colour>());
    }

    #[test]
    fn step_marker_and_edit_mode_are_applied() {
        let base = WizardState::new(WizardStateId::new(), "test", Locale::Fr);
        let next = merge_state(&base, &StatePatch::new().at_step("colour").with_edit_mode(true));
        assert_eq!(next.current_step.as_deref(), Some("colour"));
        assert!(next.edit_mode);
        assert_eq!(next.fields.len(), 0);
    }
}
