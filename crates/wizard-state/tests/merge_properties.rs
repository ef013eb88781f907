use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use wizard_state::{merge_state, Locale, StatePatch, StepData, WizardState, WizardStateId};

macro_rules! fragment {
  ($name:ident, $key:literal) => {
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct $name {
      v: i64,
    }
    impl StepData for $name {
      const STEP: &'static str = $key;
      const KEY: &'static str = $key;
    }
  };
}

fragment!(A, "a");
fragment!(B, "b");
fragment!(C, "c");
fragment!(D, "d");

const KEYS: [&str; 4] = ["a", "b", "c", "d"];

/// Aplica una operación (fijar o borrar) sobre la clave `idx`.
fn op(patch: StatePatch, idx: usize, value: Option<i64>) -> StatePatch {
  match (idx, value) {
    (0, Some(v)) => patch.set(&A { v }).unwrap(),
    (1, Some(v)) => patch.set(&B { v }).unwrap(),
    (2, Some(v)) => patch.set(&C { v }).unwrap(),
    (3, Some(v)) => patch.set(&D { v }).unwrap(),
    (0, None) => patch.remove::<A>(),
    (1, None) => patch.remove::<B>(),
    (2, None) => patch.remove::<C>(),
    _ => patch.remove::<D>(),
  }
}

fn build_patch(ops: &[(usize, Option<i64>)]) -> StatePatch {
  ops.iter().fold(StatePatch::new(), |p, (idx, v)| op(p, *idx, *v))
}

fn build_state(values: &[(usize, i64)]) -> WizardState {
  let base = WizardState::new(WizardStateId::new(), "apply", Locale::En);
  let patch = values.iter().fold(StatePatch::new(), |p, (idx, v)| op(p, *idx, Some(*v)));
  merge_state(&base, &patch)
}

proptest! {
  #[test]
  fn merge_preserves_untouched_keys_and_never_mutates_current(
    initial in prop::collection::vec((0usize..4, any::<i64>()), 0..6),
    ops in prop::collection::vec((0usize..4, prop::option::of(any::<i64>())), 0..6)
  ) {
    let current = build_state(&initial);
    let snapshot = current.clone();
    let patch = build_patch(&ops);
    let merged = merge_state(&current, &patch);

    prop_assert_eq!(&current, &snapshot);
    let touched: Vec<&str> = patch.keys().collect();
    for key in KEYS.iter().filter(|k| !touched.contains(*k)) {
      prop_assert_eq!(merged.fields.get(*key), current.fields.get(*key));
    }
    for (idx, value) in ops.iter().rev().fold(Vec::<(usize, Option<i64>)>::new(), |mut acc, (i, v)| {
      if !acc.iter().any(|(j, _)| j == i) { acc.push((*i, *v)); }
      acc
    }) {
      match value {
        Some(v) => prop_assert_eq!(merged.fields.get(KEYS[idx]).cloned(), Some(serde_json::json!({"v": v}))),
        None => prop_assert!(!merged.fields.contains_key(KEYS[idx])),
      }
    }
  }

  #[test]
  fn disjoint_patches_compose(
    initial in prop::collection::vec((0usize..4, any::<i64>()), 0..6),
    ops1 in prop::collection::vec((0usize..2, prop::option::of(any::<i64>())), 0..4),
    ops2 in prop::collection::vec((2usize..4, prop::option::of(any::<i64>())), 0..4)
  ) {
    let s = build_state(&initial);
    let p1 = build_patch(&ops1);
    let p2 = build_patch(&ops2);
    let stepwise = merge_state(&merge_state(&s, &p1), &p2);
    let combined = merge_state(&s, &p1.clone().union(p2.clone()));
    prop_assert_eq!(stepwise, combined);
  }
}
