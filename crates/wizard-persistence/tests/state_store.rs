use chrono::Duration;
use std::sync::Arc;
use uuid::Uuid;
use wizard_persistence::{DieselStateStore, PersistenceConfig};
use wizard_state::stubs::InMemorySession;
use wizard_state::{StatePatch, StateStore, WizardConfig, WizardEngine, WizardError, WizardStateId};

// Base SQLite temporal en disco, una por test.
fn temp_store() -> DieselStateStore {
  let tmp_path = std::env::temp_dir().join(format!("wizard_test_{}.db", Uuid::new_v4()));
  let config = PersistenceConfig::new(tmp_path.to_str().unwrap());
  DieselStateStore::new(&config).expect("no se pudo abrir el almacén")
}

#[test]
fn set_get_replace_delete() {
  let store = temp_store();
  let id = WizardStateId::new();
  assert_eq!(store.get(&id).unwrap(), None);

  store.set(&id, r#"{"v":1}"#).unwrap();
  store.set(&id, r#"{"v":2}"#).unwrap();
  assert_eq!(store.get(&id).unwrap().as_deref(), Some(r#"{"v":2}"#));
  assert_eq!(store.count().unwrap(), 1);

  store.delete(&id).unwrap();
  store.delete(&id).unwrap();
  assert_eq!(store.get(&id).unwrap(), None);
}

#[test]
fn expired_rows_are_hidden_and_purged() {
  let store = temp_store().with_ttl(Some(Duration::zero()));
  let a = WizardStateId::new();
  let b = WizardStateId::new();
  store.set(&a, "{}").unwrap();
  store.set(&b, "{}").unwrap();
  assert_eq!(store.get(&a).unwrap(), None);
  assert_eq!(store.count().unwrap(), 1);
  assert_eq!(store.purge_expired().unwrap(), 1);
  assert_eq!(store.count().unwrap(), 0);

  let fresh = temp_store().with_ttl(Some(Duration::hours(1)));
  fresh.set(&a, "{}").unwrap();
  assert_eq!(fresh.purge_expired().unwrap(), 0);
  assert!(fresh.get(&a).unwrap().is_some());
}

#[test]
fn engine_runs_on_sqlite() {
  let engine = WizardEngine::new(Arc::new(temp_store()), WizardConfig::default());
  let session = InMemorySession::new();
  let state = engine.start_flow(&session, "renew", None).unwrap();
  let id = state.id.to_string();

  let saved = engine.save_state(&session, "renew", &id, &StatePatch::new().with_edit_mode(true)).unwrap();
  assert!(saved.edit_mode);
  let loaded = engine.load_state(&session, "renew", &id).unwrap();
  assert_eq!(loaded.id, state.id);
  assert!(loaded.edit_mode);

  engine.clear_state(&session, "renew", &state.id).unwrap();
  assert!(matches!(engine.load_state(&session, "renew", &id), Err(WizardError::StateNotFound)));
  assert_eq!(engine.store().count().unwrap(), 0);
}
