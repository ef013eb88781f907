// Ejemplo: abre el almacén SQLite indicado en WIZARD_DB_URL (o un fichero
// temporal) y guarda / lee / purga un estado.
use chrono::Duration;
use std::error::Error;
use wizard_persistence::{DieselStateStore, PersistenceConfig};
use wizard_state::{Locale, StateStore, WizardState, WizardStateId};

fn main() -> Result<(), Box<dyn Error>> {
  let config = match PersistenceConfig::from_env() {
    Ok(c) => c,
    Err(_) => {
      let path = std::env::temp_dir().join("wizard_example.db");
      PersistenceConfig::new(path.to_string_lossy())
    }
  };
  println!("usando {}", config.database_url);
  let store = DieselStateStore::new(&config)?.with_ttl(Some(Duration::minutes(20)));

  let state = WizardState::new(WizardStateId::new(), "apply", Locale::Fr);
  store.set(&state.id, &serde_json::to_string(&state)?)?;
  println!("guardado: {:?}", store.get(&state.id)?);
  println!("filas: {}", store.count()?);
  println!("purgados: {}", store.purge_expired()?);
  store.delete(&state.id)?;
  Ok(())
}
