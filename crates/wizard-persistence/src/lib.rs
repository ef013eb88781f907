//! Persistencia SQL para el estado del asistente.
//! Expone el módulo `schema` y el almacén Diesel (SQLite) que implementa
//! `wizard_state::StateStore`. Las migraciones viven en `./migrations` y se
//! aplican al abrir el almacén.

mod config;
mod errors;
pub mod schema;
mod state_store;

pub use config::{PersistenceConfig, DEFAULT_POOL_SIZE, ENV_DATABASE_URL, ENV_DB_URL, ENV_POOL_SIZE};
pub use errors::PersistenceError;
pub use state_store::{new_from_env, DieselStateStore, MIGRATIONS};
