use crate::config::PersistenceConfig;
use crate::errors::{PersistenceError, Result};
use crate::schema;
use crate::schema::wizard_states::dsl;
use chrono::{Duration, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::result::Error as DieselError;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::{debug, info};
use std::sync::Arc;
use wizard_state::{StateStore, StoreError, StoreResult, WizardStateId};
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");
type DbPool = Pool<ConnectionManager<SqliteConnection>>;
type DbConn = PooledConnection<ConnectionManager<SqliteConnection>>;
/// `StateStore` sobre SQLite (Diesel + r2d2).
///
/// Cada estado es una fila `(id, payload, updated_at_ts)`. `set` reemplaza
/// la fila completa, así que la última escritura gana. Con TTL, las filas
/// cuya última escritura sea más antigua que el TTL no se devuelven y
/// `purge_expired` las borra.
pub struct DieselStateStore {
  pool: Arc<DbPool>,
  ttl: Option<Duration>,
}
#[derive(Debug, Queryable, Insertable)]
#[diesel(table_name = schema::wizard_states)]
struct StateRow {
  pub id: String,
  pub payload: String,
  pub updated_at_ts: i64,
}
fn map_db_err<T>(res: std::result::Result<T, DieselError>) -> StoreResult<T> {
  res.map_err(|e| StoreError::Other(format!("db: {}", e)))
}
impl DieselStateStore {
  /// Abre el pool, ajusta SQLite y aplica las migraciones pendientes.
  pub fn new(config: &PersistenceConfig) -> Result<Self> {
    let manager = ConnectionManager::<SqliteConnection>::new(&config.database_url);
    let pool = Pool::builder().max_size(config.pool_size).build(manager)?;
    let store = DieselStateStore { pool: Arc::new(pool), ttl: None };
    let mut c = store.conn()?;
    let _ = diesel::sql_query("PRAGMA journal_mode = WAL;").execute(&mut c);
    let _ = diesel::sql_query("PRAGMA busy_timeout = 5000;").execute(&mut c);
    let applied = c.run_pending_migrations(MIGRATIONS)
                   .map_err(|e| PersistenceError::Migration(e.to_string()))?;
    if !applied.is_empty() {
      info!("wizard-persistence: {} migraciones aplicadas", applied.len());
    }
    drop(c);
    Ok(store)
  }
  /// Registros más antiguos que `ttl` se tratan como inexistentes.
  pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
    self.ttl = ttl;
    self
  }
  pub fn ttl(&self) -> Option<Duration> {
    self.ttl
  }
  /// Número de filas, incluidas las expiradas aún no purgadas.
  pub fn count(&self) -> StoreResult<i64> {
    let mut conn = self.conn()?;
    map_db_err(dsl::wizard_states.count().get_result::<i64>(&mut conn))
  }
  fn conn(&self) -> StoreResult<DbConn> {
    self.pool.get().map_err(|e| StoreError::Unavailable(format!("pool: {}", e)))
  }
  // Marca temporal (ms) a partir de la cual una fila sigue viva.
  fn cutoff_ms(&self) -> Option<i64> {
    self.ttl.map(|ttl| (Utc::now() - ttl).timestamp_millis())
  }
}
impl StateStore for DieselStateStore {
  fn get(&self, id: &WizardStateId) -> StoreResult<Option<String>> {
    let mut conn = self.conn()?;
    let id_s = id.to_string();
    let row = map_db_err(dsl::wizard_states.filter(dsl::id.eq(&id_s)).first::<StateRow>(&mut conn).optional())?;
    let Some(row) = row else {
      return Ok(None);
    };
    if let Some(cutoff) = self.cutoff_ms() {
      if row.updated_at_ts <= cutoff {
        debug!("estado {} expirado, se elimina", id_s);
        map_db_err(diesel::delete(dsl::wizard_states.filter(dsl::id.eq(&id_s))).execute(&mut conn))?;
        return Ok(None);
      }
    }
    Ok(Some(row.payload))
  }
  fn set(&self, id: &WizardStateId, serialized: &str) -> StoreResult<()> {
    let mut conn = self.conn()?;
    let row = StateRow { id: id.to_string(),
                         payload: serialized.to_string(),
                         updated_at_ts: Utc::now().timestamp_millis() };
    map_db_err(diesel::replace_into(dsl::wizard_states).values(&row).execute(&mut conn))?;
    Ok(())
  }
  fn delete(&self, id: &WizardStateId) -> StoreResult<()> {
    let mut conn = self.conn()?;
    map_db_err(diesel::delete(dsl::wizard_states.filter(dsl::id.eq(id.to_string()))).execute(&mut conn))?;
    Ok(())
  }
  fn purge_expired(&self) -> StoreResult<usize> {
    let Some(cutoff) = self.cutoff_ms() else {
      return Ok(0);
    };
    let mut conn = self.conn()?;
    let n = map_db_err(diesel::delete(dsl::wizard_states.filter(dsl::updated_at_ts.le(cutoff))).execute(&mut conn))?;
    if n > 0 {
      info!("wizard-persistence: {} estados expirados purgados", n);
    }
    Ok(n)
  }
}
/// Construye el almacén a partir del entorno (`WIZARD_DB_URL` /
/// `DATABASE_URL`, `WIZARD_DB_POOL_SIZE`) con el TTL indicado.
pub fn new_from_env(ttl: Option<Duration>) -> Result<DieselStateStore> {
  let config = PersistenceConfig::from_env()?;
  Ok(DieselStateStore::new(&config)?.with_ttl(ttl))
}
