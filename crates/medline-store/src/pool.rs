//! Connection pooling: `diesel` + `r2d2`, one pool shared read-only across
//! workers, each worker checking out its own connection per file.

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::error::Error;

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Build a connection pool for `database_url`, sized to `max_size` connections
/// (one per worker is the common case — see `PMPG_PROCESSES`).
pub fn build_pool(database_url: &str, max_size: u32) -> Result<PgPool, Error> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(Error::Pool)
}

/// Run pending migrations against `database_url`. Called once by the driver
/// before any worker starts.
pub fn run_migrations(pool: &PgPool) -> Result<(), Error> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)
        .map(|_| ())
        .map_err(Error::Migration)
}

/// Drop every table the embedded migrations created and recreate them from
/// scratch. Driven by `PMPG_CLEAN`, run before [`run_migrations`] so a clean
/// ingest always starts from an empty schema.
pub fn reset_database(pool: &PgPool) -> Result<(), Error> {
    let mut conn = pool.get()?;
    conn.revert_all_migrations(MIGRATIONS).map_err(Error::Migration)?;
    conn.run_pending_migrations(MIGRATIONS).map(|_| ()).map_err(Error::Migration)
}
