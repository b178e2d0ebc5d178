#[macro_use]
extern crate diesel;

use anyhow::Result as Fallible;
use diesel::{
    connection::SimpleConnection as _,
    r2d2::{self, CustomizeConnection},
    sqlite::SqliteConnection,
    Connection as _,
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use revmod_core::usecases as uc;
use std::{
    cell::{RefCell, RefMut},
    ops::Deref,
    sync::Arc,
    time::Duration,
};

mod models;
mod repo_impl;
mod schema;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

type Manager = r2d2::ConnectionManager<SqliteConnection>;
type Pool = r2d2::Pool<Manager>;
type Pooled = r2d2::PooledConnection<Manager>;

/// Checks out a connection while the pool guard `G` is held.
fn checkout<G>(guard: G, access: &str) -> Fallible<(G, RefCell<Pooled>)>
where
    G: Deref<Target = Pool>,
{
    let pooled = guard.get();
    match pooled {
        Ok(conn) => Ok((guard, RefCell::new(conn))),
        Err(err) => {
            log::error!("No pooled database connection available for {access} access: {err}");
            Err(err.into())
        }
    }
}

/// Read access that may run concurrently with other readers.
pub struct DbReadOnly<'a> {
    _guard: RwLockReadGuard<'a, Pool>,
    conn: RefCell<Pooled>,
}

/// The single writer.
pub struct DbReadWrite<'a> {
    _guard: RwLockWriteGuard<'a, Pool>,
    conn: RefCell<Pooled>,
}

/// Borrowed connection of a running transaction.
pub struct DbConnection<'a> {
    conn: RefCell<&'a mut SqliteConnection>,
}

impl<'a> DbReadOnly<'a> {
    fn try_new(pool: &'a RwLock<Pool>) -> Fallible<Self> {
        let (_guard, conn) = checkout(pool.read(), "shared")?;
        Ok(Self { _guard, conn })
    }
}

impl<'a> DbConnection<'a> {
    fn new(conn: &'a mut SqliteConnection) -> Self {
        Self {
            conn: RefCell::new(conn),
        }
    }
}

impl<'a> DbReadWrite<'a> {
    fn try_new(pool: &'a RwLock<Pool>) -> Fallible<Self> {
        let (_guard, conn) = checkout(pool.write(), "exclusive")?;
        Ok(Self { _guard, conn })
    }

    /// Commits if `f` succeeds, otherwise nothing `f` wrote survives.
    ///
    /// The transaction takes the write lock of the database file
    /// when it begins (`BEGIN IMMEDIATE`). Other processes
    /// sharing the file wait up to the busy timeout instead of
    /// failing when upgrading a read lock on their first write.
    /// The error returned by `f` is passed through unchanged.
    pub fn transaction<T, F, E>(&mut self, f: F) -> Result<T, uc::Error>
    where
        F: FnOnce(&DbConnection) -> Result<T, E>,
        E: Into<uc::Error>,
    {
        let mut failed: Option<uc::Error> = None;
        let outcome = self.conn.get_mut().immediate_transaction(|conn| {
            f(&DbConnection::new(conn)).map_err(|err| {
                failed = Some(err.into());
                diesel::result::Error::RollbackTransaction
            })
        });
        outcome.map_err(|err| match failed {
            Some(usecase_error) => usecase_error,
            None => uc::Error::Repo(repo_impl::from_diesel_err(err)),
        })
    }

    fn sqlite_conn(&self) -> RefMut<Pooled> {
        self.conn.borrow_mut()
    }
}

/// Pool of SQLite connections.
///
/// Readers share the pool, a writer locks it exclusively. SQLite
/// allows only one writer anyway and serializing them here avoids
/// `SQLITE_BUSY` errors in the middle of a transaction.
/// Callers that also hold a review lock must acquire it first.
#[derive(Clone)]
pub struct Connections {
    pool: Arc<RwLock<Pool>>,
}

impl std::fmt::Debug for Connections {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connections").finish_non_exhaustive()
    }
}

/// Applied to every new connection of the pool.
///
/// Deleting a review relies on enforced foreign keys
/// for removing its votes.
#[derive(Debug, Clone, Copy)]
struct SessionSettings {
    busy_timeout: Duration,
}

impl SessionSettings {
    fn pragmas(&self) -> String {
        format!(
            "PRAGMA journal_mode = WAL;\n\
             PRAGMA synchronous = NORMAL;\n\
             PRAGMA busy_timeout = {};\n\
             PRAGMA foreign_keys = ON;\n\
             PRAGMA encoding = 'UTF-8';",
            self.busy_timeout.as_millis()
        )
    }
}

impl CustomizeConnection<SqliteConnection, r2d2::Error> for SessionSettings {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute(&self.pragmas())
            .map_err(r2d2::Error::QueryError)
    }
}

impl Connections {
    /// `connection_timeout` limits the wait for a pooled connection
    /// as well as the wait for locks held by other processes.
    pub fn init(url: &str, pool_size: u32, connection_timeout: Duration) -> Fallible<Self> {
        // r2d2 keeps retrying an unusable database until the timeout
        // expires, so check it once up front. This also creates a
        // missing database file.
        SqliteConnection::establish(url)?;
        let pool = Pool::builder()
            .max_size(pool_size)
            .connection_timeout(connection_timeout)
            .connection_customizer(Box::new(SessionSettings {
                busy_timeout: connection_timeout,
            }))
            .build(Manager::new(url))?;
        Ok(Self {
            pool: Arc::new(RwLock::new(pool)),
        })
    }

    pub fn shared(&self) -> Fallible<DbReadOnly> {
        DbReadOnly::try_new(&self.pool)
    }

    pub fn exclusive(&self) -> Fallible<DbReadWrite> {
        DbReadWrite::try_new(&self.pool)
    }
}

pub fn run_embedded_database_migrations(conn: DbReadWrite<'_>) -> Fallible<()> {
    let mut sqlite_conn = conn.sqlite_conn();
    let applied = (&mut **sqlite_conn)
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| anyhow::anyhow!("Failed to run database migrations: {err}"))?;
    if applied.is_empty() {
        log::debug!("Database schema is up to date");
    }
    for version in applied {
        log::info!("Applied database migration {version}");
    }
    Ok(())
}

#[cfg(test)]
mod tests;
