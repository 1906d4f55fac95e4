use std::sync::Arc;

use rusqlite::Connection;
use tracing::{error, info};

use crate::config::EngineConfig;
use crate::dialect::{Dialect, DialectRegistry, SQLITE3};
use crate::error::{NeormError, Result};
use crate::session::Session;

/// Owns the store connection and the dialect resolved for its driver.
pub struct Engine {
    conn: Connection,
    dialect: Option<Arc<dyn Dialect>>,
}

impl Engine {
    /// Opens and pings the store behind `driver`, then resolves its dialect.
    ///
    /// An unknown dialect is not fatal: the engine still runs raw statements,
    /// but sessions cannot derive schemas or check for tables.
    pub fn open(driver: &str, dsn: &str, registry: &DialectRegistry) -> Result<Engine> {
        if driver != SQLITE3 {
            error!(driver, "no store for driver");
            return Err(NeormError::UnsupportedDriver(driver.to_string()));
        }
        let conn = Connection::open(dsn).inspect_err(|e| error!(dsn, error = %e, "cannot open store"))?;
        conn.query_row("SELECT 1", [], |_| Ok(()))
            .inspect_err(|e| error!(dsn, error = %e, "cannot ping store"))?;
        let dialect = registry.get_dialect(driver);
        if dialect.is_none() {
            error!(driver, "dialect not found");
        }
        info!(driver, dsn, "connected to store");
        Ok(Engine { conn, dialect })
    }

    pub fn from_config(config: &EngineConfig, registry: &DialectRegistry) -> Result<Engine> {
        Self::open(&config.driver, &config.dsn, registry)
    }

    pub fn new_session(&self) -> Session<'_> {
        Session::new(&self.conn, self.dialect.clone())
    }

    pub fn dialect(&self) -> Option<&Arc<dyn Dialect>> {
        self.dialect.as_ref()
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn close(self) -> Result<()> {
        match self.conn.close() {
            Ok(()) => {
                info!("store closed");
                Ok(())
            }
            Err((_, e)) => {
                error!(error = %e, "failed to close store");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_opens_an_in_memory_store() {
        let engine = Engine::from_config(&EngineConfig::default(), &DialectRegistry::with_builtins()).unwrap();
        assert!(engine.dialect().is_some());
        let mut session = engine.new_session();
        let n = session.raw("SELECT 41 + 1", &[]).query_row(|r| r.get::<_, i64>(0)).unwrap();
        assert_eq!(n, Some(42));
    }
}
