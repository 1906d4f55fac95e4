use tracing::{error, warn};

use crate::error::{NeormError, Result};
use crate::schema::{Model, Schema};
use crate::session::{ExecResult, Session};

impl<'conn> Session<'conn> {
    /// Binds the schema of `M`, deriving it only if a different type (or none) is bound.
    pub fn model<M: Model>(&mut self) -> Result<&mut Self> {
        let cached = self.ref_table.as_ref().is_some_and(|t| t.is_model::<M>());
        if !cached {
            let dialect = self.dialect.as_deref().ok_or_else(|| {
                error!(model = M::NAME, "Dialect is not set");
                NeormError::DialectNotSet
            })?;
            self.ref_table = Some(Schema::parse::<M>(dialect)?);
        }
        Ok(self)
    }

    pub fn ref_table(&self) -> Result<&Schema> {
        self.ref_table.as_ref().ok_or_else(|| {
            error!("Model is not set");
            NeormError::ModelNotSet
        })
    }

    pub fn create_table(&mut self) -> Result<ExecResult> {
        let sql = create_table_sql(self.ref_table()?);
        self.raw(&sql, &[]).exec()
    }

    pub fn drop_table(&mut self) -> Result<ExecResult> {
        let sql = format!("DROP TABLE IF EXISTS {}", self.ref_table()?.name());
        self.raw(&sql, &[]).exec()
    }

    /// Asks the store's catalog whether the bound table exists.
    /// A failed lookup counts as absent.
    pub fn has_table(&mut self) -> Result<bool> {
        let name = self.ref_table()?.name().to_string();
        let dialect = self.dialect.clone().ok_or(NeormError::DialectNotSet)?;
        let (sql, values) = dialect.table_exist_sql(&name);
        let found = match self.raw(&sql, &values).query_row(|row| row.get::<_, String>(0)) {
            Ok(found) => found,
            Err(e) => {
                warn!(table = %name, error = %e, "table lookup failed");
                None
            }
        };
        Ok(found.as_deref() == Some(name.as_str()))
    }
}

pub(crate) fn create_table_sql(table: &Schema) -> String {
    let columns = table
        .fields()
        .iter()
        .map(|field| format!("{} {} {}", field.name, field.ty, field.tag))
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE {} ({})", table.name(), columns)
}
