//! The execution engine.
//!
//! [`Database`] ties the command builder to a backend: every top-level call
//! compiles (or expands) its SQL, opens exactly one connection, binds
//! arguments under the dialect's parameter names, executes, and closes the
//! connection before returning. Lazy streams carry their connection with
//! them and release it when drained or dropped.

use crate::builder::{Command, CommandBuilder};
use crate::connection::{BoundArg, Connection, ConnectionFactory};
use crate::dialect::Dialect;
use crate::error::{AccessError, AccessResult};
use crate::record::RecordLoad;
use crate::request::FetchRequest;
use crate::row::Row;
use crate::stream::{RecordStream, RowStream};
use crate::value::{FromValue, Value};
use std::sync::Arc;

/// The id column assumed by [`Database::update`].
pub const DEFAULT_ID_COLUMN: &str = "Id";

/// A dialect-bound database handle over a pluggable backend.
pub struct Database {
    factory: Arc<dyn ConnectionFactory>,
    builder: CommandBuilder,
}

impl Database {
    pub fn new(factory: Arc<dyn ConnectionFactory>, dialect: Dialect) -> Self {
        Self {
            factory,
            builder: CommandBuilder::new(dialect),
        }
    }

    pub fn dialect(&self) -> &Dialect {
        self.builder.dialect()
    }

    /// The command builder this engine compiles with.
    pub fn command_builder(&self) -> &CommandBuilder {
        &self.builder
    }

    /// Start a fetch request against `table`.
    ///
    /// # Example
    /// ```ignore
    /// let request = db
    ///     .from_table("Person")
    ///     .filter("Name = ?", ["Ada"])
    ///     .order_by("Birthdate", SortDirection::Descending);
    /// let people = db.fetch(&request).await?;
    /// ```
    pub fn from_table(&self, table: impl Into<String>) -> FetchRequest {
        FetchRequest::new(table)
    }

    /// Execute a statement and return the affected-row count.
    pub async fn execute_non_query(
        &self,
        text: &str,
        arguments: impl IntoIterator<Item = impl Into<Value>>,
    ) -> AccessResult<u64> {
        let command = self.builder.raw(text, arguments)?;
        self.run_non_query(command).await
    }

    /// Execute a query and stream its rows lazily.
    ///
    /// The stream holds a dedicated connection open until it is fully
    /// drained or dropped.
    pub async fn query(
        &self,
        text: &str,
        arguments: impl IntoIterator<Item = impl Into<Value>>,
    ) -> AccessResult<RowStream> {
        let command = self.builder.raw(text, arguments)?;
        self.run_query(command).await
    }

    /// Execute a query and buffer every row.
    pub async fn query_all(
        &self,
        text: &str,
        arguments: impl IntoIterator<Item = impl Into<Value>>,
    ) -> AccessResult<Vec<Row>> {
        let command = self.builder.raw(text, arguments)?;
        self.run_buffered(command, None).await
    }

    /// Execute a query and convert the first column of the first row to `T`.
    pub async fn execute_scalar<T: FromValue>(
        &self,
        text: &str,
        arguments: impl IntoIterator<Item = impl Into<Value>>,
    ) -> AccessResult<T> {
        let command = self.builder.raw(text, arguments)?;
        let rows = self.run_buffered(command, Some(1)).await?;
        let row = rows
            .first()
            .ok_or_else(|| AccessError::conversion("<no rows>", std::any::type_name::<T>()))?;
        row.get_at(0)
    }

    /// Compile a fetch request and stream its rows lazily.
    pub async fn fetch(&self, request: &FetchRequest) -> AccessResult<RowStream> {
        let command = self.builder.fetch(request)?;
        self.run_query(command).await
    }

    /// Compile a fetch request and materialize each row into a fresh `R`.
    pub async fn fetch_as<R: RecordLoad + Default>(
        &self,
        request: &FetchRequest,
    ) -> AccessResult<RecordStream<R>> {
        Ok(RecordStream::new(self.fetch(request).await?))
    }

    /// Insert one row built from a column→value mapping.
    ///
    /// Iteration order of the mapping determines column and placeholder
    /// order.
    pub async fn insert<K, V>(
        &self,
        table: &str,
        columns_and_values: impl IntoIterator<Item = (K, V)>,
    ) -> AccessResult<u64>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let command = self.builder.insert(table, columns_and_values)?;
        self.run_non_query(command).await
    }

    /// Update the row whose `Id` equals `id` with a column→value mapping.
    pub async fn update<K, V>(
        &self,
        table: &str,
        id: impl Into<Value>,
        columns_and_values: impl IntoIterator<Item = (K, V)>,
    ) -> AccessResult<u64>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.update_with_id_column(table, id, columns_and_values, DEFAULT_ID_COLUMN)
            .await
    }

    /// [`Database::update`] with an explicit id column.
    pub async fn update_with_id_column<K, V>(
        &self,
        table: &str,
        id: impl Into<Value>,
        columns_and_values: impl IntoIterator<Item = (K, V)>,
        id_column: &str,
    ) -> AccessResult<u64>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let command = self
            .builder
            .update(table, id, columns_and_values, id_column)?;
        self.run_non_query(command).await
    }

    fn bind(&self, arguments: &[Value]) -> Vec<BoundArg> {
        let style = self.dialect().param_style;
        arguments
            .iter()
            .enumerate()
            .map(|(index, value)| BoundArg {
                name: style.name(index),
                value: value.clone(),
            })
            .collect()
    }

    async fn open_connection(&self) -> AccessResult<Box<dyn Connection>> {
        let mut connection = self.factory.create_connection().await?;
        if !connection.is_open() {
            connection.open().await?;
        }
        Ok(connection)
    }

    async fn run_non_query(&self, command: Command) -> AccessResult<u64> {
        log_sql("execute", &command);
        let arguments = self.bind(&command.arguments);
        let mut connection = self.open_connection().await?;
        let result = connection.execute(&command.text, &arguments).await;
        connection.close();
        result
    }

    async fn run_query(&self, command: Command) -> AccessResult<RowStream> {
        log_sql("query", &command);
        let arguments = self.bind(&command.arguments);
        let mut connection = self.open_connection().await?;
        match connection.query(&command.text, &arguments).await {
            Ok(cursor) => Ok(RowStream::new(cursor, connection)),
            Err(e) => {
                connection.close();
                Err(e)
            }
        }
    }

    async fn run_buffered(
        &self,
        command: Command,
        limit: Option<usize>,
    ) -> AccessResult<Vec<Row>> {
        log_sql("query", &command);
        let arguments = self.bind(&command.arguments);
        let mut connection = self.open_connection().await?;
        let result = Self::drain(&mut *connection, &command.text, &arguments, limit).await;
        connection.close();
        result
    }

    async fn drain(
        connection: &mut dyn Connection,
        text: &str,
        arguments: &[BoundArg],
        limit: Option<usize>,
    ) -> AccessResult<Vec<Row>> {
        let mut cursor = connection.query(text, arguments).await?;
        let mut rows = Vec::new();
        while let Some(row) = cursor.next_row().await? {
            rows.push(row);
            if limit.is_some_and(|n| rows.len() >= n) {
                break;
            }
        }
        Ok(rows)
    }
}

fn log_sql(kind: &'static str, command: &Command) {
    tracing::debug!(
        target: "sqlbridge.sql",
        kind,
        param_count = command.arguments.len(),
        sql = %command.text,
    );
}
