//! Backend collaborator traits.
//!
//! This layer never speaks a wire protocol itself. A backend plugs in by
//! implementing [`ConnectionFactory`] (bound to one connection string at
//! construction), [`Connection`], and [`RowCursor`]; the execution engine
//! drives them with fully compiled SQL text and pre-named arguments.

use crate::error::AccessResult;
use crate::row::Row;
use crate::value::Value;

/// One argument as handed to the backend: the dialect's parameter name for
/// its ordinal, plus the value.
///
/// Positional backends bind by index and may ignore `name` (which is then
/// the literal `?` for every argument).
#[derive(Debug, Clone, PartialEq)]
pub struct BoundArg {
    pub name: String,
    pub value: Value,
}

/// A single-use, forward-only result cursor.
///
/// `next_row` pulls one row at a time; after it returns `Ok(None)` the
/// cursor is exhausted and must keep returning `Ok(None)`.
#[async_trait::async_trait]
pub trait RowCursor: Send {
    async fn next_row(&mut self) -> AccessResult<Option<Row>>;
}

/// One backend connection, exclusively owned by a single in-flight operation.
#[async_trait::async_trait]
pub trait Connection: Send {
    /// Whether the connection is currently open.
    fn is_open(&self) -> bool;

    /// Open the connection. A no-op when already open.
    async fn open(&mut self) -> AccessResult<()>;

    /// Close the connection. Must be infallible and idempotent so it can run
    /// on every exit path, including drops.
    fn close(&mut self);

    /// Execute a statement and return the affected-row count.
    async fn execute(&mut self, text: &str, arguments: &[BoundArg]) -> AccessResult<u64>;

    /// Execute a query and return a cursor over its rows.
    ///
    /// The cursor must remain valid for as long as this connection stays
    /// open; closing the connection out from under it makes the next pull
    /// fail with an execution error.
    async fn query(
        &mut self,
        text: &str,
        arguments: &[BoundArg],
    ) -> AccessResult<Box<dyn RowCursor>>;
}

/// Creates connections for one configured backend.
///
/// The factory owns whatever a connection string is for its backend; this
/// layer never parses one, and never pools.
#[async_trait::async_trait]
pub trait ConnectionFactory: Send + Sync {
    async fn create_connection(&self) -> AccessResult<Box<dyn Connection>>;
}
