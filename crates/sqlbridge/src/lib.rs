//! # sqlbridge
//!
//! A dialect-agnostic SQL access layer.
//!
//! ## Features
//!
//! - **Parameterized compilation**: fetch requests and ad-hoc `?`-marker
//!   text compile to dialect-correct SQL plus a flat, position-aligned
//!   argument list
//! - **Pluggable backends**: one async [`ConnectionFactory`] per backend;
//!   this layer never parses connection strings, pools, or speaks a wire
//!   protocol
//! - **Lazy results**: rows stream back pull-based; the stream owns its
//!   connection and releases it on every exit path
//! - **Dirty-tracking records**: loaded values and caller modifications live
//!   in separate overlays, so "what changed" stays queryable until
//!   re-persisted
//!
//! ## Example
//!
//! ```ignore
//! use sqlbridge::{Database, Dialect, SortDirection};
//! use futures_util::TryStreamExt;
//!
//! let db = Database::new(backend, Dialect::sqlite());
//!
//! let request = db
//!     .from_table("Person")
//!     .filter("Surname = ?", ["Lovelace"])
//!     .order_by("Birthdate", SortDirection::Descending);
//!
//! let people: Vec<sqlbridge::Record> = db.fetch_as(&request).await?.try_collect().await?;
//!
//! db.insert("Person", [("Name", "Ada"), ("Surname", "Lovelace")]).await?;
//! db.update("Person", 7i64, [("Gender", 2i64)]).await?;
//! ```

pub mod builder;
pub mod connection;
pub mod database;
pub mod dialect;
pub mod error;
pub mod expand;
pub mod record;
pub mod request;
pub mod row;
pub mod stream;
pub mod value;

pub use builder::{Command, CommandBuilder};
pub use connection::{BoundArg, Connection, ConnectionFactory, RowCursor};
pub use database::{Database, DEFAULT_ID_COLUMN};
pub use dialect::{Dialect, ParamStyle, QuoteStyle};
pub use error::{AccessError, AccessResult};
pub use expand::expand_text;
pub use record::{Record, RecordLoad};
pub use request::{FetchRequest, OrderClause, Predicate, SortDirection};
pub use row::{Row, RowRead};
pub use stream::{RecordStream, RowStream};
pub use value::{FromValue, Value};
