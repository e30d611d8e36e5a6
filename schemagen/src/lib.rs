//! schemagen - read-only database metadata access
//!
//! The runtime half of schemagen. It gives schema readers one narrow
//! capability, "execute a catalog query, get rows back", and keeps every
//! driver behind it:
//!
//! - **`MetadataSource`**: object-safe, read-only query capability
//! - **Derive Macros**: `#[derive(FromRow)]` maps catalog rows onto structs
//! - **Drivers**: MySQL (`mysql_async`), PostgreSQL and SQLite (`sqlx`), each
//!   behind a cargo feature
//! - **`CannedSource`**: scripted in-memory source for fixtures and tests
//!
//! # Example
//!
//! ```ignore
//! use schemagen::{FromRow, MetadataSource, Query};
//!
//! #[derive(FromRow)]
//! pub struct TableRow {
//!     pub table_name: String,
//!     pub table_type: String,
//! }
//!
//! async fn list_tables(source: &dyn MetadataSource) -> schemagen::Result<Vec<TableRow>> {
//!     Query::new("SELECT table_name, table_type FROM information_schema.tables")
//!         .fetch_all(source)
//!         .await
//! }
//! ```

pub mod canned;
pub mod error;
#[cfg(feature = "mysql")]
pub mod mysql;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod query;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod traits;
pub mod value;

// Re-export the derive macro
pub use schemagen_derive::FromRow;

// Re-export main types
pub use canned::CannedSource;
pub use error::{Error, Result};
#[cfg(feature = "mysql")]
pub use mysql::{MySqlSource, MySqlSourceBuilder};
#[cfg(feature = "postgres")]
pub use postgres::PgSource;
pub use query::Query;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteSource;
pub use traits::{FromRow, FromValue, MetadataRow, MetadataSource, MetadataSourceExt, Row, RowExt};
pub use value::Value;
