//! Core traits for schemagen

mod from_row;
mod from_value;
mod source;

pub use from_row::{FromRow, MetadataRow, Row, RowExt};
pub use from_value::FromValue;
pub use source::{MetadataSource, MetadataSourceExt};
