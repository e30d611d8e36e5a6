//! MySQL metadata source for schemagen

mod row;
mod source;
mod types;

pub use source::{MySqlSource, MySqlSourceBuilder};
