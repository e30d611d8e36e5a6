//! Run configuration

pub mod defaults;
mod overrides;
mod settings;

pub use overrides::{ColumnOverride, TableOverride};
pub use settings::GenerateCommand;
