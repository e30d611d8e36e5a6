//! Per-table and per-column override declarations

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{ParseTypeError, PropertyType};

/// User overrides for one table, keyed by `schema.table` in the command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableOverride {
    /// Keep the table in the model but skip it during generation
    #[serde(default)]
    pub ignore: bool,

    /// Replacement class name
    #[serde(default)]
    pub class_name: Option<String>,

    /// Column overrides keyed by column name
    #[serde(default)]
    pub columns: BTreeMap<String, ColumnOverride>,
}

/// User overrides for one column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnOverride {
    #[serde(default)]
    pub ignore: bool,

    /// Treat date/time values as UTC; ignored for other types
    #[serde(default)]
    pub force_to_utc: bool,

    /// Raw SQL expression used in INSERT statements instead of a parameter
    #[serde(default)]
    pub insert_template: Option<String>,

    /// Raw SQL expression used in UPDATE statements instead of a parameter
    #[serde(default)]
    pub update_template: Option<String>,

    /// Replacement property name
    #[serde(default)]
    pub property_name: Option<String>,

    /// Replacement property type, e.g. `"i64"` or `"datetime?"`
    #[serde(default)]
    pub property_type: Option<String>,
}

/// `Some(trimmed)` unless the value is missing or blank.
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

impl TableOverride {
    pub fn class_name(&self) -> Option<&str> {
        non_blank(&self.class_name)
    }

    /// Find a column override by column name, ignoring case
    pub fn column(&self, name: &str) -> Option<&ColumnOverride> {
        self.columns
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }
}

impl ColumnOverride {
    pub fn property_name(&self) -> Option<&str> {
        non_blank(&self.property_name)
    }

    pub fn insert_template(&self) -> Option<&str> {
        non_blank(&self.insert_template)
    }

    pub fn update_template(&self) -> Option<&str> {
        non_blank(&self.update_template)
    }

    /// The parsed replacement type; a blank value counts as absent.
    pub fn property_type(&self) -> Result<Option<PropertyType>, ParseTypeError> {
        non_blank(&self.property_type)
            .map(str::parse)
            .transpose()
    }
}
