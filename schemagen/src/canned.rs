//! Scripted in-memory metadata source

use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{Error, Result};
use crate::traits::{MetadataRow, MetadataSource};
use crate::value::Value;

/// One scripted response.
#[derive(Debug, Clone)]
struct Rule {
    /// Substring the SQL must contain
    fragment: String,
    /// Exact parameters the call must carry, if set
    params: Option<Vec<Value>>,
    outcome: Outcome,
}

#[derive(Debug, Clone)]
enum Outcome {
    Rows(Vec<MetadataRow>),
    Fail(String),
}

/// A metadata source that answers from a script instead of a database.
///
/// Rules are tried in the order they were added; the first rule whose SQL
/// fragment is contained in the query (and whose parameters match, when the
/// rule pins them) wins. Unmatched queries return no rows. Every call is
/// recorded so callers can assert on what was asked.
///
/// # Example
///
/// ```ignore
/// let source = CannedSource::new()
///     .respond("information_schema.tables", vec![table_row("users")])
///     .respond_to("information_schema.columns", vec!["users".into()], user_columns());
/// ```
#[derive(Debug, Default)]
pub struct CannedSource {
    rules: Vec<Rule>,
    calls: Mutex<Vec<(String, Vec<Value>)>>,
}

impl CannedSource {
    /// Create a source with no rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer any query containing `fragment` with `rows`.
    pub fn respond(mut self, fragment: &str, rows: Vec<MetadataRow>) -> Self {
        self.rules.push(Rule {
            fragment: fragment.to_string(),
            params: None,
            outcome: Outcome::Rows(rows),
        });
        self
    }

    /// Answer queries containing `fragment` and bound to exactly `params`.
    pub fn respond_to(
        mut self,
        fragment: &str,
        params: Vec<Value>,
        rows: Vec<MetadataRow>,
    ) -> Self {
        self.rules.push(Rule {
            fragment: fragment.to_string(),
            params: Some(params),
            outcome: Outcome::Rows(rows),
        });
        self
    }

    /// Fail any query containing `fragment` with a query error.
    pub fn fail(mut self, fragment: &str, message: &str) -> Self {
        self.rules.push(Rule {
            fragment: fragment.to_string(),
            params: None,
            outcome: Outcome::Fail(message.to_string()),
        });
        self
    }

    /// Every `(sql, params)` pair received so far, in call order.
    pub fn calls(&self) -> Vec<(String, Vec<Value>)> {
        match self.calls.lock() {
            Ok(calls) => calls.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of queries received so far.
    pub fn call_count(&self) -> usize {
        self.calls().len()
    }
}

#[async_trait]
impl MetadataSource for CannedSource {
    async fn fetch_rows(&self, sql: &str, params: Vec<Value>) -> Result<Vec<MetadataRow>> {
        match self.calls.lock() {
            Ok(mut calls) => calls.push((sql.to_string(), params.clone())),
            Err(poisoned) => poisoned
                .into_inner()
                .push((sql.to_string(), params.clone())),
        }

        let rule = self.rules.iter().find(|rule| {
            sql.contains(&rule.fragment)
                && rule.params.as_ref().map_or(true, |expected| *expected == params)
        });

        match rule.map(|r| &r.outcome) {
            Some(Outcome::Rows(rows)) => Ok(rows.clone()),
            Some(Outcome::Fail(message)) => Err(Error::Query(message.clone())),
            None => {
                debug!("No canned response for query: {}", sql.trim());
                Ok(Vec::new())
            }
        }
    }
}
