//! Supported database engines

use std::fmt;

use serde::{Deserialize, Serialize};

/// A database engine family with its own catalog layout and type system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    MySql,
    SqlServer,
    Postgres,
    Oracle,
    /// Embedded, file-backed engine
    Sqlite,
}

impl Provider {
    /// Every provider, in registry order.
    pub const ALL: [Provider; 5] = [
        Provider::MySql,
        Provider::SqlServer,
        Provider::Postgres,
        Provider::Oracle,
        Provider::Sqlite,
    ];

    /// Canonical provider name.
    pub fn name(&self) -> &'static str {
        match self {
            Provider::MySql => "mysql",
            Provider::SqlServer => "sqlserver",
            Provider::Postgres => "postgres",
            Provider::Oracle => "oracle",
            Provider::Sqlite => "sqlite",
        }
    }

    /// Resolve a provider from a canonical name or a well-known driver
    /// invariant name (`MySql.Data.MySqlClient`, `Npgsql`, ...).
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    pub fn from_name(name: &str) -> Option<Provider> {
        let name = name.trim().to_ascii_lowercase();
        let provider = match name.as_str() {
            "mysql" | "mariadb" | "mysql.data.mysqlclient" | "mysqlconnector" => Provider::MySql,
            "sqlserver" | "mssql" | "system.data.sqlclient" | "microsoft.data.sqlclient" => {
                Provider::SqlServer
            }
            "postgres" | "postgresql" | "pg" | "npgsql" => Provider::Postgres,
            "oracle"
            | "oracle.manageddataaccess.client"
            | "oracle.dataaccess.client"
            | "system.data.oracleclient" => Provider::Oracle,
            "sqlite" | "sqlite3" | "system.data.sqlite" | "microsoft.data.sqlite" => {
                Provider::Sqlite
            }
            _ => return None,
        };
        Some(provider)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
