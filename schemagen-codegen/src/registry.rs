//! Provider registry: which connector opens which engine

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use schemagen::MetadataSource;

use crate::error::{CodegenError, Result};
use crate::provider::Provider;

/// Opens a metadata connection for one provider.
///
/// Built-in connectors exist for the drivers compiled into `schemagen`;
/// anything else (SQL Server, Oracle, a pooled source the caller already
/// owns) is plugged in through [`ProviderRegistry::register`].
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(
        &self,
        connection_string: &str,
        timeout: Duration,
    ) -> schemagen::Result<Box<dyn MetadataSource>>;
}

#[cfg(feature = "mysql")]
struct MySqlConnector;

#[cfg(feature = "mysql")]
#[async_trait]
impl Connector for MySqlConnector {
    async fn connect(
        &self,
        connection_string: &str,
        _timeout: Duration,
    ) -> schemagen::Result<Box<dyn MetadataSource>> {
        // mysql_async has no connect timeout option; the pipeline bounds it
        let source = schemagen::MySqlSource::connect(connection_string).await?;
        Ok(Box::new(source))
    }
}

#[cfg(feature = "postgres")]
struct PgConnector;

#[cfg(feature = "postgres")]
#[async_trait]
impl Connector for PgConnector {
    async fn connect(
        &self,
        connection_string: &str,
        timeout: Duration,
    ) -> schemagen::Result<Box<dyn MetadataSource>> {
        let source = schemagen::PgSource::connect(connection_string, timeout).await?;
        Ok(Box::new(source))
    }
}

#[cfg(feature = "sqlite")]
struct SqliteConnector;

#[cfg(feature = "sqlite")]
#[async_trait]
impl Connector for SqliteConnector {
    async fn connect(
        &self,
        connection_string: &str,
        timeout: Duration,
    ) -> schemagen::Result<Box<dyn MetadataSource>> {
        let source = schemagen::SqliteSource::connect(connection_string, timeout).await?;
        Ok(Box::new(source))
    }
}

/// Maps providers to connectors.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    connectors: BTreeMap<Provider, Arc<dyn Connector>>,
}

impl ProviderRegistry {
    /// A registry with no connectors.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry with a connector for every driver compiled in.
    pub fn with_defaults() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::empty();
        #[cfg(feature = "mysql")]
        registry.register(Provider::MySql, Arc::new(MySqlConnector));
        #[cfg(feature = "postgres")]
        registry.register(Provider::Postgres, Arc::new(PgConnector));
        #[cfg(feature = "sqlite")]
        registry.register(Provider::Sqlite, Arc::new(SqliteConnector));
        registry
    }

    /// Register or replace the connector for a provider.
    pub fn register(&mut self, provider: Provider, connector: Arc<dyn Connector>) -> &mut Self {
        self.connectors.insert(provider, connector);
        self
    }

    /// Providers that currently have a connector
    pub fn providers(&self) -> impl Iterator<Item = Provider> + '_ {
        self.connectors.keys().copied()
    }

    /// Resolve a provider name to its provider and connector.
    pub fn resolve(&self, provider_name: &str) -> Result<(Provider, Arc<dyn Connector>)> {
        let provider = Provider::from_name(provider_name)
            .ok_or_else(|| CodegenError::provider_load(provider_name, "unknown provider"))?;

        let connector = self.connectors.get(&provider).cloned().ok_or_else(|| {
            CodegenError::provider_load(
                provider_name,
                format!(
                    "no connector registered for {}; enable its cargo feature or register one",
                    provider
                ),
            )
        })?;

        Ok((provider, connector))
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.connectors.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemagen::CannedSource;

    struct Canned;

    #[async_trait]
    impl Connector for Canned {
        async fn connect(
            &self,
            _connection_string: &str,
            _timeout: Duration,
        ) -> schemagen::Result<Box<dyn MetadataSource>> {
            Ok(Box::new(CannedSource::new()))
        }
    }

    #[test]
    fn test_unknown_provider() {
        let err = ProviderRegistry::with_defaults().resolve("db2").err().unwrap();
        assert!(matches!(err, CodegenError::ProviderLoad { provider, .. } if provider == "db2"));
    }

    #[test]
    fn test_known_provider_without_connector() {
        let err = ProviderRegistry::empty()
            .resolve("System.Data.SqlClient")
            .err()
            .unwrap();
        assert!(
            matches!(err, CodegenError::ProviderLoad { message, .. } if message.contains("sqlserver"))
        );
    }

    #[test]
    fn test_registered_connector_resolves_by_alias() {
        let mut registry = ProviderRegistry::empty();
        registry.register(Provider::Oracle, Arc::new(Canned));
        let (provider, _) = registry.resolve("Oracle.ManagedDataAccess.Client").unwrap();
        assert_eq!(provider, Provider::Oracle);
        assert_eq!(registry.providers().collect::<Vec<_>>(), vec![Provider::Oracle]);
    }
}
