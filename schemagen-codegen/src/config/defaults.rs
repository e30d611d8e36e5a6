//! Default configuration values - single source of truth

/// Seconds allowed for connecting and for the whole schema read
pub const COMMAND_TIMEOUT_SECS: u64 = 30;

/// Namespace handed to emitters
pub const NAMESPACE: &str = "Models";

/// Whether views are generated alongside base tables
pub const INCLUDE_VIEWS: bool = false;

/// Whether generated classes list their columns explicitly
pub const EXPLICIT_COLUMNS: bool = true;

/// Whether generated classes track which columns were modified
pub const TRACK_MODIFIED_COLUMNS: bool = false;

/// Config file looked up in the working directory when none is given
pub const CONFIG_FILE: &str = "schemagen";

/// Prefix for environment variable overrides (`SCHEMAGEN__PROVIDER_NAME`)
pub const ENV_PREFIX: &str = "SCHEMAGEN";

/// Separator between the prefix and nested keys in environment variables
pub const ENV_SEPARATOR: &str = "__";
