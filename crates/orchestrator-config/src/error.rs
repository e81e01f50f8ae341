use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown task tier \"{0}\" in failover config")]
    UnknownTier(String),

    #[error("could not determine a config directory (no --config given and dirs::config_dir() returned None)")]
    NoConfigDir,
}
