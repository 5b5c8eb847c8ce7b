use crate::error::{ConfigErrorKind, InfraError};
use crate::hardening::{CEILING_MAX_FRAME_BYTES, CEILING_READ_TIMEOUT_SECS, DEFAULT_MAX_FRAME_BYTES, DEFAULT_READ_TIMEOUT_SECS};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tcp_addr: String,              // e.g. "0.0.0.0:6000"
    pub catalog_path: PathBuf,         // tab-separated course list
    pub registrations_path: PathBuf,   // append-only registration sink
    pub read_timeout_secs: u64,
    pub max_frame_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tcp_addr: "0.0.0.0:6000".to_string(),
            catalog_path: PathBuf::from("data/cours.txt"),
            registrations_path: PathBuf::from("data/inscription.txt"),
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, InfraError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|e| InfraError::Config {
            path: path.to_path_buf(),
            source: ConfigErrorKind::Read(e),
        })?;
        let cfg: Self = toml::from_str(&data).map_err(|e| InfraError::Config {
            path: path.to_path_buf(),
            source: ConfigErrorKind::Parse(e),
        })?;

        cfg.validate().map_err(|source| InfraError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(cfg)
    }

    /// Environment on top of `CONFIG_PATH` (TOML) when set, else on top of the defaults.
    pub fn from_env() -> Result<Self, InfraError> {
        let _ = dotenvy::from_filename(".env");
        let defaults = match std::env::var("CONFIG_PATH") {
            Ok(path) => Self::load(path)?,
            Err(_) => Self::default(),
        };

        let cfg = Self {
            tcp_addr: std::env::var("TCP_ADDR").unwrap_or(defaults.tcp_addr),
            catalog_path: std::env::var("CATALOG_PATH").map(PathBuf::from).unwrap_or(defaults.catalog_path),
            registrations_path: std::env::var("REGISTRATIONS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.registrations_path),
            read_timeout_secs: env_or("READ_TIMEOUT_SECS", defaults.read_timeout_secs)?,
            max_frame_bytes: env_or("MAX_FRAME_BYTES", defaults.max_frame_bytes)?,
        };

        cfg.validate().map_err(|source| InfraError::Config {
            path: PathBuf::from(".env"),
            source,
        })?;
        Ok(cfg)
    }

    /// Rejects limits that would make every session fail.
    pub fn validate(&self) -> Result<(), ConfigErrorKind> {
        if !(1..=CEILING_READ_TIMEOUT_SECS).contains(&self.read_timeout_secs) {
            return Err(ConfigErrorKind::OutOfRange(
                "read_timeout_secs",
                format!("{} not in 1..={}", self.read_timeout_secs, CEILING_READ_TIMEOUT_SECS),
            ));
        }
        if !(1..=CEILING_MAX_FRAME_BYTES).contains(&self.max_frame_bytes) {
            return Err(ConfigErrorKind::OutOfRange(
                "max_frame_bytes",
                format!("{} not in 1..={}", self.max_frame_bytes, CEILING_MAX_FRAME_BYTES),
            ));
        }
        Ok(())
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> Result<T, InfraError> {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| InfraError::Config {
            path: PathBuf::from(".env"),
            source: ConfigErrorKind::InvalidEnv(key.to_string(), raw),
        }),
        Err(_) => Ok(default),
    }
}
