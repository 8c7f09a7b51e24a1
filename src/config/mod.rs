//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `SKILLMATCH_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

/// File name of the persisted competency vector artifact inside `cache_dir`.
pub const EMBEDDING_CACHE_FILENAME: &str = "embeddings.rkyv";

/// File name of the generation cache inside `cache_dir`.
pub const GENERATION_CACHE_FILENAME: &str = "generation_cache.json";

/// Default text-generation model used when `SKILLMATCH_GENAI_MODEL` is not set.
pub const DEFAULT_GENAI_MODEL: &str = "gemini-2.5-flash";

/// Env var holding the provider API key, unless overridden by `SKILLMATCH_GENAI_KEY_VAR`.
pub const DEFAULT_GENAI_KEY_VAR: &str = "GEMINI_API_KEY";

/// Service configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `SKILLMATCH_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Directory holding the validated competency and job tables. Default: `./data`.
    pub data_dir: PathBuf,

    /// Competency table. Default: `{data_dir}/competencies.json`.
    pub competencies_path: PathBuf,

    /// Job table. Default: `{data_dir}/jobs.json`.
    pub jobs_path: PathBuf,

    /// Directory for the persisted caches. Default: `./.cache`.
    pub cache_dir: PathBuf,

    /// Sentence encoder directory (`config.json`, `model.safetensors`, `tokenizer.json`).
    pub model_path: Option<PathBuf>,

    /// Text-generation model name passed to the provider client.
    pub genai_model: String,

    /// Name of the env var that must hold the provider API key.
    pub genai_key_var: String,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = PathBuf::from("./data");
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            competencies_path: data_dir.join("competencies.json"),
            jobs_path: data_dir.join("jobs.json"),
            data_dir,
            cache_dir: PathBuf::from("./.cache"),
            model_path: None,
            genai_model: DEFAULT_GENAI_MODEL.to_string(),
            genai_key_var: DEFAULT_GENAI_KEY_VAR.to_string(),
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "SKILLMATCH_PORT";
    const ENV_BIND_ADDR: &'static str = "SKILLMATCH_BIND_ADDR";
    const ENV_DATA_DIR: &'static str = "SKILLMATCH_DATA_DIR";
    const ENV_COMPETENCIES_PATH: &'static str = "SKILLMATCH_COMPETENCIES_PATH";
    const ENV_JOBS_PATH: &'static str = "SKILLMATCH_JOBS_PATH";
    const ENV_CACHE_DIR: &'static str = "SKILLMATCH_CACHE_DIR";
    const ENV_MODEL_PATH: &'static str = "SKILLMATCH_MODEL_PATH";
    const ENV_GENAI_MODEL: &'static str = "SKILLMATCH_GENAI_MODEL";
    const ENV_GENAI_KEY_VAR: &'static str = "SKILLMATCH_GENAI_KEY_VAR";

    /// Loads configuration from environment variables (falling back to defaults).
    ///
    /// Table paths default to files inside the (possibly overridden) data directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let data_dir = Self::parse_path_from_env(Self::ENV_DATA_DIR, defaults.data_dir);
        let competencies_path = Self::parse_path_from_env(
            Self::ENV_COMPETENCIES_PATH,
            data_dir.join("competencies.json"),
        );
        let jobs_path = Self::parse_path_from_env(Self::ENV_JOBS_PATH, data_dir.join("jobs.json"));
        let cache_dir = Self::parse_path_from_env(Self::ENV_CACHE_DIR, defaults.cache_dir);
        let model_path = Self::parse_optional_path_from_env(Self::ENV_MODEL_PATH);
        let genai_model = Self::parse_string_from_env(Self::ENV_GENAI_MODEL, defaults.genai_model);
        let genai_key_var =
            Self::parse_string_from_env(Self::ENV_GENAI_KEY_VAR, defaults.genai_key_var);

        Ok(Self {
            port,
            bind_addr,
            data_dir,
            competencies_path,
            jobs_path,
            cache_dir,
            model_path,
            genai_model,
            genai_key_var,
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    ///
    /// Missing table files are not an error: the stores degrade to empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_dir.exists() && !self.cache_dir.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.cache_dir.clone(),
            });
        }

        for path in [&self.competencies_path, &self.jobs_path] {
            if path.exists() && !path.is_file() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
        }

        if let Some(ref path) = self.model_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        if self.genai_model.trim().is_empty() {
            return Err(ConfigError::EmptyValue {
                name: Self::ENV_GENAI_MODEL,
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Location of the persisted competency vectors.
    pub fn embedding_cache_path(&self) -> PathBuf {
        self.cache_dir.join(EMBEDDING_CACHE_FILENAME)
    }

    /// Location of the persisted generation cache.
    pub fn generation_cache_path(&self) -> PathBuf {
        self.cache_dir.join(GENERATION_CACHE_FILENAME)
    }

    /// Returns `true` if the provider key env var is set and non-empty.
    pub fn genai_key_present(&self) -> bool {
        env::var(&self.genai_key_var)
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }
}
