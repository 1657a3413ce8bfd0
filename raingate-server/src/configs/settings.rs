use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

/// Endpoint key of the sensor read, every other key is an actuator action.
pub const SENSOR_ENDPOINT: &str = "get-rain-data";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_stylesheet")]
    pub stylesheet: String,
}

impl Server {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timings {
    /// Seconds between two ticks of every periodic task
    pub refresh: u64,
}

impl Timings {
    pub fn period(&self) -> Duration {
        Duration::from_secs(self.refresh)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RainLevel {
    pub threshold: f64,
    pub default: f64,
    #[serde(default = "default_close_actions")]
    pub close_actions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Devices {
    pub rain_sensor: String,
    pub ir_controller: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub logger: Logger,
    pub timings: Timings,
    pub rainlevel: RainLevel,
    pub devices: Devices,
    pub endpoints: HashMap<String, String>,
    pub buttons: Vec<String>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or("development".into());

        let settings: Settings = Config::builder()
            .add_source(File::with_name("configs/default"))
            .add_source(File::with_name(&format!("configs/{run_mode}")).required(false))
            .add_source(
                Environment::with_prefix("RAINGATE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.finalize()
    }

    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        settings.finalize()
    }

    fn finalize(mut self) -> Result<Self, ConfigError> {
        self.server.stylesheet = Self::normalize_path(&self.server.stylesheet)?;
        self.validate()?;

        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timings.refresh == 0 {
            return Err(ConfigError::Message("timings.refresh must be at least one second".into()));
        }

        if !self.endpoints.contains_key(SENSOR_ENDPOINT) {
            return Err(ConfigError::NotFound(format!("endpoints.{SENSOR_ENDPOINT}")));
        }

        let actions = self.buttons.iter().chain(self.rainlevel.close_actions.iter());
        for action in actions {
            if !self.endpoints.contains_key(action) {
                return Err(ConfigError::Message(format!("no endpoint configured for action '{action}'")));
            }
        }

        Ok(())
    }

    fn project_root() -> Result<PathBuf, std::io::Error> {
        if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
            // development and testing environments
            Ok(PathBuf::from(manifest_dir))
        } else {
            // runtime root relative path `folder/executable` -> `folder/`
            let executable = env::current_exe()?;

            Ok(executable.parent().map(PathBuf::from).unwrap_or_default())
        }
    }

    fn normalize_path(path: &str) -> Result<String, ConfigError> {
        Ok(match path.strip_prefix("~/") {
            Some(relative) => Self::project_root()
                .map_err(|e| ConfigError::Message(e.to_string()))?
                .join(relative)
                .to_string_lossy()
                .into_owned(),
            None => path.to_string(),
        })
    }
}

fn default_stylesheet() -> String {
    String::from("~/static/style.css")
}

fn default_close_actions() -> Vec<String> {
    vec![String::from("close-left"), String::from("close-right")]
}

fn default_connect_timeout() -> u64 {
    10
}
