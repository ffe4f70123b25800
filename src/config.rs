use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("the command prefix cannot be empty")]
    EmptyBang,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    pub address: String,
    pub port: u16,
    pub channel: String,
    pub nickname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default)]
    pub mode: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,
    #[serde(default = "default_bang")]
    pub bang: String,
}

fn default_bang() -> String {
    "!".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: "localhost".into(),
            port: 6667,
            channel: "#bangbot".into(),
            nickname: "bangbot".into(),
            username: None,
            mode: 0,
            fullname: None,
            bang: default_bang(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let data = fs::read_to_string(path)?;
        Self::parse(&data)
    }

    pub fn parse(data: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(data)?;
        if config.bang.is_empty() {
            return Err(Error::EmptyBang);
        }
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let data = toml::to_string_pretty(&self)?;
        fs::write(path, data)?;
        Ok(())
    }

    /// `config.toml` in the platform specific config directory
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com.github", "museun", "bangbot")
            .map(|dir| dir.config_dir().join("config.toml"))
    }

    /// `address:port`, for connecting
    pub fn address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }

    pub fn username(&self) -> &str {
        self.username.as_ref().unwrap_or(&self.nickname)
    }

    pub fn fullname(&self) -> &str {
        self.fullname.as_ref().unwrap_or(&self.nickname)
    }
}
