use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

pub const DEFAULT_SUPPORT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/dat/dehsupp.txt");

/// Values read from an optional TOML file and `DEHACKED_*` variables.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub support: Option<PathBuf>,
    pub log_level: Option<String>,
    pub no_text: bool,
}

impl Settings {
    pub fn load(file: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = Config::builder();
        if let Some(file) = file {
            builder = builder.add_source(File::from(file).required(true));
        }
        builder
            .add_source(Environment::with_prefix("DEHACKED"))
            .build()?
            .try_deserialize()
    }
}
