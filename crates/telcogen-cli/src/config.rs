//! Layered run configuration: defaults, then an optional TOML file, then flags.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use telcogen_core::SizeClass;
use telcogen_generate::{GenerateOptions, ShapeSelection, parse_seed};

use crate::CliError;

/// Contents of a `--config` file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub seed: Option<SeedValue>,
    pub size: Option<String>,
    pub out: Option<PathBuf>,
    pub shapes: Option<ShapesValue>,
    pub overwrite: Option<bool>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Seeds may be written as TOML integers or strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SeedValue {
    Number(i64),
    Text(String),
}

impl SeedValue {
    fn as_text(&self) -> String {
        match self {
            SeedValue::Number(value) => value.to_string(),
            SeedValue::Text(value) => value.clone(),
        }
    }
}

/// `"all"`, `"canonical,relational"` or `["canonical", "relational"]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ShapesValue {
    Text(String),
    List(Vec<String>),
}

impl ShapesValue {
    fn as_text(&self) -> String {
        match self {
            ShapesValue::Text(value) => value.clone(),
            ShapesValue::List(values) => values.join(","),
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    pub json: Option<bool>,
    /// `EnvFilter` directive, e.g. `telcogen_generate=debug`.
    pub filter: Option<String>,
}

/// Flag values as given on the command line.
#[derive(Debug, Default, Clone)]
pub struct FlagOverrides {
    pub seed: Option<String>,
    pub size: Option<String>,
    pub out: Option<PathBuf>,
    pub shapes: Option<String>,
    pub overwrite: bool,
}

pub fn load_file(path: &Path) -> Result<FileConfig, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&text)?)
}

/// Merge defaults, file and flags, later layers winning.
pub fn resolve(file: &FileConfig, flags: &FlagOverrides) -> Result<GenerateOptions, CliError> {
    let mut options = GenerateOptions::default();

    if let Some(seed) = flags
        .seed
        .clone()
        .or_else(|| file.seed.as_ref().map(SeedValue::as_text))
    {
        options.seed = parse_seed(&seed)?;
    }
    if let Some(size) = flags.size.as_ref().or(file.size.as_ref()) {
        options.size = size.parse::<SizeClass>().map_err(telcogen_generate::GenerationError::from)?;
    }
    if let Some(out) = flags.out.as_ref().or(file.out.as_ref()) {
        options.out_dir = out.clone();
    }
    if let Some(shapes) = flags
        .shapes
        .clone()
        .or_else(|| file.shapes.as_ref().map(ShapesValue::as_text))
    {
        options.shapes = shapes.parse::<ShapeSelection>()?;
    }
    options.overwrite = flags.overwrite || file.overwrite.unwrap_or(false);

    Ok(options)
}
