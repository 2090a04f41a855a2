//! Translator configuration.
//!
//! Settings are read from YAML; every field has a default so an empty
//! document yields the stock GO/Noctua behavior.
//!
//! ```yaml
//! translator:
//!   assigned_by: GO_Noctua
//!   metadata_precedence: prefer_local
//!   classification: first_match
//! logger:
//!   level: debug
//!   format: json
//! ```

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ontology::{CurieRegistry, MetadataPrecedence};
use crate::translator::ClassificationPolicy;

/// Root configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub translator: TranslatorSettings,
    pub walk: WalkSettings,
    pub registry: RegistrySettings,
    pub logger: LoggerSettings,
}

impl Settings {
    /// Parses and validates settings from a YAML document.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_yaml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loading translator settings");
        Self::from_yaml_str(&content)
    }

    /// Registry with the configured prefixes layered over the defaults.
    #[must_use]
    pub fn curie_registry(&self) -> CurieRegistry {
        CurieRegistry::with_prefixes(self.registry.prefixes.clone())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.translator.assigned_by.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "`translator.assigned_by` must not be empty".to_string(),
            ));
        }
        if self.translator.id_space.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "`translator.id_space` must not be empty".to_string(),
            ));
        }
        let registry = self.curie_registry();
        for (field, id) in [
            ("translator.roots.molecular_function", &self.translator.roots.molecular_function),
            ("translator.roots.biological_process", &self.translator.roots.biological_process),
            ("translator.roots.cellular_component", &self.translator.roots.cellular_component),
            ("walk.enabled_by", &self.walk.enabled_by),
            ("walk.part_of", &self.walk.part_of),
            ("walk.occurs_in", &self.walk.occurs_in),
        ] {
            registry
                .iri(id)
                .map_err(|err| ConfigError::Invalid(format!("`{field}`: {err}")))?;
        }
        for id in &self.walk.causal_relations {
            registry
                .iri(id)
                .map_err(|err| ConfigError::Invalid(format!("`walk.causal_relations`: {err}")))?;
        }
        Ok(())
    }
}

/// Output and classification behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorSettings {
    /// Value of the assigned-by column.
    pub assigned_by: String,
    /// CURIE prefix (including the colon) terms must carry to be classified.
    pub id_space: String,
    pub roots: AspectRoots,
    /// Entity prefixes rendered as `protein`; everything else is a `gene`.
    pub protein_prefixes: Vec<String>,
    pub metadata_precedence: MetadataPrecedence,
    pub classification: ClassificationPolicy,
}

impl Default for TranslatorSettings {
    fn default() -> Self {
        Self {
            assigned_by: "GO_Noctua".to_string(),
            id_space: "GO:".to_string(),
            roots: AspectRoots::default(),
            protein_prefixes: vec!["UniProtKB".to_string()],
            metadata_precedence: MetadataPrecedence::default(),
            classification: ClassificationPolicy::default(),
        }
    }
}

/// Root terms of the three aspects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AspectRoots {
    pub molecular_function: String,
    pub biological_process: String,
    pub cellular_component: String,
}

impl Default for AspectRoots {
    fn default() -> Self {
        Self {
            molecular_function: "GO:0003674".to_string(),
            biological_process: "GO:0008150".to_string(),
            cellular_component: "GO:0005575".to_string(),
        }
    }
}

/// Relations followed by the default model walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkSettings {
    pub enabled_by: String,
    pub part_of: String,
    pub occurs_in: String,
    /// Edges between activities whose downstream processes propagate upstream.
    pub causal_relations: Vec<String>,
}

impl Default for WalkSettings {
    fn default() -> Self {
        Self {
            enabled_by: "RO:0002333".to_string(),
            part_of: "BFO:0000050".to_string(),
            occurs_in: "BFO:0000066".to_string(),
            causal_relations: [
                "RO:0002411",
                "RO:0002304",
                "RO:0002305",
                "RO:0002413",
                "RO:0002629",
                "RO:0002630",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
        }
    }
}

/// Extra CURIE prefixes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    pub prefixes: BTreeMap<String, String>,
}

/// Logging output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerSettings {
    pub enable: bool,
    pub level: LogLevel,
    pub format: LogFormat,
    /// Raw `EnvFilter` directives replacing the level based default.
    pub override_filter: Option<String>,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            enable: true,
            level: LogLevel::Info,
            format: LogFormat::Compact,
            override_filter: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let level = match self {
            Self::Off => "off",
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        };
        f.write_str(level)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file `{path}`: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
