//! Crate-level error type.
//!
//! Each module keeps its own error enum; this one wraps them so embedding
//! programs can use a single `?` chain.

use crate::config::ConfigError;
use crate::ontology::{CurieError, IriError, OntologyError, OntologyServiceError};
use crate::parser::ParseError;
use crate::translator::{ClassifierError, TranslationError};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Translation(#[from] TranslationError),

    #[error(transparent)]
    Ontology(#[from] OntologyError),

    #[error(transparent)]
    OntologyService(#[from] OntologyServiceError),

    #[error(transparent)]
    Curie(#[from] CurieError),

    #[error(transparent)]
    Iri(#[from] IriError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("logger: {0}")]
    Logger(String),
}

impl From<ClassifierError> for Error {
    fn from(err: ClassifierError) -> Self {
        Self::Translation(TranslationError::from(err))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
