//! Mapping between namespace-prefixed short identifiers (CURIEs) and IRIs.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use super::value_objects::{Iri, IriError};

const OBO_BASE: &str = "http://purl.obolibrary.org/obo/";

const OBO_PREFIXES: &[&str] = &[
    "GO", "BFO", "RO", "ECO", "NCBITaxon", "CHEBI", "UBERON", "CL", "SO", "PR",
];

fn curie_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([A-Za-z_][A-Za-z0-9_.\-]*):(\S+)$").expect("static CURIE pattern")
    })
}

/// Bidirectional prefix registry resolving CURIEs such as `GO:0003674`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurieRegistry {
    prefixes: BTreeMap<String, String>,
}

impl Default for CurieRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        for prefix in OBO_PREFIXES {
            registry.register(*prefix, format!("{OBO_BASE}{prefix}_"));
        }
        registry.register("UniProtKB", "http://identifiers.org/uniprot/");
        registry.register("MGI", "http://identifiers.org/mgi/");
        registry.register("ZFIN", "http://identifiers.org/zfin/");
        registry.register("SGD", "http://identifiers.org/sgd/");
        registry.register("WB", "http://identifiers.org/wormbase/");
        registry.register("FB", "http://identifiers.org/flybase/");
        registry.register("gomodel", "http://model.geneontology.org/");
        registry
    }
}

impl CurieRegistry {
    /// Creates a registry without any prefix.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            prefixes: BTreeMap::new(),
        }
    }

    /// Builds a registry from explicit `prefix -> base` pairs on top of the defaults.
    #[must_use]
    pub fn with_prefixes<I, K, V>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut registry = Self::default();
        for (prefix, base) in prefixes {
            registry.register(prefix, base);
        }
        registry
    }

    /// Registers (or replaces) the expansion for a prefix.
    pub fn register(&mut self, prefix: impl Into<String>, base: impl Into<String>) {
        self.prefixes.insert(prefix.into(), base.into());
    }

    /// Returns the registered expansion for `prefix`.
    #[must_use]
    pub fn base(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }

    /// Expands a CURIE (or passes through an absolute IRI) into an [`Iri`].
    pub fn iri(&self, id: &str) -> Result<Iri, CurieError> {
        if id.starts_with("http://") || id.starts_with("https://") {
            return Ok(Iri::new(id)?);
        }
        let captures = curie_pattern()
            .captures(id)
            .ok_or_else(|| CurieError::Malformed(id.to_string()))?;
        let prefix = &captures[1];
        let local = &captures[2];
        let Some(base) = self.prefixes.get(prefix) else {
            return Err(CurieError::UnknownPrefix {
                prefix: prefix.to_string(),
                curie: id.to_string(),
            });
        };
        Ok(Iri::new(format!("{base}{local}"))?)
    }

    /// Compacts an IRI into a CURIE using the longest matching expansion.
    #[must_use]
    pub fn curie(&self, iri: &Iri) -> Option<String> {
        self.prefixes
            .iter()
            .filter(|(_, base)| iri.as_str().starts_with(base.as_str()))
            .max_by_key(|(_, base)| base.len())
            .map(|(prefix, base)| format!("{prefix}:{}", &iri.as_str()[base.len()..]))
    }

    /// Compacts an IRI, falling back to the full IRI text.
    #[must_use]
    pub fn curie_or_iri(&self, iri: &Iri) -> String {
        self.curie(iri).unwrap_or_else(|| iri.to_string())
    }
}

/// Errors raised while expanding CURIEs.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CurieError {
    /// Text is neither a CURIE nor an absolute IRI.
    #[error("`{0}` is not a CURIE")]
    Malformed(String),
    /// Prefix has no registered expansion.
    #[error("unknown prefix `{prefix}` in `{curie}`")]
    UnknownPrefix { prefix: String, curie: String },
    /// Expansion produced an invalid IRI.
    #[error(transparent)]
    Iri(#[from] IriError),
}

#[cfg(test)]
mod tests {
    use super::{CurieError, CurieRegistry};

    #[test]
    fn expands_and_compacts_obo_terms() {
        let registry = CurieRegistry::default();
        let iri = registry.iri("GO:0006915").expect("known prefix");
        assert_eq!(iri.as_str(), "http://purl.obolibrary.org/obo/GO_0006915");
        assert_eq!(registry.curie(&iri).as_deref(), Some("GO:0006915"));
    }

    #[test]
    fn picks_longest_matching_base() {
        let mut registry = CurieRegistry::empty();
        registry.register("OBO", "http://purl.obolibrary.org/obo/");
        registry.register("GO", "http://purl.obolibrary.org/obo/GO_");
        let iri = registry.iri("GO:0005575").expect("known prefix");
        assert_eq!(registry.curie(&iri).as_deref(), Some("GO:0005575"));
    }

    #[test]
    fn rejects_unknown_prefix() {
        let err = CurieRegistry::default()
            .iri("FO:0006915")
            .expect_err("unknown prefix");
        assert!(matches!(err, CurieError::UnknownPrefix { prefix, .. } if prefix == "FO"));
    }

    #[test]
    fn rejects_malformed_identifiers() {
        let err = CurieRegistry::default()
            .iri("no-colon")
            .expect_err("malformed");
        assert_eq!(err, CurieError::Malformed("no-colon".to_string()));
    }

    #[test]
    fn passes_through_absolute_iris() {
        let registry = CurieRegistry::default();
        let iri = registry
            .iri("http://example.org/thing")
            .expect("absolute iri");
        assert_eq!(registry.curie_or_iri(&iri), "http://example.org/thing");
    }
}
