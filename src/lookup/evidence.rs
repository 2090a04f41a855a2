use std::collections::BTreeMap;
use std::sync::Arc;

use crate::ontology::{Iri, OntologyContext, ReasonerHandle};

/// Legacy evidence code with an optional default reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShortEvidence {
    pub code: String,
    pub reference: Option<String>,
}

impl ShortEvidence {
    #[must_use]
    pub fn new(code: impl Into<String>, reference: Option<String>) -> Self {
        Self {
            code: code.into(),
            reference,
        }
    }
}

/// Maps a fine-grained evidence term onto a short legacy code.
///
/// A `None` result is a lookup miss, not an error.
pub trait EvidenceResolver: Send + Sync {
    fn find_short_evidence(
        &self,
        evidence: &Iri,
        evidence_curie: &str,
        context: &dyn OntologyContext,
    ) -> Option<ShortEvidence>;
}

/// Table-driven ECO to GO evidence code mapper.
///
/// Terms without a direct row inherit the mapping of their nearest mapped
/// ancestor when a reasoner is attached.
#[derive(Clone, Default)]
pub struct EcoCodeMapper {
    codes: BTreeMap<Iri, ShortEvidence>,
    reasoner: Option<Arc<ReasonerHandle>>,
}

impl EcoCodeMapper {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a direct mapping row.
    #[must_use]
    pub fn with_code(
        mut self,
        evidence: Iri,
        code: impl Into<String>,
        reference: Option<&str>,
    ) -> Self {
        self.codes.insert(
            evidence,
            ShortEvidence::new(code, reference.map(str::to_string)),
        );
        self
    }

    /// Enables ancestor fallback through `reasoner`.
    #[must_use]
    pub fn with_reasoner(mut self, reasoner: Arc<ReasonerHandle>) -> Self {
        self.reasoner = Some(reasoner);
        self
    }
}

impl EvidenceResolver for EcoCodeMapper {
    fn find_short_evidence(
        &self,
        evidence: &Iri,
        evidence_curie: &str,
        _context: &dyn OntologyContext,
    ) -> Option<ShortEvidence> {
        if let Some(found) = self.codes.get(evidence) {
            return Some(found.clone());
        }
        let reasoner = self.reasoner.as_ref()?;
        match reasoner.ancestors_of(evidence) {
            Ok(ancestors) => ancestors
                .iter()
                .find_map(|ancestor| self.codes.get(ancestor))
                .cloned(),
            Err(err) => {
                tracing::debug!(
                    evidence = evidence_curie,
                    err.msg = %err,
                    "evidence_ancestors_unavailable"
                );
                None
            }
        }
    }
}
