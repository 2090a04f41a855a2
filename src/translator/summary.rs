use std::collections::BTreeSet;
use std::sync::Arc;

use crate::ontology::{Iri, Metadata, MetadataPrecedence, RelationalEdge};

use super::classifier::AspectClassifier;

/// A classified term with its provenance and extension expressions.
///
/// Two entries are equal only when value, metadata and expressions all match,
/// so the same term may appear more than once with different evidence.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entry<T> {
    pub value: T,
    pub metadata: Metadata,
    pub expressions: BTreeSet<RelationalEdge>,
}

impl<T> Entry<T> {
    #[must_use]
    pub fn new(value: T, metadata: Metadata, expressions: BTreeSet<RelationalEdge>) -> Self {
        Self {
            value,
            metadata,
            expressions,
        }
    }
}

/// Everything collected about one root entity during a model walk.
#[derive(Clone, Debug)]
pub struct Summary {
    entity: Iri,
    entity_type: String,
    entity_taxon: Option<String>,
    activities: BTreeSet<Entry<Iri>>,
    processes: BTreeSet<Entry<Iri>>,
    locations: BTreeSet<Entry<Iri>>,
    classifier: Arc<AspectClassifier>,
    precedence: MetadataPrecedence,
}

impl Summary {
    #[must_use]
    pub fn new(
        entity: Iri,
        entity_type: impl Into<String>,
        entity_taxon: Option<String>,
        classifier: Arc<AspectClassifier>,
        precedence: MetadataPrecedence,
    ) -> Self {
        Self {
            entity,
            entity_type: entity_type.into(),
            entity_taxon,
            activities: BTreeSet::new(),
            processes: BTreeSet::new(),
            locations: BTreeSet::new(),
            classifier,
            precedence,
        }
    }

    /// An empty summary for the same entity, used to collect foreign entries
    /// before merging them.
    #[must_use]
    pub fn scratch(&self) -> Self {
        Self::new(
            self.entity.clone(),
            self.entity_type.clone(),
            self.entity_taxon.clone(),
            Arc::clone(&self.classifier),
            self.precedence,
        )
    }

    /// Records a molecular function; returns whether `term` was accepted.
    pub fn add_mf(
        &mut self,
        term: &Iri,
        metadata: &Metadata,
        expressions: &BTreeSet<RelationalEdge>,
    ) -> bool {
        if !self.classifier.is_mf(term) {
            return false;
        }
        self.activities
            .insert(Entry::new(term.clone(), metadata.clone(), expressions.clone()));
        true
    }

    /// Records a biological process; returns whether `term` was accepted.
    pub fn add_bp(
        &mut self,
        term: &Iri,
        metadata: &Metadata,
        expressions: &BTreeSet<RelationalEdge>,
    ) -> bool {
        if !self.classifier.is_bp(term) {
            return false;
        }
        self.processes
            .insert(Entry::new(term.clone(), metadata.clone(), expressions.clone()));
        true
    }

    /// Records a cellular component; returns whether `term` was accepted.
    pub fn add_cc(
        &mut self,
        term: &Iri,
        metadata: &Metadata,
        expressions: &BTreeSet<RelationalEdge>,
    ) -> bool {
        if !self.classifier.is_cc(term) {
            return false;
        }
        self.locations
            .insert(Entry::new(term.clone(), metadata.clone(), expressions.clone()));
        true
    }

    /// Adopts processes reached through another activity.
    ///
    /// Only the foreign term is kept: its metadata is combined with `local`,
    /// the metadata of the edge that led here, and its extension expressions
    /// are dropped since they describe the other activity.
    pub fn add_processes(&mut self, foreign: &BTreeSet<Entry<Iri>>, local: &Metadata) {
        for entry in foreign {
            let metadata = Metadata::combine(local, &entry.metadata, self.precedence);
            self.processes
                .insert(Entry::new(entry.value.clone(), metadata, BTreeSet::new()));
        }
    }

    /// Adopts locations verbatim.
    pub fn add_locations(&mut self, foreign: &BTreeSet<Entry<Iri>>) {
        self.locations.extend(foreign.iter().cloned());
    }

    #[must_use]
    pub fn entity(&self) -> &Iri {
        &self.entity
    }

    #[must_use]
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    #[must_use]
    pub fn entity_taxon(&self) -> Option<&str> {
        self.entity_taxon.as_deref()
    }

    #[must_use]
    pub fn activities(&self) -> &BTreeSet<Entry<Iri>> {
        &self.activities
    }

    #[must_use]
    pub fn processes(&self) -> &BTreeSet<Entry<Iri>> {
        &self.processes
    }

    #[must_use]
    pub fn locations(&self) -> &BTreeSet<Entry<Iri>> {
        &self.locations
    }
}
