//! External lookups consulted while assembling annotation records.
//!
//! Implementations are expected to be idempotent; the assembler calls them
//! once per retained entry without de-duplicating across entries.

pub mod evidence;

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

pub use evidence::{EcoCodeMapper, EvidenceResolver, ShortEvidence};

use crate::ontology::{Iri, OntologyContext};

/// Descriptor returned by an [`ExternalLookupService`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupEntry {
    pub id: Iri,
    pub label: Option<String>,
    pub kind: Option<String>,
    pub taxon: Option<String>,
}

impl LookupEntry {
    #[must_use]
    pub fn new(id: Iri) -> Self {
        Self {
            id,
            label: None,
            kind: None,
            taxon: None,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    #[must_use]
    pub fn with_taxon(mut self, taxon: impl Into<String>) -> Self {
        self.taxon = Some(taxon.into());
        self
    }
}

/// Source of entity descriptors (labels, types, taxa) keyed by identifier.
pub trait ExternalLookupService: Send + Sync {
    /// Short name used when describing the service.
    fn name(&self) -> &str;

    /// All entries known for `id`.
    fn lookup(&self, id: &Iri) -> Vec<LookupEntry>;

    /// The entry for `id` restricted to `taxon`.
    fn lookup_with_taxon(&self, id: &Iri, taxon: &str) -> Option<LookupEntry>;
}

/// Chains several lookup services.
///
/// `lookup` concatenates every service's results in order; `lookup_with_taxon`
/// returns the first hit.
#[derive(Clone, Default)]
pub struct CombinedLookupService {
    services: Vec<Arc<dyn ExternalLookupService>>,
}

impl CombinedLookupService {
    #[must_use]
    pub fn new(services: Vec<Arc<dyn ExternalLookupService>>) -> Self {
        Self { services }
    }

    /// Appends a service at the lowest priority.
    #[must_use]
    pub fn with_service(mut self, service: Arc<dyn ExternalLookupService>) -> Self {
        self.services.push(service);
        self
    }
}

impl ExternalLookupService for CombinedLookupService {
    fn name(&self) -> &str {
        "combined"
    }

    fn lookup(&self, id: &Iri) -> Vec<LookupEntry> {
        self.services
            .iter()
            .flat_map(|service| service.lookup(id))
            .collect()
    }

    fn lookup_with_taxon(&self, id: &Iri, taxon: &str) -> Option<LookupEntry> {
        self.services
            .iter()
            .find_map(|service| service.lookup_with_taxon(id, taxon))
    }
}

impl Display for CombinedLookupService {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.services.iter().map(|service| service.name()).collect();
        write!(f, "[{}]", names.join("|"))
    }
}

/// In-memory lookup table.
#[derive(Clone, Debug, Default)]
pub struct TableLookupService {
    name: String,
    entries: BTreeMap<Iri, Vec<LookupEntry>>,
}

impl TableLookupService {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Adds an entry.
    #[must_use]
    pub fn with_entry(mut self, entry: LookupEntry) -> Self {
        self.entries.entry(entry.id.clone()).or_default().push(entry);
        self
    }
}

impl ExternalLookupService for TableLookupService {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookup(&self, id: &Iri) -> Vec<LookupEntry> {
        self.entries.get(id).cloned().unwrap_or_default()
    }

    fn lookup_with_taxon(&self, id: &Iri, taxon: &str) -> Option<LookupEntry> {
        self.entries
            .get(id)?
            .iter()
            .find(|entry| entry.taxon.as_deref() == Some(taxon))
            .cloned()
    }
}

/// Resolves the taxon of a root entity.
pub trait EntityResolver: Send + Sync {
    /// Taxon CURIE for `entity`, if known.
    fn entity_taxon(&self, entity: &Iri, context: &dyn OntologyContext) -> Option<String>;
}

/// [`EntityResolver`] answering from any [`ExternalLookupService`].
#[derive(Clone)]
pub struct LookupEntityResolver {
    service: Arc<dyn ExternalLookupService>,
}

impl LookupEntityResolver {
    #[must_use]
    pub fn new(service: Arc<dyn ExternalLookupService>) -> Self {
        Self { service }
    }
}

impl EntityResolver for LookupEntityResolver {
    fn entity_taxon(&self, entity: &Iri, _context: &dyn OntologyContext) -> Option<String> {
        self.service
            .lookup(entity)
            .into_iter()
            .find_map(|entry| entry.taxon)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{
        CombinedLookupService, EntityResolver, ExternalLookupService, LookupEntityResolver,
        LookupEntry, TableLookupService,
    };
    use crate::ontology::{CurieRegistry, Iri, Ontology, OntologyView};

    fn iri(text: &str) -> Iri {
        Iri::new(text).expect("valid iri")
    }

    fn services() -> CombinedLookupService {
        let first = TableLookupService::new("golr").with_entry(
            LookupEntry::new(iri("http://identifiers.org/uniprot/P1"))
                .with_label("ABC1")
                .with_taxon("NCBITaxon:9606"),
        );
        let second = TableLookupService::new("mod")
            .with_entry(
                LookupEntry::new(iri("http://identifiers.org/uniprot/P1"))
                    .with_label("Abc1")
                    .with_taxon("NCBITaxon:10090"),
            )
            .with_entry(
                LookupEntry::new(iri("http://identifiers.org/uniprot/P2")).with_kind("protein"),
            );
        CombinedLookupService::default()
            .with_service(Arc::new(first))
            .with_service(Arc::new(second))
    }

    #[test]
    fn lookup_concatenates_results_in_order() {
        let combined = services();
        let labels: Vec<_> = combined
            .lookup(&iri("http://identifiers.org/uniprot/P1"))
            .into_iter()
            .filter_map(|entry| entry.label)
            .collect();
        assert_eq!(labels, vec!["ABC1".to_string(), "Abc1".to_string()]);
        assert!(combined
            .lookup(&iri("http://identifiers.org/uniprot/P3"))
            .is_empty());
    }

    #[test]
    fn taxon_lookup_returns_first_hit() {
        let combined = services();
        let hit = combined
            .lookup_with_taxon(&iri("http://identifiers.org/uniprot/P1"), "NCBITaxon:10090")
            .expect("mouse entry");
        assert_eq!(hit.label.as_deref(), Some("Abc1"));
        assert!(combined
            .lookup_with_taxon(&iri("http://identifiers.org/uniprot/P2"), "NCBITaxon:9606")
            .is_none());
    }

    #[test]
    fn display_lists_services() {
        assert_eq!(services().to_string(), "[golr|mod]");
    }

    #[test]
    fn entity_resolver_uses_first_taxon() {
        let resolver = LookupEntityResolver::new(Arc::new(services()));
        let registry = CurieRegistry::default();
        let ontology = Ontology::new(iri("http://example.org/model"));
        let view = OntologyView::new(&ontology, &registry);
        assert_eq!(
            resolver
                .entity_taxon(&iri("http://identifiers.org/uniprot/P1"), &view)
                .as_deref(),
            Some("NCBITaxon:9606")
        );
        assert_eq!(
            resolver.entity_taxon(&iri("http://identifiers.org/uniprot/P2"), &view),
            None
        );
    }
}
