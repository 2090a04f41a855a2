use super::curie::CurieRegistry;
use super::entities::{Ontology, PropertyKind};
use super::value_objects::Iri;

/// Abstraction describing reasoning operations over a fixed ontology snapshot.
pub trait ReasoningQuery {
    /// Associated error type allowing infrastructure specific failures.
    type Error;

    /// Returns the transitive closure of all parent classes for a given class.
    fn ancestors_of(&self, class: &Iri) -> Result<Vec<Iri>, Self::Error>;

    /// Returns the transitive closure of all child classes for a given class.
    ///
    /// The class itself is never part of the result.
    fn descendants_of(&self, class: &Iri) -> Result<Vec<Iri>, Self::Error>;
}

/// Read access to the terms, properties and identifiers of an ontology context.
///
/// Translators and parsers receive the context as an explicit argument so
/// that independent translations never share mutable state.
pub trait OntologyContext {
    /// Identifier registry used to move between CURIEs and IRIs.
    fn registry(&self) -> &CurieRegistry;

    /// Human readable label of a class.
    fn label(&self, term: &Iri) -> Option<&str>;

    /// Whether the class is declared in the context.
    fn has_class(&self, class: &Iri) -> bool;

    /// Whether the identifier names a declared object property.
    fn has_object_property(&self, property: &Iri) -> bool;

    /// OBO shorthand of a relation, when declared.
    fn relation_shorthand(&self, property: &Iri) -> Option<&str>;

    /// Compact identifier for a term, falling back to the full IRI.
    fn curie(&self, term: &Iri) -> String {
        self.registry().curie_or_iri(term)
    }

    /// Flat relation identifier: the shorthand when declared, else the CURIE.
    fn relation_id(&self, property: &Iri) -> String {
        self.relation_shorthand(property)
            .map_or_else(|| self.curie(property), str::to_string)
    }
}

/// An ontology paired with the registry used to name its terms.
#[derive(Clone, Debug)]
pub struct OntologyView<'a> {
    ontology: &'a Ontology,
    registry: &'a CurieRegistry,
}

impl<'a> OntologyView<'a> {
    /// Creates a new view.
    #[must_use]
    pub fn new(ontology: &'a Ontology, registry: &'a CurieRegistry) -> Self {
        Self { ontology, registry }
    }
}

impl OntologyContext for OntologyView<'_> {
    fn registry(&self) -> &CurieRegistry {
        self.registry
    }

    fn label(&self, term: &Iri) -> Option<&str> {
        self.ontology.class(term).and_then(|class| class.label())
    }

    fn has_class(&self, class: &Iri) -> bool {
        self.ontology.class(class).is_some()
    }

    fn has_object_property(&self, property: &Iri) -> bool {
        self.ontology
            .property(property)
            .is_some_and(|property| property.kind() == PropertyKind::Object)
    }

    fn relation_shorthand(&self, property: &Iri) -> Option<&str> {
        self.ontology
            .property(property)
            .and_then(|property| property.shorthand())
    }
}
