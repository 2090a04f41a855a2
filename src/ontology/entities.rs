use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use thiserror::Error;

use super::expressions::{ClassExpression, PropertyExpression};
use super::metadata::Metadata;
use super::value_objects::Iri;

/// Ontology class definition capturing parent relationships and metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Class {
    id: Iri,
    label: Option<String>,
    super_classes: BTreeSet<Iri>,
}

impl Class {
    /// Creates a new [`Class`] with the supplied identifier.
    #[must_use]
    pub fn new(id: Iri) -> Self {
        Self {
            id,
            label: None,
            super_classes: BTreeSet::new(),
        }
    }

    /// Sets a human friendly label for the class.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Adds a new parent class relation.
    #[must_use]
    pub fn with_parent(mut self, parent: Iri) -> Self {
        self.super_classes.insert(parent);
        self
    }

    /// Adds a new parent class relation.
    pub fn add_parent(&mut self, parent: Iri) -> bool {
        self.super_classes.insert(parent)
    }

    /// Returns the unique identifier of the class.
    #[must_use]
    pub fn id(&self) -> &Iri {
        &self.id
    }

    /// Returns the optional label.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the parent classes in lexical order.
    #[must_use]
    pub fn parents(&self) -> &BTreeSet<Iri> {
        &self.super_classes
    }
}

/// Ontology property definition supporting object and data properties.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Property {
    id: Iri,
    label: Option<String>,
    shorthand: Option<String>,
    kind: PropertyKind,
}

impl Property {
    /// Creates a new property with the provided identifier and kind.
    #[must_use]
    pub fn new(id: Iri, kind: PropertyKind) -> Self {
        Self {
            id,
            label: None,
            shorthand: None,
            kind,
        }
    }

    /// Sets a human readable label for the property.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the OBO shorthand (e.g. `occurs_in`) used in flat annotation output.
    #[must_use]
    pub fn with_shorthand(mut self, shorthand: impl Into<String>) -> Self {
        self.shorthand = Some(shorthand.into());
        self
    }

    /// Returns the property identifier.
    #[must_use]
    pub fn id(&self) -> &Iri {
        &self.id
    }

    /// Returns the optional label.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the optional OBO shorthand.
    #[must_use]
    pub fn shorthand(&self) -> Option<&str> {
        self.shorthand.as_deref()
    }

    /// Returns the property kind.
    #[must_use]
    pub fn kind(&self) -> PropertyKind {
        self.kind
    }
}

/// Classifies the type of values a property can hold.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PropertyKind {
    /// Object properties link individuals.
    Object,
    /// Data properties capture literal values.
    Data,
}

/// Property assertions attached to individuals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropertyAssertion {
    /// Object properties target another individual; the edge carries its own provenance.
    Individual { target: Iri, metadata: Metadata },
    /// Data properties store literal values.
    Literal(String),
}

impl PropertyAssertion {
    /// Object assertion without provenance.
    #[must_use]
    pub fn individual(target: Iri) -> Self {
        Self::Individual {
            target,
            metadata: Metadata::default(),
        }
    }
}

/// An ontology individual containing class memberships and property assertions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Individual {
    id: Iri,
    types: BTreeSet<ClassExpression>,
    properties: BTreeMap<Iri, Vec<PropertyAssertion>>,
    metadata: Metadata,
}

impl Individual {
    /// Creates a new individual with the supplied identifier.
    #[must_use]
    pub fn new(id: Iri) -> Self {
        Self {
            id,
            types: BTreeSet::new(),
            properties: BTreeMap::new(),
            metadata: Metadata::default(),
        }
    }

    /// Sets the provenance of the individual's class assertions.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Declares that the individual is an instance of the given class expression.
    pub fn assert_type(&mut self, class: impl Into<ClassExpression>) -> bool {
        self.types.insert(class.into())
    }

    /// Associates the individual with a property assertion.
    pub fn add_property_assertion(&mut self, property: Iri, assertion: PropertyAssertion) {
        self.properties.entry(property).or_default().push(assertion);
    }

    /// Returns the identifier of the individual.
    #[must_use]
    pub fn id(&self) -> &Iri {
        &self.id
    }

    /// Returns the declared types.
    #[must_use]
    pub fn types(&self) -> &BTreeSet<ClassExpression> {
        &self.types
    }

    /// Returns the property assertions.
    #[must_use]
    pub fn properties(&self) -> &BTreeMap<Iri, Vec<PropertyAssertion>> {
        &self.properties
    }

    /// Returns the provenance of the class assertions.
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Object targets reached via `property`, with the edge provenance.
    pub fn related(&self, property: &Iri) -> impl Iterator<Item = (&Iri, &Metadata)> + '_ {
        self.properties
            .get(property)
            .into_iter()
            .flatten()
            .filter_map(|assertion| match assertion {
                PropertyAssertion::Individual { target, metadata } => Some((target, metadata)),
                PropertyAssertion::Literal(_) => None,
            })
    }
}

/// Aggregates ontology classes, properties and individuals.
///
/// An ontology may import others; class and property lookups search the whole
/// import closure, which lets a model carry its individuals while the terms
/// they reference live in a shared tbox.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ontology {
    id: Iri,
    label: Option<String>,
    imports: Vec<Arc<Ontology>>,
    classes: BTreeMap<Iri, Class>,
    properties: BTreeMap<Iri, Property>,
    individuals: BTreeMap<Iri, Individual>,
}

impl Ontology {
    /// Creates a new ontology aggregate with the supplied identifier.
    #[must_use]
    pub fn new(id: Iri) -> Self {
        Self {
            id,
            label: None,
            imports: Vec::new(),
            classes: BTreeMap::new(),
            properties: BTreeMap::new(),
            individuals: BTreeMap::new(),
        }
    }

    /// Sets a human readable label for the ontology.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Adds an imported ontology to the closure.
    #[must_use]
    pub fn with_import(mut self, import: Arc<Ontology>) -> Self {
        self.imports.push(import);
        self
    }

    /// Adds a class to the ontology, enforcing unique identifiers.
    pub fn add_class(&mut self, class: Class) -> Result<(), OntologyError> {
        let id = class.id().clone();
        if self.classes.contains_key(&id) {
            return Err(OntologyError::DuplicateClass(id));
        }
        self.classes.insert(id, class);
        Ok(())
    }

    /// Adds a property to the ontology, enforcing unique identifiers.
    pub fn add_property(&mut self, property: Property) -> Result<(), OntologyError> {
        let id = property.id().clone();
        if self.properties.contains_key(&id) {
            return Err(OntologyError::DuplicateProperty(id));
        }
        self.properties.insert(id, property);
        Ok(())
    }

    /// Adds an individual ensuring it references known classes and properties.
    pub fn add_individual(&mut self, individual: Individual) -> Result<(), OntologyError> {
        let id = individual.id().clone();
        if self.individuals.contains_key(&id) {
            return Err(OntologyError::DuplicateIndividual(id));
        }

        for expression in individual.types() {
            self.validate_expression(expression)?;
        }

        for (property_id, assertions) in individual.properties() {
            let Some(property) = self.property(property_id) else {
                return Err(OntologyError::MissingProperty {
                    ontology: self.id.clone(),
                    property: property_id.clone(),
                });
            };

            for assertion in assertions {
                match (property.kind(), assertion) {
                    (PropertyKind::Object, PropertyAssertion::Individual { .. }) => {}
                    (PropertyKind::Data, PropertyAssertion::Literal(_)) => {}
                    _ => {
                        return Err(OntologyError::InvalidPropertyAssertion {
                            ontology: self.id.clone(),
                            property: property_id.clone(),
                        });
                    }
                }
            }
        }

        self.individuals.insert(id, individual);
        Ok(())
    }

    fn validate_expression(&self, expression: &ClassExpression) -> Result<(), OntologyError> {
        match expression {
            ClassExpression::Class(class) => {
                if self.class(class).is_none() {
                    return Err(OntologyError::MissingClass {
                        ontology: self.id.clone(),
                        class: class.clone(),
                    });
                }
            }
            ClassExpression::SomeValuesFrom(edge) => {
                let property = match edge.property() {
                    PropertyExpression::Named(iri) | PropertyExpression::Inverse(iri) => iri,
                };
                if self.property(property).is_none() {
                    return Err(OntologyError::MissingProperty {
                        ontology: self.id.clone(),
                        property: property.clone(),
                    });
                }
                self.validate_expression(edge.filler())?;
            }
            ClassExpression::IntersectionOf(operands) | ClassExpression::UnionOf(operands) => {
                for operand in operands {
                    self.validate_expression(operand)?;
                }
            }
            ClassExpression::ComplementOf(operand) => self.validate_expression(operand)?,
        }
        Ok(())
    }

    /// Returns the ontology identifier.
    #[must_use]
    pub fn id(&self) -> &Iri {
        &self.id
    }

    /// Returns the optional label.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Retrieves a class by identifier from the import closure.
    #[must_use]
    pub fn class(&self, id: &Iri) -> Option<&Class> {
        self.classes
            .get(id)
            .or_else(|| self.imports.iter().find_map(|import| import.class(id)))
    }

    /// Retrieves a property by identifier from the import closure.
    #[must_use]
    pub fn property(&self, id: &Iri) -> Option<&Property> {
        self.properties
            .get(id)
            .or_else(|| self.imports.iter().find_map(|import| import.property(id)))
    }

    /// Retrieves an individual declared directly in this ontology.
    #[must_use]
    pub fn individual(&self, id: &Iri) -> Option<&Individual> {
        self.individuals.get(id)
    }

    /// Returns the directly declared classes ordered by identifier.
    #[must_use]
    pub fn classes(&self) -> &BTreeMap<Iri, Class> {
        &self.classes
    }

    /// Returns every class in the import closure, own declarations first.
    #[must_use]
    pub fn classes_in_closure(&self) -> Vec<&Class> {
        let mut classes: Vec<&Class> = self.classes.values().collect();
        for import in &self.imports {
            classes.extend(import.classes_in_closure());
        }
        classes
    }

    /// Returns the directly declared properties ordered by identifier.
    #[must_use]
    pub fn properties(&self) -> &BTreeMap<Iri, Property> {
        &self.properties
    }

    /// Returns all individuals ordered by identifier.
    #[must_use]
    pub fn individuals(&self) -> &BTreeMap<Iri, Individual> {
        &self.individuals
    }
}

/// Errors raised when manipulating an ontology aggregate.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum OntologyError {
    /// Attempted to add a class with an existing identifier.
    #[error("class `{0}` already exists")]
    DuplicateClass(Iri),
    /// Attempted to add a property with an existing identifier.
    #[error("property `{0}` already exists")]
    DuplicateProperty(Iri),
    /// Attempted to add an individual with an existing identifier.
    #[error("individual `{0}` already exists")]
    DuplicateIndividual(Iri),
    /// Referenced class was not part of the ontology.
    #[error("class `{class}` does not exist in ontology `{ontology}`")]
    MissingClass { ontology: Iri, class: Iri },
    /// Referenced property was not part of the ontology.
    #[error("property `{property}` does not exist in ontology `{ontology}`")]
    MissingProperty { ontology: Iri, property: Iri },
    /// Property assertion type did not match the property definition.
    #[error("property assertion does not match property `{property}` in ontology `{ontology}`")]
    InvalidPropertyAssertion { ontology: Iri, property: Iri },
}
