//! Core ontology domain primitives and contracts.
//!
//! The module defines value objects and aggregate roots describing ontologies
//! and causal activity models independently from any file format, plus the
//! traits describing the reasoning and lookup behavior the translator needs.

pub mod curie;
pub mod entities;
pub mod expressions;
pub mod metadata;
pub mod repositories;
pub mod service;
pub mod value_objects;

pub use curie::{CurieError, CurieRegistry};
pub use entities::{
    Class, Individual, Ontology, OntologyError, Property, PropertyAssertion, PropertyKind,
};
pub use expressions::{ClassExpression, PropertyExpression, RelationalEdge};
pub use metadata::{Metadata, MetadataPrecedence};
pub use repositories::{OntologyContext, OntologyView, ReasoningQuery};
pub use service::{OntologyServiceError, ReasonerHandle, StructuralReasoner};
pub use value_objects::{Iri, IriError};
