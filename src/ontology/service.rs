use std::{
    collections::{BTreeMap, BTreeSet, VecDeque},
    sync::Arc,
};

use crate::ontology::{entities::Ontology, repositories::ReasoningQuery, value_objects::Iri};

/// Type alias simplifying reasoner trait object usage across the crate.
pub type ReasonerHandle = dyn ReasoningQuery<Error = OntologyServiceError> + Send + Sync + 'static;

/// Errors raised by ontology infrastructure components.
#[derive(Debug, thiserror::Error)]
pub enum OntologyServiceError {
    /// Referenced class was not found in the ontology.
    #[error("class `{class}` missing in ontology `{ontology}`")]
    MissingClass { ontology: Iri, class: Iri },
}

impl OntologyServiceError {
    fn missing_class(ontology: &Iri, class: &Iri) -> Self {
        Self::MissingClass {
            ontology: ontology.clone(),
            class: class.clone(),
        }
    }
}

/// Reasoner answering subclass queries from asserted parent links only.
///
/// The child index is computed once, so the reasoner represents a fixed
/// snapshot of the ontology it was built from.
#[derive(Clone, Debug)]
pub struct StructuralReasoner {
    ontology: Arc<Ontology>,
    children: BTreeMap<Iri, BTreeSet<Iri>>,
}

impl StructuralReasoner {
    /// Indexes the import closure of `ontology`.
    #[must_use]
    pub fn new(ontology: Arc<Ontology>) -> Self {
        let mut children: BTreeMap<Iri, BTreeSet<Iri>> = BTreeMap::new();
        for class in ontology.classes_in_closure() {
            for parent in class.parents() {
                children
                    .entry(parent.clone())
                    .or_default()
                    .insert(class.id().clone());
            }
        }
        tracing::debug!(
            ontology = %ontology.id(),
            indexed_parents = children.len(),
            "structural_reasoner_indexed"
        );
        Self { ontology, children }
    }

    fn ensure_class(&self, class: &Iri) -> Result<(), OntologyServiceError> {
        if self.ontology.class(class).is_none() {
            return Err(OntologyServiceError::missing_class(
                self.ontology.id(),
                class,
            ));
        }
        Ok(())
    }
}

impl ReasoningQuery for StructuralReasoner {
    type Error = OntologyServiceError;

    fn ancestors_of(&self, class: &Iri) -> Result<Vec<Iri>, Self::Error> {
        let Some(start) = self.ontology.class(class) else {
            return Err(OntologyServiceError::missing_class(
                self.ontology.id(),
                class,
            ));
        };

        let mut visited = BTreeSet::new();
        let mut to_visit: VecDeque<Iri> = start.parents().iter().cloned().collect();
        let mut result = Vec::new();

        while let Some(current) = to_visit.pop_front() {
            if visited.insert(current.clone()) {
                result.push(current.clone());
                if let Some(parent) = self.ontology.class(&current) {
                    to_visit.extend(parent.parents().iter().cloned());
                }
            }
        }

        Ok(result)
    }

    fn descendants_of(&self, class: &Iri) -> Result<Vec<Iri>, Self::Error> {
        self.ensure_class(class)?;

        let mut visited = BTreeSet::new();
        let mut to_visit: VecDeque<&Iri> = VecDeque::from([class]);
        while let Some(current) = to_visit.pop_front() {
            for child in self.children.get(current).into_iter().flatten() {
                if child != class && visited.insert(child.clone()) {
                    to_visit.push_back(child);
                }
            }
        }

        Ok(visited.into_iter().collect())
    }
}
