use std::collections::HashSet;

use thiserror::Error;

use crate::ontology::{CurieRegistry, Iri, ReasoningQuery};

/// Failures while precomputing the aspect closures.
///
/// A classifier that cannot be built leaves nothing to translate, so these
/// errors abort translator construction.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("failed to compute descendants of `{root}`: {message}")]
    Reasoner { root: Iri, message: String },
}

/// Root terms of the three aspects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AspectRootTerms {
    pub molecular_function: Iri,
    pub biological_process: Iri,
    pub cellular_component: Iri,
}

/// Precomputed membership sets deciding which aspect a term belongs to.
///
/// Function and process closures contain their root; the component closure
/// does not, so annotating directly to the component root is never accepted.
/// The sets are immutable after construction and safe to share between
/// threads.
#[derive(Clone, Debug)]
pub struct AspectClassifier {
    roots: AspectRootTerms,
    mf: HashSet<Iri>,
    bp: HashSet<Iri>,
    cc: HashSet<Iri>,
}

impl AspectClassifier {
    /// Computes the three closures with `reasoner`.
    ///
    /// Only descendants whose CURIE starts with `id_space` are kept and
    /// reasoner built-ins are always skipped. Reflexive roots are members
    /// regardless of their id space.
    pub fn new<R>(
        reasoner: &R,
        registry: &CurieRegistry,
        roots: AspectRootTerms,
        id_space: &str,
    ) -> Result<Self, ClassifierError>
    where
        R: ReasoningQuery + ?Sized,
        R::Error: std::fmt::Display,
    {
        let mf = compute_closure(reasoner, registry, &roots.molecular_function, true, id_space)?;
        let bp = compute_closure(reasoner, registry, &roots.biological_process, true, id_space)?;
        let cc = compute_closure(reasoner, registry, &roots.cellular_component, false, id_space)?;
        tracing::info!(
            mf = mf.len(),
            bp = bp.len(),
            cc = cc.len(),
            "aspect_closures_computed"
        );
        Ok(Self { roots, mf, bp, cc })
    }

    #[must_use]
    pub fn is_mf(&self, term: &Iri) -> bool {
        self.mf.contains(term)
    }

    #[must_use]
    pub fn is_bp(&self, term: &Iri) -> bool {
        self.bp.contains(term)
    }

    #[must_use]
    pub fn is_cc(&self, term: &Iri) -> bool {
        self.cc.contains(term)
    }

    /// Whether `term` is the molecular function root itself.
    #[must_use]
    pub fn is_mf_root(&self, term: &Iri) -> bool {
        &self.roots.molecular_function == term
    }
}

fn compute_closure<R>(
    reasoner: &R,
    registry: &CurieRegistry,
    root: &Iri,
    reflexive: bool,
    id_space: &str,
) -> Result<HashSet<Iri>, ClassifierError>
where
    R: ReasoningQuery + ?Sized,
    R::Error: std::fmt::Display,
{
    let descendants = reasoner
        .descendants_of(root)
        .map_err(|err| ClassifierError::Reasoner {
            root: root.clone(),
            message: err.to_string(),
        })?;

    let in_id_space = |term: &Iri| {
        !term.is_builtin()
            && registry
                .curie(term)
                .is_some_and(|curie| curie.starts_with(id_space))
    };

    let mut closure: HashSet<Iri> = descendants.into_iter().filter(in_id_space).collect();
    if reflexive {
        closure.insert(root.clone());
    }
    Ok(closure)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{AspectClassifier, AspectRootTerms, ClassifierError};
    use crate::ontology::{Class, CurieRegistry, Iri, Ontology, StructuralReasoner};

    fn go(registry: &CurieRegistry, id: &str) -> Iri {
        registry.iri(id).expect("known prefix")
    }

    fn roots(registry: &CurieRegistry) -> AspectRootTerms {
        AspectRootTerms {
            molecular_function: go(registry, "GO:0003674"),
            biological_process: go(registry, "GO:0008150"),
            cellular_component: go(registry, "GO:0005575"),
        }
    }

    fn tbox(registry: &CurieRegistry) -> Arc<Ontology> {
        let mut ontology =
            Ontology::new(Iri::new("http://purl.obolibrary.org/obo/go.owl").expect("iri"));
        for (id, parent) in [
            ("GO:0003674", None),
            ("GO:0008150", None),
            ("GO:0005575", None),
            ("GO:0003824", Some("GO:0003674")),
            ("GO:0016301", Some("GO:0003824")),
            ("GO:0007165", Some("GO:0008150")),
            ("GO:0005634", Some("GO:0005575")),
            ("CHEBI:15377", Some("GO:0005575")),
        ] {
            let mut class = Class::new(go(registry, id));
            if let Some(parent) = parent {
                class = class.with_parent(go(registry, parent));
            }
            ontology.add_class(class).expect("class");
        }
        ontology
            .add_class(Class::new(Iri::owl_nothing()).with_parent(go(registry, "GO:0005634")))
            .expect("nothing");
        Arc::new(ontology)
    }

    fn classifier(registry: &CurieRegistry) -> AspectClassifier {
        let reasoner = StructuralReasoner::new(tbox(registry));
        AspectClassifier::new(&reasoner, registry, roots(registry), "GO:").expect("classifier")
    }

    #[test]
    fn function_and_process_roots_are_members() {
        let registry = CurieRegistry::default();
        let classifier = classifier(&registry);
        assert!(classifier.is_mf(&go(&registry, "GO:0003674")));
        assert!(classifier.is_mf(&go(&registry, "GO:0016301")));
        assert!(classifier.is_bp(&go(&registry, "GO:0008150")));
        assert!(classifier.is_bp(&go(&registry, "GO:0007165")));
        assert!(!classifier.is_bp(&go(&registry, "GO:0016301")));
    }

    #[test]
    fn component_root_is_excluded() {
        let registry = CurieRegistry::default();
        let classifier = classifier(&registry);
        assert!(!classifier.is_cc(&go(&registry, "GO:0005575")));
        assert!(classifier.is_cc(&go(&registry, "GO:0005634")));
    }

    #[test]
    fn foreign_terms_and_builtins_are_filtered() {
        let registry = CurieRegistry::default();
        let classifier = classifier(&registry);
        assert!(!classifier.is_cc(&go(&registry, "CHEBI:15377")));
        assert!(!classifier.is_cc(&Iri::owl_nothing()));
    }

    #[test]
    fn reflexive_root_is_kept_outside_the_id_space() {
        let registry = CurieRegistry::default();
        let reasoner = StructuralReasoner::new(tbox(&registry));
        let classifier = AspectClassifier::new(&reasoner, &registry, roots(&registry), "XX:")
            .expect("classifier");
        assert!(classifier.is_mf(&go(&registry, "GO:0003674")));
        assert!(classifier.is_bp(&go(&registry, "GO:0008150")));
        assert!(!classifier.is_mf(&go(&registry, "GO:0016301")));
        assert!(!classifier.is_cc(&go(&registry, "GO:0005575")));
        assert!(!classifier.is_cc(&go(&registry, "GO:0005634")));
    }

    #[test]
    fn missing_root_is_fatal() {
        let registry = CurieRegistry::default();
        let reasoner = StructuralReasoner::new(Arc::new(Ontology::new(
            Iri::new("http://example.org/empty").expect("iri"),
        )));
        let err = AspectClassifier::new(&reasoner, &registry, roots(&registry), "GO:")
            .expect_err("empty ontology");
        assert!(matches!(err, ClassifierError::Reasoner { .. }));
    }

    #[test]
    fn classifier_is_shared_across_threads() {
        let registry = CurieRegistry::default();
        let classifier = Arc::new(classifier(&registry));
        let kinase = go(&registry, "GO:0016301");
        std::thread::scope(|scope| {
            for _ in 0..4 {
                let classifier = Arc::clone(&classifier);
                let kinase = &kinase;
                scope.spawn(move || assert!(classifier.is_mf(kinase)));
            }
        });
    }
}
