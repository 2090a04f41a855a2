//! Causal activity model to legacy annotation translation.
//!
//! Translation runs in two passes. A [`ModelWalk`] visits the model and feeds
//! a [`Summary`] per root entity through the [`ModelHandler`] hooks; the
//! [`AnnotationAssembler`] then flattens each summary into records.

pub mod assembler;
pub mod classifier;
pub mod records;
pub mod summary;
pub mod walker;

use std::collections::BTreeSet;
use std::sync::Arc;

use thiserror::Error;

pub use assembler::AnnotationAssembler;
pub use classifier::{AspectClassifier, AspectRootTerms, ClassifierError};
pub use records::{AnnotationRecord, Aspect, BioentityRecord, ExtensionEdge, Translation};
pub use summary::{Entry, Summary};
pub use walker::{ClassificationPolicy, EnabledByWalk, ModelHandler, ModelWalk, WalkRelations};

use crate::config::{Settings, TranslatorSettings};
use crate::lookup::{EntityResolver, EvidenceResolver};
use crate::ontology::{
    CurieError, CurieRegistry, Iri, Metadata, Ontology, OntologyView, ReasoningQuery,
    RelationalEdge,
};

/// Errors raised while building a translator or translating a model.
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error(transparent)]
    Identifier(#[from] CurieError),

    /// An edge points at an individual the model does not declare.
    #[error("individual `{individual}` referenced in model `{model}` does not exist")]
    MissingIndividual { model: Iri, individual: Iri },
}

impl TranslationError {
    pub(crate) fn missing_individual(model: &Iri, individual: &Iri) -> Self {
        Self::MissingIndividual {
            model: model.clone(),
            individual: individual.clone(),
        }
    }
}

/// Translates models into bioentity and annotation records.
///
/// The translator holds only immutable state after construction; concurrent
/// `translate` calls on a shared instance are independent.
#[derive(Clone)]
pub struct GeneAnnotationTranslator {
    settings: TranslatorSettings,
    registry: CurieRegistry,
    classifier: Arc<AspectClassifier>,
    assembler: AnnotationAssembler,
    walk: EnabledByWalk,
    entities: Option<Arc<dyn EntityResolver>>,
}

impl GeneAnnotationTranslator {
    /// Builds a translator, precomputing the aspect closures with `reasoner`.
    ///
    /// # Errors
    ///
    /// Fails when a configured identifier does not resolve or the reasoner
    /// cannot enumerate the descendants of an aspect root.
    pub fn new<R>(
        settings: &Settings,
        reasoner: &R,
        evidence: Arc<dyn EvidenceResolver>,
    ) -> Result<Self, TranslationError>
    where
        R: ReasoningQuery + ?Sized,
        R::Error: std::fmt::Display,
    {
        let registry = settings.curie_registry();
        let roots = &settings.translator.roots;
        let roots = AspectRootTerms {
            molecular_function: registry.iri(&roots.molecular_function)?,
            biological_process: registry.iri(&roots.biological_process)?,
            cellular_component: registry.iri(&roots.cellular_component)?,
        };
        let classifier = Arc::new(AspectClassifier::new(
            reasoner,
            &registry,
            roots,
            &settings.translator.id_space,
        )?);
        let walk = EnabledByWalk::new(
            WalkRelations::resolve(&settings.walk, &registry)?,
            settings.translator.classification,
        );
        let assembler = AnnotationAssembler::new(
            Arc::clone(&classifier),
            evidence,
            settings.translator.assigned_by.clone(),
        );
        Ok(Self {
            settings: settings.translator.clone(),
            registry,
            classifier,
            assembler,
            walk,
            entities: None,
        })
    }

    /// Resolves entity taxa through `resolver`.
    #[must_use]
    pub fn with_entity_resolver(mut self, resolver: Arc<dyn EntityResolver>) -> Self {
        self.entities = Some(resolver);
        self
    }

    #[must_use]
    pub fn registry(&self) -> &CurieRegistry {
        &self.registry
    }

    /// Translates `model` with the configured walk.
    ///
    /// # Errors
    ///
    /// Fails when the model references individuals it does not declare.
    pub fn translate(
        &self,
        model: &Ontology,
        additional_references: &[String],
    ) -> Result<Translation, TranslationError> {
        self.translate_with(&self.walk, model, additional_references)
    }

    /// Translates `model` with a caller supplied walk strategy.
    ///
    /// # Errors
    ///
    /// Propagates walk failures.
    pub fn translate_with<W: ModelWalk>(
        &self,
        walk: &W,
        model: &Ontology,
        additional_references: &[String],
    ) -> Result<Translation, TranslationError> {
        let span = tracing::info_span!("translate_model", model = %model.id());
        let _guard = span.enter();

        let summaries = walk.walk(model, self)?;
        let view = OntologyView::new(model, &self.registry);
        let mut translation = Translation::default();
        for summary in &summaries {
            let (bioentity, annotations) =
                self.assembler.assemble(summary, &view, additional_references);
            tracing::debug!(
                entity = %bioentity.id,
                activities = summary.activities().len(),
                processes = summary.processes().len(),
                locations = summary.locations().len(),
                annotations = annotations.len(),
                "entity_summary"
            );
            translation.bioentities.push(bioentity);
            translation.annotations.extend(annotations);
        }

        tracing::info!(
            bioentities = translation.bioentities.len(),
            annotations = translation.annotations.len(),
            "translate_model"
        );
        Ok(translation)
    }

    fn entity_type(&self, entity: &Iri) -> &'static str {
        let is_protein = self.registry.curie(entity).is_some_and(|curie| {
            self.settings.protein_prefixes.iter().any(|prefix| {
                curie
                    .split_once(':')
                    .is_some_and(|(namespace, _)| namespace == prefix)
            })
        });
        if is_protein {
            "protein"
        } else {
            "gene"
        }
    }
}

impl ModelHandler for GeneAnnotationTranslator {
    type Payload = Summary;

    fn init_payload(&self, entity: &Iri, model: &Ontology) -> Result<Summary, TranslationError> {
        let taxon = self.entities.as_ref().and_then(|resolver| {
            let view = OntologyView::new(model, &self.registry);
            resolver.entity_taxon(entity, &view)
        });
        Ok(Summary::new(
            entity.clone(),
            self.entity_type(entity),
            taxon,
            Arc::clone(&self.classifier),
            self.settings.metadata_precedence,
        ))
    }

    fn scratch_payload(&self, payload: &Summary) -> Summary {
        payload.scratch()
    }

    fn handle_mf(
        &self,
        payload: &mut Summary,
        term: &Iri,
        metadata: &Metadata,
        expressions: &BTreeSet<RelationalEdge>,
    ) -> bool {
        payload.add_mf(term, metadata, expressions)
    }

    fn handle_bp(
        &self,
        payload: &mut Summary,
        term: &Iri,
        metadata: &Metadata,
        expressions: &BTreeSet<RelationalEdge>,
    ) -> bool {
        payload.add_bp(term, metadata, expressions)
    }

    fn handle_cc(
        &self,
        payload: &mut Summary,
        term: &Iri,
        metadata: &Metadata,
        expressions: &BTreeSet<RelationalEdge>,
    ) -> bool {
        payload.add_cc(term, metadata, expressions)
    }

    fn merge_processes(&self, payload: &mut Summary, foreign: &Summary, edge_metadata: &Metadata) {
        payload.add_processes(foreign.processes(), edge_metadata);
    }

    fn merge_locations(&self, payload: &mut Summary, foreign: &Summary) {
        payload.add_locations(foreign.locations());
    }
}
