//! Model traversal.
//!
//! A [`ModelWalk`] decides which individuals and edges of a model matter; a
//! [`ModelHandler`] decides what to do with the classes it is handed. The
//! default [`EnabledByWalk`] follows the usual causal activity model layout:
//!
//! ```text
//! entity <-enabled_by- activity -part_of-> process
//!                          |  \-occurs_in-> location -part_of-> location ...
//!                          \-causal-> activity -part_of-> process
//! ```

use std::collections::{btree_map, BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::config::WalkSettings;
use crate::ontology::{
    CurieRegistry, Individual, Iri, Metadata, MetadataPrecedence, Ontology, RelationalEdge,
};

use super::records::Aspect;
use super::TranslationError;

/// How many aspects a single asserted class may be filed under.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationPolicy {
    /// Stop at the first accepting aspect, in the order the walk tries them.
    #[default]
    FirstMatch,
    /// Offer the class to every aspect the walk tries.
    AllMatching,
}

/// Receiver of the classes a walk reaches.
pub trait ModelHandler {
    /// Per-entity accumulator.
    type Payload;

    /// Starts the payload of a root entity.
    fn init_payload(
        &self,
        entity: &Iri,
        model: &Ontology,
    ) -> Result<Self::Payload, TranslationError>;

    /// Empty payload for the same entity, collecting entries to merge later.
    fn scratch_payload(&self, payload: &Self::Payload) -> Self::Payload;

    fn handle_mf(
        &self,
        payload: &mut Self::Payload,
        term: &Iri,
        metadata: &Metadata,
        expressions: &BTreeSet<RelationalEdge>,
    ) -> bool;

    fn handle_bp(
        &self,
        payload: &mut Self::Payload,
        term: &Iri,
        metadata: &Metadata,
        expressions: &BTreeSet<RelationalEdge>,
    ) -> bool;

    fn handle_cc(
        &self,
        payload: &mut Self::Payload,
        term: &Iri,
        metadata: &Metadata,
        expressions: &BTreeSet<RelationalEdge>,
    ) -> bool;

    /// Adopts processes found through a causal edge carrying `edge_metadata`.
    fn merge_processes(
        &self,
        payload: &mut Self::Payload,
        foreign: &Self::Payload,
        edge_metadata: &Metadata,
    );

    /// Adopts locations found through a containment chain.
    fn merge_locations(&self, payload: &mut Self::Payload, foreign: &Self::Payload);
}

/// Traversal strategy over a model.
pub trait ModelWalk {
    /// Visits `model` and returns one completed payload per root entity.
    fn walk<H: ModelHandler>(
        &self,
        model: &Ontology,
        handler: &H,
    ) -> Result<Vec<H::Payload>, TranslationError>;
}

/// Relations the default walk follows, resolved to identifiers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalkRelations {
    pub enabled_by: Iri,
    pub part_of: Iri,
    pub occurs_in: Iri,
    pub causal: Vec<Iri>,
}

impl WalkRelations {
    /// Resolves configured CURIEs through `registry`.
    pub fn resolve(
        settings: &WalkSettings,
        registry: &CurieRegistry,
    ) -> Result<Self, TranslationError> {
        Ok(Self {
            enabled_by: registry.iri(&settings.enabled_by)?,
            part_of: registry.iri(&settings.part_of)?,
            occurs_in: registry.iri(&settings.occurs_in)?,
            causal: settings
                .causal_relations
                .iter()
                .map(|id| registry.iri(id))
                .collect::<Result<_, _>>()?,
        })
    }
}

/// Walk starting from every `enabled_by` edge of the model.
///
/// Payloads are keyed by the entity class, so several activities enabled by
/// the same gene product contribute to one payload.
#[derive(Clone, Debug)]
pub struct EnabledByWalk {
    relations: WalkRelations,
    policy: ClassificationPolicy,
}

impl EnabledByWalk {
    #[must_use]
    pub fn new(relations: WalkRelations, policy: ClassificationPolicy) -> Self {
        Self { relations, policy }
    }

    fn target<'m>(model: &'m Ontology, id: &Iri) -> Result<&'m Individual, TranslationError> {
        model
            .individual(id)
            .ok_or_else(|| TranslationError::missing_individual(model.id(), id))
    }

    /// Offers every named type of `node` to the handler under `aspects`.
    fn classify<H: ModelHandler>(
        &self,
        handler: &H,
        payload: &mut H::Payload,
        node: &Individual,
        edge_metadata: &Metadata,
        aspects: &[Aspect],
    ) {
        let metadata =
            Metadata::combine(edge_metadata, node.metadata(), MetadataPrecedence::PreferLocal);
        let expressions: BTreeSet<RelationalEdge> = node
            .types()
            .iter()
            .flat_map(|expression| expression.relational_edges())
            .cloned()
            .collect();

        for term in node.types().iter().flat_map(|expression| expression.named_classes()) {
            for aspect in aspects {
                let accepted = match aspect {
                    Aspect::MolecularFunction => {
                        handler.handle_mf(payload, term, &metadata, &expressions)
                    }
                    Aspect::BiologicalProcess => {
                        handler.handle_bp(payload, term, &metadata, &expressions)
                    }
                    Aspect::CellularComponent => {
                        handler.handle_cc(payload, term, &metadata, &expressions)
                    }
                };
                if accepted && self.policy == ClassificationPolicy::FirstMatch {
                    break;
                }
            }
        }
    }

    fn visit_activity<H: ModelHandler>(
        &self,
        model: &Ontology,
        handler: &H,
        payload: &mut H::Payload,
        activity: &Individual,
        edge_metadata: &Metadata,
    ) -> Result<(), TranslationError> {
        self.classify(
            handler,
            payload,
            activity,
            edge_metadata,
            &[
                Aspect::MolecularFunction,
                Aspect::BiologicalProcess,
                Aspect::CellularComponent,
            ],
        );

        for (process, metadata) in activity.related(&self.relations.part_of) {
            let process = Self::target(model, process)?;
            self.classify(handler, payload, process, metadata, &[Aspect::BiologicalProcess]);
        }

        for (location, metadata) in activity.related(&self.relations.occurs_in) {
            let location = Self::target(model, location)?;
            self.classify(handler, payload, location, metadata, &[Aspect::CellularComponent]);
            let containers = self.containers(model, handler, payload, location)?;
            handler.merge_locations(payload, &containers);
        }

        for relation in &self.relations.causal {
            for (downstream, metadata) in activity.related(relation) {
                let downstream = Self::target(model, downstream)?;
                let mut foreign = handler.scratch_payload(payload);
                for (process, process_metadata) in downstream.related(&self.relations.part_of) {
                    let process = Self::target(model, process)?;
                    self.classify(
                        handler,
                        &mut foreign,
                        process,
                        process_metadata,
                        &[Aspect::BiologicalProcess],
                    );
                }
                handler.merge_processes(payload, &foreign, metadata);
            }
        }

        Ok(())
    }

    /// Locations transitively containing `location`.
    fn containers<H: ModelHandler>(
        &self,
        model: &Ontology,
        handler: &H,
        payload: &H::Payload,
        location: &Individual,
    ) -> Result<H::Payload, TranslationError> {
        let mut collected = handler.scratch_payload(payload);
        let mut visited = BTreeSet::from([location.id().clone()]);
        let mut pending = vec![location];
        while let Some(current) = pending.pop() {
            for (container, metadata) in current.related(&self.relations.part_of) {
                if !visited.insert(container.clone()) {
                    continue;
                }
                let container = Self::target(model, container)?;
                self.classify(
                    handler,
                    &mut collected,
                    container,
                    metadata,
                    &[Aspect::CellularComponent],
                );
                pending.push(container);
            }
        }
        Ok(collected)
    }
}

impl ModelWalk for EnabledByWalk {
    fn walk<H: ModelHandler>(
        &self,
        model: &Ontology,
        handler: &H,
    ) -> Result<Vec<H::Payload>, TranslationError> {
        let mut payloads: BTreeMap<Iri, H::Payload> = BTreeMap::new();

        for activity in model.individuals().values() {
            for (entity_node, metadata) in activity.related(&self.relations.enabled_by) {
                let entity_node = Self::target(model, entity_node)?;
                let Some(entity) = entity_node
                    .types()
                    .iter()
                    .find_map(|expression| expression.as_class())
                else {
                    tracing::debug!(individual = %entity_node.id(), "untyped_entity_skipped");
                    continue;
                };

                let payload = match payloads.entry(entity.clone()) {
                    btree_map::Entry::Occupied(occupied) => occupied.into_mut(),
                    btree_map::Entry::Vacant(vacant) => {
                        vacant.insert(handler.init_payload(entity, model)?)
                    }
                };
                self.visit_activity(model, handler, payload, activity, metadata)?;
            }
        }

        Ok(payloads.into_values().collect())
    }
}
