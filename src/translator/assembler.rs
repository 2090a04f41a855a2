use std::collections::BTreeSet;
use std::sync::Arc;

use crate::lookup::EvidenceResolver;
use crate::ontology::{Iri, OntologyContext, RelationalEdge};

use super::classifier::AspectClassifier;
use super::records::{AnnotationRecord, Aspect, BioentityRecord, ExtensionEdge};
use super::summary::{Entry, Summary};

/// Turns a completed [`Summary`] into flat records.
#[derive(Clone)]
pub struct AnnotationAssembler {
    classifier: Arc<AspectClassifier>,
    evidence: Arc<dyn EvidenceResolver>,
    assigned_by: String,
}

impl AnnotationAssembler {
    #[must_use]
    pub fn new(
        classifier: Arc<AspectClassifier>,
        evidence: Arc<dyn EvidenceResolver>,
        assigned_by: impl Into<String>,
    ) -> Self {
        Self {
            classifier,
            evidence,
            assigned_by: assigned_by.into(),
        }
    }

    /// Emits the bioentity record and its function, process and component
    /// annotations, in that order.
    pub fn assemble(
        &self,
        summary: &Summary,
        context: &dyn OntologyContext,
        additional_references: &[String],
    ) -> (BioentityRecord, Vec<AnnotationRecord>) {
        let bioentity = bioentity_record(summary, context);
        let mut annotations = Vec::new();

        for entry in summary.activities() {
            if self.classifier.is_mf_root(&entry.value) && entry.expressions.is_empty() {
                tracing::debug!(
                    bioentity = %bioentity.id,
                    "molecular_function_root_suppressed"
                );
                continue;
            }
            annotations.push(self.annotation(
                &bioentity.id,
                Aspect::MolecularFunction,
                entry,
                context,
                additional_references,
            ));
        }

        for entry in summary.processes() {
            annotations.push(self.annotation(
                &bioentity.id,
                Aspect::BiologicalProcess,
                entry,
                context,
                additional_references,
            ));
        }

        for entry in summary.locations() {
            if !self.classifier.is_cc(&entry.value) {
                continue;
            }
            annotations.push(self.annotation(
                &bioentity.id,
                Aspect::CellularComponent,
                entry,
                context,
                additional_references,
            ));
        }

        (bioentity, annotations)
    }

    fn annotation(
        &self,
        bioentity: &str,
        aspect: Aspect,
        entry: &Entry<Iri>,
        context: &dyn OntologyContext,
        additional_references: &[String],
    ) -> AnnotationRecord {
        let metadata = &entry.metadata;
        let mut references: Vec<String> = Vec::new();
        for reference in metadata.sources().iter().chain(additional_references) {
            push_unique(&mut references, reference);
        }

        let mut evidence_code = None;
        let mut evidence_term = None;
        if let Some(evidence) = metadata.evidence() {
            let curie = context.curie(evidence);
            match self.evidence.find_short_evidence(evidence, &curie, context) {
                Some(short) => {
                    evidence_code = Some(short.code);
                    if let Some(reference) = short.reference {
                        push_unique(&mut references, &reference);
                    }
                }
                None => {
                    tracing::debug!(evidence = %curie, bioentity, "evidence_lookup_miss");
                }
            }
            evidence_term = Some(curie);
        }

        AnnotationRecord {
            bioentity: bioentity.to_string(),
            aspect,
            term: context.curie(&entry.value),
            relation: aspect.relation().to_string(),
            evidence_code,
            evidence_term,
            references,
            with_from: metadata.with_from_references().to_vec(),
            extensions: extensions(&entry.expressions, context),
            assigned_by: self.assigned_by.clone(),
            last_update: metadata.date().map(str::to_string),
        }
    }
}

fn bioentity_record(summary: &Summary, context: &dyn OntologyContext) -> BioentityRecord {
    let id = context.curie(summary.entity());
    let db = id
        .split_once(':')
        .map(|(prefix, _)| prefix.to_string())
        .filter(|_| context.registry().curie(summary.entity()).is_some());
    let symbol = context
        .label(summary.entity())
        .map_or_else(|| id.clone(), str::to_string);
    BioentityRecord {
        db,
        symbol,
        entity_type: summary.entity_type().to_string(),
        taxon: summary.entity_taxon().map(str::to_string),
        id,
    }
}

fn extensions(
    expressions: &BTreeSet<RelationalEdge>,
    context: &dyn OntologyContext,
) -> Vec<ExtensionEdge> {
    expressions
        .iter()
        .filter_map(|edge| {
            let Some((property, filler)) = edge.as_atomic() else {
                tracing::debug!(edge = ?edge, "extension_dropped");
                return None;
            };
            Some(ExtensionEdge {
                relation: context.relation_id(property),
                filler: context.curie(filler),
            })
        })
        .collect()
}

fn push_unique(references: &mut Vec<String>, reference: &str) {
    if !references.iter().any(|known| known == reference) {
        references.push(reference.to_string());
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use super::AnnotationAssembler;
    use crate::lookup::EcoCodeMapper;
    use crate::ontology::{
        Class, ClassExpression, CurieRegistry, Iri, Metadata, MetadataPrecedence, Ontology,
        OntologyView, Property, PropertyExpression, PropertyKind, RelationalEdge,
        StructuralReasoner,
    };
    use crate::translator::classifier::{AspectClassifier, AspectRootTerms};
    use crate::translator::records::{Aspect, ExtensionEdge};
    use crate::translator::summary::{Entry, Summary};

    fn id(curie: &str) -> Iri {
        CurieRegistry::default().iri(curie).expect("known prefix")
    }

    fn tbox() -> Ontology {
        let mut ontology =
            Ontology::new(Iri::new("http://purl.obolibrary.org/obo/go.owl").expect("iri"));
        for (term, parent, label) in [
            ("GO:0003674", None, "molecular_function"),
            ("GO:0008150", None, "biological_process"),
            ("GO:0005575", None, "cellular_component"),
            ("GO:0016301", Some("GO:0003674"), "kinase activity"),
            ("GO:0007165", Some("GO:0008150"), "signal transduction"),
            ("GO:0005634", Some("GO:0005575"), "nucleus"),
            ("UniProtKB:P12345", None, "ABC1"),
        ] {
            let mut class = Class::new(id(term)).with_label(label);
            if let Some(parent) = parent {
                class = class.with_parent(id(parent));
            }
            ontology.add_class(class).expect("class");
        }
        ontology
            .add_property(
                Property::new(id("BFO:0000066"), PropertyKind::Object).with_shorthand("occurs_in"),
            )
            .expect("property");
        ontology
    }

    fn fixture() -> (Ontology, Arc<AspectClassifier>, AnnotationAssembler) {
        let ontology = tbox();
        let reasoner = StructuralReasoner::new(Arc::new(ontology.clone()));
        let roots = AspectRootTerms {
            molecular_function: id("GO:0003674"),
            biological_process: id("GO:0008150"),
            cellular_component: id("GO:0005575"),
        };
        let classifier = Arc::new(
            AspectClassifier::new(&reasoner, &CurieRegistry::default(), roots, "GO:")
                .expect("classifier"),
        );
        let mapper =
            EcoCodeMapper::new().with_code(id("ECO:0000314"), "IDA", Some("GO_REF:0000001"));
        let assembler =
            AnnotationAssembler::new(Arc::clone(&classifier), Arc::new(mapper), "GO_Noctua");
        (ontology, classifier, assembler)
    }

    fn summary(classifier: &Arc<AspectClassifier>) -> Summary {
        Summary::new(
            id("UniProtKB:P12345"),
            "protein",
            Some("NCBITaxon:9606".to_string()),
            Arc::clone(classifier),
            MetadataPrecedence::PreferLocal,
        )
    }

    #[test]
    fn emits_one_record_per_aspect() {
        let (ontology, classifier, assembler) = fixture();
        let registry = CurieRegistry::default();
        let view = OntologyView::new(&ontology, &registry);
        let metadata = Metadata::new()
            .with_evidence(id("ECO:0000314"))
            .with_date("2024-01-01")
            .with_source("PMID:1");
        let nucleus = BTreeSet::from([RelationalEdge::named(id("BFO:0000066"), id("GO:0005634"))]);

        let mut summary = summary(&classifier);
        assert!(summary.add_mf(&id("GO:0016301"), &metadata, &nucleus));
        assert!(summary.add_bp(&id("GO:0007165"), &metadata, &BTreeSet::new()));
        assert!(summary.add_cc(&id("GO:0005634"), &metadata, &BTreeSet::new()));

        let (bioentity, annotations) =
            assembler.assemble(&summary, &view, &["PMID:99".to_string(), "PMID:1".to_string()]);
        assert_eq!(bioentity.id, "UniProtKB:P12345");
        assert_eq!(bioentity.db.as_deref(), Some("UniProtKB"));
        assert_eq!(bioentity.symbol, "ABC1");
        assert_eq!(bioentity.taxon.as_deref(), Some("NCBITaxon:9606"));

        let shape: Vec<_> = annotations
            .iter()
            .map(|annotation| {
                (
                    annotation.aspect,
                    annotation.term.as_str(),
                    annotation.relation.as_str(),
                )
            })
            .collect();
        assert_eq!(
            shape,
            vec![
                (Aspect::MolecularFunction, "GO:0016301", "enables"),
                (Aspect::BiologicalProcess, "GO:0007165", "involved_in"),
                (Aspect::CellularComponent, "GO:0005634", "part_of"),
            ]
        );

        let function = &annotations[0];
        assert_eq!(function.evidence_code.as_deref(), Some("IDA"));
        assert_eq!(function.evidence_term.as_deref(), Some("ECO:0000314"));
        assert_eq!(function.references, ["PMID:1", "PMID:99", "GO_REF:0000001"]);
        assert_eq!(function.last_update.as_deref(), Some("2024-01-01"));
        assert_eq!(function.assigned_by, "GO_Noctua");
        assert_eq!(
            function.extensions,
            vec![ExtensionEdge {
                relation: "occurs_in".to_string(),
                filler: "GO:0005634".to_string(),
            }]
        );
    }

    #[test]
    fn function_root_is_suppressed_without_edges() {
        let (ontology, classifier, assembler) = fixture();
        let registry = CurieRegistry::default();
        let view = OntologyView::new(&ontology, &registry);

        let mut bare = summary(&classifier);
        bare.add_mf(&id("GO:0003674"), &Metadata::new(), &BTreeSet::new());
        let (_, annotations) = assembler.assemble(&bare, &view, &[]);
        assert!(annotations.is_empty());

        let mut extended = summary(&classifier);
        let edge = BTreeSet::from([RelationalEdge::named(id("BFO:0000066"), id("GO:0005634"))]);
        extended.add_mf(&id("GO:0003674"), &Metadata::new(), &edge);
        let (_, annotations) = assembler.assemble(&extended, &view, &[]);
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].term, "GO:0003674");
    }

    #[test]
    fn locations_outside_the_component_closure_are_not_emitted() {
        let (ontology, classifier, assembler) = fixture();
        let registry = CurieRegistry::default();
        let view = OntologyView::new(&ontology, &registry);

        let mut summary = summary(&classifier);
        assert!(summary.add_cc(&id("GO:0005634"), &Metadata::new(), &BTreeSet::new()));
        summary.add_locations(&BTreeSet::from([
            Entry::new(id("GO:0005575"), Metadata::new(), BTreeSet::new()),
            Entry::new(id("GO:0016301"), Metadata::new(), BTreeSet::new()),
        ]));
        assert_eq!(summary.locations().len(), 3);

        let (_, annotations) = assembler.assemble(&summary, &view, &[]);
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].aspect, Aspect::CellularComponent);
        assert_eq!(annotations[0].term, "GO:0005634");
    }

    #[test]
    fn unmapped_evidence_keeps_term_without_code() {
        let (ontology, classifier, assembler) = fixture();
        let registry = CurieRegistry::default();
        let view = OntologyView::new(&ontology, &registry);

        let mut summary = summary(&classifier);
        let metadata = Metadata::new().with_evidence(id("ECO:0000000"));
        summary.add_bp(&id("GO:0007165"), &metadata, &BTreeSet::new());
        let (_, annotations) = assembler.assemble(&summary, &view, &[]);
        assert_eq!(annotations[0].evidence_code, None);
        assert_eq!(annotations[0].evidence_term.as_deref(), Some("ECO:0000000"));
        assert!(annotations[0].references.is_empty());
    }

    #[test]
    fn composite_edges_are_dropped_and_undeclared_relations_use_curies() {
        let (ontology, classifier, assembler) = fixture();
        let registry = CurieRegistry::default();
        let view = OntologyView::new(&ontology, &registry);

        let nested = RelationalEdge::new(
            PropertyExpression::Named(id("BFO:0000066")),
            ClassExpression::some_values_from(
                PropertyExpression::Named(id("BFO:0000050")),
                ClassExpression::Class(id("GO:0005634")),
            ),
        );
        let undeclared = RelationalEdge::named(id("RO:0002233"), id("CHEBI:15377"));
        let mut summary = summary(&classifier);
        summary.add_mf(
            &id("GO:0016301"),
            &Metadata::new(),
            &BTreeSet::from([nested, undeclared]),
        );
        let (_, annotations) = assembler.assemble(&summary, &view, &[]);
        assert_eq!(
            annotations[0].extensions,
            vec![ExtensionEdge {
                relation: "RO:0002233".to_string(),
                filler: "CHEBI:15377".to_string(),
            }]
        );
    }

    #[test]
    fn symbol_falls_back_to_identifier() {
        let (ontology, classifier, assembler) = fixture();
        let registry = CurieRegistry::default();
        let view = OntologyView::new(&ontology, &registry);
        let summary = Summary::new(
            id("MGI:MGI:97490"),
            "gene",
            None,
            classifier,
            MetadataPrecedence::PreferLocal,
        );
        let (bioentity, annotations) = assembler.assemble(&summary, &view, &[]);
        assert_eq!(bioentity.id, "MGI:MGI:97490");
        assert_eq!(bioentity.db.as_deref(), Some("MGI"));
        assert_eq!(bioentity.symbol, "MGI:MGI:97490");
        assert!(annotations.is_empty());
    }
}
