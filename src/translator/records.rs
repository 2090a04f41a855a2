//! Flat output records.

use std::fmt::{self, Display, Formatter};

use serde::Serialize;

/// Ontology branch an annotation belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Aspect {
    #[serde(rename = "F")]
    MolecularFunction,
    #[serde(rename = "P")]
    BiologicalProcess,
    #[serde(rename = "C")]
    CellularComponent,
}

impl Aspect {
    /// Single letter aspect code.
    #[must_use]
    pub fn code(self) -> char {
        match self {
            Self::MolecularFunction => 'F',
            Self::BiologicalProcess => 'P',
            Self::CellularComponent => 'C',
        }
    }

    /// Relation emitted for annotations of this aspect.
    #[must_use]
    pub fn relation(self) -> &'static str {
        match self {
            Self::MolecularFunction => "enables",
            Self::BiologicalProcess => "involved_in",
            Self::CellularComponent => "part_of",
        }
    }
}

impl Display for Aspect {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One annotated entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BioentityRecord {
    pub id: String,
    /// Namespace prefix of `id`, when it is a CURIE.
    pub db: Option<String>,
    pub symbol: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub taxon: Option<String>,
}

/// Atomic extension `relation(filler)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ExtensionEdge {
    pub relation: String,
    pub filler: String,
}

/// One flat annotation line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AnnotationRecord {
    pub bioentity: String,
    pub aspect: Aspect,
    pub term: String,
    pub relation: String,
    /// Short legacy evidence code; absent when the evidence term is unmapped.
    pub evidence_code: Option<String>,
    pub evidence_term: Option<String>,
    pub references: Vec<String>,
    pub with_from: Vec<String>,
    pub extensions: Vec<ExtensionEdge>,
    pub assigned_by: String,
    pub last_update: Option<String>,
}

/// Output of translating one model.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Translation {
    pub bioentities: Vec<BioentityRecord>,
    pub annotations: Vec<AnnotationRecord>,
}

impl Translation {
    /// Annotations of `bioentity`, in emission order.
    pub fn annotations_for<'a>(
        &'a self,
        bioentity: &'a str,
    ) -> impl Iterator<Item = &'a AnnotationRecord> + 'a {
        self.annotations
            .iter()
            .filter(move |annotation| annotation.bioentity == bioentity)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bioentities.is_empty() && self.annotations.is_empty()
    }
}
