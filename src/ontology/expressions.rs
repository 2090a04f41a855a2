use std::collections::BTreeSet;

use super::value_objects::Iri;

/// Property position of an existential restriction.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyExpression {
    /// A named object property.
    Named(Iri),
    /// The inverse of a named object property.
    Inverse(Iri),
}

impl PropertyExpression {
    /// Returns the property identifier when the expression is atomic.
    #[must_use]
    pub fn as_named(&self) -> Option<&Iri> {
        match self {
            Self::Named(iri) => Some(iri),
            Self::Inverse(_) => None,
        }
    }
}

/// Class expressions supported by model graphs.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClassExpression {
    /// A named class.
    Class(Iri),
    /// Existential restriction `property some filler`.
    SomeValuesFrom(Box<RelationalEdge>),
    /// Conjunction of the nested expressions.
    IntersectionOf(BTreeSet<ClassExpression>),
    /// Disjunction of the nested expressions.
    UnionOf(BTreeSet<ClassExpression>),
    /// Negation of the nested expression.
    ComplementOf(Box<ClassExpression>),
}

impl ClassExpression {
    /// Wraps a relational edge as an existential restriction.
    #[must_use]
    pub fn some_values_from(property: PropertyExpression, filler: ClassExpression) -> Self {
        Self::SomeValuesFrom(Box::new(RelationalEdge::new(property, filler)))
    }

    /// Returns the class identifier when the expression is a named class.
    #[must_use]
    pub fn as_class(&self) -> Option<&Iri> {
        match self {
            Self::Class(iri) => Some(iri),
            _ => None,
        }
    }

    /// Named classes asserted by this expression, looking through conjunctions.
    #[must_use]
    pub fn named_classes(&self) -> Vec<&Iri> {
        match self {
            Self::Class(iri) => vec![iri],
            Self::IntersectionOf(operands) => operands
                .iter()
                .flat_map(ClassExpression::named_classes)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Existential restrictions asserted by this expression, looking through conjunctions.
    #[must_use]
    pub fn relational_edges(&self) -> Vec<&RelationalEdge> {
        match self {
            Self::SomeValuesFrom(edge) => vec![edge.as_ref()],
            Self::IntersectionOf(operands) => operands
                .iter()
                .flat_map(ClassExpression::relational_edges)
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl From<Iri> for ClassExpression {
    fn from(iri: Iri) -> Self {
        Self::Class(iri)
    }
}

/// Existential relational edge `(predicate, filler)` attached to a term.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelationalEdge {
    property: PropertyExpression,
    filler: ClassExpression,
}

impl RelationalEdge {
    /// Creates a new edge.
    #[must_use]
    pub fn new(property: PropertyExpression, filler: ClassExpression) -> Self {
        Self { property, filler }
    }

    /// Convenience constructor for a named property pointing at a named class.
    #[must_use]
    pub fn named(property: Iri, filler: Iri) -> Self {
        Self::new(PropertyExpression::Named(property), ClassExpression::Class(filler))
    }

    #[must_use]
    pub fn property(&self) -> &PropertyExpression {
        &self.property
    }

    #[must_use]
    pub fn filler(&self) -> &ClassExpression {
        &self.filler
    }

    /// Returns `(property, filler)` when both positions are atomic.
    ///
    /// Only atomic edges can be rendered as annotation extensions.
    #[must_use]
    pub fn as_atomic(&self) -> Option<(&Iri, &Iri)> {
        Some((self.property.as_named()?, self.filler.as_class()?))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::{ClassExpression, PropertyExpression, RelationalEdge};
    use crate::ontology::value_objects::Iri;

    fn iri(text: &str) -> Iri {
        Iri::new(text).expect("valid iri")
    }

    #[test]
    fn atomic_edges_expose_both_positions() {
        let edge = RelationalEdge::named(iri("http://x.org/occurs_in"), iri("http://x.org/cell"));
        assert_eq!(
            edge.as_atomic(),
            Some((&iri("http://x.org/occurs_in"), &iri("http://x.org/cell")))
        );
    }

    #[test]
    fn composite_edges_are_not_atomic() {
        let inverse = RelationalEdge::new(
            PropertyExpression::Inverse(iri("http://x.org/part_of")),
            ClassExpression::Class(iri("http://x.org/cell")),
        );
        assert!(inverse.as_atomic().is_none());

        let nested = RelationalEdge::new(
            PropertyExpression::Named(iri("http://x.org/part_of")),
            ClassExpression::ComplementOf(Box::new(ClassExpression::Class(iri(
                "http://x.org/cell",
            )))),
        );
        assert!(nested.as_atomic().is_none());
    }

    #[test]
    fn conjunctions_expose_classes_and_edges() {
        let edge = RelationalEdge::named(iri("http://x.org/occurs_in"), iri("http://x.org/cell"));
        let expression = ClassExpression::IntersectionOf(BTreeSet::from([
            ClassExpression::Class(iri("http://x.org/kinase")),
            ClassExpression::SomeValuesFrom(Box::new(edge.clone())),
        ]));
        assert_eq!(expression.named_classes(), vec![&iri("http://x.org/kinase")]);
        assert_eq!(expression.relational_edges(), vec![&edge]);
    }
}
