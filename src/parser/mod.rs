//! Reconstruction of class expressions from tagged JSON input.
//!
//! The parser is how relational edges enter model graphs: clients send
//! [`JsonOwlObject`] trees and the parser validates them twice, once for
//! structural completeness ([`ParseError::MissingParameter`]) and once for
//! identifier resolvability ([`ParseError::UnknownIdentifier`]). It has no
//! side effects besides registry lookups, so the same parser re-validates
//! persisted expressions.

pub mod json;

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

pub use json::{JsonOwlObject, JsonOwlObjectType};

use crate::ontology::{
    ClassExpression, Iri, OntologyContext, PropertyExpression, RelationalEdge,
};

/// Errors raised while parsing class expressions.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The input is structurally incomplete.
    #[error("missing parameter: {0}")]
    MissingParameter(String),
    /// A well-formed identifier does not resolve in the ontology context.
    #[error("unknown identifier `{id}`: {reason}")]
    UnknownIdentifier { id: String, reason: String },
}

impl ParseError {
    fn missing(what: impl Into<String>) -> Self {
        Self::MissingParameter(what.into())
    }

    fn unknown(id: &str, reason: impl Into<String>) -> Self {
        Self::UnknownIdentifier {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}

/// Client-side names bound to identifiers earlier in the same batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VariableBindings {
    values: BTreeMap<String, Iri>,
}

impl VariableBindings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `value`, returning the previous binding.
    pub fn bind(&mut self, name: impl Into<String>, value: Iri) -> Option<Iri> {
        self.values.insert(name.into(), value)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Iri> {
        self.values.get(name)
    }
}

/// Builds [`ClassExpression`] values from [`JsonOwlObject`] trees.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExpressionParser;

impl ExpressionParser {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parses `expression` against `context`.
    ///
    /// # Errors
    ///
    /// [`ParseError::MissingParameter`] for absent input, tags, ids, properties
    /// or fillers; [`ParseError::UnknownIdentifier`] for ids that do not
    /// resolve to a declared class or object property.
    pub fn parse<C>(
        &self,
        context: &C,
        expression: Option<&JsonOwlObject>,
        bindings: Option<&VariableBindings>,
    ) -> Result<ClassExpression, ParseError>
    where
        C: OntologyContext + ?Sized,
    {
        let expression = expression.ok_or_else(|| ParseError::missing("expression"))?;
        self.parse_expression(context, expression, bindings, "expression")
    }

    /// Parses an existential restriction directly into a [`RelationalEdge`].
    pub fn parse_edge<C>(
        &self,
        context: &C,
        expression: Option<&JsonOwlObject>,
        bindings: Option<&VariableBindings>,
    ) -> Result<RelationalEdge, ParseError>
    where
        C: OntologyContext + ?Sized,
    {
        let expression = expression.ok_or_else(|| ParseError::missing("expression"))?;
        match expression.kind {
            Some(JsonOwlObjectType::SomeValueFrom) => {
                self.parse_some_values_from(context, expression, bindings, "expression")
            }
            _ => Err(ParseError::missing("expression.type must be SomeValueFrom")),
        }
    }

    fn parse_expression<C>(
        &self,
        context: &C,
        expression: &JsonOwlObject,
        bindings: Option<&VariableBindings>,
        path: &str,
    ) -> Result<ClassExpression, ParseError>
    where
        C: OntologyContext + ?Sized,
    {
        let Some(kind) = expression.kind else {
            return Err(ParseError::missing(format!("{path}.type")));
        };
        match kind {
            JsonOwlObjectType::Class => {
                let id = expression
                    .id
                    .as_deref()
                    .ok_or_else(|| ParseError::missing(format!("{path}.id")))?;
                Ok(ClassExpression::Class(resolve_class(context, id, bindings)?))
            }
            JsonOwlObjectType::SomeValueFrom => {
                let edge = self.parse_some_values_from(context, expression, bindings, path)?;
                Ok(ClassExpression::SomeValuesFrom(Box::new(edge)))
            }
            JsonOwlObjectType::IntersectionOf => Ok(ClassExpression::IntersectionOf(
                self.parse_operands(context, expression, bindings, path)?,
            )),
            JsonOwlObjectType::UnionOf => Ok(ClassExpression::UnionOf(
                self.parse_operands(context, expression, bindings, path)?,
            )),
            JsonOwlObjectType::ComplementOf => {
                let filler = expression
                    .filler
                    .as_deref()
                    .ok_or_else(|| ParseError::missing(format!("{path}.filler")))?;
                let operand =
                    self.parse_expression(context, filler, bindings, &format!("{path}.filler"))?;
                Ok(ClassExpression::ComplementOf(Box::new(operand)))
            }
            JsonOwlObjectType::ObjectProperty | JsonOwlObjectType::NamedIndividual => Err(
                ParseError::missing(format!("{path}.type must be a class expression")),
            ),
        }
    }

    fn parse_some_values_from<C>(
        &self,
        context: &C,
        expression: &JsonOwlObject,
        bindings: Option<&VariableBindings>,
        path: &str,
    ) -> Result<RelationalEdge, ParseError>
    where
        C: OntologyContext + ?Sized,
    {
        let property = expression
            .property
            .as_deref()
            .ok_or_else(|| ParseError::missing(format!("{path}.property")))?;
        let filler = expression
            .filler
            .as_deref()
            .ok_or_else(|| ParseError::missing(format!("{path}.filler")))?;
        if property.kind != Some(JsonOwlObjectType::ObjectProperty) {
            return Err(ParseError::missing(format!(
                "{path}.property.type must be ObjectProperty"
            )));
        }
        let property_id = property
            .id
            .as_deref()
            .ok_or_else(|| ParseError::missing(format!("{path}.property.id")))?;

        let property = resolve_object_property(context, property_id)?;
        let filler = self.parse_expression(context, filler, bindings, &format!("{path}.filler"))?;
        Ok(RelationalEdge::new(PropertyExpression::Named(property), filler))
    }

    fn parse_operands<C>(
        &self,
        context: &C,
        expression: &JsonOwlObject,
        bindings: Option<&VariableBindings>,
        path: &str,
    ) -> Result<BTreeSet<ClassExpression>, ParseError>
    where
        C: OntologyContext + ?Sized,
    {
        let operands = expression
            .expressions
            .as_deref()
            .filter(|operands| !operands.is_empty())
            .ok_or_else(|| ParseError::missing(format!("{path}.expressions")))?;
        operands
            .iter()
            .enumerate()
            .map(|(index, operand)| {
                self.parse_expression(
                    context,
                    operand,
                    bindings,
                    &format!("{path}.expressions[{index}]"),
                )
            })
            .collect()
    }
}

fn resolve_class<C>(
    context: &C,
    id: &str,
    bindings: Option<&VariableBindings>,
) -> Result<Iri, ParseError>
where
    C: OntologyContext + ?Sized,
{
    let iri = match bindings.and_then(|bindings| bindings.get(id)) {
        Some(bound) => bound.clone(),
        None => context
            .registry()
            .iri(id)
            .map_err(|err| ParseError::unknown(id, err.to_string()))?,
    };
    if !context.has_class(&iri) {
        return Err(ParseError::unknown(id, "class is not declared"));
    }
    Ok(iri)
}

fn resolve_object_property<C>(context: &C, id: &str) -> Result<Iri, ParseError>
where
    C: OntologyContext + ?Sized,
{
    let iri = context
        .registry()
        .iri(id)
        .map_err(|err| ParseError::unknown(id, err.to_string()))?;
    if !context.has_object_property(&iri) {
        return Err(ParseError::unknown(id, "object property is not declared"));
    }
    Ok(iri)
}
