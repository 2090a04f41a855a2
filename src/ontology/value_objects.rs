use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use oxrdf::NamedNode;
use thiserror::Error;

const OWL_THING: &str = "http://www.w3.org/2002/07/owl#Thing";
const OWL_NOTHING: &str = "http://www.w3.org/2002/07/owl#Nothing";

/// Value object ensuring that supplied text represents a valid IRI.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iri {
    value: String,
}

impl Iri {
    /// Validates and constructs a new [`Iri`] value object.
    ///
    /// The constructor rejects malformed identifiers in order to guarantee that
    /// every term, property and individual uses canonical identifiers.
    pub fn new(value: impl Into<String>) -> Result<Self, IriError> {
        let value = value.into();
        NamedNode::new(value.as_str()).map_err(|_| IriError::Invalid {
            value: value.clone(),
        })?;
        Ok(Self { value })
    }

    /// Returns the `owl:Thing` identifier.
    #[must_use]
    pub fn owl_thing() -> Self {
        Self {
            value: OWL_THING.to_string(),
        }
    }

    /// Returns the `owl:Nothing` identifier.
    #[must_use]
    pub fn owl_nothing() -> Self {
        Self {
            value: OWL_NOTHING.to_string(),
        }
    }

    /// Whether the identifier names one of the reasoner built-in classes.
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        self.value == OWL_THING || self.value == OWL_NOTHING
    }

    /// Returns the underlying textual representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl Display for Iri {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl FromStr for Iri {
    type Err = IriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

/// Errors produced when validating an [`Iri`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IriError {
    /// The provided text could not be parsed as an IRI.
    #[error("invalid IRI: {value}")]
    Invalid { value: String },
}

#[cfg(test)]
mod tests {
    use super::Iri;

    #[test]
    fn accepts_valid_iri() {
        let iri = Iri::new("http://purl.obolibrary.org/obo/GO_0003674").expect("valid IRI");
        assert_eq!(iri.as_str(), "http://purl.obolibrary.org/obo/GO_0003674");
        assert!(!iri.is_builtin());
    }

    #[test]
    fn rejects_invalid_iri() {
        let err = Iri::new("not an iri").expect_err("invalid IRI");
        assert!(matches!(err, super::IriError::Invalid { value } if value == "not an iri"));
    }

    #[test]
    fn recognises_builtins() {
        assert!(Iri::owl_thing().is_builtin());
        assert!(Iri::owl_nothing().is_builtin());
    }
}
