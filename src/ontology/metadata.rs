use serde::{Deserialize, Serialize};

use super::value_objects::Iri;

/// Which side wins when two metadata values both carry evidence or a date.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataPrecedence {
    /// The local edge metadata is the more specific one.
    #[default]
    PreferLocal,
    /// The propagated metadata is kept.
    PreferForeign,
}

/// Provenance attached to an axiom: evidence, date, with/from and sources.
///
/// Values are immutable once built; [`Metadata::combine`] always produces a
/// new instance.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Metadata {
    evidence: Option<Iri>,
    date: Option<String>,
    with: Vec<String>,
    sources: Vec<String>,
}

impl Metadata {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the evidence term backing the axiom.
    #[must_use]
    pub fn with_evidence(mut self, evidence: Iri) -> Self {
        self.evidence = Some(evidence);
        self
    }

    /// Sets the last update date.
    #[must_use]
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Appends a with/from reference.
    #[must_use]
    pub fn with_from(mut self, reference: impl Into<String>) -> Self {
        push_unique(&mut self.with, reference.into());
        self
    }

    /// Appends a source reference.
    #[must_use]
    pub fn with_source(mut self, reference: impl Into<String>) -> Self {
        push_unique(&mut self.sources, reference.into());
        self
    }

    #[must_use]
    pub fn evidence(&self) -> Option<&Iri> {
        self.evidence.as_ref()
    }

    #[must_use]
    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    #[must_use]
    pub fn with_from_references(&self) -> &[String] {
        &self.with
    }

    #[must_use]
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Combines local edge metadata with metadata propagated from elsewhere.
    ///
    /// Evidence and date follow `precedence` when both sides carry one, else
    /// whichever is present. With/from and sources are unioned, local first.
    #[must_use]
    pub fn combine(local: &Self, foreign: &Self, precedence: MetadataPrecedence) -> Self {
        let (preferred, fallback) = match precedence {
            MetadataPrecedence::PreferLocal => (local, foreign),
            MetadataPrecedence::PreferForeign => (foreign, local),
        };
        let mut with = local.with.clone();
        for reference in &foreign.with {
            push_unique(&mut with, reference.clone());
        }
        let mut sources = local.sources.clone();
        for reference in &foreign.sources {
            push_unique(&mut sources, reference.clone());
        }
        Self {
            evidence: preferred
                .evidence
                .clone()
                .or_else(|| fallback.evidence.clone()),
            date: preferred.date.clone().or_else(|| fallback.date.clone()),
            with,
            sources,
        }
    }
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::{Metadata, MetadataPrecedence};
    use crate::ontology::value_objects::Iri;

    fn iri(text: &str) -> Iri {
        Iri::new(text).expect("valid iri")
    }

    #[test]
    fn local_values_win_when_both_present() {
        let local = Metadata::new()
            .with_evidence(iri("http://x.org/ECO_1"))
            .with_date("2024-01-01")
            .with_source("PMID:1");
        let foreign = Metadata::new()
            .with_evidence(iri("http://x.org/ECO_2"))
            .with_date("2023-01-01")
            .with_source("PMID:2")
            .with_source("PMID:1");

        let combined = Metadata::combine(&local, &foreign, MetadataPrecedence::PreferLocal);
        assert_eq!(combined.evidence(), Some(&iri("http://x.org/ECO_1")));
        assert_eq!(combined.date(), Some("2024-01-01"));
        assert_eq!(combined.sources(), ["PMID:1", "PMID:2"]);

        let combined = Metadata::combine(&local, &foreign, MetadataPrecedence::PreferForeign);
        assert_eq!(combined.evidence(), Some(&iri("http://x.org/ECO_2")));
        assert_eq!(combined.date(), Some("2023-01-01"));
    }

    #[test]
    fn missing_values_fall_back_to_the_other_side() {
        let local = Metadata::new().with_from("UniProtKB:P1");
        let foreign = Metadata::new()
            .with_evidence(iri("http://x.org/ECO_2"))
            .with_date("2023-01-01");

        let combined = Metadata::combine(&local, &foreign, MetadataPrecedence::PreferLocal);
        assert_eq!(combined.evidence(), Some(&iri("http://x.org/ECO_2")));
        assert_eq!(combined.date(), Some("2023-01-01"));
        assert_eq!(combined.with_from_references(), ["UniProtKB:P1"]);
    }

    #[test]
    fn combine_leaves_inputs_untouched() {
        let local = Metadata::new().with_source("PMID:1");
        let foreign = Metadata::new().with_source("PMID:2");
        let _ = Metadata::combine(&local, &foreign, MetadataPrecedence::PreferLocal);
        assert_eq!(local.sources(), ["PMID:1"]);
        assert_eq!(foreign.sources(), ["PMID:2"]);
    }
}
