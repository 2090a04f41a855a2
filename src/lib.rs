//! Translation of causal activity models into flat gene annotation records,
//! plus a parser for JSON encoded class expressions.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use gocam_legacy::config::Settings;
//! use gocam_legacy::lookup::EcoCodeMapper;
//! use gocam_legacy::ontology::{Iri, Ontology, StructuralReasoner};
//! use gocam_legacy::translator::GeneAnnotationTranslator;
//!
//! # fn main() -> gocam_legacy::Result<()> {
//! let settings = Settings::from_file("translator.yaml")?;
//! gocam_legacy::logger::init(&settings.logger)?;
//!
//! let tbox = Arc::new(Ontology::new(Iri::new("http://purl.obolibrary.org/obo/go.owl")?));
//! let reasoner = StructuralReasoner::new(Arc::clone(&tbox));
//! let translator =
//!     GeneAnnotationTranslator::new(&settings, &reasoner, Arc::new(EcoCodeMapper::new()))?;
//!
//! let model = Ontology::new(Iri::new("http://model.geneontology.org/m1")?).with_import(tbox);
//! let translation = translator.translate(&model, &[])?;
//! println!("{}", serde_json::to_string_pretty(&translation)?);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod errors;
pub mod logger;
pub mod lookup;
pub mod ontology;
pub mod parser;
pub mod translator;

pub use errors::{Error, Result};
