//! Input records for the grouping engine.
//!
//! - [`Individual`]: a normalized, immutable population member
//! - [`RawIndividual`]: the unnormalized record supplied by a data source
//! - [`Gender`], [`VocabularyMode`]: closed vocabularies and how strictly
//!   they are applied

mod individual;

pub use individual::{Gender, Individual, IndividualId, RawIndividual, VocabularyMode};
