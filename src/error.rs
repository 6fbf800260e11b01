//! Error taxonomy for the grouping engine.
//!
//! Every failure surfaces before or instead of a result: the engine never
//! retries and never returns a partial grouping.

use crate::models::IndividualId;
use std::fmt;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GroupingError>;

/// Categorical field of an input record that failed normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Field {
    /// Gender category.
    Gender,
    /// Tagged-attribute (HTQ) flag.
    Tag,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Gender => f.write_str("gender"),
            Field::Tag => f.write_str("tag"),
        }
    }
}

/// Input condition that must hold before a run can start.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Precondition {
    /// Fewer individuals than requested groups (or no groups at all).
    #[error("cannot form {groups} groups from {individuals} individuals")]
    TooFewIndividuals {
        /// Number of input records.
        individuals: usize,
        /// Requested group count.
        groups: usize,
    },

    /// Two input records share an identifier.
    #[error("duplicate individual identifier {0}")]
    DuplicateIdentifier(IndividualId),
}

/// Errors raised by preprocessing, configuration checks and the GA loop.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GroupingError {
    /// The input cannot be partitioned as requested.
    #[error(transparent)]
    Precondition(#[from] Precondition),

    /// A categorical value is outside the recognized vocabulary.
    #[error("individual {id}: unrecognized {field} value '{value}'")]
    Validation {
        /// Identifier of the offending record.
        id: IndividualId,
        /// Field that failed to normalize.
        field: Field,
        /// Raw value as supplied.
        value: String,
    },

    /// The parameter record is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An operator produced a chromosome that is not a permutation.
    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_message() {
        let err = GroupingError::from(Precondition::TooFewIndividuals {
            individuals: 3,
            groups: 5,
        });
        assert_eq!(err.to_string(), "cannot form 5 groups from 3 individuals");
    }

    #[test]
    fn test_duplicate_id_is_a_precondition() {
        let err = GroupingError::from(Precondition::DuplicateIdentifier(4));
        assert!(matches!(err, GroupingError::Precondition(_)));
        assert_eq!(err.to_string(), "duplicate individual identifier 4");
    }

    #[test]
    fn test_validation_message_names_field() {
        let err = GroupingError::Validation {
            id: 7,
            field: Field::Gender,
            value: "X".into(),
        };
        assert_eq!(err.to_string(), "individual 7: unrecognized gender value 'X'");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_error_serializes() {
        let err = GroupingError::from(Precondition::DuplicateIdentifier(9));
        let json = serde_json::to_string(&err).unwrap();
        let back: GroupingError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }
}
