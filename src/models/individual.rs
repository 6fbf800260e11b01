//! Individual records and vocabulary normalization.
//!
//! Categorical inputs arrive in many spellings ("LK", "Laki-laki", "male",
//! "Ya", "lulus", "1", ...). Normalization is a single lookup over the
//! trimmed, upper-cased value into a closed enum; there are no ad hoc string
//! comparisons anywhere else in the crate.

use crate::error::{Field, GroupingError, Result};

/// Unique identifier of an individual.
pub type IndividualId = u64;

/// Binary gender category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Gender {
    Male,
    Female,
}

const GENDER_VOCABULARY: &[(&str, Gender)] = &[
    ("LK", Gender::Male),
    ("L", Gender::Male),
    ("LAKI-LAKI", Gender::Male),
    ("LAKI", Gender::Male),
    ("M", Gender::Male),
    ("MALE", Gender::Male),
    ("PR", Gender::Female),
    ("P", Gender::Female),
    ("PEREMPUAN", Gender::Female),
    ("F", Gender::Female),
    ("FEMALE", Gender::Female),
];

const TAG_VOCABULARY: &[(&str, bool)] = &[
    ("YA", true),
    ("Y", true),
    ("1", true),
    ("LULUS", true),
    ("TRUE", true),
    ("T", true),
    ("TIDAK", false),
    ("N", false),
    ("0", false),
    ("FALSE", false),
    ("F", false),
    ("BELUM", false),
];

fn lookup<T: Copy>(table: &[(&str, T)], raw: &str) -> Option<T> {
    let key = raw.trim().to_uppercase();
    table
        .iter()
        .find(|(spelling, _)| *spelling == key)
        .map(|&(_, v)| v)
}

impl Gender {
    /// Parses any recognized spelling, case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        lookup(GENDER_VOCABULARY, raw)
    }
}

/// How unrecognized tag-attribute spellings are treated.
///
/// Gender is always strict: it must map to one of the two categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VocabularyMode {
    /// Unknown tag spellings raise [`GroupingError::Validation`].
    #[default]
    Strict,
    /// Unknown tag spellings are read as "not tagged".
    Lenient,
}

/// A normalized population member. Immutable once handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Individual {
    /// Unique identifier.
    pub id: IndividualId,
    /// Gender category.
    pub gender: Gender,
    /// Major / category label (free-form).
    pub major: String,
    /// Tagged-attribute (HTQ) flag.
    pub tagged: bool,
}

impl Individual {
    /// Creates an individual.
    pub fn new(id: IndividualId, gender: Gender, major: impl Into<String>, tagged: bool) -> Self {
        Self {
            id,
            gender,
            major: major.into(),
            tagged,
        }
    }
}

/// An unnormalized input record, as stored by the data source.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawIndividual {
    /// Unique identifier.
    pub id: IndividualId,
    /// Gender spelling, e.g. `"LK"`, `"perempuan"`, `"male"`.
    pub gender: String,
    /// Major / category label, passed through unchanged.
    pub major: String,
    /// Tagged-attribute spelling, e.g. `"YA"`, `"tidak"`, `"1"`.
    pub tag: String,
}

impl RawIndividual {
    /// Creates a raw record.
    pub fn new(
        id: IndividualId,
        gender: impl Into<String>,
        major: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            id,
            gender: gender.into(),
            major: major.into(),
            tag: tag.into(),
        }
    }

    /// Maps the categorical fields onto their closed vocabularies.
    pub fn normalize(&self, mode: VocabularyMode) -> Result<Individual> {
        let gender = Gender::parse(&self.gender).ok_or_else(|| GroupingError::Validation {
            id: self.id,
            field: Field::Gender,
            value: self.gender.clone(),
        })?;

        let tagged = match (lookup(TAG_VOCABULARY, &self.tag), mode) {
            (Some(flag), _) => flag,
            (None, VocabularyMode::Lenient) => false,
            (None, VocabularyMode::Strict) => {
                return Err(GroupingError::Validation {
                    id: self.id,
                    field: Field::Tag,
                    value: self.tag.clone(),
                })
            }
        };

        Ok(Individual {
            id: self.id,
            gender,
            major: self.major.clone(),
            tagged,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_spellings() {
        for s in ["LK", "l", " Laki-Laki ", "laki", "m", "Male"] {
            assert_eq!(Gender::parse(s), Some(Gender::Male), "{s}");
        }
        for s in ["PR", "p", "Perempuan", "f", "FEMALE"] {
            assert_eq!(Gender::parse(s), Some(Gender::Female), "{s}");
        }
        assert_eq!(Gender::parse("X"), None);
        assert_eq!(Gender::parse(""), None);
    }

    #[test]
    fn test_tag_spellings() {
        for s in ["Ya", "y", "1", "lulus", "true", "T"] {
            let r = RawIndividual::new(1, "LK", "IT", s);
            assert!(r.normalize(VocabularyMode::Strict).unwrap().tagged, "{s}");
        }
        for s in ["Tidak", "n", "0", "false", "F", "belum"] {
            let r = RawIndividual::new(1, "LK", "IT", s);
            assert!(!r.normalize(VocabularyMode::Strict).unwrap().tagged, "{s}");
        }
    }

    #[test]
    fn test_strict_rejects_unknown_tag() {
        let r = RawIndividual::new(9, "PR", "Law", "maybe");
        let err = r.normalize(VocabularyMode::Strict).unwrap_err();
        assert_eq!(
            err,
            GroupingError::Validation {
                id: 9,
                field: Field::Tag,
                value: "maybe".into(),
            }
        );
    }

    #[test]
    fn test_lenient_defaults_unknown_tag_to_false() {
        let r = RawIndividual::new(9, "PR", "Law", "maybe");
        let ind = r.normalize(VocabularyMode::Lenient).unwrap();
        assert!(!ind.tagged);
        assert_eq!(ind.gender, Gender::Female);
    }

    #[test]
    fn test_unknown_gender_rejected_in_both_modes() {
        let r = RawIndividual::new(4, "unknown", "Law", "Ya");
        for mode in [VocabularyMode::Strict, VocabularyMode::Lenient] {
            match r.normalize(mode) {
                Err(GroupingError::Validation { field, .. }) => assert_eq!(field, Field::Gender),
                other => panic!("expected gender validation error, got {other:?}"),
            }
        }
    }
}
