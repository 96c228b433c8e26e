//! Declarative restrictions on the legal values of an attribute.
//!
//! Four kinds with one shared contract: containment, subset, abstractness
//! and same-kind tests. All payloads are string-encoded; the owning
//! datatype supplies ordering and arithmetic at validation time.

pub mod enum_set;
pub mod filter;
pub mod range;
pub mod string_length;

pub use enum_set::EnumValueSet;
pub use filter::{filter_valid_values, ValidityPolicy, ValidityWindow};
pub use range::RangeValueSet;
pub use string_length::StringLengthValueSet;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::datatype::ValueDatatype;
use crate::validation::MessageList;

/// Discriminator for the four restriction kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueSetKind {
    Unrestricted,
    Enum,
    Range,
    StringLength,
}

impl fmt::Display for ValueSetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            ValueSetKind::Unrestricted => "unrestricted",
            ValueSetKind::Enum => "enum",
            ValueSetKind::Range => "range",
            ValueSetKind::StringLength => "stringLength",
        };
        f.write_str(token)
    }
}

/// A value restriction of one of the four kinds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValueSet {
    Unrestricted,
    Enum(EnumValueSet),
    Range(RangeValueSet),
    StringLength(StringLengthValueSet),
}

impl ValueSet {
    pub fn kind(&self) -> ValueSetKind {
        match self {
            ValueSet::Unrestricted => ValueSetKind::Unrestricted,
            ValueSet::Enum(_) => ValueSetKind::Enum,
            ValueSet::Range(_) => ValueSetKind::Range,
            ValueSet::StringLength(_) => ValueSetKind::StringLength,
        }
    }

    pub fn same_kind(&self, other: &ValueSet) -> bool {
        self.kind() == other.kind()
    }

    /// An abstract set does not pin down concrete values: unrestricted
    /// always, a range without bounds, a length without a limit.
    pub fn is_abstract(&self) -> bool {
        match self {
            ValueSet::Unrestricted => true,
            ValueSet::Enum(_) => false,
            ValueSet::Range(r) => r.is_abstract_range(),
            ValueSet::StringLength(s) => s.is_unbounded(),
        }
    }

    pub fn contains_value(&self, value: &str, datatype: ValueDatatype) -> bool {
        match self {
            ValueSet::Unrestricted => true,
            ValueSet::Enum(e) => e.contains(value, datatype),
            ValueSet::Range(r) => r.contains_value(value, datatype),
            ValueSet::StringLength(s) => s.contains_value(value),
        }
    }

    /// Subset holds against an abstract superset of any kind; otherwise
    /// both sides must be of the same kind and the kind's own rule decides.
    pub fn is_subset_of(&self, other: &ValueSet, datatype: ValueDatatype) -> bool {
        if other.is_abstract() {
            return true;
        }
        match (self, other) {
            (ValueSet::Enum(own), ValueSet::Enum(theirs)) => {
                own.is_subset_of_enum(theirs, datatype)
            }
            (ValueSet::Range(own), ValueSet::Range(theirs)) => {
                own.is_subset_of_range(theirs, datatype)
            }
            (ValueSet::StringLength(own), ValueSet::StringLength(theirs)) => {
                own.is_subset_of_string_length(theirs)
            }
            _ => false,
        }
    }

    /// Internal consistency of the set itself, reported against `owner`.
    pub fn validate(&self, datatype: ValueDatatype, owner: &str, list: &mut MessageList) {
        match self {
            ValueSet::Unrestricted => {}
            ValueSet::Enum(e) => e.validate(datatype, owner, list),
            ValueSet::Range(r) => r.validate(datatype, owner, list),
            ValueSet::StringLength(s) => s.validate(owner, list),
        }
    }
}
