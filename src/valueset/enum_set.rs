//! Explicit enumeration of allowed values.

use serde::{Deserialize, Serialize};

use crate::datatype::ValueDatatype;
use crate::error::ModelError;
use crate::validation::{Message, MessageList, MsgCode, ObjectRef};

/// Ordered list of string-encoded values. Duplicates are representable and
/// survive editing; validation flags every position that repeats an
/// earlier value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValueSet {
    values: Vec<String>,
}

impl EnumValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn values_count(&self) -> usize {
        self.values.len()
    }

    pub fn value(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    pub fn add_value(&mut self, value: impl Into<String>) {
        self.values.push(value.into());
    }

    pub fn add_values(&mut self, values: impl IntoIterator<Item = impl Into<String>>) {
        self.values.extend(values.into_iter().map(Into::into));
    }

    pub fn remove_value(&mut self, index: usize) -> Result<String, ModelError> {
        if index >= self.values.len() {
            return Err(ModelError::IndexOutOfBounds {
                what: "enum value set entry",
                index,
                len: self.values.len(),
            });
        }
        Ok(self.values.remove(index))
    }

    /// Drop every entry equal to one of the given values. Returns how many
    /// entries were removed.
    pub fn remove_values(&mut self, values: &[&str]) -> usize {
        let before = self.values.len();
        self.values.retain(|v| !values.contains(&v.as_str()));
        before - self.values.len()
    }

    /// Move the entry at `index` one position up or down, keeping all other
    /// entries in order. At the boundary this is a no-op reporting the
    /// unchanged index.
    pub fn move_value(&mut self, index: usize, up: bool) -> Result<usize, ModelError> {
        let len = self.values.len();
        if index >= len {
            return Err(ModelError::IndexOutOfBounds {
                what: "enum value set entry",
                index,
                len,
            });
        }
        let target = if up {
            if index == 0 {
                return Ok(index);
            }
            index - 1
        } else {
            if index + 1 == len {
                return Ok(index);
            }
            index + 1
        };
        self.values.swap(index, target);
        Ok(target)
    }

    /// Membership under the datatype's equality, so `07` finds `7` when
    /// the datatype is `Integer`.
    pub fn contains(&self, value: &str, datatype: ValueDatatype) -> bool {
        self.values.iter().any(|v| datatype.values_equal(v, value))
    }

    /// True when every value here is also in `other`.
    pub fn is_subset_of_enum(&self, other: &EnumValueSet, datatype: ValueDatatype) -> bool {
        self.values.iter().all(|v| other.contains(v, datatype))
    }

    /// Validate the single entry at `index`: it must parse under the
    /// datatype, and it must not repeat an entry at an earlier position.
    /// The first occurrence of a value is never flagged.
    pub fn validate_value(
        &self,
        index: usize,
        datatype: ValueDatatype,
        owner: &str,
        list: &mut MessageList,
    ) -> Result<(), ModelError> {
        let value = self.value(index).ok_or(ModelError::IndexOutOfBounds {
            what: "enum value set entry",
            index,
            len: self.values.len(),
        })?;

        if !datatype.is_parsable(value) {
            list.add(
                Message::error(
                    MsgCode::ValueNotParsable,
                    format!("Value '{value}' of '{owner}' is not a valid {datatype}"),
                )
                .with_object(ObjectRef::indexed(owner, "values", index)),
            );
        }
        let duplicate = self.values[..index]
            .iter()
            .any(|earlier| datatype.values_equal(earlier, value));
        if duplicate {
            list.add(
                Message::error(
                    MsgCode::DuplicateValue,
                    format!("Value '{value}' of '{owner}' occurs more than once"),
                )
                .with_object(ObjectRef::indexed(owner, "values", index)),
            );
        }
        Ok(())
    }

    /// Validate every entry.
    pub fn validate(&self, datatype: ValueDatatype, owner: &str, list: &mut MessageList) {
        for index in 0..self.values.len() {
            // Index walks the list, cannot be out of bounds.
            let _ = self.validate_value(index, datatype, owner, list);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_duplicate_flags_later_position_only() {
        let set = EnumValueSet::from_values(["A", "B", "A"]);

        let mut list = MessageList::new();
        set.validate_value(0, ValueDatatype::String, "model.Color", &mut list)
            .unwrap();
        assert!(list.is_empty());

        let mut list = MessageList::new();
        set.validate_value(2, ValueDatatype::String, "model.Color", &mut list)
            .unwrap();
        let msg = list.message_by_code(MsgCode::DuplicateValue).unwrap();
        assert_eq!(msg.invalid_object().unwrap().index, Some(2));
    }

    #[test]
    fn test_validate_whole_set_reports_per_position() {
        let set = EnumValueSet::from_values(["A", "A", "A"]);
        let mut list = MessageList::new();
        set.validate(ValueDatatype::String, "model.Color", &mut list);
        // Positions 1 and 2 each repeat position 0.
        assert_eq!(list.messages_by_code(MsgCode::DuplicateValue).count(), 2);
    }

    #[test]
    fn test_unparsable_value_flagged() {
        let set = EnumValueSet::from_values(["1", "two"]);
        let mut list = MessageList::new();
        set.validate(ValueDatatype::Integer, "model.Count", &mut list);
        assert_eq!(list.len(), 1);
        let msg = list.message_by_code(MsgCode::ValueNotParsable).unwrap();
        assert_eq!(msg.invalid_object().unwrap().index, Some(1));
    }

    #[test]
    fn test_duplicate_detection_is_datatype_aware() {
        let set = EnumValueSet::from_values(["7", "07"]);
        let mut list = MessageList::new();
        set.validate(ValueDatatype::Integer, "model.Count", &mut list);
        assert!(list.contains_code(MsgCode::DuplicateValue));

        let mut list = MessageList::new();
        set.validate(ValueDatatype::String, "model.Count", &mut list);
        assert!(list.is_empty());
    }

    #[test]
    fn test_move_preserves_other_positions() {
        let mut set = EnumValueSet::from_values(["a", "b", "c"]);
        assert_eq!(set.move_value(0, true).unwrap(), 0);
        assert_eq!(set.move_value(2, true).unwrap(), 1);
        assert_eq!(set.values(), ["a", "c", "b"]);
    }

    #[test]
    fn test_bulk_remove_by_value() {
        let mut set = EnumValueSet::from_values(["a", "b", "a", "c"]);
        assert_eq!(set.remove_values(&["a", "c"]), 3);
        assert_eq!(set.values(), ["b"]);

        let err = set.remove_value(5).unwrap_err();
        assert!(matches!(err, ModelError::IndexOutOfBounds { index: 5, .. }));
    }

    #[test]
    fn test_subset() {
        let small = EnumValueSet::from_values(["1", "2"]);
        let big = EnumValueSet::from_values(["01", "02", "03"]);
        assert!(small.is_subset_of_enum(&big, ValueDatatype::Integer));
        assert!(!small.is_subset_of_enum(&big, ValueDatatype::String));
        assert!(!big.is_subset_of_enum(&small, ValueDatatype::Integer));
    }
}
