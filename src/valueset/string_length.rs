//! Maximum-length restriction for string values.

use serde::{Deserialize, Serialize};

use crate::validation::{Message, MessageList, MsgCode, ObjectRef};

/// String-encoded maximum character count. `None` means unlimited.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringLengthValueSet {
    max_length: Option<String>,
}

impl StringLengthValueSet {
    pub fn new(max_length: Option<&str>) -> Self {
        Self {
            max_length: max_length.map(str::to_string),
        }
    }

    pub fn max_length(&self) -> Option<&str> {
        self.max_length.as_deref()
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_length.is_none()
    }

    /// The limit as a number, when it parses and is not negative.
    fn parsed_max(&self) -> Option<usize> {
        self.max_length
            .as_deref()
            .and_then(|m| m.parse::<i64>().ok())
            .and_then(|m| usize::try_from(m).ok())
    }

    /// Character count test. A broken limit contains nothing.
    pub fn contains_value(&self, value: &str) -> bool {
        match self.max_length {
            None => true,
            Some(_) => self
                .parsed_max()
                .is_some_and(|max| value.chars().count() <= max),
        }
    }

    pub fn is_subset_of_string_length(&self, other: &StringLengthValueSet) -> bool {
        match (&self.max_length, &other.max_length) {
            (_, None) => true,
            (None, Some(_)) => false,
            (Some(_), Some(_)) => match (self.parsed_max(), other.parsed_max()) {
                (Some(own), Some(theirs)) => own <= theirs,
                _ => false,
            },
        }
    }

    /// An unparsable limit and a negative limit are different findings.
    pub fn validate(&self, owner: &str, list: &mut MessageList) {
        let Some(max) = self.max_length.as_deref() else {
            return;
        };
        match max.parse::<i64>() {
            Err(_) => list.add(
                Message::error(
                    MsgCode::StringLengthNotParsable,
                    format!("The maximum length '{max}' of '{owner}' is not a number"),
                )
                .with_object(ObjectRef::property(owner, "maxLength")),
            ),
            Ok(parsed) if parsed < 0 => list.add(
                Message::error(
                    MsgCode::StringLengthNegative,
                    format!("The maximum length '{max}' of '{owner}' must not be negative"),
                )
                .with_object(ObjectRef::property(owner, "maxLength")),
            ),
            Ok(_) => {}
        }
    }
}
