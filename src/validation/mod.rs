//! Validation messages with stable codes.
//!
//! All structural validation in this crate accumulates findings into a
//! caller-supplied [`MessageList`] instead of raising errors. Codes are a
//! closed enum so downstream tooling can match on them without string
//! comparisons, and the whole report serializes for machine consumption.

use serde::{Deserialize, Serialize};

pub mod hierarchy;

/// Message severity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// Stable codes for validation findings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MsgCode {
    // =========================================================================
    // Enum content binding to its enum type
    // =========================================================================
    /// The content names no enum type at all.
    EnumTypeMissing,
    /// The named enum type does not resolve in the registry.
    EnumTypeDoesNotExist,
    /// The bound enum type is abstract and cannot hold content rows.
    EnumTypeIsAbstract,
    /// The bound enum type keeps its values inline, no content is expected.
    ValuesArePartOfType,
    /// The content's qualified name differs from the one the type declares.
    EnumContentNameNotCorrect,

    // =========================================================================
    // Attribute-reference reconciliation
    // =========================================================================
    /// Reference count differs from the type's attribute count.
    ReferencedAttributeCountInvalid,
    /// Reference names do not cover the type's attribute names.
    ReferencedAttributeNamesInvalid,
    /// Reference order differs from the type's attribute order.
    ReferencedAttributeOrderingInvalid,

    // =========================================================================
    // Rows and cells
    // =========================================================================
    /// A row's cell count differs from the container's attribute count.
    AttributeValuesCountInvalid,
    /// A cell value is not parsable by its attribute's datatype.
    AttributeValueTypeMismatch,
    /// A value of a unique attribute occurs in more than one row.
    UniqueIdentifierDuplicate,

    // =========================================================================
    // Enum type structure and hierarchy
    // =========================================================================
    /// The named supertype does not resolve in the registry.
    SupertypeDoesNotExist,
    /// The named supertype is not abstract.
    SupertypeIsNotAbstract,
    /// The supertype chain contains a cycle.
    CycleInTypeHierarchy,
    /// An ancestor in the supertype chain fails its own supertype checks.
    InconsistentTypeHierarchy,
    /// A concrete type holding its own values has no literal-name attribute.
    NoLiteralNameAttribute,
    /// More than one literal-name attribute is declared.
    MultipleLiteralNameAttributes,
    /// Two attributes share the same name.
    DuplicateAttributeName,
    /// An extensible type does not name the enum content holding its values.
    EnumContentNameEmpty,

    // =========================================================================
    // Value sets
    // =========================================================================
    /// An enum value set element duplicates an earlier element.
    DuplicateValue,
    /// A value-set bound or element is not parsable by the datatype.
    ValueNotParsable,
    /// The lower bound of a range exceeds its upper bound.
    LowerBoundGreaterUpperBound,
    /// The step does not evenly divide the distance between the bounds.
    StepRangeMismatch,
    /// The string-length bound is not a parsable integer.
    StringLengthNotParsable,
    /// The string-length bound is negative.
    StringLengthNegative,
}

/// Reference to the model object (and optionally the property and list
/// position) a message is about. Carried by value so reports stay detached
/// from the model tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    /// Qualified name of the model object.
    pub object: String,
    /// Offending property or part, if the finding is property-scoped.
    pub property: Option<String>,
    /// List position, if the finding is positional.
    pub index: Option<usize>,
}

impl ObjectRef {
    pub fn object(object: impl Into<String>) -> Self {
        Self {
            object: object.into(),
            property: None,
            index: None,
        }
    }

    pub fn property(object: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            object: object.into(),
            property: Some(property.into()),
            index: None,
        }
    }

    pub fn indexed(
        object: impl Into<String>,
        property: impl Into<String>,
        index: usize,
    ) -> Self {
        Self {
            object: object.into(),
            property: Some(property.into()),
            index: Some(index),
        }
    }
}

/// A single validation finding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    code: MsgCode,
    text: String,
    severity: Severity,
    invalid_object: Option<ObjectRef>,
}

impl Message {
    /// Create an error message.
    pub fn error(code: MsgCode, text: impl Into<String>) -> Self {
        Self {
            code,
            text: text.into(),
            severity: Severity::Error,
            invalid_object: None,
        }
    }

    /// Create a warning message.
    pub fn warning(code: MsgCode, text: impl Into<String>) -> Self {
        Self {
            code,
            text: text.into(),
            severity: Severity::Warning,
            invalid_object: None,
        }
    }

    /// Create an info message.
    pub fn info(code: MsgCode, text: impl Into<String>) -> Self {
        Self {
            code,
            text: text.into(),
            severity: Severity::Info,
            invalid_object: None,
        }
    }

    /// Attach the object reference this message is about.
    pub fn with_object(mut self, object: ObjectRef) -> Self {
        self.invalid_object = Some(object);
        self
    }

    pub fn code(&self) -> MsgCode {
        self.code
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn invalid_object(&self) -> Option<&ObjectRef> {
        self.invalid_object.as_ref()
    }

    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.text)
    }
}

/// Ordered, appendable collection of validation findings, queryable by code
/// and by severity.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageList {
    messages: Vec<Message>,
}

impl MessageList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one message, keeping insertion order.
    pub fn add(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Move all messages of `other` to the end of this list.
    pub fn append(&mut self, mut other: MessageList) {
        self.messages.append(&mut other.messages);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    /// First message carrying the given code, if any.
    pub fn message_by_code(&self, code: MsgCode) -> Option<&Message> {
        self.messages.iter().find(|m| m.code == code)
    }

    /// All messages carrying the given code, in insertion order.
    pub fn messages_by_code(&self, code: MsgCode) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(move |m| m.code == code)
    }

    pub fn contains_code(&self, code: MsgCode) -> bool {
        self.messages.iter().any(|m| m.code == code)
    }

    /// True if any entry has error severity.
    pub fn contains_error(&self) -> bool {
        self.messages.iter().any(Message::is_error)
    }

    pub fn first_error(&self) -> Option<&Message> {
        self.messages.iter().find(|m| m.is_error())
    }
}

impl std::fmt::Display for MessageList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for message in &self.messages {
            writeln!(f, "{message}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a MessageList {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

impl IntoIterator for MessageList {
    type Item = Message;
    type IntoIter = std::vec::IntoIter<Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

impl FromIterator<Message> for MessageList {
    fn from_iter<T: IntoIterator<Item = Message>>(iter: T) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
