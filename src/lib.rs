//! enum-model-core: enumeration model consistency engine
//!
//! This crate contains the pure model logic with NO storage dependencies:
//! - Enum types (attribute schema, inline rows, supertype hierarchy)
//! - Enum contents (external rows bound to a type by qualified name)
//! - Reference reconciliation between a content and its type schema
//! - Value sets (unrestricted, enum, range, string length) over
//!   string-encoded values
//! - Message-list validation with stable codes and object references
//! - Persisted-XML boundary and a directory loader
//!
//! Mutating operations report precondition failures as `ModelError`;
//! structural findings accumulate in a caller-supplied `MessageList` and
//! never abort the walk.

pub mod datatype;
pub mod error;
pub mod loader;
pub mod model;
pub mod validation;
pub mod valueset;
pub mod xml;

// Re-export commonly used types
pub use datatype::{TimedEnumeration, TimedValue, UnknownDatatypeError, ValueDatatype};
pub use error::ModelError;
pub use loader::ModelLoader;
pub use model::{
    EnumAttribute, EnumAttributeReference, EnumAttributeValue, EnumContent, EnumModelRegistry,
    EnumType, EnumValue, EventJournal, ModelEvent, TypeLookup, ValueContainer, FIX_REQUIRED_CODES,
};
pub use validation::{Message, MessageList, MsgCode, ObjectRef, Severity};
pub use valueset::{
    filter_valid_values, EnumValueSet, RangeValueSet, StringLengthValueSet, ValidityPolicy,
    ValidityWindow, ValueSet, ValueSetKind,
};
pub use xml::{
    read_enum_content, read_enum_type, write_enum_content, write_enum_type, XmlError,
};
