//! In-memory enumeration model: types, contents, value rows and the
//! registry that resolves qualified names between them.

pub mod container;
pub mod enum_content;
pub mod enum_type;
pub mod enum_value;
pub mod events;
pub mod registry;

pub use container::ValueContainer;
pub use enum_content::{EnumAttributeReference, EnumContent, FIX_REQUIRED_CODES};
pub use enum_type::{EnumAttribute, EnumType};
pub use enum_value::{EnumAttributeValue, EnumValue};
pub use events::{EventJournal, ModelEvent};
pub use registry::{EnumModelRegistry, TypeLookup};
