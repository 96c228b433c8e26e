//! Persisted-XML boundary for enum types and enum contents.
//!
//! One document per model object, fixed tag vocabulary, stable across
//! releases so checked-in model files stay diffable. The writer emits
//! deterministic hand-indented XML; the reader is a quick-xml pull parser
//! that accepts both writer output and hand-authored files (missing ids
//! get fresh ones, missing flags default to false).

use thiserror::Error;

pub mod reader;
pub mod writer;

pub use reader::{read_enum_content, read_enum_type};
pub use writer::{write_enum_content, write_enum_type};

use crate::datatype::UnknownDatatypeError;

/// Root element of a persisted enum type document.
pub const TAG_ENUM_TYPE: &str = "EnumType";
/// Attribute declaration inside an enum type document.
pub const TAG_ENUM_ATTRIBUTE: &str = "EnumAttribute";
/// Root element of a persisted enum content document.
pub const TAG_ENUM_CONTENT: &str = "EnumContent";
/// Attribute reference inside an enum content document.
pub const TAG_ATTRIBUTE_REFERENCE: &str = "EnumAttributeReference";
/// One row of values, in either document kind.
pub const TAG_ENUM_VALUE: &str = "EnumValue";
/// One cell inside a row. Null cells carry `isNull="true"` and no text.
pub const TAG_ATTRIBUTE_VALUE: &str = "EnumAttributeValue";

/// Failure while parsing a persisted model document.
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("malformed xml: {0}")]
    Malformed(#[from] quick_xml::Error),
    #[error("malformed attribute: {0}")]
    MalformedAttribute(#[from] quick_xml::events::attributes::AttrError),
    #[error("unexpected element <{found}> where {expected} was expected")]
    UnexpectedElement {
        expected: &'static str,
        found: String,
    },
    #[error("missing attribute `{attribute}` on <{element}>")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
    #[error("invalid id `{value}` on <{element}>")]
    InvalidId {
        element: &'static str,
        value: String,
        #[source]
        source: uuid::Error,
    },
    #[error(transparent)]
    UnknownDatatype(#[from] UnknownDatatypeError),
    #[error("document contains no <{0}> root element")]
    MissingRoot(&'static str),
    #[error("document ended before </{0}>")]
    Truncated(&'static str),
}

/// Escape text for use in element content or a quoted attribute value.
pub(crate) fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
