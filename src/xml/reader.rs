//! Pull parser for persisted enum type and enum content documents.
//!
//! Strict about the element vocabulary, lenient about everything a hand
//! edit plausibly changes: ids may be omitted (fresh ones are assigned),
//! flag attributes default to false, and both `<Tag/>` and `<Tag></Tag>`
//! forms are accepted. Reading is not an edit, so a freshly parsed object
//! carries no pending change events.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::Reader;
use uuid::Uuid;

use super::{
    XmlError, TAG_ATTRIBUTE_REFERENCE, TAG_ATTRIBUTE_VALUE, TAG_ENUM_ATTRIBUTE, TAG_ENUM_CONTENT,
    TAG_ENUM_TYPE, TAG_ENUM_VALUE,
};
use crate::datatype::ValueDatatype;
use crate::model::{EnumAttribute, EnumAttributeReference, EnumContent, EnumType, EnumValue};

/// Parse a persisted enum type document.
pub fn read_enum_type(xml: &str) -> Result<EnumType, XmlError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event()? {
            Event::Start(e) if name_is(e.name(), TAG_ENUM_TYPE) => {
                let mut enum_type = enum_type_from(&e)?;
                read_type_children(&mut reader, &mut enum_type)?;
                let _ = enum_type.drain_events();
                return Ok(enum_type);
            }
            Event::Empty(e) if name_is(e.name(), TAG_ENUM_TYPE) => {
                return Ok(enum_type_from(&e)?);
            }
            Event::Start(e) | Event::Empty(e) => return Err(unexpected(TAG_ENUM_TYPE, &e)),
            Event::Eof => return Err(XmlError::MissingRoot(TAG_ENUM_TYPE)),
            _ => {}
        }
    }
}

/// Parse a persisted enum content document.
pub fn read_enum_content(xml: &str) -> Result<EnumContent, XmlError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event()? {
            Event::Start(e) if name_is(e.name(), TAG_ENUM_CONTENT) => {
                let mut content = enum_content_from(&e)?;
                read_content_children(&mut reader, &mut content)?;
                let _ = content.drain_events();
                return Ok(content);
            }
            Event::Empty(e) if name_is(e.name(), TAG_ENUM_CONTENT) => {
                return Ok(enum_content_from(&e)?);
            }
            Event::Start(e) | Event::Empty(e) => return Err(unexpected(TAG_ENUM_CONTENT, &e)),
            Event::Eof => return Err(XmlError::MissingRoot(TAG_ENUM_CONTENT)),
            _ => {}
        }
    }
}

fn read_type_children(
    reader: &mut Reader<&[u8]>,
    enum_type: &mut EnumType,
) -> Result<(), XmlError> {
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if name_is(e.name(), TAG_ENUM_ATTRIBUTE) => {
                enum_type.add_attribute(enum_attribute_from(&e)?);
            }
            Event::Start(e) if name_is(e.name(), TAG_ENUM_VALUE) => {
                let row = read_row(reader)?;
                enum_type.add_enum_value(row);
            }
            Event::Empty(e) if name_is(e.name(), TAG_ENUM_VALUE) => {
                enum_type.add_enum_value(EnumValue::from_values(Vec::new()));
            }
            Event::End(e) if name_is(e.name(), TAG_ENUM_TYPE) => return Ok(()),
            Event::Start(e) | Event::Empty(e) => {
                return Err(unexpected("EnumAttribute or EnumValue", &e))
            }
            Event::Eof => return Err(XmlError::Truncated(TAG_ENUM_TYPE)),
            _ => {}
        }
    }
}

fn read_content_children(
    reader: &mut Reader<&[u8]>,
    content: &mut EnumContent,
) -> Result<(), XmlError> {
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if name_is(e.name(), TAG_ATTRIBUTE_REFERENCE) => {
                content.add_enum_attribute_reference(reference_from(&e)?);
            }
            Event::Start(e) if name_is(e.name(), TAG_ENUM_VALUE) => {
                let row = read_row(reader)?;
                content.add_enum_value(row);
            }
            Event::Empty(e) if name_is(e.name(), TAG_ENUM_VALUE) => {
                content.add_enum_value(EnumValue::from_values(Vec::new()));
            }
            Event::End(e) if name_is(e.name(), TAG_ENUM_CONTENT) => return Ok(()),
            Event::Start(e) | Event::Empty(e) => {
                return Err(unexpected("EnumAttributeReference or EnumValue", &e))
            }
            Event::Eof => return Err(XmlError::Truncated(TAG_ENUM_CONTENT)),
            _ => {}
        }
    }
}

/// Read the cells of one row up to the closing row tag.
fn read_row(reader: &mut Reader<&[u8]>) -> Result<EnumValue, XmlError> {
    let mut cells: Vec<Option<String>> = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) if name_is(e.name(), TAG_ATTRIBUTE_VALUE) => {
                let attrs = AttrMap::from_start(&e)?;
                cells.push(read_cell(reader, &attrs)?);
            }
            Event::Empty(e) if name_is(e.name(), TAG_ATTRIBUTE_VALUE) => {
                let attrs = AttrMap::from_start(&e)?;
                cells.push(if attrs.flag("isNull") {
                    None
                } else {
                    Some(String::new())
                });
            }
            Event::End(e) if name_is(e.name(), TAG_ENUM_VALUE) => {
                return Ok(EnumValue::from_values(cells))
            }
            Event::Start(e) | Event::Empty(e) => return Err(unexpected(TAG_ATTRIBUTE_VALUE, &e)),
            Event::Eof => return Err(XmlError::Truncated(TAG_ENUM_VALUE)),
            _ => {}
        }
    }
}

/// Read the text of one cell up to the closing cell tag.
///
/// An `isNull="true"` cell stays null even if the element carries stray
/// text; a non-null cell with no text reads back as the empty string.
fn read_cell(reader: &mut Reader<&[u8]>, attrs: &AttrMap) -> Result<Option<String>, XmlError> {
    let mut text: Option<String> = if attrs.flag("isNull") {
        None
    } else {
        Some(String::new())
    };
    loop {
        match reader.read_event()? {
            Event::Text(t) => {
                if let Some(buf) = text.as_mut() {
                    buf.push_str(&t.unescape()?);
                }
            }
            Event::End(e) if name_is(e.name(), TAG_ATTRIBUTE_VALUE) => return Ok(text),
            Event::Start(e) | Event::Empty(e) => return Err(unexpected("cell text", &e)),
            Event::Eof => return Err(XmlError::Truncated(TAG_ATTRIBUTE_VALUE)),
            _ => {}
        }
    }
}

fn enum_type_from(e: &BytesStart) -> Result<EnumType, XmlError> {
    let attrs = AttrMap::from_start(e)?;
    let mut enum_type = EnumType::new(attrs.required(TAG_ENUM_TYPE, "qualifiedName")?);
    if let Some(id) = attrs.id(TAG_ENUM_TYPE)? {
        enum_type = enum_type.with_id(id);
    }
    enum_type.is_abstract = attrs.flag("abstract");
    enum_type.extensible = attrs.flag("extensible");
    enum_type.super_enum_type = attrs.get("superEnumType").map(str::to_string);
    enum_type.enum_content_name = attrs.get("enumContentName").map(str::to_string);
    Ok(enum_type)
}

fn enum_attribute_from(e: &BytesStart) -> Result<EnumAttribute, XmlError> {
    let attrs = AttrMap::from_start(e)?;
    let name = attrs.required(TAG_ENUM_ATTRIBUTE, "name")?;
    let datatype: ValueDatatype = attrs.required(TAG_ENUM_ATTRIBUTE, "datatype")?.parse()?;
    let mut attribute = EnumAttribute::new(name, datatype);
    if let Some(id) = attrs.id(TAG_ENUM_ATTRIBUTE)? {
        attribute = attribute.with_id(id);
    }
    attribute.unique = attrs.flag("unique");
    attribute.literal_name = attrs.flag("literalName");
    attribute.multilingual = attrs.flag("multilingual");
    attribute.inherited = attrs.flag("inherited");
    Ok(attribute)
}

fn enum_content_from(e: &BytesStart) -> Result<EnumContent, XmlError> {
    let attrs = AttrMap::from_start(e)?;
    let mut content = EnumContent::new(attrs.required(TAG_ENUM_CONTENT, "qualifiedName")?);
    if let Some(id) = attrs.id(TAG_ENUM_CONTENT)? {
        content = content.with_id(id);
    }
    if let Some(type_name) = attrs.get("enumType") {
        content.set_enum_type_name(type_name);
    }
    Ok(content)
}

fn reference_from(e: &BytesStart) -> Result<EnumAttributeReference, XmlError> {
    let attrs = AttrMap::from_start(e)?;
    let mut reference =
        EnumAttributeReference::new(attrs.required(TAG_ATTRIBUTE_REFERENCE, "name")?);
    if let Some(id) = attrs.id(TAG_ATTRIBUTE_REFERENCE)? {
        reference = reference.with_id(id);
    }
    Ok(reference)
}

fn name_is(name: QName<'_>, tag: &str) -> bool {
    name.as_ref() == tag.as_bytes()
}

fn unexpected(expected: &'static str, e: &BytesStart) -> XmlError {
    XmlError::UnexpectedElement {
        expected,
        found: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
    }
}

/// Decoded attributes of one element, in document order.
struct AttrMap(Vec<(String, String)>);

impl AttrMap {
    fn from_start(e: &BytesStart) -> Result<Self, XmlError> {
        let mut pairs = Vec::new();
        for attr in e.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            pairs.push((key, value));
        }
        Ok(AttrMap(pairs))
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn required(&self, element: &'static str, attribute: &'static str) -> Result<&str, XmlError> {
        self.get(attribute)
            .ok_or(XmlError::MissingAttribute { element, attribute })
    }

    fn flag(&self, key: &str) -> bool {
        self.get(key) == Some("true")
    }

    fn id(&self, element: &'static str) -> Result<Option<Uuid>, XmlError> {
        match self.get("id") {
            None => Ok(None),
            Some(raw) => Uuid::parse_str(raw)
                .map(Some)
                .map_err(|source| XmlError::InvalidId {
                    element,
                    value: raw.to_string(),
                    source,
                }),
        }
    }
}
