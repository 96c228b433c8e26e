//! Deterministic XML writer for enum type and enum content documents.
//!
//! Output is byte-for-byte stable across calls over the same object:
//! two-space indent, attributes in fixed order, flag attributes written
//! only when set. Null cells become `<EnumAttributeValue isNull="true" />`
//! so they stay distinguishable from empty strings on re-import.

use std::fmt::Write;

use anyhow::Result;

use super::{
    xml_escape, TAG_ATTRIBUTE_REFERENCE, TAG_ATTRIBUTE_VALUE, TAG_ENUM_ATTRIBUTE, TAG_ENUM_CONTENT,
    TAG_ENUM_TYPE, TAG_ENUM_VALUE,
};
use crate::model::{EnumContent, EnumType, EnumValue};

/// Serialize an enum type, its attribute schema and its inline rows.
pub fn write_enum_type(enum_type: &EnumType) -> Result<String> {
    let mut xml = String::new();
    writeln!(xml, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;

    let mut root = format!(
        r#"<{} id="{}" qualifiedName="{}" abstract="{}" extensible="{}""#,
        TAG_ENUM_TYPE,
        enum_type.id(),
        xml_escape(enum_type.qualified_name()),
        enum_type.is_abstract,
        enum_type.extensible
    );
    if let Some(super_name) = &enum_type.super_enum_type {
        write!(root, r#" superEnumType="{}""#, xml_escape(super_name))?;
    }
    if let Some(content_name) = &enum_type.enum_content_name {
        write!(root, r#" enumContentName="{}""#, xml_escape(content_name))?;
    }
    writeln!(xml, "{}>", root)?;

    for attribute in enum_type.enum_attributes_include_supertype_copies(true) {
        let mut line = format!(
            r#"  <{} id="{}" name="{}" datatype="{}""#,
            TAG_ENUM_ATTRIBUTE,
            attribute.id(),
            xml_escape(&attribute.name),
            attribute.datatype
        );
        for (key, set) in [
            ("unique", attribute.unique),
            ("literalName", attribute.literal_name),
            ("multilingual", attribute.multilingual),
            ("inherited", attribute.inherited),
        ] {
            if set {
                write!(line, r#" {}="true""#, key)?;
            }
        }
        writeln!(xml, "{} />", line)?;
    }

    for row in enum_type.enum_values() {
        write_row(&mut xml, row)?;
    }

    writeln!(xml, "</{}>", TAG_ENUM_TYPE)?;
    Ok(xml)
}

/// Serialize an enum content, its attribute references and its rows.
pub fn write_enum_content(content: &EnumContent) -> Result<String> {
    let mut xml = String::new();
    writeln!(xml, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;

    let mut root = format!(
        r#"<{} id="{}" qualifiedName="{}""#,
        TAG_ENUM_CONTENT,
        content.id(),
        xml_escape(content.qualified_name())
    );
    if let Some(type_name) = content.enum_type_name() {
        write!(root, r#" enumType="{}""#, xml_escape(type_name))?;
    }
    writeln!(xml, "{}>", root)?;

    for reference in content.enum_attribute_references() {
        writeln!(
            xml,
            r#"  <{} id="{}" name="{}" />"#,
            TAG_ATTRIBUTE_REFERENCE,
            reference.id(),
            xml_escape(&reference.name)
        )?;
    }

    for row in content.enum_values() {
        write_row(&mut xml, row)?;
    }

    writeln!(xml, "</{}>", TAG_ENUM_CONTENT)?;
    Ok(xml)
}

fn write_row(xml: &mut String, row: &EnumValue) -> Result<()> {
    if row.enum_attribute_values_count() == 0 {
        writeln!(xml, "  <{} />", TAG_ENUM_VALUE)?;
        return Ok(());
    }
    writeln!(xml, "  <{}>", TAG_ENUM_VALUE)?;
    for cell in row.enum_attribute_values() {
        match cell.value_str() {
            Some(text) => writeln!(
                xml,
                "    <{tag}>{}</{tag}>",
                xml_escape(text),
                tag = TAG_ATTRIBUTE_VALUE
            )?,
            None => writeln!(xml, r#"    <{} isNull="true" />"#, TAG_ATTRIBUTE_VALUE)?,
        }
    }
    writeln!(xml, "  </{}>", TAG_ENUM_VALUE)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatype::ValueDatatype;
    use crate::model::{EnumAttribute, EnumAttributeReference};

    fn color_type() -> EnumType {
        let mut t = EnumType::new("model.Color");
        t.add_attribute(EnumAttribute::new("LITERAL_NAME", ValueDatatype::String).with_literal_name());
        t.add_attribute(EnumAttribute::new("id", ValueDatatype::Integer).with_unique());
        t.add_attribute(EnumAttribute::new("name", ValueDatatype::String));
        t.add_enum_value(EnumValue::from_values(vec![
            Some("RED".into()),
            Some("1".into()),
            Some("red".into()),
        ]));
        t
    }

    #[test]
    fn type_document_shape() {
        let xml = write_enum_type(&color_type()).unwrap();
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(r#"qualifiedName="model.Color""#));
        assert!(xml.contains(r#"abstract="false""#));
        assert!(xml.contains(r#"datatype="Integer" unique="true""#));
        assert!(xml.contains(r#"literalName="true""#));
        assert!(xml.contains("<EnumAttributeValue>RED</EnumAttributeValue>"));
        assert!(xml.trim_end().ends_with("</EnumType>"));
    }

    #[test]
    fn optional_root_attributes_only_when_present() {
        let mut t = EnumType::new("model.Plain");
        let xml = write_enum_type(&t).unwrap();
        assert!(!xml.contains("superEnumType"));
        assert!(!xml.contains("enumContentName"));

        t.super_enum_type = Some("model.Base".into());
        t.enum_content_name = Some("content.Plain".into());
        let xml = write_enum_type(&t).unwrap();
        assert!(xml.contains(r#"superEnumType="model.Base""#));
        assert!(xml.contains(r#"enumContentName="content.Plain""#));
    }

    #[test]
    fn content_document_with_null_cell() {
        let mut c = EnumContent::new("content.Colors");
        c.set_enum_type_name("model.Color");
        c.add_enum_attribute_reference(EnumAttributeReference::new("id"));
        c.add_enum_attribute_reference(EnumAttributeReference::new("name"));
        c.add_enum_value(EnumValue::from_values(vec![Some("1".into()), None]));

        let xml = write_enum_content(&c).unwrap();
        assert!(xml.contains(r#"enumType="model.Color""#));
        assert!(xml.contains(r#"<EnumAttributeReference id="#));
        assert!(xml.contains(r#"<EnumAttributeValue isNull="true" />"#));
    }

    #[test]
    fn output_is_deterministic() {
        let t = color_type();
        assert_eq!(
            write_enum_type(&t).unwrap(),
            write_enum_type(&t).unwrap()
        );
    }

    #[test]
    fn markup_in_values_is_escaped() {
        let mut t = EnumType::new("model.Odd");
        t.add_attribute(EnumAttribute::new("text", ValueDatatype::String));
        t.add_enum_value(EnumValue::from_values(vec![Some("a <b> & \"c\"".into())]));
        let xml = write_enum_type(&t).unwrap();
        assert!(xml.contains("a &lt;b&gt; &amp; &quot;c&quot;"));
    }
}
