//! Dispatch over the two kinds of row containers.
//!
//! Rows live either directly on an enum type (literal name cells included)
//! or on an enum content (no literal name cells; the reference list is the
//! positional schema). Validation and name resolution depend only on this
//! view, never on the concrete container.

use crate::datatype::ValueDatatype;
use crate::model::enum_content::EnumContent;
use crate::model::enum_type::{EnumAttribute, EnumType};
use crate::model::enum_value::EnumValue;
use crate::validation::{Message, MessageList, MsgCode, ObjectRef};

/// Schema view of a row container.
#[derive(Clone, Copy, Debug)]
pub enum ValueContainer<'a> {
    /// An enum type holding its values inline.
    Type(&'a EnumType),
    /// An enum content with whatever type it currently resolves to.
    Content {
        content: &'a EnumContent,
        resolved_type: Option<&'a EnumType>,
    },
}

impl<'a> ValueContainer<'a> {
    pub fn for_type(enum_type: &'a EnumType) -> Self {
        ValueContainer::Type(enum_type)
    }

    pub fn for_content(content: &'a EnumContent, resolved_type: Option<&'a EnumType>) -> Self {
        ValueContainer::Content {
            content,
            resolved_type,
        }
    }

    /// Qualified name of the underlying container.
    pub fn name(&self) -> &'a str {
        match self {
            ValueContainer::Type(t) => t.qualified_name(),
            ValueContainer::Content { content, .. } => content.qualified_name(),
        }
    }

    /// Number of cells a consistent row must have.
    pub fn effective_attribute_count(&self) -> usize {
        match self {
            ValueContainer::Type(t) => t.enum_attributes_count_include_supertype_copies(true),
            ValueContainer::Content { content, .. } => content.enum_attribute_references_count(),
        }
    }

    /// Attribute name bound to a cell position.
    pub fn attribute_name_at(&self, index: usize) -> Option<&'a str> {
        match self {
            ValueContainer::Type(t) => t
                .enum_attributes_include_supertype_copies(true)
                .get(index)
                .map(|a| a.name.as_str()),
            ValueContainer::Content { content, .. } => content
                .enum_attribute_reference(index)
                .map(|r| r.name.as_str()),
        }
    }

    /// Cell position for an attribute name, resolved against the type's
    /// schema; literal name attributes count only for type containers.
    /// `None` when the name is unknown or a content's type is unresolved.
    pub fn find_attribute_index(&self, name: &str) -> Option<usize> {
        match self {
            ValueContainer::Type(t) => t.enum_attribute_index(name, true),
            ValueContainer::Content { resolved_type, .. } => {
                resolved_type.and_then(|t| t.enum_attribute_index(name, false))
            }
        }
    }

    fn attribute_at(&self, index: usize) -> Option<&'a EnumAttribute> {
        match self {
            ValueContainer::Type(t) => t
                .enum_attributes_include_supertype_copies(true)
                .get(index)
                .copied(),
            ValueContainer::Content { resolved_type, .. } => resolved_type.and_then(|t| {
                t.enum_attributes_include_supertype_copies(false)
                    .get(index)
                    .copied()
            }),
        }
    }

    /// Datatype for a cell position, when the schema resolves that far.
    pub fn attribute_datatype_at(&self, index: usize) -> Option<ValueDatatype> {
        self.attribute_at(index).map(|a| a.datatype)
    }

    /// Whether values at this position must be unique across rows. Literal
    /// name attributes are identifiers and count as unique.
    pub fn attribute_is_unique_at(&self, index: usize) -> bool {
        self.attribute_at(index)
            .map_or(false, |a| a.unique || a.literal_name)
    }
}

/// Flag every row whose value at a unique position equals the value of an
/// earlier row at the same position. The first occurrence stays clean.
/// Equality is datatype aware, so `007` and `7` collide under `Integer`.
pub(crate) fn validate_unique_identifiers(
    holder: &ValueContainer<'_>,
    rows: &[EnumValue],
    list: &mut MessageList,
) {
    for cell_index in 0..holder.effective_attribute_count() {
        if !holder.attribute_is_unique_at(cell_index) {
            continue;
        }
        let datatype = holder.attribute_datatype_at(cell_index);
        let attribute = holder
            .attribute_name_at(cell_index)
            .unwrap_or("enumAttributeValue");
        for (row_index, row) in rows.iter().enumerate() {
            let Some(value) = row
                .enum_attribute_value(cell_index)
                .and_then(|c| c.value_str())
            else {
                continue;
            };
            let seen_before = rows[..row_index].iter().any(|earlier| {
                earlier
                    .enum_attribute_value(cell_index)
                    .and_then(|c| c.value_str())
                    .is_some_and(|other| match datatype {
                        Some(dt) => dt.values_equal(other, value),
                        None => other == value,
                    })
            });
            if seen_before {
                list.add(
                    Message::error(
                        MsgCode::UniqueIdentifierDuplicate,
                        format!(
                            "Value '{}' for unique attribute '{}' in row {} of '{}' already occurs in an earlier row",
                            value,
                            attribute,
                            row_index,
                            holder.name()
                        ),
                    )
                    .with_object(ObjectRef::indexed(holder.name(), attribute, row_index)),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::enum_content::EnumContent;
    use pretty_assertions::assert_eq;

    fn grade_type() -> EnumType {
        let mut t = EnumType::new("model.Grade");
        t.add_attribute(
            EnumAttribute::new("LITERAL_NAME", ValueDatatype::String).with_literal_name(),
        );
        t.add_attribute(EnumAttribute::new("id", ValueDatatype::Integer).with_unique());
        t.add_attribute(EnumAttribute::new("label", ValueDatatype::String));
        t
    }

    #[test]
    fn test_type_container_includes_literal_cells() {
        let t = grade_type();
        let holder = ValueContainer::for_type(&t);

        assert_eq!(holder.effective_attribute_count(), 3);
        assert_eq!(holder.attribute_name_at(0), Some("LITERAL_NAME"));
        assert_eq!(holder.find_attribute_index("id"), Some(1));
        assert_eq!(holder.attribute_datatype_at(1), Some(ValueDatatype::Integer));
        assert!(holder.attribute_is_unique_at(0));
    }

    #[test]
    fn test_content_container_uses_reference_list() {
        let t = grade_type();
        let mut content = EnumContent::new("model.GradeValues");
        content.set_enum_type_name("model.Grade");
        content.rebuild_references_from(&t);
        let holder = ValueContainer::for_content(&content, Some(&t));

        assert_eq!(holder.effective_attribute_count(), 2);
        assert_eq!(holder.attribute_name_at(0), Some("id"));
        // Literal names never resolve for content rows.
        assert_eq!(holder.find_attribute_index("LITERAL_NAME"), None);
        assert_eq!(holder.find_attribute_index("label"), Some(1));
    }

    #[test]
    fn test_unresolved_type_yields_no_schema() {
        let content = EnumContent::new("model.Orphan");
        let holder = ValueContainer::for_content(&content, None);

        assert_eq!(holder.find_attribute_index("id"), None);
        assert_eq!(holder.attribute_datatype_at(0), None);
        assert!(!holder.attribute_is_unique_at(0));
    }

    #[test]
    fn test_unique_duplicates_flag_later_rows_only() {
        let mut t = grade_type();
        for literal in ["A", "B", "C"] {
            let row = t.new_enum_value();
            t.set_enum_attribute_value(row, "LITERAL_NAME", Some(literal.into()))
                .unwrap();
        }
        t.set_enum_attribute_value(0, "id", Some("7".into())).unwrap();
        t.set_enum_attribute_value(1, "id", Some("8".into())).unwrap();
        // Same number as row 0 under Integer equality, different spelling.
        t.set_enum_attribute_value(2, "id", Some("007".into())).unwrap();

        let holder = ValueContainer::for_type(&t);
        let mut list = MessageList::new();
        validate_unique_identifiers(&holder, t.enum_values(), &mut list);

        assert_eq!(list.len(), 1);
        let msg = list.message_by_code(MsgCode::UniqueIdentifierDuplicate).unwrap();
        assert_eq!(msg.invalid_object().unwrap().index, Some(2));
        assert_eq!(msg.invalid_object().unwrap().property.as_deref(), Some("id"));
    }
}
