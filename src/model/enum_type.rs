//! Enum type schema: an ordered attribute list, an optional supertype and
//! either inline values or a deferral to an external content.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::datatype::ValueDatatype;
use crate::error::ModelError;
use crate::model::container::{self, ValueContainer};
use crate::model::enum_value::EnumValue;
use crate::model::events::{EventJournal, ModelEvent};
use crate::model::registry::TypeLookup;
use crate::validation::hierarchy;
use crate::validation::{Message, MessageList, MsgCode, ObjectRef};

/// One declared attribute of an enum type.
///
/// Inherited copies of supertype attributes are materialized on the subtype
/// with `inherited` set, so the stored list is always the full effective
/// schema in declared order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnumAttribute {
    id: Uuid,
    pub name: String,
    pub datatype: ValueDatatype,
    /// Values of this attribute must be unique across all rows.
    pub unique: bool,
    /// Marks the attribute whose values name the rows (code generation
    /// identifier). At most one per concrete type.
    pub literal_name: bool,
    pub multilingual: bool,
    /// Copied down from a supertype rather than declared here.
    pub inherited: bool,
}

impl EnumAttribute {
    pub fn new(name: impl Into<String>, datatype: ValueDatatype) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            datatype,
            unique: false,
            literal_name: false,
            multilingual: false,
            inherited: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Restore a persisted part id. Used by the XML reader.
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn with_unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn with_literal_name(mut self) -> Self {
        self.literal_name = true;
        self
    }

    pub fn with_multilingual(mut self) -> Self {
        self.multilingual = true;
        self
    }

    /// Clone of this attribute as it appears on a subtype, with a fresh
    /// part id and the `inherited` marker set.
    pub fn as_inherited_copy(&self) -> Self {
        let mut copy = self.clone();
        copy.id = Uuid::new_v4();
        copy.inherited = true;
        copy
    }
}

/// Schema entity declaring the attributes of an enumeration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnumType {
    id: Uuid,
    qualified_name: String,
    /// Qualified name of the supertype, if any.
    pub super_enum_type: Option<String>,
    pub is_abstract: bool,
    /// Extensible types defer their values to an external content.
    pub extensible: bool,
    /// Qualified name of the content an extensible type expects.
    pub enum_content_name: Option<String>,
    attributes: Vec<EnumAttribute>,
    values: Vec<EnumValue>,
    #[serde(skip)]
    journal: EventJournal,
}

impl EnumType {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            qualified_name: qualified_name.into(),
            super_enum_type: None,
            is_abstract: false,
            extensible: false,
            enum_content_name: None,
            attributes: Vec::new(),
            values: Vec::new(),
            journal: EventJournal::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Last segment of the qualified name.
    pub fn unqualified_name(&self) -> &str {
        self.qualified_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.qualified_name)
    }

    // -------------------------------------------------------------------------
    // Attribute schema
    // -------------------------------------------------------------------------

    pub fn add_attribute(&mut self, attribute: EnumAttribute) {
        self.attributes.push(attribute);
    }

    /// Attributes declared on this type itself (supertype copies filtered).
    pub fn enum_attributes(&self, include_literal_name: bool) -> Vec<&EnumAttribute> {
        self.attributes
            .iter()
            .filter(|a| !a.inherited && (include_literal_name || !a.literal_name))
            .collect()
    }

    /// Full effective schema in declared order, supertype copies included.
    pub fn enum_attributes_include_supertype_copies(
        &self,
        include_literal_name: bool,
    ) -> Vec<&EnumAttribute> {
        self.attributes
            .iter()
            .filter(|a| include_literal_name || !a.literal_name)
            .collect()
    }

    pub fn enum_attributes_count_include_supertype_copies(
        &self,
        include_literal_name: bool,
    ) -> usize {
        self.enum_attributes_include_supertype_copies(include_literal_name)
            .len()
    }

    pub fn find_enum_attribute_include_supertype_copies(
        &self,
        name: &str,
    ) -> Option<&EnumAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Position of the named attribute within the effective schema, counted
    /// over the same filtered list the cell storage is keyed by.
    pub fn enum_attribute_index(&self, name: &str, include_literal_name: bool) -> Option<usize> {
        self.enum_attributes_include_supertype_copies(include_literal_name)
            .iter()
            .position(|a| a.name == name)
    }

    pub fn literal_name_attribute(&self) -> Option<&EnumAttribute> {
        self.attributes.iter().find(|a| a.literal_name)
    }

    // -------------------------------------------------------------------------
    // Inline value rows
    // -------------------------------------------------------------------------

    pub fn enum_values(&self) -> &[EnumValue] {
        &self.values
    }

    pub fn enum_values_count(&self) -> usize {
        self.values.len()
    }

    pub fn enum_value(&self, index: usize) -> Option<&EnumValue> {
        self.values.get(index)
    }

    pub fn enum_value_mut(&mut self, index: usize) -> Option<&mut EnumValue> {
        self.values.get_mut(index)
    }

    /// Append a fresh row with one empty cell per attribute (literal name
    /// cells included; rows owned by a type carry them). Returns the index
    /// of the new row.
    pub fn new_enum_value(&mut self) -> usize {
        let cells = self.enum_attributes_count_include_supertype_copies(true);
        self.add_enum_value(EnumValue::with_cell_count(cells))
    }

    /// Append an already built row, e.g. one read back from XML.
    pub fn add_enum_value(&mut self, value: EnumValue) -> usize {
        self.values.push(value);
        let row_index = self.values.len() - 1;
        self.journal.record(ModelEvent::RowAdded { row_index });
        row_index
    }

    pub fn delete_enum_value(&mut self, index: usize) -> Result<(), ModelError> {
        if index >= self.values.len() {
            return Err(ModelError::IndexOutOfBounds {
                what: "enum value",
                index,
                len: self.values.len(),
            });
        }
        self.values.remove(index);
        self.journal.record(ModelEvent::RowRemoved { row_index: index });
        Ok(())
    }

    /// Set one cell of one row, addressing the cell by attribute name.
    /// The name is resolved against the effective schema (supertype copies
    /// and literal name attributes included).
    pub fn set_enum_attribute_value(
        &mut self,
        row: usize,
        attribute_name: &str,
        value: Option<String>,
    ) -> Result<(), ModelError> {
        let cell_index = self
            .enum_attribute_index(attribute_name, true)
            .ok_or_else(|| ModelError::UnknownAttribute {
                name: attribute_name.to_string(),
                enum_type: self.qualified_name.clone(),
            })?;
        let len = self.values.len();
        let row_value = self
            .values
            .get_mut(row)
            .ok_or(ModelError::IndexOutOfBounds {
                what: "enum value",
                index: row,
                len,
            })?;
        row_value.set_enum_attribute_value(cell_index, value)
    }

    /// Recorded mutations since the last drain.
    pub fn drain_events(&mut self) -> Vec<ModelEvent> {
        self.journal.drain()
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    /// Validate the schema itself plus any inline rows. Structural findings
    /// accumulate into `list`; nothing aborts.
    pub fn validate(&self, list: &mut MessageList, lookup: &dyn TypeLookup) {
        self.validate_attribute_names(list);
        self.validate_literal_name_rules(list);

        if self.extensible
            && self
                .enum_content_name
                .as_deref()
                .map_or(true, |n| n.trim().is_empty())
        {
            list.add(
                Message::error(
                    MsgCode::EnumContentNameEmpty,
                    format!(
                        "Extensible enum type '{}' does not name an enum content",
                        self.qualified_name
                    ),
                )
                .with_object(ObjectRef::property(&self.qualified_name, "enumContentName")),
            );
        }

        if let Some(super_name) = self.super_enum_type.as_deref().filter(|s| !s.trim().is_empty()) {
            // Guarded non-empty, so the precondition check cannot trip.
            if hierarchy::validate_super_enum_type(list, &self.qualified_name, super_name, lookup)
                .is_ok()
            {
                hierarchy::validate_supertype_hierarchy(list, self, lookup);
            }
        }

        let holder = ValueContainer::for_type(self);
        for (row_index, value) in self.values.iter().enumerate() {
            value.validate(&holder, row_index, list);
        }
        container::validate_unique_identifiers(&holder, &self.values, list);
    }

    /// Flag every attribute whose name already appeared at an earlier
    /// position.
    fn validate_attribute_names(&self, list: &mut MessageList) {
        for (i, attribute) in self.attributes.iter().enumerate() {
            let duplicate = self.attributes[..i].iter().any(|a| a.name == attribute.name);
            if duplicate {
                list.add(
                    Message::error(
                        MsgCode::DuplicateAttributeName,
                        format!(
                            "Enum type '{}' declares attribute '{}' more than once",
                            self.qualified_name, attribute.name
                        ),
                    )
                    .with_object(ObjectRef::indexed(
                        &self.qualified_name,
                        "enumAttribute",
                        i,
                    )),
                );
            }
        }
    }

    /// A concrete type that keeps its values inline needs exactly one
    /// literal name attribute. Abstract types skip the rules entirely;
    /// extensible types may omit the literal name but never carry two.
    fn validate_literal_name_rules(&self, list: &mut MessageList) {
        if self.is_abstract {
            return;
        }
        let literal_count = self.attributes.iter().filter(|a| a.literal_name).count();
        if literal_count > 1 {
            list.add(
                Message::error(
                    MsgCode::MultipleLiteralNameAttributes,
                    format!(
                        "Enum type '{}' has {} literal name attributes, only one is allowed",
                        self.qualified_name, literal_count
                    ),
                )
                .with_object(ObjectRef::object(&self.qualified_name)),
            );
        } else if literal_count == 0 && !self.extensible {
            list.add(
                Message::error(
                    MsgCode::NoLiteralNameAttribute,
                    format!(
                        "Enum type '{}' contains values but has no literal name attribute",
                        self.qualified_name
                    ),
                )
                .with_object(ObjectRef::object(&self.qualified_name)),
            );
        }
    }
}
