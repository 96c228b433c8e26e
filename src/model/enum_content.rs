//! Enum content: external row data bound to an enum type by qualified name.
//!
//! The content carries an ordered list of attribute references mirroring
//! the type's attribute schema. Rebinding the type rebuilds that list from
//! scratch; validation checks count, name set and ordering in strict order
//! and stops at the first broken level.

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::ModelError;
use crate::model::container::{self, ValueContainer};
use crate::model::enum_type::EnumType;
use crate::model::enum_value::EnumValue;
use crate::model::events::{EventJournal, ModelEvent};
use crate::model::registry::TypeLookup;
use crate::validation::{Message, MessageList, MsgCode, ObjectRef};

/// Message codes that make a content structurally incompatible with its
/// type, so that only a model fix (refresh or schema change) can help.
/// Every new structural validation code must be added here as well,
/// otherwise `is_fix_to_model_required` will not report it.
pub const FIX_REQUIRED_CODES: [MsgCode; 7] = [
    MsgCode::EnumTypeMissing,
    MsgCode::EnumTypeDoesNotExist,
    MsgCode::EnumTypeIsAbstract,
    MsgCode::ReferencedAttributeCountInvalid,
    MsgCode::ReferencedAttributeNamesInvalid,
    MsgCode::ReferencedAttributeOrderingInvalid,
    MsgCode::AttributeValueTypeMismatch,
];

/// Named placeholder linking a content to one attribute of its type, by
/// name and list position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnumAttributeReference {
    id: Uuid,
    pub name: String,
}

impl EnumAttributeReference {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}

/// Row container for an extensible enum type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnumContent {
    id: Uuid,
    qualified_name: String,
    enum_type_name: Option<String>,
    references: Vec<EnumAttributeReference>,
    values: Vec<EnumValue>,
    #[serde(skip)]
    journal: EventJournal,
}

impl EnumContent {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            qualified_name: qualified_name.into(),
            enum_type_name: None,
            references: Vec::new(),
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

    pub fn unqualified_name(&self) -> &str {
        self.qualified_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.qualified_name)
    }

    pub fn enum_type_name(&self) -> Option<&str> {
        self.enum_type_name.as_deref()
    }

    /// Plain assignment of the bound type name, without refresh or event.
    /// This is the load path; interactive rebinding goes through
    /// [`set_enum_type`].
    ///
    /// [`set_enum_type`]: EnumContent::set_enum_type
    pub fn set_enum_type_name(&mut self, name: impl Into<String>) {
        self.enum_type_name = Some(name.into());
    }

    /// Rebind this content to another enum type and resynchronize the
    /// reference list. The old binding is reported in the change event.
    pub fn set_enum_type(
        &mut self,
        name: &str,
        lookup: &dyn TypeLookup,
    ) -> Result<(), ModelError> {
        if name.trim().is_empty() {
            return Err(ModelError::InvalidArgument(
                "enum type name must not be empty".into(),
            ));
        }
        let old = self.enum_type_name.replace(name.to_string());
        self.journal.record(ModelEvent::EnumTypeChanged {
            old,
            new: name.to_string(),
        });
        self.refresh_enum_attribute_references(lookup);
        Ok(())
    }

    /// Resynchronize the reference list with the bound type's schema.
    /// When the type does not resolve nothing happens and any existing
    /// references stay as they are, stale or not.
    pub fn refresh_enum_attribute_references(&mut self, lookup: &dyn TypeLookup) {
        let resolved = self
            .enum_type_name
            .as_deref()
            .and_then(|n| lookup.find_enum_type(n));
        match resolved {
            Some(enum_type) => self.rebuild_references_from(enum_type),
            None => debug!(
                content = %self.qualified_name,
                enum_type = self.enum_type_name.as_deref().unwrap_or(""),
                "enum type unresolved, keeping existing attribute references"
            ),
        }
    }

    /// Clear and rebuild the references against a concrete schema: one
    /// reference per attribute in declared order, supertype copies
    /// included, literal name attributes excluded. Prior reference state
    /// is discarded, not merged.
    pub fn rebuild_references_from(&mut self, enum_type: &EnumType) {
        self.references.clear();
        for attribute in enum_type.enum_attributes_include_supertype_copies(false) {
            self.references
                .push(EnumAttributeReference::new(attribute.name.clone()));
        }
        debug!(
            content = %self.qualified_name,
            enum_type = %enum_type.qualified_name(),
            references = self.references.len(),
            "rebuilt attribute references"
        );
        self.journal.record(ModelEvent::ReferencesRebuilt {
            reference_count: self.references.len(),
        });
    }

    pub fn enum_attribute_references(&self) -> &[EnumAttributeReference] {
        &self.references
    }

    pub fn enum_attribute_references_count(&self) -> usize {
        self.references.len()
    }

    pub fn enum_attribute_reference(&self, index: usize) -> Option<&EnumAttributeReference> {
        self.references.get(index)
    }

    /// Append a reference as persisted. Load path, no event.
    pub fn add_enum_attribute_reference(&mut self, reference: EnumAttributeReference) {
        self.references.push(reference);
    }

    // -------------------------------------------------------------------------
    // Value rows
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

    /// Append a fresh row with one empty cell per attribute reference.
    pub fn new_enum_value(&mut self) -> usize {
        self.add_enum_value(EnumValue::with_cell_count(self.references.len()))
    }

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

    /// Set one cell of one row, addressing the cell by attribute name. The
    /// name must exist on the resolved type (supertype copies included,
    /// literal names excluded since content rows carry no literal cells).
    pub fn set_enum_attribute_value(
        &mut self,
        row: usize,
        attribute_name: &str,
        value: Option<String>,
        lookup: &dyn TypeLookup,
    ) -> Result<(), ModelError> {
        let type_name = self
            .enum_type_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| {
                ModelError::InvalidArgument(format!(
                    "enum content '{}' is not bound to an enum type",
                    self.qualified_name
                ))
            })?;
        let enum_type = lookup
            .find_enum_type(type_name)
            .ok_or_else(|| ModelError::UnknownEnumType(type_name.to_string()))?;
        let cell_index = enum_type
            .enum_attribute_index(attribute_name, false)
            .ok_or_else(|| ModelError::UnknownAttribute {
                name: attribute_name.to_string(),
                enum_type: type_name.to_string(),
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

    pub fn drain_events(&mut self) -> Vec<ModelEvent> {
        self.journal.drain()
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    /// Check the reference list against a type schema in strict order:
    /// count, then name set, then position-by-position ordering. Each level
    /// runs only when the previous one passed, and the ordering scan stops
    /// at the first mismatch, so at most one message is added.
    pub fn validate_enum_attribute_references(
        &self,
        list: &mut MessageList,
        enum_type: &EnumType,
    ) {
        let attributes = enum_type.enum_attributes_include_supertype_copies(false);

        if self.references.len() != attributes.len() {
            list.add(
                Message::error(
                    MsgCode::ReferencedAttributeCountInvalid,
                    format!(
                        "Enum content '{}' has {} attribute references but enum type '{}' defines {} attributes",
                        self.qualified_name,
                        self.references.len(),
                        enum_type.qualified_name(),
                        attributes.len()
                    ),
                )
                .with_object(ObjectRef::property(
                    &self.qualified_name,
                    "enumAttributeReferences",
                )),
            );
            return;
        }

        for attribute in &attributes {
            if !self.references.iter().any(|r| r.name == attribute.name) {
                list.add(
                    Message::error(
                        MsgCode::ReferencedAttributeNamesInvalid,
                        format!(
                            "Enum content '{}' has no reference for attribute '{}' of enum type '{}'",
                            self.qualified_name,
                            attribute.name,
                            enum_type.qualified_name()
                        ),
                    )
                    .with_object(ObjectRef::property(
                        &self.qualified_name,
                        "enumAttributeReferences",
                    )),
                );
                return;
            }
        }

        for (i, attribute) in attributes.iter().enumerate() {
            if self.references[i].name != attribute.name {
                list.add(
                    Message::error(
                        MsgCode::ReferencedAttributeOrderingInvalid,
                        format!(
                            "Attribute references of enum content '{}' are out of order: position {} holds '{}' but enum type '{}' declares '{}'",
                            self.qualified_name,
                            i,
                            self.references[i].name,
                            enum_type.qualified_name(),
                            attribute.name
                        ),
                    )
                    .with_object(ObjectRef::indexed(
                        &self.qualified_name,
                        "enumAttributeReferences",
                        i,
                    )),
                );
                return;
            }
        }
    }

    /// Full content validation: type binding, reference consistency, then
    /// rows. Binding problems are terminal; row checks run only once the
    /// references are clean, so a broken schema never cascades into a
    /// flood of per-row noise.
    pub fn validate(&self, list: &mut MessageList, lookup: &dyn TypeLookup) {
        let Some(type_name) = self
            .enum_type_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
        else {
            list.add(
                Message::error(
                    MsgCode::EnumTypeMissing,
                    format!(
                        "Enum content '{}' does not name an enum type",
                        self.qualified_name
                    ),
                )
                .with_object(ObjectRef::property(&self.qualified_name, "enumType")),
            );
            return;
        };

        let Some(enum_type) = lookup.find_enum_type(type_name) else {
            list.add(
                Message::error(
                    MsgCode::EnumTypeDoesNotExist,
                    format!(
                        "Enum type '{}' referenced by enum content '{}' does not exist",
                        type_name, self.qualified_name
                    ),
                )
                .with_object(ObjectRef::property(&self.qualified_name, "enumType")),
            );
            return;
        };

        if enum_type.is_abstract {
            list.add(
                Message::error(
                    MsgCode::EnumTypeIsAbstract,
                    format!(
                        "Enum type '{}' referenced by enum content '{}' is abstract",
                        type_name, self.qualified_name
                    ),
                )
                .with_object(ObjectRef::property(&self.qualified_name, "enumType")),
            );
            return;
        }

        if !enum_type.extensible {
            list.add(
                Message::error(
                    MsgCode::ValuesArePartOfType,
                    format!(
                        "Enum type '{}' keeps its values itself, enum content '{}' is not allowed",
                        type_name, self.qualified_name
                    ),
                )
                .with_object(ObjectRef::property(&self.qualified_name, "enumType")),
            );
            return;
        }

        if enum_type.enum_content_name.as_deref() != Some(self.qualified_name.as_str()) {
            list.add(
                Message::error(
                    MsgCode::EnumContentNameNotCorrect,
                    format!(
                        "Enum content '{}' is not the content declared by enum type '{}' (expected '{}')",
                        self.qualified_name,
                        type_name,
                        enum_type.enum_content_name.as_deref().unwrap_or("")
                    ),
                )
                .with_object(ObjectRef::object(&self.qualified_name)),
            );
        }

        let before = list.len();
        self.validate_enum_attribute_references(list, enum_type);
        if list.len() != before {
            return;
        }

        let holder = ValueContainer::for_content(self, Some(enum_type));
        for (row_index, value) in self.values.iter().enumerate() {
            value.validate(&holder, row_index, list);
        }
        container::validate_unique_identifiers(&holder, &self.values, list);
    }

    /// True when validation reports any structural mismatch from
    /// [`FIX_REQUIRED_CODES`], i.e. editing values cannot help until the
    /// content is resynchronized with its type.
    pub fn is_fix_to_model_required(&self, lookup: &dyn TypeLookup) -> bool {
        let mut list = MessageList::new();
        self.validate(&mut list, lookup);
        list.iter()
            .any(|m| FIX_REQUIRED_CODES.contains(&m.code()))
    }

    /// True when the bound type resolves and no model fix is pending.
    pub fn is_capable_of_containing_values(&self, lookup: &dyn TypeLookup) -> bool {
        let resolved = self
            .enum_type_name
            .as_deref()
            .and_then(|n| lookup.find_enum_type(n))
            .is_some();
        resolved && !self.is_fix_to_model_required(lookup)
    }
}
