//! One value row and its cells.
//!
//! Cells are bound to attributes purely by position. The index is the only
//! identity a cell has; schema reorderings must go through the container
//! reconciliation, never through cell storage directly.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::model::container::ValueContainer;
use crate::model::events::{EventJournal, ModelEvent};
use crate::validation::{Message, MessageList, MsgCode, ObjectRef};

/// A single cell: the string-encoded value for one attribute position.
/// `None` models an explicitly unset value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumAttributeValue {
    pub value: Option<String>,
}

impl EnumAttributeValue {
    pub fn new(value: Option<String>) -> Self {
        Self { value }
    }

    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    pub fn value_str(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// One row of an enum type or enum content.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EnumValue {
    cells: Vec<EnumAttributeValue>,
    #[serde(skip)]
    journal: EventJournal,
}

impl EnumValue {
    /// Row with `count` empty cells, one per attribute position.
    pub fn with_cell_count(count: usize) -> Self {
        Self {
            cells: vec![EnumAttributeValue::default(); count],
            journal: EventJournal::default(),
        }
    }

    /// Row from already encoded cell values, e.g. from the XML reader.
    pub fn from_values(values: Vec<Option<String>>) -> Self {
        Self {
            cells: values.into_iter().map(EnumAttributeValue::new).collect(),
            journal: EventJournal::default(),
        }
    }

    pub fn enum_attribute_values(&self) -> &[EnumAttributeValue] {
        &self.cells
    }

    pub fn enum_attribute_values_count(&self) -> usize {
        self.cells.len()
    }

    pub fn enum_attribute_value(&self, index: usize) -> Option<&EnumAttributeValue> {
        self.cells.get(index)
    }

    /// Cell for the named attribute, resolved positionally through the
    /// owning container's schema. Returns `None` when the attribute is
    /// unknown or the resolved index lies beyond the current cell list;
    /// rows mid-construction or stale against a schema change are expected
    /// to answer `None`, not fail.
    pub fn get_enum_attribute_value(
        &self,
        holder: &ValueContainer<'_>,
        attribute_name: &str,
    ) -> Option<&EnumAttributeValue> {
        let index = holder.find_attribute_index(attribute_name)?;
        self.cells.get(index)
    }

    pub fn set_enum_attribute_value(
        &mut self,
        index: usize,
        value: Option<String>,
    ) -> Result<(), ModelError> {
        let len = self.cells.len();
        let cell = self
            .cells
            .get_mut(index)
            .ok_or(ModelError::IndexOutOfBounds {
                what: "enum attribute value",
                index,
                len,
            })?;
        cell.value = value;
        self.journal.record(ModelEvent::CellChanged { cell_index: index });
        Ok(())
    }

    /// Exchange the cells at two positions. The net effect is a pure
    /// transposition; cells between the two positions keep their order.
    pub fn swap_enum_attribute_values(
        &mut self,
        first: usize,
        second: usize,
    ) -> Result<(), ModelError> {
        if first == second {
            return Err(ModelError::InvalidArgument(format!(
                "cannot swap cell {first} with itself"
            )));
        }
        let len = self.cells.len();
        for index in [first, second] {
            if index >= len {
                return Err(ModelError::IndexOutOfBounds {
                    what: "enum attribute value",
                    index,
                    len,
                });
            }
        }
        self.cells.swap(first, second);
        self.journal.record(ModelEvent::CellsSwapped { first, second });
        Ok(())
    }

    /// Move the cell at `index` one position up (toward 0) or down. At the
    /// boundary this is a no-op that reports the unchanged index.
    pub fn move_enum_attribute_value(
        &mut self,
        index: usize,
        up: bool,
    ) -> Result<usize, ModelError> {
        let len = self.cells.len();
        if index >= len {
            return Err(ModelError::IndexOutOfBounds {
                what: "enum attribute value",
                index,
                len,
            });
        }
        let target = if up {
            if index == 0 {
                return Ok(index);
            }
            index - 1
        } else {
            if index + 1 == len {
                return Ok(index);
            }
            index + 1
        };
        self.cells.swap(index, target);
        self.journal.record(ModelEvent::CellMoved {
            from: index,
            to: target,
        });
        Ok(target)
    }

    pub fn drain_events(&mut self) -> Vec<ModelEvent> {
        self.journal.drain()
    }

    /// Validate this row against its container's effective schema: the
    /// cell count must match exactly (one message for the whole row), and
    /// every non-null cell must parse under its attribute's datatype.
    pub fn validate(
        &self,
        holder: &ValueContainer<'_>,
        row_index: usize,
        list: &mut MessageList,
    ) {
        let expected = holder.effective_attribute_count();
        if self.cells.len() != expected {
            list.add(
                Message::error(
                    MsgCode::AttributeValuesCountInvalid,
                    format!(
                        "Row {} of '{}' has {} values but the schema defines {} attributes",
                        row_index,
                        holder.name(),
                        self.cells.len(),
                        expected
                    ),
                )
                .with_object(ObjectRef::indexed(holder.name(), "enumValue", row_index)),
            );
            return;
        }
        for (cell_index, cell) in self.cells.iter().enumerate() {
            let Some(value) = cell.value_str() else {
                continue;
            };
            let Some(datatype) = holder.attribute_datatype_at(cell_index) else {
                continue;
            };
            if !datatype.is_parsable(value) {
                let attribute = holder
                    .attribute_name_at(cell_index)
                    .unwrap_or("enumAttributeValue");
                list.add(
                    Message::error(
                        MsgCode::AttributeValueTypeMismatch,
                        format!(
                            "Value '{}' in row {} of '{}' is not a valid {} for attribute '{}'",
                            value,
                            row_index,
                            holder.name(),
                            datatype,
                            attribute
                        ),
                    )
                    .with_object(ObjectRef::indexed(holder.name(), attribute, row_index)),
                );
            }
        }
    }
}
