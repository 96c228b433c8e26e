//! Project-scoped registry resolving qualified names to model objects.
//!
//! The registry stands in for the surrounding project's search path: types
//! and contents register under their qualified name, and everything that
//! needs to resolve a name does so through the [`TypeLookup`] seam so that
//! validation code never depends on this concrete store.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::ModelError;
use crate::model::enum_content::EnumContent;
use crate::model::enum_type::EnumType;
use crate::validation::MessageList;

/// Name resolution as validation consumers see it.
pub trait TypeLookup {
    fn find_enum_type(&self, qualified_name: &str) -> Option<&EnumType>;
}

/// View over the type map alone, so content mutation can run while types
/// stay readable.
struct TypeIndex<'a>(&'a BTreeMap<String, EnumType>);

impl TypeLookup for TypeIndex<'_> {
    fn find_enum_type(&self, qualified_name: &str) -> Option<&EnumType> {
        self.0.get(qualified_name)
    }
}

/// In-memory store of every registered enum type and enum content.
#[derive(Debug, Default, Clone)]
pub struct EnumModelRegistry {
    enum_types: BTreeMap<String, EnumType>,
    enum_contents: BTreeMap<String, EnumContent>,
}

impl EnumModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_enum_type(&mut self, enum_type: EnumType) -> Result<(), ModelError> {
        let name = enum_type.qualified_name().to_string();
        if self.enum_types.contains_key(&name) {
            return Err(ModelError::DuplicateQualifiedName(name));
        }
        debug!(enum_type = %name, "registered enum type");
        self.enum_types.insert(name, enum_type);
        Ok(())
    }

    pub fn register_enum_content(&mut self, content: EnumContent) -> Result<(), ModelError> {
        let name = content.qualified_name().to_string();
        if self.enum_contents.contains_key(&name) {
            return Err(ModelError::DuplicateQualifiedName(name));
        }
        debug!(content = %name, "registered enum content");
        self.enum_contents.insert(name, content);
        Ok(())
    }

    pub fn remove_enum_type(&mut self, qualified_name: &str) -> Result<EnumType, ModelError> {
        self.enum_types
            .remove(qualified_name)
            .ok_or_else(|| ModelError::UnknownEnumType(qualified_name.to_string()))
    }

    pub fn remove_enum_content(
        &mut self,
        qualified_name: &str,
    ) -> Result<EnumContent, ModelError> {
        self.enum_contents
            .remove(qualified_name)
            .ok_or_else(|| ModelError::UnknownEnumContent(qualified_name.to_string()))
    }

    pub fn find_enum_content(&self, qualified_name: &str) -> Option<&EnumContent> {
        self.enum_contents.get(qualified_name)
    }

    /// The content bound to the given type, if any is registered.
    pub fn enum_content_for_type(&self, type_name: &str) -> Option<&EnumContent> {
        self.enum_contents
            .values()
            .find(|c| c.enum_type_name() == Some(type_name))
    }

    /// Qualified names are the iteration order (BTreeMap).
    pub fn enum_types(&self) -> impl Iterator<Item = &EnumType> {
        self.enum_types.values()
    }

    pub fn enum_contents(&self) -> impl Iterator<Item = &EnumContent> {
        self.enum_contents.values()
    }

    pub fn enum_types_count(&self) -> usize {
        self.enum_types.len()
    }

    pub fn enum_contents_count(&self) -> usize {
        self.enum_contents.len()
    }

    pub fn enum_content_mut(&mut self, qualified_name: &str) -> Option<&mut EnumContent> {
        self.enum_contents.get_mut(qualified_name)
    }

    pub fn enum_type_mut(&mut self, qualified_name: &str) -> Option<&mut EnumType> {
        self.enum_types.get_mut(qualified_name)
    }

    /// Rebind a registered content to a type and resynchronize it, with
    /// the types registered here serving as the lookup.
    pub fn set_content_enum_type(
        &mut self,
        content_name: &str,
        type_name: &str,
    ) -> Result<(), ModelError> {
        let content = self
            .enum_contents
            .get_mut(content_name)
            .ok_or_else(|| ModelError::UnknownEnumContent(content_name.to_string()))?;
        content.set_enum_type(type_name, &TypeIndex(&self.enum_types))
    }

    /// Resynchronize a registered content against its bound type.
    pub fn refresh_content_references(&mut self, content_name: &str) -> Result<(), ModelError> {
        let content = self
            .enum_contents
            .get_mut(content_name)
            .ok_or_else(|| ModelError::UnknownEnumContent(content_name.to_string()))?;
        content.refresh_enum_attribute_references(&TypeIndex(&self.enum_types));
        Ok(())
    }

    /// Validate every registered type and content into one list.
    pub fn validate_all(&self) -> MessageList {
        let mut list = MessageList::new();
        for enum_type in self.enum_types.values() {
            enum_type.validate(&mut list, self);
        }
        for content in self.enum_contents.values() {
            content.validate(&mut list, self);
        }
        list
    }
}

impl TypeLookup for EnumModelRegistry {
    fn find_enum_type(&self, qualified_name: &str) -> Option<&EnumType> {
        self.enum_types.get(qualified_name)
    }
}
