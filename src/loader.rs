//! Model directory loader.
//!
//! Reads persisted enum type and enum content documents from a directory
//! tree into a fresh registry. References are loaded exactly as persisted;
//! reconciliation against the current type schema stays an explicit call,
//! so drift introduced on disk is still visible to validation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::model::EnumModelRegistry;
use crate::xml::{read_enum_content, read_enum_type};

/// File suffix of persisted enum type documents.
pub const ENUM_TYPE_SUFFIX: &str = ".enumtype.xml";
/// File suffix of persisted enum content documents.
pub const ENUM_CONTENT_SUFFIX: &str = ".enumcontent.xml";

pub struct ModelLoader {
    model_dir: String,
}

impl ModelLoader {
    pub fn new(model_dir: impl Into<String>) -> Self {
        Self {
            model_dir: model_dir.into(),
        }
    }

    /// Create loader from ENUM_MODEL_DIR env var or default to "model"
    ///
    /// Path resolution order:
    /// 1. ENUM_MODEL_DIR environment variable (explicit override)
    /// 2. Relative "model" path (works when running from workspace root)
    /// 3. CARGO_MANIFEST_DIR/model (works if the model sits in the crate directory)
    pub fn from_env() -> Self {
        if let Ok(dir) = std::env::var("ENUM_MODEL_DIR") {
            return Self::new(dir);
        }

        if Path::new("model").is_dir() {
            return Self::new("model");
        }

        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let model_path = format!("{}/model", manifest_dir);
            if Path::new(&model_path).is_dir() {
                return Self::new(model_path);
            }
        }

        // Last resort - return "model" and let load() fail with a clear error
        Self::new("model")
    }

    pub fn model_dir(&self) -> &str {
        &self.model_dir
    }

    /// Load every persisted document under the model directory.
    ///
    /// Types are registered before contents so contents can resolve their
    /// type within the same load. Duplicate qualified names are a load
    /// error; xml files matching neither suffix are skipped with a warning.
    pub fn load(&self) -> Result<EnumModelRegistry> {
        let dir = Path::new(&self.model_dir);
        info!("Loading enum model from {}", dir.display());

        let mut type_files = Vec::new();
        let mut content_files = Vec::new();
        for path in find_xml_files(dir)? {
            if has_suffix(&path, ENUM_TYPE_SUFFIX) {
                type_files.push(path);
            } else if has_suffix(&path, ENUM_CONTENT_SUFFIX) {
                content_files.push(path);
            } else {
                warn!("Skipping unrecognized file {}", path.display());
            }
        }

        let mut registry = EnumModelRegistry::new();

        for path in &type_files {
            let document = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let enum_type = read_enum_type(&document)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            registry
                .register_enum_type(enum_type)
                .with_context(|| format!("Failed to register {}", path.display()))?;
        }

        for path in &content_files {
            let document = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let content = read_enum_content(&document)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            registry
                .register_enum_content(content)
                .with_context(|| format!("Failed to register {}", path.display()))?;
        }

        info!(
            "Loaded {} enum types and {} enum contents",
            registry.enum_types_count(),
            registry.enum_contents_count()
        );

        Ok(registry)
    }
}

/// Recursively find all .xml files in a directory
fn find_xml_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            files.extend(find_xml_files(&path)?);
        } else if path.extension().map(|e| e == "xml").unwrap_or(false) {
            files.push(path);
        }
    }

    // Sort for deterministic loading order
    files.sort();
    Ok(files)
}

fn has_suffix(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.ends_with(suffix))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatype::ValueDatatype;
    use crate::model::{
        EnumAttribute, EnumAttributeReference, EnumContent, EnumType, EnumValue, TypeLookup,
    };
    use crate::xml::{write_enum_content, write_enum_type};

    fn seed_model_dir(dir: &Path) {
        let mut color = EnumType::new("model.Color");
        color.extensible = true;
        color.enum_content_name = Some("content.Colors".into());
        color.add_attribute(
            EnumAttribute::new("LITERAL_NAME", ValueDatatype::String).with_literal_name(),
        );
        color.add_attribute(EnumAttribute::new("id", ValueDatatype::Integer).with_unique());

        let mut colors = EnumContent::new("content.Colors");
        colors.set_enum_type_name("model.Color");
        colors.add_enum_attribute_reference(EnumAttributeReference::new("id"));
        colors.add_enum_value(EnumValue::from_values(vec![Some("1".into())]));

        let nested = dir.join("model");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(
            nested.join("Color.enumtype.xml"),
            write_enum_type(&color).unwrap(),
        )
        .unwrap();
        std::fs::write(
            dir.join("Colors.enumcontent.xml"),
            write_enum_content(&colors).unwrap(),
        )
        .unwrap();
    }

    #[test]
    fn loads_types_and_contents_recursively() {
        let dir = tempfile::tempdir().unwrap();
        seed_model_dir(dir.path());

        let registry = ModelLoader::new(dir.path().to_string_lossy()).load().unwrap();
        assert_eq!(registry.enum_types_count(), 1);
        assert_eq!(registry.enum_contents_count(), 1);
        assert!(registry.find_enum_type("model.Color").is_some());

        let colors = registry.find_enum_content("content.Colors").unwrap();
        assert_eq!(colors.enum_type_name(), Some("model.Color"));
        assert_eq!(colors.enum_values_count(), 1);
    }

    #[test]
    fn duplicate_qualified_name_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let t = EnumType::new("model.Twice");
        std::fs::write(
            dir.path().join("a.enumtype.xml"),
            write_enum_type(&t).unwrap(),
        )
        .unwrap();
        std::fs::write(
            dir.path().join("b.enumtype.xml"),
            write_enum_type(&t).unwrap(),
        )
        .unwrap();

        let err = ModelLoader::new(dir.path().to_string_lossy())
            .load()
            .unwrap_err();
        assert!(err.to_string().contains("Failed to register"));
    }

    #[test]
    fn unrecognized_xml_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        seed_model_dir(dir.path());
        std::fs::write(dir.path().join("notes.xml"), "<Notes/>").unwrap();

        let registry = ModelLoader::new(dir.path().to_string_lossy()).load().unwrap();
        assert_eq!(registry.enum_types_count(), 1);
        assert_eq!(registry.enum_contents_count(), 1);
    }

    #[test]
    fn broken_document_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.enumtype.xml"), "<EnumType/>").unwrap();

        let err = ModelLoader::new(dir.path().to_string_lossy())
            .load()
            .unwrap_err();
        let text = format!("{:#}", err);
        assert!(text.contains("bad.enumtype.xml"));
        assert!(text.contains("qualifiedName"));
    }

    #[test]
    fn env_override_wins() {
        std::env::set_var("ENUM_MODEL_DIR", "/tmp/enum-model-override");
        let loader = ModelLoader::from_env();
        std::env::remove_var("ENUM_MODEL_DIR");
        assert_eq!(loader.model_dir(), "/tmp/enum-model-override");
    }
}
