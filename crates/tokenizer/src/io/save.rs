//! Save functionality for trained tokenizers.

use super::format::{SerializedModel, MODEL_FILE};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use varna_core::{Model, Result, TokenizerError};

/// Resolve where a model lives: an explicit `.json` path is used as is,
/// anything else is treated as a directory holding `tokenizer.json`.
pub fn model_file(path: &Path) -> PathBuf {
    if path.extension().is_some_and(|ext| ext == "json") {
        path.to_path_buf()
    } else {
        path.join(MODEL_FILE)
    }
}

/// Tokenizer saver - handles saving trained models.
pub struct TokenizerSaver<'a> {
    /// Model reference
    model: &'a Model,
}

impl<'a> TokenizerSaver<'a> {
    /// Create a new tokenizer saver.
    pub fn new(model: &'a Model) -> Self {
        Self { model }
    }

    /// Save the model as pretty-printed JSON.
    ///
    /// `path` is either a `.json` file or a directory (created if needed)
    /// that receives `tokenizer.json`. Returns the file written.
    pub fn save(&self, path: &Path) -> Result<PathBuf> {
        let file_path = model_file(path);
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| TokenizerError::io(parent, e))?;
        }

        let file = File::create(&file_path).map_err(|e| TokenizerError::io(&file_path, e))?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer)?;
        writer
            .flush()
            .map_err(|e| TokenizerError::io(&file_path, e))?;

        info!(
            path = %file_path.display(),
            tokens = self.model.len(),
            merges = self.model.merges().len(),
            "Saved tokenizer"
        );
        Ok(file_path)
    }

    /// Write the model as pretty-printed JSON to any writer.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, &self.serialize())?;
        Ok(())
    }

    /// Serialize the model to a structure.
    pub fn serialize(&self) -> SerializedModel {
        SerializedModel::from(self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> Model {
        let mut model = Model::new(300).unwrap();
        model.add_merge((b'a' as u32, b'b' as u32)).unwrap();
        model
    }

    #[test]
    fn test_model_file() {
        assert_eq!(
            model_file(Path::new("models/hindi")),
            Path::new("models/hindi/tokenizer.json")
        );
        assert_eq!(
            model_file(Path::new("models/hindi.json")),
            Path::new("models/hindi.json")
        );
    }

    #[test]
    fn test_serialize() {
        let model = model();
        let serialized = TokenizerSaver::new(&model).serialize();

        assert_eq!(serialized.vocab.len(), 257);
        assert_eq!(serialized.merges.len(), 1);
        assert_eq!(serialized.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_save_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("model");

        let written = TokenizerSaver::new(&model()).save(&target).unwrap();
        assert_eq!(written, target.join(MODEL_FILE));
        assert!(written.is_file());
    }
}
