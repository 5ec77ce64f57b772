//! Load functionality for pre-trained tokenizers.
//!
//! Every load goes through `Model::from_parts`, so a file that breaks any
//! token table or merge rule invariant is rejected with `MalformedModel`.

use super::format::SerializedModel;
use super::save::model_file;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{info, warn};
use varna_core::{MergeRule, Model, Result, TokenizerError, HINDI_PATTERN};

/// Tokenizer loader - handles loading trained models.
pub struct TokenizerLoader;

impl TokenizerLoader {
    /// Load a model from a `.json` file or a directory holding `tokenizer.json`.
    pub fn load(path: &Path) -> Result<Model> {
        let file_path = model_file(path);
        let file = File::open(&file_path).map_err(|e| TokenizerError::io(&file_path, e))?;
        let model = Self::from_reader(BufReader::new(file))?;

        info!(
            path = %file_path.display(),
            tokens = model.len(),
            merges = model.merges().len(),
            "Loaded tokenizer"
        );
        Ok(model)
    }

    /// Read and validate a model from any JSON source.
    pub fn from_reader<R: Read>(reader: R) -> Result<Model> {
        let serialized: SerializedModel = serde_json::from_reader(reader)?;
        Self::deserialize(serialized)
    }

    /// Validate a serialized structure into a model.
    pub fn deserialize(data: SerializedModel) -> Result<Model> {
        if data.pattern != HINDI_PATTERN {
            warn!(
                pattern = %data.pattern,
                "Model was trained with a different pre-segmentation pattern"
            );
        }

        Model::from_parts(
            data.vocab_size,
            data.vocab.into_iter().map(|token| (token.id, token.bytes)),
            data.merges.into_iter().map(MergeRule::from),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::format::{SerializedMerge, SerializedToken};
    use crate::io::save::TokenizerSaver;

    fn trained() -> Model {
        let mut model = Model::new(300).unwrap();
        model.add_merge((0xE0, 0xA4)).unwrap();
        model.add_merge((256, 0x95)).unwrap();
        model
    }

    fn serialized() -> SerializedModel {
        TokenizerSaver::new(&trained()).serialize()
    }

    fn malformed(data: SerializedModel) -> String {
        match TokenizerLoader::deserialize(data) {
            Err(TokenizerError::MalformedModel(msg)) => msg,
            other => panic!("expected MalformedModel, got {other:?}"),
        }
    }

    #[test]
    fn test_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let model = trained();

        TokenizerSaver::new(&model).save(dir.path()).unwrap();
        let loaded = TokenizerLoader::load(dir.path()).unwrap();
        assert_eq!(loaded, model);

        let file = dir.path().join("hindi.json");
        TokenizerSaver::new(&model).save(&file).unwrap();
        assert_eq!(TokenizerLoader::load(&file).unwrap(), model);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = TokenizerLoader::load(dir.path()).unwrap_err();
        assert!(matches!(err, TokenizerError::Io { .. }));
    }

    #[test]
    fn test_load_invalid_json() {
        let err = TokenizerLoader::from_reader("{ not json".as_bytes()).unwrap_err();
        assert!(matches!(err, TokenizerError::Json(_)));
    }

    #[test]
    fn test_duplicate_id() {
        let mut data = serialized();
        data.vocab.push(SerializedToken {
            id: 5,
            bytes: vec![5],
        });
        assert!(malformed(data).contains("duplicate token id"));
    }

    #[test]
    fn test_missing_byte_token() {
        let mut data = serialized();
        data.vocab.retain(|t| t.id != 7);
        malformed(data);
    }

    #[test]
    fn test_wrong_byte_token() {
        let mut data = serialized();
        data.vocab[65].bytes = vec![66];
        assert!(malformed(data).contains("byte token 65"));
    }

    #[test]
    fn test_dangling_reference() {
        let mut data = serialized();
        data.merges[1].pair = [999, 0x95];
        assert!(malformed(data).contains("unknown token 999"));
    }

    #[test]
    fn test_result_not_in_rank_order() {
        let mut data = serialized();
        data.merges[0].result = 300;
        assert!(malformed(data).contains("expected 256"));
    }

    #[test]
    fn test_rank_gap() {
        let mut data = serialized();
        data.merges[1].rank = 5;
        assert!(malformed(data).contains("rank 5"));
    }

    #[test]
    fn test_surface_mismatch() {
        let mut data = serialized();
        data.vocab[257].bytes = vec![0xE0, 0xA4, 0x96];
        assert!(malformed(data).contains("surface does not match"));
    }

    #[test]
    fn test_duplicate_pair() {
        let mut data = serialized();
        data.merges.push(SerializedMerge {
            pair: [0xE0, 0xA4],
            result: 258,
            rank: 2,
        });
        data.vocab.push(SerializedToken {
            id: 258,
            bytes: vec![0xE0, 0xA4],
        });
        assert!(malformed(data).contains("duplicate merge rule"));
    }

    #[test]
    fn test_extra_tokens() {
        let mut data = serialized();
        data.vocab.push(SerializedToken {
            id: 258,
            bytes: b"zz".to_vec(),
        });
        malformed(data);
    }

    #[test]
    fn test_vocab_size_too_small() {
        let mut data = serialized();
        data.vocab_size = 200;
        malformed(data);
    }
}
