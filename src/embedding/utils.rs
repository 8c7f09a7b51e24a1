use std::io;
use std::path::Path;
use tokenizers::{Tokenizer, TruncationParams};

/// Resolves `tokenizer.json` from a model directory or an explicit tokenizer path.
pub fn tokenizer_path(model_path: &Path) -> io::Result<std::path::PathBuf> {
    if model_path
        .file_name()
        .is_some_and(|name| name == std::ffi::OsStr::new("tokenizer.json"))
    {
        Ok(model_path.to_path_buf())
    } else if model_path.is_dir() {
        Ok(model_path.join("tokenizer.json"))
    } else {
        Ok(model_path
            .parent()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Model path has no parent"))?
            .join("tokenizer.json"))
    }
}

/// Loads a tokenizer with truncation at `max_len` tokens.
///
/// Competency statements and profile sections are short, but free text pasted by a user
/// is not; the encoder's position embeddings cap what it can see anyway.
pub fn load_tokenizer(model_path: &Path, max_len: usize) -> io::Result<Tokenizer> {
    let path = tokenizer_path(model_path)?;
    let mut tokenizer = Tokenizer::from_file(&path).map_err(io::Error::other)?;

    let truncation = TruncationParams {
        max_length: max_len,
        ..Default::default()
    };

    tokenizer
        .with_truncation(Some(truncation))
        .map_err(|e| io::Error::other(format!("Failed to configure truncation: {}", e)))?;

    Ok(tokenizer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_tokenizer_path_explicit_file() {
        let path = Path::new("/models/minilm/tokenizer.json");
        assert_eq!(tokenizer_path(path).unwrap(), path);
    }

    #[test]
    fn test_tokenizer_path_from_directory() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            tokenizer_path(dir.path()).unwrap(),
            dir.path().join("tokenizer.json")
        );
    }

    #[test]
    fn test_tokenizer_path_sibling_of_weights() {
        let path = Path::new("/models/minilm/model.safetensors");
        assert_eq!(
            tokenizer_path(path).unwrap(),
            Path::new("/models/minilm/tokenizer.json")
        );
    }

    #[test]
    fn test_load_tokenizer_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(load_tokenizer(dir.path(), 128).is_err());
    }
}
