use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

/// Reads a batch of text assets, returned in request order.
///
/// All-or-nothing: the first unreadable file fails the whole batch with
/// the offending path in the error. There is no partial fallback and no
/// retry; a failed startup batch is terminal.
pub fn load_all(paths: &[PathBuf]) -> Result<Vec<String>> {
    paths
        .iter()
        .map(|path| {
            info!("loading asset {}", path.display());
            load_text(path)
        })
        .collect()
}

fn load_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read asset {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn batch_preserves_request_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.vert");
        let second = dir.path().join("b.frag");
        fs::write(&first, "vertex").unwrap();
        fs::write(&second, "fragment").unwrap();

        let loaded = load_all(&[second.clone(), first.clone()]).unwrap();
        assert_eq!(loaded, vec!["fragment".to_string(), "vertex".to_string()]);
    }

    #[test]
    fn one_missing_file_fails_the_whole_batch() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("ok.obj");
        fs::write(&present, "v 0 0 0").unwrap();
        let missing = dir.path().join("nope.obj");

        let result = load_all(&[present, missing.clone()]);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("nope.obj"));
    }
}
