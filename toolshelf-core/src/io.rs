//! Idempotent file writes for generated artifacts

use std::path::Path;
use tracing::{debug, info};

use crate::error::{Result, ToolshelfError};

/// Write `content` to `path` unless the file already holds exactly those bytes
///
/// Parent directories are created as needed. Returns `true` when the file
/// was written.
pub fn write_if_changed(path: &Path, content: &[u8]) -> Result<bool> {
    match std::fs::read(path) {
        Ok(existing) if existing == content => {
            debug!("Unchanged: {}", path.display());
            return Ok(false);
        }
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(ToolshelfError::io(path, e)),
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ToolshelfError::io(parent, e))?;
    }
    std::fs::write(path, content).map_err(|e| ToolshelfError::io(path, e))?;

    info!("Wrote {} ({} bytes)", path.display(), content.len());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writes_once_for_identical_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("out.txt");

        assert!(write_if_changed(&path, b"hello").unwrap());
        assert!(!write_if_changed(&path, b"hello").unwrap());
        assert!(write_if_changed(&path, b"hello, world").unwrap());
        assert_eq!(std::fs::read(&path).unwrap(), b"hello, world");
    }
}
