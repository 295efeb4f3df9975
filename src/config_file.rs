//! Scoped intermediate configuration file.

use std::io;
use std::path::{Path, PathBuf};

/// A configuration file that exists only while this value is alive.
///
/// Creating it removes whatever was at the path before; dropping it removes
/// the file again. Removal failures are ignored, the file may already be gone.
#[derive(Debug)]
pub struct ScopedConfigFile {
    path: PathBuf,
}

impl ScopedConfigFile {
    pub fn create(path: &Path, contents: &str) -> io::Result<ScopedConfigFile> {
        remove_quietly(path);
        // Own the path before writing so a partial write is cleaned up too.
        let file = ScopedConfigFile {
            path: path.to_path_buf(),
        };
        std::fs::write(&file.path, contents)?;
        log::debug!("wrote configuration file {}", file.path.display());
        Ok(file)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScopedConfigFile {
    fn drop(&mut self) {
        remove_quietly(&self.path);
    }
}

/// Remove whatever is at `path`, logging instead of failing.
pub fn remove_quietly(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => log::debug!("removed configuration file {}", path.display()),
        Err(e) => log::debug!("not removing {}: {e}", path.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("{name}-{}.xml", std::process::id()))
    }

    #[test]
    fn test_file_removed_on_drop() {
        let path = temp_path("scoped-drop");
        {
            let file = ScopedConfigFile::create(&path, "<a/>").expect("Error creating file");
            assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "<a/>");
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_existing_file_replaced() {
        let path = temp_path("scoped-replace");
        std::fs::write(&path, "stale content that is longer").unwrap();
        let file = ScopedConfigFile::create(&path, "<new/>").expect("Error creating file");
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "<new/>");
        drop(file);
        assert!(!path.exists());
    }

    #[test]
    fn test_remove_quietly_missing_file() {
        let path = temp_path("scoped-missing");
        remove_quietly(&path);
        std::fs::write(&path, "<old/>").unwrap();
        remove_quietly(&path);
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_directory_fails() {
        let path = std::env::temp_dir()
            .join(format!("no-such-dir-{}", std::process::id()))
            .join("netcfg.xml");
        assert!(ScopedConfigFile::create(&path, "<a/>").is_err());
    }
}
