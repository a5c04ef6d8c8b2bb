use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const COOKIE_FILE: &str = ".cdn_cookies";

/// On-disk slot for the CDN session cookie string, so a configured session
/// survives restarts. Saving an empty string clears the slot.
#[derive(Debug, Clone)]
pub struct CookieStore {
    path: PathBuf,
}

impl CookieStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(COOKIE_FILE),
        }
    }

    pub fn load(&self) -> Option<String> {
        if !self.path.exists() {
            return None;
        }
        let content = fs::read_to_string(&self.path).ok()?;
        let trimmed = content.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    pub fn save(&self, cookies: &str) -> io::Result<()> {
        let trimmed = cookies.trim();
        if trimmed.is_empty() {
            self.clear()
        } else {
            fs::write(&self.path, trimmed)
        }
    }

    pub fn clear(&self) -> io::Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = CookieStore::new(dir.path());

        store.save("sessionid=abc; csrf=def").unwrap();
        assert_eq!(store.load().as_deref(), Some("sessionid=abc; csrf=def"));
    }

    #[test]
    fn empty_save_clears_the_slot() {
        let dir = tempfile::tempdir().unwrap();
        let store = CookieStore::new(dir.path());

        store.save("sessionid=abc").unwrap();
        store.save("   ").unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn missing_file_loads_as_none_and_clears_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let store = CookieStore::new(dir.path());

        assert_eq!(store.load(), None);
        store.clear().unwrap();
    }
}
