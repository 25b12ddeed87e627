//! Durable backing for the submission store.
//!
//! The store keeps the whole list in memory and hands the serialized form to a
//! [`Storage`] after every mutation. A storage only moves opaque text around;
//! decoding and the malformed-data policy belong to the store.

use std::cell::RefCell;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Name of the single persisted entry holding the submission list.
pub const STORE_ENTRY: &str = "testSubmissions";

/// A single named durable entry.
pub trait Storage {
    /// Read the entry. Returns `Ok(None)` when it has never been written.
    fn read(&self) -> io::Result<Option<String>>;

    /// Replace the entry with `contents`.
    fn write(&self, contents: &str) -> io::Result<()>;

    /// Human-readable location used in logs and errors.
    fn location(&self) -> String;
}

/// A JSON file on disk, replaced atomically on each write.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<dir>/testSubmissions.json`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(format!("{STORE_ENTRY}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for JsonFileStorage {
    fn read(&self) -> io::Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, contents: &str) -> io::Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)?;

        // Write next to the target so the rename stays on one filesystem.
        let mut tmp = tempfile::NamedTempFile::new_in(&parent)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// An in-process entry, for tests and benchmarks.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: RefCell<Option<String>>,
    writes: RefCell<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with pre-existing contents.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            slot: RefCell::new(Some(contents.into())),
            writes: RefCell::new(0),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    /// Number of writes performed so far.
    pub fn write_count(&self) -> usize {
        *self.writes.borrow()
    }
}

impl Storage for MemoryStorage {
    fn read(&self) -> io::Result<Option<String>> {
        Ok(self.slot.borrow().clone())
    }

    fn write(&self, contents: &str) -> io::Result<()> {
        *self.slot.borrow_mut() = Some(contents.to_string());
        *self.writes.borrow_mut() += 1;
        Ok(())
    }

    fn location(&self) -> String {
        format!("memory:{STORE_ENTRY}")
    }
}
