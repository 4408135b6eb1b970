use std::ffi::OsString;
use std::fs;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::document::Document;
use crate::store::error::{Result, StoreError};

/// The document's home on disk. Every save rewrites the whole file.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read, parse and validate the stored document.
    pub fn load(&self) -> Result<Document> {
        let f = fs::File::open(&self.path).map_err(|e| self.storage_error(e))?;
        let doc: Document = serde_json::from_reader(BufReader::new(f)).map_err(|e| {
            if e.is_io() {
                self.storage_error(e.into())
            } else {
                StoreError::CorruptDocument {
                    path: self.path.clone(),
                    source: e,
                }
            }
        })?;

        doc.validate().map_err(|e| StoreError::InvalidDocument {
            path: self.path.clone(),
            source: e,
        })?;

        tracing::debug!(
            "Loaded {} users from {}",
            doc.users.len(),
            self.path.display()
        );
        Ok(doc)
    }

    /// Write `doc` next to the target, sync it, then rename it into place.
    pub fn save(&self, doc: &Document) -> Result<()> {
        let temp_path = self.temp_path();
        if let Err(e) = self.write_then_rename(doc, &temp_path) {
            let _ = fs::remove_file(&temp_path);
            return Err(self.storage_error(e));
        }
        tracing::debug!(
            "Saved {} users to {}",
            doc.users.len(),
            self.path.display()
        );
        Ok(())
    }

    fn write_then_rename(&self, doc: &Document, temp_path: &Path) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut f = fs::File::create(temp_path)?;
        serde_json::to_writer_pretty(&mut f, doc)?;
        f.write_all(b"\n")?;
        f.sync_all()?;

        fs::rename(temp_path, &self.path)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("document"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn storage_error(&self, source: io::Error) -> StoreError {
        StoreError::Storage {
            path: self.path.clone(),
            source,
        }
    }
}
