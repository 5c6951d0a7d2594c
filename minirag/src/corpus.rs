//! Reading and writing [`Corpus`] files.
//!
//! A corpus file is a JSON array of `{ "id", "content", "embedding" }`
//! objects. Loading always validates the decoded records, so a corpus that
//! decodes but mixes dimensionalities is still reported as a load failure.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::error::{MiniRagError, Result};
use crate::record::Corpus;

impl Corpus {
    /// Decode and validate a corpus from a reader.
    ///
    /// # Errors
    ///
    /// Returns [`MiniRagError::LoadError`] if the input is not a JSON array of
    /// records or fails [`Corpus::validate`].
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let corpus: Corpus = serde_json::from_reader(reader)
            .map_err(|e| MiniRagError::LoadError(format!("malformed corpus: {e}")))?;
        corpus.validate()?;
        Ok(corpus)
    }

    /// Decode and validate a corpus from a JSON string.
    ///
    /// # Errors
    ///
    /// Same as [`Corpus::from_reader`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_reader(json.as_bytes())
    }

    /// Load a corpus file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`MiniRagError::LoadError`] if the file cannot be opened or
    /// its contents are not a valid corpus. The message names the path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            MiniRagError::LoadError(format!("cannot read '{}': {e}", path.display()))
        })?;

        let corpus = Self::from_reader(BufReader::new(file)).map_err(|e| match e {
            MiniRagError::LoadError(msg) => {
                MiniRagError::LoadError(format!("'{}': {msg}", path.display()))
            }
            other => other,
        })?;

        info!(
            path = %path.display(),
            records = corpus.len(),
            dimensions = ?corpus.dimensions(),
            "loaded corpus"
        );
        Ok(corpus)
    }

    /// Write the corpus as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`MiniRagError::Io`] if writing fails.
    pub fn to_writer(&self, writer: impl Write) -> Result<()> {
        let mut writer = BufWriter::new(writer);
        serde_json::to_writer_pretty(&mut writer, self).map_err(std::io::Error::from)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Save the corpus to `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`MiniRagError::Io`] if the directory or file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        debug!(path = %path.display(), records = self.len(), "saving corpus");
        self.to_writer(File::create(path)?)?;
        info!(path = %path.display(), records = self.len(), "saved corpus");
        Ok(())
    }
}
