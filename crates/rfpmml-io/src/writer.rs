//! JSON writer for converted documents.

use std::fs;
use std::path::{Path, PathBuf};

use rfpmml_pmml::Pmml;
use tracing::{debug, info, instrument};

use crate::IoError;

/// Write `pmml` as pretty-printed JSON to `path`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::Serialize`] | the document cannot be rendered |
/// | [`IoError::WriteFile`] | the file cannot be written |
#[instrument(skip(pmml), fields(path = %path.display()))]
pub fn write_document(path: &Path, pmml: &Pmml) -> Result<(), IoError> {
    let json = serde_json::to_string_pretty(pmml).map_err(|e| IoError::Serialize {
        path: path.to_path_buf(),
        source: e,
    })?;
    fs::write(path, &json).map_err(|e| IoError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!(size_bytes = json.len(), "document written");
    Ok(())
}

/// Writes converted documents into one output directory.
///
/// Creates the directory on construction if it does not exist. A document
/// for model `stem` is written to `{stem}.pmml.json`.
pub struct DocumentWriter {
    output_dir: PathBuf,
}

impl DocumentWriter {
    /// Create a writer targeting `output_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display()))]
    pub fn new(output_dir: &Path) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    /// Return the destination path for model `stem`.
    #[must_use]
    pub fn path_for(&self, stem: &str) -> PathBuf {
        self.output_dir.join(format!("{stem}.pmml.json"))
    }

    /// Write the document for model `stem`, returning its path.
    ///
    /// # Errors
    ///
    /// See [`write_document`].
    pub fn write(&self, stem: &str, pmml: &Pmml) -> Result<PathBuf, IoError> {
        let path = self.path_for(stem);
        write_document(&path, pmml)?;
        Ok(path)
    }
}
