//! JSON reader for source model objects.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, instrument};

use crate::IoError;
use crate::rexp::Rexp;

/// Reads a [`Rexp`] tree from its JSON rendition.
///
/// Expected layout: every object may carry `strings`, `integers`, `reals`,
/// `booleans` and `list` arrays plus an `attributes` array of
/// `{"name": ..., "value": {...}}` entries. Absent arrays are empty.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::JsonParse`] | Content is not a valid source object |
pub struct RexpReader {
    path: PathBuf,
}

impl RexpReader {
    /// Create a new reader for the given file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read and parse the file.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Rexp, IoError> {
        let file = File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        let start = Instant::now();
        let rexp: Rexp =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| IoError::JsonParse {
                path: self.path.clone(),
                line: e.line(),
                column: e.column(),
                source: e,
            })?;

        info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            "source model parsed"
        );
        Ok(rexp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_json(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn read_valid_object() {
        let f = write_json(
            r#"{"list": [{"strings": ["regression"]}],
                "attributes": [
                    {"name": "names", "value": {"strings": ["type"]}},
                    {"name": "class", "value": {"strings": ["randomForest"]}}
                ]}"#,
        );
        let rexp = RexpReader::new(f.path()).read().unwrap();
        assert!(rexp.inherits("randomForest"));
        assert_eq!(
            rexp.field("type").unwrap().string_value(0).unwrap(),
            "regression"
        );
    }

    #[test]
    fn missing_file_error() {
        let err = RexpReader::new(Path::new("/tmp/nonexistent_rexp_abc123.json"))
            .read()
            .unwrap_err();
        assert!(matches!(err, IoError::FileNotFound { .. }));
    }

    #[test]
    fn malformed_json_error() {
        let f = write_json("{\"reals\": [1.0,");
        let err = RexpReader::new(f.path()).read().unwrap_err();
        assert!(matches!(err, IoError::JsonParse { line: 1, .. }));
    }

    #[test]
    fn wrong_value_type_error() {
        let f = write_json(r#"{"integers": [1.5]}"#);
        let err = RexpReader::new(f.path()).read().unwrap_err();
        assert!(matches!(err, IoError::JsonParse { .. }));
    }
}
