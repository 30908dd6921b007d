//! JSON export backend.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use log::{debug, error, info};

use mindmap_core::document::Document;

use crate::export::{self, Exporter};

/// Renders `document` as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`export::Error::Render`] if serialization fails.
pub fn to_string(document: &Document) -> Result<String, export::Error> {
    serde_json::to_string_pretty(document).map_err(|err| export::Error::Render(err.to_string()))
}

/// Writes canonical documents to a JSON file.
pub struct Json {
    path: PathBuf,
}

impl Json {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Exporter for Json {
    fn export_document(&mut self, document: &Document) -> Result<(), export::Error> {
        let content = to_string(document)?;
        debug!(bytes = content.len(); "JSON document rendered");

        info!(path:? = self.path; "Creating JSON file");
        let file = File::create(&self.path).map_err(|err| {
            error!(path:? = self.path, err:err; "Failed to create JSON file");
            export::Error::Io(err)
        })?;

        let mut writer = BufWriter::new(file);
        writer
            .write_all(content.as_bytes())
            .and_then(|()| writer.write_all(b"\n"))
            .and_then(|()| writer.flush())
            .map_err(|err| {
                error!(path:? = self.path, err:err; "Failed to write JSON content");
                export::Error::Io(err)
            })
    }
}
