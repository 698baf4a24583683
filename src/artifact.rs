//! Artifacts: locally selected binary content handed to an operation.
//!
//! An [`Artifact`] is immutable once built. Its content is held in a
//! [`Bytes`] buffer so attaching it to a request is a reference-count bump
//! rather than a copy, and the caller keeps ownership for the duration of
//! the operation.

use crate::error::EdudocError;
use bytes::Bytes;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::path::{Path, PathBuf};
use tracing::debug;

const LOAD_CONCURRENCY: usize = 4;

/// A named blob of bytes selected by the user.
#[derive(Clone, PartialEq, Eq)]
pub struct Artifact {
    name: String,
    content: Bytes,
}

impl std::fmt::Debug for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifact")
            .field("name", &self.name)
            .field("len", &self.content.len())
            .finish()
    }
}

impl Artifact {
    /// Wrap in-memory content under the given file name.
    pub fn from_bytes(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Read a local file into an artifact named after the file.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, EdudocError> {
        let path = path.as_ref();
        let content = tokio::fs::read(path)
            .await
            .map_err(|e| read_error(path.to_path_buf(), e))?;

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document")
            .to_string();

        debug!("Loaded artifact '{}' ({} bytes)", name, content.len());
        Ok(Self::from_bytes(name, content))
    }

    /// Read several files concurrently, keeping the given order.
    ///
    /// Fails on the first unreadable path.
    pub async fn from_paths<P: AsRef<Path>>(
        paths: impl IntoIterator<Item = P>,
    ) -> Result<Vec<Self>, EdudocError> {
        let paths: Vec<PathBuf> = paths.into_iter().map(|p| p.as_ref().to_path_buf()).collect();
        stream::iter(paths)
            .map(Self::from_path)
            .buffered(LOAD_CONCURRENCY)
            .try_collect()
            .await
    }

    /// Original file name, as sent in the multipart `filename` parameter.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Byte length of the content.
    pub fn len(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// MIME type guessed from the file extension.
    pub fn mime_type(&self) -> String {
        mime_guess::from_path(&self.name)
            .first_or_octet_stream()
            .to_string()
    }
}

fn read_error(path: PathBuf, e: std::io::Error) -> EdudocError {
    match e.kind() {
        std::io::ErrorKind::NotFound => EdudocError::FileNotFound { path },
        std::io::ErrorKind::PermissionDenied => EdudocError::PermissionDenied { path },
        _ => EdudocError::ReadFailed { path, source: e },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn mime_from_extension() {
        let pdf = Artifact::from_bytes("aula.pdf", vec![0u8; 4]);
        assert_eq!(pdf.mime_type(), "application/pdf");
        let deck = Artifact::from_bytes("aula.pptx", vec![0u8; 4]);
        assert_eq!(
            deck.mime_type(),
            "application/vnd.openxmlformats-officedocument.presentationml.presentation"
        );
        let unknown = Artifact::from_bytes("blob", vec![0u8; 4]);
        assert_eq!(unknown.mime_type(), "application/octet-stream");
    }

    #[test]
    fn debug_hides_content() {
        let a = Artifact::from_bytes("x.pdf", vec![7u8; 3]);
        let dbg = format!("{a:?}");
        assert!(dbg.contains("len: 3"), "got: {dbg}");
    }

    #[tokio::test]
    async fn from_path_reads_name_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notas.pdf");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"%PDF-1.7 body")
            .unwrap();

        let a = Artifact::from_path(&path).await.unwrap();
        assert_eq!(a.name(), "notas.pdf");
        assert_eq!(a.len(), 13);
        assert_eq!(&a.content()[..4], b"%PDF");
    }

    #[tokio::test]
    async fn from_path_missing_file() {
        let err = Artifact::from_path("/definitely/not/here.pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, EdudocError::FileNotFound { .. }), "got: {err:?}");
    }

    #[tokio::test]
    async fn from_paths_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let names = ["c.pdf", "a.pdf", "b.pdf"];
        for (i, n) in names.iter().enumerate() {
            std::fs::write(dir.path().join(n), vec![b'x'; i + 1]).unwrap();
        }
        let loaded = Artifact::from_paths(names.iter().map(|n| dir.path().join(n)))
            .await
            .unwrap();
        let got: Vec<(&str, u64)> = loaded.iter().map(|a| (a.name(), a.len())).collect();
        assert_eq!(got, vec![("c.pdf", 1), ("a.pdf", 2), ("b.pdf", 3)]);
    }
}
