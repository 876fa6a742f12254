//! Artifact collection from the incoming item sequence.

use std::path::{Path, PathBuf};

use bytes::Bytes;

use lambda_push_core::Artifact;

use crate::error::SyncError;

/// One file-like item flowing through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineItem {
    /// An item with no contents (a directory, a placeholder).
    Empty { path: PathBuf },
    /// Contents fully in memory.
    Buffered(Artifact),
    /// Contents only available as a stream.
    Streamed { path: PathBuf },
}

impl PipelineItem {
    pub fn buffered(path: impl Into<PathBuf>, contents: impl Into<Bytes>) -> Self {
        PipelineItem::Buffered(Artifact::new(path, contents))
    }

    pub fn path(&self) -> &Path {
        match self {
            PipelineItem::Empty { path } | PipelineItem::Streamed { path } => path,
            PipelineItem::Buffered(artifact) => artifact.path(),
        }
    }
}

/// Keeps the first buffered item; rejects streams.
#[derive(Debug, Default)]
pub struct ArtifactCollector {
    artifact: Option<Artifact>,
}

impl ArtifactCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one item.
    ///
    /// Returns [`SyncError::StreamingUnsupported`] for a streamed item; the
    /// caller must stop feeding items after an error.
    pub fn accept(&mut self, item: PipelineItem) -> Result<(), SyncError> {
        match item {
            PipelineItem::Empty { path } => {
                tracing::debug!("skipping empty item {}", path.display());
            }
            PipelineItem::Streamed { path } => {
                return Err(SyncError::StreamingUnsupported { path });
            }
            PipelineItem::Buffered(artifact) => {
                if let Some(kept) = &self.artifact {
                    tracing::debug!(
                        "ignoring {}; already holding {}",
                        artifact.path().display(),
                        kept.path().display()
                    );
                } else {
                    tracing::debug!(
                        "accepted {} ({} bytes)",
                        artifact.path().display(),
                        artifact.len()
                    );
                    self.artifact = Some(artifact);
                }
            }
        }
        Ok(())
    }

    /// True once a buffered item has been kept. Later buffered items are
    /// ignored, so callers may skip loading them.
    pub fn has_artifact(&self) -> bool {
        self.artifact.is_some()
    }

    /// End of input: hand over the retained artifact, if any.
    pub fn finish(self) -> Option<Artifact> {
        self.artifact
    }

    /// Feed every item, stopping at the first error.
    pub fn collect<I>(items: I) -> Result<Option<Artifact>, SyncError>
    where
        I: IntoIterator<Item = PipelineItem>,
    {
        let mut collector = Self::new();
        for item in items {
            collector.accept(item)?;
        }
        Ok(collector.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_items_yields_nothing() {
        assert!(ArtifactCollector::collect(Vec::new()).expect("collect").is_none());
    }

    #[test]
    fn empty_items_are_ignored() {
        let artifact = ArtifactCollector::collect(vec![
            PipelineItem::Empty { path: "dist".into() },
            PipelineItem::buffered("dist/app.zip", b"PK".to_vec()),
        ])
        .expect("collect");
        assert_eq!(artifact.expect("artifact").path(), Path::new("dist/app.zip"));
    }

    #[test]
    fn first_buffered_item_wins() {
        let artifact = ArtifactCollector::collect(vec![
            PipelineItem::buffered("first.zip", b"one".to_vec()),
            PipelineItem::buffered("second.zip", b"two".to_vec()),
        ])
        .expect("collect")
        .expect("artifact");
        assert_eq!(artifact.path(), Path::new("first.zip"));
        assert_eq!(&artifact.contents[..], b"one");
    }

    #[test]
    fn reports_when_an_artifact_is_held() {
        let mut collector = ArtifactCollector::new();
        collector
            .accept(PipelineItem::Empty { path: "dist".into() })
            .expect("empty");
        assert!(!collector.has_artifact());
        collector
            .accept(PipelineItem::buffered("app.zip", b"PK".to_vec()))
            .expect("buffered");
        assert!(collector.has_artifact());
    }

    #[test]
    fn streamed_item_fails_and_stops() {
        let mut seen = 0;
        let items = vec![
            PipelineItem::Streamed { path: "big.zip".into() },
            PipelineItem::buffered("later.zip", b"x".to_vec()),
        ]
        .into_iter()
        .inspect(|_| seen += 1);

        let err = ArtifactCollector::collect(items).unwrap_err();
        assert!(matches!(err, SyncError::StreamingUnsupported { .. }), "got: {err}");
        assert_eq!(seen, 1, "no item after the stream may be consumed");
    }

    #[test]
    fn stream_after_artifact_still_fails() {
        let err = ArtifactCollector::collect(vec![
            PipelineItem::buffered("a.zip", b"x".to_vec()),
            PipelineItem::Streamed { path: "b.zip".into() },
        ])
        .unwrap_err();
        assert!(err.is_input_error());
    }
}
