//! Pipeline adapter: items in, one sync run, the artifact back out.

use tokio::sync::mpsc;
use tracing::debug;

use lambda_push_client::LambdaApi;
use lambda_push_core::{Artifact, DeploymentTarget, SyncOptions};

use crate::collector::{ArtifactCollector, PipelineItem};
use crate::error::SyncError;
use crate::orchestrator::Orchestrator;
use crate::report::SyncReport;

/// One deployment target plus the client that reaches it.
pub struct LambdaSync<C> {
    client: C,
    target: DeploymentTarget,
    options: SyncOptions,
}

impl<C: LambdaApi> LambdaSync<C> {
    pub fn new(client: C, target: impl Into<DeploymentTarget>, options: SyncOptions) -> Self {
        Self {
            client,
            target: target.into(),
            options,
        }
    }

    pub fn target(&self) -> &DeploymentTarget {
        &self.target
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Collect `items`, then run the sync. A streamed item fails the run
    /// before any remote call.
    pub async fn run<I>(self, items: I) -> Result<SyncReport, SyncError>
    where
        I: IntoIterator<Item = PipelineItem>,
    {
        let artifact = ArtifactCollector::collect(items)?;
        self.sync(artifact).await
    }

    /// Run the sync with an already collected artifact.
    pub async fn sync(self, artifact: Option<Artifact>) -> Result<SyncReport, SyncError> {
        Orchestrator::new(self.client, self.target, self.options, artifact)
            .run()
            .await
    }

    /// Channel form of [`run`](Self::run).
    ///
    /// Reads until `input` closes, then syncs. On success the accepted
    /// artifact is sent to `output` once. A closed `output` is not an error.
    pub async fn transform(
        self,
        mut input: mpsc::Receiver<PipelineItem>,
        output: mpsc::Sender<PipelineItem>,
    ) -> Result<SyncReport, SyncError> {
        let mut collector = ArtifactCollector::new();
        while let Some(item) = input.recv().await {
            collector.accept(item)?;
        }

        let report = self.sync(collector.finish()).await?;
        if let Some(artifact) = &report.artifact {
            if output
                .send(PipelineItem::Buffered(artifact.clone()))
                .await
                .is_err()
            {
                debug!("downstream closed; artifact not re-emitted");
            }
        }
        Ok(report)
    }
}
