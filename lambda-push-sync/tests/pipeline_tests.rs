//! Channel form of the pipeline adapter.

mod common;

use lambda_push_core::SyncOptions;
use lambda_push_sync::{LambdaSync, PipelineItem, SyncError, SyncPath};
use tokio::sync::mpsc;

use common::FakeLambda;

async fn feed(items: Vec<PipelineItem>) -> mpsc::Receiver<PipelineItem> {
    let (tx, rx) = mpsc::channel(8);
    for item in items {
        tx.send(item).await.expect("send");
    }
    rx
}

#[tokio::test]
async fn transform_re_emits_the_artifact_once() {
    let fake = FakeLambda::new().shared();
    let input = feed(vec![
        PipelineItem::Empty { path: "dist".into() },
        PipelineItem::buffered("dist/app.zip", b"PK".to_vec()),
        PipelineItem::buffered("dist/extra.zip", b"PK".to_vec()),
    ])
    .await;
    let (tx, mut output) = mpsc::channel(8);

    let report = LambdaSync::new(fake.clone(), "orders", SyncOptions::default())
        .transform(input, tx)
        .await
        .expect("transform");

    assert_eq!(report.path, SyncPath::CodeOnly);
    let emitted = output.recv().await.expect("artifact");
    assert_eq!(emitted.path(), std::path::Path::new("dist/app.zip"));
    assert!(output.recv().await.is_none(), "exactly one item downstream");
}

#[tokio::test]
async fn transform_stops_on_streamed_item() {
    let fake = FakeLambda::new().shared();
    let input = feed(vec![PipelineItem::Streamed { path: "big.zip".into() }]).await;
    let (tx, mut output) = mpsc::channel(8);

    let err = LambdaSync::new(fake.clone(), "orders", SyncOptions::default())
        .transform(input, tx)
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::StreamingUnsupported { .. }), "got: {err}");
    assert!(fake.calls().is_empty());
    assert!(output.recv().await.is_none());
}

#[tokio::test]
async fn closed_downstream_is_not_an_error() {
    let fake = FakeLambda::new().shared();
    let input = feed(vec![PipelineItem::buffered("app.zip", b"PK".to_vec())]).await;
    let (tx, output) = mpsc::channel(1);
    drop(output);

    LambdaSync::new(fake, "orders", SyncOptions::default())
        .transform(input, tx)
        .await
        .expect("transform");
}
