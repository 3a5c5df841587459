//! Failure-mode tests: the local sink keeps flowing and no shipped data is
//! lost while the ingest backend misbehaves.

mod common;

use common::SharedSink;
use logship::{Shipper, ShipperConfig};
use mockito::Server;
use std::io::Write;

fn test_config(ingest_url: String) -> ShipperConfig {
    ShipperConfig {
        ingest_url,
        rotate_threshold_bytes: 1_000,
        max_pending_bytes: 100_000,
        flush_interval_ms: 1_000,
        request_timeout_ms: 2_000,
    }
}

#[tokio::test]
async fn refused_chunk_is_retried_until_confirmed() {
    let mut server = Server::new_async().await;
    let refused = server
        .mock("POST", "/upload")
        .with_body(r#"{"status":"error","message":"quota exceeded"}"#)
        .expect(1)
        .create_async()
        .await;

    let sink = SharedSink::default();
    let shipper = Shipper::with_sink(
        test_config(format!("{}/upload", server.url())),
        Box::new(sink.clone()),
    )
    .expect("valid config");

    shipper
        .writer()
        .write_all(b"precious bytes")
        .expect("write should succeed");
    shipper.flush_now().await;

    // The chunk stays queued; the failure cause reached the sink as a
    // diagnostic and nothing was lost.
    refused.assert_async().await;
    assert_eq!(shipper.pending_bytes(), 14);
    let contents = sink.contents_string();
    assert!(contents.contains("LOGSHIP | "));
    assert!(contents.contains("ingest status: error"));

    // Backend recovers: the same chunk is delivered on the next pass.
    refused.remove_async().await;
    let confirmed = server
        .mock("POST", "/upload")
        .match_body("precious bytes")
        .with_body(r#"{"status":"success"}"#)
        .expect(1)
        .create_async()
        .await;

    shipper.flush_now().await;
    confirmed.assert_async().await;
    assert_eq!(shipper.pending_bytes(), 0);
}

#[tokio::test]
async fn unreachable_endpoint_never_disturbs_local_output() {
    // Nothing listens on this address; every upload attempt fails at the
    // transport level.
    let sink = SharedSink::default();
    let shipper = Shipper::with_sink(
        test_config("http://127.0.0.1:1/upload".to_string()),
        Box::new(sink.clone()),
    )
    .expect("valid config");

    let mut writer = shipper.writer();
    for i in 0..5 {
        let line = format!("local line {i}\n");
        writer.write_all(line.as_bytes()).expect("write should succeed");
        shipper.flush_now().await;
    }

    // Everything written is still retained for shipping, in order, and the
    // sink received every line regardless.
    assert_eq!(
        shipper.pending_bytes(),
        (0..5).map(|i| format!("local line {i}\n").len()).sum::<usize>()
    );
    let contents = sink.contents_string();
    for i in 0..5 {
        assert!(contents.contains(&format!("local line {i}")));
    }
    assert!(contents.contains("upload failed"));
}

#[tokio::test]
async fn diagnostics_are_never_shipped() {
    let mut server = Server::new_async().await;
    // First pass fails, generating diagnostics on the sink; the retried
    // payload must still be exactly the original bytes.
    let refused = server
        .mock("POST", "/upload")
        .with_body("not json")
        .expect(1)
        .create_async()
        .await;

    let sink = SharedSink::default();
    let shipper = Shipper::with_sink(
        test_config(format!("{}/upload", server.url())),
        Box::new(sink.clone()),
    )
    .expect("valid config");

    shipper
        .writer()
        .write_all(b"payload")
        .expect("write should succeed");
    shipper.flush_now().await;
    assert_eq!(shipper.pending_bytes(), 7);
    assert!(sink.contents_string().contains("unparseable ingest response"));

    refused.remove_async().await;
    let confirmed = server
        .mock("POST", "/upload")
        .match_body("payload")
        .with_body(r#"{"status":"success"}"#)
        .expect(1)
        .create_async()
        .await;

    shipper.flush_now().await;
    confirmed.assert_async().await;
    assert_eq!(shipper.pending_bytes(), 0);
}
