use bytes::Bytes;
use media_relay::config::StorageSettings;
use media_relay::error::PublishError;
use media_relay::storage::{ObjectPublisher, R2Publisher};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings_for(server: &MockServer) -> StorageSettings {
    StorageSettings {
        access_key_id: "key-id".to_string(),
        access_key_secret: "key-secret".to_string(),
        bucket: "relay-bucket".to_string(),
        region: "auto".to_string(),
        endpoint_url: server.uri(),
        public_base_url: "https://acct.r2.cloudflarestorage.com".to_string(),
    }
}

#[tokio::test]
async fn test_publish_puts_whole_object() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/relay-bucket/report.pdf"))
        .and(header("content-type", "application/pdf"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let publisher = R2Publisher::new(&settings_for(&server));
    let stored = publisher
        .publish("report.pdf", Bytes::from_static(b"%PDF-1.7"), "application/pdf")
        .await
        .unwrap();

    assert_eq!(stored.key, "report.pdf");
    assert_eq!(
        stored.public_url,
        "https://acct.r2.cloudflarestorage.com/report.pdf"
    );
}

#[tokio::test]
async fn test_publish_failure_is_reported_once() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/relay-bucket/denied.jpg"))
        .respond_with(ResponseTemplate::new(403).set_body_string(
            r#"<?xml version="1.0" encoding="UTF-8"?><Error><Code>AccessDenied</Code><Message>Access Denied</Message></Error>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let publisher = R2Publisher::new(&settings_for(&server));
    let err = publisher
        .publish("denied.jpg", Bytes::from_static(b"jpeg"), "image/jpeg")
        .await
        .unwrap_err();

    let PublishError::Store { key, .. } = err;
    assert_eq!(key, "denied.jpg");
}

#[tokio::test]
async fn test_publish_without_content_type_uses_store_default() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/relay-bucket/blob.bin"))
        .and(header("content-type", "application/octet-stream"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let publisher = R2Publisher::new(&settings_for(&server));
    let stored = publisher
        .publish("blob.bin", Bytes::from_static(b"\x00\x01\x02"), "")
        .await
        .unwrap();

    assert_eq!(stored.key, "blob.bin");
}
