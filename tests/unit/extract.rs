use chrono::{DateTime, TimeZone, Utc};
use media_relay::extract::{Clock, FileReferenceExtractor};
use media_relay::types::{Document, InboundEvent, Payload, PhotoSize};
use std::sync::Arc;

struct FixedClock(i64);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.0, 0).unwrap()
    }
}

fn extractor_at(secs: i64) -> FileReferenceExtractor {
    FileReferenceExtractor::new(Arc::new(FixedClock(secs)))
}

fn event(payload: Payload) -> InboundEvent {
    InboundEvent {
        update_id: 1,
        message_id: Some(1),
        sender_id: Some(42),
        chat_id: 42,
        date: Some(1609459200),
        payload,
    }
}

fn photo(file_id: &str) -> PhotoSize {
    PhotoSize {
        file_id: file_id.to_string(),
        width: None,
        height: None,
        file_size: None,
    }
}

fn document(file_id: &str, file_name: Option<&str>) -> Document {
    Document {
        file_id: file_id.to_string(),
        file_name: file_name.map(|s| s.to_string()),
        mime_type: None,
        file_size: None,
    }
}

#[test]
fn test_photo_uses_last_variant() {
    let reference = extractor_at(1700000000)
        .extract(&event(Payload::Photo(vec![
            photo("small"),
            photo("medium"),
            photo("large"),
        ])))
        .unwrap();
    assert_eq!(reference.source_file_id, "large");
    assert_eq!(reference.proposed_name, "1700000000.jpg");
}

#[test]
fn test_single_photo_variant() {
    let reference = extractor_at(1700000000)
        .extract(&event(Payload::Photo(vec![photo("only")])))
        .unwrap();
    assert_eq!(reference.source_file_id, "only");
}

#[test]
fn test_empty_photo_list_is_not_applicable() {
    assert!(extractor_at(1700000000)
        .extract(&event(Payload::Photo(vec![])))
        .is_none());
}

#[test]
fn test_document_name_is_verbatim() {
    let name = "../weird name?&#ü.tar.gz";
    let reference = extractor_at(1700000000)
        .extract(&event(Payload::Document(document("doc1", Some(name)))))
        .unwrap();
    assert_eq!(reference.source_file_id, "doc1");
    assert_eq!(reference.proposed_name, name);
}

#[test]
fn test_document_without_name_falls_back_to_timestamp() {
    let extractor = extractor_at(1700000123);
    let unnamed = extractor
        .extract(&event(Payload::Document(document("doc2", None))))
        .unwrap();
    assert_eq!(unnamed.proposed_name, "1700000123");

    let empty = extractor
        .extract(&event(Payload::Document(document("doc3", Some("")))))
        .unwrap();
    assert_eq!(empty.proposed_name, "1700000123");
}

#[test]
fn test_text_and_unsupported_are_not_applicable() {
    let extractor = extractor_at(1700000000);
    assert!(extractor
        .extract(&event(Payload::Text("hello".to_string())))
        .is_none());
    assert!(extractor.extract(&event(Payload::Unsupported)).is_none());
}
