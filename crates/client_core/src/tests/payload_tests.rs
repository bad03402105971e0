use super::*;

use std::io::Write;

fn alice() -> FormState {
    FormState {
        name: "Alice".into(),
        email: "a@x.com".into(),
        floor: "3".into(),
        room: "301".into(),
        complaint: "Leaky pipe".into(),
        ..FormState::default()
    }
}

#[test]
fn empty_fields_are_omitted() {
    let parts = field_parts(&alice());
    let names: Vec<_> = parts.iter().map(|(field, _)| field.as_str()).collect();
    assert_eq!(names, vec!["name", "email", "floor", "room", "complaint"]);
}

#[test]
fn values_are_sent_as_entered() {
    let mut form = alice();
    form.phone = " 0123 ".into();
    form.name = "  Alice  ".into();

    let parts = field_parts(&form);
    assert!(parts.contains(&(FormField::Phone, " 0123 ".to_string())));
    assert!(parts.contains(&(FormField::Name, "  Alice  ".to_string())));
}

#[test]
fn email_is_sent_trimmed() {
    let mut form = alice();
    form.email = " a@x.com ".into();

    let parts = field_parts(&form);
    assert!(parts.contains(&(FormField::Email, "a@x.com".to_string())));
}

#[test]
fn whitespace_is_not_empty_for_part_selection() {
    let mut form = alice();
    form.phone = " ".into();
    assert!(field_parts(&form)
        .iter()
        .any(|(field, _)| *field == FormField::Phone));
}

#[tokio::test]
async fn payload_without_image_has_no_image_part() {
    let payload = build_payload(&alice()).await.expect("payload");
    assert!(payload.image.is_none());
    assert!(!payload.part_names().contains(&IMAGE_PART_NAME));
    assert_eq!(payload.value(FormField::Room), Some("301"));
    assert_eq!(payload.value(FormField::Phone), None);
}

#[tokio::test]
async fn in_memory_image_becomes_last_part() {
    let mut form = alice();
    form.image = Some(ImageAttachment::from_bytes("pipe.jpg", vec![0xFFu8, 0xD8, 0xFF]));

    let payload = build_payload(&form).await.expect("payload");
    assert_eq!(
        payload.part_names(),
        vec!["name", "email", "floor", "room", "complaint", "image"]
    );

    let image = payload.image.expect("image part");
    assert_eq!(image.filename, "pipe.jpg");
    assert_eq!(image.mime_type, "image/jpeg");
    assert_eq!(image.bytes.as_ref(), &[0xFFu8, 0xD8, 0xFF]);
}

#[tokio::test]
async fn file_backed_image_is_read_at_build_time() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("ceiling.png");
    let mut file = std::fs::File::create(&path).expect("create");
    file.write_all(b"before").expect("write");

    let mut form = alice();
    form.image = Some(ImageAttachment::from_path(&path).expect("attachment"));

    std::fs::write(&path, b"after-selection").expect("rewrite");

    let payload = build_payload(&form).await.expect("payload");
    assert_eq!(
        payload.image.expect("image").bytes.as_ref(),
        b"after-selection"
    );
}

#[tokio::test]
async fn unreadable_attachment_is_a_transport_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("gone.png");
    std::fs::write(&path, b"x").expect("write");

    let mut form = alice();
    form.image = Some(ImageAttachment::from_path(&path).expect("attachment"));
    std::fs::remove_file(&path).expect("remove");

    let err = build_payload(&form).await.expect_err("must fail");
    assert!(matches!(
        err,
        TransportError::Attachment { ref filename, .. } if filename == "gone.png"
    ));
}
