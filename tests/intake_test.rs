use std::fs;
use std::path::PathBuf;

use diagram3d::shell::{IntakeError, UploadPolicy};
use uuid::Uuid;

const MB: usize = 1024 * 1024;

fn scratch_path(file_name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("diagram3d-test-{}", Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();
    dir.join(file_name)
}

fn png_bytes() -> Vec<u8> {
    let mut bytes = Vec::new();
    image::RgbImage::new(2, 2)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

#[test]
fn six_megabytes_is_too_large() {
    let err = UploadPolicy::default()
        .accept_bytes("big.png", "image/png", vec![0; 6 * MB])
        .unwrap_err();

    assert!(matches!(err, IntakeError::TooLarge { max_mb: 5, .. }));
    assert!(err.to_string().contains("5MB"));
    assert_eq!(err.to_string(), "File is too large. Maximum size is 5MB.");
}

#[test]
fn exactly_five_megabytes_is_accepted() {
    let image = UploadPolicy::default()
        .accept_bytes("edge.png", "image/png", vec![0; 5 * MB])
        .unwrap();
    assert_eq!(image.bytes.len(), 5 * MB);
}

#[test]
fn gif_is_rejected() {
    let err = UploadPolicy::default()
        .accept_bytes("anim.gif", "image/gif", vec![0; 16])
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid file type. Please upload png or jpeg files.");
}

#[test]
fn jpeg_is_accepted() {
    let image = UploadPolicy::default()
        .accept_bytes("photo.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF])
        .unwrap();
    assert_eq!(image.mime_type, "image/jpeg");
}

#[test]
fn type_is_checked_before_size() {
    let path = scratch_path("huge.gif");
    fs::write(&path, vec![0u8; 6 * MB]).unwrap();

    let err = UploadPolicy::default().load_path(&path).unwrap_err();
    assert!(matches!(err, IntakeError::InvalidType { .. }));
}

#[test]
fn loads_png_from_disk() {
    let path = scratch_path("lever.png");
    fs::write(&path, png_bytes()).unwrap();

    let image = UploadPolicy::default().load_path(&path).unwrap();
    assert_eq!(image.name, "lever.png");
    assert_eq!(image.mime_type, "image/png");
    assert_eq!(&image.bytes[..], &png_bytes()[..]);
}

#[test]
fn sniffs_files_without_extension() {
    let path = scratch_path("diagram");
    fs::write(&path, png_bytes()).unwrap();

    let image = UploadPolicy::default().load_path(&path).unwrap();
    assert_eq!(image.mime_type, "image/png");
}

#[test]
fn missing_file_is_unreadable() {
    let err = UploadPolicy::default().load_path(&scratch_path("absent.png")).unwrap_err();
    assert!(matches!(err, IntakeError::Unreadable { .. }));
}

#[test]
fn custom_policy_changes_the_message() {
    let policy = UploadPolicy {
        accepted_types: vec!["image/png".to_string(), "image/webp".to_string()],
        max_size_mb: 1,
    };
    assert_eq!(
        policy.accept_bytes("a.jpg", "image/jpeg", vec![0; 4]).unwrap_err().to_string(),
        "Invalid file type. Please upload png or webp files."
    );
    assert_eq!(
        policy.accept_bytes("a.png", "image/png", vec![0; 2 * MB]).unwrap_err().to_string(),
        "File is too large. Maximum size is 1MB."
    );
}
