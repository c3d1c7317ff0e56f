use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        AvatarError::invalid_format("x")
            .to_string()
            .contains("invalid format:")
    );
    assert!(AvatarError::encode("x").to_string().contains("encode error:"));
    assert!(AvatarError::upload("x").to_string().contains("upload error:"));
    assert!(
        AvatarError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        AvatarError::TooLarge { size: 6, max: 5 }
            .to_string()
            .contains("file too large:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = AvatarError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn too_large_user_message_reports_megabytes() {
    let err = AvatarError::TooLarge {
        size: 6 * 1024 * 1024,
        max: 5 * 1024 * 1024,
    };
    assert_eq!(err.user_message(), "File too large. Maximum 5 MB.");
}

#[test]
fn too_large_user_message_never_rounds_small_limits_to_zero() {
    let msg = |max| AvatarError::TooLarge { size: max + 1, max }.user_message();
    assert_eq!(msg(512 * 1024), "File too large. Maximum 512 KB.");
    assert_eq!(msg(300), "File too large. Maximum 300 bytes.");
    assert_eq!(msg(1536 * 1024), "File too large. Maximum 1.5 MB.");
}

#[test]
fn upload_user_message_carries_collaborator_text() {
    let err = AvatarError::upload("bucket not found");
    assert!(err.user_message().contains("bucket not found"));
}
