use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        DrumVaeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        DrumVaeError::animation("x")
            .to_string()
            .contains("animation error:")
    );
    assert!(
        DrumVaeError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(
        DrumVaeError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("socket closed");
    let err = DrumVaeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("socket closed"));
}
