use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        RandArtError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        RandArtError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert_eq!(RandArtError::Cancelled.to_string(), "generation cancelled");
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = RandArtError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
