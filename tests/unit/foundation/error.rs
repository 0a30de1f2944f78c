use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TweenError::unknown_shape_type("blob")
            .to_string()
            .contains("unknown shape type:")
    );
    assert!(
        TweenError::invalid_scene("x")
            .to_string()
            .contains("invalid scene structure:")
    );
    assert!(
        TweenError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        TweenError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert!(
        TweenError::InvalidPlaybackRate(-1.0)
            .to_string()
            .contains("invalid playback rate:")
    );
}

#[test]
fn render_error_names_the_shape() {
    let err = TweenError::render("c1", "boom");
    let s = err.to_string();
    assert!(s.contains("'c1'"));
    assert!(s.contains("boom"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TweenError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
