use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ScorecastError::malformed_input("x")
            .to_string()
            .contains("malformed input:")
    );
    assert!(
        ScorecastError::template_read("x")
            .to_string()
            .contains("template read error:")
    );
    assert!(
        ScorecastError::render_backend("x")
            .to_string()
            .contains("render backend error:")
    );
    assert!(
        ScorecastError::encoding("x")
            .to_string()
            .contains("encoding error:")
    );
    assert!(
        ScorecastError::config("x")
            .to_string()
            .contains("configuration error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ScorecastError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
