use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        WidgetError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        WidgetError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        WidgetError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert!(
        DecodeError::InvalidEncoding("x".into())
            .to_string()
            .contains("invalid encoding:")
    );
    assert!(
        DecodeError::UnsupportedFormat("x".into())
            .to_string()
            .contains("unsupported format:")
    );
}

#[test]
fn decode_error_converts_and_keeps_variant() {
    let err: WidgetError = DecodeError::UnsupportedFormat("text".into()).into();
    assert!(matches!(
        err,
        WidgetError::Decode(DecodeError::UnsupportedFormat(_))
    ));
    assert!(err.to_string().starts_with("decode error: unsupported format:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = WidgetError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
