use super::*;

#[test]
fn empty_json_is_default() {
    assert_eq!(SurfaceOpts::from_json_str("{}").unwrap(), SurfaceOpts::default());
}

#[test]
fn usage_bits_parse_from_flag_names() {
    let opts = SurfaceOpts::from_json_str(
        r#"{ "initial_buffer_count": 3, "default_usage": "HW_TEXTURE | HW_RENDER" }"#,
    )
    .unwrap();
    assert_eq!(opts.initial_buffer_count, 3);
    assert_eq!(opts.default_usage, Usage::HW_TEXTURE | Usage::HW_RENDER);
}

#[test]
fn zero_buffers_and_unknown_fields_are_rejected() {
    let err = SurfaceOpts::from_json_str(r#"{ "initial_buffer_count": 0 }"#).unwrap_err();
    assert!(matches!(err, SurfaceError::InvalidArgument(_)));

    let err = SurfaceOpts::from_json_str(r#"{ "buffers": 2 }"#).unwrap_err();
    assert!(err.to_string().contains("surface opts"));
}
