use super::*;

#[test]
fn decodes_every_known_tag() {
    assert_eq!(
        PerformRequest::decode(perform_tag::SET_USAGE, &[0x33]).unwrap(),
        PerformRequest::SetUsage(Usage::SW_READ_WRITE_OFTEN)
    );
    assert_eq!(
        PerformRequest::decode(perform_tag::CONNECT, &[1]).unwrap(),
        PerformRequest::Connect(ProducerApi::EGL)
    );
    assert_eq!(
        PerformRequest::decode(perform_tag::DISCONNECT, &[7]).unwrap(),
        PerformRequest::Disconnect(ProducerApi(7))
    );
    assert_eq!(
        PerformRequest::decode(perform_tag::SET_CROP, &[1, 2, 3, 4]).unwrap(),
        PerformRequest::SetCrop(Rect::new(1, 2, 3, 4))
    );
    assert_eq!(
        PerformRequest::decode(perform_tag::SET_BUFFER_COUNT, &[3]).unwrap(),
        PerformRequest::SetBufferCount(3)
    );
    assert_eq!(
        PerformRequest::decode(perform_tag::SET_BUFFERS_GEOMETRY, &[-1, 0, 4]).unwrap(),
        PerformRequest::SetBuffersGeometry {
            width: -1,
            height: 0,
            format: 4
        }
    );
}

#[test]
fn unknown_tag_is_not_found() {
    let err = PerformRequest::decode(42, &[]).unwrap_err();
    assert!(matches!(err, SurfaceError::NotFound(_)));
}

#[test]
fn bad_arguments_are_invalid() {
    assert!(matches!(
        PerformRequest::decode(perform_tag::SET_CROP, &[0, 0, 1]),
        Err(SurfaceError::InvalidArgument(_))
    ));
    assert!(matches!(
        PerformRequest::decode(perform_tag::SET_BUFFER_COUNT, &[-2]),
        Err(SurfaceError::InvalidArgument(_))
    ));
    assert!(matches!(
        PerformRequest::decode(perform_tag::CONNECT, &[i64::MAX]),
        Err(SurfaceError::InvalidArgument(_))
    ));
}

#[test]
fn query_keys() {
    assert_eq!(NativeQuery::from_raw(0).unwrap(), NativeQuery::Width);
    assert_eq!(NativeQuery::from_raw(2).unwrap(), NativeQuery::Format);
    assert!(NativeQuery::from_raw(9).is_err());
}
