use super::*;

#[test]
fn register_and_unregister_are_balanced() {
    let mapper = RegistryMapper::new();
    mapper.register_buffer(BufferHandle(3)).unwrap();
    mapper.register_buffer(BufferHandle(1)).unwrap();
    assert_eq!(mapper.registered(), vec![BufferHandle(1), BufferHandle(3)]);

    mapper.unregister_buffer(BufferHandle(3)).unwrap();
    assert_eq!(mapper.registered(), vec![BufferHandle(1)]);
}

#[test]
fn double_register_and_stray_unregister_fail() {
    let mapper = RegistryMapper::new();
    mapper.register_buffer(BufferHandle(7)).unwrap();
    assert!(matches!(
        mapper.register_buffer(BufferHandle(7)),
        Err(SurfaceError::InvalidArgument(_))
    ));
    assert!(matches!(
        mapper.unregister_buffer(BufferHandle(8)),
        Err(SurfaceError::InvalidArgument(_))
    ));
}
