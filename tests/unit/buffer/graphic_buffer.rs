use super::*;

fn rgba(w: u32, h: u32) -> GraphicBuffer {
    GraphicBuffer::with_heap_memory(w, h, PixelFormat::RGBA_8888, Usage::SW_READ_WRITE_OFTEN, BufferHandle(1))
        .unwrap()
}

#[test]
fn pixels_require_a_lock() {
    let b = rgba(4, 4);
    assert!(matches!(
        b.with_bytes(|_| {}),
        Err(SurfaceError::InvalidOperation(_))
    ));

    b.lock(Usage::SW_WRITE_OFTEN, b.bounds()).unwrap();
    b.with_bytes_mut(|px| px[0] = 7).unwrap();
    // A write-only mapping does not grant reads.
    assert!(b.with_bytes(|_| {}).is_err());
    b.unlock().unwrap();

    b.lock(Usage::SW_READ_OFTEN, b.bounds()).unwrap();
    let mut first = 0;
    b.with_bytes(|px| first = px[0]).unwrap();
    assert_eq!(first, 7);
    b.unlock().unwrap();
}

#[test]
fn double_lock_and_stray_unlock_fail() {
    let b = rgba(2, 2);
    assert!(b.unlock().is_err());
    b.lock(Usage::SW_READ_OFTEN, b.bounds()).unwrap();
    assert!(b.lock(Usage::SW_READ_OFTEN, b.bounds()).is_err());
}

#[test]
fn index_is_unset_until_stamped() {
    let b = rgba(1, 1);
    assert_eq!(b.index(), None);
    b.set_index(3);
    assert_eq!(b.index(), Some(3));
}

#[test]
fn heap_allocation_needs_known_format() {
    let err = GraphicBuffer::with_heap_memory(
        8,
        8,
        PixelFormat::UNSPECIFIED,
        Usage::empty(),
        BufferHandle(9),
    )
    .unwrap_err();
    assert!(matches!(err, SurfaceError::InvalidArgument(_)));
}

#[test]
fn same_geometry_compares_format_too() {
    let a = rgba(4, 4);
    let b = GraphicBuffer::with_heap_memory(4, 4, PixelFormat::RGB_565, Usage::empty(), BufferHandle(2))
        .unwrap();
    assert!(a.same_geometry(&rgba(4, 4)));
    assert!(!a.same_geometry(&b));
}
