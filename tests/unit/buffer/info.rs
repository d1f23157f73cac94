use super::*;
use crate::buffer::graphic_buffer::BufferHandle;

fn buffer(usage: Usage) -> GraphicBuffer {
    GraphicBuffer::with_heap_memory(8, 8, PixelFormat::RGB_565, usage, BufferHandle(1)).unwrap()
}

#[test]
fn default_asks_for_hw_render() {
    let info = BufferInfo::default();
    assert_eq!(info.request().usage, Usage::HW_RENDER);
    assert!(!info.is_dirty());
}

#[test]
fn identical_geometry_marks_dirty_once() {
    let mut info = BufferInfo::default();
    info.set_geometry(64, 32, PixelFormat::RGBA_8888);
    assert!(info.is_dirty());

    let b = buffer(Usage::HW_RENDER);
    assert!(!info.validate_buffer(Some(&b)));
    assert!(!info.is_dirty());

    info.set_geometry(64, 32, PixelFormat::RGBA_8888);
    assert!(!info.is_dirty());
    assert!(info.validate_buffer(Some(&b)));
}

#[test]
fn usage_change_does_not_dirty_but_gates_reuse() {
    let mut info = BufferInfo::default();
    info.set_usage(Usage::SW_READ_WRITE_OFTEN);
    assert!(!info.is_dirty());

    assert!(!info.validate_buffer(Some(&buffer(Usage::HW_RENDER))));
    assert!(info.validate_buffer(Some(&buffer(
        Usage::SW_READ_WRITE_OFTEN | Usage::HW_TEXTURE
    ))));
}

#[test]
fn missing_buffer_fails_and_consumes_dirty() {
    let mut info = BufferInfo::default();
    info.set_geometry(1, 1, PixelFormat::A_8);
    assert!(!info.validate_buffer(None));
    assert!(!info.is_dirty());
    assert!(!info.validate_buffer(None));
}
