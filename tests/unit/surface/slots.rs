use super::*;
use crate::buffer::graphic_buffer::BufferHandle;
use crate::foundation::format::{PixelFormat, Usage};

fn buf(h: u64) -> Arc<GraphicBuffer> {
    Arc::new(
        GraphicBuffer::with_heap_memory(2, 2, PixelFormat::A_8, Usage::HW_RENDER, BufferHandle(h))
            .unwrap(),
    )
}

#[test]
fn grows_to_fit_and_stamps_index() {
    let mut table = SlotTable::with_capacity(2);
    assert_eq!(table.len(), 2);
    assert!(table.get(5).is_none());

    let b = buf(7);
    table.install(5, b.clone());
    assert_eq!(table.len(), 6);
    assert_eq!(b.index(), Some(5));
    assert!(Arc::ptr_eq(table.get(5).unwrap(), &b));
}

#[test]
fn take_and_drain_empty_the_slots() {
    let mut table = SlotTable::with_capacity(3);
    table.install(0, buf(1));
    table.install(2, buf(2));

    assert_eq!(table.take(0).and_then(|b| b.handle()), Some(BufferHandle(1)));
    assert!(table.take(0).is_none());

    let rest: Vec<_> = table.drain().filter_map(|b| b.handle()).collect();
    assert_eq!(rest, vec![BufferHandle(2)]);
    assert!(table.get(2).is_none());
    assert_eq!(table.len(), 3);
}
