use super::*;
use crate::buffer::graphic_buffer::{BufferHandle, GraphicBuffer};
use crate::foundation::format::PixelFormat;

fn filled(w: u32, h: u32, value: u8) -> GraphicBuffer {
    let b = GraphicBuffer::with_heap_memory(w, h, PixelFormat::A_8, Usage::SW_READ_WRITE_OFTEN, BufferHandle(u64::from(value)))
        .unwrap();
    b.lock(Usage::SW_WRITE_OFTEN, b.bounds()).unwrap();
    b.with_bytes_mut(|px| px.fill(value)).unwrap();
    b.unlock().unwrap();
    b
}

fn snapshot(b: &GraphicBuffer) -> Vec<u8> {
    let mut out = Vec::new();
    b.lock(Usage::SW_READ_OFTEN, b.bounds()).unwrap();
    b.with_bytes(|px| out = px.to_vec()).unwrap();
    b.unlock().unwrap();
    out
}

#[test]
fn per_row_copy_honors_strides() {
    // 3x2 window from a 4-wide source into a 6-wide destination, 2 bytes per pixel.
    let src: Vec<u8> = (0..4 * 3 * 2).map(|v| v as u8).collect();
    let mut dst = vec![0xffu8; 6 * 3 * 2];
    let stats = copy_rects(&mut dst, 12, &src, 8, 2, &[Rect::new(1, 1, 3, 3)]).unwrap();

    assert_eq!(stats, CopyStats { copies: 2, bytes: 8 });
    assert_eq!(&dst[12 + 2..12 + 6], &src[8 + 2..8 + 6]);
    assert_eq!(&dst[24 + 2..24 + 6], &src[16 + 2..16 + 6]);
    assert_eq!(dst[12], 0xff);
    assert_eq!(dst[12 + 6], 0xff);
}

#[test]
fn full_width_rows_coalesce_into_one_copy() {
    let src = vec![5u8; 4 * 4];
    let mut dst = vec![0u8; 4 * 4];
    let stats = copy_rects(&mut dst, 4, &src, 4, 1, &[Rect::new(0, 1, 4, 4)]).unwrap();
    assert_eq!(stats, CopyStats { copies: 1, bytes: 12 });
    assert_eq!(&dst[..4], &[0, 0, 0, 0]);
    assert!(dst[4..].iter().all(|&v| v == 5));
}

#[test]
fn out_of_range_rect_is_rejected() {
    let src = vec![0u8; 4];
    let mut dst = vec![0u8; 4];
    assert!(copy_rects(&mut dst, 2, &src, 2, 1, &[Rect::new(0, 0, 2, 3)]).is_err());
    assert!(copy_rects(&mut dst, 2, &src, 2, 1, &[Rect::new(-1, 0, 1, 1)]).is_err());
}

#[test]
fn copy_blt_touches_only_the_region() {
    let front = filled(4, 4, 9);
    let back = filled(4, 4, 1);
    let region = Region::from_rect(Rect::new(0, 0, 2, 2));

    copy_blt(&back, &front, &region).unwrap();

    let px = snapshot(&back);
    for y in 0..4 {
        for x in 0..4 {
            let expect = if x < 2 && y < 2 { 9 } else { 1 };
            assert_eq!(px[y * 4 + x], expect, "pixel ({x},{y})");
        }
    }
    // Both buffers are left unmapped.
    assert!(front.lock(Usage::SW_READ_OFTEN, front.bounds()).is_ok());
    assert!(back.lock(Usage::SW_READ_OFTEN, back.bounds()).is_ok());
}

#[test]
fn copy_blt_reports_busy_source() {
    let front = filled(2, 2, 3);
    let back = filled(2, 2, 4);
    front.lock(Usage::SW_READ_OFTEN, front.bounds()).unwrap();

    let err = copy_blt(&back, &front, &Region::from_size(2, 2)).unwrap_err();
    assert!(matches!(err, SurfaceError::InvalidOperation(_)));
    front.unlock().unwrap();
    assert_eq!(snapshot(&back), vec![4; 4]);
}
