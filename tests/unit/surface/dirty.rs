use super::*;
use crate::buffer::graphic_buffer::BufferHandle;
use crate::foundation::format::{PixelFormat, Usage};
use crate::foundation::geometry::Rect;

fn buf(w: u32, h: u32, format: PixelFormat, handle: u64) -> Arc<GraphicBuffer> {
    Arc::new(
        GraphicBuffer::with_heap_memory(w, h, format, Usage::SW_READ_WRITE_OFTEN, BufferHandle(handle))
            .unwrap(),
    )
}

#[test]
fn first_frame_is_a_full_redraw() {
    let mut tracker = DirtyTracker::default();
    let back = buf(16, 16, PixelFormat::RGBA_8888, 1);

    let plan = tracker.plan(&back, Some(Region::from_rect(Rect::new(0, 0, 4, 4))), false);
    assert_eq!(plan.dirty, Region::from_size(16, 16));
    assert_eq!(plan.reported, Region::from_rect(Rect::new(0, 0, 4, 4)));
    assert!(plan.copy_back.is_none());
}

#[test]
fn copy_back_is_previous_clean_minus_new_dirty() {
    let mut tracker = DirtyTracker::default();
    let a = buf(16, 16, PixelFormat::RGBA_8888, 1);
    let b = buf(16, 16, PixelFormat::RGBA_8888, 2);

    // Frame 1 into `a`: full redraw, posted.
    tracker.plan(&a, None, false);
    tracker.set_posted(a.clone());

    // Frame 2 into `b`: only a corner changes.
    let corner = Region::from_rect(Rect::new(0, 0, 4, 4));
    let plan = tracker.plan(&b, Some(corner.clone()), false);
    assert_eq!(plan.dirty, corner);
    let (front, copy) = plan.copy_back.expect("copy-back expected");
    assert!(Arc::ptr_eq(&front, &a));
    assert_eq!(copy, Region::from_size(16, 16).subtract(&corner));
    tracker.set_posted(b.clone());

    // Frame 3 into `a`: last frame's clean area was the corner only.
    let stripe = Region::from_rect(Rect::new(2, 0, 16, 2));
    let plan = tracker.plan(&a, Some(stripe.clone()), false);
    let (_, copy) = plan.copy_back.expect("copy-back expected");
    assert_eq!(copy, corner.subtract(&stripe));
    assert_eq!(copy.area(), 16 - 4);
}

#[test]
fn geometry_change_or_discard_forces_full_redraw() {
    let mut tracker = DirtyTracker::default();
    let small = buf(8, 8, PixelFormat::RGBA_8888, 1);
    tracker.plan(&small, None, false);
    tracker.set_posted(small);

    let big = buf(16, 8, PixelFormat::RGBA_8888, 2);
    let plan = tracker.plan(&big, Some(Region::from_rect(Rect::new(0, 0, 1, 1))), false);
    assert_eq!(plan.dirty, Region::from_size(16, 8));
    assert!(plan.copy_back.is_none());
    tracker.set_posted(big);

    let same = buf(16, 8, PixelFormat::RGBA_8888, 3);
    let plan = tracker.plan(&same, Some(Region::from_rect(Rect::new(0, 0, 1, 1))), true);
    assert_eq!(plan.dirty, Region::from_size(16, 8));
    assert!(plan.copy_back.is_none());

    let other_format = buf(16, 8, PixelFormat::RGB_565, 4);
    let plan = tracker.plan(&other_format, Some(Region::from_rect(Rect::new(0, 0, 1, 1))), false);
    assert_eq!(plan.dirty, Region::from_size(16, 8));
}

#[test]
fn requested_region_is_clipped_to_bounds() {
    let mut tracker = DirtyTracker::default();
    let back = buf(10, 10, PixelFormat::A_8, 1);
    let plan = tracker.plan(&back, Some(Region::from_rect(Rect::new(-4, 5, 40, 40))), false);
    assert_eq!(plan.reported, Region::from_rect(Rect::new(0, 5, 10, 10)));
    assert!(Rect::from_size(10, 10).contains(&plan.dirty.bounds()));
}

#[test]
fn forced_full_redraw_resets_the_clean_region() {
    let mut tracker = DirtyTracker::default();
    let a = buf(8, 8, PixelFormat::RGBA_8888, 1);
    let b = buf(8, 8, PixelFormat::RGBA_8888, 2);

    tracker.plan(&a, None, false);
    tracker.set_posted(Arc::clone(&a));
    let plan = tracker.plan(&b, Some(Region::from_rect(Rect::new(0, 0, 2, 2))), false);
    assert!(plan.copy_back.is_some());

    assert_eq!(tracker.force_full_redraw(&b), Region::from_size(8, 8));
    tracker.set_posted(Arc::clone(&b));
    let next = tracker.plan(&a, Some(Region::from_rect(Rect::new(0, 0, 8, 4))), false);
    assert_eq!(next.copy_back.unwrap().1, Region::from_rect(Rect::new(0, 4, 8, 8)));
}
