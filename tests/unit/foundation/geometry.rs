use super::*;

#[test]
fn rect_intersect_and_empty() {
    let a = Rect::new(0, 0, 10, 10);
    let b = Rect::new(5, 5, 20, 20);
    assert_eq!(a.intersect(&b), Some(Rect::new(5, 5, 10, 10)));
    assert_eq!(a.intersect(&Rect::new(10, 0, 20, 10)), None);
    assert!(Rect::new(3, 3, 3, 9).is_empty());
    assert_eq!(Rect::new(4, 0, 1, 1).width(), 0);
}

#[test]
fn extreme_edges_do_not_overflow() {
    let wide = Rect::new(i32::MIN, 0, i32::MAX, 1);
    assert_eq!(wide.width(), u32::MAX);
    assert_eq!(wide.height(), 1);
    assert_eq!(wide.area(), u64::from(u32::MAX));

    let full = Rect::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
    assert_eq!(full.area(), u64::from(u32::MAX) * u64::from(u32::MAX));
    assert_eq!(Rect::new(i32::MAX, 0, i32::MIN, 1).width(), 0);

    let region = Region::from_rect(wide);
    assert_eq!(region.area(), u64::from(u32::MAX));
    assert_eq!(region, Region::from_rect(wide));
    assert_ne!(region, Region::from_size(8, 1));
    assert_eq!(region.intersect_rect(&Rect::from_size(8, 4)), Region::from_size(8, 1));
}

#[test]
fn subtract_hole_leaves_frame() {
    let outer = Region::from_size(10, 10);
    let hole = Region::from_rect(Rect::new(2, 2, 8, 8));
    let ring = outer.subtract(&hole);

    assert_eq!(ring.area(), 100 - 36);
    assert!(ring.contains_point(0, 0));
    assert!(ring.contains_point(9, 5));
    assert!(!ring.contains_point(5, 5));
    assert_eq!(ring.bounds(), Rect::new(0, 0, 10, 10));
}

#[test]
fn subtract_everything_is_empty() {
    let a = Region::from_rect(Rect::new(1, 1, 4, 4));
    let b = Region::from_size(10, 10);
    assert!(a.subtract(&b).is_empty());
    assert_eq!(a.subtract(&b).bounds(), Rect::default());
}

#[test]
fn union_does_not_double_count_overlap() {
    let a = Region::from_rect(Rect::new(0, 0, 4, 4));
    let b = Region::from_rect(Rect::new(2, 2, 6, 6));
    let u = a.union(&b);
    assert_eq!(u.area(), 16 + 16 - 4);
    assert_eq!(u.bounds(), Rect::new(0, 0, 6, 6));
}

#[test]
fn equality_ignores_rect_split() {
    let mut split = Region::from_rect(Rect::new(0, 0, 5, 10));
    split.add_rect(Rect::new(5, 0, 10, 10));
    assert_eq!(split, Region::from_size(10, 10));
    assert_ne!(split, Region::from_size(10, 9));
}

#[test]
fn intersect_clips_to_bounds() {
    let r = Region::from_rect(Rect::new(-5, -5, 50, 3));
    let clipped = r.intersect_rect(&Rect::from_size(16, 16));
    assert_eq!(clipped, Region::from_rect(Rect::new(0, 0, 16, 3)));

    let other = Region::from_rect(Rect::new(10, 0, 20, 20));
    assert_eq!(clipped.intersect(&other).area(), 6 * 3);
}
