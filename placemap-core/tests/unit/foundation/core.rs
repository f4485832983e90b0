use super::*;

#[test]
fn canvas_rejects_zero_dimensions() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert!(Canvas::new(1, 1).is_ok());
}

#[test]
fn canvas_rejects_sides_beyond_u16_coordinates() {
    assert!(Canvas::new(MAX_CANVAS_SIDE, 1).is_ok());
    assert!(Canvas::new(MAX_CANVAS_SIDE + 1, 1).is_err());
    let err = Canvas::new(u32::MAX, u32::MAX).unwrap_err();
    assert!(matches!(err, PlaceError::Config(_)));
}

#[test]
fn canvas_index_is_row_major() {
    let c = Canvas::new(4, 3).unwrap();
    assert_eq!(c.pixel_count(), 12);
    assert_eq!(c.index_of(0, 0), 0);
    assert_eq!(c.index_of(3, 0), 3);
    assert_eq!(c.index_of(1, 2), 9);
}

#[test]
fn canvas_contains_boundaries() {
    let c = Canvas::new(4, 3).unwrap();
    assert!(c.contains(3, 2));
    assert!(!c.contains(4, 2));
    assert!(!c.contains(3, 3));
}

#[test]
fn event_validation_catches_bounds_and_palette() {
    let c = Canvas::new(8, 8).unwrap();
    assert!(PixelEvent::new(0, 7, 7, 0).validate(c).is_ok());

    let err = PixelEvent::new(0, 8, 0, 0).validate(c).unwrap_err();
    assert!(matches!(err, PlaceError::DataIntegrity(_)));

    let err = PixelEvent::new(0, 0, 0, PALETTE.len() as u8)
        .validate(c)
        .unwrap_err();
    assert!(matches!(err, PlaceError::DataIntegrity(_)));
}
