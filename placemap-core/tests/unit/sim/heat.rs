use super::*;
use crate::foundation::math::HEAT_INCREMENT;

fn state(scale_height: f64) -> HeatState {
    HeatState::new(Canvas::new(4, 4).unwrap(), 0, 1000.0, scale_height)
}

#[test]
fn first_edit_sets_full_increment() {
    let mut h = state(0.3);
    h.apply(&PixelEvent::new(250, 1, 2, 0));
    let cell = h.cell_at(1, 2).unwrap();
    assert_eq!(cell.value, HEAT_INCREMENT);
    assert_eq!(cell.last_update_ms, 250);
}

#[test]
fn edits_decay_before_adding() {
    let mut h = state(f64::INFINITY);
    h.apply(&PixelEvent::new(0, 0, 0, 0));
    h.apply(&PixelEvent::new(1000, 0, 0, 0));
    let cell = h.cell_at(0, 0).unwrap();
    assert!((cell.value - 1.5).abs() < 1e-12);
}

#[test]
fn snapshot_decays_without_storing() {
    let mut h = state(0.3);
    h.apply(&PixelEvent::new(0, 3, 3, 0));
    let snap = h.snapshot(2000.0);
    assert!((snap[15] - 0.25).abs() < 1e-6);
    assert_eq!(snap[0], 0.0);
    assert_eq!(h.cell_at(3, 3).unwrap().value, HEAT_INCREMENT);
}

#[test]
fn edit_before_start_gets_full_increment() {
    let mut h = HeatState::new(Canvas::new(2, 2).unwrap(), 5_000, 1000.0, 0.3);
    h.apply(&PixelEvent::new(1_000, 0, 0, 0));
    assert_eq!(h.cell_at(0, 0).unwrap().value, HEAT_INCREMENT);
}
