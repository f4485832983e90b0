use super::*;

#[test]
fn targets_follow_start_plus_scaled_index() {
    let tl = FrameTimeline::new(500, 1000, 4, 60).unwrap();
    let ms: Vec<f64> = tl.iter().map(|t| t.target_ms()).collect();
    assert_eq!(ms.len(), 4);
    assert_eq!(ms[0], 500.0);
    assert!((ms[1] - (500.0 + 1000.0 / 60.0)).abs() < 1e-9);
    assert!((ms[3] - (500.0 + 3000.0 / 60.0)).abs() < 1e-9);
}

#[test]
fn targets_are_monotonic() {
    let tl = FrameTimeline::new(-100, 7, 50, 3).unwrap();
    let ms: Vec<f64> = tl.iter().map(|t| t.target_ms()).collect();
    assert!(ms.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn invalid_parameters_are_config_errors() {
    for (ts, frames, fps) in [(1000, 10, 0), (1000, 10, -1), (1000, -1, 60), (-1, 10, 60)] {
        let err = FrameTimeline::new(0, ts, frames, fps).unwrap_err();
        assert!(matches!(err, PlaceError::Config(_)));
    }
}

#[test]
fn zero_frames_is_empty() {
    let tl = FrameTimeline::new(0, 1000, 0, 60).unwrap();
    assert!(tl.is_empty());
    assert_eq!(tl.iter().count(), 0);
    assert!(tl.target(0).is_none());
}

#[test]
fn admission_is_closed_at_the_upper_bound() {
    let tl = FrameTimeline::new(0, 1000, 3, 1).unwrap();
    let t1 = tl.target(1).unwrap();
    assert!(t1.admits(999));
    assert!(t1.admits(1000));
    assert!(!t1.admits(1001));
}

#[test]
fn admission_is_exact_for_non_integer_targets() {
    // Frame 1 sits at 333.33.. ms; frame 3 lands exactly on 1000 ms.
    let tl = FrameTimeline::new(0, 1000, 4, 3).unwrap();
    let t1 = tl.target(1).unwrap();
    assert!(t1.admits(333));
    assert!(!t1.admits(334));

    let t3 = tl.target(3).unwrap();
    assert!(t3.admits(1000));
    assert!(!t3.admits(1001));
}

#[test]
fn admission_respects_start_offset() {
    let tl = FrameTimeline::new(10_000, 1000, 2, 10).unwrap();
    let t0 = tl.target(0).unwrap();
    assert!(t0.admits(10_000));
    assert!(t0.admits(-5));
    assert!(!t0.admits(10_001));
}
