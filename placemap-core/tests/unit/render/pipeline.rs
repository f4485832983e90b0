use super::*;
use crate::encode::sink::InMemorySink;
use crate::events::source::VecEventSource;
use crate::foundation::core::{Canvas, FrameIndex, PixelEvent};

fn source() -> VecEventSource {
    let events = (0..200)
        .map(|i| PixelEvent::new(i * 37, (i % 16) as u16, (i / 16) as u16, (i % 32) as u8))
        .collect();
    VecEventSource::new(Canvas::new(16, 16).unwrap(), events)
}

fn cfg(frames: i64) -> GenerateConfig {
    GenerateConfig {
        frames,
        fps: 10,
        timescale: 1000,
        heat_half_life: 2000.0,
        ..GenerateConfig::default()
    }
}

#[test]
fn emits_exactly_the_requested_frames_in_order() {
    let mut sink = InMemorySink::new();
    let stats = generate(source(), &cfg(25), &RenderOpts::default(), &mut sink).unwrap();
    assert_eq!(stats.frames, 25);
    assert_eq!(sink.frames().len(), 25);
    assert!(sink.ended());
    for (i, f) in sink.frames().iter().enumerate() {
        assert_eq!(f.index, FrameIndex(i as u64));
        assert_eq!(f.color.dimensions(), (16, 16));
        assert_eq!(f.heat.dimensions(), (16, 16));
    }
    let sink_cfg = sink.config().unwrap();
    assert_eq!(sink_cfg.frames, 25);
    assert_eq!(sink_cfg.fps, 10);
}

#[test]
fn parallel_rendering_matches_sequential() {
    let mut seq = InMemorySink::new();
    generate(source(), &cfg(30), &RenderOpts::default(), &mut seq).unwrap();

    let opts = RenderOpts {
        threading: RenderThreading {
            parallel: true,
            chunk_size: 7,
            threads: Some(2),
        },
        ..RenderOpts::default()
    };
    let mut par = InMemorySink::new();
    let stats = generate(source(), &cfg(30), &opts, &mut par).unwrap();
    assert_eq!(stats.frames, 30);

    assert_eq!(seq.frames().len(), par.frames().len());
    for (a, b) in seq.frames().iter().zip(par.frames()) {
        assert_eq!(a.index, b.index);
        assert_eq!(a.color.as_raw(), b.color.as_raw());
        assert_eq!(a.heat.as_raw(), b.heat.as_raw());
    }
}

#[test]
fn zero_chunk_size_is_treated_as_one() {
    let opts = RenderOpts {
        threading: RenderThreading {
            chunk_size: 0,
            ..RenderThreading::default()
        },
        ..RenderOpts::default()
    };
    let mut sink = InMemorySink::new();
    let stats = generate(source(), &cfg(3), &opts, &mut sink).unwrap();
    assert_eq!(stats.frames, 3);
}

#[test]
fn zero_threads_is_a_config_error() {
    let opts = RenderOpts {
        threading: RenderThreading {
            parallel: true,
            threads: Some(0),
            ..RenderThreading::default()
        },
        ..RenderOpts::default()
    };
    let mut sink = InMemorySink::new();
    let err = generate(source(), &cfg(3), &opts, &mut sink).unwrap_err();
    assert!(matches!(err, PlaceError::Config(_)));
    assert!(sink.config().is_none());
}

#[test]
fn invalid_config_fails_before_the_sink_begins() {
    let mut sink = InMemorySink::new();
    let bad = GenerateConfig {
        heat_half_life: -1.0,
        ..cfg(3)
    };
    let err = generate(source(), &bad, &RenderOpts::default(), &mut sink).unwrap_err();
    assert!(matches!(err, PlaceError::Config(_)));
    assert!(sink.config().is_none());
}

#[test]
fn counts_applied_events() {
    // 200 events spaced 37ms apart end at 7363ms; 80 frames at 10fps reach 7900ms.
    let mut sink = InMemorySink::new();
    let stats = generate(source(), &cfg(80), &RenderOpts::default(), &mut sink).unwrap();
    assert_eq!(stats.events_applied, 200);
}
