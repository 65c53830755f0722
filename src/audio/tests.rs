use std::time::{Duration, Instant};

use super::thread::{Clock, fade_level};

#[test]
fn clock_accumulates_across_pauses() {
    let t0 = Instant::now();
    let mut clock = Clock::default();
    assert_eq!(clock.elapsed(t0), Duration::ZERO);

    clock.start(t0);
    clock.stop(t0 + Duration::from_secs(2));
    assert_eq!(clock.elapsed(t0 + Duration::from_secs(10)), Duration::from_secs(2));

    clock.start(t0 + Duration::from_secs(10));
    assert_eq!(clock.elapsed(t0 + Duration::from_secs(11)), Duration::from_secs(3));
}

#[test]
fn clock_start_twice_keeps_first_start() {
    let t0 = Instant::now();
    let mut clock = Clock::default();
    clock.start(t0);
    clock.start(t0 + Duration::from_secs(5));
    assert_eq!(clock.elapsed(t0 + Duration::from_secs(6)), Duration::from_secs(6));
}

#[test]
fn clock_reset_to_seek_position() {
    let t0 = Instant::now();
    let mut clock = Clock::default();
    clock.start(t0);
    clock.reset_to(Duration::from_secs(30), t0 + Duration::from_secs(4));
    assert_eq!(clock.elapsed(t0 + Duration::from_secs(5)), Duration::from_secs(31));

    let mut stopped = Clock::default();
    stopped.reset_to(Duration::from_secs(7), t0);
    assert_eq!(stopped.elapsed(t0 + Duration::from_secs(100)), Duration::from_secs(7));
}

#[test]
fn fade_level_goes_from_volume_to_silence() {
    assert!((fade_level(0.5, 0, 20) - 0.5).abs() < f32::EPSILON);
    assert!((fade_level(0.5, 10, 20) - 0.25).abs() < f32::EPSILON);
    assert_eq!(fade_level(0.5, 20, 20), 0.0);
    assert_eq!(fade_level(0.5, 25, 20), 0.0);
}
