use std::time::Duration;

use uitree::Curve;

// =============================================================================
// Bezier Curve Tests
// =============================================================================

#[test]
fn test_linear_is_identity() {
    assert_eq!(Curve::Linear.apply(0.0), 0.0);
    assert_eq!(Curve::Linear.apply(0.5), 0.5);
    assert_eq!(Curve::Linear.apply(1.0), 1.0);
}

#[test]
fn test_cubic_endpoints() {
    for curve in [
        Curve::SHARP,
        Curve::FRICTION,
        Curve::FAST_OUT_SLOW_IN,
        Curve::FAST_OUT_LINEAR_IN,
    ] {
        assert_eq!(curve.apply(0.0), 0.0);
        assert_eq!(curve.apply(1.0), 1.0);
    }
}

#[test]
fn test_cubic_clamps_input() {
    assert_eq!(Curve::SHARP.apply(-1.0), 0.0);
    assert_eq!(Curve::SHARP.apply(2.0), 1.0);
}

#[test]
fn test_fast_out_slow_in_leads_linear() {
    // Fast start: ahead of linear progress in the first half
    assert!(Curve::FAST_OUT_SLOW_IN.apply(0.3) > 0.3);
}

#[test]
fn test_fast_out_linear_in_trails_linear() {
    assert!(Curve::FAST_OUT_LINEAR_IN.apply(0.3) < 0.3);
}

#[test]
fn test_cubic_is_monotonic() {
    let mut last = 0.0;
    for step in 1..=20 {
        let value = Curve::FRICTION.apply(step as f32 / 20.0);
        assert!(value >= last);
        last = value;
    }
}

#[test]
fn test_overshooting_cubic_exceeds_one() {
    // Dialog scale curve overshoots before settling
    let curve = Curve::cubic(0.38, 1.33, 0.6, 1.0);
    let peak = (1..20).map(|s| curve.apply(s as f32 / 20.0)).fold(0.0_f32, f32::max);
    assert!(peak > 1.0);
}

// =============================================================================
// Spring Tests
// =============================================================================

#[test]
fn test_bezier_has_no_intrinsic_duration() {
    assert!(Curve::SHARP.intrinsic_duration().is_none());
    assert!(Curve::Linear.intrinsic_duration().is_none());
}

#[test]
fn test_spring_has_intrinsic_duration() {
    let duration = Curve::spring(0.0, 1.0, 328.0, 36.0).intrinsic_duration().unwrap();
    assert!(duration > Duration::from_millis(100));
    assert!(duration < Duration::from_secs(3));
}

#[test]
fn test_spring_sample_reaches_target() {
    let curve = Curve::spring(0.0, 1.0, 100.0, 20.0);
    let duration = curve.intrinsic_duration().unwrap();
    assert_eq!(curve.sample(Duration::ZERO, duration), 0.0);
    assert_eq!(curve.sample(duration, duration), 1.0);
    let mid = curve.sample(duration / 4, duration);
    assert!(mid > 0.0 && mid < 1.0);
}

#[test]
fn test_spring_velocity_speeds_start() {
    let slow = Curve::spring(0.0, 1.0, 328.0, 36.0);
    let fast = Curve::spring(2.0, 1.0, 328.0, 36.0);
    let at = Duration::from_millis(20);
    let horizon = Duration::from_secs(5);
    assert!(fast.sample(at, horizon) > slow.sample(at, horizon));
}

#[test]
fn test_responsive_spring_settles() {
    let curve = Curve::responsive(0.304, 0.97);
    assert!(curve.is_spring());
    let duration = curve.intrinsic_duration().unwrap();
    assert!((curve.sample(duration - Duration::from_millis(1), duration) - 1.0).abs() < 0.01);
}

#[test]
fn test_invalid_spring_falls_back_to_linear() {
    let curve = Curve::spring(0.0, 0.0, 100.0, 10.0);
    assert!(curve.intrinsic_duration().is_none());
    assert_eq!(curve.apply(0.5), 0.5);
}
