use std::time::Duration;

use uitree::{
    AnimationOption, AnimationTarget, Animator, Color, Curve, FocusState, NodeArena, OffsetF,
};

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn setup() -> (NodeArena<()>, Animator<&'static str>, uitree::NodeId) {
    let mut arena = NodeArena::new();
    let node = arena.create("node", ());
    (arena, Animator::new(), node)
}

// =============================================================================
// Animator Tests
// =============================================================================

#[test]
fn test_animation_interpolates_and_completes() {
    let (mut arena, mut animator, node) = setup();
    arena.get_mut(node).unwrap().render.opacity = 0.0;
    let id = animator.animate(
        &mut arena,
        node,
        AnimationOption::millis(100, Curve::Linear),
        [AnimationTarget::Opacity(1.0)],
        Some("shown"),
    );

    assert!(animator.advance(&mut arena, ms(50)).is_empty());
    assert!((arena.get(node).unwrap().render.opacity - 0.5).abs() < 0.01);

    let finished = animator.advance(&mut arena, ms(60));
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0].id, id);
    assert_eq!(finished[0].payload, "shown");
    assert_eq!(arena.get(node).unwrap().render.opacity, 1.0);
    assert!(!animator.has_active());
}

#[test]
fn test_grouped_targets_complete_once() {
    let (mut arena, mut animator, node) = setup();
    animator.animate(
        &mut arena,
        node,
        AnimationOption::millis(100, Curve::SHARP),
        [
            AnimationTarget::Opacity(0.0),
            AnimationTarget::Translate(OffsetF::new(0.0, 15.0)),
        ],
        Some("done"),
    );
    let finished = animator.advance(&mut arena, ms(200));
    assert_eq!(finished.len(), 1);
    let render = &arena.get(node).unwrap().render;
    assert_eq!(render.opacity, 0.0);
    assert_eq!(render.translate, OffsetF::new(0.0, 15.0));
}

#[test]
fn test_instant_animation_completes_on_next_advance() {
    let (mut arena, mut animator, node) = setup();
    animator.animate(
        &mut arena,
        node,
        AnimationOption::new(Duration::ZERO, Curve::Linear),
        [AnimationTarget::Scale(2.0)],
        Some("instant"),
    );
    // Value applied immediately, completion deferred
    assert_eq!(arena.get(node).unwrap().render.scale, 2.0);
    assert!(animator.has_active());
    let finished = animator.advance(&mut arena, Duration::ZERO);
    assert_eq!(finished.len(), 1);
}

#[test]
fn test_reduced_motion_jumps_to_end() {
    let (mut arena, mut animator, node) = setup();
    animator.set_reduced_motion(true);
    animator.animate(
        &mut arena,
        node,
        AnimationOption::millis(500, Curve::Linear),
        [AnimationTarget::Opacity(0.25)],
        Some("x"),
    );
    assert_eq!(arena.get(node).unwrap().render.opacity, 0.25);
    assert_eq!(animator.active_count(), 0);
}

#[test]
fn test_same_property_interrupts_previous() {
    let (mut arena, mut animator, node) = setup();
    let first = animator.animate(
        &mut arena,
        node,
        AnimationOption::millis(100, Curve::Linear),
        [AnimationTarget::Opacity(0.0)],
        Some("first"),
    );
    animator.advance(&mut arena, ms(50));
    let second = animator.animate(
        &mut arena,
        node,
        AnimationOption::millis(100, Curve::Linear),
        [AnimationTarget::Opacity(1.0)],
        Some("second"),
    );
    assert!(!animator.is_running(first));
    assert!(animator.is_running(second));
    let finished = animator.advance(&mut arena, ms(200));
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0].payload, "second");
}

#[test]
fn test_other_property_does_not_interrupt() {
    let (mut arena, mut animator, node) = setup();
    animator.animate(
        &mut arena,
        node,
        AnimationOption::millis(100, Curve::Linear),
        [AnimationTarget::Opacity(0.0)],
        Some("fade"),
    );
    animator.animate(
        &mut arena,
        node,
        AnimationOption::millis(100, Curve::Linear),
        [AnimationTarget::Scale(0.5)],
        Some("scale"),
    );
    assert_eq!(animator.running_on(node), 2);
    assert_eq!(animator.advance(&mut arena, ms(100)).len(), 2);
}

#[test]
fn test_stop_drops_completion() {
    let (mut arena, mut animator, node) = setup();
    let id = animator.animate(
        &mut arena,
        node,
        AnimationOption::millis(100, Curve::Linear),
        [AnimationTarget::Translate(OffsetF::new(0.0, 100.0))],
        Some("moved"),
    );
    animator.advance(&mut arena, ms(50));
    assert!(animator.stop(id));
    assert!(!animator.stop(id));
    let translate = arena.get(node).unwrap().render.translate.y;
    assert!(animator.advance(&mut arena, ms(100)).is_empty());
    // Left where it was stopped
    assert_eq!(arena.get(node).unwrap().render.translate.y, translate);
}

#[test]
fn test_completion_fires_for_destroyed_node() {
    let (mut arena, mut animator, node) = setup();
    animator.animate(
        &mut arena,
        node,
        AnimationOption::millis(100, Curve::Linear),
        [AnimationTarget::Opacity(0.0)],
        Some("gone"),
    );
    arena.destroy(node);
    let finished = animator.advance(&mut arena, ms(100));
    assert_eq!(finished.len(), 1);
}

#[test]
fn test_delay_postpones_start() {
    let (mut arena, mut animator, node) = setup();
    animator.animate(
        &mut arena,
        node,
        AnimationOption::millis(100, Curve::Linear).with_delay(ms(50)),
        [AnimationTarget::Opacity(0.0)],
        None,
    );
    animator.advance(&mut arena, ms(40));
    assert_eq!(arena.get(node).unwrap().render.opacity, 1.0);
    assert_eq!(animator.next_completion_in(), Some(ms(110)));
}

#[test]
fn test_spring_option_uses_settle_time() {
    let option = AnimationOption::spring(Curve::spring(0.0, 1.0, 328.0, 36.0));
    assert!(option.resolved_duration() > ms(100));
    let option = AnimationOption::new(Duration::ZERO, Curve::Linear);
    assert!(option.resolved_duration().is_zero());
}

#[test]
fn test_background_blends_colors() {
    let (mut arena, mut animator, node) = setup();
    arena.get_mut(node).unwrap().render.background = Some(Color::BLACK);
    animator.animate(
        &mut arena,
        node,
        AnimationOption::millis(100, Curve::Linear),
        [AnimationTarget::Background(Color::WHITE)],
        None,
    );
    animator.advance(&mut arena, ms(50));
    let mid = arena.get(node).unwrap().render.background.unwrap();
    assert!(mid.r > 0 && mid.r < 255);
    animator.advance(&mut arena, ms(50));
    assert_eq!(arena.get(node).unwrap().render.background, Some(Color::WHITE));
}

// =============================================================================
// Color Tests
// =============================================================================

#[test]
fn test_color_argb_roundtrip_fields() {
    let color = Color::from_argb(0x33182431);
    assert_eq!(color.a, 0x33);
    assert_eq!(color.r, 0x18);
    assert_eq!(color.argb(), 0x33182431);
}

#[test]
fn test_color_parse_hex() {
    assert_eq!(Color::parse_hex("#ff0000").unwrap(), Color::from_argb(0xffff0000));
    assert_eq!(Color::parse_hex("#80ff0000").unwrap().a, 0x80);
    assert!(Color::parse_hex("#12").is_err());
}

// =============================================================================
// Focus Tests
// =============================================================================

#[test]
fn test_focus_moves_between_nodes() {
    let mut arena: NodeArena<()> = NodeArena::new();
    let a = arena.create("a", ());
    let b = arena.create("b", ());
    let mut focus = FocusState::new();
    assert!(focus.request_focus(&mut arena, a));
    assert!(focus.request_focus(&mut arena, b));
    assert_eq!(focus.focused(), Some(b));
    assert!(!arena.get(a).unwrap().focus.is_current);
    assert!(arena.get(b).unwrap().focus.is_current);
    assert!(focus.take_changed());
    assert!(!focus.take_changed());
}

#[test]
fn test_focus_refused_when_parent_unfocusable() {
    let mut arena: NodeArena<()> = NodeArena::new();
    let a = arena.create("a", ());
    arena.get_mut(a).unwrap().focus.parent_focusable = false;
    let mut focus = FocusState::new();
    assert!(!focus.request_focus(&mut arena, a));
    assert_eq!(focus.focused(), None);
}

#[test]
fn test_lost_focus_only_for_holder() {
    let mut arena: NodeArena<()> = NodeArena::new();
    let a = arena.create("a", ());
    let b = arena.create("b", ());
    let mut focus = FocusState::new();
    focus.request_focus(&mut arena, a);
    assert!(!focus.lost_focus(&mut arena, b));
    assert!(focus.lost_focus(&mut arena, a));
    assert_eq!(focus.focused(), None);
}

#[test]
fn test_prune_clears_destroyed_holder() {
    let mut arena: NodeArena<()> = NodeArena::new();
    let a = arena.create("a", ());
    let mut focus = FocusState::new();
    focus.request_focus(&mut arena, a);
    arena.destroy(a);
    focus.prune(&arena);
    assert_eq!(focus.focused(), None);
}
