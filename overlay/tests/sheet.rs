use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use overlay::pattern::Pattern;
use overlay::sheet::{DragOutcome, SheetDragState, SheetPresentationPattern};
use overlay::{
    CaretInfo, DefaultTheme, OverlayManager, PipelineContext, SheetHeight, SheetMode,
    SheetRequest, SheetStyle, SheetType,
};
use uitree::{NodeArena, NodeId, OffsetF, RectF, SizeF, Visibility};

// Default surface: 1080x2340 at 3x, no status bar. The large height is
// 2340 - 8vp = 2316 and the medium height 2340 * 0.6 = 1404.
const LARGE: f32 = 2316.0;
const MEDIUM: f32 = 1404.0;
const PAGE: f32 = 2340.0;

fn manager() -> OverlayManager {
    let mut m = OverlayManager::new(PipelineContext::builder().build());
    let ctx = m.context_mut();
    let page = ctx.last_page().unwrap();
    ctx.focus.request_focus(&mut ctx.arena, page);
    m
}

fn content(arena: &mut NodeArena<Pattern>) -> Option<NodeId> {
    let node = arena.create("sheet-content", Pattern::Custom);
    if let Some(n) = arena.get_mut(node) {
        n.layout.ideal_size = Some(SizeF::new(1080.0, 600.0));
    }
    Some(node)
}

fn two_detents() -> SheetStyle {
    SheetStyle::new().detents([
        SheetHeight::mode(SheetMode::Medium),
        SheetHeight::mode(SheetMode::Large),
    ])
}

fn pattern(m: &OverlayManager, sheet: NodeId) -> &SheetPresentationPattern {
    m.context()
        .arena
        .pattern(sheet)
        .and_then(Pattern::as_sheet)
        .unwrap()
}

fn translate_y(m: &OverlayManager, node: NodeId) -> f32 {
    m.context().arena.get(node).unwrap().render.translate.y
}

type Log = Arc<Mutex<Vec<String>>>;

fn logged(target_id: i32, log: &Log) -> SheetRequest {
    let (a, b, c) = (log.clone(), log.clone(), log.clone());
    SheetRequest::new(target_id)
        .builder(content)
        .on_visibility(move |v| a.lock().unwrap().push(format!("visible:{v}")))
        .on_appear(move || b.lock().unwrap().push("appear".into()))
        .on_disappear(move || c.lock().unwrap().push("disappear".into()))
}

// =============================================================================
// Bind Tests
// =============================================================================

#[test]
fn test_bind_sheet_builds_tree() {
    let mut m = manager();
    m.bind_sheet(true, SheetRequest::new(1).builder(content));
    let sheet = m.sheet_node(1).unwrap();
    let wrapper = m.context().arena.parent(sheet).unwrap();
    let mask = m.sheet_mask(sheet).unwrap();

    assert!(m.is_on_root(wrapper));
    assert!(m.is_on_root(mask));
    assert_eq!(m.context().arena.children(sheet).len(), 3);
    assert_eq!(m.sheet_count(), 1);
    assert_eq!(m.modal_stack_len(), 1);
    assert_eq!(m.top_modal(), Some(sheet));
    assert_eq!(m.context().focus.focused(), Some(sheet));
    assert!(m.context().arena.get(sheet).unwrap().render.clip_path.is_some());

    let p = pattern(&m, sheet);
    assert_eq!(p.sheet_type(), SheetType::Bottom);
    assert_eq!(p.detents(), &[LARGE]);
    assert_eq!(p.height(), LARGE);
    assert_eq!(p.page_height(), PAGE);
    // A single detent hides the drag bar
    assert_eq!(p.drag_bar_visibility(), Visibility::Gone);
}

#[test]
fn test_bind_sheet_slides_to_height() {
    let mut m = manager();
    m.bind_sheet(true, SheetRequest::new(1).builder(content));
    let sheet = m.sheet_node(1).unwrap();
    let mask = m.sheet_mask(sheet).unwrap();
    assert_eq!(translate_y(&m, sheet), PAGE);
    assert_eq!(m.context().arena.get(mask).unwrap().render.opacity, 0.0);

    m.settle();
    assert_eq!(translate_y(&m, sheet), PAGE - LARGE);
    assert_eq!(m.context().arena.get(mask).unwrap().render.opacity, 1.0);
    let p = pattern(&m, sheet);
    assert_eq!(p.state(), SheetDragState::Idle);
    assert_eq!(p.animation(), None);

    let wrapper = m.context().arena.parent(sheet).unwrap();
    assert_eq!(
        m.context().arena.get(wrapper).unwrap().gesture.response_region,
        vec![RectF::new(0.0, PAGE - LARGE, 1080.0, LARGE)]
    );
}

#[test]
fn test_bind_sheet_with_detents_starts_at_first() {
    let mut m = manager();
    m.bind_sheet(true, SheetRequest::new(1).builder(content).style(two_detents()));
    let sheet = m.sheet_node(1).unwrap();
    m.settle();
    let p = pattern(&m, sheet);
    assert_eq!(p.detents(), &[MEDIUM, LARGE]);
    assert_eq!(p.height(), MEDIUM);
    assert_eq!(p.drag_bar_visibility(), Visibility::Visible);
    assert_eq!(translate_y(&m, sheet), PAGE - MEDIUM);
}

#[test]
fn test_rebind_patches_in_place() {
    let log = Log::default();
    let mut m = manager();
    m.bind_sheet(true, logged(1, &log));
    let sheet = m.sheet_node(1).unwrap();
    m.settle();

    m.bind_sheet(
        true,
        logged(1, &log).style(SheetStyle::new().mode(SheetMode::Medium)),
    );
    assert_eq!(m.sheet_node(1), Some(sheet));
    assert_eq!(m.sheet_count(), 1);
    assert_eq!(m.modal_stack_len(), 1);
    m.settle();
    assert_eq!(pattern(&m, sheet).height(), MEDIUM);
    assert_eq!(translate_y(&m, sheet), PAGE - MEDIUM);
    assert_eq!(*log.lock().unwrap(), vec!["appear"]);
}

#[test]
fn test_auto_height_fits_content() {
    let mut m = manager();
    m.bind_sheet(
        true,
        SheetRequest::new(1)
            .builder(content)
            .style(SheetStyle::new().mode(SheetMode::Auto)),
    );
    let sheet = m.sheet_node(1).unwrap();
    m.settle();
    // Drag bar area (16vp) plus 600px of content
    let expected = 48.0 + 600.0;
    let p = pattern(&m, sheet);
    assert_eq!(p.fit_content_height(), expected);
    assert_eq!(p.height(), expected);
    assert_eq!(translate_y(&m, sheet), PAGE - expected);
}

// =============================================================================
// Close Tests
// =============================================================================

#[test]
fn test_close_sheet_animates_out() {
    let log = Log::default();
    let mut m = manager();
    m.bind_sheet(true, logged(1, &log));
    let sheet = m.sheet_node(1).unwrap();
    let wrapper = m.context().arena.parent(sheet).unwrap();
    let mask = m.sheet_mask(sheet).unwrap();
    m.settle();

    m.bind_sheet(false, SheetRequest::new(1));
    assert_eq!(m.sheet_count(), 0);
    assert_eq!(m.modal_stack_len(), 0);
    assert!(m.context().arena.contains(sheet));
    assert!(!m.context().arena.get(mask).unwrap().gesture.clickable);
    assert_eq!(m.context().focus.focused(), m.context().last_page());

    m.settle();
    assert!(!m.context().arena.contains(sheet));
    assert!(!m.context().arena.contains(wrapper));
    assert!(!m.context().arena.contains(mask));
    assert_eq!(*log.lock().unwrap(), vec!["appear", "disappear"]);
}

#[test]
fn test_close_unknown_sheet_is_noop() {
    let mut m = manager();
    m.close_sheet(9);
    m.bind_sheet(true, SheetRequest::new(1).builder(content));
    m.close_sheet(9);
    assert_eq!(m.sheet_count(), 1);
    assert_eq!(m.modal_stack_len(), 1);
}

#[test]
fn test_bind_then_unbind_restores_stack() {
    let mut m = manager();
    let before = (m.modal_stack_len(), m.modal_list_len());
    m.bind_sheet(true, SheetRequest::new(1).builder(content));
    assert_eq!((m.modal_stack_len(), m.modal_list_len()), (1, 1));
    m.bind_sheet(false, SheetRequest::new(1));
    assert_eq!((m.modal_stack_len(), m.modal_list_len()), before);
    assert_eq!(m.sheet_count(), 0);

    m.settle();
    assert!(m.overlay_children().is_empty());
}

#[test]
fn test_dismiss_sheet_bypasses_hook() {
    let vetoes = Arc::new(AtomicUsize::new(0));
    let sink = vetoes.clone();
    let log = Log::default();
    let mut m = manager();
    m.bind_sheet(
        true,
        logged(1, &log).should_dismiss(move || {
            sink.fetch_add(1, Ordering::SeqCst);
        }),
    );
    m.settle();

    m.dismiss_sheet();
    m.settle();
    assert_eq!(vetoes.load(Ordering::SeqCst), 0);
    assert_eq!(m.sheet_count(), 0);
    assert_eq!(m.modal_stack_len(), 0);
    assert_eq!(
        *log.lock().unwrap(),
        vec!["appear", "visible:false", "disappear"]
    );
}

#[test]
fn test_click_mask_dismisses() {
    let log = Log::default();
    let mut m = manager();
    m.bind_sheet(true, logged(1, &log));
    let sheet = m.sheet_node(1).unwrap();
    let mask = m.sheet_mask(sheet).unwrap();
    m.settle();

    m.click_sheet_mask(mask);
    m.click_sheet_mask(mask);
    m.settle();
    assert!(!m.context().arena.contains(sheet));
    assert!(!m.context().arena.contains(mask));
    assert_eq!(
        *log.lock().unwrap(),
        vec!["appear", "visible:false", "disappear"]
    );
}

#[test]
fn test_click_mask_with_hook_only_asks() {
    let vetoes = Arc::new(AtomicUsize::new(0));
    let sink = vetoes.clone();
    let mut m = manager();
    m.bind_sheet(
        true,
        SheetRequest::new(1).builder(content).should_dismiss(move || {
            sink.fetch_add(1, Ordering::SeqCst);
        }),
    );
    let sheet = m.sheet_node(1).unwrap();
    let mask = m.sheet_mask(sheet).unwrap();
    m.settle();

    m.click_sheet_mask(mask);
    m.settle();
    assert_eq!(vetoes.load(Ordering::SeqCst), 1);
    assert!(m.context().arena.contains(sheet));
    assert_eq!(translate_y(&m, sheet), PAGE - LARGE);
}

// =============================================================================
// Drag Tests
// =============================================================================

#[test]
fn test_slow_drag_settles_back() {
    let mut m = manager();
    m.bind_sheet(true, SheetRequest::new(1).builder(content).style(two_detents()));
    let sheet = m.sheet_node(1).unwrap();
    m.settle();

    m.sheet_drag_start(1);
    let frame = m.sheet_drag_update(1, 500.0).unwrap();
    assert_eq!(frame.visible_height, MEDIUM - 500.0);
    assert_eq!(frame.translate_y, PAGE - MEDIUM + 500.0);
    assert_eq!(translate_y(&m, sheet), PAGE - MEDIUM + 500.0);

    let outcome = m.sheet_drag_end(1, 0.0).unwrap();
    assert_eq!(
        outcome,
        DragOutcome::Settle {
            height: MEDIUM,
            velocity: 0.0,
            resize: true
        }
    );
    m.settle();
    assert_eq!(translate_y(&m, sheet), PAGE - MEDIUM);
    assert_eq!(pattern(&m, sheet).current_offset(), 0.0);
}

#[test]
fn test_drag_up_moves_to_next_detent() {
    let mut m = manager();
    m.bind_sheet(true, SheetRequest::new(1).builder(content).style(two_detents()));
    let sheet = m.sheet_node(1).unwrap();
    m.settle();

    m.sheet_drag_start(1);
    m.sheet_drag_update(1, -800.0);
    m.sheet_drag_end(1, 0.0);
    m.settle();
    assert_eq!(pattern(&m, sheet).height(), LARGE);
    assert_eq!(translate_y(&m, sheet), PAGE - LARGE);
}

#[test]
fn test_drag_past_top_detent_is_damped() {
    let mut m = manager();
    m.bind_sheet(true, SheetRequest::new(1).builder(content));
    m.settle();

    m.sheet_drag_start(1);
    // Already at the largest detent: further pulls are rubber-banded
    m.sheet_drag_update(1, -10.0);
    let frame = m.sheet_drag_update(1, -10.0).unwrap();
    assert!(frame.visible_height > LARGE + 10.0);
    assert!(frame.visible_height < LARGE + 20.0);
}

#[test]
fn test_drag_far_down_dismisses() {
    let log = Log::default();
    let mut m = manager();
    m.bind_sheet(true, logged(1, &log).style(two_detents()));
    let sheet = m.sheet_node(1).unwrap();
    m.settle();

    m.sheet_drag_start(1);
    m.sheet_drag_update(1, 1000.0);
    let outcome = m.sheet_drag_end(1, 0.0).unwrap();
    assert_eq!(outcome, DragOutcome::Dismiss { velocity: 0.0 });
    assert_eq!(pattern(&m, sheet).state(), SheetDragState::AnimatingDismiss);
    // A sheet on its way out ignores new drags
    m.sheet_drag_start(1);
    assert!(m.sheet_drag_update(1, 10.0).is_none());

    m.settle();
    assert!(!m.context().arena.contains(sheet));
    assert_eq!(m.modal_stack_len(), 0);
    assert_eq!(m.context().focus.focused(), m.context().last_page());
    assert_eq!(
        *log.lock().unwrap(),
        vec!["appear", "visible:false", "disappear"]
    );
}

#[test]
fn test_fast_flick_follows_direction() {
    let mut m = manager();
    m.bind_sheet(true, SheetRequest::new(1).builder(content).style(two_detents()));
    m.settle();

    m.sheet_drag_start(1);
    m.sheet_drag_update(1, 100.0);
    let outcome = m.sheet_drag_end(1, 2000.0).unwrap();
    assert_eq!(outcome, DragOutcome::Dismiss { velocity: 2000.0 });
}

#[test]
fn test_vetoed_drag_dismiss_settles_back() {
    let vetoes = Arc::new(AtomicUsize::new(0));
    let sink = vetoes.clone();
    let mut m = manager();
    m.bind_sheet(
        true,
        SheetRequest::new(1)
            .builder(content)
            .style(two_detents())
            .should_dismiss(move || {
                sink.fetch_add(1, Ordering::SeqCst);
            }),
    );
    let sheet = m.sheet_node(1).unwrap();
    m.settle();

    m.sheet_drag_start(1);
    m.sheet_drag_update(1, 1000.0);
    m.sheet_drag_end(1, 0.0);
    m.settle();
    assert_eq!(vetoes.load(Ordering::SeqCst), 1);
    assert!(m.context().arena.contains(sheet));
    assert_eq!(translate_y(&m, sheet), PAGE - MEDIUM);
    assert_eq!(pattern(&m, sheet).state(), SheetDragState::Idle);
}

#[test]
fn test_drag_interrupts_settle() {
    let mut m = manager();
    m.bind_sheet(true, SheetRequest::new(1).builder(content));
    let sheet = m.sheet_node(1).unwrap();
    m.pump(Duration::from_millis(16));
    let running = pattern(&m, sheet).animation().unwrap();
    assert_eq!(pattern(&m, sheet).state(), SheetDragState::AnimatingToDetent);

    m.sheet_drag_start(1);
    let p = pattern(&m, sheet);
    assert_eq!(p.state(), SheetDragState::Dragging);
    assert_eq!(p.interrupted(), Some(running));
    assert_eq!(p.animation(), None);
    let frozen = translate_y(&m, sheet);
    m.pump(Duration::from_millis(16));
    assert_eq!(translate_y(&m, sheet), frozen);

    m.sheet_drag_end(1, 0.0);
    m.settle();
    let p = pattern(&m, sheet);
    assert_eq!(p.state(), SheetDragState::Idle);
    assert_eq!(p.interrupted(), None);
    assert_eq!(translate_y(&m, sheet), PAGE - LARGE);
}

#[test]
fn test_drag_unknown_sheet() {
    let mut m = manager();
    m.sheet_drag_start(4);
    assert!(m.sheet_drag_update(4, 10.0).is_none());
    assert!(m.sheet_drag_end(4, 0.0).is_none());
}

// =============================================================================
// Coordinated Scroll Tests
// =============================================================================

#[test]
fn test_coord_scroll_lifts_sheet() {
    let mut m = manager();
    m.bind_sheet(true, SheetRequest::new(1).builder(content).style(two_detents()));
    let sheet = m.sheet_node(1).unwrap();
    m.settle();

    m.sheet_coord_scroll_start(1);
    let frame = m.sheet_coord_scroll_update(1, -200.0).unwrap();
    assert_eq!(frame.visible_height, MEDIUM + 200.0);
    assert_eq!(translate_y(&m, sheet), PAGE - MEDIUM - 200.0);
    m.sheet_coord_scroll_update(1, -700.0);
    m.sheet_coord_scroll_end(1, 0.0);
    m.settle();
    assert_eq!(pattern(&m, sheet).height(), LARGE);
}

#[test]
fn test_coord_scroll_at_top_stays_with_content() {
    let mut m = manager();
    m.bind_sheet(true, SheetRequest::new(1).builder(content));
    m.settle();

    m.sheet_coord_scroll_start(1);
    assert!(m.sheet_coord_scroll_update(1, -50.0).is_none());
    assert!(m.sheet_coord_scroll_update(1, 50.0).is_some());
}

// =============================================================================
// Keyboard Avoidance Tests
// =============================================================================

#[test]
fn test_keyboard_lifts_sheet() {
    let mut m = manager();
    m.bind_sheet(
        true,
        SheetRequest::new(1)
            .builder(content)
            .style(SheetStyle::new().mode(SheetMode::Medium)),
    );
    let sheet = m.sheet_node(1).unwrap();
    m.settle();

    // Caret bottom at 2050, 24vp margin: 218px above the keyboard line
    m.context_mut().set_caret(Some(CaretInfo {
        y: 2000.0,
        height: 50.0,
    }));
    m.context_mut().set_keyboard_inset(900.0);
    m.sheet_avoid_safe_area(1);
    assert_eq!(translate_y(&m, sheet), PAGE - MEDIUM - 682.0);
    assert!(!pattern(&m, sheet).is_scrolling());

    m.context_mut().set_keyboard_inset(0.0);
    m.sheet_avoid_safe_area(1);
    assert_eq!(translate_y(&m, sheet), PAGE - MEDIUM);
}

#[test]
fn test_keyboard_scrolls_full_sheet() {
    let mut m = manager();
    m.bind_sheet(true, SheetRequest::new(1).builder(content));
    let sheet = m.sheet_node(1).unwrap();
    m.settle();

    m.context_mut().set_caret(Some(CaretInfo {
        y: 2000.0,
        height: 50.0,
    }));
    m.context_mut().set_keyboard_inset(900.0);
    m.sheet_avoid_safe_area(1);
    let p = pattern(&m, sheet);
    assert!(p.is_scrolling());
    assert_eq!(p.scroll_height(), 682.0);
    assert_eq!(translate_y(&m, sheet), PAGE - LARGE);
    let scroll = m.context().arena.child_at(sheet, 1).unwrap();
    assert!(m.context().arena.get(scroll).unwrap().layout.scroll_enabled);

    m.context_mut().set_keyboard_inset(0.0);
    m.sheet_avoid_safe_area(1);
    assert!(!pattern(&m, sheet).is_scrolling());
    assert!(!m.context().arena.get(scroll).unwrap().layout.scroll_enabled);
}

#[test]
fn test_unchanged_keyboard_is_ignored() {
    let mut m = manager();
    m.bind_sheet(true, SheetRequest::new(1).builder(content));
    let sheet = m.sheet_node(1).unwrap();
    m.settle();
    m.sheet_avoid_safe_area(1);
    assert_eq!(translate_y(&m, sheet), PAGE - LARGE);
    assert_eq!(pattern(&m, sheet).keyboard_height(), 0.0);
}

// =============================================================================
// Window Change Tests
// =============================================================================

#[test]
fn test_rotation_switches_to_landscape() {
    let mut m = manager();
    m.bind_sheet(true, SheetRequest::new(1).builder(content));
    let sheet = m.sheet_node(1).unwrap();
    let mask = m.sheet_mask(sheet).unwrap();
    m.settle();

    m.context_mut().set_root_size(SizeF::new(2340.0, 1080.0));
    m.sheet_window_rotated(1, true);
    m.settle();

    let p = pattern(&m, sheet);
    assert_eq!(p.sheet_type(), SheetType::BottomLandscape);
    assert_eq!(p.height(), 1080.0 - 24.0);
    assert_eq!(p.detents(), &[1080.0 - 24.0]);
    let frame = m.context().arena.get(sheet).unwrap().frame;
    assert_eq!(frame.size(), SizeF::new(1440.0, 1080.0));
    assert_eq!(frame.offset(), OffsetF::new(450.0, 0.0));
    assert_eq!(translate_y(&m, sheet), 24.0);
    assert_eq!(
        m.context().arena.frame_size(mask),
        SizeF::new(2340.0, 1080.0)
    );
}

#[test]
fn test_foldable_expanded_uses_center() {
    let mut m = OverlayManager::new(PipelineContext::builder().foldable_expanded(true).build());
    m.bind_sheet(true, SheetRequest::new(1).builder(content));
    let sheet = m.sheet_node(1).unwrap();
    m.settle();
    let p = pattern(&m, sheet);
    assert_eq!(p.sheet_type(), SheetType::Center);
    // 560vp center sheet, vertically centered
    assert_eq!(p.center_height(), 1680.0);
    assert_eq!(p.height(), (1680.0 + PAGE) / 2.0);
}

// =============================================================================
// Popup Sheet Tests
// =============================================================================

fn popup_manager() -> (OverlayManager, NodeId) {
    let theme = DefaultTheme::from_json(r#"{"sheet": {"sheet_type": "popup"}}"#)
        .unwrap()
        .into_ref();
    let mut m = OverlayManager::new(
        PipelineContext::builder()
            .root_size(3000.0, 2000.0)
            .theme(theme)
            .build(),
    );
    let ctx = m.context_mut();
    let page = ctx.last_page().unwrap();
    let target = ctx.arena.create("button", Pattern::Custom);
    if let Some(node) = ctx.arena.get_mut(target) {
        node.frame.set_offset(OffsetF::new(1000.0, 200.0));
        node.frame.set_size(SizeF::new(400.0, 100.0));
    }
    ctx.arena.mount(target, page);
    (m, target)
}

#[test]
fn test_popup_sheet_anchors_below_target() {
    let (mut m, target) = popup_manager();
    m.bind_sheet(
        true,
        SheetRequest::new(1).builder(content).target_node(target),
    );
    let sheet = m.sheet_node(1).unwrap();
    let mask = m.sheet_mask(sheet).unwrap();
    assert_eq!(pattern(&m, sheet).sheet_type(), SheetType::Popup);
    assert_eq!(m.context().arena.get(sheet).unwrap().render.opacity, 0.0);
    assert_eq!(
        m.context().arena.get(mask).unwrap().layout.visibility,
        Visibility::Invisible
    );

    m.settle();
    let node = m.context().arena.get(sheet).unwrap();
    assert_eq!(node.render.opacity, 1.0);
    assert_eq!(node.render.translate, OffsetF::ZERO);
    // 360vp wide, centered on the target, 8vp below it
    assert_eq!(node.frame.offset(), OffsetF::new(660.0, 324.0));
    assert_eq!(node.frame.size(), SizeF::new(1080.0, 1680.0 + 24.0));

    let wrapper = m.context().arena.parent(sheet).unwrap();
    assert_eq!(
        m.context().arena.get(wrapper).unwrap().gesture.response_region,
        vec![RectF::new(660.0, 324.0, 1080.0, 1704.0)]
    );

    // Popup sheets do not drag
    m.sheet_drag_start(1);
    assert!(m.sheet_drag_update(1, 100.0).is_none());
}

#[test]
fn test_popup_sheet_closes_with_fade() {
    let (mut m, target) = popup_manager();
    m.bind_sheet(
        true,
        SheetRequest::new(1).builder(content).target_node(target),
    );
    let sheet = m.sheet_node(1).unwrap();
    m.settle();

    m.close_sheet(1);
    m.settle();
    assert!(!m.context().arena.contains(sheet));
    assert!(m.overlay_children().is_empty());
}

#[test]
fn test_popup_theme_on_narrow_window_is_bottom_pc() {
    let theme = DefaultTheme::from_json(r#"{"sheet": {"sheet_type": "popup"}}"#)
        .unwrap()
        .into_ref();
    let mut m = OverlayManager::new(PipelineContext::builder().theme(theme).build());
    m.bind_sheet(
        true,
        SheetRequest::new(1)
            .builder(content)
            .style(SheetStyle::new().sheet_type(SheetType::Center)),
    );
    let sheet = m.sheet_node(1).unwrap();
    assert_eq!(pattern(&m, sheet).sheet_type(), SheetType::BottomPc);
}
