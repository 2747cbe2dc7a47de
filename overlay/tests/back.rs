use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use overlay::pattern::{DialogProperties, MenuOptions, MenuState, Pattern, PopupOptions, ToastInfo};
use overlay::{ContentCoverRequest, OverlayManager, PipelineContext, PopupInfo, SheetRequest};
use uitree::{NodeArena, NodeId, OffsetF};

fn manager() -> OverlayManager {
    let mut m = OverlayManager::new(PipelineContext::builder().build());
    let ctx = m.context_mut();
    let page = ctx.last_page().unwrap();
    ctx.focus.request_focus(&mut ctx.arena, page);
    m
}

fn content(arena: &mut NodeArena<Pattern>) -> Option<NodeId> {
    Some(arena.create("content", Pattern::Custom))
}

fn counter() -> (Arc<AtomicUsize>, impl FnMut() + Send + 'static) {
    let count = Arc::new(AtomicUsize::new(0));
    let sink = count.clone();
    (count, move || {
        sink.fetch_add(1, Ordering::SeqCst);
    })
}

// =============================================================================
// Back Press Tests
// =============================================================================

#[test]
fn test_back_press_with_nothing_shown() {
    let mut m = manager();
    assert!(!m.remove_overlay(true, false));
}

#[test]
fn test_back_press_cancels_dialog() {
    let (cancelled, on_cancel) = counter();
    let mut m = manager();
    let dialog = m
        .show_dialog(DialogProperties::default().on_cancel(on_cancel), None)
        .unwrap();
    m.settle();

    assert!(m.remove_overlay(true, false));
    assert_eq!(cancelled.load(Ordering::SeqCst), 1);
    m.settle();
    assert!(!m.context().arena.contains(dialog));
    // Nothing left to remove
    assert!(!m.remove_overlay(true, false));
}

#[test]
fn test_back_press_from_router_skips_cancel() {
    let (cancelled, on_cancel) = counter();
    let mut m = manager();
    let dialog = m
        .show_dialog(DialogProperties::default().on_cancel(on_cancel), None)
        .unwrap();
    m.settle();

    assert!(m.remove_overlay(true, true));
    m.settle();
    assert_eq!(cancelled.load(Ordering::SeqCst), 0);
    assert!(!m.context().arena.contains(dialog));
}

#[test]
fn test_back_press_asks_will_dismiss() {
    let (asked, on_will_dismiss) = counter();
    let mut m = manager();
    let dialog = m
        .show_dialog(
            DialogProperties::default().on_will_dismiss(on_will_dismiss),
            None,
        )
        .unwrap();
    m.settle();

    assert!(m.remove_overlay(true, false));
    m.settle();
    assert_eq!(asked.load(Ordering::SeqCst), 1);
    assert!(m.is_dialog_open(dialog));

    // A programmatic removal closes regardless
    assert!(m.remove_overlay(false, false));
    m.settle();
    assert!(!m.context().arena.contains(dialog));
}

#[test]
fn test_back_press_looks_past_toast() {
    let mut m = manager();
    let dialog = m.show_dialog(DialogProperties::default(), None).unwrap();
    let toast_id = m.show_toast(ToastInfo::new("saved"));
    m.settle_animations();

    assert!(m.remove_overlay(true, false));
    m.settle_animations();
    assert!(!m.context().arena.contains(dialog));
    assert!(m.toast_node(toast_id).is_some());
}

#[test]
fn test_back_press_hides_popup() {
    let mut m = manager();
    let popup = m.create_popup_node(1, PopupOptions::message("hint"));
    m.show_popup(1, PopupInfo::new(popup));
    m.settle();

    assert!(m.remove_overlay(true, false));
    m.settle();
    assert!(!m.is_on_root(popup));
    assert!(!m.popup_info(1).unwrap().is_current_on_show);
}

#[test]
fn test_back_press_hides_menu() {
    let mut m = manager();
    let wrapper = m.create_menu_node(2, MenuOptions::items(["a"]));
    m.show_menu(2, OffsetF::ZERO, Some(wrapper));
    m.settle();

    assert!(m.remove_overlay(true, false));
    m.settle();
    assert_eq!(m.menu_state(wrapper), Some(MenuState::Unmounted));
}

#[test]
fn test_back_press_pops_top_modal() {
    let visible_false = Arc::new(AtomicUsize::new(0));
    let mut m = manager();
    m.bind_content_cover(true, ContentCoverRequest::new(1).builder(content));
    let lower = m.top_modal().unwrap();
    let sink = visible_false.clone();
    m.bind_content_cover(
        true,
        ContentCoverRequest::new(2)
            .builder(content)
            .on_visibility(move |v| {
                if !v {
                    sink.fetch_add(1, Ordering::SeqCst);
                }
            }),
    );
    m.settle();

    assert!(m.remove_overlay(true, false));
    assert_eq!(visible_false.load(Ordering::SeqCst), 1);
    assert_eq!(m.modal_stack_len(), 1);
    assert_eq!(m.top_modal(), Some(lower));
    assert_eq!(m.context().focus.focused(), Some(lower));
}

#[test]
fn test_page_router_back_pops_every_modal() {
    let mut m = manager();
    m.bind_content_cover(true, ContentCoverRequest::new(1).builder(content));
    m.bind_sheet(true, SheetRequest::new(2).builder(content));
    m.settle();
    assert_eq!(m.modal_stack_len(), 2);

    assert!(m.remove_overlay(true, true));
    assert_eq!(m.modal_stack_len(), 0);
    assert_eq!(m.sheet_count(), 0);
    m.settle();
    assert!(m.overlay_children().is_empty());
    assert_eq!(m.context().focus.focused(), m.context().last_page());
}

#[test]
fn test_back_press_on_sheet_asks_should_dismiss() {
    let (asked, should_dismiss) = counter();
    let mut m = manager();
    m.bind_sheet(
        true,
        SheetRequest::new(1)
            .builder(content)
            .should_dismiss(should_dismiss),
    );
    m.settle();

    assert!(m.remove_overlay(true, false));
    assert_eq!(asked.load(Ordering::SeqCst), 1);
    assert_eq!(m.sheet_count(), 1);
    assert_eq!(m.modal_stack_len(), 1);
}

#[test]
fn test_back_press_closes_sheet() {
    let mut m = manager();
    m.bind_sheet(true, SheetRequest::new(1).builder(content));
    let sheet = m.sheet_node(1).unwrap();
    m.settle();

    assert!(m.remove_overlay(true, false));
    assert_eq!(m.sheet_count(), 0);
    m.settle();
    assert!(!m.context().arena.contains(sheet));
}

#[test]
fn test_prohibited_back_keeps_extension_cover() {
    let mut m = manager();
    m.bind_content_cover(true, ContentCoverRequest::new(-3).builder(content));
    m.settle();
    m.set_prohibit_back(true);

    assert!(m.remove_overlay(true, false));
    assert_eq!(m.modal_stack_len(), 1);

    m.set_prohibit_back(false);
    assert!(m.remove_overlay(true, false));
    assert_eq!(m.modal_stack_len(), 0);
}

#[test]
fn test_back_press_detaches_plain_overlay() {
    let mut m = manager();
    let stray = m.context_mut().arena.create("stray", Pattern::Custom);
    let root = m.root();
    m.context_mut().arena.mount(stray, root);

    assert!(m.remove_overlay(true, false));
    assert!(!m.is_on_root(stray));
}

#[test]
fn test_back_press_clears_keyboards_and_indexers_first() {
    let mut m = manager();
    m.bind_content_cover(true, ContentCoverRequest::new(1).builder(content));
    m.settle();
    let indexer = m.context_mut().arena.create("indexer", Pattern::Custom);
    m.show_indexer_popup(5, indexer);
    m.bind_keyboard(Some(Box::new(content)), 7);
    let keyboard = m.keyboard_node(7).unwrap();

    assert!(m.remove_overlay(true, false));
    assert!(!m.context().arena.contains(keyboard));
    assert!(!m.is_on_root(indexer));
    assert_eq!(m.keyboard_count(), 0);
    // The cover under them took the press
    assert_eq!(m.modal_stack_len(), 0);
}

#[test]
fn test_subwindow_back_press_erases_popup() {
    let states = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = states.clone();
    let mut m = OverlayManager::new(PipelineContext::builder().subwindow(true).build());
    let popup = m.create_popup_node(
        1,
        PopupOptions::message("hint")
            .in_subwindow()
            .on_state_change(move |v| sink.lock().unwrap().push(v)),
    );
    m.show_popup(1, PopupInfo::new(popup));
    m.settle();
    assert!(m.context().is_subwindow_visible());

    assert!(m.remove_overlay_in_subwindow());
    assert!(!m.is_on_root(popup));
    assert!(m.popup_info(1).is_none());
    assert!(!m.context().is_subwindow_visible());
    assert_eq!(*states.lock().unwrap(), vec![true, false]);
    assert!(!m.remove_overlay_in_subwindow());
}

#[test]
fn test_subwindow_back_press_on_dialog() {
    let mut m = OverlayManager::new(PipelineContext::builder().subwindow(true).build());
    let dialog = m
        .show_dialog(DialogProperties::default().in_subwindow(), None)
        .unwrap();
    m.settle();

    assert!(m.remove_overlay_in_subwindow());
    m.settle();
    assert!(!m.context().arena.contains(dialog));
}

// =============================================================================
// Custom Keyboard Tests
// =============================================================================

#[test]
fn test_keyboard_slides_in_and_out() {
    let mut m = manager();
    m.bind_keyboard(Some(Box::new(content)), 7);
    let keyboard = m.keyboard_node(7).unwrap();
    assert!(m.is_on_root(keyboard));
    assert_eq!(m.context().arena.get(keyboard).unwrap().frame.width, 1080.0);
    assert_eq!(m.context().arena.children(keyboard).len(), 1);
    assert_eq!(
        m.context().arena.get(keyboard).unwrap().render.translate,
        OffsetF::new(0.0, 2340.0)
    );
    m.settle();
    assert_eq!(
        m.context().arena.get(keyboard).unwrap().render.translate,
        OffsetF::ZERO
    );

    m.close_keyboard(7);
    assert_eq!(m.keyboard_count(), 0);
    assert!(m.context().arena.contains(keyboard));
    m.settle();
    assert!(!m.context().arena.contains(keyboard));
}

#[test]
fn test_keyboard_bound_once_per_target() {
    let mut m = manager();
    m.bind_keyboard(None, 7);
    let first = m.keyboard_node(7).unwrap();
    m.bind_keyboard(None, 7);
    assert_eq!(m.keyboard_node(7), Some(first));
    m.bind_keyboard(None, 8);
    assert_eq!(m.keyboard_count(), 2);

    m.close_keyboard(9);
    m.destroy_keyboard();
    assert_eq!(m.keyboard_count(), 0);
    assert!(!m.context().arena.contains(first));
}
