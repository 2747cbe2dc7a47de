use std::sync::{Arc, Mutex};

use overlay::pattern::{DialogProperties, MenuOptions, MenuState, Pattern, ToastInfo};
use overlay::{OverlayManager, OverlayRequest, PipelineContext, SheetRequest};
use uitree::{NodeArena, NodeId, OffsetF};

fn manager() -> OverlayManager {
    OverlayManager::new(PipelineContext::builder().build())
}

fn content(arena: &mut NodeArena<Pattern>) -> Option<NodeId> {
    Some(arena.create("content", Pattern::Custom))
}

// =============================================================================
// Handle Tests
// =============================================================================

#[tokio::test]
async fn test_close_sheet_from_task() {
    let mut m = manager();
    m.bind_sheet(true, SheetRequest::new(1).builder(content));
    let sheet = m.sheet_node(1).unwrap();
    m.settle();

    let handle = m.handle();
    tokio::spawn(async move {
        assert!(handle.close_sheet(1));
    })
    .await
    .unwrap();

    // Nothing happens until the queue is flushed
    assert_eq!(m.sheet_count(), 1);
    m.flush();
    assert_eq!(m.sheet_count(), 0);
    m.settle();
    assert!(!m.context().arena.contains(sheet));
}

#[tokio::test]
async fn test_dismiss_sheet_from_callback() {
    let mut m = manager();
    let handle = m.handle();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    // The sheet asks to be dismissed from its own veto hook
    m.bind_sheet(
        true,
        SheetRequest::new(1)
            .builder(content)
            .on_visibility(move |v| sink.lock().unwrap().push(v))
            .should_dismiss(move || {
                handle.dismiss_sheet();
            }),
    );
    let sheet = m.sheet_node(1).unwrap();
    let mask = m.sheet_mask(sheet).unwrap();
    m.settle();

    m.click_sheet_mask(mask);
    m.settle();
    assert!(!m.context().arena.contains(sheet));
    assert_eq!(*seen.lock().unwrap(), vec![false]);
}

#[tokio::test]
async fn test_requests_from_several_tasks() {
    let mut m = manager();
    let opened = Arc::new(Mutex::new(None));
    let sink = opened.clone();
    m.open_custom_dialog(DialogProperties::default(), move |id| {
        *sink.lock().unwrap() = Some(id);
    });
    let dialog_id = opened.lock().unwrap().unwrap();
    let wrapper = m.create_menu_node(3, MenuOptions::items(["a"]));
    m.show_menu(3, OffsetF::ZERO, Some(wrapper));
    m.show_toast(ToastInfo::new("hello"));
    m.settle_animations();

    let tasks = [
        OverlayRequest::CloseCustomDialog(dialog_id),
        OverlayRequest::HideAllMenus,
        OverlayRequest::ClearToast,
    ]
    .map(|request| {
        let handle = m.handle();
        tokio::spawn(async move { handle.post(request) })
    });
    for task in tasks {
        assert!(task.await.unwrap());
    }

    m.settle();
    assert!(m.get_dialog(dialog_id).is_none());
    assert_eq!(m.menu_state(wrapper), Some(MenuState::Unmounted));
    assert_eq!(m.toast_count(), 0);
}

#[tokio::test]
async fn test_handle_outliving_manager() {
    let handle = manager().handle();
    let posted = tokio::spawn(async move { handle.clear_toast() })
        .await
        .unwrap();
    assert!(!posted);
}
