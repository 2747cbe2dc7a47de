//! Work posted to a surface's UI queue.
//!
//! Animation completions never touch the tree directly: the animator hands
//! back a [`Completion`] and the manager re-posts it as a [`UiTask`], so the
//! effect runs on the next queue flush, after whatever the current call is
//! doing. Callbacks that want the manager to act do the same through an
//! [`OverlayHandle`].

use uitree::{Finished, NodeId, TaskSender};

/// What to do once an animation has run to its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    PopupEntered { target_id: i32 },
    PopupExited { target_id: i32 },
    MenuShown { wrapper: NodeId },
    MenuHidden { wrapper: NodeId },
    DialogOpened,
    DialogClosed,
    ToastShown { toast_id: i32 },
    ToastPopped { toast_id: i32 },
    ModalExited,
    /// A sheet reached its detent.
    SheetSettled,
    /// Programmatic close finished sliding out.
    SheetClosed,
    /// Interactive dismissal finished sliding out.
    SheetDismissed,
    SheetBubbleEntered,
    SheetMaskExited,
    KeyboardHidden,
}

/// Requests callbacks may post without holding the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayRequest {
    CloseSheet(i32),
    DismissSheet,
    CloseCustomDialog(i32),
    ClearToast,
    HideAllMenus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiTask {
    Animation(Finished<Completion>),
    PopToast { toast_id: i32 },
    Request(OverlayRequest),
}

/// Cloneable, `Send` handle to one surface's manager.
#[derive(Debug, Clone)]
pub struct OverlayHandle {
    sender: TaskSender<UiTask>,
}

impl OverlayHandle {
    pub(crate) fn new(sender: TaskSender<UiTask>) -> Self {
        Self { sender }
    }

    /// Returns false if the surface is gone.
    pub fn post(&self, request: OverlayRequest) -> bool {
        self.sender.post(UiTask::Request(request))
    }

    pub fn close_sheet(&self, target_id: i32) -> bool {
        self.post(OverlayRequest::CloseSheet(target_id))
    }

    pub fn dismiss_sheet(&self) -> bool {
        self.post(OverlayRequest::DismissSheet)
    }

    pub fn close_custom_dialog(&self, dialog_id: i32) -> bool {
        self.post(OverlayRequest::CloseCustomDialog(dialog_id))
    }

    pub fn clear_toast(&self) -> bool {
        self.post(OverlayRequest::ClearToast)
    }

    pub fn hide_all_menus(&self) -> bool {
        self.post(OverlayRequest::HideAllMenus)
    }
}
