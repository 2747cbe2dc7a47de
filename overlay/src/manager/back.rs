//! Back press: dismiss whatever sits on top of the page.

use uitree::NodeId;

use super::OverlayManager;
use crate::pattern::Pattern;

/// What the topmost overlay is, as far as back press cares.
enum TopOverlay {
    Dialog,
    Bubble(i32),
    Menu(i32),
    Modal,
    Other,
}

impl OverlayManager {
    /// Topmost root child, looking past a toast.
    fn back_press_target(&self) -> Option<NodeId> {
        let children = self.overlay_children();
        let mut top = children.iter().rev();
        let last = *top.next()?;
        if matches!(self.pattern_of(last), Some(Pattern::Toast(_))) {
            return top.next().copied();
        }
        Some(last)
    }

    fn classify(&self, node: NodeId) -> TopOverlay {
        match self.pattern_of(node) {
            Some(Pattern::Dialog(_)) => TopOverlay::Dialog,
            Some(Pattern::Bubble(b)) => TopOverlay::Bubble(b.target_id),
            Some(Pattern::MenuWrapper(w)) => TopOverlay::Menu(w.target_id),
            Some(Pattern::ModalPage(_) | Pattern::SheetWrapper | Pattern::SheetMask) => {
                TopOverlay::Modal
            }
            _ => TopOverlay::Other,
        }
    }

    /// Remove the topmost overlay. Returns true if something consumed the
    /// press.
    pub fn remove_overlay(&mut self, is_back_pressed: bool, is_page_router: bool) -> bool {
        self.remove_indexer_popup();
        self.destroy_keyboard();
        let Some(top) = self.back_press_target() else {
            return false;
        };
        log::debug!("remove overlay {top} (back pressed: {is_back_pressed})");
        match self.classify(top) {
            TopOverlay::Dialog if is_back_pressed => self.dialog_back_press(top, is_page_router),
            TopOverlay::Dialog => {
                self.close_dialog(top, None);
                true
            }
            TopOverlay::Bubble(target_id) => {
                let info = self.popup_info(target_id).cloned().unwrap_or_default();
                self.hide_popup(target_id, info.need_update());
                true
            }
            TopOverlay::Menu(target_id) => {
                self.hide_menu(top, target_id);
                true
            }
            TopOverlay::Modal if is_page_router => self.remove_all_modal_in_overlay(),
            TopOverlay::Modal => self.remove_modal_in_overlay(),
            TopOverlay::Other => {
                self.context.animator.stop_node(top);
                self.context.arena.detach(top)
            }
        }
    }

    /// Back press inside a subwindow surface.
    pub fn remove_overlay_in_subwindow(&mut self) -> bool {
        let Some(top) = self.overlay_children().last().copied() else {
            return false;
        };
        log::debug!("remove overlay {top} in subwindow");
        match self.classify(top) {
            TopOverlay::Dialog => self.dialog_back_press(top, false),
            TopOverlay::Bubble(target_id) => {
                if let Some(bubble) = self.pattern_of_mut(top).and_then(Pattern::as_bubble_mut) {
                    bubble.fire_state_change(false);
                }
                self.erase_popup(target_id);
                self.context.arena.detach(top);
                self.hide_subwindow_if_empty();
                true
            }
            TopOverlay::Menu(target_id) => {
                self.hide_menu(top, target_id);
                true
            }
            TopOverlay::Modal | TopOverlay::Other => {
                self.context.animator.stop_node(top);
                let removed = self.context.arena.detach(top);
                self.hide_subwindow_if_empty();
                removed
            }
        }
    }
}
