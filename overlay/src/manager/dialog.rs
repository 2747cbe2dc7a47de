//! Dialogs and the open-dialog count that gates the host close button.

use uitree::{AnimationOption, AnimationTarget, Curve, NodeId};

use super::OverlayManager;
use crate::error::{OverlayError, Result};
use crate::pattern::{ContentBuilder, DialogPattern, DialogProperties, Pattern};
use crate::task::Completion;

const DIALOG_SCALE_CURVE: Curve = Curve::cubic(0.38, 1.33, 0.6, 1.0);

impl OverlayManager {
    /// Build a dialog with a content child and open it.
    pub fn show_dialog(
        &mut self,
        properties: DialogProperties,
        builder: Option<ContentBuilder>,
    ) -> Option<NodeId> {
        let dialog = self.create_dialog_node(properties, builder);
        log::debug!("show dialog {dialog}");
        self.open_dialog_animation(dialog);
        Some(dialog)
    }

    /// Open a dialog built from `properties`; `on_open` receives its id.
    pub fn open_custom_dialog(
        &mut self,
        properties: DialogProperties,
        on_open: impl FnOnce(i32),
    ) {
        let dialog = self.create_dialog_node(properties, None);
        self.open_dialog_animation(dialog);
        match self.context.arena.element_id(dialog) {
            Some(id) => on_open(id),
            None => log::debug!("custom dialog {dialog} vanished while opening"),
        }
    }

    /// Open a caller-built dialog node.
    pub fn show_custom_dialog(&mut self, dialog: NodeId) {
        if self.pattern_of(dialog).and_then(Pattern::as_dialog).is_none() {
            log::debug!("show custom dialog skipped: {dialog} is not a dialog");
            return;
        }
        self.open_dialog_animation(dialog);
    }

    fn create_dialog_node(
        &mut self,
        properties: DialogProperties,
        builder: Option<ContentBuilder>,
    ) -> NodeId {
        let mask_color = properties.mask_color;
        let root_size = self.context.root_size();
        let arena = &mut self.context.arena;
        let dialog = arena.create("dialog", Pattern::Dialog(DialogPattern::new(properties)));
        let content = arena.create("dialog-content", Pattern::DialogContent);
        arena.mount(content, dialog);
        if let Some(child) = builder.and_then(|build| build(arena)) {
            arena.mount(child, content);
        }
        if let Some(node) = arena.get_mut(dialog) {
            node.frame.set_size(root_size);
            node.render.background = mask_color;
        }
        dialog
    }

    fn open_dialog_animation(&mut self, dialog: NodeId) {
        let Some(id) = self.context.arena.element_id(dialog) else {
            return;
        };
        let root = self.context.root();
        self.context.arena.mount(dialog, root);
        self.dialog_map.insert(id, dialog);
        self.dialog_count += 1;
        self.context.set_close_button_enabled(false);

        let in_subwindow = self
            .pattern_of(dialog)
            .and_then(Pattern::as_dialog)
            .is_some_and(|d| d.show_in_subwindow);
        if in_subwindow {
            self.context.show_subwindow();
        }
        self.blur_lower_node(dialog);

        let custom = self
            .pattern_of(dialog)
            .and_then(Pattern::as_dialog)
            .is_some_and(DialogPattern::has_custom_open_animation);
        self.play_transition(dialog, true, Some(Completion::DialogOpened));
        if !custom && let Some(content) = self.context.arena.first_child(dialog) {
            let theme = self.context.theme().dialog().clone();
            self.apply(content, [AnimationTarget::Scale(theme.scale_start)]);
            self.animate(
                content,
                AnimationOption::new(theme.duration_in(), DIALOG_SCALE_CURVE),
                [AnimationTarget::Scale(theme.scale_end)],
                None,
            );
        }
    }

    pub(super) fn on_dialog_opened(&mut self, dialog: NodeId) {
        if self.context.arena.is_removing(dialog) || !self.is_on_root(dialog) {
            return;
        }
        self.focus_overlay_node(dialog);
        if let Some(pattern) = self.pattern_of_mut(dialog).and_then(Pattern::as_dialog_mut) {
            pattern.call_on_did_appear();
        }
    }

    /// Close by dialog id; `-1` closes the most recently opened one.
    pub fn close_custom_dialog(&mut self, dialog_id: i32) {
        let dialog = if dialog_id == -1 {
            self.dialog_map.last_key_value().map(|(_, node)| *node)
        } else {
            self.dialog_map.get(&dialog_id).copied()
        };
        match dialog {
            Some(dialog) => self.close_dialog(dialog, None),
            None => {
                let e = OverlayError::DialogNotFound(dialog_id);
                log::debug!("close custom dialog skipped: {e}");
            }
        }
    }

    /// Close `dialog`. A modal subwindow dialog also closes the mask its
    /// parent surface holds for it.
    pub fn close_dialog(&mut self, dialog: NodeId, parent: Option<&mut OverlayManager>) {
        log::debug!("close dialog {dialog}");
        let linked = self
            .pattern_of(dialog)
            .and_then(Pattern::as_dialog)
            .is_some_and(|d| d.show_in_subwindow && d.is_modal);
        if linked
            && let Some(parent) = parent
            && let Some(id) = self.context.arena.element_id(dialog)
            && let Some(mask_id) = parent.mask_node_ids.remove(&id)
            && let Some(mask) = parent.context.arena.find(mask_id)
        {
            parent.close_dialog_inner_logged(mask);
        }
        self.close_dialog_inner_logged(dialog);
    }

    fn close_dialog_inner_logged(&mut self, dialog: NodeId) {
        match self.close_dialog_inner(dialog) {
            Ok(()) => {}
            Err(e @ OverlayError::AlreadyRemoving(_)) => log::warn!("close dialog rejected: {e}"),
            Err(e) => log::debug!("close dialog skipped: {e}"),
        }
    }

    fn close_dialog_inner(&mut self, dialog: NodeId) -> Result<()> {
        let custom = self
            .pattern_of(dialog)
            .ok_or(OverlayError::NodeGone(dialog))?
            .as_dialog()
            .ok_or(OverlayError::WrongPattern {
                node: dialog,
                expected: "dialog",
            })?
            .has_custom_close_animation();
        if self.context.arena.is_removing(dialog) {
            return Err(OverlayError::AlreadyRemoving(dialog));
        }
        if !self.is_on_root(dialog) {
            return Err(OverlayError::NotMounted(dialog));
        }
        self.context.arena.mark_removing(dialog, true);
        self.reset_lower_node_focusable(dialog);

        self.play_transition(dialog, false, Some(Completion::DialogClosed));
        if !custom && let Some(content) = self.context.arena.first_child(dialog) {
            let theme = self.context.theme().dialog().clone();
            self.apply(content, [AnimationTarget::Scale(theme.scale_end)]);
            self.animate(
                content,
                AnimationOption::new(theme.duration_out(), Curve::FRICTION),
                [AnimationTarget::Scale(theme.scale_start)],
                None,
            );
        }
        Ok(())
    }

    pub(super) fn on_dialog_closed(&mut self, dialog: NodeId) {
        log::debug!("dialog {dialog} closed");
        self.blur_overlay_node(dialog);
        if let Some(id) = self.context.arena.element_id(dialog) {
            self.dialog_map.remove(&id);
        }
        self.discard(dialog);
        self.dialog_count = self.dialog_count.saturating_sub(1);
        if self.dialog_count == 0 {
            self.context.set_close_button_enabled(true);
        }
        if let Some(callback) = self.on_hide_dialog.as_mut() {
            callback();
        }
        self.hide_subwindow_if_empty();
    }

    /// Close the subwindow dialog whose mask in this surface is `mask_id`.
    pub fn pop_modal_dialog(&mut self, mask_id: i32, subwindow: &mut OverlayManager) {
        let dialog_id = self
            .mask_node_ids
            .iter()
            .find(|(_, mask)| **mask == mask_id)
            .map(|(dialog, _)| *dialog);
        let Some(dialog) = dialog_id.and_then(|id| subwindow.get_dialog(id)) else {
            log::debug!("no subwindow dialog linked to mask {mask_id}");
            return;
        };
        subwindow.close_dialog(dialog, Some(self));
    }

    /// Link a subwindow dialog to its mask in this surface.
    pub fn add_mask_node_id(&mut self, dialog_id: i32, mask_id: i32) {
        self.mask_node_ids.insert(dialog_id, mask_id);
    }

    pub fn mask_node_id_for_dialog(&self, dialog_id: i32) -> Option<i32> {
        self.mask_node_ids.get(&dialog_id).copied()
    }

    pub fn get_dialog(&self, dialog_id: i32) -> Option<NodeId> {
        self.dialog_map
            .get(&dialog_id)
            .copied()
            .filter(|node| self.context.arena.contains(*node))
    }

    /// The dialog node currently holding focus, if any.
    pub fn dialog_in_map_holding_focus(&self) -> Option<NodeId> {
        let focused = self.context.focus.focused()?;
        self.dialog_map.values().copied().find(|dialog| {
            self.context.arena.descendants(*dialog).contains(&focused)
        })
    }

    pub fn dialog_count(&self) -> usize {
        self.dialog_count
    }

    pub fn set_on_hide_dialog_callback(&mut self, callback: impl FnMut() + Send + 'static) {
        self.on_hide_dialog = Some(Box::new(callback));
    }

    /// Whether `dialog` is mounted and not closing.
    pub fn is_dialog_open(&self, dialog: NodeId) -> bool {
        self.is_on_root(dialog) && !self.context.arena.is_removing(dialog)
    }

    /// Dismiss a dialog from back press: a veto hook wins, then cancel.
    ///
    /// Returns false when nothing could be dismissed.
    pub(super) fn dialog_back_press(&mut self, dialog: NodeId, is_page_router: bool) -> bool {
        if self.context.arena.is_removing(dialog) {
            return false;
        }
        let Some(pattern) = self.pattern_of_mut(dialog).and_then(Pattern::as_dialog_mut) else {
            return false;
        };
        if pattern.should_dismiss_on_back_press() {
            pattern.call_on_will_dismiss();
            return true;
        }
        if !is_page_router {
            pattern.call_on_cancel();
        }
        self.close_dialog(dialog, None);
        true
    }
}
