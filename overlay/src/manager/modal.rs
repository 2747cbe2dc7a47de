//! Content covers and the modal stack they share with sheets.
//!
//! `modal_stack` and `modal_list` hold the same nodes in the same order; the
//! stack is what back press and unbind look at, the list is what focus
//! transfer walks and what the stack is rebuilt from after a deletion.

use uitree::{AnimationOption, AnimationTarget, Curve, NodeArena, NodeId};

use super::OverlayManager;
use crate::error::{OverlayError, Result};
use crate::pattern::{
    Callback, ContentBuilder, ModalPresentationPattern, Pattern, VisibilityCallback,
};
use crate::style::{ModalStyle, ModalTransition};
use crate::task::Completion;

const ALPHA_MS: u64 = 200;

/// Everything one `bind_content_cover` call carries.
pub struct ContentCoverRequest {
    pub target_id: i32,
    pub style: ModalStyle,
    pub builder: Option<ContentBuilder>,
    pub callback: Option<VisibilityCallback>,
    pub on_appear: Option<Callback>,
    pub on_disappear: Option<Callback>,
}

impl ContentCoverRequest {
    pub fn new(target_id: i32) -> Self {
        Self {
            target_id,
            style: ModalStyle::default(),
            builder: None,
            callback: None,
            on_appear: None,
            on_disappear: None,
        }
    }

    pub fn style(mut self, style: ModalStyle) -> Self {
        self.style = style;
        self
    }

    pub fn builder(
        mut self,
        builder: impl FnOnce(&mut NodeArena<Pattern>) -> Option<NodeId> + Send + 'static,
    ) -> Self {
        self.builder = Some(Box::new(builder));
        self
    }

    pub fn on_visibility(mut self, callback: impl FnMut(bool) + Send + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    pub fn on_appear(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_appear = Some(Box::new(callback));
        self
    }

    pub fn on_disappear(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_disappear = Some(Box::new(callback));
        self
    }
}

impl OverlayManager {
    /// Show or hide the content cover bound to `request.target_id`.
    ///
    /// Showing the cover already on top patches it in place.
    pub fn bind_content_cover(&mut self, is_show: bool, request: ContentCoverRequest) {
        if is_show {
            self.show_content_cover(request);
        } else if let Err(e) = self.hide_content_cover(request.target_id) {
            log::debug!("hide content cover skipped: {e}");
        }
    }

    fn show_content_cover(&mut self, request: ContentCoverRequest) {
        let ContentCoverRequest {
            target_id,
            style,
            builder,
            callback,
            mut on_appear,
            on_disappear,
        } = request;

        if let Some(top) = self.modal_stack.last().copied()
            && let Some(modal) = self.pattern_of_mut(top).and_then(Pattern::as_modal_mut)
            && modal.target_id == target_id
        {
            log::debug!("content cover for target {target_id} updated in place");
            modal.transition = style.modal_transition;
            modal.update_on_disappear(on_disappear);
            if callback.is_some() {
                modal.update_callback(callback);
            }
            if let Some(color) = style.background_color
                && let Some(node) = self.context.arena.get_mut(top)
            {
                node.render.background = Some(color);
            }
            return;
        }

        let root_size = self.context.root_size();
        let arena = &mut self.context.arena;
        let Some(content) = builder.and_then(|build| build(arena)) else {
            log::debug!("content cover for target {target_id} built no content");
            return;
        };
        let mut pattern = ModalPresentationPattern::new(target_id, style.modal_transition);
        pattern.is_ui_extension = style.is_ui_extension;
        pattern.update_on_disappear(on_disappear);
        pattern.update_callback(callback);
        let modal = arena.create("modal-page", Pattern::ModalPage(pattern));
        if let Some(node) = arena.get_mut(modal) {
            node.frame.set_size(root_size);
            node.render.background = style.background_color;
        }
        arena.mount(content, modal);

        self.modal_stack.push(modal);
        self.modal_list.push(modal);
        self.save_last_modal_node();
        let root = self.context.root();
        self.context.arena.mount(modal, root);
        log::debug!("content cover {modal} shown for target {target_id}");

        self.fire_modal_page_show();
        if let Some(on_appear) = on_appear.as_mut() {
            on_appear();
        }
        self.fire_navigation_state_change(false, None);

        if self.modal_transition(modal) == Some(ModalTransition::Alpha) {
            self.fade_lower_modal(false);
        }
        self.play_transition(modal, true, None);
    }

    /// Effective transition of a modal page; extension content has none.
    fn modal_transition(&self, modal: NodeId) -> Option<ModalTransition> {
        let pattern = self.pattern_of(modal)?.as_modal()?;
        Some(if pattern.is_ui_extension {
            ModalTransition::None
        } else {
            pattern.transition
        })
    }

    /// Cross-fade the node covered by the top modal in or out.
    fn fade_lower_modal(&mut self, visible: bool) {
        let Some(lower) = self.last_modal_node else {
            return;
        };
        let (from, to) = if visible { (0.0, 1.0) } else { (1.0, 0.0) };
        self.apply(lower, [AnimationTarget::Opacity(from)]);
        self.animate(
            lower,
            AnimationOption::millis(ALPHA_MS, Curve::FRICTION),
            [AnimationTarget::Opacity(to)],
            None,
        );
    }

    fn hide_content_cover(&mut self, target_id: i32) -> Result<()> {
        let top = *self.modal_stack.last().ok_or(OverlayError::EmptyModalStack)?;
        let is_top_cover = self
            .pattern_of(top)
            .and_then(Pattern::as_modal)
            .is_some_and(|m| m.target_id == target_id);
        if !is_top_cover {
            self.delete_modal(target_id);
            return Ok(());
        }

        self.modal_page_lost_focus(top);
        self.modal_exit_process(top)?;
        self.modal_stack.pop();
        self.modal_list.pop();
        self.fire_modal_page_hide();
        self.save_last_modal_node();
        Ok(())
    }

    /// Start the exit of the top modal, a content cover or a sheet.
    ///
    /// The node leaves the tree when its exit animation completes; the
    /// visibility callback reports `false` right away.
    pub fn modal_exit_process(&mut self, top: NodeId) -> Result<()> {
        match self.pattern_of(top) {
            Some(Pattern::ModalPage(_)) => {
                match self.modal_transition(top) {
                    Some(ModalTransition::Alpha) => self.fade_lower_modal(true),
                    Some(ModalTransition::Default) => {
                        if let Some(lower) = self.last_modal_node {
                            self.apply(lower, [AnimationTarget::Opacity(1.0)]);
                        }
                    }
                    _ => {}
                }
                self.play_transition(top, false, Some(Completion::ModalExited));
                if let Some(modal) = self.pattern_of_mut(top).and_then(Pattern::as_modal_mut) {
                    modal.fire_callback(false);
                }
                Ok(())
            }
            Some(Pattern::Sheet(_)) => {
                self.play_sheet_exit(top, 0.0, Completion::SheetClosed);
                if let Some(sheet) = self.pattern_of_mut(top).and_then(Pattern::as_sheet_mut) {
                    sheet.fire_callback(false);
                }
                Ok(())
            }
            Some(_) => Err(OverlayError::WrongPattern {
                node: top,
                expected: "modal",
            }),
            None => Err(OverlayError::NodeGone(top)),
        }
    }

    pub(super) fn on_modal_exited(&mut self, modal: NodeId) {
        let executed = self
            .pattern_of(modal)
            .and_then(Pattern::as_modal)
            .is_none_or(ModalPresentationPattern::is_executed_on_disappear);
        if !executed {
            if let Some(pattern) = self.pattern_of_mut(modal).and_then(Pattern::as_modal_mut) {
                pattern.on_disappear();
            }
            self.fire_navigation_state_change(false, Some(modal));
        }
        log::debug!("content cover {modal} exited");
        self.discard(modal);
        self.fire_navigation_state_change(true, None);
    }

    /// Remove the modal bound to `target_id` without animation, wherever it
    /// sits in the stack.
    pub fn delete_modal(&mut self, target_id: i32) {
        let found = self.modal_list.iter().position(|node| {
            self.pattern_of(*node).is_some_and(|p| match p {
                Pattern::ModalPage(m) => m.target_id == target_id,
                Pattern::Sheet(s) => s.target_id() == target_id,
                _ => false,
            })
        });
        let Some(index) = found else {
            log::debug!("delete modal skipped: nothing bound to target {target_id}");
            return;
        };
        let node = self.modal_list.remove(index);
        log::debug!("delete modal {node} of target {target_id}");

        match self.pattern_of_mut(node) {
            Some(Pattern::ModalPage(modal)) => {
                modal.on_disappear();
                modal.fire_callback(false);
                self.fire_navigation_state_change(false, Some(node));
                self.discard(node);
            }
            Some(Pattern::Sheet(sheet)) => {
                sheet.on_disappear();
                sheet.fire_callback(false);
                self.sheet_map.remove(&target_id);
                if let Some(mask) = self.sheet_mask(node) {
                    self.discard(mask);
                }
                match self.context.arena.parent(node) {
                    Some(wrapper) => self.discard(wrapper),
                    None => self.discard(node),
                };
            }
            _ => {}
        }

        self.modal_stack = self.modal_list.clone();
        self.save_last_modal_node();
    }

    /// Back press on the top modal.
    ///
    /// Returns true when the press was consumed, including when a sheet's
    /// should-dismiss hook vetoed the removal.
    pub fn remove_modal_in_overlay(&mut self) -> bool {
        let Some(top) = self.modal_stack.last().copied() else {
            return false;
        };
        if let Some(sheet) = self.pattern_of_mut(top).and_then(Pattern::as_sheet_mut)
            && sheet.has_should_dismiss()
        {
            sheet.call_should_dismiss();
            return true;
        }

        self.modal_page_lost_focus(top);
        let target_id = match self.pattern_of(top) {
            Some(Pattern::ModalPage(m)) => m.target_id,
            Some(Pattern::Sheet(s)) => s.target_id(),
            _ => return false,
        };
        if self.prohibit_back && target_id < 0 {
            return true;
        }
        self.pop_top_modal(top, target_id)
    }

    /// Pop every modal, top first.
    pub fn remove_all_modal_in_overlay(&mut self) -> bool {
        while let Some(top) = self.modal_stack.last().copied() {
            if !self.context.arena.contains(top) {
                self.modal_stack.pop();
                self.modal_list.retain(|node| *node != top);
                continue;
            }
            self.modal_page_lost_focus(top);
            let target_id = match self.pattern_of(top) {
                Some(Pattern::ModalPage(m)) => m.target_id,
                Some(Pattern::Sheet(s)) => s.target_id(),
                _ => {
                    self.modal_stack.pop();
                    self.modal_list.pop();
                    continue;
                }
            };
            self.pop_top_modal(top, target_id);
        }
        true
    }

    fn pop_top_modal(&mut self, top: NodeId, target_id: i32) -> bool {
        if let Err(e) = self.modal_exit_process(top) {
            log::debug!("modal exit skipped: {e}");
            return false;
        }
        self.modal_stack.pop();
        self.modal_list.pop();
        if self.pattern_of(top).and_then(Pattern::as_sheet).is_some() {
            self.sheet_map.remove(&target_id);
        }
        self.fire_modal_page_hide();
        self.save_last_modal_node();
        true
    }

    pub fn set_prohibit_back(&mut self, prohibit: bool) {
        self.prohibit_back = prohibit;
    }

    pub fn modal_stack_len(&self) -> usize {
        self.modal_stack.len()
    }

    pub fn modal_list_len(&self) -> usize {
        self.modal_list.len()
    }

    /// Top of the modal stack.
    pub fn top_modal(&self) -> Option<NodeId> {
        self.modal_stack.last().copied()
    }
}
