//! Popups (bubbles) anchored to a target node, and indexer popups.

use uitree::{NodeId, OffsetF, SizeF};

use super::OverlayManager;
use crate::error::{OverlayError, Result};
use crate::pattern::{BubblePattern, Focusable, Pattern, PopupOptions, TransitionStatus};
use crate::task::Completion;

/// Record of the popup bound to one target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopupInfo {
    pub popup_id: i32,
    pub target: Option<NodeId>,
    pub popup_node: Option<NodeId>,
    /// Set by the caller to request processing; consumed by show and hide.
    pub mark_need_update: bool,
    pub is_current_on_show: bool,
    pub is_block_event: bool,
    pub target_size: SizeF,
    pub target_offset: OffsetF,
}

impl PopupInfo {
    /// A record for `popup_node` with an update pending.
    pub fn new(popup_node: NodeId) -> Self {
        Self {
            popup_node: Some(popup_node),
            mark_need_update: true,
            is_block_event: true,
            ..Self::default()
        }
    }

    pub fn target(mut self, target: NodeId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn need_update(mut self) -> Self {
        self.mark_need_update = true;
        self
    }
}

impl OverlayManager {
    pub fn create_popup_node(&mut self, target_id: i32, options: PopupOptions) -> NodeId {
        let node = self.context.arena.create(
            "bubble",
            Pattern::Bubble(BubblePattern::new(target_id, options)),
        );
        log::debug!("popup {node} created for target {target_id}");
        node
    }

    pub fn popup_info(&self, target_id: i32) -> Option<&PopupInfo> {
        self.popup_map.get(&target_id)
    }

    pub fn popup_count(&self) -> usize {
        self.popup_map.len()
    }

    fn bubble_status(&self, node: NodeId) -> Option<TransitionStatus> {
        self.pattern_of(node)
            .and_then(Pattern::as_bubble)
            .map(BubblePattern::status)
    }

    /// Whether the popup blurs the page and takes focus.
    fn popup_takes_focus(&self, node: NodeId) -> bool {
        self.pattern_of(node)
            .and_then(Pattern::as_bubble)
            .is_some_and(|b| b.takes_focus_on_entry())
    }

    pub fn show_popup(&mut self, target_id: i32, info: PopupInfo) {
        log::debug!("show popup for target {target_id}");
        if let Err(e) = self.try_show_popup(target_id, info) {
            log::debug!("show popup skipped: {e}");
        }
    }

    fn try_show_popup(&mut self, target_id: i32, info: PopupInfo) -> Result<()> {
        let mut info = info;
        let needs_update = std::mem::take(&mut info.mark_need_update);
        let popup_node = info.popup_node;
        if let Some(target) = info.target
            && let Some(node) = self.context.arena.get(target)
        {
            info.target_size = node.frame.size();
            info.target_offset = self.context.arena.paint_offset(target);
        }
        let previous = self
            .popup_map
            .insert(target_id, info)
            .and_then(|record| record.popup_node);
        if !needs_update {
            return Err(OverlayError::NoPendingUpdate(target_id));
        }
        let popup = popup_node.ok_or(OverlayError::PopupNotFound(target_id))?;
        if !self.context.arena.contains(popup) {
            return Err(OverlayError::NodeGone(popup));
        }
        // One bubble per target: a new node replaces the one on show
        if let Some(stale) = previous
            && stale != popup
            && self.is_on_root(stale)
        {
            log::debug!("popup {stale} for target {target_id} replaced by {popup}");
            self.detach_popup_now(stale);
        }
        if self.is_on_root(popup) {
            return Ok(());
        }

        self.place_popup(target_id, popup);
        if let Some(bubble) = self.pattern_of_mut(popup).and_then(Pattern::as_bubble_mut) {
            bubble.fire_state_change(true);
        }
        let root = self.context.root();
        self.context.arena.mount(popup, root);
        if let Some(record) = self.popup_map.get_mut(&target_id) {
            record.is_current_on_show = true;
        }
        let in_subwindow = self
            .pattern_of(popup)
            .and_then(Pattern::as_bubble)
            .is_some_and(|b| b.show_in_subwindow);
        if in_subwindow {
            self.context.show_subwindow();
        }
        if self.popup_takes_focus(popup) {
            self.blur_lower_node(popup);
        }
        if let Some(bubble) = self.pattern_of_mut(popup).and_then(Pattern::as_bubble_mut) {
            bubble.set_status(TransitionStatus::Visible);
        }
        self.play_transition(popup, true, Some(Completion::PopupEntered { target_id }));
        Ok(())
    }

    /// Put the bubble just below its target.
    fn place_popup(&mut self, target_id: i32, popup: NodeId) {
        let Some(info) = self.popup_map.get(&target_id) else {
            return;
        };
        if info.target.is_none() {
            return;
        }
        let offset = OffsetF::new(
            info.target_offset.x,
            info.target_offset.y + info.target_size.height,
        );
        if let Some(node) = self.context.arena.get_mut(popup) {
            node.frame.set_offset(offset);
        }
    }

    pub(super) fn on_popup_entered(&mut self, target_id: i32, popup: NodeId) {
        if self.bubble_status(popup) != Some(TransitionStatus::Visible) {
            return;
        }
        log::debug!("popup for target {target_id} shown");
        if self.popup_takes_focus(popup) {
            self.focus_overlay_node(popup);
        }
    }

    pub fn hide_popup(&mut self, target_id: i32, info: PopupInfo) {
        log::debug!("hide popup for target {target_id}");
        match self.try_hide_popup(target_id, info) {
            Ok(()) => {}
            Err(e @ OverlayError::AlreadyExiting(_)) => log::warn!("hide popup rejected: {e}"),
            Err(e) => log::debug!("hide popup skipped: {e}"),
        }
    }

    fn try_hide_popup(&mut self, target_id: i32, info: PopupInfo) -> Result<()> {
        let mut info = info;
        let needs_update = std::mem::take(&mut info.mark_need_update);
        let popup_node = info.popup_node;
        self.popup_map.insert(target_id, info);
        if !needs_update {
            return Err(OverlayError::NoPendingUpdate(target_id));
        }
        let popup = popup_node.ok_or(OverlayError::PopupNotFound(target_id))?;
        if !self.is_on_root(popup) {
            return Err(OverlayError::NotMounted(popup));
        }
        if self.bubble_status(popup) == Some(TransitionStatus::Exiting) {
            return Err(OverlayError::AlreadyExiting(target_id));
        }
        if let Some(bubble) = self.pattern_of_mut(popup).and_then(Pattern::as_bubble_mut) {
            bubble.set_status(TransitionStatus::Exiting);
        }
        if self.popup_takes_focus(popup) {
            self.reset_lower_node_focusable(popup);
        }
        self.play_transition(popup, false, Some(Completion::PopupExited { target_id }));
        if let Some(record) = self.popup_map.get_mut(&target_id) {
            record.is_current_on_show = false;
        }
        Ok(())
    }

    pub(super) fn on_popup_exited(&mut self, target_id: i32, popup: NodeId) {
        if self.bubble_status(popup) != Some(TransitionStatus::Exiting) {
            return;
        }
        log::debug!("popup for target {target_id} hidden");
        let takes_focus = self.popup_takes_focus(popup);
        if let Some(bubble) = self.pattern_of_mut(popup).and_then(Pattern::as_bubble_mut) {
            bubble.set_status(TransitionStatus::Invisible);
        }
        if takes_focus {
            self.blur_overlay_node(popup);
        }
        self.context.arena.detach(popup);
        if let Some(bubble) = self.pattern_of_mut(popup).and_then(Pattern::as_bubble_mut) {
            bubble.fire_state_change(false);
        }
        self.hide_subwindow_if_empty();
    }

    /// Hide at once: no exit animation, same bookkeeping.
    pub fn hide_popup_without_animation(&mut self, target_id: i32, info: PopupInfo) {
        let mut info = info;
        let needs_update = std::mem::take(&mut info.mark_need_update);
        let popup_node = info.popup_node;
        info.is_current_on_show = false;
        self.popup_map.insert(target_id, info);
        if !needs_update {
            return;
        }
        let Some(popup) = popup_node else {
            return;
        };
        if !self.is_on_root(popup) {
            return;
        }
        log::debug!("hide popup for target {target_id} without animation");
        self.detach_popup_now(popup);
    }

    fn detach_popup_now(&mut self, popup: NodeId) {
        self.context.animator.stop_node(popup);
        if self.popup_takes_focus(popup) {
            self.reset_lower_node_focusable(popup);
            self.blur_overlay_node(popup);
        }
        self.context.arena.detach(popup);
        if let Some(bubble) = self.pattern_of_mut(popup).and_then(Pattern::as_bubble_mut) {
            bubble.set_status(TransitionStatus::Invisible);
            bubble.fire_state_change(false);
        }
    }

    /// Detach the popup and forget its record.
    pub fn erase_popup(&mut self, target_id: i32) {
        let Some(info) = self.popup_map.remove(&target_id) else {
            return;
        };
        log::debug!("erase popup for target {target_id}");
        if let Some(popup) = info.popup_node {
            self.context.animator.stop_node(popup);
            self.context.arena.detach(popup);
        }
    }

    pub fn hide_all_popups(&mut self) {
        self.hide_popups_where(|_| true);
    }

    /// Hide popups without option buttons.
    pub fn hide_custom_popups(&mut self) {
        self.hide_popups_where(|bubble| !bubble.has_options);
    }

    fn hide_popups_where(&mut self, filter: impl Fn(&BubblePattern) -> bool) {
        let shown: Vec<(i32, PopupInfo)> = self
            .popup_map
            .iter()
            .filter(|(_, info)| info.is_current_on_show)
            .map(|(id, info)| (*id, info.clone()))
            .collect();
        for (target_id, info) in shown {
            let matches = info
                .popup_node
                .and_then(|n| self.pattern_of(n))
                .and_then(Pattern::as_bubble)
                .is_some_and(&filter);
            if matches {
                self.hide_popup(target_id, info.need_update());
            }
        }
    }

    /// Detach every bubble of this surface without animation.
    pub fn clean_popup_in_subwindow(&mut self) {
        for child in self.overlay_children() {
            if self.pattern_of(child).and_then(Pattern::as_bubble).is_none() {
                continue;
            }
            self.context.animator.stop_node(child);
            self.context.arena.detach(child);
            if let Some(bubble) = self.pattern_of_mut(child).and_then(Pattern::as_bubble_mut) {
                bubble.set_status(TransitionStatus::Invisible);
            }
        }
        for info in self.popup_map.values_mut() {
            info.is_current_on_show = false;
        }
    }

    /// Mount a caller-built indexer popup; one per target.
    pub fn show_indexer_popup(&mut self, target_id: i32, node: NodeId) {
        if self.indexer_popups.contains_key(&target_id) {
            return;
        }
        let root = self.context.root();
        if self.context.arena.mount(node, root) {
            self.indexer_popups.insert(target_id, node);
        }
    }

    pub fn remove_indexer_popup_by_id(&mut self, target_id: i32) {
        if let Some(node) = self.indexer_popups.remove(&target_id) {
            self.context.arena.detach(node);
        }
    }

    pub fn remove_indexer_popup(&mut self) {
        for (_, node) in std::mem::take(&mut self.indexer_popups) {
            self.context.arena.detach(node);
        }
    }

    pub fn has_indexer_popup(&self, target_id: i32) -> bool {
        self.indexer_popups.contains_key(&target_id)
    }
}
