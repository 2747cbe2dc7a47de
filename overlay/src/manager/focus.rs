//! Focus transfer between overlays and the page below them.
//!
//! Four rules hold for every overlay kind: before show the lower node loses
//! focus and focusability, after show the overlay takes focus, before hide
//! the lower node becomes focusable again, and after hide the overlay loses
//! focus and the node below it takes it back.

use uitree::NodeId;

use super::OverlayManager;
use crate::pattern::Pattern;

impl OverlayManager {
    /// The node that carries focus for a root child.
    ///
    /// A sheet wrapper delegates to its sheet.
    fn focus_node_of(&self, root_child: NodeId) -> NodeId {
        match self.pattern_of(root_child) {
            Some(Pattern::SheetWrapper) => self
                .context
                .arena
                .first_child(root_child)
                .unwrap_or(root_child),
            _ => root_child,
        }
    }

    fn set_parent_focusable(&mut self, node: NodeId, focusable: bool) {
        if let Some(n) = self.context.arena.get_mut(node) {
            n.focus.parent_focusable = focusable;
        }
    }

    /// Whether the focused node lives in `node`'s subtree.
    fn holds_focus(&self, node: NodeId) -> bool {
        let Some(focused) = self.context.focus.focused() else {
            return false;
        };
        let mut current = Some(focused);
        while let Some(id) = current {
            if id == node {
                return true;
            }
            current = self.context.arena.parent(id);
        }
        false
    }

    fn lose_focus(&mut self, node: NodeId) {
        if let Some(focused) = self.context.focus.focused()
            && self.holds_focus(node)
        {
            self.context.focus.lost_focus(&mut self.context.arena, focused);
        }
    }

    pub fn focus_overlay_node(&mut self, node: NodeId) {
        let node = self.focus_node_of(node);
        self.set_parent_focusable(node, true);
        if !self.context.focus.request_focus(&mut self.context.arena, node) {
            log::debug!("overlay {node} refused focus");
        }
    }

    /// Drop focus from `current` and hand it to the next overlay that
    /// restores focus, or to the page.
    pub fn blur_overlay_node(&mut self, current: NodeId) {
        let focus_node = self.focus_node_of(current);
        self.set_parent_focusable(focus_node, false);
        self.lose_focus(focus_node);

        for child in self.overlay_children().into_iter().rev() {
            if child == current || self.context.arena.is_removing(child) {
                continue;
            }
            let candidate = self.focus_node_of(child);
            let restores = self
                .pattern_of(candidate)
                .and_then(Pattern::as_focusable)
                .is_some_and(|f| f.restores_focus());
            if restores {
                self.focus_overlay_node(candidate);
                return;
            }
        }
        if self.context.is_subwindow() {
            return;
        }
        let Some(page) = self.context.last_page() else {
            return;
        };
        self.set_parent_focusable(page, true);
        self.context.focus.request_focus(&mut self.context.arena, page);
    }

    /// Walk root children below `current`, top to bottom, and apply
    /// `focusable` to the first one that matters: the page behind the
    /// stage, or an overlay holding focus.
    fn set_lower_node_focusable(&mut self, current: NodeId, focusable: bool) {
        let stage = self.context.stage();
        let children = self.context.arena.children(self.context.root()).to_vec();
        for child in children.into_iter().rev() {
            if child == current {
                continue;
            }
            if child == stage {
                let Some(page) = self.context.last_page() else {
                    return;
                };
                self.set_parent_focusable(page, focusable);
                if !focusable {
                    self.lose_focus(page);
                }
                return;
            }
            let node = self.focus_node_of(child);
            if self.holds_focus(node) {
                self.set_parent_focusable(node, focusable);
                if !focusable {
                    self.lose_focus(node);
                }
                return;
            }
        }
    }

    pub fn blur_lower_node(&mut self, current: NodeId) {
        self.set_lower_node_focusable(current, false);
    }

    pub fn reset_lower_node_focusable(&mut self, current: NodeId) {
        self.set_lower_node_focusable(current, true);
    }

    /// Focus moves to the top modal; the page and every other modal lose it.
    pub fn fire_modal_page_show(&mut self) {
        if let Some(page) = self.context.last_page() {
            self.set_parent_focusable(page, false);
            self.lose_focus(page);
        }
        for modal in self.modal_list.clone() {
            self.modal_page_lost_focus(modal);
        }
        let Some(top) = self.modal_list.last().copied() else {
            return;
        };
        self.set_parent_focusable(top, true);
        self.context.focus.request_focus(&mut self.context.arena, top);
    }

    pub fn modal_page_lost_focus(&mut self, node: NodeId) {
        self.set_parent_focusable(node, false);
        self.lose_focus(node);
    }

    /// Focus returns to whatever the popped modal covered.
    pub fn fire_modal_page_hide(&mut self) {
        let Some(last) = self.last_modal_node else {
            return;
        };
        if !self.context.arena.contains(last) {
            return;
        }
        self.set_parent_focusable(last, true);
        self.context.focus.request_focus(&mut self.context.arena, last);
    }

    /// Remember the node directly below the top modal: the previous modal,
    /// or the page when only one modal is left.
    pub fn save_last_modal_node(&mut self) {
        let page = self.context.last_page();
        self.last_modal_node = match self.modal_stack.len() {
            0 | 1 => page,
            len => Some(self.modal_stack[len - 2]),
        };
    }

    pub fn last_modal_node(&self) -> Option<NodeId> {
        self.last_modal_node
    }

    /// Notify navigation destinations under `node` of a visibility change.
    fn fire_navigation_under(&mut self, node: NodeId, visible: bool) {
        for id in self.context.arena.descendants(node) {
            if let Some(nav) = self
                .context
                .arena
                .pattern_mut(id)
                .and_then(Pattern::as_nav_destination_mut)
            {
                nav.set_visible(visible);
            }
        }
    }

    /// Hidden events go to `node` when given, otherwise to everything but
    /// the top modal. Shown events go to the top modal when one exists,
    /// otherwise to every root child.
    pub(crate) fn fire_navigation_state_change(&mut self, show: bool, node: Option<NodeId>) {
        if !show && let Some(node) = node {
            self.fire_navigation_under(node, false);
            return;
        }
        let top = self.modal_stack.last().copied();
        if show && let Some(top) = top {
            self.fire_navigation_under(top, true);
            return;
        }
        let children = self.context.arena.children(self.context.root()).to_vec();
        for child in children {
            if !show && Some(self.focus_node_of(child)) == top {
                continue;
            }
            self.fire_navigation_under(child, show);
        }
    }
}
