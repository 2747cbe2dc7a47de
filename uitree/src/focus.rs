use crate::node::{NodeArena, NodeId};

/// Per-node focus flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusHub {
    pub focusable: bool,
    /// Cleared by an ancestor scope to keep this subtree out of focus.
    pub parent_focusable: bool,
    pub is_current: bool,
}

impl Default for FocusHub {
    fn default() -> Self {
        Self {
            focusable: true,
            parent_focusable: true,
            is_current: false,
        }
    }
}

impl FocusHub {
    pub fn can_focus(&self) -> bool {
        self.focusable && self.parent_focusable
    }
}

/// Tracks which node currently holds focus. At most one does.
#[derive(Debug, Default)]
pub struct FocusState {
    focused: Option<NodeId>,
    changed: bool,
}

impl FocusState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the currently focused node.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub fn is_focused(&self, id: NodeId) -> bool {
        self.focused == Some(id)
    }

    /// Move focus to `id`.
    /// Returns false if the node is gone or refuses focus.
    pub fn request_focus<P>(&mut self, arena: &mut NodeArena<P>, id: NodeId) -> bool {
        let Some(node) = arena.get(id) else {
            return false;
        };
        if !node.focus.can_focus() {
            log::trace!("focus request refused by {}", id);
            return false;
        }
        if self.focused == Some(id) {
            return true;
        }
        if let Some(previous) = self.focused.take() {
            if let Some(node) = arena.get_mut(previous) {
                node.focus.is_current = false;
            }
        }
        if let Some(node) = arena.get_mut(id) {
            node.focus.is_current = true;
        }
        self.focused = Some(id);
        self.changed = true;
        true
    }

    /// Drop focus if `id` holds it.
    /// Returns true if focus was lost.
    pub fn lost_focus<P>(&mut self, arena: &mut NodeArena<P>, id: NodeId) -> bool {
        if self.focused != Some(id) {
            return false;
        }
        if let Some(node) = arena.get_mut(id) {
            node.focus.is_current = false;
        }
        self.focused = None;
        self.changed = true;
        true
    }

    /// Clear focus held by a destroyed node.
    pub fn prune<P>(&mut self, arena: &NodeArena<P>) {
        if self.focused.is_some_and(|id| !arena.contains(id)) {
            self.focused = None;
            self.changed = true;
        }
    }

    /// Check and clear the focus-changed flag.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }
}
