//! Custom keyboards bound to text inputs.

use uitree::NodeId;

use super::OverlayManager;
use crate::pattern::{ContentBuilder, KeyboardPattern, Pattern};
use crate::task::Completion;

impl OverlayManager {
    /// Slide in a custom keyboard for `target_id`; one per target.
    pub fn bind_keyboard(&mut self, builder: Option<ContentBuilder>, target_id: i32) {
        if self.custom_keyboards.contains_key(&target_id) {
            return;
        }
        let root_size = self.context.root_size();
        let arena = &mut self.context.arena;
        let keyboard = arena.create("keyboard", Pattern::Keyboard(KeyboardPattern { target_id }));
        if let Some(content) = builder.and_then(|build| build(arena)) {
            arena.mount(content, keyboard);
        }
        if let Some(node) = arena.get_mut(keyboard) {
            node.frame.width = root_size.width;
        }
        let root = self.context.root();
        self.context.arena.mount(keyboard, root);
        self.custom_keyboards.insert(target_id, keyboard);
        log::debug!("keyboard {keyboard} bound to target {target_id}");
        self.play_transition(keyboard, true, None);
    }

    /// Slide the keyboard of `target_id` out; it is freed once hidden.
    pub fn close_keyboard(&mut self, target_id: i32) {
        let Some(keyboard) = self.custom_keyboards.remove(&target_id) else {
            return;
        };
        log::debug!("keyboard {keyboard} of target {target_id} closing");
        self.play_transition(keyboard, false, Some(Completion::KeyboardHidden));
    }

    /// Free every custom keyboard at once.
    pub fn destroy_keyboard(&mut self) {
        for (_, keyboard) in std::mem::take(&mut self.custom_keyboards) {
            self.discard(keyboard);
        }
    }

    pub fn keyboard_count(&self) -> usize {
        self.custom_keyboards.len()
    }

    pub fn keyboard_node(&self, target_id: i32) -> Option<NodeId> {
        self.custom_keyboards.get(&target_id).copied()
    }
}
