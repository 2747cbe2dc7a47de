//! Toasts: one at a time, popped after a delay.

use std::time::Duration;

use uitree::{NodeId, OffsetF};

use super::OverlayManager;
use crate::pattern::{Pattern, ToastInfo, ToastPattern};
use crate::task::{Completion, UiTask};

impl OverlayManager {
    /// Show a toast, replacing any toast already on screen. Returns its id.
    pub fn show_toast(&mut self, info: ToastInfo) -> i32 {
        if let Some((_, pending)) = self.pending_pop.take() {
            self.context.executor.cancel_delayed(pending);
        }
        for (_, old) in std::mem::take(&mut self.toast_map) {
            log::debug!("toast {old} replaced");
            self.context.animator.stop_node(old);
            self.context.arena.destroy(old);
        }

        self.toast_counter += 1;
        let toast_id = self.toast_counter;
        let theme = self.context.theme().toast().clone();
        let min = Duration::from_millis(theme.min_duration_ms);
        let duration = info
            .duration
            .unwrap_or(Duration::from_millis(theme.default_duration_ms))
            .max(min);
        let bottom = self.context.px(info.bottom.unwrap_or(theme.bottom));

        let root_size = self.context.root_size();
        let toast = self.context.arena.create(
            "toast",
            Pattern::Toast(ToastPattern {
                toast_id,
                message: info.message,
                duration,
                bottom,
            }),
        );
        if let Some(node) = self.context.arena.get_mut(toast) {
            node.frame.set_offset(OffsetF::new(0.0, root_size.height - bottom));
        }
        let root = self.context.root();
        self.context.arena.mount(toast, root);
        self.toast_map.insert(toast_id, toast);
        log::debug!("show toast {toast_id} for {duration:?}");
        self.play_transition(toast, true, Some(Completion::ToastShown { toast_id }));
        toast_id
    }

    pub(super) fn on_toast_shown(&mut self, toast_id: i32) {
        let Some(duration) = self
            .toast_node(toast_id)
            .and_then(|n| self.pattern_of(n))
            .and_then(Pattern::as_toast)
            .map(|t| t.duration)
        else {
            return;
        };
        let task = self
            .context
            .executor
            .post_delayed(UiTask::PopToast { toast_id }, duration);
        self.pending_pop = Some((toast_id, task));
    }

    /// Play the exit of `toast_id`; the node goes away when it ends.
    pub fn pop_toast(&mut self, toast_id: i32) {
        if self.pending_pop.is_some_and(|(id, _)| id == toast_id) {
            self.pending_pop = None;
        }
        let Some(toast) = self.toast_node(toast_id) else {
            log::debug!("pop toast skipped: {toast_id} is gone");
            return;
        };
        if self.context.arena.is_removing(toast) {
            return;
        }
        log::debug!("pop toast {toast_id}");
        self.context.arena.mark_removing(toast, true);
        self.play_transition(toast, false, Some(Completion::ToastPopped { toast_id }));
    }

    pub(super) fn on_toast_popped(&mut self, toast_id: i32) {
        if let Some(toast) = self.toast_map.remove(&toast_id) {
            self.context.arena.destroy(toast);
        }
    }

    /// Pop every toast now.
    pub fn clear_toast(&mut self) {
        if let Some((_, pending)) = self.pending_pop.take() {
            self.context.executor.cancel_delayed(pending);
        }
        let ids: Vec<i32> = self.toast_map.keys().copied().collect();
        for toast_id in ids {
            self.pop_toast(toast_id);
        }
    }

    pub fn toast_count(&self) -> usize {
        self.toast_map.len()
    }

    pub fn toast_node(&self, toast_id: i32) -> Option<NodeId> {
        self.toast_map
            .get(&toast_id)
            .copied()
            .filter(|node| self.context.arena.contains(*node))
    }
}
