//! Per-surface overlay coordinator.
//!
//! One [`OverlayManager`] exists per window or subwindow. It owns the
//! registries of live overlays and drives every show/hide lifecycle against
//! the surface's [`PipelineContext`]. Time only moves through [`pump`]:
//! animations advance, their completions are re-posted onto the UI queue as
//! tasks, and the queue is flushed. No completion ever touches the tree from
//! inside the animator.
//!
//! [`pump`]: OverlayManager::pump

mod back;
mod dialog;
mod focus;
mod keyboard;
mod menu;
mod modal;
mod popup;
mod sheet;
mod toast;

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use uitree::{
    AnimationId, AnimationOption, AnimationTarget, Curve, DelayedTaskId, Finished, NodeId,
};

pub use modal::ContentCoverRequest;
pub use popup::PopupInfo;
pub use sheet::SheetRequest;

use crate::context::PipelineContext;
use crate::pattern::{Callback, Pattern, Transition, TransitionEnv};
use crate::task::{Completion, OverlayHandle, OverlayRequest, UiTask};

/// Frame step used by [`OverlayManager::settle`].
pub const FRAME: Duration = Duration::from_millis(16);

/// Task rounds per flush; completions may post further tasks.
const MAX_FLUSH_ROUNDS: usize = 32;
/// Upper bound on frames run by one settle.
const MAX_SETTLE_FRAMES: usize = 2000;

pub struct OverlayManager {
    context: PipelineContext,
    popup_map: BTreeMap<i32, PopupInfo>,
    indexer_popups: BTreeMap<i32, NodeId>,
    menu_map: BTreeMap<i32, NodeId>,
    /// Dialog element id to node.
    dialog_map: BTreeMap<i32, NodeId>,
    dialog_count: usize,
    /// Dialog id to the element id of its mask in this surface.
    mask_node_ids: HashMap<i32, i32>,
    on_hide_dialog: Option<Callback>,
    toast_map: BTreeMap<i32, NodeId>,
    toast_counter: i32,
    pending_pop: Option<(i32, DelayedTaskId)>,
    modal_stack: Vec<NodeId>,
    modal_list: Vec<NodeId>,
    last_modal_node: Option<NodeId>,
    /// Target id to sheet node.
    sheet_map: BTreeMap<i32, NodeId>,
    custom_keyboards: BTreeMap<i32, NodeId>,
    /// Back press leaves modals of negative (extension) targets alone.
    prohibit_back: bool,
}

impl OverlayManager {
    pub fn new(context: PipelineContext) -> Self {
        log::debug!("overlay manager for {}", context.id());
        Self {
            context,
            popup_map: BTreeMap::new(),
            indexer_popups: BTreeMap::new(),
            menu_map: BTreeMap::new(),
            dialog_map: BTreeMap::new(),
            dialog_count: 0,
            mask_node_ids: HashMap::new(),
            on_hide_dialog: None,
            toast_map: BTreeMap::new(),
            toast_counter: 0,
            pending_pop: None,
            modal_stack: Vec::new(),
            modal_list: Vec::new(),
            last_modal_node: None,
            sheet_map: BTreeMap::new(),
            custom_keyboards: BTreeMap::new(),
            prohibit_back: false,
        }
    }

    pub fn context(&self) -> &PipelineContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut PipelineContext {
        &mut self.context
    }

    /// Handle for callbacks that want this manager to act later.
    pub fn handle(&self) -> OverlayHandle {
        OverlayHandle::new(self.context.executor.sender())
    }

    pub fn root(&self) -> NodeId {
        self.context.root()
    }

    /// Children of root above the stage, bottom to top.
    pub fn overlay_children(&self) -> Vec<NodeId> {
        let stage = self.context.stage();
        self.context
            .arena
            .children(self.context.root())
            .iter()
            .copied()
            .filter(|id| *id != stage)
            .collect()
    }

    pub fn is_on_root(&self, node: NodeId) -> bool {
        self.context.arena.is_child_of(node, self.context.root())
    }

    /// Advance time by `dt` and run everything that became due.
    pub fn pump(&mut self, dt: Duration) {
        let finished = self
            .context
            .animator
            .advance(&mut self.context.arena, dt);
        for done in finished {
            self.context.executor.post(UiTask::Animation(done));
        }
        self.context.executor.advance(dt);
        self.flush();
    }

    /// Run queued tasks, including tasks they post, without moving time.
    pub fn flush(&mut self) {
        for _ in 0..MAX_FLUSH_ROUNDS {
            let tasks = self.context.executor.drain();
            if tasks.is_empty() {
                break;
            }
            for task in tasks {
                self.handle_task(task);
            }
        }
        self.context.focus.prune(&self.context.arena);
    }

    /// Run frames until no animation or delayed task is pending.
    pub fn settle(&mut self) {
        self.flush();
        for _ in 0..MAX_SETTLE_FRAMES {
            if !self.context.animator.has_active() && self.context.executor.next_due_in().is_none()
            {
                return;
            }
            self.pump(FRAME);
        }
        log::warn!("{} did not settle", self.context.id());
    }

    /// Run frames until no animation is pending; delayed tasks may remain.
    pub fn settle_animations(&mut self) {
        self.flush();
        for _ in 0..MAX_SETTLE_FRAMES {
            if !self.context.animator.has_active() {
                return;
            }
            self.pump(FRAME);
        }
    }

    fn handle_task(&mut self, task: UiTask) {
        match task {
            UiTask::Animation(finished) => self.on_animation_finished(finished),
            UiTask::PopToast { toast_id } => self.pop_toast(toast_id),
            UiTask::Request(request) => self.handle_request(request),
        }
    }

    fn handle_request(&mut self, request: OverlayRequest) {
        log::debug!("request {request:?}");
        match request {
            OverlayRequest::CloseSheet(target_id) => self.close_sheet(target_id),
            OverlayRequest::DismissSheet => self.dismiss_sheet(),
            OverlayRequest::CloseCustomDialog(dialog_id) => self.close_custom_dialog(dialog_id),
            OverlayRequest::ClearToast => self.clear_toast(),
            OverlayRequest::HideAllMenus => self.hide_all_menus(),
        }
    }

    fn on_animation_finished(&mut self, finished: Finished<Completion>) {
        let Finished { id, node, payload } = finished;
        log::trace!("{id} finished on {node}: {payload:?}");
        match payload {
            Completion::PopupEntered { target_id } => self.on_popup_entered(target_id, node),
            Completion::PopupExited { target_id } => self.on_popup_exited(target_id, node),
            Completion::MenuShown { wrapper } => self.on_menu_shown(wrapper),
            Completion::MenuHidden { wrapper } => self.on_menu_hidden(wrapper, id),
            Completion::DialogOpened => self.on_dialog_opened(node),
            Completion::DialogClosed => self.on_dialog_closed(node),
            Completion::ToastShown { toast_id } => self.on_toast_shown(toast_id),
            Completion::ToastPopped { toast_id } => self.on_toast_popped(toast_id),
            Completion::ModalExited => self.on_modal_exited(node),
            Completion::SheetSettled => self.on_sheet_settled(node, id),
            Completion::SheetClosed => self.on_sheet_closed(node),
            Completion::SheetDismissed => self.on_sheet_dismissed(node),
            Completion::SheetBubbleEntered => self.on_sheet_bubble_entered(node),
            Completion::SheetMaskExited | Completion::KeyboardHidden => {
                self.context.arena.destroy(node);
            }
        }
    }

    fn with_transition_env<R>(&self, f: impl FnOnce(&TransitionEnv<'_>) -> R) -> R {
        let theme = self.context.theme_ref();
        let env = TransitionEnv {
            theme: theme.as_ref(),
            root_height: self.context.root_height(),
            density: self.context.density(),
        };
        f(&env)
    }

    /// Play the entry or exit transition of `node`'s pattern.
    ///
    /// Patterns without a transition still report `on_finish`, one frame
    /// later, so callers never special-case instant overlays.
    fn play_transition(
        &mut self,
        node: NodeId,
        entry: bool,
        on_finish: Option<Completion>,
    ) -> Option<AnimationId> {
        let transition = {
            let pattern = self.context.arena.pattern(node)?;
            let animatable = pattern.as_animatable()?;
            self.with_transition_env(|env| {
                if entry {
                    animatable.entry_transition(env)
                } else {
                    animatable.exit_transition(env)
                }
            })
        };
        Some(match transition {
            Some(transition) => self.run_transition(node, transition, on_finish),
            None => self.animate(
                node,
                AnimationOption::new(Duration::ZERO, Curve::Linear),
                std::iter::empty::<AnimationTarget>(),
                on_finish,
            ),
        })
    }

    fn run_transition(
        &mut self,
        node: NodeId,
        transition: Transition,
        on_finish: Option<Completion>,
    ) -> AnimationId {
        if let Some(n) = self.context.arena.get_mut(node) {
            for from in transition.from {
                from.apply_to(n);
            }
        }
        self.animate(node, transition.option, transition.to, on_finish)
    }

    fn animate(
        &mut self,
        node: NodeId,
        option: AnimationOption,
        targets: impl IntoIterator<Item = AnimationTarget>,
        on_finish: Option<Completion>,
    ) -> AnimationId {
        self.context
            .animator
            .animate(&mut self.context.arena, node, option, targets, on_finish)
    }

    /// Write render values without animating.
    fn apply(&mut self, node: NodeId, targets: impl IntoIterator<Item = AnimationTarget>) {
        if let Some(n) = self.context.arena.get_mut(node) {
            for target in targets {
                target.apply_to(n);
            }
        }
    }

    fn pattern_of(&self, node: NodeId) -> Option<&Pattern> {
        self.context.arena.pattern(node)
    }

    fn pattern_of_mut(&mut self, node: NodeId) -> Option<&mut Pattern> {
        self.context.arena.pattern_mut(node)
    }

    /// Stop every animation in `node`'s subtree and free it.
    fn discard(&mut self, node: NodeId) {
        for id in self.context.arena.descendants(node) {
            self.context.animator.stop_node(id);
        }
        self.context.arena.destroy(node);
    }

    /// Hide a subwindow left with nothing but its stage.
    fn hide_subwindow_if_empty(&mut self) {
        if self.context.is_subwindow() && self.overlay_children().is_empty() {
            self.context.hide_subwindow();
        }
    }
}
