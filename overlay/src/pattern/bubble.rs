use uitree::{AnimationOption, AnimationTarget, Curve};

use super::{Animatable, Focusable, Transition, TransitionEnv, VisibilityCallback};

const ENTRY_MS: u64 = 250;
const EXIT_MS: u64 = 150;
const ENTRY_SCALE: f32 = 0.9;

/// Re-entrancy guard for show and hide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransitionStatus {
    Visible,
    Exiting,
    #[default]
    Invisible,
}

#[derive(Default)]
pub struct PopupOptions {
    pub message: String,
    /// Popups with buttons take focus and block the content below.
    pub has_options: bool,
    pub show_in_subwindow: bool,
    pub on_state_change: Option<VisibilityCallback>,
}

impl PopupOptions {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_options(mut self) -> Self {
        self.has_options = true;
        self
    }

    pub fn in_subwindow(mut self) -> Self {
        self.show_in_subwindow = true;
        self
    }

    pub fn on_state_change(mut self, callback: impl FnMut(bool) + Send + 'static) -> Self {
        self.on_state_change = Some(Box::new(callback));
        self
    }
}

pub struct BubblePattern {
    pub target_id: i32,
    pub message: String,
    pub has_options: bool,
    pub show_in_subwindow: bool,
    status: TransitionStatus,
    on_state_change: Option<VisibilityCallback>,
}

impl BubblePattern {
    pub fn new(target_id: i32, options: PopupOptions) -> Self {
        Self {
            target_id,
            message: options.message,
            has_options: options.has_options,
            show_in_subwindow: options.show_in_subwindow,
            status: TransitionStatus::Invisible,
            on_state_change: options.on_state_change,
        }
    }

    pub fn status(&self) -> TransitionStatus {
        self.status
    }

    pub fn set_status(&mut self, status: TransitionStatus) {
        self.status = status;
    }

    pub fn fire_state_change(&mut self, visible: bool) {
        if let Some(callback) = self.on_state_change.as_mut() {
            callback(visible);
        }
    }
}

impl Focusable for BubblePattern {
    fn restores_focus(&self) -> bool {
        self.has_options
    }

    fn takes_focus_on_entry(&self) -> bool {
        self.has_options && !self.show_in_subwindow
    }
}

impl Animatable for BubblePattern {
    fn entry_transition(&self, _env: &TransitionEnv<'_>) -> Option<Transition> {
        Some(
            Transition::new(AnimationOption::millis(ENTRY_MS, Curve::FAST_OUT_SLOW_IN))
                .from(AnimationTarget::Opacity(0.0))
                .from(AnimationTarget::Scale(ENTRY_SCALE))
                .to(AnimationTarget::Opacity(1.0))
                .to(AnimationTarget::Scale(1.0)),
        )
    }

    fn exit_transition(&self, _env: &TransitionEnv<'_>) -> Option<Transition> {
        Some(
            Transition::new(AnimationOption::millis(EXIT_MS, Curve::SHARP))
                .to(AnimationTarget::Opacity(0.0)),
        )
    }
}
