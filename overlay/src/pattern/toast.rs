use std::time::Duration;

use uitree::{AnimationOption, AnimationTarget, Curve, Dimension, OffsetF};

use super::{Animatable, Transition, TransitionEnv};

const TOAST_ANIMATION_MS: u64 = 100;
const TOAST_OFFSET_PX: f32 = 15.0;
const TOAST_CURVE: Curve = Curve::cubic(0.2, 0.0, 0.1, 1.0);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToastShowMode {
    #[default]
    Default,
    /// Shown above every other overlay, in the subwindow when one exists.
    TopMost,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToastInfo {
    pub message: String,
    /// Floored by the theme minimum.
    pub duration: Option<Duration>,
    pub bottom: Option<Dimension>,
    pub show_mode: ToastShowMode,
}

impl ToastInfo {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn bottom(mut self, bottom: Dimension) -> Self {
        self.bottom = Some(bottom);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToastPattern {
    pub toast_id: i32,
    pub message: String,
    pub duration: Duration,
    pub bottom: f32,
}

impl Animatable for ToastPattern {
    fn entry_transition(&self, _env: &TransitionEnv<'_>) -> Option<Transition> {
        Some(
            Transition::new(AnimationOption::millis(TOAST_ANIMATION_MS, TOAST_CURVE))
                .from(AnimationTarget::Opacity(0.0))
                .from(AnimationTarget::Translate(OffsetF::new(0.0, TOAST_OFFSET_PX)))
                .to(AnimationTarget::Opacity(1.0))
                .to(AnimationTarget::Translate(OffsetF::ZERO)),
        )
    }

    fn exit_transition(&self, _env: &TransitionEnv<'_>) -> Option<Transition> {
        Some(
            Transition::new(AnimationOption::millis(TOAST_ANIMATION_MS, TOAST_CURVE))
                .to(AnimationTarget::Opacity(0.0))
                .to(AnimationTarget::Translate(OffsetF::new(0.0, TOAST_OFFSET_PX))),
        )
    }
}
