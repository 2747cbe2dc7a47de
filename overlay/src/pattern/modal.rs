use uitree::{AnimationOption, AnimationTarget, Curve, OffsetF};

use super::{Animatable, Callback, Focusable, Transition, TransitionEnv, VisibilityCallback};
use crate::style::ModalTransition;

const ALPHA_MS: u64 = 200;
const SLIDE_CURVE: Curve = Curve::spring(0.0, 1.0, 100.0, 20.0);

/// A full-cover modal page.
pub struct ModalPresentationPattern {
    pub target_id: i32,
    pub transition: ModalTransition,
    pub is_ui_extension: bool,
    executed_on_disappear: bool,
    on_disappear: Option<Callback>,
    callback: Option<VisibilityCallback>,
}

impl ModalPresentationPattern {
    pub fn new(target_id: i32, transition: ModalTransition) -> Self {
        Self {
            target_id,
            transition,
            is_ui_extension: false,
            executed_on_disappear: false,
            on_disappear: None,
            callback: None,
        }
    }

    pub fn update_on_disappear(&mut self, on_disappear: Option<Callback>) {
        self.on_disappear = on_disappear;
        self.executed_on_disappear = false;
    }

    pub fn update_callback(&mut self, callback: Option<VisibilityCallback>) {
        self.callback = callback;
    }

    pub fn is_executed_on_disappear(&self) -> bool {
        self.executed_on_disappear
    }

    /// Runs the disappear callback at most once.
    pub fn on_disappear(&mut self) {
        if self.executed_on_disappear {
            return;
        }
        self.executed_on_disappear = true;
        if let Some(callback) = self.on_disappear.as_mut() {
            callback();
        }
    }

    pub fn fire_callback(&mut self, visible: bool) {
        if let Some(callback) = self.callback.as_mut() {
            callback(visible);
        }
    }

    /// Transitions are reserved for content the host does not animate.
    fn effective_transition(&self) -> ModalTransition {
        if self.is_ui_extension {
            ModalTransition::None
        } else {
            self.transition
        }
    }
}

impl Focusable for ModalPresentationPattern {
    fn restores_focus(&self) -> bool {
        true
    }
}

impl Animatable for ModalPresentationPattern {
    fn entry_transition(&self, env: &TransitionEnv<'_>) -> Option<Transition> {
        match self.effective_transition() {
            ModalTransition::Default => Some(
                Transition::new(AnimationOption::spring(SLIDE_CURVE))
                    .from(AnimationTarget::Translate(OffsetF::new(0.0, env.root_height)))
                    .to(AnimationTarget::Translate(OffsetF::ZERO)),
            ),
            ModalTransition::Alpha => Some(
                Transition::new(AnimationOption::millis(ALPHA_MS, Curve::FRICTION))
                    .from(AnimationTarget::Opacity(0.0))
                    .to(AnimationTarget::Opacity(1.0)),
            ),
            ModalTransition::None => None,
        }
    }

    fn exit_transition(&self, env: &TransitionEnv<'_>) -> Option<Transition> {
        match self.effective_transition() {
            ModalTransition::Default => Some(
                Transition::new(AnimationOption::spring(SLIDE_CURVE))
                    .to(AnimationTarget::Translate(OffsetF::new(0.0, env.root_height))),
            ),
            ModalTransition::Alpha => Some(
                Transition::new(AnimationOption::millis(ALPHA_MS, Curve::FRICTION))
                    .from(AnimationTarget::Opacity(1.0))
                    .to(AnimationTarget::Opacity(0.0)),
            ),
            ModalTransition::None => None,
        }
    }
}
