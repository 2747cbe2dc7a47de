use uitree::{AnimationOption, AnimationTarget, Curve, OffsetF};

use super::{Animatable, Transition, TransitionEnv};

const SHOW_CURVE: Curve = Curve::spring(0.0, 1.0, 342.0, 37.0);
const HIDE_CURVE: Curve = Curve::spring(4.0, 1.0, 342.0, 37.0);

/// Custom keyboard bound to a text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardPattern {
    pub target_id: i32,
}

impl Animatable for KeyboardPattern {
    fn entry_transition(&self, env: &TransitionEnv<'_>) -> Option<Transition> {
        Some(
            Transition::new(AnimationOption::spring(SHOW_CURVE))
                .from(AnimationTarget::Translate(OffsetF::new(0.0, env.root_height)))
                .to(AnimationTarget::Translate(OffsetF::ZERO)),
        )
    }

    fn exit_transition(&self, env: &TransitionEnv<'_>) -> Option<Transition> {
        Some(
            Transition::new(AnimationOption::spring(HIDE_CURVE))
                .to(AnimationTarget::Translate(OffsetF::new(0.0, env.root_height))),
        )
    }
}
