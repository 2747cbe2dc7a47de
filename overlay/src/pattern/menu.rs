use uitree::{AnimationId, AnimationOption, AnimationTarget, Curve, OffsetF};

use super::{Animatable, Callback, Focusable, Transition, TransitionEnv};

const MENU_ANIMATION_MS: u64 = 150;

/// Lifecycle of one menu instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MenuState {
    Mounting,
    AnimatingIn,
    Shown,
    AnimatingOut,
    #[default]
    Unmounted,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PreviewMode {
    #[default]
    None,
    Image,
    Custom,
}

#[derive(Default)]
pub struct MenuOptions {
    pub items: Vec<String>,
    pub preview_mode: PreviewMode,
    pub is_context_menu: bool,
    /// Slide distance played with the fade, relative to the final position.
    pub animation_offset: OffsetF,
    pub about_to_appear: Option<Callback>,
    pub on_appear: Option<Callback>,
    pub about_to_disappear: Option<Callback>,
    pub on_disappear: Option<Callback>,
}

impl MenuOptions {
    pub fn items(items: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn context_menu(mut self, preview_mode: PreviewMode) -> Self {
        self.is_context_menu = true;
        self.preview_mode = preview_mode;
        self
    }

    pub fn animation_offset(mut self, offset: OffsetF) -> Self {
        self.animation_offset = offset;
        self
    }

    pub fn on_appear(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_appear = Some(Box::new(callback));
        self
    }

    pub fn on_disappear(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_disappear = Some(Box::new(callback));
        self
    }

    pub fn about_to_appear(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.about_to_appear = Some(Box::new(callback));
        self
    }

    pub fn about_to_disappear(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.about_to_disappear = Some(Box::new(callback));
        self
    }
}

/// The menu itself, child 0 of its wrapper.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuPattern {
    pub target_id: i32,
    pub items: Vec<String>,
    pub offset: OffsetF,
    /// Where a preview menu snaps back to on exit.
    pub end_offset: OffsetF,
}

/// Full-surface wrapper that owns a menu and its optional preview.
pub struct MenuWrapperPattern {
    pub target_id: i32,
    pub state: MenuState,
    pub preview_mode: PreviewMode,
    pub is_context_menu: bool,
    pub in_subwindow: bool,
    pub animation_offset: OffsetF,
    /// Exit animation whose completion performs the detach.
    pub exit_animation: Option<AnimationId>,
    about_to_appear: Option<Callback>,
    on_appear: Option<Callback>,
    about_to_disappear: Option<Callback>,
    on_disappear: Option<Callback>,
}

impl MenuWrapperPattern {
    pub fn new(target_id: i32, options: &mut MenuOptions) -> Self {
        Self {
            target_id,
            state: MenuState::Unmounted,
            preview_mode: options.preview_mode,
            is_context_menu: options.is_context_menu,
            in_subwindow: false,
            animation_offset: options.animation_offset,
            exit_animation: None,
            about_to_appear: options.about_to_appear.take(),
            on_appear: options.on_appear.take(),
            about_to_disappear: options.about_to_disappear.take(),
            on_disappear: options.on_disappear.take(),
        }
    }

    pub fn has_preview(&self) -> bool {
        self.is_context_menu && self.preview_mode != PreviewMode::None
    }

    pub fn call_about_to_appear(&mut self) {
        if let Some(callback) = self.about_to_appear.as_mut() {
            callback();
        }
    }

    pub fn call_on_appear(&mut self) {
        if let Some(callback) = self.on_appear.as_mut() {
            callback();
        }
    }

    pub fn call_about_to_disappear(&mut self) {
        if let Some(callback) = self.about_to_disappear.as_mut() {
            callback();
        }
    }

    pub fn call_on_disappear(&mut self) {
        if let Some(callback) = self.on_disappear.as_mut() {
            callback();
        }
    }
}

impl Focusable for MenuWrapperPattern {
    fn restores_focus(&self) -> bool {
        self.state != MenuState::AnimatingOut
    }
}

impl Animatable for MenuWrapperPattern {
    fn entry_transition(&self, env: &TransitionEnv<'_>) -> Option<Transition> {
        let option = if self.preview_mode == PreviewMode::Custom {
            AnimationOption::millis(
                env.theme.menu().context_menu_appear_duration_ms,
                Curve::FAST_OUT_SLOW_IN,
            )
        } else {
            AnimationOption::millis(MENU_ANIMATION_MS, Curve::FAST_OUT_SLOW_IN)
        };
        Some(
            Transition::new(option)
                .from(AnimationTarget::Opacity(0.0))
                .from(AnimationTarget::Translate(self.animation_offset))
                .to(AnimationTarget::Opacity(1.0))
                .to(AnimationTarget::Translate(OffsetF::ZERO)),
        )
    }

    fn exit_transition(&self, _env: &TransitionEnv<'_>) -> Option<Transition> {
        Some(
            Transition::new(AnimationOption::millis(MENU_ANIMATION_MS, Curve::FAST_OUT_SLOW_IN))
                .to(AnimationTarget::Opacity(0.0))
                .to(AnimationTarget::Translate(self.animation_offset)),
        )
    }
}
