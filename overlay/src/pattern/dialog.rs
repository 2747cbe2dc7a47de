use uitree::{AnimationOption, AnimationTarget, Color, Curve};

use super::{Animatable, Callback, Focusable, Transition, TransitionEnv};

/// Everything a dialog is opened with.
pub struct DialogProperties {
    pub title: Option<String>,
    pub content: Option<String>,
    /// Back press and mask click cancel the dialog.
    pub auto_cancel: bool,
    pub is_modal: bool,
    pub show_in_subwindow: bool,
    pub mask_color: Option<Color>,
    /// Overrides the theme entry animation.
    pub open_animation: Option<AnimationOption>,
    /// Overrides the theme exit animation.
    pub close_animation: Option<AnimationOption>,
    /// Vetoes a back-press close when set.
    pub on_will_dismiss: Option<Callback>,
    pub on_cancel: Option<Callback>,
    pub on_did_appear: Option<Callback>,
}

impl Default for DialogProperties {
    fn default() -> Self {
        Self {
            title: None,
            content: None,
            auto_cancel: true,
            is_modal: true,
            show_in_subwindow: false,
            mask_color: None,
            open_animation: None,
            close_animation: None,
            on_will_dismiss: None,
            on_cancel: None,
            on_did_appear: None,
        }
    }
}

impl DialogProperties {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn in_subwindow(mut self) -> Self {
        self.show_in_subwindow = true;
        self
    }

    pub fn modal(mut self, is_modal: bool) -> Self {
        self.is_modal = is_modal;
        self
    }

    pub fn open_animation(mut self, option: AnimationOption) -> Self {
        self.open_animation = Some(option);
        self
    }

    pub fn close_animation(mut self, option: AnimationOption) -> Self {
        self.close_animation = Some(option);
        self
    }

    pub fn on_will_dismiss(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_will_dismiss = Some(Box::new(callback));
        self
    }

    pub fn on_cancel(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_cancel = Some(Box::new(callback));
        self
    }

    pub fn on_did_appear(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_did_appear = Some(Box::new(callback));
        self
    }
}

pub struct DialogPattern {
    pub title: Option<String>,
    pub content: Option<String>,
    pub auto_cancel: bool,
    pub is_modal: bool,
    pub show_in_subwindow: bool,
    open_animation: Option<AnimationOption>,
    close_animation: Option<AnimationOption>,
    on_will_dismiss: Option<Callback>,
    on_cancel: Option<Callback>,
    on_did_appear: Option<Callback>,
}

impl DialogPattern {
    pub fn new(properties: DialogProperties) -> Self {
        Self {
            title: properties.title,
            content: properties.content,
            auto_cancel: properties.auto_cancel,
            is_modal: properties.is_modal,
            show_in_subwindow: properties.show_in_subwindow,
            open_animation: properties.open_animation,
            close_animation: properties.close_animation,
            on_will_dismiss: properties.on_will_dismiss,
            on_cancel: properties.on_cancel,
            on_did_appear: properties.on_did_appear,
        }
    }

    pub fn has_custom_open_animation(&self) -> bool {
        self.open_animation.is_some()
    }

    pub fn has_custom_close_animation(&self) -> bool {
        self.close_animation.is_some()
    }

    pub fn should_dismiss_on_back_press(&self) -> bool {
        self.on_will_dismiss.is_some()
    }

    pub fn call_on_will_dismiss(&mut self) {
        if let Some(callback) = self.on_will_dismiss.as_mut() {
            callback();
        }
    }

    pub fn call_on_cancel(&mut self) {
        if let Some(callback) = self.on_cancel.as_mut() {
            callback();
        }
    }

    pub fn call_on_did_appear(&mut self) {
        if let Some(callback) = self.on_did_appear.as_mut() {
            callback();
        }
    }
}

impl Focusable for DialogPattern {
    fn restores_focus(&self) -> bool {
        true
    }
}

impl Animatable for DialogPattern {
    fn entry_transition(&self, env: &TransitionEnv<'_>) -> Option<Transition> {
        let theme = env.theme.dialog();
        let option = self
            .open_animation
            .unwrap_or_else(|| AnimationOption::new(theme.opacity_duration_in(), Curve::SHARP));
        Some(
            Transition::new(option)
                .from(AnimationTarget::Opacity(theme.opacity_start))
                .to(AnimationTarget::Opacity(theme.opacity_end)),
        )
    }

    fn exit_transition(&self, env: &TransitionEnv<'_>) -> Option<Transition> {
        let theme = env.theme.dialog();
        let option = self
            .close_animation
            .unwrap_or_else(|| AnimationOption::new(theme.duration_out(), Curve::SHARP));
        Some(
            Transition::new(option)
                .from(AnimationTarget::Opacity(theme.opacity_end))
                .to(AnimationTarget::Opacity(theme.opacity_start)),
        )
    }
}
