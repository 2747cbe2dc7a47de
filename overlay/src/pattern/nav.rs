use super::VisibilityCallback;

/// A navigation destination that wants to know when a modal covers it.
pub struct NavDestinationPattern {
    pub name: String,
    visible: bool,
    on_state_change: Option<VisibilityCallback>,
}

impl NavDestinationPattern {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            on_state_change: None,
        }
    }

    pub fn on_state_change(mut self, callback: impl FnMut(bool) + Send + 'static) -> Self {
        self.on_state_change = Some(Box::new(callback));
        self
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Notify only on an actual change.
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible == visible {
            return;
        }
        self.visible = visible;
        if let Some(callback) = self.on_state_change.as_mut() {
            callback(visible);
        }
    }
}
