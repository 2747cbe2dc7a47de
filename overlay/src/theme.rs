//! Theme provider for overlay animation and sheet appearance.
//!
//! The manager never reaches for global theme state; every surface holds a
//! [`ThemeRef`] and reads the section it needs.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use uitree::{Color, Dimension};

use crate::error::ThemeError;

/// Source of overlay theme sections.
pub trait ThemeProvider: Send + Sync + fmt::Debug {
    fn dialog(&self) -> &DialogTheme;
    fn menu(&self) -> &MenuTheme;
    fn sheet(&self) -> &SheetTheme;
    fn toast(&self) -> &ToastTheme;
}

pub type ThemeRef = Arc<dyn ThemeProvider>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DialogTheme {
    pub opacity_duration_in_ms: u64,
    pub animation_duration_in_ms: u64,
    pub animation_duration_out_ms: u64,
    pub opacity_start: f32,
    pub opacity_end: f32,
    pub scale_start: f32,
    pub scale_end: f32,
}

impl Default for DialogTheme {
    fn default() -> Self {
        Self {
            opacity_duration_in_ms: 150,
            animation_duration_in_ms: 250,
            animation_duration_out_ms: 250,
            opacity_start: 0.0,
            opacity_end: 1.0,
            scale_start: 0.85,
            scale_end: 1.0,
        }
    }
}

impl DialogTheme {
    pub fn opacity_duration_in(&self) -> Duration {
        Duration::from_millis(self.opacity_duration_in_ms)
    }

    pub fn duration_in(&self) -> Duration {
        Duration::from_millis(self.animation_duration_in_ms)
    }

    pub fn duration_out(&self) -> Duration {
        Duration::from_millis(self.animation_duration_out_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MenuTheme {
    pub context_menu_appear_duration_ms: u64,
    pub disappear_duration_ms: u64,
    pub preview_disappear_spring_response: f32,
    pub preview_disappear_spring_damping: f32,
    pub menu_animation_scale: f32,
    pub menu_drag_animation_scale: f32,
}

impl Default for MenuTheme {
    fn default() -> Self {
        Self {
            context_menu_appear_duration_ms: 250,
            disappear_duration_ms: 250,
            preview_disappear_spring_response: 0.304,
            preview_disappear_spring_damping: 0.97,
            menu_animation_scale: 0.4,
            menu_drag_animation_scale: 0.95,
        }
    }
}

/// How the sheet picks its layout when the style does not force one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetThemeMode {
    #[default]
    Auto,
    Popup,
    /// Anything else keeps sheets at the bottom.
    #[serde(other)]
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SheetTheme {
    pub sheet_radius: Dimension,
    pub title_text_margin: Dimension,
    pub background_color: Color,
    pub mask_color: Color,
    pub sheet_type: SheetThemeMode,
}

impl Default for SheetTheme {
    fn default() -> Self {
        Self {
            sheet_radius: Dimension::vp(32.0),
            title_text_margin: Dimension::vp(16.0),
            background_color: Color::from_argb(0xfff1_f3f5),
            mask_color: Color::from_argb(0x3318_2431),
            sheet_type: SheetThemeMode::Auto,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ToastTheme {
    /// Floor applied to every toast duration.
    pub min_duration_ms: u64,
    pub default_duration_ms: u64,
    pub bottom: Dimension,
}

impl Default for ToastTheme {
    fn default() -> Self {
        Self {
            min_duration_ms: 1500,
            default_duration_ms: 1500,
            bottom: Dimension::vp(80.0),
        }
    }
}

/// Built-in theme, loadable from JSON with every field optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DefaultTheme {
    pub dialog: DialogTheme,
    pub menu: MenuTheme,
    pub sheet: SheetTheme,
    pub toast: ToastTheme,
}

impl DefaultTheme {
    pub fn from_json(json: &str) -> Result<Self, ThemeError> {
        let theme: DefaultTheme = serde_json::from_str(json)?;
        theme.validate()?;
        Ok(theme)
    }

    pub fn into_ref(self) -> ThemeRef {
        Arc::new(self)
    }

    fn validate(&self) -> Result<(), ThemeError> {
        if !(0.0..=1.0).contains(&self.dialog.opacity_start)
            || !(0.0..=1.0).contains(&self.dialog.opacity_end)
        {
            return Err(ThemeError::InvalidValue {
                field: "dialog.opacity",
                reason: "opacity must be within [0, 1]".to_string(),
            });
        }
        if self.menu.preview_disappear_spring_response <= 0.0 {
            return Err(ThemeError::InvalidValue {
                field: "menu.preview_disappear_spring_response",
                reason: "response must be positive".to_string(),
            });
        }
        if self.sheet.sheet_radius.is_percent() {
            return Err(ThemeError::InvalidValue {
                field: "sheet.sheet_radius",
                reason: "radius cannot be a percentage".to_string(),
            });
        }
        Ok(())
    }
}

impl ThemeProvider for DefaultTheme {
    fn dialog(&self) -> &DialogTheme {
        &self.dialog
    }

    fn menu(&self) -> &MenuTheme {
        &self.menu
    }

    fn sheet(&self) -> &SheetTheme {
        &self.sheet
    }

    fn toast(&self) -> &ToastTheme {
        &self.toast
    }
}
