//! Sheet presentation: per-sheet state, drag and detent logic, layout and
//! clip shapes.

pub mod clip;
pub mod layout;
mod pattern;

use uitree::{Dimension, SizeF};

pub use layout::{SheetMetrics, SheetPresentationLayoutAlgorithm};
pub use pattern::{
    DragFrame, DragOutcome, KeyboardEnv, SheetDragState, SheetPresentationPattern, friction,
};

use crate::style::SheetType;
use crate::theme::SheetThemeMode;

/// Release speed, in px/s, above which direction alone picks the detent.
pub const SHEET_VELOCITY_THRESHOLD: f32 = 1000.0;
pub const CURVE_MASS: f32 = 1.0;
pub const CURVE_STIFFNESS: f32 = 328.0;
pub const CURVE_DAMPING: f32 = 36.0;
pub const MEDIUM_SIZE: f32 = 0.6;
pub const POPUP_LARGE_SIZE: f32 = 0.9;
pub const FRICTION_FACTOR: f32 = 1.848;

pub const SHEET_BLANK_MINI_HEIGHT: Dimension = Dimension::vp(8.0);
pub const SHEET_ARROW_HEIGHT: Dimension = Dimension::vp(8.0);
pub const SHEET_LANDSCAPE_WIDTH: Dimension = Dimension::vp(480.0);
pub const SHEET_POPUP_WIDTH: Dimension = Dimension::vp(360.0);
pub const SHEET_BIG_WINDOW_HEIGHT: Dimension = Dimension::vp(560.0);
pub const SHEET_BIG_WINDOW_MIN_HEIGHT: Dimension = Dimension::vp(320.0);
pub const SHEET_TARGET_SPACE: Dimension = Dimension::vp(8.0);
pub const SHEET_DEVICE_WIDTH_BREAKPOINT: Dimension = Dimension::vp(600.0);
pub const SHEET_PC_DEVICE_WIDTH_BREAKPOINT: Dimension = Dimension::vp(840.0);
pub const SHEET_OPERATION_AREA_HEIGHT: Dimension = Dimension::vp(56.0);
pub const SHEET_CLOSE_ICON_WIDTH: Dimension = Dimension::vp(40.0);
pub const SHEET_DRAG_BAR_WIDTH: Dimension = Dimension::vp(64.0);
pub const SHEET_DRAG_BAR_HEIGHT: Dimension = Dimension::vp(16.0);
/// Gap kept between the caret and the keyboard.
pub const SHEET_AVOID_MARGIN: Dimension = Dimension::vp(24.0);

pub const BUBBLE_ENTRY_MS: u64 = 250;
pub const BUBBLE_EXIT_MS: u64 = 100;
/// Vertical offset, in px, a popup sheet starts from and returns to.
pub const BUBBLE_INVISIBLE_OFFSET: f32 = 8.0;

/// Pick the layout variant for a sheet.
///
/// `auto` themes follow the device posture; `popup` themes follow the window
/// width, letting the style choose on wide windows; anything else is a
/// plain bottom sheet.
pub fn select_sheet_type(
    mode: SheetThemeMode,
    requested: Option<SheetType>,
    root_size: SizeF,
    window_width: f32,
    foldable_expanded: bool,
    density: f32,
) -> SheetType {
    match mode {
        SheetThemeMode::Auto => {
            if foldable_expanded {
                SheetType::Center
            } else if root_size.height < root_size.width {
                SheetType::BottomLandscape
            } else {
                SheetType::Bottom
            }
        }
        SheetThemeMode::Popup => {
            if window_width >= SHEET_PC_DEVICE_WIDTH_BREAKPOINT.to_px(density) {
                requested.unwrap_or(SheetType::Popup)
            } else if window_width >= SHEET_DEVICE_WIDTH_BREAKPOINT.to_px(density) {
                requested.unwrap_or(SheetType::Center)
            } else {
                SheetType::BottomPc
            }
        }
        SheetThemeMode::Bottom => SheetType::Bottom,
    }
}
