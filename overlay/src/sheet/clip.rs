//! Clip shapes of the sheet node, as path strings.
//!
//! Commands are `M`, `L`, `A` and a closing `Z`; every number is written
//! with six decimals and each command ends with a space.

use std::fmt::Write;

use uitree::{Dimension, SizeF};

use super::SHEET_ARROW_HEIGHT;
use crate::style::SheetType;

const ARROW_P1_OFFSET_X: Dimension = Dimension::vp(8.0);
const ARROW_P2_OFFSET_X: Dimension = Dimension::vp(1.5);
const ARROW_P2_OFFSET_Y: Dimension = Dimension::vp(7.32);
const ARROW_P4_OFFSET_X: Dimension = Dimension::vp(1.5);
const ARROW_P4_OFFSET_Y: Dimension = Dimension::vp(7.32);
const ARROW_P5_OFFSET_X: Dimension = Dimension::vp(8.0);
const ARROW_RADIUS: Dimension = Dimension::vp(2.0);

#[derive(Debug, Default)]
struct PathBuilder {
    path: String,
}

impl PathBuilder {
    fn move_to(mut self, x: f32, y: f32) -> Self {
        let _ = write!(self.path, "M{x:.6} {y:.6} ");
        self
    }

    fn line_to(mut self, x: f32, y: f32) -> Self {
        let _ = write!(self.path, "L{x:.6} {y:.6} ");
        self
    }

    /// Clockwise arc with no rotation.
    fn arc_to(mut self, rx: f32, ry: f32, x: f32, y: f32) -> Self {
        let _ = write!(self.path, "A{rx:.6} {ry:.6} {:.6} 0 1 {x:.6} {y:.6} ", 0.0);
        self
    }

    fn close(self) -> String {
        self.path + "Z"
    }
}

/// Clip for a sheet of `sheet_type`; `radius` is in pixels.
pub fn sheet_clip_path(sheet_type: SheetType, size: SizeF, radius: f32, density: f32) -> String {
    let radius = radius.min(size.width / 2.0).max(0.0);
    match sheet_type {
        SheetType::Popup => popup_clip_path(size, radius, density),
        SheetType::Center => center_clip_path(size, radius),
        SheetType::Bottom | SheetType::BottomPc | SheetType::BottomLandscape => {
            bottom_clip_path(size, radius)
        }
    }
}

/// Rounded top corners, square bottom.
pub fn bottom_clip_path(size: SizeF, radius: f32) -> String {
    PathBuilder::default()
        .move_to(0.0, radius)
        .arc_to(radius, radius, radius, 0.0)
        .line_to(size.width - radius, 0.0)
        .arc_to(radius, radius, size.width, radius)
        .line_to(size.width, size.height)
        .line_to(0.0, size.height)
        .close()
}

pub fn center_clip_path(size: SizeF, radius: f32) -> String {
    PathBuilder::default()
        .move_to(0.0, radius)
        .arc_to(radius, radius, radius, 0.0)
        .line_to(size.width - radius, 0.0)
        .arc_to(radius, radius, size.width, radius)
        .line_to(size.width, size.height - radius)
        .arc_to(radius, radius, size.width - radius, size.height)
        .line_to(radius, size.height)
        .arc_to(radius, radius, 0.0, size.height - radius)
        .close()
}

/// Rounded rect below an arrow notch centered on the top edge.
pub fn popup_clip_path(size: SizeF, radius: f32, density: f32) -> String {
    let arrow = SHEET_ARROW_HEIGHT.to_px(density);
    let mid = size.width / 2.0;
    let arrow_radius = ARROW_RADIUS.to_px(density);
    PathBuilder::default()
        .move_to(0.0, arrow + radius)
        .arc_to(radius, radius, radius, arrow)
        .line_to(mid - ARROW_P1_OFFSET_X.to_px(density), arrow)
        .line_to(
            mid - ARROW_P2_OFFSET_X.to_px(density),
            arrow - ARROW_P2_OFFSET_Y.to_px(density),
        )
        .arc_to(
            arrow_radius,
            arrow_radius,
            mid + ARROW_P4_OFFSET_X.to_px(density),
            arrow - ARROW_P4_OFFSET_Y.to_px(density),
        )
        .line_to(mid + ARROW_P5_OFFSET_X.to_px(density), arrow)
        .line_to(size.width - radius, arrow)
        .arc_to(radius, radius, size.width, arrow + radius)
        .line_to(size.width, size.height - radius)
        .arc_to(radius, radius, size.width - radius, size.height)
        .line_to(radius, size.height)
        .arc_to(radius, radius, 0.0, size.height - radius)
        .close()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bottom_path_format() {
        let path = bottom_clip_path(SizeF::new(100.0, 200.0), 10.0);
        assert_eq!(
            path,
            "M0.000000 10.000000 \
             A10.000000 10.000000 0.000000 0 1 10.000000 0.000000 \
             L90.000000 0.000000 \
             A10.000000 10.000000 0.000000 0 1 100.000000 10.000000 \
             L100.000000 200.000000 \
             L0.000000 200.000000 Z"
        );
    }

    #[test]
    fn test_center_path_has_four_arcs() {
        let path = center_clip_path(SizeF::new(480.0, 560.0), 32.0);
        assert_eq!(path.matches('A').count(), 4);
        assert!(path.starts_with("M0.000000 32.000000 "));
        assert!(path.ends_with('Z'));
    }

    #[test]
    fn test_popup_path_notch() {
        let path = popup_clip_path(SizeF::new(360.0, 400.0), 16.0, 1.0);
        // Four corners plus the rounded arrow tip.
        assert_eq!(path.matches('A').count(), 5);
        assert!(path.contains("L172.000000 8.000000 "));
        assert!(path.contains("L178.500000 0.680000 "));
        assert!(path.contains("A2.000000 2.000000 0.000000 0 1 181.500000 0.680000 "));
        assert!(path.contains("L188.000000 8.000000 "));
    }

    #[test]
    fn test_radius_clamped_to_half_width() {
        let path = sheet_clip_path(SheetType::Bottom, SizeF::new(40.0, 100.0), 32.0, 1.0);
        assert!(path.starts_with("M0.000000 20.000000 "));
    }
}
