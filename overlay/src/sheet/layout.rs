//! Geometry of the sheet node and its column of children.

use uitree::{LayoutConstraint, Measurable, NodeArena, NodeId, OffsetF, RectF, SizeF};

use super::{
    POPUP_LARGE_SIZE, SHEET_ARROW_HEIGHT, SHEET_BIG_WINDOW_HEIGHT, SHEET_BIG_WINDOW_MIN_HEIGHT,
    SHEET_LANDSCAPE_WIDTH, SHEET_OPERATION_AREA_HEIGHT, SHEET_POPUP_WIDTH, SHEET_TARGET_SPACE,
};
use crate::pattern::Pattern;
use crate::style::{SheetMode, SheetStyle, SheetType};

/// What a layout pass hands back to the sheet pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SheetMetrics {
    pub sheet_max_height: f32,
    pub sheet_max_width: f32,
    /// Frame height of a center or popup sheet.
    pub center_height: f32,
    pub sheet_offset: OffsetF,
    /// Operation area plus builder content.
    pub fit_content_height: f32,
}

pub struct SheetPresentationLayoutAlgorithm {
    sheet_type: SheetType,
    style: SheetStyle,
    density: f32,
    /// Paint rect of the popup target, in root coordinates.
    target_rect: Option<RectF>,
    sheet_width: f32,
    sheet_height: f32,
    metrics: SheetMetrics,
}

impl SheetPresentationLayoutAlgorithm {
    pub fn new(sheet_type: SheetType, style: &SheetStyle, density: f32) -> Self {
        Self {
            sheet_type,
            style: style.clone(),
            density,
            target_rect: None,
            sheet_width: 0.0,
            sheet_height: 0.0,
            metrics: SheetMetrics::default(),
        }
    }

    pub fn target_rect(mut self, rect: Option<RectF>) -> Self {
        self.target_rect = rect;
        self
    }

    pub fn metrics(&self) -> SheetMetrics {
        self.metrics
    }

    pub fn sheet_size(&self) -> SizeF {
        SizeF::new(self.sheet_width, self.sheet_height)
    }

    fn width_for(&self, max_size: SizeF) -> f32 {
        match self.sheet_type {
            SheetType::Bottom | SheetType::BottomPc => max_size.width,
            SheetType::BottomLandscape | SheetType::Center => {
                SHEET_LANDSCAPE_WIDTH.to_px(self.density)
            }
            SheetType::Popup => SHEET_POPUP_WIDTH.to_px(self.density),
        }
    }

    fn height_for(&self, max_size: SizeF) -> f32 {
        match self.sheet_type {
            SheetType::Bottom | SheetType::BottomPc | SheetType::BottomLandscape => {
                max_size.height
            }
            SheetType::Center => self.height_by_style(),
            SheetType::Popup => self.height_by_style() + SHEET_ARROW_HEIGHT.to_px(self.density),
        }
    }

    /// Largest height a center or popup sheet may take.
    fn big_window_bound(&self) -> f32 {
        self.metrics
            .sheet_max_height
            .min(self.metrics.sheet_max_width)
            * POPUP_LARGE_SIZE
    }

    fn clamp_big_window(&self, height: f32) -> f32 {
        let bound = self.big_window_bound();
        if height > bound {
            bound
        } else if height < 0.0 {
            SHEET_BIG_WINDOW_HEIGHT.to_px(self.density)
        } else if height < SHEET_BIG_WINDOW_MIN_HEIGHT.to_px(self.density) {
            SHEET_BIG_WINDOW_MIN_HEIGHT.to_px(self.density)
        } else {
            height
        }
    }

    fn height_by_style(&self) -> f32 {
        let Some(height) = self.style.height else {
            return SHEET_BIG_WINDOW_HEIGHT.to_px(self.density);
        };
        let resolved = if height.is_percent() {
            height.to_px_with_size(self.big_window_bound(), self.density)
        } else {
            height.to_px(self.density)
        };
        self.clamp_big_window(resolved)
    }

    fn child_constraint(&self) -> LayoutConstraint {
        let mut max_height = self.sheet_height;
        if self.style.is_title_builder.is_some()
            && matches!(self.sheet_type, SheetType::Center | SheetType::Popup)
        {
            max_height -= SHEET_OPERATION_AREA_HEIGHT.to_px(self.density);
        }
        LayoutConstraint {
            max_size: SizeF::new(self.sheet_width, max_height),
            percent_reference: SizeF::new(self.sheet_width, self.sheet_height),
        }
    }

    fn popup_offset(&self) -> OffsetF {
        let Some(target) = self.target_rect else {
            return OffsetF::ZERO;
        };
        OffsetF::new(
            target.x + (target.width - self.sheet_width) / 2.0,
            target.y + target.height + SHEET_TARGET_SPACE.to_px(self.density),
        )
    }
}

/// Size one child: its ideal size within `constraint`, or the full width
/// and `fallback_height`.
fn measure_child(
    arena: &mut NodeArena<Pattern>,
    child: NodeId,
    constraint: LayoutConstraint,
    fallback_height: f32,
) -> SizeF {
    let Some(node) = arena.get_mut(child) else {
        return SizeF::default();
    };
    let ideal = node.layout.ideal_size;
    let size = SizeF::new(
        ideal
            .map(|s| s.width.min(constraint.max_size.width))
            .unwrap_or(constraint.max_size.width),
        ideal
            .map(|s| s.height.min(constraint.max_size.height))
            .unwrap_or(fallback_height)
            .max(0.0),
    );
    node.frame.set_size(size);
    size
}

/// Absolutely positioned children do not take part in stacking.
fn is_positioned(arena: &NodeArena<Pattern>, id: NodeId) -> bool {
    arena.get(id).is_some_and(|n| n.render.position.is_some())
}

impl Measurable<Pattern> for SheetPresentationLayoutAlgorithm {
    fn measure(
        &mut self,
        arena: &mut NodeArena<Pattern>,
        node: NodeId,
        constraint: LayoutConstraint,
    ) {
        let max_size = constraint.max_size;
        self.metrics.sheet_max_height = max_size.height;
        self.metrics.sheet_max_width = max_size.width;
        self.sheet_width = self.width_for(max_size);
        self.sheet_height = self.height_for(max_size);

        let child_constraint = self.child_constraint();
        let children = arena.children(node).to_vec();
        let mut used = 0.0;
        for child in &children {
            if is_positioned(arena, *child) {
                measure_child(arena, *child, child_constraint, 0.0);
                continue;
            }
            let remaining = (child_constraint.max_size.height - used).max(0.0);
            let size = measure_child(arena, *child, child_constraint, remaining);
            used += size.height;
        }

        // Builder content sits inside the scroll (second child).
        let operation_height = children
            .first()
            .map(|id| arena.frame_size(*id).height)
            .unwrap_or(0.0);
        let builder_height = match children.get(1).and_then(|s| arena.first_child(*s)) {
            Some(builder) => {
                let scroll_size = arena.frame_size(children[1]);
                let inner = LayoutConstraint {
                    max_size: SizeF::new(scroll_size.width, f32::INFINITY),
                    percent_reference: scroll_size,
                };
                measure_child(arena, builder, inner, 0.0).height
            }
            None => 0.0,
        };
        self.metrics.fit_content_height = operation_height + builder_height;

        if matches!(self.sheet_type, SheetType::Center | SheetType::Popup)
            && self.style.sheet_mode.unwrap_or_default() == SheetMode::Auto
        {
            self.sheet_height = self.clamp_big_window(self.metrics.fit_content_height);
        }
        self.metrics.center_height = self.sheet_height;

        if let Some(sheet) = arena.get_mut(node) {
            sheet.frame.set_size(SizeF::new(self.sheet_width, self.sheet_height));
        }
        log::trace!(
            "sheet {node} measured {}x{} ({:?})",
            self.sheet_width,
            self.sheet_height,
            self.sheet_type
        );
    }

    fn layout(&mut self, arena: &mut NodeArena<Pattern>, node: NodeId) {
        let offset = match self.sheet_type {
            SheetType::BottomLandscape | SheetType::Center => OffsetF::new(
                (self.metrics.sheet_max_width - self.sheet_width) / 2.0,
                0.0,
            ),
            SheetType::Popup => {
                let parent_offset = arena
                    .parent(node)
                    .map(|p| arena.paint_offset(p))
                    .unwrap_or(OffsetF::ZERO);
                self.popup_offset() - parent_offset
            }
            SheetType::Bottom | SheetType::BottomPc => OffsetF::ZERO,
        };
        self.metrics.sheet_offset = offset;
        if let Some(sheet) = arena.get_mut(node) {
            sheet.frame.set_offset(offset);
        }

        let mut y = if self.sheet_type == SheetType::Popup {
            SHEET_ARROW_HEIGHT.to_px(self.density)
        } else {
            0.0
        };
        for child in arena.children(node).to_vec() {
            if is_positioned(arena, child) {
                continue;
            }
            let Some(child_node) = arena.get_mut(child) else {
                continue;
            };
            child_node.frame.set_offset(OffsetF::new(0.0, y));
            y += child_node.frame.height;
            for grandchild in arena.children(child).to_vec() {
                if let Some(inner) = arena.get_mut(grandchild) {
                    inner.frame.set_offset(OffsetF::ZERO);
                }
            }
        }
    }
}
