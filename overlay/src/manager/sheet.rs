//! Sheets: binding, transitions, gestures and keyboard avoidance.
//!
//! A sheet sits in a wrapper column on root, with its mask as the root child
//! right below the wrapper:
//!
//! ```text
//! root
//! ├── sheet-mask
//! └── sheet-wrapper
//!     └── sheet
//!         ├── sheet-operation (drag bar, title)
//!         ├── sheet-scroll (content)
//!         └── sheet-close-icon
//! ```
//!
//! The sheet pattern decides; this module applies its decisions to the tree
//! and owns the animations.

use std::time::Duration;

use uitree::geometry::near_zero;
use uitree::{
    AnimationOption, AnimationTarget, Curve, LayoutConstraint, Measurable, NodeArena, NodeId,
    OffsetF, RectF, SizeF,
};

use super::OverlayManager;
use crate::pattern::{Callback, ContentBuilder, Pattern, VisibilityCallback};
use crate::sheet::clip::sheet_clip_path;
use crate::sheet::{
    BUBBLE_ENTRY_MS, BUBBLE_EXIT_MS, BUBBLE_INVISIBLE_OFFSET, CURVE_DAMPING, CURVE_MASS,
    CURVE_STIFFNESS, DragFrame, DragOutcome, KeyboardEnv, SHEET_ARROW_HEIGHT,
    SHEET_CLOSE_ICON_WIDTH, SHEET_DRAG_BAR_HEIGHT, SHEET_DRAG_BAR_WIDTH,
    SHEET_OPERATION_AREA_HEIGHT, SHEET_VELOCITY_THRESHOLD, SheetPresentationLayoutAlgorithm,
    SheetPresentationPattern, select_sheet_type,
};
use crate::style::{SheetStyle, SheetType};
use crate::task::Completion;

const MASK_CURVE: Curve = Curve::spring(0.0, CURVE_MASS, CURVE_STIFFNESS, CURVE_DAMPING);

fn slide_curve(velocity: f32) -> Curve {
    Curve::spring(
        velocity / SHEET_VELOCITY_THRESHOLD,
        CURVE_MASS,
        CURVE_STIFFNESS,
        CURVE_DAMPING,
    )
}

/// Everything one `bind_sheet` call carries.
pub struct SheetRequest {
    pub target_id: i32,
    pub style: SheetStyle,
    pub builder: Option<ContentBuilder>,
    pub title_builder: Option<ContentBuilder>,
    pub callback: Option<VisibilityCallback>,
    pub on_appear: Option<Callback>,
    pub on_disappear: Option<Callback>,
    pub should_dismiss: Option<Callback>,
    /// Anchor of a popup sheet.
    pub target_node: Option<NodeId>,
}

impl SheetRequest {
    pub fn new(target_id: i32) -> Self {
        Self {
            target_id,
            style: SheetStyle::default(),
            builder: None,
            title_builder: None,
            callback: None,
            on_appear: None,
            on_disappear: None,
            should_dismiss: None,
            target_node: None,
        }
    }

    pub fn style(mut self, style: SheetStyle) -> Self {
        self.style = style;
        self
    }

    pub fn builder(
        mut self,
        builder: impl FnOnce(&mut NodeArena<Pattern>) -> Option<NodeId> + Send + 'static,
    ) -> Self {
        self.builder = Some(Box::new(builder));
        self
    }

    pub fn title_builder(
        mut self,
        builder: impl FnOnce(&mut NodeArena<Pattern>) -> Option<NodeId> + Send + 'static,
    ) -> Self {
        self.title_builder = Some(Box::new(builder));
        self
    }

    pub fn on_visibility(mut self, callback: impl FnMut(bool) + Send + 'static) -> Self {
        self.callback = Some(Box::new(callback));
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

    pub fn should_dismiss(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.should_dismiss = Some(Box::new(callback));
        self
    }

    pub fn target_node(mut self, target: NodeId) -> Self {
        self.target_node = Some(target);
        self
    }
}

impl OverlayManager {
    fn sheet_pattern(&self, sheet: NodeId) -> Option<&SheetPresentationPattern> {
        self.pattern_of(sheet).and_then(Pattern::as_sheet)
    }

    fn sheet_pattern_mut(&mut self, sheet: NodeId) -> Option<&mut SheetPresentationPattern> {
        self.pattern_of_mut(sheet).and_then(Pattern::as_sheet_mut)
    }

    /// The live sheet bound to `target_id`.
    pub fn sheet_node(&self, target_id: i32) -> Option<NodeId> {
        self.sheet_map
            .get(&target_id)
            .copied()
            .filter(|node| self.context.arena.contains(*node))
    }

    pub fn sheet_count(&self) -> usize {
        self.sheet_map.len()
    }

    /// The mask of `sheet`: the root child right below its wrapper.
    pub fn sheet_mask(&self, sheet: NodeId) -> Option<NodeId> {
        let arena = &self.context.arena;
        let wrapper = arena.parent(sheet)?;
        let root = arena.parent(wrapper)?;
        let index = arena.index_in_parent(wrapper)?;
        let mask = arena.child_at(root, index.checked_sub(1)?)?;
        matches!(arena.pattern(mask), Some(Pattern::SheetMask)).then_some(mask)
    }

    /// Show, patch or close the sheet bound to `request.target_id`.
    pub fn bind_sheet(&mut self, is_show: bool, request: SheetRequest) {
        if !is_show {
            self.close_sheet(request.target_id);
            return;
        }
        match self.sheet_node(request.target_id) {
            Some(sheet) => self.update_sheet(sheet, request),
            None => self.create_sheet(request),
        }
    }

    fn update_sheet(&mut self, sheet: NodeId, request: SheetRequest) {
        let SheetRequest {
            target_id,
            style,
            callback,
            on_disappear,
            should_dismiss,
            ..
        } = request;
        log::debug!("sheet for target {target_id} updated in place");
        let theme = self.context.theme().sheet().clone();
        if let Some(color) = style.background_color
            && let Some(node) = self.context.arena.get_mut(sheet)
        {
            node.render.background = Some(color);
        }
        if let Some(mask) = self.sheet_mask(sheet)
            && let Some(node) = self.context.arena.get_mut(mask)
        {
            node.render.background = Some(style.mask_color.unwrap_or(theme.mask_color));
        }
        let Some(pattern) = self.sheet_pattern_mut(sheet) else {
            return;
        };
        pattern.update_on_disappear(on_disappear);
        pattern.update_should_dismiss(should_dismiss);
        if callback.is_some() {
            pattern.set_callback(callback);
        }
        pattern.update_style(style);

        self.refresh_sheet_type(sheet);
        self.on_sheet_layout(sheet);
        self.compute_sheet_offset(sheet);
        if self.sheet_pattern(sheet).map(SheetPresentationPattern::sheet_type)
            != Some(SheetType::Popup)
        {
            self.play_sheet_settle(sheet, false, 0.0, false);
        }
    }

    fn create_sheet(&mut self, request: SheetRequest) {
        let SheetRequest {
            target_id,
            mut style,
            builder,
            title_builder,
            callback,
            mut on_appear,
            on_disappear,
            should_dismiss,
            target_node,
        } = request;
        if title_builder.is_some() && style.is_title_builder.is_none() {
            style.is_title_builder = Some(true);
        }
        let density = self.context.density();
        let root_size = self.context.root_size();
        let theme = self.context.theme().sheet().clone();
        let operation_height = if style.has_title() {
            self.context.px(SHEET_OPERATION_AREA_HEIGHT)
        } else {
            self.context.px(SHEET_DRAG_BAR_HEIGHT)
        };
        let drag_bar_size = SizeF::new(
            self.context.px(SHEET_DRAG_BAR_WIDTH),
            self.context.px(SHEET_DRAG_BAR_HEIGHT),
        );
        let icon_width = self.context.px(SHEET_CLOSE_ICON_WIDTH);
        let background = style.background_color.unwrap_or(theme.background_color);
        let mask_color = style.mask_color.unwrap_or(theme.mask_color);
        let has_title = style.has_title();

        let mut pattern = SheetPresentationPattern::new(target_id, style, density);
        pattern.set_callback(callback);
        pattern.update_on_disappear(on_disappear);
        pattern.update_should_dismiss(should_dismiss);
        pattern.set_target_node(target_node);

        let arena = &mut self.context.arena;
        let sheet = arena.create("sheet", Pattern::Sheet(Box::new(pattern)));
        if let Some(node) = arena.get_mut(sheet) {
            node.render.background = Some(background);
        }

        let operation = arena.create("sheet-operation", Pattern::SheetOperation);
        if let Some(node) = arena.get_mut(operation) {
            node.layout.ideal_size = Some(SizeF::new(f32::INFINITY, operation_height));
        }
        let drag_bar = arena.create("sheet-drag-bar", Pattern::SheetDragBar);
        if let Some(node) = arena.get_mut(drag_bar) {
            node.layout.ideal_size = Some(drag_bar_size);
        }
        arena.mount(drag_bar, operation);
        if has_title {
            let title = arena.create("sheet-title", Pattern::SheetTitle);
            if let Some(child) = title_builder.and_then(|build| build(arena)) {
                arena.mount(child, title);
            }
            arena.mount(title, operation);
        }
        arena.mount(operation, sheet);

        let scroll = arena.create("sheet-scroll", Pattern::SheetScroll);
        if let Some(content) = builder.and_then(|build| build(arena)) {
            arena.mount(content, scroll);
        }
        arena.mount(scroll, sheet);

        let close_icon = arena.create("sheet-close-icon", Pattern::SheetCloseIcon);
        if let Some(node) = arena.get_mut(close_icon) {
            node.layout.ideal_size = Some(SizeF::new(icon_width, icon_width));
            node.render.position = Some(OffsetF::ZERO);
            node.gesture.clickable = true;
        }
        arena.mount(close_icon, sheet);

        self.refresh_sheet_type(sheet);
        self.sheet_map.insert(target_id, sheet);
        self.modal_stack.push(sheet);
        self.save_last_modal_node();

        let root = self.context.root();
        let arena = &mut self.context.arena;
        let mask = arena.create("sheet-mask", Pattern::SheetMask);
        if let Some(node) = arena.get_mut(mask) {
            node.frame.set_size(root_size);
            node.render.background = Some(mask_color);
            node.gesture.clickable = true;
        }
        arena.mount(mask, root);
        self.play_sheet_mask_entry(mask);

        let arena = &mut self.context.arena;
        let wrapper = arena.create("sheet-wrapper", Pattern::SheetWrapper);
        if let Some(node) = arena.get_mut(wrapper) {
            node.frame.set_size(root_size);
        }
        arena.mount(sheet, wrapper);
        arena.mount(wrapper, root);
        self.modal_list.push(sheet);
        log::debug!("sheet {sheet} shown for target {target_id}");

        self.fire_modal_page_show();
        self.on_sheet_layout(sheet);
        self.compute_sheet_offset(sheet);
        if let Some(on_appear) = on_appear.as_mut() {
            on_appear();
        }
        let popup = self.sheet_pattern(sheet).map(SheetPresentationPattern::sheet_type)
            == Some(SheetType::Popup);
        if popup {
            self.play_bubble_sheet_entry(sheet);
        } else {
            self.play_sheet_settle(sheet, true, 0.0, false);
        }
    }

    /// Re-pick the layout variant from the theme and the window.
    fn refresh_sheet_type(&mut self, sheet: NodeId) {
        let mode = self.context.theme().sheet().sheet_type;
        let root_size = self.context.root_size();
        let window_width = self.context.window_rect().width;
        let foldable = self.context.is_foldable_expanded();
        let density = self.context.density();
        let Some(pattern) = self.sheet_pattern_mut(sheet) else {
            return;
        };
        let requested = pattern.style().sheet_type;
        let sheet_type = select_sheet_type(
            mode,
            requested,
            root_size,
            window_width,
            foldable,
            density,
        );
        if sheet_type != pattern.sheet_type() {
            log::debug!("sheet {} type {sheet_type:?}", pattern.target_id());
        }
        pattern.set_sheet_type(sheet_type);
    }

    /// Settled height of `sheet` for its type and style. Returns the
    /// translate that shows that height.
    pub fn compute_sheet_offset(&mut self, sheet: NodeId) -> f32 {
        let Some(pattern) = self.sheet_pattern_mut(sheet) else {
            return 0.0;
        };
        let height = match pattern.sheet_type() {
            SheetType::Bottom | SheetType::BottomPc => {
                pattern.resolve_height(pattern.style().initial_gear(), pattern.fit_content_height())
            }
            SheetType::BottomLandscape => pattern.large_height(),
            SheetType::Center => (pattern.center_height() + pattern.page_height()) / 2.0,
            SheetType::Popup => pattern.sheet_max_height(),
        };
        pattern.set_height(height);
        pattern.offset_for(height)
    }

    /// Measure and lay out `sheet`, then refresh everything derived from
    /// its geometry: detents, child visibility, the clip and keyboard
    /// avoidance.
    pub fn on_sheet_layout(&mut self, sheet: NodeId) {
        let Some(pattern) = self.sheet_pattern(sheet) else {
            return;
        };
        let sheet_type = pattern.sheet_type();
        let style = pattern.style().clone();
        let target_rect = pattern.target_node().and_then(|target| {
            let node = self.context.arena.get(target)?;
            Some(RectF::from_parts(
                self.context.arena.paint_offset(target),
                node.frame.size(),
            ))
        });
        let density = self.context.density();
        let root_size = self.context.root_size();
        let status_bar = self.context.safe_area().status_bar;
        let theme = self.context.theme().sheet().clone();
        let radius = self.context.px(theme.sheet_radius);
        let title_margin = self.context.px(theme.title_text_margin);
        let icon_width = self.context.px(SHEET_CLOSE_ICON_WIDTH);
        let arrow = self.context.px(SHEET_ARROW_HEIGHT);

        let mut algorithm = SheetPresentationLayoutAlgorithm::new(sheet_type, &style, density)
            .target_rect(target_rect);
        algorithm.measure(&mut self.context.arena, sheet, LayoutConstraint::new(root_size));
        algorithm.layout(&mut self.context.arena, sheet);
        let metrics = algorithm.metrics();
        let sheet_size = algorithm.sheet_size();

        let Some(pattern) = self.sheet_pattern_mut(sheet) else {
            return;
        };
        pattern.apply_metrics(&metrics, status_bar);
        let refit = pattern.init_detents(sheet_size.height, metrics.fit_content_height);
        let rotated = pattern.take_window_rotate();
        let first_measure = pattern.take_first_measure();
        let settled_offset = pattern.offset_for(pattern.height());
        let drag_bar = pattern.drag_bar_visibility();
        let close_icon = pattern.close_icon_visibility();
        let mask = pattern.mask_visibility();
        let height_changed = pattern.check_height_change(sheet_size.height);

        if matches!(
            sheet_type,
            SheetType::Bottom | SheetType::BottomPc | SheetType::BottomLandscape
        ) {
            if rotated {
                self.apply(
                    sheet,
                    [AnimationTarget::Translate(OffsetF::new(0.0, settled_offset))],
                );
            } else {
                self.avoid_safe_area(sheet);
            }
            if first_measure && let Some(content) = self.sheet_content(sheet) {
                let size = self.context.arena.frame_size(content);
                if let Some(node) = self.context.arena.get_mut(content) {
                    node.layout.min_size = Some(size);
                }
            }
        }

        let arena = &mut self.context.arena;
        if let Some(operation) = arena.first_child(sheet)
            && let Some(bar) = arena.first_child(operation)
            && let Some(node) = arena.get_mut(bar)
        {
            node.layout.visibility = drag_bar;
        }
        if let Some(icon) = arena.child_at(sheet, 2)
            && let Some(node) = arena.get_mut(icon)
        {
            let top = if sheet_type == SheetType::Popup {
                title_margin + arrow
            } else {
                title_margin
            };
            node.layout.visibility = close_icon;
            node.render.position = Some(OffsetF::new(
                sheet_size.width - icon_width - title_margin,
                top,
            ));
        }
        if let Some(node) = arena.get_mut(sheet) {
            node.render.clip_path = Some(sheet_clip_path(sheet_type, sheet_size, radius, density));
        }
        if let Some(mask_node) = self.sheet_mask(sheet)
            && let Some(node) = self.context.arena.get_mut(mask_node)
        {
            node.layout.visibility = mask;
        }

        if refit {
            self.play_sheet_settle(sheet, false, 0.0, false);
        }
        if height_changed {
            self.check_sheet_height_change(sheet);
        }
    }

    /// The frame changed size or type: jump to the recomputed height.
    fn check_sheet_height_change(&mut self, sheet: NodeId) {
        log::debug!("sheet {sheet} frame changed");
        self.compute_sheet_offset(sheet);
        let popup = self.sheet_pattern(sheet).map(SheetPresentationPattern::sheet_type)
            == Some(SheetType::Popup);
        if popup {
            self.apply(
                sheet,
                [
                    AnimationTarget::Translate(OffsetF::ZERO),
                    AnimationTarget::Opacity(1.0),
                ],
            );
        } else {
            self.play_sheet_settle(sheet, false, 0.0, true);
        }
    }

    /// Content root built by the sheet's builder.
    fn sheet_content(&self, sheet: NodeId) -> Option<NodeId> {
        let scroll = self.context.arena.child_at(sheet, 1)?;
        self.context.arena.first_child(scroll)
    }

    /// Slide `sheet` to its settled height. A first slide starts from
    /// below the page; an instant one lands on the next frame.
    fn play_sheet_settle(&mut self, sheet: NodeId, first: bool, velocity: f32, instant: bool) {
        let Some(pattern) = self.sheet_pattern(sheet) else {
            return;
        };
        let offset = pattern.offset_for(pattern.height());
        let page_height = pattern.page_height();
        if first {
            self.apply(
                sheet,
                [AnimationTarget::Translate(OffsetF::new(0.0, page_height))],
            );
        }
        let option = if instant {
            AnimationOption::new(Duration::ZERO, Curve::Linear)
        } else {
            AnimationOption::spring(slide_curve(velocity))
        };
        let id = self.animate(
            sheet,
            option,
            [AnimationTarget::Translate(OffsetF::new(0.0, offset))],
            Some(Completion::SheetSettled),
        );
        if let Some(pattern) = self.sheet_pattern_mut(sheet) {
            pattern.start_animation(id, false);
        }
    }

    /// Slide or fade `sheet` out, together with its mask.
    pub(super) fn play_sheet_exit(&mut self, sheet: NodeId, velocity: f32, on_finish: Completion) {
        if let Some(mask) = self.sheet_mask(sheet) {
            self.play_sheet_mask_exit(mask);
        }
        let Some(pattern) = self.sheet_pattern(sheet) else {
            return;
        };
        let popup = pattern.sheet_type() == SheetType::Popup;
        let page_height = pattern.page_height();
        let id = if popup {
            self.animate(
                sheet,
                AnimationOption::millis(BUBBLE_EXIT_MS, Curve::FRICTION),
                [AnimationTarget::Translate(OffsetF::new(
                    0.0,
                    -BUBBLE_INVISIBLE_OFFSET,
                ))],
                None,
            );
            self.animate(
                sheet,
                AnimationOption::millis(BUBBLE_EXIT_MS, Curve::SHARP),
                [AnimationTarget::Opacity(0.0)],
                Some(on_finish),
            )
        } else {
            self.animate(
                sheet,
                AnimationOption::spring(slide_curve(velocity)),
                [AnimationTarget::Translate(OffsetF::new(0.0, page_height))],
                Some(on_finish),
            )
        };
        if let Some(pattern) = self.sheet_pattern_mut(sheet) {
            pattern.start_animation(id, true);
        }
    }

    fn play_bubble_sheet_entry(&mut self, sheet: NodeId) {
        self.apply(
            sheet,
            [
                AnimationTarget::Translate(OffsetF::new(0.0, -BUBBLE_INVISIBLE_OFFSET)),
                AnimationTarget::Opacity(0.0),
            ],
        );
        self.animate(
            sheet,
            AnimationOption::millis(BUBBLE_ENTRY_MS, Curve::FRICTION),
            [AnimationTarget::Translate(OffsetF::ZERO)],
            None,
        );
        self.animate(
            sheet,
            AnimationOption::millis(BUBBLE_ENTRY_MS, Curve::SHARP),
            [AnimationTarget::Opacity(1.0)],
            Some(Completion::SheetBubbleEntered),
        );
    }

    fn play_sheet_mask_entry(&mut self, mask: NodeId) {
        self.apply(mask, [AnimationTarget::Opacity(0.0)]);
        self.animate(
            mask,
            AnimationOption::spring(MASK_CURVE),
            [AnimationTarget::Opacity(1.0)],
            None,
        );
    }

    /// Fade the mask out; it stops taking clicks at once.
    fn play_sheet_mask_exit(&mut self, mask: NodeId) {
        let Some(node) = self.context.arena.get_mut(mask) else {
            return;
        };
        if !node.gesture.clickable {
            return;
        }
        node.gesture.clickable = false;
        self.animate(
            mask,
            AnimationOption::spring(MASK_CURVE),
            [AnimationTarget::Opacity(0.0)],
            Some(Completion::SheetMaskExited),
        );
    }

    pub(super) fn on_sheet_settled(&mut self, sheet: NodeId, id: uitree::AnimationId) {
        let Some(pattern) = self.sheet_pattern_mut(sheet) else {
            return;
        };
        if !pattern.finish_settle(id) {
            log::trace!("sheet {sheet} settle {id} skipped");
            return;
        }
        let height = pattern.height();
        self.process_column_rect(sheet, height);
        self.change_scroll_height(sheet, height);
    }

    pub(super) fn on_sheet_bubble_entered(&mut self, sheet: NodeId) {
        let height = self.sheet_pattern(sheet).map_or(0.0, SheetPresentationPattern::height);
        self.process_column_rect(sheet, height);
    }

    /// Programmatic close finished.
    pub(super) fn on_sheet_closed(&mut self, sheet: NodeId) {
        if let Some(pattern) = self.sheet_pattern_mut(sheet) {
            pattern.finish_dismiss();
            pattern.on_disappear();
        }
        log::debug!("sheet {sheet} closed");
        match self.context.arena.parent(sheet) {
            Some(wrapper) => self.discard(wrapper),
            None => self.discard(sheet),
        }
    }

    /// Interactive dismissal finished.
    pub(super) fn on_sheet_dismissed(&mut self, sheet: NodeId) {
        let Some(pattern) = self.sheet_pattern_mut(sheet) else {
            return;
        };
        pattern.finish_dismiss();
        pattern.fire_callback(false);
        let target_id = pattern.target_id();
        log::debug!("sheet {sheet} dismissed");
        self.destroy_sheet(sheet, target_id);
    }

    /// Hit-test region of the wrapper for a visible height.
    fn process_column_rect(&mut self, sheet: NodeId, height: f32) {
        let sheet_size = self.context.arena.frame_size(sheet);
        let Some(rect) = self.sheet_pattern(sheet).map(|p| p.column_rect(height, sheet_size)) else {
            return;
        };
        if let Some(wrapper) = self.context.arena.parent(sheet)
            && let Some(node) = self.context.arena.get_mut(wrapper)
        {
            node.gesture.response_region = vec![rect];
        }
    }

    /// Fit the scroll to `height` of visible sheet, less the operation
    /// area. Center and popup sheets always use their full frame.
    fn change_scroll_height(&mut self, sheet: NodeId, height: f32) {
        let Some(sheet_type) = self.sheet_pattern(sheet).map(SheetPresentationPattern::sheet_type)
        else {
            return;
        };
        let arena = &mut self.context.arena;
        let sheet_size = arena.frame_size(sheet);
        let operation_height = arena
            .first_child(sheet)
            .map_or(0.0, |operation| arena.frame_size(operation).height);
        let visible = match sheet_type {
            SheetType::Center | SheetType::Popup => sheet_size.height,
            _ => height,
        };
        if let Some(scroll) = arena.child_at(sheet, 1)
            && let Some(node) = arena.get_mut(scroll)
        {
            let scroll_height = (visible - operation_height).max(0.0);
            node.layout.ideal_size = Some(SizeF::new(sheet_size.width, scroll_height));
            node.frame.height = scroll_height;
        }
    }

    /// Remove the top sheet at once, mask and wrapper included.
    ///
    /// Does nothing unless the top modal is a sheet bound to `target_id`.
    pub fn destroy_sheet(&mut self, sheet: NodeId, target_id: i32) {
        let on_top = self.modal_stack.last().is_some_and(|top| {
            self.sheet_pattern(*top)
                .is_some_and(|p| p.target_id() == target_id)
        });
        if !on_top {
            log::debug!("destroy sheet skipped: target {target_id} is not on top");
            return;
        }
        self.modal_page_lost_focus(sheet);
        if let Some(mask) = self.sheet_mask(sheet) {
            self.discard(mask);
        }
        if let Some(pattern) = self.sheet_pattern_mut(sheet) {
            pattern.on_disappear();
        }
        match self.context.arena.parent(sheet) {
            Some(wrapper) => self.discard(wrapper),
            None => self.discard(sheet),
        }
        self.sheet_map.remove(&target_id);
        self.modal_stack.pop();
        self.modal_list.retain(|node| *node != sheet);
        self.fire_modal_page_hide();
        self.save_last_modal_node();
    }

    /// Close the sheet bound to `target_id` with its exit animation.
    pub fn close_sheet(&mut self, target_id: i32) {
        if self.modal_stack.is_empty() {
            return;
        }
        let Some(sheet) = self.sheet_node(target_id) else {
            self.delete_modal(target_id);
            return;
        };
        log::debug!("close sheet {sheet} of target {target_id}");
        self.modal_page_lost_focus(sheet);
        self.play_sheet_exit(sheet, 0.0, Completion::SheetClosed);
        self.sheet_map.remove(&target_id);
        self.modal_stack.retain(|node| *node != sheet);
        self.modal_list.retain(|node| *node != sheet);
        self.fire_modal_page_hide();
        self.save_last_modal_node();
    }

    /// Dismiss the top sheet, bypassing its should-dismiss hook.
    pub fn dismiss_sheet(&mut self) {
        let Some(top) = self.modal_stack.last().copied() else {
            return;
        };
        if self.sheet_pattern(top).is_none() {
            return;
        }
        self.play_sheet_exit(top, 0.0, Completion::SheetDismissed);
    }

    /// A click on a sheet mask.
    pub fn click_sheet_mask(&mut self, mask: NodeId) {
        let clickable = self
            .context
            .arena
            .get(mask)
            .is_some_and(|n| n.gesture.clickable);
        if !clickable {
            return;
        }
        let arena = &self.context.arena;
        let sheet = arena
            .parent(mask)
            .zip(arena.index_in_parent(mask))
            .and_then(|(root, index)| arena.child_at(root, index + 1))
            .and_then(|wrapper| arena.first_child(wrapper));
        if let Some(sheet) = sheet {
            self.sheet_interactive_dismiss(sheet, false, 0.0);
        }
    }

    /// A user-initiated dismissal: the should-dismiss hook wins, and a
    /// vetoed drag settles back to the current height.
    fn sheet_interactive_dismiss(&mut self, sheet: NodeId, is_drag_close: bool, velocity: f32) {
        let Some(pattern) = self.sheet_pattern(sheet) else {
            return;
        };
        if pattern.has_should_dismiss() {
            if is_drag_close {
                let height = pattern.height();
                self.process_column_rect(sheet, height);
                self.change_scroll_height(sheet, height);
                self.play_sheet_settle(sheet, false, 0.0, false);
            }
            if let Some(pattern) = self.sheet_pattern_mut(sheet) {
                pattern.call_should_dismiss();
            }
            return;
        }
        self.play_sheet_exit(sheet, velocity, Completion::SheetDismissed);
    }

    /// Begin a drag on the sheet bound to `target_id`. The animation
    /// driving its translate, if any, stops before this returns.
    pub fn sheet_drag_start(&mut self, target_id: i32) {
        let Some(sheet) = self.sheet_node(target_id) else {
            return;
        };
        let cancelled = self.sheet_pattern_mut(sheet).and_then(|p| p.drag_start());
        if let Some(id) = cancelled {
            self.context.animator.stop(id);
        }
    }

    pub fn sheet_drag_update(&mut self, target_id: i32, delta: f32) -> Option<DragFrame> {
        let sheet = self.sheet_node(target_id)?;
        let frame = self.sheet_pattern_mut(sheet)?.drag_update(delta)?;
        self.apply_drag_frame(sheet, frame);
        Some(frame)
    }

    /// Release a drag; `velocity` is positive downward, in px/s.
    pub fn sheet_drag_end(&mut self, target_id: i32, velocity: f32) -> Option<DragOutcome> {
        let sheet = self.sheet_node(target_id)?;
        let outcome = self.sheet_pattern_mut(sheet)?.drag_end(velocity)?;
        self.apply_drag_outcome(sheet, outcome);
        Some(outcome)
    }

    pub fn sheet_coord_scroll_start(&mut self, target_id: i32) {
        let Some(sheet) = self.sheet_node(target_id) else {
            return;
        };
        let cancelled = self
            .sheet_pattern_mut(sheet)
            .and_then(|p| p.coord_scroll_start());
        if let Some(id) = cancelled {
            self.context.animator.stop(id);
        }
    }

    /// Offer a content scroll step to the sheet. None means the content
    /// keeps it.
    pub fn sheet_coord_scroll_update(
        &mut self,
        target_id: i32,
        scroll_offset: f32,
    ) -> Option<DragFrame> {
        let sheet = self.sheet_node(target_id)?;
        let frame = self
            .sheet_pattern_mut(sheet)?
            .coord_scroll_update(scroll_offset)?;
        self.apply_drag_frame(sheet, frame);
        Some(frame)
    }

    pub fn sheet_coord_scroll_end(&mut self, target_id: i32, velocity: f32) -> Option<DragOutcome> {
        let sheet = self.sheet_node(target_id)?;
        let outcome = self.sheet_pattern_mut(sheet)?.coord_scroll_end(velocity)?;
        self.apply_drag_outcome(sheet, outcome);
        Some(outcome)
    }

    fn apply_drag_frame(&mut self, sheet: NodeId, frame: DragFrame) {
        self.apply(
            sheet,
            [AnimationTarget::Translate(OffsetF::new(0.0, frame.translate_y))],
        );
        self.change_scroll_height(sheet, frame.visible_height);
    }

    fn apply_drag_outcome(&mut self, sheet: NodeId, outcome: DragOutcome) {
        match outcome {
            DragOutcome::Settle {
                height,
                velocity,
                resize,
            } => {
                if resize {
                    self.change_scroll_height(sheet, height);
                    self.process_column_rect(sheet, height);
                }
                self.play_sheet_settle(sheet, false, velocity, false);
            }
            DragOutcome::Dismiss { velocity } => {
                self.sheet_interactive_dismiss(sheet, true, velocity);
            }
        }
    }

    /// Keep the focused input of the sheet bound to `target_id` above the
    /// soft keyboard.
    pub fn sheet_avoid_safe_area(&mut self, target_id: i32) {
        if let Some(sheet) = self.sheet_node(target_id) {
            self.avoid_safe_area(sheet);
        }
    }

    fn avoid_safe_area(&mut self, sheet: NodeId) {
        let safe_area = self.context.safe_area();
        let env = KeyboardEnv {
            root_height: self.context.root_height(),
            caret: self.context.caret(),
            keyboard_height: safe_area.keyboard,
            navigation_bar: safe_area.navigation_bar,
            frame_height: self.context.arena.frame_size(sheet).height,
        };
        let blank = self.context.px(crate::sheet::SHEET_BLANK_MINI_HEIGHT);
        let Some(pattern) = self.sheet_pattern_mut(sheet) else {
            return;
        };
        if !pattern.update_keyboard_height(safe_area.keyboard) {
            return;
        }
        let height_up = pattern.sheet_height_change(&env);
        let offset = pattern.page_height() - pattern.height() - height_up;
        let scrolling = pattern.is_scrolling();
        let undo = -pattern.scroll_height();
        let top = pattern.page_height() - env.frame_height + blank + pattern.status_bar_height();
        log::debug!(
            "sheet {} keyboard {}: lift {height_up}",
            pattern.target_id(),
            safe_area.keyboard
        );
        if !scrolling {
            self.apply(sheet, [AnimationTarget::Translate(OffsetF::new(0.0, offset))]);
        } else if near_zero(height_up) {
            self.scroll_sheet(sheet, undo);
            self.apply(sheet, [AnimationTarget::Translate(OffsetF::new(0.0, offset))]);
        } else {
            self.apply(sheet, [AnimationTarget::Translate(OffsetF::new(0.0, top))]);
            self.scroll_sheet(sheet, height_up);
        }
    }

    /// Scroll the content of the sheet bound to `target_id` by `height`;
    /// a negative value undoes an earlier scroll.
    pub fn sheet_scroll_to(&mut self, target_id: i32, height: f32) {
        if let Some(sheet) = self.sheet_node(target_id) {
            self.scroll_sheet(sheet, height);
        }
    }

    fn scroll_sheet(&mut self, sheet: NodeId, height: f32) {
        let Some(pattern) = self.sheet_pattern_mut(sheet) else {
            return;
        };
        pattern.record_scroll(height);
        let scrolling = pattern.is_scrolling();
        let arena = &mut self.context.arena;
        if let Some(scroll) = arena.child_at(sheet, 1)
            && let Some(node) = arena.get_mut(scroll)
        {
            let size = node.frame.size();
            node.layout.scroll_enabled = scrolling;
            node.layout.ideal_size = Some(SizeF::new(size.width, size.height - height));
            node.layout.scroll_position = -height;
        }
    }

    /// The window was resized or rotated; the host has already updated the
    /// root size.
    pub fn sheet_window_rotated(&mut self, target_id: i32, rotated: bool) {
        let Some(sheet) = self.sheet_node(target_id) else {
            return;
        };
        let Some(pattern) = self.sheet_pattern_mut(sheet) else {
            return;
        };
        pattern.on_window_changed(rotated);
        let undo = pattern.is_scrolling().then(|| -pattern.scroll_height());
        if rotated && let Some(content) = self.sheet_content(sheet)
            && let Some(node) = self.context.arena.get_mut(content)
        {
            node.layout.min_size = None;
        }
        if let Some(undo) = undo {
            self.scroll_sheet(sheet, undo);
        }
        if let Some(wrapper) = self.context.arena.parent(sheet) {
            let root_size = self.context.root_size();
            if let Some(node) = self.context.arena.get_mut(wrapper) {
                node.frame.set_size(root_size);
            }
        }
        if let Some(mask) = self.sheet_mask(sheet) {
            let root_size = self.context.root_size();
            if let Some(node) = self.context.arena.get_mut(mask) {
                node.frame.set_size(root_size);
            }
        }
        self.refresh_sheet_type(sheet);
        self.on_sheet_layout(sheet);
    }
}
