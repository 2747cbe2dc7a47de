//! State of one presented sheet.
//!
//! Everything here is pure bookkeeping: drag and scroll gestures, detent
//! selection and keyboard avoidance return what should happen (a live
//! translate, a detent to settle on, a dismissal) and the manager applies
//! it to the tree. The manager also owns the animations; it reports the ids
//! it starts so a drag can cancel them.

use uitree::geometry::{
    great_not_equal, great_or_equal, less_not_equal, less_or_equal, near_equal, near_zero,
};
use uitree::{AnimationId, NodeId, OffsetF, RectF, SizeF, Visibility};

use super::{
    FRICTION_FACTOR, MEDIUM_SIZE, SHEET_AVOID_MARGIN, SHEET_BLANK_MINI_HEIGHT,
    SHEET_VELOCITY_THRESHOLD, SheetMetrics,
};
use crate::context::CaretInfo;
use crate::pattern::{Callback, Focusable, VisibilityCallback};
use crate::style::{SheetHeight, SheetMode, SheetStyle, SheetType};

/// Rubber-band factor for a drag past the tallest detent.
///
/// `gamma` is the over-extension as a fraction of the sheet max height;
/// it is clamped to `[0, 1]`, so the factor runs from 1 down to
/// `exp(-1.848)`.
pub fn friction(gamma: f32) -> f32 {
    (-FRICTION_FACTOR * gamma.clamp(0.0, 1.0)).exp()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SheetDragState {
    #[default]
    Idle,
    Dragging,
    AnimatingToDetent,
    AnimatingDismiss,
}

/// Live geometry after a drag or coordinated scroll step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragFrame {
    pub visible_height: f32,
    pub translate_y: f32,
}

/// What a released drag resolves to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    /// Settle on `height`. With `resize` the content grows to the new
    /// height before the animation instead of after it.
    Settle {
        height: f32,
        velocity: f32,
        resize: bool,
    },
    Dismiss {
        velocity: f32,
    },
}

/// Inputs of keyboard avoidance, all in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyboardEnv {
    pub root_height: f32,
    pub caret: Option<CaretInfo>,
    pub keyboard_height: f32,
    pub navigation_bar: f32,
    pub frame_height: f32,
}

enum Bracket {
    Up,
    Down,
}

pub struct SheetPresentationPattern {
    target_id: i32,
    target_node: Option<NodeId>,
    style: SheetStyle,
    sheet_type: SheetType,
    density: f32,
    detents: Vec<f32>,
    /// Settled visible height.
    height: f32,
    /// Accumulated drag offset; negative while pulled up.
    current_offset: f32,
    page_height: f32,
    sheet_max_height: f32,
    sheet_max_width: f32,
    center_height: f32,
    sheet_offset: OffsetF,
    status_bar_height: f32,
    keyboard_height: f32,
    scroll_height: f32,
    is_scrolling: bool,
    fit_content_height: f32,
    first_init: bool,
    recorded_frame_height: f32,
    recorded_type: SheetType,
    window_rotate: bool,
    window_changed: bool,
    first_measure: bool,
    state: SheetDragState,
    animation: Option<AnimationId>,
    interrupted: Option<AnimationId>,
    callback: Option<VisibilityCallback>,
    on_disappear: Option<Callback>,
    should_dismiss: Option<Callback>,
    executed_on_disappear: bool,
}

impl SheetPresentationPattern {
    pub fn new(target_id: i32, style: SheetStyle, density: f32) -> Self {
        Self {
            target_id,
            target_node: None,
            style,
            sheet_type: SheetType::Bottom,
            density,
            detents: Vec::new(),
            height: 0.0,
            current_offset: 0.0,
            page_height: 0.0,
            sheet_max_height: 0.0,
            sheet_max_width: 0.0,
            center_height: 0.0,
            sheet_offset: OffsetF::ZERO,
            status_bar_height: 0.0,
            keyboard_height: 0.0,
            scroll_height: 0.0,
            is_scrolling: false,
            fit_content_height: 0.0,
            first_init: true,
            recorded_frame_height: 0.0,
            recorded_type: SheetType::Bottom,
            window_rotate: false,
            window_changed: false,
            first_measure: true,
            state: SheetDragState::Idle,
            animation: None,
            interrupted: None,
            callback: None,
            on_disappear: None,
            should_dismiss: None,
            executed_on_disappear: false,
        }
    }

    pub fn target_id(&self) -> i32 {
        self.target_id
    }

    pub fn target_node(&self) -> Option<NodeId> {
        self.target_node
    }

    pub fn set_target_node(&mut self, target: Option<NodeId>) {
        self.target_node = target;
    }

    pub fn style(&self) -> &SheetStyle {
        &self.style
    }

    pub fn update_style(&mut self, style: SheetStyle) {
        self.style = style;
    }

    pub fn sheet_type(&self) -> SheetType {
        self.sheet_type
    }

    pub fn set_sheet_type(&mut self, sheet_type: SheetType) {
        self.sheet_type = sheet_type;
    }

    pub fn detents(&self) -> &[f32] {
        &self.detents
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn set_height(&mut self, height: f32) {
        if !near_equal(self.height, height) {
            log::debug!("sheet {} height {} -> {height}", self.target_id, self.height);
            self.height = height;
        }
    }

    pub fn current_offset(&self) -> f32 {
        self.current_offset
    }

    pub fn page_height(&self) -> f32 {
        self.page_height
    }

    pub fn sheet_max_height(&self) -> f32 {
        self.sheet_max_height
    }

    pub fn sheet_max_width(&self) -> f32 {
        self.sheet_max_width
    }

    pub fn center_height(&self) -> f32 {
        self.center_height
    }

    pub fn sheet_offset(&self) -> OffsetF {
        self.sheet_offset
    }

    pub fn status_bar_height(&self) -> f32 {
        self.status_bar_height
    }

    pub fn state(&self) -> SheetDragState {
        self.state
    }

    pub fn animation(&self) -> Option<AnimationId> {
        self.animation
    }

    pub fn interrupted(&self) -> Option<AnimationId> {
        self.interrupted
    }

    pub fn scroll_height(&self) -> f32 {
        self.scroll_height
    }

    pub fn is_scrolling(&self) -> bool {
        self.is_scrolling
    }

    pub fn keyboard_height(&self) -> f32 {
        self.keyboard_height
    }

    pub fn fit_content_height(&self) -> f32 {
        self.fit_content_height
    }

    /// Largest named height: the max height less the top blank.
    pub fn large_height(&self) -> f32 {
        self.sheet_max_height - SHEET_BLANK_MINI_HEIGHT.to_px(self.density)
    }

    /// Translate that shows `height` of the sheet.
    pub fn offset_for(&self, height: f32) -> f32 {
        self.page_height - height
    }

    pub fn set_callback(&mut self, callback: Option<VisibilityCallback>) {
        self.callback = callback;
    }

    pub fn update_on_disappear(&mut self, on_disappear: Option<Callback>) {
        self.on_disappear = on_disappear;
        self.executed_on_disappear = false;
    }

    pub fn update_should_dismiss(&mut self, should_dismiss: Option<Callback>) {
        self.should_dismiss = should_dismiss;
    }

    pub fn has_should_dismiss(&self) -> bool {
        self.should_dismiss.is_some()
    }

    pub fn call_should_dismiss(&mut self) {
        if let Some(callback) = self.should_dismiss.as_mut() {
            log::debug!("sheet {} dismissal vetoed", self.target_id);
            callback();
        }
    }

    pub fn fire_callback(&mut self, visible: bool) {
        if let Some(callback) = self.callback.as_mut() {
            callback(visible);
        }
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

    /// Take the geometry of a finished measure pass.
    pub fn apply_metrics(&mut self, metrics: &SheetMetrics, status_bar_height: f32) {
        self.status_bar_height = status_bar_height;
        if metrics.sheet_max_height > 0.0 {
            self.page_height = metrics.sheet_max_height;
            self.sheet_max_height = metrics.sheet_max_height - status_bar_height;
            self.sheet_max_width = metrics.sheet_max_width;
            self.center_height = metrics.center_height;
            self.sheet_offset = metrics.sheet_offset;
        }
    }

    /// Pixel height of one requested gear.
    ///
    /// Detent initialization and offset computation both go through here, so
    /// a gear always maps to the same height.
    pub fn resolve_height(&self, gear: SheetHeight, fit_content: f32) -> f32 {
        let large = self.large_height();
        match gear.sheet_mode {
            Some(SheetMode::Medium) => self.page_height * MEDIUM_SIZE,
            Some(SheetMode::Large) => large,
            Some(SheetMode::Auto) => {
                if great_not_equal(fit_content, large) {
                    large
                } else {
                    fit_content
                }
            }
            None => {
                let Some(dimension) = gear.height else {
                    return large;
                };
                let height = if dimension.is_percent() {
                    dimension.to_px_with_size(self.sheet_max_height, self.density)
                } else {
                    dimension.to_px(self.density)
                };
                if height > large || height < 0.0 {
                    large
                } else {
                    height
                }
            }
        }
    }

    /// Rebuild the detent list for the current type.
    ///
    /// Returns true when an auto-height detent changed while the sheet sat on
    /// it; the sheet has then taken the new height and must animate there.
    pub fn init_detents(&mut self, frame_height: f32, fit_content: f32) -> bool {
        self.detents.clear();
        let mut refit = false;
        match self.sheet_type {
            SheetType::Bottom | SheetType::BottomPc => {
                let gears: Vec<SheetHeight> = if self.style.detents.is_empty() {
                    vec![self.style.single_gear()]
                } else {
                    self.style.detents.clone()
                };
                for gear in gears {
                    let height = self.resolve_height(gear, fit_content);
                    if gear.sheet_mode == Some(SheetMode::Auto) {
                        refit |= self.fit_content_changed(height);
                    }
                    self.detents.push(height);
                }
                self.detents.sort_by(|a, b| a.total_cmp(b));
                self.detents.dedup_by(|a, b| near_equal(*a, *b));
            }
            SheetType::BottomLandscape => {
                self.detents
                    .push(frame_height - SHEET_BLANK_MINI_HEIGHT.to_px(self.density));
            }
            SheetType::Center => {
                self.detents.push((self.center_height + self.page_height) / 2.0);
            }
            SheetType::Popup => {}
        }
        refit
    }

    fn fit_content_changed(&mut self, height: f32) -> bool {
        let changed = !near_zero(self.height)
            && near_equal(self.height, self.fit_content_height)
            && !near_equal(height, self.fit_content_height);
        if changed {
            self.set_height(height);
        }
        self.fit_content_height = height;
        changed
    }

    /// Compare the measured frame with the last one seen.
    ///
    /// The first call only records. Later calls report a change in frame
    /// height, sheet type, or a pending window change.
    pub fn check_height_change(&mut self, frame_height: f32) -> bool {
        if self.first_init {
            self.recorded_frame_height = frame_height;
            self.recorded_type = self.sheet_type;
            self.first_init = false;
            return false;
        }
        if !near_equal(frame_height, self.recorded_frame_height)
            || self.recorded_type != self.sheet_type
            || self.window_changed
        {
            self.recorded_frame_height = frame_height;
            self.recorded_type = self.sheet_type;
            self.window_changed = false;
            return true;
        }
        false
    }

    pub fn recorded_frame_height(&self) -> f32 {
        self.recorded_frame_height
    }

    /// Record an animation driving the sheet's translate.
    pub fn start_animation(&mut self, id: AnimationId, dismiss: bool) {
        self.animation = Some(id);
        self.state = if dismiss {
            SheetDragState::AnimatingDismiss
        } else {
            SheetDragState::AnimatingToDetent
        };
    }

    /// Account for a settle completion.
    ///
    /// Returns false when the completion belongs to an animation a drag
    /// interrupted, or arrives mid-drag; the caller then skips its settle
    /// bookkeeping. Any other completion clears a stale interruption.
    pub fn finish_settle(&mut self, id: AnimationId) -> bool {
        if self.interrupted == Some(id) {
            self.interrupted = None;
            return false;
        }
        self.interrupted = None;
        if self.animation == Some(id) {
            self.animation = None;
        }
        if self.state == SheetDragState::Dragging {
            return false;
        }
        self.current_offset = 0.0;
        self.state = SheetDragState::Idle;
        true
    }

    pub fn finish_dismiss(&mut self) {
        self.animation = None;
        self.state = SheetDragState::Idle;
    }

    /// Begin a drag. Returns the in-flight animation the caller must stop.
    ///
    /// A sheet already animating away keeps going and ignores the drag.
    pub fn drag_start(&mut self) -> Option<AnimationId> {
        if self.state == SheetDragState::AnimatingDismiss {
            return None;
        }
        let cancelled = match self.state {
            SheetDragState::AnimatingToDetent => self.animation.take(),
            _ => None,
        };
        if let Some(id) = cancelled {
            log::debug!("sheet {} drag interrupts {id}", self.target_id);
            self.interrupted = Some(id);
        }
        self.current_offset = 0.0;
        self.state = SheetDragState::Dragging;
        cancelled
    }

    /// Apply a vertical drag step; positive `delta` moves down.
    pub fn drag_update(&mut self, delta: f32) -> Option<DragFrame> {
        if !self.accepts_drag() {
            return None;
        }
        let max_detent = *self.detents.last()?;
        let visible = self.height - self.current_offset;
        let mut delta = delta;
        if great_not_equal(visible, max_detent) && less_not_equal(delta, 0.0) {
            let over = if self.sheet_max_height > 0.0 {
                (visible - max_detent) / self.sheet_max_height
            } else {
                1.0
            };
            delta *= friction(over);
        }
        let previous = self.current_offset;
        self.current_offset += delta;
        if near_equal(self.current_offset, previous) {
            return None;
        }
        self.state = SheetDragState::Dragging;
        Some(self.clamp_frame())
    }

    /// Begin a scroll handed over from the sheet content.
    pub fn coord_scroll_start(&mut self) -> Option<AnimationId> {
        self.drag_start()
    }

    /// Apply a scroll step handed over from the content.
    ///
    /// Returns None when the sheet does not take the scroll: it is already
    /// at its tallest detent and the content scrolls up.
    pub fn coord_scroll_update(&mut self, scroll_offset: f32) -> Option<DragFrame> {
        if !self.accepts_drag() {
            return None;
        }
        let max_detent = *self.detents.last()?;
        if near_zero(self.current_offset)
            && less_not_equal(scroll_offset, 0.0)
            && great_or_equal(self.height, max_detent)
        {
            return None;
        }
        self.current_offset += scroll_offset;
        self.state = SheetDragState::Dragging;
        Some(self.clamp_frame())
    }

    pub fn coord_scroll_end(&mut self, velocity: f32) -> Option<DragOutcome> {
        self.drag_end(velocity)
    }

    fn accepts_drag(&self) -> bool {
        self.sheet_type != SheetType::Popup
            && !self.detents.is_empty()
            && self.state != SheetDragState::AnimatingDismiss
    }

    /// Keep the visible height within `[0, sheet max height]`.
    fn clamp_frame(&mut self) -> DragFrame {
        let mut translate = self.page_height - self.height + self.current_offset;
        if less_or_equal(translate, self.page_height - self.sheet_max_height) {
            translate = self.page_height - self.sheet_max_height;
            self.current_offset = self.height - self.sheet_max_height;
        }
        if self.height - self.current_offset < 0.0 {
            self.current_offset = self.height;
            translate = self.page_height;
        }
        let visible_height = self.height - self.current_offset;
        log::trace!("sheet {} drag to {visible_height}", self.target_id);
        DragFrame {
            visible_height,
            translate_y: translate,
        }
    }

    /// Resolve a released drag; `velocity` is positive downward, in px/s.
    ///
    /// The release height is bracketed between neighboring detents. Slow
    /// releases pick the nearer bracket; fast ones, or equidistant ones,
    /// follow the drag direction. Resolving below the lowest detent
    /// dismisses. The outcome's height is already the sheet's new height.
    pub fn drag_end(&mut self, velocity: f32) -> Option<DragOutcome> {
        if self.sheet_type == SheetType::Popup || self.detents.is_empty() {
            return None;
        }
        if self.state != SheetDragState::Dragging {
            return None;
        }
        let count = self.detents.len();
        let current = (self.height - self.current_offset).min(self.sheet_max_height);
        let lower = self.detents.partition_point(|d| *d < current);
        let upper = self.detents.partition_point(|d| *d <= current);
        let (up, down) = if lower == count {
            (self.detents[count - 1], self.detents[count - 1])
        } else if lower == 0 {
            (self.detents[0], 0.0)
        } else {
            (self.detents[upper.min(count - 1)], self.detents[lower - 1])
        };

        let speed = velocity.abs();
        let to_up = (current - up).abs();
        let to_down = (current - down).abs();
        let (bracket, slow) =
            if less_not_equal(speed, SHEET_VELOCITY_THRESHOLD) && !near_equal(to_up, to_down) {
                if great_not_equal(to_up, to_down) {
                    (Bracket::Down, true)
                } else {
                    (Bracket::Up, true)
                }
            } else if great_or_equal(self.current_offset, 0.0) {
                (Bracket::Down, false)
            } else {
                (Bracket::Up, false)
            };

        let outcome = match bracket {
            Bracket::Down if near_zero(down) => DragOutcome::Dismiss { velocity: speed },
            Bracket::Down => {
                self.set_height(down);
                DragOutcome::Settle {
                    height: down,
                    velocity: speed,
                    resize: false,
                }
            }
            Bracket::Up => {
                self.set_height(up);
                DragOutcome::Settle {
                    height: up,
                    velocity: speed,
                    resize: slow || !near_equal(up, down),
                }
            }
        };
        log::debug!(
            "sheet {} released at {current} ({velocity} px/s): {outcome:?}",
            self.target_id
        );
        Some(outcome)
    }

    /// Lift needed to keep the focused caret above the keyboard.
    ///
    /// When lifting to the large height is not enough, the sheet is marked
    /// scrolling and the returned value is the remainder to scroll instead.
    pub fn sheet_height_change(&mut self, env: &KeyboardEnv) -> f32 {
        let Some(caret) = env.caret else {
            return 0.0;
        };
        let input_height =
            env.root_height - caret.y - caret.height - SHEET_AVOID_MARGIN.to_px(self.density);
        let keyboard_height = env.keyboard_height + env.navigation_bar;
        let large = env.frame_height
            - SHEET_BLANK_MINI_HEIGHT.to_px(self.density)
            - self.status_bar_height;
        let max_lift = large - self.height;
        if input_height >= keyboard_height {
            return 0.0;
        }
        let lift = keyboard_height - input_height;
        if lift <= max_lift {
            return lift;
        }
        self.is_scrolling = true;
        lift - max_lift
    }

    /// Record a new keyboard inset. Returns false if it did not change.
    pub fn update_keyboard_height(&mut self, height: f32) -> bool {
        if near_equal(self.keyboard_height, height) {
            return false;
        }
        self.keyboard_height = height;
        true
    }

    /// Record a content scroll of `height`; negative values undo one.
    pub fn record_scroll(&mut self, height: f32) {
        self.scroll_height = height;
        self.is_scrolling = height > 0.0;
    }

    /// Note a window rotation or resize.
    pub fn on_window_changed(&mut self, rotated: bool) {
        self.window_changed = true;
        if rotated && matches!(self.sheet_type, SheetType::Bottom | SheetType::BottomLandscape) {
            self.window_rotate = true;
            self.first_measure = true;
        }
    }

    /// Consume a pending rotation.
    pub fn take_window_rotate(&mut self) -> bool {
        std::mem::take(&mut self.window_rotate)
    }

    /// Consume the first-measure flag that pins the content min size.
    pub fn take_first_measure(&mut self) -> bool {
        std::mem::take(&mut self.first_measure)
    }

    pub fn is_first_measure(&self) -> bool {
        self.first_measure
    }

    /// Hit-test region of the wrapper for a visible height.
    pub fn column_rect(&self, visible_height: f32, sheet_size: SizeF) -> RectF {
        match self.sheet_type {
            SheetType::Popup => RectF::new(
                self.sheet_offset.x,
                self.sheet_offset.y,
                sheet_size.width,
                sheet_size.height,
            ),
            SheetType::Center => RectF::new(
                self.sheet_offset.x,
                self.page_height - visible_height,
                sheet_size.width,
                sheet_size.height,
            ),
            SheetType::Bottom | SheetType::BottomPc => RectF::new(
                0.0,
                self.page_height - visible_height,
                self.sheet_max_width,
                visible_height,
            ),
            SheetType::BottomLandscape => RectF::new(
                self.sheet_offset.x,
                self.page_height - visible_height,
                sheet_size.width,
                visible_height,
            ),
        }
    }

    pub fn drag_bar_visibility(&self) -> Visibility {
        let has_title_builder = self.style.is_title_builder.is_some();
        let show = self.style.show_drag_bar.unwrap_or(true);
        if self.sheet_type.is_bottom() && self.detents.len() > 1 && show {
            Visibility::Visible
        } else if has_title_builder {
            Visibility::Invisible
        } else {
            Visibility::Gone
        }
    }

    pub fn close_icon_visibility(&self) -> Visibility {
        if self.style.show_close_icon.unwrap_or(true) {
            Visibility::Visible
        } else {
            Visibility::Invisible
        }
    }

    /// Interactive sheets let touches reach the content below the mask.
    pub fn mask_visibility(&self) -> Visibility {
        match self.style.interactive {
            None if self.sheet_type == SheetType::Popup => Visibility::Invisible,
            Some(true) => Visibility::Invisible,
            _ => Visibility::Visible,
        }
    }
}

impl Focusable for SheetPresentationPattern {
    fn restores_focus(&self) -> bool {
        self.state != SheetDragState::AnimatingDismiss
    }
}
