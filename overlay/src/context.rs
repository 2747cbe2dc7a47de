//! Per-surface pipeline context.
//!
//! One context exists per window or subwindow. It owns the node arena the
//! overlays live in together with the clocks that drive them (animator and
//! UI task queue), the focus tracker, the theme and the window environment
//! (root size, density, safe area). Managers never reach for process-wide
//! state; everything they need is reachable from here.

use std::fmt;

use uitree::{
    Animator, Dimension, FocusState, NodeArena, NodeId, RectF, SizeF, TaskExecutor,
};
use uuid::Uuid;

use crate::pattern::Pattern;
use crate::task::{Completion, UiTask};
use crate::theme::{DefaultTheme, ThemeProvider, ThemeRef};

/// Identity of one surface (main window or subwindow).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(Uuid);

impl SurfaceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SurfaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface-{}", self.0.simple())
    }
}

/// System insets, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SafeArea {
    pub status_bar: f32,
    pub navigation_bar: f32,
    /// Height of the soft keyboard; zero when hidden.
    pub keyboard: f32,
}

/// Caret of the focused text input, in root coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaretInfo {
    pub y: f32,
    pub height: f32,
}

pub struct PipelineContext {
    id: SurfaceId,
    pub arena: NodeArena<Pattern>,
    pub animator: Animator<Completion>,
    pub executor: TaskExecutor<UiTask>,
    pub focus: FocusState,
    theme: ThemeRef,
    root: NodeId,
    stage: NodeId,
    root_size: SizeF,
    density: f32,
    safe_area: SafeArea,
    caret: Option<CaretInfo>,
    window_rect: RectF,
    foldable_expanded: bool,
    is_subwindow: bool,
    close_button_enabled: bool,
    subwindow_visible: bool,
}

impl PipelineContext {
    pub fn builder() -> PipelineContextBuilder {
        PipelineContextBuilder::default()
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn theme(&self) -> &dyn ThemeProvider {
        self.theme.as_ref()
    }

    pub fn theme_ref(&self) -> ThemeRef {
        self.theme.clone()
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Container of the page stack.
    pub fn stage(&self) -> NodeId {
        self.stage
    }

    /// Topmost page on the stage.
    pub fn last_page(&self) -> Option<NodeId> {
        self.arena.last_child(self.stage)
    }

    /// Push a new page on the stage.
    pub fn push_page(&mut self) -> NodeId {
        let page = self.arena.create("page", Pattern::Page);
        if let Some(node) = self.arena.get_mut(page) {
            node.frame.set_size(self.root_size);
        }
        self.arena.mount(page, self.stage);
        page
    }

    pub fn root_size(&self) -> SizeF {
        self.root_size
    }

    pub fn root_height(&self) -> f32 {
        self.root_size.height
    }

    pub fn set_root_size(&mut self, size: SizeF) {
        self.root_size = size;
        for id in [self.root, self.stage] {
            if let Some(node) = self.arena.get_mut(id) {
                node.frame.set_size(size);
            }
        }
        let pages = self.arena.children(self.stage).to_vec();
        for page in pages {
            if let Some(node) = self.arena.get_mut(page) {
                node.frame.set_size(size);
            }
        }
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    /// Virtual pixels to pixels.
    pub fn vp(&self, value: f32) -> f32 {
        value * self.density
    }

    pub fn px(&self, dimension: Dimension) -> f32 {
        dimension.to_px(self.density)
    }

    pub fn safe_area(&self) -> SafeArea {
        self.safe_area
    }

    pub fn set_safe_area(&mut self, safe_area: SafeArea) {
        self.safe_area = safe_area;
    }

    pub fn set_keyboard_inset(&mut self, height: f32) {
        self.safe_area.keyboard = height;
    }

    pub fn caret(&self) -> Option<CaretInfo> {
        self.caret
    }

    pub fn set_caret(&mut self, caret: Option<CaretInfo>) {
        self.caret = caret;
    }

    pub fn window_rect(&self) -> RectF {
        self.window_rect
    }

    pub fn set_window_rect(&mut self, rect: RectF) {
        self.window_rect = rect;
    }

    pub fn is_foldable_expanded(&self) -> bool {
        self.foldable_expanded
    }

    pub fn set_foldable_expanded(&mut self, expanded: bool) {
        self.foldable_expanded = expanded;
    }

    pub fn is_subwindow(&self) -> bool {
        self.is_subwindow
    }

    /// Whether the host window's close button accepts clicks.
    pub fn is_close_button_enabled(&self) -> bool {
        self.close_button_enabled
    }

    pub(crate) fn set_close_button_enabled(&mut self, enabled: bool) {
        if self.close_button_enabled != enabled {
            log::debug!("{} close button enabled: {enabled}", self.id);
        }
        self.close_button_enabled = enabled;
    }

    pub fn is_subwindow_visible(&self) -> bool {
        self.subwindow_visible
    }

    pub(crate) fn show_subwindow(&mut self) {
        if self.is_subwindow {
            self.subwindow_visible = true;
        }
    }

    pub(crate) fn hide_subwindow(&mut self) {
        if self.is_subwindow && self.subwindow_visible {
            log::debug!("{} hiding subwindow", self.id);
            self.subwindow_visible = false;
        }
    }

    pub fn set_reduced_motion(&mut self, enabled: bool) {
        self.animator.set_reduced_motion(enabled);
    }
}

#[derive(Debug)]
pub struct PipelineContextBuilder {
    root_size: SizeF,
    density: f32,
    safe_area: SafeArea,
    window_rect: Option<RectF>,
    foldable_expanded: bool,
    subwindow: bool,
    reduce_motion: bool,
    theme: Option<ThemeRef>,
}

impl Default for PipelineContextBuilder {
    fn default() -> Self {
        Self {
            root_size: SizeF::new(1080.0, 2340.0),
            density: 3.0,
            safe_area: SafeArea::default(),
            window_rect: None,
            foldable_expanded: false,
            subwindow: false,
            reduce_motion: false,
            theme: None,
        }
    }
}

impl PipelineContextBuilder {
    pub fn root_size(mut self, width: f32, height: f32) -> Self {
        self.root_size = SizeF::new(width, height);
        self
    }

    pub fn density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn safe_area(mut self, safe_area: SafeArea) -> Self {
        self.safe_area = safe_area;
        self
    }

    pub fn status_bar(mut self, height: f32) -> Self {
        self.safe_area.status_bar = height;
        self
    }

    pub fn navigation_bar(mut self, height: f32) -> Self {
        self.safe_area.navigation_bar = height;
        self
    }

    /// Window rectangle; defaults to the root rectangle at the origin.
    pub fn window_rect(mut self, rect: RectF) -> Self {
        self.window_rect = Some(rect);
        self
    }

    pub fn foldable_expanded(mut self, expanded: bool) -> Self {
        self.foldable_expanded = expanded;
        self
    }

    pub fn subwindow(mut self, subwindow: bool) -> Self {
        self.subwindow = subwindow;
        self
    }

    pub fn reduce_motion(mut self, enabled: bool) -> Self {
        self.reduce_motion = enabled;
        self
    }

    pub fn theme(mut self, theme: ThemeRef) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn build(self) -> PipelineContext {
        let mut arena = NodeArena::new();
        let root = arena.create("root", Pattern::Root);
        let stage = arena.create("stage", Pattern::Stage);
        let page = arena.create("page", Pattern::Page);
        for id in [root, stage, page] {
            if let Some(node) = arena.get_mut(id) {
                node.frame.set_size(self.root_size);
            }
        }
        arena.mount(stage, root);
        arena.mount(page, stage);

        let mut animator = Animator::new();
        animator.set_reduced_motion(self.reduce_motion);

        let id = SurfaceId::new();
        log::debug!(
            "{id} created ({}x{} @{}x, subwindow: {})",
            self.root_size.width,
            self.root_size.height,
            self.density,
            self.subwindow
        );

        PipelineContext {
            id,
            arena,
            animator,
            executor: TaskExecutor::new(),
            focus: FocusState::new(),
            theme: self
                .theme
                .unwrap_or_else(|| DefaultTheme::default().into_ref()),
            root,
            stage,
            root_size: self.root_size,
            density: self.density,
            safe_area: self.safe_area,
            caret: None,
            window_rect: self.window_rect.unwrap_or(RectF::new(
                0.0,
                0.0,
                self.root_size.width,
                self.root_size.height,
            )),
            foldable_expanded: self.foldable_expanded,
            is_subwindow: self.subwindow,
            close_button_enabled: true,
            subwindow_visible: self.subwindow,
        }
    }
}
