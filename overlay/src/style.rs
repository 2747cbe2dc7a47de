//! Presentation styles accepted by the sheet and content-cover entry points.

use uitree::{Color, Dimension};

/// Named sheet height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SheetMode {
    Medium,
    #[default]
    Large,
    /// Fit the measured content, capped at the large height.
    Auto,
}

/// Layout variant of a sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SheetType {
    #[default]
    Bottom,
    /// Bottom sheet on wide pointer devices.
    BottomPc,
    BottomLandscape,
    Center,
    /// Bubble anchored below its target.
    Popup,
}

impl SheetType {
    pub fn is_bottom(&self) -> bool {
        matches!(self, SheetType::Bottom | SheetType::BottomPc)
    }
}

/// One requested height: a named mode wins over an explicit dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SheetHeight {
    pub height: Option<Dimension>,
    pub sheet_mode: Option<SheetMode>,
}

impl SheetHeight {
    pub fn mode(mode: SheetMode) -> Self {
        Self {
            height: None,
            sheet_mode: Some(mode),
        }
    }

    pub fn fixed(height: Dimension) -> Self {
        Self {
            height: Some(height),
            sheet_mode: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlurStyle {
    #[default]
    NoMaterial,
    Thin,
    Regular,
    Thick,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetStyle {
    pub height: Option<Dimension>,
    pub sheet_mode: Option<SheetMode>,
    pub show_drag_bar: Option<bool>,
    pub show_close_icon: Option<bool>,
    pub is_title_builder: Option<bool>,
    pub sheet_type: Option<SheetType>,
    pub background_color: Option<Color>,
    pub mask_color: Option<Color>,
    pub blur_style: Option<BlurStyle>,
    pub sheet_title: Option<String>,
    pub sheet_subtitle: Option<String>,
    pub detents: Vec<SheetHeight>,
    /// `Some(true)` lets touches pass through to the content below.
    pub interactive: Option<bool>,
}

impl SheetStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn height(mut self, height: Dimension) -> Self {
        self.height = Some(height);
        self
    }

    pub fn mode(mut self, mode: SheetMode) -> Self {
        self.sheet_mode = Some(mode);
        self
    }

    pub fn detents(mut self, detents: impl IntoIterator<Item = SheetHeight>) -> Self {
        self.detents = detents.into_iter().collect();
        self
    }

    pub fn show_drag_bar(mut self, show: bool) -> Self {
        self.show_drag_bar = Some(show);
        self
    }

    pub fn show_close_icon(mut self, show: bool) -> Self {
        self.show_close_icon = Some(show);
        self
    }

    pub fn sheet_type(mut self, sheet_type: SheetType) -> Self {
        self.sheet_type = Some(sheet_type);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.sheet_title = Some(title.into());
        self
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.sheet_subtitle = Some(subtitle.into());
        self
    }

    pub fn background_color(mut self, color: Color) -> Self {
        self.background_color = Some(color);
        self
    }

    pub fn mask_color(mut self, color: Color) -> Self {
        self.mask_color = Some(color);
        self
    }

    pub fn blur_style(mut self, blur: BlurStyle) -> Self {
        self.blur_style = Some(blur);
        self
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = Some(interactive);
        self
    }

    /// The height used when no detents are given.
    pub fn single_gear(&self) -> SheetHeight {
        match (self.sheet_mode, self.height) {
            (Some(mode), _) => SheetHeight::mode(mode),
            (None, Some(height)) => SheetHeight::fixed(height),
            (None, None) => SheetHeight::mode(SheetMode::Large),
        }
    }

    /// First requested height: the first detent, or the single gear.
    pub fn initial_gear(&self) -> SheetHeight {
        self.detents
            .first()
            .copied()
            .unwrap_or_else(|| self.single_gear())
    }

    pub fn has_title(&self) -> bool {
        self.is_title_builder.unwrap_or(false) || self.sheet_title.is_some()
    }

    pub fn is_auto_height(&self) -> bool {
        self.single_gear().sheet_mode == Some(SheetMode::Auto)
    }
}

/// Entry/exit transition of a content cover.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModalTransition {
    /// Slide up from the bottom edge.
    #[default]
    Default,
    None,
    /// Cross-fade with the content below.
    Alpha,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModalStyle {
    pub modal_transition: ModalTransition,
    pub background_color: Option<Color>,
    /// Content hosted by an extension session; the host animates it.
    pub is_ui_extension: bool,
}

impl ModalStyle {
    pub fn transition(mut self, transition: ModalTransition) -> Self {
        self.modal_transition = transition;
        self
    }

    pub fn background_color(mut self, color: Color) -> Self {
        self.background_color = Some(color);
        self
    }
}
