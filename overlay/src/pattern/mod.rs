//! Node patterns: the per-kind state carried by every overlay node.
//!
//! Each overlay kind is one concrete type. Shared behavior is expressed by
//! two small capability traits, [`Focusable`] and [`Animatable`], and the
//! manager dispatches on the [`Pattern`] variant.

mod bubble;
mod dialog;
mod keyboard;
mod menu;
mod modal;
mod nav;
mod toast;

use uitree::{AnimationOption, AnimationTarget, NodeArena, NodeId};

pub use bubble::{BubblePattern, PopupOptions, TransitionStatus};
pub use dialog::{DialogPattern, DialogProperties};
pub use keyboard::KeyboardPattern;
pub use menu::{MenuOptions, MenuPattern, MenuState, MenuWrapperPattern, PreviewMode};
pub use modal::ModalPresentationPattern;
pub use nav::NavDestinationPattern;
pub use toast::{ToastInfo, ToastPattern, ToastShowMode};

use crate::sheet::SheetPresentationPattern;
use crate::theme::ThemeProvider;

/// Lifecycle notification.
pub type Callback = Box<dyn FnMut() + Send>;

/// Visibility notification; `false` means the overlay went away.
pub type VisibilityCallback = Box<dyn FnMut(bool) + Send>;

/// Builds child content into the arena, returning its root.
pub type ContentBuilder = Box<dyn FnOnce(&mut NodeArena<Pattern>) -> Option<NodeId> + Send>;

pub enum Pattern {
    Root,
    Stage,
    Page,
    Column,
    /// Caller-built content.
    Custom,
    Bubble(BubblePattern),
    MenuWrapper(MenuWrapperPattern),
    Menu(MenuPattern),
    MenuPreview,
    Dialog(DialogPattern),
    DialogContent,
    Toast(ToastPattern),
    ModalPage(ModalPresentationPattern),
    Sheet(Box<SheetPresentationPattern>),
    SheetMask,
    SheetWrapper,
    SheetOperation,
    SheetDragBar,
    SheetTitle,
    SheetScroll,
    SheetCloseIcon,
    Keyboard(KeyboardPattern),
    NavDestination(NavDestinationPattern),
}

impl Pattern {
    pub fn tag(&self) -> &'static str {
        match self {
            Pattern::Root => "root",
            Pattern::Stage => "stage",
            Pattern::Page => "page",
            Pattern::Column => "column",
            Pattern::Custom => "custom",
            Pattern::Bubble(_) => "bubble",
            Pattern::MenuWrapper(_) => "menu-wrapper",
            Pattern::Menu(_) => "menu",
            Pattern::MenuPreview => "menu-preview",
            Pattern::Dialog(_) => "dialog",
            Pattern::DialogContent => "dialog-content",
            Pattern::Toast(_) => "toast",
            Pattern::ModalPage(_) => "modal-page",
            Pattern::Sheet(_) => "sheet",
            Pattern::SheetMask => "sheet-mask",
            Pattern::SheetWrapper => "sheet-wrapper",
            Pattern::SheetOperation => "sheet-operation",
            Pattern::SheetDragBar => "sheet-drag-bar",
            Pattern::SheetTitle => "sheet-title",
            Pattern::SheetScroll => "sheet-scroll",
            Pattern::SheetCloseIcon => "sheet-close-icon",
            Pattern::Keyboard(_) => "keyboard",
            Pattern::NavDestination(_) => "nav-destination",
        }
    }

    pub fn as_bubble(&self) -> Option<&BubblePattern> {
        match self {
            Pattern::Bubble(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_bubble_mut(&mut self) -> Option<&mut BubblePattern> {
        match self {
            Pattern::Bubble(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_menu_wrapper(&self) -> Option<&MenuWrapperPattern> {
        match self {
            Pattern::MenuWrapper(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_menu_wrapper_mut(&mut self) -> Option<&mut MenuWrapperPattern> {
        match self {
            Pattern::MenuWrapper(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_menu_mut(&mut self) -> Option<&mut MenuPattern> {
        match self {
            Pattern::Menu(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_dialog(&self) -> Option<&DialogPattern> {
        match self {
            Pattern::Dialog(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_dialog_mut(&mut self) -> Option<&mut DialogPattern> {
        match self {
            Pattern::Dialog(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_toast(&self) -> Option<&ToastPattern> {
        match self {
            Pattern::Toast(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_modal(&self) -> Option<&ModalPresentationPattern> {
        match self {
            Pattern::ModalPage(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_modal_mut(&mut self) -> Option<&mut ModalPresentationPattern> {
        match self {
            Pattern::ModalPage(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_sheet(&self) -> Option<&SheetPresentationPattern> {
        match self {
            Pattern::Sheet(p) => Some(p.as_ref()),
            _ => None,
        }
    }

    pub fn as_sheet_mut(&mut self) -> Option<&mut SheetPresentationPattern> {
        match self {
            Pattern::Sheet(p) => Some(p.as_mut()),
            _ => None,
        }
    }

    pub fn as_keyboard(&self) -> Option<&KeyboardPattern> {
        match self {
            Pattern::Keyboard(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_nav_destination_mut(&mut self) -> Option<&mut NavDestinationPattern> {
        match self {
            Pattern::NavDestination(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_modal_kind(&self) -> bool {
        matches!(self, Pattern::ModalPage(_) | Pattern::Sheet(_))
    }

    pub fn as_focusable(&self) -> Option<&dyn Focusable> {
        match self {
            Pattern::Bubble(p) => Some(p),
            Pattern::MenuWrapper(p) => Some(p),
            Pattern::Dialog(p) => Some(p),
            Pattern::ModalPage(p) => Some(p),
            Pattern::Sheet(p) => Some(p.as_ref()),
            _ => None,
        }
    }

    pub fn as_animatable(&self) -> Option<&dyn Animatable> {
        match self {
            Pattern::Bubble(p) => Some(p),
            Pattern::MenuWrapper(p) => Some(p),
            Pattern::Dialog(p) => Some(p),
            Pattern::Toast(p) => Some(p),
            Pattern::ModalPage(p) => Some(p),
            Pattern::Keyboard(p) => Some(p),
            _ => None,
        }
    }
}

/// Overlays that take part in focus transfer.
pub trait Focusable {
    /// Whether focus returns to this overlay when one above it goes away.
    fn restores_focus(&self) -> bool;

    /// Whether the overlay takes focus once its entry animation ends.
    fn takes_focus_on_entry(&self) -> bool {
        true
    }
}

/// Environment an entry or exit transition is computed against.
#[derive(Clone, Copy)]
pub struct TransitionEnv<'a> {
    pub theme: &'a dyn ThemeProvider,
    pub root_height: f32,
    pub density: f32,
}

/// One animation on one node: `from` values are written first, then the
/// node animates to `to`.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub option: AnimationOption,
    pub from: Vec<AnimationTarget>,
    pub to: Vec<AnimationTarget>,
}

impl Transition {
    pub fn new(option: AnimationOption) -> Self {
        Self {
            option,
            from: Vec::new(),
            to: Vec::new(),
        }
    }

    pub fn from(mut self, target: AnimationTarget) -> Self {
        self.from.push(target);
        self
    }

    pub fn to(mut self, target: AnimationTarget) -> Self {
        self.to.push(target);
        self
    }
}

/// Overlays with their own entry and exit animation.
pub trait Animatable {
    fn entry_transition(&self, env: &TransitionEnv<'_>) -> Option<Transition>;

    fn exit_transition(&self, env: &TransitionEnv<'_>) -> Option<Transition>;
}
