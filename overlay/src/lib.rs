//! Overlay and modal coordination for a retained UI tree.
//!
//! An [`OverlayManager`] per surface shows and hides popups, menus, dialogs,
//! toasts, content covers, sheets and custom keyboards above the page,
//! moving focus and running their animations on the surface's clock.

pub mod context;
pub mod error;
pub mod manager;
pub mod pattern;
pub mod sheet;
pub mod style;
pub mod task;
pub mod theme;

pub use context::{CaretInfo, PipelineContext, PipelineContextBuilder, SafeArea, SurfaceId};
pub use error::{OverlayError, Result, ThemeError};
pub use manager::{ContentCoverRequest, OverlayManager, PopupInfo, SheetRequest};
pub use style::{
    BlurStyle, ModalStyle, ModalTransition, SheetHeight, SheetMode, SheetStyle, SheetType,
};
pub use task::{Completion, OverlayHandle, OverlayRequest, UiTask};
pub use theme::{DefaultTheme, SheetThemeMode, ThemeProvider, ThemeRef};
