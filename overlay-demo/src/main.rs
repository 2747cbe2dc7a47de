use std::fs::File;
use std::time::Duration;

use overlay::pattern::{DialogProperties, MenuOptions, Pattern, PopupOptions, ToastInfo};
use overlay::{
    ContentCoverRequest, DefaultTheme, ModalStyle, ModalTransition, OverlayManager,
    PipelineContext, PopupInfo, SheetHeight, SheetMode, SheetRequest, SheetStyle,
};
use simplelog::{Config, LevelFilter, WriteLogger};
use uitree::{NodeArena, NodeId, OffsetF};

const FRAME: Duration = Duration::from_millis(16);
const SHEET: i32 = 1;
const MENU: i32 = 2;
const POPUP: i32 = 3;
const COVER: i32 = 4;
const KEYBOARD: i32 = 5;

fn sheet_content(arena: &mut NodeArena<Pattern>) -> Option<NodeId> {
    Some(arena.create("demo-content", Pattern::Custom))
}

fn sheet_height(m: &OverlayManager) -> Option<f32> {
    let sheet = m.sheet_node(SHEET)?;
    let pattern = m.context().arena.pattern(sheet).and_then(Pattern::as_sheet)?;
    Some(pattern.height())
}

/// Pump real frames until the surface is idle or `limit` has passed.
async fn run_frames(m: &mut OverlayManager, limit: Duration) {
    let mut ticker = tokio::time::interval(FRAME);
    let mut elapsed = Duration::ZERO;
    while elapsed < limit {
        ticker.tick().await;
        m.pump(FRAME);
        elapsed += FRAME;
    }
}

fn load_theme() -> DefaultTheme {
    let Some(path) = std::env::args().nth(1) else {
        return DefaultTheme::default();
    };
    match std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|json| DefaultTheme::from_json(&json).map_err(|e| e.to_string()))
    {
        Ok(theme) => {
            log::info!("loaded theme from {path}");
            theme
        }
        Err(e) => {
            eprintln!("Ignoring theme {path}: {e}");
            DefaultTheme::default()
        }
    }
}

#[tokio::main]
async fn main() {
    let log_file = File::create("overlay-demo.log").expect("Failed to create log file");
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .expect("Failed to initialize logger");

    let context = PipelineContext::builder().theme(load_theme().into_ref()).build();
    let mut m = OverlayManager::new(context);

    // Sheet with two detents, dragged up to the larger one
    m.bind_sheet(
        true,
        SheetRequest::new(SHEET)
            .builder(sheet_content)
            .style(SheetStyle::new().title("Demo").detents([
                SheetHeight::mode(SheetMode::Medium),
                SheetHeight::mode(SheetMode::Large),
            ]))
            .on_visibility(|visible| log::info!("sheet visible: {visible}")),
    );
    m.settle();
    println!("sheet opened at height {:?}", sheet_height(&m));

    m.sheet_drag_start(SHEET);
    m.sheet_drag_update(SHEET, -600.0);
    let outcome = m.sheet_drag_end(SHEET, 0.0);
    m.settle();
    println!("drag released: {outcome:?}, height {:?}", sheet_height(&m));

    // Close it from another task, the way an async callback would
    let handle = m.handle();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.close_sheet(SHEET);
    });
    run_frames(&mut m, Duration::from_millis(800)).await;
    println!("sheets after close: {}", m.sheet_count());

    // Toast over a dialog, then back press
    let dialog = m.show_dialog(
        DialogProperties::default()
            .title("Discard changes?")
            .on_cancel(|| log::info!("dialog cancelled")),
        None,
    );
    let toast = m.show_toast(ToastInfo::new("Draft saved"));
    m.settle_animations();
    println!("dialog {dialog:?}, toast {toast}");
    let consumed = m.remove_overlay(true, false);
    m.settle_animations();
    println!("back press consumed: {consumed}, toasts left: {}", m.toast_count());

    // Menu under a second back press
    let wrapper = m.create_menu_node(MENU, MenuOptions::items(["Copy", "Paste", "Share"]));
    m.show_menu(MENU, OffsetF::new(120.0, 400.0), Some(wrapper));
    m.settle_animations();
    println!("menu state: {:?}", m.menu_state(wrapper));
    m.remove_overlay(true, false);
    m.settle();
    println!("menu state: {:?}", m.menu_state(wrapper));

    // Hint bubble, hidden by a back press
    let popup = m.create_popup_node(POPUP, PopupOptions::message("Tap to edit"));
    m.show_popup(POPUP, PopupInfo::new(popup));
    m.settle();
    println!("popup on root: {}", m.is_on_root(popup));
    m.remove_overlay(true, false);
    m.settle();
    println!("popup on root: {}", m.is_on_root(popup));

    // Back press drops the keyboard and pops the cover under it
    m.bind_content_cover(
        true,
        ContentCoverRequest::new(COVER)
            .builder(sheet_content)
            .style(ModalStyle::default().transition(ModalTransition::Alpha)),
    );
    m.bind_keyboard(Some(Box::new(sheet_content)), KEYBOARD);
    m.settle();
    println!("modals: {}, keyboards: {}", m.modal_stack_len(), m.keyboard_count());
    m.remove_overlay(true, false);
    m.settle();
    println!("modals: {}, keyboards: {}", m.modal_stack_len(), m.keyboard_count());

    println!("overlay children: {}", m.overlay_children().len());
}
