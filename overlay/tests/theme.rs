use std::time::Duration;

use overlay::pattern::{DialogProperties, Pattern, ToastInfo};
use overlay::theme::SheetTheme;
use overlay::{DefaultTheme, OverlayManager, PipelineContext, SheetThemeMode, ThemeError};
use uitree::{Color, Dimension};

// =============================================================================
// Loading Tests
// =============================================================================

#[test]
fn test_empty_json_is_default() {
    let theme = DefaultTheme::from_json("{}").unwrap();
    assert_eq!(theme, DefaultTheme::default());
    assert_eq!(theme.sheet.sheet_type, SheetThemeMode::Auto);
    assert_eq!(theme.dialog.duration_in(), Duration::from_millis(250));
    assert_eq!(theme.toast.min_duration_ms, 1500);
}

#[test]
fn test_partial_sections_keep_defaults() {
    let theme = DefaultTheme::from_json(
        r##"{
            "sheet": { "sheet_radius": "24vp", "mask_color": "#80000000" },
            "toast": { "min_duration_ms": 2500 }
        }"##,
    )
    .unwrap();
    assert_eq!(theme.sheet.sheet_radius, Dimension::vp(24.0));
    assert_eq!(theme.sheet.mask_color, Color::from_argb(0x8000_0000));
    assert_eq!(theme.sheet.title_text_margin, SheetTheme::default().title_text_margin);
    assert_eq!(theme.toast.min_duration_ms, 2500);
    assert_eq!(theme.toast.default_duration_ms, 1500);
}

#[test]
fn test_unknown_sheet_mode_is_bottom() {
    let theme = DefaultTheme::from_json(r#"{"sheet": {"sheet_type": "drawer"}}"#).unwrap();
    assert_eq!(theme.sheet.sheet_type, SheetThemeMode::Bottom);
    let theme = DefaultTheme::from_json(r#"{"sheet": {"sheet_type": "popup"}}"#).unwrap();
    assert_eq!(theme.sheet.sheet_type, SheetThemeMode::Popup);
}

#[test]
fn test_malformed_json_is_rejected() {
    let err = DefaultTheme::from_json("{ not json").unwrap_err();
    assert!(matches!(err, ThemeError::Json(_)));

    let err = DefaultTheme::from_json(r#"{"sheet": {"sheet_radius": "12em"}}"#).unwrap_err();
    assert!(matches!(err, ThemeError::Json(_)));
}

#[test]
fn test_out_of_range_values_are_rejected() {
    let err = DefaultTheme::from_json(r#"{"dialog": {"opacity_start": 1.5}}"#).unwrap_err();
    assert!(matches!(
        err,
        ThemeError::InvalidValue {
            field: "dialog.opacity",
            ..
        }
    ));

    let err = DefaultTheme::from_json(r#"{"sheet": {"sheet_radius": "10%"}}"#).unwrap_err();
    assert!(err.to_string().contains("sheet.sheet_radius"));

    let err = DefaultTheme::from_json(
        r#"{"menu": {"preview_disappear_spring_response": 0}}"#,
    )
    .unwrap_err();
    assert!(matches!(err, ThemeError::InvalidValue { .. }));
}

// =============================================================================
// Theme Use Tests
// =============================================================================

#[test]
fn test_toast_floor_follows_theme() {
    let theme = DefaultTheme::from_json(r#"{"toast": {"min_duration_ms": 3000}}"#)
        .unwrap()
        .into_ref();
    let mut m = OverlayManager::new(PipelineContext::builder().theme(theme).build());
    let id = m.show_toast(ToastInfo::new("hi").duration(Duration::from_millis(2000)));
    let toast = m.toast_node(id).unwrap();
    let duration = m
        .context()
        .arena
        .pattern(toast)
        .and_then(Pattern::as_toast)
        .unwrap()
        .duration;
    assert_eq!(duration, Duration::from_millis(3000));
}

#[test]
fn test_dialog_scale_start_follows_theme() {
    let theme = DefaultTheme::from_json(r#"{"dialog": {"scale_start": 0.5}}"#)
        .unwrap()
        .into_ref();
    let mut m = OverlayManager::new(PipelineContext::builder().theme(theme).build());
    let dialog = m.show_dialog(DialogProperties::default(), None).unwrap();
    let content = m.context().arena.first_child(dialog).unwrap();
    assert_eq!(m.context().arena.get(content).unwrap().render.scale, 0.5);
    m.settle();
    assert_eq!(m.context().arena.get(content).unwrap().render.scale, 1.0);
}
