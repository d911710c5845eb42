#![allow(clippy::float_cmp)]

use super::*;
use crate::config::FormFactor;
use crate::consts::{LAYER_GUI, PANEL_COLOR};
use crate::replay::{DrawCommand, Pan, RecordingRenderer, RecordingViewport};
use crate::viewport::PanDirection;

const EPSILON: f64 = 1e-9;

// =============================================================
// Helpers
// =============================================================

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn scroller_with(mode: DisplayMode) -> Scroller {
    Scroller::new(ScrollerConfig::POINTER, SharedDisplayMode::new(mode)).with_viewport_height(600.0)
}

fn mapper() -> RecordingRenderer {
    RecordingRenderer::default()
}

fn move_to(s: &mut Scroller, x: f64, y: f64) -> EventOutcome {
    s.on_event(&InputEvent::Motion(pt(x, y)), &mapper())
}

fn press(s: &mut Scroller, button: Button) -> EventOutcome {
    s.on_event(&InputEvent::ButtonDown(button), &mapper())
}

fn release(s: &mut Scroller, button: Button) -> EventOutcome {
    s.on_event(&InputEvent::ButtonUp(button), &mapper())
}

fn key_down(s: &mut Scroller, name: &str) -> EventOutcome {
    s.on_event(&InputEvent::KeyDown(Key::new(name)), &mapper())
}

/// Move into the control at `(x, y)` and start a drag.
fn drag_at(s: &mut Scroller, x: f64, y: f64) {
    move_to(s, x, y);
    assert_eq!(press(s, Button::Primary), EventOutcome::Consumed);
}

fn ticks(s: &Scroller, dt: f64) -> Vec<Pan> {
    let mut viewport = RecordingViewport::default();
    s.update(dt, &mut viewport);
    viewport.pans
}

fn draw(s: &Scroller, modal: bool) -> Vec<DrawCommand> {
    let mut renderer = RecordingRenderer::default();
    s.draw(&mut renderer, &modal);
    renderer.commands
}

fn triangle(cmd: &DrawCommand) -> [Point; 3] {
    match cmd {
        DrawCommand::Triangle { points, .. } => *points,
        DrawCommand::Rect { .. } => panic!("expected triangle, got {cmd:?}"),
    }
}

// =============================================================
// Construction
// =============================================================

#[test]
fn new_scroller_state_is_idle() {
    let s = scroller_with(DisplayMode::Top);
    let st = s.state();
    assert!(!st.is_dragging);
    assert_eq!(st.scroll_velocity, pt(0.0, 0.0));
    assert_eq!(st.pointer_position, pt(0.0, 0.0));
    assert!(!s.can_scroll());
}

#[test]
fn from_settings_applies_geometry_key_and_height() {
    let settings = ScrollerSettings {
        toggle_key: Key::new("F10"),
        viewport_height: 720.0,
        ..ScrollerSettings::for_form_factor(FormFactor::Touch)
    };
    let mut s = Scroller::from_settings(&settings, SharedDisplayMode::new(settings.display_mode));
    assert_eq!(s.config(), ScrollerConfig::TOUCH);
    assert_eq!(s.viewport_height(), 720.0);
    assert_eq!(s.display_mode(), DisplayMode::Bottom);
    assert_eq!(s.y_base(), 720.0 - 192.0);

    key_down(&mut s, "F9");
    assert_eq!(s.display_mode(), DisplayMode::Bottom);
    key_down(&mut s, "F10");
    assert_eq!(s.display_mode(), DisplayMode::Top);
}

// =============================================================
// Geometry
// =============================================================

#[test]
fn hit_region_top() {
    let s = scroller_with(DisplayMode::Top);
    assert_eq!(s.y_base(), 0.0);
    assert_eq!(s.hit_region(), Rect::new(pt(0.0, 0.0), pt(96.0, 96.0)));
    assert_eq!(s.center(), pt(48.0, 48.0));
}

#[test]
fn hit_region_bottom() {
    let s = scroller_with(DisplayMode::Bottom);
    assert_eq!(s.y_base(), 504.0);
    assert_eq!(s.hit_region(), Rect::new(pt(0.0, 504.0), pt(96.0, 600.0)));
    assert_eq!(s.center(), pt(48.0, 552.0));
}

#[test]
fn hit_region_follows_viewport_height() {
    let mut s = scroller_with(DisplayMode::Bottom);
    s.set_viewport_height(1080.0);
    assert_eq!(s.y_base(), 984.0);
}

// =============================================================
// can_scroll
// =============================================================

#[test]
fn can_scroll_false_outside_region_even_when_dragging() {
    let mut s = scroller_with(DisplayMode::Top);
    drag_at(&mut s, 10.0, 10.0);
    assert!(s.can_scroll());

    for (x, y) in [(96.0, 10.0), (10.0, 96.0), (200.0, 300.0), (-1.0, 10.0)] {
        move_to(&mut s, x, y);
        assert!(s.state().is_dragging);
        assert!(!s.can_scroll(), "({x}, {y}) should be outside");
    }
}

#[test]
fn can_scroll_false_when_not_dragging() {
    let mut s = scroller_with(DisplayMode::Top);
    move_to(&mut s, 10.0, 10.0);
    assert!(!s.can_scroll());
}

#[test]
fn can_scroll_false_when_hidden() {
    let mode = SharedDisplayMode::new(DisplayMode::Top);
    let mut s = Scroller::new(ScrollerConfig::POINTER, mode.clone());
    drag_at(&mut s, 10.0, 10.0);
    mode.set(DisplayMode::None);
    assert!(!s.can_scroll());
}

// =============================================================
// Button events
// =============================================================

#[test]
fn primary_down_inside_starts_drag_and_consumes() {
    let mut s = scroller_with(DisplayMode::Top);
    move_to(&mut s, 0.0, 0.0);
    assert_eq!(press(&mut s, Button::Primary), EventOutcome::Consumed);
    assert!(s.state().is_dragging);
}

#[test]
fn primary_down_outside_passes_through() {
    let mut s = scroller_with(DisplayMode::Top);
    move_to(&mut s, 300.0, 300.0);
    assert_eq!(press(&mut s, Button::Primary), EventOutcome::PassThrough);
    assert!(!s.state().is_dragging);
}

#[test]
fn primary_down_outside_leaves_existing_drag_alone() {
    let mut s = scroller_with(DisplayMode::Top);
    drag_at(&mut s, 10.0, 10.0);
    move_to(&mut s, 300.0, 300.0);
    assert_eq!(press(&mut s, Button::Primary), EventOutcome::PassThrough);
    assert!(s.state().is_dragging);
}

#[test]
fn primary_down_uses_bottom_region() {
    let mut s = scroller_with(DisplayMode::Bottom);
    move_to(&mut s, 10.0, 10.0);
    assert_eq!(press(&mut s, Button::Primary), EventOutcome::PassThrough);
    move_to(&mut s, 10.0, 510.0);
    assert_eq!(press(&mut s, Button::Primary), EventOutcome::Consumed);
}

#[test]
fn non_primary_down_passes_through() {
    let mut s = scroller_with(DisplayMode::Top);
    move_to(&mut s, 10.0, 10.0);
    assert_eq!(press(&mut s, Button::Secondary), EventOutcome::PassThrough);
    assert_eq!(press(&mut s, Button::Middle), EventOutcome::PassThrough);
    assert!(!s.state().is_dragging);
}

#[test]
fn primary_down_when_hidden_passes_through() {
    let mut s = scroller_with(DisplayMode::None);
    move_to(&mut s, 10.0, 10.0);
    assert_eq!(press(&mut s, Button::Primary), EventOutcome::PassThrough);
    assert!(!s.state().is_dragging);
}

#[test]
fn button_up_always_ends_drag_and_passes_through() {
    for button in [Button::Primary, Button::Middle, Button::Secondary] {
        let mut s = scroller_with(DisplayMode::Top);
        drag_at(&mut s, 10.0, 10.0);
        move_to(&mut s, 400.0, 400.0);
        assert_eq!(release(&mut s, button), EventOutcome::PassThrough);
        assert!(!s.state().is_dragging);
    }
}

#[test]
fn button_up_when_idle_passes_through() {
    let mut s = scroller_with(DisplayMode::None);
    assert_eq!(release(&mut s, Button::Primary), EventOutcome::PassThrough);
    assert!(!s.state().is_dragging);
}

// =============================================================
// Motion
// =============================================================

#[test]
fn motion_never_consumes() {
    let mut s = scroller_with(DisplayMode::Top);
    assert_eq!(move_to(&mut s, 60.0, 60.0), EventOutcome::PassThrough);
    assert_eq!(move_to(&mut s, 500.0, 500.0), EventOutcome::PassThrough);
    drag_at(&mut s, 20.0, 20.0);
    assert_eq!(move_to(&mut s, 30.0, 30.0), EventOutcome::PassThrough);
}

#[test]
fn motion_worked_example() {
    let mut s = scroller_with(DisplayMode::Top);
    move_to(&mut s, 60.0, 60.0);
    // d = (12, 12), |d| ≈ 16.97 < 24, so magnitude = 2|d| and velocity = 2d.
    let v = s.state().scroll_velocity;
    assert!(point_approx_eq(v, pt(24.0, 24.0)));
    assert!(approx_eq(v.length(), 12.0_f64.hypot(12.0) * 2.0));
}

#[test]
fn motion_caps_speed_at_half_center_offset() {
    let mut s = scroller_with(DisplayMode::Top);
    move_to(&mut s, 95.0, 48.0);
    // d = (47, 0), capped to 24, times max_speed 2.
    assert!(point_approx_eq(s.state().scroll_velocity, pt(48.0, 0.0)));
}

#[test]
fn motion_velocity_parallel_to_offset() {
    let mut s = scroller_with(DisplayMode::Top);
    for (x, y) in [(5.0, 90.0), (90.0, 5.0), (40.0, 47.0), (0.0, 0.0), (70.0, 48.0)] {
        move_to(&mut s, x, y);
        let d = pt(x, y) - s.center();
        let v = s.state().scroll_velocity;
        let expected = 24.0_f64.min(d.length()) * 2.0;
        assert!(approx_eq(v.length(), expected), "({x}, {y}): |v| = {}", v.length());
        // Cross product zero and same orientation.
        assert!(approx_eq(v.x * d.y - v.y * d.x, 0.0));
        assert!(v.x * d.x + v.y * d.y > 0.0);
    }
}

#[test]
fn motion_at_center_keeps_previous_velocity() {
    let mut s = scroller_with(DisplayMode::Top);
    move_to(&mut s, 60.0, 60.0);
    let before = s.state().scroll_velocity;
    move_to(&mut s, 48.0, 48.0);
    assert_eq!(s.state().pointer_position, pt(48.0, 48.0));
    assert_eq!(s.state().scroll_velocity, before);
}

#[test]
fn motion_at_center_from_rest_stays_zero() {
    let mut s = scroller_with(DisplayMode::Top);
    move_to(&mut s, 48.0, 48.0);
    assert_eq!(s.state().scroll_velocity, pt(0.0, 0.0));
}

#[test]
fn motion_outside_updates_position_but_not_velocity() {
    let mut s = scroller_with(DisplayMode::Top);
    move_to(&mut s, 60.0, 60.0);
    let before = s.state().scroll_velocity;
    move_to(&mut s, 300.0, 10.0);
    assert_eq!(s.state().pointer_position, pt(300.0, 10.0));
    assert_eq!(s.state().scroll_velocity, before);
}

#[test]
fn motion_uses_bottom_center() {
    let mut s = scroller_with(DisplayMode::Bottom);
    move_to(&mut s, 60.0, 564.0);
    assert!(point_approx_eq(s.state().scroll_velocity, pt(24.0, 24.0)));
}

#[test]
fn motion_when_hidden_is_ignored() {
    let mut s = scroller_with(DisplayMode::None);
    assert_eq!(move_to(&mut s, 60.0, 60.0), EventOutcome::PassThrough);
    assert_eq!(s.state().pointer_position, pt(0.0, 0.0));
    assert_eq!(s.state().scroll_velocity, pt(0.0, 0.0));
}

#[test]
fn motion_converts_device_to_logical() {
    let mut s = scroller_with(DisplayMode::Top);
    s.on_event(&InputEvent::Motion(pt(120.0, 120.0)), &RecordingRenderer::with_scale(2.0));
    assert_eq!(s.state().pointer_position, pt(60.0, 60.0));
    assert!(point_approx_eq(s.state().scroll_velocity, pt(24.0, 24.0)));
}

#[test]
fn touch_preset_uses_slower_speed() {
    let mut s = Scroller::new(ScrollerConfig::TOUCH, SharedDisplayMode::new(DisplayMode::Top));
    // center (96, 96); d = (0, 30) < cap 48; 30 * 0.8 = 24.
    move_to(&mut s, 96.0, 126.0);
    assert!(point_approx_eq(s.state().scroll_velocity, pt(0.0, 24.0)));
}

// =============================================================
// Keys and display mode
// =============================================================

#[test]
fn toggle_key_flips_top_and_bottom() {
    let mut s = scroller_with(DisplayMode::Top);
    assert_eq!(key_down(&mut s, "F9"), EventOutcome::PassThrough);
    assert_eq!(s.display_mode(), DisplayMode::Bottom);
    assert_eq!(key_down(&mut s, "F9"), EventOutcome::PassThrough);
    assert_eq!(s.display_mode(), DisplayMode::Top);
}

#[test]
fn toggle_from_none_shows_top() {
    let mut s = scroller_with(DisplayMode::None);
    key_down(&mut s, "F9");
    assert_eq!(s.display_mode(), DisplayMode::Top);
}

#[test]
fn other_keys_and_key_up_do_nothing() {
    let mut s = scroller_with(DisplayMode::Top);
    assert_eq!(key_down(&mut s, "Escape"), EventOutcome::PassThrough);
    assert_eq!(s.on_event(&InputEvent::KeyUp(Key::new("F9")), &mapper()), EventOutcome::PassThrough);
    assert_eq!(s.display_mode(), DisplayMode::Top);
}

#[test]
fn wheel_passes_through() {
    let mut s = scroller_with(DisplayMode::Top);
    let ev = InputEvent::Wheel(crate::input::WheelDelta { dx: 0.0, dy: 5.0 });
    assert_eq!(s.on_event(&ev, &mapper()), EventOutcome::PassThrough);
    assert_eq!(s.state(), ScrollerState::default());
}

#[test]
fn toggle_is_shared_across_scrollers() {
    let mode = SharedDisplayMode::new(DisplayMode::Top);
    let mut a = Scroller::new(ScrollerConfig::POINTER, mode.clone());
    let b = Scroller::new(ScrollerConfig::POINTER, mode.clone());
    key_down(&mut a, "F9");
    assert_eq!(b.display_mode(), DisplayMode::Bottom);
    assert_eq!(mode.get(), DisplayMode::Bottom);
}

#[test]
fn toggle_moves_region_away_from_pointer() {
    let mut s = scroller_with(DisplayMode::Top);
    drag_at(&mut s, 60.0, 60.0);
    assert!(s.can_scroll());
    key_down(&mut s, "F9");
    assert!(!s.can_scroll());
    assert!(ticks(&s, 0.1).is_empty());
}

// =============================================================
// update
// =============================================================

#[test]
fn update_worked_example_pans_right_and_down() {
    let mut s = scroller_with(DisplayMode::Top);
    drag_at(&mut s, 60.0, 60.0);
    let pans = ticks(&s, 0.1);
    assert_eq!(pans.len(), 2);
    assert_eq!(pans[0].direction, PanDirection::Right);
    assert!(approx_eq(pans[0].amount, 2.4));
    assert_eq!(pans[1].direction, PanDirection::Down);
    assert!(approx_eq(pans[1].amount, 2.4));
}

#[test]
fn update_pans_left_and_up_with_positive_amounts() {
    let mut s = scroller_with(DisplayMode::Top);
    drag_at(&mut s, 36.0, 40.0);
    // d = (-12, -8), |d| < 24, velocity = 2d = (-24, -16).
    let pans = ticks(&s, 0.5);
    assert_eq!(pans.len(), 2);
    assert_eq!(pans[0].direction, PanDirection::Left);
    assert!(approx_eq(pans[0].amount, 12.0));
    assert_eq!(pans[1].direction, PanDirection::Up);
    assert!(approx_eq(pans[1].amount, 8.0));
}

#[test]
fn update_skips_zero_component() {
    let mut s = scroller_with(DisplayMode::Top);
    drag_at(&mut s, 48.0, 30.0);
    let pans = ticks(&s, 0.5);
    assert_eq!(pans.len(), 1);
    assert_eq!(pans[0].direction, PanDirection::Up);
    assert!(approx_eq(pans[0].amount, 18.0));
}

#[test]
fn update_with_zero_dt_issues_nothing() {
    let mut s = scroller_with(DisplayMode::Top);
    drag_at(&mut s, 60.0, 60.0);
    assert!(ticks(&s, 0.0).is_empty());
}

#[test]
fn update_ignores_stale_velocity_after_release() {
    let mut s = scroller_with(DisplayMode::Top);
    drag_at(&mut s, 60.0, 60.0);
    release(&mut s, Button::Primary);
    assert_ne!(s.state().scroll_velocity, pt(0.0, 0.0));
    assert!(ticks(&s, 0.1).is_empty());
}

#[test]
fn update_idle_when_hidden() {
    let mode = SharedDisplayMode::new(DisplayMode::Top);
    let mut s = Scroller::new(ScrollerConfig::POINTER, mode.clone());
    drag_at(&mut s, 60.0, 60.0);
    mode.set(DisplayMode::None);
    assert!(ticks(&s, 0.1).is_empty());
}

#[test]
fn update_pointer_outside_issues_nothing() {
    let mut s = scroller_with(DisplayMode::Top);
    drag_at(&mut s, 60.0, 60.0);
    move_to(&mut s, 200.0, 60.0);
    assert!(ticks(&s, 0.1).is_empty());
}

// =============================================================
// draw
// =============================================================

#[test]
fn draw_idle_top_emits_panels_and_four_arrows() {
    let s = scroller_with(DisplayMode::Top);
    let cmds = draw(&s, false);
    assert_eq!(cmds.len(), 6);

    assert_eq!(
        cmds[0],
        DrawCommand::Rect {
            rect: Rect::new(pt(0.0, 0.0), pt(96.0, 96.0)),
            color: PANEL_COLOR,
            corner_radius: 48.0,
            layer: LAYER_GUI - 10,
        }
    );
    assert_eq!(
        cmds[1],
        DrawCommand::Rect {
            rect: Rect::new(pt(40.0, 40.0), pt(56.0, 56.0)),
            color: PANEL_COLOR,
            corner_radius: 8.0,
            layer: LAYER_GUI - 20,
        }
    );
    assert!(cmds[2..].iter().all(|c| matches!(c, DrawCommand::Triangle { layer, .. } if *layer == LAYER_GUI - 20)));
}

#[test]
fn draw_fixed_arrow_geometry() {
    let s = scroller_with(DisplayMode::Top);
    let cmds = draw(&s, false);
    // Left arrow at (16, 48): u = (-8, 0), perp = (0, -8).
    let [a, b, c] = triangle(&cmds[2]);
    assert!(point_approx_eq(a, pt(8.0, 48.0)));
    assert!(point_approx_eq(b, pt(24.0, 40.0)));
    assert!(point_approx_eq(c, pt(24.0, 56.0)));
    // Down arrow at (48, 80): u = (0, 8), perp = (-8, 0).
    let [a, b, c] = triangle(&cmds[5]);
    assert!(point_approx_eq(a, pt(48.0, 88.0)));
    assert!(point_approx_eq(b, pt(40.0, 72.0)));
    assert!(point_approx_eq(c, pt(56.0, 72.0)));
}

#[test]
fn draw_bottom_offsets_everything() {
    let s = scroller_with(DisplayMode::Bottom);
    let cmds = draw(&s, false);
    assert_eq!(cmds.len(), 6);
    match &cmds[0] {
        DrawCommand::Rect { rect, .. } => assert_eq!(*rect, Rect::new(pt(0.0, 504.0), pt(96.0, 600.0))),
        other => panic!("expected rect, got {other:?}"),
    }
    let [a, _, _] = triangle(&cmds[2]);
    assert!(point_approx_eq(a, pt(8.0, 552.0)));
}

#[test]
fn draw_while_scrolling_adds_pointer_arrow() {
    let mut s = scroller_with(DisplayMode::Top);
    drag_at(&mut s, 60.0, 60.0);
    let cmds = draw(&s, false);
    assert_eq!(cmds.len(), 7);
    let [tip, _, _] = triangle(&cmds[2]);
    let k = 8.0 / 2.0_f64.sqrt();
    assert!(point_approx_eq(tip, pt(60.0 + k, 60.0 + k)));
}

#[test]
fn draw_pointer_arrow_in_bottom_mode_tracks_pointer() {
    let mut s = scroller_with(DisplayMode::Bottom);
    drag_at(&mut s, 60.0, 564.0);
    let cmds = draw(&s, false);
    assert_eq!(cmds.len(), 7);
    let [tip, _, _] = triangle(&cmds[2]);
    let k = 8.0 / 2.0_f64.sqrt();
    assert!(point_approx_eq(tip, pt(60.0 + k, 564.0 + k)));
}

#[test]
fn draw_pointer_at_hub_skips_pointer_arrow() {
    let mut s = scroller_with(DisplayMode::Top);
    drag_at(&mut s, 48.0, 48.0);
    assert!(s.can_scroll());
    assert_eq!(draw(&s, false).len(), 6);
}

#[test]
fn draw_nothing_when_hidden() {
    let s = scroller_with(DisplayMode::None);
    assert!(draw(&s, false).is_empty());
}

#[test]
fn draw_nothing_under_modal() {
    let s = scroller_with(DisplayMode::Top);
    assert!(draw(&s, true).is_empty());
}
