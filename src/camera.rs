use crate::config::*;
use crate::math::lerp;
use crate::selection::SelectedColony;
use crate::simulation::{ColonyFounded, ColonySim};
use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

#[derive(Component)]
pub struct MainCamera;

/// Size of the drawing surface in logical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn of(window: &Window) -> Self {
        Self::new(window.width(), window.height())
    }

    /// Zero or non-finite sizes show up transiently during resizes
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * 0.5
    }
}

/// Pan/zoom state. `cam` is the world translation applied after centering, so the
/// screen center shows world point `-cam`.
#[derive(Resource, Debug, Clone)]
pub struct CameraState {
    pub cam: Vec2,
    pub zoom: f32,
    /// Dragging or pinching; the renderer drops its heavier passes meanwhile
    pub interacting: bool,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            cam: Vec2::ZERO,
            zoom: START_ZOOM,
            interacting: false,
        }
    }
}

impl CameraState {
    /// Inverse of the render transform. `None` for a degenerate viewport.
    pub fn screen_to_world(&self, screen: Vec2, viewport: Viewport) -> Option<Vec2> {
        if !viewport.is_valid() || !screen.is_finite() {
            return None;
        }
        Some((screen - viewport.center()) / self.zoom - self.cam)
    }

    pub fn world_to_screen(&self, world: Vec2, viewport: Viewport) -> Option<Vec2> {
        if !viewport.is_valid() || !world.is_finite() {
            return None;
        }
        Some((world + self.cam) * self.zoom + viewport.center())
    }

    /// Drag by a screen-space delta; moves less world per pixel when zoomed in
    pub fn pan(&mut self, screen_delta: Vec2) {
        if screen_delta.is_finite() {
            self.cam += screen_delta / self.zoom;
        }
    }

    pub fn zoom_by(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    /// Zoom and center so every position (padded) fits the viewport.
    /// Returns false and leaves the camera untouched when nothing can be fitted.
    pub fn fit_to_content(&mut self, positions: &[Vec2], padding: f32, viewport: Viewport) -> bool {
        if !viewport.is_valid() || positions.is_empty() || !padding.is_finite() {
            return false;
        }
        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for p in positions.iter().filter(|p| p.is_finite()) {
            min = min.min(*p - padding);
            max = max.max(*p + padding);
        }
        if !min.is_finite() || !max.is_finite() {
            return false;
        }

        let box_w = (max.x - min.x).max(FIT_MIN_BOX);
        let box_h = (max.y - min.y).max(FIT_MIN_BOX);
        let fit = (viewport.width / box_w).min(viewport.height / box_h);
        self.zoom = (fit * FIT_MARGIN).clamp(MIN_ZOOM, MAX_ZOOM);
        self.cam = -(min + max) * 0.5;
        true
    }

    /// Move toward (smooth) or onto (snap) a world point
    pub fn center_on(&mut self, target: Vec2, smooth: bool) {
        if !target.is_finite() {
            return;
        }
        if smooth {
            self.cam.x = lerp(self.cam.x, -target.x, FOLLOW_BLEND);
            self.cam.y = lerp(self.cam.y, -target.y, FOLLOW_BLEND);
        } else {
            self.cam = -target;
        }
    }
}

/// Whether the pointer currently belongs to the control panel
#[derive(Resource, Default)]
pub struct PointerOverUi(pub bool);

/// Drag/tap bookkeeping between frames
#[derive(Resource, Default)]
pub struct PointerState {
    /// Screen position and time of the current press
    pub pressed: Option<(Vec2, f64)>,
    pub last: Option<Vec2>,
    pub last_tap: Option<f64>,
}

/// A press released without dragging, in screen space
#[derive(Event, Debug, Clone, Copy)]
pub struct Tap {
    pub screen: Vec2,
    pub double: bool,
}

pub fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        MainCamera,
        Transform::from_xyz(0.0, 0.0, 0.0),
        OrthographicProjection {
            scale: 1.0 / START_ZOOM,
            ..OrthographicProjection::default_2d()
        },
    ));
}

/// Mirror `CameraState` onto the bevy camera. World y grows downward like screen
/// space, so it is flipped on the way into bevy's y-up world.
pub fn sync_camera(
    camera_state: Res<CameraState>,
    mut query: Query<(&mut Transform, &mut OrthographicProjection), With<MainCamera>>,
) {
    let Ok((mut transform, mut projection)) = query.get_single_mut() else {
        return;
    };
    transform.translation.x = -camera_state.cam.x;
    transform.translation.y = camera_state.cam.y;
    projection.scale = 1.0 / camera_state.zoom;
}

pub fn camera_zoom(
    mut scroll_events: EventReader<MouseWheel>,
    over_ui: Res<PointerOverUi>,
    mut camera_state: ResMut<CameraState>,
) {
    for event in scroll_events.read() {
        if over_ui.0 {
            continue;
        }
        let notch = match event.unit {
            MouseScrollUnit::Line => event.y,
            MouseScrollUnit::Pixel => event.y / 40.0,
        };
        if notch > 0.0 {
            camera_state.zoom_by(WHEEL_ZOOM_IN);
        } else if notch < 0.0 {
            camera_state.zoom_by(WHEEL_ZOOM_OUT);
        }
    }
}

/// Drag to pan with the left mouse button or one finger, pinch to zoom with two.
/// Short, still presses are reported as taps.
pub fn camera_pan(
    mouse_button: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    time: Res<Time>,
    over_ui: Res<PointerOverUi>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut pointer: ResMut<PointerState>,
    mut camera_state: ResMut<CameraState>,
    mut taps: EventWriter<Tap>,
) {
    let now = time.elapsed_secs_f64();
    let cursor = windows.get_single().ok().and_then(|w| w.cursor_position());
    let fingers: Vec<&bevy::input::touch::Touch> = touches.iter().collect();

    // Pinch
    if fingers.len() >= 2 {
        let (a, b) = (fingers[0], fingers[1]);
        let span = a.position().distance(b.position());
        let prev_span = a.previous_position().distance(b.previous_position());
        if span > 1.0 && prev_span > 1.0 {
            camera_state.zoom_by(span / prev_span);
        }
        camera_state.interacting = true;
        // a pinch never ends in a tap
        pointer.pressed = None;
        pointer.last = None;
        return;
    }

    let touch_pos = fingers.first().map(|t| t.position());
    let pressed_now = !over_ui.0
        && (mouse_button.just_pressed(MouseButton::Left) || touches.iter_just_pressed().next().is_some());
    if pressed_now {
        if let Some(pos) = touch_pos.or(cursor) {
            pointer.pressed = Some((pos, now));
            pointer.last = Some(pos);
            camera_state.interacting = true;
        }
    }

    if pointer.pressed.is_some() {
        if let (Some(pos), Some(last)) = (touch_pos.or(cursor), pointer.last) {
            camera_state.pan(pos - last);
            pointer.last = Some(pos);
        }
    }

    let released_touch = touches.iter_just_released().next().map(|t| t.position());
    let released = mouse_button.just_released(MouseButton::Left) || released_touch.is_some();
    if released {
        if let Some((start, at)) = pointer.pressed.take() {
            let end = released_touch.or(cursor).unwrap_or(start);
            if crate::selection::is_tap(start, end, (now - at) as f32) {
                let double = pointer
                    .last_tap
                    .is_some_and(|t| ((now - t) as f32) < DOUBLE_TAP_SECS);
                pointer.last_tap = Some(now);
                taps.send(Tap { screen: end, double });
            }
        }
        pointer.last = None;
        camera_state.interacting = false;
    }
}

/// Fit every colony into view once the window has a usable size
pub fn fit_view_on_start(
    mut fitted: Local<bool>,
    sim: Res<ColonySim>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut camera_state: ResMut<CameraState>,
) {
    if *fitted {
        return;
    }
    let Ok(window) = windows.get_single() else {
        return;
    };
    // retried every frame until the viewport is valid
    *fitted = camera_state.fit_to_content(&sim.colony_positions(), FIT_PADDING, Viewport::of(window));
}

/// Refit after a new colony appears, unless following a colony
pub fn refit_on_colony(
    mut founded: EventReader<ColonyFounded>,
    sim: Res<ColonySim>,
    selected: Res<SelectedColony>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut camera_state: ResMut<CameraState>,
) {
    if founded.read().count() == 0 || selected.focus {
        return;
    }
    if let Ok(window) = windows.get_single() {
        camera_state.fit_to_content(&sim.colony_positions(), FIT_PADDING, Viewport::of(window));
    }
}

/// Smoothly keep the selected colony centered while focus mode is on
pub fn follow_focus(
    sim: Res<ColonySim>,
    selected: Res<SelectedColony>,
    mut camera_state: ResMut<CameraState>,
) {
    if !selected.focus {
        return;
    }
    if let Some(colony) = sim.colonies.get(selected.index) {
        camera_state.center_on(colony.position, true);
    }
}
