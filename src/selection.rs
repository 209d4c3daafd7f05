use crate::camera::{CameraState, Tap, Viewport};
use crate::colony::Colony;
use crate::config::*;
use crate::event_log::{EventLog, LogKind};
use crate::math::dist2;
use crate::simulation::ColonySim;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

/// Resource to track the selected colony and whether the camera follows it
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct SelectedColony {
    pub index: usize,
    pub focus: bool,
}

/// Nearest colony to a world point within `SELECTION_RADIUS`
pub fn pick_nearest(colonies: &[Colony], world: Vec2) -> Option<usize> {
    let limit = SELECTION_RADIUS * SELECTION_RADIUS;
    colonies
        .iter()
        .enumerate()
        .map(|(i, c)| (i, dist2(world, c.position)))
        .filter(|(_, d)| *d < limit)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// A release counts as a tap if the pointer barely moved and was held briefly
pub fn is_tap(start: Vec2, end: Vec2, held_secs: f32) -> bool {
    dist2(start, end) < TAP_SLOP * TAP_SLOP && held_secs < TAP_MAX_SECS
}

/// System to select colonies on tap; a double tap recenters on the selection
pub fn handle_selection(
    mut taps: EventReader<Tap>,
    time: Res<Time>,
    sim: Res<ColonySim>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut selected: ResMut<SelectedColony>,
    mut camera_state: ResMut<CameraState>,
    mut log: ResMut<EventLog>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let viewport = Viewport::of(window);

    for tap in taps.read() {
        let Some(world) = camera_state.screen_to_world(tap.screen, viewport) else {
            continue;
        };
        if let Some(index) = pick_nearest(&sim.colonies, world) {
            selected.index = index;
            let message = format!("Selected Colony #{}", index + 1);
            info!("{}", message);
            log.push(LogKind::Info, message, time.elapsed_secs_f64());
            if selected.focus {
                camera_state.center_on(sim.colonies[index].position, true);
            }
        }
        if tap.double {
            if let Some(colony) = sim.colonies.get(selected.index) {
                camera_state.center_on(colony.position, false);
            }
        }
    }
}
