use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::{egui, EguiContexts, EguiPlugin};
use worm_colony::camera::{
    CameraState, PointerOverUi, PointerState, Tap, Viewport, camera_pan, camera_zoom, fit_view_on_start,
    follow_focus, refit_on_colony, setup_camera, sync_camera,
};
use worm_colony::capture::request_capture;
use worm_colony::config::*;
use worm_colony::economy::{MarketAction, format_money};
use worm_colony::error::SeedError;
use worm_colony::event_log::{EventLog, LogKind};
use worm_colony::outline::{draw_colony_outlines, draw_selection_ring};
use worm_colony::render::{Starfield, draw_colonies, draw_starfield, draw_worms};
use worm_colony::selection::{SelectedColony, handle_selection};
use worm_colony::simulation::{ColonyFounded, ColonySim, SimulationState, seed_from_env, step_simulation};

/// Seed the session was started with, reused by the reset button
#[derive(Resource)]
struct SessionSeed {
    seed: Option<u64>,
    /// Reported once logging is up
    error: Option<SeedError>,
}

fn main() {
    let session = match seed_from_env() {
        Ok(seed) => SessionSeed { seed, error: None },
        Err(err) => SessionSeed { seed: None, error: Some(err) },
    };
    let sim = ColonySim::new(session.seed);

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Worm Colony".to_string(),
                resolution: (1280.0, 720.0).into(),
                canvas: Some("#simCanvas".to_string()),
                fit_canvas_to_parent: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin)
        .insert_resource(ClearColor(Color::srgb(0.02, 0.02, 0.05)))
        .insert_resource(session)
        .insert_resource(sim)
        .init_resource::<CameraState>()
        .init_resource::<SelectedColony>()
        .init_resource::<PointerState>()
        .init_resource::<PointerOverUi>()
        .init_resource::<EventLog>()
        .init_resource::<SimulationState>()
        .init_resource::<Starfield>()
        .add_event::<Tap>()
        .add_event::<ColonyFounded>()
        .add_systems(Startup, (setup_camera, announce_session))
        // Only run when simulation is running
        .add_systems(Update, step_simulation.run_if(|state: Res<SimulationState>| *state == SimulationState::Running))
        .add_systems(Update, (
            // Always run (even when paused)
            track_pointer_over_ui,
            camera_zoom,
            camera_pan,
            handle_selection,
            fit_view_on_start,
            refit_on_colony,
            follow_focus,
            sync_camera,
        ).chain().after(step_simulation))
        .add_systems(Update, (
            draw_starfield,
            draw_colonies,
            draw_colony_outlines,
            draw_worms,
            draw_selection_ring,
            ui_system,
        ).after(sync_camera))
        .run();
}

fn announce_session(session: Res<SessionSeed>, time: Res<Time>, mut log: ResMut<EventLog>) {
    let now = time.elapsed_secs_f64();
    if let Some(err) = &session.error {
        warn!("{}; using an entropy seed", err);
        log.push(LogKind::Warn, err.to_string(), now);
    }
    match session.seed {
        Some(seed) => info!("Worm colony started with seed {}", seed),
        None => info!("Worm colony started"),
    }
    log.push(LogKind::Info, "Genesis colony online", now);
}

/// Keep wheel and drag input away from the world while the pointer is on the panel
fn track_pointer_over_ui(mut contexts: EguiContexts, mut over_ui: ResMut<PointerOverUi>) {
    let ctx = contexts.ctx_mut();
    over_ui.0 = ctx.is_pointer_over_area() || ctx.wants_pointer_input();
}

#[allow(clippy::too_many_arguments)]
fn ui_system(
    mut commands: Commands,
    mut contexts: EguiContexts,
    time: Res<Time>,
    session: Res<SessionSeed>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut sim: ResMut<ColonySim>,
    mut camera_state: ResMut<CameraState>,
    mut selected: ResMut<SelectedColony>,
    mut simulation_state: ResMut<SimulationState>,
    mut log: ResMut<EventLog>,
) {
    let now = time.elapsed_secs_f64();

    egui::Window::new("Worm Colony")
        .default_pos(egui::pos2(10.0, 10.0))
        .show(contexts.ctx_mut(), |ui| {
            // Pause/Resume, capture and reset
            ui.horizontal(|ui| {
                let button_text = if *simulation_state == SimulationState::Running {
                    "⏸ Pause"
                } else {
                    "▶ Resume"
                };
                if ui.button(button_text).clicked() {
                    *simulation_state = if *simulation_state == SimulationState::Running {
                        SimulationState::Paused
                    } else {
                        SimulationState::Running
                    };
                }
                if ui.button("📷 Capture").clicked() {
                    request_capture(&mut commands);
                }
                if ui.button("↺ Reset").clicked() {
                    *sim = ColonySim::new(session.seed);
                    *selected = SelectedColony::default();
                    if let Ok(window) = windows.get_single() {
                        camera_state.fit_to_content(&sim.colony_positions(), FIT_PADDING, Viewport::of(window));
                    }
                    info!("Simulation reset");
                    log.push(LogKind::Info, "Simulation reset", now);
                }
            });

            ui.separator();
            ui.heading("Market");
            ui.horizontal_wrapped(|ui| {
                for action in MarketAction::ALL {
                    if ui.button(action.label()).clicked() {
                        let receipt = sim.apply_market(action);
                        info!("{}", receipt);
                        log.push(LogKind::Event, receipt.to_string(), now);
                    }
                }
            });
            ui.horizontal(|ui| {
                if ui.button("🧬 Mutate").clicked() {
                    match sim.mutate_random() {
                        Some(event) => {
                            info!("{}", event);
                            log.push(event.log_kind(), event.to_string(), now);
                        }
                        None => log.push(LogKind::Warn, "Nothing to mutate", now),
                    }
                }
            });

            ui.separator();
            ui.heading("Camera");
            ui.horizontal(|ui| {
                if ui.button("➕").clicked() {
                    camera_state.zoom_by(BUTTON_ZOOM_IN);
                }
                if ui.button("➖").clicked() {
                    camera_state.zoom_by(BUTTON_ZOOM_OUT);
                }
                if ui.button("Fit all").clicked() {
                    if let Ok(window) = windows.get_single() {
                        camera_state.fit_to_content(&sim.colony_positions(), FIT_PADDING, Viewport::of(window));
                    }
                }
                let focus_text = if selected.focus { "Focus: on" } else { "Focus: off" };
                if ui.button(focus_text).clicked() {
                    selected.focus = !selected.focus;
                    if selected.focus {
                        if let Some(colony) = sim.colonies.get(selected.index) {
                            camera_state.center_on(colony.position, false);
                        }
                    }
                }
            });
            ui.label(format!("Zoom: {:.2}x", camera_state.zoom));
            ui.label("Drag to pan • wheel or pinch to zoom • tap a colony to select");

            ui.separator();
            ui.heading("Colony Stats");
            let economy = sim.economy;
            ui.label(format!("Buyers: {}", economy.buyers));
            ui.label(format!("Volume: {}", format_money(economy.volume)));
            ui.label(format!("Market cap: {}", format_money(economy.mcap)));
            ui.label(format!("Colonies: {} / {}", sim.colonies.len(), MAX_COLONIES));
            ui.label(format!("Worms: {} / {}", sim.worm_count(), economy.spawn_target()));
            ui.label(format!("Growth: {:.2}", economy.growth_score()));
            if sim.colonies.len() < MAX_COLONIES {
                ui.label(format!("Next colony at {}", format_money(sim.next_split_at)));
            }

            if let Some(colony) = sim.colonies.get(selected.index) {
                ui.separator();
                ui.heading(format!("Colony #{}", selected.index + 1));
                let dna = &colony.dna;
                ui.label(format!("{} • {} • {}", dna.temperament, dna.biome, dna.style));
                ui.label(format!("Hue: {:.0}°  Aura: {:.2}", dna.hue, dna.aura));
                ui.label(format!("Chaos: {:.2}  Drift: {:.2}", dna.chaos, dna.drift));
                ui.label(format!("Limbiness: {:.2}  Patterns: {:.2}", dna.limbiness, dna.pattern_bias));
                ui.label(format!("Worms: {}", colony.worms.len()));
                if colony.is_frozen() {
                    ui.colored_label(egui::Color32::LIGHT_BLUE, "Frozen");
                }
            }

            ui.separator();
            ui.heading("Log");
            egui::ScrollArea::vertical().max_height(220.0).show(ui, |ui| {
                for entry in log.entries() {
                    let color = match entry.kind {
                        LogKind::Info => egui::Color32::LIGHT_GRAY,
                        LogKind::Event => egui::Color32::LIGHT_GREEN,
                        LogKind::Mutation => egui::Color32::from_rgb(220, 150, 255),
                        LogKind::Warn => egui::Color32::from_rgb(255, 170, 90),
                    };
                    ui.colored_label(color, entry.to_string());
                }
            });
        });
}
