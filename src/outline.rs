use crate::render::to_screen_space;
use crate::selection::SelectedColony;
use crate::simulation::ColonySim;
use bevy::math::Isometry2d;
use bevy::prelude::*;

const OUTLINE_SAMPLES: usize = 64;

/// Silhouette outline offsets moved to the colony position, in world coordinates
pub fn colony_outline(position: Vec2, offsets: &[Vec2]) -> Vec<Vec2> {
    offsets.iter().map(|o| position + *o).collect()
}

/// System to trace every colony silhouette
pub fn draw_colony_outlines(mut gizmos: Gizmos, time: Res<Time>, sim: Res<ColonySim>) {
    let t = time.elapsed_secs();
    for colony in &sim.colonies {
        let offsets = colony.silhouette.outline(t, OUTLINE_SAMPLES);
        let outline = colony_outline(colony.position, &offsets);
        let color = Color::hsla(colony.dna.hue, 0.9, 0.7, 0.55);
        gizmos.linestrip_2d(outline.into_iter().map(to_screen_space), color);
    }
}

/// System to ring the selected colony
pub fn draw_selection_ring(
    mut gizmos: Gizmos,
    time: Res<Time>,
    sim: Res<ColonySim>,
    selected: Res<SelectedColony>,
) {
    let Some(colony) = sim.colonies.get(selected.index) else {
        return;
    };
    let pulse = 0.5 + 0.15 * (time.elapsed_secs() * 3.0).sin();
    let radius = 95.0 * colony.dna.aura;
    let center = Isometry2d::from_translation(to_screen_space(colony.position));
    let color = Color::srgba(1.0, 1.0, 0.0, pulse);
    gizmos.circle_2d(center, radius, color).resolution(48);
    if selected.focus {
        gizmos.circle_2d(center, radius + 6.0, color.with_alpha(pulse * 0.5)).resolution(48);
    }
}
