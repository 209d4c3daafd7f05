use crate::config::CAPTURE_FILE;
use crate::error::CaptureError;
use crate::event_log::{EventLog, LogKind};
use bevy::prelude::*;
use bevy::render::view::screenshot::{Screenshot, ScreenshotCaptured};
use std::path::{Path, PathBuf};

/// Ask the renderer for a copy of the next frame; it is saved once it arrives
pub fn request_capture(commands: &mut Commands) {
    commands.spawn(Screenshot::primary_window()).observe(on_captured);
}

fn on_captured(trigger: Trigger<ScreenshotCaptured>, time: Res<Time>, mut log: ResMut<EventLog>) {
    let now = time.elapsed_secs_f64();
    match write_capture(&trigger.event().0, Path::new(CAPTURE_FILE)) {
        Ok(path) => {
            info!("Saved capture to {}", path.display());
            log.push(LogKind::Info, format!("Saved {}", path.display()), now);
        }
        Err(err) => {
            warn!("Capture failed: {}", err);
            log.push(LogKind::Warn, format!("Capture failed: {}", err), now);
        }
    }
}

/// Encode a captured frame as an RGB image file at `path`
pub fn write_capture(image: &Image, path: &Path) -> Result<PathBuf, CaptureError> {
    let frame = image
        .clone()
        .try_into_dynamic()
        .map_err(|e| CaptureError::Convert(e.to_string()))?;
    frame.to_rgb8().save(path).map_err(|e| CaptureError::Write {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(path.to_path_buf())
}
