use std::time::{Duration, Instant};

use crate::physics::Entity;

/// Frames-per-second counter
///
/// Counts frames and publishes a new FPS value once per elapsed second.
#[derive(Debug, Clone)]
pub struct FrameStats {
    window_start: Instant,
    frames_in_window: u32,
    fps: u32,
    total_frames: u64,
}

impl FrameStats {
    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames_in_window: 0,
            fps: 0,
            total_frames: 0,
        }
    }

    /// Count a frame presented at `now`; returns true when FPS was refreshed
    pub fn record_frame(&mut self, now: Instant) -> bool {
        self.frames_in_window += 1;
        self.total_frames += 1;

        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed >= Duration::from_secs(1) {
            self.fps = (self.frames_in_window as f64 / elapsed.as_secs_f64()).round() as u32;
            self.frames_in_window = 0;
            self.window_start = now;
            true
        } else {
            false
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }
}

/// Window title: `FPS | #Tri | Pos | Rot | ViewDist`
pub fn format_title(fps: u32, visible_vertices: usize, entity: &Entity, view_distance: f32) -> String {
    format!(
        "FPS: {} | #Tri: {} | Pos: ({:.2}, {:.2}, {:.2}) | Rot: ({:.1}, {:.1}) | ViewDist: {:.0}",
        fps,
        visible_vertices / 3,
        entity.position.x,
        entity.position.y,
        entity.position.z,
        entity.rotation.pitch,
        entity.rotation.yaw,
        view_distance
    )
}
