use crate::foundation::error::{NovaError, NovaResult};
use crate::storyboard::model::Storyboard;

/// Where a given elapsed time falls in the storyboard.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimelinePosition {
    /// Index of the active scene.
    pub scene_index: usize,
    /// Seconds since the active scene started.
    pub time_in_scene: f64,
    /// Normalized scene time in `[0, 1]`.
    pub t: f64,
    /// Overall progress in `[0, 1]`.
    pub progress: f64,
}

/// Prefix-sum view of scene durations.
#[derive(Clone, Debug, PartialEq)]
pub struct Timeline {
    starts: Vec<f64>,
    durations: Vec<f64>,
    total: f64,
}

impl Timeline {
    /// Build from a storyboard. Needs at least one scene and a positive total.
    pub fn new(board: &Storyboard) -> NovaResult<Self> {
        if board.scenes.is_empty() {
            return Err(NovaError::validation("timeline needs at least one scene"));
        }
        let mut starts = Vec::with_capacity(board.scenes.len());
        let mut durations = Vec::with_capacity(board.scenes.len());
        let mut acc = 0.0;
        for scene in &board.scenes {
            starts.push(acc);
            let d = f64::from(scene.duration);
            durations.push(d);
            acc += d;
        }
        if acc <= 0.0 {
            return Err(NovaError::validation(
                "timeline total duration must be > 0",
            ));
        }
        Ok(Self {
            starts,
            durations,
            total: acc,
        })
    }

    /// Total length in seconds.
    pub fn total_secs(&self) -> f64 {
        self.total
    }

    /// Number of scenes.
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    /// Always `false`; construction rejects empty storyboards.
    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    /// Start time of scene `index` in seconds.
    pub fn scene_start(&self, index: usize) -> Option<f64> {
        self.starts.get(index).copied()
    }

    /// Locate `elapsed` seconds, clamped to `[0, total]`.
    ///
    /// A scene owns `[start, start + duration)`; `elapsed == total` maps to the end of the last
    /// scene.
    pub fn locate(&self, elapsed: f64) -> TimelinePosition {
        let e = if elapsed.is_finite() {
            elapsed.clamp(0.0, self.total)
        } else {
            0.0
        };
        let last = self.starts.len() - 1;
        let scene_index = self
            .starts
            .iter()
            .zip(&self.durations)
            .position(|(start, dur)| e < start + dur)
            .unwrap_or(last);

        let start = self.starts[scene_index];
        let dur = self.durations[scene_index];
        let time_in_scene = (e - start).clamp(0.0, dur);
        let t = if dur > 0.0 {
            (time_in_scene / dur).clamp(0.0, 1.0)
        } else {
            1.0
        };
        TimelinePosition {
            scene_index,
            time_in_scene,
            t,
            progress: (e / self.total).clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/timeline.rs"]
mod tests;
