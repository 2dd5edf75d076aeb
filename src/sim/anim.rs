//! Scale animations for pulpits
//!
//! Grow-in on spawn and shrink-away on collapse. Each animation is a tiny
//! state machine advanced once per tick; nothing suspends or blocks.

use serde::{Deserialize, Serialize};

/// Which way the scale moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimKind {
    /// 0 -> 1
    Grow,
    /// 1 -> 0
    Shrink,
}

/// Result of advancing an animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimStatus {
    Running,
    Finished,
}

/// A fixed-duration scale animation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleAnim {
    pub kind: AnimKind,
    elapsed: f32,
    duration: f32,
}

impl ScaleAnim {
    pub fn new(kind: AnimKind, duration: f32) -> Self {
        Self {
            kind,
            elapsed: 0.0,
            duration: duration.max(0.0),
        }
    }

    pub fn grow(duration: f32) -> Self {
        Self::new(AnimKind::Grow, duration)
    }

    pub fn shrink(duration: f32) -> Self {
        Self::new(AnimKind::Shrink, duration)
    }

    /// Advance by `dt` seconds
    pub fn advance(&mut self, dt: f32) -> AnimStatus {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        if self.is_finished() {
            AnimStatus::Finished
        } else {
            AnimStatus::Running
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Completed share of the animation, 0..=1
    pub fn fraction(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    /// Scale factor to present for this animation
    pub fn scale(&self) -> f32 {
        match self.kind {
            AnimKind::Grow => self.fraction(),
            AnimKind::Shrink => 1.0 - self.fraction(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grow_runs_to_completion() {
        let mut anim = ScaleAnim::grow(0.5);
        assert_eq!(anim.scale(), 0.0);
        assert_eq!(anim.advance(0.25), AnimStatus::Running);
        assert!((anim.scale() - 0.5).abs() < 1e-6);
        assert_eq!(anim.advance(0.25), AnimStatus::Finished);
        assert_eq!(anim.scale(), 1.0);
        // Overshoot stays clamped
        assert_eq!(anim.advance(1.0), AnimStatus::Finished);
        assert_eq!(anim.fraction(), 1.0);
    }

    #[test]
    fn test_shrink_scale_goes_down() {
        let mut anim = ScaleAnim::shrink(0.4);
        assert_eq!(anim.scale(), 1.0);
        anim.advance(0.1);
        assert!((anim.scale() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let mut anim = ScaleAnim::shrink(0.0);
        assert_eq!(anim.advance(0.0), AnimStatus::Finished);
        assert_eq!(anim.scale(), 0.0);

        let anim = ScaleAnim::grow(-3.0);
        assert!(anim.is_finished());
    }
}
