//! Looping Frame Animations
//!
//! An animation is an immutable list of frames with cumulative end times,
//! plus a private clock. Frame lists are shared between clones; clocks are
//! not.

use std::sync::Arc;
use serde::{Serialize, Deserialize};

/// Opaque reference to an image owned by the asset collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ImageId(pub u32);

/// One displayable frame: an image and its pixel dimensions.
///
/// Collision rectangles are sized from the current frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Image to draw
    pub image: ImageId,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Frame {
    /// Create a frame.
    pub const fn new(image: ImageId, width: u32, height: u32) -> Self {
        Self { image, width, height }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Scene {
    frame: Frame,
    /// Clock value (ms) at which this scene ends, cumulative from 0
    end_time: u64,
}

/// A time-indexed looping sequence of frames.
#[derive(Clone, Debug)]
pub struct Animation {
    scenes: Arc<[Scene]>,
    total_time: u64,
    clock: u64,
    current: usize,
}

impl Animation {
    /// Build an animation from `(frame, duration_ms)` pairs.
    pub fn new(frames: impl IntoIterator<Item = (Frame, u64)>) -> Self {
        let mut total_time = 0u64;
        let scenes: Vec<Scene> = frames
            .into_iter()
            .map(|(frame, duration)| {
                total_time = total_time.saturating_add(duration);
                Scene { frame, end_time: total_time }
            })
            .collect();

        Self {
            scenes: scenes.into(),
            total_time,
            clock: 0,
            current: 0,
        }
    }

    /// Single-frame animation; never advances.
    pub fn still(frame: Frame) -> Self {
        Self::new([(frame, 0)])
    }

    /// Reset the clock to the first frame.
    pub fn start(&mut self) {
        self.clock = 0;
        self.current = 0;
    }

    /// A copy sharing the frame list, with its clock reset.
    pub fn restarted(&self) -> Self {
        let mut copy = self.clone();
        copy.start();
        copy
    }

    /// Advance the clock by `elapsed_ms`, looping at the total duration.
    pub fn update(&mut self, elapsed_ms: u64) {
        if self.scenes.len() <= 1 {
            return;
        }

        self.clock = self.clock.saturating_add(elapsed_ms);
        if self.clock >= self.total_time {
            self.clock = 0;
            self.current = 0;
        }

        while let Some(scene) = self.scenes.get(self.current) {
            if self.clock > scene.end_time {
                self.current += 1;
            } else {
                break;
            }
        }
    }

    /// Frame shown at the current clock, `None` for an empty animation.
    pub fn current_frame(&self) -> Option<&Frame> {
        self.scenes.get(self.current).map(|scene| &scene.frame)
    }

    /// Current clock value in ms.
    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Whether the animation has no frames.
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Sum of all frame durations.
    pub fn total_time(&self) -> u64 {
        self.total_time
    }

    /// Whether two animations share the same frame list.
    pub fn shares_frames_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.scenes, &other.scenes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(id: u32) -> Frame {
        Frame::new(ImageId(id), 32, 32)
    }

    fn three_frames() -> Animation {
        Animation::new([(frame(1), 100), (frame(2), 100), (frame(3), 100)])
    }

    #[test]
    fn test_cumulative_end_times() {
        let mut anim = three_frames();
        assert_eq!(anim.total_time(), 300);
        assert_eq!(anim.current_frame().unwrap().image, ImageId(1));

        anim.update(100);
        // End bound is inclusive
        assert_eq!(anim.current_frame().unwrap().image, ImageId(1));

        anim.update(1);
        assert_eq!(anim.current_frame().unwrap().image, ImageId(2));

        anim.update(150);
        assert_eq!(anim.current_frame().unwrap().image, ImageId(3));
    }

    #[test]
    fn test_wraps_to_first_frame_at_total() {
        let mut anim = three_frames();
        anim.update(299);
        assert_eq!(anim.current_frame().unwrap().image, ImageId(3));

        anim.update(1);
        assert_eq!(anim.clock(), 0);
        assert_eq!(anim.current_frame().unwrap().image, ImageId(1));
    }

    #[test]
    fn test_single_frame_never_advances() {
        let mut anim = Animation::still(frame(7));
        anim.update(10_000);
        assert_eq!(anim.clock(), 0);
        assert_eq!(anim.current_frame().unwrap().image, ImageId(7));
    }

    #[test]
    fn test_empty_animation_is_noop() {
        let mut anim = Animation::new(std::iter::empty());
        anim.update(50);
        assert!(anim.is_empty());
        assert!(anim.current_frame().is_none());
    }

    #[test]
    fn test_zero_length_loop_does_not_hang() {
        let mut anim = Animation::new([(frame(1), 0), (frame(2), 0)]);
        anim.update(16);
        assert_eq!(anim.clock(), 0);
        assert_eq!(anim.current_frame().unwrap().image, ImageId(1));
    }

    #[test]
    fn test_clone_has_independent_clock() {
        let mut a = three_frames();
        a.update(150);
        let mut b = a.restarted();

        assert!(a.shares_frames_with(&b));
        assert_eq!(b.clock(), 0);

        b.update(250);
        assert_eq!(a.clock(), 150);
        assert_eq!(b.clock(), 250);
    }

    #[test]
    fn test_start_resets_clock() {
        let mut anim = three_frames();
        anim.update(250);
        anim.start();
        assert_eq!(anim.clock(), 0);
        assert_eq!(anim.current_frame().unwrap().image, ImageId(1));
        assert_eq!(anim.len(), 3);
    }
}
