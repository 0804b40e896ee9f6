use crate::domain::color::distance_to_rgb;
use crate::domain::models::{ControlCommand, ControlMode, HandFrame, HandPoints};

/// Normalized pointer distance mapping to 100% volume.
const VOLUME_RANGE: f64 = 20.0;
/// Normalized pointer distance mapping to full brightness.
const BRIGHTNESS_RANGE: f64 = 30.0;
/// The bulb's usable brightness ceiling.
const BRIGHTNESS_CAP: f64 = 254.0;

/// Per-frame pinch classifier.
///
/// A left-hand pinch against the thumb selects a measurement mode
/// (middle finger → brightness, index → color, pinky → volume); while a
/// mode is held, the distance between the two index fingertips is the
/// control signal. Opening the right-hand index/thumb pinch past the
/// release threshold drops the mode.
///
/// All distances are normalized by the mean index-finger length of both
/// hands, so the gestures behave the same at any distance from the camera.
pub struct GestureClassifier {
    mode: Option<ControlMode>,
    activation_threshold: f64,
    release_threshold: f64,
}

impl GestureClassifier {
    pub fn new(activation_threshold: f64, release_threshold: f64) -> Self {
        Self {
            mode: None,
            activation_threshold,
            release_threshold,
        }
    }

    /// Currently held measurement mode, if any.
    pub fn mode(&self) -> Option<ControlMode> {
        self.mode
    }

    /// Process one frame of tracked hands.
    ///
    /// Returns a command for every frame in which a mode is held and both
    /// index fingertips are tracked. A frame that releases the mode emits
    /// nothing. Frames missing either hand are ignored entirely.
    pub fn process(&mut self, frame: &HandFrame) -> Option<ControlCommand> {
        let (left, right) = match (frame.left, frame.right) {
            (Some(left), Some(right)) => (left, right),
            _ => return None,
        };

        let mean_finger_length = (left.index_length() + right.index_length()) / 2.0;

        if self.mode.is_none() {
            self.check_activation(&left, mean_finger_length);
        }

        if self.mode.is_some() {
            let release = right.index_tip.distance_to(right.thumb_tip) / mean_finger_length;
            if release > self.release_threshold {
                self.mode = None;
                return None;
            }
        }

        let mode = self.mode?;
        let pointer_distance = left.index_tip.distance_to(right.index_tip) / mean_finger_length;

        Some(match mode {
            ControlMode::Volume => ControlCommand::SetVolume(measure_volume(pointer_distance)),
            ControlMode::Color => ControlCommand::SetColor(distance_to_rgb(pointer_distance)),
            ControlMode::Brightness => {
                ControlCommand::SetBrightness(measure_brightness(pointer_distance))
            }
        })
    }

    /// Evaluate the three activation pinches against the left hand.
    ///
    /// The order is a fixed tie-break: brightness, then color, then volume.
    /// Concurrent pinches are not arbitrated beyond it.
    fn check_activation(&mut self, left: &HandPoints, mean_finger_length: f64) {
        let brightness_pinch = left.thumb_tip.distance_to(left.middle_tip) / mean_finger_length;
        if brightness_pinch <= self.activation_threshold {
            self.mode = Some(ControlMode::Brightness);
            return;
        }

        let color_pinch = left.thumb_tip.distance_to(left.index_tip) / mean_finger_length;
        if color_pinch <= self.activation_threshold {
            self.mode = Some(ControlMode::Color);
            return;
        }

        let volume_pinch = left.thumb_tip.distance_to(left.pinky_tip) / mean_finger_length;
        if volume_pinch <= self.activation_threshold {
            self.mode = Some(ControlMode::Volume);
        }
    }
}

fn measure_volume(pointer_distance: f64) -> i32 {
    ((100.0 * (pointer_distance / VOLUME_RANGE)) as i32).min(100)
}

fn measure_brightness(pointer_distance: f64) -> u8 {
    if pointer_distance >= BRIGHTNESS_RANGE {
        BRIGHTNESS_CAP as u8
    } else {
        (pointer_distance / BRIGHTNESS_RANGE * BRIGHTNESS_CAP) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::PixelPoint;

    fn point(x: f64, y: f64) -> PixelPoint {
        PixelPoint { x, y }
    }

    /// Left hand with index finger length 100, index tip at the origin.
    /// Fingertip positions choose which pinches are satisfied.
    fn left_hand(thumb: (f64, f64), middle: (f64, f64), pinky: (f64, f64)) -> HandPoints {
        HandPoints {
            index_tip: point(0.0, 0.0),
            index_mcp: point(0.0, 100.0),
            thumb_tip: point(thumb.0, thumb.1),
            middle_tip: point(middle.0, middle.1),
            pinky_tip: point(pinky.0, pinky.1),
        }
    }

    /// Right hand with index finger length 100 and its tip at `index_x`;
    /// `thumb_gap` is the pixel distance of the release pinch.
    fn right_hand(index_x: f64, thumb_gap: f64) -> HandPoints {
        HandPoints {
            index_tip: point(index_x, 0.0),
            index_mcp: point(index_x, 100.0),
            thumb_tip: point(index_x, thumb_gap),
            middle_tip: point(index_x, 200.0),
            pinky_tip: point(index_x, 300.0),
        }
    }

    fn idle_left() -> HandPoints {
        // Nothing pinched: thumb far from middle, index and pinky.
        left_hand((400.0, 0.0), (400.0, 300.0), (700.0, 300.0))
    }

    fn classifier() -> GestureClassifier {
        GestureClassifier::new(0.3, 0.6)
    }

    #[test]
    fn empty_frame_does_nothing() {
        let mut c = classifier();
        assert_eq!(c.process(&HandFrame::default()), None);
        assert_eq!(c.mode(), None);
    }

    #[test]
    fn single_hand_is_ignored() {
        let mut c = classifier();
        let frame = HandFrame {
            // Brightness pinch held, but no right hand to normalize against.
            left: Some(left_hand((100.0, 0.0), (100.0, 20.0), (400.0, 0.0))),
            right: None,
        };
        assert_eq!(c.process(&frame), None);
        assert_eq!(c.mode(), None);
    }

    #[test]
    fn brightness_pinch_activates_and_measures_same_frame() {
        let mut c = classifier();
        let frame = HandFrame {
            left: Some(left_hand((100.0, 0.0), (100.0, 20.0), (400.0, 0.0))),
            right: Some(right_hand(1500.0, 50.0)),
        };
        // Pointer distance 1500 / mean length 100 => 15; 15/30 * 254 = 127.
        assert_eq!(c.process(&frame), Some(ControlCommand::SetBrightness(127)));
        assert_eq!(c.mode(), Some(ControlMode::Brightness));
    }

    #[test]
    fn activation_order_prefers_brightness_over_color_and_volume() {
        let mut c = classifier();
        // Thumb close to index tip, middle and pinky at once.
        let frame = HandFrame {
            left: Some(left_hand((10.0, 0.0), (10.0, 5.0), (15.0, 0.0))),
            right: Some(right_hand(1500.0, 50.0)),
        };
        c.process(&frame);
        assert_eq!(c.mode(), Some(ControlMode::Brightness));
    }

    #[test]
    fn color_pinch_maps_distance_through_the_band_scale() {
        let mut c = classifier();
        let frame = HandFrame {
            left: Some(left_hand((10.0, 0.0), (400.0, 0.0), (400.0, 300.0))),
            right: Some(right_hand(1500.0, 50.0)),
        };
        // Distance 15 sits in the green band.
        assert_eq!(
            c.process(&frame),
            Some(ControlCommand::SetColor([119, 239, 119]))
        );
        assert_eq!(c.mode(), Some(ControlMode::Color));
    }

    #[test]
    fn volume_pinch_scales_and_caps() {
        let mut c = classifier();
        let frame = HandFrame {
            left: Some(left_hand((200.0, 0.0), (500.0, 0.0), (210.0, 0.0))),
            right: Some(right_hand(1500.0, 50.0)),
        };
        // Distance 15 => 75%.
        assert_eq!(c.process(&frame), Some(ControlCommand::SetVolume(75)));

        let wide = HandFrame {
            left: Some(idle_left()),
            right: Some(right_hand(3000.0, 50.0)),
        };
        assert_eq!(c.process(&wide), Some(ControlCommand::SetVolume(100)));
    }

    #[test]
    fn brightness_caps_at_254() {
        let mut c = classifier();
        let activate = HandFrame {
            left: Some(left_hand((100.0, 0.0), (100.0, 20.0), (400.0, 0.0))),
            right: Some(right_hand(3500.0, 50.0)),
        };
        assert_eq!(
            c.process(&activate),
            Some(ControlCommand::SetBrightness(254))
        );
    }

    #[test]
    fn active_mode_blocks_other_activations() {
        let mut c = classifier();
        let volume = HandFrame {
            left: Some(left_hand((200.0, 0.0), (500.0, 0.0), (210.0, 0.0))),
            right: Some(right_hand(1500.0, 50.0)),
        };
        c.process(&volume);
        assert_eq!(c.mode(), Some(ControlMode::Volume));

        // Brightness pinch while volume is held: still a volume reading.
        let brightness_pinch = HandFrame {
            left: Some(left_hand((100.0, 0.0), (100.0, 20.0), (400.0, 0.0))),
            right: Some(right_hand(1500.0, 50.0)),
        };
        assert_eq!(
            c.process(&brightness_pinch),
            Some(ControlCommand::SetVolume(75))
        );
        assert_eq!(c.mode(), Some(ControlMode::Volume));
    }

    #[test]
    fn release_requires_strictly_exceeding_the_threshold() {
        let mut c = classifier();
        let activate = HandFrame {
            left: Some(left_hand((100.0, 0.0), (100.0, 20.0), (400.0, 0.0))),
            right: Some(right_hand(1500.0, 50.0)),
        };
        c.process(&activate);

        // Exactly at the threshold: mode is kept and keeps measuring.
        let at_threshold = HandFrame {
            left: Some(idle_left()),
            right: Some(right_hand(1500.0, 60.0)),
        };
        assert!(c.process(&at_threshold).is_some());
        assert_eq!(c.mode(), Some(ControlMode::Brightness));

        // Just past it: mode clears and the release frame emits nothing.
        let past_threshold = HandFrame {
            left: Some(idle_left()),
            right: Some(right_hand(1500.0, 61.0)),
        };
        assert_eq!(c.process(&past_threshold), None);
        assert_eq!(c.mode(), None);
    }

    #[test]
    fn activation_threshold_is_inclusive() {
        let mut c = classifier();
        // Pinch distance exactly 30 => normalized 0.3.
        let at_threshold = HandFrame {
            left: Some(left_hand((100.0, 0.0), (100.0, 30.0), (400.0, 0.0))),
            right: Some(right_hand(1500.0, 50.0)),
        };
        c.process(&at_threshold);
        assert_eq!(c.mode(), Some(ControlMode::Brightness));

        let mut c = classifier();
        let just_open = HandFrame {
            left: Some(left_hand((100.0, 0.0), (100.0, 31.0), (400.0, 0.0))),
            right: Some(right_hand(1500.0, 50.0)),
        };
        c.process(&just_open);
        assert_eq!(c.mode(), None);
    }

    #[test]
    fn open_right_hand_releases_in_the_activation_frame() {
        let mut c = classifier();
        let frame = HandFrame {
            left: Some(left_hand((100.0, 0.0), (100.0, 20.0), (400.0, 0.0))),
            right: Some(right_hand(1500.0, 200.0)),
        };
        assert_eq!(c.process(&frame), None);
        assert_eq!(c.mode(), None);
    }
}
