/// Camera focus transitions — bounded-duration yaw rotation toward a
/// speaker's position.

use crate::schema::speaker::Position;

/// Rotation speed settings for focus transitions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusConfig {
    /// Degrees per second.
    pub rotation_speed: f32,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            rotation_speed: 60.0,
        }
    }
}

/// Yaw angle in degrees the camera must face to look at `target` from
/// `camera`, on the horizontal plane.
pub fn target_yaw_toward(camera: Position, target: Position) -> f32 {
    let dx = target.x - camera.x;
    let dz = target.z - camera.z;
    dx.atan2(dz).to_degrees()
}

/// Smallest signed angle in degrees, in [-180, 180], from `from` to `to`.
fn shortest_arc(from: f32, to: f32) -> f32 {
    let mut delta = (to - from) % 360.0;
    if delta > 180.0 {
        delta -= 360.0;
    }
    if delta < -180.0 {
        delta += 360.0;
    }
    delta
}

/// Rotates a yaw value toward a target over a duration proportional to
/// the angular distance. Progress is normalized `t` in [0, 1], complete
/// at `t == 1`; `cancel` snaps straight to the target.
#[derive(Debug, Clone, Default)]
pub struct FocusTransitionController {
    from_yaw: f32,
    delta: f32,
    target_yaw: f32,
    current_yaw: f32,
    elapsed: f32,
    duration: f32,
    active: bool,
}

impl FocusTransitionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin rotating from `from_yaw` toward `target_yaw` along the
    /// shortest arc. A zero-angle transition (already facing the
    /// target) completes immediately, so the duration is never zero
    /// while the controller is active.
    pub fn start(&mut self, from_yaw: f32, target_yaw: f32, config: &FocusConfig) {
        let delta = shortest_arc(from_yaw, target_yaw);
        let angle = delta.abs();
        self.from_yaw = from_yaw;
        self.target_yaw = target_yaw;
        self.delta = delta;
        self.elapsed = 0.0;
        if angle <= f32::EPSILON || config.rotation_speed <= 0.0 {
            self.current_yaw = target_yaw;
            self.duration = 0.0;
            self.active = false;
            return;
        }
        self.duration = angle / config.rotation_speed;
        self.current_yaw = from_yaw;
        self.active = true;
    }

    pub fn tick(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.elapsed += dt;
        let t = (self.elapsed / self.duration).min(1.0);
        self.current_yaw = self.from_yaw + self.delta * t;
        if t >= 1.0 {
            self.current_yaw = self.target_yaw;
            self.active = false;
        }
    }

    /// Snap to the target orientation and deactivate.
    pub fn cancel(&mut self) {
        if !self.active {
            return;
        }
        self.current_yaw = self.target_yaw;
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn current_yaw(&self) -> f32 {
        self.current_yaw
    }

    pub fn target_yaw(&self) -> f32 {
        self.target_yaw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaw_toward_cardinal_directions() {
        let origin = Position::default();
        assert!((target_yaw_toward(origin, Position::new(0.0, 0.0, 1.0))).abs() < 1e-4);
        assert!((target_yaw_toward(origin, Position::new(1.0, 0.0, 0.0)) - 90.0).abs() < 1e-4);
        assert!((target_yaw_toward(origin, Position::new(-1.0, 0.0, 0.0)) + 90.0).abs() < 1e-4);
    }

    #[test]
    fn duration_follows_angular_distance() {
        let mut focus = FocusTransitionController::new();
        let config = FocusConfig {
            rotation_speed: 60.0,
        };
        focus.start(0.0, 90.0, &config);
        assert!(focus.is_active());

        // 90 degrees at 60 deg/s: done at 1.5 s, not before
        focus.tick(1.0);
        assert!(focus.is_active());
        assert!((focus.current_yaw() - 60.0).abs() < 1e-3);
        focus.tick(0.5);
        assert!(!focus.is_active());
        assert!((focus.current_yaw() - 90.0).abs() < 1e-3);
    }

    #[test]
    fn zero_angle_completes_immediately() {
        let mut focus = FocusTransitionController::new();
        focus.start(45.0, 45.0, &FocusConfig::default());
        assert!(!focus.is_active());
        assert!((focus.current_yaw() - 45.0).abs() < 1e-4);
    }

    #[test]
    fn rotation_takes_the_shortest_arc() {
        let mut focus = FocusTransitionController::new();
        let config = FocusConfig {
            rotation_speed: 10.0,
        };
        // 170 -> -170 is 20 degrees across the wrap, not 340 back around
        focus.start(170.0, -170.0, &config);
        focus.tick(1.0);
        assert!(focus.is_active());
        assert!((focus.current_yaw() - 175.0).abs() < 1e-3);
        focus.tick(1.0);
        assert!(!focus.is_active());
        assert!((focus.current_yaw() + 170.0).abs() < 1e-3);
    }

    #[test]
    fn cancel_snaps_to_target() {
        let mut focus = FocusTransitionController::new();
        focus.start(0.0, 120.0, &FocusConfig::default());
        focus.tick(0.2);
        assert!(focus.is_active());

        focus.cancel();
        assert!(!focus.is_active());
        assert!((focus.current_yaw() - 120.0).abs() < 1e-4);
    }
}
