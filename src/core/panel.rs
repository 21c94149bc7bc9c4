/// Argument-panel emphasis — bounded-duration scale interpolation.

/// Scale animation settings for the argument panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelConfig {
    /// Target scale of the emphasis zoom.
    pub expand_scale: f32,
    /// Seconds the zoom takes.
    pub scale_duration: f32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            expand_scale: 2.0,
            scale_duration: 1.0,
        }
    }
}

/// Scales a UI panel from its resting size toward an emphasis size.
/// Same contract as the focus transition: normalized progress,
/// zero-distance guard, `cancel` snaps to the target.
#[derive(Debug, Clone)]
pub struct PanelMotionController {
    from_scale: f32,
    target_scale: f32,
    current_scale: f32,
    elapsed: f32,
    duration: f32,
    active: bool,
}

impl Default for PanelMotionController {
    fn default() -> Self {
        Self {
            from_scale: 1.0,
            target_scale: 1.0,
            current_scale: 1.0,
            elapsed: 0.0,
            duration: 0.0,
            active: false,
        }
    }
}

impl PanelMotionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin scaling from the current scale toward `target_scale`.
    /// Completes immediately when there is nothing to animate.
    pub fn start(&mut self, target_scale: f32, duration: f32) {
        self.from_scale = self.current_scale;
        self.target_scale = target_scale;
        self.elapsed = 0.0;
        if duration <= 0.0 || (target_scale - self.from_scale).abs() <= f32::EPSILON {
            self.current_scale = target_scale;
            self.duration = 0.0;
            self.active = false;
            return;
        }
        self.duration = duration;
        self.active = true;
    }

    /// Begin the configured emphasis zoom.
    pub fn emphasize(&mut self, config: &PanelConfig) {
        self.start(config.expand_scale, config.scale_duration);
    }

    pub fn tick(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.elapsed += dt;
        let t = (self.elapsed / self.duration).min(1.0);
        self.current_scale = self.from_scale + (self.target_scale - self.from_scale) * t;
        if t >= 1.0 {
            self.current_scale = self.target_scale;
            self.active = false;
        }
    }

    /// Snap to the target scale and deactivate.
    pub fn cancel(&mut self) {
        if !self.active {
            return;
        }
        self.current_scale = self.target_scale;
        self.active = false;
    }

    /// Snap back to the resting scale without animating.
    pub fn reset(&mut self) {
        self.from_scale = 1.0;
        self.target_scale = 1.0;
        self.current_scale = 1.0;
        self.elapsed = 0.0;
        self.duration = 0.0;
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn current_scale(&self) -> f32 {
        self.current_scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emphasis_reaches_target_scale() {
        let mut panel = PanelMotionController::new();
        panel.emphasize(&PanelConfig::default());
        assert!(panel.is_active());

        panel.tick(0.5);
        assert!(panel.is_active());
        assert!((panel.current_scale() - 1.5).abs() < 1e-4);

        panel.tick(0.5);
        assert!(!panel.is_active());
        assert!((panel.current_scale() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn zero_duration_snaps() {
        let mut panel = PanelMotionController::new();
        panel.start(2.0, 0.0);
        assert!(!panel.is_active());
        assert!((panel.current_scale() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn same_scale_completes_immediately() {
        let mut panel = PanelMotionController::new();
        panel.start(1.0, 1.0);
        assert!(!panel.is_active());
    }

    #[test]
    fn cancel_snaps_to_target() {
        let mut panel = PanelMotionController::new();
        panel.emphasize(&PanelConfig::default());
        panel.tick(0.25);
        panel.cancel();
        assert!(!panel.is_active());
        assert!((panel.current_scale() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn reset_returns_to_resting_scale() {
        let mut panel = PanelMotionController::new();
        panel.emphasize(&PanelConfig::default());
        panel.tick(10.0);
        panel.reset();
        assert!(!panel.is_active());
        assert!((panel.current_scale() - 1.0).abs() < 1e-4);
    }
}
