/// Progressive text reveal — character-count animation stepped on
/// accumulated elapsed time.

/// Pacing settings for text reveal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealConfig {
    /// Seconds per character at 1x speed.
    pub base_interval: f32,
    /// User-facing speed setting; 2.0 reveals twice as fast.
    pub speed_multiplier: f32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            base_interval: 1.0 / 60.0,
            speed_multiplier: 1.0,
        }
    }
}

impl RevealConfig {
    /// Seconds between consecutive characters.
    pub fn seconds_per_char(&self) -> f32 {
        self.base_interval / self.speed_multiplier
    }
}

/// Reveals a string character by character.
///
/// The visible count is monotonically non-decreasing, never exceeds the
/// string's character length, and steps on accumulated elapsed time
/// rather than a fixed per-tick increment, so pacing is independent of
/// tick rate. `cancel` snaps to the full string. A zero-length string
/// is complete from the start.
#[derive(Debug, Clone, Default)]
pub struct TextRevealController {
    total_chars: usize,
    visible_chars: usize,
    elapsed: f32,
    seconds_per_char: f32,
    active: bool,
}

impl TextRevealController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin revealing `text` from zero visible characters.
    pub fn start(&mut self, text: &str, config: &RevealConfig) {
        self.total_chars = text.chars().count();
        self.visible_chars = 0;
        self.elapsed = 0.0;
        self.seconds_per_char = config.seconds_per_char();
        self.active = self.total_chars > 0;
        // A non-positive interval cannot pace anything; show everything.
        if self.active && self.seconds_per_char <= 0.0 {
            self.cancel();
        }
    }

    pub fn tick(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.elapsed += dt;
        while self.elapsed >= self.seconds_per_char && self.visible_chars < self.total_chars {
            self.elapsed -= self.seconds_per_char;
            self.visible_chars += 1;
        }
        if self.visible_chars == self.total_chars {
            self.active = false;
        }
    }

    /// Snap to the full string and deactivate.
    pub fn cancel(&mut self) {
        self.visible_chars = self.total_chars;
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn visible_chars(&self) -> usize {
        self.visible_chars
    }

    pub fn total_chars(&self) -> usize {
        self.total_chars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(seconds_per_char: f32) -> RevealConfig {
        RevealConfig {
            base_interval: seconds_per_char,
            speed_multiplier: 1.0,
        }
    }

    #[test]
    fn reveal_is_monotonic_and_bounded() {
        let mut reveal = TextRevealController::new();
        reveal.start("The butler did it.", &config(0.1));
        let total = "The butler did it.".chars().count();

        let mut last = 0;
        for _ in 0..300 {
            reveal.tick(0.07);
            let visible = reveal.visible_chars();
            assert!(visible >= last);
            assert!(visible <= total);
            last = visible;
        }
        assert_eq!(last, total);
        assert!(!reveal.is_active());
    }

    #[test]
    fn pacing_is_tick_rate_independent() {
        let text = "Twelve chars";
        let mut coarse = TextRevealController::new();
        let mut fine = TextRevealController::new();
        coarse.start(text, &config(0.05));
        fine.start(text, &config(0.05));

        // Same total elapsed time, different tick granularity
        coarse.tick(0.3);
        for _ in 0..30 {
            fine.tick(0.01);
        }
        assert_eq!(coarse.visible_chars(), fine.visible_chars());
    }

    #[test]
    fn zero_length_completes_immediately() {
        let mut reveal = TextRevealController::new();
        reveal.start("", &config(0.1));
        assert!(!reveal.is_active());
        assert_eq!(reveal.visible_chars(), 0);
        assert_eq!(reveal.total_chars(), 0);
    }

    #[test]
    fn cancel_snaps_to_end() {
        let mut reveal = TextRevealController::new();
        reveal.start("A confession, written in haste.", &config(0.5));
        reveal.tick(1.0);
        assert!(reveal.is_active());

        reveal.cancel();
        assert!(!reveal.is_active());
        assert_eq!(reveal.visible_chars(), reveal.total_chars());
    }

    #[test]
    fn speed_multiplier_scales_interval() {
        let fast = RevealConfig {
            base_interval: 0.1,
            speed_multiplier: 2.0,
        };
        assert!((fast.seconds_per_char() - 0.05).abs() < f32::EPSILON);
    }

    #[test]
    fn counts_chars_not_bytes() {
        let mut reveal = TextRevealController::new();
        reveal.start("célèbre", &config(0.1));
        assert_eq!(reveal.total_chars(), 7);
    }
}
