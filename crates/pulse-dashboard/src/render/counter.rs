//! Headline counter animation

use std::time::Duration;

/// Timing shared by every counter animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterSettings {
    pub duration: Duration,
    pub steps: u32,
}

impl Default for CounterSettings {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(1000),
            steps: 60,
        }
    }
}

/// Linear interpolation from the displayed value to a target
///
/// Intermediate frames are rounded to the nearest integer; the last frame is
/// exactly the target so rounding never drifts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterAnimation {
    pub from: i64,
    pub to: i64,
    pub steps: u32,
    pub duration: Duration,
}

impl CounterAnimation {
    pub fn new(from: i64, to: i64, settings: CounterSettings) -> Self {
        Self {
            from,
            to,
            steps: settings.steps.max(1),
            duration: settings.duration,
        }
    }

    /// Delay between two frames
    pub fn interval(&self) -> Duration {
        self.duration / self.steps
    }

    /// Value shown at `step` (1-based)
    pub fn frame(&self, step: u32) -> i64 {
        if step >= self.steps {
            return self.to;
        }
        let per_step = (self.to - self.from) as f64 / self.steps as f64;
        (self.from as f64 + per_step * step as f64).round() as i64
    }

    /// Every frame in order, ending with the target
    pub fn frames(&self) -> Vec<i64> {
        (1..=self.steps).map(|step| self.frame(step)).collect()
    }
}

/// Integer shown in a counter element
///
/// Reads a leading, optionally signed, run of digits; anything else counts
/// as 0.
pub fn parse_displayed(text: &str) -> i64 {
    let trimmed = text.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().map(|n| sign * n).unwrap_or(0)
}
