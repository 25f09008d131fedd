//! Stepped scoring scales
//!
//! A scale maps a measured value to a fraction of a subcomponent's ceiling.
//! Values between breakpoints score at the nearest breakpoint below them
//! (for `AtLeast`) or above them (for `AtMost`), so scores move in visible
//! steps rather than continuously.

use serde::{Deserialize, Serialize};

use crate::error::{HealthError, Result};

/// Which side of a threshold is the good side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Higher values are better; a breakpoint applies when `value >= threshold`
    AtLeast,
    /// Lower values are better; a breakpoint applies when `value <= threshold`
    AtMost,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub threshold: f64,
    /// Fraction of the ceiling awarded, 0.0-1.0
    pub fraction: f64,
}

/// Ordered breakpoints plus the fraction awarded when none match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringScale {
    pub direction: Direction,
    pub steps: Vec<Breakpoint>,
    #[serde(default)]
    pub floor: f64,
}

impl ScoringScale {
    pub fn at_least(steps: &[(f64, f64)], floor: f64) -> Self {
        Self::new(Direction::AtLeast, steps, floor)
    }

    pub fn at_most(steps: &[(f64, f64)], floor: f64) -> Self {
        Self::new(Direction::AtMost, steps, floor)
    }

    fn new(direction: Direction, steps: &[(f64, f64)], floor: f64) -> Self {
        let mut scale = Self {
            direction,
            steps: steps
                .iter()
                .map(|&(threshold, fraction)| Breakpoint {
                    threshold,
                    fraction,
                })
                .collect(),
            floor,
        };
        scale.normalize();
        scale
    }

    /// Attainment scale shared by most target-based subcomponents:
    /// 100% -> full, 95% -> 0.95, 90% -> 0.9, 80% -> 0.8, 50% -> 0.5, else 0.
    pub fn attainment() -> Self {
        Self::at_least(
            &[(1.0, 1.0), (0.95, 0.95), (0.9, 0.9), (0.8, 0.8), (0.5, 0.5)],
            0.0,
        )
    }

    /// Sort breakpoints so the best threshold is checked first
    pub fn normalize(&mut self) {
        match self.direction {
            Direction::AtLeast => self
                .steps
                .sort_by(|a, b| b.threshold.total_cmp(&a.threshold)),
            Direction::AtMost => self
                .steps
                .sort_by(|a, b| a.threshold.total_cmp(&b.threshold)),
        }
    }

    pub fn validate(&self, component: &str) -> Result<()> {
        if self.steps.is_empty() {
            return Err(HealthError::invalid_scale(component, "no breakpoints"));
        }
        let fractions = self
            .steps
            .iter()
            .map(|s| s.fraction)
            .chain(std::iter::once(self.floor));
        for fraction in fractions {
            if !(0.0..=1.0).contains(&fraction) {
                return Err(HealthError::invalid_scale(
                    component,
                    format!("fraction {} outside 0.0-1.0", fraction),
                ));
            }
        }
        if self.steps.iter().any(|s| !s.threshold.is_finite()) {
            return Err(HealthError::invalid_scale(
                component,
                "thresholds must be finite",
            ));
        }
        Ok(())
    }

    /// Fraction of the ceiling awarded for `value`
    pub fn fraction_for(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.floor;
        }
        self.steps
            .iter()
            .find(|step| match self.direction {
                Direction::AtLeast => value >= step.threshold,
                Direction::AtMost => value <= step.threshold,
            })
            .map(|step| step.fraction)
            .unwrap_or(self.floor)
    }

    /// Points for `value`, rounded to one decimal and clamped to `[0, ceiling]`
    pub fn points(&self, value: f64, ceiling: f64) -> f64 {
        round1(self.fraction_for(value) * ceiling).clamp(0.0, ceiling.max(0.0))
    }

    /// One-line benchmark text, e.g. "≤0 → 15, ≤7 → 12, ≤15 → 8, else 0"
    pub fn describe(&self, ceiling: f64, unit: &str) -> String {
        let op = match self.direction {
            Direction::AtLeast => "≥",
            Direction::AtMost => "≤",
        };
        let mut parts: Vec<String> = self
            .steps
            .iter()
            .map(|s| {
                format!(
                    "{}{}{} → {}",
                    op,
                    format_threshold(s.threshold),
                    unit,
                    format_points(s.fraction * ceiling)
                )
            })
            .collect();
        parts.push(format!("else {}", format_points(self.floor * ceiling)));
        parts.join(", ")
    }
}

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn format_threshold(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e12 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

fn format_points(value: f64) -> String {
    let rounded = round1(value);
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{:.1}", rounded)
    }
}
