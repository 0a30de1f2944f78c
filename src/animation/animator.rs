use std::f64::consts::TAU;

use crate::animation::ease::Ease;
use crate::foundation::core::{Lerp, Point, Rgba8};
use crate::shape::model::Shape;
use crate::shape::props::PropValue;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LoopMode {
    #[default]
    None,
    Loop,
    PingPong,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum AnimatorState {
    Idle,
    Active,
    Complete,
}

/// What an animator writes into its target each update.
#[derive(Clone, Debug, PartialEq)]
pub enum Motion {
    Property(PropertyMotion),
    Orbit(OrbitMotion),
    Path(PathMotion),
}

impl Motion {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Property(_) => "property",
            Self::Orbit(_) => "orbit",
            Self::Path(_) => "path",
        }
    }

    fn apply(&self, target: &mut Shape, eased: f64) {
        match self {
            Self::Property(m) => target.set_animated_property(m.property.clone(), m.value_at(eased)),
            Self::Orbit(m) => write_position(target, m.point_at(eased)),
            Self::Path(m) => write_position(target, m.point_at(eased)),
        }
    }
}

fn write_position(target: &mut Shape, p: Point) {
    target.set_animated_property("x", PropValue::Number(p.x));
    target.set_animated_property("y", PropValue::Number(p.y));
}

/// Interpolates one named property from `from` to `to`.
///
/// Numbers and colors interpolate; any other value type switches to `to` at completion.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyMotion {
    pub property: String,
    pub from: PropValue,
    pub to: PropValue,
}

impl PropertyMotion {
    pub fn value_at(&self, eased: f64) -> PropValue {
        match (&self.from, &self.to) {
            (PropValue::Number(a), PropValue::Number(b)) => PropValue::Number(Lerp::lerp(a, b, eased)),
            (PropValue::Color(a), PropValue::Color(b)) => PropValue::Color(Rgba8::lerp(a, b, eased)),
            _ if eased >= 1.0 => self.to.clone(),
            _ => self.from.clone(),
        }
    }
}

/// Circular motion around a fixed center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitMotion {
    pub center: Point,
    pub radius: f64,
    /// Radians.
    pub start_angle: f64,
    pub clockwise: bool,
}

impl OrbitMotion {
    pub fn point_at(&self, eased: f64) -> Point {
        let sign = if self.clockwise { 1.0 } else { -1.0 };
        let angle = self.start_angle + sign * eased * TAU;
        Point::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }
}

/// Constant-speed travel along a polyline.
#[derive(Clone, Debug, PartialEq)]
pub struct PathMotion {
    points: Vec<Point>,
    // cumulative[i] is the arc length from points[0] to points[i].
    cumulative: Vec<f64>,
}

impl PathMotion {
    /// `None` for an empty point list.
    pub fn new(points: Vec<Point>) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut cumulative = Vec::with_capacity(points.len());
        let mut total = 0.0;
        cumulative.push(0.0);
        for pair in points.windows(2) {
            total += pair[0].distance(pair[1]);
            cumulative.push(total);
        }
        Some(Self { points, cumulative })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn total_length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    pub fn point_at(&self, eased: f64) -> Point {
        let first = self.points[0];
        let total = self.total_length();
        if total <= 0.0 {
            return first;
        }
        let d = eased.clamp(0.0, 1.0) * total;
        let idx = self.cumulative.partition_point(|&c| c < d);
        if idx == 0 {
            return first;
        }
        if idx >= self.points.len() {
            return self.points[self.points.len() - 1];
        }
        let seg_start = self.cumulative[idx - 1];
        let seg_len = self.cumulative[idx] - seg_start;
        let t = (d - seg_start) / seg_len;
        <Point as Lerp>::lerp(&self.points[idx - 1], &self.points[idx], t)
    }
}

/// Time-driven writer of one shape's animated properties.
#[derive(Clone, Debug, PartialEq)]
pub struct Animator {
    target: String,
    pub duration_ms: f64,
    pub delay_ms: f64,
    pub ease: Ease,
    pub loop_mode: LoopMode,
    direction: f64,
    start_time: f64,
    state: AnimatorState,
    progress: f64,
    eased_progress: f64,
    motion: Motion,
}

impl Animator {
    pub fn new(target: impl Into<String>, motion: Motion) -> Self {
        Self {
            target: target.into(),
            duration_ms: 1000.0,
            delay_ms: 0.0,
            ease: Ease::default(),
            loop_mode: LoopMode::None,
            direction: 1.0,
            start_time: 0.0,
            state: AnimatorState::Idle,
            progress: 0.0,
            eased_progress: 0.0,
            motion,
        }
    }

    pub fn with_timing(mut self, duration_ms: f64, delay_ms: f64) -> Self {
        self.duration_ms = duration_ms;
        self.delay_ms = delay_ms;
        self
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn with_loop_mode(mut self, mode: LoopMode) -> Self {
        self.loop_mode = mode;
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    pub fn state(&self) -> AnimatorState {
        self.state
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn eased_progress(&self) -> f64 {
        self.eased_progress
    }

    pub fn direction(&self) -> f64 {
        self.direction
    }

    pub fn is_complete(&self) -> bool {
        self.state == AnimatorState::Complete
    }

    pub fn start(&mut self, current_time: f64) {
        self.start_time = current_time + self.delay_ms;
        self.direction = 1.0;
        self.progress = 0.0;
        self.eased_progress = 0.0;
        self.state = AnimatorState::Active;
    }

    /// Advance to `current_time` and write into `target`. Returns whether the animator is
    /// still active.
    pub fn update(&mut self, current_time: f64, target: &mut Shape) -> bool {
        match self.state {
            AnimatorState::Idle => return true,
            AnimatorState::Complete => return false,
            AnimatorState::Active => {}
        }
        if current_time < self.start_time {
            return true;
        }

        let mut raw = if self.duration_ms > 0.0 {
            ((current_time - self.start_time) / self.duration_ms).min(1.0)
        } else {
            1.0
        };

        if raw >= 1.0 {
            match self.loop_mode {
                LoopMode::Loop if self.duration_ms > 0.0 => {
                    self.start_time = current_time;
                    raw = 0.0;
                }
                LoopMode::PingPong if self.duration_ms > 0.0 => {
                    self.direction = -self.direction;
                    self.start_time = current_time;
                    raw = 0.0;
                }
                _ => {
                    self.set_progress(1.0);
                    self.motion.apply(target, self.eased_progress);
                    self.state = AnimatorState::Complete;
                    return false;
                }
            }
        }

        self.set_progress(raw);
        self.motion.apply(target, self.eased_progress);
        true
    }

    /// Restart at time zero and evaluate at `time` as if playback had run continuously.
    ///
    /// Repeating animators land on the phase they would have reached, not on a fresh cycle.
    pub fn seek(&mut self, time: f64, target: &mut Shape) -> bool {
        self.start(0.0);
        if self.loop_mode != LoopMode::None && self.duration_ms > 0.0 {
            let elapsed = time - self.start_time;
            if elapsed >= self.duration_ms {
                let cycles = (elapsed / self.duration_ms).floor();
                self.start_time += cycles * self.duration_ms;
                if self.loop_mode == LoopMode::PingPong && cycles % 2.0 == 1.0 {
                    self.direction = -1.0;
                }
            }
        }
        self.update(time, target)
    }

    fn set_progress(&mut self, raw: f64) {
        self.progress = raw;
        let effective = if self.direction > 0.0 { raw } else { 1.0 - raw };
        self.eased_progress = self.ease.apply(effective);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/animator.rs"]
mod tests;
