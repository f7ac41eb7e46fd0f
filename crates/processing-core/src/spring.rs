//! One-dimensional damped spring stepped with the exact oscillator solution.
//!
//! For displacement `d = position - target` the motion obeys
//! `m·d'' + c·d' + k·d = 0`. Stepping with the closed-form solution keeps
//! the trajectory independent of frame timing: one step of `2·dt` lands
//! where two steps of `dt` do.

use cursorflow_project_model::PhysicsConfig;

/// Displacement below which the spring may come to rest.
pub const REST_DISPLACEMENT: f64 = 1e-4;

/// Speed below which the spring may come to rest.
pub const REST_VELOCITY: f64 = 1e-3;

/// Step used by [`SpringState::settle`].
const SETTLE_STEP: f64 = 1.0 / 60.0;

/// Upper bound on simulated time in [`SpringState::settle`].
const SETTLE_MAX_SECS: f64 = 120.0;

/// Critical-damping detection tolerance on the damping ratio.
const CRITICAL_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringState {
    pub position: f64,
    pub velocity: f64,
    pub target: f64,
}

impl SpringState {
    /// A spring resting at `value`.
    pub fn at_rest(value: f64) -> Self {
        Self {
            position: value,
            velocity: 0.0,
            target: value,
        }
    }

    /// Change the target. Position and velocity carry over.
    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    pub fn is_settled(&self) -> bool {
        (self.position - self.target).abs() < REST_DISPLACEMENT
            && self.velocity.abs() < REST_VELOCITY
    }

    /// Jump straight to the target with zero velocity.
    pub fn snap(&mut self) {
        self.position = self.target;
        self.velocity = 0.0;
    }

    /// Advance by `dt` seconds.
    pub fn step(&mut self, physics: &PhysicsConfig, dt: f64) {
        if !(dt.is_finite() && dt > 0.0) {
            return;
        }

        let (d, v) = evolve(physics, self.position - self.target, self.velocity, dt);
        self.position = self.target + d;
        self.velocity = v;

        if self.is_settled() {
            self.snap();
        }
    }

    /// Step at a fixed rate until at rest.
    pub fn settle(&mut self, physics: &PhysicsConfig) {
        let mut elapsed = 0.0;
        while !self.is_settled() && elapsed < SETTLE_MAX_SECS {
            self.step(physics, SETTLE_STEP);
            elapsed += SETTLE_STEP;
        }
        self.snap();
    }
}

/// Closed-form displacement and velocity after `t` seconds.
fn evolve(physics: &PhysicsConfig, d0: f64, v0: f64, t: f64) -> (f64, f64) {
    let w0 = physics.natural_frequency();
    let zeta = physics.damping_ratio();

    if (zeta - 1.0).abs() < CRITICAL_EPSILON {
        let decay = (-w0 * t).exp();
        let b = v0 + w0 * d0;
        let d = (d0 + b * t) * decay;
        let v = (v0 - w0 * b * t) * decay;
        (d, v)
    } else if zeta < 1.0 {
        let wd = w0 * (1.0 - zeta * zeta).sqrt();
        let decay = (-zeta * w0 * t).exp();
        let (sin, cos) = (wd * t).sin_cos();
        let d = decay * (d0 * cos + (v0 + zeta * w0 * d0) / wd * sin);
        let v = decay * (v0 * cos - (w0 * w0 * d0 + zeta * w0 * v0) / wd * sin);
        (d, v)
    } else {
        let root = (zeta * zeta - 1.0).sqrt();
        let r1 = -w0 * (zeta - root);
        let r2 = -w0 * (zeta + root);
        let c2 = (r1 * d0 - v0) / (r1 - r2);
        let c1 = d0 - c2;
        let (e1, e2) = ((r1 * t).exp(), (r2 * t).exp());
        (c1 * e1 + c2 * e2, c1 * r1 * e1 + c2 * r2 * e2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn presets() -> Vec<PhysicsConfig> {
        vec![
            PhysicsConfig::ZOOM,
            PhysicsConfig::new(300.0, 30.0, 1.0),
            PhysicsConfig::new(200.0, 10.0, 1.0),
            PhysicsConfig::new(100.0, 40.0, 1.0),
        ]
    }

    #[test]
    fn test_every_regime_settles_on_target() {
        for physics in presets() {
            let mut spring = SpringState::at_rest(0.0);
            spring.set_target(100.0);
            spring.settle(&physics);
            assert_eq!(spring.position, 100.0);
            assert_eq!(spring.velocity, 0.0);
        }
    }

    #[test]
    fn test_step_is_frame_rate_independent() {
        for physics in presets() {
            let mut coarse = SpringState::at_rest(0.0);
            let mut fine = SpringState::at_rest(0.0);
            coarse.set_target(1.0);
            fine.set_target(1.0);

            coarse.step(&physics, 0.1);
            for _ in 0..10 {
                fine.step(&physics, 0.01);
            }
            assert!((coarse.position - fine.position).abs() < 1e-9);
            assert!((coarse.velocity - fine.velocity).abs() < 1e-9);
        }
    }

    #[test]
    fn test_critically_damped_does_not_overshoot() {
        let physics = PhysicsConfig::ZOOM;
        assert!((physics.damping_ratio() - 1.0).abs() < CRITICAL_EPSILON);

        let mut spring = SpringState::at_rest(0.0);
        spring.set_target(10.0);
        for _ in 0..600 {
            spring.step(&physics, 1.0 / 60.0);
            assert!(spring.position <= 10.0 + 1e-9);
        }
    }

    #[test]
    fn test_underdamped_overshoots() {
        let physics = PhysicsConfig::new(200.0, 10.0, 1.0);
        let mut spring = SpringState::at_rest(0.0);
        spring.set_target(1.0);
        let mut peak: f64 = 0.0;
        for _ in 0..120 {
            spring.step(&physics, 1.0 / 60.0);
            peak = peak.max(spring.position);
        }
        assert!(peak > 1.0);
    }

    #[test]
    fn test_non_positive_dt_is_ignored() {
        let mut spring = SpringState::at_rest(0.0);
        spring.set_target(5.0);
        spring.step(&PhysicsConfig::ZOOM, 0.0);
        spring.step(&PhysicsConfig::ZOOM, -1.0);
        spring.step(&PhysicsConfig::ZOOM, f64::NAN);
        assert_eq!(spring.position, 0.0);
    }
}
