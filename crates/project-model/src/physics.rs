//! Spring parameters for camera motion.

use serde::{Deserialize, Serialize};

/// Parameters of a damped second-order (spring-mass) system.
///
/// All three values are strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
}

/// Smallest value accepted for any physics parameter.
const MIN_PARAMETER: f64 = 1e-4;

impl PhysicsConfig {
    /// Fixed profile used whenever a zoom event is active.
    ///
    /// Heavier and softer than every preset so zoom transitions read as a
    /// slow dolly move. Critically damped: `damping == 2 * sqrt(stiffness * mass)`.
    pub const ZOOM: PhysicsConfig = PhysicsConfig {
        stiffness: 50.0,
        damping: 20.0,
        mass: 2.0,
    };

    /// Create a config, forcing every parameter to be strictly positive.
    pub fn new(stiffness: f64, damping: f64, mass: f64) -> Self {
        Self {
            stiffness: positive(stiffness),
            damping: positive(damping),
            mass: positive(mass),
        }
    }

    /// Damping that makes the system critically damped.
    pub fn critical_damping(stiffness: f64, mass: f64) -> f64 {
        2.0 * (positive(stiffness) * positive(mass)).sqrt()
    }

    /// Damping ratio ζ (`< 1` underdamped, `1` critical, `> 1` overdamped).
    pub fn damping_ratio(&self) -> f64 {
        self.damping / Self::critical_damping(self.stiffness, self.mass)
    }

    /// Undamped angular frequency ω₀.
    pub fn natural_frequency(&self) -> f64 {
        (self.stiffness / self.mass).sqrt()
    }

    /// Whether all parameters are finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        [self.stiffness, self.damping, self.mass]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsPreset::Smooth.config()
    }
}

fn positive(value: f64) -> f64 {
    if value.is_finite() {
        value.max(MIN_PARAMETER)
    } else {
        MIN_PARAMETER
    }
}

/// Named physics presets offered by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhysicsPreset {
    Smooth,
    Snappy,
    Bouncy,
    Gentle,
    /// User-supplied parameters.
    Custom,
}

impl PhysicsPreset {
    /// Every preset with a fixed parameter set.
    pub const TABLE: [PhysicsPreset; 4] = [
        PhysicsPreset::Smooth,
        PhysicsPreset::Snappy,
        PhysicsPreset::Bouncy,
        PhysicsPreset::Gentle,
    ];

    /// Parameters for this preset. `Custom` falls back to `Smooth`.
    pub fn config(self) -> PhysicsConfig {
        match self {
            PhysicsPreset::Smooth | PhysicsPreset::Custom => PhysicsConfig {
                stiffness: 100.0,
                damping: 20.0,
                mass: 1.0,
            },
            PhysicsPreset::Snappy => PhysicsConfig {
                stiffness: 300.0,
                damping: 30.0,
                mass: 1.0,
            },
            PhysicsPreset::Bouncy => PhysicsConfig {
                stiffness: 200.0,
                damping: 10.0,
                mass: 1.0,
            },
            PhysicsPreset::Gentle => PhysicsConfig {
                stiffness: 60.0,
                damping: 15.0,
                mass: 1.0,
            },
        }
    }

    /// Preset name as persisted in project files.
    pub fn name(self) -> &'static str {
        match self {
            PhysicsPreset::Smooth => "smooth",
            PhysicsPreset::Snappy => "snappy",
            PhysicsPreset::Bouncy => "bouncy",
            PhysicsPreset::Gentle => "gentle",
            PhysicsPreset::Custom => "custom",
        }
    }

    /// Look up a preset by name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::TABLE
            .into_iter()
            .chain(std::iter::once(PhysicsPreset::Custom))
            .find(|preset| preset.name() == name)
    }
}
