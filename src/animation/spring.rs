use crate::error::{AnimationError, Result};

/// Fixed simulation timestep, assuming a 60Hz display.
pub const FRAME_RATE: f64 = 1.0 / 60.0;

/// Configuration for spring physics animation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    /// Restoring force strength (default: 90.0)
    pub stiffness: f64,
    /// Friction opposing velocity (default: 6.0)
    pub damping: f64,
}

impl SpringConfig {
    /// Default spring with a visible bounce
    pub const DEFAULT: Self = Self {
        stiffness: 90.0,
        damping: 6.0,
    };

    /// Bouncy spring with more overshoot
    pub const BOUNCY: Self = Self {
        stiffness: 200.0,
        damping: 8.0,
    };

    /// Snappy spring that settles without overshoot
    pub const SNAPPY: Self = Self {
        stiffness: 200.0,
        damping: 30.0,
    };

    pub fn new(stiffness: f64, damping: f64) -> Self {
        Self { stiffness, damping }
    }

    /// Reject parameters the integrator cannot give a meaningful answer for.
    /// Damping may be zero (undamped) but never negative.
    pub fn validate(&self) -> Result<()> {
        let stiffness_ok = self.stiffness.is_finite() && self.stiffness > 0.0;
        let damping_ok = self.damping.is_finite() && self.damping >= 0.0;
        if stiffness_ok && damping_ok {
            Ok(())
        } else {
            Err(AnimationError::InvalidSpringParameters {
                stiffness: self.stiffness,
                damping: self.damping,
            })
        }
    }

    /// True when the continuous system would not oscillate (`damping² >= 4·stiffness`)
    pub fn is_overdamped(&self) -> bool {
        self.damping * self.damping >= 4.0 * self.stiffness
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// State for spring physics simulation
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpringState {
    /// Current displacement (0.0 = start, 1.0 = target)
    pub length: f64,
    /// Current velocity
    pub velocity: f64,
    /// Number of steps taken since frame 0
    pub frame: u32,
}

impl SpringState {
    /// Create a new spring state at rest at frame 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Displacement of the spring after `frame` fixed steps, always simulated
    /// from rest. Pure in `(frame, config)`; costs O(frame).
    pub fn simulate(frame: u32, config: &SpringConfig) -> f64 {
        let mut state = Self::new();
        state.advance_to(frame, config)
    }

    /// Take one semi-implicit Euler step toward the target displacement of 1.0.
    /// Returns the new displacement, which can overshoot 1.0.
    pub fn step(&mut self, config: &SpringConfig) -> f64 {
        let spring_force = -config.stiffness * (self.length - 1.0);
        let damping_force = -config.damping * self.velocity;
        let acceleration = spring_force + damping_force;

        self.velocity += acceleration * FRAME_RATE;
        self.length += self.velocity * FRAME_RATE;
        self.frame += 1;

        self.length
    }

    /// Step forward until `frame` steps have been taken. Targets behind the
    /// current frame leave the state unchanged.
    pub fn advance_to(&mut self, frame: u32, config: &SpringConfig) -> f64 {
        while self.frame < frame {
            self.step(config);
        }
        self.length
    }

    /// Check if the spring has settled (displacement near target, velocity near zero)
    pub fn is_settled(&self, threshold: f64) -> bool {
        (self.length - 1.0).abs() < threshold && self.velocity.abs() < threshold
    }
}
