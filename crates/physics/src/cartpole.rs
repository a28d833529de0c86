//! CartPole entity for reinforcement learning environments
//!
//! This module integrates the cart-pole equations of motion with a fixed
//! time step and reports failure when the pole tips too far or the cart
//! leaves the track.

use std::f32::consts::PI;

/// Numerical scheme used to advance the state by one time step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Integrator {
    /// Positions advance with the old velocities.
    #[default]
    Euler,
    /// Velocities are updated first and positions use the new velocities.
    SemiImplicitEuler,
}

/// Configuration for a CartPole entity
#[derive(Clone, Debug)]
pub struct CartPoleConfig {
    /// Gravitational acceleration (m/s^2)
    pub gravity: f32,
    /// Cart mass in kg
    pub cart_mass: f32,
    /// Pole mass in kg
    pub pole_mass: f32,
    /// Half of the pole length in meters
    pub half_pole_length: f32,
    /// Force magnitude applied to the cart on every push
    pub force_magnitude: f32,
    /// Seconds between state updates
    pub tau: f32,
    /// Angle threshold for failure detection (radians)
    pub failure_angle: f32,
    /// Position threshold for failure detection (meters)
    pub position_limit: f32,
    pub integrator: Integrator,
}

impl Default for CartPoleConfig {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            cart_mass: 1.0,
            pole_mass: 0.1,
            half_pole_length: 0.5,
            force_magnitude: 10.0,
            tau: 0.02,
            failure_angle: 12.0 * 2.0 * PI / 360.0,
            position_limit: 2.4,
            integrator: Integrator::Euler,
        }
    }
}

impl CartPoleConfig {
    fn total_mass(&self) -> f32 {
        self.cart_mass + self.pole_mass
    }

    fn pole_mass_length(&self) -> f32 {
        self.pole_mass * self.half_pole_length
    }
}

/// Cart position and velocity, pole angle from vertical and angular velocity.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CartPoleState {
    pub x: f32,
    pub x_dot: f32,
    pub theta: f32,
    pub theta_dot: f32,
}

impl CartPoleState {
    /// The observation vector `[x, x_dot, theta, theta_dot]`.
    #[must_use]
    pub fn to_array(self) -> [f32; 4] {
        [self.x, self.x_dot, self.theta, self.theta_dot]
    }
}

impl From<[f32; 4]> for CartPoleState {
    fn from([x, x_dot, theta, theta_dot]: [f32; 4]) -> Self {
        Self { x, x_dot, theta, theta_dot }
    }
}

/// Direction of the fixed-magnitude force applied to the cart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Push {
    Left,
    Right,
}

impl Push {
    /// Maps the discrete action index used by agents: `0` is left, `1` right.
    #[must_use]
    pub fn from_index(action: usize) -> Option<Self> {
        match action {
            0 => Some(Self::Left),
            1 => Some(Self::Right),
            _ => None,
        }
    }
}

/// Outcome of a single step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    pub state: CartPoleState,
    pub reward: f32,
    pub terminated: bool,
}

/// A single cart-pole system.
pub struct CartPole {
    pub config: CartPoleConfig,
    state: CartPoleState,
    /// `None` while the pole is up. Counts the steps taken after failure so
    /// a caller that keeps stepping is warned once and receives no reward.
    steps_beyond_terminated: Option<usize>,
}

impl CartPole {
    #[must_use]
    pub fn new(config: CartPoleConfig) -> Self {
        Self { config, state: CartPoleState::default(), steps_beyond_terminated: None }
    }

    /// Resets every state variable to a uniform sample in `[-0.05, 0.05)`.
    pub fn reset(&mut self, rng: &mut fastrand::Rng) -> CartPoleState {
        let sample = || rng.f32() * 0.1 - 0.05;
        let state = CartPoleState {
            x: sample(),
            x_dot: sample(),
            theta: sample(),
            theta_dot: sample(),
        };
        self.reset_to(state)
    }

    /// Resets to an exact state.
    pub fn reset_to(&mut self, state: CartPoleState) -> CartPoleState {
        self.state = state;
        self.steps_beyond_terminated = None;
        self.state
    }

    #[must_use]
    pub fn state(&self) -> CartPoleState {
        self.state
    }

    /// Check if a state has failed (fallen over or out of bounds)
    #[must_use]
    pub fn is_failed(&self, state: &CartPoleState) -> bool {
        state.x.abs() > self.config.position_limit || state.theta.abs() > self.config.failure_angle
    }

    /// Applies `push` for one time step.
    ///
    /// The reward is `1.0` for every step up to and including the one that
    /// fails, and `0.0` for any step taken after that.
    pub fn step(&mut self, push: Push) -> Transition {
        let c = &self.config;
        let CartPoleState { mut x, mut x_dot, mut theta, mut theta_dot } = self.state;

        let force = match push {
            Push::Left => -c.force_magnitude,
            Push::Right => c.force_magnitude,
        };
        let (sin_theta, cos_theta) = theta.sin_cos();

        let temp = (force + c.pole_mass_length() * theta_dot * theta_dot * sin_theta)
            / c.total_mass();
        let theta_acc = (c.gravity * sin_theta - cos_theta * temp)
            / (c.half_pole_length
                * (4.0 / 3.0 - c.pole_mass * cos_theta * cos_theta / c.total_mass()));
        let x_acc = temp - c.pole_mass_length() * theta_acc * cos_theta / c.total_mass();

        match c.integrator {
            Integrator::Euler => {
                x += c.tau * x_dot;
                x_dot += c.tau * x_acc;
                theta += c.tau * theta_dot;
                theta_dot += c.tau * theta_acc;
            }
            Integrator::SemiImplicitEuler => {
                x_dot += c.tau * x_acc;
                x += c.tau * x_dot;
                theta_dot += c.tau * theta_acc;
                theta += c.tau * theta_dot;
            }
        }

        self.state = CartPoleState { x, x_dot, theta, theta_dot };
        let terminated = self.is_failed(&self.state);

        let reward = match (terminated, self.steps_beyond_terminated) {
            (false, _) => 1.0,
            (true, None) => {
                self.steps_beyond_terminated = Some(0);
                1.0
            }
            (true, Some(n)) => {
                if n == 0 {
                    tracing::warn!(
                        "stepping a cart-pole that has already terminated; reset it first"
                    );
                }
                self.steps_beyond_terminated = Some(n + 1);
                0.0
            }
        };

        Transition { state: self.state, reward, terminated }
    }
}
