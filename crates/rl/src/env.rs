use crate::Result;

/// Auxiliary diagnostics returned alongside observations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Info {
    /// Steps taken since the last reset.
    pub elapsed_steps: usize,
}

/// Everything an environment reports after one action.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub observation: Vec<f32>,
    pub reward: f32,
    /// The task reached a terminal state (success or failure).
    pub terminated: bool,
    /// The episode was cut short from outside the task, e.g. a time limit.
    pub truncated: bool,
    pub info: Info,
}

impl Step {
    #[must_use]
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// Reinforcement learning environment trait.
///
/// Inspired by classic frameworks like OpenAI Gym, this trait defines the core
/// interface an environment must provide: [`reset`] starts an episode and
/// returns the first observation, [`step`] advances it by one discrete
/// action.
///
/// [`reset`]: Env::reset
/// [`step`]: Env::step
pub trait Env {
    /// Reset the environment to its starting state.
    ///
    /// # Errors
    ///
    /// Implementations report simulator failures.
    fn reset(&mut self) -> Result<(Vec<f32>, Info)>;

    /// Advance the environment by one action.
    ///
    /// # Errors
    ///
    /// Implementations reject actions outside `0..action_size()` and steps
    /// taken before the first reset.
    fn step(&mut self, action: usize) -> Result<Step>;

    /// Size of the observation vector.
    fn obs_size(&self) -> usize;

    /// Number of discrete actions.
    fn action_size(&self) -> usize;
}
