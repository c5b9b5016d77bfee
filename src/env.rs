/// Represents a Markov decision process, defining the dynamics of an environment
/// in which an agent can operate.
///
/// This base trait represents the common case of a discrete-time MDP with one agent
/// and a finite state space and action space. Episodes end when a step reports
/// the episode as terminated or truncated, after which the caller is expected to
/// [`reset`](Environment::reset) before stepping again.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State;

    /// A representation of an action that an agent can take to affect the environment
    type Action;

    /// Update the environment in response to an action taken by an agent
    fn step(&mut self, action: Self::Action) -> Step<Self::State>;

    /// Reset the environment to an initial state, reseeding its random source if a seed is given
    ///
    /// **Returns** the initial state
    fn reset(&mut self, seed: Option<u64>) -> Self::State;
}

/// An environment whose states and actions are the integers `0..num_states()`
/// and `0..num_actions()`
pub trait DiscreteSpace: Environment<State = usize, Action = usize> {
    fn num_states(&self) -> usize;

    fn num_actions(&self) -> usize;
}

/// The outcome of a single [`Environment::step`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step<S> {
    /// The state of the environment after the action is taken
    pub next_state: S,
    /// The reward received for the transition
    pub reward: f64,
    /// The episode reached a terminal state of the MDP
    pub terminated: bool,
    /// The episode was cut short by a condition outside the MDP, such as a time limit
    pub truncated: bool,
}

impl<S> Step<S> {
    /// Whether the step ended the episode, either by termination or truncation
    pub fn is_done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// Represents a single experience or transition in the environment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exp {
    /// The state of the environment before taking the action
    pub state: usize,
    /// The action taken in the given state
    pub action: usize,
    /// The reward received after taking the action
    pub reward: f64,
    /// The state the update bootstraps from
    pub next_state: usize,
}
