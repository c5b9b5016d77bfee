use std::fmt;

use log::trace;
use strum::{Display, EnumIter, VariantArray};

use crate::{
    assert_index,
    env::Exp,
    error::Result,
    util::{check_positive, check_unit_interval},
};

/// Configuration for the [`ValueTable`]
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTableConfig {
    /// Number of states `S`, must be positive
    ///
    /// **Default**: `48`
    pub num_states: usize,
    /// Number of actions `A`, must be positive
    ///
    /// **Default**: `4`
    pub num_actions: usize,
    /// The learning rate α, must be in the interval `(0,1]`
    ///
    /// **Default**: `0.8`
    pub learning_rate: f64,
    /// The discount factor γ, must be in the interval `[0,1]`
    ///
    /// **Default**: `0.6`
    pub discount_factor: f64,
}

impl Default for ValueTableConfig {
    fn default() -> Self {
        Self {
            num_states: 48,
            num_actions: 4,
            learning_rate: 0.8,
            discount_factor: 0.6,
        }
    }
}

/// The temporal-difference rule applied to each observed transition
#[derive(Debug, Display, EnumIter, VariantArray, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateRule {
    /// Q-learning: bootstrap from the best successor value with the fixed learning rate
    #[strum(to_string = "off-policy")]
    FixedStepOffPolicy,
    /// SARSA: bootstrap from the value of the action the greedy policy takes next
    #[default]
    #[strum(to_string = "sarsa")]
    OnPolicySarsa,
    /// Q-learning target with a step size of `1/n`, `n` being the visits of the origin state
    #[strum(to_string = "count-averaged")]
    CountAveragedOffPolicy,
}

/// A dense table of action values for a finite MDP
///
/// Values are stored row-major, one row of `A` action values per state, and all start at `0`.
/// Every operation taking a state or action index **panics** if the index is out of range.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTable {
    values: Vec<f64>,
    visit_count: Vec<u32>,
    num_states: usize,
    num_actions: usize,
    alpha: f64, // learning rate
    gamma: f64, // discount factor
}

impl ValueTable {
    /// Initialize a zeroed table
    ///
    /// **Errors** if either dimension is zero, if `learning_rate` is not in `(0,1]`,
    /// or if `discount_factor` is not in `[0,1]`
    pub fn new(config: ValueTableConfig) -> Result<Self> {
        check_positive("num_states", config.num_states)?;
        check_positive("num_actions", config.num_actions)?;
        check_unit_interval("learning_rate", config.learning_rate, true)?;
        check_unit_interval("discount_factor", config.discount_factor, false)?;

        Ok(Self {
            values: vec![0.0; config.num_states * config.num_actions],
            visit_count: vec![0; config.num_states],
            num_states: config.num_states,
            num_actions: config.num_actions,
            alpha: config.learning_rate,
            gamma: config.discount_factor,
        })
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    pub fn learning_rate(&self) -> f64 {
        self.alpha
    }

    pub fn discount_factor(&self) -> f64 {
        self.gamma
    }

    /// The action values of `state`, indexed by action
    pub fn row(&self, state: usize) -> &[f64] {
        assert_index!(state, self.num_states);
        let start = state * self.num_actions;
        &self.values[start..start + self.num_actions]
    }

    pub fn value(&self, state: usize, action: usize) -> f64 {
        self.row(state)[self.check_action(action)]
    }

    /// Number of count-averaged updates that originated from `state`
    pub fn visits(&self, state: usize) -> u32 {
        assert_index!(state, self.num_states);
        self.visit_count[state]
    }

    /// The largest action value of `state`
    pub fn max_value(&self, state: usize) -> f64 {
        self.row(state)[self.greedy_action(state)]
    }

    /// The action with the highest value in `state`
    ///
    /// Ties go to the lowest action index: the scan only moves past the current
    /// best on a strictly greater value.
    pub fn greedy_action(&self, state: usize) -> usize {
        let row = self.row(state);
        let mut best = 0;
        for (action, &value) in row.iter().enumerate().skip(1) {
            if value > row[best] {
                best = action;
            }
        }
        best
    }

    /// Apply the given update rule to an observed transition
    pub fn update(&mut self, rule: UpdateRule, exp: &Exp) {
        let Exp {
            state,
            action,
            reward,
            next_state,
        } = *exp;

        match rule {
            UpdateRule::FixedStepOffPolicy => {
                self.update_off_policy(state, action, reward, next_state)
            }
            UpdateRule::OnPolicySarsa => self.update_on_policy(state, action, reward, next_state),
            UpdateRule::CountAveragedOffPolicy => {
                self.update_count_averaged(state, action, reward, next_state)
            }
        }
    }

    /// Q-learning update
    ///
    /// Q(s,a) ← Q(s,a) + α(r + γ max<sub>a'</sub> Q(s',a') - Q(s,a))
    pub fn update_off_policy(&mut self, state: usize, action: usize, reward: f64, next_state: usize) {
        let target = reward + self.gamma * self.max_value(next_state);
        self.apply(state, action, self.alpha, target);
    }

    /// SARSA update, following the greedy policy into the next state
    ///
    /// Q(s,a) ← Q(s,a) + α(r + γ Q(s',a') - Q(s,a)) where a' is the greedy action in s'
    pub fn update_on_policy(&mut self, state: usize, action: usize, reward: f64, next_state: usize) {
        let next_action = self.greedy_action(next_state);
        let target = reward + self.gamma * self.value(next_state, next_action);
        self.apply(state, action, self.alpha, target);
    }

    /// Q-learning target averaged over visits to the origin state
    ///
    /// N(s) ← N(s) + 1, then Q(s,a) ← Q(s,a) + (r + γ max<sub>a'</sub> Q(s',a') - Q(s,a)) / N(s)
    pub fn update_count_averaged(
        &mut self,
        state: usize,
        action: usize,
        reward: f64,
        next_state: usize,
    ) {
        let target = reward + self.gamma * self.max_value(next_state);
        // validate before the counter moves
        let i = self.index(state, action);
        self.visit_count[state] += 1;
        let step_size = 1.0 / self.visit_count[state] as f64;
        self.apply_at(i, step_size, target);
    }

    fn apply(&mut self, state: usize, action: usize, step_size: f64, target: f64) {
        let i = self.index(state, action);
        self.apply_at(i, step_size, target);
    }

    fn apply_at(&mut self, i: usize, step_size: f64, target: f64) {
        let q = &mut self.values[i];
        *q += step_size * (target - *q);
        trace!("Q[{i}] <- {q} (target {target}, step size {step_size})");
    }

    fn index(&self, state: usize, action: usize) -> usize {
        assert_index!(state, self.num_states);
        state * self.num_actions + self.check_action(action)
    }

    fn check_action(&self, action: usize) -> usize {
        assert_index!(action, self.num_actions);
        action
    }
}

/// One line per state: `state: [v0, v1, ...]`
impl fmt::Display for ValueTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (state, row) in self.values.chunks(self.num_actions).enumerate() {
            if state > 0 {
                writeln!(f)?;
            }
            write!(f, "{state}: {row:?}")?;
        }
        Ok(())
    }
}
