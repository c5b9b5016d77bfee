use std::fmt;

use log::{debug, info};

use crate::{
    env::{DiscreteSpace, Environment, Exp},
    error::{Error, Result},
};

use super::value_table::{UpdateRule, ValueTable};

/// Which observation the loop carries forward after an episode ends
///
/// In both modes the environment is reset as soon as a step reports the end of an
/// episode, and the update for that final transition bootstraps from the step's
/// `next_state`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryMode {
    /// The final transition is credited to the state the action was taken in, and
    /// the next action is selected from the reset observation.
    #[default]
    Reset,
    /// The final transition is credited to the reset observation, and the next
    /// action is selected from the terminal observation even though the
    /// environment already sits at its reset state. Reproduces traces recorded
    /// with the reference cliff-walking driver.
    Carryover,
}

/// Configuration for a [`Trainer`] run
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Number of environment steps taken while learning
    ///
    /// **Default**: `10_000`
    pub train_steps: u64,
    /// Number of environment steps taken by the greedy rollout after learning
    ///
    /// **Default**: `10_000`
    pub eval_steps: u64,
    /// Seed passed to the first reset of each phase
    ///
    /// **Default**: `Some(42)`
    pub seed: Option<u64>,
    /// The update rule applied to each training transition
    ///
    /// **Default**: [`UpdateRule::OnPolicySarsa`]
    pub rule: UpdateRule,
    /// **Default**: [`BoundaryMode::Reset`]
    pub boundary: BoundaryMode,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            train_steps: 10_000,
            eval_steps: 10_000,
            seed: Some(42),
            rule: UpdateRule::default(),
            boundary: BoundaryMode::default(),
        }
    }
}

/// Result of the training phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainReport {
    pub steps: u64,
    /// Episodes that ended during training
    pub episodes: u64,
}

/// Result of the evaluation phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalReport {
    pub steps: u64,
    /// Lengths of the episodes completed within the step budget, in order
    pub episode_lengths: Vec<u32>,
}

/// Summary statistic of an evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EvalOutcome {
    /// Mean length of the completed episodes
    AverageSteps(f64),
    /// No episode completed within the step budget
    NeverWon,
}

impl EvalReport {
    pub fn outcome(&self) -> EvalOutcome {
        if self.episode_lengths.is_empty() {
            return EvalOutcome::NeverWon;
        }
        let total: u64 = self.episode_lengths.iter().map(|&l| l as u64).sum();
        EvalOutcome::AverageSteps(total as f64 / self.episode_lengths.len() as f64)
    }
}

/// Both phases of a [`Trainer::run`]
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub train: TrainReport,
    pub eval: EvalReport,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "trained for {} steps, evaluated for {} steps, ",
            self.train.steps, self.eval.steps
        )?;
        match self.eval.outcome() {
            EvalOutcome::AverageSteps(mean) => write!(f, "won in {mean} steps on average"),
            EvalOutcome::NeverWon => write!(f, "never won"),
        }
    }
}

/// Drives a greedy [`ValueTable`] agent through an [`Environment`]
///
/// The trainer owns both the table and the environment for the duration of a run;
/// [`into_parts`](Trainer::into_parts) hands them back.
pub struct Trainer<E>
where
    E: Environment<State = usize, Action = usize>,
{
    table: ValueTable,
    env: E,
}

impl<E> Trainer<E>
where
    E: Environment<State = usize, Action = usize>,
{
    pub fn new(table: ValueTable, env: E) -> Self {
        Self { table, env }
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn into_parts(self) -> (ValueTable, E) {
        (self.table, self.env)
    }

    /// Learn for `config.train_steps` steps, applying `config.rule` to every transition
    pub fn train(&mut self, config: &RunConfig) -> TrainReport {
        info!(
            "Training for {} steps with the {} rule",
            config.train_steps, config.rule
        );

        let mut episodes = 0;
        let mut state = self.env.reset(config.seed);
        for t in 0..config.train_steps {
            let action = self.table.greedy_action(state);
            let step = self.env.step(action);
            let mut origin = state;
            state = step.next_state;

            if step.is_done() {
                episodes += 1;
                debug!("Training episode {episodes} ended at step {t}");
                let reset = self.env.reset(None);
                match config.boundary {
                    BoundaryMode::Reset => state = reset,
                    BoundaryMode::Carryover => origin = reset,
                }
            }

            self.table.update(
                config.rule,
                &Exp {
                    state: origin,
                    action,
                    reward: step.reward,
                    next_state: step.next_state,
                },
            );
        }

        info!("Training finished after {episodes} episodes");
        TrainReport {
            steps: config.train_steps,
            episodes,
        }
    }

    /// Roll out the greedy policy for `config.eval_steps` steps without learning
    pub fn evaluate(&mut self, config: &RunConfig) -> EvalReport {
        info!("Evaluating for {} steps", config.eval_steps);

        let mut episode_lengths = Vec::new();
        let mut steps = 0;
        let mut state = self.env.reset(config.seed);
        for _ in 0..config.eval_steps {
            let action = self.table.greedy_action(state);
            let step = self.env.step(action);
            steps += 1;
            state = step.next_state;

            if step.is_done() {
                debug!("Evaluation episode {} took {steps} steps", episode_lengths.len() + 1);
                episode_lengths.push(steps);
                steps = 0;
                let reset = self.env.reset(None);
                if config.boundary == BoundaryMode::Reset {
                    state = reset;
                }
            }
        }

        info!("Evaluation completed {} episodes", episode_lengths.len());
        EvalReport {
            steps: config.eval_steps,
            episode_lengths,
        }
    }

    /// Train, then evaluate the learned greedy policy
    pub fn run(&mut self, config: &RunConfig) -> RunSummary {
        let train = self.train(config);
        debug!("Value table after training:\n{}", self.table);
        let eval = self.evaluate(config);
        RunSummary { train, eval }
    }
}

impl<E> Trainer<E>
where
    E: DiscreteSpace,
{
    /// Like [`Trainer::new`], but first checks that the table covers the environment's spaces
    pub fn checked(table: ValueTable, env: E) -> Result<Self> {
        if table.num_states() < env.num_states() {
            return Err(Error::SpaceMismatch {
                space: "states",
                table: table.num_states(),
                env: env.num_states(),
            });
        }
        if table.num_actions() < env.num_actions() {
            return Err(Error::SpaceMismatch {
                space: "actions",
                table: table.num_actions(),
                env: env.num_actions(),
            });
        }
        Ok(Self::new(table, env))
    }
}
