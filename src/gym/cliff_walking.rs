use rand::{rngs::StdRng, Rng, SeedableRng};
use strum::{EnumIter, FromRepr, VariantArray};

use crate::env::{DiscreteSpace, Environment, Step};

const ROWS: usize = 4;
const COLS: usize = 12;
const START: usize = (ROWS - 1) * COLS;
const GOAL: usize = ROWS * COLS - 1;

const STEP_REWARD: f64 = -1.0;
const CLIFF_REWARD: f64 = -100.0;

#[derive(EnumIter, VariantArray, FromRepr, Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[repr(usize)]
pub enum CliffAction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl CliffAction {
    /// Row and column offsets of a move
    fn delta(self) -> (isize, isize) {
        match self {
            CliffAction::Up => (-1, 0),
            CliffAction::Right => (0, 1),
            CliffAction::Down => (1, 0),
            CliffAction::Left => (0, -1),
        }
    }

    /// The action rotated a quarter turn, `1` clockwise or `-1` counterclockwise
    fn rotate(self, turns: isize) -> Self {
        let i = (self as isize + turns).rem_euclid(4) as usize;
        CliffAction::VARIANTS[i]
    }
}

impl From<CliffAction> for usize {
    fn from(action: CliffAction) -> Self {
        action as usize
    }
}

/// The cliff walking grid world from Python [gymnasium](https://gymnasium.farama.org/)
///
/// A 4x12 grid. The agent starts in the bottom left corner and must reach the
/// bottom right corner. The cells between them along the bottom row are a cliff:
/// stepping into one costs `-100` and sends the agent back to the start without
/// ending the episode. Every other move costs `-1`, and moves into the border
/// leave the agent in place. States are `row * 12 + col`.
///
/// When slippery, each move goes in the intended direction or in one of the two
/// perpendicular directions, each with probability 1/3.
pub struct CliffWalking {
    pos: usize,
    slippery: bool,
    rng: StdRng,
}

impl CliffWalking {
    /// A deterministic cliff walk
    pub fn new() -> Self {
        Self {
            pos: START,
            slippery: false,
            rng: StdRng::from_entropy(),
        }
    }

    /// A cliff walk whose moves slip sideways two times in three
    pub fn slippery() -> Self {
        Self {
            slippery: true,
            ..Self::new()
        }
    }

    pub fn is_slippery(&self) -> bool {
        self.slippery
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    fn is_cliff(pos: usize) -> bool {
        pos > START && pos < GOAL
    }

    fn moved(&self, action: CliffAction) -> usize {
        let (dr, dc) = action.delta();
        let row = (self.pos / COLS) as isize + dr;
        let col = (self.pos % COLS) as isize + dc;
        let row = row.clamp(0, ROWS as isize - 1) as usize;
        let col = col.clamp(0, COLS as isize - 1) as usize;
        row * COLS + col
    }
}

impl Default for CliffWalking {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for CliffWalking {
    type State = usize;
    type Action = usize;

    fn step(&mut self, action: Self::Action) -> Step<Self::State> {
        let Some(mut action) = CliffAction::from_repr(action) else {
            panic!("Invalid action: {action}. Must be less than 4.");
        };
        if self.slippery {
            action = action.rotate(self.rng.gen_range(-1..=1));
        }

        let next = self.moved(action);
        let (reward, terminated) = if Self::is_cliff(next) {
            self.pos = START;
            (CLIFF_REWARD, false)
        } else {
            self.pos = next;
            (STEP_REWARD, next == GOAL)
        };

        Step {
            next_state: self.pos,
            reward,
            terminated,
            truncated: false,
        }
    }

    fn reset(&mut self, seed: Option<u64>) -> Self::State {
        if let Some(seed) = seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        self.pos = START;
        self.pos
    }
}

impl DiscreteSpace for CliffWalking {
    fn num_states(&self) -> usize {
        ROWS * COLS
    }

    fn num_actions(&self) -> usize {
        CliffAction::VARIANTS.len()
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    fn walk(env: &mut CliffWalking, actions: &[CliffAction]) -> Vec<Step<usize>> {
        actions.iter().map(|&a| env.step(a.into())).collect()
    }

    #[test]
    fn cliff_walking_functional() {
        let mut env = CliffWalking::new();
        assert_eq!(env.reset(Some(42)), 36, "Starts bottom left");
        assert_eq!(env.num_states(), 48);
        assert_eq!(env.num_actions(), 4);

        let up = env.step(CliffAction::Up.into());
        assert_eq!(up.next_state, 24);
        assert_eq!(up.reward, -1.0);
        assert!(!up.is_done());
    }

    #[test]
    fn cliff_sends_back_to_start() {
        let mut env = CliffWalking::new();
        env.reset(None);
        let step = env.step(CliffAction::Right.into());
        assert_eq!(
            step,
            Step {
                next_state: 36,
                reward: -100.0,
                terminated: false,
                truncated: false,
            }
        );
    }

    #[test]
    fn safe_path_reaches_goal() {
        let mut env = CliffWalking::new();
        env.reset(None);
        let mut path = vec![CliffAction::Up];
        path.extend([CliffAction::Right; 11]);
        path.push(CliffAction::Down);

        let steps = walk(&mut env, &path);
        assert_eq!(steps.len(), 13);
        assert!(steps[..12].iter().all(|s| !s.is_done()));
        let last = steps.last().unwrap();
        assert_eq!(last.next_state, 47);
        assert!(last.terminated);
        assert_eq!(steps.iter().map(|s| s.reward).sum::<f64>(), -13.0);
    }

    #[test]
    fn border_moves_stay_in_place() {
        let mut env = CliffWalking::new();
        env.reset(None);
        assert_eq!(env.step(CliffAction::Left.into()).next_state, 36);
        assert_eq!(env.step(CliffAction::Down.into()).next_state, 36);
        let steps = walk(&mut env, &[CliffAction::Up; 4]);
        assert_eq!(steps.last().unwrap().next_state, 0);
    }

    #[test]
    fn rotate_wraps() {
        assert_eq!(CliffAction::Up.rotate(-1), CliffAction::Left);
        assert_eq!(CliffAction::Left.rotate(1), CliffAction::Up);
        for a in CliffAction::iter() {
            assert_eq!(a.rotate(0), a);
        }
    }

    #[test]
    fn slippery_is_reproducible_with_seed() {
        let trace = |seed| {
            let mut env = CliffWalking::slippery();
            env.reset(Some(seed));
            walk(&mut env, &[CliffAction::Up; 20])
                .into_iter()
                .map(|s| s.next_state)
                .collect::<Vec<_>>()
        };
        assert_eq!(trace(7), trace(7));

        // Up from the start never lands in the cliff, but slipping sideways can
        let mut env = CliffWalking::slippery();
        env.reset(Some(7));
        let outcomes = (0..200)
            .map(|_| {
                env.reset(None);
                env.step(CliffAction::Up.into()).next_state
            })
            .collect::<Vec<_>>();
        assert!(outcomes.contains(&24));
        assert!(outcomes.contains(&36), "Slipped left or into the cliff");
        assert!(outcomes.iter().all(|&s| s == 24 || s == 36));
    }

    #[test]
    #[should_panic(expected = "Invalid action")]
    fn invalid_action_panics() {
        CliffWalking::new().step(4);
    }
}
