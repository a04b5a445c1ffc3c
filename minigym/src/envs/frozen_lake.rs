use crate::common::utils::*;
use crate::*;
use rand::prelude::*;

/// Frozen lake with fixed holes. Falling through a hole costs -100 and ends the episode.
///
/// On a slippery lake `step` ignores the requested move and picks one uniformly at random.
/// `simulate` always models the requested move.
#[derive(Debug, Clone)]
pub struct FrozenLake {
    size: usize,
    slippery: bool,
    start_position: Cell,
    goal_position: Cell,
    holes: Vec<Cell>,
    state: Cell,
    rng: StdRng,
}

impl FrozenLake {
    pub const HOLE_REWARD: Continous = -100.;

    pub fn new(size: usize, slippery: bool) -> Self {
        assert!(size >= 2, "Frozen lake needs at least 2x2 cells.");

        let holes = [(1, 2), (2, 1), (3, 3)]
            .into_iter()
            .filter(|&(r, c)| r < size && c < size)
            .collect();

        Self {
            size,
            slippery,
            start_position: (0, 0),
            goal_position: (size - 1, size - 1),
            holes,
            state: (0, 0),
            rng: StdRng::seed_from_u64(0),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn is_hole(&self, state: &Cell) -> bool {
        self.holes.contains(state)
    }
}

impl Default for FrozenLake {
    fn default() -> Self {
        Self::new(4, false)
    }
}

impl Grid for FrozenLake {
    fn shape(&self) -> (usize, usize) {
        (self.size, self.size)
    }
}

impl Space for FrozenLake {
    type State = Cell;

    fn name(&self) -> &str {
        "FrozenLake"
    }

    fn n_s(&self) -> usize {
        self.size * self.size
    }

    fn n_a(&self) -> usize {
        N_MOVES
    }

    fn state(&self, s: Discrete) -> Cell {
        index_cell(s, self.size)
    }

    fn index(&self, state: &Cell) -> Discrete {
        cell_index(*state, self.size)
    }
}

impl Model for FrozenLake {
    fn is_terminal(&self, state: &Cell) -> bool {
        *state == self.goal_position || self.is_hole(state)
    }

    fn simulate(&self, state: &Cell, a: Discrete) -> Result<StepInfo<Cell>, EnvError> {
        self.check_action(a)?;

        if self.is_terminal(state) {
            return Ok(StepInfo {
                observation: *state,
                reward: 0.,
                terminated: true,
                truncated: false,
            });
        }

        let next = move_in_grid(*state, a, self.size, self.size);
        // Goal wins when it shares a cell with a hole.
        let (reward, terminated) = if next == self.goal_position {
            (0., true)
        } else if self.is_hole(&next) {
            (Self::HOLE_REWARD, true)
        } else {
            (-1., false)
        };

        Ok(StepInfo {
            observation: next,
            reward,
            terminated,
            truncated: false,
        })
    }
}

impl Simulator for FrozenLake {
    fn reset(&mut self) -> Cell {
        self.state = self.start_position;
        self.state
    }

    fn step(&mut self, a: Discrete) -> Result<StepInfo<Cell>, EnvError> {
        self.check_action(a)?;

        let a = if self.slippery {
            self.rng.gen_range(0..N_MOVES)
        } else {
            a
        };

        let si = self.simulate(&self.state, a)?;
        self.state = si.observation;
        Ok(si)
    }
}
