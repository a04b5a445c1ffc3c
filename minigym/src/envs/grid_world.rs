use crate::common::utils::*;
use crate::*;

/// N x N grid with absorbing corners. Sutton & Barto 2018, example 4.1.
///
/// Terminal states are (0, 0) and (N-1, N-1), episodes start at (0, N-2). Every move costs
/// `step_reward`; entering a terminal state pays `terminal_reward` instead.
#[derive(Debug, Clone)]
pub struct GridWorld {
    size: usize,
    terminal_states: [Cell; 2],
    start_state: Cell,
    step_reward: Continous,
    terminal_reward: Continous,
    max_steps: usize,
    state: Cell,
    current_step: usize,
}

impl GridWorld {
    pub const DEFAULT_SIZE: usize = 4;
    pub const DEFAULT_MAX_STEPS: usize = 100;

    pub fn new(max_steps: usize) -> Self {
        Self::with_size(Self::DEFAULT_SIZE, max_steps)
    }

    pub fn with_size(size: usize, max_steps: usize) -> Self {
        assert!(size >= 2, "Grid world needs at least 2x2 cells.");

        let start_state = (0, size - 2);
        Self {
            size,
            terminal_states: [(0, 0), (size - 1, size - 1)],
            start_state,
            step_reward: -1.,
            terminal_reward: 0.,
            max_steps,
            state: start_state,
            current_step: 0,
        }
    }

    /// Reward for the move that enters a terminal state. The textbook charges -1 for it too.
    pub fn with_terminal_reward(mut self, reward: Continous) -> Self {
        self.terminal_reward = reward;
        self
    }
}

impl Default for GridWorld {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_STEPS)
    }
}

impl Grid for GridWorld {
    fn shape(&self) -> (usize, usize) {
        (self.size, self.size)
    }
}

impl Space for GridWorld {
    type State = Cell;

    fn name(&self) -> &str {
        "SimpleGridWorld"
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

impl Model for GridWorld {
    fn is_terminal(&self, state: &Cell) -> bool {
        self.terminal_states.contains(state)
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
        let terminated = self.is_terminal(&next);
        Ok(StepInfo {
            observation: next,
            reward: if terminated {
                self.terminal_reward
            } else {
                self.step_reward
            },
            terminated,
            truncated: false,
        })
    }
}

impl Simulator for GridWorld {
    fn reset(&mut self) -> Cell {
        self.state = self.start_state;
        self.current_step = 0;
        self.state
    }

    fn step(&mut self, a: Discrete) -> Result<StepInfo<Cell>, EnvError> {
        let already_done = self.is_terminal(&self.state);
        let mut si = self.simulate(&self.state, a)?;
        if already_done {
            return Ok(si);
        }

        self.state = si.observation;
        self.current_step += 1;
        si.truncated = !si.terminated && self.current_step >= self.max_steps;
        Ok(si)
    }
}
