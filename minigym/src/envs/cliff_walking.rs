use crate::common::utils::*;
use crate::*;

/// Cliff walking on a 12 x 4 board. Stepping on the cliff ends the episode with -100.
#[derive(Debug, Clone)]
pub struct CliffWalking {
    rows: usize,
    cols: usize,
    start_position: Cell,
    goal_position: Cell,
    cliff: Vec<Cell>,
    state: Cell,
}

impl CliffWalking {
    pub const CLIFF_REWARD: Continous = -100.;

    pub fn new() -> Self {
        let rows = 12;
        let start_position = (rows - 1, 0);
        Self {
            rows,
            cols: 4,
            start_position,
            goal_position: (rows - 1, 3),
            cliff: (1..3).map(|c| (rows - 1, c)).collect(),
            state: start_position,
        }
    }

    pub fn is_cliff(&self, state: &Cell) -> bool {
        self.cliff.contains(state)
    }
}

impl Default for CliffWalking {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid for CliffWalking {
    fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
}

impl Space for CliffWalking {
    type State = Cell;

    fn name(&self) -> &str {
        "CliffWalking"
    }

    fn n_s(&self) -> usize {
        self.rows * self.cols
    }

    fn n_a(&self) -> usize {
        N_MOVES
    }

    fn state(&self, s: Discrete) -> Cell {
        index_cell(s, self.cols)
    }

    fn index(&self, state: &Cell) -> Discrete {
        cell_index(*state, self.cols)
    }
}

impl Model for CliffWalking {
    fn is_terminal(&self, state: &Cell) -> bool {
        *state == self.goal_position || self.is_cliff(state)
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

        let next = move_in_grid(*state, a, self.rows, self.cols);
        let (reward, terminated) = if next == self.goal_position {
            (0., true)
        } else if self.is_cliff(&next) {
            (Self::CLIFF_REWARD, true)
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

impl Simulator for CliffWalking {
    fn reset(&mut self) -> Cell {
        self.state = self.start_position;
        self.state
    }

    fn step(&mut self, a: Discrete) -> Result<StepInfo<Cell>, EnvError> {
        let si = self.simulate(&self.state, a)?;
        self.state = si.observation;
        Ok(si)
    }
}
