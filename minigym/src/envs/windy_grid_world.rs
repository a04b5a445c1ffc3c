use crate::common::utils::*;
use crate::*;

/// Windy grid world on a 10 x 7 board. In the windy rows the wind of the destination column
/// pushes the agent towards row 0.
#[derive(Debug, Clone)]
pub struct WindyGridWorld {
    rows: usize,
    cols: usize,
    start_position: Cell,
    goal_position: Cell,
    wind_map: Vec<usize>,
    state: Cell,
}

impl WindyGridWorld {
    const WINDY_ROWS: std::ops::RangeInclusive<usize> = 3..=5;

    pub fn new() -> Self {
        let start_position = (0, 3);
        Self {
            rows: 10,
            cols: 7,
            start_position,
            goal_position: (0, 6),
            wind_map: vec![0, 0, 0, 1, 1, 2, 2],
            state: start_position,
        }
    }

    fn wind(&self, col: usize) -> usize {
        self.wind_map[col]
    }
}

impl Default for WindyGridWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid for WindyGridWorld {
    fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
}

impl Space for WindyGridWorld {
    type State = Cell;

    fn name(&self) -> &str {
        "WindyGridWorld"
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

impl Model for WindyGridWorld {
    fn is_terminal(&self, state: &Cell) -> bool {
        *state == self.goal_position
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

        let (mut r, c) = move_in_grid(*state, a, self.rows, self.cols);
        if Self::WINDY_ROWS.contains(&r) {
            r = r.saturating_sub(self.wind(c));
        }

        let next = (r, c);
        let terminated = self.is_terminal(&next);
        Ok(StepInfo {
            observation: next,
            reward: if terminated { 0. } else { -1. },
            terminated,
            truncated: false,
        })
    }
}

impl Simulator for WindyGridWorld {
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

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case((2, 5), DOWN, (1, 5))]
    #[case((4, 4), RIGHT, (2, 5))]
    #[case((4, 2), RIGHT, (3, 3))]
    #[case((4, 1), RIGHT, (4, 2))]
    #[case((7, 5), UP, (6, 5))]
    #[case((1, 5), RIGHT, (1, 6))]
    fn wind_blows_towards_row_zero(#[case] from: Cell, #[case] a: Discrete, #[case] to: Cell) {
        let env = WindyGridWorld::new();

        assert_eq!(env.simulate(&from, a).unwrap().observation, to);
    }

    #[test]
    fn goal_ends_the_episode() {
        let mut env = WindyGridWorld::new();
        env.reset();

        let mut last = None;
        for a in [RIGHT, RIGHT, RIGHT] {
            last = Some(env.step(a).unwrap());
        }

        let si = last.unwrap();
        assert_eq!(si.observation, (0, 6));
        assert!(si.terminated);
        assert_eq!(si.reward, 0.);
    }
}
