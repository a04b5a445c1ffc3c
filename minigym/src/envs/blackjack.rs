use crate::*;
use rand::prelude::*;
use serde::Serialize;

pub const HIT: Discrete = 0;
pub const STICK: Discrete = 1;

/// Infinite deck, aces count as 1 and face cards as 10.
const DECK: [usize; 13] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 10, 10, 10];
const MAX_PLAYER_SUM: usize = 31;
const MAX_CARD: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Hand {
    pub player_sum: usize,
    pub dealer_card: usize,
    pub usable_ace: bool,
}

/// Simplified blackjack against a dealer who sticks on 17. Only the stateful interface is
/// offered: the dynamics depend on the cards drawn.
#[derive(Debug, Clone)]
pub struct Blackjack {
    state: Option<Hand>,
    done: bool,
    rng: StdRng,
}

impl Blackjack {
    pub fn new(seed: u64) -> Self {
        Self {
            state: None,
            done: false,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn draw_card(&mut self) -> usize {
        *DECK.choose(&mut self.rng).unwrap_or(&MAX_CARD)
    }

    fn finish(&mut self, hand: Hand, reward: Continous) -> StepInfo<Hand> {
        self.state = Some(hand);
        self.done = true;
        StepInfo {
            observation: hand,
            reward,
            terminated: true,
            truncated: false,
        }
    }

    fn dealer_plays(&mut self, hand: Hand) -> StepInfo<Hand> {
        let mut dealer_sum = hand.dealer_card;
        while dealer_sum < 17 {
            dealer_sum += self.draw_card();
        }

        let reward = if dealer_sum > 21 || dealer_sum < hand.player_sum {
            1.
        } else if dealer_sum > hand.player_sum {
            -1.
        } else {
            0.
        };

        self.finish(hand, reward)
    }
}

impl Space for Blackjack {
    type State = Hand;

    fn name(&self) -> &str {
        "Blackjack"
    }

    fn n_s(&self) -> usize {
        (MAX_PLAYER_SUM + 1) * (MAX_CARD + 1) * 2
    }

    fn n_a(&self) -> usize {
        2
    }

    fn state(&self, s: Discrete) -> Hand {
        Hand {
            player_sum: s / (2 * (MAX_CARD + 1)),
            dealer_card: (s / 2) % (MAX_CARD + 1),
            usable_ace: s % 2 == 1,
        }
    }

    fn index(&self, state: &Hand) -> Discrete {
        (state.player_sum * (MAX_CARD + 1) + state.dealer_card) * 2 + state.usable_ace as usize
    }
}

impl Simulator for Blackjack {
    fn reset(&mut self) -> Hand {
        let player = [self.draw_card(), self.draw_card()];
        let dealer_card = self.draw_card();
        let player_sum = player.iter().sum::<usize>();

        let hand = Hand {
            player_sum,
            dealer_card,
            usable_ace: player.contains(&1) && player_sum <= 11,
        };
        self.state = Some(hand);
        self.done = false;
        hand
    }

    fn step(&mut self, a: Discrete) -> Result<StepInfo<Hand>, EnvError> {
        self.check_action(a)?;
        let mut hand = self.state.ok_or(EnvError::NotReset)?;

        if self.done {
            return Ok(StepInfo {
                observation: hand,
                reward: 0.,
                terminated: true,
                truncated: false,
            });
        }

        if a == STICK {
            return Ok(self.dealer_plays(hand));
        }

        hand.player_sum += self.draw_card();
        if hand.usable_ace && hand.player_sum <= 11 {
            hand.player_sum += 10;
        }
        if hand.player_sum > 21 {
            return Ok(self.finish(hand, -1.));
        }

        self.state = Some(hand);
        Ok(StepInfo {
            observation: hand,
            reward: 0.,
            terminated: false,
            truncated: false,
        })
    }
}
