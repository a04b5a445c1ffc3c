use itertools::Itertools;
use minigym::common::utils::{Grid, DOWN, LEFT, RIGHT, UP};
use minigym::{Continous, Discrete, Model};

fn arrow(a: Discrete) -> char {
    match a {
        UP => '^',
        DOWN => 'v',
        LEFT => '<',
        RIGHT => '>',
        _ => '?',
    }
}

/// State values laid out like the grid, one row per line.
pub fn value_table<G: Grid>(env: &G, v: &[Continous]) -> String {
    let (_, cols) = env.shape();
    v.chunks(cols)
        .map(|row| row.iter().map(|x| format!("{x:7.2}")).join(" "))
        .join("\n")
}

/// Greedy actions as arrows, `T` on terminal states.
pub fn policy_arrows<E: Grid + Model>(env: &E, pi: &[Discrete]) -> String {
    let (_, cols) = env.shape();
    pi.iter()
        .enumerate()
        .map(|(s, &a)| {
            if env.is_terminal(&env.state(s)) {
                'T'
            } else {
                arrow(a)
            }
        })
        .chunks(cols)
        .into_iter()
        .map(|mut row| row.join(" "))
        .join("\n")
}
