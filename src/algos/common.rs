use minigym::{Continous, Discrete};

/// Index of the first maximum, so ties go to the lowest index. Empty input gives 0.
pub fn argmax(xs: &[Continous]) -> Discrete {
    xs.iter()
        .enumerate()
        .fold(0, |best, (i, &x)| if x > xs[best] { i } else { best })
}
