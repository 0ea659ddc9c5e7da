//! The fixed transition rule.
//!
//! Alive cells survive with 2 or 3 live neighbors. Dead cells are born with
//! 3 or 6 live neighbors, which makes this B36/S23 ("HighLife") rather than
//! Conway's B3/S23.

use crate::grid::CellState::{self, Alive, Dead};

pub fn next_state(current: CellState, neighbors: u8) -> CellState {
    match (current, neighbors) {
        (Alive, 2..=3) => Alive, // Survives
        (Dead, 3 | 6) => Alive,  // Born
        _ => Dead,               // Dies or remains dead
    }
}
