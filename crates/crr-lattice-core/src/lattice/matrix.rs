use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::math::relative_difference;

/// Square (steps+1) x (steps+1) lattice.
///
/// Row `i` is the number of down-moves, column `j` the time step. Only
/// entries with `i <= j` are reachable; the rest stay zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    pub steps: u32,
    pub nodes: Vec<Vec<Decimal>>,
}

impl Lattice {
    pub fn zeros(steps: u32) -> Self {
        let size = steps as usize + 1;
        Lattice {
            steps,
            nodes: vec![vec![Decimal::ZERO; size]; size],
        }
    }

    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn get(&self, down_moves: usize, step: usize) -> Decimal {
        self.nodes[down_moves][step]
    }

    pub fn set(&mut self, down_moves: usize, step: usize, value: Decimal) {
        self.nodes[down_moves][step] = value;
    }

    /// Values at the final time step, ordered by down-moves.
    pub fn terminal(&self) -> Vec<Decimal> {
        let last = self.steps as usize;
        (0..=last).map(|i| self.get(i, last)).collect()
    }

    /// Integer-truncated grid for display.
    pub fn truncated(&self) -> Vec<Vec<i64>> {
        self.nodes
            .iter()
            .map(|row| {
                row.iter()
                    .map(|v| v.trunc().to_i64().unwrap_or(i64::MAX))
                    .collect()
            })
            .collect()
    }

    /// Largest entrywise relative difference, `None` when the shapes differ.
    pub fn max_relative_difference(&self, other: &Lattice) -> Option<Decimal> {
        if self.size() != other.size() {
            return None;
        }
        let max = self
            .nodes
            .iter()
            .zip(&other.nodes)
            .flat_map(|(a, b)| a.iter().zip(b))
            .map(|(a, b)| relative_difference(*a, *b))
            .max()
            .unwrap_or(Decimal::ZERO);
        Some(max)
    }
}
