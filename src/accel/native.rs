//! In-process accelerated solver.
//!
//! Negamax over the dense encoding with a value window: a node stops
//! enumerating once it has found a winning move or reached the bound its
//! parent can no longer use. Leaves are boards with one free cell, scored
//! by that cell's neighbor sum. The clock is polled every
//! [`POLL_INTERVAL`] nodes.

use std::time::{Duration, Instant};

use tracing::trace;

use super::{AcceleratedSolver, ADJ_END, GAVE_UP};

/// Nodes between clock checks.
pub const POLL_INTERVAL: u64 = 20_000;

const DEFAULT_LIMIT: Duration = Duration::from_secs(20);

/// Value placed after `m`, in the negated convention.
fn successor(m: i32) -> i32 {
    if m < 0 {
        -m
    } else {
        -(m + 1)
    }
}

fn predecessor(m: i32) -> i32 {
    if m > 0 {
        -m
    } else {
        -(m + 1)
    }
}

/// Single-threaded native solver. Reusable across boards.
#[derive(Debug, Clone)]
pub struct NativeSolver {
    limit: Duration,
    adjacency: Vec<Vec<usize>>,
    state: Vec<i32>,
    /// Free cells; the first `free_len` entries are live.
    free: Vec<usize>,
    free_len: usize,
    next: i32,
    nodes: u64,
    started: Instant,
    timed_out: bool,
}

impl Default for NativeSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeSolver {
    pub fn new() -> Self {
        NativeSolver {
            limit: DEFAULT_LIMIT,
            adjacency: Vec::new(),
            state: Vec::new(),
            free: Vec::new(),
            free_len: 0,
            next: -1,
            nodes: 0,
            started: Instant::now(),
            timed_out: false,
        }
    }

    /// Nodes visited by the last `solve_current`.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Neighbor sum of the only free cell.
    fn leaf_value(&self) -> i32 {
        let hole = self.free[0];
        self.adjacency[hole].iter().map(|&n| self.state[n]).sum()
    }

    fn place(&mut self, i: usize) -> usize {
        let cell = self.free[i];
        self.state[cell] = self.next;
        self.next = successor(self.next);
        self.free_len -= 1;
        self.free.swap(i, self.free_len);
        cell
    }

    fn unplace(&mut self, i: usize, cell: usize) {
        self.free.swap(i, self.free_len);
        self.free_len += 1;
        self.state[cell] = 0;
        self.next = predecessor(self.next);
    }

    fn out_of_time(&mut self) -> bool {
        if !self.timed_out && self.nodes % POLL_INTERVAL == 0 {
            self.timed_out = self.started.elapsed() > self.limit;
        }
        self.timed_out
    }

    /// Best value for the side to move, or `None` on timeout.
    fn negamax(&mut self, beta: i32) -> Option<i32> {
        self.nodes += 1;
        if self.out_of_time() {
            return None;
        }
        if self.free_len == 1 {
            return Some(self.leaf_value());
        }

        let mut best = -GAVE_UP;
        let mut i = 0;
        while i < self.free_len && best <= 0 && best < beta {
            let cell = self.place(i);
            let child = self.negamax(-best);
            self.unplace(i, cell);
            best = best.max(-child?);
            i += 1;
        }
        Some(best)
    }
}

impl AcceleratedSolver for NativeSolver {
    fn set_time_limit(&mut self, limit: Duration) {
        self.limit = limit;
    }

    fn init_adj(&mut self, adjacency: &[i32]) {
        self.adjacency = adjacency
            .split(|&v| v == ADJ_END)
            .map(|list| list.iter().map(|&n| n as usize).collect())
            .collect();
        // The trailing terminator leaves one empty tail slice.
        if adjacency.last() == Some(&ADJ_END) {
            self.adjacency.pop();
        }
    }

    fn init_state(&mut self, values: &[i32]) {
        self.state = values.to_vec();
        self.free = (0..values.len()).filter(|&i| values[i] == 0).collect();
        self.free_len = self.free.len();

        let played = (values.len() - self.free_len) as i32;
        let magnitude = 1 + played / 2;
        self.next = if played % 2 == 0 { -magnitude } else { magnitude };
    }

    fn solve_current(&mut self, values: &mut [i32]) -> i32 {
        if self.free_len == 0 || self.adjacency.len() != self.state.len() {
            return -GAVE_UP;
        }
        if self.free_len == 1 {
            return self.leaf_value();
        }

        self.started = Instant::now();
        self.nodes = 0;
        self.timed_out = false;
        values.iter_mut().for_each(|v| *v = 0);

        let mut best = -GAVE_UP;
        for i in 0..self.free_len {
            let cell = self.place(i);
            let child = self.negamax(GAVE_UP);
            self.unplace(i, cell);
            let Some(child) = child else {
                return GAVE_UP;
            };
            if self.started.elapsed() > self.limit {
                return GAVE_UP;
            }
            if let Some(slot) = values.get_mut(cell) {
                *slot = -child;
            }
            best = best.max(-child);
        }
        trace!(nodes = self.nodes, best, "native solve finished");
        best
    }
}
