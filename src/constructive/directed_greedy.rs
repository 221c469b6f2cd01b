//! Greedy constructive heuristic for the directed selective TSP.
//!
//! # Algorithm
//!
//! For each of the four possible starting turns at the first vertex, build a
//! tour greedily: always append the unvisited `(vertex, turn)` pair with the
//! cheapest incremental cost (travel weight from the current departure side
//! plus the turn penalty), as long as the weight needed to finish the tour
//! afterwards still fits the budget. The best of the four runs wins.
//!
//! The finish reserve depends on the problem shape: a closed tour must pay
//! the way back to the first arrival side, a fixed-endpoint tour must pay the
//! cheapest way into its final vertex, an open tour pays nothing.
//!
//! # Complexity
//!
//! O(n²) per starting turn.

use std::cmp::Ordering;

use crate::models::{DirectedId, StspProblem, Tour};
use crate::objective::{Objective, StspFitness, StspObjective};
use crate::solver::{Solver, SolverError};

/// Greedy cheapest-append solver for [`StspProblem`].
///
/// Deterministic: ties are broken towards the lower vertex id and turn.
///
/// # Examples
///
/// ```
/// use eax_tsp::constructive::DirectedGreedySolver;
/// use eax_tsp::models::{DirectedId, StspProblem};
/// use eax_tsp::weights::WeightMatrix;
///
/// let weights = WeightMatrix::from_data(4, vec![1.0; 16]).unwrap();
/// let problem = StspProblem::new(0, None, weights, [0.0; 4], f64::INFINITY).unwrap();
///
/// let (tour, fitness) = problem.solve().unwrap();
/// assert_eq!(fitness.customers, 2);
/// assert_eq!(DirectedId::from_raw(tour.first()).id(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DirectedGreedySolver;

impl DirectedGreedySolver {
    /// Creates a new solver.
    pub fn new() -> Self {
        Self
    }
}

/// Cheapest way to travel from `departure` into `vertex`, over all turns.
fn cheapest_entry(problem: &StspProblem, departure: usize, vertex: usize) -> (f64, u8) {
    let mut best = (f64::INFINITY, 0u8);
    for turn in 0..4u8 {
        let directed = DirectedId::new(vertex, turn);
        let cost = problem.weight(departure, directed.arrival_weight_id())
            + problem.turn_penalties()[turn as usize];
        if cost < best.0 {
            best = (cost, turn);
        }
    }
    best
}

/// Weight still needed after standing at `departure`, given the shape.
fn finish_reserve(
    problem: &StspProblem,
    departure: usize,
    first_arrival: usize,
    closed: bool,
    fixed_last: Option<usize>,
) -> f64 {
    if closed {
        problem.weight(departure, first_arrival)
    } else if let Some(l) = fixed_last {
        cheapest_entry(problem, departure, l).0
    } else {
        0.0
    }
}

fn greedy_from_turn(
    problem: &StspProblem,
    start_turn: u8,
    closed: bool,
    fixed_last: Option<usize>,
) -> Option<(Tour, StspFitness)> {
    let first = problem.first();
    let start = DirectedId::new(first, start_turn);
    let first_arrival = start.arrival_weight_id();
    let max = problem.max();

    let mut weight = problem.turn_penalties()[start_turn as usize];
    if weight + finish_reserve(problem, start.departure_weight_id(), first_arrival, closed, fixed_last)
        > max
    {
        return None;
    }

    let mut visited = vec![false; problem.count()];
    visited[first] = true;
    if let Some(l) = fixed_last {
        visited[l] = true;
    }

    let mut sequence = vec![start];
    let mut departure = start.departure_weight_id();

    loop {
        // Cheapest feasible (vertex, turn) extension.
        let mut best: Option<(f64, usize, u8)> = None;
        for vertex in 0..problem.count() {
            if visited[vertex] {
                continue;
            }
            let (cost, turn) = cheapest_entry(problem, departure, vertex);
            let next_departure = DirectedId::new(vertex, turn).departure_weight_id();
            let reserve = finish_reserve(problem, next_departure, first_arrival, closed, fixed_last);
            if weight + cost + reserve > max {
                continue;
            }
            if best.is_none_or(|(c, ..)| cost < c) {
                best = Some((cost, vertex, turn));
            }
        }

        match best {
            Some((cost, vertex, turn)) => {
                visited[vertex] = true;
                weight += cost;
                let directed = DirectedId::new(vertex, turn);
                departure = directed.departure_weight_id();
                sequence.push(directed);
            }
            None => break,
        }
    }

    if let Some(l) = fixed_last {
        let (cost, turn) = cheapest_entry(problem, departure, l);
        if weight + cost > max {
            return None;
        }
        sequence.push(DirectedId::new(l, turn));
    }

    let raw: Vec<usize> = sequence.iter().map(|d| d.raw()).collect();
    let last = if closed {
        Some(start.raw())
    } else {
        fixed_last.map(|_| raw[raw.len() - 1])
    };
    let tour = Tour::new(&raw, last).ok()?;
    let fitness = StspObjective.calculate(problem, &tour);
    Some((tour, fitness))
}

impl Solver<StspProblem, StspObjective> for DirectedGreedySolver {
    fn name(&self) -> &str {
        "GREEDY_DIR"
    }

    fn solve(
        &mut self,
        problem: &StspProblem,
        objective: &StspObjective,
    ) -> Result<(Tour, StspFitness), SolverError> {
        let first = problem.first();
        let closed = problem.last() == Some(first);
        let fixed_last = match problem.last() {
            Some(l) if l != first => Some(l),
            _ => None,
        };

        let mut best: Option<(Tour, StspFitness)> = None;
        for start_turn in 0..4u8 {
            let Some((tour, fitness)) = greedy_from_turn(problem, start_turn, closed, fixed_last)
            else {
                continue;
            };
            let improves = match &best {
                None => true,
                Some((_, best_fitness)) => {
                    objective.compare(&fitness, best_fitness) == Ordering::Less
                }
            };
            if improves {
                best = Some((tour, fitness));
            }
        }

        tracing::debug!(
            found = best.is_some(),
            "directed greedy construction finished"
        );
        best.ok_or_else(|| {
            SolverError::Infeasible("weight budget does not admit any tour from first".into())
        })
    }
}
