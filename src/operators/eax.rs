//! Edge Assembly Crossover.
//!
//! # Algorithm
//!
//! Given two parent tours over the same problem:
//!
//! 1. Build `E_A` (the first parent's edges as an
//!    [`AsymmetricCycles`]) and `E_B` (the second parent's edges as a
//!    predecessor array).
//! 2. Decompose the edge union into AB-cycles: alternating sequences of one
//!    A-edge and one B-edge ([`AsymmetricAlternatingCycles`]).
//! 3. Repeatedly select AB-cycles (one uniform cycle, or each independently
//!    with probability 0.75), patch a donor copy of `E_A` by swapping the
//!    selected A-edges for their B-edges, and reconnect the resulting
//!    sub-tours: always merge the smallest sub-tour into the rest through
//!    the cheapest 2-opt-style edge exchange, guided by the ten nearest
//!    forward neighbours with a full scan as fallback.
//! 4. Keep the best offspring that spans every customer; if none does,
//!    fall back to the unchanged `E_A`.
//!
//! The crossover requires a closed tour with a free endpoint. Open and
//! fixed-endpoint problems are transparently converted (with one warning per
//! application) and the child is converted back afterwards.
//!
//! # Complexity
//!
//! O(n) tour work per offspring plus O(n·k) for the neighbour-guided
//! reconnection (k = 10), and O(n²) worst case for the fallback merge scan.
//!
//! # Reference
//!
//! Nagata, Y. & Kobayashi, S. (1997). "Edge assembly crossover: A high-power
//! genetic algorithm for the traveling salesman problem", *Proceedings of the
//! 7th International Conference on Genetic Algorithms*, 450-457.

use std::cmp::Ordering;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::cycles::{AsymmetricAlternatingCycles, AsymmetricCycles};
use crate::models::{Tour, TourProblem};
use crate::objective::Objective;
use crate::solver::{CrossoverOperator, OperatorError};

const NOT_SET: usize = usize::MAX;

/// Candidate width of the neighbour-guided reconnection phase.
const NN_WIDTH: usize = 10;

/// How AB-cycles are chosen for each offspring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionStrategy {
    /// Pick one uniform-random cycle per offspring and consume it.
    SingleRandom,
    /// Include each cycle independently with probability 0.75; the pool is
    /// never consumed.
    MultipleRandom,
}

/// The original shape of the problem, restored on the child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Closed,
    Open,
    FixedEnd(usize),
}

/// The Edge Assembly Crossover operator.
///
/// Owns its random source; two operators built with the same seed and
/// configuration produce identical children from identical parents.
///
/// # Examples
///
/// ```
/// use eax_tsp::models::{Tour, TspProblem};
/// use eax_tsp::objective::TspObjective;
/// use eax_tsp::operators::{EaxOperator, SelectionStrategy};
/// use eax_tsp::solver::CrossoverOperator;
/// use eax_tsp::weights::WeightMatrix;
///
/// let weights = WeightMatrix::from_coordinates(&[
///     (1.0, 0.0),
///     (0.309, 0.951),
///     (-0.809, 0.588),
///     (-0.809, -0.588),
///     (0.309, -0.951),
/// ]);
/// let problem = TspProblem::new(0, Some(0), weights).unwrap();
/// let p1 = Tour::new(&[0, 1, 2, 3, 4], Some(0)).unwrap();
/// let p2 = Tour::new(&[0, 2, 4, 1, 3], Some(0)).unwrap();
///
/// let mut eax = EaxOperator::new(SelectionStrategy::SingleRandom, 1, false, 42);
/// let (child, _fitness) = eax.apply(&problem, &TspObjective, &p1, &p2).unwrap();
/// assert_eq!(child.count(), 5);
/// assert_eq!(child.first(), 0);
/// ```
#[derive(Debug)]
pub struct EaxOperator<R = ChaCha8Rng> {
    strategy: SelectionStrategy,
    max_offspring: usize,
    nn: bool,
    name: String,
    rng: R,
}

impl EaxOperator<ChaCha8Rng> {
    /// Creates an operator with a seeded default random source.
    pub fn new(strategy: SelectionStrategy, max_offspring: usize, nn: bool, seed: u64) -> Self {
        Self::with_rng(strategy, max_offspring, nn, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Creates an operator with the default configuration
    /// (`SingleRandom`, 30 offspring, neighbour guidance on).
    pub fn with_seed(seed: u64) -> Self {
        Self::new(SelectionStrategy::SingleRandom, 30, true, seed)
    }
}

impl<R: Rng> EaxOperator<R> {
    /// Creates an operator around a caller-supplied random source.
    pub fn with_rng(strategy: SelectionStrategy, max_offspring: usize, nn: bool, rng: R) -> Self {
        let max_offspring = max_offspring.max(1);
        let tag = match strategy {
            SelectionStrategy::SingleRandom => "SR",
            SelectionStrategy::MultipleRandom => "MR",
        };
        let name = if nn {
            format!("EAX_({tag}{max_offspring}_NN)")
        } else {
            format!("EAX_({tag}{max_offspring})")
        };
        Self {
            strategy,
            max_offspring,
            nn,
            name,
            rng,
        }
    }

    /// The derived operator identifier, e.g. `EAX_(SR30_NN)`.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<P, O, R> CrossoverOperator<P, O> for EaxOperator<R>
where
    P: TourProblem,
    O: Objective<P>,
    R: Rng,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(
        &mut self,
        problem: &P,
        objective: &O,
        parent1: &Tour,
        parent2: &Tour,
    ) -> Result<(Tour, O::Fitness), OperatorError> {
        for parent in [parent1, parent2] {
            if parent.last() != problem.last() {
                return Err(OperatorError::PreconditionViolation {
                    parent: parent.last(),
                    problem: problem.last(),
                });
            }
        }

        let first = problem.first();
        let shape = match problem.last() {
            Some(l) if l == first => Shape::Closed,
            Some(l) => Shape::FixedEnd(l),
            None => Shape::Open,
        };
        let (norm1, norm2) = normalize_parents(parent1, parent2, first, shape)?;

        let count = problem.count();
        let expected = norm1.count();

        let mut e_a = AsymmetricCycles::new(count);
        for (from, to) in norm1.pairs() {
            e_a.add_edge(from, to);
        }
        let mut e_b = vec![NOT_SET; count];
        for (from, to) in norm2.pairs() {
            e_b[to] = from;
        }

        let mut ab = AsymmetricAlternatingCycles::new(count);
        for v in 0..count {
            let Some(a) = e_a.next_of(v) else { continue };
            let b = e_b[a];
            if b != NOT_SET && b != v {
                ab.add_triple(v, a, b);
            }
        }
        let mut selectable: Vec<usize> = ab.cycles().into_iter().map(|(start, _)| start).collect();

        let mut e_a = Some(e_a);
        let mut best: Option<(Tour, O::Fitness)> = None;
        let mut generated = 0usize;

        for _ in 0..self.max_offspring {
            if selectable.is_empty() {
                break;
            }

            let selected: Vec<usize> = match self.strategy {
                SelectionStrategy::SingleRandom => {
                    let idx = self.rng.random_range(0..selectable.len());
                    vec![selectable.swap_remove(idx)]
                }
                SelectionStrategy::MultipleRandom => selectable
                    .iter()
                    .copied()
                    .filter(|_| self.rng.random_bool(0.75))
                    .collect(),
            };

            let mut donor = if self.max_offspring > 1 {
                e_a.as_ref().expect("donor outlives the generate loop").clone()
            } else {
                e_a.take().expect("single offspring consumes the donor once")
            };

            for &start in &selected {
                let mut cur = start;
                loop {
                    let (next, paired) = ab.next(cur).expect("triples on an AB-cycle are complete");
                    donor.add_edge(next, paired);
                    cur = next;
                    if cur == start {
                        break;
                    }
                }
            }

            reconnect(problem, &norm1, &mut donor, self.nn);

            let mut sequence = Vec::with_capacity(expected);
            sequence.push(first);
            let mut cur = donor.next_of(first);
            while let Some(c) = cur {
                if c == first {
                    break;
                }
                sequence.push(c);
                cur = donor.next_of(c);
            }

            if sequence.len() == expected {
                generated += 1;
                let child = Tour::new(&sequence, Some(first))?;
                let fitness = objective.calculate(problem, &child);
                let improves = match &best {
                    None => true,
                    Some((_, best_fitness)) => {
                        objective.compare(&fitness, best_fitness) == Ordering::Less
                    }
                };
                if improves {
                    best = Some((child, fitness));
                }
            }
        }

        let child = match best {
            Some((child, _)) => child,
            // No valid offspring: materialize the unchanged E_A.
            None => norm1.clone(),
        };

        let child = match shape {
            Shape::Closed => child,
            Shape::Open => Tour::rebased(&child, None)?,
            Shape::FixedEnd(l) => {
                let mut sequence: Vec<usize> = child.iter().collect();
                sequence.push(l);
                Tour::new(&sequence, Some(l))?
            }
        };
        let fitness = objective.calculate(problem, &child);

        tracing::debug!(name = %self.name, generated, "crossover finished");
        Ok((child, fitness))
    }
}

/// Converts both parents to the canonical closed, free-endpoint form.
fn normalize_parents(
    parent1: &Tour,
    parent2: &Tour,
    first: usize,
    shape: Shape,
) -> Result<(Tour, Tour), OperatorError> {
    match shape {
        Shape::Closed => Ok((parent1.clone(), parent2.clone())),
        Shape::Open => {
            tracing::warn!("open problem converted to closed for edge assembly crossover");
            Ok((
                Tour::rebased(parent1, Some(first))?,
                Tour::rebased(parent2, Some(first))?,
            ))
        }
        Shape::FixedEnd(l) => {
            tracing::warn!(
                last = l,
                "fixed-endpoint problem converted to closed for edge assembly crossover"
            );
            let strip = |parent: &Tour| -> Result<Tour, OperatorError> {
                let sequence: Vec<usize> = parent.iter().filter(|&c| c != l).collect();
                Ok(Tour::new(&sequence, Some(first))?)
            };
            Ok((strip(parent1)?, strip(parent2)?))
        }
    }
}

/// Merges the donor's sub-tours into a single cycle with 2-opt exchanges.
///
/// While more than one cycle remains, the smallest one is merged into
/// another by the exchange with the smallest weight delta; candidates come
/// from the nearest forward neighbours when enabled, or from a scan over the
/// first parent's customers.
fn reconnect<P: TourProblem>(problem: &P, parent: &Tour, donor: &mut AsymmetricCycles, nn: bool) {
    while donor.cycle_count() > 1 {
        let sub_start = {
            let (&start, _) = donor
                .cycles()
                .iter()
                .min_by_key(|entry| *entry.1)
                .expect("more than one cycle remains");
            start
        };
        let sub: Vec<usize> = donor.cycle_vertices(sub_start).collect();
        let mut ignore = vec![false; donor.capacity()];
        for &v in &sub {
            ignore[v] = true;
        }

        // (delta, from1, to1, from2, to2)
        let mut best: Option<(f64, usize, usize, usize, usize)> = None;

        if nn {
            for &from in &sub {
                let Some(to) = donor.next_of(from) else { continue };
                for &near in problem.nearest_neighbours_forward(NN_WIDTH, from) {
                    if ignore[near] {
                        continue;
                    }
                    let Some(near_to) = donor.next_of(near) else { continue };
                    if ignore[near_to] {
                        continue;
                    }
                    let delta = problem.weight(from, near_to) + problem.weight(near, to)
                        - problem.weight(from, to)
                        - problem.weight(near, near_to);
                    if best.is_none_or(|(d, ..)| delta < d) {
                        best = Some((delta, from, to, near, near_to));
                    }
                }
            }
        }

        if best.is_none() {
            let from = sub_start;
            let Some(to) = donor.next_of(from) else { break };
            for c in parent.iter() {
                if ignore[c] {
                    continue;
                }
                let Some(c_to) = donor.next_of(c) else { continue };
                if ignore[c_to] {
                    continue;
                }
                let delta = problem.weight(from, c_to) + problem.weight(c, to)
                    - problem.weight(from, to)
                    - problem.weight(c, c_to);
                if best.is_none_or(|(d, ..)| delta < d) {
                    best = Some((delta, from, to, c, c_to));
                }
            }
        }

        let Some((_, from1, to1, from2, to2)) = best else {
            break;
        };
        donor.add_edge(from1, to2);
        donor.add_edge(from2, to1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TspProblem;
    use crate::objective::TspObjective;
    use crate::weights::WeightMatrix;

    fn circle_problem(n: usize, last: Option<usize>) -> TspProblem {
        let points: Vec<(f64, f64)> = (0..n)
            .map(|i| {
                let angle = i as f64 * std::f64::consts::TAU / n as f64;
                (angle.cos(), angle.sin())
            })
            .collect();
        TspProblem::new(0, last, WeightMatrix::from_coordinates(&points)).unwrap()
    }

    fn tsp_fitness(problem: &TspProblem, tour: &Tour) -> f64 {
        TspObjective.calculate(problem, tour)
    }

    fn assert_permutation(tour: &Tour, customers: &[usize]) {
        let mut visited: Vec<usize> = tour.iter().collect();
        visited.sort_unstable();
        let mut expected = customers.to_vec();
        expected.sort_unstable();
        assert_eq!(visited, expected);
    }

    #[test]
    fn test_closed_five_node_child_not_worse_than_parents() {
        let problem = circle_problem(5, Some(0));
        let p1 = Tour::new(&[0, 1, 2, 3, 4], Some(0)).unwrap();
        let p2 = Tour::new(&[0, 2, 4, 1, 3], Some(0)).unwrap();

        let mut eax = EaxOperator::new(SelectionStrategy::SingleRandom, 1, false, 1234);
        let (child, fitness) = eax.apply(&problem, &TspObjective, &p1, &p2).unwrap();

        assert_eq!(child.count(), 5);
        assert_eq!(child.first(), 0);
        assert!(child.is_closed());
        assert_permutation(&child, &[0, 1, 2, 3, 4]);

        let worst_parent = tsp_fitness(&problem, &p1).max(tsp_fitness(&problem, &p2));
        assert!(fitness <= worst_parent + 1e-10);
    }

    #[test]
    fn test_open_problem_is_normalized_and_reopened() {
        let mut weights = WeightMatrix::new(4);
        for from in 0..4 {
            for to in 0..4 {
                if from != to {
                    weights.set(from, to, 1.0);
                }
            }
        }
        weights.set(0, 3, 10.0);
        weights.set(3, 0, 10.0);
        let problem = TspProblem::new(0, None, weights).unwrap();

        let p1 = Tour::new(&[0, 1, 2, 3], None).unwrap();
        let p2 = Tour::new(&[0, 2, 1, 3], None).unwrap();

        let mut eax = EaxOperator::new(SelectionStrategy::SingleRandom, 1, false, 7);
        let (child, _) = eax.apply(&problem, &TspObjective, &p1, &p2).unwrap();

        assert_eq!(child.first(), 0);
        assert_eq!(child.last(), None);
        assert_eq!(child.count(), 4);
        assert_permutation(&child, &[0, 1, 2, 3]);
        // Open tour: no closing pair.
        assert_eq!(child.pairs().count(), 3);
    }

    #[test]
    fn test_fixed_endpoint_is_stripped_and_reappended() {
        let problem = circle_problem(5, Some(4));
        let p1 = Tour::new(&[0, 1, 2, 3, 4], Some(4)).unwrap();
        let p2 = Tour::new(&[0, 2, 1, 3, 4], Some(4)).unwrap();

        let mut eax = EaxOperator::new(SelectionStrategy::SingleRandom, 1, false, 99);
        let (child, _) = eax.apply(&problem, &TspObjective, &p1, &p2).unwrap();

        assert_eq!(child.count(), 5);
        assert_eq!(child.first(), 0);
        assert_eq!(child.last(), Some(4));
        assert_eq!(child.iter().last(), Some(4));
        assert_permutation(&child, &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_identical_parents_return_parent_edges() {
        let problem = circle_problem(4, Some(0));
        let p1 = Tour::new(&[0, 1, 2, 3], Some(0)).unwrap();
        let p2 = p1.clone();

        let mut eax = EaxOperator::with_seed(5);
        let (child, _) = eax.apply(&problem, &TspObjective, &p1, &p2).unwrap();

        assert_eq!(
            child.pairs().collect::<Vec<_>>(),
            p1.pairs().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_fallback_on_open_identical_parents_reopens() {
        // No AB-cycles exist, so the E_A fallback runs and must still pass
        // through the reverse shape conversion.
        let problem = circle_problem(4, None);
        let p1 = Tour::new(&[0, 1, 2, 3], None).unwrap();
        let p2 = p1.clone();

        let mut eax = EaxOperator::with_seed(5);
        let (child, _) = eax.apply(&problem, &TspObjective, &p1, &p2).unwrap();

        assert_eq!(child, p1);
    }

    #[test]
    fn test_determinism_same_seed_same_child() {
        let problem = circle_problem(8, Some(0));
        let p1 = Tour::new(&[0, 1, 2, 3, 4, 5, 6, 7], Some(0)).unwrap();
        let p2 = Tour::new(&[0, 3, 6, 1, 4, 7, 2, 5], Some(0)).unwrap();

        let run = |seed| {
            let mut eax = EaxOperator::new(SelectionStrategy::MultipleRandom, 10, true, seed);
            eax.apply(&problem, &TspObjective, &p1, &p2).unwrap()
        };
        let (child_a, fitness_a) = run(321);
        let (child_b, fitness_b) = run(321);
        assert_eq!(child_a.iter().collect::<Vec<_>>(), child_b.iter().collect::<Vec<_>>());
        assert_eq!(fitness_a, fitness_b);
    }

    #[test]
    fn test_multiple_random_produces_valid_permutation() {
        let problem = circle_problem(8, Some(0));
        let p1 = Tour::new(&[0, 1, 2, 3, 4, 5, 6, 7], Some(0)).unwrap();
        let p2 = Tour::new(&[0, 2, 4, 6, 1, 3, 5, 7], Some(0)).unwrap();

        let mut eax = EaxOperator::new(SelectionStrategy::MultipleRandom, 8, true, 42);
        let (child, _) = eax.apply(&problem, &TspObjective, &p1, &p2).unwrap();

        assert!(child.is_closed());
        assert_permutation(&child, &[0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_neighbour_guidance_matches_permutation_invariant() {
        let problem = circle_problem(9, Some(0));
        let p1 = Tour::new(&[0, 1, 2, 3, 4, 5, 6, 7, 8], Some(0)).unwrap();
        let p2 = Tour::new(&[0, 4, 8, 3, 7, 2, 6, 1, 5], Some(0)).unwrap();

        for nn in [false, true] {
            let mut eax = EaxOperator::new(SelectionStrategy::SingleRandom, 5, nn, 77);
            let (child, fitness) = eax.apply(&problem, &TspObjective, &p1, &p2).unwrap();
            assert_permutation(&child, &[0, 1, 2, 3, 4, 5, 6, 7, 8]);
            assert!(fitness > 0.0);
        }
    }

    #[test]
    fn test_name_encodes_configuration() {
        let sr = EaxOperator::new(SelectionStrategy::SingleRandom, 30, false, 0);
        assert_eq!(sr.name(), "EAX_(SR30)");
        let sr_nn = EaxOperator::new(SelectionStrategy::SingleRandom, 30, true, 0);
        assert_eq!(sr_nn.name(), "EAX_(SR30_NN)");
        let mr = EaxOperator::new(SelectionStrategy::MultipleRandom, 5, false, 0);
        assert_eq!(mr.name(), "EAX_(MR5)");
        let mr_nn = EaxOperator::new(SelectionStrategy::MultipleRandom, 5, true, 0);
        assert_eq!(mr_nn.name(), "EAX_(MR5_NN)");
    }

    #[test]
    fn test_precondition_violation_on_endpoint_mismatch() {
        let problem = circle_problem(4, Some(0));
        let closed = Tour::new(&[0, 1, 2, 3], Some(0)).unwrap();
        let open = Tour::new(&[0, 1, 2, 3], None).unwrap();

        let mut eax = EaxOperator::with_seed(5);
        let err = eax
            .apply(&problem, &TspObjective, &closed, &open)
            .unwrap_err();
        assert_eq!(
            err,
            OperatorError::PreconditionViolation {
                parent: None,
                problem: Some(0),
            }
        );
    }
}
