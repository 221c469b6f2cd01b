//! Elitist genetic algorithm over tour problems.
//!
//! # Algorithm
//!
//! Maintains a population of tours. Each generation carries the best tour
//! over unchanged, then fills the population with children: two parents are
//! picked by binary tournament, combined by the configured crossover,
//! optionally mutated by segment reversal, and optionally improved by 2-opt.
//! Improvement is skipped for non-continuous objectives, whose fitness
//! landscape must not be smoothed by weight-only local search.
//!
//! The run is fully determined by the configured seed and the crossover's
//! own random source.

use std::cmp::Ordering;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::{CrossoverOperator, Solver, SolverError};
use crate::models::{Tour, TourProblem};
use crate::objective::Objective;
use crate::operators::two_opt_improve;

/// Configuration of the genetic algorithm.
///
/// # Examples
///
/// ```
/// use eax_tsp::solver::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(20)
///     .with_max_generations(50)
///     .with_seed(7);
/// assert_eq!(config.population_size(), 20);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaConfig {
    population_size: usize,
    max_generations: usize,
    tournament_size: usize,
    mutation_probability: f64,
    improve_offspring: bool,
    seed: u64,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            max_generations: 100,
            tournament_size: 2,
            mutation_probability: 0.1,
            improve_offspring: true,
            seed: 0,
        }
    }
}

impl GaConfig {
    /// Sets the population size (minimum 2).
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size.max(2);
        self
    }

    /// Sets the number of generations.
    pub fn with_max_generations(mut self, generations: usize) -> Self {
        self.max_generations = generations;
        self
    }

    /// Sets the tournament size (minimum 1).
    pub fn with_tournament_size(mut self, size: usize) -> Self {
        self.tournament_size = size.max(1);
        self
    }

    /// Sets the per-child segment-reversal mutation probability.
    pub fn with_mutation_probability(mut self, probability: f64) -> Self {
        self.mutation_probability = probability.clamp(0.0, 1.0);
        self
    }

    /// Sets the seed of the solver's random source.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Disables 2-opt improvement of offspring.
    pub fn without_local_search(mut self) -> Self {
        self.improve_offspring = false;
        self
    }

    /// The configured population size.
    pub fn population_size(&self) -> usize {
        self.population_size
    }
}

/// Genetic algorithm solver built around a crossover operator.
///
/// Accepts any [`CrossoverOperator`]; the Edge Assembly Crossover is the
/// intended one.
#[derive(Debug)]
pub struct GaSolver<C> {
    config: GaConfig,
    crossover: C,
}

impl<C> GaSolver<C> {
    /// Creates a solver from a configuration and a crossover operator.
    pub fn new(config: GaConfig, crossover: C) -> Self {
        Self { config, crossover }
    }

    /// The configuration this solver runs with.
    pub fn config(&self) -> &GaConfig {
        &self.config
    }
}

fn best_index<P, O: Objective<P>>(population: &[(Tour, O::Fitness)], objective: &O) -> usize {
    let mut best = 0;
    for i in 1..population.len() {
        if objective.compare(&population[i].1, &population[best].1) == Ordering::Less {
            best = i;
        }
    }
    best
}

fn tournament<P, O: Objective<P>, R: Rng>(
    population: &[(Tour, O::Fitness)],
    objective: &O,
    size: usize,
    rng: &mut R,
) -> usize {
    let mut best = rng.random_range(0..population.len());
    for _ in 1..size {
        let challenger = rng.random_range(0..population.len());
        if objective.compare(&population[challenger].1, &population[best].1) == Ordering::Less {
            best = challenger;
        }
    }
    best
}

impl<P, O, C> Solver<P, O> for GaSolver<C>
where
    P: TourProblem,
    O: Objective<P>,
    C: CrossoverOperator<P, O>,
{
    fn name(&self) -> &str {
        "GA"
    }

    fn solve(&mut self, problem: &P, objective: &O) -> Result<(Tour, O::Fitness), SolverError> {
        let count = problem.count();
        let first = problem.first();
        let last = problem.last();
        let fixed_last = match last {
            Some(l) if l != first => Some(l),
            _ => None,
        };
        let middle: Vec<usize> = (0..count)
            .filter(|&c| c != first && Some(c) != fixed_last)
            .collect();

        if middle.is_empty() {
            let mut sequence = vec![first];
            sequence.extend(fixed_last);
            let tour = Tour::new(&sequence, last)?;
            let fitness = objective.calculate(problem, &tour);
            return Ok((tour, fitness));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);

        let mut population: Vec<(Tour, O::Fitness)> =
            Vec::with_capacity(self.config.population_size);
        for _ in 0..self.config.population_size {
            let mut perm = middle.clone();
            // Fisher-Yates shuffle
            for i in (1..perm.len()).rev() {
                let j = rng.random_range(0..=i);
                perm.swap(i, j);
            }
            let mut sequence = Vec::with_capacity(count);
            sequence.push(first);
            sequence.extend(&perm);
            sequence.extend(fixed_last);
            let tour = Tour::new(&sequence, last)?;
            let fitness = objective.calculate(problem, &tour);
            population.push((tour, fitness));
        }

        for generation in 0..self.config.max_generations {
            let elite = best_index(&population, objective);
            let mut next_gen = Vec::with_capacity(self.config.population_size);
            next_gen.push(population[elite].clone());

            while next_gen.len() < self.config.population_size {
                let p1 = tournament(&population, objective, self.config.tournament_size, &mut rng);
                let p2 = tournament(&population, objective, self.config.tournament_size, &mut rng);
                let (mut child, mut fitness) =
                    self.crossover
                        .apply(problem, objective, &population[p1].0, &population[p2].0)?;

                if self.config.mutation_probability > 0.0
                    && rng.random_bool(self.config.mutation_probability)
                {
                    let mut sequence: Vec<usize> = child.iter().collect();
                    let lo = 1;
                    let hi = sequence.len() - usize::from(fixed_last.is_some());
                    if hi > lo + 1 {
                        let i = rng.random_range(lo..hi - 1);
                        let j = rng.random_range(i + 1..hi);
                        sequence[i..=j].reverse();
                        child = Tour::new(&sequence, last)?;
                        fitness = objective.calculate(problem, &child);
                    }
                }

                if self.config.improve_offspring && !objective.is_non_continuous() {
                    let (improved, _) = two_opt_improve(problem, &child);
                    let improved_fitness = objective.calculate(problem, &improved);
                    if objective.compare(&improved_fitness, &fitness) == Ordering::Less {
                        child = improved;
                        fitness = improved_fitness;
                    }
                }

                next_gen.push((child, fitness));
            }

            population = next_gen;
            tracing::debug!(
                generation,
                best = ?population[best_index(&population, objective)].1,
                "generation complete"
            );
        }

        let winner = best_index(&population, objective);
        Ok(population.swap_remove(winner))
    }
}
