//! Directed selective-TSP objective.
//!
//! # Fitness
//!
//! The composite `(customers, weight)`: a tour beats another if it visits
//! more customers, or the same number at lower weight. The weight of a
//! directed tour is the sum of the side-to-side travel weights plus one turn
//! penalty per visited vertex.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::Objective;
use crate::models::{DirectedId, StspProblem, Tour};

/// Composite fitness of a selective directed tour.
///
/// `customers` counts visited vertices (more is better); `weight` is the
/// total travel weight including turn penalties (lower is better on ties).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StspFitness {
    /// Number of visited customers.
    pub customers: i32,
    /// Total weight including turn penalties.
    pub weight: f64,
}

impl StspFitness {
    /// Creates a fitness value.
    pub fn new(customers: i32, weight: f64) -> Self {
        Self { customers, weight }
    }
}

/// Evaluates directed tours of packed [`DirectedId`] values.
///
/// # Examples
///
/// ```
/// use eax_tsp::models::{DirectedId, StspProblem, Tour};
/// use eax_tsp::objective::{Objective, StspObjective};
/// use eax_tsp::weights::WeightMatrix;
///
/// // Two vertices, all side-to-side weights 1.
/// let weights = WeightMatrix::from_data(4, vec![1.0; 16]).unwrap();
/// let problem = StspProblem::new(0, None, weights, [0.0, 2.0, 2.0, 5.0], f64::INFINITY).unwrap();
///
/// let tour = Tour::new(
///     &[DirectedId::new(0, 0).raw(), DirectedId::new(1, 1).raw()],
///     None,
/// )
/// .unwrap();
///
/// let fitness = StspObjective.calculate(&problem, &tour);
/// assert_eq!(fitness.customers, 2);
/// assert!((fitness.weight - (1.0 + 0.0 + 2.0)).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct StspObjective;

impl Objective<StspProblem> for StspObjective {
    type Fitness = StspFitness;

    fn name(&self) -> &str {
        "STSP"
    }

    fn zero(&self) -> StspFitness {
        StspFitness::new(0, 0.0)
    }

    fn infinite(&self) -> StspFitness {
        StspFitness::new(i32::MIN, f64::MAX)
    }

    fn is_zero(&self, fitness: &StspFitness) -> bool {
        fitness.customers == 0 && fitness.weight == 0.0
    }

    fn add(&self, a: &StspFitness, b: &StspFitness) -> StspFitness {
        StspFitness::new(a.customers + b.customers, a.weight + b.weight)
    }

    fn subtract(&self, a: &StspFitness, b: &StspFitness) -> StspFitness {
        StspFitness::new(a.customers - b.customers, a.weight - b.weight)
    }

    fn compare(&self, a: &StspFitness, b: &StspFitness) -> Ordering {
        // More customers beats fewer; weight only breaks ties.
        b.customers
            .cmp(&a.customers)
            .then_with(|| a.weight.partial_cmp(&b.weight).expect("weight should not be NaN"))
    }

    fn calculate(&self, problem: &StspProblem, tour: &Tour) -> StspFitness {
        let mut weight = 0.0;
        let mut first_arrival = 0;
        let mut previous_departure = None;

        for raw in tour.iter() {
            let directed = DirectedId::from_raw(raw);
            let (_, _, _, turn) = directed.extract_all();
            match previous_departure {
                None => first_arrival = directed.arrival_weight_id(),
                Some(dep) => weight += problem.weight(dep, directed.arrival_weight_id()),
            }
            weight += problem.turn_penalties()[turn as usize];
            previous_departure = Some(directed.departure_weight_id());
        }

        if tour.is_closed() {
            if let Some(dep) = previous_departure {
                weight += problem.weight(dep, first_arrival);
            }
        }

        StspFitness::new(tour.count() as i32, weight)
    }
}
