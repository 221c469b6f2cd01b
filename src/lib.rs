//! # eax-tsp
//!
//! A family of Traveling Salesman Problem solvers centered on the Edge
//! Assembly Crossover (EAX) genetic operator, with a turn-aware directed
//! Selective-TSP driver.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Tour, DirectedId, TimeWindow, problem instances)
//! - [`weights`] — Dense, possibly asymmetric weight matrix
//! - [`cycles`] — Cycle structures backing the crossover (AsymmetricCycles, AB-cycles)
//! - [`objective`] — Fitness algebra for TSP, TSP-TW, and directed STSP
//! - [`operators`] — Edge Assembly Crossover and 2-opt improvement
//! - [`solver`] — Solver/operator contracts and the genetic algorithm
//! - [`constructive`] — Constructive heuristics (directed greedy)
//! - [`router`] — Driver wiring a weight-matrix collaborator to the solvers

pub mod constructive;
pub mod cycles;
pub mod models;
pub mod objective;
pub mod operators;
pub mod router;
pub mod solver;
pub mod weights;
