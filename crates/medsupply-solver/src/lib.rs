//! Allocation of medical supplies from supply centers to hospitals.
//!
//! The default plan is built with the North-West Corner rule, which fills
//! the shipment matrix from the top-left cell without looking at costs. An
//! opt-in MODI pass improves that plan towards minimum transport cost.

mod allocator;
mod modi;
mod northwest;
mod problem;
mod solution;

pub use allocator::{solve, Allocator};
pub use problem::{InvalidInputError, ProblemSpec};
pub use solution::{
    total_cost, AllocationResult, DemandStatus, Percentage, SupplyStatus, INFEASIBLE_MESSAGE,
    SUCCESS_MESSAGE,
};
