use tracing::debug;

use crate::modi;
use crate::northwest::north_west_corner;
use crate::problem::{InvalidInputError, ProblemSpec};
use crate::solution::{AllocationResult, INFEASIBLE_MESSAGE, SUCCESS_MESSAGE};

/// Allocates supply-center stock to hospitals
#[derive(Debug, Clone)]
pub struct Allocator {
    /// Run the MODI improvement pass after the corner plan
    optimize: bool,
    /// Maximum pivots in the improvement pass
    max_iterations: usize,
    /// Tolerance for floating point comparisons
    tolerance: f64,
}

impl Default for Allocator {
    fn default() -> Self {
        Self {
            optimize: false,
            max_iterations: 10000,
            tolerance: 1e-9,
        }
    }
}

impl Allocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Improve the North-West Corner plan towards minimum cost.
    ///
    /// Off by default: the corner plan ignores costs, and turning this on
    /// changes which cells are used.
    pub fn with_optimization(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    /// Validate the problem and build a shipment plan for it.
    ///
    /// A problem whose total supply falls short of total demand is not an
    /// error: it yields an infeasible result with nothing shipped.
    pub fn solve(&self, spec: &ProblemSpec) -> Result<AllocationResult, InvalidInputError> {
        spec.validate()?;

        let total_supply = spec.total_supply();
        let total_demand = spec.total_demand();
        if total_supply < total_demand {
            debug!(total_supply, total_demand, "supply shortfall, nothing allocated");
            return Ok(AllocationResult::infeasible(spec, INFEASIBLE_MESSAGE));
        }

        let (distribution, message) = if self.optimize {
            let improved = modi::improve(spec, self.max_iterations, self.tolerance);
            let message = if improved.converged {
                SUCCESS_MESSAGE.to_string()
            } else {
                format!(
                    "Optimization stopped after {} iterations; the plan is feasible but may not be optimal",
                    improved.iterations
                )
            };
            (improved.distribution, message)
        } else {
            (
                north_west_corner(&spec.supplies, &spec.demands).distribution,
                SUCCESS_MESSAGE.to_string(),
            )
        };

        let result = AllocationResult::from_distribution(spec, distribution, message);
        debug!(
            centers = spec.supply_count,
            hospitals = spec.demand_count,
            optimize = self.optimize,
            total_cost = result.total_cost,
            "allocation complete"
        );
        Ok(result)
    }
}

/// Solve with the default North-West Corner allocation
pub fn solve(spec: &ProblemSpec) -> Result<AllocationResult, InvalidInputError> {
    Allocator::new().solve(spec)
}
