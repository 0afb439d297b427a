use std::fmt;

use crate::problem::ProblemSpec;

/// Message reported when the centers cannot cover every hospital
pub const INFEASIBLE_MESSAGE: &str =
    "Total supply is less than total demand. The problem has no feasible solution.";

/// Message reported for a completed allocation
pub const SUCCESS_MESSAGE: &str = "Optimization completed successfully";

/// The result of allocating supplies to hospitals
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AllocationResult {
    /// Units shipped, `distribution[center][hospital]`
    pub distribution: Vec<Vec<f64>>,
    /// Cost of the whole shipment plan
    pub total_cost: f64,
    pub supply_status: Vec<SupplyStatus>,
    pub demand_status: Vec<DemandStatus>,
    pub is_feasible: bool,
    pub message: String,
}

/// How much of a supply center's capacity was shipped
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SupplyStatus {
    pub center_id: usize,
    pub initial_supply: f64,
    pub remaining_supply: f64,
    pub percent_utilized: Percentage,
}

/// How much of a hospital's demand was received
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DemandStatus {
    pub hospital_id: usize,
    pub total_demand: f64,
    pub fulfilled_demand: f64,
    pub percent_fulfilled: Percentage,
}

/// A utilization or fulfillment percentage.
///
/// Rendered as text with one fractional digit (`"66.7"`), or as the bare
/// `"0"` when nothing was allocated because the problem was infeasible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Percentage {
    /// No allocation was attempted
    Unallocated,
    /// `100 * part / whole`
    Ratio(f64),
}

impl Percentage {
    /// `100 * part / whole`, with a zero `whole` reported as 0%
    pub fn of(part: f64, whole: f64) -> Self {
        if whole == 0.0 {
            Percentage::Ratio(0.0)
        } else {
            Percentage::Ratio(part / whole * 100.0)
        }
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Percentage::Unallocated => write!(f, "0"),
            Percentage::Ratio(v) => write!(f, "{}", to_fixed_one(*v)),
        }
    }
}

/// One fractional digit, rounding exact halves away from zero.
///
/// `{:.1}` alone sends exact binary ties such as `0.25` to even; a half is
/// only a tie when `v * 10` is computed without rounding error.
fn to_fixed_one(v: f64) -> String {
    let scaled = v * 10.0;
    let exact = v.mul_add(10.0, -scaled) == 0.0;
    if exact && scaled.fract().abs() == 0.5 {
        format!("{:.1}", scaled.round() / 10.0)
    } else {
        format!("{:.1}", v)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Percentage {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Percentage {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <String as serde::Deserialize>::deserialize(deserializer)?;
        if text == "0" {
            return Ok(Percentage::Unallocated);
        }
        text.parse::<f64>()
            .map(Percentage::Ratio)
            .map_err(|e| serde::de::Error::custom(format!("invalid percentage {:?}: {}", text, e)))
    }
}

impl AllocationResult {
    /// Result for a problem that cannot be satisfied: nothing is shipped
    pub fn infeasible(spec: &ProblemSpec, message: impl Into<String>) -> Self {
        let supply_status = spec
            .supplies
            .iter()
            .enumerate()
            .map(|(center_id, &supply)| SupplyStatus {
                center_id,
                initial_supply: supply,
                remaining_supply: supply,
                percent_utilized: Percentage::Unallocated,
            })
            .collect();

        let demand_status = spec
            .demands
            .iter()
            .enumerate()
            .map(|(hospital_id, &demand)| DemandStatus {
                hospital_id,
                total_demand: demand,
                fulfilled_demand: 0.0,
                percent_fulfilled: Percentage::Unallocated,
            })
            .collect();

        Self {
            distribution: vec![vec![0.0; spec.demand_count]; spec.supply_count],
            total_cost: 0.0,
            supply_status,
            demand_status,
            is_feasible: false,
            message: message.into(),
        }
    }

    /// Evaluate a shipment plan: its total cost and per-node status
    pub fn from_distribution(
        spec: &ProblemSpec,
        distribution: Vec<Vec<f64>>,
        message: impl Into<String>,
    ) -> Self {
        let total_cost = total_cost(&distribution, &spec.costs);

        let supply_status = spec
            .supplies
            .iter()
            .zip(&distribution)
            .enumerate()
            .map(|(center_id, (&supply, row))| {
                let used: f64 = row.iter().sum();
                SupplyStatus {
                    center_id,
                    initial_supply: supply,
                    remaining_supply: supply - used,
                    percent_utilized: Percentage::of(used, supply),
                }
            })
            .collect();

        let demand_status = spec
            .demands
            .iter()
            .enumerate()
            .map(|(hospital_id, &demand)| {
                let fulfilled: f64 = distribution.iter().map(|row| row[hospital_id]).sum();
                DemandStatus {
                    hospital_id,
                    total_demand: demand,
                    fulfilled_demand: fulfilled,
                    percent_fulfilled: Percentage::of(fulfilled, demand),
                }
            })
            .collect();

        Self {
            distribution,
            total_cost,
            supply_status,
            demand_status,
            is_feasible: true,
            message: message.into(),
        }
    }

    /// Units shipped in total
    pub fn total_shipped(&self) -> f64 {
        self.distribution.iter().flatten().sum()
    }
}

/// `Σ distribution[i][j] * costs[i][j]` over the whole matrix
pub fn total_cost(distribution: &[Vec<f64>], costs: &[Vec<f64>]) -> f64 {
    distribution
        .iter()
        .zip(costs)
        .flat_map(|(row, cost_row)| row.iter().zip(cost_row).map(|(q, c)| q * c))
        .sum()
}
