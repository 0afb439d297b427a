use thiserror::Error;

/// A transportation problem: supply centers shipping to hospitals
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ProblemSpec {
    /// Number of supply centers
    #[cfg_attr(feature = "serde", serde(alias = "supplyCenters"))]
    pub supply_count: usize,
    /// Number of hospitals
    #[cfg_attr(feature = "serde", serde(alias = "hospitals"))]
    pub demand_count: usize,
    /// Capacity of each supply center
    pub supplies: Vec<f64>,
    /// Requirement of each hospital
    pub demands: Vec<f64>,
    /// Unit transport cost, `costs[center][hospital]`
    pub costs: Vec<Vec<f64>>,
}

/// Reasons a [`ProblemSpec`] is rejected before solving
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidInputError {
    #[error("Problem must have at least one supply center")]
    NoSupplyCenters,
    #[error("Problem must have at least one hospital")]
    NoHospitals,
    #[error("Expected {expected} supplies but got {actual}")]
    SupplyCountMismatch { expected: usize, actual: usize },
    #[error("Expected {expected} demands but got {actual}")]
    DemandCountMismatch { expected: usize, actual: usize },
    #[error("Expected {expected} cost rows but got {actual}")]
    CostRowCountMismatch { expected: usize, actual: usize },
    #[error("Cost row {row} has {actual} entries, expected {expected}")]
    CostRowLengthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Supply of center {center} must be a finite non-negative number, got {value}")]
    InvalidSupply { center: usize, value: f64 },
    #[error("Demand of hospital {hospital} must be a finite non-negative number, got {value}")]
    InvalidDemand { hospital: usize, value: f64 },
    #[error("Cost from center {center} to hospital {hospital} must be a finite non-negative number, got {value}")]
    InvalidCost {
        center: usize,
        hospital: usize,
        value: f64,
    },
}

impl ProblemSpec {
    /// Build a problem whose counts are taken from the input lengths
    pub fn new(supplies: Vec<f64>, demands: Vec<f64>, costs: Vec<Vec<f64>>) -> Self {
        Self {
            supply_count: supplies.len(),
            demand_count: demands.len(),
            supplies,
            demands,
            costs,
        }
    }

    pub fn total_supply(&self) -> f64 {
        self.supplies.iter().sum()
    }

    pub fn total_demand(&self) -> f64 {
        self.demands.iter().sum()
    }

    /// Check the problem and return the first problem found
    pub fn validate(&self) -> Result<(), InvalidInputError> {
        match self.validation_errors().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Every structural or numeric problem with the input, in a stable order
    pub fn validation_errors(&self) -> Vec<InvalidInputError> {
        let mut errors = Vec::new();

        if self.supply_count == 0 {
            errors.push(InvalidInputError::NoSupplyCenters);
        }
        if self.demand_count == 0 {
            errors.push(InvalidInputError::NoHospitals);
        }
        if self.supplies.len() != self.supply_count {
            errors.push(InvalidInputError::SupplyCountMismatch {
                expected: self.supply_count,
                actual: self.supplies.len(),
            });
        }
        if self.demands.len() != self.demand_count {
            errors.push(InvalidInputError::DemandCountMismatch {
                expected: self.demand_count,
                actual: self.demands.len(),
            });
        }
        if self.costs.len() != self.supply_count {
            errors.push(InvalidInputError::CostRowCountMismatch {
                expected: self.supply_count,
                actual: self.costs.len(),
            });
        }
        for (row, costs) in self.costs.iter().enumerate() {
            if costs.len() != self.demand_count {
                errors.push(InvalidInputError::CostRowLengthMismatch {
                    row,
                    expected: self.demand_count,
                    actual: costs.len(),
                });
            }
        }

        for (center, &value) in self.supplies.iter().enumerate() {
            if !is_quantity(value) {
                errors.push(InvalidInputError::InvalidSupply { center, value });
            }
        }
        for (hospital, &value) in self.demands.iter().enumerate() {
            if !is_quantity(value) {
                errors.push(InvalidInputError::InvalidDemand { hospital, value });
            }
        }
        for (center, row) in self.costs.iter().enumerate() {
            for (hospital, &value) in row.iter().enumerate() {
                if !is_quantity(value) {
                    errors.push(InvalidInputError::InvalidCost {
                        center,
                        hospital,
                        value,
                    });
                }
            }
        }

        errors
    }
}

fn is_quantity(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ProblemSpec {
        ProblemSpec::new(
            vec![100.0, 150.0, 200.0],
            vec![80.0, 90.0, 120.0, 160.0],
            vec![
                vec![4.0, 6.0, 8.0, 5.0],
                vec![7.0, 3.0, 4.0, 9.0],
                vec![5.0, 8.0, 3.0, 2.0],
            ],
        )
    }

    #[test]
    fn test_new_derives_counts() {
        let spec = sample();
        assert_eq!(spec.supply_count, 3);
        assert_eq!(spec.demand_count, 4);
        assert_eq!(spec.total_supply(), 450.0);
        assert_eq!(spec.total_demand(), 450.0);
        assert_eq!(spec.validate(), Ok(()));
    }

    #[test]
    fn test_empty_problem_rejected() {
        let spec = ProblemSpec::new(Vec::new(), Vec::new(), Vec::new());
        let errors = spec.validation_errors();
        assert_eq!(
            errors,
            vec![InvalidInputError::NoSupplyCenters, InvalidInputError::NoHospitals]
        );
        assert_eq!(spec.validate(), Err(InvalidInputError::NoSupplyCenters));
    }

    #[test]
    fn test_count_mismatches() {
        let mut spec = sample();
        spec.supply_count = 4;
        spec.demands.pop();

        let errors = spec.validation_errors();
        assert!(errors.contains(&InvalidInputError::SupplyCountMismatch { expected: 4, actual: 3 }));
        assert!(errors.contains(&InvalidInputError::DemandCountMismatch { expected: 4, actual: 3 }));
        assert!(errors.contains(&InvalidInputError::CostRowCountMismatch { expected: 4, actual: 3 }));
    }

    #[test]
    fn test_ragged_cost_matrix() {
        let mut spec = sample();
        spec.costs[1].push(1.0);

        assert_eq!(
            spec.validate(),
            Err(InvalidInputError::CostRowLengthMismatch {
                row: 1,
                expected: 4,
                actual: 5
            })
        );
    }

    #[test]
    fn test_negative_and_non_finite_values() {
        let mut spec = sample();
        spec.supplies[2] = -1.0;
        spec.demands[0] = f64::INFINITY;
        spec.costs[0][3] = -0.5;

        let errors = spec.validation_errors();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0], InvalidInputError::InvalidSupply { center: 2, value: -1.0 });
        assert!(matches!(errors[1], InvalidInputError::InvalidDemand { hospital: 0, .. }));
        assert_eq!(
            errors[2],
            InvalidInputError::InvalidCost { center: 0, hospital: 3, value: -0.5 }
        );
    }

    #[test]
    fn test_nan_cost_rejected() {
        let mut spec = sample();
        spec.costs[2][2] = f64::NAN;
        assert!(matches!(
            spec.validate(),
            Err(InvalidInputError::InvalidCost { center: 2, hospital: 2, .. })
        ));
    }

    #[test]
    fn test_error_messages() {
        let err = InvalidInputError::CostRowLengthMismatch { row: 0, expected: 2, actual: 3 };
        assert_eq!(err.to_string(), "Cost row 0 has 3 entries, expected 2");

        let err = InvalidInputError::InvalidSupply { center: 1, value: -5.0 };
        assert_eq!(
            err.to_string(),
            "Supply of center 1 must be a finite non-negative number, got -5"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_ui_field_names() {
        let json = r#"{
            "supplyCenters": 2,
            "hospitals": 2,
            "supplies": [10, 20],
            "demands": [15, 15],
            "costs": [[1, 2], [3, 4]]
        }"#;
        let spec: ProblemSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.supply_count, 2);
        assert_eq!(spec.demand_count, 2);
        assert_eq!(spec.costs[1], vec![3.0, 4.0]);

        let out = serde_json::to_value(&spec).unwrap();
        assert_eq!(out["supplyCount"], 2);
        assert_eq!(out["demandCount"], 2);
    }
}
