//! North-West Corner construction of an initial shipment plan.
//!
//! The plan is filled greedily from the top-left cell and never looks at
//! costs, so it is feasible but usually not cheap.

use tracing::trace;

/// A plan built by the North-West Corner rule
#[derive(Debug, Clone)]
pub(crate) struct CornerPlan {
    /// Units shipped, `distribution[center][hospital]`
    pub distribution: Vec<Vec<f64>>,
    /// Cells assigned a quantity, in visiting order (may include zero quantities)
    pub visited: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Row,
    Column,
    Diagonal,
    Done,
}

/// Pick the next cell after `(i, j)` has been filled
fn next_step(supply_done: bool, demand_done: bool, last_row: bool, last_col: bool) -> Step {
    if supply_done && !demand_done && !last_row {
        Step::Row
    } else if demand_done && !supply_done && !last_col {
        Step::Column
    } else if supply_done && demand_done {
        match (last_row, last_col) {
            (false, false) => Step::Diagonal,
            (false, true) => Step::Row,
            (true, false) => Step::Column,
            (true, true) => Step::Done,
        }
    } else {
        // Cursor is pinned to the last row or column with something left over.
        Step::Done
    }
}

/// Fill the plan from the top-left corner.
///
/// Each cell is visited at most once and every iteration either advances a
/// cursor or stops, so at most `supplies.len() + demands.len() - 1` cells are
/// touched.
pub(crate) fn north_west_corner(supplies: &[f64], demands: &[f64]) -> CornerPlan {
    let rows = supplies.len();
    let cols = demands.len();

    let mut remaining_supply = supplies.to_vec();
    let mut remaining_demand = demands.to_vec();
    let mut distribution = vec![vec![0.0; cols]; rows];
    let mut visited = Vec::with_capacity((rows + cols).saturating_sub(1));

    let (mut i, mut j) = (0, 0);
    while i < rows && j < cols {
        let quantity = remaining_supply[i].min(remaining_demand[j]);
        distribution[i][j] = quantity;
        visited.push((i, j));

        remaining_supply[i] -= quantity;
        remaining_demand[j] -= quantity;

        let step = next_step(
            remaining_supply[i] == 0.0,
            remaining_demand[j] == 0.0,
            i + 1 == rows,
            j + 1 == cols,
        );
        trace!(center = i, hospital = j, quantity, ?step, "corner cell filled");

        match step {
            Step::Row => i += 1,
            Step::Column => j += 1,
            Step::Diagonal => {
                i += 1;
                j += 1;
            }
            Step::Done => break,
        }
    }

    CornerPlan {
        distribution,
        visited,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_sums(distribution: &[Vec<f64>]) -> Vec<f64> {
        distribution.iter().map(|row| row.iter().sum()).collect()
    }

    fn col_sums(distribution: &[Vec<f64>]) -> Vec<f64> {
        let cols = distribution.first().map_or(0, |r| r.len());
        (0..cols)
            .map(|j| distribution.iter().map(|row| row[j]).sum())
            .collect()
    }

    #[test]
    fn test_staircase() {
        let plan = north_west_corner(&[10.0, 10.0], &[5.0, 5.0, 5.0, 5.0]);
        assert_eq!(
            plan.distribution,
            vec![vec![5.0, 5.0, 0.0, 0.0], vec![0.0, 0.0, 5.0, 5.0]]
        );
        assert_eq!(plan.visited, vec![(0, 0), (0, 1), (1, 2), (1, 3)]);
    }

    #[test]
    fn test_default_instance() {
        let plan = north_west_corner(&[100.0, 150.0, 200.0], &[80.0, 90.0, 120.0, 160.0]);
        assert_eq!(
            plan.distribution,
            vec![
                vec![80.0, 20.0, 0.0, 0.0],
                vec![0.0, 70.0, 80.0, 0.0],
                vec![0.0, 0.0, 40.0, 160.0],
            ]
        );
        assert_eq!(plan.visited.len(), 6);
    }

    #[test]
    fn test_single_cell() {
        let plan = north_west_corner(&[7.0], &[7.0]);
        assert_eq!(plan.distribution, vec![vec![7.0]]);
        assert_eq!(plan.visited, vec![(0, 0)]);
    }

    #[test]
    fn test_single_center_many_hospitals() {
        let plan = north_west_corner(&[12.0], &[3.0, 4.0, 5.0]);
        assert_eq!(plan.distribution, vec![vec![3.0, 4.0, 5.0]]);
    }

    #[test]
    fn test_many_centers_single_hospital() {
        let plan = north_west_corner(&[3.0, 4.0, 5.0], &[12.0]);
        assert_eq!(plan.distribution, vec![vec![3.0], vec![4.0], vec![5.0]]);
    }

    #[test]
    fn test_surplus_on_last_hospital_terminates() {
        let plan = north_west_corner(&[10.0, 10.0], &[5.0]);
        assert_eq!(plan.distribution, vec![vec![5.0], vec![0.0]]);

        let plan = north_west_corner(&[5.0, 20.0], &[10.0, 5.0]);
        assert_eq!(plan.distribution, vec![vec![5.0, 0.0], vec![5.0, 5.0]]);
        assert_eq!(row_sums(&plan.distribution), vec![5.0, 10.0]);
    }

    #[test]
    fn test_surplus_spread_over_many_centers() {
        let plan = north_west_corner(&[100.0, 150.0, 200.0], &[80.0, 90.0, 120.0, 100.0]);
        assert_eq!(col_sums(&plan.distribution), vec![80.0, 90.0, 120.0, 100.0]);
        assert_eq!(row_sums(&plan.distribution), vec![100.0, 150.0, 140.0]);
    }

    #[test]
    fn test_simultaneous_exhaustion_moves_diagonally() {
        let plan = north_west_corner(&[4.0, 6.0], &[4.0, 6.0]);
        assert_eq!(plan.distribution, vec![vec![4.0, 0.0], vec![0.0, 6.0]]);
        assert_eq!(plan.visited, vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn test_simultaneous_exhaustion_on_last_column() {
        // (0,0) empties both center 0 and the only hospital; the cursor drops a row.
        let plan = north_west_corner(&[4.0, 6.0], &[4.0]);
        assert_eq!(plan.distribution, vec![vec![4.0], vec![0.0]]);
        assert_eq!(plan.visited, vec![(0, 0), (1, 0)]);
    }

    #[test]
    fn test_zero_capacity_center_is_skipped() {
        let plan = north_west_corner(&[0.0, 10.0], &[5.0, 5.0]);
        assert_eq!(plan.distribution, vec![vec![0.0, 0.0], vec![5.0, 5.0]]);
    }

    #[test]
    fn test_zero_demand_hospital_is_skipped() {
        let plan = north_west_corner(&[10.0], &[0.0, 10.0]);
        assert_eq!(plan.distribution, vec![vec![0.0, 10.0]]);
    }

    #[test]
    fn test_next_step_table() {
        assert_eq!(next_step(true, false, false, false), Step::Row);
        assert_eq!(next_step(false, true, false, false), Step::Column);
        assert_eq!(next_step(true, true, false, false), Step::Diagonal);
        assert_eq!(next_step(true, true, false, true), Step::Row);
        assert_eq!(next_step(true, true, true, false), Step::Column);
        assert_eq!(next_step(true, true, true, true), Step::Done);
        assert_eq!(next_step(false, true, false, true), Step::Done);
        assert_eq!(next_step(true, false, true, false), Step::Done);
    }
}
