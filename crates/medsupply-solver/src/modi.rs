//! Cost improvement of a corner plan with the modified distribution (MODI)
//! method: row/column potentials price every empty cell, and flow is pushed
//! around the stepping-stone cycle of the most negative one until no empty
//! cell would lower the cost.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::northwest::north_west_corner;
use crate::problem::ProblemSpec;

/// Outcome of the improvement pass
#[derive(Debug, Clone)]
pub(crate) struct Improvement {
    /// Improved plan over the real hospitals only
    pub distribution: Vec<Vec<f64>>,
    /// Number of pivots performed
    pub iterations: usize,
    /// Whether every reduced cost ended non-negative
    pub converged: bool,
}

/// Balanced transportation tableau with its current basis
struct Tableau {
    costs: Vec<Vec<f64>>,
    flow: Vec<Vec<f64>>,
    basic: Vec<Vec<bool>>,
    rows: usize,
    cols: usize,
}

/// Improve the North-West Corner plan for `spec`.
///
/// Expects `total_supply >= total_demand`; any surplus is parked on a
/// zero-cost dummy hospital that is dropped from the returned plan.
pub(crate) fn improve(spec: &ProblemSpec, max_iterations: usize, tolerance: f64) -> Improvement {
    let hospitals = spec.demand_count;
    let surplus = spec.total_supply() - spec.total_demand();

    let mut demands = spec.demands.clone();
    let mut costs = spec.costs.clone();
    if surplus > tolerance {
        demands.push(surplus);
        for row in &mut costs {
            row.push(0.0);
        }
    }

    let plan = north_west_corner(&spec.supplies, &demands);
    let mut tableau = Tableau::new(costs, plan.distribution, &plan.visited);
    tableau.complete_basis();

    let mut iterations = 0;
    let mut converged = false;
    while iterations < max_iterations {
        let Some((u, v)) = tableau.potentials() else {
            break;
        };
        let Some((i, j, reduced)) = tableau.entering_cell(&u, &v) else {
            converged = true;
            break;
        };
        if reduced >= -tolerance {
            converged = true;
            break;
        }
        if !tableau.pivot(i, j) {
            break;
        }
        iterations += 1;
        trace!(center = i, hospital = j, reduced, iterations, "pivot");
    }

    debug!(iterations, converged, "improvement pass finished");

    let distribution = tableau
        .flow
        .into_iter()
        .map(|mut row| {
            row.truncate(hospitals);
            row
        })
        .collect();

    Improvement {
        distribution,
        iterations,
        converged,
    }
}

impl Tableau {
    fn new(costs: Vec<Vec<f64>>, flow: Vec<Vec<f64>>, visited: &[(usize, usize)]) -> Self {
        let rows = flow.len();
        let cols = flow.first().map_or(0, |r| r.len());
        let mut basic = vec![vec![false; cols]; rows];
        for &(i, j) in visited {
            basic[i][j] = true;
        }
        Self {
            costs,
            flow,
            basic,
            rows,
            cols,
        }
    }

    /// Node index of a column in the row/column bipartite graph
    fn col_node(&self, j: usize) -> usize {
        self.rows + j
    }

    /// Add zero-flow cells until the basis spans all rows and columns.
    ///
    /// Cheapest cells are tried first; a cell is only added when it joins two
    /// components, so the basis stays a tree.
    fn complete_basis(&mut self) {
        let mut components = DisjointSet::new(self.rows + self.cols);
        let mut size = 0;
        for i in 0..self.rows {
            for j in 0..self.cols {
                if self.basic[i][j] && components.union(i, self.col_node(j)) {
                    size += 1;
                }
            }
        }

        let target = self.rows + self.cols - 1;
        if size == target {
            return;
        }

        let mut candidates: Vec<(usize, usize)> = (0..self.rows)
            .flat_map(|i| (0..self.cols).map(move |j| (i, j)))
            .filter(|&(i, j)| !self.basic[i][j])
            .collect();
        candidates.sort_by(|a, b| self.costs[a.0][a.1].total_cmp(&self.costs[b.0][b.1]));

        for (i, j) in candidates {
            if size == target {
                break;
            }
            if components.union(i, self.col_node(j)) {
                self.basic[i][j] = true;
                size += 1;
            }
        }
        trace!(size, target, "basis completed");
    }

    /// Solve `u[i] + v[j] = cost[i][j]` over basic cells with `u[0] = 0`
    fn potentials(&self) -> Option<(Vec<f64>, Vec<f64>)> {
        let mut u: Vec<Option<f64>> = vec![None; self.rows];
        let mut v: Vec<Option<f64>> = vec![None; self.cols];
        u[0] = Some(0.0);

        let mut queue = VecDeque::from([0]);
        while let Some(node) = queue.pop_front() {
            if node < self.rows {
                let ui = u[node]?;
                for j in 0..self.cols {
                    if self.basic[node][j] && v[j].is_none() {
                        v[j] = Some(self.costs[node][j] - ui);
                        queue.push_back(self.col_node(j));
                    }
                }
            } else {
                let j = node - self.rows;
                let vj = v[j]?;
                for i in 0..self.rows {
                    if self.basic[i][j] && u[i].is_none() {
                        u[i] = Some(self.costs[i][j] - vj);
                        queue.push_back(i);
                    }
                }
            }
        }

        let u = u.into_iter().collect::<Option<Vec<_>>>()?;
        let v = v.into_iter().collect::<Option<Vec<_>>>()?;
        Some((u, v))
    }

    /// Non-basic cell with the most negative reduced cost, if any non-basic cell exists
    fn entering_cell(&self, u: &[f64], v: &[f64]) -> Option<(usize, usize, f64)> {
        let mut best: Option<(usize, usize, f64)> = None;
        for i in 0..self.rows {
            for j in 0..self.cols {
                if self.basic[i][j] {
                    continue;
                }
                let reduced = self.costs[i][j] - u[i] - v[j];
                if best.is_none_or(|(_, _, r)| reduced < r) {
                    best = Some((i, j, reduced));
                }
            }
        }
        best
    }

    /// Basic cells on the tree path from column `j` to row `i`, starting at column `j`
    fn tree_path(&self, i: usize, j: usize) -> Option<Vec<(usize, usize)>> {
        let nodes = self.rows + self.cols;
        let start = self.col_node(j);
        let mut parent: Vec<Option<usize>> = vec![None; nodes];
        let mut seen = vec![false; nodes];
        seen[start] = true;

        let mut queue = VecDeque::from([start]);
        while let Some(node) = queue.pop_front() {
            if node == i {
                break;
            }
            let neighbours: Vec<usize> = if node < self.rows {
                (0..self.cols)
                    .filter(|&c| self.basic[node][c])
                    .map(|c| self.col_node(c))
                    .collect()
            } else {
                let c = node - self.rows;
                (0..self.rows).filter(|&r| self.basic[r][c]).collect()
            };
            for next in neighbours {
                if !seen[next] {
                    seen[next] = true;
                    parent[next] = Some(node);
                    queue.push_back(next);
                }
            }
        }

        if !seen[i] {
            return None;
        }

        let mut cells = Vec::new();
        let mut node = i;
        while node != start {
            let prev = parent[node]?;
            let cell = if node < self.rows {
                (node, prev - self.rows)
            } else {
                (prev, node - self.rows)
            };
            cells.push(cell);
            node = prev;
        }
        cells.reverse();
        Some(cells)
    }

    /// Bring `(i, j)` into the basis, shifting flow around its cycle
    fn pivot(&mut self, i: usize, j: usize) -> bool {
        let Some(path) = self.tree_path(i, j) else {
            return false;
        };

        // Path cells alternate donor (even index) and receiver (odd index).
        let Some(&(li, lj)) = path
            .iter()
            .step_by(2)
            .min_by(|a, b| self.flow[a.0][a.1].total_cmp(&self.flow[b.0][b.1]))
        else {
            return false;
        };
        let theta = self.flow[li][lj];

        self.flow[i][j] += theta;
        for (k, &(r, c)) in path.iter().enumerate() {
            if k % 2 == 0 {
                self.flow[r][c] -= theta;
            } else {
                self.flow[r][c] += theta;
            }
        }
        self.flow[li][lj] = 0.0;
        self.basic[li][lj] = false;
        self.basic[i][j] = true;
        true
    }
}

/// Union-find over the row/column nodes of the tableau
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merge the sets of `a` and `b`; false if they were already joined
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        self.parent[ra] = rb;
        true
    }
}
