//! WASM bindings for the medical supply allocator
//!
//! The browser form passes the problem as a plain object
//! (`{ supplyCenters, hospitals, supplies, demands, costs }`) and renders
//! the returned allocation result as-is.

use js_sys::Array;
use medsupply_solver::{Allocator, ProblemSpec};
use wasm_bindgen::prelude::*;

/// Allocate with the North-West Corner rule and return the result object
#[wasm_bindgen]
pub fn solve(data: JsValue) -> Result<JsValue, JsValue> {
    run(data, Allocator::new())
}

/// Allocate, then improve the plan towards minimum cost
#[wasm_bindgen]
pub fn solve_optimized(data: JsValue) -> Result<JsValue, JsValue> {
    run(data, Allocator::new().with_optimization(true))
}

/// Validate a problem and return its error messages (empty when valid)
#[wasm_bindgen]
pub fn validate(data: JsValue) -> Result<Array, JsValue> {
    let spec = read_problem(data)?;
    Ok(spec
        .validation_errors()
        .iter()
        .map(|e| JsValue::from_str(&e.to_string()))
        .collect())
}

fn run(data: JsValue, allocator: Allocator) -> Result<JsValue, JsValue> {
    let spec = read_problem(data)?;
    let result = allocator
        .solve(&spec)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&result).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn read_problem(data: JsValue) -> Result<ProblemSpec, JsValue> {
    serde_wasm_bindgen::from_value(data).map_err(|e| JsValue::from_str(&e.to_string()))
}
