use clap::{Parser, Subcommand};
use medsupply_solver::{AllocationResult, Allocator, ProblemSpec};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "medsupply")]
#[command(about = "Allocate medical supplies from supply centers to hospitals", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a problem file and print the shipment plan
    Solve {
        /// JSON file with supplies, demands and costs
        file: PathBuf,
        /// Improve the corner plan towards minimum cost
        #[arg(short, long)]
        optimize: bool,
        /// Output format (pretty, json)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// Check a problem file for errors
    Check {
        /// The file to check
        file: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve { file, optimize, format } => {
            let spec = load_problem(&file);

            let allocator = Allocator::new().with_optimization(optimize);
            let result = match allocator.solve(&spec) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Invalid problem: {}", e);
                    std::process::exit(1);
                }
            };

            if format == "json" {
                match serde_json::to_string_pretty(&result) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error writing JSON: {}", e);
                        std::process::exit(1);
                    }
                }
            } else {
                print_plan(&result);
            }

            let code = exit_code(&result);
            if code != 0 {
                std::process::exit(code);
            }
        }
        Commands::Check { file } => {
            let spec = load_problem(&file);

            let errors = spec.validation_errors();
            if !errors.is_empty() {
                eprintln!("✗ {} has errors:", file.display());
                for e in &errors {
                    eprintln!("  {}", e);
                }
                std::process::exit(1);
            }

            let total_supply = spec.total_supply();
            let total_demand = spec.total_demand();

            println!("✓ {} is valid", file.display());
            println!("  {} supply centers", spec.supply_count);
            println!("  {} hospitals", spec.demand_count);
            println!("  total supply {:.2}", total_supply);
            println!("  total demand {:.2}", total_demand);
            println!("  {}", describe_balance(total_supply, total_demand));
        }
    }
}

/// Process exit code for a solved problem: infeasible plans fail
fn exit_code(result: &AllocationResult) -> i32 {
    if result.is_feasible { 0 } else { 1 }
}

fn describe_balance(total_supply: f64, total_demand: f64) -> String {
    if total_supply == total_demand {
        "balanced".to_string()
    } else if total_supply > total_demand {
        format!("surplus of {:.2}", total_supply - total_demand)
    } else {
        format!("shortfall of {:.2}", total_demand - total_supply)
    }
}

fn load_problem(file: &Path) -> ProblemSpec {
    let source = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            std::process::exit(1);
        }
    };

    match serde_json::from_str::<ProblemSpec>(&source) {
        Ok(spec) => {
            debug!(
                file = %file.display(),
                centers = spec.supply_count,
                hospitals = spec.demand_count,
                "loaded problem"
            );
            spec
        }
        Err(e) => {
            eprintln!("Parse error: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_plan(result: &AllocationResult) {
    if !result.is_feasible {
        println!("Status: INFEASIBLE");
        println!("{}", result.message);
        return;
    }

    println!("Status: FEASIBLE");
    println!("{}", result.message);
    println!("Total cost: {:.2}", result.total_cost);
    println!("Total shipped: {:.2}", result.total_shipped());
    println!();

    println!("Distribution:");
    let hospitals = result.distribution.first().map_or(0, |row| row.len());
    print!("  {:12}", "");
    for j in 0..hospitals {
        print!(" {:>12}", format!("Hospital {}", j + 1));
    }
    println!();
    for (i, row) in result.distribution.iter().enumerate() {
        print!("  {:12}", format!("Center {}", i + 1));
        for amount in row {
            print!(" {:12.2}", amount);
        }
        println!();
    }
    println!();

    println!("Supply centers:");
    for s in &result.supply_status {
        println!(
            "  Center {:<4} initial {:10.2}  remaining {:10.2}  ({}% utilized)",
            s.center_id + 1,
            s.initial_supply,
            s.remaining_supply,
            s.percent_utilized
        );
    }
    println!();

    println!("Hospitals:");
    for d in &result.demand_status {
        println!(
            "  Hospital {:<4} demand {:10.2}  fulfilled {:10.2}  ({}% fulfilled)",
            d.hospital_id + 1,
            d.total_demand,
            d.fulfilled_demand,
            d.percent_fulfilled
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_balance() {
        assert_eq!(describe_balance(450.0, 450.0), "balanced");
        assert_eq!(describe_balance(500.0, 450.0), "surplus of 50.00");
        assert_eq!(describe_balance(5.0, 10.5), "shortfall of 5.50");
    }

    #[test]
    fn test_exit_code_follows_feasibility() {
        let allocator = Allocator::new();

        let feasible = ProblemSpec::new(vec![10.0], vec![10.0], vec![vec![1.0]]);
        assert_eq!(exit_code(&allocator.solve(&feasible).unwrap()), 0);

        let short = ProblemSpec::new(vec![5.0], vec![10.0], vec![vec![1.0]]);
        assert_eq!(exit_code(&allocator.solve(&short).unwrap()), 1);
    }

    #[test]
    fn test_cli_parses_solve_flags() {
        let cli = Cli::try_parse_from(["medsupply", "solve", "plan.json", "--optimize", "-f", "json"]).unwrap();
        match cli.command {
            Commands::Solve { file, optimize, format } => {
                assert_eq!(file, PathBuf::from("plan.json"));
                assert!(optimize);
                assert_eq!(format, "json");
            }
            Commands::Check { .. } => panic!("expected solve"),
        }
    }
}
