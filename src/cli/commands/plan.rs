//! Plan command implementation
//!
//! Resolves the integrator and solver of a project file and prints the QP
//! dimensions and the constants of the common header. Nothing is written.

use crate::cli::commands::exit_code;
use crate::config::load_config;
use crate::core::export::TracingReporter;
use crate::core::resolve::ExportSession;
use clap::Args;

/// Arguments for the plan command
#[derive(Args, Debug, Default)]
pub struct PlanArgs {
    /// Also print the constants of the common header
    #[arg(long)]
    pub constants: bool,
}

impl PlanArgs {
    /// Execute the plan command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Resolving export plan");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load project file");
                println!("   Error: {e}");
                return Ok(exit_code(&e));
            }
        };

        let mut session = ExportSession::new(config.ocp, config.options);
        let plan = match session.setup() {
            Ok(plan) => plan,
            Err(e) => {
                println!("❌ Failed to resolve export plan");
                println!("   Error: {e}");
                return Ok(exit_code(&e));
            }
        };

        println!("📐 Export Plan");
        println!("  Integrator: {}", plan.integrator().scheme());
        println!("  Solver: {}", plan.solver().kind());
        println!();

        if self.constants {
            println!("Header constants:");
            for (name, constant) in plan.constants().header_constants() {
                println!("  {name:<32} {:<8} {}", constant.value, constant.description);
            }
            println!();
        }

        session.print_dimensions_qp(&TracingReporter);
        let constants = session.plan().map(|plan| plan.constants());
        if let Some(constants) = constants {
            println!("  QP variables: {}", constants.qp_nv);
            println!("  Path and point constraints: {}", constants.complex_constraints);
        }
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_plan_resolves_without_writing() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            "[ocp]\nhorizon = 10\n[ocp.dimensions]\nnx = 2\nnu = 1\n[ocp.objective.least_squares]\nny = 3\n[output]\nfolder = \"never_created\"\n",
        )
        .unwrap();

        let args = PlanArgs { constants: true };
        assert_eq!(args.execute(&file.path().to_string_lossy()).unwrap(), 0);
        assert!(!std::path::Path::new("never_created").exists());
    }

    #[test]
    fn test_plan_unsupported_combination() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            "[ocp]\nhorizon = 10\n[ocp.dimensions]\nnx = 2\nnu = 1\n[options]\nqp_solver = \"qpdunes\"\nsparse_qp_solution = \"full_condensing\"\n",
        )
        .unwrap();

        assert_eq!(PlanArgs::default().execute(&file.path().to_string_lossy()).unwrap(), 3);
    }
}
