//! Validate config command implementation
//!
//! This module implements the `validate-config` command. Besides the
//! structural checks of the loader it runs the consistency validation of the
//! problem against the export options.

use crate::config::load_config;
use crate::core::validation::check_consistency;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating project file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Project file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load project file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        if let Err(e) = check_consistency(&config.ocp, &config.options) {
            println!("❌ Problem cannot be exported with these options");
            println!("   Error: {e}");
            println!();
            return Ok(3);
        }

        let options = &config.options;
        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Module: {}", options.module_name);
        println!("  Horizon: {}", config.ocp.horizon);
        println!(
            "  States / Controls: {} / {}",
            config.ocp.dimensions.nx, config.ocp.dimensions.nu
        );
        println!("  QP Solver: {}", options.qp_solver);
        println!("  QP Solution: {}", options.sparse_qp_solution);
        println!("  Hessian Approximation: {}", options.hessian_approximation);
        println!("  Integrator: {}", options.integrator_type);
        println!("  Output Folder: {}", config.output.folder);
        println!();
        Ok(0)
    }
}
