//! Export command implementation
//!
//! This module implements the `export` command, which writes the solver
//! sources described by a project file.

use crate::cli::commands::exit_code;
use crate::config::load_config;
use crate::core::export::ExportCoordinator;
use crate::core::resolve::ExportSession;
use crate::core::verification::verify_artifacts;
use crate::domain::ModuleName;
use crate::log_error_with_context;
use clap::Args;
use std::path::Path;

/// Arguments for the export command
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Override the destination folder
    #[arg(short, long)]
    pub output: Option<String>,

    /// Override the module name
    #[arg(long)]
    pub module_name: Option<String>,

    /// Write the export summary as JSON to this path
    #[arg(long, value_name = "PATH")]
    pub report: Option<String>,

    /// Re-hash the written artifacts after the export
    #[arg(long)]
    pub verify: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                log_error_with_context!(&e, "Failed to load configuration");
                eprintln!("❌ Failed to load configuration: {e}");
                return Ok(exit_code(&e));
            }
        };

        if let Some(folder) = &self.output {
            tracing::info!(folder = %folder, "Overriding output folder from CLI");
            config.output.folder = folder.clone();
        }

        if let Some(name) = &self.module_name {
            tracing::info!(module = %name, "Overriding module name from CLI");
            config.options.module_name = match ModuleName::new(name.clone()) {
                Ok(module) => module,
                Err(e) => {
                    eprintln!("❌ Invalid module name: {e}");
                    return Ok(2);
                }
            };
        }

        let output = config.output.clone();
        let session = ExportSession::new(config.ocp, config.options);
        let mut coordinator = ExportCoordinator::new(session)?;

        println!("🚀 Exporting to {}", output.folder);
        println!();

        let summary = match coordinator.export_code(
            Path::new(&output.folder),
            &output.real_type,
            &output.int_type,
            output.precision,
        ) {
            Ok(s) => s,
            Err(e) => {
                log_error_with_context!(&e, "Export failed");
                eprintln!("❌ Export failed: {e}");
                return Ok(exit_code(&e));
            }
        };

        println!("📊 Export Summary:");
        println!("  Module: {}", summary.module);
        println!("  Artifacts: {}", summary.artifacts.len());
        for artifact in &summary.artifacts {
            println!("    - {} ({} bytes)", artifact.path.display(), artifact.bytes);
        }
        println!("  Duration: {:.3}s", summary.duration.as_secs_f64());
        if !summary.warnings.is_empty() {
            println!();
            println!("⚠️  Warnings:");
            for warning in &summary.warnings {
                println!("  - {warning}");
            }
        }
        println!();

        if let Some(report) = &self.report {
            if let Err(e) = summary.write_report(Path::new(report)) {
                log_error_with_context!(&e, "Failed to write export report");
                eprintln!("❌ Failed to write report {report}: {e}");
                return Ok(5);
            }
            println!("📝 Report written to {report}");
        }

        if self.verify {
            let verification = verify_artifacts(&summary);
            println!("{}", verification.format_summary());
            if !verification.is_success() {
                return Ok(5);
            }
        }

        println!("✅ Export completed successfully!");
        Ok(0)
    }
}
