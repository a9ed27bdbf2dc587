//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! project file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the project file
    #[arg(short, long, default_value = "ocpgen.toml")]
    pub output: String,

    /// Include every option with its default value and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing project file");

        println!("📝 Initializing ocpgen project");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Project file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, content) {
            Ok(_) => {
                println!("✅ Project file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Describe your problem in the [ocp] section of {}", self.output);
                println!("  2. Validate it: ocpgen validate-config");
                println!("  3. Inspect the resolved plan: ocpgen plan --constants");
                println!("  4. Export the solver: ocpgen export");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write project file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Generate a minimal project file
    fn generate_minimal_config() -> String {
        r#"# ocpgen project file

[ocp]
horizon = 20

[ocp.dimensions]
nx = 4
nu = 1

[ocp.objective.least_squares]
ny = 5

[ocp.objective.terminal_least_squares]
ny = 4

[options]
module_name = "acado"
qp_solver = "qpoases"
sparse_qp_solution = "full_condensing_n2"
hessian_approximation = "gauss_newton"
integrator_type = "rk4"

[output]
folder = "export"
"#
        .to_string()
    }

    /// Generate a project file documenting every option
    fn generate_config_with_examples() -> String {
        r#"# ocpgen project file
# Describes one optimal control problem and how its solver is exported.

# ============================================================================
# Application
# ============================================================================
[application]
# trace | debug | info | warn | error
log_level = "info"

# ============================================================================
# Optimal control problem
# ============================================================================
[ocp]
# Number of control intervals
horizon = 20

[ocp.dimensions]
nx = 4      # differential states
ndx = 0     # state derivatives (0 or nx for implicit models)
nxa = 0     # algebraic states
nu = 1      # controls
nod = 0     # online data

[ocp.grid]
start = 0.0
end = 1.0
# points = [0.0, 0.05, ...]   # horizon + 1 explicit grid points

[ocp.model]
rhs_function = "acado_rhs"
# discretized = false

[ocp.objective]
# mayer_terms = 0      # general terms need hessian_approximation = "exact_hessian"
# lagrange_terms = 0
linear_terms = false

[ocp.objective.least_squares]
ny = 5
# empty | once | once_per_node
weighting = "once"

[ocp.objective.terminal_least_squares]
ny = 4
weighting = "once"

[ocp.constraints]
bounded_controls = 1
bounded_states = 0
path_constraints = 0
point_constraints = 0

# ============================================================================
# Export options
# ============================================================================
[options]
module_name = "acado"

# qpoases | qpdunes | forces | hpmpc
qp_solver = "qpoases"

# full_condensing | condensing | full_condensing_n2 | condensing_n2
# block_condensing_n2 | full_condensing_n2_factorization | sparse_solver
sparse_qp_solution = "full_condensing_n2"

# gauss_newton | exact_hessian
hessian_approximation = "gauss_newton"

# single_shooting | multiple_shooting
discretization_type = "multiple_shooting"

# explicit_euler | rk2 | rk3 | rk4
# irk_gl2 | irk_gl4 | irk_gl6 | irk_riia1 | irk_riia3 | irk_riia5
integrator_type = "rk4"

# gauss_lu | simplified_irk_newton
linear_solver = "gauss_lu"

# num_integrator_steps = 20
levenberg_marquardt = 0.0
condensing_block_size = 1

generate_makefile = true
generate_test_file = true
generate_matlab_interface = false
generate_simulink_interface = false

use_single_precision = false
hardcode_constraint_values = true
fix_initial_state = true
use_arrival_cost = false
compute_covariance_matrix = false

# ============================================================================
# Output
# ============================================================================
[output]
# Supports ${VAR} substitution
folder = "export"
real_type = "real_t"
int_type = "int"
precision = 16

# ============================================================================
# Logging
# ============================================================================
[logging]
local_enabled = false
local_path = "logs"
# daily | hourly | never
local_rotation = "daily"
"#
        .to_string()
    }
}
