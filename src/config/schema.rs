//! Configuration schema types
//!
//! This module defines the project file structure and the closed option
//! enumerations that make up the configuration store of an export session.

use crate::domain::{ModuleName, Ocp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// QP solver used by the generated code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QpSolver {
    /// qpOASES dense active-set solver
    #[serde(rename = "qpoases")]
    QpOases,
    /// qpDUNES dual Newton strategy solver
    #[serde(rename = "qpdunes")]
    QpDunes,
    /// FORCES interior point solver
    Forces,
    /// HPMPC interior point solver
    Hpmpc,
}

impl QpSolver {
    /// All supported QP solvers
    pub const ALL: [QpSolver; 4] = [
        QpSolver::QpOases,
        QpSolver::QpDunes,
        QpSolver::Forces,
        QpSolver::Hpmpc,
    ];

    /// Upper-case name passed to the generated interfaces
    pub fn interface_name(self) -> &'static str {
        match self {
            QpSolver::QpOases => "QPOASES",
            QpSolver::QpDunes => "QPDUNES",
            QpSolver::Forces => "FORCES",
            QpSolver::Hpmpc => "HPMPC",
        }
    }
}

impl fmt::Display for QpSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QpSolver::QpOases => "qpOASES",
            QpSolver::QpDunes => "qpDUNES",
            QpSolver::Forces => "FORCES",
            QpSolver::Hpmpc => "HPMPC",
        };
        write!(f, "{name}")
    }
}

/// How the sparse QP is brought into the form solved by the QP solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SparseQpSolution {
    /// Full condensing
    FullCondensing,
    /// Partial condensing
    Condensing,
    /// Full condensing, N^2 complexity
    FullCondensingN2,
    /// Partial condensing, N^2 complexity
    CondensingN2,
    /// Block-wise condensing, N^2 complexity within each block
    BlockCondensingN2,
    /// Full condensing with factorization of the Hessian, N^2 complexity
    FullCondensingN2Factorization,
    /// No condensing, the QP solver exploits the sparsity
    SparseSolver,
}

impl SparseQpSolution {
    /// All supported solution methods
    pub const ALL: [SparseQpSolution; 7] = [
        SparseQpSolution::FullCondensing,
        SparseQpSolution::Condensing,
        SparseQpSolution::FullCondensingN2,
        SparseQpSolution::CondensingN2,
        SparseQpSolution::BlockCondensingN2,
        SparseQpSolution::FullCondensingN2Factorization,
        SparseQpSolution::SparseSolver,
    ];
}

impl fmt::Display for SparseQpSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SparseQpSolution::FullCondensing => "full_condensing",
            SparseQpSolution::Condensing => "condensing",
            SparseQpSolution::FullCondensingN2 => "full_condensing_n2",
            SparseQpSolution::CondensingN2 => "condensing_n2",
            SparseQpSolution::BlockCondensingN2 => "block_condensing_n2",
            SparseQpSolution::FullCondensingN2Factorization => {
                "full_condensing_n2_factorization"
            }
            SparseQpSolution::SparseSolver => "sparse_solver",
        };
        write!(f, "{name}")
    }
}

/// Hessian approximation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HessianApproximation {
    /// Gauss-Newton approximation of least-squares objectives
    GaussNewton,
    /// Exact Hessian of the Lagrangian
    ExactHessian,
    /// Constant Hessian
    ConstantHessian,
    /// Full BFGS update
    FullBfgsUpdate,
    /// Block-wise BFGS update
    BlockBfgsUpdate,
    /// Gauss-Newton with block-wise BFGS update
    GaussNewtonWithBlockBfgs,
}

impl HessianApproximation {
    /// All Hessian approximation modes
    pub const ALL: [HessianApproximation; 6] = [
        HessianApproximation::GaussNewton,
        HessianApproximation::ExactHessian,
        HessianApproximation::ConstantHessian,
        HessianApproximation::FullBfgsUpdate,
        HessianApproximation::BlockBfgsUpdate,
        HessianApproximation::GaussNewtonWithBlockBfgs,
    ];
}

impl fmt::Display for HessianApproximation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HessianApproximation::GaussNewton => "gauss_newton",
            HessianApproximation::ExactHessian => "exact_hessian",
            HessianApproximation::ConstantHessian => "constant_hessian",
            HessianApproximation::FullBfgsUpdate => "full_bfgs_update",
            HessianApproximation::BlockBfgsUpdate => "block_bfgs_update",
            HessianApproximation::GaussNewtonWithBlockBfgs => "gauss_newton_with_block_bfgs",
        };
        write!(f, "{name}")
    }
}

/// State discretization type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscretizationType {
    /// Single shooting
    SingleShooting,
    /// Multiple shooting
    MultipleShooting,
    /// Collocation
    Collocation,
}

impl fmt::Display for DiscretizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiscretizationType::SingleShooting => "single_shooting",
            DiscretizationType::MultipleShooting => "multiple_shooting",
            DiscretizationType::Collocation => "collocation",
        };
        write!(f, "{name}")
    }
}

/// Integration scheme of the generated integrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorType {
    /// Explicit Euler
    ExplicitEuler,
    /// Explicit midpoint rule
    Rk2,
    /// Kutta's third order method
    Rk3,
    /// Classical fourth order Runge-Kutta
    Rk4,
    /// Gauss-Legendre, 1 stage
    IrkGl2,
    /// Gauss-Legendre, 2 stages
    IrkGl4,
    /// Gauss-Legendre, 3 stages
    IrkGl6,
    /// Radau IIA, 1 stage
    IrkRiia1,
    /// Radau IIA, 2 stages
    IrkRiia3,
    /// Radau IIA, 3 stages
    IrkRiia5,
}

impl IntegratorType {
    /// All integrator types
    pub const ALL: [IntegratorType; 10] = [
        IntegratorType::ExplicitEuler,
        IntegratorType::Rk2,
        IntegratorType::Rk3,
        IntegratorType::Rk4,
        IntegratorType::IrkGl2,
        IntegratorType::IrkGl4,
        IntegratorType::IrkGl6,
        IntegratorType::IrkRiia1,
        IntegratorType::IrkRiia3,
        IntegratorType::IrkRiia5,
    ];

    /// Whether the scheme is implicit
    pub fn is_implicit(self) -> bool {
        !matches!(
            self,
            IntegratorType::ExplicitEuler
                | IntegratorType::Rk2
                | IntegratorType::Rk3
                | IntegratorType::Rk4
        )
    }
}

impl fmt::Display for IntegratorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntegratorType::ExplicitEuler => "explicit_euler",
            IntegratorType::Rk2 => "rk2",
            IntegratorType::Rk3 => "rk3",
            IntegratorType::Rk4 => "rk4",
            IntegratorType::IrkGl2 => "irk_gl2",
            IntegratorType::IrkGl4 => "irk_gl4",
            IntegratorType::IrkGl6 => "irk_gl6",
            IntegratorType::IrkRiia1 => "irk_riia1",
            IntegratorType::IrkRiia3 => "irk_riia3",
            IntegratorType::IrkRiia5 => "irk_riia5",
        };
        write!(f, "{name}")
    }
}

/// Linear solver used inside implicit integrators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LinearSolver {
    /// Gaussian elimination with partial pivoting
    #[default]
    GaussLu,
    /// Simplified Newton iterations on the transformed 3-stage IRK system (complex arithmetic)
    SimplifiedIrkNewton,
}

impl fmt::Display for LinearSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LinearSolver::GaussLu => "gauss_lu",
            LinearSolver::SimplifiedIrkNewton => "simplified_irk_newton",
        };
        write!(f, "{name}")
    }
}

impl LinearSolver {
    /// Whether the generated code needs complex arithmetic
    pub fn uses_complex_arithmetic(self) -> bool {
        self == LinearSolver::SimplifiedIrkNewton
    }
}

/// Export options of one session (the configuration store)
///
/// Every option is typed by a closed enumeration or a scalar with a default,
/// so every key holds a value before validation runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Module name used for file names and symbol prefixes
    #[serde(default)]
    pub module_name: ModuleName,

    /// QP solver
    #[serde(default = "default_qp_solver")]
    pub qp_solver: QpSolver,

    /// Sparse QP solution method
    #[serde(default = "default_sparse_qp_solution")]
    pub sparse_qp_solution: SparseQpSolution,

    /// Hessian approximation
    #[serde(default = "default_hessian_approximation")]
    pub hessian_approximation: HessianApproximation,

    /// Discretization type
    #[serde(default = "default_discretization_type")]
    pub discretization_type: DiscretizationType,

    /// Integrator type
    #[serde(default = "default_integrator_type")]
    pub integrator_type: IntegratorType,

    /// Linear solver used by implicit integrators
    #[serde(default)]
    pub linear_solver: LinearSolver,

    /// Total number of integrator steps over the horizon (default: one per interval)
    #[serde(default)]
    pub num_integrator_steps: Option<usize>,

    /// Levenberg-Marquardt regularization coefficient
    #[serde(default)]
    pub levenberg_marquardt: f64,

    /// Number of shooting intervals per block for block condensing
    #[serde(default = "default_condensing_block_size")]
    pub condensing_block_size: usize,

    /// Generate a Makefile
    #[serde(default = "default_true")]
    pub generate_makefile: bool,

    /// Generate a placeholder test file
    #[serde(default = "default_true")]
    pub generate_test_file: bool,

    /// Generate the MATLAB MEX interface
    #[serde(default)]
    pub generate_matlab_interface: bool,

    /// Generate the Simulink S-function interface
    #[serde(default)]
    pub generate_simulink_interface: bool,

    /// Use single precision arithmetic
    #[serde(default)]
    pub use_single_precision: bool,

    /// Hard-code constraint values into the generated code
    #[serde(default = "default_true")]
    pub hardcode_constraint_values: bool,

    /// Fix the initial state
    #[serde(default = "default_true")]
    pub fix_initial_state: bool,

    /// Provide the arrival cost interface
    #[serde(default)]
    pub use_arrival_cost: bool,

    /// Compute the covariance matrix of the last state estimate
    #[serde(default)]
    pub compute_covariance_matrix: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            module_name: ModuleName::default(),
            qp_solver: default_qp_solver(),
            sparse_qp_solution: default_sparse_qp_solution(),
            hessian_approximation: default_hessian_approximation(),
            discretization_type: default_discretization_type(),
            integrator_type: default_integrator_type(),
            linear_solver: LinearSolver::default(),
            num_integrator_steps: None,
            levenberg_marquardt: 0.0,
            condensing_block_size: default_condensing_block_size(),
            generate_makefile: true,
            generate_test_file: true,
            generate_matlab_interface: false,
            generate_simulink_interface: false,
            use_single_precision: false,
            hardcode_constraint_values: true,
            fix_initial_state: true,
            use_arrival_cost: false,
            compute_covariance_matrix: false,
        }
    }
}

impl ExportOptions {
    /// Validates scalar ranges
    ///
    /// Option combinations are checked by the consistency validator of the
    /// export session, not here.
    pub fn validate(&self) -> Result<(), String> {
        if !self.levenberg_marquardt.is_finite() || self.levenberg_marquardt < 0.0 {
            return Err(format!(
                "options.levenberg_marquardt must be a finite value >= 0, got {}",
                self.levenberg_marquardt
            ));
        }

        if self.num_integrator_steps == Some(0) {
            return Err("options.num_integrator_steps must be > 0".to_string());
        }

        if self.condensing_block_size == 0 {
            return Err("options.condensing_block_size must be > 0".to_string());
        }

        Ok(())
    }

    /// Effective total number of integrator steps for a horizon of length `horizon`
    pub fn integrator_steps(&self, horizon: usize) -> usize {
        self.num_integrator_steps.unwrap_or(horizon)
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Destination folder of the generated sources
    #[serde(default = "default_output_folder")]
    pub folder: String,

    /// C type used for real numbers
    #[serde(default = "default_real_type")]
    pub real_type: String,

    /// C type used for integers
    #[serde(default = "default_int_type")]
    pub int_type: String,

    /// Number of significant digits of exported numeric constants
    #[serde(default = "default_precision")]
    pub precision: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            folder: default_output_folder(),
            real_type: default_real_type(),
            int_type: default_int_type(),
            precision: default_precision(),
        }
    }
}

impl OutputConfig {
    fn validate(&self) -> Result<(), String> {
        if self.folder.trim().is_empty() {
            return Err("output.folder cannot be empty".to_string());
        }
        if self.real_type.trim().is_empty() || self.int_type.trim().is_empty() {
            return Err("output.real_type and output.int_type cannot be empty".to_string());
        }
        if !(1..=17).contains(&self.precision) {
            return Err(format!(
                "output.precision must be between 1 and 17, got {}",
                self.precision
            ));
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }
        Ok(())
    }
}

/// Main project configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// The optimal control problem to export
    pub ocp: Ocp,

    /// Export options
    #[serde(default)]
    pub options: ExportOptions,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ProjectConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.ocp.validate()?;
        self.options.validate()?;
        self.output.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_qp_solver() -> QpSolver {
    QpSolver::QpOases
}

fn default_sparse_qp_solution() -> SparseQpSolution {
    SparseQpSolution::FullCondensingN2
}

fn default_hessian_approximation() -> HessianApproximation {
    HessianApproximation::GaussNewton
}

fn default_discretization_type() -> DiscretizationType {
    DiscretizationType::MultipleShooting
}

fn default_integrator_type() -> IntegratorType {
    IntegratorType::Rk4
}

fn default_condensing_block_size() -> usize {
    1
}

fn default_output_folder() -> String {
    "export".to_string()
}

fn default_real_type() -> String {
    "real_t".to_string()
}

fn default_int_type() -> String {
    "int".to_string()
}

fn default_precision() -> usize {
    16
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
