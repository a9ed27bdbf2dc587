//! Hessian regularization for exact-Hessian solvers
//!
//! The generated routine computes a symmetric eigenvalue decomposition of one
//! stage Hessian block, replaces every eigenvalue by its absolute value
//! floored at the regularization value and multiplies the factors back.

use super::emitter::{module_substitutions, Substitutions, TemplateEmitter, TemplateKey};
use crate::domain::{GeneratorError, ModuleName, Result};
use std::path::{Path, PathBuf};

/// Eigenvalue floor of the exported regularization
pub const DEFAULT_REGULARIZATION_FLOOR: f64 = 1e-12;

/// `<module>_hessian_regularization.c`
#[derive(Debug, Clone)]
pub struct HessianRegularization {
    path: PathBuf,
    module: ModuleName,
    dim: usize,
    floor: f64,
}

impl HessianRegularization {
    pub fn new(dir: &Path, module: &ModuleName) -> Self {
        Self {
            path: dir.join(module.file_name("hessian_regularization", "c")),
            module: module.clone(),
            dim: 0,
            floor: DEFAULT_REGULARIZATION_FLOOR,
        }
    }

    /// Sets the block dimension and the eigenvalue floor
    pub fn configure(mut self, dim: usize, floor: f64) -> Self {
        self.dim = dim;
        self.floor = floor;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn substitutions(&self) -> Result<Substitutions> {
        if self.dim == 0 {
            return Err(GeneratorError::InvalidArguments(
                "Hessian regularization needs a block dimension > 0".to_string(),
            ));
        }
        if !(self.floor.is_finite() && self.floor > 0.0) {
            return Err(GeneratorError::InvalidArguments(format!(
                "Hessian regularization floor must be a positive finite value, got {}",
                self.floor
            )));
        }

        let mut substitutions = module_substitutions(&self.module);
        substitutions.insert("DIM".to_string(), self.dim.to_string());
        substitutions.insert("REGULARIZATION_VALUE".to_string(), format!("{:e}", self.floor));
        Ok(substitutions)
    }

    /// Writes the file
    ///
    /// # Errors
    ///
    /// Returns an error if the routine is not configured or cannot be written
    pub fn export(&self, emitter: &TemplateEmitter) -> Result<()> {
        let substitutions = self.substitutions()?;
        emitter.copy(
            TemplateKey::HessianRegularization,
            &self.path,
            "",
            true,
            &substitutions,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_exported_dimension_and_floor() {
        let dir = TempDir::new().unwrap();
        let module = ModuleName::default();
        let regularization = HessianRegularization::new(dir.path(), &module).configure(6, 1e-12);
        regularization.export(&TemplateEmitter::new().unwrap()).unwrap();

        let code = std::fs::read_to_string(regularization.path()).unwrap();
        assert!(regularization.path().ends_with("acado_hessian_regularization.c"));
        assert!(code.contains("#define ACADO_HESSIAN_DIM 6"));
        assert!(code.contains("#define ACADO_REGULARIZATION_FLOOR 1e-12"));
        assert!(code.contains("void acado_regularize( real_t* const hessian_block )"));
    }

    #[test]
    fn test_unconfigured_dimension_rejected() {
        let dir = TempDir::new().unwrap();
        let regularization = HessianRegularization::new(dir.path(), &ModuleName::default());
        let err = regularization.export(&TemplateEmitter::new().unwrap()).unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidArguments(_)));
        assert!(!regularization.path().exists());
    }
}
