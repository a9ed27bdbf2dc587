//! Integrator registry
//!
//! Maps integrator types to constructors. The export session asks the
//! registry for the integrator selected in the options; types nobody
//! registered are rejected at setup time.

use crate::adapters::integrator::runge_kutta::RungeKuttaExport;
use crate::config::{IntegratorType, LinearSolver};
use crate::domain::{GeneratorError, ModuleName, Result};
use std::collections::BTreeMap;

/// Integrator constructor
pub type IntegratorCtor = fn(IntegratorType, &ModuleName, LinearSolver) -> RungeKuttaExport;

/// Registry of integrator constructors keyed by type
#[derive(Debug, Clone, Default)]
pub struct IntegratorRegistry {
    ctors: BTreeMap<IntegratorType, IntegratorCtor>,
}

impl IntegratorRegistry {
    /// Registry without any integrator
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with all built-in Runge-Kutta schemes
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for scheme in IntegratorType::ALL {
            registry.register(scheme, RungeKuttaExport::new);
        }
        registry
    }

    /// Registers (or replaces) the constructor of `scheme`
    pub fn register(&mut self, scheme: IntegratorType, ctor: IntegratorCtor) {
        self.ctors.insert(scheme, ctor);
    }

    /// Whether `scheme` can be created
    pub fn contains(&self, scheme: IntegratorType) -> bool {
        self.ctors.contains_key(&scheme)
    }

    /// Registered schemes in order
    pub fn schemes(&self) -> impl Iterator<Item = IntegratorType> + '_ {
        self.ctors.keys().copied()
    }

    /// Creates the integrator of `scheme`
    ///
    /// # Errors
    ///
    /// Returns `InvalidOption` if no constructor is registered for `scheme`
    pub fn create(
        &self,
        scheme: IntegratorType,
        module: &ModuleName,
        linear_solver: LinearSolver,
    ) -> Result<RungeKuttaExport> {
        let ctor = self.ctors.get(&scheme).ok_or_else(|| {
            GeneratorError::InvalidOption(format!("No integrator registered for type {scheme}"))
        })?;
        Ok(ctor(scheme, module, linear_solver))
    }
}
