//! Dense linear system solvers emitted for implicit integrators
//!
//! Each implicit step solves the stage system of a simplified Newton method.
//! The first iteration factorizes the matrix in place, later iterations reuse
//! the stored LU factors and row permutation.

use crate::codegen::{ExportFile, FunctionDeclaration, Parameter, ScalarType};

/// Emitter of an LU solver for systems of one fixed dimension
#[derive(Debug, Clone, PartialEq)]
pub struct GaussElimination {
    prefix: String,
    dim: usize,
}

impl GaussElimination {
    /// Solver for `dim`-dimensional systems, symbols prefixed with `prefix`
    pub fn new(prefix: impl Into<String>, dim: usize) -> Self {
        Self {
            prefix: prefix.into(),
            dim,
        }
    }

    /// Name of the factorize-and-solve function
    pub fn solve_name(&self) -> String {
        format!("{}_solve_dim{}_system", self.prefix, self.dim)
    }

    /// Name of the solve function reusing a previous factorization
    pub fn solve_reuse_name(&self) -> String {
        format!("{}_solve_dim{}_system_reuse", self.prefix, self.dim)
    }

    fn declaration(name: String) -> FunctionDeclaration {
        FunctionDeclaration::new(name, ScalarType::Int)
            .param(Parameter::real_out("A"))
            .param(Parameter::real_out("b"))
            .param(Parameter {
                name: "rk_perm".to_string(),
                ty: ScalarType::Int,
                by_pointer: true,
                read_only: false,
            })
    }

    /// Prototypes of both functions
    pub fn function_declarations(&self) -> Vec<FunctionDeclaration> {
        vec![
            Self::declaration(self.solve_name())
                .described("Factorizes A in place and solves A x = b; x overwrites b."),
            Self::declaration(self.solve_reuse_name())
                .described("Solves A x = b with the factorization of the last solve call."),
        ]
    }

    /// Emits both functions
    pub fn emit(&self, file: &mut ExportFile) {
        let n = self.dim;
        let real = file.real_type().to_string();

        let solve = vec![
            "int i, j, k, p;".to_string(),
            format!("{real} det = 1.0;"),
            format!("{real} tmp;"),
            format!("for (i = 0; i < {n}; ++i) rk_perm[i] = i;"),
            format!("for (i = 0; i < {n}; ++i) {{"),
            "    p = i;".to_string(),
            format!("    for (j = i + 1; j < {n}; ++j)"),
            format!("        if (fabs(A[j * {n} + i]) > fabs(A[p * {n} + i])) p = j;"),
            "    if (p != i) {".to_string(),
            format!("        for (k = 0; k < {n}; ++k) {{"),
            format!("            tmp = A[i * {n} + k]; A[i * {n} + k] = A[p * {n} + k]; A[p * {n} + k] = tmp;"),
            "        }".to_string(),
            "        tmp = b[i]; b[i] = b[p]; b[p] = tmp;".to_string(),
            "        k = rk_perm[i]; rk_perm[i] = rk_perm[p]; rk_perm[p] = k;".to_string(),
            "    }".to_string(),
            format!("    det *= A[i * {n} + i];"),
            format!("    if (A[i * {n} + i] == 0.0) return 1;"),
            format!("    for (j = i + 1; j < {n}; ++j) {{"),
            format!("        A[j * {n} + i] /= A[i * {n} + i];"),
            format!("        for (k = i + 1; k < {n}; ++k) A[j * {n} + k] -= A[j * {n} + i] * A[i * {n} + k];"),
            format!("        b[j] -= A[j * {n} + i] * b[i];"),
            "    }".to_string(),
            "}".to_string(),
            format!("for (i = {} ; i >= 0; --i) {{", n as isize - 1),
            format!("    for (j = i + 1; j < {n}; ++j) b[i] -= A[i * {n} + j] * b[j];"),
            format!("    b[i] /= A[i * {n} + i];"),
            "}".to_string(),
            "return det == 0.0;".to_string(),
        ];
        file.add_function(&Self::declaration(self.solve_name()), solve);

        let reuse = vec![
            "int i, j;".to_string(),
            format!("{real} rk_bPerm[ {n} ];"),
            format!("for (i = 0; i < {n}; ++i) rk_bPerm[i] = b[rk_perm[i]];"),
            format!("for (i = 1; i < {n}; ++i)"),
            format!("    for (j = 0; j < i; ++j) rk_bPerm[i] -= A[i * {n} + j] * rk_bPerm[j];"),
            format!("for (i = {} ; i >= 0; --i) {{", n as isize - 1),
            format!("    for (j = i + 1; j < {n}; ++j) rk_bPerm[i] -= A[i * {n} + j] * rk_bPerm[j];"),
            format!("    rk_bPerm[i] /= A[i * {n} + i];"),
            "}".to_string(),
            format!("for (i = 0; i < {n}; ++i) b[i] = rk_bPerm[i];"),
            "return 0;".to_string(),
        ];
        file.add_function(&Self::declaration(self.solve_reuse_name()), reuse);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_names() {
        let solver = GaussElimination::new("acado", 12);
        assert_eq!(solver.solve_name(), "acado_solve_dim12_system");
        assert_eq!(solver.solve_reuse_name(), "acado_solve_dim12_system_reuse");
        assert_eq!(solver.function_declarations().len(), 2);
    }

    #[test]
    fn test_emitted_code_uses_dimension_and_real_type() {
        let solver = GaussElimination::new("acado", 3);
        let mut file = ExportFile::new("/tmp/x.c", "", "float", "int", 8);
        solver.emit(&mut file);

        let code = file.contents();
        assert!(code.contains("int acado_solve_dim3_system( float* const A, float* const b, int* const rk_perm )"));
        assert!(code.contains("float rk_bPerm[ 3 ];"));
        assert!(code.contains("for (i = 2 ; i >= 0; --i)"));
    }
}
