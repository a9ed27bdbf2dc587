//! Common header synthesis
//!
//! `<module>_common.h` is the only header every generated source includes. It
//! carries the scalar typedef, the named constants of the resolved plan, the
//! variables and workspace structs collected from both collaborators and
//! the prototypes of every generated function.

use crate::adapters::traits::CodeExporter;
use crate::codegen::{render_declarations, render_functions, DataStruct, Declaration};
use crate::core::resolve::ResolvedPlan;
use crate::core::templates::emitter::codegen_notice;
use crate::domain::Result;
use std::fs;
use std::path::Path;

/// Builder of the common header of one resolved plan
#[derive(Debug, Clone, Copy)]
pub struct CommonHeader<'a> {
    plan: &'a ResolvedPlan,
    real_type: &'a str,
    int_type: &'a str,
}

impl<'a> CommonHeader<'a> {
    pub fn new(plan: &'a ResolvedPlan, real_type: &'a str, int_type: &'a str) -> Self {
        Self {
            plan,
            real_type,
            int_type,
        }
    }

    fn collaborators(&self) -> [&'a dyn CodeExporter; 2] {
        [
            self.plan.integrator() as &'a dyn CodeExporter,
            self.plan.solver() as &'a dyn CodeExporter,
        ]
    }

    fn declarations(&self, data_struct: DataStruct) -> Vec<Declaration> {
        self.collaborators()
            .iter()
            .flat_map(|c| c.data_declarations(data_struct))
            .collect()
    }

    fn render_struct(&self, out: &mut String, data_struct: DataStruct) {
        let module = &self.plan.constants().module;
        let type_name = data_struct.type_name(module);
        let members = render_declarations(&self.declarations(data_struct), self.real_type, self.int_type);

        out.push_str(&format!("typedef struct {type_name}_\n{{\n"));
        if members.is_empty() {
            out.push_str("int dummy;\n");
        } else {
            out.push_str(&format!("{members}\n"));
        }
        out.push_str(&format!("}} {type_name};\n\n"));
    }

    /// Full header text
    pub fn render(&self) -> String {
        let constants = self.plan.constants();
        let module = &constants.module;
        let guard = format!("{}_COMMON_H", module.macro_prefix());
        let scalar = if constants.single_precision { "float" } else { "double" };

        let mut out = codegen_notice("");
        out.push_str(&format!("#ifndef {guard}\n#define {guard}\n\n"));
        out.push_str("#include <math.h>\n#include <string.h>\n");
        if constants.complex_arithmetic {
            out.push_str("#include <complex.h>\n");
        }
        out.push('\n');
        out.push_str(
            "#ifndef __MATLAB__\n#ifdef __cplusplus\nextern \"C\"\n{\n#endif /* __cplusplus */\n#endif /* __MATLAB__ */\n\n",
        );

        if !matches!(self.real_type, "float" | "double") {
            out.push_str("/** Scalar type of real numbers. */\n");
            out.push_str(&format!("typedef {scalar} {};\n\n", self.real_type));
        }

        for (name, constant) in constants.header_constants() {
            out.push_str(&format!("/** {} */\n", constant.description));
            out.push_str(&format!("#define {name} {}\n", constant.value));
        }
        out.push('\n');

        self.render_struct(&mut out, DataStruct::Variables);
        self.render_struct(&mut out, DataStruct::Workspace);

        let functions: Vec<_> = self
            .collaborators()
            .iter()
            .flat_map(|c| c.function_declarations())
            .collect();
        out.push_str(&render_functions(&functions, self.real_type, self.int_type));
        out.push_str("\n\n");

        for data_struct in [DataStruct::Workspace, DataStruct::Variables] {
            out.push_str(&format!(
                "extern {} {};\n",
                data_struct.type_name(module),
                data_struct.instance_name(module)
            ));
        }

        out.push_str(
            "\n#ifndef __MATLAB__\n#ifdef __cplusplus\n} /* extern \"C\" */\n#endif /* __cplusplus */\n#endif /* __MATLAB__ */\n\n",
        );
        out.push_str(&format!("#endif /* {guard} */\n"));
        out
    }

    /// Writes the header to `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn export(&self, path: &Path) -> Result<()> {
        let contents = self.render();
        fs::write(path, &contents)?;
        tracing::debug!(path = %path.display(), bytes = contents.len(), "Exported common header");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExportOptions, IntegratorType, LinearSolver};
    use crate::core::resolve::ExportSession;
    use crate::domain::{Dimensions, LeastSquaresTerm, Objective, Ocp, WeightingMatricesType};

    fn session(options: ExportOptions) -> ExportSession {
        let ocp = Ocp::new(
            10,
            Dimensions {
                nx: 2,
                nu: 1,
                ..Dimensions::default()
            },
        )
        .with_objective(Objective {
            least_squares: Some(LeastSquaresTerm {
                ny: 3,
                weighting: WeightingMatricesType::Once,
            }),
            ..Objective::default()
        });
        ExportSession::new(ocp, options)
    }

    #[test]
    fn test_header_layout() {
        let mut session = session(ExportOptions::default());
        let plan = session.setup().unwrap();
        let header = CommonHeader::new(plan, "real_t", "int").render();

        assert!(header.contains("#ifndef ACADO_COMMON_H"));
        assert!(header.contains("typedef double real_t;"));
        assert!(header.contains("#define ACADO_N 10"));
        assert!(header.contains("#define ACADO_NX 2"));
        assert!(header.contains("typedef struct ACADOvariables_"));
        assert!(header.contains("} ACADOworkspace;"));
        assert!(header.contains("real_t x[ 22 ];"));
        assert!(header.contains("int acado_integrate("));
        assert!(header.contains("extern ACADOvariables acadoVariables;"));
        assert!(!header.contains("complex.h"));
        assert!(header.contains("extern \"C\"\n{\n"));
        assert!(header.contains("\n} /* extern \"C\" */\n"));
        assert!(!header.contains("}}"));
        assert!(header.trim_end().ends_with("#endif /* ACADO_COMMON_H */"));
    }

    #[test]
    fn test_custom_module_keeps_constant_names() {
        let mut session = session(ExportOptions {
            module_name: "quadrotor".parse().unwrap(),
            ..ExportOptions::default()
        });
        let plan = session.setup().unwrap();
        let header = CommonHeader::new(plan, "real_t", "int").render();

        assert!(header.contains("#ifndef QUADROTOR_COMMON_H"));
        assert!(header.contains("#define ACADO_N 10\n"));
        assert!(header.contains("} QUADROTORvariables;"));
        assert!(!header.contains("#define QUADROTOR_N"));
    }

    #[test]
    fn test_single_precision_typedef() {
        let mut session = session(ExportOptions {
            use_single_precision: true,
            ..ExportOptions::default()
        });
        let plan = session.setup().unwrap();
        let header = CommonHeader::new(plan, "real_t", "int").render();
        assert!(header.contains("typedef float real_t;"));

        let header = CommonHeader::new(plan, "float", "int").render();
        assert!(!header.contains("typedef float"));
        assert!(header.contains("float x[ 22 ];"));
    }

    #[test]
    fn test_complex_arithmetic_include() {
        let mut session = session(ExportOptions {
            integrator_type: IntegratorType::IrkGl6,
            linear_solver: LinearSolver::SimplifiedIrkNewton,
            ..ExportOptions::default()
        });
        let plan = session.setup().unwrap();
        let header = CommonHeader::new(plan, "real_t", "int").render();
        assert!(header.contains("#include <complex.h>"));
    }
}
