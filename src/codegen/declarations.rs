//! Data and function declarations of generated C code
//!
//! Declarations are collected from the integrator and solver collaborators and
//! rendered into the common header. Scalar types are symbolic until rendering
//! so one set of declarations serves both single and double precision exports.

use crate::domain::ModuleName;
use serde::Serialize;

/// Visibility class of generated data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DataStruct {
    /// Externally addressable solver state
    Variables,
    /// Internal scratch memory
    Workspace,
}

impl DataStruct {
    fn suffix(self) -> &'static str {
        match self {
            DataStruct::Variables => "variables",
            DataStruct::Workspace => "workspace",
        }
    }

    /// C type of the struct, e.g. `ACADOworkspace`
    pub fn type_name(self, module: &ModuleName) -> String {
        format!("{}{}", module.macro_prefix(), self.suffix())
    }

    /// Global instance of the struct, e.g. `acadoWorkspace`
    pub fn instance_name(self, module: &ModuleName) -> String {
        let suffix = self.suffix();
        format!("{}{}{}", module.as_str(), suffix[..1].to_ascii_uppercase(), &suffix[1..])
    }
}

/// Scalar type of generated data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScalarType {
    /// Real number (`real_t` by default)
    Real,
    /// Integer (`int` by default)
    Int,
    /// No value, for function return types
    Void,
}

impl ScalarType {
    /// C spelling of the type
    pub fn render<'a>(self, real_type: &'a str, int_type: &'a str) -> &'a str {
        match self {
            ScalarType::Real => real_type,
            ScalarType::Int => int_type,
            ScalarType::Void => "void",
        }
    }
}

/// A matrix-shaped data declaration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Declaration {
    /// C identifier
    pub name: String,
    /// Scalar type
    pub ty: ScalarType,
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub cols: usize,
    /// Visibility class
    pub data_struct: DataStruct,
    /// Optional one-line description rendered as a comment
    pub description: Option<String>,
}

impl Declaration {
    /// Real-valued matrix declaration
    pub fn real(name: impl Into<String>, rows: usize, cols: usize, data_struct: DataStruct) -> Self {
        Self {
            name: name.into(),
            ty: ScalarType::Real,
            rows,
            cols,
            data_struct,
            description: None,
        }
    }

    /// Integer-valued matrix declaration
    pub fn int(name: impl Into<String>, rows: usize, cols: usize, data_struct: DataStruct) -> Self {
        Self {
            name: name.into(),
            ty: ScalarType::Int,
            rows,
            cols,
            data_struct,
            description: None,
        }
    }

    /// Attaches a description
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Total number of elements
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    /// Whether the declaration has no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Renders the declaration as a struct member
    pub fn render(&self, real_type: &str, int_type: &str) -> String {
        let ty = self.ty.render(real_type, int_type);
        let line = if self.len() == 1 {
            format!("{} {};", ty, self.name)
        } else {
            format!("{} {}[ {} ];", ty, self.name, self.len())
        };
        match &self.description {
            Some(description) => format!("/** {description} */\n{line}"),
            None => line,
        }
    }
}

/// A function parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// Scalar type
    pub ty: ScalarType,
    /// Passed as `T* const` instead of by value
    pub by_pointer: bool,
    /// Pointee is const
    pub read_only: bool,
}

impl Parameter {
    /// Pointer to real data that the callee may modify
    pub fn real_out(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ScalarType::Real,
            by_pointer: true,
            read_only: false,
        }
    }

    /// Pointer to real data that the callee only reads
    pub fn real_in(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ScalarType::Real,
            by_pointer: true,
            read_only: true,
        }
    }

    /// Integer passed by value
    pub fn int_value(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ScalarType::Int,
            by_pointer: false,
            read_only: false,
        }
    }

    fn render(&self, real_type: &str, int_type: &str) -> String {
        let ty = self.ty.render(real_type, int_type);
        match (self.by_pointer, self.read_only) {
            (true, true) => format!("const {}* {}", ty, self.name),
            (true, false) => format!("{}* const {}", ty, self.name),
            (false, _) => format!("{} {}", ty, self.name),
        }
    }
}

/// A function prototype
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDeclaration {
    /// C identifier
    pub name: String,
    /// Return type
    pub return_type: ScalarType,
    /// Parameters in order
    pub params: Vec<Parameter>,
    /// Optional one-line description rendered as a comment
    pub description: Option<String>,
}

impl FunctionDeclaration {
    /// Creates a prototype returning `return_type`
    pub fn new(name: impl Into<String>, return_type: ScalarType) -> Self {
        Self {
            name: name.into(),
            return_type,
            params: Vec::new(),
            description: None,
        }
    }

    /// Appends a parameter
    pub fn param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    /// Attaches a description
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Renders the signature without trailing semicolon
    pub fn signature(&self, real_type: &str, int_type: &str) -> String {
        let params = if self.params.is_empty() {
            "void".to_string()
        } else {
            self.params
                .iter()
                .map(|p| p.render(real_type, int_type))
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!(
            "{} {}( {} )",
            self.return_type.render(real_type, int_type),
            self.name,
            params
        )
    }

    /// Renders the prototype
    pub fn render(&self, real_type: &str, int_type: &str) -> String {
        let line = format!("{};", self.signature(real_type, int_type));
        match &self.description {
            Some(description) => format!("/** {description} */\n{line}"),
            None => line,
        }
    }
}

/// Renders a list of declarations one per line
pub fn render_declarations(declarations: &[Declaration], real_type: &str, int_type: &str) -> String {
    declarations
        .iter()
        .filter(|d| !d.is_empty())
        .map(|d| d.render(real_type, int_type))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders a list of prototypes separated by blank lines
pub fn render_functions(functions: &[FunctionDeclaration], real_type: &str, int_type: &str) -> String {
    functions
        .iter()
        .map(|f| f.render(real_type, int_type))
        .collect::<Vec<_>>()
        .join("\n\n")
}
