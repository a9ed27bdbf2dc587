//! Generated source file sink
//!
//! An [`ExportFile`] collects C code emitted by a collaborator and writes it
//! to disk. The scalar type names and the number of significant digits of
//! numeric literals are fixed per file, so the same collaborator code serves
//! every precision.

use crate::codegen::declarations::FunctionDeclaration;
use crate::domain::Result;
use std::fs;
use std::path::{Path, PathBuf};

const INDENT: &str = "    ";

/// A generated C source file
#[derive(Debug, Clone)]
pub struct ExportFile {
    path: PathBuf,
    common_header: Option<String>,
    real_type: String,
    int_type: String,
    precision: usize,
    body: String,
}

impl ExportFile {
    /// Creates an empty file that includes `common_header`
    pub fn new(
        path: impl Into<PathBuf>,
        common_header: impl Into<String>,
        real_type: impl Into<String>,
        int_type: impl Into<String>,
        precision: usize,
    ) -> Self {
        let common_header = common_header.into();
        Self {
            path: path.into(),
            common_header: (!common_header.is_empty()).then_some(common_header),
            real_type: real_type.into(),
            int_type: int_type.into(),
            precision: precision.max(1),
            body: String::new(),
        }
    }

    /// Destination path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// C type used for real numbers
    pub fn real_type(&self) -> &str {
        &self.real_type
    }

    /// C type used for integers
    pub fn int_type(&self) -> &str {
        &self.int_type
    }

    /// Appends one line of code
    pub fn add_line(&mut self, line: impl AsRef<str>) {
        self.body.push_str(line.as_ref());
        self.body.push('\n');
    }

    /// Appends an empty line
    pub fn add_blank(&mut self) {
        self.body.push('\n');
    }

    /// Appends a block comment
    pub fn add_comment(&mut self, text: impl AsRef<str>) {
        self.body.push_str(&format!("/* {} */\n", text.as_ref()));
    }

    /// Appends a preprocessor definition
    pub fn add_define(&mut self, name: &str, value: impl std::fmt::Display) {
        self.body.push_str(&format!("#define {name} {value}\n"));
    }

    /// Appends a function definition with the given body lines
    ///
    /// Body lines are indented one level; lines that are already indented
    /// keep their extra indentation.
    pub fn add_function<I, S>(&mut self, declaration: &FunctionDeclaration, body: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let signature = declaration.signature(&self.real_type, &self.int_type);
        self.body.push_str(&format!("{signature}\n{{\n"));
        for line in body {
            let line = line.as_ref();
            if line.is_empty() {
                self.body.push('\n');
            } else {
                self.body.push_str(&format!("{INDENT}{line}\n"));
            }
        }
        self.body.push_str("}\n\n");
    }

    /// Formats a real literal with the configured number of significant digits
    pub fn real_literal(&self, value: f64) -> String {
        format!("{:.*e}", self.precision - 1, value)
    }

    /// Full file contents
    pub fn contents(&self) -> String {
        let mut out = String::new();
        if let Some(header) = &self.common_header {
            out.push_str(&format!("#include \"{header}\"\n\n"));
        }
        out.push_str(&self.body);
        out
    }

    /// Writes the file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn export(&self) -> Result<()> {
        fs::write(&self.path, self.contents())?;
        tracing::debug!(path = %self.path.display(), bytes = self.body.len(), "Exported source file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::declarations::{Parameter, ScalarType};

    #[test]
    fn test_contents_include_common_header() {
        let mut file = ExportFile::new("/tmp/x.c", "acado_common.h", "real_t", "int", 16);
        file.add_line("int x;");
        assert_eq!(file.contents(), "#include \"acado_common.h\"\n\nint x;\n");
    }

    #[test]
    fn test_no_include_without_header() {
        let mut file = ExportFile::new("/tmp/x.c", "", "real_t", "int", 16);
        file.add_line("int x;");
        assert_eq!(file.contents(), "int x;\n");
    }

    #[test]
    fn test_add_function() {
        let mut file = ExportFile::new("/tmp/x.c", "", "float", "int", 8);
        let decl = FunctionDeclaration::new("scale", ScalarType::Void)
            .param(Parameter::real_out("v"));
        file.add_function(&decl, ["v[0] *= 2.0;"]);
        assert_eq!(
            file.contents(),
            "void scale( float* const v )\n{\n    v[0] *= 2.0;\n}\n\n"
        );
    }

    #[test]
    fn test_real_literal_precision() {
        let file = ExportFile::new("/tmp/x.c", "", "real_t", "int", 4);
        assert_eq!(file.real_literal(0.5), "5.000e-1");

        let file = ExportFile::new("/tmp/x.c", "", "real_t", "int", 1);
        assert_eq!(file.real_literal(0.3), "3e-1");
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.c");
        let mut file = ExportFile::new(&path, "acado_common.h", "real_t", "int", 16);
        file.add_comment("generated");
        file.export().unwrap();

        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.contains("/* generated */"));
    }
}
