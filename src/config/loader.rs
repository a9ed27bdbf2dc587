//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ProjectConfig;
use crate::domain::errors::GeneratorError;
use crate::domain::result::Result;
use crate::domain::ModuleName;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads a project file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ProjectConfig
/// 4. Applies environment variable overrides (OCPGEN_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use ocpgen::config::loader::load_config;
///
/// let config = load_config("ocpgen.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ProjectConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(GeneratorError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        GeneratorError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: ProjectConfig = toml::from_str(&contents)
        .map_err(|e| GeneratorError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        GeneratorError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| GeneratorError::Configuration(e.to_string()))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(GeneratorError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the OCPGEN_* prefix
///
/// Environment variables follow the pattern: OCPGEN_<SECTION>_<KEY>,
/// for example OCPGEN_OUTPUT_FOLDER or OCPGEN_OPTIONS_MODULE_NAME.
fn apply_env_overrides(config: &mut ProjectConfig) -> Result<()> {
    if let Ok(val) = std::env::var("OCPGEN_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("OCPGEN_OUTPUT_FOLDER") {
        config.output.folder = val;
    }
    if let Ok(val) = std::env::var("OCPGEN_OUTPUT_REAL_TYPE") {
        config.output.real_type = val;
    }
    if let Ok(val) = std::env::var("OCPGEN_OUTPUT_PRECISION") {
        if let Ok(precision) = val.parse() {
            config.output.precision = precision;
        }
    }

    if let Ok(val) = std::env::var("OCPGEN_OPTIONS_MODULE_NAME") {
        config.options.module_name = ModuleName::new(val).map_err(GeneratorError::Configuration)?;
    }
    if let Ok(val) = std::env::var("OCPGEN_OPTIONS_GENERATE_MAKEFILE") {
        config.options.generate_makefile = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("OCPGEN_OPTIONS_GENERATE_TEST_FILE") {
        config.options.generate_test_file = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("OCPGEN_OPTIONS_USE_SINGLE_PRECISION") {
        config.options.use_single_precision = val.parse().unwrap_or(false);
    }

    if let Ok(val) = std::env::var("OCPGEN_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("OCPGEN_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
