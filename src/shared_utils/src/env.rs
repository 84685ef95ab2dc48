use thiserror::Error;

/// An environment variable required by the application is not set.
#[derive(Debug, Error)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVarError(pub String);

/// Reads an environment variable, returning a structured error if it's missing.
///
/// This is a thin wrapper around `std::env::var` that provides a more
/// ergonomic and specific error type for missing variables.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
pub fn get_env_var(name: &str) -> Result<String, MissingEnvVarError> {
    std::env::var(name).map_err(|_| MissingEnvVarError(name.to_string()))
}

/// Reads an optional override from the environment.
///
/// Returns `None` when the variable is unset, not valid unicode, or blank after
/// trimming. The returned value is trimmed.
pub fn env_override(name: &str) -> Option<String> {
    let value = get_env_var(name).ok()?;
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
