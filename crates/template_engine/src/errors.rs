use thiserror::Error;

use crate::handlebars_engine::HandlebarsError;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Error types that can occur while preparing or rendering artifacts.
///
/// # Examples
///
/// ```rust,ignore
/// use template_engine::Error;
///
/// match some_template_operation() {
///     Ok(text) => println!("{text}"),
///     Err(Error::TemplateRead { path, .. }) => eprintln!("Cannot read {path}"),
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// # fn some_template_operation() -> Result<String, Error> { Ok(String::new()) }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A template override file exists but could not be read.
    #[error("Failed to read template {path}: {source}")]
    TemplateRead {
        /// Path of the template file
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Compilation, rendering or path validation failed.
    #[error(transparent)]
    Handlebars(#[from] HandlebarsError),
}
