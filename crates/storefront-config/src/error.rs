use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("TOML serialization error: {0}")]
    #[diagnostic(
        code(storefront_config::toml_serialize),
        help("Check your configuration structure for invalid values")
    )]
    TomlSerError(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    #[diagnostic(
        code(storefront_config::toml_deserialize),
        help("Check your config.toml syntax and structure")
    )]
    TomlDeError(#[from] toml::de::Error),

    #[error("Configuration file already exists")]
    #[diagnostic(
        code(storefront_config::already_exists),
        help("Remove the existing config file or use a different location")
    )]
    ConfigAlreadyExists,

    #[error("Invalid list limit: {0}")]
    #[diagnostic(
        code(storefront_config::invalid_list_limit),
        help("list_limit must be a positive number")
    )]
    InvalidListLimit(i64),

    #[error("Path is empty")]
    #[diagnostic(code(storefront_config::empty_path))]
    EmptyPath,

    #[error("Environment variable `{var}` used in `{input}` is not set")]
    #[diagnostic(
        code(storefront_config::missing_env_var),
        help("Set the variable or use an absolute path")
    )]
    MissingEnvVar { var: String, input: String },

    #[error("Unclosed variable expression in `{0}`")]
    #[diagnostic(code(storefront_config::unclosed_variable))]
    UnclosedVariable(String),

    #[error("IO error: {0}")]
    #[diagnostic(code(storefront_config::io))]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
