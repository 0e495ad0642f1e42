use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid bind address: {source}")]
    InvalidBindAddr { source: std::net::AddrParseError },

    #[error("Failed to read provider key file {path}: {source}")]
    ProviderKeyFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Environment variable error: {message}")]
    EnvVar { message: String },
}

pub type Result<T> = std::result::Result<T, ServerError>;
