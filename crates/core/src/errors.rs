use std::path::PathBuf;

/// Result type alias for vgm operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for vgm operations
///
/// Every variant is fatal to a launch. Malformed declarations never produce an
/// error; they are treated as plain values.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A failure attributed to one declared environment variable
    #[error("failed to replace {variable}: {source}")]
    Declaration {
        variable: String,
        #[source]
        source: Box<Error>,
    },

    /// Token acquisition errors
    #[error("could not get vault token: {message}")]
    Token { message: String },

    /// Secret lookup errors
    #[error("failed to fetch secret {path} | {key}: {message}")]
    SecretStore {
        path: String,
        key: String,
        message: String,
    },

    /// Command lookup and execution errors
    #[error("{}", format_command_error(.command, .args, .message, .exit_code))]
    CommandExecution {
        command: String,
        args: Vec<String>,
        message: String,
        exit_code: Option<i32>,
    },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// File system operations
    #[error("file system {operation} operation failed for '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

}

fn format_command_error(
    command: &str,
    args: &[String],
    message: &str,
    exit_code: &Option<i32>,
) -> String {
    let args_str = args.join(" ");
    match exit_code {
        Some(code) => {
            if args_str.is_empty() {
                format!("command '{command}' failed with exit code {code}: {message}")
            } else {
                format!("command '{command} {args_str}' failed with exit code {code}: {message}")
            }
        }
        None => {
            if args_str.is_empty() {
                format!("command '{command}' failed: {message}")
            } else {
                format!("command '{command} {args_str}' failed: {message}")
            }
        }
    }
}

impl Error {
    /// Attach the declaring environment variable to an error
    #[must_use]
    pub fn declaration(variable: impl Into<String>, source: Error) -> Self {
        Error::Declaration {
            variable: variable.into(),
            source: Box::new(source),
        }
    }

    /// Create a token acquisition error
    #[must_use]
    pub fn token(message: impl Into<String>) -> Self {
        Error::Token {
            message: message.into(),
        }
    }

    /// Create a secret lookup error
    #[must_use]
    pub fn secret_store(
        path: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::SecretStore {
            path: path.into(),
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a command execution error
    #[must_use]
    pub fn command_execution(
        command: impl Into<String>,
        args: Vec<String>,
        message: impl Into<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Error::CommandExecution {
            command: command.into(),
            args,
            message: message.into(),
            exit_code,
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// The environment variable this error was attributed to, if any
    #[must_use]
    pub fn variable(&self) -> Option<&str> {
        match self {
            Error::Declaration { variable, .. } => Some(variable),
            _ => None,
        }
    }
}

// Extension trait for attributing failures to a declaration
pub trait ResultExt<T> {
    /// Attribute an error to the environment variable that declared the secret
    fn for_variable(self, variable: &str) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn for_variable(self, variable: &str) -> Result<T> {
        self.map_err(|e| Error::declaration(variable, e.into()))
    }
}
