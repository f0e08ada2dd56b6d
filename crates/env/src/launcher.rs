use std::convert::Infallible;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;
use vgm_core::constants::PATH_VAR;
use vgm_core::{Environment, Error, Result};

/// The command vgm hands control to
#[derive(Debug, Clone)]
pub struct Launcher {
    program: OsString,
    args: Vec<OsString>,
}

impl Launcher {
    /// Build a launcher from the wrapped command line (`argv[1..]`)
    pub fn new<I, S>(command_line: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut parts = command_line.into_iter().map(Into::into);
        let program = parts
            .next()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| Error::configuration("no command given to launch"))?;

        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Locate the program using the `PATH` of the environment it will run with
    pub fn resolve(&self, env: &Environment) -> Result<PathBuf> {
        let cwd = std::env::current_dir()
            .map_err(|e| Error::file_system(".", "read current directory", e))?;

        which::which_in(&self.program, env.value_of(PATH_VAR), cwd)
            .map_err(|e| self.error(format!("executable not found: {e}")))
    }

    /// Replace the current process with the command
    ///
    /// The child receives exactly the variables in `env`, the program name as
    /// given on the command line as `argv[0]`, and the remaining arguments. On
    /// success this never returns.
    pub fn launch(self, env: Environment) -> Result<Infallible> {
        let path = self.resolve(&env)?;
        tracing::debug!(path = %path.display(), "launching command");

        let mut command = Command::new(&path);
        command.args(&self.args).env_clear().envs(env.vars_os());

        self.replace(command)
    }

    #[cfg(unix)]
    fn replace(self, mut command: Command) -> Result<Infallible> {
        use std::os::unix::process::CommandExt;

        command.arg0(&self.program);
        let err = command.exec();
        Err(self.error(format!("exec failed: {err}")))
    }

    /// Without process replacement, run the child to completion and exit with
    /// its status so no launcher remains in control afterwards.
    #[cfg(not(unix))]
    fn replace(self, mut command: Command) -> Result<Infallible> {
        let status = command
            .status()
            .map_err(|e| self.error(format!("failed to spawn command: {e}")))?;
        std::process::exit(status.code().unwrap_or(1))
    }

    fn error(&self, message: String) -> Error {
        Error::command_execution(
            self.program.to_string_lossy(),
            self.args
                .iter()
                .map(|a| a.to_string_lossy().into_owned())
                .collect(),
            message,
            None,
        )
    }
}
