//! Running the local catalog search programs

use std::path::Path;
use std::process::Command;

use crate::error::{CatalogError, Result};

/// Runs an external program to completion and returns its standard output
pub trait CommandExecutor {
    fn run(&self, program: &Path, args: &[String]) -> Result<Vec<u8>>;
}

/// Executor backed by real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl CommandExecutor for SystemExecutor {
    fn run(&self, program: &Path, args: &[String]) -> Result<Vec<u8>> {
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| CatalogError::Launch {
                program: program.to_path_buf(),
                source,
            })?;

        if !output.status.success() {
            return Err(CatalogError::ProcessFailed {
                program: program.to_path_buf(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}

impl<E: CommandExecutor + ?Sized> CommandExecutor for &E {
    fn run(&self, program: &Path, args: &[String]) -> Result<Vec<u8>> {
        (**self).run(program, args)
    }
}

impl<E: CommandExecutor + ?Sized> CommandExecutor for std::sync::Arc<E> {
    fn run(&self, program: &Path, args: &[String]) -> Result<Vec<u8>> {
        (**self).run(program, args)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_launch_error() {
        let err = SystemExecutor
            .run(Path::new("/nonexistent/catalog-search"), &[])
            .unwrap_err();
        assert!(matches!(err, CatalogError::Launch { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_process_failure() {
        let err = SystemExecutor
            .run(Path::new("sh"), &["-c".to_string(), "echo boom >&2; exit 3".to_string()])
            .unwrap_err();
        match err {
            CatalogError::ProcessFailed { status, stderr, .. } => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr, "boom");
            }
            other => panic!("expected ProcessFailed, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_stdout() {
        let out = SystemExecutor
            .run(Path::new("sh"), &["-c".to_string(), "printf 'a|b'".to_string()])
            .unwrap();
        assert_eq!(out, b"a|b");
    }
}
