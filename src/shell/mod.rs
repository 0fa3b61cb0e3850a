use std::path::{Path, PathBuf};

use crate::error::{BenchError, Result};
use crate::plan::RunMode;

pub const JS_SHELL: &str = "JS_SHELL";
pub const JS_SHELL1: &str = "JS_SHELL1";
pub const JS_SHELL2: &str = "JS_SHELL2";

/// The executables for the first and second configuration. Both point at
/// the same file in single-shell modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shells {
    pub first: PathBuf,
    pub second: PathBuf,
}

impl Shells {
    /// Reads the shell paths for `mode` from the process environment.
    pub fn from_env(mode: RunMode) -> Result<Self> {
        Self::resolve(mode, |name| std::env::var(name).ok())
    }

    pub fn resolve<F>(mode: RunMode, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if mode.uses_two_shells() {
            Ok(Shells {
                first: executable(JS_SHELL1, &lookup)?,
                second: executable(JS_SHELL2, &lookup)?,
            })
        } else {
            let shell = executable(JS_SHELL, &lookup)?;
            Ok(Shells {
                first: shell.clone(),
                second: shell,
            })
        }
    }
}

fn executable<F>(var: &str, lookup: &F) -> Result<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(value) if !value.is_empty() && is_executable(Path::new(&value)) => {
            tracing::debug!(var, path = %value, "resolved shell");
            Ok(PathBuf::from(value))
        }
        _ => Err(BenchError::config(format!("{var} does not name an executable shell"))),
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    if !path.is_file() {
        return false;
    }
    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: c_path is a valid NUL-terminated string for the duration of the call.
    unsafe { libc::access(c_path.as_ptr(), libc::X_OK) == 0 }
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
