use{
    std::{
        env,
        fs,
        path::{Path, PathBuf}
    },
    crate::{
        error::*,
        misc_types::BUILD_DIR_ENV
    }
};

const EXECUTABLE_PATTERN: &str = "agent";

/// Build directory from the command line, or from the environment
pub fn resolve_build_dir(flag: Option<&str>) -> Option<PathBuf>
{
    flag.map(PathBuf::from)
        .or_else(|| env::var_os(BUILD_DIR_ENV).map(PathBuf::from))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool
{
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool
{
    path.is_file()
}

fn find_in(bin: &Path) -> Option<PathBuf>
{
    let mut candidates: Vec<_> = fs::read_dir(bin).ok()?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().contains(EXECUTABLE_PATTERN))
        .map(|entry| entry.path())
        .collect();
    candidates.sort();
    candidates.into_iter()
        .find(|p| is_executable(p))
}

/// Simulator executable: `<build>/<machine>/bin` first, then `<build>/bin`
pub fn find_executable(build_dir: &Path, machine: &str) -> Result<PathBuf>
{
    let machine_bin = build_dir.join(machine).join("bin");
    let direct_bin = build_dir.join("bin");
    find_in(&machine_bin)
        .or_else(|| find_in(&direct_bin))
        .ok_or_else(|| EpiError::not_found(direct_bin.join(format!("*{EXECUTABLE_PATTERN}*"))))
}
