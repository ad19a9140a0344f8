use crate::error::{LaunchError, Result};
use std::path::{Path, PathBuf};

/// Environment variable listing installed package prefixes, colon-separated.
const AMENT_PREFIX_PATH: &str = "AMENT_PREFIX_PATH";

/// Resolves package executables and share directories from a list of
/// install prefixes, ament-style: `<prefix>/lib/<package>/<executable>`
/// and `<prefix>/share/<package>`.
///
/// Executables that cannot be found under any prefix fall back to a plain
/// `PATH` lookup, so a bringup can still run against system-wide installs.
#[derive(Debug, Clone)]
pub struct AmentIndex {
    prefixes: Vec<PathBuf>,
}

impl AmentIndex {
    /// Build the index from `AMENT_PREFIX_PATH`.
    pub fn from_env() -> Self {
        let prefixes = std::env::var_os(AMENT_PREFIX_PATH)
            .map(|v| std::env::split_paths(&v).collect())
            .unwrap_or_default();

        Self { prefixes }
    }

    /// Build the index from an explicit prefix list (used in tests and by
    /// callers that manage their own install layout).
    pub fn with_prefixes(prefixes: Vec<PathBuf>) -> Self {
        Self { prefixes }
    }

    pub fn prefixes(&self) -> &[PathBuf] {
        &self.prefixes
    }

    /// Resolve the full path of an executable installed by a package.
    pub fn executable_path(&self, package: &str, executable: &str) -> Result<PathBuf> {
        for prefix in &self.prefixes {
            let candidate = prefix.join("lib").join(package).join(executable);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }

        if let Some(found) = search_path(executable) {
            return Ok(found);
        }

        Err(LaunchError::ExecutableNotFound {
            package: package.to_string(),
            executable: executable.to_string(),
        })
    }

    /// Resolve the share directory of a package.
    pub fn share_directory(&self, package: &str) -> Result<PathBuf> {
        for prefix in &self.prefixes {
            let candidate = prefix.join("share").join(package);
            if candidate.is_dir() {
                return Ok(candidate);
            }
        }

        Err(LaunchError::ShareDirectoryNotFound(package.to_string()))
    }
}

fn search_path(executable: &str) -> Option<PathBuf> {
    // Absolute or relative paths bypass the search
    if Path::new(executable).components().count() > 1 {
        let path = PathBuf::from(executable);
        return path.is_file().then_some(path);
    }

    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(executable))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fake_prefix(package: &str, executable: &str) -> TempDir {
        let prefix = TempDir::new().unwrap();
        let lib_dir = prefix.path().join("lib").join(package);
        let share_dir = prefix.path().join("share").join(package);
        std::fs::create_dir_all(&lib_dir).unwrap();
        std::fs::create_dir_all(&share_dir).unwrap();
        std::fs::write(lib_dir.join(executable), "#!/bin/sh\n").unwrap();
        prefix
    }

    #[test]
    fn test_executable_path_from_prefix() {
        let prefix = fake_prefix("map_server", "map_server");
        let index = AmentIndex::with_prefixes(vec![prefix.path().to_path_buf()]);

        let path = index.executable_path("map_server", "map_server").unwrap();
        assert!(path.ends_with("lib/map_server/map_server"));
    }

    #[test]
    fn test_executable_path_prefers_earlier_prefix() {
        let first = fake_prefix("joy", "joy_node");
        let second = fake_prefix("joy", "joy_node");
        let index = AmentIndex::with_prefixes(vec![
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ]);

        let path = index.executable_path("joy", "joy_node").unwrap();
        assert!(path.starts_with(first.path()));
    }

    #[test]
    fn test_executable_falls_back_to_path_lookup() {
        let index = AmentIndex::with_prefixes(vec![]);
        // `sh` is on PATH everywhere we run tests
        let path = index.executable_path("some_package", "sh").unwrap();
        assert!(path.ends_with("sh"));
    }

    #[test]
    fn test_executable_not_found() {
        let index = AmentIndex::with_prefixes(vec![]);
        let err = index
            .executable_path("nope", "definitely_not_a_real_executable")
            .unwrap_err();
        assert!(matches!(err, LaunchError::ExecutableNotFound { .. }));
    }

    #[test]
    fn test_share_directory() {
        let prefix = fake_prefix("navlaunch", "ignored");
        let index = AmentIndex::with_prefixes(vec![prefix.path().to_path_buf()]);

        let share = index.share_directory("navlaunch").unwrap();
        assert!(share.ends_with("share/navlaunch"));
        assert!(index.share_directory("missing_package").is_err());
    }
}
