//! Target platform and user paths exposed to tools

use directories::BaseDirs;
use std::fmt;
use std::path::PathBuf;

/// Environment variable naming the target platform
pub const PLATFORM_VAR: &str = "ATBUILD_PLATFORM";

/// Environment variable naming the per-user atbuild directory
pub const USER_PATH_VAR: &str = "ATBUILD_USER_PATH";

/// Interpolation variable holding the package name
pub const PACKAGE_VAR: &str = "ATBUILD_PACKAGE";

/// Platforms tools can branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    Osx,
    Unknown,
}

impl Platform {
    /// The platform this binary was built for
    pub fn target() -> Self {
        if cfg!(target_os = "linux") {
            Platform::Linux
        } else if cfg!(target_os = "macos") {
            Platform::Osx
        } else {
            Platform::Unknown
        }
    }

    /// Whether the platform has an SDK concept
    pub fn has_sdk(self) -> bool {
        self == Platform::Osx
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Linux => "linux",
            Platform::Osx => "osx",
            Platform::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// `~/.atbuild`, if a home directory can be determined
pub fn user_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(".atbuild"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_names() {
        assert_eq!(Platform::Linux.to_string(), "linux");
        assert_eq!(Platform::Osx.to_string(), "osx");
        assert_eq!(Platform::Unknown.to_string(), "unknown");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_target_on_linux() {
        assert_eq!(Platform::target(), Platform::Linux);
        assert!(!Platform::target().has_sdk());
    }

    #[test]
    fn test_user_path_ends_with_atbuild() {
        if let Some(path) = user_path() {
            assert!(path.ends_with(".atbuild"));
        }
    }
}
