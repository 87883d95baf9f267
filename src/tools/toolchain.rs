//! Paths to the external compiler, build executor and SDK

use crate::runner::Platform;
use std::path::{Path, PathBuf};

/// Default toolchain root on macOS
const XCODE_TOOLCHAIN: &str =
    "/Applications/Xcode.app/Contents/Developer/Toolchains/XcodeDefault.xctoolchain";

/// Default SDK on macOS
const MACOSX_SDK: &str =
    "/Applications/Xcode.app/Contents/Developer/Platforms/MacOSX.platform/Developer/SDKs/MacOSX.sdk";

/// External binaries used by the atllbuild tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// Compiler, also used as the linker for executables
    pub swiftc: PathBuf,

    /// Incremental build executor that consumes the manifest
    pub build_tool: PathBuf,

    /// SDK passed with `-sdk`, on platforms that have one
    pub sdk_path: Option<PathBuf>,
}

impl Toolchain {
    /// A toolchain laid out as `<root>/usr/bin/{swiftc,swift-build-tool}`
    pub fn from_root(root: &Path) -> Self {
        let bin = root.join("usr").join("bin");
        Self {
            swiftc: bin.join("swiftc"),
            build_tool: bin.join("swift-build-tool"),
            sdk_path: Platform::target().has_sdk().then(|| PathBuf::from(MACOSX_SDK)),
        }
    }

    /// The platform's usual toolchain location
    pub fn default_root() -> PathBuf {
        if Platform::target() == Platform::Osx {
            PathBuf::from(XCODE_TOOLCHAIN)
        } else {
            PathBuf::from("/")
        }
    }
}

impl Default for Toolchain {
    fn default() -> Self {
        Self::from_root(&Self::default_root())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_root() {
        let toolchain = Toolchain::from_root(Path::new("/opt/swift"));
        assert_eq!(toolchain.swiftc, PathBuf::from("/opt/swift/usr/bin/swiftc"));
        assert_eq!(
            toolchain.build_tool,
            PathBuf::from("/opt/swift/usr/bin/swift-build-tool")
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_linux_default_has_no_sdk() {
        let toolchain = Toolchain::default();
        assert_eq!(toolchain.swiftc, PathBuf::from("/usr/bin/swiftc"));
        assert_eq!(toolchain.sdk_path, None);
    }
}
