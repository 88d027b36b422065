use std::fmt;

use serde::Serialize;

/// Compile-time information about the running build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub build_profile: &'static str,
    pub build_timestamp: &'static str,
    pub package_version: &'static str,
    pub version: &'static str,
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "folio {} ({}, {} build, {})",
            self.package_version, self.version, self.build_profile, self.build_timestamp
        )
    }
}

pub fn build_info() -> BuildInfo {
    BuildInfo {
        build_profile: env!("BUILD_PROFILE"),
        build_timestamp: env!("BUILD_TIMESTAMP"),
        package_version: env!("CARGO_PKG_VERSION"),
        version: env!("REPO_VERSION"),
    }
}
