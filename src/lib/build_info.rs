//! Build metadata embedded by `build.rs`, surfaced as a one-line boot
//! banner. This core has no crash-dump/forensics subsystem to feed, so
//! the metadata stops at "printed once at boot."

pub const GIT_COMMIT: &str = env!("GIT_COMMIT");
pub const GIT_BRANCH: &str = env!("GIT_BRANCH");
pub const GIT_DIRTY: &str = env!("GIT_DIRTY");
pub const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP");
pub const PROFILE: &str = env!("PROFILE");
pub const TARGET: &str = env!("TARGET");

pub fn banner() {
    crate::kinfo!(
        "ring0-kernel {}@{} ({}) built {} for {} [{}]",
        GIT_BRANCH,
        GIT_COMMIT,
        if GIT_DIRTY == "1" { "dirty" } else { "clean" },
        BUILD_TIMESTAMP,
        TARGET,
        PROFILE
    );
}
