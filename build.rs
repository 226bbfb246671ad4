pub fn main() {
    generate_version_info();

    println!("cargo:rerun-if-changed=migrations");
}

/// Generate version information from git tags using vergen
///
/// The version is derived from `git describe --tags --always --dirty`. For
/// non-git environments vergen emits idempotent default values, so the build
/// never fails on a source tarball.
///
/// The generated constants are accessed via:
/// - `env!("VERGEN_GIT_DESCRIBE")` - Full version with git metadata
/// - `env!("VERGEN_GIT_SHA")` - Commit SHA
fn generate_version_info() {
    use vergen_git2::{BuildBuilder, CargoBuilder, Emitter, Git2Builder};

    let build = BuildBuilder::default()
        .build_timestamp(true)
        .build()
        .expect("Failed to configure build info");

    let cargo = CargoBuilder::default()
        .target_triple(true)
        .build()
        .expect("Failed to configure cargo info");

    let git2 = Git2Builder::default()
        .describe(true, true, None)
        .sha(true)
        .build()
        .expect("Failed to configure git info");

    Emitter::default()
        .add_instructions(&build)
        .expect("Failed to add build instructions")
        .add_instructions(&cargo)
        .expect("Failed to add cargo instructions")
        .add_instructions(&git2)
        .expect("Failed to add git instructions")
        .emit()
        .expect("Failed to emit version info");
}
