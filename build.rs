/// Ferrhex build script.
///
/// The shell hosts a Win32 child control and pumps a Win32 message loop;
/// nothing here is portable. Fail loudly on any other target rather than
/// silently producing a broken binary.
fn main() {
    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if target_os != "windows" {
        panic!(
            "Ferrhex only builds for Windows \
             (CARGO_CFG_TARGET_OS = {target_os:?})"
        );
    }

    // Only re-run the build script when it changes.
    println!("cargo:rerun-if-changed=build.rs");
}
