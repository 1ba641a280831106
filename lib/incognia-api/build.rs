//! Exposes the compiler version to the `User-Agent`.

#[allow(clippy::print_stdout)]
fn main() {
    let version = rustc_version::version()
        .map_or_else(|_| "unknown".to_string(), |version| version.to_string());
    println!("cargo:rustc-env=INCOGNIA_RUSTC_VERSION={version}");
    println!("cargo:rerun-if-changed=build.rs");
}
