use std::env::consts::{ARCH, OS};
use std::sync::LazyLock;

use http::HeaderValue;
use sysinfo::System;

const SDK_NAME: &str = "incognia-api-rust";
const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");
/// Version of the compiler that built the crate.
const RUSTC_VERSION: &str = env!("INCOGNIA_RUSTC_VERSION");

static USER_AGENT: LazyLock<String> = LazyLock::new(|| {
    let os_version = System::kernel_version().unwrap_or_else(|| "unknown".to_string());
    format_user_agent(OS, &os_version, ARCH, RUSTC_VERSION)
});

fn format_user_agent(os: &str, os_version: &str, arch: &str, rustc_version: &str) -> String {
    let agent =
        format!("{SDK_NAME}/{SDK_VERSION} ({os} {os_version} {arch}) rust/{rustc_version}");
    // Header values must be visible ASCII
    agent
        .chars()
        .map(|ch| if ch == ' ' || ch.is_ascii_graphic() { ch } else { '_' })
        .collect()
}

/// Returns the `User-Agent` sent with every domain call.
///
/// `incognia-api-rust/<version> (<os> <os version> <arch>) rust/<rust version>`,
/// computed once per process.
pub fn user_agent() -> &'static str {
    &USER_AGENT
}

pub(crate) fn header_value() -> HeaderValue {
    HeaderValue::from_str(user_agent()).unwrap_or_else(|_| HeaderValue::from_static(SDK_NAME))
}
