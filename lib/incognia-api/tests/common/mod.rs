#![allow(clippy::missing_errors_doc, dead_code, missing_docs, clippy::expect_used)]

use incognia_api::IncogniaApi;
use rstest::fixture;
use tracing::info;

mod mock_server;
pub use self::mock_server::*;

pub const CLIENT_ID: &str = "client-id";
pub const CLIENT_SECRET: &str = "client-secret";

pub fn init_tracing() {
    // should be run once, fail otherwise, we skip that error
    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();

    info!("Tracing initialized");
}

#[fixture]
pub async fn mock() -> MockIncognia {
    init_tracing();
    match MockIncognia::start(MockConfig::default()).await {
        Ok(mock) => mock,
        Err(error) => {
            panic!("fail to start mock server: {error:?}");
        }
    }
}

/// A client of the mock server, with default options.
pub fn api(mock: &MockIncognia) -> IncogniaApi {
    IncogniaApi::builder(CLIENT_ID, CLIENT_SECRET)
        .with_base_url(mock.base_url())
        .build()
        .expect("valid client")
}
