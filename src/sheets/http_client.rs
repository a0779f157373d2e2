use google_sheets4::{hyper, hyper_rustls};

pub type SheetsConnector = hyper_rustls::HttpsConnector<hyper::client::HttpConnector>;
pub type HttpsClient = hyper::Client<SheetsConnector>;

/// Shared TLS client; both the authenticator and the sheets hub ride on it.
pub fn http_client() -> HttpsClient {
    hyper::Client::builder().build(
        hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .expect("native root certificates must load")
            .https_only()
            .enable_http1()
            .build(),
    )
}
