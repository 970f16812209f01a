#[allow(clippy::expect_used)] // The process cannot talk to the API server without a provider
pub fn init_crypto() {
    if rustls::crypto::CryptoProvider::get_default().is_none() {
        rustls::crypto::ring::default_provider()
            .install_default()
            .expect("Failed to install rustls crypto provider");
    }
}
