use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TransportError {
    #[snafu(display("request to '{url}' failed on `{stage}`, {source}"))]
    Request {
        stage: &'static str,
        url: String,
        source: reqwest::Error,
    },
    #[snafu(display("endpoint '{url}' returned status {status}"))]
    Status {
        stage: &'static str,
        url: String,
        status: u16,
    },
    #[snafu(display("failed to decode response from '{url}': {source}"))]
    Decode {
        stage: &'static str,
        url: String,
        source: reqwest::Error,
    },
}

pub type TransportResult<T> = Result<T, TransportError>;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ConfigError {
    #[snafu(display("failed to load widget config: {source}"))]
    Extract {
        stage: &'static str,
        source: Box<figment::Error>,
    },
}

#[cfg(not(target_arch = "wasm32"))]
pub type ConfigResult<T> = Result<T, ConfigError>;
