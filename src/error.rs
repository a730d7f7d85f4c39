use thiserror::Error;

#[derive(Error, Debug)]
pub enum BenchscopeError {
    #[error("No data available. Please upload a file or generate sample data.")]
    NoDataset,
    #[error("Invalid request parameter: {0}")]
    InvalidParameter(String),
    #[error("Export failed: {0}")]
    Export(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Lock poisoned: {0}")]
    Lock(String),
}

pub type Result<T> = std::result::Result<T, BenchscopeError>;

// Helper conversions
impl From<csv::Error> for BenchscopeError {
    fn from(e: csv::Error) -> Self { Self::Export(e.to_string()) }
}
impl From<rust_xlsxwriter::XlsxError> for BenchscopeError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self { Self::Export(e.to_string()) }
}
impl From<config::ConfigError> for BenchscopeError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}

impl BenchscopeError {
    /// Errors caused by the caller rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::NoDataset | Self::InvalidParameter(_))
    }
}
