use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("report output failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("chart rendering failed: {0}")]
    Chart(String),
    #[error("logo is not a usable JPEG: {0}")]
    Logo(String),
    #[error("no records selected")]
    EmptySelection,
}

pub type Result<T> = std::result::Result<T, ReportError>;
