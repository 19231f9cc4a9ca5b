//! Error types for the bench-charts crate.

/// Errors that can occur while building or rendering comparison charts.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    /// No rows were supplied, so there is nothing to plot.
    #[error("no chart rows supplied")]
    Empty,

    /// A row carried a value that cannot be plotted (NaN or infinite).
    #[error("invalid chart value: {0}")]
    InvalidValue(String),

    /// The chart backend rejected the configuration or failed to rasterise.
    #[error("chart render error: {0}")]
    Render(String),

    /// PNG encoding failed.
    #[error("PNG encode error: {0}")]
    Encode(String),

    /// Writing a chart file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for bench-charts results.
pub type Result<T> = std::result::Result<T, ChartError>;
