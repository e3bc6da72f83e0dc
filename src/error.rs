//! Crate-wide error type for the boundary operations that can actually
//! fail: disk I/O and config parsing. The rasterizer's hot path never
//! returns `Result` — see the module docs on `rasterizer` and `framebuffer`
//! for why (invalid input there is a silent no-op by design, not an error).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RasterError>;
