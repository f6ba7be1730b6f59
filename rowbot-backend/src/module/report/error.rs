use rowbot_common::Tenths;
use thiserror::Error;

/// Failures of the report pipeline
#[derive(Debug, Error)]
pub enum ReportError {
    /// Pace over zero distance has no meaning; callers pick a placeholder
    #[error("pace is undefined for a zero-distance segment ({time} tenths)")]
    UndefinedPace { time: Tenths },

    #[error("pace does not fit in tenths of a second ({time} tenths)")]
    PaceOverflow { time: Tenths },

    #[error("no fonts loaded, report text cannot be drawn")]
    NoFonts,

    #[error("failed to parse report SVG: {0}")]
    Svg(#[from] resvg::usvg::Error),

    #[error("cannot allocate a {width}x{height} drawing surface")]
    Surface { width: u32, height: u32 },

    #[error("failed to encode PNG: {0}")]
    Encode(String),
}
