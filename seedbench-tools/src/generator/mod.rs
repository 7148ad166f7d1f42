mod olap;
mod oltp;

pub use olap::*;
pub use oltp::*;

/// Rounds half away from zero to two decimals. Every derived amount in the
/// generated data goes through this one definition, so stored values and the
/// inputs they were derived from always agree.
pub(crate) fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
