//! Presentation helpers for clock values

/// Label shown while no snapshot is available
pub const PLACEHOLDER_LABEL: &str = "--:--";

/// Format seconds as zero-padded `mm:ss`
///
/// Fractions are dropped and negative or non-finite input renders as
/// `00:00`. Minutes are not wrapped into hours.
pub fn format_clock(total_seconds: f64) -> String {
    let whole = if total_seconds.is_finite() && total_seconds > 0.0 {
        total_seconds.floor() as u64
    } else {
        0
    };

    format!("{:02}:{:02}", whole / 60, whole % 60)
}
