//! Utilities module for logging, error handling, and helper functions

pub mod error;
pub mod logging;

// Re-export main types for convenience
pub use error::{AgriError, Result};
pub use logging::{init_logging, LogConfig, LogLevel};

/// Index of the largest value, first one wins on ties.
///
/// NaN entries are skipped. Returns `None` for an empty (or all-NaN) slice.
pub fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Format a duration in milliseconds with two decimals
pub fn format_millis(duration: std::time::Duration) -> String {
    format!("{:.2} ms", duration.as_secs_f64() * 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), Some(1));
        assert_eq!(argmax(&[0.5, 0.5]), Some(0));
        assert_eq!(argmax(&[f32::NAN, 0.3, 0.1]), Some(1));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_format_millis() {
        assert_eq!(format_millis(std::time::Duration::from_micros(1500)), "1.50 ms");
    }
}
