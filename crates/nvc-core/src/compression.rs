//! Compression level handling for zlib members.
//!
//! Levels follow the zlib scale:
//!
//! - **0**: store inside a zlib stream (no compression, still framed)
//! - **1-3**: fast compression
//! - **6**: default
//! - **7-9**: best compression

use crate::NvcError;
use crate::Result;

/// Lowest accepted compression level.
pub const MIN_COMPRESSION_LEVEL: u32 = 0;

/// Highest accepted compression level.
pub const MAX_COMPRESSION_LEVEL: u32 = 9;

/// Level used when the caller asks for compression without a level.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Converts a zlib level (0-9) to a flate2 compression setting.
///
/// # Errors
///
/// Returns `NvcError::InvalidParameter` if `level` is above 9.
///
/// # Examples
///
/// ```
/// use nvc_core::compression::compression_level_to_flate2;
///
/// assert_eq!(compression_level_to_flate2(9)?, flate2::Compression::best());
/// assert!(compression_level_to_flate2(10).is_err());
/// # Ok::<(), nvc_core::NvcError>(())
/// ```
pub fn compression_level_to_flate2(level: u32) -> Result<flate2::Compression> {
    if !(MIN_COMPRESSION_LEVEL..=MAX_COMPRESSION_LEVEL).contains(&level) {
        return Err(NvcError::invalid_parameter(
            "compression level",
            format!(
                "{level} is outside {MIN_COMPRESSION_LEVEL}-{MAX_COMPRESSION_LEVEL}"
            ),
        ));
    }
    Ok(flate2::Compression::new(level))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_level_to_flate2() {
        assert_eq!(
            compression_level_to_flate2(0).unwrap(),
            flate2::Compression::none()
        );
        assert_eq!(
            compression_level_to_flate2(1).unwrap(),
            flate2::Compression::fast()
        );
        assert_eq!(
            compression_level_to_flate2(DEFAULT_COMPRESSION_LEVEL).unwrap(),
            flate2::Compression::default()
        );
        assert_eq!(
            compression_level_to_flate2(9).unwrap(),
            flate2::Compression::best()
        );
    }

    #[test]
    fn test_invalid_levels_rejected() {
        for level in [10, 11, 100, u32::MAX] {
            let err = compression_level_to_flate2(level).unwrap_err();
            assert!(
                matches!(err, NvcError::InvalidParameter { name: "compression level", .. }),
                "level {level} should be rejected"
            );
        }
    }
}
