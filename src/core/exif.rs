// src/core/exif.rs
use std::io::Cursor;

use exif::{Exif, Field, In, Reader, Tag, Value};
use thiserror::Error;
use tracing::debug;

use super::geo::Coordinates;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("{0}")]
    Unreadable(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("extraction timed out after {0}s")]
    Timeout(u64),

    #[error("extraction aborted: {0}")]
    Aborted(String),
}

/// Source of the geolocation embedded in an uploaded image.
///
/// `Ok(None)` means the image was readable but carries no usable GPS tags.
#[cfg_attr(test, mockall::automock)]
pub trait GpsExtractor: Send + Sync {
    fn extract(&self, image: &[u8]) -> Result<Option<Coordinates>, ExtractionError>;
}

/// Reads the GPS IFD from any container kamadak-exif understands
/// (JPEG, TIFF, HEIF, PNG, WebP).
#[derive(Debug, Default, Clone)]
pub struct ExifGpsExtractor;

impl ExifGpsExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl GpsExtractor for ExifGpsExtractor {
    fn extract(&self, image: &[u8]) -> Result<Option<Coordinates>, ExtractionError> {
        let exif = match Reader::new().read_from_container(&mut Cursor::new(image)) {
            Ok(exif) => exif,
            Err(exif::Error::NotFound(container)) => {
                debug!(container, "Image carries no EXIF block");
                return Ok(None);
            }
            Err(exif::Error::Io(e)) => return Err(ExtractionError::Io(e)),
            Err(e) => return Err(ExtractionError::Unreadable(e.to_string())),
        };

        Ok(gps_coordinates(&exif))
    }
}

fn gps_coordinates(exif: &Exif) -> Option<Coordinates> {
    let latitude = signed_degrees(
        exif.get_field(Tag::GPSLatitude, In::PRIMARY)?,
        exif.get_field(Tag::GPSLatitudeRef, In::PRIMARY)?,
        b'N',
        b'S',
    )?;
    let longitude = signed_degrees(
        exif.get_field(Tag::GPSLongitude, In::PRIMARY)?,
        exif.get_field(Tag::GPSLongitudeRef, In::PRIMARY)?,
        b'E',
        b'W',
    )?;

    if latitude.abs() > 90.0 || longitude.abs() > 180.0 {
        debug!(latitude, longitude, "GPS tags out of range");
        return None;
    }

    Some(Coordinates::new(latitude, longitude))
}

fn signed_degrees(value: &Field, reference: &Field, positive: u8, negative: u8) -> Option<f64> {
    let degrees = dms_to_degrees(value)?;

    match hemisphere(reference)? {
        c if c == positive => Some(degrees),
        c if c == negative => Some(-degrees),
        _ => None,
    }
}

// Degrees, minutes, seconds as three rationals.
fn dms_to_degrees(field: &Field) -> Option<f64> {
    match field.value {
        Value::Rational(ref parts) if parts.len() >= 3 => {
            let mut degrees = 0.0;
            for (part, scale) in parts.iter().zip([1.0, 60.0, 3600.0]) {
                if part.denom == 0 {
                    return None;
                }
                degrees += part.to_f64() / scale;
            }
            Some(degrees).filter(|d| d.is_finite())
        }
        _ => None,
    }
}

fn hemisphere(field: &Field) -> Option<u8> {
    match field.value {
        Value::Ascii(ref strings) => strings
            .first()
            .and_then(|s| s.first())
            .map(|c| c.to_ascii_uppercase()),
        _ => None,
    }
}
