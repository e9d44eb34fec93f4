//! Input validation for values arriving from the command line.

use crate::errors::{AppError, AppResult};
use crate::models::coords::Coordinates;
use regex::Regex;

pub fn validate_coordinates(c: &Coordinates) -> AppResult<()> {
    if !(-90.0..=90.0).contains(&c.lat) {
        return Err(AppError::InvalidCoordinates(
            "latitude must be between -90 and 90".into(),
        ));
    }
    if !(-180.0..=180.0).contains(&c.lng) {
        return Err(AppError::InvalidCoordinates(
            "longitude must be between -180 and 180".into(),
        ));
    }
    if let Some(acc) = c.accuracy
        && acc < 0.0
    {
        return Err(AppError::InvalidCoordinates(
            "accuracy must not be negative".into(),
        ));
    }
    Ok(())
}

/// Build coordinates from optional flags. Latitude and longitude go together.
pub fn coords_from_flags(
    lat: Option<f64>,
    lng: Option<f64>,
    accuracy: Option<f64>,
) -> AppResult<Option<Coordinates>> {
    match (lat, lng) {
        (Some(lat), Some(lng)) => {
            let c = Coordinates::new(lat, lng, accuracy);
            validate_coordinates(&c)?;
            Ok(Some(c))
        }
        (None, None) if accuracy.is_none() => Ok(None),
        _ => Err(AppError::InvalidCoordinates(
            "--lat and --lng must be given together".into(),
        )),
    }
}

pub fn validate_student_code(code: &str) -> AppResult<()> {
    let re = Regex::new(r"^[a-zA-Z0-9\-_]+$").unwrap();
    if code.is_empty() || code.len() > 20 || !re.is_match(code) {
        return Err(AppError::InvalidUser(format!(
            "student code '{}' must be 1-20 letters, digits, '-' or '_'",
            code
        )));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> AppResult<()> {
    let re = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    if email.len() > 255 || !re.is_match(email) {
        return Err(AppError::InvalidUser(format!("invalid email '{}'", email)));
    }
    Ok(())
}

pub fn validate_name(name: &str, field: &str) -> AppResult<()> {
    let re = Regex::new(r"^[\p{L}\s\-']+$").unwrap();
    if name.trim().is_empty() || name.len() > 100 || !re.is_match(name) {
        return Err(AppError::InvalidUser(format!(
            "{} '{}' contains invalid characters",
            field, name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_bounds() {
        assert!(coords_from_flags(Some(45.0), Some(9.0), Some(12.0)).unwrap().is_some());
        assert!(coords_from_flags(None, None, None).unwrap().is_none());
        assert!(coords_from_flags(Some(91.0), Some(0.0), None).is_err());
        assert!(coords_from_flags(Some(0.0), Some(-180.5), None).is_err());
        assert!(coords_from_flags(Some(1.0), None, None).is_err());
        assert!(coords_from_flags(None, None, Some(5.0)).is_err());
    }

    #[test]
    fn user_fields() {
        assert!(validate_student_code("S-2025_01").is_ok());
        assert!(validate_student_code("has space").is_err());
        assert!(validate_email("ada@uni.edu").is_ok());
        assert!(validate_email("ada.uni.edu").is_err());
        assert!(validate_name("Anne-Marie O'Neil", "First name").is_ok());
        assert!(validate_name("José", "First name").is_ok());
        assert!(validate_name("R2D2", "Last name").is_err());
    }
}
