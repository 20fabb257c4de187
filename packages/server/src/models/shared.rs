use crate::error::AppError;

/// Validate a trimmed display string of at most `max` Unicode characters.
pub fn validate_text(value: &str, field: &str, max: usize) -> Result<(), AppError> {
    let value = value.trim();
    if value.is_empty() || value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{field} must be 1-{max} characters"
        )));
    }
    Ok(())
}

/// Validate that a measure is a finite, non-negative number.
pub fn validate_non_negative(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::Validation(format!(
            "{field} must be a non-negative number"
        )));
    }
    Ok(())
}

/// Validate that `value` lies in `[min, max]`.
pub fn validate_range(value: f64, min: f64, max: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() || value < min || value > max {
        return Err(AppError::Validation(format!(
            "{field} must be between {min} and {max}"
        )));
    }
    Ok(())
}
