use crate::error::AppError;

pub fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

pub fn require_valid_id(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must be a valid ID")));
    }
    Ok(())
}

/// Canonical form of a trigger keyword: trimmed and uppercased.
///
/// Both stored triggers and extracted message tokens go through this, so
/// equality on the normalized text is the case-insensitive comparison.
pub fn normalize_trigger_text(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Validate and normalize trigger text supplied by an operator.
pub fn require_trigger_text(value: &str) -> Result<String, AppError> {
    require_non_empty("triggerText", value)?;
    let normalized = normalize_trigger_text(value);
    if !normalized.starts_with('#') {
        return Err(AppError::Validation("triggerText must start with #".into()));
    }
    if normalized.chars().count() < 2 {
        return Err(AppError::Validation(
            "triggerText needs at least one character after #".into(),
        ));
    }
    Ok(normalized)
}

pub fn require_response_text(value: &str) -> Result<String, AppError> {
    require_non_empty("responseText", value)?;
    Ok(value.trim().to_string())
}

/// Largest usage count a record may hold: the largest integer a JSON client
/// reads back exactly. Increments stop here.
pub const MAX_USAGE_COUNT: i64 = 9_007_199_254_740_991;

pub fn require_usage_count(value: i64) -> Result<i64, AppError> {
    if value < 0 {
        return Err(AppError::Validation("usageCount cannot be negative".into()));
    }
    if value > MAX_USAGE_COUNT {
        return Err(AppError::Validation(format!(
            "usageCount cannot exceed {MAX_USAGE_COUNT}"
        )));
    }
    Ok(value)
}
