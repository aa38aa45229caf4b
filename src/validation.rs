//! Pure checks for the alert configuration payload. Each returns the
//! human-readable message that becomes the 400 body on failure.

pub fn validate_min_max(
    min: Option<f64>,
    max: Option<f64>,
    lower: f64,
    upper: f64,
    field: &str,
) -> Result<(), String> {
    if min.is_none() && max.is_none() {
        return Err(format!("{}: at least one of min or max is required", field));
    }
    if let Some(min) = min {
        if !(lower..=upper).contains(&min) {
            return Err(format!(
                "{}: min must be between {} and {}",
                field, lower, upper
            ));
        }
    }
    if let Some(max) = max {
        if !(lower..=upper).contains(&max) {
            return Err(format!(
                "{}: max must be between {} and {}",
                field, lower, upper
            ));
        }
    }
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(format!("{}: min must be lower than or equal to max", field));
        }
    }

    Ok(())
}

pub fn validate_toggle(
    toggle: Option<f64>,
    lower: f64,
    upper: f64,
    field: &str,
) -> Result<(), String> {
    match toggle {
        None => Err(format!("{}: toggle is required", field)),
        Some(toggle) if !(lower..=upper).contains(&toggle) => Err(format!(
            "{}: toggle must be between {} and {}",
            field, lower, upper
        )),
        Some(_) => Ok(()),
    }
}

pub fn validate_ids(
    ids: Option<&[String]>,
    allowed: &[String],
    field: &str,
) -> Result<(), String> {
    let ids = match ids {
        Some(ids) => ids,
        None => return Err(format!("{}: controlledLights is required", field)),
    };
    if ids.is_empty() {
        return Err(format!("{}: controlledLights must not be empty", field));
    }
    if let Some(unknown) = ids.iter().find(|id| !allowed.iter().any(|a| a == *id)) {
        return Err(format!("{}: unknown light id {}", field, unknown));
    }

    Ok(())
}
