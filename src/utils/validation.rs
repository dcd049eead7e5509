use crate::utils::error::{DashboardError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> DashboardError {
    DashboardError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Only http(s) endpoints are accepted.
pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    let url = Url::parse(url_str)
        .map_err(|e| invalid(field_name, url_str, format!("Invalid URL format: {}", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid(
            field_name,
            url_str,
            format!("Unsupported URL scheme: {}", scheme),
        )),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        Err(invalid(field_name, path, "Path cannot be empty"))
    } else if path.contains('\0') {
        Err(invalid(field_name, path, "Path contains null bytes"))
    } else {
        Ok(())
    }
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| DashboardError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field_name, value, "Value cannot be empty or whitespace-only"));
    }
    Ok(())
}

pub fn validate_range<T>(field_name: &str, value: T, min: T, max: T) -> Result<()>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(invalid(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ))
    }
}

/// Checks shared by every config front end: chart settings and output path.
pub fn validate_presentation(
    output_path: &str,
    bins: usize,
    chart_size: (u32, u32),
) -> Result<()> {
    validate_path("output_path", output_path)?;
    validate_range("histogram_bins", bins, 1, 100)?;
    validate_range("chart_width", chart_size.0, 200, 2000)?;
    validate_range("chart_height", chart_size.1, 200, 2000)?;
    Ok(())
}
