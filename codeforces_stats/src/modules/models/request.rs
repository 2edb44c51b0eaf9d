use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

/// Codeforces handles are ASCII alphanumerics plus `.`, `_` and `-`.
static HANDLE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9A-Za-z._-]{1,64}$").unwrap());

fn validate_handles(handles: &Vec<String>) -> Result<(), ValidationError> {
    if handles.iter().all(|h| HANDLE_PATTERN.is_match(h)) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid handle"))
    }
}

#[derive(Debug, Validate, PartialEq, Eq)]
pub struct HandleList {
    #[validate(length(min = 1), custom = "validate_handles")]
    pub handles: Vec<String>,
}

impl HandleList {
    /// Splits a path segment on `;` or `,`, trimming whitespace and dropping
    /// empty items. An empty resulting list is a validation error.
    pub fn parse(raw: &str) -> Result<Self, ValidationErrors> {
        let handles = raw
            .replace(',', ";")
            .split(';')
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(String::from)
            .collect();

        let list = HandleList { handles };
        list.validate()?;
        Ok(list)
    }
}

#[derive(Debug, Deserialize)]
pub struct UpcomingContestsQuery {
    #[serde(default)]
    pub gym: bool,
}
