use thiserror::Error;

pub const TITLE_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 500;

/// A Todo that would violate its schema. The `Display` text is what API
/// clients see in the `error` field of a 400 response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title is required")]
    TitleRequired,
    #[error("Title cannot exceed {max} characters")]
    TitleTooLong { max: usize },
    #[error("Description cannot exceed {max} characters")]
    DescriptionTooLong { max: usize },
    #[error("`{0}` is not a valid priority, expected one of: low, medium, high")]
    InvalidPriority(String),
}

pub(crate) fn normalize(value: &str) -> String {
    value.trim().to_owned()
}

pub(crate) fn check_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::TitleRequired);
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(ValidationError::TitleTooLong { max: TITLE_MAX_LEN });
    }
    Ok(())
}

pub(crate) fn check_description(description: &str) -> Result<(), ValidationError> {
    if description.chars().count() > DESCRIPTION_MAX_LEN {
        return Err(ValidationError::DescriptionTooLong {
            max: DESCRIPTION_MAX_LEN,
        });
    }
    Ok(())
}
