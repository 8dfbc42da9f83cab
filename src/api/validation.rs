use validator::Validate;

use crate::api::errors::ApiError;

pub(crate) const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn validate_password_len(password: &str) -> Result<(), ApiError> {
    if password.chars().count() >= MIN_PASSWORD_LEN {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )))
    }
}

pub(crate) fn validate_payload(payload: &impl Validate) -> Result<(), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// Path segments index into the stored `sections` array.
pub(crate) fn checked_index(raw: i64, len: usize, what: &str) -> Result<usize, ApiError> {
    usize::try_from(raw)
        .ok()
        .filter(|index| *index < len)
        .ok_or_else(|| ApiError::NotFound(format!("{what} {raw} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_length_counts_characters() {
        assert!(validate_password_len("short").is_err());
        assert!(validate_password_len("long-enough").is_ok());
        assert!(validate_password_len("пароль12").is_ok());
    }

    #[test]
    fn index_checks_bounds() {
        assert_eq!(checked_index(1, 3, "Section").unwrap(), 1);
        assert!(matches!(checked_index(3, 3, "Section"), Err(ApiError::NotFound(_))));
        assert!(matches!(checked_index(-1, 3, "Section"), Err(ApiError::NotFound(_))));
    }
}
