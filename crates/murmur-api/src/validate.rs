use crate::error::{ApiError, FieldError};

pub const USERNAME_MIN: usize = 2;
pub const USERNAME_MAX: usize = 20;
pub const PASSWORD_MIN: usize = 6;
pub const CONTENT_MIN: usize = 5;
pub const CONTENT_MAX: usize = 300;

pub fn username(value: &str) -> Result<(), FieldError> {
    let len = value.chars().count();
    if len < USERNAME_MIN {
        return Err(FieldError::new(
            "username",
            format!("username must be at least {USERNAME_MIN} characters"),
        ));
    }
    if len > USERNAME_MAX {
        return Err(FieldError::new(
            "username",
            format!("username must not exceed {USERNAME_MAX} characters"),
        ));
    }
    if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(FieldError::new(
            "username",
            "username may only contain letters, numbers, and underscores",
        ));
    }
    Ok(())
}

/// Syntactic check only: one `@`, non-empty local part, dotted domain.
/// Deliverability is out of scope (email dispatch is disabled).
pub fn email(value: &str) -> Result<(), FieldError> {
    let invalid = || FieldError::new("email", "invalid email address");

    if value.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid());
    }
    Ok(())
}

pub fn password(value: &str) -> Result<(), FieldError> {
    if value.chars().count() < PASSWORD_MIN {
        return Err(FieldError::new(
            "password",
            format!("password must be at least {PASSWORD_MIN} characters"),
        ));
    }
    Ok(())
}

/// Canonical message bound is 5-300 characters. The original UI copy said
/// "10" in one place; that inconsistency is not preserved.
pub fn content(value: &str) -> Result<(), ApiError> {
    let len = value.chars().count();
    if len < CONTENT_MIN || len > CONTENT_MAX {
        return Err(ApiError::Validation(vec![FieldError::new(
            "content",
            format!("content must be between {CONTENT_MIN} and {CONTENT_MAX} characters"),
        )]));
    }
    Ok(())
}

/// Collects every field failure so the caller can fix them all in one pass.
pub fn sign_up(username_v: &str, email_v: &str, password_v: &str) -> Result<(), ApiError> {
    let mut errors = Vec::new();
    if let Err(e) = username(username_v) {
        errors.push(e);
    }
    if let Err(e) = email(email_v) {
        errors.push(e);
    }
    if let Err(e) = password(password_v) {
        errors.push(e);
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_bounds() {
        assert!(username("ab").is_ok());
        assert!(username("a".repeat(20).as_str()).is_ok());
        assert!(username("under_score_99").is_ok());

        assert!(username("a").is_err());
        assert!(username("a".repeat(21).as_str()).is_err());
        assert!(username("no spaces").is_err());
        assert!(username("hyphen-ated").is_err());
    }

    #[test]
    fn email_shapes() {
        assert!(email("a@x.com").is_ok());
        assert!(email("first.last@sub.domain.org").is_ok());

        assert!(email("not-an-email").is_err());
        assert!(email("@x.com").is_err());
        assert!(email("a@").is_err());
        assert!(email("a@nodot").is_err());
        assert!(email("a@x.com ").is_err());
        assert!(email("a@b@c.com").is_err());
    }

    #[test]
    fn sign_up_collects_all_field_errors() {
        let err = sign_up("!", "bad", "pw").unwrap_err();
        match err {
            ApiError::Validation(fields) => {
                let names: Vec<_> = fields.iter().map(|f| f.field).collect();
                assert_eq!(names, vec!["username", "email", "password"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn content_bounds() {
        assert!(content("hello").is_ok());
        assert!(content(&"x".repeat(300)).is_ok());
        assert!(content("hey").is_err());
        assert!(content(&"x".repeat(301)).is_err());
    }
}
