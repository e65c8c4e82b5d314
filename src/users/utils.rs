use crate::types::ValidationError;
use regex::Regex;

pub const MIN_PASSWORD_LEN: usize = 5;

lazy_static! {
    static ref USERNAME_RE: Regex = {
        let pattern = r"\A[A-Za-z0-9_.\-]{3,32}\z";
        Regex::new(pattern).unwrap()
    };
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.chars().count() < 3 {
        Err(ValidationError::from(
            "username",
            format!("Username too short: {}", username),
        ))
    } else if !USERNAME_RE.is_match(username) {
        Err(ValidationError::from(
            "username",
            format!("Invalid username: {}", username),
        ))
    } else {
        Ok(())
    }
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        Err(ValidationError::from("password", "Password too short"))
    } else {
        Ok(())
    }
}
