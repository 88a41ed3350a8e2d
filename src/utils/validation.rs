//! Client-side validators for credential forms.
//!
//! Single-value validators follow the `fn(&str) -> Option<String>` shape:
//! `None` when valid, `Some(message)` otherwise.

/// Characters accepted as the "special character" in a password.
pub const PASSWORD_SPECIALS: &[char] = &['!', '@', '#', '$', '%', '^', '&', '*'];

pub const MIN_PASSWORD_LEN: usize = 6;

/// Validate that a field is not empty.
pub fn required(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        Some("This field is required".to_string())
    } else {
        None
    }
}

/// Validate that a field looks like an email address.
pub fn email(value: &str) -> Option<String> {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain))
            if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
        {
            None
        }
        _ => Some("Please enter a valid email address".to_string()),
    }
}

/// Every password rule the value breaks, in display order.
///
/// An empty password yields no rule errors; emptiness is reported by the
/// "fill in all fields" check instead.
pub fn password_errors(password: &str, confirm: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if password.is_empty() {
        return errors;
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        ));
    }
    if !confirm.is_empty() && password != confirm {
        errors.push("Passwords do not match".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one number".to_string());
    }
    if !password.chars().any(|c| PASSWORD_SPECIALS.contains(&c)) {
        errors.push("Password must contain at least one special character".to_string());
    }
    errors
}

/// Fields of the registration form.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl Registration {
    pub fn new(email: &str, password: &str, confirm_password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm_password.to_string(),
        }
    }

    /// All problems blocking submission. Empty means the form may be sent.
    pub fn validate(&self) -> Vec<String> {
        if [&self.email, &self.password, &self.confirm_password]
            .iter()
            .any(|v| required(v).is_some())
        {
            return vec!["Please fill in all fields".to_string()];
        }
        let mut errors = Vec::new();
        if let Some(err) = email(&self.email) {
            errors.push(err);
        }
        errors.extend(password_errors(&self.password, &self.confirm_password));
        errors
    }
}
