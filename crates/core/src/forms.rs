// Client-side form checks shared by login and the dashboard forms
// Failures are ClientError::Validation and never reach the network

use crate::error::{ClientError, Result};

/// Reject blank input with the form's message
pub fn require(value: &str, message: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(ClientError::validation(message))
    } else {
        Ok(())
    }
}

/// Loose address check, the server does the real validation
pub fn looks_like_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

/// Confirmation field must repeat the password exactly
pub fn confirm_password(password: &str, confirmation: &str) -> Result<()> {
    require(confirmation, "Please confirm your password!")?;
    if password != confirmation {
        return Err(ClientError::validation(
            "The new password that you entered do not match!",
        ));
    }
    Ok(())
}

/// Split a comma-separated tag list, dropping blanks
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
