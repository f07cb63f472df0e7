//! Signup form
//!
//! Email, name and a repeated password, posted to `/signup/` behind the
//! shared submit guard. Password rules mirror what the server enforces so
//! obvious mistakes are caught before the POST; a failed submission
//! releases the guard so the user can retry instead of staring at a dead
//! button.

use crate::guard::SubmitGuard;

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password1: String,
    pub password2: String,
}

impl SignupForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Guard with the signup button's labels
    pub fn guard() -> SubmitGuard {
        SubmitGuard::new("Sign Up", "Signing up...")
    }

    /// POST target of the signup form
    pub fn action() -> &'static str {
        "/signup/"
    }

    /// First problem with the current field values, if any
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.email.trim().is_empty() || !self.email.contains('@') {
            return Err("Please enter a valid email address");
        }
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err("Please enter your first and last name");
        }
        if self.password1 != self.password2 {
            return Err("Passwords do not match");
        }
        if self.password1.chars().count() < 8 {
            return Err("Password must be at least 8 characters long");
        }
        if !self.password1.chars().any(|c| c.is_ascii_digit()) {
            return Err("Password must contain at least one number");
        }
        if !self.password1.chars().any(|c| c.is_alphabetic()) {
            return Err("Password must contain at least one letter");
        }
        Ok(())
    }

    pub fn field_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("email", self.email.clone()),
            ("first_name", self.first_name.clone()),
            ("last_name", self.last_name.clone()),
            ("password1", self.password1.clone()),
            ("password2", self.password2.clone()),
        ]
    }
}
