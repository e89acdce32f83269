//! Credential form validation.
//!
//! Every rule runs on every pass, so one call reports all violated fields.
//! Results are rebuilt from scratch each time; nothing carries over from a
//! previous submission.

use crate::state::{AuthMode, Role};
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// Form field names as they appear in the error map.
pub mod fields {
    /// Display name (signup)
    pub const NAME: &str = "name";
    /// Email address
    pub const EMAIL: &str = "email";
    /// Password
    pub const PASSWORD: &str = "password";
    /// Password confirmation (signup)
    pub const CONFIRM_PASSWORD: &str = "confirmPassword";
}

/// Minimum password length for new accounts, in characters.
pub const MIN_SIGNUP_PASSWORD_CHARS: usize = 8;

/// Local part, `@`, dot-separated labels, alphabetic TLD.
///
/// Leading dots and `..` in the local part are rejected separately since
/// the regex engine has no lookaround.
#[allow(clippy::expect_used)] // constant pattern
static EMAIL_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@(?:[A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

/// Whether `email` is a syntactically valid address.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    !email.starts_with('.') && !email.contains("..") && EMAIL_GRAMMAR.is_match(email)
}

/// Per-field validation messages, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    /// Empty error map.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Append a message for `field`.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    /// Messages for `field`, in the order the rules ran.
    #[must_use]
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether `field` has any message.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Whether no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failed fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Failed field names.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    /// `(field, messages)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[String])> + '_ {
        self.0.iter().map(|(field, messages)| (*field, messages.as_slice()))
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in self.iter() {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Sign-in form payload.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
    /// "Remember me" checkbox
    pub remember_me: bool,
}

impl LoginForm {
    /// Build a login payload.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            remember_me: false,
        }
    }

    /// Set the "remember me" flag.
    #[must_use]
    pub const fn with_remember_me(mut self, remember_me: bool) -> Self {
        self.remember_me = remember_me;
        self
    }

    /// Check the payload against the login schema.
    ///
    /// # Errors
    ///
    /// Returns every violated field.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if !is_valid_email(&self.email) {
            errors.push(fields::EMAIL, "Invalid email address");
        }
        if self.password.is_empty() {
            errors.push(fields::PASSWORD, "Password is required");
        }

        errors.into_result()
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("remember_me", &self.remember_me)
            .finish()
    }
}

/// Registration form payload.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
    /// Password typed a second time
    pub confirm_password: String,
    /// Requested role; the backend default applies when absent
    pub role: Option<Role>,
}

impl SignupForm {
    /// Build a signup payload with matching confirmation.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let password = password.into();
        Self {
            name: name.into(),
            email: email.into(),
            confirm_password: password.clone(),
            password,
            role: None,
        }
    }

    /// Set the confirmation field.
    #[must_use]
    pub fn with_confirmation(mut self, confirm_password: impl Into<String>) -> Self {
        self.confirm_password = confirm_password.into();
        self
    }

    /// Request a role.
    #[must_use]
    pub const fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Role sent to the backend.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role.unwrap_or_default()
    }

    /// Check the payload against the signup schema.
    ///
    /// A mismatched confirmation is reported on `confirmPassword` only.
    ///
    /// # Errors
    ///
    /// Returns every violated field.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.name.is_empty() {
            errors.push(fields::NAME, "Name is required");
        }
        if !is_valid_email(&self.email) {
            errors.push(fields::EMAIL, "Invalid email address");
        }
        if self.password.chars().count() < MIN_SIGNUP_PASSWORD_CHARS {
            errors.push(fields::PASSWORD, "Password must be at least 8 characters");
        }
        if self.password != self.confirm_password {
            errors.push(fields::CONFIRM_PASSWORD, "Passwords do not match");
        }

        errors.into_result()
    }
}

impl fmt::Debug for SignupForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("confirm_password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Either credential form, tagged by the screen it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialForm {
    /// Sign-in
    Login(LoginForm),
    /// Registration
    Signup(SignupForm),
}

impl CredentialForm {
    /// Screen the form belongs to.
    #[must_use]
    pub const fn mode(&self) -> AuthMode {
        match self {
            Self::Login(_) => AuthMode::Login,
            Self::Signup(_) => AuthMode::Signup,
        }
    }

    /// Validate with the schema for this form's mode.
    ///
    /// # Errors
    ///
    /// Returns every violated field.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        match self {
            Self::Login(form) => form.validate(),
            Self::Signup(form) => form.validate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_form_picks_schema_by_mode() {
        // Seven characters pass login but not signup
        let login = CredentialForm::Login(LoginForm::new("a@b.com", "1234567"));
        let signup = CredentialForm::Signup(SignupForm::new("Ada", "a@b.com", "1234567"));

        assert_eq!(login.mode(), AuthMode::Login);
        assert!(login.validate().is_ok());

        assert_eq!(signup.mode(), AuthMode::Signup);
        let errors = signup.validate().unwrap_err();
        assert!(errors.contains(fields::PASSWORD));
        assert!(!errors.contains(fields::NAME));
    }

    #[test]
    fn accepts_common_addresses() {
        for email in [
            "a@b.com",
            "first.last@relief.example.org",
            "o'brien+alerts@sub-domain.example.co",
        ] {
            assert!(is_valid_email(email), "{email} should be valid");
        }
    }

    #[test]
    fn rejects_malformed_addresses() {
        for email in [
            "",
            "bad",
            "@b.com",
            "a@b",
            "a@b.c",
            ".a@b.com",
            "a..b@b.com",
            "a.@b.com",
            "a@-b.com",
            "a b@c.com",
        ] {
            assert!(!is_valid_email(email), "{email} should be invalid");
        }
    }

    #[test]
    fn login_with_short_password_is_valid() {
        assert_eq!(LoginForm::new("a@b.com", "short").validate(), Ok(()));
    }

    #[test]
    fn login_reports_both_fields() {
        let errors = LoginForm::new("nope", "").validate().unwrap_err();
        assert_eq!(errors.get(fields::EMAIL), ["Invalid email address"]);
        assert_eq!(errors.get(fields::PASSWORD), ["Password is required"]);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn signup_reports_every_violation_in_one_pass() {
        let errors = SignupForm::new("", "bad", "1234567").validate().unwrap_err();

        assert_eq!(errors.get(fields::NAME), ["Name is required"]);
        assert_eq!(errors.get(fields::EMAIL), ["Invalid email address"]);
        assert_eq!(
            errors.get(fields::PASSWORD),
            ["Password must be at least 8 characters"]
        );
        assert!(!errors.contains(fields::CONFIRM_PASSWORD));
    }

    #[test]
    fn mismatch_is_attributed_to_confirmation() {
        let errors = SignupForm::new("Ada", "ada@relief.example", "correct horse")
            .with_confirmation("battery staple")
            .validate()
            .unwrap_err();

        assert_eq!(errors.fields().collect::<Vec<_>>(), [fields::CONFIRM_PASSWORD]);
        assert_eq!(errors.get(fields::CONFIRM_PASSWORD), ["Passwords do not match"]);
    }

    #[test]
    fn password_length_counts_characters() {
        let form = SignupForm::new("Ada", "ada@relief.example", "ééééééé");
        assert!(form.validate().unwrap_err().contains(fields::PASSWORD));

        let form = SignupForm::new("Ada", "ada@relief.example", "éééééééé");
        assert_eq!(form.validate(), Ok(()));
    }

    #[test]
    fn signup_role_defaults_to_standard() {
        let form = SignupForm::new("Ada", "ada@relief.example", "password1");
        assert_eq!(form.role(), Role::Standard);
        assert_eq!(form.with_role(Role::Volunteer).role(), Role::Volunteer);
    }

    #[test]
    fn debug_redacts_passwords() {
        let rendered = format!("{:?}", SignupForm::new("Ada", "a@b.com", "hunter22"));
        assert!(!rendered.contains("hunter22"));
    }

    #[test]
    fn display_lists_messages() {
        let errors = LoginForm::new("nope", "").validate().unwrap_err();
        assert_eq!(
            errors.to_string(),
            "email: Invalid email address; password: Password is required"
        );
    }
}
