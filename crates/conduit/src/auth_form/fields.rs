//! Field configuration and validation rules for the authorization form.

use std::collections::BTreeMap;

use regex::Regex;

/// Username field name.
pub const USERNAME: &str = "username";
/// Email field name.
pub const EMAIL: &str = "email";
/// Password field name.
pub const PASSWORD: &str = "password";
/// Password confirmation field name.
pub const REPEAT_PASSWORD: &str = "repeatPassword";
/// Terms-of-service checkbox name.
pub const IS_AGREE: &str = "isAgree";

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// A single check applied to a field value.
///
/// Every rule except [`ValidationRule::Required`] passes on an empty value.
#[derive(Debug, Clone)]
pub enum ValidationRule {
    /// The value must not be blank.
    Required(String),
    /// At least this many characters.
    MinLength(usize, String),
    /// At most this many characters.
    MaxLength(usize, String),
    /// Must match the regex.
    Pattern(Regex, String),
    /// Must equal the value of another field.
    MatchesField {
        /// The other field.
        field: String,
        /// Message when the values differ.
        message: String,
    },
}

impl ValidationRule {
    /// Check `value`, returning the failure message if the rule is broken.
    #[must_use]
    pub fn check(&self, value: &str, values: &BTreeMap<String, String>) -> Option<&str> {
        let failed = match self {
            Self::Required(_) => value.trim().is_empty(),
            _ if value.is_empty() => false,
            Self::MinLength(min, _) => value.chars().count() < *min,
            Self::MaxLength(max, _) => value.chars().count() > *max,
            Self::Pattern(regex, _) => !regex.is_match(value),
            Self::MatchesField { field, .. } => {
                values.get(field).map(String::as_str).unwrap_or_default() != value
            }
        };
        failed.then(|| self.message())
    }

    /// The failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Required(message)
            | Self::MinLength(_, message)
            | Self::MaxLength(_, message)
            | Self::Pattern(_, message)
            | Self::MatchesField { message, .. } => message,
        }
    }
}

/// One input of the form.
#[derive(Debug, Clone)]
pub struct FieldConfig {
    /// Key under which the value is submitted.
    pub name: String,
    /// Rules checked in order; the first failure is reported.
    pub rules: Vec<ValidationRule>,
}

impl FieldConfig {
    /// Create a field with no rules.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
        }
    }

    /// Append a rule.
    #[must_use]
    pub fn rule(mut self, rule: ValidationRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// First rule `value` breaks.
    #[must_use]
    pub fn validate(&self, value: &str, values: &BTreeMap<String, String>) -> Option<String> {
        self.rules
            .iter()
            .find_map(|rule| rule.check(value, values))
            .map(str::to_string)
    }
}

fn email_rule() -> ValidationRule {
    // The pattern is a literal; compiling it cannot fail
    let regex = Regex::new(EMAIL_PATTERN).expect("Invalid email pattern");
    ValidationRule::Pattern(regex, "Email must be a valid address".to_string())
}

fn required(message: &str) -> ValidationRule {
    ValidationRule::Required(message.to_string())
}

/// Fields of the sign-in form.
///
/// # Panics
///
/// Panics if the built-in email pattern fails to compile.
#[must_use]
pub fn login_fields() -> Vec<FieldConfig> {
    vec![
        FieldConfig::new(EMAIL)
            .rule(required("Email is required"))
            .rule(email_rule()),
        FieldConfig::new(PASSWORD)
            .rule(required("Password is required")),
    ]
}

/// Fields of the sign-up form, without the confirmation rule.
///
/// The form adds the password-confirmation rule itself in register mode.
///
/// # Panics
///
/// Panics if the built-in email pattern fails to compile.
#[must_use]
pub fn register_fields() -> Vec<FieldConfig> {
    vec![
        FieldConfig::new(USERNAME)
            .rule(required("Username is required"))
            .rule(ValidationRule::MinLength(
                3,
                "Your username needs to be at least 3 characters.".to_string(),
            ))
            .rule(ValidationRule::MaxLength(
                20,
                "Your username must be at most 20 characters.".to_string(),
            )),
        FieldConfig::new(EMAIL)
            .rule(required("Email is required"))
            .rule(email_rule()),
        FieldConfig::new(PASSWORD)
            .rule(required("Password is required"))
            .rule(ValidationRule::MinLength(
                6,
                "Your password needs to be at least 6 characters.".to_string(),
            ))
            .rule(ValidationRule::MaxLength(
                40,
                "Your password must be at most 40 characters.".to_string(),
            )),
        FieldConfig::new(REPEAT_PASSWORD)
            .rule(required("Please repeat your password")),
    ]
}

/// Rule requiring the confirmation to equal the password.
#[must_use]
pub fn repeat_password_rule() -> ValidationRule {
    ValidationRule::MatchesField {
        field: PASSWORD.to_string(),
        message: "Passwords must match".to_string(),
    }
}
