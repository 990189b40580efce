//! Sign-in and sign-up form.
//!
//! The form owns its field values and errors. Validation runs on submit;
//! only a valid form reaches the caller's handler. Server rejections come
//! back through [`AuthorizationForm::apply_server_error`].

pub mod fields;

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use crate::api::{ApiError, INVALID_CREDENTIALS_KEY};
use crate::store::{Action, Store};

pub use fields::{FieldConfig, ValidationRule};

/// Message shown when the server rejects the credentials.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Email or password is invalid";

/// Message shown when the terms checkbox is unticked on sign-up.
pub const TERMS_REQUIRED_MESSAGE: &str = "You must agree to the terms and conditions.";

/// Which form is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    /// Sign in with email and password.
    Login,
    /// Create an account.
    Register,
}

impl FormMode {
    /// Heading of the form.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Login => "Sign In",
            Self::Register => "Create new account",
        }
    }
}

/// Error attached to a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// A validation rule failed.
    Invalid(String),
    /// The server rejected the field; the message is shown once for the form.
    Server,
}

/// Validated values handed to the submit handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormData {
    values: BTreeMap<String, String>,
}

impl FormData {
    /// Value of a field, empty if the form has no such field.
    #[must_use]
    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map_or("", String::as_str)
    }
}

/// Submission blocked by validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("form has {} invalid field(s)", .fields.len())]
pub struct InvalidForm {
    /// Field name and message for each failing field.
    pub fields: Vec<(String, String)>,
}

/// The authorization form.
#[derive(Debug, Clone)]
pub struct AuthorizationForm {
    mode: FormMode,
    fields: Vec<FieldConfig>,
    values: BTreeMap<String, String>,
    agreed: bool,
    errors: BTreeMap<String, FieldError>,
    general_error: Option<String>,
}

impl AuthorizationForm {
    /// Build a form over the given fields.
    ///
    /// In register mode the password confirmation field also gets a rule
    /// requiring it to match the password.
    #[must_use]
    pub fn new(mode: FormMode, mut fields: Vec<FieldConfig>) -> Self {
        if mode == FormMode::Register {
            if let Some(repeat) = fields
                .iter_mut()
                .find(|field| field.name == fields::REPEAT_PASSWORD)
            {
                repeat.rules.push(fields::repeat_password_rule());
            }
        }
        let values = fields
            .iter()
            .map(|field| (field.name.clone(), String::new()))
            .collect();

        Self {
            mode,
            fields,
            values,
            agreed: false,
            errors: BTreeMap::new(),
            general_error: None,
        }
    }

    /// Sign-in form with the standard fields.
    #[must_use]
    pub fn login() -> Self {
        Self::new(FormMode::Login, fields::login_fields())
    }

    /// Sign-up form with the standard fields.
    #[must_use]
    pub fn register() -> Self {
        Self::new(FormMode::Register, fields::register_fields())
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> FormMode {
        self.mode
    }

    /// Set a field value. Unknown names are ignored.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) {
        if let Some(slot) = self.values.get_mut(name) {
            *slot = value.into();
        }
    }

    /// Tick or untick the terms checkbox.
    pub fn set_agreed(&mut self, agreed: bool) {
        self.agreed = agreed;
    }

    /// Error on a field.
    #[must_use]
    pub fn field_error(&self, name: &str) -> Option<&FieldError> {
        self.errors.get(name)
    }

    /// Form-wide error message.
    #[must_use]
    pub fn general_error(&self) -> Option<&str> {
        self.general_error.as_deref()
    }

    /// Run every rule, replacing the previous field errors.
    ///
    /// Returns `true` if the form is valid.
    pub fn validate(&mut self) -> bool {
        self.errors.clear();
        for field in &self.fields {
            let value = self.values.get(&field.name).map_or("", String::as_str);
            if let Some(message) = field.validate(value, &self.values) {
                self.errors
                    .insert(field.name.clone(), FieldError::Invalid(message));
            }
        }
        if self.mode == FormMode::Register && !self.agreed {
            self.errors.insert(
                fields::IS_AGREE.to_string(),
                FieldError::Invalid(TERMS_REQUIRED_MESSAGE.to_string()),
            );
        }
        self.errors.is_empty()
    }

    /// Validate and hand the values to `handler`.
    ///
    /// A general error left by a previous attempt is cleared along with the
    /// server markers on the credential fields, and the notification store is
    /// reset before `handler` runs.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidForm`] without calling `handler` if any field fails
    /// validation.
    pub fn submit<R>(
        &mut self,
        store: &mut Store,
        handler: impl FnOnce(FormData) -> R,
    ) -> Result<R, InvalidForm> {
        if !self.validate() {
            let fields = self
                .errors
                .iter()
                .filter_map(|(name, error)| match error {
                    FieldError::Invalid(message) => Some((name.clone(), message.clone())),
                    FieldError::Server => None,
                })
                .collect();
            return Err(InvalidForm { fields });
        }

        if self.general_error.take().is_some() {
            self.errors.remove(fields::EMAIL);
            self.errors.remove(fields::PASSWORD);
        }
        store.dispatch(Action::ClearError);

        debug!(mode = ?self.mode, "submitting authorization form");
        Ok(handler(FormData {
            values: self.values.clone(),
        }))
    }

    /// Show a server rejection.
    ///
    /// Rejected credentials mark both credential fields and set the form-wide
    /// message. Any other failure goes to the notification store.
    pub fn apply_server_error(&mut self, store: &mut Store, error: &ApiError) {
        match error.server_errors() {
            Some(errors) if errors.contains(INVALID_CREDENTIALS_KEY) => {
                self.errors
                    .insert(fields::EMAIL.to_string(), FieldError::Server);
                self.errors
                    .insert(fields::PASSWORD.to_string(), FieldError::Server);
                self.general_error = Some(INVALID_CREDENTIALS_MESSAGE.to_string());
            }
            Some(errors) => store.dispatch(Action::SetError(errors.to_string())),
            None => store.dispatch(Action::SetError(error.to_string())),
        }
    }

    /// Tear the form down, clearing any shown notification.
    pub fn unmount(self, store: &mut Store) {
        store.dispatch(Action::ClearError);
    }
}

#[cfg(test)]
mod tests {
    use super::fields::{EMAIL, IS_AGREE, PASSWORD, REPEAT_PASSWORD, USERNAME};
    use super::*;
    use crate::api::ServerErrors;

    fn filled_login() -> AuthorizationForm {
        let mut form = AuthorizationForm::login();
        form.set_value(EMAIL, "jake@jake.jake");
        form.set_value(PASSWORD, "jakejake");
        form
    }

    fn filled_register() -> AuthorizationForm {
        let mut form = AuthorizationForm::register();
        form.set_value(USERNAME, "jake");
        form.set_value(EMAIL, "jake@jake.jake");
        form.set_value(PASSWORD, "jakejake");
        form.set_value(REPEAT_PASSWORD, "jakejake");
        form.set_agreed(true);
        form
    }

    fn credentials_rejected() -> ApiError {
        ApiError::Unprocessable(ServerErrors::from_pairs([(
            INVALID_CREDENTIALS_KEY,
            "is invalid",
        )]))
    }

    #[test]
    fn test_mode_titles() {
        assert_eq!(AuthorizationForm::login().mode().title(), "Sign In");
        assert_eq!(
            AuthorizationForm::register().mode().title(),
            "Create new account"
        );
    }

    #[test]
    fn test_valid_login_reaches_handler() {
        let mut form = filled_login();
        let mut store = Store::new();

        let email = form
            .submit(&mut store, |data| data.get(EMAIL).to_string())
            .unwrap();
        assert_eq!(email, "jake@jake.jake");
    }

    #[test]
    fn test_invalid_form_skips_handler() {
        let mut form = AuthorizationForm::login();
        let mut store = Store::new();
        let mut called = false;

        let err = form.submit(&mut store, |_| called = true).unwrap_err();
        assert!(!called);
        assert_eq!(err.fields.len(), 2);
        assert_eq!(
            form.field_error(EMAIL),
            Some(&FieldError::Invalid("Email is required".to_string()))
        );
    }

    #[test]
    fn test_register_requires_terms() {
        let mut form = filled_register();
        form.set_agreed(false);
        let mut store = Store::new();

        let err = form.submit(&mut store, |_| ()).unwrap_err();
        assert_eq!(
            err.fields,
            vec![(IS_AGREE.to_string(), TERMS_REQUIRED_MESSAGE.to_string())]
        );
    }

    #[test]
    fn test_register_requires_matching_passwords() {
        let mut form = filled_register();
        form.set_value(REPEAT_PASSWORD, "different");

        assert!(!form.validate());
        assert_eq!(
            form.field_error(REPEAT_PASSWORD),
            Some(&FieldError::Invalid("Passwords must match".to_string()))
        );

        form.set_value(REPEAT_PASSWORD, "jakejake");
        assert!(form.validate());
    }

    #[test]
    fn test_login_has_no_confirmation_rule() {
        let mut fields = fields::login_fields();
        fields.push(FieldConfig::new(REPEAT_PASSWORD));
        let mut form = AuthorizationForm::new(FormMode::Login, fields);
        form.set_value(EMAIL, "jake@jake.jake");
        form.set_value(PASSWORD, "jakejake");
        form.set_value(REPEAT_PASSWORD, "other");

        assert!(form.validate());
    }

    #[test]
    fn test_invalid_credentials_marks_fields() {
        let mut form = filled_login();
        let mut store = Store::new();

        form.apply_server_error(&mut store, &credentials_rejected());

        assert_eq!(form.general_error(), Some(INVALID_CREDENTIALS_MESSAGE));
        assert_eq!(form.field_error(EMAIL), Some(&FieldError::Server));
        assert_eq!(form.field_error(PASSWORD), Some(&FieldError::Server));
        assert!(!store.state().notification.has_error());
    }

    #[test]
    fn test_resubmit_clears_previous_server_error() {
        let mut form = filled_login();
        let mut store = Store::new();
        form.apply_server_error(&mut store, &credentials_rejected());
        store.dispatch(Action::SetError("stale".to_string()));

        form.submit(&mut store, |_| ()).unwrap();

        assert_eq!(form.general_error(), None);
        assert_eq!(form.field_error(EMAIL), None);
        assert!(!store.state().notification.has_error());
    }

    #[test]
    fn test_other_server_errors_go_to_notifications() {
        let mut form = filled_register();
        let mut store = Store::new();
        let error = ApiError::Unprocessable(ServerErrors::from_pairs([(
            "username",
            "has already been taken",
        )]));

        form.apply_server_error(&mut store, &error);

        assert_eq!(form.general_error(), None);
        assert_eq!(
            store.state().notification.error_message.as_deref(),
            Some("username has already been taken")
        );

        form.apply_server_error(&mut store, &ApiError::NotFound);
        assert_eq!(
            store.state().notification.error_message.as_deref(),
            Some("not found")
        );
    }

    #[test]
    fn test_unmount_clears_notification() {
        let form = AuthorizationForm::login();
        let mut store = Store::new();
        store.dispatch(Action::SetError("boom".to_string()));

        form.unmount(&mut store);
        assert!(!store.state().notification.has_error());
    }

    #[test]
    fn test_unknown_field_is_ignored() {
        let mut form = filled_login();
        form.set_value("nickname", "jj");
        let mut store = Store::new();

        let data = form.submit(&mut store, |data| data).unwrap();
        assert_eq!(data.get("nickname"), "");
    }
}
