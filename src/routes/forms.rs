//! Form state shared by the screens: current values, touched fields and field
//! errors. Validation runs on blur, on change for touched fields, and over
//! every field on submit, so invalid input never reaches the network.

use crate::{
    app_lib::{AppError, FieldErrors},
    features::auth::types::Role,
};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

pub mod field {
    pub const TITLE: &str = "title";
    pub const FIRST_NAME: &str = "first_name";
    pub const LAST_NAME: &str = "last_name";
    pub const EMAIL: &str = "email";
    pub const ROLE: &str = "role";
    pub const PASSWORD: &str = "password";
    pub const CONFIRM_PASSWORD: &str = "confirm_password";
    pub const ACCEPT_TERMS: &str = "accept_terms";
}

/// Minimum password length enforced by every form that sets one.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Value stored for a checked checkbox.
const CHECKED: &str = "true";

#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    Regex::new(r"\S+@\S+\.\S+").is_ok_and(|re| re.is_match(email))
}

/// Read-only view of the values a rule may consult.
#[derive(Clone, Debug, Default)]
pub struct FormValues(BTreeMap<&'static str, String>);

impl FormValues {
    #[must_use]
    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map_or("", String::as_str)
    }

    #[must_use]
    pub fn is_checked(&self, name: &str) -> bool {
        self.get(name) == CHECKED
    }
}

/// Per-field validation for one form.
pub trait FormRules {
    /// Message for an invalid value, `None` when the field is fine.
    fn validate(&self, name: &str, values: &FormValues) -> Option<&'static str>;
}

#[derive(Clone, Debug)]
pub struct FormState<R> {
    rules: R,
    fields: Vec<&'static str>,
    values: FormValues,
    touched: BTreeSet<&'static str>,
    errors: FieldErrors,
}

impl<R: FormRules> FormState<R> {
    /// Empty form over `fields`, validated in the given order.
    #[must_use]
    pub fn new(rules: R, fields: &[&'static str]) -> Self {
        Self {
            rules,
            fields: fields.to_vec(),
            values: FormValues(fields.iter().map(|name| (*name, String::new())).collect()),
            touched: BTreeSet::new(),
            errors: FieldErrors::new(),
        }
    }

    /// Prefills a value without touching or validating it.
    #[must_use]
    pub fn with_value(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.values.0.insert(name, value.into());
        self
    }

    #[must_use]
    pub fn value(&self, name: &str) -> &str {
        self.values.get(name)
    }

    #[must_use]
    pub fn values(&self) -> &FormValues {
        &self.values
    }

    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    #[must_use]
    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name)
    }

    #[must_use]
    pub fn is_touched(&self, name: &str) -> bool {
        self.touched.contains(name)
    }

    /// Stores a new value. Touched fields are re-validated, and a password
    /// change re-validates a touched confirmation.
    pub fn change(&mut self, name: &'static str, value: impl Into<String>) {
        self.values.0.insert(name, value.into());

        if self.is_touched(name) {
            self.validate_field(name);
        }
        if name == field::PASSWORD && self.is_touched(field::CONFIRM_PASSWORD) {
            self.validate_field(field::CONFIRM_PASSWORD);
        }
    }

    pub fn set_checked(&mut self, name: &'static str, checked: bool) {
        self.change(name, if checked { CHECKED } else { "" });
    }

    /// Marks a field touched and validates it.
    pub fn blur(&mut self, name: &'static str) {
        self.touched.insert(name);
        self.validate_field(name);
    }

    /// Touches and validates every field.
    ///
    /// # Errors
    /// Returns `AppError::Validation` with every failing field.
    pub fn submit_check(&mut self) -> Result<(), AppError> {
        for name in self.fields.clone() {
            self.touched.insert(name);
            self.validate_field(name);
        }

        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.errors.clone()))
        }
    }

    fn validate_field(&mut self, name: &'static str) {
        match self.rules.validate(name, &self.values) {
            Some(message) => self.errors.insert(name, message),
            None => self.errors.remove(name),
        }
    }
}

fn email_rule(value: &str) -> Option<&'static str> {
    if value.is_empty() {
        Some("Email is required")
    } else if !is_valid_email(value) {
        Some("Email is invalid")
    } else {
        None
    }
}

fn required(value: &str, message: &'static str) -> Option<&'static str> {
    value.is_empty().then_some(message)
}

fn optional_password_rule(value: &str) -> Option<&'static str> {
    (!value.is_empty() && value.chars().count() < MIN_PASSWORD_LEN)
        .then_some("Password must be at least 6 characters")
}

fn required_password_rule(value: &str) -> Option<&'static str> {
    required(value, "Password is required").or_else(|| optional_password_rule(value))
}

fn optional_confirm_rule(values: &FormValues) -> Option<&'static str> {
    let password = values.get(field::PASSWORD);
    (!password.is_empty() && values.get(field::CONFIRM_PASSWORD) != password)
        .then_some("Passwords must match")
}

fn name_rule(name: &str, values: &FormValues) -> Option<&'static str> {
    let value = values.get(name);
    match name {
        field::TITLE => required(value, "Title is required"),
        field::FIRST_NAME => required(value, "First Name is required"),
        field::LAST_NAME => required(value, "Last Name is required"),
        _ => None,
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LoginRules;

impl FormRules for LoginRules {
    fn validate(&self, name: &str, values: &FormValues) -> Option<&'static str> {
        let value = values.get(name);
        match name {
            field::EMAIL => email_rule(value),
            field::PASSWORD => required(value, "Password is required"),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct EmailRules;

impl FormRules for EmailRules {
    fn validate(&self, name: &str, values: &FormValues) -> Option<&'static str> {
        match name {
            field::EMAIL => email_rule(values.get(name)),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RegisterRules;

impl FormRules for RegisterRules {
    fn validate(&self, name: &str, values: &FormValues) -> Option<&'static str> {
        let value = values.get(name);
        match name {
            field::EMAIL => email_rule(value),
            field::PASSWORD => required_password_rule(value),
            field::CONFIRM_PASSWORD => required(value, "Confirm Password is required").or_else(|| {
                (value != values.get(field::PASSWORD)).then_some("Passwords must match")
            }),
            field::ACCEPT_TERMS => (!values.is_checked(name))
                .then_some("Accept Terms & Conditions is required"),
            _ => name_rule(name, values),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ResetPasswordRules;

impl FormRules for ResetPasswordRules {
    fn validate(&self, name: &str, values: &FormValues) -> Option<&'static str> {
        let value = values.get(name);
        match name {
            field::PASSWORD => required_password_rule(value),
            field::CONFIRM_PASSWORD => {
                if value.is_empty() && !values.get(field::PASSWORD).is_empty() {
                    Some("Confirm Password is required")
                } else {
                    (value != values.get(field::PASSWORD)).then_some("Passwords must match")
                }
            }
            _ => None,
        }
    }
}

/// Profile and admin edit forms. Passwords are optional unless the admin
/// form is creating a new account.
#[derive(Clone, Copy, Debug, Default)]
pub struct AccountRules {
    pub with_role: bool,
    pub password_required: bool,
}

impl AccountRules {
    #[must_use]
    pub fn profile() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn admin(add_mode: bool) -> Self {
        Self {
            with_role: true,
            password_required: add_mode,
        }
    }
}

impl FormRules for AccountRules {
    fn validate(&self, name: &str, values: &FormValues) -> Option<&'static str> {
        let value = values.get(name);
        match name {
            field::EMAIL => email_rule(value),
            field::ROLE if self.with_role => {
                if value.is_empty() {
                    Some("Role is required")
                } else {
                    value.parse::<Role>().err().map(|_| "Role is invalid")
                }
            }
            field::PASSWORD if self.password_required => required_password_rule(value),
            field::PASSWORD => optional_password_rule(value),
            field::CONFIRM_PASSWORD => optional_confirm_rule(values),
            _ => name_rule(name, values),
        }
    }
}
