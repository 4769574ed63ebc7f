//! Contact form state: field values, validation errors, and the
//! submission flag.
//!
//! Validation is a pure function of the current field values and
//! rebuilds the error set from scratch on every pass; errors are never
//! merged with earlier ones. A [`ContactRequest`] can only be obtained
//! through [`ContactForm::begin_submission`], which refuses to hand one
//! out while any field is invalid.

use shared::protocol::ContactRequest;

pub const NAME_MAX_CHARS: usize = 30;
pub const MESSAGE_MAX_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Message,
}

/// Per-field validation failures from the most recent validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.message.is_none()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => self.name.as_deref(),
            Field::Email => self.email.as_deref(),
            Field::Message => self.message.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
    errors: FieldErrors,
    submitting: bool,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces one field's value. Does not revalidate; errors from the
    /// previous pass stay visible until the next validation.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Message => self.message = value,
        }
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Recomputes all field errors from the current values. Each field
    /// is checked independently; one failure does not short-circuit the
    /// others. Returns true iff every field passed.
    pub fn validate(&mut self) -> bool {
        self.errors = FieldErrors {
            name: validate_name(&self.name),
            email: validate_email(&self.email),
            message: validate_message(&self.message),
        };
        self.errors.is_empty()
    }

    /// Runs validation and, only if it passes, flips `submitting` on and
    /// returns the request body to send. Invalid input changes nothing
    /// but the visible errors.
    pub fn begin_submission(&mut self) -> Option<ContactRequest> {
        if !self.validate() {
            return None;
        }
        self.submitting = true;
        Some(ContactRequest {
            name: self.name.clone(),
            email: self.email.clone(),
            message: self.message.clone(),
        })
    }

    /// Final step of every submission outcome, success or failure.
    pub fn complete_submission(&mut self) {
        self.submitting = false;
    }

    /// Clears all values and errors. `submitting` is untouched.
    pub fn reset(&mut self) {
        self.name.clear();
        self.email.clear();
        self.message.clear();
        self.errors = FieldErrors::default();
    }
}

fn validate_name(name: &str) -> Option<String> {
    if name.trim().is_empty() {
        Some("Name is required.".to_string())
    } else if name.chars().count() > NAME_MAX_CHARS {
        Some(format!("Name must be {NAME_MAX_CHARS} characters or fewer."))
    } else {
        None
    }
}

fn validate_email(email: &str) -> Option<String> {
    if email.trim().is_empty() {
        Some("Email is required.".to_string())
    } else if !has_valid_email_shape(email) {
        Some("Enter a valid email address.".to_string())
    } else {
        None
    }
}

fn validate_message(message: &str) -> Option<String> {
    if message.trim().is_empty() {
        Some("Message is required.".to_string())
    } else if message.chars().count() > MESSAGE_MAX_CHARS {
        Some(format!(
            "Message must be {MESSAGE_MAX_CHARS} characters or fewer."
        ))
    } else {
        None
    }
}

/// `local@domain.tld` shape: no whitespace anywhere, exactly one `@`
/// with a non-empty local part, and at least one `.` after the `@` with
/// non-empty segments on both sides.
fn has_valid_email_shape(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
