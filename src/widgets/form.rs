use serde_json::json;

use crate::error::{Result, WidgetError};
use crate::event::{EventFlow, PageEvent};
use crate::logging::{LogLevel, Logger, WIDGETS_TARGET, emit, json_kv};

use super::{PageContext, PageWidget};

pub const CONFIRMATION_TITLE: &str = "Thanks for subscribing!";

/// Structural elements of the subscription form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormMarkup {
    pub field_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailError {
    Required,
    Malformed,
}

impl EmailError {
    pub fn message(self) -> &'static str {
        match self {
            EmailError::Required => "Email address is required.",
            EmailError::Malformed => "Please enter a valid email address.",
        }
    }
}

/// Trim and check an address: required first, then well-formed.
pub fn validate_email(raw: &str) -> std::result::Result<String, Vec<EmailError>> {
    let email = raw.trim();
    let mut errors = Vec::new();
    if email.is_empty() {
        errors.push(EmailError::Required);
    } else if !is_well_formed(email) {
        errors.push(EmailError::Malformed);
    }

    if errors.is_empty() {
        Ok(email.to_string())
    } else {
        Err(errors)
    }
}

/// `local@domain`: one `@`, no whitespace, and a dot inside the domain with
/// text on both sides of it.
fn is_well_formed(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(at, ch)| ch == '.' && at > 0 && at + 1 < domain.len())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted(String),
    Rejected(Vec<String>),
}

/// Subscription form with inline validation errors.
#[derive(Debug)]
pub struct SubscribeForm {
    field_name: String,
    value: String,
    errors: Vec<String>,
    field_invalid: bool,
    logger: Option<Logger>,
}

impl SubscribeForm {
    pub fn mount(markup: Option<&FormMarkup>, logger: Option<Logger>) -> Result<Self> {
        let markup = markup.ok_or(WidgetError::MissingElement("subscribe-form"))?;
        if markup.field_name.trim().is_empty() {
            return Err(WidgetError::MissingElement("email-field"));
        }
        Ok(Self {
            field_name: markup.field_name.clone(),
            value: String::new(),
            errors: Vec::new(),
            field_invalid: false,
            logger,
        })
    }

    pub fn submit(&mut self, raw: &str) -> SubmitOutcome {
        self.value = raw.to_string();
        match validate_email(raw) {
            Ok(email) => {
                self.value.clear();
                self.errors.clear();
                self.field_invalid = false;
                emit(
                    self.logger.as_ref(),
                    LogLevel::Info,
                    WIDGETS_TARGET,
                    "subscription_accepted",
                    [json_kv("field", json!(self.field_name))],
                );
                SubmitOutcome::Accepted(email)
            }
            Err(errors) => {
                self.errors = errors.iter().map(|err| err.message().to_string()).collect();
                self.field_invalid = true;
                emit(
                    self.logger.as_ref(),
                    LogLevel::Debug,
                    WIDGETS_TARGET,
                    "subscription_rejected",
                    [json_kv("errors", json!(self.errors.len()))],
                );
                SubmitOutcome::Rejected(self.errors.clone())
            }
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Messages rendered above the form, in check order.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn is_field_invalid(&self) -> bool {
        self.field_invalid
    }
}

impl PageWidget for SubscribeForm {
    fn name(&self) -> &str {
        "subscribe_form"
    }

    fn on_event(&mut self, ctx: &mut PageContext, event: &PageEvent) -> Result<EventFlow> {
        let PageEvent::Submit { email } = event else {
            return Ok(EventFlow::Continue);
        };
        if let SubmitOutcome::Accepted(address) = self.submit(email) {
            ctx.show_dialog(
                CONFIRMATION_TITLE,
                format!("We'll send our latest updates to {address}."),
            );
        }
        Ok(EventFlow::Consumed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> SubscribeForm {
        let markup = FormMarkup {
            field_name: "email".to_string(),
        };
        SubscribeForm::mount(Some(&markup), None).unwrap()
    }

    #[test]
    fn empty_address_is_required() {
        assert_eq!(validate_email(""), Err(vec![EmailError::Required]));
        assert_eq!(validate_email("   "), Err(vec![EmailError::Required]));
    }

    #[test]
    fn malformed_addresses_are_rejected() {
        for raw in ["a@b", "a b@c.com", "@b.com", "a@.com", "a@b.", "a@@b.com", "ab.com"] {
            assert_eq!(validate_email(raw), Err(vec![EmailError::Malformed]), "{raw}");
        }
    }

    #[test]
    fn well_formed_address_is_trimmed() {
        assert_eq!(validate_email("  a@b.com "), Ok("a@b.com".to_string()));
        assert_eq!(validate_email("first.last@mail.example.org"), Ok("first.last@mail.example.org".to_string()));
    }

    #[test]
    fn rejection_marks_field_and_keeps_value() {
        let mut form = form();
        let outcome = form.submit("a@b");
        assert_eq!(
            outcome,
            SubmitOutcome::Rejected(vec!["Please enter a valid email address.".to_string()])
        );
        assert!(form.is_field_invalid());
        assert_eq!(form.value(), "a@b");
    }

    #[test]
    fn acceptance_clears_field_and_requests_dialog() {
        let mut form = form();
        form.submit("");
        assert_eq!(form.errors(), ["Email address is required.".to_string()]);

        let mut ctx = PageContext::new();
        let flow = form
            .on_event(
                &mut ctx,
                &PageEvent::Submit {
                    email: "a@b.com".to_string(),
                },
            )
            .unwrap();
        assert_eq!(flow, EventFlow::Consumed);
        assert_eq!(form.value(), "");
        assert!(form.errors().is_empty());
        assert!(!form.is_field_invalid());

        let requests = ctx.take_dialog_requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].message.contains("a@b.com"));
    }

    #[test]
    fn mount_requires_markup() {
        let err = SubscribeForm::mount(None, None).unwrap_err();
        assert!(err.is_soft());
    }
}
