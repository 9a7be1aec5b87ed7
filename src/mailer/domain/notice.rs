//! Email copy sent to marketplace participants.
//!
//! Bodies are `minijinja` templates rendered against the notice fields.
//! Payout percentages appear in copy only; nothing here computes money.

use minijinja::{Environment, Value, context};
use thiserror::Error;

const SIGN_OFF: &str = "The Neighborly Gigs Team";

const APPLICATION_SUBJECT: &str = "New Application for Your Task: {{ task_title }}";
const APPLICATION_BODY: &str = r#"Hi {{ poster_first_name }},

{{ applicant_name }} has applied to your task: "{{ task_title }}".

You can review their profile and assign the task from your dashboard.

Thank you for using Neighborly Gigs, building trust among neighbors!

{{ sign_off }}"#;

const ASSIGNED_SUBJECT: &str = "You've Been Assigned to a Task!";
const ASSIGNED_BODY: &str = r#"Hi {{ first_name }},

Great news! You've been selected to complete the task: "{{ task_title }}".

Please coordinate with the task poster and get started soon.

Thank you for being part of our community!

{{ sign_off }}"#;

const COMPLETED_SUBJECT: &str = "Task Completed: {{ task_title }}";
const COMPLETED_POSTER_BODY: &str = r#"Hi {{ first_name }},

The task "{{ task_title }}" has been marked as complete.

A 20% platform fee has been deducted, and the helper has been paid.
Please leave a review to help build community trust.

{{ sign_off }}"#;
const COMPLETED_COMPLETER_BODY: &str = r#"Hi {{ first_name }},

Your completion of "{{ task_title }}" has been confirmed!

The platform will process your payout (80% of the task fee) shortly.
Thank you for your service!

{{ sign_off }}"#;

const VERIFY_SUBJECT: &str = "Verify your Neighborly Gigs account";
const VERIFY_BODY: &str = r"Hi {{ first_name }},

Welcome to Neighborly Gigs! Confirm your email address to activate your account:

{{ verification_link }}

This link expires in {{ ttl_hours }} hours.

{{ sign_off }}";

/// Which side of a completed task an email addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionAudience {
    /// The user who posted the task.
    Poster,
    /// The user who completed the task.
    Completer,
}

/// Templated email notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailNotice {
    /// Tells a poster that someone applied to their task.
    ApplicationReceived {
        /// Poster's first name.
        poster_first_name: String,
        /// Applicant's full name.
        applicant_name: String,
        /// Task title.
        task_title: String,
    },
    /// Tells an applicant they were selected.
    TaskAssigned {
        /// Applicant's first name.
        first_name: String,
        /// Task title.
        task_title: String,
    },
    /// Confirms completion to one of the involved parties.
    TaskCompleted {
        /// Recipient's first name.
        first_name: String,
        /// Task title.
        task_title: String,
        /// Which party the copy addresses.
        audience: CompletionAudience,
    },
    /// Delivers an email verification link.
    VerifyEmail {
        /// Recipient's first name.
        first_name: String,
        /// Link embedding the verification token.
        verification_link: String,
        /// Token lifetime in hours.
        ttl_hours: i64,
    },
}

/// Rendered subject and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNotice {
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// Error returned when notice copy cannot be rendered.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to render '{template}' email: {reason}")]
pub struct NoticeRenderError {
    /// Template name.
    pub template: &'static str,
    /// Renderer message.
    pub reason: String,
}

impl EmailNotice {
    /// Returns a stable template name for logging.
    #[must_use]
    pub const fn template_name(&self) -> &'static str {
        match self {
            Self::ApplicationReceived { .. } => "application_received",
            Self::TaskAssigned { .. } => "task_assigned",
            Self::TaskCompleted {
                audience: CompletionAudience::Poster,
                ..
            } => "task_completed_poster",
            Self::TaskCompleted {
                audience: CompletionAudience::Completer,
                ..
            } => "task_completed_completer",
            Self::VerifyEmail { .. } => "verify_email",
        }
    }

    /// Renders the subject and body.
    ///
    /// # Errors
    ///
    /// Returns [`NoticeRenderError`] when template rendering fails.
    pub fn render(&self) -> Result<RenderedNotice, NoticeRenderError> {
        let (subject, body, values) = self.parts();
        let environment = Environment::new();
        let render = |source: &str| {
            environment
                .render_str(source, &values)
                .map_err(|error| NoticeRenderError {
                    template: self.template_name(),
                    reason: error.to_string(),
                })
        };
        Ok(RenderedNotice {
            subject: render(subject)?,
            body: render(body)?,
        })
    }

    fn parts(&self) -> (&'static str, &'static str, Value) {
        match self {
            Self::ApplicationReceived {
                poster_first_name,
                applicant_name,
                task_title,
            } => (
                APPLICATION_SUBJECT,
                APPLICATION_BODY,
                context! { poster_first_name, applicant_name, task_title, sign_off => SIGN_OFF },
            ),
            Self::TaskAssigned {
                first_name,
                task_title,
            } => (
                ASSIGNED_SUBJECT,
                ASSIGNED_BODY,
                context! { first_name, task_title, sign_off => SIGN_OFF },
            ),
            Self::TaskCompleted {
                first_name,
                task_title,
                audience,
            } => (
                COMPLETED_SUBJECT,
                match audience {
                    CompletionAudience::Poster => COMPLETED_POSTER_BODY,
                    CompletionAudience::Completer => COMPLETED_COMPLETER_BODY,
                },
                context! { first_name, task_title, sign_off => SIGN_OFF },
            ),
            Self::VerifyEmail {
                first_name,
                verification_link,
                ttl_hours,
            } => (
                VERIFY_SUBJECT,
                VERIFY_BODY,
                context! { first_name, verification_link, ttl_hours, sign_off => SIGN_OFF },
            ),
        }
    }
}
