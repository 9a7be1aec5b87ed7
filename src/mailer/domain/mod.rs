//! Email envelopes and notice copy.

mod email;
mod notice;

pub use email::OutgoingEmail;
pub use notice::{CompletionAudience, EmailNotice, NoticeRenderError, RenderedNotice};
