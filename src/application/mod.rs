//! Application services layer.

pub mod content;
pub mod events;
pub mod i18n;
pub mod mailer;
pub mod session;
