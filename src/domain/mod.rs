//! Domain layer types for the complaint dashboard.
//!
//! This module contains the typed records read from the complaint store:
//! threads, the emails inside them, and the sentiment and status enums
//! assigned upstream.

mod email;
mod sentiment;
mod thread;
mod types;

pub use email::Email;
pub use sentiment::{ComplaintStatus, Sentiment};
pub use thread::EmailThread;
pub use types::{EmailId, ThreadId};
