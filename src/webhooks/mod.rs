//! Webhook handling for GitHub events.
//!
//! This module provides:
//! - Signature verification for webhook payloads (HMAC-SHA256)
//! - Typed `issue_comment` events and the payload parser that produces them

pub mod events;
pub mod parser;
pub mod signature;

pub use events::{CommentAction, CommentEvent};
pub use parser::{ParseError, parse_webhook};
pub use signature::{
    SignatureError, compute_signature, format_signature_header, parse_signature_header,
    verify_signature,
};
