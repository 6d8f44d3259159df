//! 类型模块：音色目录客户端的核心数据类型。
//!
//! # Types Module
//!
//! Strongly-typed representations of the values the client exchanges with its
//! caller.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Credential`] | Opaque API key, redacted in `Debug`, never serialized |
//! | [`VoiceFilter`] | Scope of a refresh (`all`, `system`, ...) |
//! | [`VoiceList`] | Ordered, de-duplicated voice identifiers |
//! | [`PreviewAudio`] | Decoded preview sample for one voice |
//! | [`AudioFormat`] | Container format sniffed from the decoded bytes |

pub mod audio;
pub mod credential;
pub mod voice;

pub use audio::{AudioFormat, PreviewAudio};
pub use credential::Credential;
pub use voice::{VoiceFilter, VoiceList};
