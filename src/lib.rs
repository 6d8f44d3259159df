//! # voice-catalog
//!
//! 音色目录客户端：获取音色列表、维护当前选择、加载并缓存预览音频。
//!
//! Voice catalog client for TTS node editors.
//!
//! ## Overview
//!
//! A [`VoiceCatalogClient`] owns three pieces of state for one editor node:
//!
//! - the current [`VoiceList`], replaced wholesale by every successful refresh
//! - the selected voice, kept inside the list across refreshes
//! - a single-slot [`PreviewAudio`] cache; a new preview releases the old one
//!
//! It talks to two backend endpoints (voice-list refresh and preview lookup)
//! through the injectable [`CatalogTransport`], and reports state changes to
//! an [`EventSink`] instead of calling back into UI code.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use voice_catalog::{Credential, VoiceCatalogClient, VoiceFilter};
//!
//! #[tokio::main]
//! async fn main() -> voice_catalog::Result<()> {
//!     let client = VoiceCatalogClient::builder()
//!         .base_url("http://127.0.0.1:8188")
//!         .build()?;
//!
//!     let voices = client
//!         .refresh_voices(&Credential::new("your-api-key"), VoiceFilter::System)
//!         .await?;
//!     println!("{} voices, selected: {:?}", voices.len(), client.selected_voice());
//!
//!     if let Some(audio) = client.load_preview("Cherry").await? {
//!         println!("{} bytes of {}", audio.len(), audio.mime_type());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | The client, its builder and activity snapshot |
//! | [`config`] | Endpoint, timeout and ordering configuration |
//! | [`events`] | Event types and sinks |
//! | [`protocol`] | Request/response bodies of both endpoints |
//! | [`transport`] | Transport trait and the `reqwest` implementation |
//! | [`types`] | Credentials, filters, voice lists, preview audio |

pub mod client;
pub mod config;
pub mod events;
pub mod protocol;
pub mod transport;
pub mod types;

/// Error type for the library
pub mod error;

// Re-export main types for convenience
pub use client::{Activity, ClientState, VoiceCatalogClient, VoiceCatalogClientBuilder};
pub use config::{CatalogConfig, ResponseOrdering};
pub use error::{Error, ErrorContext, ErrorKind, PreviewError, RefreshError};
pub use events::{CatalogEvent, EventSink, InMemoryEventSink, Operation};
pub use transport::{CatalogTransport, HttpTransport, RawResponse};
pub use types::{AudioFormat, Credential, PreviewAudio, VoiceFilter, VoiceList};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;
