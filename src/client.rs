//! Voice catalog client.
//!
//! Keep the public surface small: two operations, three accessors, an
//! activity snapshot. Implementation details are split into submodules under
//! `src/client/`.

pub mod builder;
pub mod core;
mod preview;
mod refresh;
pub mod signals;

pub use builder::VoiceCatalogClientBuilder;
pub use core::VoiceCatalogClient;
pub use signals::{Activity, ClientState};
