//! Request bodies.

use crate::types::{Credential, VoiceFilter};
use serde::Serialize;

/// Body of a voice-list refresh.
#[derive(Debug, Serialize)]
pub struct RefreshRequest<'a> {
    pub api_key: &'a str,
    pub voice_type: VoiceFilter,
}

impl<'a> RefreshRequest<'a> {
    pub fn new(credential: &'a Credential, filter: VoiceFilter) -> Self {
        Self {
            api_key: credential.expose(),
            voice_type: filter,
        }
    }
}

/// Body of a preview lookup.
#[derive(Debug, Serialize)]
pub struct PreviewRequest<'a> {
    pub voice: &'a str,
}
