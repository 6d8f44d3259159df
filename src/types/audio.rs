//! Preview audio decoding.

use crate::{Error, Result};
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use bytes::Bytes;

// Accepts payloads with or without trailing padding, like a browser's atob.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Container formats recognised in decoded preview data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Wav,
    Mp3,
    Ogg,
    Flac,
    Aac,
}

impl AudioFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mpeg",
            Self::Ogg => "audio/ogg",
            Self::Flac => "audio/flac",
            Self::Aac => "audio/aac",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::Ogg => "ogg",
            Self::Flac => "flac",
            Self::Aac => "aac",
        }
    }

    /// Identify the container from its leading bytes.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        match data {
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'A', b'V', b'E', ..] => Some(Self::Wav),
            [b'f', b'L', b'a', b'C', ..] => Some(Self::Flac),
            [b'O', b'g', b'g', b'S', ..] => Some(Self::Ogg),
            [b'I', b'D', b'3', ..] => Some(Self::Mp3),
            // ADTS sync word with layer bits zero
            [0xFF, b, ..] if b & 0xF6 == 0xF0 => Some(Self::Aac),
            [0xFF, b, ..] if b & 0xE0 == 0xE0 => Some(Self::Mp3),
            _ => None,
        }
    }
}

/// Decoded preview sample for one voice.
///
/// `handle` identifies the request that produced it; a UI uses it to match
/// `PreviewReleased` events to whatever resource it built from the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewAudio {
    pub voice: String,
    pub handle: u64,
    pub data: Bytes,
    pub format: AudioFormat,
}

impl PreviewAudio {
    /// Decode a base64 payload as returned by the preview endpoint.
    ///
    /// ASCII whitespace in the payload is ignored. Unknown containers are
    /// reported as WAV, which is what the preview service produces.
    pub fn decode(voice: impl Into<String>, handle: u64, payload: &str) -> Result<Self> {
        let compact: String = payload
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let data = PAYLOAD_ENGINE
            .decode(compact.as_bytes())
            .map_err(|e| Error::decode(format!("Failed to decode base64 audio: {}", e)))?;
        if data.is_empty() {
            return Err(Error::decode("Preview payload decoded to zero bytes"));
        }
        let format = AudioFormat::sniff(&data).unwrap_or(AudioFormat::Wav);
        Ok(Self {
            voice: voice.into(),
            handle,
            data: Bytes::from(data),
            format,
        })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}
