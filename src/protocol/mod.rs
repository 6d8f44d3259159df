//! 协议模块：刷新与预览两个后端端点的请求/响应格式。
//!
//! Wire format of the two backend endpoints.
//!
//! | Endpoint | Request | Response |
//! |----------|---------|----------|
//! | refresh | [`RefreshRequest`] | [`RefreshResponse`] |
//! | preview | [`PreviewRequest`] | [`PreviewResponse`] |

pub mod request;
pub mod response;

pub use request::{PreviewRequest, RefreshRequest};
pub use response::{PreviewResponse, RefreshResponse, SUCCESS_STATUS};

/// Default path of the voice-list refresh endpoint.
pub const DEFAULT_REFRESH_PATH: &str = "/minimax_refresh_voices";

/// Default path of the preview-audio endpoint.
pub const DEFAULT_PREVIEW_PATH: &str = "/qwen3_tts_preview";
