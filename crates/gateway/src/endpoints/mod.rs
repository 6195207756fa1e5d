//! # Gatewayエンドポイント

pub mod health;
pub mod transcription;
pub mod upload_url;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use health::{handle_health, handle_not_found};
pub use transcription::handle_get_transcription;
pub use upload_url::handle_presigned_url;
pub use validate::handle_validate_upload;
