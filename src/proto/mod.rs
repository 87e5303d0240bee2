pub mod base64;
pub mod load_mode;
pub mod record_codec;
