use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, RngCore};

use super::error::InvitationError;

/// Random bytes behind each token; base64url without padding gives 43 characters.
pub const TOKEN_BYTES: usize = 32;
pub const TOKEN_MIN_LEN: usize = 32;
pub const TOKEN_MAX_LEN: usize = 64;

pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Rejects anything that could not have come from [`generate_token`] before it
/// reaches storage.
pub fn validate_token_format(token: &str) -> Result<(), InvitationError> {
    let well_formed = (TOKEN_MIN_LEN..=TOKEN_MAX_LEN).contains(&token.len())
        && token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');

    if well_formed {
        Ok(())
    } else {
        Err(InvitationError::InvalidFormat)
    }
}

/// Unique-looking stand-in for the required phone field of invited accounts.
pub fn placeholder_phone() -> String {
    format!("+1{:09}", rand::rng().random_range(0..1_000_000_000u32))
}
