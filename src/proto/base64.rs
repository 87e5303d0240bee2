//! Base64 envelope for record transport strings.
//!
//! Standard alphabet with `=` padding. Input is checked for the three malformed
//! cases (length, padding placement, alphabet) before it reaches the engine, so
//! callers always get one of those errors for bad controller payloads.

use ::base64::alphabet;
use ::base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use ::base64::engine::Engine as _;
use ::base64::DecodeError;

use crate::error::Base64Error;

const PAD: char = '=';

// The controller is not strict about the unused bits of the last symbol.
const TRANSPORT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(true)
        .with_decode_allow_trailing_bits(true),
);

pub fn encode(bytes: &[u8]) -> String {
    TRANSPORT.encode(bytes)
}

pub fn decode(input: &str) -> Result<Vec<u8>, Base64Error> {
    let length = input.len();
    if length % 4 != 0 {
        return Err(Base64Error::InvalidLength { length });
    }

    if let Some(position) = input.find(PAD) {
        if position + 2 < length || input[position..].chars().any(|c| c != PAD) {
            return Err(Base64Error::MisplacedPadding { position, length });
        }
    }

    for (position, character) in input.char_indices() {
        if character == PAD {
            break;
        }
        if !is_alphabet(character) {
            return Err(Base64Error::InvalidCharacter {
                character,
                position,
            });
        }
    }

    TRANSPORT.decode(input).map_err(|e| match e {
        DecodeError::InvalidByte(position, byte) | DecodeError::InvalidLastSymbol(position, byte) => {
            Base64Error::InvalidCharacter {
                character: byte as char,
                position,
            }
        }
        _ => Base64Error::InvalidLength { length },
    })
}

fn is_alphabet(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '+' || c == '/'
}
