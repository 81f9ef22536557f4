// This file is part of Mini.

// Mini is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
//
// Mini is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.

//! Conversion between codepoints and UTF-8 byte sequences.
//!
//! Buffers store raw bytes and never validate them, so everything here is deliberately lenient:
//! [decode] trusts the length it is given and does not check continuation bytes.

/// Largest codepoint [encode] accepts.
pub const MAX_CODEPOINT: u32 = 0x1F_FFFF;

const LEADING_MASKS: [u32; 3] = [0xC080, 0xE0_8080, 0xF080_8080];

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    #[error("Codepoint U+{0:X} is outside the encodable range")]
    OutOfRange(u32),

    #[error("Cannot decode a UTF-8 sequence of {0} bytes")]
    InvalidLength(usize),
}

/// One encoded codepoint, 1 to 4 bytes long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoded {
    bytes: [u8; 4],
    len: usize,
}

impl Encoded {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }
}

/// Encodes `codepoint` as UTF-8. Anything up to [MAX_CODEPOINT] is accepted, surrogates
/// included.
pub fn encode(codepoint: u32) -> Result<Encoded, CodecError> {
    if codepoint > MAX_CODEPOINT {
        return Err(CodecError::OutOfRange(codepoint));
    }

    let mut bytes = [0u8; 4];
    if codepoint < 0x80 {
        bytes[0] = codepoint as u8;
        return Ok(Encoded { bytes, len: 1 });
    }

    let len = if codepoint < 0x800 {
        2
    } else if codepoint < 0x1_0000 {
        3
    } else {
        4
    };
    let mask = LEADING_MASKS[len - 2];

    for (i, byte) in bytes.iter_mut().take(len).enumerate() {
        let group = len - 1 - i;
        *byte = ((mask >> (group * 8)) as u8) | ((codepoint >> (group * 6)) & 0x3F) as u8;
    }

    Ok(Encoded { bytes, len })
}

/// Decodes one codepoint from `bytes`, whose length is taken as the sequence length.
pub fn decode(bytes: &[u8]) -> Result<u32, CodecError> {
    let len = bytes.len();
    match len {
        0 => Err(CodecError::InvalidLength(0)),
        1 => Ok(bytes[0] as u32),
        2..=4 => {
            let lead = (bytes[0] & (0xFF >> (len + 1))) as u32;
            Ok(bytes[1..]
                .iter()
                .fold(lead, |codepoint, byte| (codepoint << 6) | (byte & 0x3F) as u32))
        }
        _ => Err(CodecError::InvalidLength(len)),
    }
}

/// True for bytes that start a codepoint, false for continuation bytes.
pub fn is_lead_byte(byte: u8) -> bool {
    byte & 0xC0 != 0x80
}

/// Length of the sequence started by `lead`, or None for continuation and invalid bytes.
pub fn sequence_length(lead: u8) -> Option<usize> {
    if lead & 0b1000_0000 == 0 {
        Some(1)
    } else if lead & 0b1100_0000 == 0b1000_0000 {
        None
    } else if lead & 0b1110_0000 == 0b1100_0000 {
        Some(2)
    } else if lead & 0b1111_0000 == 0b1110_0000 {
        Some(3)
    } else if lead & 0b1111_1000 == 0b1111_0000 {
        Some(4)
    } else {
        None
    }
}
