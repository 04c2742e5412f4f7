use alloy::primitives::B256;

/// Errors produced while encoding, decoding, hashing or assembling protocol records.
///
/// Every malformed-input condition is reported to the immediate caller; nothing here is
/// retried or repaired.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A field declares more bytes than the buffer still holds.
    #[error("Truncated {field}: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        field: &'static str,
        needed: usize,
        remaining: usize,
    },

    /// The leading tag byte is outside the registry of a tagged union.
    #[error("Unknown {kind} type: {tag}")]
    UnknownType { kind: &'static str, tag: u8 },

    /// Inputs, data and metadata must line up one to one unless overridden.
    #[error("Length mismatch: {inputs} inputs, {data} data, {metadata} metadata")]
    LengthMismatch {
        inputs: usize,
        data: usize,
        metadata: usize,
    },

    #[error("Amount shift {0} is not a multiple of 8")]
    ShiftNotByteAligned(u8),

    /// The decompressed amount would not fit in 256 bits.
    #[error("Amount overflow: {length} amount bytes with shift {shift}")]
    AmountOverflow { length: usize, shift: u8 },

    #[error("Merkle height {0} exceeds the maximum of 256")]
    HeightOverflow(usize),

    /// A value is too long for the length header that has to describe it.
    #[error("Field {field} holds {actual} bytes, maximum is {max}")]
    FieldOverflow {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    /// A length header carries a value the field can never have.
    #[error("Invalid length {length} for field {field}")]
    InvalidFieldLength { field: &'static str, length: usize },

    /// A record did not consume the whole span it was given.
    #[error("{remaining} trailing bytes after {field}")]
    TrailingBytes {
        field: &'static str,
        remaining: usize,
    },

    #[error("Merkle tree has no leaves")]
    EmptyTree,

    #[error("Root {0} is not part of the block")]
    RootNotInBlock(B256),

    #[error("Output {0} is a return output and can not be spent")]
    UnspendableOutput(usize),

    #[error("Signer error: {0}")]
    Signer(#[from] alloy::signers::Error),

    #[error("Signature recovery error: {0}")]
    Recovery(#[from] alloy::primitives::SignatureError),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::Truncated {
            field: "Witness::Signature",
            needed: 65,
            remaining: 12,
        };
        assert_eq!(
            err.to_string(),
            "Truncated Witness::Signature: needed 65 bytes, 12 remaining"
        );

        let err = Error::UnknownType {
            kind: "Input",
            tag: 9,
        };
        assert_eq!(err.to_string(), "Unknown Input type: 9");

        let err = Error::LengthMismatch {
            inputs: 2,
            data: 1,
            metadata: 2,
        };
        assert_eq!(
            err.to_string(),
            "Length mismatch: 2 inputs, 1 data, 2 metadata"
        );
    }
}
