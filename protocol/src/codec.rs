//! Packed struct codec.
//!
//! Records are ordered lists of fields. Fixed fields occupy a statically known number of
//! bytes; variable fields are preceded by a big-endian length header whose width is part of
//! the record layout. Arrays of variable-width elements are doubly delimited: the outer
//! header carries the total byte span and every element carries its own header or tag.
//!
//! Decoding fails closed: reading past the end of a buffer is always [`Error::Truncated`].

use crate::error::{Error, Result};
use alloy::primitives::{Address, B256, Bytes, U256, keccak256};

/// Width of a length header in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderWidth {
    U8,
    U16,
}

impl HeaderWidth {
    pub fn max(self) -> usize {
        match self {
            HeaderWidth::U8 => usize::from(u8::MAX),
            HeaderWidth::U16 => usize::from(u16::MAX),
        }
    }
}

/// Cursor over an untrusted byte buffer.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Bytes not consumed yet, without advancing.
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.position..]
    }

    pub fn peek_u8(&self, field: &'static str) -> Result<u8> {
        self.rest().first().copied().ok_or(Error::Truncated {
            field,
            needed: 1,
            remaining: 0,
        })
    }

    pub fn read_bytes(&mut self, len: usize, field: &'static str) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(Error::Truncated {
                field,
                needed: len,
                remaining,
            });
        }
        let bytes = &self.data[self.position..self.position + len];
        self.position += len;
        Ok(bytes)
    }

    pub fn read_array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N]> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.read_bytes(N, field)?);
        Ok(array)
    }

    pub fn read_u8(&mut self, field: &'static str) -> Result<u8> {
        Ok(self.read_array::<1>(field)?[0])
    }

    pub fn read_u16(&mut self, field: &'static str) -> Result<u16> {
        Ok(u16::from_be_bytes(self.read_array(field)?))
    }

    pub fn read_u32(&mut self, field: &'static str) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_array(field)?))
    }

    pub fn read_b256(&mut self, field: &'static str) -> Result<B256> {
        Ok(B256::from(self.read_array::<32>(field)?))
    }

    pub fn read_address(&mut self, field: &'static str) -> Result<Address> {
        Ok(Address::from(self.read_array::<20>(field)?))
    }

    pub fn read_u256(&mut self, field: &'static str) -> Result<U256> {
        Ok(U256::from_be_bytes(self.read_array::<32>(field)?))
    }

    pub fn read_length(&mut self, width: HeaderWidth, field: &'static str) -> Result<usize> {
        match width {
            HeaderWidth::U8 => Ok(usize::from(self.read_u8(field)?)),
            HeaderWidth::U16 => Ok(usize::from(self.read_u16(field)?)),
        }
    }

    /// Reads a length header followed by that many bytes.
    pub fn read_variable(&mut self, width: HeaderWidth, field: &'static str) -> Result<&'a [u8]> {
        let len = self.read_length(width, field)?;
        self.read_bytes(len, field)
    }

    /// Reads a length header and returns a reader restricted to the described span.
    pub fn read_span(&mut self, width: HeaderWidth, field: &'static str) -> Result<Reader<'a>> {
        Ok(Reader::new(self.read_variable(width, field)?))
    }

    /// Succeeds only if every byte has been consumed.
    pub fn finish(&self, field: &'static str) -> Result<()> {
        match self.remaining() {
            0 => Ok(()),
            remaining => Err(Error::TrailingBytes { field, remaining }),
        }
    }
}

/// Growable output buffer for packed records.
#[derive(Debug, Default, Clone)]
pub struct Writer {
    buffer: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.write_bytes(&value.to_be_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.write_bytes(&value.to_be_bytes());
    }

    pub fn write_b256(&mut self, value: &B256) {
        self.write_bytes(value.as_slice());
    }

    pub fn write_address(&mut self, value: &Address) {
        self.write_bytes(value.as_slice());
    }

    pub fn write_u256(&mut self, value: &U256) {
        self.write_bytes(&value.to_be_bytes::<32>());
    }

    pub fn write_length(
        &mut self,
        width: HeaderWidth,
        len: usize,
        field: &'static str,
    ) -> Result<()> {
        let overflow = || Error::FieldOverflow {
            field,
            max: width.max(),
            actual: len,
        };
        match width {
            HeaderWidth::U8 => self.write_u8(u8::try_from(len).map_err(|_| overflow())?),
            HeaderWidth::U16 => self.write_u16(u16::try_from(len).map_err(|_| overflow())?),
        }
        Ok(())
    }

    /// Writes a length header followed by the bytes it describes.
    pub fn write_variable(
        &mut self,
        width: HeaderWidth,
        bytes: &[u8],
        field: &'static str,
    ) -> Result<()> {
        self.write_length(width, bytes.len(), field)?;
        self.write_bytes(bytes);
        Ok(())
    }

    /// Writes a span header over whatever `write` produces.
    pub fn write_span<F>(&mut self, width: HeaderWidth, field: &'static str, write: F) -> Result<()>
    where
        F: FnOnce(&mut Writer) -> Result<()>,
    {
        let mut inner = Writer::new();
        write(&mut inner)?;
        self.write_variable(width, &inner.buffer, field)
    }

    pub fn into_bytes(self) -> Bytes {
        Bytes::from(self.buffer)
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buffer
    }
}

/// A record with a minimal wire encoding.
pub trait Packed: Sized {
    fn encode_packed(&self, writer: &mut Writer) -> Result<()>;

    fn decode_packed(reader: &mut Reader<'_>) -> Result<Self>;

    fn to_packed_bytes(&self) -> Result<Bytes> {
        let mut writer = Writer::new();
        self.encode_packed(&mut writer)?;
        Ok(writer.into_bytes())
    }

    /// Decodes a record that must span the whole buffer.
    fn from_packed_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);
        let record = Self::decode_packed(&mut reader)?;
        reader.finish(std::any::type_name::<Self>())?;
        Ok(record)
    }

    /// `keccak256` of the packed encoding. Identity of leaves, roots and blocks.
    fn hash_packed(&self) -> Result<B256> {
        Ok(keccak256(self.to_packed_bytes()?))
    }
}

/// A record referenced by hash from another record.
///
/// The canonical hash is taken over a normalised, fixed-width ABI encoding of the semantic
/// fields and never over compressed wire bytes.
pub trait Canonical {
    fn hash_canonical(&self) -> B256;
}

/// Member of a tagged union whose first byte selects the variant layout.
pub trait Tagged: Sized {
    const KIND: &'static str;

    fn tag(&self) -> u8;

    /// Writes the variant payload that follows the tag byte.
    fn encode_body(&self, writer: &mut Writer) -> Result<()>;

    /// Reads the payload of the variant selected by `tag`.
    fn decode_body(tag: u8, reader: &mut Reader<'_>) -> Result<Self>;
}

pub fn encode_tagged<T: Tagged>(value: &T, writer: &mut Writer) -> Result<()> {
    writer.write_u8(value.tag());
    value.encode_body(writer)
}

pub fn decode_tagged<T: Tagged>(reader: &mut Reader<'_>) -> Result<T> {
    let tag = reader.read_u8(T::KIND)?;
    T::decode_body(tag, reader)
}

/// Decodes a run of tagged elements that exactly fills `bytes`.
///
/// Element lengths are not declared up front; each element is decoded and the cursor is
/// advanced by the bytes it consumed.
pub fn decode_typed_array<T: Tagged>(bytes: &[u8]) -> Result<Vec<T>> {
    let mut reader = Reader::new(bytes);
    let mut items = Vec::new();
    while !reader.is_empty() {
        items.push(decode_tagged(&mut reader)?);
    }
    Ok(items)
}

pub fn encode_typed_array<T: Tagged>(items: &[T], writer: &mut Writer) -> Result<()> {
    items
        .iter()
        .try_for_each(|item| encode_tagged(item, writer))
}

pub fn encode_hashes(hashes: &[B256], writer: &mut Writer) {
    hashes.iter().for_each(|hash| writer.write_b256(hash));
}

/// Decodes a span of 32-byte words.
pub fn decode_hashes(mut reader: Reader<'_>, field: &'static str) -> Result<Vec<B256>> {
    if reader.remaining() % 32 != 0 {
        return Err(Error::InvalidFieldLength {
            field,
            length: reader.remaining(),
        });
    }
    let mut hashes = Vec::with_capacity(reader.remaining() / 32);
    while !reader.is_empty() {
        hashes.push(reader.read_b256(field)?);
    }
    Ok(hashes)
}
