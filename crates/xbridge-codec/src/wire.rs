//! # Wire Primitives
//!
//! Big-endian fixed-width integers, 20-byte addresses, `u32`-prefixed byte
//! strings, and `u8`-prefixed minimal big-endian integers for bucket ids.
//!
//! Every package starts with a one-byte container marker selected by the
//! protocol version and ends exactly at the end of its input. [`Reader`]
//! enforces both; it never guesses a layout from the bytes it sees.

use xbridge_core::{
    AckStatus, Address, BucketId, ProtocolVersion, ADDRESS_LENGTH, MAX_BUCKET_ID_BYTES,
};

use crate::error::{DecodeError, EncodeError};

/// Cursor over an inner package.
#[derive(Debug)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize, field: &'static str) -> Result<&'a [u8], DecodeError> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(DecodeError::Truncated {
                field,
                needed: n,
                remaining,
            });
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, field)?);
        Ok(out)
    }

    /// Consume and verify the container marker of `version`.
    pub fn container(&mut self, version: ProtocolVersion) -> Result<(), DecodeError> {
        let found = self.u8("container")?;
        if found != version.container_marker() {
            return Err(DecodeError::ContainerMismatch {
                expected: version,
                found,
            });
        }
        Ok(())
    }

    pub fn u8(&mut self, field: &'static str) -> Result<u8, DecodeError> {
        Ok(self.array::<1>(field)?[0])
    }

    pub fn u32(&mut self, field: &'static str) -> Result<u32, DecodeError> {
        Ok(u32::from_be_bytes(self.array(field)?))
    }

    pub fn u64(&mut self, field: &'static str) -> Result<u64, DecodeError> {
        Ok(u64::from_be_bytes(self.array(field)?))
    }

    pub fn address(&mut self, field: &'static str) -> Result<Address, DecodeError> {
        Ok(Address::new(self.array::<ADDRESS_LENGTH>(field)?))
    }

    pub fn bytes(&mut self, field: &'static str) -> Result<Vec<u8>, DecodeError> {
        let len = self.u32(field)? as usize;
        Ok(self.take(len, field)?.to_vec())
    }

    pub fn string(&mut self, field: &'static str) -> Result<String, DecodeError> {
        String::from_utf8(self.bytes(field)?).map_err(|_| DecodeError::InvalidUtf8 { field })
    }

    /// Minimal big-endian magnitude behind a one-byte length.
    pub fn bigint(&mut self, field: &'static str) -> Result<BucketId, DecodeError> {
        let len = self.u8(field)? as usize;
        if len > MAX_BUCKET_ID_BYTES {
            return Err(DecodeError::IntegerTooLarge { field, bytes: len });
        }
        let magnitude = self.take(len, field)?;
        if magnitude.first() == Some(&0) {
            return Err(DecodeError::NonCanonicalInteger { field });
        }
        BucketId::from_be_bytes(magnitude)
            .map_err(|_| DecodeError::IntegerTooLarge { field, bytes: len })
    }

    pub fn option_bigint(&mut self, field: &'static str) -> Result<Option<BucketId>, DecodeError> {
        match self.u8(field)? {
            0 => Ok(None),
            1 => self.bigint(field).map(Some),
            flag => Err(DecodeError::InvalidOptionFlag { field, flag }),
        }
    }

    pub fn status(&mut self) -> Result<AckStatus, DecodeError> {
        let value = self.u8("status")?;
        AckStatus::from_u8(value).ok_or(DecodeError::InvalidStatus { value })
    }

    /// Require that the whole input was consumed.
    pub fn finish(self) -> Result<(), DecodeError> {
        match self.remaining() {
            0 => Ok(()),
            count => Err(DecodeError::TrailingBytes { count }),
        }
    }
}

/// Append-only package builder.
#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Start a package with the container marker of `version`.
    pub fn with_container(version: ProtocolVersion) -> Self {
        Self {
            buf: vec![version.container_marker()],
        }
    }

    pub fn put_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn put_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn put_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn put_address(&mut self, value: &Address) {
        self.buf.extend_from_slice(value.as_bytes());
    }

    pub fn put_bytes(&mut self, field: &'static str, value: &[u8]) -> Result<(), EncodeError> {
        let len = u32::try_from(value.len()).map_err(|_| EncodeError::FieldTooLong {
            field,
            len: value.len(),
        })?;
        self.put_u32(len);
        self.buf.extend_from_slice(value);
        Ok(())
    }

    pub fn put_string(&mut self, field: &'static str, value: &str) -> Result<(), EncodeError> {
        self.put_bytes(field, value.as_bytes())
    }

    /// `BucketId` is bounded at 32 bytes, so the length always fits a `u8`.
    pub fn put_bigint(&mut self, value: &BucketId) {
        let magnitude = value.to_be_bytes();
        self.put_u8(magnitude.len() as u8);
        self.buf.extend_from_slice(&magnitude);
    }

    pub fn put_option_bigint(&mut self, value: Option<&BucketId>) {
        match value {
            None => self.put_u8(0),
            Some(id) => {
                self.put_u8(1);
                self.put_bigint(id);
            }
        }
    }

    pub fn put_status(&mut self, status: AckStatus) {
        self.put_u8(status.as_u8());
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_are_big_endian() {
        let mut w = Writer::default();
        w.put_u32(0x0102_0304);
        w.put_u64(5);
        assert_eq!(
            w.into_bytes(),
            vec![1, 2, 3, 4, 0, 0, 0, 0, 0, 0, 0, 5]
        );
    }

    #[test]
    fn zero_bucket_id_has_zero_length() {
        let mut w = Writer::default();
        w.put_bigint(&BucketId::from(0u64));
        assert_eq!(w.into_bytes(), vec![0]);
    }

    #[test]
    fn bigint_rejects_leading_zero() {
        let mut r = Reader::new(&[2, 0, 7]);
        assert_eq!(
            r.bigint("bucket_id"),
            Err(DecodeError::NonCanonicalInteger { field: "bucket_id" })
        );
    }

    #[test]
    fn bigint_rejects_wide_magnitude() {
        let mut input = vec![33u8];
        input.extend_from_slice(&[1u8; 33]);
        let mut r = Reader::new(&input);
        assert!(matches!(
            r.bigint("bucket_id"),
            Err(DecodeError::IntegerTooLarge { bytes: 33, .. })
        ));
    }

    #[test]
    fn bytes_longer_than_input_is_truncated() {
        let mut r = Reader::new(&[0, 0, 0, 9, 1, 2]);
        assert_eq!(
            r.bytes("extra_data"),
            Err(DecodeError::Truncated {
                field: "extra_data",
                needed: 9,
                remaining: 2
            })
        );
    }

    #[test]
    fn option_flag_is_strict() {
        let mut r = Reader::new(&[2]);
        assert_eq!(
            r.option_bigint("bucket_id"),
            Err(DecodeError::InvalidOptionFlag {
                field: "bucket_id",
                flag: 2
            })
        );
    }

    #[test]
    fn status_is_strict() {
        let mut r = Reader::new(&[7]);
        assert_eq!(r.status(), Err(DecodeError::InvalidStatus { value: 7 }));
    }

    #[test]
    fn container_marker_is_verified() {
        let mut r = Reader::new(&[0x02]);
        assert_eq!(
            r.container(ProtocolVersion::V1),
            Err(DecodeError::ContainerMismatch {
                expected: ProtocolVersion::V1,
                found: 0x02
            })
        );
    }

    #[test]
    fn invalid_utf8_string_rejected() {
        let mut r = Reader::new(&[0, 0, 0, 1, 0xff]);
        assert_eq!(
            r.string("bucket_name"),
            Err(DecodeError::InvalidUtf8 { field: "bucket_name" })
        );
    }

    #[test]
    fn finish_reports_trailing_bytes() {
        let mut r = Reader::new(&[1, 2, 3]);
        r.u8("x").unwrap();
        assert_eq!(r.finish(), Err(DecodeError::TrailingBytes { count: 2 }));
    }
}
