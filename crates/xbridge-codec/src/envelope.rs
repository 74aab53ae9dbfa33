//! Outer envelope: `[operation tag][inner package]`.

use xbridge_core::OperationKind;

use crate::error::EnvelopeError;

/// An operation tag plus the inner package bytes it wraps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub operation: OperationKind,
    pub payload: Vec<u8>,
}

impl Envelope {
    pub fn new(operation: OperationKind, payload: Vec<u8>) -> Self {
        Self { operation, payload }
    }

    /// Tag byte followed by the payload.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.payload.len());
        out.push(self.operation.tag());
        out.extend_from_slice(&self.payload);
        out
    }

    /// Split raw bytes into operation and inner payload without copying.
    pub fn split(bytes: &[u8]) -> Result<(OperationKind, &[u8]), EnvelopeError> {
        let (&tag, inner) = bytes.split_first().ok_or(EnvelopeError::Empty)?;
        let operation = OperationKind::from_u8(tag).ok_or(EnvelopeError::UnknownOperation(tag))?;
        Ok((operation, inner))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        let (operation, inner) = Self::split(bytes)?;
        Ok(Self::new(operation, inner.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_precedes_payload() {
        let env = Envelope::new(OperationKind::Delete, vec![0x01, 0xaa]);
        assert_eq!(env.encode(), vec![3, 0x01, 0xaa]);
        assert_eq!(Envelope::decode(&env.encode()).unwrap(), env);
    }

    #[test]
    fn empty_envelope_rejected() {
        assert_eq!(Envelope::split(&[]), Err(EnvelopeError::Empty));
    }

    #[test]
    fn unknown_tag_rejected() {
        assert_eq!(
            Envelope::split(&[0x09, 0x01]),
            Err(EnvelopeError::UnknownOperation(9))
        );
    }
}
