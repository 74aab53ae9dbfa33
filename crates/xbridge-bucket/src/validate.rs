//! # Basic Validation
//!
//! Stateless checks run on request packages before the ledger is touched.
//! Each check is a pure function of the package, so validating the same
//! package twice always yields the same verdict.

use std::net::Ipv4Addr;

use xbridge_codec::{CreateBucketSyn, CreateBucketSynV1, CreateBucketSynV2, DeleteBucketSyn};
use xbridge_core::Visibility;

use crate::error::ValidationError;

pub const MIN_BUCKET_NAME_LENGTH: usize = 3;
pub const MAX_BUCKET_NAME_LENGTH: usize = 63;

/// Structural validation of a request package.
pub trait ValidateBasic {
    fn validate_basic(&self) -> Result<(), ValidationError>;
}

impl ValidateBasic for CreateBucketSynV1 {
    fn validate_basic(&self) -> Result<(), ValidationError> {
        if self.creator.is_zero() {
            return Err(ValidationError::ZeroCreator);
        }
        check_bucket_name(&self.bucket_name)?;
        if self.primary_sp_address.is_zero() {
            return Err(ValidationError::ZeroPrimarySp);
        }
        parse_visibility(self.visibility)?;
        if self.primary_sp_approval_signature.is_empty() {
            return Err(ValidationError::EmptyApprovalSignature);
        }
        Ok(())
    }
}

impl ValidateBasic for CreateBucketSynV2 {
    fn validate_basic(&self) -> Result<(), ValidationError> {
        self.base.validate_basic()
    }
}

impl ValidateBasic for CreateBucketSyn {
    fn validate_basic(&self) -> Result<(), ValidationError> {
        match self {
            Self::V1(syn) => syn.validate_basic(),
            Self::V2(syn) => syn.validate_basic(),
        }
    }
}

impl ValidateBasic for DeleteBucketSyn {
    fn validate_basic(&self) -> Result<(), ValidationError> {
        if self.operator.is_zero() {
            return Err(ValidationError::ZeroOperator);
        }
        Ok(())
    }
}

/// Decode a raw visibility value, rejecting unknown and unspecified ones.
pub fn parse_visibility(raw: u32) -> Result<Visibility, ValidationError> {
    match Visibility::from_u32(raw) {
        Some(Visibility::Unspecified) | None => Err(ValidationError::InvalidVisibility(raw)),
        Some(visibility) => Ok(visibility),
    }
}

/// Bucket naming rules shared with the storage layer.
pub fn check_bucket_name(name: &str) -> Result<(), ValidationError> {
    let fail = |reason| {
        Err(ValidationError::InvalidBucketName {
            name: name.to_string(),
            reason,
        })
    };

    if name.len() < MIN_BUCKET_NAME_LENGTH || name.len() > MAX_BUCKET_NAME_LENGTH {
        return fail("length must be between 3 and 63");
    }
    if !name
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'.')
    {
        return fail("only lowercase letters, digits, '-' and '.' are allowed");
    }
    let bytes = name.as_bytes();
    let alnum = |b: u8| b.is_ascii_lowercase() || b.is_ascii_digit();
    if !alnum(bytes[0]) || !alnum(bytes[bytes.len() - 1]) {
        return fail("must start and end with a letter or digit");
    }
    if name.contains("..") || name.contains(".-") || name.contains("-.") {
        return fail("must not contain '..', '.-' or '-.'");
    }
    if name.parse::<Ipv4Addr>().is_ok() {
        return fail("must not be formatted as an IP address");
    }
    Ok(())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::collection::vec;
    use proptest::prelude::*;
    use xbridge_core::{Address, BucketId};

    fn address() -> impl Strategy<Value = Address> {
        prop_oneof![Just(Address::ZERO), any::<[u8; 20]>().prop_map(Address::new)]
    }

    prop_compose! {
        fn create_v1()(
            creator in address(),
            bucket_name in "[a-zA-Z0-9.\\-_]{0,70}",
            primary_sp_address in address(),
            visibility in 0u32..5,
            charged_read_quota in any::<u64>(),
            payment_address in address(),
            expired_height in any::<u64>(),
            signature in vec(any::<u8>(), 0..4),
            extra_data in vec(any::<u8>(), 0..8),
        ) -> CreateBucketSynV1 {
            CreateBucketSynV1 {
                creator,
                bucket_name,
                primary_sp_address,
                visibility,
                charged_read_quota,
                payment_address,
                primary_sp_approval_expired_height: expired_height,
                primary_sp_approval_signature: signature,
                extra_data,
            }
        }
    }

    fn create_syn() -> impl Strategy<Value = CreateBucketSyn> {
        prop_oneof![
            create_v1().prop_map(CreateBucketSyn::V1),
            (create_v1(), any::<u32>()).prop_map(|(base, family_id)| {
                CreateBucketSyn::V2(CreateBucketSynV2 {
                    base,
                    global_virtual_group_family_id: family_id,
                })
            }),
        ]
    }

    prop_compose! {
        fn delete_syn()(
            operator in address(),
            id in any::<u64>(),
            extra_data in vec(any::<u8>(), 0..8),
        ) -> DeleteBucketSyn {
            DeleteBucketSyn { operator, bucket_id: BucketId::from(id), extra_data }
        }
    }

    proptest! {
        #[test]
        fn create_validation_is_deterministic(syn in create_syn()) {
            prop_assert_eq!(syn.validate_basic(), syn.validate_basic());
        }

        #[test]
        fn delete_validation_is_deterministic(syn in delete_syn()) {
            prop_assert_eq!(syn.validate_basic(), syn.validate_basic());
        }

        #[test]
        fn name_check_is_idempotent(name in "[a-z0-9.\\-_A-Z]{0,70}") {
            prop_assert_eq!(check_bucket_name(&name), check_bucket_name(&name));
        }

        #[test]
        fn accepted_names_obey_charset(name in "[a-z0-9.-]{0,70}") {
            if check_bucket_name(&name).is_ok() {
                prop_assert!(name.len() >= 3 && name.len() <= 63);
                prop_assert!(!name.starts_with('-') && !name.starts_with('.'));
                prop_assert!(!name.contains(".."));
            }
        }
    }
}
