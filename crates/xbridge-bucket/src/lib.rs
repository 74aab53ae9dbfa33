//! # xbridge-bucket — Bucket Cross-Chain Application
//!
//! The deterministic state machine behind the bucket channel of the bridge:
//!
//! - **Router** (`router.rs`): `handle_syn`, `handle_ack` and
//!   `handle_fail_ack`. Decode, dispatch to one handler, re-wrap the reply.
//!
//! - **Handlers** (`mirror.rs`, `create.rs`, `delete.rs`): one family per
//!   operation, one function per direction.
//!
//! - **Validation** (`validate.rs`): `ValidateBasic` and the bucket naming
//!   rules.
//!
//! - **Ledger** (`ledger.rs`, `memory.rs`): the collaborator interface the
//!   handlers mutate state through, and a deterministic in-memory
//!   implementation.
//!
//! ## Crate Policy
//!
//! - No wall-clock time, randomness, or unordered iteration. Two nodes fed
//!   the same packages produce byte-identical replies and events.
//! - Malformed input is a [`ProtocolViolation`], never a panic.
//! - Business failures are values inside [`ExecuteResult`].

pub mod approval;
pub mod create;
pub mod delete;
pub mod error;
pub mod event;
pub mod ledger;
pub mod memory;
pub mod mirror;
pub mod outcome;
pub mod router;
pub mod validate;

pub use error::{BucketAppError, LedgerError, ProtocolViolation, ValidationError};
pub use event::BucketEvent;
pub use ledger::{Approval, BucketInfo, BucketLedger, CreateBucketOptions, DeleteBucketOptions};
pub use memory::InMemoryLedger;
pub use outcome::HandlerResult;
pub use router::{AppContext, BucketApp, ExecuteResult};
pub use validate::{check_bucket_name, ValidateBasic};
