//! Deterministic ledger host.
//!
//! A single writer applies one operation at a time. Every operation is stamped
//! with a [`LedgerPoint`](zar_types::LedgerPoint) from the [`Sequencer`], so all
//! state in the workspace is versioned by position rather than guarded by locks.
//!
//! The host owns the native currency table and the set of deployed contracts.
//! Batches of actions are dispatched all-or-nothing: calls run against staged
//! copies of the touched state and only a fully successful batch is committed.

pub mod balances;
pub mod contract;
pub mod error;
pub mod registry;
pub mod sequencer;

pub use balances::NativeBalances;
pub use contract::{decode_calldata, encode_calldata, CallContext, Contract};
pub use error::{ContractError, DispatchError, LedgerError};
pub use registry::{ContractRegistry, Dispatcher};
pub use sequencer::Sequencer;
