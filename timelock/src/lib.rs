//! Authority gate (timelock) for the Zar DAO.
//!
//! Privileged operations are first scheduled by a holder of the `Proposer`
//! role, become executable once a minimum delay has elapsed, and are then
//! executed exactly once by a holder of the `Executor` role. In a finished
//! deployment both roles belong to the governor and the bootstrap admin has
//! renounced its own role, so only a passed proposal can move funds.
//!
//! An operation may also target the gate itself with [`TimelockCall`]
//! actions, which is how a passed proposal changes roles or the delay.
//!
//! Lifecycle of an operation: `Unset → Waiting → Ready → Done`.

pub mod error;
pub mod operation;
pub mod roles;
pub mod timelock;

pub use error::TimelockError;
pub use operation::{Operation, OperationState};
pub use roles::{Role, RoleTable};
pub use timelock::{Timelock, TimelockCall};
