//! Error types

use thiserror::Error;

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use solana_program::{
    decode_error::DecodeError,
    msg,
    program_error::{PrintProgramError, ProgramError},
};

/// Errors that may be returned by the timelock program.
///
/// The discriminants are the on-chain custom error codes; the declaration
/// order is part of the wire contract.
#[derive(Clone, Debug, Eq, Error, FromPrimitive, PartialEq)]
pub enum TimelockError {
    /// The requested unlock time is not strictly in the future.
    #[error("InvalidSchedule")]
    InvalidSchedule,
    /// The deposit amount is zero.
    #[error("InvalidAmount")]
    InvalidAmount,
    /// The reference does not resolve to a live lock account.
    #[error("NotFound")]
    NotFound,
    /// The requester is not the owner of the lock account.
    #[error("Unauthorized")]
    Unauthorized,
    /// The unlock time has not been reached yet.
    #[error("TooEarly")]
    TooEarly,
    /// The locked balance has already been withdrawn.
    #[error("AlreadyWithdrawn")]
    AlreadyWithdrawn,
    /// An account key does not match the expected address.
    #[error("PublicKeyMismatch")]
    PublicKeyMismatch,
    /// Stored account data does not decode to a lock record.
    #[error("InvalidRecordData")]
    InvalidRecordData,
    /// Balance arithmetic overflowed.
    #[error("Overflow")]
    Overflow,
}

impl From<TimelockError> for ProgramError {
    fn from(e: TimelockError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl<T> DecodeError<T> for TimelockError {
    fn type_of() -> &'static str {
        "Timelock Error"
    }
}

impl PrintProgramError for TimelockError {
    fn print<E>(&self)
    where
        E: 'static + std::error::Error + DecodeError<E> + PrintProgramError + FromPrimitive,
    {
        match self {
            TimelockError::InvalidSchedule => {
                msg!("Error: Unlock time must be strictly in the future.")
            }
            TimelockError::InvalidAmount => {
                msg!("Error: Deposit amount must be greater than zero.")
            }
            TimelockError::NotFound => msg!("Error: No lock account exists at this address."),
            TimelockError::Unauthorized => msg!("Error: Only the lock owner may withdraw."),
            TimelockError::TooEarly => msg!("Error: Cannot withdraw before the unlock time."),
            TimelockError::AlreadyWithdrawn => {
                msg!("Error: The locked balance has already been withdrawn.")
            }
            TimelockError::PublicKeyMismatch => {
                msg!("Error: An account key does not match the expected address.")
            }
            TimelockError::InvalidRecordData => {
                msg!("Error: There was an issue deserializing account data.")
            }
            TimelockError::Overflow => msg!("Error: Balance arithmetic overflowed."),
        }
    }
}
