//! Program state
#![deny(missing_docs)]

use arrayref::{array_mut_ref, array_ref, array_refs, mut_array_refs};
use num_derive::FromPrimitive;
use solana_program::{
    account_info::AccountInfo,
    clock::UnixTimestamp,
    entrypoint::ProgramResult,
    program_error::ProgramError,
    program_memory::sol_memcpy,
    program_pack::{IsInitialized, Pack, Sealed},
    pubkey::Pubkey,
};

use crate::error::TimelockError;

/// A lock account record: one deposit, locked until `unlock_time`
#[derive(Clone, Debug, PartialEq)]
#[repr(C)]
pub struct LockAccount {
    // 32
    /// The owner of the lock; the only party entitled to withdraw
    pub owner: Pubkey,
    // 8
    /// The unix timestamp after which withdrawal is permitted
    pub unlock_time: UnixTimestamp,
    // 8
    /// The locked lamports, excluding the record's rent reserve
    pub balance: u64,
    // 1
    /// The record state
    pub state: LockState,
}

/// The size of a lock account record
pub const LOCK_ACCOUNT_SIZE: usize = OWNER_LEN + UNLOCK_TIME_LEN + BALANCE_LEN + STATE_LEN;

const OWNER_LEN: usize = 32;
const UNLOCK_TIME_LEN: usize = 8;
const BALANCE_LEN: usize = 8;
const STATE_LEN: usize = 1;

impl IsInitialized for LockAccount {
    fn is_initialized(&self) -> bool {
        self.state != LockState::Uninitialized
    }
}

impl Sealed for LockAccount {}
impl Pack for LockAccount {
    const LEN: usize = LOCK_ACCOUNT_SIZE;

    fn pack_into_slice(&self, dst: &mut [u8]) {
        let dst = array_mut_ref![dst, 0, LOCK_ACCOUNT_SIZE];

        let (owner_dst, unlock_time_dst, balance_dst, state_dst) =
            mut_array_refs![dst, OWNER_LEN, UNLOCK_TIME_LEN, BALANCE_LEN, STATE_LEN];

        sol_memcpy(owner_dst, &self.owner.to_bytes()[..], OWNER_LEN);
        *unlock_time_dst = self.unlock_time.to_le_bytes();
        *balance_dst = self.balance.to_le_bytes();
        state_dst[0] = self.state as u8;
    }

    fn unpack_from_slice(src: &[u8]) -> Result<Self, ProgramError> {
        let src = array_ref![src, 0, LOCK_ACCOUNT_SIZE];

        let (owner_src, unlock_time_src, balance_src, state_src) =
            array_refs![src, OWNER_LEN, UNLOCK_TIME_LEN, BALANCE_LEN, STATE_LEN];

        let state: LockState = num::FromPrimitive::from_u8(state_src[0])
            .ok_or(TimelockError::InvalidRecordData)?;

        Ok(LockAccount {
            owner: Pubkey::new_from_array(*owner_src),
            unlock_time: UnixTimestamp::from_le_bytes(*unlock_time_src),
            balance: u64::from_le_bytes(*balance_src),
            state,
        })
    }
}

/// Lock record state
#[derive(Clone, Copy, Debug, Eq, FromPrimitive, PartialEq)]
#[repr(C)]
pub enum LockState {
    /// The account holds no record yet; freshly allocated accounts decode to this
    Uninitialized,
    /// The balance is held until the unlock time
    Locked,
    /// The balance has been paid out; terminal
    Withdrawn,
}

impl Default for LockState {
    fn default() -> Self {
        LockState::Uninitialized
    }
}

/// Read-modify-write access to the lock record stored in an account
pub trait WithLockData {
    /// Unpacks the record, applies `f`, and packs the result back
    fn with_mut_data(
        &self,
        f: impl FnOnce(LockAccount) -> Result<LockAccount, ProgramError>,
    ) -> ProgramResult;
}

impl WithLockData for AccountInfo<'_> {
    fn with_mut_data(
        &self,
        f: impl FnOnce(LockAccount) -> Result<LockAccount, ProgramError>,
    ) -> ProgramResult {
        let lock_account_data = LockAccount::unpack(&self.data.borrow())?;
        let lock_account_data = f(lock_account_data)?;
        lock_account_data.pack_into_slice(&mut self.data.borrow_mut());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_then_unpack_preserves_record() {
        let record = LockAccount {
            owner: Pubkey::new_unique(),
            unlock_time: 1_700_000_000,
            balance: 1_000_000_000,
            state: LockState::Locked,
        };

        let mut buf = [0u8; LOCK_ACCOUNT_SIZE];
        record.pack_into_slice(&mut buf);
        let unpacked = LockAccount::unpack_from_slice(&buf).unwrap();

        assert_eq!(unpacked, record);
    }

    #[test]
    fn zeroed_buffer_is_uninitialized() {
        let buf = [0u8; LOCK_ACCOUNT_SIZE];
        let record = LockAccount::unpack_unchecked(&buf).unwrap();

        assert_eq!(record.state, LockState::Uninitialized);
        assert!(!record.is_initialized());
        assert_eq!(
            LockAccount::unpack(&buf).unwrap_err(),
            ProgramError::UninitializedAccount
        );
    }

    #[test]
    fn unknown_state_byte_is_rejected() {
        let mut buf = [0u8; LOCK_ACCOUNT_SIZE];
        buf[LOCK_ACCOUNT_SIZE - 1] = 3;

        assert_eq!(
            LockAccount::unpack_unchecked(&buf).unwrap_err(),
            TimelockError::InvalidRecordData.into()
        );
    }

    #[test]
    fn negative_unlock_time_round_trips() {
        let record = LockAccount {
            owner: Pubkey::new_unique(),
            unlock_time: -1,
            balance: 1,
            state: LockState::Withdrawn,
        };

        let mut buf = [0u8; LOCK_ACCOUNT_SIZE];
        record.pack_into_slice(&mut buf);

        assert_eq!(LockAccount::unpack_from_slice(&buf).unwrap(), record);
    }
}
