use solana_program::{
    account_info::AccountInfo,
    clock::UnixTimestamp,
    entrypoint::ProgramResult,
    program_error::ProgramError,
    program_pack::{IsInitialized, Pack},
    pubkey::Pubkey,
};

use crate::{
    error::TimelockError,
    state::{LockAccount, LockState, LOCK_ACCOUNT_SIZE},
};

#[must_use]
pub fn assert_is_signer(account: &AccountInfo) -> ProgramResult {
    if account.is_signer {
        Ok(())
    } else {
        Err(ProgramError::MissingRequiredSignature)
    }
}

#[must_use]
pub fn assert_keys_equal(key1: Pubkey, key2: Pubkey) -> ProgramResult {
    if key1 != key2 {
        Err(TimelockError::PublicKeyMismatch.into())
    } else {
        Ok(())
    }
}

/// resolve a lock reference to its record
#[must_use]
pub fn assert_lock_resolves(
    program_id: &Pubkey,
    account_info: &AccountInfo,
) -> Result<LockAccount, ProgramError> {
    if account_info.owner != program_id || account_info.data_len() != LOCK_ACCOUNT_SIZE {
        return Err(TimelockError::NotFound.into());
    }
    let record = LockAccount::unpack_unchecked(&account_info.data.borrow())?;
    if !record.is_initialized() {
        return Err(TimelockError::NotFound.into());
    }
    Ok(record)
}

/// unlock time must be strictly in the future
#[must_use]
pub fn assert_valid_schedule(unlock_time: UnixTimestamp, now: UnixTimestamp) -> ProgramResult {
    if unlock_time <= now {
        Err(TimelockError::InvalidSchedule.into())
    } else {
        Ok(())
    }
}

#[must_use]
pub fn assert_valid_amount(amount: u64) -> ProgramResult {
    if amount == 0 {
        Err(TimelockError::InvalidAmount.into())
    } else {
        Ok(())
    }
}

/// ordered withdraw gate: ownership, then schedule, then single use
#[must_use]
pub fn assert_withdraw_allowed(
    record: &LockAccount,
    requester: &Pubkey,
    now: UnixTimestamp,
) -> ProgramResult {
    if record.owner != *requester {
        Err(TimelockError::Unauthorized.into())
    } else if now < record.unlock_time {
        Err(TimelockError::TooEarly.into())
    } else if record.state == LockState::Withdrawn {
        Err(TimelockError::AlreadyWithdrawn.into())
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(owner: Pubkey, unlock_time: UnixTimestamp, state: LockState) -> LockAccount {
        LockAccount {
            owner,
            unlock_time,
            balance: 1_000,
            state,
        }
    }

    #[test]
    fn schedule_must_be_strictly_future() {
        assert!(assert_valid_schedule(11, 10).is_ok());
        assert_eq!(
            assert_valid_schedule(10, 10).unwrap_err(),
            TimelockError::InvalidSchedule.into()
        );
        assert_eq!(
            assert_valid_schedule(9, 10).unwrap_err(),
            TimelockError::InvalidSchedule.into()
        );
    }

    #[test]
    fn zero_amount_is_rejected() {
        assert!(assert_valid_amount(1).is_ok());
        assert_eq!(
            assert_valid_amount(0).unwrap_err(),
            TimelockError::InvalidAmount.into()
        );
    }

    #[test]
    fn owner_may_withdraw_once_unlocked() {
        let owner = Pubkey::new_unique();
        let record = record(owner, 100, LockState::Locked);

        assert!(assert_withdraw_allowed(&record, &owner, 100).is_ok());
        assert!(assert_withdraw_allowed(&record, &owner, 101).is_ok());
    }

    #[test]
    fn wrong_requester_is_reported_before_schedule() {
        let owner = Pubkey::new_unique();
        let stranger = Pubkey::new_unique();
        let record = record(owner, 100, LockState::Locked);

        // both too early and after unlock, a stranger sees the same error
        assert_eq!(
            assert_withdraw_allowed(&record, &stranger, 50).unwrap_err(),
            TimelockError::Unauthorized.into()
        );
        assert_eq!(
            assert_withdraw_allowed(&record, &stranger, 150).unwrap_err(),
            TimelockError::Unauthorized.into()
        );
    }

    #[test]
    fn early_owner_withdraw_is_too_early() {
        let owner = Pubkey::new_unique();
        let record = record(owner, 100, LockState::Locked);

        assert_eq!(
            assert_withdraw_allowed(&record, &owner, 99).unwrap_err(),
            TimelockError::TooEarly.into()
        );
    }

    #[test]
    fn spent_record_is_already_withdrawn() {
        let owner = Pubkey::new_unique();
        let record = record(owner, 100, LockState::Withdrawn);

        assert_eq!(
            assert_withdraw_allowed(&record, &owner, 150).unwrap_err(),
            TimelockError::AlreadyWithdrawn.into()
        );
        // a stranger probing a spent record still sees Unauthorized first
        assert_eq!(
            assert_withdraw_allowed(&record, &Pubkey::new_unique(), 150).unwrap_err(),
            TimelockError::Unauthorized.into()
        );
    }
}
