//! The definitions for timelock instructions

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    clock::UnixTimestamp,
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program,
};

use crate::find_lock_address;

/// Deposit instruction data
#[derive(Debug, PartialEq, BorshDeserialize, BorshSerialize)]
pub struct Deposit {
    /// The index of the lock under the owner's key
    pub lock_index: u64,
    /// The unix timestamp after which withdrawal is permitted
    pub unlock_time: UnixTimestamp,
    /// The number of lamports to lock
    pub amount: u64,
}

/// A timelock instruction
#[derive(Debug, PartialEq, BorshDeserialize, BorshSerialize)]
pub enum TimelockInstruction {
    /// Create and fund a lock account in a single step
    /// Requires that no record occupies the lock address; lamports sent to
    /// the address ahead of time are absorbed into the funding
    /// Requires that the unlock time is strictly in the future
    /// Requires that the amount is greater than zero
    ///
    /// Debits the rent reserve plus the amount from the owner, creates the
    /// lock account at the address derived from `(owner, lock_index)`, and
    /// writes the record. The created address is set as return data.
    ///
    /// Transitions:
    /// (no account) -> Locked
    ///
    /// # Account references
    ///   0. `[SIGNER, WRITE]` Owner account
    ///   1. `[WRITE]` Lock account
    ///   2. `[]` System program account
    Deposit(Deposit),

    /// Withdraw the locked balance to the owner
    /// Requires that the lock account holds a live record
    /// Requires that the requester is the owner
    /// Requires that the current time is greater than or equal to the unlock time
    /// Requires that the balance has not already been withdrawn
    ///
    /// Transitions:
    /// Locked -> Withdrawn
    ///     Transfers the locked balance out of the lock account into the
    ///     owner account and zeroes the record balance. The record and its
    ///     rent reserve persist; Withdrawn is terminal. The released amount
    ///     is set as return data.
    ///
    /// # Account references
    ///   0. `[SIGNER, WRITE]` Requester account (must be the owner to succeed)
    ///   1. `[WRITE]` Lock account
    Withdraw,
}

/// Creates a `Deposit` instruction.
///
/// The lock account address is derived from `(owner, lock_index)`.
pub fn deposit(
    program_id: &Pubkey,
    owner: &Pubkey,
    lock_index: u64,
    unlock_time: UnixTimestamp,
    amount: u64,
) -> Result<Instruction, ProgramError> {
    let (lock_address, _) = find_lock_address(program_id, owner, lock_index);
    let data = borsh::to_vec(&TimelockInstruction::Deposit(Deposit {
        lock_index,
        unlock_time,
        amount,
    }))
    .map_err(|e| ProgramError::BorshIoError(e.to_string()))?;

    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*owner, true),
            AccountMeta::new(lock_address, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data,
    })
}

/// Creates a `Withdraw` instruction.
pub fn withdraw(
    program_id: &Pubkey,
    requester: &Pubkey,
    lock_address: &Pubkey,
) -> Result<Instruction, ProgramError> {
    let data = borsh::to_vec(&TimelockInstruction::Withdraw)
        .map_err(|e| ProgramError::BorshIoError(e.to_string()))?;

    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*requester, true),
            AccountMeta::new(*lock_address, false),
        ],
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deposit_wire_format() {
        let data = borsh::to_vec(&TimelockInstruction::Deposit(Deposit {
            lock_index: 7,
            unlock_time: 1_700_000_000,
            amount: 1_000_000_000,
        }))
        .unwrap();

        let mut expected = vec![0u8];
        expected.extend_from_slice(&7u64.to_le_bytes());
        expected.extend_from_slice(&1_700_000_000i64.to_le_bytes());
        expected.extend_from_slice(&1_000_000_000u64.to_le_bytes());
        assert_eq!(data, expected);
        assert_eq!(data.len(), 25);

        assert_eq!(
            TimelockInstruction::try_from_slice(&data).unwrap(),
            TimelockInstruction::Deposit(Deposit {
                lock_index: 7,
                unlock_time: 1_700_000_000,
                amount: 1_000_000_000,
            })
        );
    }

    #[test]
    fn withdraw_wire_format() {
        let data = borsh::to_vec(&TimelockInstruction::Withdraw).unwrap();
        assert_eq!(data, vec![1u8]);
    }

    #[test]
    fn deposit_builder_targets_derived_address() {
        let program_id = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let (lock_address, _) = find_lock_address(&program_id, &owner, 3);

        let instruction = deposit(&program_id, &owner, 3, 1_700_000_000, 500).unwrap();

        assert_eq!(instruction.program_id, program_id);
        assert_eq!(instruction.accounts.len(), 3);
        assert_eq!(instruction.accounts[0].pubkey, owner);
        assert!(instruction.accounts[0].is_signer);
        assert_eq!(instruction.accounts[1].pubkey, lock_address);
        assert!(!instruction.accounts[1].is_signer);
        assert_eq!(instruction.accounts[2].pubkey, system_program::id());
        assert!(!instruction.accounts[2].is_writable);
    }

    #[test]
    fn distinct_indexes_derive_distinct_addresses() {
        let program_id = Pubkey::new_unique();
        let owner = Pubkey::new_unique();

        let (first, _) = find_lock_address(&program_id, &owner, 0);
        let (second, _) = find_lock_address(&program_id, &owner, 1);
        assert_ne!(first, second);
    }
}
