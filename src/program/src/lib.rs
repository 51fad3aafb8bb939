//! A program that locks lamports in an account until a unix timestamp
#![deny(missing_docs)]
#![forbid(unsafe_code)]

mod entrypoint;
pub mod error;
pub mod instruction;
pub mod processor;
pub mod state;
mod validation_utils;

use solana_program::pubkey::Pubkey;

solana_program::declare_id!("9oLckQyTfDsbsbBWf39uVf6mUzVEdjgyxMTMpuQGvGTY");

/// Seed prefix for lock account address derivation
pub const LOCK_SEED_PREFIX: &[u8] = b"timelock";

/// Derives the lock account address and bump for `(owner, lock_index)`.
///
/// The index lets one owner hold any number of independent locks; each
/// `(owner, lock_index)` pair maps to exactly one account.
pub fn find_lock_address(program_id: &Pubkey, owner: &Pubkey, lock_index: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[LOCK_SEED_PREFIX, owner.as_ref(), &lock_index.to_le_bytes()],
        program_id,
    )
}
