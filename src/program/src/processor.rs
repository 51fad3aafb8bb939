//! Program instruction processor
use crate::{
    error::TimelockError,
    find_lock_address,
    instruction::{Deposit, TimelockInstruction},
    state::{LockAccount, LockState, WithLockData, LOCK_ACCOUNT_SIZE},
    validation_utils::*,
    LOCK_SEED_PREFIX,
};
use borsh::BorshDeserialize;
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program::{invoke, invoke_signed, set_return_data},
    program_error::ProgramError,
    program_pack::Pack,
    pubkey::Pubkey,
    system_instruction, system_program,
    sysvar::{clock::Clock, rent::Rent, Sysvar},
};

/// Instruction processor
pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    let instruction = TimelockInstruction::try_from_slice(instruction_data)
        .map_err(|_| ProgramError::InvalidInstructionData)?;

    match instruction {
        TimelockInstruction::Deposit(ctx) => deposit(program_id, accounts, ctx)?,
        TimelockInstruction::Withdraw => withdraw(program_id, accounts)?,
    }

    Ok(())
}

/// Creates and funds a lock account
pub fn deposit(program_id: &Pubkey, accounts: &[AccountInfo], ctx: Deposit) -> ProgramResult {
    msg!("Timelock::Deposit");

    let Deposit {
        lock_index,
        unlock_time,
        amount,
    } = ctx;

    let account_info_iter = &mut accounts.iter();
    let owner_info = next_account_info(account_info_iter)?;
    let lock_account_info = next_account_info(account_info_iter)?;
    let system_account_info = next_account_info(account_info_iter)?;

    let (lock_account_key, lock_account_bump_seed) =
        find_lock_address(program_id, owner_info.key, lock_index);

    assert_is_signer(owner_info)?;
    assert_keys_equal(lock_account_key, *lock_account_info.key)?;
    assert_keys_equal(system_program::id(), *system_account_info.key)?;

    // time is sampled once per instruction
    let now = Clock::get()?.unix_timestamp;
    assert_valid_schedule(unlock_time, now)?;
    assert_valid_amount(amount)?;

    let rent = Rent::get()?;
    let lamports = rent
        .minimum_balance(LOCK_ACCOUNT_SIZE)
        .checked_add(amount)
        .ok_or(TimelockError::Overflow)?;

    let signer_seeds: &[&[u8]] = &[
        LOCK_SEED_PREFIX,
        owner_info.key.as_ref(),
        &lock_index.to_le_bytes(),
        &[lock_account_bump_seed],
    ];

    if lock_account_info.lamports() > 0 {
        // the address was funded ahead of time; create_account would refuse
        // it, so top up and allocate+assign instead. Both fail if a record
        // already occupies the address, live or withdrawn.
        let top_up = lamports.saturating_sub(lock_account_info.lamports());
        if top_up > 0 {
            invoke(
                &system_instruction::transfer(owner_info.key, &lock_account_key, top_up),
                &[
                    owner_info.clone(),
                    lock_account_info.clone(),
                    system_account_info.clone(),
                ],
            )?;
        }
        invoke_signed(
            &system_instruction::allocate(&lock_account_key, LOCK_ACCOUNT_SIZE as u64),
            &[lock_account_info.clone(), system_account_info.clone()],
            &[signer_seeds],
        )?;
        invoke_signed(
            &system_instruction::assign(&lock_account_key, program_id),
            &[lock_account_info.clone(), system_account_info.clone()],
            &[signer_seeds],
        )?;
    } else {
        // one create_account carries both the rent reserve and the locked
        // amount; it fails if the address is already in use
        invoke_signed(
            &system_instruction::create_account(
                owner_info.key,
                &lock_account_key,
                lamports,
                LOCK_ACCOUNT_SIZE as u64,
                program_id,
            ),
            &[
                owner_info.clone(),
                lock_account_info.clone(),
                system_account_info.clone(),
            ],
            &[signer_seeds],
        )?;
    }

    let lock_account_data = LockAccount {
        owner: *owner_info.key,
        unlock_time,
        balance: amount,
        state: LockState::Locked,
    };

    lock_account_data.pack_into_slice(&mut lock_account_info.data.borrow_mut());

    set_return_data(lock_account_key.as_ref());

    msg!(
        "Locked {} lamports in account {:?} until {}",
        amount,
        lock_account_info.key,
        unlock_time
    );

    Ok(())
}

/// Withdraws the locked balance to the owner
pub fn withdraw(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    msg!("Timelock::Withdraw");

    let account_info_iter = &mut accounts.iter();
    let requester_info = next_account_info(account_info_iter)?;
    let lock_account_info = next_account_info(account_info_iter)?;

    assert_is_signer(requester_info)?;

    let record = assert_lock_resolves(program_id, lock_account_info)?;

    let now = Clock::get()?.unix_timestamp;
    if let Err(err) = assert_withdraw_allowed(&record, requester_info.key, now) {
        let too_early: ProgramError = TimelockError::TooEarly.into();
        if err == too_early {
            msg!("Unlock time: {}, Now: {}", record.unlock_time, now);
        }
        return Err(err);
    }

    // captured before the record is zeroed
    let amount = record.balance;

    lock_account_info.with_mut_data(|mut lock_account_data| {
        lock_account_data.balance = 0;
        lock_account_data.state = LockState::Withdrawn;
        Ok(lock_account_data)
    })?;

    let drained = lock_account_info
        .lamports()
        .checked_sub(amount)
        .ok_or(TimelockError::Overflow)?;
    let credited = requester_info
        .lamports()
        .checked_add(amount)
        .ok_or(TimelockError::Overflow)?;
    **lock_account_info.try_borrow_mut_lamports()? = drained;
    **requester_info.try_borrow_mut_lamports()? = credited;

    set_return_data(&amount.to_le_bytes());

    msg!(
        "Withdrew {} lamports from account {:?} at {}",
        amount,
        lock_account_info.key,
        now
    );

    Ok(())
}
