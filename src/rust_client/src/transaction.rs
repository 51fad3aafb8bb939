use sol_timelock::{
    instruction,
    state::{LockAccount, LockState},
};
use solana_client::rpc_client::RpcClient;
use solana_program::{clock::UnixTimestamp, program_pack::Pack, pubkey::Pubkey};
use solana_sdk::{
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};
use std::error::Error;

const LAMPORTS_PER_SOL: f64 = 1000000000.0;

pub fn check_balance(rpc_client: &RpcClient, public_key: &Pubkey) -> Result<f64, Box<dyn Error>> {
    Ok(rpc_client.get_balance(public_key)? as f64 / LAMPORTS_PER_SOL)
}

pub fn request_air_drop(
    rpc_client: &RpcClient,
    pub_key: &Pubkey,
    amount_sol: f64,
) -> Result<Signature, Box<dyn Error>> {
    let sig = rpc_client.request_airdrop(pub_key, (amount_sol * LAMPORTS_PER_SOL) as u64)?;
    loop {
        let confirmed = rpc_client.confirm_transaction(&sig)?;
        if confirmed {
            break;
        }
    }
    Ok(sig)
}

pub fn deposit(
    rpc_client: &RpcClient,
    program_id: &Pubkey,
    owner: &Keypair,
    lock_index: u64,
    unlock_time: UnixTimestamp,
    amount: u64,
) -> Result<Signature, Box<dyn Error>> {
    let instruction = instruction::deposit(
        program_id,
        &owner.pubkey(),
        lock_index,
        unlock_time,
        amount,
    )?;

    let blockhash = rpc_client.get_latest_blockhash()?;
    let transaction = Transaction::new_signed_with_payer(
        &[instruction],
        Some(&owner.pubkey()),
        &[owner],
        blockhash,
    );

    Ok(rpc_client.send_and_confirm_transaction(&transaction)?)
}

pub fn withdraw(
    rpc_client: &RpcClient,
    program_id: &Pubkey,
    requester: &Keypair,
    lock_address: &Pubkey,
) -> Result<Signature, Box<dyn Error>> {
    let instruction = instruction::withdraw(program_id, &requester.pubkey(), lock_address)?;

    let blockhash = rpc_client.get_latest_blockhash()?;
    let transaction = Transaction::new_signed_with_payer(
        &[instruction],
        Some(&requester.pubkey()),
        &[requester],
        blockhash,
    );

    Ok(rpc_client.send_and_confirm_transaction(&transaction)?)
}

pub fn fetch_lock(
    rpc_client: &RpcClient,
    lock_address: &Pubkey,
) -> Result<LockAccount, Box<dyn Error>> {
    let data = rpc_client.get_account_data(lock_address)?;
    Ok(LockAccount::unpack(&data)?)
}

pub fn render_lock(lock_address: &Pubkey, record: &LockAccount) -> serde_json::Value {
    serde_json::json!({
        "lockRef": lock_address.to_string(),
        "owner": record.owner.to_string(),
        "unlockTime": record.unlock_time,
        "balance": record.balance,
        "state": match record.state {
            LockState::Uninitialized => "Uninitialized",
            LockState::Locked => "Locked",
            LockState::Withdrawn => "Withdrawn",
        },
    })
}
