use chrono::prelude::*;
use sol_timelock::find_lock_address;
use solana_client::rpc_client::RpcClient;
use solana_sdk::signature::read_keypair_file;
use solana_sdk::signer::Signer;
use std::error::Error;
use std::thread::sleep;
use std::time::Duration;
use transaction::{check_balance, deposit, fetch_lock, render_lock, request_air_drop, withdraw};

mod transaction;

#[allow(dead_code)]
const URL_TESTNET: &str = "https://api.testnet.solana.com";
#[allow(dead_code)]
const URL_DEVNET: &str = "https://api.devnet.solana.com";
const URL_LOCAL: &str = "http://127.0.0.1:8899";

const LOCK_AMOUNT: u64 = 1_000_000_000;
const LOCK_DURATION_SECS: i64 = 20;

fn main() -> Result<(), Box<dyn Error>> {
    let keypair_path = std::env::args()
        .nth(1)
        .ok_or("usage: timelock-client <KEYPAIR_PATH>")?;

    let rpc_client = RpcClient::new(URL_LOCAL);

    let owner = read_keypair_file(&keypair_path)?;
    let owner_key = owner.pubkey();
    println!("Owner: {:?}", owner_key);

    let balance = check_balance(&rpc_client, &owner_key)?;
    println!("Owner balance: {:?}", balance);
    if balance < 2.0 {
        println!("Requesting airdrop...");
        request_air_drop(&rpc_client, &owner_key, 2.0)?;
        println!(
            "Owner balance: {:?}",
            check_balance(&rpc_client, &owner_key)?
        );
    }

    let program_id = sol_timelock::id();

    // each (owner, index) pair is single-shot, so a fresh index per run
    let now = Utc::now().timestamp();
    let lock_index = now as u64;
    let unlock_time = now + LOCK_DURATION_SECS;

    let (lock_address, _) = find_lock_address(&program_id, &owner_key, lock_index);
    println!("Lock account: {:?}", lock_address);

    println!("Depositing {} lamports until {}...", LOCK_AMOUNT, unlock_time);
    deposit(
        &rpc_client,
        &program_id,
        &owner,
        lock_index,
        unlock_time,
        LOCK_AMOUNT,
    )?;

    let record = fetch_lock(&rpc_client, &lock_address)?;
    println!("{}", serde_json::to_string_pretty(&render_lock(&lock_address, &record))?);
    println!(
        "Owner balance: {:?}",
        check_balance(&rpc_client, &owner_key)?
    );

    let diff = unlock_time.saturating_sub(Utc::now().timestamp());
    if diff > 0 {
        // a margin on top of the deadline so the cluster clock is surely past it
        println!("Waiting {} seconds for the unlock time...", diff + 30);
        sleep(Duration::from_secs((diff + 30).try_into()?));
    }

    println!("Withdrawing...");
    withdraw(&rpc_client, &program_id, &owner, &lock_address)?;
    println!("Withdrawn successfully!");

    let record = fetch_lock(&rpc_client, &lock_address)?;
    println!("{}", serde_json::to_string_pretty(&render_lock(&lock_address, &record))?);
    println!(
        "Owner balance: {:?}",
        check_balance(&rpc_client, &owner_key)?
    );

    Ok(())
}
