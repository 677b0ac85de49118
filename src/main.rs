use anyhow::Context;
use base64::{engine::general_purpose::STANDARD, Engine};
use clap::{Parser, Subcommand};
use secrecy::SecretString;
use serde_json::{json, Value};
use std::process::ExitCode;
use std::time::Duration;

use sui_ptb::crypto::signing_digest;
use sui_ptb::ops;
use sui_ptb::rpc::{request_faucet_gas, ExecutionResponse};
use sui_ptb::utils::enable_debug;
use sui_ptb::{
    assemble_signature, log_error, transaction_digest, ClientContext, Ed25519KeyPair, GasConfig, KeyPair,
    Network, NetworkConfig, PtbError, SuiAddress, MIST_PER_SUI,
};

#[derive(Parser, Debug)]
#[command(name = "sui-ptb", version, about = "Build, sign and submit Sui programmable transactions")]
struct Cli {
    /// mainnet, testnet, devnet or localnet
    #[arg(long, global = true, default_value = "testnet")]
    network: Network,

    /// Override the fullnode JSON-RPC endpoint
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    /// Override the faucet endpoint
    #[arg(long, global = true)]
    faucet_url: Option<String>,

    /// User private key (base64 or suiprivkey1...)
    #[arg(long, global = true, env = "SUI_USER_KEY", hide_env_values = true)]
    user_key: Option<String>,

    /// Sponsor private key for sponsored transactions
    #[arg(long, global = true, env = "SUI_SPONSOR_KEY", hide_env_values = true)]
    sponsor_key: Option<String>,

    /// Fixed gas budget in MIST (estimated by dry run when omitted)
    #[arg(long, global = true)]
    gas_budget: Option<u64>,

    /// Fixed gas price in MIST (reference gas price when omitted)
    #[arg(long, global = true)]
    gas_price: Option<u64>,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    timeout: u64,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a new Ed25519 key pair
    Keygen,
    /// Show the address and public key of the user key
    Address,
    /// Sign base64 transaction bytes with the user key
    Sign {
        tx_bytes: String,
        /// Scheme byte written in front of the signature
        #[arg(long, default_value_t = 0)]
        scheme: u8,
    },
    /// Compute the digest of base64 transaction bytes
    Digest { tx_bytes: String },
    /// Send an amount of MIST split off the gas coin
    Pay { recipient: SuiAddress, amount: u64 },
    /// Send the entire SUI balance
    PayAll { recipient: SuiAddress },
    /// Send one amount to each recipient in a single transaction
    PayMulti {
        #[arg(long = "to", required = true, value_delimiter = ',')]
        recipients: Vec<SuiAddress>,
        #[arg(long = "amount", required = true, value_delimiter = ',')]
        amounts: Vec<u64>,
    },
    /// Transfer with gas paid by the sponsor key
    Sponsored { recipient: SuiAddress, amount: u64 },
    /// Build and sign locally with fixed gas, then submit and compare digests
    Offline { recipient: SuiAddress, amount: u64 },
    /// Request test-network gas for an address (defaults to the user)
    Faucet { address: Option<SuiAddress> },
}

/// Command result, rendered as JSON or as plain lines
struct Output {
    value: Value,
    lines: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.debug {
        enable_debug();
    }

    match run(&cli) {
        Ok(output) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&output.value).unwrap_or_default());
            } else {
                for line in output.lines {
                    println!("{}", line);
                }
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            if cli.json {
                log_error!("cli", "Command failed", error = format!("{:#}", err));
                let body = match err.downcast_ref::<PtbError>() {
                    Some(e) => json!({ "error": e }),
                    None => json!({ "error": { "code": "internal", "message": format!("{:#}", err) } }),
                };
                println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
            } else {
                eprintln!("Error: {:#}", err);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<Output> {
    match &cli.command {
        Commands::Keygen => keygen(),
        Commands::Address => {
            let ctx = client_context(cli)?;
            let user = ctx.user();
            let address = user.address();
            let public_key = hex::encode(user.public_key_bytes());
            Ok(Output {
                value: json!({
                    "address": address,
                    "publicKey": public_key,
                    "scheme": user.scheme().name(),
                }),
                lines: vec![format!("Address: {}", address), format!("Public key: {}", public_key)],
            })
        }
        Commands::Sign { tx_bytes, scheme } => {
            let ctx = client_context(cli)?;
            let payload = decode_tx_bytes(tx_bytes)?;
            let blob = assemble_signature(&payload, ctx.user(), *scheme)?;
            let signature = STANDARD.encode(&blob);
            Ok(Output {
                value: json!({
                    "signature": signature,
                    "signingDigest": hex::encode(signing_digest(&payload)),
                    "digest": transaction_digest(&payload),
                }),
                lines: vec![signature],
            })
        }
        Commands::Digest { tx_bytes } => {
            let digest = transaction_digest(&decode_tx_bytes(tx_bytes)?);
            Ok(Output {
                value: json!({ "digest": digest }),
                lines: vec![digest.to_string()],
            })
        }
        Commands::Pay { recipient, amount } => {
            let ctx = client_context(cli)?;
            let rpc = ctx.rpc_client()?;
            execution_output(ops::pay_sui(&ctx, &rpc, *recipient, *amount)?)
        }
        Commands::PayAll { recipient } => {
            let ctx = client_context(cli)?;
            let rpc = ctx.rpc_client()?;
            execution_output(ops::pay_all_sui(&ctx, &rpc, *recipient)?)
        }
        Commands::PayMulti { recipients, amounts } => {
            let ctx = client_context(cli)?;
            let rpc = ctx.rpc_client()?;
            execution_output(ops::pay_multiple_sui(&ctx, &rpc, recipients, amounts)?)
        }
        Commands::Sponsored { recipient, amount } => {
            let ctx = client_context(cli)?;
            let rpc = ctx.rpc_client()?;
            execution_output(ops::sponsored_transaction(&ctx, &rpc, *recipient, *amount)?)
        }
        Commands::Offline { recipient, amount } => {
            let ctx = client_context(cli)?;
            let rpc = ctx.rpc_client()?;
            let report = ops::offline_transfer(&ctx, &rpc, *recipient, *amount)?;
            let mut output = execution_output(report.response.clone())?;
            output.lines.insert(0, format!("Local digest: {}", report.local_digest));
            output.lines.push(format!("Digest matches: {}", report.digest_matches));
            output.value = serde_json::to_value(&report)?;
            Ok(output)
        }
        Commands::Faucet { address } => {
            let network = network_config(cli)?;
            let faucet = network.faucet()?;
            let recipient = match address {
                Some(address) => *address,
                None => client_context(cli)?.user_address(),
            };
            let response = request_faucet_gas(faucet.as_str(), &recipient, network.timeout)?;
            Ok(Output {
                lines: vec![format!(
                    "Received {} SUI in {} coin(s) at {}",
                    format_sui(response.total_amount()),
                    response.transferred_gas_objects.len(),
                    recipient
                )],
                value: serde_json::to_value(&response)?,
            })
        }
    }
}

fn keygen() -> anyhow::Result<Output> {
    let key = Ed25519KeyPair::generate();
    let private_key = key.to_bech32()?;
    let address = key.address();
    Ok(Output {
        value: json!({
            "address": address,
            "publicKey": hex::encode(key.public_key()),
            "privateKey": private_key,
        }),
        lines: vec![format!("Address: {}", address), format!("Private key: {}", private_key)],
    })
}

fn network_config(cli: &Cli) -> anyhow::Result<NetworkConfig> {
    let config = NetworkConfig::new(cli.network, cli.rpc_url.as_deref(), cli.faucet_url.as_deref())
        .context("invalid network configuration")?;
    Ok(config.with_timeout(Duration::from_secs(cli.timeout)))
}

fn client_context(cli: &Cli) -> anyhow::Result<ClientContext> {
    let user_key = cli
        .user_key
        .clone()
        .map(SecretString::from)
        .ok_or_else(|| PtbError::config_error("No user key: pass --user-key or set SUI_USER_KEY"))?;
    let sponsor_key = cli.sponsor_key.clone().map(SecretString::from);
    let gas = GasConfig {
        budget: cli.gas_budget,
        price: cli.gas_price,
    };
    Ok(ClientContext::from_secrets(
        network_config(cli)?,
        &user_key,
        sponsor_key.as_ref(),
        gas,
    )?)
}

fn decode_tx_bytes(encoded: &str) -> anyhow::Result<Vec<u8>> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(PtbError::from)
        .context("transaction bytes must be base64")?;
    if bytes.is_empty() {
        return Err(PtbError::invalid_input("Transaction bytes are empty").into());
    }
    Ok(bytes)
}

fn execution_output(response: ExecutionResponse) -> anyhow::Result<Output> {
    let mut lines = vec![format!("Digest: {}", response.digest)];
    if let Some(status) = response.status() {
        match &status.error {
            Some(error) => lines.push(format!("Status: {} ({})", status.status, error)),
            None => lines.push(format!("Status: {}", status.status)),
        }
    }
    for change in response.balance_changes.iter().flatten() {
        let owner = change
            .owner
            .get("AddressOwner")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| change.owner.to_string());
        lines.push(format!("Balance change: {} {} {}", owner, change.amount, change.coin_type));
    }
    Ok(Output {
        value: serde_json::to_value(&response)?,
        lines,
    })
}

fn format_sui(mist: u64) -> String {
    format!("{}.{:09}", mist / MIST_PER_SUI, mist % MIST_PER_SUI)
}
