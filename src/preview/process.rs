//! Dry-run of the storefront decision path for one wallet: resolve the
//! requested group, evaluate eligibility, aggregate prices and print what
//! the mint button would show.

use std::fs::File;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::Utc;
use console::style;
use solana_sdk::{native_token::lamports_to_sol, pubkey::Pubkey};

use crate::common::*;
use crate::config::parser::get_config_data;
use crate::guards::{aggregate, allowlist, evaluate, NO_LIMIT};
use crate::mint::{MintButton, MintCount};
use crate::setup::{fondant_setup, setup_rpc_client};
use crate::show::print_with_style;
use crate::utils::spinner_with_style;
use crate::wallet::WalletContext;

pub struct PreviewArgs {
    pub config: String,
    pub label: Option<String>,
    pub wallet: Option<String>,
    pub quantity: u32,
    pub context: Option<String>,
    pub allowlist: Option<String>,
    pub keypair: Option<String>,
    pub rpc_url: Option<String>,
    pub fetch_balance: bool,
}

pub fn process_preview(args: PreviewArgs) -> Result<()> {
    println!(
        "{} {}Loading guard configuration",
        style("[1/2]").bold().dim(),
        LOOKING_GLASS_EMOJI
    );

    let config_data = get_config_data(&args.config)?;
    let guard_config = config_data.guards.clone().unwrap_or_default();
    let guard_config = match &config_data.allow_lists {
        Some(lists) => guard_config.with_allow_list_roots(lists)?,
        None => guard_config,
    };
    let guard_data = guard_config.to_guard_format()?;
    let effective = guard_data.resolve(args.label.as_deref());

    if let Some(label) = &args.label {
        if label != DEFAULT_GROUP_LABEL && !guard_data.labels().contains(&label.as_str()) {
            println!(
                "{}",
                style(format!(
                    "Group '{label}' not found; falling back to the default guard set."
                ))
                .yellow()
            );
        }
    }

    let mut ctx = match &args.context {
        Some(path) => {
            let file = File::open(path)
                .map_err(|err| anyhow!("Failed to open context file {path}: {err}"))?;
            serde_json::from_reader::<_, WalletContext>(file)
                .map_err(|err| anyhow!("Failed to parse context file {path}: {err}"))?
        }
        None => WalletContext::default(),
    };

    if let Some(wallet) = &args.wallet {
        ctx.payer = Pubkey::from_str(wallet)
            .map_err(|_| anyhow!("Failed to parse wallet address: {wallet}"))?;
    }
    if ctx.payer == Pubkey::default() {
        return Err(anyhow!(
            "No wallet to preview for; pass --wallet or a context file with a payer"
        ));
    }

    // membership proof for the wallet, when an allow list applies
    if let (Some(path), Some(_)) = (&args.allowlist, &effective.allow_list) {
        let file = File::open(path)
            .map_err(|err| anyhow!("Failed to open allow list file {path}: {err}"))?;
        let addresses: Vec<String> = serde_json::from_reader(file)
            .map_err(|err| anyhow!("Failed to parse allow list file {path}: {err}"))?;
        let mut leaves = Vec::with_capacity(addresses.len());
        for address in &addresses {
            leaves.push(
                Pubkey::from_str(address)
                    .map_err(|_| anyhow!("Invalid address in allow list: {address}"))?
                    .to_bytes(),
            );
        }
        ctx.allow_list_proof = allowlist::merkle_proof(&leaves, &ctx.payer.to_bytes());
    }

    println!(
        "{} {}Evaluating wallet {}",
        style("[2/2]").bold().dim(),
        WALLET_EMOJI,
        ctx.payer
    );

    if args.fetch_balance {
        let setup_config = fondant_setup(args.keypair.clone(), args.rpc_url.clone())?;
        let rpc_client = setup_rpc_client(&setup_config);
        let pb = spinner_with_style();
        pb.set_message("Fetching balance...");
        ctx.fetch_balance(&rpc_client)?;
        pb.finish_and_clear();
    }

    let now = Utc::now().timestamp();
    let eligibility = evaluate(&effective, &ctx, now);

    let mut count = MintCount::new(eligibility.can_pay_for);
    count.set(args.quantity);
    let prices = aggregate(&effective, count.value());

    let items_remaining = config_data
        .number
        .saturating_sub(ctx.items_redeemed.unwrap_or(0));
    let button = MintButton {
        machine_loaded: true,
        loading: false,
        minting: false,
        sold_out: items_remaining == 0,
        active: items_remaining > 0 && eligibility.is_started && !eligibility.is_ended,
        ended: eligibility.is_ended,
    };

    println!(
        "\n{}{} {}",
        GUARD_EMOJI,
        style("Group:").dim(),
        args.label.as_deref().unwrap_or(DEFAULT_GROUP_LABEL)
    );

    print_with_style("", "started", eligibility.is_started);
    print_with_style("", "ended", eligibility.is_ended);
    print_with_style("", "whitelisted", eligibility.is_wallet_whitelisted);
    print_with_style("", "gatekeeper", eligibility.has_gatekeeper);
    if eligibility.can_pay_for == NO_LIMIT {
        print_with_style("", "can pay for", "unlimited");
    } else {
        print_with_style("", "can pay for", eligibility.can_pay_for);
    }
    print_with_style("", "mintable", eligibility.is_mintable());

    if !eligibility.messages.is_empty() {
        println!("\n{}", style("Blocking reasons:").bold());
        for message in &eligibility.messages {
            println!("  - {message}");
        }
    }

    println!(
        "\n{}{} (quantity {})",
        CANDY_EMOJI,
        style("Prices").bold(),
        count.value()
    );
    for line in &prices.payment {
        print_with_style("", "pay", format!("{} {}", line.ui_amount(), line.label));
    }
    for line in &prices.burn {
        print_with_style("", "burn", format!("{} {}", line.ui_amount(), line.label));
    }
    for line in &prices.gate {
        print_with_style("", "hold", format!("{} {}", line.ui_amount(), line.label));
    }
    print_with_style(
        "",
        "total estimated cost",
        format!(
            "{} SOL (network fees included)",
            lamports_to_sol(prices.total_sol_cost(count.value()))
        ),
    );

    println!(
        "\n{}{} {}",
        COMPLETE_EMOJI,
        style("Mint button:").dim(),
        button.label(&eligibility, &count)
    );

    Ok(())
}
