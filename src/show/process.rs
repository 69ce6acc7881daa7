use anyhow::Result;
use chrono::DateTime;
use console::style;
use solana_sdk::native_token::LAMPORTS_PER_SOL;

use crate::common::*;
use crate::config::parser::get_config_data;
use crate::guards::GuardSet;
use crate::show::print_with_style;

pub struct ShowArgs {
    pub config: String,
}

/// Print the default guard set and the effective (merged) rule set of every
/// group declared in the config.
pub fn process_show(args: ShowArgs) -> Result<()> {
    println!(
        "{} {}Loading guard configuration",
        style("[1/1]").bold().dim(),
        LOOKING_GLASS_EMOJI
    );

    let config_data = get_config_data(&args.config)?;
    let guard_config = config_data.guards.clone().unwrap_or_default();
    let guard_config = match &config_data.allow_lists {
        Some(lists) => guard_config.with_allow_list_roots(lists)?,
        None => guard_config,
    };
    let guard_data = guard_config.to_guard_format()?;

    println!("\n{}{}", GUARD_EMOJI, style("Guard configuration").bold());

    print_with_style("", "default", "");
    print_guard_set(&guard_data.default, "    ");

    if guard_data.groups.is_empty() {
        print_with_style("", "groups", "none");
    } else {
        print_with_style("", "groups", "");
        for group in &guard_data.groups {
            print_with_style("    ", "label", &group.label);
            let effective = guard_data.resolve(Some(&group.label));
            print_guard_set(&effective, "        ");
        }
    }

    Ok(())
}

fn print_guard_set(guard_set: &GuardSet, padding: &str) {
    if guard_set.is_empty() {
        print_with_style(padding, "guards", "none");
        return;
    }

    if let Some(bot_tax) = &guard_set.bot_tax {
        print_with_style(padding, "bot tax", format_sol(bot_tax.lamports));
    }
    if let Some(start_date) = &guard_set.start_date {
        print_with_style(padding, "start date", format_date(start_date.date));
    }
    if let Some(end_date) = &guard_set.end_date {
        print_with_style(padding, "end date", format_date(end_date.date));
    }
    if let Some(sol_payment) = &guard_set.sol_payment {
        print_with_style(padding, "sol payment", format_sol(sol_payment.lamports));
    }
    if let Some(token_payment) = &guard_set.token_payment {
        print_with_style(
            padding,
            "token payment",
            format!("{} (mint {})", token_payment.amount, token_payment.mint),
        );
    }
    if let Some(token_burn) = &guard_set.token_burn {
        print_with_style(
            padding,
            "token burn",
            format!("{} (mint {})", token_burn.amount, token_burn.mint),
        );
    }
    if let Some(token_gate) = &guard_set.token_gate {
        print_with_style(
            padding,
            "token gate",
            format!("{} (mint {})", token_gate.amount, token_gate.mint),
        );
    }
    if let Some(nft_payment) = &guard_set.nft_payment {
        print_with_style(padding, "nft payment", nft_payment.required_collection);
    }
    if let Some(nft_burn) = &guard_set.nft_burn {
        print_with_style(padding, "nft burn", nft_burn.required_collection);
    }
    if let Some(nft_gate) = &guard_set.nft_gate {
        print_with_style(padding, "nft gate", nft_gate.required_collection);
    }
    if let Some(allow_list) = &guard_set.allow_list {
        print_with_style(padding, "allow list", hex::encode(allow_list.merkle_root));
    }
    if let Some(address_gate) = &guard_set.address_gate {
        print_with_style(padding, "address gate", address_gate.address);
    }
    if let Some(mint_limit) = &guard_set.mint_limit {
        print_with_style(
            padding,
            "mint limit",
            format!("{} (id {})", mint_limit.limit, mint_limit.id),
        );
    }
    if let Some(redeemed_amount) = &guard_set.redeemed_amount {
        print_with_style(padding, "redeemed amount", redeemed_amount.maximum);
    }
    if let Some(gatekeeper) = &guard_set.gatekeeper {
        print_with_style(
            padding,
            "gatekeeper",
            format!(
                "{} (expire on use: {})",
                gatekeeper.gatekeeper_network, gatekeeper.expire_on_use
            ),
        );
    }
}

fn format_sol(lamports: u64) -> String {
    format!(
        "{} (◎ {})",
        lamports,
        lamports as f64 / LAMPORTS_PER_SOL as f64
    )
}

fn format_date(timestamp: i64) -> String {
    match DateTime::from_timestamp(timestamp, 0) {
        Some(date) => date.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => timestamp.to_string(),
    }
}
