use anyhow::Result;
use console::style;
use solana_sdk::pubkey::Pubkey;

use crate::common::*;
use crate::config::parser::get_config_data;
use crate::setup::{fondant_setup, setup_rpc_client};
use crate::utils::{check_spl_token, spinner_with_style};

pub struct ValidateArgs {
    pub config: String,
    pub keypair: Option<String>,
    pub rpc_url: Option<String>,
    /// Verify token mints on chain in addition to the local checks.
    pub check_on_chain: bool,
}

/// Sanity-check a provisioning config before anything touches the chain:
/// creator shares, guard amounts and dates, allow-list roots. With
/// `check_on_chain`, token-payment mints are also verified against the
/// cluster.
pub fn process_validate(args: ValidateArgs) -> Result<()> {
    println!(
        "{} {}Validating configuration",
        style("[1/1]").bold().dim(),
        LOOKING_GLASS_EMOJI
    );

    let config_data = get_config_data(&args.config)?;
    config_data.validate()?;

    let guard_config = config_data.guards.clone().unwrap_or_default();
    let guard_config = match &config_data.allow_lists {
        Some(lists) => guard_config.with_allow_list_roots(lists)?,
        None => guard_config.with_allow_list_roots(&[])?,
    };
    // conversion parses every date, amount and root
    let guard_data = guard_config.to_guard_format()?;

    if config_data.number == 0 {
        return Err(anyhow!("Config must provide a supply of at least 1 item"));
    }

    if args.check_on_chain {
        let setup_config = fondant_setup(args.keypair.clone(), args.rpc_url.clone())?;
        let rpc_client = setup_rpc_client(&setup_config);

        let mut mints: Vec<Pubkey> = Vec::new();
        let mut sets = vec![&guard_data.default];
        sets.extend(guard_data.groups.iter().map(|g| &g.guards));
        for set in sets {
            if let Some(token_payment) = &set.token_payment {
                mints.push(token_payment.mint);
            }
            if let Some(token_burn) = &set.token_burn {
                mints.push(token_burn.mint);
            }
            if let Some(token_gate) = &set.token_gate {
                mints.push(token_gate.mint);
            }
        }
        mints.dedup();

        let pb = spinner_with_style();
        pb.set_message("Verifying token mints...");
        for mint in &mints {
            check_spl_token(&rpc_client, &mint.to_string())?;
        }
        pb.finish_and_clear();
    }

    println!(
        "\n{}{}",
        COMPLETE_EMOJI,
        style("Configuration is valid.").green().bold()
    );

    Ok(())
}
