use clap::{Parser, Subcommand};

#[derive(Parser)]
#[clap(author, version, about)]
pub struct Cli {
    /// Log level: trace, debug, info, warn, error, off
    #[clap(short, long, global = true)]
    pub log_level: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a provisioning config file
    Validate {
        /// Path to the config file, defaults to "config.json"
        #[clap(short, long, default_value = "config.json")]
        config: String,

        /// Path to the keypair file, uses Sol config or defaults to "~/.config/solana/id.json"
        #[clap(short, long)]
        keypair: Option<String>,

        /// RPC Url
        #[clap(short, long)]
        rpc_url: Option<String>,

        /// Also verify token mints against the cluster
        #[clap(long)]
        check_on_chain: bool,
    },

    /// Print the effective guard set for every group in a config
    Show {
        /// Path to the config file, defaults to "config.json"
        #[clap(short, long, default_value = "config.json")]
        config: String,
    },

    /// Preview eligibility, prices and the mint button for a wallet
    Preview {
        /// Path to the config file, defaults to "config.json"
        #[clap(short, long, default_value = "config.json")]
        config: String,

        /// Guard group label, defaults to the default group
        #[clap(long)]
        label: Option<String>,

        /// Wallet address to evaluate
        #[clap(short, long)]
        wallet: Option<String>,

        /// Amount of NFTs to price
        #[clap(short, long, default_value = "1")]
        quantity: u32,

        /// Path to a wallet context JSON file (balances, holdings, counters)
        #[clap(long)]
        context: Option<String>,

        /// Path to an allow list JSON file (array of addresses)
        #[clap(long)]
        allowlist: Option<String>,

        /// Path to the keypair file, uses Sol config or defaults to "~/.config/solana/id.json"
        #[clap(short, long)]
        keypair: Option<String>,

        /// RPC Url
        #[clap(short, long)]
        rpc_url: Option<String>,

        /// Fetch the wallet's live SOL balance before evaluating
        #[clap(long)]
        fetch_balance: bool,
    },
}
