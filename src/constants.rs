pub const CANDY_MACHINE_PROGRAM_ID: &str = "CndyV3LdqHUfDLmE5naZjVN8rBZz4tqhdefbAnjHG3JR";
pub const CANDY_GUARD_PROGRAM_ID: &str = "Guard1JwRhJkVH6XZhzoYxeBVQe872VH6QggF4BWmS9g";
pub const CIVIC: &str = "gatem74V238djXdzWnJf94Wo1DcnuGkfijbf3AuBhfs";

/// Upper bound shown on the quantity stepper, regardless of the wallet's
/// remaining allowance.
pub const MAX_MINT_DISPLAY: u32 = 10;

/// Flat per-mint network fee estimate (0.012 SOL) included in displayed
/// totals on top of any payment guard.
pub const MINT_FEE_LAMPORTS: u64 = 12_000_000;

pub const DEFAULT_GROUP_LABEL: &str = "default";

pub const CANDY_EMOJI: &str = "\u{1f36c} ";
pub const GUARD_EMOJI: &str = "\u{1f6e1} ";
pub const LOOKING_GLASS_EMOJI: &str = "\u{1f50d} ";
pub const COMPLETE_EMOJI: &str = "\u{2705} ";
pub const ERROR_EMOJI: &str = "\u{1f6d1} ";
pub const CONFETTI_EMOJI: &str = "\u{1f389} ";
pub const WALLET_EMOJI: &str = "\u{1f45b} ";
