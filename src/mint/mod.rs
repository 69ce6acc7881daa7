pub mod orchestrator;
pub mod quantity;

pub use orchestrator::{
    GuardMintArgs, MintBackend, MintOrchestrator, MintPhase, MintReceipt, MintRequest, Settlement,
};
pub use quantity::{MintButton, MintCount};
