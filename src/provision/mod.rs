pub mod process;

pub use process::{process_provision, DeployBackend, MachineAddresses, ProvisionArgs};
