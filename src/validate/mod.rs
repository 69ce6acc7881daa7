pub mod process;

pub use process::{process_validate, ValidateArgs};
