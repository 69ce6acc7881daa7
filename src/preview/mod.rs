pub mod process;

pub use process::{process_preview, PreviewArgs};
