pub mod process;

use std::fmt::Display;

use console::style;

pub use process::{process_show, ShowArgs};

pub fn print_with_style<T: Display>(indent: &str, key: &str, value: T) {
    println!(" {}{} {}", indent, style(format!("{key}:")).dim(), value);
}
