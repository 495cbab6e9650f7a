pub mod console;
pub mod prompt;

pub use prompt::{MenuItem, Prompter};
