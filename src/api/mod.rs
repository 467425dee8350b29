pub mod client;
mod marking;
pub mod types;

pub use client::*;
pub use types::*;

#[cfg(test)]
mod tests;
