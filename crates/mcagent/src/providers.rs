pub mod anthropic;
pub mod base;
pub mod configs;

#[cfg(test)]
pub mod mock;
