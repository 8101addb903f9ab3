//! Cross-crate scenarios for the optimization pipeline.

#[cfg(test)]
mod scenarios;
