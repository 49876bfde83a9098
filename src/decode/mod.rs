//! Response decoder module
//!
//! Extracts the record array from a vendor JSON body, plus the path lookup
//! used by paginators to read next tokens, totals and is-last flags.

mod decoders;

pub use decoders::{extract_path, JsonDecoder};

#[cfg(test)]
mod tests;
