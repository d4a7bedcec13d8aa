//! # Genesis Module
//!
//! The genesis document printed at the end of a bootstrap run. It is
//! rendered from a fixed template and only printed, never written to disk.

pub mod template;

pub use template::{
    format_nonce, random_nonce, render_genesis, render_template, ACCOUNT_PLACEHOLDER,
    GENESIS_TEMPLATE, NONCE_PLACEHOLDER,
};
