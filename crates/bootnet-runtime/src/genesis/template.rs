//! Genesis document template and substitution.
//!
//! The template is plain text with two placeholders. Substitution replaces
//! the first occurrence of each; a missing placeholder is left alone and the
//! result is never validated.

use bootnet_crypto::Address;
use rand::Rng;

/// Replaced by the funded account's EIP-55 address.
pub const ACCOUNT_PLACEHOLDER: &str = "[ACCOUNT_ADDR_1]";

/// Replaced by the `0x`-prefixed hex nonce.
pub const NONCE_PLACEHOLDER: &str = "[NONCE]";

/// Devnet genesis with a single funded account.
pub const GENESIS_TEMPLATE: &str = r#"{
	"config": {
		"chainId": 0,
		"homesteadBlock": 0,
		"eip155Block": 0,
		"eip158Block": 0
	},
	"alloc": {
		"[ACCOUNT_ADDR_1]": {
			"balance": "222222222"
		}
	},
	"coinbase"   : "0x0000000000000000000000000000000000000000",
	"difficulty" : "0x400",
	"extraData"  : "",
	"gasLimit"   : "0x2fefd8",
	"nonce"      : "[NONCE]",
	"mixhash"    : "0x0000000000000000000000000000000000000000000000000000000000000000",
	"parentHash" : "0x0000000000000000000000000000000000000000000000000000000000000000",
	"timestamp"  : "0x00"
}"#;

/// Render [`GENESIS_TEMPLATE`].
pub fn render_genesis(address: &Address, nonce: u32) -> String {
    render_template(GENESIS_TEMPLATE, address, nonce)
}

/// Substitute the first account and nonce placeholders in `template`.
pub fn render_template(template: &str, address: &Address, nonce: u32) -> String {
    template
        .replacen(ACCOUNT_PLACEHOLDER, &address.to_checksum(), 1)
        .replacen(NONCE_PLACEHOLDER, &format_nonce(nonce), 1)
}

/// `0x` followed by lowercase hex, no padding.
pub fn format_nonce(nonce: u32) -> String {
    format!("0x{:x}", nonce)
}

/// Uniform over the whole `u32` range.
pub fn random_nonce<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.gen()
}
