use std::fmt;

use ethers::types::Address;
use ethers::utils::to_checksum;

use crate::error::{ AppError, Result };

const ADDRESS_HEX_LEN: usize = 40;

/// A syntactically valid EVM account address. Displays as EIP-55 checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WalletAddress(Address);

impl WalletAddress {
    pub fn as_address(&self) -> Address {
        self.0
    }

    pub fn to_checksum(&self) -> String {
        to_checksum(&self.0, None)
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

/// Validate an address in any letter case, with or without `0x`.
///
/// Mixed-case input is normalized rather than checksum-verified.
pub fn normalize(input: &str) -> Result<WalletAddress> {
    if input.is_empty() {
        return Err(AppError::InvalidAddress("wallet address is empty".to_string()));
    }

    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);

    if digits.len() != ADDRESS_HEX_LEN {
        return Err(
            AppError::InvalidAddress(
                format!("'{}' must have {} hex digits, found {}", input, ADDRESS_HEX_LEN, digits.len())
            )
        );
    }

    if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(AppError::InvalidAddress(format!("'{}' contains non-hex character '{}'", input, bad)));
    }

    let mut bytes = [0u8; 20];
    hex::decode_to_slice(digits, &mut bytes).map_err(|e|
        AppError::InvalidAddress(format!("'{}': {}", input, e))
    )?;

    Ok(WalletAddress(Address::from(bytes)))
}
