//! Trace entry parsing

use std::str::FromStr;

use crate::error::TraceError;
use crate::memory::AccessType;

/// One memory reference from a trace file:
/// `<op> <hex_address>` with op `r` or `w` and a 32-bit address
/// of 1-8 hex digits (leading zeros optional)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceEntry {
    pub operation: AccessType,
    pub address: u32,
}

impl FromStr for TraceEntry {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let (op, address) = match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(op), Some(address), None) => (op, address),
            _ => return Err(TraceError::Format),
        };

        let operation = match op {
            "r" => AccessType::Read,
            "w" => AccessType::Write,
            _ => return Err(TraceError::InvalidOperation(op.to_string())),
        };

        if address.is_empty() || !address.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TraceError::InvalidAddress(address.to_string()));
        }
        // Leading zeros may push the digit count past 8, so parse
        // wide and bound afterwards
        let value = u64::from_str_radix(address, 16)
            .map_err(|_| TraceError::AddressOverflow(address.to_string()))?;
        if value > u64::from(u32::MAX) {
            return Err(TraceError::AddressOverflow(address.to_string()));
        }

        Ok(Self { operation, address: value as u32 })
    }
}
