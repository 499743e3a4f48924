//! Wallet Identity and Message Signing
//!
//! The wallet itself (connector UI, key custody) lives outside this crate.
//! We only need an address and a way to ask for a signature.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A 20-byte EVM account or contract address.
///
/// Always held in lowercase `0x`-prefixed form so that the same account maps
/// to the same storage key regardless of checksum casing.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(String);

impl Address {
    /// Parse a `0x`-prefixed, 40 hex digit address.
    pub fn parse(s: &str) -> Result<Self, WalletError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| WalletError::InvalidAddress(s.to_string()))?;

        let bytes = hex::decode(digits).map_err(|_| WalletError::InvalidAddress(s.to_string()))?;
        if bytes.len() != 20 {
            return Err(WalletError::InvalidAddress(s.to_string()));
        }

        Ok(Self(format!("0x{}", hex::encode(bytes))))
    }

    /// Lowercase hex form with `0x` prefix.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form for logs, e.g. `0x24f5…ec05`.
    pub fn short(&self) -> String {
        format!("{}…{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Wallet errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WalletError {
    /// Not a well-formed address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The user declined the signature request, or the wallet failed.
    #[error("signature rejected: {0}")]
    SignatureRejected(String),

    /// No wallet connected.
    #[error("wallet not connected")]
    NotConnected,
}

/// Signs plaintext messages with the connected account.
#[async_trait]
pub trait MessageSigner: Send + Sync {
    /// Request a signature over `message`. The user may refuse.
    async fn sign_message(&self, message: &str) -> Result<String, WalletError>;
}

/// The currently connected identity, if any.
#[derive(Clone, Debug, Default)]
pub struct WalletConnection {
    address: Option<Address>,
}

impl WalletConnection {
    /// Start disconnected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect an account. Returns the previously connected one.
    pub fn connect(&mut self, address: Address) -> Option<Address> {
        self.address.replace(address)
    }

    /// Disconnect. Returns the account that was connected.
    pub fn disconnect(&mut self) -> Option<Address> {
        self.address.take()
    }

    /// Connected account.
    pub fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    /// Is an account connected?
    pub fn is_connected(&self) -> bool {
        self.address.is_some()
    }
}
