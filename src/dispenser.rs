use crate::config::Config;
use crate::constants::DISPENSER_CONTRACT;
use alloy_primitives::{utils::format_ether, Address, U256};
use anyhow::Result;
use std::fmt;
use std::str::FromStr;

/// Return shape of the dispenser contract's `status(dt_addr)` read-call:
/// `(bool active, address owner, bool isMinter, uint256 maxTokens,
/// uint256 maxBalance, uint256 balance, address allowedSwapper)`.
pub type DispenserStatusTuple = (bool, Address, bool, U256, U256, U256, Address);

/// Status of the dispenser contract for a given datatoken. Decoded fresh
/// from each read-call, never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispenserStatus {
    pub active: bool,
    pub owner_address: Address,
    pub is_minter: bool,
    pub max_tokens: U256,
    pub max_balance: U256,
    pub balance: U256,
    pub allowed_swapper: Address,
}

impl From<DispenserStatusTuple> for DispenserStatus {
    fn from(t: DispenserStatusTuple) -> Self {
        DispenserStatus {
            active: t.0,
            owner_address: t.1,
            is_minter: t.2,
            max_tokens: t.3,
            max_balance: t.4,
            balance: t.5,
            allowed_swapper: t.6,
        }
    }
}

impl fmt::Display for DispenserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DispenserStatus: ")?;
        writeln!(f, "  active = {}", self.active)?;
        writeln!(f, "  owner_address = {}", self.owner_address)?;
        writeln!(f, "  balance (of tokens) = {}", str_with_wei(self.balance))?;
        writeln!(
            f,
            "  is_minter (can mint more tokens?) = {}",
            self.is_minter
        )?;
        writeln!(
            f,
            "  max_tokens (to dispense) = {}",
            str_with_wei(self.max_tokens)
        )?;
        writeln!(
            f,
            "  max_balance (of requester) = {}",
            str_with_wei(self.max_balance)
        )?;
        // the zero address means the dispenser accepts any requester
        if self.allowed_swapper == Address::ZERO {
            writeln!(f, "  allowed_swapper = anyone can request")
        } else {
            writeln!(f, "  allowed_swapper = {}", self.allowed_swapper)
        }
    }
}

fn str_with_wei(amount: U256) -> String {
    format!("{} ({} wei)", format_ether(amount), amount)
}

/// Parameters for creating or configuring a dispenser. Defaults dispense
/// without limits, mint on demand, and accept any requester.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispenserArguments {
    pub max_tokens: U256,
    pub max_balance: U256,
    pub with_mint: bool,
    pub allowed_swapper: Address,
}

impl Default for DispenserArguments {
    fn default() -> Self {
        DispenserArguments {
            max_tokens: U256::MAX,
            max_balance: U256::MAX,
            with_mint: true,
            allowed_swapper: Address::ZERO,
        }
    }
}

impl DispenserArguments {
    pub fn with_max_tokens(mut self, max_tokens: U256) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_max_balance(mut self, max_balance: U256) -> Self {
        self.max_balance = max_balance;
        self
    }

    pub fn with_mint(mut self, with_mint: bool) -> Self {
        self.with_mint = with_mint;
        self
    }

    /// Parses a decimal-encoded token amount once, at ingestion.
    pub fn with_max_tokens_str(mut self, max_tokens: &str) -> Result<Self> {
        self.max_tokens = U256::from_str_radix(max_tokens, 10)?;
        Ok(self)
    }

    pub fn with_max_balance_str(mut self, max_balance: &str) -> Result<Self> {
        self.max_balance = U256::from_str_radix(max_balance, 10)?;
        Ok(self)
    }

    /// Fails on a malformed address; any hex letter case is accepted.
    pub fn with_allowed_swapper(mut self, allowed_swapper: &str) -> Result<Self> {
        self.allowed_swapper = Address::from_str(allowed_swapper)?;
        Ok(self)
    }

    /// Resolves the dispenser contract address from the config address book
    /// and returns the ordered argument tuple for the contract call.
    pub fn to_call_args(&self, config: &Config) -> Result<(Address, U256, U256, bool, Address)> {
        let dispenser_address = config.address_of_type(DISPENSER_CONTRACT)?;
        Ok((
            dispenser_address,
            self.max_tokens,
            self.max_balance,
            self.with_mint,
            self.allowed_swapper,
        ))
    }
}
