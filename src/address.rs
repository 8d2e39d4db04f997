//! Node addressing
//!
//! Every node of a sentence tree is keyed by an [`Address`], an ordered
//! `(major, minor)` pair:
//!
//! - regular words: `7` becomes `(7, 0)`
//! - sub-indexed nodes: `7.1`, or `7,1` with the default decimal separator, become `(7, 1)`
//! - multiword tokens: `3-4` becomes `(3, -1)`, i.e. the minor is `start - end`
//! - the artificial root is `(0, 0)`
//!
//! The derived ordering compares `major` first, so a multiword token sorts
//! immediately before the first word it covers and the natural order of
//! addresses reproduces the surface order of the sentence.

use std::fmt;

use thiserror::Error;

/// Characters that already carry structure inside an address token.
pub const RESERVED_SEPARATORS: [char; 2] = ['.', '-'];

/// Default decimal separator for sub-indexed addresses.
pub const DEFAULT_DECIMAL_SEPARATOR: char = ',';

/// Error for a decimal separator that collides with address syntax
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("the decimal separator must differ from '.' and '-', got {0:?}")]
    InvalidDecimalSeparator(char),
}

/// Error for an address token that cannot be canonicalized
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("empty address")]
    Empty,

    #[error("invalid number {part:?} in address {address:?}")]
    InvalidNumber { address: String, part: String },

    #[error("range {0:?} does not end after it starts")]
    InvalidRange(String),
}

/// Position of a node inside a sentence tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address {
    pub major: i64,
    pub minor: i64,
}

impl Address {
    /// The artificial root every sentence tree descends from.
    pub const ROOT: Address = Address { major: 0, minor: 0 };

    pub const fn new(major: i64, minor: i64) -> Self {
        Self { major, minor }
    }

    /// Address of a regular word.
    pub const fn word(position: i64) -> Self {
        Self::new(position, 0)
    }

    pub fn is_root(&self) -> bool {
        *self == Self::ROOT
    }

    /// Regular syntactic word (neither root, nor range, nor sub-index).
    pub fn is_word(&self) -> bool {
        self.major > 0 && self.minor == 0
    }

    pub fn is_multiword(&self) -> bool {
        self.minor < 0
    }

    pub fn is_subindexed(&self) -> bool {
        self.minor > 0
    }

    /// Last word covered by a multiword token.
    pub fn range_end(&self) -> Option<i64> {
        self.is_multiword().then(|| self.major - self.minor)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.minor {
            0 => write!(f, "{}", self.major),
            m if m < 0 => write!(f, "{}-{}", self.major, self.major - m),
            m => write!(f, "{}.{}", self.major, m),
        }
    }
}

/// Canonicalizes raw address tokens with a fixed decimal separator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressParser {
    decimal_separator: char,
}

impl Default for AddressParser {
    fn default() -> Self {
        Self {
            decimal_separator: DEFAULT_DECIMAL_SEPARATOR,
        }
    }
}

impl AddressParser {
    /// Create a parser, rejecting separators reserved by the address syntax.
    pub fn new(decimal_separator: char) -> Result<Self, ConfigError> {
        if RESERVED_SEPARATORS.contains(&decimal_separator) {
            return Err(ConfigError::InvalidDecimalSeparator(decimal_separator));
        }
        Ok(Self { decimal_separator })
    }

    pub fn decimal_separator(&self) -> char {
        self.decimal_separator
    }

    /// Parse a raw token such as `7`, `7.1`, `7,1` or `7-8`.
    pub fn parse(&self, raw: &str) -> Result<Address, AddressError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AddressError::Empty);
        }

        if let Some((start, end)) = raw.split_once('-') {
            let (start, _) = self.parse_decimal(raw, start)?;
            let (end, _) = self.parse_decimal(raw, end)?;
            if end <= start {
                return Err(AddressError::InvalidRange(raw.to_string()));
            }
            return Ok(Address::new(start, start - end));
        }

        let (major, minor) = self.parse_decimal(raw, raw)?;
        Ok(Address::new(major, minor))
    }

    // `7`, `7.1` or `7<sep>1` as (integer part, sub-index)
    fn parse_decimal(&self, address: &str, part: &str) -> Result<(i64, i64), AddressError> {
        let split = part
            .split_once('.')
            .or_else(|| part.split_once(self.decimal_separator));
        let (int, sub) = match split {
            Some((int, sub)) => (int, Some(sub)),
            None => (part, None),
        };
        let int = parse_number(address, int)?;
        let sub = match sub {
            Some(sub) => parse_number(address, sub)?,
            None => 0,
        };
        Ok((int, sub))
    }
}

fn parse_number(address: &str, part: &str) -> Result<i64, AddressError> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AddressError::InvalidNumber {
            address: address.to_string(),
            part: part.to_string(),
        });
    }
    part.parse().map_err(|_| AddressError::InvalidNumber {
        address: address.to_string(),
        part: part.to_string(),
    })
}
