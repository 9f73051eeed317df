use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub mod div;
pub mod integer;
pub mod limbs;
pub mod mul;
pub mod pack;
pub mod radix;

pub use integer::Integer;
pub use pack::{ByteOrder, PackLayout, WordOrder};
pub use radix::{ParseMode, PowerCache};

/// One base-2^32 digit of a magnitude, least significant limb first.
pub type Limb = u32;
pub type DoubleLimb = u64;

pub const LIMB_BITS: usize = 32;
pub const LIMB_BYTES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Negative,
    Zero,
    Positive,
}

impl Sign {
    pub fn flip(self) -> Sign {
        match self {
            Sign::Negative => Sign::Positive,
            Sign::Zero => Sign::Zero,
            Sign::Positive => Sign::Negative,
        }
    }

    pub fn is_negative(self) -> bool {
        matches!(self, Sign::Negative)
    }

    pub fn is_zero(self) -> bool {
        matches!(self, Sign::Zero)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LimbnumError {
    DivisionByZero,
    InvalidRadix(u32),
    MalformedNumeral,
    BufferOverflow,
    CapacityExceeded,
    Cancelled,
}

impl std::fmt::Display for LimbnumError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LimbnumError::DivisionByZero => write!(f, "divided by 0"),
            LimbnumError::InvalidRadix(radix) => write!(f, "invalid radix {radix}"),
            LimbnumError::MalformedNumeral => write!(f, "malformed numeral"),
            LimbnumError::BufferOverflow => write!(f, "inconsistent word layout"),
            LimbnumError::CapacityExceeded => write!(f, "intermediate size exceeds capacity"),
            LimbnumError::Cancelled => write!(f, "computation cancelled"),
        }
    }
}

impl std::error::Error for LimbnumError {}

/// Cooperative cancellation flag checked by long-running division loops.
/// Tokens form a chain; cancelling a parent cancels every child.
#[derive(Debug)]
pub struct CancelToken {
    local: AtomicBool,
    parent: Option<Arc<CancelToken>>,
}

impl CancelToken {
    pub fn root() -> Arc<Self> {
        Arc::new(Self {
            local: AtomicBool::new(false),
            parent: None,
        })
    }

    pub fn child(parent: Arc<CancelToken>) -> Arc<Self> {
        Arc::new(Self {
            local: AtomicBool::new(false),
            parent: Some(parent),
        })
    }

    pub fn cancel(&self) {
        self.local.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        if self.local.load(Ordering::SeqCst) {
            return true;
        }
        match &self.parent {
            Some(parent) => parent.is_cancelled(),
            None => false,
        }
    }
}
