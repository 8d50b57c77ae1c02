pub mod density;
pub mod point_mass;

use crate::error::{GravError, GravResult};
use std::fmt;
use std::ops::BitOr;

/// Fluid phases carried by fluid-in-place data.
///
/// The bit values follow the usual simulator phase enumeration
/// (oil = 1, gas = 2, water = 4), so masks coming from external tooling
/// can be passed through unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    Oil,
    Gas,
    Water,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Oil, Phase::Gas, Phase::Water];

    pub const fn bit(self) -> u8 {
        match self {
            Phase::Oil => 1,
            Phase::Gas => 2,
            Phase::Water => 4,
        }
    }

    /// Keyword suffix used by fluid-in-place arrays (`FIPOIL`, `RFIPWAT`, ...).
    pub const fn keyword_suffix(self) -> &'static str {
        match self {
            Phase::Oil => "OIL",
            Phase::Gas => "GAS",
            Phase::Water => "WAT",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Oil => "oil",
            Phase::Gas => "gas",
            Phase::Water => "water",
        };
        f.write_str(name)
    }
}

/// Non-empty subset of {oil, gas, water}.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PhaseMask(u8);

impl PhaseMask {
    const VALID_BITS: u8 = 0b111;

    pub const ALL: PhaseMask = PhaseMask(Self::VALID_BITS);

    /// Build a mask from raw phase bits. Zero, or any bit outside the three
    /// phase bits, is rejected.
    pub fn from_bits(bits: u8) -> GravResult<Self> {
        if bits == 0 || bits & !Self::VALID_BITS != 0 {
            return Err(GravError::InvalidPhaseMask(bits));
        }
        Ok(Self(bits))
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, phase: Phase) -> bool {
        self.0 & phase.bit() != 0
    }

    pub fn phases(self) -> impl Iterator<Item = Phase> {
        Phase::ALL.into_iter().filter(move |p| self.contains(*p))
    }
}

impl Default for PhaseMask {
    fn default() -> Self {
        PhaseMask::ALL
    }
}

impl From<Phase> for PhaseMask {
    fn from(phase: Phase) -> Self {
        PhaseMask(phase.bit())
    }
}

impl BitOr for Phase {
    type Output = PhaseMask;

    fn bitor(self, rhs: Phase) -> PhaseMask {
        PhaseMask(self.bit() | rhs.bit())
    }
}

impl BitOr<Phase> for PhaseMask {
    type Output = PhaseMask;

    fn bitor(self, rhs: Phase) -> PhaseMask {
        PhaseMask(self.0 | rhs.bit())
    }
}

impl fmt::Display for PhaseMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.phases().map(|p| p.to_string()).collect();
        write!(f, "{}", names.join("+"))
    }
}
