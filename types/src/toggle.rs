use std::fmt;

use crate::{Bits, SwitchSet, SystemError};

/// A row of lamps and a pool of switches, each switch XOR-flipping a fixed
/// subset of lamps.
///
/// Switches are single-use along one solution path but not globally: every
/// search branch decides independently which switches it has consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleSystem {
    lamp_count: usize,
    target: Bits,
    switches: Vec<Bits>,
    state: Bits,
}

impl ToggleSystem {
    pub fn new(lamp_count: usize, target: Bits, switches: Vec<Bits>) -> Result<Self, SystemError> {
        if lamp_count > Bits::WIDTH {
            return Err(SystemError::TooManyLamps { lamps: lamp_count });
        }
        if switches.len() > SwitchSet::CAPACITY {
            return Err(SystemError::TooManySwitches {
                switches: switches.len(),
            });
        }
        if !target.fits(lamp_count) {
            return Err(SystemError::PatternOutOfRange {
                mask: target,
                lamp_count,
            });
        }
        if let Some((switch, &mask)) = switches
            .iter()
            .enumerate()
            .find(|(_, mask)| !mask.fits(lamp_count))
        {
            return Err(SystemError::SwitchOutOfRange {
                switch,
                mask,
                lamp_count,
            });
        }
        Ok(Self {
            lamp_count,
            target,
            switches,
            state: Bits::ZERO,
        })
    }

    /// Start from `state` instead of all lamps off.
    pub fn with_state(mut self, state: Bits) -> Result<Self, SystemError> {
        if !state.fits(self.lamp_count) {
            return Err(SystemError::PatternOutOfRange {
                mask: state,
                lamp_count: self.lamp_count,
            });
        }
        self.state = state;
        Ok(self)
    }

    #[must_use]
    pub fn lamp_count(&self) -> usize {
        self.lamp_count
    }

    #[must_use]
    pub fn target(&self) -> Bits {
        self.target
    }

    #[must_use]
    pub fn state(&self) -> Bits {
        self.state
    }

    #[must_use]
    pub fn switches(&self) -> &[Bits] {
        &self.switches
    }

    /// Pattern reached by flipping `switch` from `state`.
    ///
    /// Panics if `switch` does not exist.
    #[must_use]
    pub fn apply(&self, state: Bits, switch: usize) -> Bits {
        state ^ self.switches[switch]
    }

    /// Pattern reached by pressing every switch in `used` once from the
    /// starting state.
    #[must_use]
    pub fn apply_all(&self, used: SwitchSet) -> Bits {
        used.iter().fold(self.state, |state, i| self.apply(state, i))
    }

    /// Whether some subset of the switches flips the starting state into the
    /// target.
    ///
    /// Gaussian elimination over GF(2): the lamps that must change form a
    /// vector that has to lie in the span of the switch masks.
    #[must_use]
    pub fn can_reach_target(&self) -> bool {
        let mut basis = [0u64; Bits::WIDTH];
        for mask in &self.switches {
            let mut v = mask.value();
            while v != 0 {
                let top = (u64::BITS - 1 - v.leading_zeros()) as usize;
                if basis[top] == 0 {
                    basis[top] = v;
                    break;
                }
                v ^= basis[top];
            }
        }

        let mut need = (self.state ^ self.target).value();
        while need != 0 {
            let top = (u64::BITS - 1 - need.leading_zeros()) as usize;
            if basis[top] == 0 {
                return false;
            }
            need ^= basis[top];
        }
        true
    }
}

impl fmt::Display for ToggleSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lamps: {}, switches: [", self.target.render(self.lamp_count))?;
        for (i, switch) in self.switches.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{switch}")?;
        }
        f.write_str("]")
    }
}
