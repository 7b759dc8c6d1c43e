//! Addressing-mode algebra for the code emitter.
//!
//! An addressing mode is either a symbol plus a displacement, or a single
//! index register plus a displacement. Displacement-range validation belongs
//! to the instruction encoder; the operations here are pure and total.

use std::fmt;

/// A memory addressing mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressingMode {
    /// Absolute address of a symbol, plus a byte displacement.
    Based(String, i32),
    /// Address held in an index register, plus a byte displacement. The
    /// register itself travels as an instruction operand; rendering receives
    /// its name from the caller.
    Indexed(i32),
}

impl AddressingMode {
    /// Fold a delta into the displacement. Wrapping on overflow; the encoder
    /// checks displacement ranges when it emits the instruction.
    pub fn offset(&self, delta: i32) -> AddressingMode {
        match self {
            AddressingMode::Based(sym, disp) => {
                AddressingMode::Based(sym.clone(), disp.wrapping_add(delta))
            }
            AddressingMode::Indexed(disp) => AddressingMode::Indexed(disp.wrapping_add(delta)),
        }
    }

    /// How many register operands the mode consumes.
    pub fn num_args(&self) -> usize {
        match self {
            AddressingMode::Based(..) => 0,
            AddressingMode::Indexed(_) => 1,
        }
    }

    /// Render the mode for assembly listings. `reg` names the index register
    /// for [`AddressingMode::Indexed`]; it is ignored for symbol addressing.
    pub fn display<'a>(&'a self, reg: &'a str) -> AddressingModeDisplay<'a> {
        AddressingModeDisplay { mode: self, reg }
    }
}

/// Borrowed display adapter returned by [`AddressingMode::display`].
pub struct AddressingModeDisplay<'a> {
    mode: &'a AddressingMode,
    reg: &'a str,
}

impl fmt::Display for AddressingModeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            AddressingMode::Based(sym, 0) => write!(f, "\"{}\"", sym),
            AddressingMode::Based(sym, disp) => write!(f, "\"{}\" + {}", sym, disp),
            AddressingMode::Indexed(0) => write!(f, "{}", self.reg),
            AddressingMode::Indexed(disp) => write!(f, "{} + {}", self.reg, disp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_folds_into_displacement() {
        let base = AddressingMode::Based("camlMain__x".to_string(), 8);
        assert_eq!(
            base.offset(4),
            AddressingMode::Based("camlMain__x".to_string(), 12)
        );
        assert_eq!(AddressingMode::Indexed(0).offset(-16), AddressingMode::Indexed(-16));
    }

    #[test]
    fn test_offset_is_pure() {
        let base = AddressingMode::Indexed(8);
        let _ = base.offset(100);
        assert_eq!(base, AddressingMode::Indexed(8));
    }

    #[test]
    fn test_operand_counts() {
        assert_eq!(AddressingMode::Based("s".to_string(), 0).num_args(), 0);
        assert_eq!(AddressingMode::Indexed(0).num_args(), 1);
    }

    #[test]
    fn test_rendering() {
        let sym = AddressingMode::Based("table".to_string(), 0);
        assert_eq!(sym.display("rax").to_string(), "\"table\"");
        assert_eq!(sym.offset(24).display("rax").to_string(), "\"table\" + 24");
        assert_eq!(AddressingMode::Indexed(0).display("rbx").to_string(), "rbx");
        assert_eq!(AddressingMode::Indexed(8).display("rbx").to_string(), "rbx + 8");
    }
}
