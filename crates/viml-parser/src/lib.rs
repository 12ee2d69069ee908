//! Ex-command and expression parsers for VimL.
//!
//! The entry points mirror the original front-end:
//!
//! - [`parse_expr`] parses one top-level expression from a string;
//! - [`parse_one_cmd`] parses one Ex command, possibly pulling
//!   continuation lines from the [`LineSource`];
//! - [`parse_cmd_sequence`] loops `parse_one_cmd` plus the block
//!   reconciler until end of input and returns the reconciled command
//!   list.
//!
//! Recoverable syntax errors never abort a sequence: they are
//! materialised as syntax-error nodes carrying the offending line, the
//! diagnostic and the error column, and parsing resumes on the next
//! line.

mod blocks;
mod ex;
mod expr;
mod lines;
mod subparsers;

pub use blocks::parse_cmd_sequence;
pub use ex::{ParseStatus, ParsedCmd, parse_one_cmd};
pub use expr::{ExprParser, parse_expr};
pub use lines::{FileLineSource, LineSource, StringLineSource};

use bitflags::bitflags;
use viml_keycodes::{CpoFlags, KeyTranslateEnv};

// Hard caps inherited from the original parser.
pub(crate) const MAX_FUNC_ARGS: usize = 20;
pub(crate) const MAX_NEST_BLOCKS: usize = 100;

bitflags! {
    /// Behaviour flags of the command parser.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PocFlags: u16 {
        /// Ex mode: an empty line works like `:+1`.
        const EXMODE      = 0x0001;
        /// Suppress the `*` visual-selection range expansion.
        const CPO_STAR    = 0x0002;
        /// Backslash is a literal character in mapping LHS/RHS.
        const CPO_BSLASH  = 0x0004;
        /// Disable `<…>` key-name recognition.
        const CPO_SPECI   = 0x0008;
        /// Disable raw terminal-code recognition.
        const CPO_KEYCODE = 0x0010;
        /// `\|` stays a literal backslash-bar pair.
        const CPO_BAR     = 0x0020;
        /// Swap mapping RHS for right-to-left input.
        const ALTKEYMAP   = 0x0040;
        /// Right-to-left mode.
        const RL          = 0x0080;
    }
}

/// Options controlling one parse.
#[derive(Debug, Clone, Default)]
pub struct ParserOptions {
    pub flags: PocFlags,
    /// Stop requesting lines once the block stack is empty again.
    pub early_return: bool,
    /// Ambient key-translation state (termcodes, `<SID>`, leaders).
    pub key_env: KeyTranslateEnv,
}

impl ParserOptions {
    /// The CPO word handed to the key-translation layer.
    pub fn cpo(&self) -> CpoFlags {
        let mut cpo = CpoFlags::empty();
        if self.flags.contains(PocFlags::CPO_BSLASH) {
            cpo |= CpoFlags::BSLASH;
        }
        if self.flags.contains(PocFlags::CPO_SPECI) {
            cpo |= CpoFlags::SPECI;
        }
        if self.flags.contains(PocFlags::CPO_KEYCODE) {
            cpo |= CpoFlags::KEYCODE;
        }
        if self.flags.contains(PocFlags::CPO_BAR) {
            cpo |= CpoFlags::BAR;
        }
        cpo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpo_mapping() {
        let o = ParserOptions {
            flags: PocFlags::CPO_BSLASH | PocFlags::CPO_BAR | PocFlags::EXMODE,
            ..Default::default()
        };
        let cpo = o.cpo();
        assert!(cpo.contains(CpoFlags::BSLASH));
        assert!(cpo.contains(CpoFlags::BAR));
        assert!(!cpo.contains(CpoFlags::SPECI));
    }
}
