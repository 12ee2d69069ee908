//! Command descriptors for the Ex parser.
//!
//! Every [`CmdKind`] has one [`CommandDefinition`]: its canonical name,
//! the behaviour flags driving argument scanning, the argument-type list
//! sizing the node's argument vector, and an optional sub-parser tag the
//! Ex parser dispatches on. The original shipped this table as a
//! generated C header; here it is an inline declarative table with a
//! consistency test.
//!
//! Lookup by minimal unique prefix scans the table from the first entry
//! of the typed command's first letter ([`first_letter_start`]) until a
//! name with the typed prefix is found, exactly like the 27-entry
//! dispatch array of the original.

mod events;
mod table;

pub use events::{AU_EVENT_NAMES, au_event_by_name, au_event_name};
pub use table::cmddef;

use bitflags::bitflags;
use std::sync::LazyLock;
use viml_ast::{ArgType, CmdKind};

bitflags! {
    /// Behaviour flags of a command descriptor.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CmdFlags: u32 {
        /// A line range is accepted before the command.
        const RANGE      = 0x0001;
        /// A `!` is accepted right after the name.
        const BANG       = 0x0002;
        /// A count is accepted after the name.
        const COUNT      = 0x0004;
        /// The ex flags `l`, `#`, `p` are accepted after the count.
        const EXFLAGS    = 0x0008;
        /// Arguments are accepted at all.
        const EXTRA      = 0x0010;
        /// A `|` terminates the command.
        const TRLBAR     = 0x0020;
        /// Ctrl-V escapes are kept in the argument text.
        const USECTRLV   = 0x0040;
        /// A trailing `"` does not start a comment.
        const NOTRLCOM   = 0x0080;
        /// The argument is a file spec (raw scan, backticks possible).
        const XFILE      = 0x0100;
        /// The argument is a pattern (raw scan, bars possible).
        const ISGREP     = 0x0200;
        /// The argument is an expression (raw scan, bars possible).
        const ISEXPR     = 0x0400;
        /// The argument is taken literally to the end of the line.
        const LITERAL    = 0x0800;
        /// The command is a modifier wrapping the following command.
        const ISMODIFIER = 0x1000;
    }
}

/// Argument sub-parser selector.
///
/// The Ex parser owns the implementations; the descriptor only names
/// which grammar applies so this crate stays a pure data table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubParser {
    /// `:append`/`:insert`/`:change` body lines up to a lone `.`.
    Append,
    /// `:map`/`:abbrev` with `<buffer>`-style attributes, LHS and RHS.
    Map,
    /// `:unmap`/`:unabbrev`: attributes and LHS only.
    Unmap,
    /// `:mapclear`: one optional `<buffer>`.
    MapClear,
    /// `:menu`: attributes, icon, priorities, path, text, RHS.
    Menu,
    /// `:unmenu`/`:emenu`/`:popup`: a menu path.
    Unmenu,
    /// One (possibly optional) expression.
    Expr,
    /// A whitespace-separated expression sequence.
    Exprs,
    /// One or more assignable lvalue expressions.
    Lvals,
    /// `:lockvar`-style: optional depth plus lvalues.
    LockVar,
    /// `:let` with operator detection and destructuring LHS.
    Let,
    /// `:for {lhs} in {expr}`.
    For,
    /// `:function` signature line.
    Function,
    /// `:catch` with an arbitrary-delimiter pattern.
    Catch,
    /// `:global`/`:vglobal`: `/pat/` plus the command tail.
    Global,
    /// `:substitute`: pattern, replacement, flag letters and count.
    Substitute,
    /// A single-character argument (`:k`, `:mark`, `:wincmd`, `:@`).
    CharArg,
    /// One address (`:copy`/`:move` destination).
    AddressArg,
    /// `:autocmd`: group, event list, pattern, `nested`.
    Autocmd,
    /// `:doautocmd`/`:doautoall`.
    DoAutocmd,
    /// `:command` definition attributes.
    UserCommand,
    /// The rest of the argument text as one owned string.
    Rest,
    /// The rest of the argument text as a file glob.
    Glob,
}

/// One command descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandDefinition {
    pub kind: CmdKind,
    pub name: Option<&'static str>,
    pub flags: CmdFlags,
    pub arg_types: &'static [ArgType],
    pub parser: Option<SubParser>,
}

impl CommandDefinition {
    pub fn num_args(&self) -> usize {
        self.arg_types.len()
    }
}

/// First-letter dispatch: for each of `a`..`z` plus the non-alphabetic
/// bucket, the table index lookup starts from.
static FIRST_LETTER: LazyLock<[usize; 27]> = LazyLock::new(|| {
    let mut starts = [CmdKind::ALL.len(); 27];
    for (i, kind) in CmdKind::ALL.iter().enumerate() {
        let Some(name) = kind.name() else { continue };
        let bucket = match name.as_bytes()[0] {
            b @ b'a'..=b'z' => (b - b'a') as usize,
            _ => 26,
        };
        if starts[bucket] == CmdKind::ALL.len() {
            starts[bucket] = i;
        }
    }
    starts
});

/// Table index to start scanning from for a command beginning with
/// `first`. Lowercase letters get their own bucket; everything else
/// (punctuation commands and the capitalised built-ins) shares the last
/// one.
pub fn first_letter_start(first: u8) -> usize {
    let bucket = match first {
        b @ b'a'..=b'z' => (b - b'a') as usize,
        _ => 26,
    };
    FIRST_LETTER[bucket]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_table_is_aligned_with_kinds() {
        for &kind in CmdKind::ALL {
            let def = cmddef(kind);
            assert_eq!(def.kind, kind, "descriptor out of order for {kind:?}");
            assert_eq!(def.name, kind.name());
        }
    }

    #[test]
    fn test_every_extra_command_can_hold_arguments() {
        for &kind in CmdKind::ALL {
            let def = cmddef(kind);
            // The line-input commands read their body through the line
            // getter, not from the command line.
            if def.parser.is_some_and(|p| p != SubParser::Append) && !kind.is_virtual() {
                assert!(
                    def.flags.intersects(
                        CmdFlags::EXTRA
                            | CmdFlags::XFILE
                            | CmdFlags::ISGREP
                            | CmdFlags::ISEXPR
                            | CmdFlags::LITERAL
                    ),
                    "{kind:?} has a sub-parser but takes no arguments",
                );
            }
        }
    }

    #[test]
    fn test_first_letter_buckets() {
        assert_eq!(cmddef(CmdKind::ALL[first_letter_start(b'a')]).name, Some("append"));
        assert_eq!(cmddef(CmdKind::ALL[first_letter_start(b'q')]).name, Some("quit"));
        assert_eq!(cmddef(CmdKind::ALL[first_letter_start(b'!')]).name, Some("!"));
        assert_eq!(cmddef(CmdKind::ALL[first_letter_start(b'N')]).name, Some("!"));
    }

    #[test]
    fn test_modifiers_are_flagged() {
        for kind in [
            CmdKind::Aboveleft,
            CmdKind::Belowright,
            CmdKind::Silent,
            CmdKind::Tab,
            CmdKind::Verbose,
            CmdKind::Vertical,
        ] {
            assert!(cmddef(kind).flags.contains(CmdFlags::ISMODIFIER), "{kind:?}");
        }
        assert!(!cmddef(CmdKind::Split).flags.contains(CmdFlags::ISMODIFIER));
    }

    #[test]
    fn test_syntax_error_layout() {
        let def = cmddef(CmdKind::SyntaxError);
        assert_eq!(def.arg_types, &[ArgType::String, ArgType::String, ArgType::Column]);
    }
}
