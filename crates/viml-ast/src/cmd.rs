//! Command nodes and their tagged argument slots.

use crate::cmdkind::CmdKind;
use crate::expr::Expression;
use crate::range::{Range, Regex};
use crate::AuEvent;
use bitflags::bitflags;
use viml_keycodes::KeySequence;
use viml_position::CommandPosition;

bitflags! {
    /// Ex flags accepted after a count: `l`, `#`, `p`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ExFlags: u8 {
        const LIST  = 0x01;
        const LNR   = 0x02;
        const PRINT = 0x04;
    }
}

bitflags! {
    /// Angle-bracket attributes of a `:map`/`:abbrev` command.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MapFlags: u32 {
        const BUFFER  = 0x01;
        const NOWAIT  = 0x02;
        const SILENT  = 0x04;
        const SPECIAL = 0x08;
        const SCRIPT  = 0x10;
        const EXPR    = 0x20;
        const UNIQUE  = 0x40;
    }
}

bitflags! {
    /// Attributes of a `:menu` command.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MenuFlags: u32 {
        const SILENT  = 0x01;
        const SPECIAL = 0x02;
        const SCRIPT  = 0x04;
        const DISABLE = 0x08;
        const ENABLE  = 0x10;
    }
}

bitflags! {
    /// Tail attributes of a `:function` definition.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FuncFlags: u32 {
        const VARARGS = 0x01;
        const RANGE   = 0x02;
        const ABORT   = 0x04;
        const DICT    = 0x08;
        /// The definition form (a signature was given): the command
        /// opens a block; without it `:function Name` merely lists.
        const DEF     = 0x10;
    }
}

/// Operator of a `:let` assignment, stored in the first argument slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LetAssignType {
    /// Bare `:let` (list variables).
    #[default]
    None,
    /// `=`
    Assign,
    /// `+=`
    Add,
    /// `-=`
    Subtract,
    /// `.=`
    Append,
}

impl LetAssignType {
    pub const fn as_u32(self) -> u32 {
        self as u32
    }

    pub const fn from_u32(raw: u32) -> Self {
        match raw {
            1 => LetAssignType::Assign,
            2 => LetAssignType::Add,
            3 => LetAssignType::Subtract,
            4 => LetAssignType::Append,
            _ => LetAssignType::None,
        }
    }
}

/// Count attached to a command.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Count {
    #[default]
    Missing,
    Count(i64),
    Buffer(i64),
    Register(char),
    ExprRegister(Expression),
}

/// One element of a menu path: `File.Save` has two items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    /// Unescaped item name.
    pub name: String,
}

/// Completion behaviour of a user command (`:command -complete=…`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdComplete {
    pub name: String,
    /// Argument of `custom`/`customlist` completion.
    pub arg: Option<String>,
}

/// Argument slot type, as listed in a command descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    /// An owned sub-node (the error node of a failed `<expr>` mapping).
    Command,
    /// A single expression with its source.
    Expr,
    /// A whitespace-separated expression sequence.
    Exprs,
    /// An assignment target (single lvalue or destructuring list).
    AssignLhs,
    /// A 32-bit flag word.
    Flags,
    Number,
    UNumber,
    Numbers,
    Char,
    String,
    /// A `:map` LHS/RHS in the internal keycode encoding.
    KeySeq,
    Strings,
    /// Body lines of `:append`/`:insert`/`:change`.
    Lines,
    Pattern,
    Glob,
    Regex,
    Replacement,
    MenuName,
    AuEvent,
    AuEvents,
    Address,
    CmdComplete,
    /// Error column of a syntax-error node.
    Column,
}

/// One argument slot value.
///
/// The variant always matches the [`ArgType`] at the same index of the
/// command's descriptor; [`CmdArg::empty_for`] produces the initial value
/// for a slot.
#[derive(Debug, Clone, PartialEq)]
pub enum CmdArg {
    Command(Option<Box<CmdNode>>),
    Expr(Option<Expression>),
    Exprs(Option<Expression>),
    AssignLhs(Option<Expression>),
    Flags(u32),
    Number(i64),
    UNumber(u64),
    Numbers(Vec<i64>),
    Char(Option<char>),
    String(Option<String>),
    KeySeq(Option<KeySequence>),
    Strings(Vec<String>),
    Lines(Vec<String>),
    Pattern(Option<String>),
    Glob(Option<String>),
    Regex(Option<Regex>),
    Replacement(Option<String>),
    MenuName(Vec<MenuItem>),
    AuEvent(Option<AuEvent>),
    AuEvents(Vec<AuEvent>),
    Address(Option<crate::range::Address>),
    CmdComplete(Option<CmdComplete>),
    Column(usize),
}

impl CmdArg {
    /// The empty value for a descriptor slot.
    pub fn empty_for(ty: ArgType) -> CmdArg {
        match ty {
            ArgType::Command => CmdArg::Command(None),
            ArgType::Expr => CmdArg::Expr(None),
            ArgType::Exprs => CmdArg::Exprs(None),
            ArgType::AssignLhs => CmdArg::AssignLhs(None),
            ArgType::Flags => CmdArg::Flags(0),
            ArgType::Number => CmdArg::Number(0),
            ArgType::UNumber => CmdArg::UNumber(0),
            ArgType::Numbers => CmdArg::Numbers(Vec::new()),
            ArgType::Char => CmdArg::Char(None),
            ArgType::String => CmdArg::String(None),
            ArgType::KeySeq => CmdArg::KeySeq(None),
            ArgType::Strings => CmdArg::Strings(Vec::new()),
            ArgType::Lines => CmdArg::Lines(Vec::new()),
            ArgType::Pattern => CmdArg::Pattern(None),
            ArgType::Glob => CmdArg::Glob(None),
            ArgType::Regex => CmdArg::Regex(None),
            ArgType::Replacement => CmdArg::Replacement(None),
            ArgType::MenuName => CmdArg::MenuName(Vec::new()),
            ArgType::AuEvent => CmdArg::AuEvent(None),
            ArgType::AuEvents => CmdArg::AuEvents(Vec::new()),
            ArgType::Address => CmdArg::Address(None),
            ArgType::CmdComplete => CmdArg::CmdComplete(None),
            ArgType::Column => CmdArg::Column(0),
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            CmdArg::String(s) | CmdArg::Pattern(s) | CmdArg::Glob(s) | CmdArg::Replacement(s) => {
                s.as_deref()
            }
            _ => None,
        }
    }

    pub fn as_expr(&self) -> Option<&Expression> {
        match self {
            CmdArg::Expr(e) | CmdArg::Exprs(e) | CmdArg::AssignLhs(e) => e.as_ref(),
            _ => None,
        }
    }

    pub fn as_flags(&self) -> u32 {
        match self {
            CmdArg::Flags(f) => *f,
            _ => 0,
        }
    }

    pub fn as_regex(&self) -> Option<&Regex> {
        match self {
            CmdArg::Regex(r) => r.as_ref(),
            _ => None,
        }
    }
}

/// One parsed Ex command.
#[derive(Debug, Clone, PartialEq)]
pub struct CmdNode {
    pub kind: CmdKind,
    /// Command name for [`CmdKind::User`] nodes.
    pub name: Option<String>,
    pub range: Range,
    pub count: Count,
    pub exflags: ExFlags,
    pub bang: bool,
    /// Descriptor-sized argument vector.
    pub args: Vec<CmdArg>,
    /// Block body (or the single wrapped command of a modifier).
    pub children: Vec<CmdNode>,
    pub position: CommandPosition,
}

impl CmdNode {
    /// A node of `kind` with empty argument slots sized by `arg_types`.
    pub fn new(kind: CmdKind, arg_types: &[ArgType], position: CommandPosition) -> Self {
        CmdNode {
            kind,
            name: None,
            range: Range::default(),
            count: Count::Missing,
            exflags: ExFlags::empty(),
            bang: false,
            args: arg_types.iter().map(|&ty| CmdArg::empty_for(ty)).collect(),
            children: Vec::new(),
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_slots_match_types() {
        let types = [ArgType::Flags, ArgType::KeySeq, ArgType::Expr];
        let node = CmdNode::new(CmdKind::Map, &types, CommandPosition::start_of("t"));
        assert_eq!(node.args.len(), 3);
        assert_eq!(node.args[0], CmdArg::Flags(0));
        assert_eq!(node.args[1], CmdArg::KeySeq(None));
        assert_eq!(node.args[2], CmdArg::Expr(None));
    }

    #[test]
    fn test_let_assign_type_round_trip() {
        for ty in [
            LetAssignType::None,
            LetAssignType::Assign,
            LetAssignType::Add,
            LetAssignType::Subtract,
            LetAssignType::Append,
        ] {
            assert_eq!(LetAssignType::from_u32(ty.as_u32()), ty);
        }
    }
}
