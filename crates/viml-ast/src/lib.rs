//! AST definitions for the VimL front-end.
//!
//! The tree has two layers. Expressions ([`ExprNode`]) form classic
//! operator trees produced by the precedence-climbing expression parser.
//! Commands ([`CmdNode`]) are line-oriented: each carries a [`Range`], an
//! optional count, ex-flags, a bang, a descriptor-sized argument vector
//! ([`CmdArg`]) and, for block commands, a child list filled in by the
//! block reconciler.
//!
//! Ownership is strictly tree-shaped: every node owns its children and
//! argument payloads, so dropping a root releases the whole parse. There
//! is no parent or sibling pointer; branch chains (`elseif`, `catch`, …)
//! are consecutive elements of the enclosing child vector.

pub mod cmd;
pub mod cmdkind;
pub mod expr;
pub mod range;

pub use cmd::{
    ArgType, CmdArg, CmdComplete, CmdNode, Count, ExFlags, FuncFlags, LetAssignType, MapFlags,
    MenuFlags, MenuItem,
};
pub use cmdkind::CmdKind;
pub use expr::{CaseStrategy, CmpOp, ExprKind, ExprNode, ExprSpan, Expression};
pub use range::{Address, AddressFollowup, AddressKind, Range, RangeElement, Regex};
pub use viml_position::{CommandPosition, Span};

/// An autocommand event tag: an index into the fixed event-name table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AuEvent(pub u16);
