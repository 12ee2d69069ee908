//! Expression nodes.

use viml_position::Span;

/// Case-compare strategy of a comparison operator.
///
/// `==` resolves against the `ignorecase` option at runtime, `==#` forces
/// a case-sensitive compare, `==?` a case-insensitive one. Only
/// comparison nodes carry a meaningful strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseStrategy {
    #[default]
    UseOption,
    MatchCase,
    IgnoreCase,
}

impl CaseStrategy {
    /// The dump suffix: empty, `#` or `?`.
    pub const fn suffix(self) -> &'static str {
        match self {
            CaseStrategy::UseOption => "",
            CaseStrategy::MatchCase => "#",
            CaseStrategy::IgnoreCase => "?",
        }
    }
}

/// Comparison operator family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    Equals,
    NotEquals,
    Identical,
    NotIdentical,
    Matches,
    NotMatches,
}

impl CmpOp {
    /// Source-level operator text.
    pub const fn glyph(self) -> &'static str {
        match self {
            CmpOp::Greater => ">",
            CmpOp::GreaterOrEqual => ">=",
            CmpOp::Less => "<",
            CmpOp::LessOrEqual => "<=",
            CmpOp::Equals => "==",
            CmpOp::NotEquals => "!=",
            CmpOp::Identical => "is",
            CmpOp::NotIdentical => "isnot",
            CmpOp::Matches => "=~",
            CmpOp::NotMatches => "!~",
        }
    }
}

/// Expression node kind.
///
/// Number literals are split by base so the back-ends can re-emit them
/// without reparsing. `ConcatOrSubscript` is the `a.b` form whose meaning
/// (string concat vs dictionary index) is only known at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprKind {
    // Ternary operator
    TernaryConditional,

    // Binary operators
    LogicalOr,
    LogicalAnd,
    Comparison { op: CmpOp, case: CaseStrategy },
    Add,
    Subtract,
    StringConcat,
    Multiply,
    Divide,
    Modulo,

    // Unary operators
    Not,
    Minus,
    Plus,

    // Simple value nodes
    DecimalNumber,
    OctalNumber,
    HexNumber,
    Float,
    DoubleQuotedString,
    SingleQuotedString,
    Option,
    Register,
    EnvironmentVariable,

    // Curly-braces name parts
    VariableName,
    SimpleVariableName,
    Identifier,
    CurlyName,

    // Complex value nodes
    Expression,
    List,
    Dictionary,

    // Subscripts
    Subscript,
    ConcatOrSubscript,
    Call,
    EmptySubscript,

    // The "; rest" segment of a list assignment target
    ListRest,
}

impl ExprKind {
    /// Short type string used by the canonical dump.
    pub const fn dump_glyph(self) -> &'static str {
        match self {
            ExprKind::TernaryConditional => "?:",
            ExprKind::LogicalOr => "||",
            ExprKind::LogicalAnd => "&&",
            ExprKind::Comparison { op, .. } => op.glyph(),
            ExprKind::Add => "+",
            ExprKind::Subtract => "-",
            ExprKind::StringConcat => "..",
            ExprKind::Multiply => "*",
            ExprKind::Divide => "/",
            ExprKind::Modulo => "%",
            ExprKind::Not => "!",
            ExprKind::Minus => "-!",
            ExprKind::Plus => "+!",
            ExprKind::DecimalNumber => "N",
            ExprKind::OctalNumber => "O",
            ExprKind::HexNumber => "X",
            ExprKind::Float => "F",
            ExprKind::DoubleQuotedString => "\"",
            ExprKind::SingleQuotedString => "'",
            ExprKind::Option => "&",
            ExprKind::Register => "@",
            ExprKind::EnvironmentVariable => "$",
            ExprKind::VariableName => "cvar",
            ExprKind::SimpleVariableName => "var",
            ExprKind::Identifier => "id",
            ExprKind::CurlyName => "curly",
            ExprKind::Expression => "expr",
            ExprKind::List => "[]",
            ExprKind::Dictionary => "{}",
            ExprKind::Subscript => "index",
            ExprKind::ConcatOrSubscript => ".",
            ExprKind::Call => "call",
            ExprKind::EmptySubscript => "empty",
            ExprKind::ListRest => "rest",
        }
    }

    /// Case-compare suffix for the dump; empty for non-comparisons.
    pub const fn case_suffix(self) -> &'static str {
        match self {
            ExprKind::Comparison { case, .. } => case.suffix(),
            _ => "",
        }
    }
}

/// Source extent of an expression node within its line.
///
/// Value nodes carry a [`ExprSpan::Range`] with inclusive bounds; nodes
/// that only mark a position (a `{` of a curly name, a `(` of a
/// parenthesised expression) carry a [`ExprSpan::Point`]; pure operator
/// nodes carry nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExprSpan {
    #[default]
    Missing,
    Point(usize),
    Range(usize, usize),
}

impl ExprSpan {
    /// Converts inclusive bounds into a [`Span`], when present.
    pub fn as_span(self) -> Option<Span> {
        match self {
            ExprSpan::Range(start, end) => Some(Span::new(start, end)),
            _ => None,
        }
    }

    pub fn start(self) -> Option<usize> {
        match self {
            ExprSpan::Missing => None,
            ExprSpan::Point(p) => Some(p),
            ExprSpan::Range(s, _) => Some(s),
        }
    }
}

/// One expression tree node.
///
/// Children are meaningful for operators, subscripts and the collection
/// constructors; their order is source order (a ternary has condition,
/// then-branch, else-branch; a call has the callee first).
#[derive(Debug, Clone, PartialEq)]
pub struct ExprNode {
    pub kind: ExprKind,
    pub span: ExprSpan,
    pub children: Vec<ExprNode>,
}

impl ExprNode {
    /// An operator node without its operands yet.
    pub fn new(kind: ExprKind) -> Self {
        ExprNode { kind, span: ExprSpan::Missing, children: Vec::new() }
    }

    /// A value node covering `start..=end`.
    pub fn value(kind: ExprKind, start: usize, end: usize) -> Self {
        ExprNode { kind, span: ExprSpan::Range(start, end), children: Vec::new() }
    }

    /// A marker node anchored at one position.
    pub fn at(kind: ExprKind, pos: usize) -> Self {
        ExprNode { kind, span: ExprSpan::Point(pos), children: Vec::new() }
    }

    /// Wraps `child` as the first operand of a new `kind` node.
    pub fn wrap(kind: ExprKind, child: ExprNode) -> Self {
        ExprNode { kind, span: ExprSpan::Missing, children: vec![child] }
    }
}

/// An owned argument expression: the original source text plus the parsed
/// roots.
///
/// Single-expression arguments have exactly one root; `:echo`-style
/// sequences and assignment left-hand-side lists have one root per item.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub source: String,
    pub nodes: Vec<ExprNode>,
}

impl Expression {
    pub fn new(source: impl Into<String>, nodes: Vec<ExprNode>) -> Self {
        Expression { source: source.into(), nodes }
    }

    /// The single root of a one-expression argument.
    pub fn node(&self) -> &ExprNode {
        &self.nodes[0]
    }
}
