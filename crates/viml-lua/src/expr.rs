//! Expression lowering.

use crate::options::{OptionLocality, option_locality};
use crate::{Emitter, TranslationContext};
use std::io::{self, Write};
use viml_ast::{CmdNode, CmpOp, ExprKind, ExprNode, ExprSpan, Expression};
use viml_keycodes::trans_special;
use viml_lexis::utf8_char_len;

bitflags::bitflags! {
    /// Scope-translation context bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub(crate) struct TsFlags: u8 {
        /// The segment being dumped is the last one.
        const LAST_SEGMENT = 0x01;
        /// The segment is the only one.
        const ONLY_SEGMENT = 0x02;
        /// A called function name resolves through `vim.functions`.
        const FUNCCALL     = 0x04;
        /// An assigned function name resolves through user functions.
        const FUNCASSIGN   = 0x08;
    }
}

/// What gets assigned by `vim.assign.ass_*`.
pub(crate) enum ValueSource<'a> {
    Expr(&'a Expression),
    Raw(&'a str),
    ListItem { var: &'a str, idx: usize },
    ListRest { var: &'a str, idx: usize },
    ModAssign { op: &'static str, lval: &'a Expression, rval: &'a Expression },
    FuncDef { node: &'a CmdNode, indent: usize },
}

fn span_bounds(node: &ExprNode) -> (usize, usize) {
    match node.span {
        ExprSpan::Range(start, end) => (start, end),
        ExprSpan::Point(at) => (at, at),
        ExprSpan::Missing => (0, 0),
    }
}

impl<W: Write> Emitter<'_, W> {
    /// One byte inside a Lua string literal.
    pub(crate) fn lua_char(&mut self, b: u8) -> io::Result<()> {
        match b {
            0x07 => self.w("\\a"),
            0x08 => self.w("\\b"),
            0x09 => self.w("\\t"),
            0x0a => self.w("\\n"),
            0x0c => self.w("\\f"),
            0x0d => self.w("\\r"),
            b'"' => self.w("\\\""),
            b'\'' => self.w("\\'"),
            b'\\' => self.w("\\\\"),
            0x00..=0x1f | 0x7f..=0xff => self.w(&format!("\\{b:03}")),
            _ => self.w_bytes(&[b]),
        }
    }

    /// A host string as a single-quoted Lua literal; multi-byte UTF-8
    /// sequences pass through untouched.
    pub(crate) fn lua_string(&mut self, s: &str) -> io::Result<()> {
        let bytes = s.as_bytes();
        self.w("'")?;
        let mut i = 0usize;
        while i < bytes.len() {
            let len = utf8_char_len(bytes[i]).min(bytes.len() - i);
            if len == 1 {
                self.lua_char(bytes[i])?;
            } else {
                self.w_bytes(&bytes[i..i + len])?;
            }
            i += len;
        }
        self.w("'")
    }

    /// A VimL number literal; octals are re-based to decimal.
    fn vim_number(&mut self, kind: ExprKind, text: &str) -> io::Result<()> {
        match kind {
            ExprKind::OctalNumber => {
                let digits = text.trim_start_matches('0');
                let mut value: u64 = 0;
                for b in digits.bytes() {
                    value = value.saturating_mul(8).saturating_add(u64::from(b - b'0'));
                }
                self.w(&value.to_string())
            }
            _ => self.w(text),
        }
    }

    /// A VimL string literal (with its quotes), re-escaped for Lua when
    /// the VimL escapes have no Lua equivalent.
    fn vim_string(&mut self, kind: ExprKind, text: &str) -> io::Result<()> {
        let bytes = text.as_bytes();
        let content = &bytes[1..bytes.len() - 1];
        match kind {
            ExprKind::SingleQuotedString => {
                let as_is =
                    !content.iter().any(|&b| b == b'\'' || b < 0x20 || b == b'\\');
                if as_is {
                    return self.w(text);
                }
                self.w("'")?;
                let mut i = 0usize;
                while i < content.len() {
                    if content[i] == b'\'' {
                        // The '' escape becomes \'.
                        self.w("\\'")?;
                        i += 2;
                    } else {
                        self.lua_char(content[i])?;
                        i += 1;
                    }
                }
                self.w("'")
            }
            ExprKind::DoubleQuotedString => {
                let mut as_is = true;
                let mut i = 0usize;
                while i < content.len() {
                    if content[i] < 0x20 {
                        as_is = false;
                        break;
                    }
                    if content[i] == b'\\' {
                        match content.get(i + 1) {
                            Some(b'r' | b'n' | b'f' | b'b' | b'\\' | b'"' | b'\'' | b'[' | b']') => {
                                i += 1;
                            }
                            _ => {
                                as_is = false;
                                break;
                            }
                        }
                    }
                    i += 1;
                }
                if as_is {
                    return self.w(text);
                }

                self.w("\"")?;
                let mut i = 0usize;
                while i < content.len() {
                    if content[i] != b'\\' {
                        self.lua_char(content[i])?;
                        i += 1;
                        continue;
                    }
                    i += 1;
                    let Some(&escape) = content.get(i) else { break };
                    match escape {
                        b'r' | b'n' | b'f' | b'b' | b'\\' | b'"' => {
                            self.w_bytes(&[b'\\', escape])?;
                            i += 1;
                        }
                        b'e' => {
                            self.w("\\027")?;
                            i += 1;
                        }
                        b'x' | b'X' | b'u' | b'U' => {
                            if content.get(i + 1).is_some_and(u8::is_ascii_hexdigit) {
                                let max = if matches!(escape, b'x' | b'X') { 2 } else { 4 };
                                let mut nr: u32 = 0;
                                let mut taken = 0;
                                while taken < max
                                    && content.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                                {
                                    i += 1;
                                    nr = (nr << 4) + u32::from(hex_value(content[i]));
                                    taken += 1;
                                }
                                i += 1;
                                if matches!(escape, b'x' | b'X') || nr < 0x7f {
                                    self.lua_char(nr as u8)?;
                                } else {
                                    let mut buf = [0u8; 4];
                                    let encoded = char::from_u32(nr)
                                        .unwrap_or('\u{fffd}')
                                        .encode_utf8(&mut buf);
                                    self.w(encoded)?;
                                }
                            } else {
                                self.lua_char(escape)?;
                                i += 1;
                            }
                        }
                        b'0'..=b'7' => {
                            let mut value = escape - b'0';
                            i += 1;
                            for _ in 0..2 {
                                if let Some(&d @ b'0'..=b'7') = content.get(i) {
                                    value = (value << 3) + (d - b'0');
                                    i += 1;
                                } else {
                                    break;
                                }
                            }
                            self.lua_char(value)?;
                        }
                        b'<' => {
                            let mut translated = Vec::new();
                            match trans_special(content, i, false, &mut translated) {
                                Some(end) => {
                                    for &b in &translated {
                                        self.lua_char(b)?;
                                    }
                                    i = end;
                                }
                                None => {
                                    self.lua_char(b'<')?;
                                    i += 1;
                                }
                            }
                        }
                        _ => {
                            self.lua_char(escape)?;
                            i += 1;
                        }
                    }
                }
                self.w("\"")
            }
            _ => Ok(()),
        }
    }

    /// Emits the scope table of a (partial) variable name and reports
    /// where the key text starts, or `None` when the scope can only be
    /// decided at runtime.
    pub(crate) fn scope(
        &mut self,
        source: &str,
        node: &ExprNode,
        flags: TsFlags,
    ) -> io::Result<Option<usize>> {
        let bytes = source.as_bytes();
        let (s, e) = span_bounds(node);
        let at = |i: usize| bytes.get(i).copied().unwrap_or(0);

        if e == s {
            if !flags.intersects(TsFlags::LAST_SEGMENT | TsFlags::ONLY_SEGMENT)
                && b"svalgtwb".contains(&at(s))
            {
                return Ok(None);
            }
            if flags.contains(TsFlags::FUNCCALL) && at(s).is_ascii_lowercase() {
                self.w("vim.functions")?;
            } else if flags.intersects(TsFlags::FUNCASSIGN | TsFlags::FUNCCALL) {
                self.w("state.global.user_functions")?;
            } else {
                self.w("state.current_scope")?;
            }
            return Ok(Some(s));
        }

        if at(s + 1) == b':' {
            match at(s) {
                scope @ (b's' | b'v' | b'a' | b'l' | b'g') => {
                    self.w("state.")?;
                    if matches!(scope, b'g' | b'v') {
                        self.w("global.")?;
                    }
                    self.w_bytes(&[scope])?;
                    return Ok(Some(s + 2));
                }
                b't' => {
                    self.w("state.global.tabpage.t")?;
                    return Ok(Some(s + 2));
                }
                b'w' => {
                    self.w("state.global.window.w")?;
                    return Ok(Some(s + 2));
                }
                b'b' => {
                    self.w("state.global.buffer.b")?;
                    return Ok(Some(s + 2));
                }
                _ => {
                    if flags.intersects(TsFlags::FUNCASSIGN | TsFlags::FUNCCALL) {
                        self.w("state.global.user_functions")?;
                    } else {
                        self.w("state.current_scope")?;
                    }
                    return Ok(Some(s));
                }
            }
        }

        let mut isfunc = false;
        if flags.contains(TsFlags::FUNCCALL) && at(s).is_ascii_lowercase() {
            isfunc = bytes[s + 1..=e]
                .iter()
                .all(|&b| b.is_ascii_lowercase() || b.is_ascii_digit());
        }
        if isfunc && !flags.contains(TsFlags::FUNCASSIGN) {
            self.w("vim.functions")?;
        } else if flags.intersects(TsFlags::FUNCASSIGN | TsFlags::FUNCCALL) {
            self.w("state.global.user_functions")?;
        } else {
            self.w("state.current_scope")?;
        }
        Ok(Some(s))
    }

    /// A compound (curly-brace) name, emitted as the final scope and key
    /// arguments of the enclosing call.
    pub(crate) fn varname(
        &mut self,
        source: &str,
        node: &ExprNode,
        is_funccall: bool,
    ) -> io::Result<()> {
        let mut children = node.children.iter();
        let Some(first) = children.next() else { return Ok(()) };
        let mut close_parenthesis = false;
        let mut add_concat;

        if first.kind == ExprKind::Identifier {
            let flags = if is_funccall { TsFlags::FUNCASSIGN } else { TsFlags::empty() };
            let start = self.scope(source, first, flags)?;
            let (s, e) = span_bounds(first);
            match start {
                None => {
                    self.w("vim.get_scope_and_key(state, vim.concat(state, '")?;
                    self.w(&source[s..=e])?;
                    self.w("'")?;
                    close_parenthesis = true;
                }
                Some(start) => {
                    self.w(", vim.concat(state, '")?;
                    if start <= e {
                        self.w(&source[start..=e])?;
                    }
                    self.w("'")?;
                }
            }
            add_concat = true;
        } else {
            self.w("vim.get_scope_and_key(state, vim.concat(state, ")?;
            add_concat = false;
            close_parenthesis = true;
            // The first piece is a curly chunk and is emitted below.
            children = node.children.iter();
        }

        for piece in children {
            if add_concat {
                self.w(", ")?;
            } else {
                add_concat = true;
            }
            match piece.kind {
                ExprKind::Identifier => {
                    let (s, e) = span_bounds(piece);
                    self.w("'")?;
                    self.w(&source[s..=e])?;
                    self.w("'")?;
                }
                ExprKind::CurlyName => {
                    self.expr(source, &piece.children[0], false)?;
                }
                _ => {}
            }
        }

        self.w(")")?;
        if close_parenthesis {
            self.w(")")?;
        }
        Ok(())
    }

    /// Lowers one expression node.
    pub(crate) fn expr(
        &mut self,
        source: &str,
        node: &ExprNode,
        is_funccall: bool,
    ) -> io::Result<()> {
        match node.kind {
            ExprKind::ListRest => {
                self.w("vim.err.err(state, nil, true, \"E696: Missing comma in List\")")
            }
            ExprKind::Float => {
                let (s, e) = span_bounds(node);
                self.w("vim.float:new(state, ")?;
                self.w(&source[s..=e])?;
                self.w(")")
            }
            ExprKind::DecimalNumber | ExprKind::OctalNumber | ExprKind::HexNumber => {
                let (s, e) = span_bounds(node);
                self.vim_number(node.kind, &source[s..=e])
            }
            ExprKind::DoubleQuotedString | ExprKind::SingleQuotedString => {
                let (s, e) = span_bounds(node);
                self.vim_string(node.kind, &source[s..=e])
            }
            ExprKind::Option => self.option(source, node),
            ExprKind::Register => {
                let (s, e) = span_bounds(node);
                self.w("state.registers[")?;
                if e > s {
                    self.lua_string(&source[s + 1..=e])?;
                } else {
                    self.w("nil")?;
                }
                self.w("]")
            }
            ExprKind::EnvironmentVariable => {
                self.w("state.environment[")?;
                match node.span {
                    ExprSpan::Range(s, e) => self.lua_string(&source[s..=e])?,
                    _ => self.w("''")?,
                }
                self.w("]")
            }
            ExprKind::SimpleVariableName => {
                self.w("vim.subscript.subscript(state, false, ")?;
                let flags = TsFlags::ONLY_SEGMENT
                    | if is_funccall { TsFlags::FUNCCALL } else { TsFlags::empty() };
                let start = self.scope(source, node, flags)?;
                let (s, e) = span_bounds(node);
                self.w(", '")?;
                self.w(&source[start.unwrap_or(s)..=e])?;
                self.w("')")
            }
            ExprKind::VariableName => {
                self.w("vim.subscript.subscript(state, false, ")?;
                self.varname(source, node, false)?;
                self.w(")")
            }
            ExprKind::ConcatOrSubscript => {
                let (s, e) = span_bounds(node);
                self.w("vim.concat_or_subscript(state, ")?;
                self.lua_string(&source[s..=e])?;
                self.w(", ")?;
                self.expr(source, &node.children[0], false)?;
                self.w(")")
            }
            ExprKind::EmptySubscript => self.w("nil"),
            ExprKind::Expression => {
                self.w("(")?;
                self.expr(source, &node.children[0], false)?;
                self.w(")")
            }
            ExprKind::Dictionary => self.call_like(source, node, "vim.dict:new(state", false),
            ExprKind::List => self.call_like(source, node, "vim.list:new(state", false),
            ExprKind::Subscript => {
                if node.children.len() == 2 {
                    self.call_like(source, node, "vim.subscript.subscript(state, true", false)
                } else {
                    self.call_like(source, node, "vim.subscript.slice(state", false)
                }
            }
            ExprKind::Call => self.call_like(source, node, "vim.subscript.call(state", true),
            ExprKind::Add => self.call_like(source, node, "vim.op.add(state", false),
            ExprKind::Subtract => self.call_like(source, node, "vim.op.subtract(state", false),
            ExprKind::Divide => self.call_like(source, node, "vim.op.divide(state", false),
            ExprKind::Multiply => self.call_like(source, node, "vim.op.multiply(state", false),
            ExprKind::Modulo => self.call_like(source, node, "vim.op.modulo(state", false),
            ExprKind::Minus => self.call_like(source, node, "vim.op.negate(state", false),
            ExprKind::Not => self.call_like(source, node, "vim.op.negate_logical(state", false),
            ExprKind::Plus => self.call_like(source, node, "vim.op.promote_integer(state", false),
            ExprKind::StringConcat => self.call_like(source, node, "vim.op.concat(state", false),
            ExprKind::LogicalOr => self.call_like(source, node, "vim.op.logical_or(state", false),
            ExprKind::LogicalAnd => {
                self.call_like(source, node, "vim.op.logical_and(state", false)
            }
            ExprKind::TernaryConditional => {
                self.call_like(source, node, "vim.op.ternary(state", false)
            }
            ExprKind::Comparison { op, case } => {
                let (positive, reversed) = match op {
                    CmpOp::Equals => ("equals", false),
                    CmpOp::NotEquals => ("equals", true),
                    CmpOp::Identical => ("identical", false),
                    CmpOp::NotIdentical => ("identical", true),
                    CmpOp::Matches => ("matches", false),
                    CmpOp::NotMatches => ("matches", true),
                    CmpOp::Greater => ("greater", false),
                    CmpOp::LessOrEqual => ("greater", true),
                    CmpOp::Less => ("less", false),
                    CmpOp::GreaterOrEqual => ("less", true),
                };
                if reversed {
                    self.w("vim.op.negate_logical(state, ")?;
                }
                self.w("vim.op.")?;
                self.w(positive)?;
                self.w("(state, ")?;
                self.w(match case {
                    viml_ast::CaseStrategy::UseOption => "state.global.options.ignorecase",
                    viml_ast::CaseStrategy::MatchCase => "false",
                    viml_ast::CaseStrategy::IgnoreCase => "true",
                })?;
                for child in &node.children {
                    self.w(", ")?;
                    self.expr(source, child, false)?;
                }
                self.w(")")?;
                if reversed {
                    self.w(")")?;
                }
                Ok(())
            }
            ExprKind::Identifier | ExprKind::CurlyName => {
                // Only reachable through varname handling.
                Ok(())
            }
        }
    }

    /// `prefix, child, child, …)`: the common call-shaped lowering.
    fn call_like(
        &mut self,
        source: &str,
        node: &ExprNode,
        prefix: &str,
        callee_first: bool,
    ) -> io::Result<()> {
        self.w(prefix)?;
        for (i, child) in node.children.iter().enumerate() {
            self.w(", ")?;
            self.expr(source, child, callee_first && i == 0)?;
        }
        self.w(")")
    }

    fn option(&mut self, source: &str, node: &ExprNode) -> io::Result<()> {
        let (s, e) = span_bounds(node);
        let text = &source[s..=e];
        let (requested, name) = match text.as_bytes() {
            [b'g', b':', ..] => (Some(OptionLocality::Global), &text[2..]),
            [b'l', b':', ..] => (None, &text[2..]),
            _ => (Some(option_locality(text)), text),
        };
        let actual = option_locality(name);

        match (requested, actual) {
            (Some(OptionLocality::Global), OptionLocality::Global) => {
                self.w("state.global.options['")?;
                self.w(name)?;
                self.w("']")
            }
            (Some(OptionLocality::Global), OptionLocality::Buffer) => {
                self.w("vim.get_local_option(state, state.global.buffer, '")?;
                self.w(name)?;
                self.w("')")
            }
            (Some(OptionLocality::Global), OptionLocality::Window) => {
                self.w("vim.get_local_option(state, state.global.window, '")?;
                self.w(name)?;
                self.w("')")
            }
            (Some(OptionLocality::Buffer), _) | (None, OptionLocality::Buffer) => {
                self.w("state.global.buffer['")?;
                self.w(name)?;
                self.w("']")
            }
            (Some(OptionLocality::Window), _) | (None, OptionLocality::Window) => {
                self.w("state.global.window['")?;
                self.w(name)?;
                self.w("']")
            }
            (None, OptionLocality::Global) => {
                self.w("vim.get_local_option(state, state.global.buffer, '")?;
                self.w(name)?;
                self.w("')")
            }
        }
    }

    /// A whitespace-separated expression sequence, comma-joined.
    pub(crate) fn exprs(&mut self, expression: &Expression) -> io::Result<()> {
        for (i, node) in expression.nodes.iter().enumerate() {
            if i > 0 {
                self.w(", ")?;
            }
            self.expr(&expression.source, node, false)?;
        }
        Ok(())
    }

    pub(crate) fn value(&mut self, source: &ValueSource<'_>) -> io::Result<()> {
        match source {
            ValueSource::Expr(expression) => {
                self.expr(&expression.source, expression.node(), false)
            }
            ValueSource::Raw(text) => self.w(text),
            ValueSource::ListItem { var, idx } => {
                self.w("vim.list.raw_subscript(")?;
                self.w(var)?;
                self.w(", ")?;
                self.w(&idx.to_string())?;
                self.w(")")
            }
            ValueSource::ListRest { var, idx } => {
                self.w("vim.list.raw_slice_to_end(")?;
                self.w(var)?;
                self.w(", ")?;
                self.w(&idx.to_string())?;
                self.w(")")
            }
            ValueSource::ModAssign { op, lval, rval } => {
                self.w("vim.op.mod_")?;
                self.w(op)?;
                self.w("(state, ")?;
                self.expr(&lval.source, lval.node(), false)?;
                self.w(", ")?;
                self.expr(&rval.source, rval.node(), false)?;
                self.w(")")
            }
            ValueSource::FuncDef { node, indent } => {
                self.function_definition(node, *indent, TranslationContext::Function)
            }
        }
    }
}

fn hex_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        _ => b - b'A' + 10,
    }
}
