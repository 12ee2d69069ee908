//! The expression parser: a recursive-descent precedence ladder.
//!
//! Levels from loosest to tightest: ternary `?:`, logical `||`, logical
//! `&&`, comparisons (non-chainable), additive `+ - .`, multiplicative
//! `* / %`, unary `! - +`, primaries, then the postfix chain of
//! subscripts, `.key` lookups and calls (which must follow without
//! whitespace).
//!
//! Chained occurrences of one additive/multiplicative operator collapse
//! into a single n-ary node (`1 + 2 + 3` has three children), while a
//! change of operator wraps the tree built so far (`1 + 2 - 3` is a
//! subtraction whose first child is the addition).

use crate::MAX_FUNC_ARGS;
use viml_ast::{CaseStrategy, CmpOp, ExprKind, ExprNode};
use viml_error::{ParseError, ParseResult, messages};
use viml_keycodes::{K_SPECIAL, KE_SNR, KS_EXTRA};
use viml_lexis::{is_id_byte, is_name_byte, skip_digits};

const SCOPE_CHARS: &[u8] = b"gbwtvals";

/// Recursion cap protecting against pathologically nested input.
const MAX_EXPR_DEPTH: usize = 500;

/// Parses one top-level expression, returning the tree and the byte
/// offset just past it.
pub fn parse_expr(source: &str) -> ParseResult<(ExprNode, usize)> {
    let mut parser = ExprParser::new(source);
    parser.skip_white();
    let node = parser.parse_one()?;
    Ok((node, parser.pos()))
}

/// Cursor-based expression parser over one source line.
pub struct ExprParser<'a> {
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> ExprParser<'a> {
    pub fn new(source: &'a str) -> Self {
        ExprParser { bytes: source.as_bytes(), pos: 0, depth: 0 }
    }

    /// Resumes parsing at `pos` within `source`.
    pub fn at(source: &'a str, pos: usize) -> Self {
        ExprParser { bytes: source.as_bytes(), pos, depth: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    #[inline]
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    /// Moves the cursor forward by `n` bytes.
    pub fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    /// Repositions the cursor.
    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
    }

    #[inline]
    fn byte_at(&self, at: usize) -> u8 {
        self.bytes.get(at).copied().unwrap_or(0)
    }

    pub fn skip_white(&mut self) {
        self.pos = viml_lexis::skip_white(self.bytes, self.pos);
    }

    #[inline]
    fn prev_is_white(&self) -> bool {
        self.pos > 0 && matches!(self.bytes[self.pos - 1], b' ' | b'\t')
    }

    fn fail<T>(&self, message: &'static str) -> ParseResult<T> {
        Err(ParseError::new(message, self.pos))
    }

    /// Parses one full expression (the ternary level).
    pub fn parse_one(&mut self) -> ParseResult<ExprNode> {
        self.depth += 1;
        if self.depth > MAX_EXPR_DEPTH {
            self.depth -= 1;
            return self.fail(messages::E_EXPR_TOO_DEEP);
        }
        let result = self.parse_ternary();
        self.depth -= 1;
        result
    }

    fn parse_ternary(&mut self) -> ParseResult<ExprNode> {
        let mut node = self.parse_or()?;

        if self.peek() == Some(b'?') {
            node = ExprNode::wrap(ExprKind::TernaryConditional, node);
            self.pos += 1;
            self.skip_white();
            let then_branch = self.parse_one()?;
            node.children.push(then_branch);

            if self.peek() != Some(b':') {
                return self.fail(messages::E_MISSING_COLON);
            }
            self.pos += 1;
            self.skip_white();
            let else_branch = self.parse_one()?;
            node.children.push(else_branch);
        }

        Ok(node)
    }

    fn parse_or(&mut self) -> ParseResult<ExprNode> {
        let mut node = self.parse_and()?;
        let mut wrapped = false;

        while self.peek() == Some(b'|') && self.byte_at(self.pos + 1) == b'|' {
            if !wrapped {
                node = ExprNode::wrap(ExprKind::LogicalOr, node);
                wrapped = true;
            }
            self.pos += 2;
            self.skip_white();
            let operand = self.parse_and()?;
            node.children.push(operand);
        }

        Ok(node)
    }

    fn parse_and(&mut self) -> ParseResult<ExprNode> {
        let mut node = self.parse_comparison()?;
        let mut wrapped = false;

        while self.peek() == Some(b'&') && self.byte_at(self.pos + 1) == b'&' {
            if !wrapped {
                node = ExprNode::wrap(ExprKind::LogicalAnd, node);
                wrapped = true;
            }
            self.pos += 2;
            self.skip_white();
            let operand = self.parse_comparison()?;
            node.children.push(operand);
        }

        Ok(node)
    }

    fn parse_comparison(&mut self) -> ParseResult<ExprNode> {
        let mut node = self.parse_additive()?;

        let (op, mut len) = match (self.peek(), self.byte_at(self.pos + 1)) {
            (Some(b'='), b'=') => (Some(CmpOp::Equals), 2),
            (Some(b'='), b'~') => (Some(CmpOp::Matches), 2),
            (Some(b'!'), b'=') => (Some(CmpOp::NotEquals), 2),
            (Some(b'!'), b'~') => (Some(CmpOp::NotMatches), 2),
            (Some(b'>'), b'=') => (Some(CmpOp::GreaterOrEqual), 2),
            (Some(b'>'), _) => (Some(CmpOp::Greater), 1),
            (Some(b'<'), b'=') => (Some(CmpOp::LessOrEqual), 2),
            (Some(b'<'), _) => (Some(CmpOp::Less), 1),
            (Some(b'i'), b's') => {
                // "is"/"isnot" count only when no identifier byte follows.
                if self.bytes[self.pos..].starts_with(b"isnot")
                    && !is_name_byte(self.byte_at(self.pos + 5))
                {
                    (Some(CmpOp::NotIdentical), 5)
                } else if !is_name_byte(self.byte_at(self.pos + 2)) {
                    (Some(CmpOp::Identical), 2)
                } else {
                    (None, 0)
                }
            }
            _ => (None, 0),
        };

        if let Some(op) = op {
            // A trailing '?' forces ignore-case, '#' match-case.
            let case = match self.byte_at(self.pos + len) {
                b'?' => {
                    len += 1;
                    CaseStrategy::IgnoreCase
                }
                b'#' => {
                    len += 1;
                    CaseStrategy::MatchCase
                }
                _ => CaseStrategy::UseOption,
            };
            node = ExprNode::wrap(ExprKind::Comparison { op, case }, node);
            self.pos += len;
            self.skip_white();
            let rhs = self.parse_additive()?;
            node.children.push(rhs);
        }

        Ok(node)
    }

    fn parse_additive(&mut self) -> ParseResult<ExprNode> {
        let mut node = self.parse_multiplicative(false)?;

        loop {
            let kind = match self.peek() {
                Some(b'+') => ExprKind::Add,
                Some(b'-') => ExprKind::Subtract,
                Some(b'.') => ExprKind::StringConcat,
                _ => break,
            };
            if node.kind != kind {
                node = ExprNode::wrap(kind, node);
            }
            self.pos += 1;
            self.skip_white();
            let operand = self.parse_multiplicative(kind == ExprKind::StringConcat)?;
            node.children.push(operand);
        }

        Ok(node)
    }

    fn parse_multiplicative(&mut self, want_string: bool) -> ParseResult<ExprNode> {
        let mut node = self.parse_unary(want_string)?;

        loop {
            let kind = match self.peek() {
                Some(b'*') => ExprKind::Multiply,
                Some(b'/') => ExprKind::Divide,
                Some(b'%') => ExprKind::Modulo,
                _ => break,
            };
            if node.kind != kind {
                node = ExprNode::wrap(kind, node);
            }
            self.pos += 1;
            self.skip_white();
            let operand = self.parse_unary(want_string)?;
            node.children.push(operand);
        }

        Ok(node)
    }

    /// Unary prefixes, a primary and its postfix chain.
    fn parse_unary(&mut self, want_string: bool) -> ParseResult<ExprNode> {
        let mut leaders: Vec<u8> = Vec::new();
        while let Some(b @ (b'!' | b'-' | b'+')) = self.peek() {
            leaders.push(b);
            self.pos += 1;
            self.skip_white();
        }

        let mut node = self.parse_primary(want_string)?;
        self.skip_white();
        node = self.parse_postfix_chain(node)?;
        self.skip_white();

        // Apply the prefixes from right to left.
        for &leader in leaders.iter().rev() {
            let kind = match leader {
                b'!' => ExprKind::Not,
                b'-' => ExprKind::Minus,
                _ => ExprKind::Plus,
            };
            node = ExprNode::wrap(kind, node);
        }

        Ok(node)
    }

    fn parse_primary(&mut self, want_string: bool) -> ParseResult<ExprNode> {
        match self.peek() {
            Some(b'0'..=b'9') => self.parse_number(want_string),
            Some(b'"') => self.parse_double_quoted(),
            Some(b'\'') => self.parse_single_quoted(),
            Some(b'[') => self.parse_list(),
            Some(b'{') => self.parse_dictionary_or_curly(),
            Some(b'&') => self.parse_option(),
            Some(b'$') => self.parse_environment_variable(),
            Some(b'@') => {
                let start = self.pos;
                self.pos += 1;
                // The sigil is included: a trailing `@` is register `"`.
                let end = if self.peek().is_some() {
                    self.pos += 1;
                    self.pos - 1
                } else {
                    start
                };
                Ok(ExprNode::value(ExprKind::Register, start, end))
            }
            Some(b'(') => {
                let mut node = ExprNode::at(ExprKind::Expression, self.pos);
                self.pos += 1;
                self.skip_white();
                let inner = self.parse_one()?;
                node.children.push(inner);
                if self.peek() != Some(b')') {
                    return self.fail(messages::E_MISSING_PAREN);
                }
                self.pos += 1;
                Ok(node)
            }
            _ => self.parse_name(None),
        }
    }

    fn parse_number(&mut self, want_string: bool) -> ParseResult<ExprNode> {
        let start = self.pos;

        // Hex requires the 0x prefix plus at least one hex digit.
        if self.peek() == Some(b'0')
            && matches!(self.byte_at(self.pos + 1), b'x' | b'X')
            && self.byte_at(self.pos + 2).is_ascii_hexdigit()
        {
            let mut end = self.pos + 2;
            while self.byte_at(end).is_ascii_hexdigit() {
                end += 1;
            }
            self.pos = end;
            return Ok(ExprNode::value(ExprKind::HexNumber, start, end - 1));
        }

        let digits_end = skip_digits(self.bytes, self.pos);
        let mut end = digits_end - 1;
        let mut kind = ExprKind::DecimalNumber;

        // A float needs digit '.' digit, and is not recognised right
        // after the string-concat operator so "1.2.3" keeps working.
        if !want_string
            && self.byte_at(digits_end) == b'.'
            && self.byte_at(digits_end + 1).is_ascii_digit()
        {
            kind = ExprKind::Float;
            let mut p = skip_digits(self.bytes, digits_end + 1);
            if matches!(self.byte_at(p), b'e' | b'E') {
                let mut q = p + 1;
                if matches!(self.byte_at(q), b'-' | b'+') {
                    q += 1;
                }
                if self.byte_at(q).is_ascii_digit() {
                    p = skip_digits(self.bytes, q);
                } else {
                    kind = ExprKind::DecimalNumber;
                }
            }
            if self.byte_at(p).is_ascii_alphabetic() || self.byte_at(p) == b'.' {
                kind = ExprKind::DecimalNumber;
            }
            if kind == ExprKind::Float {
                end = p - 1;
            }
        }

        if kind == ExprKind::DecimalNumber {
            // A leading zero makes the literal octal when every digit
            // fits the base; "0" alone and any 8/9 keep it decimal.
            let digits = &self.bytes[start..digits_end];
            if digits.len() > 1
                && digits[0] == b'0'
                && digits.iter().all(|&b| (b'0'..=b'7').contains(&b))
            {
                kind = ExprKind::OctalNumber;
            }
        }

        self.pos = end + 1;
        Ok(ExprNode::value(kind, start, end))
    }

    fn parse_double_quoted(&mut self) -> ParseResult<ExprNode> {
        let start = self.pos;
        let mut p = self.pos + 1;
        loop {
            match self.bytes.get(p) {
                None => return Err(ParseError::new(messages::E_MISSING_QUOTE, start)),
                Some(b'"') => break,
                Some(b'\\') if p + 1 < self.bytes.len() => p += 2,
                _ => p += 1,
            }
        }
        self.pos = p + 1;
        Ok(ExprNode::value(ExprKind::DoubleQuotedString, start, p))
    }

    fn parse_single_quoted(&mut self) -> ParseResult<ExprNode> {
        let start = self.pos;
        let mut p = self.pos + 1;
        loop {
            match self.bytes.get(p) {
                None => return Err(ParseError::new(messages::E_MISSING_QUOTE, start)),
                Some(b'\'') if self.bytes.get(p + 1) == Some(&b'\'') => p += 2,
                Some(b'\'') => break,
                _ => p += 1,
            }
        }
        self.pos = p + 1;
        Ok(ExprNode::value(ExprKind::SingleQuotedString, start, p))
    }

    fn parse_list(&mut self) -> ParseResult<ExprNode> {
        let mut node = ExprNode::new(ExprKind::List);
        self.pos += 1;
        self.skip_white();

        while !matches!(self.peek(), Some(b']') | None) {
            let item = self.parse_one()?;
            node.children.push(item);

            match self.peek() {
                Some(b']') => break,
                Some(b',') => {
                    self.pos += 1;
                    self.skip_white();
                }
                _ => return self.fail(messages::E_MISSING_LIST_COMMA),
            }
        }

        if self.peek() != Some(b']') {
            return self.fail(messages::E_MISSING_LIST_END);
        }
        self.pos += 1;
        Ok(node)
    }

    /// `{` opens either a dictionary or a curly-braces name chunk; try
    /// one expression followed by `}` first.
    fn parse_dictionary_or_curly(&mut self) -> ParseResult<ExprNode> {
        let open = self.pos;
        let start_inner = viml_lexis::skip_white(self.bytes, self.pos + 1);

        let mut first_key = None;
        self.pos = start_inner;
        if self.byte_at(start_inner) != b'}' {
            let key = self.parse_one()?;
            if self.peek() == Some(b'}') {
                // A name chunk: {expr} possibly followed by more pieces.
                return self.parse_name(Some((open, key)));
            }
            // A dictionary after all; the first key is already parsed
            // and the cursor sits just past it.
            first_key = Some(key);
        }

        let mut node = ExprNode::new(ExprKind::Dictionary);
        loop {
            let key = match first_key.take() {
                Some(key) => key,
                None => {
                    if matches!(self.peek(), Some(b'}') | None) {
                        break;
                    }
                    self.parse_one()?
                }
            };
            node.children.push(key);

            if self.peek() != Some(b':') {
                return self.fail(messages::E_MISSING_DICT_COLON);
            }
            self.pos += 1;
            self.skip_white();
            let value = self.parse_one()?;
            node.children.push(value);

            match self.peek() {
                Some(b'}') => break,
                Some(b',') => {
                    self.pos += 1;
                    self.skip_white();
                }
                _ => return self.fail(messages::E_MISSING_DICT_COMMA),
            }
        }

        if self.peek() != Some(b'}') {
            return self.fail(messages::E_MISSING_DICT_END);
        }
        self.pos += 1;
        Ok(node)
    }

    fn parse_option(&mut self) -> ParseResult<ExprNode> {
        let sigil = self.pos;
        let mut p = self.pos + 1;
        if matches!(self.byte_at(p), b'g' | b'l') && self.byte_at(p + 1) == b':' {
            p += 2;
        }
        if !self.byte_at(p).is_ascii_alphabetic() {
            return Err(ParseError::new(messages::E_OPTION_NAME_MISSING, self.pos));
        }
        if self.byte_at(p) == b't'
            && self.byte_at(p + 1) == b'_'
            && self.byte_at(p + 2) != 0
            && self.byte_at(p + 3) != 0
        {
            p += 4;
        } else {
            while self.byte_at(p).is_ascii_alphabetic() {
                p += 1;
            }
        }
        self.pos = p;
        Ok(ExprNode::value(ExprKind::Option, sigil + 1, p - 1))
    }

    fn parse_environment_variable(&mut self) -> ParseResult<ExprNode> {
        let sigil = self.pos;
        self.pos += 1;
        let start = self.pos;
        while self.peek().is_some_and(is_id_byte) {
            self.pos += 1;
        }
        let node = if self.pos == start {
            // "$" alone: an empty name anchored at the sigil.
            ExprNode::at(ExprKind::EnvironmentVariable, sigil + 1)
        } else {
            ExprNode::value(ExprKind::EnvironmentVariable, start, self.pos - 1)
        };
        Ok(node)
    }

    /// A variable or function name, possibly with `{expr}` pieces.
    ///
    /// `curly` carries an already-parsed leading curly chunk: the brace
    /// position and the inner expression (the cursor sits on its `}`).
    fn parse_name(&mut self, curly: Option<(usize, ExprNode)>) -> ParseResult<ExprNode> {
        let mut pieces: Vec<ExprNode> = Vec::new();
        let mut piece: Option<(usize, usize)>;

        if let Some((open, inner)) = curly {
            let mut chunk = ExprNode::at(ExprKind::CurlyName, open);
            chunk.children.push(inner);
            pieces.push(chunk);
            debug_assert_eq!(self.peek(), Some(b'}'));
            self.pos += 1;
            piece = self.take_name_piece();
        } else {
            // A hard-coded <SNR>, already translated to the internal
            // encoding, reads as a plain script-local name.
            if self.peek() == Some(K_SPECIAL)
                && self.byte_at(self.pos + 1) == KS_EXTRA
                && self.byte_at(self.pos + 2) == KE_SNR
            {
                let start = self.pos;
                self.pos += 3;
                match self.take_name_piece() {
                    Some((_, end)) => {
                        return Ok(ExprNode::value(ExprKind::SimpleVariableName, start, end));
                    }
                    None => return self.fail(messages::E_EXPECTED_VARIABLE_NAME),
                }
            }

            let start = self.pos;
            let script_len = self.script_prefix_len();
            self.pos += script_len;
            piece = self.take_name_piece();
            if piece.is_none() && script_len > 0 {
                piece = Some((start, self.pos - 1));
            } else if let Some((_, end)) = piece {
                piece = Some((start, end));
            }

            if self.peek() != Some(b'{') {
                return match piece {
                    Some((s, e)) => Ok(ExprNode::value(ExprKind::SimpleVariableName, s, e)),
                    None => self.fail(messages::E_EXPECTED_VARIABLE_NAME),
                };
            }
        }

        while self.peek() == Some(b'{') {
            if let Some((s, e)) = piece.take() {
                pieces.push(ExprNode::value(ExprKind::Identifier, s, e));
            }

            let open = self.pos;
            self.pos += 1;
            self.skip_white();
            let mut chunk = ExprNode::at(ExprKind::CurlyName, open);
            let inner = self.parse_one()?;
            chunk.children.push(inner);
            if self.peek() != Some(b'}') {
                return self.fail(messages::E_MISSING_CURLY_BRACE);
            }
            self.pos += 1;
            pieces.push(chunk);

            piece = self.take_name_piece();
        }

        if let Some((s, e)) = piece {
            pieces.push(ExprNode::value(ExprKind::Identifier, s, e));
        }

        let mut node = ExprNode::new(ExprKind::VariableName);
        node.children = pieces;
        Ok(node)
    }

    /// Consumes a run of name bytes, returning its inclusive bounds.
    fn take_name_piece(&mut self) -> Option<(usize, usize)> {
        let start = self.pos;
        self.pos = viml_lexis::skip_name(self.bytes, self.pos);
        if self.pos == start { None } else { Some((start, self.pos - 1)) }
    }

    /// `<SID>`/`<SNR>`/`s:` prefix length at the cursor, or zero.
    fn script_prefix_len(&self) -> usize {
        let rest = &self.bytes[self.pos..];
        if rest.len() >= 5
            && rest[0] == b'<'
            && (rest[1..5].eq_ignore_ascii_case(b"SID>") || rest[1..5].eq_ignore_ascii_case(b"SNR>"))
        {
            5
        } else {
            0
        }
    }

    /// The postfix chain: `expr[i]`, `expr[i:j]`, `expr.key`, `expr(…)`,
    /// in any combination as long as no whitespace precedes the postfix
    /// token.
    fn parse_postfix_chain(&mut self, node: ExprNode) -> ParseResult<ExprNode> {
        self.postfix_chain(node, true)
    }

    fn postfix_chain(&mut self, mut node: ExprNode, allow_call: bool) -> ParseResult<ExprNode> {
        while !self.prev_is_white() {
            match self.peek() {
                Some(b'.') => match self.parse_dot_subscript(node)? {
                    (new_node, true) => node = new_node,
                    (new_node, false) => return Ok(new_node),
                },
                Some(b'(') if allow_call => node = self.parse_call(node)?,
                Some(b'[') => node = self.parse_subscript(node)?,
                _ => break,
            }
        }
        Ok(node)
    }

    /// `.key` lookup. The boolean is false when the dot was left alone
    /// for the concatenation operator to claim.
    fn parse_dot_subscript(&mut self, node: ExprNode) -> ParseResult<(ExprNode, bool)> {
        let dot = self.pos;
        let mut e = dot + 1;
        while is_id_byte(self.byte_at(e)) {
            e += 1;
        }
        if e == dot + 1 {
            return Ok((node, false));
        }
        // Workaround for the scope ambiguity: "a.b:var" is a concat with
        // a scoped name, not a dictionary lookup.
        if e - dot == 2 && self.byte_at(e) == b':' && SCOPE_CHARS.contains(&self.byte_at(dot + 1)) {
            return Ok((node, false));
        }
        let mut wrapped = ExprNode::value(ExprKind::ConcatOrSubscript, dot + 1, e - 1);
        wrapped.children.push(node);
        self.pos = e;
        Ok((wrapped, true))
    }

    fn parse_call(&mut self, callee: ExprNode) -> ParseResult<ExprNode> {
        let mut node = ExprNode::wrap(ExprKind::Call, callee);
        let mut argcount = 0;

        loop {
            self.pos += 1; // the '(' or ','
            self.skip_white();
            if matches!(self.peek(), Some(b')' | b',') | None) {
                break;
            }
            if argcount >= MAX_FUNC_ARGS {
                return self.fail(messages::E_TOO_MANY_ARGS);
            }
            let arg = self.parse_one()?;
            node.children.push(arg);
            argcount += 1;
            if self.peek() != Some(b',') {
                break;
            }
        }

        if self.peek() != Some(b')') {
            return self.fail(messages::E_EXPECTED_PAREN);
        }
        self.pos += 1;
        self.skip_white();
        Ok(node)
    }

    fn parse_subscript(&mut self, base: ExprNode) -> ParseResult<ExprNode> {
        let mut node = ExprNode::wrap(ExprKind::Subscript, base);

        self.pos += 1; // the '['
        self.skip_white();
        if self.peek() == Some(b':') {
            node.children.push(ExprNode::at(ExprKind::EmptySubscript, self.pos));
        } else {
            let index = self.parse_one()?;
            node.children.push(index);
        }

        if self.peek() == Some(b':') {
            self.pos += 1;
            self.skip_white();
            if self.peek() == Some(b']') {
                node.children.push(ExprNode::at(ExprKind::EmptySubscript, self.pos));
            } else {
                let upper = self.parse_one()?;
                node.children.push(upper);
            }
        }

        if self.peek() != Some(b']') {
            return self.fail(messages::E_MISSING_BRACKET);
        }
        self.pos += 1;
        self.skip_white();
        Ok(node)
    }

    /// Parses an assignable expression: a name (with optional curly
    /// pieces), an option, register or environment variable, followed by
    /// any subscript chain. A call is not an lvalue, so a following `(`
    /// is left alone (which also keeps `:function F(…)` signatures
    /// parseable).
    pub fn parse_lvalue(&mut self) -> ParseResult<ExprNode> {
        let start = self.pos;
        let node = match self.peek() {
            Some(b'&') => self.parse_option()?,
            Some(b'$') => self.parse_environment_variable()?,
            Some(b'@') => {
                self.pos += 1;
                let end = if self.peek().is_some() {
                    self.pos += 1;
                    self.pos - 1
                } else {
                    start
                };
                ExprNode::value(ExprKind::Register, start, end)
            }
            Some(b'{') => {
                let open = self.pos;
                self.pos += 1;
                self.skip_white();
                let inner = self.parse_one()?;
                if self.peek() != Some(b'}') {
                    return self.fail(messages::E_MISSING_CURLY_BRACE);
                }
                self.parse_name(Some((open, inner)))?
            }
            _ => self.parse_name(None)?,
        };
        self.skip_white();
        self.postfix_chain(node, false)
    }
}
