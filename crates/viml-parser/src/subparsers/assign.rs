//! Sub-parsers for assignments and function definitions.

use crate::expr::ExprParser;
use viml_ast::{
    CmdArg, CmdNode, ExprKind, ExprNode, Expression, FuncFlags, LetAssignType, Regex,
};
use viml_error::{ParseError, ParseResult, messages};
use viml_lexis::is_id_byte;

const ARG_LET_ASS_TYPE: usize = 0;
const ARG_LET_LHS: usize = 1;
const ARG_LET_RHS: usize = 2;

const ARG_FOR_STR: usize = 0;
const ARG_FOR_LHS: usize = 1;
const ARG_FOR_RHS: usize = 2;

const ARG_FUNC_REG: usize = 0;
const ARG_FUNC_NAME: usize = 1;
const ARG_FUNC_ARGS: usize = 2;
const ARG_FUNC_FLAGS: usize = 3;

/// Parses an assignment target: one lvalue, or a `[a, b; rest]`
/// destructuring list.
fn parse_lhs(parser: &mut ExprParser) -> ParseResult<ExprNode> {
    if parser.peek() != Some(b'[') {
        return parser.parse_lvalue();
    }

    let mut list = ExprNode::new(ExprKind::List);
    parser.advance(1);
    parser.skip_white();

    loop {
        let item = parser.parse_lvalue()?;
        list.children.push(item);
        parser.skip_white();
        match parser.peek() {
            Some(b',') => {
                parser.advance(1);
                parser.skip_white();
            }
            Some(b';') => {
                parser.advance(1);
                parser.skip_white();
                let rest = parser.parse_lvalue()?;
                list.children.push(ExprNode::wrap(ExprKind::ListRest, rest));
                parser.skip_white();
                if parser.peek() == Some(b';') {
                    return Err(ParseError::new(messages::E_LET_REST_LAST, parser.pos()));
                }
                break;
            }
            _ => break,
        }
    }

    if parser.peek() != Some(b']') {
        return Err(ParseError::new(messages::E_MISSING_BRACKET, parser.pos()));
    }
    parser.advance(1);
    parser.skip_white();
    Ok(list)
}

pub(crate) fn parse_let(arg: &str, node: &mut CmdNode) -> ParseResult<usize> {
    let mut parser = ExprParser::new(arg);
    parser.skip_white();
    if parser.at_end() {
        // Bare :let lists all variables.
        return Ok(parser.pos());
    }

    let lhs = parse_lhs(&mut parser)?;
    parser.skip_white();

    let ass_type = match (parser.peek(), parser.peek_at(1)) {
        (Some(b'='), _) => {
            parser.advance(1);
            LetAssignType::Assign
        }
        (Some(b'+'), Some(b'=')) => {
            parser.advance(2);
            LetAssignType::Add
        }
        (Some(b'-'), Some(b'=')) => {
            parser.advance(2);
            LetAssignType::Subtract
        }
        (Some(b'.'), Some(b'=')) => {
            parser.advance(2);
            LetAssignType::Append
        }
        (None, _) => {
            // :let with names only lists the named variables.
            node.args[ARG_LET_LHS] =
                CmdArg::AssignLhs(Some(Expression::new(arg, vec![lhs])));
            return Ok(parser.pos());
        }
        _ => return Err(ParseError::new(messages::E_LET_UNEXPECTED, parser.pos())),
    };

    parser.skip_white();
    let rhs = parser.parse_one()?;

    node.args[ARG_LET_ASS_TYPE] = CmdArg::Flags(ass_type.as_u32());
    node.args[ARG_LET_LHS] = CmdArg::AssignLhs(Some(Expression::new(arg, vec![lhs])));
    node.args[ARG_LET_RHS] = CmdArg::Expr(Some(Expression::new(arg, vec![rhs])));
    Ok(parser.pos())
}

pub(crate) fn parse_for(arg: &str, node: &mut CmdNode) -> ParseResult<usize> {
    let mut parser = ExprParser::new(arg);
    parser.skip_white();

    let lhs = parse_lhs(&mut parser)?;
    parser.skip_white();

    let bytes = arg.as_bytes();
    let p = parser.pos();
    if !(bytes[p..].starts_with(b"in") && !bytes.get(p + 2).copied().is_some_and(is_id_byte)) {
        return Err(ParseError::new(messages::E_FOR_MISSING_IN, p));
    }
    parser.advance(2);
    parser.skip_white();
    let rhs = parser.parse_one()?;

    node.args[ARG_FOR_STR] = CmdArg::String(Some(arg.to_owned()));
    node.args[ARG_FOR_LHS] = CmdArg::AssignLhs(Some(Expression::new(arg, vec![lhs])));
    node.args[ARG_FOR_RHS] = CmdArg::Expr(Some(Expression::new(arg, vec![rhs])));
    Ok(parser.pos())
}

/// One or more lvalues (`:unlet`, `:delfunction`).
pub(crate) fn parse_lvals(arg: &str, node: &mut CmdNode) -> ParseResult<usize> {
    let mut parser = ExprParser::new(arg);
    let nodes = collect_lvals(&mut parser)?;
    node.args[0] = CmdArg::Exprs(Some(Expression::new(arg, nodes)));
    Ok(parser.pos())
}

/// Optional depth plus lvalues (`:lockvar`, `:unlockvar`).
pub(crate) fn parse_lockvar(arg: &str, node: &mut CmdNode) -> ParseResult<usize> {
    let mut parser = ExprParser::new(arg);
    parser.skip_white();
    if parser.peek().is_some_and(|b| b.is_ascii_digit()) {
        let (depth, after) = viml_lexis::get_digits(arg.as_bytes(), parser.pos());
        parser.set_pos(after);
        node.args[1] = CmdArg::UNumber(depth.max(0) as u64);
    }
    let nodes = collect_lvals(&mut parser)?;
    node.args[0] = CmdArg::Exprs(Some(Expression::new(arg, nodes)));
    Ok(parser.pos())
}

fn collect_lvals(parser: &mut ExprParser) -> ParseResult<Vec<ExprNode>> {
    let mut nodes = Vec::new();
    loop {
        parser.skip_white();
        if parser.at_end() || matches!(parser.peek(), Some(b'|' | b'\n')) {
            break;
        }
        nodes.push(parser.parse_lvalue()?);
    }
    if nodes.is_empty() {
        return Err(ParseError::new(messages::E_EXPECTED_VARIABLE_NAME, parser.pos()));
    }
    Ok(nodes)
}

pub(crate) fn parse_function(arg: &str, node: &mut CmdNode) -> ParseResult<usize> {
    let bytes = arg.as_bytes();
    let mut parser = ExprParser::new(arg);
    parser.skip_white();

    if parser.at_end() {
        // Bare :function lists all functions.
        return Ok(parser.pos());
    }

    if parser.peek() == Some(b'/') {
        // :function /pattern lists matching functions.
        let start = parser.pos() + 1;
        let mut i = start;
        while i < bytes.len() && bytes[i] != b'/' {
            if bytes[i] == b'\\' && i + 1 < bytes.len() {
                i += 1;
            }
            i += 1;
        }
        let pattern = arg[start..i].to_owned();
        if i < bytes.len() {
            i += 1;
        }
        node.args[ARG_FUNC_REG] = CmdArg::Regex(Some(Regex(pattern)));
        return Ok(i);
    }

    let name = parser.parse_lvalue()?;
    parser.skip_white();

    if parser.peek() != Some(b'(') {
        // Listing form: :function Name
        node.args[ARG_FUNC_NAME] = CmdArg::AssignLhs(Some(Expression::new(arg, vec![name])));
        return Ok(parser.pos());
    }
    parser.advance(1);

    let mut flags = FuncFlags::DEF;
    let mut params: Vec<String> = Vec::new();
    loop {
        parser.skip_white();
        match parser.peek() {
            Some(b')') => {
                parser.advance(1);
                break;
            }
            Some(b'.') if bytes[parser.pos()..].starts_with(b"...") => {
                flags |= FuncFlags::VARARGS;
                parser.advance(3);
                parser.skip_white();
                if parser.peek() != Some(b')') {
                    return Err(ParseError::new(messages::E_FUNC_ARG, parser.pos()));
                }
                parser.advance(1);
                break;
            }
            Some(b) if b.is_ascii_alphabetic() || b == b'_' => {
                let start = parser.pos();
                let end = viml_lexis::skip_id(bytes, start);
                params.push(arg[start..end].to_owned());
                parser.set_pos(end);
                parser.skip_white();
                match parser.peek() {
                    Some(b',') => parser.advance(1),
                    Some(b')') => {}
                    _ => return Err(ParseError::new(messages::E_FUNC_ARG, parser.pos())),
                }
            }
            _ => return Err(ParseError::new(messages::E_FUNC_ARG, parser.pos())),
        }
    }

    // The flag tail: range, abort, dict in any order.
    loop {
        parser.skip_white();
        let start = parser.pos();
        let end = viml_lexis::skip_id(bytes, start);
        match &arg[start..end] {
            "range" => flags |= FuncFlags::RANGE,
            "abort" => flags |= FuncFlags::ABORT,
            "dict" => flags |= FuncFlags::DICT,
            _ => break,
        }
        parser.set_pos(end);
    }

    node.args[ARG_FUNC_NAME] = CmdArg::AssignLhs(Some(Expression::new(arg, vec![name])));
    node.args[ARG_FUNC_ARGS] = CmdArg::Strings(params);
    node.args[ARG_FUNC_FLAGS] = CmdArg::Flags(flags.bits());
    Ok(parser.pos())
}
