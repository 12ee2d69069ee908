//! Canonical textual echo of the command AST.
//!
//! The format is line-oriented and deterministic: one command per line,
//! two spaces of indent per block depth, numbers in uppercase hex,
//! address glyphs matching the source syntax, expressions in a typed
//! prefix form with `[+text+]` position markers. Syntax-error nodes span
//! three lines: the offending line, a caret line and the message. Two
//! independent parses of the same input dump byte-identically, which is
//! what makes this the golden-test oracle.

use viml_ast::{
    AddressFollowup, AddressKind, ArgType, CmdArg, CmdKind, CmdNode, Count, ExFlags, ExprNode,
    ExprSpan, Expression, FuncFlags, MapFlags, MenuFlags, Range,
};
use viml_cmddefs::{CmdFlags, SubParser, cmddef};

/// Dumps a command list, one command per line.
pub fn dump_cmds(nodes: &[CmdNode]) -> String {
    let mut out = String::new();
    dump_list(nodes, 0, &mut out);
    out
}

/// Dumps one expression tree.
pub fn dump_expr(expression: &Expression, node: &ExprNode) -> String {
    let mut out = String::new();
    expr_repr(node, &expression.source, &mut out);
    out
}

fn dump_list(nodes: &[CmdNode], indent: usize, out: &mut String) {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        node_repr(node, indent, out);
    }
}

/// Uppercase hex without sign.
fn unumber_repr(value: u64, out: &mut String) {
    out.push_str(&format!("{value:X}"));
}

/// Uppercase hex with an explicit sign.
fn number_repr(value: i64, out: &mut String) {
    if value < 0 {
        out.push('-');
        unumber_repr(value.unsigned_abs(), out);
    } else {
        out.push('+');
        unumber_repr(value as u64, out);
    }
}

fn address_repr(kind: &AddressKind, out: &mut String) {
    match kind {
        AddressKind::Missing => {}
        AddressKind::Fixed(line) => unumber_repr(*line, out),
        AddressKind::End => out.push('$'),
        AddressKind::Current => out.push('.'),
        AddressKind::Mark(mark) => {
            out.push('\'');
            out.push(*mark);
        }
        AddressKind::ForwardSearch(regex) => {
            out.push('/');
            out.push_str(regex.as_str());
            out.push('/');
        }
        AddressKind::BackwardSearch(regex) => {
            out.push('?');
            out.push_str(regex.as_str());
            out.push('?');
        }
        AddressKind::ForwardPreviousSearch => out.push_str("\\/"),
        AddressKind::BackwardPreviousSearch => out.push_str("\\?"),
        AddressKind::SubstituteSearch => out.push_str("\\&"),
    }
}

fn followup_repr(followup: &AddressFollowup, out: &mut String) {
    match followup {
        AddressFollowup::Shift(shift) => number_repr(*shift, out),
        AddressFollowup::ForwardPattern(regex) => {
            out.push('/');
            out.push_str(regex.as_str());
            out.push('/');
        }
        AddressFollowup::BackwardPattern(regex) => {
            out.push('?');
            out.push_str(regex.as_str());
            out.push('?');
        }
    }
}

fn range_repr(range: &Range, out: &mut String) {
    for (i, element) in range.elements().iter().enumerate() {
        if i > 0 {
            let previous = &range.elements()[i - 1];
            out.push(if previous.set_cursor { ';' } else { ',' });
        }
        address_repr(&element.address.kind, out);
        for followup in &element.address.followups {
            followup_repr(followup, out);
        }
    }
}

/// Key sequences may contain internal non-UTF-8 bytes; those print as
/// `\xHH` escapes.
fn keyseq_repr(bytes: &[u8], out: &mut String) {
    for &b in bytes {
        if (0x20..0x7f).contains(&b) {
            out.push(b as char);
        } else {
            out.push_str(&format!("\\x{b:02X}"));
        }
    }
}

fn expr_repr(node: &ExprNode, source: &str, out: &mut String) {
    out.push_str(node.kind.dump_glyph());
    out.push_str(node.kind.case_suffix());

    match node.span {
        ExprSpan::Missing => {}
        ExprSpan::Point(at) => {
            out.push_str("[!");
            out.push_str(source.get(at..at + 1).unwrap_or("?"));
            out.push_str("!]");
        }
        ExprSpan::Range(start, end) => {
            out.push_str("[+");
            out.push_str(source.get(start..end + 1).unwrap_or("?"));
            out.push_str("+]");
        }
    }

    if !node.children.is_empty() {
        out.push('(');
        for (i, child) in node.children.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            expr_repr(child, source, out);
        }
        out.push(')');
    }
}

/// Top-level expression sequences are space-separated.
fn exprs_repr(expression: &Expression, out: &mut String) {
    for (i, node) in expression.nodes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        expr_repr(node, &expression.source, out);
    }
}

fn indent_spaces(indent: usize, out: &mut String) {
    for _ in 0..indent {
        out.push(' ');
    }
}

fn syntax_error_repr(node: &CmdNode, indent: usize, out: &mut String) {
    let line = node.args[0].as_string().unwrap_or("");
    let message = node.args[1].as_string().unwrap_or("");
    let offset = match node.args[2] {
        CmdArg::Column(offset) => offset,
        _ => 0,
    };
    indent_spaces(indent, out);
    out.push_str(line);
    out.push('\n');
    indent_spaces(indent, out);
    for _ in 0..offset {
        out.push(' ');
    }
    out.push('^');
    out.push('\n');
    indent_spaces(indent, out);
    out.push_str(message);
}

fn map_args_repr(node: &CmdNode, out: &mut String) {
    let flags = MapFlags::from_bits_truncate(node.args[0].as_flags());
    if !flags.is_empty() {
        out.push(' ');
    }
    for (flag, text) in [
        (MapFlags::BUFFER, "<buffer>"),
        (MapFlags::NOWAIT, "<nowait>"),
        (MapFlags::SILENT, "<silent>"),
        (MapFlags::SPECIAL, "<special>"),
        (MapFlags::SCRIPT, "<script>"),
        (MapFlags::EXPR, "<expr>"),
        (MapFlags::UNIQUE, "<unique>"),
    ] {
        if flags.contains(flag) {
            out.push_str(text);
        }
    }

    if let CmdArg::KeySeq(Some(lhs)) = &node.args[1] {
        out.push(' ');
        keyseq_repr(lhs.as_bytes(), out);

        if let CmdArg::Expr(Some(expression)) = &node.args[3] {
            out.push(' ');
            exprs_repr(expression, out);
        } else if let CmdArg::Command(Some(error_node)) = &node.args[4] {
            out.push('\n');
            node_repr(error_node, 0, out);
        } else if let CmdArg::KeySeq(Some(rhs)) = &node.args[2] {
            out.push(' ');
            keyseq_repr(rhs.as_bytes(), out);
        }
    }
}

fn menu_args_repr(node: &CmdNode, out: &mut String) {
    let flags = MenuFlags::from_bits_truncate(node.args[0].as_flags());
    if flags.intersects(MenuFlags::SILENT | MenuFlags::SPECIAL | MenuFlags::SCRIPT) {
        out.push(' ');
    }
    for (flag, text) in [
        (MenuFlags::SILENT, "<silent>"),
        (MenuFlags::SPECIAL, "<special>"),
        (MenuFlags::SCRIPT, "<script>"),
    ] {
        if flags.contains(flag) {
            out.push_str(text);
        }
    }

    if let Some(icon) = node.args[1].as_string() {
        out.push_str(" icon=");
        out.push_str(icon);
    }

    if let CmdArg::Numbers(priorities) = &node.args[2] {
        if !priorities.is_empty() {
            out.push(' ');
            for (i, &priority) in priorities.iter().enumerate() {
                if i > 0 {
                    out.push('.');
                }
                if priority != 500 {
                    unumber_repr(priority.max(0) as u64, out);
                }
            }
        }
    }

    if flags.contains(MenuFlags::DISABLE) {
        out.push_str(" disable");
    }
    if flags.contains(MenuFlags::ENABLE) {
        out.push_str(" enable");
    }

    if let CmdArg::MenuName(items) = &node.args[3] {
        for (i, item) in items.iter().enumerate() {
            out.push(if i == 0 { ' ' } else { '.' });
            out.push_str(&item.name);
        }
        if !items.is_empty() {
            if let Some(text) = node.args[4].as_string() {
                out.push_str("<Tab>");
                out.push_str(text);
            }
        }
    }

    if let CmdArg::KeySeq(Some(rhs)) = &node.args[5] {
        out.push(' ');
        keyseq_repr(rhs.as_bytes(), out);
    }
}

fn function_args_repr(node: &CmdNode, out: &mut String) {
    if let Some(regex) = node.args[0].as_regex() {
        out.push_str(" /");
        out.push_str(regex.as_str());
        out.push('/');
        return;
    }
    let Some(name) = node.args[1].as_expr() else { return };
    out.push(' ');
    exprs_repr(name, out);

    let flags = FuncFlags::from_bits_truncate(node.args[3].as_flags());
    if !flags.contains(FuncFlags::DEF) {
        return;
    }
    out.push('(');
    if let CmdArg::Strings(params) = &node.args[2] {
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(param);
        }
        if flags.contains(FuncFlags::VARARGS) {
            if !params.is_empty() {
                out.push_str(", ");
            }
            out.push_str("...");
        }
    }
    out.push(')');
    if flags.contains(FuncFlags::RANGE) {
        out.push_str(" range");
    }
    if flags.contains(FuncFlags::ABORT) {
        out.push_str(" abort");
    }
    if flags.contains(FuncFlags::DICT) {
        out.push_str(" dict");
    }
}

fn append_args_repr(node: &CmdNode, out: &mut String) {
    if let CmdArg::Lines(lines) = &node.args[0] {
        for line in lines {
            out.push('\n');
            out.push_str(line);
        }
        out.push_str("\n.");
    }
}

fn generic_args_repr(node: &CmdNode, skip: usize, out: &mut String) {
    let def = cmddef(node.kind);
    for (i, arg) in node.args.iter().enumerate().skip(skip) {
        match def.arg_types.get(i) {
            Some(ArgType::Expr | ArgType::Exprs | ArgType::AssignLhs) => {
                if let Some(expression) = arg.as_expr() {
                    out.push(' ');
                    exprs_repr(expression, out);
                }
            }
            Some(ArgType::String | ArgType::Pattern | ArgType::Glob | ArgType::Replacement) => {
                if let Some(text) = arg.as_string() {
                    out.push(' ');
                    out.push_str(text);
                }
            }
            Some(ArgType::Regex) => {
                if let Some(regex) = arg.as_regex() {
                    out.push(' ');
                    out.push('/');
                    out.push_str(regex.as_str());
                    out.push('/');
                }
            }
            Some(ArgType::KeySeq) => {
                if let CmdArg::KeySeq(Some(seq)) = arg {
                    out.push(' ');
                    keyseq_repr(seq.as_bytes(), out);
                }
            }
            Some(ArgType::Char) => {
                if let CmdArg::Char(Some(c)) = arg {
                    out.push(' ');
                    out.push(*c);
                }
            }
            Some(ArgType::Address) => {
                if let CmdArg::Address(Some(address)) = arg {
                    out.push(' ');
                    address_repr(&address.kind, out);
                    for followup in &address.followups {
                        followup_repr(followup, out);
                    }
                }
            }
            Some(ArgType::MenuName) => {
                if let CmdArg::MenuName(items) = arg {
                    for (i, item) in items.iter().enumerate() {
                        out.push(if i == 0 { ' ' } else { '.' });
                        out.push_str(&item.name);
                    }
                }
            }
            _ => {}
        }
    }
}

fn node_repr(node: &CmdNode, indent: usize, out: &mut String) {
    if node.kind == CmdKind::SyntaxError {
        syntax_error_repr(node, indent, out);
        return;
    }

    let def = cmddef(node.kind);
    indent_spaces(indent, out);
    range_repr(&node.range, out);

    if let Some(name) = &node.name {
        out.push_str(name);
    } else if let Some(name) = def.name {
        out.push_str(name);
    }

    if node.bang {
        out.push('!');
    }

    match &node.count {
        Count::Missing => {}
        Count::Count(value) | Count::Buffer(value) => {
            out.push(' ');
            unumber_repr((*value).max(0) as u64, out);
        }
        Count::Register(register) => {
            out.push(' ');
            out.push(*register);
        }
        Count::ExprRegister(expression) => {
            out.push(' ');
            exprs_repr(expression, out);
        }
    }

    if !node.exflags.is_empty() {
        out.push(' ');
        if node.exflags.contains(ExFlags::LIST) {
            out.push('l');
        }
        if node.exflags.contains(ExFlags::LNR) {
            out.push('#');
        }
        if node.exflags.contains(ExFlags::PRINT) {
            out.push('p');
        }
    }

    match def.parser {
        Some(SubParser::Append) => append_args_repr(node, out),
        Some(SubParser::Map) => map_args_repr(node, out),
        Some(SubParser::MapClear) => {
            if node.args[0].as_flags() != 0 {
                out.push_str(" <buffer>");
            }
        }
        Some(SubParser::Menu) => menu_args_repr(node, out),
        Some(SubParser::Function) => function_args_repr(node, out),
        _ => generic_args_repr(node, 0, out),
    }

    if !node.children.is_empty() {
        if def.flags.contains(CmdFlags::ISMODIFIER) {
            out.push(' ');
            dump_list(&node.children, 0, out);
        } else {
            out.push('\n');
            dump_list(&node.children, indent + 2, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use viml_ast::{Address, CommandPosition, ExprKind, RangeElement, Regex};

    #[test]
    fn test_number_reprs() {
        let mut out = String::new();
        unumber_repr(255, &mut out);
        assert_eq!(out, "FF");
        let mut out = String::new();
        number_repr(-2, &mut out);
        assert_eq!(out, "-2");
        let mut out = String::new();
        number_repr(16, &mut out);
        assert_eq!(out, "+10");
    }

    #[test]
    fn test_range_repr_separators() {
        let range = Range(vec![
            RangeElement {
                address: Address { kind: AddressKind::Fixed(1), followups: vec![] },
                set_cursor: true,
            },
            RangeElement {
                address: Address { kind: AddressKind::End, followups: vec![] },
                set_cursor: false,
            },
        ]);
        let mut out = String::new();
        range_repr(&range, &mut out);
        assert_eq!(out, "1;$");
    }

    #[test]
    fn test_followup_repr() {
        let mut out = String::new();
        followup_repr(&AddressFollowup::Shift(-3), &mut out);
        followup_repr(&AddressFollowup::ForwardPattern(Regex("ab".into())), &mut out);
        assert_eq!(out, "-3/ab/");
    }

    #[test]
    fn test_expr_repr_markers() {
        let expression = Expression::new("1 + 2", vec![]);
        let mut add = ExprNode::new(ExprKind::Add);
        add.children.push(ExprNode::value(ExprKind::DecimalNumber, 0, 0));
        add.children.push(ExprNode::value(ExprKind::DecimalNumber, 4, 4));
        assert_eq!(dump_expr(&expression, &add), "+(N[+1+], N[+2+])");
    }

    #[test]
    fn test_keyseq_repr_escapes() {
        let mut out = String::new();
        keyseq_repr(&[0x80, b'k', b'2'], &mut out);
        assert_eq!(out, "\\x80k2");
    }

    #[test]
    fn test_syntax_error_block() {
        let mut node = CmdNode::new(
            CmdKind::SyntaxError,
            cmddef(CmdKind::SyntaxError).arg_types,
            CommandPosition::start_of("<t>"),
        );
        node.args[0] = CmdArg::String(Some("bogus line".to_owned()));
        node.args[1] = CmdArg::String(Some("E492: Not an editor command".to_owned()));
        node.args[2] = CmdArg::Column(2);
        let dumped = dump_cmds(std::slice::from_ref(&node));
        assert_eq!(dumped, "bogus line\n  ^\nE492: Not an editor command");
    }
}
