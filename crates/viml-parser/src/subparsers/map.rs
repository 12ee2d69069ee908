//! Sub-parsers for `:map`, `:abbrev`, `:menu` and their clears.

use crate::ex::{CTRL_V, create_error_node};
use crate::expr::ExprParser;
use crate::{ParserOptions, PocFlags};
use viml_ast::{CmdArg, CmdNode, CommandPosition, Expression, MapFlags, MenuFlags, MenuItem};
use viml_error::{ParseError, ParseResult, messages};
use viml_keycodes::{lrswap, replace_termcodes};

// Slot layout of the map family: flags, LHS, RHS, parsed RHS expression,
// error node of a failed expression parse.
const ARG_MAP_FLAGS: usize = 0;
const ARG_MAP_LHS: usize = 1;
const ARG_MAP_RHS: usize = 2;

// Slot layout of the menu family.
const ARG_MENU_FLAGS: usize = 0;
const ARG_MENU_ICON: usize = 1;
const ARG_MENU_PRI: usize = 2;
const ARG_MENU_NAME: usize = 3;
const ARG_MENU_TEXT: usize = 4;
const ARG_MENU_RHS: usize = 5;

const MENU_DEFAULT_PRI: i64 = 500;
const MENU_DEPTH: usize = 10;

/// Stores the translated RHS of a mapping or menu, and for
/// `<expr>`-mappings the parsed expression (or the syntax-error node of
/// a failed parse).
fn set_node_rhs(
    rhs: &str,
    rhs_idx: usize,
    node: &mut CmdNode,
    special: bool,
    expr: bool,
    o: &ParserOptions,
    position: &CommandPosition,
) {
    let mut translated =
        replace_termcodes(rhs.as_bytes(), false, true, special, o.cpo(), &o.key_env);

    if o.flags.contains(PocFlags::ALTKEYMAP) && o.flags.contains(PocFlags::RL) {
        lrswap(&mut translated.0);
    }

    if expr {
        let mut parser = ExprParser::new(rhs);
        parser.skip_white();
        match parser.parse_one() {
            Ok(parsed) => {
                parser.skip_white();
                if parser.at_end() {
                    node.args[rhs_idx + 1] =
                        CmdArg::Expr(Some(Expression::new(rhs, vec![parsed])));
                } else {
                    let err = ParseError::new(messages::E_TRAILING_EXPR, parser.pos());
                    node.args[rhs_idx + 2] =
                        CmdArg::Command(Some(Box::new(create_error_node(err, position, rhs))));
                }
            }
            Err(err) => {
                node.args[rhs_idx + 2] =
                    CmdArg::Command(Some(Box::new(create_error_node(err, position, rhs))));
            }
        }
    }
    node.args[rhs_idx] = CmdArg::KeySeq(Some(translated));
}

/// Consumes the `<buffer>`-style attribute block of a mapping.
fn map_attributes(bytes: &[u8], at: &mut usize) -> MapFlags {
    let mut flags = MapFlags::empty();
    loop {
        let matched = [
            ("<buffer>", MapFlags::BUFFER),
            ("<nowait>", MapFlags::NOWAIT),
            ("<silent>", MapFlags::SILENT),
            ("<special>", MapFlags::SPECIAL),
            ("<script>", MapFlags::SCRIPT),
            ("<expr>", MapFlags::EXPR),
            ("<unique>", MapFlags::UNIQUE),
        ]
        .into_iter()
        .find(|(name, _)| bytes[*at..].starts_with(name.as_bytes()));
        match matched {
            Some((name, flag)) => {
                flags |= flag;
                *at = viml_lexis::skip_white(bytes, *at + name.len());
            }
            None => break,
        }
    }
    flags
}

/// Scans a mapping LHS: up to whitespace, honouring Ctrl-V and (policy
/// permitting) backslash escapes.
fn scan_lhs(bytes: &[u8], at: usize, do_backslash: bool) -> usize {
    let mut i = at;
    while i < bytes.len() && !matches!(bytes[i], b' ' | b'\t') {
        if (bytes[i] == CTRL_V || (do_backslash && bytes[i] == b'\\')) && i + 1 < bytes.len() {
            i += 1;
        }
        i += 1;
    }
    i
}

pub(crate) fn parse_map(
    arg: &str,
    node: &mut CmdNode,
    o: &ParserOptions,
    position: &CommandPosition,
) -> ParseResult<usize> {
    let bytes = arg.as_bytes();
    let do_backslash = !o.flags.contains(PocFlags::CPO_BSLASH);
    let mut p = 0usize;

    let flags = map_attributes(bytes, &mut p);
    node.args[ARG_MAP_FLAGS] = CmdArg::Flags(flags.bits());

    let lhs_start = p;
    let lhs_end = scan_lhs(bytes, p, do_backslash);
    p = viml_lexis::skip_white(bytes, lhs_end);
    let rhs = &arg[p..];

    if lhs_end > lhs_start {
        let special = flags.contains(MapFlags::SPECIAL);
        let lhs = replace_termcodes(
            &bytes[lhs_start..lhs_end],
            true,
            true,
            special,
            o.cpo(),
            &o.key_env,
        );
        node.args[ARG_MAP_LHS] = CmdArg::KeySeq(Some(lhs));
    }

    if !rhs.is_empty() {
        if rhs.eq_ignore_ascii_case("<nop>") {
            node.args[ARG_MAP_RHS] = CmdArg::KeySeq(Some(viml_keycodes::KeySequence::default()));
        } else {
            set_node_rhs(
                rhs,
                ARG_MAP_RHS,
                node,
                flags.contains(MapFlags::SPECIAL),
                flags.contains(MapFlags::EXPR),
                o,
                position,
            );
        }
    }

    Ok(arg.len())
}

pub(crate) fn parse_unmap(arg: &str, node: &mut CmdNode, o: &ParserOptions) -> ParseResult<usize> {
    let bytes = arg.as_bytes();
    let do_backslash = !o.flags.contains(PocFlags::CPO_BSLASH);
    let mut p = 0usize;

    let mut flags = MapFlags::empty();
    if bytes.starts_with(b"<buffer>") {
        flags |= MapFlags::BUFFER;
        p = viml_lexis::skip_white(bytes, 8);
    }
    node.args[0] = CmdArg::Flags(flags.bits());

    let lhs_end = scan_lhs(bytes, p, do_backslash);
    if lhs_end > p {
        let lhs = replace_termcodes(&bytes[p..lhs_end], true, true, false, o.cpo(), &o.key_env);
        node.args[1] = CmdArg::KeySeq(Some(lhs));
    }
    Ok(lhs_end)
}

pub(crate) fn parse_mapclear(arg: &str, node: &mut CmdNode) -> ParseResult<usize> {
    if arg == "<buffer>" {
        node.args[0] = CmdArg::Flags(1);
        Ok(arg.len())
    } else {
        node.args[0] = CmdArg::Flags(0);
        Ok(0)
    }
}

/// Splits a dotted menu path (with `\`/Ctrl-V escapes) and the optional
/// `<Tab>` text into items plus label text.
fn scan_menu_path(
    bytes: &[u8],
    at: &mut usize,
    want_text: bool,
) -> ParseResult<(Vec<MenuItem>, Option<String>)> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut text: Option<String> = None;
    let mut i = *at;

    if bytes.get(i) == Some(&b'.') {
        return Err(ParseError::new(messages::E_EXPECTED_MENU_NAME, i));
    }

    while i < bytes.len() && !matches!(bytes[i], b' ' | b'\t') {
        match &mut text {
            None => {
                if (bytes[i] == b'\\' || bytes[i] == CTRL_V) && i + 1 < bytes.len() {
                    i += 1;
                    if bytes[i] == b'\t' && want_text {
                        if current.is_empty() && items.is_empty() {
                            return Err(ParseError::new(messages::E_EMPTY_MENU_NAME, i));
                        }
                        items.push(MenuItem { name: std::mem::take(&mut current) });
                        text = Some(String::new());
                        i += 1;
                        continue;
                    }
                    current.push(bytes[i] as char);
                    i += 1;
                } else if want_text
                    && bytes.len() - i >= 5
                    && bytes[i..i + 5].eq_ignore_ascii_case(b"<Tab>")
                {
                    if current.is_empty() && items.is_empty() {
                        return Err(ParseError::new(messages::E_EMPTY_MENU_NAME, i));
                    }
                    items.push(MenuItem { name: std::mem::take(&mut current) });
                    text = Some(String::new());
                    i += 5;
                } else if bytes[i] == b'.' {
                    if current.is_empty() {
                        return Err(ParseError::new(messages::E_EMPTY_MENU_NAME, i));
                    }
                    items.push(MenuItem { name: std::mem::take(&mut current) });
                    i += 1;
                } else {
                    current.push(bytes[i] as char);
                    i += 1;
                }
            }
            Some(label) => {
                if (bytes[i] == b'\\' || bytes[i] == CTRL_V) && i + 1 < bytes.len() {
                    i += 1;
                }
                label.push(bytes[i] as char);
                i += 1;
            }
        }
    }

    if !current.is_empty() {
        items.push(MenuItem { name: current });
    }

    *at = i;
    Ok((items, text))
}

pub(crate) fn parse_menu(
    arg: &str,
    node: &mut CmdNode,
    o: &ParserOptions,
    position: &CommandPosition,
) -> ParseResult<usize> {
    let bytes = arg.as_bytes();
    let mut p = 0usize;
    let mut flags = MenuFlags::empty();

    loop {
        let matched = [
            ("<script>", MenuFlags::SCRIPT),
            ("<silent>", MenuFlags::SILENT),
            ("<special>", MenuFlags::SPECIAL),
        ]
        .into_iter()
        .find(|(name, _)| bytes[p..].starts_with(name.as_bytes()));
        match matched {
            Some((name, flag)) => {
                flags |= flag;
                p = viml_lexis::skip_white(bytes, p + name.len());
            }
            None => break,
        }
    }

    // Optional icon=FILE with backslash-escaped spaces.
    if bytes[p..].starts_with(b"icon=") {
        p += 5;
        let mut icon = String::new();
        while p < bytes.len() && bytes[p] != b' ' {
            if bytes[p] == b'\\' && p + 1 < bytes.len() {
                p += 1;
            }
            icon.push(bytes[p] as char);
            p += 1;
        }
        node.args[ARG_MENU_ICON] = CmdArg::String(Some(icon));
        p = viml_lexis::skip_white(bytes, p);
    }

    // Optional priority path: digits and dots up to the next blank.
    let mut scan = p;
    while matches!(bytes.get(scan), Some(b'0'..=b'9' | b'.')) {
        scan += 1;
    }
    if scan > p && matches!(bytes.get(scan), Some(b' ' | b'\t')) {
        let mut priorities = Vec::new();
        while priorities.len() < MENU_DEPTH && p < scan {
            let (value, after) = viml_lexis::get_digits(bytes, p);
            priorities.push(if value == 0 { MENU_DEFAULT_PRI } else { value });
            p = after;
            if bytes.get(p) == Some(&b'.') {
                p += 1;
            }
        }
        node.args[ARG_MENU_PRI] = CmdArg::Numbers(priorities);
        p = viml_lexis::skip_white(bytes, scan);
    }

    if bytes[p..].starts_with(b"enable")
        && matches!(bytes.get(p + 6), Some(b' ' | b'\t') | None)
    {
        flags |= MenuFlags::ENABLE;
        p = viml_lexis::skip_white(bytes, p + 6);
    } else if bytes[p..].starts_with(b"disable")
        && matches!(bytes.get(p + 7), Some(b' ' | b'\t') | None)
    {
        flags |= MenuFlags::DISABLE;
        p = viml_lexis::skip_white(bytes, p + 7);
    }

    node.args[ARG_MENU_FLAGS] = CmdArg::Flags(flags.bits());

    if p >= bytes.len() {
        return Ok(p);
    }

    let menu_path_start = p;
    let (items, text) = scan_menu_path(bytes, &mut p, true)?;
    node.args[ARG_MENU_NAME] = CmdArg::MenuName(items);
    if let Some(label) = text {
        node.args[ARG_MENU_TEXT] = CmdArg::String(Some(label));
    }

    p = viml_lexis::skip_white(bytes, p);
    let rhs = &arg[p..];
    if !rhs.is_empty() {
        let CmdArg::MenuName(items) = &node.args[ARG_MENU_NAME] else {
            return Err(ParseError::new(messages::E_EMPTY_MENU_NAME, menu_path_start));
        };
        if items.is_empty() {
            return Err(ParseError::new(messages::E_EMPTY_MENU_NAME, menu_path_start));
        }
        if items.len() == 1 {
            return Err(ParseError::new(messages::E_MENU_BAR_ITEM, menu_path_start));
        }
        set_node_rhs(
            rhs,
            ARG_MENU_RHS,
            node,
            flags.contains(MenuFlags::SPECIAL),
            false,
            o,
            position,
        );
    }

    Ok(arg.len())
}

pub(crate) fn parse_unmenu(arg: &str, node: &mut CmdNode) -> ParseResult<usize> {
    let bytes = arg.as_bytes();
    let mut p = 0usize;
    if p >= bytes.len() {
        return Ok(0);
    }
    let (items, _) = scan_menu_path(bytes, &mut p, false)?;
    node.args[0] = CmdArg::MenuName(items);
    Ok(p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use viml_ast::{CmdKind, CommandPosition};
    use viml_cmddefs::cmddef;
    use viml_keycodes::{K_SPECIAL, KS_MODIFIER};

    fn map_node() -> CmdNode {
        CmdNode::new(CmdKind::Map, cmddef(CmdKind::Map).arg_types, CommandPosition::start_of("t"))
    }

    fn menu_node() -> CmdNode {
        CmdNode::new(CmdKind::Menu, cmddef(CmdKind::Menu).arg_types, CommandPosition::start_of("t"))
    }

    fn o() -> ParserOptions {
        ParserOptions::default()
    }

    fn pos() -> CommandPosition {
        CommandPosition::start_of("t")
    }

    #[test]
    fn test_map_attributes_and_sides() {
        let mut node = map_node();
        parse_map("<silent><expr> <F2> foo()", &mut node, &o(), &pos()).unwrap();
        assert_eq!(
            node.args[0].as_flags(),
            (MapFlags::SILENT | MapFlags::EXPR).bits()
        );
        let CmdArg::KeySeq(Some(lhs)) = &node.args[1] else { panic!("missing lhs") };
        assert_eq!(lhs.as_bytes(), &[K_SPECIAL, b'k', b'2']);
        let CmdArg::KeySeq(Some(rhs)) = &node.args[2] else { panic!("missing rhs") };
        assert_eq!(rhs.as_bytes(), b"foo()");
        // The <expr> flag also parses the RHS.
        assert!(node.args[3].as_expr().is_some());
        assert_eq!(node.args[4], CmdArg::Command(None));
    }

    #[test]
    fn test_map_expr_error_becomes_node() {
        let mut node = map_node();
        parse_map("<expr> x 1 +", &mut node, &o(), &pos()).unwrap();
        let CmdArg::Command(Some(err)) = &node.args[4] else { panic!("expected error node") };
        assert_eq!(err.kind, CmdKind::SyntaxError);
    }

    #[test]
    fn test_map_nop_rhs() {
        let mut node = map_node();
        parse_map("x <Nop>", &mut node, &o(), &pos()).unwrap();
        let CmdArg::KeySeq(Some(rhs)) = &node.args[2] else { panic!("missing rhs") };
        assert!(rhs.is_empty());
    }

    #[test]
    fn test_map_shifted_key() {
        let mut node = map_node();
        parse_map("<S-F2> bar", &mut node, &o(), &pos()).unwrap();
        let CmdArg::KeySeq(Some(lhs)) = &node.args[1] else { panic!("missing lhs") };
        assert_eq!(lhs.as_bytes(), &[K_SPECIAL, KS_MODIFIER, 0x02, K_SPECIAL, b'k', b'2']);
    }

    #[test]
    fn test_unmap() {
        let mut node = CmdNode::new(
            CmdKind::Unmap,
            cmddef(CmdKind::Unmap).arg_types,
            CommandPosition::start_of("t"),
        );
        let used = parse_unmap("<buffer> <F2>", &mut node, &o()).unwrap();
        assert_eq!(node.args[0].as_flags(), MapFlags::BUFFER.bits());
        let CmdArg::KeySeq(Some(lhs)) = &node.args[1] else { panic!("missing lhs") };
        assert_eq!(lhs.as_bytes(), &[K_SPECIAL, b'k', b'2']);
        assert_eq!(used, 13);
    }

    #[test]
    fn test_mapclear() {
        let mut node = CmdNode::new(
            CmdKind::Mapclear,
            cmddef(CmdKind::Mapclear).arg_types,
            CommandPosition::start_of("t"),
        );
        assert_eq!(parse_mapclear("<buffer>", &mut node).unwrap(), 8);
        assert_eq!(node.args[0], CmdArg::Flags(1));
    }

    #[test]
    fn test_menu_full_form() {
        let mut node = menu_node();
        parse_menu(
            "<silent> icon=x.png 10.20 File.Save<Tab>:w :w<CR>",
            &mut node,
            &o(),
            &pos(),
        )
        .unwrap();
        assert_eq!(node.args[0].as_flags(), MenuFlags::SILENT.bits());
        assert_eq!(node.args[1], CmdArg::String(Some("x.png".to_owned())));
        assert_eq!(node.args[2], CmdArg::Numbers(vec![10, 20]));
        let CmdArg::MenuName(items) = &node.args[3] else { panic!("missing path") };
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "File");
        assert_eq!(items[1].name, "Save");
        assert_eq!(node.args[4], CmdArg::String(Some(":w".to_owned())));
        let CmdArg::KeySeq(Some(rhs)) = &node.args[5] else { panic!("missing rhs") };
        assert_eq!(rhs.as_bytes(), &[b':', b'w', b'\r']);
    }

    #[test]
    fn test_menu_escaped_space_in_name() {
        let mut node = menu_node();
        parse_menu("File.Save\\ All :wa<CR>", &mut node, &o(), &pos()).unwrap();
        let CmdArg::MenuName(items) = &node.args[3] else { panic!("missing path") };
        assert_eq!(items[1].name, "Save All");
    }

    #[test]
    fn test_menu_zero_priority_defaults() {
        let mut node = menu_node();
        parse_menu("0.20 File.Save :w<CR>", &mut node, &o(), &pos()).unwrap();
        assert_eq!(node.args[2], CmdArg::Numbers(vec![500, 20]));
    }

    #[test]
    fn test_menu_leading_dot_is_error() {
        let mut node = menu_node();
        let err = parse_menu(".Save :w<CR>", &mut node, &o(), &pos()).unwrap_err();
        assert_eq!(err.message, messages::E_EXPECTED_MENU_NAME);
    }

    #[test]
    fn test_menu_rhs_on_bar_item_is_error() {
        let mut node = menu_node();
        let err = parse_menu("File :w<CR>", &mut node, &o(), &pos()).unwrap_err();
        assert_eq!(err.message, messages::E_MENU_BAR_ITEM);
    }

    #[test]
    fn test_unmenu_path() {
        let mut node = CmdNode::new(
            CmdKind::Unmenu,
            cmddef(CmdKind::Unmenu).arg_types,
            CommandPosition::start_of("t"),
        );
        parse_unmenu("File.Save", &mut node).unwrap();
        let CmdArg::MenuName(items) = &node.args[0] else { panic!("missing path") };
        assert_eq!(items.len(), 2);
    }
}
