//! The remaining argument sub-parsers: line input, patterns, events and
//! plain string tails.

use crate::expr::ExprParser;
use crate::lines::LineSource;
use viml_ast::{AuEvent, CmdArg, CmdNode, CmdComplete, Count, Expression, Regex};
use viml_cmddefs::{AU_EVENT_NAMES, au_event_by_name};
use viml_error::{ParseError, ParseResult, messages};
use viml_lexis::{skip_white, utf8_char_len, utf8_decode};

// :substitute flag bits.
const FLAG_S_KEEP: u32 = 0x001;
const FLAG_S_CONFIRM: u32 = 0x002;
const FLAG_S_NOERR: u32 = 0x004;
const FLAG_S_G: u32 = 0x008;
const FLAG_S_IC: u32 = 0x020;
const FLAG_S_NOIC: u32 = 0x040;
const FLAG_S_COUNT: u32 = 0x080;
const FLAG_S_PRINT: u32 = 0x100;
const FLAG_S_PRINT_LNR: u32 = 0x200;
const FLAG_S_PRINT_LIST: u32 = 0x400;
const FLAG_S_R: u32 = 0x800;

// :command attribute bits.
const FLAG_CMD_NARGS_MASK: u32 = 0x007;
const VAL_CMD_NARGS_ONE: u32 = 0x001;
const VAL_CMD_NARGS_ANY: u32 = 0x002;
const VAL_CMD_NARGS_Q: u32 = 0x003;
const VAL_CMD_NARGS_P: u32 = 0x004;
const VAL_CMD_RANGE_CUR: u32 = 0x008;
const VAL_CMD_RANGE_ALL: u32 = 0x010;
const VAL_CMD_RANGE_COUNT: u32 = 0x018;
const FLAG_CMD_BANG: u32 = 0x020;
const FLAG_CMD_BAR: u32 = 0x040;
const FLAG_CMD_REGISTER: u32 = 0x080;
const FLAG_CMD_BUFFER: u32 = 0x100;

/// Virtual column of the first non-blank: spaces count one cell, tabs
/// advance to the next multiple of eight.
fn get_vcol(line: &str) -> (usize, usize) {
    let mut vcol = 0usize;
    for (i, b) in line.bytes().enumerate() {
        match b {
            b' ' => vcol += 1,
            b'\t' => vcol += 8 - vcol % 8,
            _ => return (i, vcol),
        }
    }
    (line.len(), vcol)
}

/// Collects `:append`/`:insert`/`:change` body lines until a lone `.` at
/// an indent no deeper than the first data line's.
pub(crate) fn parse_append(
    _arg: &str,
    node: &mut CmdNode,
    lines: &mut dyn LineSource,
) -> ParseResult<usize> {
    let mut collected: Vec<String> = Vec::new();
    let mut vcol: Option<usize> = None;

    while let Some(line) = lines.next_line(':', vcol.unwrap_or(0)) {
        let (first_nonblank, cur_vcol) = get_vcol(&line);
        if &line[first_nonblank..] == "." && vcol.is_none_or(|v| cur_vcol <= v) {
            break;
        }
        if vcol.is_none() {
            vcol = Some(cur_vcol);
        }
        collected.push(line);
    }

    node.args[0] = CmdArg::Lines(collected);
    Ok(0)
}

/// One expression argument (`:if`, `:while`, `:cexpr`, …).
pub(crate) fn parse_expr_arg(arg: &str, node: &mut CmdNode) -> ParseResult<usize> {
    let mut parser = ExprParser::new(arg);
    parser.skip_white();
    let parsed = parser.parse_one()?;
    node.args[0] = CmdArg::Expr(Some(Expression::new(arg, vec![parsed])));
    Ok(parser.pos())
}

/// A whitespace-separated expression sequence (`:echo`, `:execute`,
/// `:return`). May be empty.
pub(crate) fn parse_exprs_arg(arg: &str, node: &mut CmdNode) -> ParseResult<usize> {
    let mut parser = ExprParser::new(arg);
    let mut nodes = Vec::new();
    loop {
        parser.skip_white();
        if parser.at_end() || matches!(parser.peek(), Some(b'|' | b'\n')) {
            break;
        }
        nodes.push(parser.parse_one()?);
    }
    if !nodes.is_empty() {
        node.args[0] = CmdArg::Exprs(Some(Expression::new(arg, nodes)));
    }
    Ok(parser.pos())
}

/// `:catch` with an optional `/pattern/`; any delimiter matching the
/// opening character works.
pub(crate) fn parse_catch(arg: &str, node: &mut CmdNode) -> ParseResult<usize> {
    let bytes = arg.as_bytes();
    let p = skip_white(bytes, 0);
    if p >= bytes.len() || matches!(bytes[p], b'|' | b'\n') {
        return Ok(p);
    }
    let delimiter = bytes[p];
    let start = p + 1;
    let mut i = start;
    while i < bytes.len() && bytes[i] != delimiter {
        if bytes[i] == b'\\' && i + 1 < bytes.len() {
            i += 1;
        }
        i += 1;
    }
    node.args[0] = CmdArg::Regex(Some(Regex(arg[start..i].to_owned())));
    if i < bytes.len() {
        i += 1;
    }
    Ok(i)
}

/// `:global/pat/cmd`: the pattern plus the raw command tail.
pub(crate) fn parse_global(arg: &str, node: &mut CmdNode) -> ParseResult<usize> {
    let bytes = arg.as_bytes();
    let p = skip_white(bytes, 0);
    let Some(&delimiter) = bytes.get(p) else {
        return Err(ParseError::new(messages::E_REGEX_DELIM, p));
    };
    if delimiter.is_ascii_alphanumeric() || matches!(delimiter, b'\\' | b'"' | b'|') {
        return Err(ParseError::new(messages::E_REGEX_DELIM, p));
    }
    let start = p + 1;
    let mut i = start;
    while i < bytes.len() && bytes[i] != delimiter {
        if bytes[i] == b'\\' && i + 1 < bytes.len() {
            i += 1;
        }
        i += 1;
    }
    node.args[0] = CmdArg::Regex(Some(Regex(arg[start..i].to_owned())));
    if i < bytes.len() {
        i += 1;
    }
    if i < bytes.len() {
        node.args[1] = CmdArg::String(Some(arg[i..].to_owned()));
    }
    Ok(arg.len())
}

/// `:substitute` and its repeat forms: `/pat/rep/flags count`, or bare
/// flag letters for a repeat.
pub(crate) fn parse_substitute(arg: &str, node: &mut CmdNode) -> ParseResult<usize> {
    let bytes = arg.as_bytes();
    let mut p = skip_white(bytes, 0);
    let mut flags = 0u32;

    if let Some(&delimiter) = bytes.get(p) {
        // Any single byte works as the delimiter except alphanumerics,
        // blanks, backslash, quote and bar.
        if !delimiter.is_ascii_alphanumeric()
            && !matches!(delimiter, b' ' | b'\t' | b'|' | b'"' | b'\\')
        {
            p += 1;
            let start = p;
            while p < bytes.len() && bytes[p] != delimiter {
                if bytes[p] == b'\\' && p + 1 < bytes.len() {
                    p += 1;
                }
                p += 1;
            }
            node.args[0] = CmdArg::Regex(Some(Regex(arg[start..p].to_owned())));
            if p < bytes.len() {
                p += 1;
                let rep_start = p;
                while p < bytes.len() && bytes[p] != delimiter {
                    if bytes[p] == b'\\' && p + 1 < bytes.len() {
                        p += 1;
                    }
                    p += 1;
                }
                node.args[1] = CmdArg::Replacement(Some(arg[rep_start..p].to_owned()));
                if p < bytes.len() {
                    p += 1;
                }
            }
        }
    }

    // Flag letters, then an optional count.
    loop {
        let bit = match bytes.get(p) {
            Some(b'&') => FLAG_S_KEEP,
            Some(b'c') => FLAG_S_CONFIRM,
            Some(b'e') => FLAG_S_NOERR,
            Some(b'g') => FLAG_S_G,
            Some(b'i') => FLAG_S_IC,
            Some(b'I') => FLAG_S_NOIC,
            Some(b'p') => FLAG_S_PRINT,
            Some(b'#') => FLAG_S_PRINT_LNR,
            Some(b'l') => FLAG_S_PRINT_LIST,
            Some(b'r') => FLAG_S_R,
            _ => break,
        };
        flags |= bit;
        p += 1;
    }
    p = skip_white(bytes, p);
    if bytes.get(p).is_some_and(u8::is_ascii_digit) {
        let (count, after) = viml_lexis::get_digits(bytes, p);
        node.count = Count::Count(count);
        flags |= FLAG_S_COUNT;
        p = after;
    }

    node.args[2] = CmdArg::Flags(flags);
    Ok(p)
}

/// A single-character argument (`:k`, `:mark`, `:wincmd`, `:@`).
pub(crate) fn parse_char_arg(arg: &str, node: &mut CmdNode) -> ParseResult<usize> {
    let bytes = arg.as_bytes();
    if bytes.is_empty() {
        return Ok(0);
    }
    let (cp, len) = utf8_decode(bytes, 0);
    node.args[0] = CmdArg::Char(char::from_u32(cp));
    Ok(len)
}

/// A destination address (`:copy`, `:move`).
pub(crate) fn parse_address_arg(arg: &str, node: &mut CmdNode) -> ParseResult<usize> {
    let bytes = arg.as_bytes();
    let mut p = 0usize;
    let mut address = crate::ex::get_address(bytes, &mut p)?;
    if address.is_missing() {
        return Err(ParseError::new(messages::E_INVALID_ADDRESS, p));
    }
    address.followups = crate::ex::get_address_followups(bytes, &mut p)?;
    node.args[0] = CmdArg::Address(Some(address));
    Ok(p)
}

/// Splits a whitespace-delimited word, returning it and the offset past
/// it.
fn next_word(bytes: &[u8], at: usize) -> (usize, usize) {
    let start = skip_white(bytes, at);
    let mut end = start;
    while end < bytes.len() && !matches!(bytes[end], b' ' | b'\t') {
        end += 1;
    }
    (start, end)
}

/// Parses a comma-separated autocmd event list; `*` means every event.
fn parse_event_list(word: &str, offset: usize) -> ParseResult<Vec<AuEvent>> {
    if word == "*" {
        return Ok((0..AU_EVENT_NAMES.len() as u16).map(AuEvent).collect());
    }
    let mut events = Vec::new();
    let mut at = 0usize;
    for part in word.split(',') {
        match au_event_by_name(part) {
            Some(event) => events.push(event),
            None => return Err(ParseError::new(messages::E_BAD_AU_EVENT, offset + at)),
        }
        at += part.len() + 1;
    }
    Ok(events)
}

/// `:autocmd [group] {events} {pattern} [nested] {cmd}`.
pub(crate) fn parse_autocmd(arg: &str, node: &mut CmdNode) -> ParseResult<usize> {
    let bytes = arg.as_bytes();
    let (w1_start, w1_end) = next_word(bytes, 0);
    if w1_start == w1_end {
        // Bare :autocmd lists everything.
        return Ok(w1_start);
    }

    let first = &arg[w1_start..w1_end];
    let mut p = w1_end;
    let events = match parse_event_list(first, w1_start) {
        Ok(events) => events,
        Err(_) => {
            // The first word is an augroup name; the events follow.
            node.args[0] = CmdArg::String(Some(first.to_owned()));
            let (e_start, e_end) = next_word(bytes, p);
            if e_start == e_end {
                return Ok(e_start);
            }
            p = e_end;
            parse_event_list(&arg[e_start..e_end], e_start)?
        }
    };
    node.args[1] = CmdArg::AuEvents(events);

    let (pat_start, pat_end) = next_word(bytes, p);
    if pat_start == pat_end {
        return Ok(pat_start);
    }
    node.args[2] = CmdArg::Pattern(Some(arg[pat_start..pat_end].to_owned()));
    p = pat_end;

    let (n_start, n_end) = next_word(bytes, p);
    if &arg[n_start..n_end] == "nested" {
        node.args[3] = CmdArg::Flags(1);
        p = n_end;
    }

    let rest = skip_white(bytes, p);
    if rest < bytes.len() {
        node.args[4] = CmdArg::String(Some(arg[rest..].to_owned()));
    }
    Ok(arg.len())
}

/// `:doautocmd [<nomodeline>] [group] {event} [fname]`.
pub(crate) fn parse_doautocmd(arg: &str, node: &mut CmdNode) -> ParseResult<usize> {
    let bytes = arg.as_bytes();
    let mut p = skip_white(bytes, 0);
    if bytes[p..].starts_with(b"<nomodeline>") {
        node.args[0] = CmdArg::Flags(1);
        p = skip_white(bytes, p + 12);
    }

    let (w_start, w_end) = next_word(bytes, p);
    if w_start == w_end {
        return Ok(w_start);
    }
    let first = &arg[w_start..w_end];
    p = w_end;

    let event = match au_event_by_name(first) {
        Some(event) => event,
        None => {
            node.args[1] = CmdArg::String(Some(first.to_owned()));
            let (e_start, e_end) = next_word(bytes, p);
            if e_start == e_end {
                return Err(ParseError::new(messages::E_BAD_AU_EVENT, e_start));
            }
            p = e_end;
            au_event_by_name(&arg[e_start..e_end])
                .ok_or(ParseError::new(messages::E_BAD_AU_EVENT, e_start))?
        }
    };
    node.args[2] = CmdArg::AuEvent(Some(event));

    let rest = skip_white(bytes, p);
    if rest < bytes.len() {
        node.args[3] = CmdArg::String(Some(arg[rest..].to_owned()));
    }
    Ok(arg.len())
}

/// `:command` attributes, then the name and replacement text.
pub(crate) fn parse_user_command(arg: &str, node: &mut CmdNode) -> ParseResult<usize> {
    let bytes = arg.as_bytes();
    let mut p = skip_white(bytes, 0);
    let mut flags = 0u32;

    while bytes.get(p) == Some(&b'-') {
        let (a_start, a_end) = next_word(bytes, p);
        let attr = &arg[a_start + 1..a_end];
        let (name, value) = match attr.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (attr, None),
        };
        match (name, value) {
            ("bang", None) => flags |= FLAG_CMD_BANG,
            ("bar", None) => flags |= FLAG_CMD_BAR,
            ("register", None) => flags |= FLAG_CMD_REGISTER,
            ("buffer", None) => flags |= FLAG_CMD_BUFFER,
            ("nargs", Some(spec)) => {
                flags &= !FLAG_CMD_NARGS_MASK;
                flags |= match spec {
                    "0" => 0,
                    "1" => VAL_CMD_NARGS_ONE,
                    "*" => VAL_CMD_NARGS_ANY,
                    "?" => VAL_CMD_NARGS_Q,
                    "+" => VAL_CMD_NARGS_P,
                    _ => return Err(ParseError::new(messages::E_INVALID_ATTRIBUTE, a_start)),
                };
            }
            ("range", None) => flags |= VAL_CMD_RANGE_CUR,
            ("range", Some("%")) => flags |= VAL_CMD_RANGE_ALL,
            ("range" | "count", Some(digits)) if digits.bytes().all(|b| b.is_ascii_digit()) => {
                flags |= VAL_CMD_RANGE_COUNT;
            }
            ("count", None) => flags |= VAL_CMD_RANGE_COUNT,
            ("complete", Some(spec)) => {
                let (kind, complete_arg) = match spec.split_once(',') {
                    Some((kind, rest)) => (kind, Some(rest.to_owned())),
                    None => (spec, None),
                };
                node.args[1] = CmdArg::CmdComplete(Some(CmdComplete {
                    name: kind.to_owned(),
                    arg: complete_arg,
                }));
            }
            _ => return Err(ParseError::new(messages::E_INVALID_ATTRIBUTE, a_start)),
        }
        p = a_end;
        p = skip_white(bytes, p);
    }

    node.args[0] = CmdArg::Flags(flags);
    if p < bytes.len() {
        node.args[2] = CmdArg::String(Some(arg[p..].to_owned()));
    }
    Ok(arg.len())
}

/// The rest of the argument as one owned string.
pub(crate) fn parse_rest(arg: &str, node: &mut CmdNode) -> ParseResult<usize> {
    if !arg.is_empty() {
        node.args[0] = CmdArg::String(Some(arg.to_owned()));
    }
    Ok(arg.len())
}

/// The rest of the argument as a file glob; an unescaped `|` still
/// separates commands for these.
pub(crate) fn parse_glob(arg: &str, node: &mut CmdNode) -> ParseResult<usize> {
    let bytes = arg.as_bytes();
    let mut out = String::new();
    let mut i = 0usize;
    let mut consumed = arg.len();
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if bytes.get(i + 1) == Some(&b'|') => {
                out.push('|');
                i += 2;
            }
            b'|' => {
                consumed = i + 1;
                break;
            }
            b => {
                let len = utf8_char_len(b).min(bytes.len() - i);
                out.push_str(&arg[i..i + len]);
                i += len;
            }
        }
    }
    let trimmed = out.trim_end_matches([' ', '\t']).len();
    out.truncate(trimmed);
    if !out.is_empty() {
        node.args[0] = CmdArg::Glob(Some(out));
    }
    Ok(consumed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lines::StringLineSource;
    use pretty_assertions::assert_eq;
    use viml_ast::{CmdKind, CommandPosition};
    use viml_cmddefs::cmddef;

    fn node_of(kind: CmdKind) -> CmdNode {
        CmdNode::new(kind, cmddef(kind).arg_types, CommandPosition::start_of("t"))
    }

    #[test]
    fn test_append_collects_until_dot() {
        let mut node = node_of(CmdKind::Append);
        let mut lines = StringLineSource::new("  one\n  two\n  .\nafter");
        parse_append("", &mut node, &mut lines).unwrap();
        assert_eq!(node.args[0], CmdArg::Lines(vec!["  one".to_owned(), "  two".to_owned()]));
        // The line after the terminator is still available.
        assert_eq!(lines.next_line(':', 0), Some("after".to_owned()));
    }

    #[test]
    fn test_append_deeper_dot_is_content() {
        let mut node = node_of(CmdKind::Append);
        let mut lines = StringLineSource::new("one\n    .\n.\n");
        parse_append("", &mut node, &mut lines).unwrap();
        assert_eq!(node.args[0], CmdArg::Lines(vec!["one".to_owned(), "    .".to_owned()]));
    }

    #[test]
    fn test_append_lone_dot_first() {
        let mut node = node_of(CmdKind::Append);
        let mut lines = StringLineSource::new(".\nrest");
        parse_append("", &mut node, &mut lines).unwrap();
        assert_eq!(node.args[0], CmdArg::Lines(vec![]));
    }

    #[test]
    fn test_exprs_sequence() {
        let mut node = node_of(CmdKind::Echo);
        let used = parse_exprs_arg("1 'two' x", &mut node).unwrap();
        assert_eq!(used, 9);
        let exprs = node.args[0].as_expr().unwrap();
        assert_eq!(exprs.nodes.len(), 3);
    }

    #[test]
    fn test_exprs_stop_at_bar() {
        let mut node = node_of(CmdKind::Echo);
        let used = parse_exprs_arg("1 | echo 2", &mut node).unwrap();
        assert_eq!(used, 2);
        assert_eq!(node.args[0].as_expr().unwrap().nodes.len(), 1);
    }

    #[test]
    fn test_catch_pattern_delimiters() {
        for (text, pattern) in [("/x/", "x"), (",^Vim,", "^Vim"), ("/a\\/b/", "a\\/b")] {
            let mut node = node_of(CmdKind::Catch);
            parse_catch(text, &mut node).unwrap();
            assert_eq!(node.args[0], CmdArg::Regex(Some(Regex(pattern.to_owned()))), "{text}");
        }
        let mut node = node_of(CmdKind::Catch);
        assert_eq!(parse_catch("", &mut node).unwrap(), 0);
        assert_eq!(node.args[0], CmdArg::Regex(None));
    }

    #[test]
    fn test_global() {
        let mut node = node_of(CmdKind::Global);
        parse_global("/pat/print", &mut node).unwrap();
        assert_eq!(node.args[0], CmdArg::Regex(Some(Regex("pat".to_owned()))));
        assert_eq!(node.args[1], CmdArg::String(Some("print".to_owned())));
        let mut node = node_of(CmdKind::Global);
        let err = parse_global("xpatx", &mut node).unwrap_err();
        assert_eq!(err.message, messages::E_REGEX_DELIM);
    }

    #[test]
    fn test_substitute_full() {
        let mut node = node_of(CmdKind::Substitute);
        let used = parse_substitute("/a\\/b/repl/gi 3", &mut node).unwrap();
        assert_eq!(node.args[0], CmdArg::Regex(Some(Regex("a\\/b".to_owned()))));
        assert_eq!(node.args[1], CmdArg::Replacement(Some("repl".to_owned())));
        let flags = node.args[2].as_flags();
        assert_eq!(flags & FLAG_S_G, FLAG_S_G);
        assert_eq!(flags & FLAG_S_IC, FLAG_S_IC);
        assert_eq!(flags & FLAG_S_COUNT, FLAG_S_COUNT);
        assert_eq!(node.count, Count::Count(3));
        assert_eq!(used, 15);
    }

    #[test]
    fn test_substitute_repeat_flags_only() {
        let mut node = node_of(CmdKind::Substitute);
        parse_substitute("g", &mut node).unwrap();
        assert_eq!(node.args[0], CmdArg::Regex(None));
        assert_eq!(node.args[2].as_flags() & FLAG_S_G, FLAG_S_G);
    }

    #[test]
    fn test_char_arg() {
        let mut node = node_of(CmdKind::K);
        parse_char_arg("a", &mut node).unwrap();
        assert_eq!(node.args[0], CmdArg::Char(Some('a')));
    }

    #[test]
    fn test_address_arg() {
        let mut node = node_of(CmdKind::Copy);
        parse_address_arg("$-1", &mut node).unwrap();
        let CmdArg::Address(Some(address)) = &node.args[0] else { panic!("missing address") };
        assert_eq!(address.kind, viml_ast::AddressKind::End);
        assert_eq!(address.followups, vec![viml_ast::AddressFollowup::Shift(-1)]);
    }

    #[test]
    fn test_autocmd_full_form() {
        let mut node = node_of(CmdKind::Autocmd);
        parse_autocmd("mygroup BufEnter,WinEnter *.txt nested echo 'hi'", &mut node).unwrap();
        assert_eq!(node.args[0], CmdArg::String(Some("mygroup".to_owned())));
        let CmdArg::AuEvents(events) = &node.args[1] else { panic!("missing events") };
        assert_eq!(events.len(), 2);
        assert_eq!(node.args[2], CmdArg::Pattern(Some("*.txt".to_owned())));
        assert_eq!(node.args[3], CmdArg::Flags(1));
        assert_eq!(node.args[4], CmdArg::String(Some("echo 'hi'".to_owned())));
    }

    #[test]
    fn test_autocmd_star_events() {
        let mut node = node_of(CmdKind::Autocmd);
        parse_autocmd("* *.txt set ro", &mut node).unwrap();
        let CmdArg::AuEvents(events) = &node.args[1] else { panic!("missing events") };
        assert_eq!(events.len(), AU_EVENT_NAMES.len());
    }

    #[test]
    fn test_autocmd_bad_event() {
        let mut node = node_of(CmdKind::Autocmd);
        let err = parse_autocmd("grp NoSuchEvent * foo", &mut node).unwrap_err();
        assert_eq!(err.message, messages::E_BAD_AU_EVENT);
    }

    #[test]
    fn test_doautocmd() {
        let mut node = node_of(CmdKind::Doautocmd);
        parse_doautocmd("<nomodeline> mygrp BufRead x.txt", &mut node).unwrap();
        assert_eq!(node.args[0], CmdArg::Flags(1));
        assert_eq!(node.args[1], CmdArg::String(Some("mygrp".to_owned())));
        assert!(matches!(node.args[2], CmdArg::AuEvent(Some(_))));
        assert_eq!(node.args[3], CmdArg::String(Some("x.txt".to_owned())));
    }

    #[test]
    fn test_user_command_attributes() {
        let mut node = node_of(CmdKind::Command);
        parse_user_command(
            "-bang -nargs=* -range=% -complete=custom,ListFn Grep call Do(<q-args>)",
            &mut node,
        )
        .unwrap();
        let flags = node.args[0].as_flags();
        assert_eq!(flags & FLAG_CMD_BANG, FLAG_CMD_BANG);
        assert_eq!(flags & FLAG_CMD_NARGS_MASK, VAL_CMD_NARGS_ANY);
        assert_eq!(flags & VAL_CMD_RANGE_COUNT, VAL_CMD_RANGE_ALL);
        let CmdArg::CmdComplete(Some(complete)) = &node.args[1] else { panic!("no complete") };
        assert_eq!(complete.name, "custom");
        assert_eq!(complete.arg.as_deref(), Some("ListFn"));
        assert_eq!(node.args[2], CmdArg::String(Some("Grep call Do(<q-args>)".to_owned())));
    }

    #[test]
    fn test_glob_stops_at_bar() {
        let mut node = node_of(CmdKind::Edit);
        let used = parse_glob("a\\|b.txt|echo", &mut node).unwrap();
        assert_eq!(node.args[0], CmdArg::Glob(Some("a|b.txt".to_owned())));
        assert_eq!(used, 9);
    }
}
