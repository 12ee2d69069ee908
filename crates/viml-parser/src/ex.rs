//! The Ex-command parser: one command per call.
//!
//! A call consumes one command from the current line, which may involve
//! reading continuation lines (`:append` bodies) through the line
//! source. Modifiers (`:silent`, `:botright`, …) become wrapper nodes;
//! a recoverable failure produces a syntax-error node and parsing
//! resumes after the offending line.

use crate::lines::LineSource;
use crate::subparsers;
use crate::{ParserOptions, PocFlags};
use tracing::trace;
use viml_ast::{
    Address, AddressFollowup, AddressKind, CmdArg, CmdKind, CmdNode, CommandPosition, Count,
    ExFlags, Range, RangeElement, Regex,
};
use viml_cmddefs::{CmdFlags, cmddef, first_letter_start};
use viml_error::{ParseError, messages};
use viml_lexis::{get_digits, skip_digits, skip_white};

pub(crate) const CTRL_V: u8 = 0x16;

/// Outcome of `parse_one_cmd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStatus {
    /// Parsed cleanly.
    Ok,
    /// A recoverable syntax error was encoded in the returned node.
    Recovered,
}

/// One parsed command plus its status.
#[derive(Debug)]
pub struct ParsedCmd {
    /// The parsed node; `None` when the line held nothing (end of line).
    pub node: Option<CmdNode>,
    pub status: ParseStatus,
}

impl ParsedCmd {
    fn ok(node: CmdNode) -> Self {
        ParsedCmd { node: Some(node), status: ParseStatus::Ok }
    }

    fn empty() -> Self {
        ParsedCmd { node: None, status: ParseStatus::Ok }
    }

    fn recovered(node: CmdNode) -> Self {
        ParsedCmd { node: Some(node), status: ParseStatus::Recovered }
    }
}

/// Builds a syntax-error node from a recoverable failure.
///
/// The node records the offending line, the diagnostic text and the byte
/// offset of the error position within that line.
pub(crate) fn create_error_node(
    error: ParseError,
    position: &CommandPosition,
    line: &str,
) -> CmdNode {
    let mut node = CmdNode::new(CmdKind::SyntaxError, cmddef(CmdKind::SyntaxError).arg_types, position.clone());
    node.args[0] = CmdArg::String(Some(line.to_owned()));
    node.args[1] = CmdArg::String(Some(error.message.to_owned()));
    node.args[2] = CmdArg::Column(error.col.min(line.len()));
    node
}

/// Parses one Ex command from `line` starting at byte `at`.
///
/// Returns the outcome and the offset at which the next command starts
/// (past a `|` separator when one terminated this command).
pub fn parse_one_cmd(
    line: &str,
    at: usize,
    o: &ParserOptions,
    position: &CommandPosition,
    lines: &mut dyn LineSource,
) -> (ParsedCmd, usize) {
    let bytes = line.as_bytes();
    let mut p = at;

    // A hashbang is only special in the very first column.
    if position.col == 1 && at == 0 && bytes.starts_with(b"#!") {
        let mut node = node_for(CmdKind::HashbangComment, position);
        node.args[0] = CmdArg::String(Some(line[2..].to_owned()));
        return (ParsedCmd::ok(node), line.len());
    }

    // 1.-2. Leading whitespace/colons, comments and command modifiers.
    let mut modifiers: Vec<CmdNode> = Vec::new();
    loop {
        while matches!(bytes.get(p), Some(b' ' | b'\t' | b':')) {
            p += 1;
        }

        if p >= bytes.len() {
            if o.flags.contains(PocFlags::EXMODE) {
                // In ex mode an empty line works like ":+1".
                let mut node = node_for(CmdKind::Print, position);
                node.range = Range(vec![RangeElement {
                    address: Address {
                        kind: AddressKind::Current,
                        followups: vec![AddressFollowup::Shift(1)],
                    },
                    set_cursor: false,
                }]);
                return (ParsedCmd::ok(wrap_modifiers(modifiers, node)), p);
            }
            // A bare modifier chain is kept as parsed; a line of only
            // blanks and colons yields a missing node.
            return match modifiers.pop() {
                Some(last) => (ParsedCmd::ok(wrap_modifiers(modifiers, last)), p),
                None if p > at && at == 0 => {
                    (ParsedCmd::ok(node_for(CmdKind::Missing, position)), p)
                }
                None => (ParsedCmd::empty(), p),
            };
        }

        if bytes[p] == b'"' {
            let mut node = node_for(CmdKind::Comment, position);
            node.args[0] = CmdArg::String(Some(line[p + 1..].to_owned()));
            return (ParsedCmd::ok(wrap_modifiers(modifiers, node)), line.len());
        }

        let pstart = p;
        let mut digits_end = p;
        if bytes[p].is_ascii_digit() {
            digits_end = skip_digits(bytes, p);
            p = skip_white(bytes, digits_end);
        }

        match find_modifier(bytes, p) {
            Some((kind, after)) => {
                let def = cmddef(kind);
                if digits_end > pstart && !def.flags.contains(CmdFlags::COUNT) {
                    let err = ParseError::new(messages::E_NORANGE, pstart);
                    return (
                        ParsedCmd::recovered(wrap_modifiers(
                            modifiers,
                            create_error_node(err, position, line),
                        )),
                        line.len(),
                    );
                }
                let mut after = after;
                let mut node = node_for(kind, position);
                if digits_end > pstart {
                    let (count, _) = get_digits(bytes, pstart);
                    node.count = Count::Count(count);
                }
                if bytes.get(after) == Some(&b'!') {
                    if !def.flags.contains(CmdFlags::BANG) {
                        let err = ParseError::new(messages::E_NOBANG, after);
                        return (
                            ParsedCmd::recovered(wrap_modifiers(
                                modifiers,
                                create_error_node(err, position, line),
                            )),
                            line.len(),
                        );
                    }
                    node.bang = true;
                    after += 1;
                }
                modifiers.push(node);
                p = after;
            }
            None => {
                p = pstart;
                break;
            }
        }
    }

    // 3. The range.
    let mut range_elems: Vec<RangeElement> = Vec::new();
    let mut range_start = None;
    loop {
        p = skip_white(bytes, p);
        if range_start.is_none() {
            range_start = Some(p);
        }

        let mut address = match get_address(bytes, &mut p) {
            Ok(address) => address,
            Err(err) => {
                return (
                    ParsedCmd::recovered(wrap_modifiers(
                        modifiers,
                        create_error_node(err, position, line),
                    )),
                    line.len(),
                );
            }
        };
        match get_address_followups(bytes, &mut p) {
            Ok(followups) => address.followups = followups,
            Err(err) => {
                return (
                    ParsedCmd::recovered(wrap_modifiers(
                        modifiers,
                        create_error_node(err, position, line),
                    )),
                    line.len(),
                );
            }
        }
        p = skip_white(bytes, p);

        if !address.followups.is_empty() {
            if matches!(address.kind, AddressKind::Missing) {
                address.kind = AddressKind::Current;
            }
        } else if range_elems.is_empty() && address.is_missing() {
            // % is 1,$ and * (unless disabled) is '<,'>.
            if bytes.get(p) == Some(&b'%') {
                range_elems.push(RangeElement {
                    address: Address { kind: AddressKind::Fixed(1), followups: vec![] },
                    set_cursor: false,
                });
                range_elems.push(RangeElement {
                    address: Address { kind: AddressKind::End, followups: vec![] },
                    set_cursor: false,
                });
                p += 1;
                break;
            } else if bytes.get(p) == Some(&b'*') && !o.flags.contains(PocFlags::CPO_STAR) {
                range_elems.push(RangeElement {
                    address: Address { kind: AddressKind::Mark('<'), followups: vec![] },
                    set_cursor: false,
                });
                range_elems.push(RangeElement {
                    address: Address { kind: AddressKind::Mark('>'), followups: vec![] },
                    set_cursor: false,
                });
                p += 1;
                break;
            }
        }

        let separator = bytes.get(p).copied();
        let set_cursor = separator == Some(b';');
        if address.is_missing() && !matches!(separator, Some(b',' | b';')) {
            break;
        }
        range_elems.push(RangeElement { address, set_cursor });
        if matches!(separator, Some(b',' | b';')) {
            p += 1;
        } else {
            break;
        }
    }
    let range = Range(range_elems);

    // 4. The command name; but an address alone is a command too.
    while matches!(bytes.get(p), Some(b' ' | b'\t' | b':')) {
        p += 1;
    }

    let nextcmd = check_nextcmd(bytes, p);
    if p >= bytes.len() || bytes[p] == b'"' || nextcmd.is_some() {
        // Strange vi behaviour: ":3" jumps to line 3, ":3|..." prints
        // line 3, ":|" prints the current line.
        if bytes.get(p) == Some(&b'|')
            || (o.flags.contains(PocFlags::EXMODE) && !range.is_empty())
        {
            let mut node = node_for(CmdKind::Print, position);
            node.range = range;
            if bytes.get(p) == Some(&b'|') {
                p += 1;
            }
            return (ParsedCmd::ok(wrap_modifiers(modifiers, node)), p);
        }
        if bytes.get(p) == Some(&b'"') {
            let mut node = node_for(CmdKind::Comment, position);
            node.args[0] = CmdArg::String(Some(line[p + 1..].to_owned()));
            return (ParsedCmd::ok(wrap_modifiers(modifiers, node)), line.len());
        }
        let mut node = node_for(CmdKind::Missing, position);
        node.range = range;
        return (ParsedCmd::ok(wrap_modifiers(modifiers, node)), nextcmd.unwrap_or(p));
    }

    let (kind, user_name) = match find_command(bytes, &mut p) {
        Ok(found) => found,
        Err(err) => {
            return (
                ParsedCmd::recovered(wrap_modifiers(
                    modifiers,
                    create_error_node(err, position, line),
                )),
                line.len(),
            );
        }
    };
    let def = cmddef(kind);
    trace!(command = ?kind, col = p, "recognised command");

    // 8. Bang.
    let mut bang = false;
    if bytes.get(p) == Some(&b'!') {
        if def.flags.contains(CmdFlags::BANG) {
            bang = true;
            p += 1;
        } else {
            let err = ParseError::new(messages::E_NOBANG, p);
            return (
                ParsedCmd::recovered(wrap_modifiers(
                    modifiers,
                    create_error_node(err, position, line),
                )),
                line.len(),
            );
        }
    }

    // 9. Range validity.
    if !range.is_empty() && !def.flags.contains(CmdFlags::RANGE) {
        let err = ParseError::new(messages::E_NORANGE, range_start.unwrap_or(at));
        return (
            ParsedCmd::recovered(wrap_modifiers(modifiers, create_error_node(err, position, line))),
            line.len(),
        );
    }

    // Skip to the argument; ":!! -l" needs the space kept.
    if kind != CmdKind::Bang {
        p = skip_white(bytes, p);
    }

    // 10. Count.
    let mut count = Count::Missing;
    if def.flags.contains(CmdFlags::COUNT) && bytes.get(p).is_some_and(u8::is_ascii_digit) {
        let (value, after) = get_digits(bytes, p);
        count = Count::Count(value);
        p = skip_white(bytes, after);
    }

    // 11. Ex flags.
    let mut exflags = ExFlags::empty();
    if def.flags.contains(CmdFlags::EXFLAGS) {
        loop {
            match bytes.get(p) {
                Some(b'l') => exflags |= ExFlags::LIST,
                Some(b'#') => exflags |= ExFlags::LNR,
                Some(b'p') => exflags |= ExFlags::PRINT,
                _ => break,
            }
            p += 1;
        }
    }

    // Trailing characters on commands that take no argument.
    if !def.flags.contains(CmdFlags::EXTRA)
        && p < bytes.len()
        && bytes[p] != b'"'
        && (bytes[p] != b'|' || !def.flags.contains(CmdFlags::TRLBAR))
    {
        let err = ParseError::new(messages::E_TRAILING, p);
        return (
            ParsedCmd::recovered(wrap_modifiers(modifiers, create_error_node(err, position, line))),
            line.len(),
        );
    }

    let mut node = node_for(kind, position);
    node.bang = bang;
    node.range = range;
    node.count = count;
    node.exflags = exflags;
    node.name = user_name;

    // User-defined command: the argument is the untouched rest of the
    // line.
    if kind == CmdKind::User {
        node.args[0] = CmdArg::String(Some(line[p..].to_owned()));
        return (ParsedCmd::ok(wrap_modifiers(modifiers, node)), line.len());
    }

    // 12.-13. Argument scanning and the sub-parser.
    if let Some(parser) = def.parser {
        let raw = def.flags.intersects(
            CmdFlags::XFILE | CmdFlags::ISGREP | CmdFlags::ISEXPR | CmdFlags::LITERAL,
        );
        if raw {
            let arg = &line[p..];
            match subparsers::dispatch(parser, arg, &mut node, o, position, lines) {
                Ok(used) => {
                    p += used;
                    // Step over a command separator the sub-parser
                    // stopped at.
                    let q = skip_white(bytes, p);
                    if bytes.get(q) == Some(&b'|') {
                        p = q + 1;
                    }
                    return (ParsedCmd::ok(wrap_modifiers(modifiers, node)), p);
                }
                Err(mut err) => {
                    err.col += p;
                    return (
                        ParsedCmd::recovered(wrap_modifiers(
                            modifiers,
                            create_error_node(err, position, line),
                        )),
                        line.len(),
                    );
                }
            }
        }

        let (arg, consumed) = get_cmd_arg(kind, o, &line[p..]);
        match subparsers::dispatch(parser, &arg, &mut node, o, position, lines) {
            Ok(used) => {
                let rest = arg[used.min(arg.len())..].trim_start();
                if !rest.is_empty() {
                    let err = ParseError::new(messages::E_TRAILING, used);
                    return (
                        ParsedCmd::recovered(wrap_modifiers(
                            modifiers,
                            create_error_node(err, position, &arg),
                        )),
                        line.len(),
                    );
                }
                p += consumed;
                (ParsedCmd::ok(wrap_modifiers(modifiers, node)), p)
            }
            Err(err) => (
                ParsedCmd::recovered(wrap_modifiers(
                    modifiers,
                    create_error_node(err, position, &arg),
                )),
                line.len(),
            ),
        }
    } else {
        // No argument grammar: a trailing comment belongs to this
        // command, a bar hands over to the next one.
        if bytes.get(p) == Some(&b'"') && !def.flags.contains(CmdFlags::NOTRLCOM) {
            p = line.len();
        } else if bytes.get(p) == Some(&b'|') {
            p += 1;
        }
        (ParsedCmd::ok(wrap_modifiers(modifiers, node)), p)
    }
}

fn node_for(kind: CmdKind, position: &CommandPosition) -> CmdNode {
    CmdNode::new(kind, cmddef(kind).arg_types, position.clone())
}

/// Nests `node` inside the collected modifier chain.
fn wrap_modifiers(modifiers: Vec<CmdNode>, node: CmdNode) -> CmdNode {
    let mut current = node;
    for mut modifier in modifiers.into_iter().rev() {
        modifier.children.push(current);
        current = modifier;
    }
    current
}

/// Recognises a command modifier by minimum unique prefix.
///
/// Returns the modifier kind and the offset past the (possibly
/// abbreviated) name.
fn find_modifier(bytes: &[u8], p: usize) -> Option<(CmdKind, usize)> {
    let first = *bytes.get(p)?;
    if !first.is_ascii_lowercase() {
        return None;
    }
    let start = first_letter_start(first);
    for i in start..CmdKind::ALL.len() {
        let kind = CmdKind::ALL[i];
        let Some(name) = kind.name() else { continue };
        if name.as_bytes()[0] != first {
            break;
        }
        if !cmddef(kind).flags.contains(CmdFlags::ISMODIFIER) {
            continue;
        }
        // The minimum length is one byte past the common prefix with the
        // previous table entry.
        let mut min_len = 1;
        if i > 0 {
            if let Some(prev) = CmdKind::ALL[i - 1].name() {
                let common = name
                    .bytes()
                    .zip(prev.bytes())
                    .take_while(|(a, b)| a == b)
                    .count();
                min_len = common + 1;
            }
        }
        if let Some(after) = check_for_cmd(bytes, p, name, min_len) {
            return Some((kind, after));
        }
    }
    None
}

/// Matches an optionally abbreviated command name at `p`.
///
/// Accepts when at least `min_len` bytes match and the input stops being
/// alphabetic where the match ends. Returns the offset past the match
/// and any following whitespace.
fn check_for_cmd(bytes: &[u8], p: usize, name: &str, min_len: usize) -> Option<usize> {
    let name = name.as_bytes();
    let mut i = 0;
    while i < name.len() && bytes.get(p + i) == Some(&name[i]) {
        i += 1;
    }
    if i >= min_len && !bytes.get(p + i).is_some_and(u8::is_ascii_alphabetic) {
        Some(skip_white(bytes, p + i))
    } else {
        None
    }
}

/// Reads the pattern of a `/…/`-style atom; the cursor sits just past
/// the opening delimiter, which `bytes[p - 1]` still holds.
fn get_pattern(bytes: &[u8], p: &mut usize) -> Regex {
    let delimiter = bytes[*p - 1];
    let start = *p;
    let mut i = *p;
    while i < bytes.len() && bytes[i] != delimiter {
        if bytes[i] == b'\\' && i + 1 < bytes.len() {
            i += 2;
        } else {
            i += 1;
        }
    }
    let pattern = String::from_utf8_lossy(&bytes[start..i]).into_owned();
    if i < bytes.len() {
        i += 1; // the closing delimiter
    }
    *p = i;
    Regex(pattern)
}

/// Parses one address atom.
pub(crate) fn get_address(bytes: &[u8], p: &mut usize) -> Result<Address, ParseError> {
    *p = skip_white(bytes, *p);
    let kind = match bytes.get(*p) {
        Some(b'.') => {
            *p += 1;
            AddressKind::Current
        }
        Some(b'$') => {
            *p += 1;
            AddressKind::End
        }
        Some(b'\'') => {
            *p += 1;
            let mark = bytes.get(*p).copied().unwrap_or(0) as char;
            if *p < bytes.len() {
                *p += 1;
            }
            AddressKind::Mark(mark)
        }
        Some(&c @ (b'/' | b'?')) => {
            *p += 1;
            let regex = get_pattern(bytes, p);
            if c == b'/' {
                AddressKind::ForwardSearch(regex)
            } else {
                AddressKind::BackwardSearch(regex)
            }
        }
        Some(b'\\') => {
            *p += 1;
            let kind = match bytes.get(*p) {
                Some(b'&') => AddressKind::SubstituteSearch,
                Some(b'?') => AddressKind::BackwardPreviousSearch,
                Some(b'/') => AddressKind::ForwardPreviousSearch,
                _ => return Err(ParseError::new(messages::E_BACKSLASH, *p)),
            };
            *p += 1;
            kind
        }
        Some(b'0'..=b'9') => {
            let (value, after) = get_digits(bytes, *p);
            *p = after;
            AddressKind::Fixed(value.max(0) as u64)
        }
        _ => AddressKind::Missing,
    };
    Ok(Address { kind, followups: Vec::new() })
}

/// Greedily accumulates `+N`, `-N`, `/re/` and `?re?` followups.
pub(crate) fn get_address_followups(
    bytes: &[u8],
    p: &mut usize,
) -> Result<Vec<AddressFollowup>, ParseError> {
    let mut followups = Vec::new();
    loop {
        let q = skip_white(bytes, *p);
        match bytes.get(q) {
            Some(&sign @ (b'-' | b'+')) => {
                let mut i = q + 1;
                let shift = if bytes.get(i).is_some_and(u8::is_ascii_digit) {
                    let (value, after) = get_digits(bytes, i);
                    i = after;
                    value
                } else {
                    1
                };
                followups
                    .push(AddressFollowup::Shift(if sign == b'+' { shift } else { -shift }));
                *p = i;
            }
            Some(b'/') => {
                let mut i = q + 1;
                let regex = get_pattern(bytes, &mut i);
                followups.push(AddressFollowup::ForwardPattern(regex));
                *p = i;
            }
            Some(b'?') => {
                let mut i = q + 1;
                let regex = get_pattern(bytes, &mut i);
                followups.push(AddressFollowup::BackwardPattern(regex));
                *p = i;
            }
            _ => break,
        }
    }
    Ok(followups)
}

/// Offset of the next command when `p` sits at a separator (possibly
/// after whitespace).
fn check_nextcmd(bytes: &[u8], p: usize) -> Option<usize> {
    let q = skip_white(bytes, p);
    if matches!(bytes.get(q), Some(b'|' | b'\n')) { Some(q + 1) } else { None }
}

/// Finds a built-in command by name, or recognises a user command.
fn find_command(bytes: &[u8], p: &mut usize) -> Result<(CmdKind, Option<String>), ParseError> {
    let start = *p;
    let at = |i: usize| bytes.get(i).copied().unwrap_or(0);

    // The 'k' command may be directly followed by any character.
    if at(start) == b'k' {
        *p = start + 1;
        return Ok((CmdKind::K, None));
    }

    // The 's' command can be directly followed by a flag letter, but
    // :sre[wind], :scrip[tnames], :scs[cope], :sim[alt], :sig[ns] and
    // :sil[ent] are other commands.
    if at(start) == b's'
        && ((at(start + 1) == b'c'
            && at(start + 2) != b's'
            && at(start + 2) != b'r'
            && at(start + 3) != b'i'
            && at(start + 4) != b'p')
            || at(start + 1) == b'g'
            || (at(start + 1) == b'i'
                && at(start + 2) != b'm'
                && at(start + 2) != b'l'
                && at(start + 2) != b'g')
            || at(start + 1) == b'I'
            || (at(start + 1) == b'r' && at(start + 2) != b'e'))
    {
        *p = start + 1;
        return Ok((CmdKind::Substitute, None));
    }

    let mut end = start;
    while at(end).is_ascii_alphabetic() {
        end += 1;
    }
    // For python 3.x support ":py3", ":py3file", etc.
    if at(start) == b'p' && at(start + 1) == b'y' {
        while at(end).is_ascii_alphanumeric() {
            end += 1;
        }
    }

    // Non-alphabetic one-character commands.
    if end == start && b"@*!=><&~#".contains(&at(start)) {
        end = start + 1;
    }

    let mut len = end - start;
    // ":dl" and ":dp" up to ":deletel"/":deletep" carry an ex flag, not
    // a longer name.
    if at(start) == b'd' && len >= 2 && matches!(at(end - 1), b'l' | b'p') {
        let body = &bytes[start..end - 1];
        if b"delete".starts_with(body) {
            len -= 1;
        }
    }

    if len > 0 {
        let typed = &bytes[start..start + len];
        let scan_from = first_letter_start(typed[0]);
        for i in scan_from..CmdKind::ALL.len() {
            let kind = CmdKind::ALL[i];
            let Some(name) = kind.name() else { continue };
            if name.as_bytes().len() >= len && &name.as_bytes()[..len] == typed {
                *p = start + len;
                return Ok((kind, None));
            }
        }
    }

    // An unknown name starting with an uppercase letter is a user
    // command; those may also contain digits.
    if at(start).is_ascii_uppercase() {
        let mut e = start;
        while at(e).is_ascii_alphanumeric() {
            e += 1;
        }
        let name = String::from_utf8_lossy(&bytes[start..e]).into_owned();
        *p = e;
        return Ok((CmdKind::User, Some(name)));
    }

    Err(ParseError::new(messages::E_NOT_EDITOR_CMD, start))
}

/// Copies the argument of a command with ordinary argument scanning.
///
/// Handles Ctrl-V escapes, trailing comments and `|` terminators per
/// descriptor flags. Returns the processed argument and the number of
/// source bytes consumed (past the separator when one ended the
/// command).
fn get_cmd_arg(kind: CmdKind, o: &ParserOptions, src: &str) -> (String, usize) {
    let def = cmddef(kind);
    let bytes = src.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0usize;
    let mut consumed = bytes.len();

    while i < bytes.len() {
        let b = bytes[i];
        if b == CTRL_V {
            if def.flags.contains(CmdFlags::USECTRLV) {
                out.push(b);
            }
            i += 1;
            if i >= bytes.len() {
                break;
            }
            out.push(bytes[i]);
            i += 1;
            continue;
        }

        let comment_start = b == b'"'
            && !def.flags.contains(CmdFlags::NOTRLCOM)
            && !(matches!(kind, CmdKind::At | CmdKind::Star) && i == 0)
            && !(kind == CmdKind::Redir && i == 1 && bytes[0] == b'@');
        if comment_start || b == b'|' || b == b'\n' {
            // A backslash escapes the bar unless Ctrl-V escaping is kept
            // and the bar CPO flag is off.
            if (o.flags.contains(PocFlags::CPO_BAR) || !def.flags.contains(CmdFlags::USECTRLV))
                && out.last() == Some(&b'\\')
            {
                out.pop();
                out.push(b);
                i += 1;
                continue;
            }
            consumed = if comment_start { bytes.len() } else { i + 1 };
            break;
        }

        out.push(b);
        i += 1;
    }

    let mut arg = String::from_utf8_lossy(&out).into_owned();
    if !def.flags.contains(CmdFlags::NOTRLCOM) {
        let trimmed = arg.trim_end_matches([' ', '\t']).len();
        arg.truncate(trimmed);
    }
    (arg, consumed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lines::StringLineSource;
    use pretty_assertions::assert_eq;

    fn parse(line: &str) -> ParsedCmd {
        let mut lines = StringLineSource::new("");
        let o = ParserOptions::default();
        let position = CommandPosition::start_of("<test>");
        parse_one_cmd(line, 0, &o, &position, &mut lines).0
    }

    fn kind_of(line: &str) -> CmdKind {
        parse(line).node.unwrap().kind
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(kind_of("quit"), CmdKind::Quit);
        assert_eq!(kind_of("q"), CmdKind::Quit);
        assert_eq!(kind_of(":::q"), CmdKind::Quit);
        assert_eq!(kind_of("echo 1"), CmdKind::Echo);
    }

    #[test]
    fn test_prefix_disambiguation() {
        assert_eq!(kind_of("t"), CmdKind::T);
        assert_eq!(kind_of("ta"), CmdKind::Tag);
        assert_eq!(kind_of("tabn"), CmdKind::Tabnext);
        assert_eq!(kind_of("tabnew"), CmdKind::Tabnew);
        assert_eq!(kind_of("vi"), CmdKind::Visual);
        assert_eq!(kind_of("vie"), CmdKind::View);
    }

    #[test]
    fn test_k_takes_tail() {
        let parsed = parse("ka");
        let node = parsed.node.unwrap();
        assert_eq!(node.kind, CmdKind::K);
        assert_eq!(node.args[0], CmdArg::Char(Some('a')));
    }

    #[test]
    fn test_substitute_family_disambiguation() {
        assert_eq!(kind_of("sg"), CmdKind::Substitute);
        assert_eq!(kind_of("sil echo 1"), CmdKind::Silent);
        assert_eq!(kind_of("sim x"), CmdKind::Simalt);
        assert_eq!(kind_of("sre"), CmdKind::Srewind);
    }

    #[test]
    fn test_dl_is_delete_with_flag() {
        let node = parse("dl").node.unwrap();
        assert_eq!(node.kind, CmdKind::Delete);
        // The trailing l is an ex flag.
        assert!(node.exflags.contains(ExFlags::LIST));
    }

    #[test]
    fn test_py3_name_with_digits() {
        assert_eq!(kind_of("py3 print(1)"), CmdKind::Py3);
        assert_eq!(kind_of("python3 print(1)"), CmdKind::Python3);
    }

    #[test]
    fn test_nonalpha_commands() {
        assert_eq!(kind_of("!ls"), CmdKind::Bang);
        assert_eq!(kind_of("<"), CmdKind::Lshift);
        assert_eq!(kind_of("="), CmdKind::Equal);
    }

    #[test]
    fn test_user_command() {
        let node = parse("MyCmd some args").node.unwrap();
        assert_eq!(node.kind, CmdKind::User);
        assert_eq!(node.name.as_deref(), Some("MyCmd"));
        assert_eq!(node.args[0], CmdArg::String(Some("some args".to_owned())));
    }

    #[test]
    fn test_unknown_command_recovers() {
        let parsed = parse("bogusness");
        assert_eq!(parsed.status, ParseStatus::Recovered);
        let node = parsed.node.unwrap();
        assert_eq!(node.kind, CmdKind::SyntaxError);
        assert_eq!(node.args[1], CmdArg::String(Some(messages::E_NOT_EDITOR_CMD.to_owned())));
    }

    #[test]
    fn test_hashbang_only_at_column_one() {
        assert_eq!(kind_of("#!/usr/bin/vim -S"), CmdKind::HashbangComment);
        let parsed = parse("  #!x");
        assert_eq!(parsed.status, ParseStatus::Recovered);
    }

    #[test]
    fn test_comment() {
        let node = parse("\" a note").node.unwrap();
        assert_eq!(node.kind, CmdKind::Comment);
        assert_eq!(node.args[0], CmdArg::String(Some(" a note".to_owned())));
    }

    #[test]
    fn test_empty_line() {
        let parsed = parse("");
        assert!(parsed.node.is_none());
        // Whitespace and colons alone are a missing command.
        let parsed = parse("  :: ");
        assert_eq!(parsed.node.unwrap().kind, CmdKind::Missing);
    }

    #[test]
    fn test_exmode_empty_line_advances() {
        let mut lines = StringLineSource::new("");
        let o = ParserOptions { flags: PocFlags::EXMODE, ..Default::default() };
        let position = CommandPosition::start_of("<test>");
        let (parsed, _) = parse_one_cmd("", 0, &o, &position, &mut lines);
        let node = parsed.node.unwrap();
        assert_eq!(node.kind, CmdKind::Print);
        assert_eq!(node.range.0[0].address.followups, vec![AddressFollowup::Shift(1)]);
    }

    #[test]
    fn test_range_alone_is_missing_node() {
        let node = parse("3").node.unwrap();
        assert_eq!(node.kind, CmdKind::Missing);
        assert_eq!(node.range.0[0].address.kind, AddressKind::Fixed(3));
    }

    #[test]
    fn test_bar_after_range_prints() {
        let mut lines = StringLineSource::new("");
        let o = ParserOptions::default();
        let position = CommandPosition::start_of("<test>");
        let (parsed, next) = parse_one_cmd("3|", 0, &o, &position, &mut lines);
        assert_eq!(parsed.node.unwrap().kind, CmdKind::Print);
        assert_eq!(next, 2);
    }

    #[test]
    fn test_percent_range() {
        let node = parse("%print").node.unwrap();
        assert_eq!(node.kind, CmdKind::Print);
        let elems = node.range.elements();
        assert_eq!(elems[0].address.kind, AddressKind::Fixed(1));
        assert_eq!(elems[1].address.kind, AddressKind::End);
    }

    #[test]
    fn test_star_range_and_cpo() {
        let node = parse("*print").node.unwrap();
        assert_eq!(node.range.elements()[0].address.kind, AddressKind::Mark('<'));
        let mut lines = StringLineSource::new("");
        let o = ParserOptions { flags: PocFlags::CPO_STAR, ..Default::default() };
        let position = CommandPosition::start_of("<test>");
        let (parsed, _) = parse_one_cmd("*p", 0, &o, &position, &mut lines);
        // With the star expansion disabled, * is the @* register command.
        assert_eq!(parsed.node.unwrap().kind, CmdKind::Star);
    }

    #[test]
    fn test_complex_range() {
        let node = parse("1,$print").node.unwrap();
        let elems = node.range.elements();
        assert_eq!(elems.len(), 2);
        assert_eq!(elems[0].address.kind, AddressKind::Fixed(1));
        assert!(!elems[0].set_cursor);
        assert_eq!(elems[1].address.kind, AddressKind::End);
    }

    #[test]
    fn test_semicolon_sets_cursor() {
        let node = parse("/a/;/b/print").node.unwrap();
        let elems = node.range.elements();
        assert!(elems[0].set_cursor);
        assert_eq!(elems[0].address.kind, AddressKind::ForwardSearch(Regex("a".into())));
    }

    #[test]
    fn test_address_followups() {
        let node = parse("/pat/+2print").node.unwrap();
        let address = &node.range.elements()[0].address;
        assert_eq!(address.followups, vec![AddressFollowup::Shift(2)]);
    }

    #[test]
    fn test_backslash_addresses() {
        let node = parse("\\&print").node.unwrap();
        assert_eq!(node.range.elements()[0].address.kind, AddressKind::SubstituteSearch);
        let parsed = parse("\\xprint");
        assert_eq!(parsed.status, ParseStatus::Recovered);
    }

    #[test]
    fn test_bang() {
        let node = parse("q!").node.unwrap();
        assert!(node.bang);
        let parsed = parse("echo! 1");
        assert_eq!(parsed.status, ParseStatus::Recovered);
    }

    #[test]
    fn test_no_range_allowed() {
        let parsed = parse("3echo 1");
        assert_eq!(parsed.status, ParseStatus::Recovered);
        let node = parsed.node.unwrap();
        assert_eq!(node.args[1], CmdArg::String(Some(messages::E_NORANGE.to_owned())));
    }

    #[test]
    fn test_count_and_exflags() {
        let node = parse("print 3l#p").node.unwrap();
        assert_eq!(node.count, Count::Count(3));
        assert!(node.exflags.contains(ExFlags::LIST | ExFlags::LNR | ExFlags::PRINT));
    }

    #[test]
    fn test_trailing_characters() {
        let parsed = parse("quit now");
        assert_eq!(parsed.status, ParseStatus::Recovered);
        let node = parsed.node.unwrap();
        assert_eq!(node.args[1], CmdArg::String(Some(messages::E_TRAILING.to_owned())));
    }

    #[test]
    fn test_modifier_chain() {
        let node = parse("silent! botright split x").node.unwrap();
        assert_eq!(node.kind, CmdKind::Silent);
        assert!(node.bang);
        assert_eq!(node.children[0].kind, CmdKind::Botright);
        assert_eq!(node.children[0].children[0].kind, CmdKind::Split);
    }

    #[test]
    fn test_modifier_with_count() {
        let node = parse("3verbose echo 1").node.unwrap();
        assert_eq!(node.kind, CmdKind::Verbose);
        assert_eq!(node.count, Count::Count(3));
    }

    #[test]
    fn test_modifier_count_rejected() {
        let parsed = parse("3silent echo 1");
        assert_eq!(parsed.status, ParseStatus::Recovered);
    }

    #[test]
    fn test_bar_terminates() {
        let mut lines = StringLineSource::new("");
        let o = ParserOptions::default();
        let position = CommandPosition::start_of("<test>");
        let (parsed, next) = parse_one_cmd("undo|redo", 0, &o, &position, &mut lines);
        assert_eq!(parsed.node.unwrap().kind, CmdKind::Undo);
        assert_eq!(next, 5);
        let (parsed, next) = parse_one_cmd("undo|redo", next, &o, &position, &mut lines);
        assert_eq!(parsed.node.unwrap().kind, CmdKind::Redo);
        assert_eq!(next, 9);
    }

    #[test]
    fn test_escaped_bar_in_argument() {
        let node = parse("buffer a\\|b").node.unwrap();
        assert_eq!(node.args[0], CmdArg::String(Some("a|b".to_owned())));
    }

    #[test]
    fn test_trailing_comment_in_argument() {
        let node = parse("buffer name \" comment").node.unwrap();
        assert_eq!(node.args[0], CmdArg::String(Some("name".to_owned())));
    }

    #[test]
    fn test_echo_keeps_quote() {
        // NOTRLCOM commands keep the quote: it starts a string.
        let node = parse("echo \"x\"").node.unwrap();
        assert_eq!(node.kind, CmdKind::Echo);
        let expr = node.args[0].as_expr().unwrap();
        assert_eq!(expr.nodes.len(), 1);
    }
}
