//! Forward and reverse key-notation translation.

use crate::names::{get_special_key_code, handle_x_key, special_key_name};
use crate::{
    CpoFlags, K_SPECIAL, KE_FILLER, KE_SNR, KS_EXTRA, KS_MODIFIER, KS_SPECIAL, Key,
    KeySequence, KeyTranslateEnv, Modifiers, push_char_escaped,
};
use viml_lexis::{is_id_byte, str_to_nr, utf8_char_len, utf8_decode};

const CTRL_V: u8 = 0x16;

/// Parses a `<…>` name at `bytes[at..]`.
///
/// Returns the key, its modifiers and the offset just past the closing
/// `>`, or `None` when the text is not a well-formed key name.
///
/// `keycode` selects the key-code interpretation (`<BS>` stays the
/// backspace key rather than the 0x08 character); `keep_x_key` suppresses
/// the `xHome`-to-`Home` style canonicalisation.
pub fn find_special_key(
    bytes: &[u8],
    at: usize,
    keycode: bool,
    keep_x_key: bool,
) -> Option<(Key, Modifiers, usize)> {
    if bytes.get(at) != Some(&b'<') {
        return None;
    }

    // Find the end of the modifier list.
    let mut last_dash = at;
    let mut bp = at + 1;
    while let Some(&b) = bytes.get(bp) {
        if b != b'-' && !is_id_byte(b) {
            break;
        }
        if b == b'-' {
            last_dash = bp;
            if bp + 1 < bytes.len() {
                let l = utf8_char_len(bytes[bp + 1]);
                // Anything is accepted as the final key, like <C-?>.
                if bytes.get(bp + 1 + l) == Some(&b'>') {
                    bp += l;
                }
            }
        }
        if bytes.get(bp) == Some(&b't')
            && bytes.get(bp + 1) == Some(&b'_')
            && bp + 3 < bytes.len()
            && bytes[bp + 2] != 0
            && bytes[bp + 3] != 0
        {
            bp += 3;
        } else if bytes[bp..].len() >= 5 && bytes[bp..bp + 5].eq_ignore_ascii_case(b"char-") {
            let parsed = str_to_nr(bytes, bp + 5);
            bp += 5 + parsed.len;
            break;
        }
        bp += 1;
    }

    if bytes.get(bp) != Some(&b'>') {
        return None;
    }
    let end_of_name = bp + 1;

    // Which modifiers are given?
    let mut modifiers = Modifiers::empty();
    let mut mp = at + 1;
    while mp < last_dash {
        if bytes[mp] != b'-' {
            match Modifiers::from_letter(bytes[mp]) {
                Some(bit) => modifiers |= bit,
                None => return None,
            }
        }
        mp += 1;
    }

    let name_start = last_dash + 1;
    let mut key = if bytes[name_start..].len() >= 5
        && bytes[name_start..name_start + 5].eq_ignore_ascii_case(b"char-")
        && bytes.get(name_start + 5).is_some_and(u8::is_ascii_digit)
    {
        // <Char-123>, <Char-033>, <Char-0x33>
        let parsed = str_to_nr(bytes, name_start + 5);
        Key::Char(parsed.unsigned_value as u32)
    } else {
        let l = bytes.get(name_start).map_or(1, |&b| utf8_char_len(b));
        if !modifiers.is_empty() && bytes.get(name_start + l) == Some(&b'>') {
            // Modifier with a single character.
            Key::Char(utf8_decode(bytes, name_start).0)
        } else {
            let (named, _) = get_special_key_code(bytes, name_start)?;
            if keep_x_key { named } else { handle_x_key(named) }
        }
    };

    if key == Key::Char(0) && bytes.get(name_start + 1) != Some(&b'>') {
        return None;
    }

    key = simplify_key(key, &mut modifiers);

    if !keycode {
        // Don't want a key code; use the single-byte character.
        if key == Key::Special(b'k', b'b') {
            key = Key::Char(0x08);
        } else if key == Key::Special(b'k', b'D') || key == Key::Special(b'K', b'M') {
            key = Key::Char(0x7f);
        }
    }

    if let Key::Char(c) = key {
        key = extract_modifiers(c, &mut modifiers);
    }

    Some((key, modifiers, end_of_name))
}

/// Folds a Shift modifier into the key when a dedicated shifted key code
/// exists (`<S-Tab>` becomes the back-tab key).
fn simplify_key(key: Key, modifiers: &mut Modifiers) -> Key {
    if modifiers.contains(Modifiers::SHIFT) && key == Key::Char(b'\t' as u32) {
        modifiers.remove(Modifiers::SHIFT);
        return Key::Special(b'k', b'B');
    }
    key
}

/// Tries to fold modifiers into a plain character: `Shift-a` becomes `A`,
/// `Ctrl-X` the control character, `Alt-x` the byte with the high bit set.
fn extract_modifiers(c: u32, modifiers: &mut Modifiers) -> Key {
    let mut c = c;
    if modifiers.contains(Modifiers::SHIFT) && char::from_u32(c).is_some_and(|ch| ch.is_ascii_alphabetic())
    {
        c = u32::from(char::from_u32(c).unwrap_or('\0').to_ascii_uppercase());
        modifiers.remove(Modifiers::SHIFT);
    }
    if modifiers.contains(Modifiers::CTRL)
        && ((0x3f..=0x5f).contains(&c)
            || char::from_u32(c).is_some_and(|ch| ch.is_ascii_alphabetic()))
    {
        c = u32::from(char::from_u32(c).unwrap_or('\0').to_ascii_uppercase()) ^ 0x40;
        modifiers.remove(Modifiers::CTRL);
        if c == 0 {
            // <C-@> is <Nul>
            return Key::ZERO;
        }
    }
    if modifiers.contains(Modifiers::ALT) && c < 0x80 {
        c |= 0x80;
        modifiers.remove(Modifiers::ALT);
    }
    Key::Char(c)
}

/// Translates one `<…>` name into the internal encoding, appending to
/// `out`.
///
/// Returns the new source offset past the name, or `None` for no match
/// (nothing is appended then).
pub fn trans_special(bytes: &[u8], at: usize, keycode: bool, out: &mut Vec<u8>) -> Option<usize> {
    let (key, modifiers, end) = find_special_key(bytes, at, keycode, false)?;

    if !modifiers.is_empty() {
        out.extend_from_slice(&[K_SPECIAL, KS_MODIFIER, modifiers.bits()]);
    }
    match key {
        Key::Special(t0, t1) => out.extend_from_slice(&[K_SPECIAL, t0, t1]),
        Key::Char(c) => {
            if keycode {
                push_char_escaped(out, c);
            } else {
                let mut buf = [0u8; 4];
                let encoded = char::from_u32(c).unwrap_or('\u{fffd}').encode_utf8(&mut buf);
                out.extend_from_slice(encoded.as_bytes());
            }
        }
    }
    Some(end)
}

/// Rewrites `<…>` key names and raw terminal codes in `from` into the
/// internal binary encoding.
///
/// `from_part` marks the left-hand side of a mapping (a trailing escape
/// character is kept, and the `#n` function-key shorthand is accepted at
/// the start). `do_lt` also translates `<lt>`; `special` forces `<…>`
/// recognition regardless of the CPO word.
pub fn replace_termcodes(
    from: &[u8],
    from_part: bool,
    do_lt: bool,
    special: bool,
    cpo: CpoFlags,
    env: &KeyTranslateEnv,
) -> KeySequence {
    let do_backslash = !cpo.contains(CpoFlags::BSLASH);
    let do_special = !cpo.contains(CpoFlags::SPECI) || special;
    let do_key_code = !cpo.contains(CpoFlags::KEYCODE);

    let mut result: Vec<u8> = Vec::with_capacity(from.len() + 8);
    let mut src = 0usize;

    // Check for #n at start only: function key n.
    if from_part && from.first() == Some(&b'#') && from.get(1).is_some_and(u8::is_ascii_digit) {
        result.push(K_SPECIAL);
        result.push(b'k');
        result.push(if from[1] == b'0' { b';' } else { from[1] });
        src = 2;
    }

    while src < from.len() {
        if do_special && (do_lt || !from[src..].starts_with(b"<lt>")) {
            // Replace <SID> by K_SPECIAL KS_EXTRA KE_SNR <sid> _
            if from[src..].len() >= 5 && from[src..src + 5].eq_ignore_ascii_case(b"<SID>") {
                src += 5;
                result.extend_from_slice(&[K_SPECIAL, KS_EXTRA, KE_SNR]);
                result.extend_from_slice(env.current_sid.to_string().as_bytes());
                result.push(b'_');
                continue;
            }
            if let Some(end) = trans_special(from, src, true, &mut result) {
                src = end;
                continue;
            }
        }

        if do_key_code {
            if let Some((name, len)) = env.match_termcode(&from[src..]) {
                result.extend_from_slice(&[K_SPECIAL, name[0], name[1]]);
                src += len;
                continue;
            }
        }

        if do_special {
            let leader = if from[src..].len() >= 8 && from[src..src + 8].eq_ignore_ascii_case(b"<Leader>")
            {
                Some((8, env.leader.as_deref()))
            } else if from[src..].len() >= 13
                && from[src..src + 13].eq_ignore_ascii_case(b"<LocalLeader>")
            {
                Some((13, env.local_leader.as_deref()))
            } else {
                None
            };
            if let Some((len, value)) = leader {
                match value {
                    Some(v) if !v.is_empty() => result.extend_from_slice(v),
                    _ => result.push(b'\\'),
                }
                src += len;
                continue;
            }
        }

        // Remove CTRL-V and take the next character literally. A backslash
        // works the same unless the CPO word makes it literal.
        let b = from[src];
        if b == CTRL_V || (do_backslash && b == b'\\') {
            src += 1;
            if src >= from.len() {
                if from_part {
                    result.push(b);
                }
                break;
            }
        }

        let len = utf8_char_len(from[src]);
        for _ in 0..len.min(from.len() - src) {
            let c = from[src];
            if c == K_SPECIAL {
                result.extend_from_slice(&[K_SPECIAL, KS_SPECIAL, KE_FILLER]);
            } else {
                result.push(c);
            }
            src += 1;
        }
    }

    KeySequence(result)
}

/// Name of a key with its modifiers, in `<…>` notation.
pub fn get_special_key_name(key: Key, modifiers: Modifiers) -> String {
    let mut out = String::from("<");
    for letter in modifiers.name_letters() {
        out.push(letter);
        out.push('-');
    }
    match special_key_name(key) {
        Some(name) => out.push_str(name),
        None => match key {
            Key::Special(t0, t1) => {
                out.push_str("t_");
                out.push(t0 as char);
                out.push(t1 as char);
            }
            Key::Char(c) => out.push(char::from_u32(c).unwrap_or('\u{fffd}')),
        },
    }
    out.push('>');
    out
}

/// Translates an internal key sequence back into the `<…>` notation
/// accepted by `:map`.
pub fn translate_mapping(seq: &[u8], cpo: CpoFlags) -> String {
    let cpo_bslash = cpo.contains(CpoFlags::BSLASH);
    let cpo_special = cpo.contains(CpoFlags::SPECI);
    let mut out = String::new();
    let mut i = 0usize;
    while i < seq.len() {
        let b = seq[i];
        if b == K_SPECIAL && i + 2 < seq.len() {
            let mut modifiers = Modifiers::empty();
            let mut j = i;
            if seq[j + 1] == KS_MODIFIER {
                modifiers = Modifiers::from_bits_truncate(seq[j + 2]);
                j += 3;
            }
            if j + 2 < seq.len() && seq[j] == K_SPECIAL {
                let key = if seq[j + 1] == KS_SPECIAL && seq[j + 2] == KE_FILLER {
                    Key::Char(u32::from(K_SPECIAL))
                } else {
                    Key::Special(seq[j + 1], seq[j + 2])
                };
                if key == Key::Char(u32::from(K_SPECIAL)) && modifiers.is_empty() {
                    // An escaped literal K_SPECIAL byte.
                    out.push('\u{80}');
                } else {
                    out.push_str(&get_special_key_name(key, modifiers));
                }
                i = j + 3;
                continue;
            } else if !modifiers.is_empty() && j < seq.len() {
                let (cp, len) = utf8_decode(seq, j);
                out.push_str(&get_special_key_name(Key::Char(cp), modifiers));
                i = j + len.max(1);
                continue;
            }
        }
        let c = b as char;
        if c == ' '
            || c == '\t'
            || c == '\n'
            || b == CTRL_V
            || (c == '<' && !cpo_special)
            || (c == '\\' && !cpo_bslash)
        {
            out.push(if cpo_bslash { CTRL_V as char } else { '\\' });
        }
        if b != 0 {
            let (cp, len) = utf8_decode(seq, i);
            out.push(char::from_u32(cp).unwrap_or('\u{fffd}'));
            i += len;
        } else {
            i += 1;
        }
    }
    out
}

/// Reverses a buffer in place, for right-to-left mapping display.
pub fn lrswap(buf: &mut [u8]) {
    buf.reverse();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn env() -> KeyTranslateEnv {
        KeyTranslateEnv::new()
    }

    fn rtc(input: &str) -> Vec<u8> {
        replace_termcodes(input.as_bytes(), false, true, true, CpoFlags::empty(), &env()).0
    }

    #[test]
    fn test_f2_encoding() {
        assert_eq!(rtc("<F2>"), vec![K_SPECIAL, b'k', b'2']);
    }

    #[test]
    fn test_ctrl_key() {
        assert_eq!(rtc("<C-X>"), vec![0x18]);
        assert_eq!(rtc("<C-a>"), vec![0x01]);
    }

    #[test]
    fn test_ctrl_at_is_nul() {
        assert_eq!(rtc("<C-@>"), vec![K_SPECIAL, KS_EXTRA, crate::KE_NUL]);
    }

    #[test]
    fn test_shift_alpha_folds() {
        assert_eq!(rtc("<S-x>"), vec![b'X']);
    }

    #[test]
    fn test_shift_f2_keeps_modifier() {
        assert_eq!(rtc("<S-F2>"), vec![K_SPECIAL, KS_MODIFIER, 0x02, K_SPECIAL, b'k', b'2']);
    }

    #[test]
    fn test_shift_tab_simplifies() {
        assert_eq!(rtc("<S-Tab>"), vec![K_SPECIAL, b'k', b'B']);
    }

    #[rstest]
    #[case("<Char-123>", vec![123])]
    #[case("<Char-0x41>", vec![b'A'])]
    #[case("<Char-011>", vec![9])]
    fn test_char_forms(#[case] input: &str, #[case] expected: Vec<u8>) {
        assert_eq!(rtc(input), expected);
    }

    #[test]
    fn test_terminal_option_name() {
        assert_eq!(rtc("<t_kb>"), vec![K_SPECIAL, b'k', b'b']);
    }

    #[test]
    fn test_lt_translated_only_with_do_lt() {
        assert_eq!(rtc("<lt>"), vec![b'<']);
        let kept =
            replace_termcodes(b"<lt>", false, false, true, CpoFlags::empty(), &env());
        assert_eq!(kept.0, b"<lt>".to_vec());
    }

    #[test]
    fn test_sid_replacement() {
        assert_eq!(rtc("<SID>Func"), {
            let mut v = vec![K_SPECIAL, KS_EXTRA, KE_SNR];
            v.extend_from_slice(b"1_Func");
            v
        });
    }

    #[test]
    fn test_leader_fallback() {
        assert_eq!(rtc("<Leader>x"), vec![b'\\', b'x']);
    }

    #[test]
    fn test_k_special_byte_tripled() {
        let seq = replace_termcodes(&[K_SPECIAL], false, true, true, CpoFlags::empty(), &env());
        assert_eq!(seq.0, vec![K_SPECIAL, KS_SPECIAL, KE_FILLER]);
    }

    #[test]
    fn test_function_key_shorthand() {
        let seq = replace_termcodes(b"#3", true, true, true, CpoFlags::empty(), &env());
        assert_eq!(seq.0, vec![K_SPECIAL, b'k', b'3']);
        let f10 = replace_termcodes(b"#0", true, true, true, CpoFlags::empty(), &env());
        assert_eq!(f10.0, vec![K_SPECIAL, b'k', b';']);
    }

    #[test]
    fn test_backslash_escape_removed() {
        assert_eq!(rtc("a\\|b"), b"a|b".to_vec());
    }

    #[test]
    fn test_backslash_literal_under_cpo() {
        let seq =
            replace_termcodes(b"a\\|b", false, true, true, CpoFlags::BSLASH, &env());
        assert_eq!(seq.0, b"a\\|b".to_vec());
    }

    #[test]
    fn test_trailing_ctrl_v_kept_in_lhs() {
        let seq = replace_termcodes(&[b'x', 0x16], true, true, true, CpoFlags::empty(), &env());
        assert_eq!(seq.0, vec![b'x', 0x16]);
        let rhs = replace_termcodes(&[b'x', 0x16], false, true, true, CpoFlags::empty(), &env());
        assert_eq!(rhs.0, vec![b'x']);
    }

    #[test]
    fn test_raw_termcode_match() {
        let mut e = KeyTranslateEnv::new();
        e.add_termcode(*b"ku", b"\x1b[A".to_vec());
        let seq = replace_termcodes(b"\x1b[A", false, true, true, CpoFlags::empty(), &e);
        assert_eq!(seq.0, vec![K_SPECIAL, b'k', b'u']);
        // Suppressed by the KEYCODE flag.
        let plain = replace_termcodes(b"\x1b[A", false, true, true, CpoFlags::KEYCODE, &e);
        assert_eq!(plain.0, b"\x1b[A".to_vec());
    }

    #[rstest]
    #[case("<F2>")]
    #[case("<S-F2>")]
    #[case("<C-S-Up>")]
    #[case("<Del>")]
    #[case("<kPlus>")]
    fn test_roundtrip_identity(#[case] name: &str) {
        let seq = rtc(name);
        assert_eq!(translate_mapping(&seq, CpoFlags::empty()), name);
    }

    #[test]
    fn test_translate_mapping_escapes() {
        let seq = rtc("a b");
        assert_eq!(translate_mapping(&seq, CpoFlags::empty()), "a\\ b");
    }

    #[test]
    fn test_lrswap() {
        let mut buf = b"abc".to_vec();
        lrswap(&mut buf);
        assert_eq!(buf, b"cba");
    }
}
