//! Internal key-sequence encoding and `<…>` key-notation translation.
//!
//! Mapping and menu right-hand sides are stored in an internal binary
//! encoding where one reserved lead byte ([`K_SPECIAL`]) introduces
//! multi-byte codes:
//!
//! - `K_SPECIAL KS_MODIFIER <mask>`: a modifier prefix for the key that
//!   follows;
//! - `K_SPECIAL <t0> <t1>`: a special key identified by a two-byte
//!   termcap-style code;
//! - `K_SPECIAL KS_SPECIAL KE_FILLER`: a literal `K_SPECIAL` byte from
//!   the input, tripled to keep the encoding transparent.
//!
//! [`replace_termcodes`] performs the forward translation (`<C-X>`,
//! `<Leader>`, `<SID>`, `<t_xx>`, `<Char-NNN>`, raw termcodes) and
//! [`translate_mapping`] the reverse one. Behaviour toggles come from a
//! [`CpoFlags`] word (backslash handling, `<>` recognition, raw termcode
//! recognition); ambient translation state (the termcode table, the
//! script id for `<SID>`, the leader strings) travels in a read-only
//! [`KeyTranslateEnv`] so the translation itself stays pure.

mod names;
mod translate;

pub use names::{KEY_NAMES, get_special_key_code, special_key_name};
pub use translate::{
    find_special_key, get_special_key_name, lrswap, replace_termcodes, translate_mapping,
    trans_special,
};

use bitflags::bitflags;

/// Reserved lead byte of the internal encoding.
pub const K_SPECIAL: u8 = 0x80;

/// Second byte marking an escaped literal `K_SPECIAL`.
pub const KS_SPECIAL: u8 = 254;
/// Second byte introducing an "extra" key code (no termcap equivalent).
pub const KS_EXTRA: u8 = 253;
/// Second byte introducing a modifier mask.
pub const KS_MODIFIER: u8 = 252;

/// Filler third byte after `KS_SPECIAL`.
pub const KE_FILLER: u8 = b'X';
/// `<SNR>` marker; followed by a script id and `_` in mapping text.
pub const KE_SNR: u8 = 83;
/// `<Plug>` marker.
pub const KE_PLUG: u8 = 84;

// Extra key codes used with KS_EXTRA.
pub const KE_TAB: u8 = 1;
pub const KE_XUP: u8 = 3;
pub const KE_XDOWN: u8 = 4;
pub const KE_XLEFT: u8 = 5;
pub const KE_XRIGHT: u8 = 6;
pub const KE_XHOME: u8 = 7;
pub const KE_ZHOME: u8 = 8;
pub const KE_XEND: u8 = 9;
pub const KE_ZEND: u8 = 10;
pub const KE_XF1: u8 = 11;
pub const KE_XF2: u8 = 12;
pub const KE_XF3: u8 = 13;
pub const KE_XF4: u8 = 14;
pub const KE_NUL: u8 = 15;

/// A key as the translation layer sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A plain character (Unicode code point).
    Char(u32),
    /// A special key written as `K_SPECIAL` plus this two-byte code.
    Special(u8, u8),
}

impl Key {
    /// The `<Nul>` key.
    pub const ZERO: Key = Key::Special(KS_EXTRA, KE_NUL);

    /// True for keys that need the three-byte `K_SPECIAL` form.
    #[inline]
    pub const fn is_special(self) -> bool {
        matches!(self, Key::Special(..))
    }
}

bitflags! {
    /// Modifier mask stored after `KS_MODIFIER`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0x02;
        const CTRL  = 0x04;
        const ALT   = 0x08;
        const META  = 0x10;
        const CMD   = 0x20;
    }
}

impl Modifiers {
    /// Mask bit for a modifier name letter, or `None` for an unknown one.
    pub fn from_letter(c: u8) -> Option<Modifiers> {
        match c.to_ascii_uppercase() {
            b'S' => Some(Modifiers::SHIFT),
            b'C' => Some(Modifiers::CTRL),
            b'M' | b'A' => Some(Modifiers::ALT),
            b'T' => Some(Modifiers::META),
            b'D' => Some(Modifiers::CMD),
            _ => None,
        }
    }

    /// Name letters in canonical output order.
    pub fn name_letters(self) -> impl Iterator<Item = char> {
        [
            (Modifiers::ALT, 'M'),
            (Modifiers::META, 'T'),
            (Modifiers::CTRL, 'C'),
            (Modifiers::SHIFT, 'S'),
            (Modifiers::CMD, 'D'),
        ]
        .into_iter()
        .filter(move |(m, _)| self.contains(*m))
        .map(|(_, c)| c)
    }
}

bitflags! {
    /// Behaviour toggles for key translation, distilled from the
    /// compatible-options string.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CpoFlags: u8 {
        /// Backslash is a literal character (no escaping in LHS/RHS).
        const BSLASH  = 0x01;
        /// `<…>` key notation is not recognised.
        const SPECI   = 0x02;
        /// Raw terminal codes are not recognised.
        const KEYCODE = 0x04;
        /// `\|` stays a literal backslash-bar pair.
        const BAR     = 0x08;
    }
}

/// A translated key sequence in the internal encoding.
///
/// Not a `String`: the encoding contains `K_SPECIAL` and `KS_*` bytes
/// that are not valid UTF-8.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeySequence(pub Vec<u8>);

impl KeySequence {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for KeySequence {
    fn from(bytes: Vec<u8>) -> Self {
        KeySequence(bytes)
    }
}

/// One raw terminal code: the byte sequence the terminal sends and the
/// two-byte termcap-style name it translates to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Termcode {
    pub name: [u8; 2],
    pub code: Vec<u8>,
}

/// Read-only ambient state for key translation.
///
/// The original kept the termcode table and current script id in process
/// globals; passing them in keeps the translation layer pure.
#[derive(Debug, Clone, Default)]
pub struct KeyTranslateEnv {
    termcodes: Vec<Termcode>,
    /// Script id substituted for `<SID>`; scripts are numbered from 1.
    pub current_sid: u32,
    /// Value of `<Leader>`; a backslash when unset.
    pub leader: Option<Vec<u8>>,
    /// Value of `<LocalLeader>`; a backslash when unset.
    pub local_leader: Option<Vec<u8>>,
}

impl KeyTranslateEnv {
    pub fn new() -> Self {
        KeyTranslateEnv { current_sid: 1, ..Default::default() }
    }

    /// Registers a terminal code.
    pub fn add_termcode(&mut self, name: [u8; 2], code: Vec<u8>) {
        self.termcodes.push(Termcode { name, code });
    }

    /// Finds a termcode matching a prefix of `src`, returning its name and
    /// the matched length.
    pub fn match_termcode(&self, src: &[u8]) -> Option<([u8; 2], usize)> {
        self.termcodes
            .iter()
            .find(|tc| !tc.code.is_empty() && src.starts_with(&tc.code))
            .map(|tc| (tc.name, tc.code.len()))
    }
}

/// Appends the UTF-8 encoding of `cp` to `out`, tripling any byte equal
/// to `K_SPECIAL` to keep the encoding transparent.
pub fn push_char_escaped(out: &mut Vec<u8>, cp: u32) {
    let mut buf = [0u8; 4];
    let encoded = char::from_u32(cp).unwrap_or('\u{fffd}').encode_utf8(&mut buf);
    for &b in encoded.as_bytes() {
        if b == K_SPECIAL {
            out.extend_from_slice(&[K_SPECIAL, KS_SPECIAL, KE_FILLER]);
        } else {
            out.push(b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_names() {
        assert_eq!(Modifiers::from_letter(b'c'), Some(Modifiers::CTRL));
        assert_eq!(Modifiers::from_letter(b'A'), Some(Modifiers::ALT));
        assert_eq!(Modifiers::from_letter(b'x'), None);
    }

    #[test]
    fn test_name_letter_order() {
        let mods = Modifiers::SHIFT | Modifiers::CTRL;
        let letters: String = mods.name_letters().collect();
        assert_eq!(letters, "CS");
    }

    #[test]
    fn test_push_char_escaped_plain() {
        let mut out = Vec::new();
        push_char_escaped(&mut out, 'a' as u32);
        assert_eq!(out, b"a");
    }

    #[test]
    fn test_push_char_escaped_triples_k_special() {
        // U+0080 encodes as 0xc2 0x80; the 0x80 must be tripled.
        let mut out = Vec::new();
        push_char_escaped(&mut out, 0x80);
        assert_eq!(out, &[0xc2, K_SPECIAL, KS_SPECIAL, KE_FILLER]);
    }

    #[test]
    fn test_termcode_match() {
        let mut env = KeyTranslateEnv::new();
        env.add_termcode(*b"ku", b"\x1b[A".to_vec());
        assert_eq!(env.match_termcode(b"\x1b[Arest"), Some((*b"ku", 3)));
        assert_eq!(env.match_termcode(b"\x1b[Z"), None);
    }
}
