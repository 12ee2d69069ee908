//! Property tests: dump determinism and keycode translation identity.

use proptest::prelude::*;
use viml::{ParserOptions, parse_cmd_test};
use viml_keycodes::{CpoFlags, KeyTranslateEnv, replace_termcodes, translate_mapping};

proptest! {
    /// Two independent parses of the same input produce byte-identical
    /// dumps, and the parser never panics on arbitrary printable input.
    #[test]
    fn prop_parse_then_dump_is_deterministic(source in "[ -~\n]{0,120}") {
        let options = ParserOptions::default();
        let first = parse_cmd_test(&source, &options, false);
        let second = parse_cmd_test(&source, &options, false);
        prop_assert_eq!(first, second);
    }

    /// Parsing with options enabled stays panic-free too.
    #[test]
    fn prop_parse_with_exmode_never_panics(source in "[ -~\n]{0,80}") {
        let options = ParserOptions {
            flags: viml::PocFlags::EXMODE | viml::PocFlags::CPO_STAR,
            ..Default::default()
        };
        let _ = parse_cmd_test(&source, &options, false);
    }
}

/// Keycode translation followed by its inverse is the identity on
/// well-formed canonical key names.
#[test]
fn test_keycode_roundtrip_identity() {
    let env = KeyTranslateEnv::new();
    for name in [
        "<F1>", "<F12>", "<S-F2>", "<C-S-Up>", "<Del>", "<BS>", "<Home>", "<End>", "<PageUp>",
        "<PageDown>", "<kPlus>", "<kEnter>", "<Help>", "<Undo>",
    ] {
        let translated =
            replace_termcodes(name.as_bytes(), false, true, true, CpoFlags::empty(), &env);
        let back = translate_mapping(translated.as_bytes(), CpoFlags::empty());
        assert_eq!(back, name, "round trip through the internal encoding");
    }
}
