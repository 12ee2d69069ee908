//! Golden tests for the canonical dump format.
//!
//! The dump is the stable oracle: these strings are load-bearing and
//! byte-exact.

use pretty_assertions::assert_eq;
use rstest::rstest;
use viml::{ParserOptions, parse_cmd_test};

fn dump(source: &str) -> String {
    parse_cmd_test(source, &ParserOptions::default(), false)
}

#[test]
fn test_echo_addition() {
    assert_eq!(dump("echo 1 + 2"), "echo +(N[+1+], N[+2+])");
}

#[test]
fn test_let_destructuring() {
    assert_eq!(
        dump("let [a, b; r] = [1, 2, 3, 4]"),
        "let [](var[+a+], var[+b+], rest(var[+r+])) [](N[+1+], N[+2+], N[+3+], N[+4+])",
    );
}

#[test]
fn test_if_elseif_else_chain() {
    let source = "if x\n  let y = 1\nelseif z\n  let y = 2\nelse\n  let y = 3\nendif\n";
    let expected = "\
if var[+x+]
  let var[+y+] N[+1+]
elseif var[+z+]
  let var[+y+] N[+2+]
else
  let var[+y+] N[+3+]";
    assert_eq!(dump(source), expected);
}

#[test]
fn test_map_silent_expr() {
    assert_eq!(
        dump("map <silent><expr> <F2> foo()"),
        "map <silent><expr> \\x80k2 call(var[+foo+])",
    );
}

#[test]
fn test_function_definition() {
    let source = "function! F(a, ...) range dict\n  return a:000\nendfunction\n";
    let expected = "\
function! var[+F+](a, ...) range dict
  return var[+a:000+]";
    assert_eq!(dump(source), expected);
}

#[test]
fn test_try_catch_finally() {
    let source = "try\n  throw 'x'\ncatch /x/\n  echo 'caught'\nfinally\n  echo 'fin'\nendtry\n";
    let expected = "\
try
  throw '[+'x'+]
catch /x/
  echo '[+'caught'+]
finally
  echo '[+'fin'+]";
    assert_eq!(dump(source), expected);
}

#[rstest]
#[case("echo 'a' . 'b'", "echo ..('[+'a'+], '[+'b'+])")]
#[case("echo a ? 1 : 2", "echo ?:(var[+a+], N[+1+], N[+2+])")]
#[case("echo a ==# b", "echo ==#(var[+a+], var[+b+])")]
#[case("echo a =~? b", "echo =~?(var[+a+], var[+b+])")]
#[case("echo !x", "echo !(var[+x+])")]
#[case("echo -x", "echo -!(var[+x+])")]
#[case("echo 0x1F", "echo X[+0x1F+]")]
#[case("echo 017", "echo O[+017+]")]
#[case("echo 1.5", "echo F[+1.5+]")]
#[case("echo $HOME", "echo $[+HOME+]")]
#[case("echo &tw", "echo &[+tw+]")]
#[case("echo @a", "echo @[+@a+]")]
#[case("echo d.key", "echo .[+key+](var[+d+])")]
#[case("echo a[1]", "echo index(var[+a+], N[+1+])")]
#[case("echo a[1:2]", "echo index(var[+a+], N[+1+], N[+2+])")]
#[case("echo (1)", "echo expr[!(!](N[+1+])")]
#[case("echo {'k': 1}", "echo {}('[+'k'+], N[+1+])")]
#[case("echo a{b}c", "echo cvar(id[+a+], curly[!{!](var[+b+]), id[+c+])")]
fn test_expression_dumps(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(dump(source), expected);
}

#[rstest]
#[case("1,$print", "1,$print")]
#[case("%print", "1,$print")]
#[case("10print", "Aprint")]
#[case(".,.+3print", ".,.+3print")]
#[case("/pat/;?other?print", "/pat/;?other?print")]
#[case("'a,'bprint", "'a,'bprint")]
#[case("\\&print", "\\&print")]
fn test_range_dumps(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(dump(source), expected);
}

#[test]
fn test_count_and_flags_dump() {
    // Counts dump in hex with a space.
    assert_eq!(dump("print 17 l#p"), "print 11 l#p");
}

#[test]
fn test_bang_dump() {
    assert_eq!(dump("quit!"), "quit!");
}

#[test]
fn test_modifier_chain_dump() {
    assert_eq!(dump("silent! botright split"), "silent! botright split");
}

#[test]
fn test_append_dump() {
    let source = "append\nfirst\nsecond\n.\n";
    assert_eq!(dump(source), "append\nfirst\nsecond\n.");
}

#[test]
fn test_syntax_error_dump() {
    let expected = "\
bogus
^
E492: Not an editor command";
    assert_eq!(dump("bogus"), expected);
}

#[test]
fn test_error_column_dump() {
    // The caret points at the bang.
    let expected = "\
echo! 1
    ^
E477: No ! allowed";
    assert_eq!(dump("echo! 1"), expected);
}

#[test]
fn test_user_command_dump() {
    assert_eq!(dump("MyCmd arg text"), "MyCmd arg text");
}

#[test]
fn test_comment_dump() {
    // Empty virtual name, then the comment text as its argument.
    assert_eq!(dump("\" note"), "  note");
}

#[test]
fn test_empty_input_dump() {
    assert_eq!(dump(""), "");
}

#[test]
fn test_whitespace_and_colons_only() {
    // A line of colons and blanks yields a single missing node.
    assert_eq!(dump(" : : "), "");
}

#[test]
fn test_deterministic_dump() {
    let source = "if a\n  echo 'x'\nelse\n  echo 'y'\nendif\nmap <expr> q f()\n";
    assert_eq!(dump(source), dump(source));
}
