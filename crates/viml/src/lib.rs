//! VimL front-end: parse Ex commands and expressions, dump the AST or
//! translate it to Lua.
//!
//! This is the facade crate tying the stack together:
//!
//! ```text
//! viml-lexis / viml-keycodes      byte-level helpers, <> key notation
//! viml-ast                        the command and expression tree
//! viml-cmddefs                    command descriptors, autocmd events
//! viml-parser                     Ex parser, expression parser, blocks
//! viml-dumper                     canonical echo (the test oracle)
//! viml-lua                        the Lua emitter
//! ```
//!
//! # Example
//!
//! ```
//! let nodes = viml::parse_str("echo 1 + 2");
//! let dump = viml::dump_cmds(&nodes);
//! assert_eq!(dump, "echo +(N[+1+], N[+2+])");
//!
//! let lua = viml::translate_to_string(viml::TranslationContext::User, &nodes).unwrap();
//! assert!(lua.contains("vim.commands.echo"));
//! ```

use std::io::Write;
use thiserror::Error;

pub use viml_ast::{
    CmdArg, CmdKind, CmdNode, CommandPosition, ExprKind, ExprNode, Expression, Range, Span,
};
pub use viml_cmddefs::{CommandDefinition, cmddef};
pub use viml_dumper::{dump_cmds, dump_expr};
pub use viml_error::{ParseError, ParseResult};
pub use viml_keycodes::{CpoFlags, KeyTranslateEnv};
pub use viml_lua::{TranslationContext, translate, translate_to_string};
pub use viml_parser::{
    FileLineSource, LineSource, ParseStatus, ParsedCmd, ParserOptions, PocFlags, StringLineSource,
    parse_cmd_sequence, parse_expr, parse_one_cmd,
};

/// Errors from the convenience execution wrapper.
#[derive(Error, Debug)]
pub enum VimlError {
    #[error("translation failed: {0}")]
    Translate(#[from] std::io::Error),
    #[error("runtime error: {0}")]
    Runtime(String),
}

/// The seam to an embedded Lua interpreter.
///
/// The front-end stops at Lua source; evaluation belongs to the host.
/// Implementations receive one translated chunk and return its textual
/// result.
pub trait LuaRuntime {
    fn eval(&mut self, lua: &str) -> Result<String, String>;
}

/// Parses a whole source string with default options.
pub fn parse_str(source: &str) -> Vec<CmdNode> {
    let options = ParserOptions::default();
    let mut lines = StringLineSource::new(source);
    parse_cmd_sequence(&options, CommandPosition::start_of("<input>"), &mut lines)
}

/// Parses a source string and returns its canonical dump, the format
/// golden tests assert on.
///
/// With `one_cmd` only the first command of the first line is parsed.
pub fn parse_cmd_test(source: &str, options: &ParserOptions, one_cmd: bool) -> String {
    if one_cmd {
        let mut lines = StringLineSource::new(source);
        let Some(line) = lines.next_line(':', 0) else {
            return String::new();
        };
        let position = CommandPosition::start_of("<test input>");
        let (parsed, _) = parse_one_cmd(&line, 0, options, &position, &mut lines);
        match parsed.node {
            Some(node) => dump_cmds(std::slice::from_ref(&node)),
            None => String::new(),
        }
    } else {
        let mut lines = StringLineSource::new(source);
        let nodes =
            parse_cmd_sequence(options, CommandPosition::start_of("<test input>"), &mut lines);
        dump_cmds(&nodes)
    }
}

/// Parses, translates for the user context and hands the Lua chunk to
/// the runtime.
pub fn execute_viml(source: &str, runtime: &mut dyn LuaRuntime) -> Result<String, VimlError> {
    let options = ParserOptions { early_return: true, ..Default::default() };
    let mut lines = StringLineSource::new(source);
    let nodes =
        parse_cmd_sequence(&options, CommandPosition::start_of("<:execute string>"), &mut lines);
    let lua = translate_to_string(TranslationContext::User, &nodes)?;
    runtime.eval(&lua).map_err(VimlError::Runtime)
}

/// Translates a parsed tree into a caller-supplied writer.
pub fn translate_to_writer<W: Write>(
    ctx: TranslationContext,
    nodes: &[CmdNode],
    writer: &mut W,
) -> Result<(), VimlError> {
    translate(ctx, nodes, writer)?;
    Ok(())
}
