//! Per-command argument sub-parsers.
//!
//! Each parser consumes the command's argument text, fills the node's
//! argument slots and reports how many bytes it used. A `ParseError`
//! bubbles up to the Ex parser, which converts it into a syntax-error
//! node.

mod assign;
mod map;
mod misc;

use crate::lines::LineSource;
use crate::ParserOptions;
use viml_ast::{CmdNode, CommandPosition};
use viml_cmddefs::SubParser;
use viml_error::ParseResult;

/// Runs the sub-parser selected by the command descriptor.
pub(crate) fn dispatch(
    parser: SubParser,
    arg: &str,
    node: &mut CmdNode,
    o: &ParserOptions,
    position: &CommandPosition,
    lines: &mut dyn LineSource,
) -> ParseResult<usize> {
    match parser {
        SubParser::Append => misc::parse_append(arg, node, lines),
        SubParser::Map => map::parse_map(arg, node, o, position),
        SubParser::Unmap => map::parse_unmap(arg, node, o),
        SubParser::MapClear => map::parse_mapclear(arg, node),
        SubParser::Menu => map::parse_menu(arg, node, o, position),
        SubParser::Unmenu => map::parse_unmenu(arg, node),
        SubParser::Expr => misc::parse_expr_arg(arg, node),
        SubParser::Exprs => misc::parse_exprs_arg(arg, node),
        SubParser::Lvals => assign::parse_lvals(arg, node),
        SubParser::LockVar => assign::parse_lockvar(arg, node),
        SubParser::Let => assign::parse_let(arg, node),
        SubParser::For => assign::parse_for(arg, node),
        SubParser::Function => assign::parse_function(arg, node),
        SubParser::Catch => misc::parse_catch(arg, node),
        SubParser::Global => misc::parse_global(arg, node),
        SubParser::Substitute => misc::parse_substitute(arg, node),
        SubParser::CharArg => misc::parse_char_arg(arg, node),
        SubParser::AddressArg => misc::parse_address_arg(arg, node),
        SubParser::Autocmd => misc::parse_autocmd(arg, node),
        SubParser::DoAutocmd => misc::parse_doautocmd(arg, node),
        SubParser::UserCommand => misc::parse_user_command(arg, node),
        SubParser::Rest => misc::parse_rest(arg, node),
        SubParser::Glob => misc::parse_glob(arg, node),
    }
}
