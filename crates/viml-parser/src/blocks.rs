//! The block reconciler and the top-level sequence parser.
//!
//! `parse_one_cmd` yields a flat stream of commands; this module stitches
//! `if`/`elseif`/`else`, `try`/`catch`/`finally`, `while`, `for` and
//! `function` bodies into the proper tree shape. Openers push a frame on
//! a bounded stack and collect subsequent commands as children;
//! continuations close the previous branch and open their own as a
//! sibling; closers pop their opener and are not kept. Structure errors
//! (an `:endif` without `:if`, a `:catch` after `:finally`, a missing
//! terminator at end of input) become syntax-error nodes in place.

use crate::ex::{ParseStatus, create_error_node, parse_one_cmd};
use crate::lines::LineSource;
use crate::{MAX_NEST_BLOCKS, ParserOptions, PocFlags};
use tracing::debug;
use viml_ast::{CmdKind, CmdNode, CommandPosition, FuncFlags};
use viml_cmddefs::{CmdFlags, cmddef};
use viml_error::{ParseError, messages};

/// One open block.
struct Frame {
    /// The block type, updated as branches succeed one another
    /// (`If` becomes `Elseif` becomes `Else`).
    kind: CmdKind,
    /// The branch node collecting children (possibly wrapped in
    /// modifiers).
    node: CmdNode,
}

/// What a command kind means to the reconciler.
enum BlockRole {
    Plain,
    Open,
    Continue {
        find: &'static [CmdKind],
        not_after: Option<(CmdKind, &'static str)>,
        duplicate: Option<&'static str>,
        no_start: &'static str,
    },
    Close {
        find: &'static [CmdKind],
        not_after: Option<(CmdKind, &'static str)>,
        no_start: &'static str,
    },
}

fn block_role(kind: CmdKind, node: &CmdNode) -> BlockRole {
    match kind {
        CmdKind::If | CmdKind::While | CmdKind::For | CmdKind::Try => BlockRole::Open,
        CmdKind::Function => {
            // Only the definition form opens a block; listing forms are
            // plain commands.
            let flags = FuncFlags::from_bits_truncate(node.args[3].as_flags());
            if flags.contains(FuncFlags::DEF) { BlockRole::Open } else { BlockRole::Plain }
        }
        CmdKind::Elseif => BlockRole::Continue {
            find: &[CmdKind::If, CmdKind::Elseif],
            not_after: Some((CmdKind::Else, messages::E_ELSEIF_AFTER_ELSE)),
            duplicate: None,
            no_start: messages::E_ELSEIF_WITHOUT_IF,
        },
        CmdKind::Else => BlockRole::Continue {
            find: &[CmdKind::If, CmdKind::Elseif],
            not_after: None,
            duplicate: Some(messages::E_MULTIPLE_ELSE),
            no_start: messages::E_ELSE_WITHOUT_IF,
        },
        CmdKind::Catch => BlockRole::Continue {
            find: &[CmdKind::Try, CmdKind::Catch],
            not_after: Some((CmdKind::Finally, messages::E_CATCH_AFTER_FINALLY)),
            duplicate: None,
            no_start: messages::E_CATCH_WITHOUT_TRY,
        },
        CmdKind::Finally => BlockRole::Continue {
            find: &[CmdKind::Try, CmdKind::Catch],
            not_after: None,
            duplicate: Some(messages::E_MULTIPLE_FINALLY),
            no_start: messages::E_FINALLY_WITHOUT_TRY,
        },
        CmdKind::Endif => BlockRole::Close {
            find: &[CmdKind::If, CmdKind::Elseif, CmdKind::Else],
            not_after: None,
            no_start: messages::E_ENDIF_WITHOUT_IF,
        },
        CmdKind::Endwhile => BlockRole::Close {
            find: &[CmdKind::While],
            not_after: Some((CmdKind::For, messages::E_ENDWHILE_WITH_FOR)),
            no_start: messages::E_ENDWHILE_WITHOUT_WHILE,
        },
        CmdKind::Endfor => BlockRole::Close {
            find: &[CmdKind::For],
            not_after: Some((CmdKind::While, messages::E_ENDFOR_WITH_WHILE)),
            no_start: messages::E_ENDFOR_WITHOUT_FOR,
        },
        CmdKind::Endtry => BlockRole::Close {
            find: &[CmdKind::Try, CmdKind::Catch, CmdKind::Finally],
            not_after: None,
            no_start: messages::E_ENDTRY_WITHOUT_TRY,
        },
        CmdKind::Endfunction => BlockRole::Close {
            find: &[CmdKind::Function],
            not_after: None,
            no_start: messages::E_ENDFUNCTION_NOT_IN_FUNC,
        },
        _ => BlockRole::Plain,
    }
}

/// The message for a block left open when something else closes over it.
fn missing_message(kind: CmdKind) -> &'static str {
    match kind {
        CmdKind::Function => messages::E_MISSING_ENDFUNCTION,
        CmdKind::Try | CmdKind::Catch | CmdKind::Finally => messages::E_MISSING_ENDTRY,
        CmdKind::While => messages::E_MISSING_ENDWHILE,
        CmdKind::For => messages::E_MISSING_ENDFOR,
        _ => messages::E_MISSING_ENDIF,
    }
}

/// Descends through modifier wrappers to the command that owns the block
/// body.
fn block_inner_mut(mut node: &mut CmdNode) -> &mut CmdNode {
    loop {
        if cmddef(node.kind).flags.contains(CmdFlags::ISMODIFIER) && node.children.len() == 1 {
            node = &mut node.children[0];
        } else {
            return node;
        }
    }
}

fn block_inner(mut node: &CmdNode) -> &CmdNode {
    while cmddef(node.kind).flags.contains(CmdFlags::ISMODIFIER) && node.children.len() == 1 {
        node = &node.children[0];
    }
    node
}

struct Reconciler {
    root: Vec<CmdNode>,
    stack: Vec<Frame>,
}

impl Reconciler {
    fn new() -> Self {
        Reconciler { root: Vec::new(), stack: Vec::new() }
    }

    /// Appends a finished node at the current nesting level.
    fn attach(&mut self, node: CmdNode) {
        match self.stack.last_mut() {
            Some(top) => block_inner_mut(&mut top.node).children.push(node),
            None => self.root.push(node),
        }
    }

    fn error(&mut self, message: &'static str, position: &CommandPosition, line: &str) {
        let node = create_error_node(ParseError::new(message, 0), position, line);
        self.attach(node);
    }

    fn push(&mut self, kind: CmdKind, node: CmdNode, position: &CommandPosition, line: &str) {
        if self.stack.len() >= MAX_NEST_BLOCKS {
            self.error(messages::E_TOO_MANY_NESTED, position, line);
            return;
        }
        debug!(block = ?kind, depth = self.stack.len(), "open block");
        self.stack.push(Frame { kind, node });
    }

    /// Pops the top frame and attaches its node one level down.
    fn pop_and_attach(&mut self) {
        if let Some(frame) = self.stack.pop() {
            self.attach(frame.node);
        }
    }

    fn take(&mut self, node: CmdNode, position: &CommandPosition, line: &str) {
        let inner = block_inner(&node);
        let kind = inner.kind;
        match block_role(kind, inner) {
            BlockRole::Plain => self.attach(node),
            BlockRole::Open => self.push(kind, node, position, line),
            BlockRole::Continue { find, not_after, duplicate, no_start } => {
                if let Some(top) = self.stack.last() {
                    if let Some((bad, message)) = not_after {
                        if top.kind == bad {
                            self.error(message, position, line);
                            return;
                        }
                    }
                    if let Some(message) = duplicate {
                        if top.kind == kind {
                            self.error(message, position, line);
                            return;
                        }
                    }
                }
                loop {
                    match self.stack.last() {
                        None => {
                            self.error(no_start, position, line);
                            return;
                        }
                        Some(top) if find.contains(&top.kind) => {
                            self.pop_and_attach();
                            self.push(kind, node, position, line);
                            return;
                        }
                        Some(top) => {
                            let message = missing_message(top.kind);
                            self.pop_and_attach();
                            self.error(message, position, line);
                        }
                    }
                }
            }
            BlockRole::Close { find, not_after, no_start } => {
                if let Some(top) = self.stack.last() {
                    if let Some((bad, message)) = not_after {
                        if top.kind == bad {
                            self.error(message, position, line);
                            return;
                        }
                    }
                }
                loop {
                    match self.stack.last() {
                        None => {
                            self.error(no_start, position, line);
                            return;
                        }
                        Some(top) if find.contains(&top.kind) => {
                            // The terminator itself is not kept.
                            self.pop_and_attach();
                            return;
                        }
                        Some(top) => {
                            let message = missing_message(top.kind);
                            self.pop_and_attach();
                            self.error(message, position, line);
                        }
                    }
                }
            }
        }
    }

    /// Unwinds still-open blocks at end of input, materialising their
    /// missing-terminator errors.
    fn finish(mut self, position: &CommandPosition) -> Vec<CmdNode> {
        while let Some(top) = self.stack.last() {
            let message = missing_message(top.kind);
            self.pop_and_attach();
            self.error(message, position, "");
        }
        self.root
    }
}

/// Parses a whole input into a reconciled command list.
///
/// Recoverable errors become syntax-error nodes in place; the remainder
/// of an offending line is skipped and parsing continues with the next
/// one.
pub fn parse_cmd_sequence(
    o: &ParserOptions,
    position: CommandPosition,
    lines: &mut dyn LineSource,
) -> Vec<CmdNode> {
    let mut reconciler = Reconciler::new();
    let mut position = position;

    while let Some(line) = lines.next_line(':', 0) {
        let mut at = 0usize;
        loop {
            if at >= line.len() {
                if at == 0 && line.is_empty() && o.flags.contains(PocFlags::EXMODE) {
                    position.col = 1;
                    let (parsed, _) = parse_one_cmd(&line, 0, o, &position, lines);
                    if let Some(node) = parsed.node {
                        reconciler.take(node, &position, &line);
                    }
                }
                break;
            }
            position.col = at + 1;
            let (parsed, next) = parse_one_cmd(&line, at, o, &position, lines);
            match (parsed.status, parsed.node) {
                (ParseStatus::Recovered, Some(node)) => {
                    // The rest of the line is skipped after an error.
                    reconciler.attach(node);
                    break;
                }
                (_, Some(node)) => {
                    reconciler.take(node, &position, &line);
                }
                (_, None) => {
                    if next <= at {
                        break;
                    }
                }
            }
            if next <= at {
                break;
            }
            at = next;
        }
        position.line += 1;
        if reconciler.stack.is_empty() && o.early_return {
            break;
        }
    }

    position.col = 1;
    reconciler.finish(&position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lines::StringLineSource;
    use pretty_assertions::assert_eq;
    use viml_ast::CmdArg;

    fn parse(src: &str) -> Vec<CmdNode> {
        let mut lines = StringLineSource::new(src);
        let o = ParserOptions::default();
        parse_cmd_sequence(&o, CommandPosition::start_of("<test>"), &mut lines)
    }

    fn kinds(nodes: &[CmdNode]) -> Vec<CmdKind> {
        nodes.iter().map(|n| n.kind).collect()
    }

    #[test]
    fn test_flat_sequence() {
        let nodes = parse("echo 1\necho 2\n");
        assert_eq!(kinds(&nodes), vec![CmdKind::Echo, CmdKind::Echo]);
    }

    #[test]
    fn test_bar_separated() {
        let nodes = parse("undo|redo");
        assert_eq!(kinds(&nodes), vec![CmdKind::Undo, CmdKind::Redo]);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_if_block_nesting() {
        let nodes = parse("if x\n  let y = 1\nendif\n");
        assert_eq!(kinds(&nodes), vec![CmdKind::If]);
        assert_eq!(kinds(&nodes[0].children), vec![CmdKind::Let]);
    }

    #[test]
    fn test_if_elseif_else_are_siblings() {
        let nodes = parse("if x\n let y = 1\nelseif z\n let y = 2\nelse\n let y = 3\nendif\n");
        assert_eq!(kinds(&nodes), vec![CmdKind::If, CmdKind::Elseif, CmdKind::Else]);
        for node in &nodes {
            assert_eq!(kinds(&node.children), vec![CmdKind::Let]);
        }
    }

    #[test]
    fn test_try_catch_finally() {
        let nodes = parse("try\n throw 'x'\ncatch /x/\n echo 1\nfinally\n echo 2\nendtry\n");
        assert_eq!(kinds(&nodes), vec![CmdKind::Try, CmdKind::Catch, CmdKind::Finally]);
        assert_eq!(kinds(&nodes[0].children), vec![CmdKind::Throw]);
    }

    #[test]
    fn test_nested_blocks() {
        let nodes = parse("while a\n if b\n  break\n endif\nendwhile\n");
        assert_eq!(kinds(&nodes), vec![CmdKind::While]);
        assert_eq!(kinds(&nodes[0].children), vec![CmdKind::If]);
        assert_eq!(kinds(&nodes[0].children[0].children), vec![CmdKind::Break]);
    }

    #[test]
    fn test_function_body() {
        let nodes = parse("function! F(a)\n return a:a\nendfunction\n");
        assert_eq!(kinds(&nodes), vec![CmdKind::Function]);
        assert_eq!(kinds(&nodes[0].children), vec![CmdKind::Return]);
    }

    #[test]
    fn test_function_listing_is_plain() {
        let nodes = parse("function F\necho 1\n");
        assert_eq!(kinds(&nodes), vec![CmdKind::Function, CmdKind::Echo]);
    }

    #[test]
    fn test_modifier_wrapped_opener() {
        let nodes = parse("silent if x\n echo 1\nendif\n");
        assert_eq!(kinds(&nodes), vec![CmdKind::Silent]);
        let inner = &nodes[0].children[0];
        assert_eq!(inner.kind, CmdKind::If);
        assert_eq!(kinds(&inner.children), vec![CmdKind::Echo]);
    }

    fn error_message(node: &CmdNode) -> &str {
        assert_eq!(node.kind, CmdKind::SyntaxError);
        match &node.args[1] {
            CmdArg::String(Some(message)) => message,
            other => panic!("unexpected arg {other:?}"),
        }
    }

    #[test]
    fn test_endif_without_if() {
        let nodes = parse("endif\n");
        assert_eq!(error_message(&nodes[0]), messages::E_ENDIF_WITHOUT_IF);
    }

    #[test]
    fn test_else_without_if() {
        let nodes = parse("else\n");
        assert_eq!(error_message(&nodes[0]), messages::E_ELSE_WITHOUT_IF);
    }

    #[test]
    fn test_branches_without_openers() {
        let nodes = parse("elseif x\n");
        assert_eq!(error_message(&nodes[0]), messages::E_ELSEIF_WITHOUT_IF);
        let nodes = parse("catch /x/\n");
        assert_eq!(error_message(&nodes[0]), messages::E_CATCH_WITHOUT_TRY);
        let nodes = parse("finally\n");
        assert_eq!(error_message(&nodes[0]), messages::E_FINALLY_WITHOUT_TRY);
    }

    #[test]
    fn test_closers_without_openers() {
        let nodes = parse("endtry\n");
        assert_eq!(error_message(&nodes[0]), messages::E_ENDTRY_WITHOUT_TRY);
        let nodes = parse("endfunction\n");
        assert_eq!(error_message(&nodes[0]), messages::E_ENDFUNCTION_NOT_IN_FUNC);
        let nodes = parse("endwhile\n");
        assert_eq!(error_message(&nodes[0]), messages::E_ENDWHILE_WITHOUT_WHILE);
        let nodes = parse("endfor\n");
        assert_eq!(error_message(&nodes[0]), messages::E_ENDFOR_WITHOUT_FOR);
    }

    #[test]
    fn test_elseif_after_else() {
        let nodes = parse("if x\nelse\nelseif y\nendif\n");
        assert_eq!(kinds(&nodes), vec![CmdKind::If, CmdKind::Else]);
        // The error lives inside the else branch.
        assert_eq!(error_message(&nodes[1].children[0]), messages::E_ELSEIF_AFTER_ELSE);
    }

    #[test]
    fn test_multiple_else() {
        let nodes = parse("if x\nelse\nelse\nendif\n");
        assert_eq!(error_message(&nodes[1].children[0]), messages::E_MULTIPLE_ELSE);
    }

    #[test]
    fn test_catch_after_finally() {
        let nodes = parse("try\nfinally\ncatch /x/\nendtry\n");
        assert_eq!(error_message(&nodes[1].children[0]), messages::E_CATCH_AFTER_FINALLY);
    }

    #[test]
    fn test_multiple_finally() {
        let nodes = parse("try\nfinally\nfinally\nendtry\n");
        assert_eq!(error_message(&nodes[1].children[0]), messages::E_MULTIPLE_FINALLY);
    }

    #[test]
    fn test_endfor_with_while() {
        let nodes = parse("while x\nendfor\nendwhile\n");
        assert_eq!(kinds(&nodes), vec![CmdKind::While]);
        assert_eq!(error_message(&nodes[0].children[0]), messages::E_ENDFOR_WITH_WHILE);
    }

    #[test]
    fn test_endwhile_with_for() {
        let nodes = parse("for i in x\nendwhile\nendfor\n");
        assert_eq!(error_message(&nodes[0].children[0]), messages::E_ENDWHILE_WITH_FOR);
    }

    #[test]
    fn test_missing_terminators_at_eof() {
        let nodes = parse("if x\n");
        assert_eq!(kinds(&nodes)[0], CmdKind::If);
        assert_eq!(error_message(&nodes[1]), messages::E_MISSING_ENDIF);

        let nodes = parse("function! F()\n");
        assert_eq!(error_message(&nodes[1]), messages::E_MISSING_ENDFUNCTION);

        let nodes = parse("while x\n");
        assert_eq!(error_message(&nodes[1]), messages::E_MISSING_ENDWHILE);

        let nodes = parse("try\n");
        assert_eq!(error_message(&nodes[1]), messages::E_MISSING_ENDTRY);
    }

    #[test]
    fn test_mismatched_closer_unwinds() {
        // An endif closing over an open while reports the missing
        // endwhile first, then closes nothing.
        let nodes = parse("while x\nendif\n");
        assert_eq!(kinds(&nodes)[0], CmdKind::While);
        assert_eq!(error_message(&nodes[1]), messages::E_MISSING_ENDWHILE);
        assert_eq!(error_message(&nodes[2]), messages::E_ENDIF_WITHOUT_IF);
    }

    #[test]
    fn test_nesting_cap() {
        let mut src = String::new();
        for _ in 0..(MAX_NEST_BLOCKS + 1) {
            src.push_str("if x\n");
        }
        let nodes = parse(&src);
        // The final opener overflows and materialises an error inside
        // the deepest block.
        fn deepest(node: &CmdNode) -> &CmdNode {
            node.children.last().map_or(node, deepest)
        }
        let bottom = deepest(&nodes[0]);
        assert_eq!(bottom.kind, CmdKind::SyntaxError);
    }

    #[test]
    fn test_error_recovery_continues() {
        let nodes = parse("bogus\necho 1\n");
        assert_eq!(nodes[0].kind, CmdKind::SyntaxError);
        assert_eq!(nodes[1].kind, CmdKind::Echo);
    }

    #[test]
    fn test_early_return() {
        let mut lines = StringLineSource::new("echo 1\necho 2\n");
        let o = ParserOptions { early_return: true, ..Default::default() };
        let nodes = parse_cmd_sequence(&o, CommandPosition::start_of("<t>"), &mut lines);
        assert_eq!(nodes.len(), 1);
    }
}
