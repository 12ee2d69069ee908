//! Lua emitter: lowers the command AST to a Lua program against the
//! `vim.*`/`state.*` runtime contract.
//!
//! Two top-level shapes exist. A *script* becomes a module returning
//! `{ run = function(state) … end }` that enters a fresh script scope; a
//! *user* translation is a statement sequence starting from the top
//! state. Descending into a `:function` body switches the context to
//! *function*, which changes how `:return` and `:finish` lower.
//!
//! Output goes through any [`std::io::Write`]; a short write aborts the
//! translation with the error.

mod cmds;
mod expr;
mod options;

use std::io::{self, Write};
use viml_ast::CmdNode;

/// Where the emitted code runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationContext {
    /// A sourced `.vim` file, emitted as a Lua module.
    Script,
    /// A command typed by the user, emitted as a statement sequence.
    User,
    /// Inside a `:function` body.
    Function,
}

/// Translates a reconciled command list for `ctx`.
pub fn translate<W: Write>(
    ctx: TranslationContext,
    nodes: &[CmdNode],
    writer: &mut W,
) -> io::Result<()> {
    let mut emitter = Emitter::new(writer);
    match ctx {
        TranslationContext::Script => emitter.script(nodes),
        TranslationContext::User => emitter.input(nodes),
        TranslationContext::Function => emitter.nodes(nodes, ctx, 0).map(|_| ()),
    }
}

/// Convenience wrapper returning the translation as a string.
pub fn translate_to_string(ctx: TranslationContext, nodes: &[CmdNode]) -> io::Result<String> {
    let mut out = Vec::new();
    translate(ctx, nodes, &mut out)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

pub(crate) struct Emitter<'w, W: Write> {
    writer: &'w mut W,
}

impl<'w, W: Write> Emitter<'w, W> {
    fn new(writer: &'w mut W) -> Self {
        Emitter { writer }
    }

    pub(crate) fn w(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes())
    }

    pub(crate) fn w_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.writer.write_all(bytes)
    }

    /// Two spaces per level.
    pub(crate) fn indent(&mut self, level: usize) -> io::Result<()> {
        for _ in 0..level {
            self.w("  ")?;
        }
        Ok(())
    }

    pub(crate) fn bool_lit(&mut self, value: bool) -> io::Result<()> {
        self.w(if value { "true" } else { "false" })
    }

    fn script(&mut self, nodes: &[CmdNode]) -> io::Result<()> {
        self.w("vim = require 'vim'\n")?;
        self.w("s = vim.new_script_scope(state, false)\n")?;
        self.w("return {\n")?;
        self.w("  run=function(state)\n")?;
        self.w("    state = vim.state.enter_script(state, s)\n")?;
        self.nodes(nodes, TranslationContext::Script, 2)?;
        self.w("  end\n")?;
        self.w("}\n")
    }

    fn input(&mut self, nodes: &[CmdNode]) -> io::Result<()> {
        self.w("local state = vim.state.get_top()\n")?;
        self.nodes(nodes, TranslationContext::User, 0)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_script_shape() {
        let lua = translate_to_string(TranslationContext::Script, &[]).unwrap();
        assert!(lua.starts_with("vim = require 'vim'\n"));
        assert!(lua.contains("run=function(state)"));
        assert!(lua.ends_with("}\n"));
    }

    #[test]
    fn test_empty_user_shape() {
        let lua = translate_to_string(TranslationContext::User, &[]).unwrap();
        assert_eq!(lua, "local state = vim.state.get_top()\n");
    }
}
