//! Command lowering.

use crate::expr::{TsFlags, ValueSource};
use crate::{Emitter, TranslationContext};
use std::io::{self, Write};
use tracing::trace;
use viml_ast::{
    AddressFollowup, AddressKind, ArgType, CmdArg, CmdKind, CmdNode, ExFlags, ExprKind, ExprNode,
    Expression, FuncFlags, LetAssignType, Range, Regex,
};
use viml_cmddefs::{CmdFlags, SubParser, cmddef};

const ARG_LET_ASS_TYPE: usize = 0;
const ARG_LET_LHS: usize = 1;
const ARG_LET_RHS: usize = 2;
const ARG_FOR_LHS: usize = 1;
const ARG_FOR_RHS: usize = 2;
const ARG_FUNC_NAME: usize = 1;
const ARG_FUNC_ARGS: usize = 2;
const ARG_FUNC_FLAGS: usize = 3;

impl<W: Write> Emitter<'_, W> {
    fn regex(&mut self, regex: &Regex) -> io::Result<()> {
        self.lua_string(regex.as_str())
    }

    fn followup(&mut self, followup: &AddressFollowup) -> io::Result<()> {
        match followup {
            AddressFollowup::Shift(shift) => {
                self.w("0, ")?;
                self.w(&shift.to_string())
            }
            AddressFollowup::ForwardPattern(regex) => {
                self.w("1, ")?;
                self.regex(regex)
            }
            AddressFollowup::BackwardPattern(regex) => {
                self.w("2, ")?;
                self.regex(regex)
            }
        }
    }

    pub(crate) fn range(&mut self, range: &Range) -> io::Result<()> {
        let elements = range.elements();
        if elements.is_empty() {
            return self.w("nil");
        }

        self.w("vim.range.compose(state")?;
        for element in elements {
            self.w(", ")?;
            for followup in &element.address.followups {
                self.w("vim.range.apply_followup(state, ")?;
                self.followup(followup)?;
                self.w(", ")?;
            }
            match &element.address.kind {
                AddressKind::Missing => self.w("nil")?,
                AddressKind::Fixed(line) => self.w(&line.to_string())?,
                AddressKind::End => self.w("vim.range.last(state)")?,
                AddressKind::Current => self.w("vim.range.current(state)")?,
                AddressKind::Mark(mark) => {
                    self.w("vim.range.mark(state, '")?;
                    self.w(&mark.to_string())?;
                    self.w("')")?;
                }
                AddressKind::ForwardSearch(regex) => {
                    self.w("vim.range.forward_search(state, ")?;
                    self.regex(regex)?;
                    self.w(")")?;
                }
                AddressKind::BackwardSearch(regex) => {
                    self.w("vim.range.backward_search(state, ")?;
                    self.regex(regex)?;
                    self.w(")")?;
                }
                AddressKind::SubstituteSearch => self.w("vim.range.substitute_search(state)")?,
                AddressKind::ForwardPreviousSearch => {
                    self.w("vim.range.forward_previous_search(state)")?;
                }
                AddressKind::BackwardPreviousSearch => {
                    self.w("vim.range.backward_previous_search(state)")?;
                }
            }
            for _ in &element.address.followups {
                self.w(")")?;
            }
            self.w(", ")?;
            self.bool_lit(element.set_cursor)?;
        }
        self.w(")")
    }

    fn ex_flags(&mut self, flags: ExFlags) -> io::Result<()> {
        self.w("{")?;
        if flags.contains(ExFlags::LIST) {
            self.w("list=true, ")?;
        }
        if flags.contains(ExFlags::LNR) {
            self.w("lnr=true, ")?;
        }
        if flags.contains(ExFlags::PRINT) {
            self.w("print=true, ")?;
        }
        self.w("}")
    }

    /// `vim.assign.ass_*`/`del_*` call for one lvalue. `value` of `None`
    /// deletes (`:unlet`, `:delfunction`).
    fn lval(
        &mut self,
        source: &str,
        node: &ExprNode,
        is_function: bool,
        bang: bool,
        value: Option<&ValueSource<'_>>,
    ) -> io::Result<()> {
        let what = match node.kind {
            ExprKind::Subscript if node.children.len() > 2 => "slice",
            ExprKind::Option => "option",
            ExprKind::Register => "register",
            ExprKind::EnvironmentVariable => "environment",
            _ => "dict",
        };

        match value {
            None => {
                self.w("vim.assign.del_")?;
                self.w(what)?;
                if is_function {
                    self.w("_function")?;
                }
                self.w("(state, ")?;
                self.bool_lit(bang)?;
                self.w(", ")?;
            }
            Some(value) => {
                self.w("vim.assign.ass_")?;
                self.w(what)?;
                if is_function {
                    self.w("_function(state, ")?;
                    self.bool_lit(bang)?;
                    self.w(", ")?;
                } else {
                    self.w("(state, ")?;
                }
                self.value(value)?;
                self.w(", ")?;
            }
        }

        match node.kind {
            ExprKind::SimpleVariableName => {
                let flags = TsFlags::ONLY_SEGMENT
                    | TsFlags::LAST_SEGMENT
                    | if is_function { TsFlags::FUNCASSIGN } else { TsFlags::empty() };
                let start = self.scope(source, node, flags)?;
                let (s, e) = match node.span {
                    viml_ast::ExprSpan::Range(s, e) => (s, e),
                    _ => (0, 0),
                };
                self.w(", '")?;
                self.w(&source[start.unwrap_or(s)..=e])?;
                self.w("')")
            }
            ExprKind::VariableName => {
                self.varname(source, node, is_function)?;
                self.w(")")
            }
            ExprKind::ConcatOrSubscript => {
                self.expr(source, &node.children[0], false)?;
                let (s, e) = match node.span {
                    viml_ast::ExprSpan::Range(s, e) => (s, e),
                    _ => (0, 0),
                };
                self.w(", '")?;
                self.w(&source[s..=e])?;
                self.w("')")
            }
            ExprKind::Subscript => {
                self.expr(source, &node.children[0], false)?;
                self.w(", ")?;
                self.expr(source, &node.children[1], false)?;
                if let Some(upper) = node.children.get(2) {
                    self.w(", ")?;
                    self.expr(source, upper, false)?;
                }
                self.w(")")
            }
            ExprKind::Option | ExprKind::Register | ExprKind::EnvironmentVariable => {
                let name = match (node.kind, node.span) {
                    (ExprKind::Register, viml_ast::ExprSpan::Range(s, e)) if e > s => {
                        source.get(s + 1..=e).unwrap_or("")
                    }
                    (ExprKind::Register, _) => "\"",
                    (_, viml_ast::ExprSpan::Range(s, e)) => source.get(s..=e).unwrap_or(""),
                    _ => "",
                };
                self.w("'")?;
                self.w(name)?;
                self.w("')")
            }
            _ => self.w(")"),
        }
    }

    /// One assignment of `value` into `lval_expr`, expanding
    /// destructuring lists with their length checks.
    fn assignment(
        &mut self,
        lval_expr: &Expression,
        indent: usize,
        err_line: Option<&str>,
        value: &ValueSource<'_>,
    ) -> io::Result<()> {
        let node = lval_expr.node();
        if node.kind != ExprKind::List {
            return self.add_assign(&lval_expr.source, node, err_line, indent, value);
        }

        let has_rest = node.children.last().is_some_and(|c| c.kind == ExprKind::ListRest);
        let val_num = node.children.len() - usize::from(has_rest);

        self.w("do\n")?;
        self.indent(indent + 1)?;
        self.w("local rhs = ")?;
        self.value(value)?;
        self.w("\n")?;

        self.indent(indent + 1)?;
        self.w("if vim.is_list(rhs) then\n")?;

        self.indent(indent + 2)?;
        self.w("if (vim.list.length(rhs)")?;
        self.w(if has_rest { " >= " } else { " == " })?;
        self.w(&val_num.to_string())?;
        self.w(") then\n")?;

        for (i, child) in node.children.iter().take(val_num).enumerate() {
            self.indent(indent + 3)?;
            let item = ValueSource::ListItem { var: "rhs", idx: i };
            self.add_assign(&lval_expr.source, child, err_line, indent + 3, &item)?;
        }
        if has_rest {
            self.indent(indent + 3)?;
            let rest = ValueSource::ListRest { var: "rhs", idx: val_num + 1 };
            let rest_node = &node.children[val_num].children[0];
            self.add_assign(&lval_expr.source, rest_node, err_line, indent + 3, &rest)?;
        }

        self.indent(indent + 2)?;
        self.w("else\n")?;
        self.indent(indent + 3)?;
        if !has_rest {
            self.w("if (vim.list.length(rhs) > ")?;
            self.w(&val_num.to_string())?;
            self.w(") then\n")?;
            self.indent(indent + 4)?;
            self.w("vim.err.err(state, nil, true, \"E688: More targets than List items\")\n")?;
            self.indent(indent + 3)?;
            self.w("else\n")?;
            self.indent(indent + 4)?;
        }
        self.w("vim.err.err(state, nil, true, \"E687: Less targets than List items\")\n")?;
        if !has_rest {
            self.indent(indent + 3)?;
            self.w("end\n")?;
        }
        if let Some(err_line) = err_line {
            self.indent(indent + 3)?;
            self.w(err_line)?;
            self.w("\n")?;
        }
        self.indent(indent + 2)?;
        self.w("end\n")?;

        self.indent(indent + 1)?;
        self.w("else\n")?;
        self.indent(indent + 2)?;
        self.w("vim.err.err(state, nil, true, \"E714: List required\")\n")?;
        if let Some(err_line) = err_line {
            self.indent(indent + 2)?;
            self.w(err_line)?;
            self.w("\n")?;
        }
        self.indent(indent + 1)?;
        self.w("end\n")?;
        self.indent(indent)?;
        self.w("end\n")
    }

    fn add_assign(
        &mut self,
        source: &str,
        node: &ExprNode,
        err_line: Option<&str>,
        indent: usize,
        value: &ValueSource<'_>,
    ) -> io::Result<()> {
        if err_line.is_some() {
            self.w("if ")?;
        }
        self.lval(source, node, false, false, Some(value))?;
        match err_line {
            Some(err_line) => {
                self.w(" == nil then\n")?;
                self.indent(indent + 1)?;
                self.w(err_line)?;
                self.w("\n")?;
                self.indent(indent)?;
                self.w("end\n")
            }
            None => self.w("\n"),
        }
    }

    /// The anonymous Lua function carrying a `:function` body.
    pub(crate) fn function_definition(
        &mut self,
        node: &CmdNode,
        indent: usize,
        _ctx: TranslationContext,
    ) -> io::Result<()> {
        let params = match &node.args[ARG_FUNC_ARGS] {
            CmdArg::Strings(params) => params.as_slice(),
            _ => &[],
        };
        let flags = FuncFlags::from_bits_truncate(node.args[ARG_FUNC_FLAGS].as_flags());
        let varargs = flags.contains(FuncFlags::VARARGS);

        self.w("function(state, self")?;
        for param in params {
            self.w(", ")?;
            self.w(param)?;
        }
        if varargs {
            self.w(", ...")?;
        }
        self.w(")\n")?;

        if node.children.is_empty() {
            // An empty function just returns zero.
            self.indent(indent + 1)?;
            self.w("return 0\n")?;
        } else {
            self.indent(indent + 1)?;
            self.w("state = vim.state.enter_function(state, self, {})\n")?;
            for param in params {
                self.indent(indent + 1)?;
                self.w("state.a['")?;
                self.w(param)?;
                self.w("'] = ")?;
                self.w(param)?;
                self.w("\n")?;
            }
            if varargs {
                self.indent(indent + 1)?;
                self.w("state.a['000'] = vim.list:new(state, ...)\n")?;
                self.indent(indent + 1)?;
                self.w("state.a['0'] = select('#', ...)\n")?;
                self.indent(indent + 1)?;
                self.w("for i = 1,select('#', ...) do\n")?;
                self.indent(indent + 2)?;
                self.w("state.a[tostring(i)] = select(i, ...)\n")?;
                self.indent(indent + 1)?;
                self.w("end\n")?;
            }
            let terminated =
                self.nodes(&node.children, TranslationContext::Function, indent + 1)?;
            if !terminated {
                self.indent(indent + 1)?;
                self.w("return 0\n")?;
            }
        }
        self.indent(indent)?;
        self.w("end")
    }

    fn cmd_function(&mut self, node: &CmdNode, indent: usize) -> io::Result<()> {
        let Some(name) = node.args[ARG_FUNC_NAME].as_expr() else {
            return self.cmd_generic(node, indent);
        };
        self.indent(indent)?;
        let value = ValueSource::FuncDef { node, indent };
        self.lval(&name.source, name.node(), true, node.bang, Some(&value))?;
        self.w("\n")
    }

    fn cmd_for(&mut self, node: &CmdNode, indent: usize, ctx: TranslationContext) -> io::Result<()> {
        let Some(rhs) = node.args[ARG_FOR_RHS].as_expr() else {
            return Ok(());
        };
        self.indent(indent)?;
        self.w("for _, i in vim.iter(state, ")?;
        self.expr(&rhs.source, rhs.node(), false)?;
        self.w(") do\n")?;

        if let Some(lhs) = node.args[ARG_FOR_LHS].as_expr() {
            self.indent(indent + 1)?;
            self.assignment(lhs, indent + 1, Some("break"), &ValueSource::Raw("i"))?;
        }
        self.nodes(&node.children, ctx, indent + 1)?;

        self.indent(indent)?;
        self.w("end\n")
    }

    fn cmd_while(
        &mut self,
        node: &CmdNode,
        indent: usize,
        ctx: TranslationContext,
    ) -> io::Result<()> {
        let Some(condition) = node.args[0].as_expr() else {
            return Ok(());
        };
        self.indent(indent)?;
        self.w("while vim.get_boolean(state, ")?;
        self.expr(&condition.source, condition.node(), false)?;
        self.w(") do\n")?;
        self.nodes(&node.children, ctx, indent + 1)?;
        self.indent(indent)?;
        self.w("end\n")
    }

    /// `:if`, `:elseif` and `:else` emit one Lua `if` chain; `end` comes
    /// from the branch with no further `elseif`/`else` sibling.
    fn cmd_if_block(
        &mut self,
        node: &CmdNode,
        next_kind: Option<CmdKind>,
        indent: usize,
        ctx: TranslationContext,
    ) -> io::Result<()> {
        self.indent(indent)?;
        match node.kind {
            CmdKind::Else => self.w("else\n")?,
            kind => {
                if kind == CmdKind::Elseif {
                    self.w("else")?;
                }
                self.w("if vim.get_boolean(state, ")?;
                match node.args[0].as_expr() {
                    Some(condition) => self.expr(&condition.source, condition.node(), false)?,
                    None => self.w("nil")?,
                }
                self.w(") then\n")?;
            }
        }

        self.nodes(&node.children, ctx, indent + 1)?;

        if !matches!(next_kind, Some(CmdKind::Elseif | CmdKind::Else)) {
            self.indent(indent)?;
            self.w("end\n")?;
        }
        Ok(())
    }

    /// `:try` lowers to a `pcall` plus catch dispatch and finally thunk.
    fn cmd_try_block(
        &mut self,
        node: &CmdNode,
        following: &[CmdNode],
        indent: usize,
        ctx: TranslationContext,
    ) -> io::Result<()> {
        let mut catches: Vec<&CmdNode> = Vec::new();
        let mut finally: Option<&CmdNode> = None;
        for sibling in following {
            match sibling.kind {
                CmdKind::Catch => catches.push(sibling),
                CmdKind::Finally => {
                    finally = Some(sibling);
                    break;
                }
                _ => break,
            }
        }

        self.indent(indent)?;
        self.w("do\n")?;
        self.indent(indent + 1)?;
        self.w("local ok, err, ret\n")?;
        self.indent(indent + 1)?;
        self.w("ok, err, ret = pcall(function(state)\n")?;
        self.nodes(&node.children, ctx, indent + 2)?;
        self.indent(indent + 1)?;
        self.w("end, vim.state.enter_try(state))\n")?;

        if let Some(finally) = finally {
            self.indent(indent + 1)?;
            self.w("local fin = function(state)\n")?;
            self.nodes(&finally.children, ctx, indent + 2)?;
            self.indent(indent + 1)?;
            self.w("end\n")?;
        }

        if !catches.is_empty() {
            self.indent(indent + 1)?;
            self.w("local catch\n")?;
            self.indent(indent + 1)?;
            self.w("if (not ok) then\n")?;

            let mut did_first_if = false;
            for catch in &catches {
                if did_first_if {
                    self.indent(indent + 1)?;
                    self.w("else")?;
                }
                let pattern = catch.args[0].as_regex();
                match pattern {
                    None => {
                        if did_first_if {
                            self.w("\n")?;
                        }
                    }
                    Some(regex) => {
                        self.indent(indent + 2)?;
                        self.w("if (vim.err.matches(state, err, ")?;
                        self.regex(regex)?;
                        self.w(")) then\n")?;
                        did_first_if = true;
                    }
                }
                let current_indent = indent + 2 + usize::from(did_first_if);
                self.indent(current_indent)?;
                self.w("catch = function(state)\n")?;
                self.nodes(&catch.children, ctx, current_indent + 1)?;
                self.indent(current_indent)?;
                self.w("end\n")?;
                self.indent(current_indent)?;
                // The string "caught" is true.
                self.w("ok = 'caught'\n")?;

                if pattern.is_none() {
                    break;
                }
            }

            if did_first_if {
                self.indent(indent + 2)?;
                self.w("end\n")?;
            }
            self.indent(indent + 1)?;
            self.w("end\n")?;

            self.indent(indent + 1)?;
            self.w("if (catch) then\n")?;
            self.indent(indent + 2)?;
            self.w("local new_ret = catch(vim.state.enter_catch(state, err))\n")?;
            self.check_new_ret(indent + 2)?;
            self.indent(indent + 1)?;
            self.w("end\n")?;
        }

        if finally.is_some() {
            self.indent(indent + 1)?;
            self.w("local new_ret = fin(state)\n")?;
            self.check_new_ret(indent + 1)?;
        }

        self.indent(indent + 1)?;
        self.w("if (not ok) then\n")?;
        self.indent(indent + 2)?;
        self.w("vim.err.propagate(state, err)\n")?;
        self.indent(indent + 1)?;
        self.w("end\n")?;

        self.indent(indent + 1)?;
        self.w("if (ret ~= nil) then\n")?;
        self.indent(indent + 2)?;
        self.w("return ret\n")?;
        self.indent(indent + 1)?;
        self.w("end\n")?;
        self.indent(indent)?;
        self.w("end\n")
    }

    fn check_new_ret(&mut self, indent: usize) -> io::Result<()> {
        self.indent(indent)?;
        self.w("if (new_ret ~= nil) then\n")?;
        self.indent(indent + 1)?;
        self.w("ret = new_ret\n")?;
        self.indent(indent)?;
        self.w("end\n")
    }

    fn cmd_let(&mut self, node: &CmdNode, indent: usize) -> io::Result<()> {
        let rhs = node.args[ARG_LET_RHS].as_expr();
        let lhs = node.args[ARG_LET_LHS].as_expr();
        match (lhs, rhs) {
            (Some(lhs), Some(rhs)) => {
                let ass_type = LetAssignType::from_u32(node.args[ARG_LET_ASS_TYPE].as_flags());
                self.indent(indent)?;
                match ass_type {
                    LetAssignType::None | LetAssignType::Assign => {
                        self.assignment(lhs, indent, None, &ValueSource::Expr(rhs))
                    }
                    LetAssignType::Add | LetAssignType::Subtract | LetAssignType::Append => {
                        let op = match ass_type {
                            LetAssignType::Add => "add",
                            LetAssignType::Subtract => "subtract",
                            _ => "concat",
                        };
                        let value = ValueSource::ModAssign { op, lval: lhs, rval: rhs };
                        self.assignment(lhs, indent, None, &value)
                    }
                }
            }
            // Variable-listing forms go through the generic command call.
            _ => self.cmd_generic(node, indent),
        }
    }

    fn cmd_unlet(&mut self, node: &CmdNode, indent: usize, is_function: bool) -> io::Result<()> {
        let Some(targets) = node.args[0].as_expr() else {
            return Ok(());
        };
        for target in &targets.nodes {
            self.indent(indent)?;
            self.lval(&targets.source, target, is_function, node.bang, None)?;
            self.w("\n")?;
        }
        Ok(())
    }

    fn cmd_comment(&mut self, node: &CmdNode, indent: usize, hashbang: bool) -> io::Result<()> {
        self.indent(indent)?;
        self.w(if hashbang { "-- #!" } else { "-- \"" })?;
        if let Some(text) = node.args[0].as_string() {
            // Keep the comment on one Lua line.
            self.w(&text.replace('\n', " "))?;
        }
        self.w("\n")
    }

    fn cmd_error(&mut self, node: &CmdNode, indent: usize) -> io::Result<()> {
        self.indent(indent)?;
        self.w("vim.err.err(state, nil, true, ")?;
        self.lua_string(node.args[1].as_string().unwrap_or(""))?;
        self.w(")\n")
    }

    fn cmd_user(&mut self, node: &CmdNode, indent: usize) -> io::Result<()> {
        self.indent(indent)?;
        self.w("vim.run_user_command(state, '")?;
        self.w(node.name.as_deref().unwrap_or(""))?;
        self.w("', ")?;
        self.range(&node.range)?;
        self.w(", ")?;
        self.bool_lit(node.bang)?;
        self.w(", ")?;
        self.lua_string(node.args[0].as_string().unwrap_or(""))?;
        self.w(")\n")
    }

    /// The catch-all `vim.commands.NAME(state, …)` lowering.
    fn cmd_generic(&mut self, node: &CmdNode, indent: usize) -> io::Result<()> {
        let def = cmddef(node.kind);
        let Some(name) = def.name else {
            return Ok(());
        };

        self.indent(indent)?;
        self.w("vim.commands")?;
        if name.as_bytes()[0].is_ascii_alphabetic() {
            self.w(".")?;
            self.w(name)?;
        } else {
            self.w("['")?;
            self.w(name)?;
            self.w("']")?;
        }
        self.w("(state")?;

        if def.flags.contains(CmdFlags::RANGE) {
            self.w(", ")?;
            self.range(&node.range)?;
        }
        if def.flags.contains(CmdFlags::BANG) {
            self.w(", ")?;
            self.bool_lit(node.bang)?;
        }
        if def.flags.contains(CmdFlags::EXFLAGS) {
            self.w(", ")?;
            self.ex_flags(node.exflags)?;
        }
        if def.parser == Some(SubParser::MapClear) {
            self.w(", ")?;
            self.bool_lit(node.args[0].as_flags() != 0)?;
        }

        for (i, arg) in node.args.iter().enumerate() {
            match def.arg_types.get(i) {
                Some(ArgType::Expr) => {
                    if let Some(expression) = arg.as_expr() {
                        self.w(", ")?;
                        self.expr(&expression.source, expression.node(), false)?;
                    }
                }
                Some(ArgType::Exprs | ArgType::AssignLhs) => {
                    if let Some(expression) = arg.as_expr() {
                        self.w(", ")?;
                        self.exprs(expression)?;
                    }
                }
                Some(
                    ArgType::String | ArgType::Pattern | ArgType::Glob | ArgType::Replacement,
                ) => {
                    if let Some(text) = arg.as_string() {
                        self.w(", ")?;
                        self.lua_string(text)?;
                    }
                }
                Some(ArgType::Regex) => {
                    if let Some(regex) = arg.as_regex() {
                        self.w(", ")?;
                        self.regex(regex)?;
                    }
                }
                Some(ArgType::Char) => {
                    if let CmdArg::Char(Some(c)) = arg {
                        self.w(", ")?;
                        self.lua_string(&c.to_string())?;
                    }
                }
                _ => {}
            }
        }

        self.w(")\n")
    }

    /// Emits a command list; returns true when emission stopped at a
    /// context-terminating `:return`/`:finish` (so callers know a Lua
    /// `return` already closed the block).
    pub(crate) fn nodes(
        &mut self,
        nodes: &[CmdNode],
        ctx: TranslationContext,
        indent: usize,
    ) -> io::Result<bool> {
        for (i, node) in nodes.iter().enumerate() {
            trace!(command = ?node.kind, "translate");
            let next_kind = nodes.get(i + 1).map(|n| n.kind);
            match node.kind {
                CmdKind::Finish => match ctx {
                    TranslationContext::Function | TranslationContext::User => {
                        self.indent(indent)?;
                        self.w(
                            "vim.err.err(state, nil, true, \
                             \"E168: :finish used outside of a sourced file\")\n",
                        )?;
                    }
                    TranslationContext::Script => {
                        self.indent(indent)?;
                        self.w("return nil\n")?;
                        return Ok(true);
                    }
                },
                CmdKind::Return => match ctx {
                    TranslationContext::Script | TranslationContext::User => {
                        self.indent(indent)?;
                        self.w(
                            "vim.err.err(state, nil, true, \
                             \"E133: :return not inside a function\")\n",
                        )?;
                    }
                    TranslationContext::Function => {
                        self.indent(indent)?;
                        self.w("return ")?;
                        match node.args[0].as_expr() {
                            Some(expression) => {
                                self.expr(&expression.source, expression.node(), false)?;
                            }
                            None => self.w("0")?,
                        }
                        self.w("\n")?;
                        return Ok(true);
                    }
                },
                CmdKind::Endwhile
                | CmdKind::Endfor
                | CmdKind::Endif
                | CmdKind::Endfunction
                | CmdKind::Endtry
                | CmdKind::Catch
                | CmdKind::Finally => {
                    // Handled by their block opener.
                }
                CmdKind::Comment => self.cmd_comment(node, indent, false)?,
                CmdKind::HashbangComment => self.cmd_comment(node, indent, true)?,
                CmdKind::SyntaxError => self.cmd_error(node, indent)?,
                CmdKind::Missing => self.w("\n")?,
                CmdKind::User => self.cmd_user(node, indent)?,
                CmdKind::Function
                    if FuncFlags::from_bits_truncate(node.args[ARG_FUNC_FLAGS].as_flags())
                        .contains(FuncFlags::DEF) =>
                {
                    self.cmd_function(node, indent)?;
                }
                CmdKind::For => self.cmd_for(node, indent, ctx)?,
                CmdKind::While => self.cmd_while(node, indent, ctx)?,
                CmdKind::If | CmdKind::Elseif | CmdKind::Else => {
                    self.cmd_if_block(node, next_kind, indent, ctx)?;
                }
                CmdKind::Try => self.cmd_try_block(node, &nodes[i + 1..], indent, ctx)?,
                CmdKind::Let => self.cmd_let(node, indent)?,
                CmdKind::Unlet => self.cmd_unlet(node, indent, false)?,
                CmdKind::Delfunction => self.cmd_unlet(node, indent, true)?,
                _ if cmddef(node.kind).flags.contains(CmdFlags::ISMODIFIER) => {
                    // Modifiers pass through to their wrapped command;
                    // the execution nuance belongs to the runtime.
                    self.nodes(&node.children, ctx, indent)?;
                }
                _ => self.cmd_generic(node, indent)?,
            }
        }
        Ok(false)
    }
}
