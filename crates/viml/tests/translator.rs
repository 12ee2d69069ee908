//! Golden tests for the Lua emitter.

use pretty_assertions::assert_eq;
use viml::{TranslationContext, parse_str, translate_to_string};

fn lua_user(source: &str) -> String {
    translate_to_string(TranslationContext::User, &parse_str(source)).unwrap()
}

fn lua_script(source: &str) -> String {
    translate_to_string(TranslationContext::Script, &parse_str(source)).unwrap()
}

#[test]
fn test_user_context_prelude() {
    assert_eq!(
        lua_user("echo 1 + 2"),
        "local state = vim.state.get_top()\n\
         vim.commands.echo(state, vim.op.add(state, 1, 2))\n",
    );
}

#[test]
fn test_script_context_wrapper() {
    let lua = lua_script("echo 1");
    let expected = "\
vim = require 'vim'
s = vim.new_script_scope(state, false)
return {
  run=function(state)
    state = vim.state.enter_script(state, s)
    vim.commands.echo(state, 1)
  end
}
";
    assert_eq!(lua, expected);
}

#[test]
fn test_scope_resolution() {
    assert!(lua_user("echo x").contains(
        "vim.commands.echo(state, vim.subscript.subscript(state, false, state.current_scope, 'x'))"
    ));
    assert!(lua_user("echo g:x")
        .contains("vim.subscript.subscript(state, false, state.global.g, 'x')"));
    assert!(lua_user("echo b:x")
        .contains("vim.subscript.subscript(state, false, state.global.buffer.b, 'x')"));
    assert!(lua_user("echo w:x")
        .contains("vim.subscript.subscript(state, false, state.global.window.w, 'x')"));
    assert!(lua_user("echo t:x")
        .contains("vim.subscript.subscript(state, false, state.global.tabpage.t, 'x')"));
    assert!(lua_user("echo a:x").contains("state.a, 'x'"));
    assert!(lua_user("echo l:x").contains("state.l, 'x'"));
    assert!(lua_user("echo s:x").contains("state.s, 'x'"));
    assert!(lua_user("echo v:count").contains("state.global.v, 'count'"));
}

#[test]
fn test_function_call_resolution() {
    // A lowercase called name goes through vim.functions.
    assert!(lua_user("call foo()").contains(
        "vim.subscript.call(state, vim.subscript.subscript(state, false, vim.functions, 'foo'))"
    ));
    // An uppercase one through the user functions table.
    assert!(lua_user("call Foo()")
        .contains("vim.subscript.subscript(state, false, state.global.user_functions, 'Foo')"));
}

#[test]
fn test_registers_and_environment() {
    assert!(lua_user("echo @a").contains("state.registers['a']"));
    assert!(lua_user("echo $HOME").contains("state.environment['HOME']"));
}

#[test]
fn test_option_lowering() {
    assert!(lua_user("echo &ignorecase").contains("state.global.options['ignorecase']"));
    assert!(lua_user("echo &shiftwidth").contains("state.global.buffer['shiftwidth']"));
    assert!(lua_user("echo &wrap").contains("state.global.window['wrap']"));
    assert!(
        lua_user("echo &g:shiftwidth")
            .contains("vim.get_local_option(state, state.global.buffer, 'shiftwidth')")
    );
}

#[test]
fn test_comparison_case_strategies() {
    assert!(lua_user("echo a == b")
        .contains("vim.op.equals(state, state.global.options.ignorecase, "));
    assert!(lua_user("echo a ==# b").contains("vim.op.equals(state, false, "));
    assert!(lua_user("echo a ==? b").contains("vim.op.equals(state, true, "));
    // Negative comparisons wrap the positive one.
    assert!(lua_user("echo a != b")
        .contains("vim.op.negate_logical(state, vim.op.equals(state, "));
    assert!(lua_user("echo a >= b")
        .contains("vim.op.negate_logical(state, vim.op.less(state, "));
}

#[test]
fn test_simple_assignment() {
    assert_eq!(
        lua_user("let a = 1"),
        "local state = vim.state.get_top()\n\
         vim.assign.ass_dict(state, 1, state.current_scope, 'a')\n",
    );
}

#[test]
fn test_modifying_assignment() {
    let lua = lua_user("let a += 2");
    assert!(lua.contains("vim.assign.ass_dict(state, vim.op.mod_add(state, "));
    let lua = lua_user("let a .= 'x'");
    assert!(lua.contains("vim.op.mod_concat(state, "));
}

#[test]
fn test_destructuring_assignment_guards() {
    let lua = lua_user("let [a, b] = c");
    assert!(lua.contains("local rhs = "));
    assert!(lua.contains("if vim.is_list(rhs) then"));
    assert!(lua.contains("if (vim.list.length(rhs) == 2) then"));
    assert!(lua.contains("vim.list.raw_subscript(rhs, 0)"));
    assert!(lua.contains("vim.list.raw_subscript(rhs, 1)"));
    assert!(lua.contains("E688: More targets than List items"));
    assert!(lua.contains("E687: Less targets than List items"));
    assert!(lua.contains("E714: List required"));
}

#[test]
fn test_destructuring_with_rest() {
    let lua = lua_user("let [a; r] = c");
    assert!(lua.contains("if (vim.list.length(rhs) >= 1) then"));
    assert!(lua.contains("vim.list.raw_slice_to_end(rhs, 2)"));
    assert!(!lua.contains("E688"));
}

#[test]
fn test_if_chain() {
    let lua = lua_user("if a\n echo 1\nelseif b\n echo 2\nelse\n echo 3\nendif\n");
    assert!(lua.contains("if vim.get_boolean(state, "));
    assert!(lua.contains("elseif vim.get_boolean(state, "));
    assert!(lua.contains("else\n"));
    // One end for the whole chain.
    assert_eq!(lua.matches("\nend\n").count(), 1);
}

#[test]
fn test_while_loop() {
    let lua = lua_user("while x\n echo 1\nendwhile\n");
    assert!(lua.contains("while vim.get_boolean(state, "));
    assert!(lua.trim_end().ends_with("end"));
}

#[test]
fn test_for_loop() {
    let lua = lua_user("for i in r\n echo i\nendfor\n");
    assert!(lua.contains("for _, i in vim.iter(state, "));
    // The loop variable assignment breaks the loop on failure.
    assert!(lua.contains("vim.assign.ass_dict(state, i, state.current_scope, 'i')"));
    assert!(lua.contains(" == nil then\n"));
    assert!(lua.contains("break"));
}

#[test]
fn test_try_catch_finally_shape() {
    let lua = lua_user("try\n throw 'x'\ncatch /x/\n echo 1\nfinally\n echo 2\nendtry\n");
    assert!(lua.contains("ok, err, ret = pcall(function(state)"));
    assert!(lua.contains("end, vim.state.enter_try(state))"));
    assert!(lua.contains("local fin = function(state)"));
    assert!(lua.contains("if (vim.err.matches(state, err, 'x')) then"));
    assert!(lua.contains("catch = function(state)"));
    assert!(lua.contains("ok = 'caught'"));
    assert!(lua.contains("catch(vim.state.enter_catch(state, err))"));
    assert!(lua.contains("vim.err.propagate(state, err)"));
    assert!(lua.contains("if (ret ~= nil) then"));
}

#[test]
fn test_function_definition_shape() {
    let lua = lua_user("function! F(a, ...) range\n return a:a\nendfunction\n");
    assert!(lua.contains("vim.assign.ass_dict_function(state, true, function(state, self, a, ...)"));
    assert!(lua.contains("state = vim.state.enter_function(state, self, {})"));
    assert!(lua.contains("state.a['a'] = a"));
    assert!(lua.contains("state.a['000'] = vim.list:new(state, ...)"));
    assert!(lua.contains("state.a['0'] = select('#', ...)"));
    assert!(lua.contains("return vim.subscript.subscript(state, false, state.a, 'a')"));
    assert!(lua.contains("end, state.global.user_functions, 'F')"));
}

#[test]
fn test_empty_function_returns_zero() {
    let lua = lua_user("function! F()\nendfunction\n");
    assert!(lua.contains("function(state, self)\n  return 0\nend"));
}

#[test]
fn test_return_and_finish_context_rules() {
    // :return outside a function is an error call.
    assert!(lua_user("return 1").contains("E133: :return not inside a function"));
    // :finish in a script returns nil; elsewhere it errors.
    assert!(lua_script("finish").contains("return nil"));
    assert!(lua_user("finish").contains("E168: :finish used outside of a sourced file"));
}

#[test]
fn test_unlet_and_delfunction() {
    let lua = lua_user("unlet! a b");
    assert_eq!(lua.matches("vim.assign.del_dict(state, true, ").count(), 2);
    let lua = lua_user("delfunction F");
    assert!(lua.contains("vim.assign.del_dict_function(state, false, "));
}

#[test]
fn test_user_command_call() {
    let lua = lua_user("MyCmd some args");
    assert!(lua.contains("vim.run_user_command(state, 'MyCmd', nil, false, 'some args')"));
}

#[test]
fn test_range_composition() {
    let lua = lua_user("1,$print");
    assert!(lua.contains(
        "vim.commands.print(state, vim.range.compose(state, 1, false, vim.range.last(state), false), {})"
    ));
    let lua = lua_user("/pat/+2,.print");
    assert!(lua.contains(
        "vim.range.apply_followup(state, 0, 2, vim.range.forward_search(state, 'pat'))"
    ));
    assert!(lua.contains("vim.range.current(state)"));
}

#[test]
fn test_ex_flags_table() {
    let lua = lua_user("print l#p");
    assert!(lua.contains("{list=true, lnr=true, print=true, }"));
}

#[test]
fn test_syntax_error_lowering() {
    let lua = lua_user("bogus");
    assert!(lua.contains("vim.err.err(state, nil, true, 'E492: Not an editor command')"));
}

#[test]
fn test_comment_lowering() {
    assert!(lua_user("\" note").contains("-- \" note"));
    assert!(lua_user("#!/bin/vim").contains("-- #!/bin/vim"));
}

#[test]
fn test_octal_rebased() {
    assert!(lua_user("echo 017").contains("vim.commands.echo(state, 15)"));
}

#[test]
fn test_float_literal() {
    assert!(lua_user("echo 1.5").contains("vim.float:new(state, 1.5)"));
}

#[test]
fn test_string_reescaping() {
    // Plain strings copy verbatim.
    assert!(lua_user("echo \"ab\\n\"").contains("vim.commands.echo(state, \"ab\\n\")"));
    // Vim-only escapes are rewritten.
    assert!(lua_user("echo \"\\e\"").contains("vim.commands.echo(state, \"\\027\")"));
    assert!(lua_user("echo \"\\x41\"").contains("vim.commands.echo(state, \"A\")"));
    // Doubled quotes in single-quoted strings become backslash escapes.
    assert!(lua_user("echo 'it''s'").contains("vim.commands.echo(state, 'it\\'s')"));
}

#[test]
fn test_curly_name_lowering() {
    let lua = lua_user("echo a{b}c");
    assert!(lua.contains("vim.get_scope_and_key(state, vim.concat(state, 'a', "));
    assert!(lua.contains(", 'c'))"));
}

#[test]
fn test_concat_or_subscript() {
    assert!(lua_user("echo d.key").contains("vim.concat_or_subscript(state, 'key', "));
}

#[test]
fn test_subscript_and_slice() {
    assert!(lua_user("echo a[1]").contains("vim.subscript.subscript(state, true, "));
    assert!(lua_user("echo a[1:2]").contains("vim.subscript.slice(state, "));
}

#[test]
fn test_list_and_dict_constructors() {
    assert!(lua_user("echo [1, 2]").contains("vim.list:new(state, 1, 2)"));
    assert!(lua_user("echo {'k': 1}").contains("vim.dict:new(state, 'k', 1)"));
}
