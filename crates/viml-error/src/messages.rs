//! Vim diagnostic texts used by the parser and the block reconciler.

// Command-level diagnostics.
pub const E_TRAILING: &str = "E488: Trailing characters";
pub const E_NOBANG: &str = "E477: No ! allowed";
pub const E_NORANGE: &str = "E481: No range allowed";
pub const E_BACKSLASH: &str = "E10: \\ should be followed by /, ? or &";
pub const E_NOT_EDITOR_CMD: &str = "E492: Not an editor command";
pub const E_TRAILING_EXPR: &str = "E15: trailing characters";
pub const E_TOO_MANY_NESTED: &str = "E579: too many nested blocks";

// Expression diagnostics.
pub const E_MISSING_COLON: &str = "E109: Missing ':' after '?'";
pub const E_MISSING_PAREN: &str = "E110: Missing ')'";
pub const E_MISSING_BRACKET: &str = "E111: Missing ']'";
pub const E_OPTION_NAME_MISSING: &str = "E112: Option name missing";
pub const E_MISSING_QUOTE: &str = "E114: Missing quote";
pub const E_MISSING_LIST_COMMA: &str = "E696: Missing comma in List";
pub const E_MISSING_LIST_END: &str = "E697: Missing end of List";
pub const E_MISSING_DICT_COLON: &str = "E720: Missing colon in Dictionary";
pub const E_MISSING_DICT_COMMA: &str = "E722: Missing comma in Dictionary";
pub const E_MISSING_DICT_END: &str = "E723: Missing end of Dictionary";
pub const E_EXPECTED_VARIABLE_NAME: &str = "expected variable name";
pub const E_MISSING_CURLY_BRACE: &str = "missing closing curly brace";
pub const E_EXPECTED_PAREN: &str = "expected closing parenthesis";
pub const E_TOO_MANY_ARGS: &str = "E740: Too many arguments for function";
pub const E_INVALID_EXPRESSION: &str = "E15: Invalid expression";
pub const E_EXPR_TOO_DEEP: &str = "expression nesting too deep";

// Assignment diagnostics.
pub const E_LVALUE_REQUIRED: &str = "E475: Invalid argument: expected value reference";
pub const E_LET_UNEXPECTED: &str = "E18: Unexpected characters in :let";
pub const E_LET_REST_LAST: &str = "E452: Double ; in list of variables";
pub const E_FOR_MISSING_IN: &str = "E690: Missing \"in\" after :for";

// Function definition diagnostics.
pub const E_FUNC_MISSING_PAREN: &str = "E124: Missing '('";
pub const E_FUNC_MISSING_NAME: &str = "E129: Function name required";
pub const E_FUNC_ARG: &str = "E125: Illegal argument";

// Menu diagnostics.
pub const E_EXPECTED_MENU_NAME: &str = "E475: Expected menu name";
pub const E_EMPTY_MENU_NAME: &str = "E792: Empty menu name";
pub const E_MENU_BAR_ITEM: &str = "E331: Must not add menu items directly to menu bar";

// Autocommand diagnostics.
pub const E_BAD_AU_EVENT: &str = "E216: No such group or event";

// Miscellaneous argument diagnostics.
pub const E_REGEX_DELIM: &str = "E146: Regular expressions can't be delimited by letters";
pub const E_INVALID_ADDRESS: &str = "E14: Invalid address";
pub const E_INVALID_ATTRIBUTE: &str = "E181: Invalid attribute";

// Block reconciliation diagnostics.
pub const E_ENDIF_WITHOUT_IF: &str = "E580: :endif without :if";
pub const E_ELSE_WITHOUT_IF: &str = "E581: :else without :if";
pub const E_ELSEIF_WITHOUT_IF: &str = "E582: :elseif without :if";
pub const E_MULTIPLE_ELSE: &str = "E583: multiple :else";
pub const E_ELSEIF_AFTER_ELSE: &str = "E584: :elseif after :else";
pub const E_ENDWHILE_WITHOUT_WHILE: &str = "E588: :endwhile without :while";
pub const E_ENDFOR_WITHOUT_FOR: &str = "E588: :endfor without :for";
pub const E_ENDTRY_WITHOUT_TRY: &str = "E602: :endtry without :try";
pub const E_CATCH_WITHOUT_TRY: &str = "E603: :catch without :try";
pub const E_CATCH_AFTER_FINALLY: &str = "E604: :catch after :finally";
pub const E_FINALLY_WITHOUT_TRY: &str = "E606: :finally without :try";
pub const E_MULTIPLE_FINALLY: &str = "E607: multiple :finally";
pub const E_ENDFUNCTION_NOT_IN_FUNC: &str = "E193: :endfunction not inside a function";
pub const E_ENDWHILE_WITH_FOR: &str = "E733: Using :endwhile with :for";
pub const E_ENDFOR_WITH_WHILE: &str = "E732: Using :endfor with :while";
pub const E_MISSING_ENDIF: &str = "E171: Missing :endif";
pub const E_MISSING_ENDTRY: &str = "E600: Missing :endtry";
pub const E_MISSING_ENDWHILE: &str = "E170: Missing :endwhile";
pub const E_MISSING_ENDFOR: &str = "E170: Missing :endfor";
pub const E_MISSING_ENDFUNCTION: &str = "E126: Missing :endfunction";
