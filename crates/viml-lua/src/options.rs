//! Option locality classification.
//!
//! The emitter only needs to know which table an option lives in; the
//! authoritative option store belongs to the runtime. This covers the
//! local options scripts actually touch; anything unknown is treated as
//! global.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OptionLocality {
    Global,
    Buffer,
    Window,
}

static BUFFER_LOCAL: &[&str] = &[
    "autoindent",
    "binary",
    "bomb",
    "buftype",
    "commentstring",
    "expandtab",
    "fileencoding",
    "fileformat",
    "filetype",
    "iskeyword",
    "modifiable",
    "modified",
    "readonly",
    "shiftwidth",
    "softtabstop",
    "swapfile",
    "syntax",
    "tabstop",
    "textwidth",
    "undofile",
    "wrapmargin",
];

static WINDOW_LOCAL: &[&str] = &[
    "colorcolumn",
    "concealcursor",
    "conceallevel",
    "cursorcolumn",
    "cursorline",
    "diff",
    "foldcolumn",
    "foldenable",
    "foldlevel",
    "foldmethod",
    "linebreak",
    "list",
    "number",
    "relativenumber",
    "scroll",
    "spell",
    "winfixheight",
    "winfixwidth",
    "wrap",
];

pub(crate) fn option_locality(name: &str) -> OptionLocality {
    if BUFFER_LOCAL.contains(&name) {
        OptionLocality::Buffer
    } else if WINDOW_LOCAL.contains(&name) {
        OptionLocality::Window
    } else {
        OptionLocality::Global
    }
}
