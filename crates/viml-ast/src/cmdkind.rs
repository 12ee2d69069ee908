//! Command kinds.
//!
//! The declaration order below is the command-table order: lookup by
//! minimal unique prefix scans it top to bottom, so within one first
//! letter the entry that owns the short abbreviation comes first
//! (`:t` is `t`, `:ta` is `tag`, `:tab` is the `tab` modifier). The
//! virtual kinds come first and carry no name.

macro_rules! cmd_kinds {
    (
        virtual { $( $vvar:ident, )* }
        builtin { $( $bvar:ident => $bname:literal, )* }
    ) => {
        /// Kind tag of a command node.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u16)]
        pub enum CmdKind {
            $( $vvar, )*
            $( $bvar, )*
        }

        impl CmdKind {
            /// Every kind, in table order.
            pub const ALL: &'static [CmdKind] = &[
                $( CmdKind::$vvar, )*
                $( CmdKind::$bvar, )*
            ];

            /// Canonical command name; `None` for virtual kinds.
            pub const fn name(self) -> Option<&'static str> {
                match self {
                    $( CmdKind::$vvar => None, )*
                    $( CmdKind::$bvar => Some($bname), )*
                }
            }

            /// Index into the command table.
            pub const fn index(self) -> usize {
                self as usize
            }
        }
    };
}

cmd_kinds! {
    virtual {
        Unknown,
        Missing,
        Comment,
        HashbangComment,
        SyntaxError,
        User,
    }
    builtin {
        Append => "append",
        Abbreviate => "abbreviate",
        Abclear => "abclear",
        Aboveleft => "aboveleft",
        All => "all",
        Amenu => "amenu",
        Anoremenu => "anoremenu",
        Args => "args",
        Argadd => "argadd",
        Argdelete => "argdelete",
        Argdo => "argdo",
        Argedit => "argedit",
        Argglobal => "argglobal",
        Arglocal => "arglocal",
        Argument => "argument",
        Ascii => "ascii",
        Autocmd => "autocmd",
        Augroup => "augroup",
        Aunmenu => "aunmenu",
        Buffer => "buffer",
        BNext => "bNext",
        Ball => "ball",
        Badd => "badd",
        Bdelete => "bdelete",
        Behave => "behave",
        Belowright => "belowright",
        Bfirst => "bfirst",
        Blast => "blast",
        Bmodified => "bmodified",
        Bnext => "bnext",
        Botright => "botright",
        Bprevious => "bprevious",
        Brewind => "brewind",
        Break => "break",
        Breakadd => "breakadd",
        Breakdel => "breakdel",
        Breaklist => "breaklist",
        Browse => "browse",
        Bufdo => "bufdo",
        Buffers => "buffers",
        Bunload => "bunload",
        Bwipeout => "bwipeout",
        Change => "change",
        CNext => "cNext",
        CNfile => "cNfile",
        Cabbrev => "cabbrev",
        Cabclear => "cabclear",
        Caddbuffer => "caddbuffer",
        Caddexpr => "caddexpr",
        Caddfile => "caddfile",
        Call => "call",
        Catch => "catch",
        Cbuffer => "cbuffer",
        Cc => "cc",
        Cclose => "cclose",
        Cd => "cd",
        Center => "center",
        Cexpr => "cexpr",
        Cfile => "cfile",
        Cfirst => "cfirst",
        Cgetfile => "cgetfile",
        Cgetbuffer => "cgetbuffer",
        Cgetexpr => "cgetexpr",
        Chdir => "chdir",
        Checkpath => "checkpath",
        Checktime => "checktime",
        Clast => "clast",
        Clist => "clist",
        Close => "close",
        Cmap => "cmap",
        Cmapclear => "cmapclear",
        Cmenu => "cmenu",
        Cnext => "cnext",
        Cnewer => "cnewer",
        Cnfile => "cnfile",
        Cnoremap => "cnoremap",
        Cnoreabbrev => "cnoreabbrev",
        Cnoremenu => "cnoremenu",
        Copy => "copy",
        Colder => "colder",
        Colorscheme => "colorscheme",
        Command => "command",
        Comclear => "comclear",
        Compiler => "compiler",
        Continue => "continue",
        Confirm => "confirm",
        Copen => "copen",
        Cprevious => "cprevious",
        Cpfile => "cpfile",
        Cquit => "cquit",
        Crewind => "crewind",
        Cscope => "cscope",
        Cstag => "cstag",
        Cunmap => "cunmap",
        Cunabbrev => "cunabbrev",
        Cunmenu => "cunmenu",
        Cwindow => "cwindow",
        Delete => "delete",
        Delmarks => "delmarks",
        Debug => "debug",
        Debuggreedy => "debuggreedy",
        Delcommand => "delcommand",
        Delfunction => "delfunction",
        Display => "display",
        Diffupdate => "diffupdate",
        Diffget => "diffget",
        Diffoff => "diffoff",
        Diffpatch => "diffpatch",
        Diffput => "diffput",
        Diffsplit => "diffsplit",
        Diffthis => "diffthis",
        Digraphs => "digraphs",
        Djump => "djump",
        Dlist => "dlist",
        Doautocmd => "doautocmd",
        Doautoall => "doautoall",
        Drop => "drop",
        Dsearch => "dsearch",
        Dsplit => "dsplit",
        Edit => "edit",
        Earlier => "earlier",
        Echo => "echo",
        Echoerr => "echoerr",
        Echohl => "echohl",
        Echomsg => "echomsg",
        Echon => "echon",
        Else => "else",
        Elseif => "elseif",
        Emenu => "emenu",
        Endif => "endif",
        Endfunction => "endfunction",
        Endfor => "endfor",
        Endtry => "endtry",
        Endwhile => "endwhile",
        Enew => "enew",
        Ex => "ex",
        Execute => "execute",
        Exit => "exit",
        Exusage => "exusage",
        File => "file",
        Files => "files",
        Filetype => "filetype",
        Find => "find",
        Finally => "finally",
        Finish => "finish",
        First => "first",
        Fixdel => "fixdel",
        Fold => "fold",
        Foldclose => "foldclose",
        Folddoopen => "folddoopen",
        Folddoclosed => "folddoclosed",
        Foldopen => "foldopen",
        For => "for",
        Function => "function",
        Global => "global",
        Goto => "goto",
        Grep => "grep",
        Grepadd => "grepadd",
        Gui => "gui",
        Gvim => "gvim",
        Help => "help",
        Helpfind => "helpfind",
        Helpgrep => "helpgrep",
        Helptags => "helptags",
        Highlight => "highlight",
        Hide => "hide",
        History => "history",
        Insert => "insert",
        Iabbrev => "iabbrev",
        Iabclear => "iabclear",
        If => "if",
        Ijump => "ijump",
        Ilist => "ilist",
        Imap => "imap",
        Imapclear => "imapclear",
        Imenu => "imenu",
        Inoremap => "inoremap",
        Inoreabbrev => "inoreabbrev",
        Inoremenu => "inoremenu",
        Intro => "intro",
        Isearch => "isearch",
        Isplit => "isplit",
        Iunmap => "iunmap",
        Iunabbrev => "iunabbrev",
        Iunmenu => "iunmenu",
        Join => "join",
        Jumps => "jumps",
        K => "k",
        Keepmarks => "keepmarks",
        Keepjumps => "keepjumps",
        Keepalt => "keepalt",
        Keeppatterns => "keeppatterns",
        List => "list",
        LNext => "lNext",
        LNfile => "lNfile",
        Last => "last",
        Language => "language",
        Laddexpr => "laddexpr",
        Laddbuffer => "laddbuffer",
        Laddfile => "laddfile",
        Later => "later",
        Lbuffer => "lbuffer",
        Lcd => "lcd",
        Lchdir => "lchdir",
        Lclose => "lclose",
        Lcscope => "lcscope",
        Left => "left",
        Leftabove => "leftabove",
        Let => "let",
        Lexpr => "lexpr",
        Lfile => "lfile",
        Lfirst => "lfirst",
        Lgetfile => "lgetfile",
        Lgetbuffer => "lgetbuffer",
        Lgetexpr => "lgetexpr",
        Lgrep => "lgrep",
        Lgrepadd => "lgrepadd",
        Lhelpgrep => "lhelpgrep",
        Ll => "ll",
        Llast => "llast",
        Llist => "llist",
        Lmap => "lmap",
        Lmapclear => "lmapclear",
        Lmake => "lmake",
        Lnext => "lnext",
        Lnewer => "lnewer",
        Lnfile => "lnfile",
        Lnoremap => "lnoremap",
        Loadview => "loadview",
        Lockmarks => "lockmarks",
        Lockvar => "lockvar",
        Lolder => "lolder",
        Lopen => "lopen",
        Lprevious => "lprevious",
        Lpfile => "lpfile",
        Lrewind => "lrewind",
        Ls => "ls",
        Ltag => "ltag",
        Lua => "lua",
        Luado => "luado",
        Luafile => "luafile",
        Lunmap => "lunmap",
        Lvimgrep => "lvimgrep",
        Lvimgrepadd => "lvimgrepadd",
        Lwindow => "lwindow",
        Move => "move",
        Mark => "mark",
        Make => "make",
        Map => "map",
        Mapclear => "mapclear",
        Marks => "marks",
        Match => "match",
        Menu => "menu",
        Menutranslate => "menutranslate",
        Messages => "messages",
        Mkexrc => "mkexrc",
        Mksession => "mksession",
        Mkspell => "mkspell",
        Mkvimrc => "mkvimrc",
        Mkview => "mkview",
        Mode => "mode",
        Next => "next",
        New => "new",
        Nmap => "nmap",
        Nmapclear => "nmapclear",
        Nmenu => "nmenu",
        Nnoremap => "nnoremap",
        Nnoremenu => "nnoremenu",
        Noremap => "noremap",
        Nohlsearch => "nohlsearch",
        Noautocmd => "noautocmd",
        Noreabbrev => "noreabbrev",
        Noremenu => "noremenu",
        Normal => "normal",
        Number => "number",
        Nunmap => "nunmap",
        Nunmenu => "nunmenu",
        Open => "open",
        Oldfiles => "oldfiles",
        Omap => "omap",
        Omapclear => "omapclear",
        Omenu => "omenu",
        Only => "only",
        Onoremap => "onoremap",
        Onoremenu => "onoremenu",
        Options => "options",
        Ounmap => "ounmap",
        Ounmenu => "ounmenu",
        Ownsyntax => "ownsyntax",
        Print => "print",
        Pclose => "pclose",
        Perl => "perl",
        Perldo => "perldo",
        Pedit => "pedit",
        Pop => "pop",
        Popup => "popup",
        Ppop => "ppop",
        Preserve => "preserve",
        Previous => "previous",
        Profile => "profile",
        Profdel => "profdel",
        Promptfind => "promptfind",
        Promptrepl => "promptrepl",
        Psearch => "psearch",
        Ptag => "ptag",
        PtNext => "ptNext",
        Ptfirst => "ptfirst",
        Ptjump => "ptjump",
        Ptlast => "ptlast",
        Ptnext => "ptnext",
        Ptprevious => "ptprevious",
        Ptrewind => "ptrewind",
        Ptselect => "ptselect",
        Put => "put",
        Pwd => "pwd",
        Python => "python",
        Python3 => "python3",
        Py3 => "py3",
        Py3do => "py3do",
        Py3file => "py3file",
        Pydo => "pydo",
        Pyfile => "pyfile",
        Quit => "quit",
        Quitall => "quitall",
        Qall => "qall",
        Read => "read",
        Recover => "recover",
        Redo => "redo",
        Redir => "redir",
        Redraw => "redraw",
        Redrawstatus => "redrawstatus",
        Registers => "registers",
        Resize => "resize",
        Retab => "retab",
        Return => "return",
        Rewind => "rewind",
        Right => "right",
        Rightbelow => "rightbelow",
        Runtime => "runtime",
        Ruby => "ruby",
        Rubydo => "rubydo",
        Rubyfile => "rubyfile",
        Rundo => "rundo",
        Rviminfo => "rviminfo",
        Substitute => "substitute",
        SNext => "sNext",
        Sargument => "sargument",
        Sall => "sall",
        Sandbox => "sandbox",
        Saveas => "saveas",
        Sbuffer => "sbuffer",
        SbNext => "sbNext",
        Sball => "sball",
        Sbfirst => "sbfirst",
        Sblast => "sblast",
        Sbmodified => "sbmodified",
        Sbnext => "sbnext",
        Sbprevious => "sbprevious",
        Sbrewind => "sbrewind",
        Scriptnames => "scriptnames",
        Scriptencoding => "scriptencoding",
        Scscope => "scscope",
        Set => "set",
        Setfiletype => "setfiletype",
        Setglobal => "setglobal",
        Setlocal => "setlocal",
        Sfind => "sfind",
        Sfirst => "sfirst",
        Shell => "shell",
        Sign => "sign",
        Silent => "silent",
        Simalt => "simalt",
        Sleep => "sleep",
        Slast => "slast",
        Smagic => "smagic",
        Smap => "smap",
        Smapclear => "smapclear",
        Smenu => "smenu",
        Snext => "snext",
        Sniff => "sniff",
        Snomagic => "snomagic",
        Snoremap => "snoremap",
        Snoremenu => "snoremenu",
        Source => "source",
        Sort => "sort",
        Split => "split",
        Sprevious => "sprevious",
        Spellgood => "spellgood",
        Spelldump => "spelldump",
        Spellinfo => "spellinfo",
        Spellrepall => "spellrepall",
        Spellundo => "spellundo",
        Spellwrong => "spellwrong",
        Srewind => "srewind",
        Stop => "stop",
        Stag => "stag",
        Startinsert => "startinsert",
        Startgreplace => "startgreplace",
        Startreplace => "startreplace",
        Stopinsert => "stopinsert",
        Stjump => "stjump",
        Stselect => "stselect",
        Sunhide => "sunhide",
        Sunmap => "sunmap",
        Sunmenu => "sunmenu",
        Suspend => "suspend",
        Sview => "sview",
        Swapname => "swapname",
        Syntax => "syntax",
        Syncbind => "syncbind",
        Syntime => "syntime",
        T => "t",
        TNext => "tNext",
        Tag => "tag",
        Tags => "tags",
        Tab => "tab",
        Tabclose => "tabclose",
        Tabdo => "tabdo",
        Tabedit => "tabedit",
        Tabfind => "tabfind",
        Tabfirst => "tabfirst",
        Tablast => "tablast",
        Tabmove => "tabmove",
        Tabnext => "tabnext",
        TabNext => "tabNext",
        Tabnew => "tabnew",
        Tabonly => "tabonly",
        Tabprevious => "tabprevious",
        Tabrewind => "tabrewind",
        Tabs => "tabs",
        Tcl => "tcl",
        Tcldo => "tcldo",
        Tclfile => "tclfile",
        Tearoff => "tearoff",
        Tfirst => "tfirst",
        Throw => "throw",
        Tjump => "tjump",
        Tlast => "tlast",
        Tmenu => "tmenu",
        Tnext => "tnext",
        Topleft => "topleft",
        Tprevious => "tprevious",
        Trewind => "trewind",
        Try => "try",
        Tselect => "tselect",
        Tunmenu => "tunmenu",
        Undo => "undo",
        Undojoin => "undojoin",
        Undolist => "undolist",
        Unabbreviate => "unabbreviate",
        Unhide => "unhide",
        Unlet => "unlet",
        Unlockvar => "unlockvar",
        Unmap => "unmap",
        Unmenu => "unmenu",
        Unsilent => "unsilent",
        Update => "update",
        Vglobal => "vglobal",
        Version => "version",
        Verbose => "verbose",
        Vertical => "vertical",
        Visual => "visual",
        Viusage => "viusage",
        View => "view",
        Vimgrep => "vimgrep",
        Vimgrepadd => "vimgrepadd",
        Vmap => "vmap",
        Vmapclear => "vmapclear",
        Vmenu => "vmenu",
        Vnoremap => "vnoremap",
        Vnoremenu => "vnoremenu",
        Vnew => "vnew",
        Vsplit => "vsplit",
        Vunmap => "vunmap",
        Vunmenu => "vunmenu",
        Write => "write",
        WNext => "wNext",
        Wall => "wall",
        While => "while",
        Winsize => "winsize",
        Wincmd => "wincmd",
        Windo => "windo",
        Winpos => "winpos",
        Wnext => "wnext",
        Wprevious => "wprevious",
        Wq => "wq",
        Wqall => "wqall",
        Wundo => "wundo",
        Wviminfo => "wviminfo",
        Xit => "xit",
        Xall => "xall",
        Xmap => "xmap",
        Xmapclear => "xmapclear",
        Xmenu => "xmenu",
        Xnoremap => "xnoremap",
        Xnoremenu => "xnoremenu",
        Xunmap => "xunmap",
        Xunmenu => "xunmenu",
        Yank => "yank",
        Z => "z",
        Bang => "!",
        Pound => "#",
        And => "&",
        Star => "*",
        Lshift => "<",
        Equal => "=",
        Rshift => ">",
        At => "@",
        NextUpper => "Next",
        PrintUpper => "Print",
        XUpper => "X",
        Tilde => "~",
    }
}

impl CmdKind {
    /// True for the kinds that never come from the command table lookup.
    pub const fn is_virtual(self) -> bool {
        matches!(
            self,
            CmdKind::Unknown
                | CmdKind::Missing
                | CmdKind::Comment
                | CmdKind::HashbangComment
                | CmdKind::SyntaxError
                | CmdKind::User
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_all_order() {
        for (i, kind) in CmdKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_virtual_kinds_have_no_name() {
        assert_eq!(CmdKind::Unknown.name(), None);
        assert_eq!(CmdKind::User.name(), None);
        assert_eq!(CmdKind::Append.name(), Some("append"));
        assert_eq!(CmdKind::Bang.name(), Some("!"));
    }

    #[test]
    fn test_short_forms_resolve_first() {
        // The entry owning an abbreviation must precede longer names that
        // share the prefix.
        let pos = |k: CmdKind| CmdKind::ALL.iter().position(|&x| x == k).unwrap_or(usize::MAX);
        assert!(pos(CmdKind::Tag) < pos(CmdKind::Tab));
        assert!(pos(CmdKind::Tabnext) < pos(CmdKind::Tabnew));
        assert!(pos(CmdKind::Noremap) < pos(CmdKind::Noautocmd));
        assert!(pos(CmdKind::Split) < pos(CmdKind::Spellgood));
        assert!(pos(CmdKind::Endif) < pos(CmdKind::Endfor));
    }
}
