//! The command definition table.

use crate::{CmdFlags, CommandDefinition, SubParser};
use std::sync::LazyLock;
use viml_ast::{ArgType, CmdKind};

// Argument layouts shared between command families.
const ARGS_NO: &[ArgType] = &[];
const ARGS_APPEND: &[ArgType] = &[ArgType::Lines];
const ARGS_MAP: &[ArgType] =
    &[ArgType::Flags, ArgType::KeySeq, ArgType::KeySeq, ArgType::Expr, ArgType::Command];
const ARGS_UNMAP: &[ArgType] = &[ArgType::Flags, ArgType::KeySeq];
const ARGS_CLEAR: &[ArgType] = &[ArgType::Flags];
const ARGS_MENU: &[ArgType] = &[
    ArgType::Flags,
    ArgType::String,
    ArgType::Numbers,
    ArgType::MenuName,
    ArgType::String,
    ArgType::KeySeq,
];
const ARGS_UNMENU: &[ArgType] = &[ArgType::MenuName];
const ARGS_EXPR: &[ArgType] = &[ArgType::Expr];
const ARGS_EXPRS: &[ArgType] = &[ArgType::Exprs];
const ARGS_LOCKVAR: &[ArgType] = &[ArgType::Exprs, ArgType::UNumber];
const ARGS_LET: &[ArgType] = &[ArgType::Flags, ArgType::AssignLhs, ArgType::Expr];
const ARGS_FOR: &[ArgType] = &[ArgType::String, ArgType::AssignLhs, ArgType::Expr];
const ARGS_FUNC: &[ArgType] =
    &[ArgType::Regex, ArgType::AssignLhs, ArgType::Strings, ArgType::Flags];
const ARGS_REGEX: &[ArgType] = &[ArgType::Regex];
const ARGS_GLOBAL: &[ArgType] = &[ArgType::Regex, ArgType::String];
const ARGS_SUBST: &[ArgType] = &[ArgType::Regex, ArgType::Replacement, ArgType::Flags];
const ARGS_CHAR: &[ArgType] = &[ArgType::Char];
const ARGS_ADDR: &[ArgType] = &[ArgType::Address];
const ARGS_AU: &[ArgType] =
    &[ArgType::String, ArgType::AuEvents, ArgType::Pattern, ArgType::Flags, ArgType::String];
const ARGS_DOAU: &[ArgType] =
    &[ArgType::Flags, ArgType::String, ArgType::AuEvent, ArgType::String];
const ARGS_CMD: &[ArgType] = &[ArgType::Flags, ArgType::CmdComplete, ArgType::String];
const ARGS_REST: &[ArgType] = &[ArgType::String];
const ARGS_GLOB: &[ArgType] = &[ArgType::Glob];
const ARGS_ERROR: &[ArgType] = &[ArgType::String, ArgType::String, ArgType::Column];

/// Flags, argument layout and sub-parser of one command kind.
#[allow(clippy::too_many_lines)]
fn spec_for(kind: CmdKind) -> (CmdFlags, &'static [ArgType], Option<SubParser>) {
    use CmdFlags as F;
    use CmdKind::*;
    use SubParser as P;

    match kind {
        // Virtual kinds.
        Unknown | Missing => (F::empty(), ARGS_NO, None),
        Comment | HashbangComment => (F::empty(), ARGS_REST, None),
        SyntaxError => (F::empty(), ARGS_ERROR, None),
        User => ((F::RANGE | F::BANG | F::COUNT | F::EXTRA), ARGS_REST, None),

        // Command modifiers.
        Aboveleft | Belowright | Botright | Browse | Confirm | Hide | Keepalt | Keepjumps
        | Keepmarks | Keeppatterns | Leftabove | Lockmarks | Noautocmd | Rightbelow | Sandbox
        | Topleft | Unsilent | Vertical => ((F::ISMODIFIER | F::TRLBAR), ARGS_NO, None),
        Silent => ((F::ISMODIFIER | F::TRLBAR | F::BANG), ARGS_NO, None),
        Tab | Verbose => ((F::ISMODIFIER | F::TRLBAR | F::COUNT), ARGS_NO, None),

        // Line input.
        Append | Change | Insert => {
            ((F::RANGE | F::BANG | F::TRLBAR), ARGS_APPEND, Some(P::Append))
        }

        // Mappings and abbreviations.
        Map | Noremap => (
            (F::EXTRA | F::TRLBAR | F::NOTRLCOM | F::USECTRLV | F::BANG),
            ARGS_MAP,
            Some(P::Map),
        ),
        Nmap | Vmap | Xmap | Smap | Omap | Imap | Lmap | Cmap | Nnoremap | Vnoremap | Xnoremap
        | Snoremap | Onoremap | Inoremap | Lnoremap | Cnoremap | Abbreviate | Cabbrev | Iabbrev
        | Noreabbrev | Cnoreabbrev | Inoreabbrev => {
            ((F::EXTRA | F::TRLBAR | F::NOTRLCOM | F::USECTRLV), ARGS_MAP, Some(P::Map))
        }
        Unmap => (
            (F::EXTRA | F::TRLBAR | F::NOTRLCOM | F::USECTRLV | F::BANG),
            ARGS_UNMAP,
            Some(P::Unmap),
        ),
        Nunmap | Vunmap | Xunmap | Sunmap | Ounmap | Iunmap | Lunmap | Cunmap | Unabbreviate
        | Cunabbrev | Iunabbrev => {
            ((F::EXTRA | F::TRLBAR | F::NOTRLCOM | F::USECTRLV), ARGS_UNMAP, Some(P::Unmap))
        }
        Mapclear => ((F::EXTRA | F::TRLBAR | F::BANG), ARGS_CLEAR, Some(P::MapClear)),
        Nmapclear | Vmapclear | Xmapclear | Smapclear | Omapclear | Imapclear | Lmapclear
        | Cmapclear | Abclear | Cabclear | Iabclear => {
            ((F::EXTRA | F::TRLBAR), ARGS_CLEAR, Some(P::MapClear))
        }

        // Menus.
        Menu | Amenu | Nmenu | Vmenu | Xmenu | Smenu | Omenu | Imenu | Cmenu | Tmenu | Noremenu
        | Anoremenu | Nnoremenu | Vnoremenu | Xnoremenu | Snoremenu | Onoremenu | Inoremenu
        | Cnoremenu => (
            (F::RANGE | F::EXTRA | F::TRLBAR | F::NOTRLCOM | F::USECTRLV),
            ARGS_MENU,
            Some(P::Menu),
        ),
        Unmenu | Aunmenu | Nunmenu | Vunmenu | Xunmenu | Sunmenu | Ounmenu | Iunmenu | Cunmenu
        | Tunmenu => {
            ((F::EXTRA | F::TRLBAR | F::NOTRLCOM | F::USECTRLV), ARGS_UNMENU, Some(P::Unmenu))
        }
        Emenu => ((F::RANGE | F::EXTRA | F::TRLBAR | F::NOTRLCOM), ARGS_UNMENU, Some(P::Unmenu)),
        Popup => (
            (F::RANGE | F::BANG | F::EXTRA | F::TRLBAR | F::NOTRLCOM),
            ARGS_UNMENU,
            Some(P::Unmenu),
        ),
        Menutranslate => {
            ((F::EXTRA | F::TRLBAR | F::NOTRLCOM | F::USECTRLV), ARGS_REST, Some(P::Rest))
        }
        Tearoff => ((F::EXTRA | F::TRLBAR | F::NOTRLCOM), ARGS_REST, Some(P::Rest)),

        // Expression commands.
        If | Elseif | While | Throw => {
            ((F::EXTRA | F::ISEXPR | F::NOTRLCOM), ARGS_EXPR, Some(P::Expr))
        }
        Cexpr | Caddexpr | Cgetexpr | Lexpr | Laddexpr | Lgetexpr => {
            ((F::EXTRA | F::ISEXPR | F::NOTRLCOM | F::BANG), ARGS_EXPR, Some(P::Expr))
        }
        Echo | Echon | Echomsg | Echoerr | Execute | Return => {
            ((F::EXTRA | F::ISEXPR | F::NOTRLCOM), ARGS_EXPRS, Some(P::Exprs))
        }
        Call => ((F::RANGE | F::EXTRA | F::ISEXPR | F::NOTRLCOM), ARGS_EXPRS, Some(P::Exprs)),
        Unlet | Delfunction => {
            ((F::EXTRA | F::ISEXPR | F::NOTRLCOM | F::BANG), ARGS_EXPRS, Some(P::Lvals))
        }
        Lockvar | Unlockvar => {
            ((F::EXTRA | F::ISEXPR | F::NOTRLCOM | F::BANG), ARGS_LOCKVAR, Some(P::LockVar))
        }
        Let => ((F::EXTRA | F::ISEXPR | F::NOTRLCOM), ARGS_LET, Some(P::Let)),
        For => ((F::EXTRA | F::ISEXPR | F::NOTRLCOM), ARGS_FOR, Some(P::For)),
        Function => {
            ((F::EXTRA | F::BANG | F::ISEXPR | F::NOTRLCOM), ARGS_FUNC, Some(P::Function))
        }
        Catch => ((F::EXTRA | F::ISGREP), ARGS_REGEX, Some(P::Catch)),

        // Plain block commands.
        Else | Endif | Endfunction | Endfor | Endtry | Endwhile | Try | Finally | Continue
        | Break => ((F::TRLBAR), ARGS_NO, None),

        // Global and substitute.
        Global => ((F::RANGE | F::BANG | F::EXTRA | F::ISGREP), ARGS_GLOBAL, Some(P::Global)),
        Vglobal => ((F::RANGE | F::EXTRA | F::ISGREP), ARGS_GLOBAL, Some(P::Global)),
        Substitute | Smagic | Snomagic | And | Tilde => {
            ((F::RANGE | F::EXTRA | F::ISGREP | F::COUNT), ARGS_SUBST, Some(P::Substitute))
        }

        // Single-character arguments.
        K | Mark => ((F::RANGE | F::EXTRA | F::TRLBAR), ARGS_CHAR, Some(P::CharArg)),
        Simalt => ((F::EXTRA | F::TRLBAR), ARGS_CHAR, Some(P::CharArg)),
        Wincmd => ((F::COUNT | F::EXTRA | F::TRLBAR), ARGS_CHAR, Some(P::CharArg)),
        At | Star => {
            ((F::RANGE | F::EXTRA | F::TRLBAR | F::COUNT), ARGS_CHAR, Some(P::CharArg))
        }

        // Destination addresses.
        Copy | Move | T => ((F::RANGE | F::EXTRA | F::TRLBAR), ARGS_ADDR, Some(P::AddressArg)),

        // Autocommands.
        Autocmd => ((F::BANG | F::EXTRA | F::NOTRLCOM), ARGS_AU, Some(P::Autocmd)),
        Doautocmd | Doautoall => {
            ((F::EXTRA | F::TRLBAR | F::NOTRLCOM), ARGS_DOAU, Some(P::DoAutocmd))
        }
        Augroup => ((F::BANG | F::EXTRA | F::TRLBAR), ARGS_REST, Some(P::Rest)),

        // User command definitions.
        Command => {
            ((F::BANG | F::EXTRA | F::NOTRLCOM | F::USECTRLV), ARGS_CMD, Some(P::UserCommand))
        }
        Delcommand => ((F::EXTRA | F::TRLBAR | F::NOTRLCOM), ARGS_REST, Some(P::Rest)),
        Comclear => ((F::TRLBAR), ARGS_NO, None),

        // Literal command-or-code tails.
        Normal => (
            (F::RANGE | F::BANG | F::EXTRA | F::NOTRLCOM | F::LITERAL | F::COUNT),
            ARGS_REST,
            Some(P::Rest),
        ),
        Debug => ((F::EXTRA | F::NOTRLCOM | F::LITERAL), ARGS_REST, Some(P::Rest)),
        Lua | Python | Python3 | Py3 | Perl | Ruby | Tcl | Luado | Pydo | Py3do | Perldo
        | Rubydo | Tcldo => {
            ((F::RANGE | F::EXTRA | F::NOTRLCOM | F::LITERAL), ARGS_REST, Some(P::Rest))
        }
        Bufdo | Argdo | Windo | Tabdo | Folddoopen | Folddoclosed => {
            ((F::BANG | F::EXTRA | F::NOTRLCOM | F::LITERAL), ARGS_REST, Some(P::Rest))
        }

        // Shell and grep-like commands.
        Bang => ((F::RANGE | F::BANG | F::EXTRA | F::NOTRLCOM | F::XFILE), ARGS_REST, Some(P::Rest)),
        Grep | Grepadd | Lgrep | Lgrepadd | Make | Lmake => (
            (F::BANG | F::EXTRA | F::NOTRLCOM | F::XFILE | F::ISGREP),
            ARGS_REST,
            Some(P::Rest),
        ),
        Vimgrep | Lvimgrep | Vimgrepadd | Lvimgrepadd => {
            ((F::RANGE | F::BANG | F::EXTRA | F::NOTRLCOM | F::ISGREP), ARGS_REST, Some(P::Rest))
        }
        Helpgrep | Lhelpgrep => ((F::EXTRA | F::NOTRLCOM), ARGS_REST, Some(P::Rest)),

        // File arguments.
        Edit | Ex | Visual | View | Tabedit | Tabfind | Tabnew | Split | Vsplit | New | Vnew
        | Sview | Sfind | Find | Drop | Badd | Argedit | File | Recover | Pedit | Gui | Gvim => {
            ((F::BANG | F::EXTRA | F::TRLBAR | F::XFILE), ARGS_GLOB, Some(P::Glob))
        }
        Args | Argadd | Argdelete | Arglocal | Argglobal | Source | Runtime | Cd | Lcd | Chdir
        | Lchdir | Mkexrc | Mkvimrc | Mksession | Mkview | Mkspell | Rviminfo | Wviminfo
        | Rundo | Wundo | Loadview | Cfile | Cgetfile | Caddfile | Lfile | Lgetfile | Laddfile
        | Helptags | Luafile | Pyfile | Py3file | Rubyfile | Tclfile | Diffsplit | Diffpatch => {
            ((F::BANG | F::EXTRA | F::TRLBAR | F::XFILE), ARGS_GLOB, Some(P::Glob))
        }
        Write | Saveas | Update | Read | Wq | Exit | Xit | Wnext | WNext | Wprevious | Wqall => {
            ((F::RANGE | F::BANG | F::EXTRA | F::TRLBAR | F::XFILE), ARGS_GLOB, Some(P::Glob))
        }
        Next => (
            (F::RANGE | F::BANG | F::EXTRA | F::TRLBAR | F::XFILE | F::COUNT),
            ARGS_GLOB,
            Some(P::Glob),
        ),

        // Navigation with counts.
        NextUpper | Previous | First | Last | Rewind | Argument | Sargument | Pop | Ppop
        | SNext | Snext | Sprevious | Srewind | Sfirst | Slast => {
            ((F::RANGE | F::BANG | F::TRLBAR | F::COUNT), ARGS_NO, None)
        }
        Bnext | BNext | Bprevious | Bfirst | Blast | Brewind | Bmodified | SbNext | Sbnext
        | Sbprevious | Sbfirst | Sblast | Sbrewind | Sbmodified | Sball | Ball | Sall | All
        | Sunhide | Unhide => ((F::BANG | F::TRLBAR | F::COUNT), ARGS_NO, None),
        Cc | Cnext | CNext | Cprevious | Cnfile | CNfile | Cpfile | Cfirst | Clast | Crewind
        | Colder | Cnewer | Ll | Lnext | LNext | Lprevious | Lnfile | LNfile | Lpfile | Lfirst
        | Llast | Lrewind | Lolder | Lnewer => ((F::BANG | F::TRLBAR | F::COUNT), ARGS_NO, None),
        Cbuffer | Cgetbuffer | Caddbuffer | Lbuffer | Lgetbuffer | Laddbuffer => {
            ((F::BANG | F::TRLBAR | F::COUNT), ARGS_NO, None)
        }
        Tnext | TNext | Tprevious | Trewind | Tfirst | Tlast | Ptnext | PtNext | Ptprevious
        | Ptrewind | Ptfirst | Ptlast => ((F::BANG | F::TRLBAR | F::COUNT), ARGS_NO, None),
        Tabnext | Tabprevious | TabNext | Tabrewind | Tabfirst | Tablast | Tabclose | Tabonly => {
            ((F::BANG | F::COUNT | F::TRLBAR), ARGS_NO, None)
        }
        Undo | Goto => ((F::RANGE | F::COUNT | F::TRLBAR), ARGS_NO, None),
        Debuggreedy => ((F::COUNT | F::TRLBAR), ARGS_NO, None),
        Copen | Cwindow | Cclose | Lopen | Lwindow | Lclose => {
            ((F::COUNT | F::TRLBAR), ARGS_NO, None)
        }

        // Buffer commands with name-or-number arguments.
        Buffer | Sbuffer => {
            ((F::RANGE | F::BANG | F::EXTRA | F::TRLBAR | F::COUNT), ARGS_REST, Some(P::Rest))
        }
        Bdelete | Bunload | Bwipeout => {
            ((F::BANG | F::EXTRA | F::TRLBAR | F::COUNT), ARGS_REST, Some(P::Rest))
        }

        // Print-family commands.
        Print | PrintUpper | Number | List | Pound => {
            ((F::RANGE | F::COUNT | F::EXFLAGS | F::TRLBAR), ARGS_NO, None)
        }
        Equal => ((F::RANGE | F::EXFLAGS | F::TRLBAR), ARGS_NO, None),
        Lshift | Rshift => ((F::RANGE | F::COUNT | F::EXFLAGS | F::TRLBAR), ARGS_NO, None),
        Join => ((F::RANGE | F::BANG | F::COUNT | F::EXFLAGS | F::TRLBAR), ARGS_NO, None),
        Delete | Yank => ((F::RANGE | F::COUNT | F::EXFLAGS | F::TRLBAR), ARGS_NO, None),
        Put => ((F::RANGE | F::BANG | F::TRLBAR), ARGS_NO, None),
        Z => ((F::RANGE | F::EXTRA | F::EXFLAGS | F::TRLBAR), ARGS_REST, Some(P::Rest)),
        Open => ((F::RANGE | F::BANG | F::EXTRA), ARGS_REST, Some(P::Rest)),

        // Settings and other string-argument commands.
        Set | Setlocal | Setglobal | Setfiletype | Filetype | Behave | Colorscheme | Language
        | History | Echohl | Match | Sign | Syntax | Ownsyntax | Cscope | Scscope | Lcscope
        | Cstag | Profile | Profdel | Redir | Digraphs | Breakadd | Breakdel | Earlier | Later
        | Sleep | Scriptencoding | Winsize | Winpos | Tabmove | Registers | Display | Marks
        | Version | Mode | Syntime | Sniff | Highlight => {
            ((F::EXTRA | F::TRLBAR), ARGS_REST, Some(P::Rest))
        }
        Delmarks => ((F::BANG | F::EXTRA | F::TRLBAR), ARGS_REST, Some(P::Rest)),
        Sort | Retab => ((F::RANGE | F::BANG | F::EXTRA | F::TRLBAR), ARGS_REST, Some(P::Rest)),
        Center | Left | Right | Resize => {
            ((F::RANGE | F::EXTRA | F::TRLBAR), ARGS_REST, Some(P::Rest))
        }
        Clist | Llist => ((F::BANG | F::EXTRA | F::TRLBAR), ARGS_REST, Some(P::Rest)),
        Compiler => ((F::BANG | F::EXTRA | F::TRLBAR), ARGS_REST, Some(P::Rest)),
        Checktime => ((F::BANG | F::EXTRA | F::TRLBAR), ARGS_REST, Some(P::Rest)),
        Spellgood | Spellwrong | Spellundo => {
            ((F::BANG | F::EXTRA | F::TRLBAR | F::COUNT), ARGS_REST, Some(P::Rest))
        }
        Tag | Stag | Ptag | Tjump | Stjump | Ptjump | Tselect | Stselect | Ptselect | Ltag => {
            ((F::BANG | F::EXTRA | F::TRLBAR), ARGS_REST, Some(P::Rest))
        }
        Help | Helpfind => ((F::BANG | F::EXTRA | F::NOTRLCOM), ARGS_REST, Some(P::Rest)),
        Promptfind | Promptrepl => ((F::EXTRA | F::NOTRLCOM), ARGS_REST, Some(P::Rest)),
        Psearch | Isearch | Dsearch | Ilist | Dlist | Ijump | Djump | Isplit | Dsplit => {
            ((F::RANGE | F::BANG | F::EXTRA), ARGS_REST, Some(P::Rest))
        }
        Diffget | Diffput => ((F::RANGE | F::EXTRA | F::TRLBAR), ARGS_REST, Some(P::Rest)),

        // Bare commands with a bang.
        Close | Only | Pclose | Stop | Suspend | Redraw | Redrawstatus | Startinsert
        | Startreplace | Startgreplace | Diffoff | Diffupdate | Quit | Qall | Quitall | Wall
        | Xall | Enew | Checkpath | Cquit | Buffers | Files | Ls | Oldfiles | Spelldump
        | XUpper => ((F::BANG | F::TRLBAR), ARGS_NO, None),

        // Everything else is a bare command.
        _ => ((F::TRLBAR), ARGS_NO, None),
    }
}

static TABLE: LazyLock<Vec<CommandDefinition>> = LazyLock::new(|| {
    CmdKind::ALL
        .iter()
        .map(|&kind| {
            let (flags, arg_types, parser) = spec_for(kind);
            CommandDefinition { kind, name: kind.name(), flags, arg_types, parser }
        })
        .collect()
});

/// The descriptor of one command kind.
pub fn cmddef(kind: CmdKind) -> &'static CommandDefinition {
    &TABLE[kind.index()]
}
