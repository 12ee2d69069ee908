//! The autocommand event table.
//!
//! Event names are matched case-insensitively. A few historical aliases
//! (`BufCreate`, `BufRead`, `BufWrite`) resolve to the same tag as their
//! canonical name; [`au_event_name`] always reports the canonical one.

use phf::phf_map;
use viml_ast::AuEvent;

/// Canonical event names, indexed by event tag.
pub static AU_EVENT_NAMES: &[&str] = &[
    "BufAdd",
    "BufDelete",
    "BufEnter",
    "BufFilePost",
    "BufFilePre",
    "BufHidden",
    "BufLeave",
    "BufNew",
    "BufNewFile",
    "BufReadCmd",
    "BufReadPost",
    "BufReadPre",
    "BufUnload",
    "BufWinEnter",
    "BufWinLeave",
    "BufWipeout",
    "BufWriteCmd",
    "BufWritePost",
    "BufWritePre",
    "CmdwinEnter",
    "CmdwinLeave",
    "ColorScheme",
    "CompleteDone",
    "CursorHold",
    "CursorHoldI",
    "CursorMoved",
    "CursorMovedI",
    "EncodingChanged",
    "FileAppendCmd",
    "FileAppendPost",
    "FileAppendPre",
    "FileChangedRO",
    "FileChangedShell",
    "FileChangedShellPost",
    "FileReadCmd",
    "FileReadPost",
    "FileReadPre",
    "FileType",
    "FileWriteCmd",
    "FileWritePost",
    "FileWritePre",
    "FilterReadPost",
    "FilterReadPre",
    "FilterWritePost",
    "FilterWritePre",
    "FocusGained",
    "FocusLost",
    "FuncUndefined",
    "GUIEnter",
    "GUIFailed",
    "InsertChange",
    "InsertCharPre",
    "InsertEnter",
    "InsertLeave",
    "MenuPopup",
    "QuickFixCmdPost",
    "QuickFixCmdPre",
    "QuitPre",
    "RemoteReply",
    "SessionLoadPost",
    "ShellCmdPost",
    "ShellFilterPost",
    "SourceCmd",
    "SourcePre",
    "SpellFileMissing",
    "StdinReadPost",
    "StdinReadPre",
    "SwapExists",
    "Syntax",
    "TabEnter",
    "TabLeave",
    "TermChanged",
    "TermResponse",
    "TextChanged",
    "TextChangedI",
    "User",
    "VimEnter",
    "VimLeave",
    "VimLeavePre",
    "VimResized",
    "WinEnter",
    "WinLeave",
];

static AU_EVENTS: phf::Map<&'static str, u16> = phf_map! {
    "bufadd" => 0,
    "bufcreate" => 0,
    "bufdelete" => 1,
    "bufenter" => 2,
    "buffilepost" => 3,
    "buffilepre" => 4,
    "bufhidden" => 5,
    "bufleave" => 6,
    "bufnew" => 7,
    "bufnewfile" => 8,
    "bufreadcmd" => 9,
    "bufread" => 10,
    "bufreadpost" => 10,
    "bufreadpre" => 11,
    "bufunload" => 12,
    "bufwinenter" => 13,
    "bufwinleave" => 14,
    "bufwipeout" => 15,
    "bufwritecmd" => 16,
    "bufwritepost" => 17,
    "bufwrite" => 18,
    "bufwritepre" => 18,
    "cmdwinenter" => 19,
    "cmdwinleave" => 20,
    "colorscheme" => 21,
    "completedone" => 22,
    "cursorhold" => 23,
    "cursorholdi" => 24,
    "cursormoved" => 25,
    "cursormovedi" => 26,
    "encodingchanged" => 27,
    "fileappendcmd" => 28,
    "fileappendpost" => 29,
    "fileappendpre" => 30,
    "filechangedro" => 31,
    "filechangedshell" => 32,
    "filechangedshellpost" => 33,
    "filereadcmd" => 34,
    "filereadpost" => 35,
    "filereadpre" => 36,
    "filetype" => 37,
    "filewritecmd" => 38,
    "filewritepost" => 39,
    "filewritepre" => 40,
    "filterreadpost" => 41,
    "filterreadpre" => 42,
    "filterwritepost" => 43,
    "filterwritepre" => 44,
    "focusgained" => 45,
    "focuslost" => 46,
    "funcundefined" => 47,
    "guienter" => 48,
    "guifailed" => 49,
    "insertchange" => 50,
    "insertcharpre" => 51,
    "insertenter" => 52,
    "insertleave" => 53,
    "menupopup" => 54,
    "quickfixcmdpost" => 55,
    "quickfixcmdpre" => 56,
    "quitpre" => 57,
    "remotereply" => 58,
    "sessionloadpost" => 59,
    "shellcmdpost" => 60,
    "shellfilterpost" => 61,
    "sourcecmd" => 62,
    "sourcepre" => 63,
    "spellfilemissing" => 64,
    "stdinreadpost" => 65,
    "stdinreadpre" => 66,
    "swapexists" => 67,
    "syntax" => 68,
    "tabenter" => 69,
    "tableave" => 70,
    "termchanged" => 71,
    "termresponse" => 72,
    "textchanged" => 73,
    "textchangedi" => 74,
    "user" => 75,
    "vimenter" => 76,
    "vimleave" => 77,
    "vimleavepre" => 78,
    "vimresized" => 79,
    "winenter" => 80,
    "winleave" => 81,
};

/// Looks an event name up, case-insensitively.
pub fn au_event_by_name(name: &str) -> Option<AuEvent> {
    AU_EVENTS.get(name.to_ascii_lowercase().as_str()).map(|&tag| AuEvent(tag))
}

/// Canonical name of an event tag.
pub fn au_event_name(event: AuEvent) -> &'static str {
    AU_EVENT_NAMES.get(event.0 as usize).copied().unwrap_or("?")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_case_insensitive() {
        assert_eq!(au_event_by_name("bufenter"), Some(AuEvent(2)));
        assert_eq!(au_event_by_name("BufEnter"), Some(AuEvent(2)));
        assert_eq!(au_event_by_name("BUFENTER"), Some(AuEvent(2)));
        assert_eq!(au_event_by_name("NoSuchEvent"), None);
    }

    #[test]
    fn test_aliases_share_tags() {
        assert_eq!(au_event_by_name("BufCreate"), au_event_by_name("BufAdd"));
        assert_eq!(au_event_by_name("BufRead"), au_event_by_name("BufReadPost"));
        assert_eq!(au_event_by_name("BufWrite"), au_event_by_name("BufWritePre"));
    }

    #[test]
    fn test_names_round_trip() {
        for (i, name) in AU_EVENT_NAMES.iter().enumerate() {
            let event = au_event_by_name(name).unwrap();
            assert_eq!(event.0 as usize, i);
            assert_eq!(au_event_name(event), *name);
        }
    }
}
