// ── Toolbar ───────────────────────────────────────────────────────────────────
//
// Creates the main-window toolbar from the common-controls standard bitmap
// strip and measures its height for layout.  Button command ids are the same
// ids the menu uses; the hexedit control interprets all of them.
//
// This is inside `platform::win32` so `unsafe` is permitted per crate policy.

#![allow(unsafe_code)]

use windows::{
    core::{w, PCWSTR},
    Win32::{
        Foundation::{HINSTANCE, HWND, LPARAM, RECT, WPARAM},
        UI::{
            Controls::{TBADDBITMAP, TBBUTTON},
            WindowsAndMessaging::{
                CreateWindowExW, SendMessageW, HMENU, WINDOW_EX_STYLE, WINDOW_STYLE, WS_CHILD,
                WS_VISIBLE,
            },
        },
    },
};

use super::window::{
    IDM_EDIT_COPY, IDM_EDIT_CUT, IDM_EDIT_FIND, IDM_EDIT_PASTE, IDM_EDIT_REPLACE, IDM_EDIT_UNDO,
    IDM_FILE_OPEN, IDM_FILE_SAVE, IDM_HELP_ABOUT,
};
use crate::{
    error::{FerrhexError, Result},
    layout,
};

// ── Toolbar constants (CommCtrl.h) ────────────────────────────────────────────
//
// All TB_* values are sent via SendMessageW(hwnd_toolbar, TB_*, wparam, lparam).

/// Toolbar window class registered by `InitCommonControlsEx`.
const TOOLBAR_CLASS: PCWSTR = w!("ToolbarWindow32");

/// Struct-size handshake; must precede every other toolbar message.
const TB_BUTTONSTRUCTSIZE: u32 = 0x0400 + 30;
/// Register a button bitmap strip.  LPARAM = *const TBADDBITMAP.
const TB_ADDBITMAP: u32 = 0x0400 + 19;
/// Append buttons.  WPARAM = count; LPARAM = *const [TBBUTTON].
const TB_ADDBUTTONSW: u32 = 0x0400 + 68;
/// Return the number of buttons, separators included.
const TB_BUTTONCOUNT: u32 = 0x0400 + 24;
/// Bounding rectangle of a button by index.  LPARAM = *mut RECT.
const TB_GETITEMRECT: u32 = 0x0400 + 29;

/// Flat buttons, tooltips, and wrapping into extra rows on narrow windows.
const TBSTYLE_FLAT: u32 = 0x0800;
const TBSTYLE_TOOLTIPS: u32 = 0x0100;
const TBSTYLE_WRAPABLE: u32 = 0x0200;

const TBSTATE_ENABLED: u8 = 0x04;
const BTNS_BUTTON: u8 = 0x00;
const BTNS_SEP: u8 = 0x01;

/// Index of the standard small-color bitmap strip built into comctl32.
const IDB_STD_SMALL_COLOR: usize = 0;

// Image indices within the standard strip.
const STD_CUT: i32 = 0;
const STD_COPY: i32 = 1;
const STD_PASTE: i32 = 2;
const STD_UNDO: i32 = 3;
const STD_FILEOPEN: i32 = 7;
const STD_FILESAVE: i32 = 8;
const STD_HELP: i32 = 11;
const STD_FIND: i32 = 12;
const STD_REPLACE: i32 = 13;

// ── Construction ──────────────────────────────────────────────────────────────

fn std_button(bitmap: i32, command: usize) -> TBBUTTON {
    TBBUTTON {
        iBitmap: bitmap,
        idCommand: command as i32,
        fsState: TBSTATE_ENABLED,
        fsStyle: BTNS_BUTTON,
        ..Default::default()
    }
}

fn separator() -> TBBUTTON {
    TBBUTTON {
        fsStyle: BTNS_SEP,
        ..Default::default()
    }
}

/// Create the toolbar as a child of `parent`.
///
/// The window starts with zero size; the WM_SIZE pass stretches it to the
/// client width and fixes its height from the wrapped button rows.
pub(crate) fn create(parent: HWND, hinstance: HINSTANCE) -> Result<HWND> {
    // SAFETY: the toolbar class comes from the common-controls registration
    // performed at startup; parent and hinstance are valid handles from
    // WM_CREATE.
    let hwnd = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            TOOLBAR_CLASS,
            PCWSTR::null(),
            WS_CHILD | WS_VISIBLE | WINDOW_STYLE(TBSTYLE_FLAT | TBSTYLE_TOOLTIPS | TBSTYLE_WRAPABLE),
            0, 0, 0, 0,
            parent,
            HMENU::default(),
            hinstance,
            None,
        )
    }
    .map_err(|e| FerrhexError::Win32 {
        function: "CreateWindowExW (toolbar)",
        code: e.code().0 as u32,
    })?;

    // SAFETY: hwnd is a valid toolbar; the struct-size handshake takes the
    // compile-time size of TBBUTTON and must precede every other TB_* message.
    unsafe {
        let _ = SendMessageW(
            hwnd,
            TB_BUTTONSTRUCTSIZE,
            WPARAM(std::mem::size_of::<TBBUTTON>()),
            LPARAM(0),
        );
    }

    // hInst = HINST_COMMCTRL (CommCtrl.h: (HINSTANCE)-1) selects the standard
    // strip that ships inside comctl32 itself.
    let bitmaps = TBADDBITMAP {
        hInst: HINSTANCE(-1isize as _),
        nID: IDB_STD_SMALL_COLOR,
    };
    // SAFETY: bitmaps outlives the synchronous SendMessageW call.
    unsafe {
        let _ = SendMessageW(
            hwnd,
            TB_ADDBITMAP,
            WPARAM(0),
            LPARAM(&bitmaps as *const TBADDBITMAP as isize),
        );
    }

    let buttons = [
        std_button(STD_FILEOPEN, IDM_FILE_OPEN),
        std_button(STD_FILESAVE, IDM_FILE_SAVE),
        separator(),
        std_button(STD_CUT, IDM_EDIT_CUT),
        std_button(STD_COPY, IDM_EDIT_COPY),
        std_button(STD_PASTE, IDM_EDIT_PASTE),
        separator(),
        std_button(STD_UNDO, IDM_EDIT_UNDO),
        separator(),
        std_button(STD_FIND, IDM_EDIT_FIND),
        std_button(STD_REPLACE, IDM_EDIT_REPLACE),
        separator(),
        std_button(STD_HELP, IDM_HELP_ABOUT),
    ];
    // SAFETY: buttons outlives the call; WPARAM matches the array length.
    unsafe {
        let _ = SendMessageW(
            hwnd,
            TB_ADDBUTTONSW,
            WPARAM(buttons.len()),
            LPARAM(buttons.as_ptr() as isize),
        );
    }

    Ok(hwnd)
}

// ── Measurement ───────────────────────────────────────────────────────────────

/// Current toolbar height for layout: the bottom of the last button row plus
/// padding, or zero for a buttonless toolbar.
///
/// Call after the toolbar has been stretched to the client width so that the
/// button rows have wrapped.
pub(crate) fn height(toolbar: HWND) -> i32 {
    // SAFETY: toolbar is a valid child window; read-only query.
    let count = unsafe { SendMessageW(toolbar, TB_BUTTONCOUNT, WPARAM(0), LPARAM(0)).0 };
    if count <= 0 {
        return layout::toolbar_height(None);
    }

    let mut rect = RECT::default();
    // SAFETY: rect outlives the call; count - 1 is a valid button index.
    unsafe {
        let _ = SendMessageW(
            toolbar,
            TB_GETITEMRECT,
            WPARAM((count - 1) as usize),
            LPARAM(&mut rect as *mut RECT as isize),
        );
    }
    layout::toolbar_height(Some(rect.bottom))
}
