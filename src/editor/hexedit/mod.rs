// ── hexedit control hosting ───────────────────────────────────────────────────
//
// This is one of exactly two modules where `unsafe` is permitted.
// Every `unsafe` block MUST carry a `// SAFETY:` comment.
//
// ── DLL ownership model ───────────────────────────────────────────────────────
//
// `HexDll` owns the single `LoadLibraryW` call for `hexedit.dll`.  It is
// stored in `WindowState` and must live longer than the control's child
// window.  `HexView` holds only the child `HWND`; it does not own the DLL.
//
// Drop order inside `WindowState` (Rust drops fields in declaration order):
//   1. `hex` — a struct with a stale HWND by teardown time (WM_NCDESTROY
//      fires after Windows has destroyed every child); no-op drop
//   2. `hex_dll` — `FreeLibrary` called here, after all windows are gone ✓

#![allow(unsafe_code)]

pub(crate) mod messages;

use messages::{
    HEM_CANCLOSE, HEM_LOADPREFS, HEM_OPENFILE, HEM_REFRESHTITLE, HEM_SAVEPREFS,
    HEM_SELECTLANGUAGE, HEM_SETCENTERCARET, HEM_SETINSTCOUNT, HEM_SETMAINWND,
    HEM_SETSAVEPREFS, HEM_SETSEL, HEM_TRANSLATEACCEL,
};

use windows::{
    core::PCWSTR,
    Win32::{
        Foundation::{HINSTANCE, HMODULE, HWND, LPARAM, WPARAM},
        System::LibraryLoader::{FreeLibrary, LoadLibraryW},
        UI::{
            Input::KeyboardAndMouse::SetFocus,
            WindowsAndMessaging::{
                CreateWindowExW, SendMessageW, HMENU, MSG, WM_COMMAND, WM_INITMENUPOPUP,
                WS_CHILD, WS_EX_CLIENTEDGE, WS_HSCROLL, WS_TABSTOP, WS_VISIBLE, WS_VSCROLL,
            },
        },
    },
};

use crate::error::{FerrhexError, Result};

// ── DLL identity ──────────────────────────────────────────────────────────────

pub(crate) const DLL_NAME: &str = "hexedit.dll";
const CLASS_NAME: &str = "hexedit";

// ── HexDll ────────────────────────────────────────────────────────────────────

/// RAII handle to the loaded `hexedit.dll`.
///
/// Loading the DLL causes it to register the `"hexedit"` window class.
/// `FreeLibrary` is called on `Drop`, which must happen after the control's
/// child window has been destroyed.
pub(crate) struct HexDll(HMODULE);

impl HexDll {
    /// Load `hexedit.dll` from the application directory.
    ///
    /// This also registers the `"hexedit"` Win32 window class, making it
    /// available for `HexView::create`.  Failure is fatal to startup.
    pub(crate) fn load() -> Result<Self> {
        let path: Vec<u16> = DLL_NAME.encode_utf16().chain(std::iter::once(0)).collect();
        // SAFETY: path is a valid null-terminated UTF-16 string.
        // LoadLibraryW searches the application directory first on Win10/11.
        let dll = unsafe { LoadLibraryW(PCWSTR(path.as_ptr())) }.map_err(|e| {
            FerrhexError::EditorLoad {
                dll: DLL_NAME,
                code: e.code().0 as u32,
            }
        })?;
        Ok(Self(dll))
    }
}

impl Drop for HexDll {
    fn drop(&mut self) {
        // SAFETY: self.0 was returned by a successful LoadLibraryW and has not
        // been freed since.  The hexedit child HWND is already destroyed
        // (Windows destroys child windows before WM_NCDESTROY fires on the
        // parent, and WindowState field order ensures hex drops before hex_dll).
        unsafe {
            let _ = FreeLibrary(self.0);
        }
    }
}

// ── HexView ───────────────────────────────────────────────────────────────────

/// The hosted hexedit editor child window.
///
/// Does **not** own the `hexedit.dll` module handle — that is owned by
/// `HexDll` in `WindowState`.  The child `HWND` is destroyed automatically
/// by Windows when the parent is destroyed; no explicit cleanup is needed.
pub(crate) struct HexView {
    hwnd: HWND,
}

impl HexView {
    /// Create the hexedit child window inside `hwnd_parent`.
    ///
    /// `_dll` proves that `hexedit.dll` is loaded and the `"hexedit"` class
    /// is registered.  The control sizes itself to a placeholder rectangle;
    /// the first WM_SIZE pass lays it out properly.
    pub(crate) fn create(
        hwnd_parent: HWND,
        hinstance: HINSTANCE,
        _dll: &HexDll,
    ) -> Result<Self> {
        let class_wide: Vec<u16> =
            CLASS_NAME.encode_utf16().chain(std::iter::once(0)).collect();

        // SAFETY: class_wide is null-terminated UTF-16 for the class registered
        // by hexedit.dll (_dll proves the DLL is loaded).  hwnd_parent and
        // hinstance are valid Win32 handles from WM_CREATE.
        let hwnd = unsafe {
            CreateWindowExW(
                WS_EX_CLIENTEDGE,
                PCWSTR(class_wide.as_ptr()),
                PCWSTR::null(),
                WS_TABSTOP | WS_CHILD | WS_VISIBLE | WS_VSCROLL | WS_HSCROLL,
                10, 10, 100, 100,
                hwnd_parent,
                HMENU::default(),
                hinstance,
                None,
            )
        }
        .map_err(|e| FerrhexError::EditorCreate {
            code: e.code().0 as u32,
        })?;

        Ok(Self { hwnd })
    }

    /// The hexedit child window handle.  Valid until the parent is destroyed.
    pub(crate) fn hwnd(&self) -> HWND {
        self.hwnd
    }

    // ── Shell wiring ──────────────────────────────────────────────────────────

    /// Hand the control its top-level window for retitling and dialogs.
    pub(crate) fn set_main_window(&self, hwnd_main: HWND) {
        // SAFETY: hwnd valid; the control stores the handle, it does not
        // dereference through LPARAM.
        unsafe {
            let _ = SendMessageW(
                self.hwnd,
                HEM_SETMAINWND,
                WPARAM(0),
                LPARAM(hwnd_main.0 as isize),
            );
        }
    }

    /// Tell the control how many shell instances were already running.
    pub(crate) fn set_instance_count(&self, count: u32) {
        // SAFETY: hwnd valid; scalar message.
        unsafe {
            let _ = SendMessageW(self.hwnd, HEM_SETINSTCOUNT, WPARAM(count as usize), LPARAM(0));
        }
    }

    // ── Preferences ───────────────────────────────────────────────────────────

    /// Whether the control persists its preferences on exit.
    pub(crate) fn set_save_on_exit(&self, enabled: bool) {
        // SAFETY: hwnd valid; scalar message.
        unsafe {
            let _ = SendMessageW(self.hwnd, HEM_SETSAVEPREFS, WPARAM(enabled as usize), LPARAM(0));
        }
    }

    /// Keep the caret centered while scrolling.
    pub(crate) fn set_center_caret(&self, enabled: bool) {
        // SAFETY: hwnd valid; scalar message.
        unsafe {
            let _ = SendMessageW(self.hwnd, HEM_SETCENTERCARET, WPARAM(enabled as usize), LPARAM(0));
        }
    }

    /// Load the control's persisted preferences (colors, fonts, view mode).
    pub(crate) fn load_preferences(&self) {
        // SAFETY: hwnd valid; no parameters.
        unsafe {
            let _ = SendMessageW(self.hwnd, HEM_LOADPREFS, WPARAM(0), LPARAM(0));
        }
    }

    /// Save the control's preferences, honoring its save-on-exit flag.
    pub(crate) fn save_preferences(&self) {
        // SAFETY: hwnd valid; no parameters.
        unsafe {
            let _ = SendMessageW(self.hwnd, HEM_SAVEPREFS, WPARAM(0), LPARAM(0));
        }
    }

    /// Switch the control's language resources to `langid`.
    pub(crate) fn select_language(&self, langid: u16) {
        // SAFETY: hwnd valid; scalar message.
        unsafe {
            let _ = SendMessageW(self.hwnd, HEM_SELECTLANGUAGE, WPARAM(langid as usize), LPARAM(0));
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    /// Ask the control to recompose the main-window title.
    pub(crate) fn refresh_title(&self) {
        // SAFETY: hwnd valid; no parameters.
        unsafe {
            let _ = SendMessageW(self.hwnd, HEM_REFRESHTITLE, WPARAM(0), LPARAM(0));
        }
    }

    /// Close-confirmation contract: `false` means the user vetoed the close
    /// (e.g. declined the unsaved-changes prompt).
    pub(crate) fn confirm_close(&self) -> bool {
        // SAFETY: hwnd valid; the control may pump a modal dialog inside this
        // SendMessageW, which is fine on the UI thread.
        unsafe { SendMessageW(self.hwnd, HEM_CANCLOSE, WPARAM(0), LPARAM(0)).0 != 0 }
    }

    /// Offer a queued message to the control's accelerator table.
    ///
    /// Returns `true` when the control consumed the message; the caller must
    /// then skip the translate/dispatch sequence.
    pub(crate) fn translate_accelerator(&self, msg: &MSG) -> bool {
        // SAFETY: hwnd valid; msg outlives the synchronous SendMessageW call
        // and the control only reads through the pointer.
        unsafe {
            SendMessageW(
                self.hwnd,
                HEM_TRANSLATEACCEL,
                WPARAM(0),
                LPARAM(msg as *const MSG as isize),
            )
            .0 != 0
        }
    }

    // ── Commands ──────────────────────────────────────────────────────────────

    /// Forward a menu/toolbar command id to the control.
    pub(crate) fn dispatch_command(&self, id: u16) {
        // SAFETY: hwnd valid; the control switches on the low word only.
        unsafe {
            let _ = SendMessageW(self.hwnd, WM_COMMAND, WPARAM(id as usize), LPARAM(0));
        }
    }

    /// Forward a menu-popup-open notification so the control can set check
    /// marks and gray out items.
    pub(crate) fn menu_popup(&self, wparam: WPARAM, lparam: LPARAM) {
        // SAFETY: hwnd valid; wparam/lparam are forwarded verbatim from the
        // shell's own WM_INITMENUPOPUP and stay valid for this synchronous call.
        unsafe {
            let _ = SendMessageW(self.hwnd, WM_INITMENUPOPUP, wparam, lparam);
        }
    }

    /// Move keyboard focus onto the editing surface.
    pub(crate) fn focus(&self) {
        // SAFETY: hwnd is a valid child window on the calling thread.
        // The previous-focus return value is intentionally unused.
        unsafe {
            let _ = SetFocus(self.hwnd);
        }
    }

    // ── Document operations ───────────────────────────────────────────────────

    /// Open `path` in the control.
    pub(crate) fn open_file(&self, path: &str) {
        let wide: Vec<u16> = path.encode_utf16().chain(std::iter::once(0)).collect();
        // SAFETY: wide is a null-terminated UTF-16 string that outlives the
        // synchronous SendMessageW call.
        unsafe {
            let _ = SendMessageW(
                self.hwnd,
                HEM_OPENFILE,
                WPARAM(0),
                LPARAM(wide.as_ptr() as isize),
            );
        }
    }

    /// Select the inclusive byte range `start..=end`.
    pub(crate) fn set_selection(&self, start: u64, end: u64) {
        // SAFETY: hwnd valid; offsets travel as scalars, the control clamps
        // out-of-range values itself.
        unsafe {
            let _ = SendMessageW(
                self.hwnd,
                HEM_SETSEL,
                WPARAM(start as usize),
                LPARAM(end as isize),
            );
        }
    }
}
