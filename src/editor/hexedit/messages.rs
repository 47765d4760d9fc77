// ── hexedit control message constants ─────────────────────────────────────────
//
// Source of truth: hexedit.h, shipped alongside the control DLL.
// Only the subset the shell sends is listed here.
// All HEM_* values are sent via SendMessageW(hwnd_hex, HEM_*, wparam, lparam).

/// First control-defined message (`WM_USER` + 0x0100).
const HEM_BASE: u32 = 0x0400 + 0x0100;

// ── Shell wiring ──────────────────────────────────────────────────────────────

/// Hand the control the top-level window it lives in.  LPARAM = HWND.
/// The control uses the back-reference to retitle the window and to own
/// its modal dialogs.
pub(super) const HEM_SETMAINWND: u32 = HEM_BASE;
/// Number of shell instances already running at startup.  WPARAM = count.
pub(super) const HEM_SETINSTCOUNT: u32 = HEM_BASE + 1;

// ── Preference flags ──────────────────────────────────────────────────────────

/// Persist preferences on exit?  WPARAM = 0 or 1.
pub(super) const HEM_SETSAVEPREFS: u32 = HEM_BASE + 2;
/// Keep the caret centered while scrolling.  WPARAM = 0 or 1.
pub(super) const HEM_SETCENTERCARET: u32 = HEM_BASE + 3;
/// Load the control's persisted preferences.
pub(super) const HEM_LOADPREFS: u32 = HEM_BASE + 4;
/// Save the control's preferences, honoring the save-on-exit flag.
pub(super) const HEM_SAVEPREFS: u32 = HEM_BASE + 5;
/// Switch the control's language resources.  WPARAM = LANGID.
pub(super) const HEM_SELECTLANGUAGE: u32 = HEM_BASE + 6;

// ── Lifecycle ─────────────────────────────────────────────────────────────────

/// Recompose the main-window title from the current document name.
pub(super) const HEM_REFRESHTITLE: u32 = HEM_BASE + 7;
/// Ask permission to close (unsaved-changes prompt).  Returns non-zero to
/// allow the close; zero vetoes it.
pub(super) const HEM_CANCLOSE: u32 = HEM_BASE + 8;
/// Offer a queued message to the control's accelerator table.
/// LPARAM = *const MSG; returns non-zero when the message was consumed.
pub(super) const HEM_TRANSLATEACCEL: u32 = HEM_BASE + 9;

// ── Document operations ───────────────────────────────────────────────────────

/// Open a file.  LPARAM = null-terminated UTF-16 path.
pub(super) const HEM_OPENFILE: u32 = HEM_BASE + 10;
/// Select a byte range.  WPARAM = start offset, LPARAM = end offset (inclusive).
pub(super) const HEM_SETSEL: u32 = HEM_BASE + 11;
