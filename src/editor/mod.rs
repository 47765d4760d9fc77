// ── Editing-control façade ────────────────────────────────────────────────────
//
// Exposes a safe Rust API over the external hexedit control.  The control
// owns every byte-editing concern — buffer management, undo, search,
// encodings, its own dialogs and preferences — and the shell treats it as a
// single capability-bearing child window loaded from a DLL at startup.
// Callers interact with `HexView` (defined in `hexedit::`) through the
// public methods on this module; they never touch Win32 handles directly.

pub mod hexedit;
