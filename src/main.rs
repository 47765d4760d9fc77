// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except:
//   • `platform::win32`   – Win32 / WinAPI FFI
//   • `editor::hexedit`   – hexedit control child-window hosting
// Each unsafe block in those modules MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]

// Release builds run as a GUI application (no console window).
// Debug builds keep the console so that eprintln! timing output is visible.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod cmdline;
mod editor;
mod error;
mod layout;
mod platform;
mod session;

fn main() {
    match platform::win32::window::run() {
        // The quit sentinel's payload becomes the process exit code.
        Ok(code) => std::process::exit(code),
        Err(e) => {
            // Startup failed before or during the message loop.
            // Show a modal error dialog — the only safe output path in a GUI app.
            platform::win32::window::show_error_dialog(&e.to_string());
            std::process::exit(e.exit_code());
        }
    }
}
