// ── Main window ───────────────────────────────────────────────────────────────
//
// Responsibilities in this file (unsafe confined here):
//   • Register the main window class and create the top-level window.
//   • Host the hexedit control, toolbar and status bar as children.
//   • Run the Win32 message loop with the control's accelerator hook.
//   • Dispatch WM_CREATE, WM_SIZE, WM_COMMAND, WM_SETFOCUS,
//     WM_INITMENUPOPUP, WM_CLOSE, WM_DESTROY, WM_NCDESTROY.
//   • Apply persisted window placement at startup and capture it at exit.
//   • Expose a safe error-dialog helper for use by main().
//
// All shell state lives in one `WindowState` behind the window's
// GWLP_USERDATA slot — installed in WM_CREATE, reclaimed in WM_NCDESTROY
// after Windows has destroyed every child window.

#![allow(unsafe_code)]

use windows::{
    core::{w, PCWSTR},
    Win32::{
        Foundation::{GetLastError, BOOL, HINSTANCE, HWND, LPARAM, LRESULT, RECT, WPARAM},
        Globalization::GetThreadLocale,
        Graphics::Gdi::{GetStockObject, HBRUSH, WHITE_BRUSH},
        System::{
            Environment::GetCommandLineW,
            LibraryLoader::GetModuleHandleW,
            Ole::{OleInitialize, OleUninitialize},
        },
        UI::{
            Controls::{InitCommonControlsEx, ICC_BAR_CLASSES, INITCOMMONCONTROLSEX},
            WindowsAndMessaging::{
                AppendMenuW, CreateMenu, CreateWindowExW, DefWindowProcW, DispatchMessageW,
                EnumWindows, GetClassNameW, GetMessageW, GetWindowLongPtrW, GetWindowPlacement,
                GetWindowRect, LoadCursorW, LoadIconW, MessageBoxW, PostQuitMessage,
                RegisterClassExW, SendMessageW, SetMenu, SetWindowLongPtrW, SetWindowPlacement,
                SetWindowPos, ShowWindow, TranslateMessage, UpdateWindow, CREATESTRUCTW,
                CS_HREDRAW, CS_VREDRAW, CW_USEDEFAULT, GWLP_USERDATA, HMENU, IDC_ARROW,
                IDI_APPLICATION, MB_ICONERROR, MB_OK, MF_POPUP, MF_SEPARATOR, MF_STRING, MSG,
                SHOW_WINDOW_CMD, SWP_NOZORDER, SW_SHOWDEFAULT, WINDOWPLACEMENT, WINDOW_EX_STYLE,
                WINDOW_STYLE, WM_CLOSE, WM_COMMAND, WM_CREATE, WM_DESTROY, WM_INITMENUPOPUP,
                WM_NCDESTROY, WM_SETFOCUS, WM_SIZE, WNDCLASSEXW, WS_CHILD, WS_CLIPCHILDREN,
                WS_OVERLAPPEDWINDOW, WS_VISIBLE,
            },
        },
    },
};

use super::toolbar;
use crate::{
    cmdline,
    editor::hexedit::{HexDll, HexView},
    error::{FerrhexError, Result},
    layout,
    session::{PlacementStore, SavedPlacement},
};

// ── Window identity ───────────────────────────────────────────────────────────

/// Atom name used to register (and later count) the main window class.
const CLASS_NAME: PCWSTR = w!("FerrhexMainWindow");

/// The same class name for `GetClassNameW` comparisons during instance counting.
const CLASS_NAME_STR: &str = "FerrhexMainWindow";

/// Title bar text until the control retitles the window.
const APP_TITLE: PCWSTR = w!("Ferrhex");

// ── Command IDs ───────────────────────────────────────────────────────────────
//
// Only IDM_FILE_EXIT is handled by the shell; every other id belongs to the
// hexedit control's command space and is forwarded verbatim.

pub(crate) const IDM_FILE_OPEN: usize = 0x0101;
pub(crate) const IDM_FILE_SAVE: usize = 0x0102;
pub(crate) const IDM_FILE_SAVE_AS: usize = 0x0103;
pub(crate) const IDM_FILE_EXIT: usize = 0x0110;
pub(crate) const IDM_EDIT_UNDO: usize = 0x0201;
pub(crate) const IDM_EDIT_REDO: usize = 0x0202;
pub(crate) const IDM_EDIT_CUT: usize = 0x0203;
pub(crate) const IDM_EDIT_COPY: usize = 0x0204;
pub(crate) const IDM_EDIT_PASTE: usize = 0x0205;
pub(crate) const IDM_EDIT_DELETE: usize = 0x0206;
pub(crate) const IDM_EDIT_SELECT_ALL: usize = 0x0207;
pub(crate) const IDM_EDIT_FIND: usize = 0x0210;
pub(crate) const IDM_EDIT_REPLACE: usize = 0x0211;
pub(crate) const IDM_EDIT_GOTO: usize = 0x0212;
pub(crate) const IDM_VIEW_SETTINGS: usize = 0x0301;
pub(crate) const IDM_HELP_ABOUT: usize = 0x0401;

// ── Status-bar constants (CommCtrl.h) ─────────────────────────────────────────

/// Status-bar window class registered by `InitCommonControlsEx`.
const STATUS_CLASS: PCWSTR = w!("msctls_statusbar32");

/// Divide the status bar into parts.  WPARAM = count; LPARAM = right-edge array.
const SB_SETPARTS: u32 = 0x0400 + 4;
/// Size grip in the bottom-right corner.
const SBARS_SIZEGRIP: u32 = 0x0100;
/// Dock the control to the bottom of the parent's client area.
const CCS_BOTTOM: u32 = 0x0003;

// ── Per-window state ──────────────────────────────────────────────────────────

/// Everything the shell owns for the lifetime of the main window.
///
/// Stored behind the window's GWLP_USERDATA slot from WM_CREATE until
/// WM_NCDESTROY.  Field order matters on drop: `hex` holds only a stale child
/// HWND by teardown time, while `hex_dll` must unload last, after Windows has
/// destroyed every window of the control's class.
struct WindowState {
    hex: HexView,
    toolbar: HWND,
    status_bar: HWND,
    store: PlacementStore,
    hex_dll: HexDll,
}

/// Creation-time inputs carried into WM_CREATE via `CREATESTRUCTW`.
struct WindowSetup {
    hinstance: HINSTANCE,
    hex_dll: Option<HexDll>,
    store: Option<PlacementStore>,
    /// Filled by WM_CREATE when it aborts, so `create_window` can report the
    /// real failure instead of a generic one.
    create_error: Option<FerrhexError>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the editing component, create the main window, and drive the message
/// loop until the user closes the application.
///
/// Returns the quit sentinel's payload, which becomes the process exit code.
pub(crate) fn run() -> Result<i32> {
    // Startup benchmark harness — only compiled in debug builds so the
    // variable is never unused in release mode.
    #[cfg(debug_assertions)]
    let t0 = std::time::Instant::now();

    // SAFETY: called once, on the UI thread, before any window exists; the
    // control uses OLE drag-and-drop.  Balanced by OleUninitialize after the
    // message loop.  A failure only degrades drag-and-drop, so it is ignored.
    unsafe {
        let _ = OleInitialize(None);
    }

    init_common_controls();

    // SAFETY: GetCommandLineW returns the process command line, valid for the
    // process lifetime.
    let raw = unsafe { GetCommandLineW().to_string() }.unwrap_or_default();
    let args = cmdline::parse(cmdline::args_after_program(&raw));

    // The editing component is mandatory; without it there is no application.
    let hex_dll = HexDll::load()?;

    // SAFETY: GetModuleHandleW(None) returns the .exe's own HMODULE, which is
    // always valid for the process lifetime and never fails in practice.
    let hmodule = unsafe { GetModuleHandleW(None) }.map_err(FerrhexError::from)?;
    let hinstance = HINSTANCE(hmodule.0);

    register_class(hinstance)?;

    // Counted before our own window exists, so this is the number of prior
    // instances; the control uses it to cascade its dialogs.
    let instance_count = count_instances();

    let store = PlacementStore::load();
    let saved = store.placement().cloned();

    let mut setup = WindowSetup {
        hinstance,
        hex_dll: Some(hex_dll),
        store: Some(store),
        create_error: None,
    };
    let hwnd = create_window(hinstance, &mut setup)?;

    // Late façade initialisation: the control wants the instance count in
    // hand before it loads its own preferences.
    if let Some(state) = state_mut(hwnd) {
        state.hex.set_instance_count(instance_count);
        state.hex.load_preferences();
    }

    apply_placement(hwnd, saved.as_ref());

    // Startup milestone — window is now visible on screen.
    #[cfg(debug_assertions)]
    eprintln!(
        "[ferrhex] window visible in {:.1} ms",
        t0.elapsed().as_secs_f64() * 1000.0
    );

    // Command line not empty: open a file (and maybe a selection) on startup.
    if !args.path.is_empty() {
        if let Some(state) = state_mut(hwnd) {
            state.hex.open_file(&args.path);
            if let Some((start, end)) = args.selection() {
                state.hex.set_selection(start, end);
            }
        }
    }

    let code = message_loop(hwnd)?;

    // SAFETY: balanced with the OleInitialize call at the top of run().
    unsafe { OleUninitialize() };

    Ok(code)
}

/// Show a modal error dialog with the given message.
///
/// Safe to call from any context; performs the UTF-16 conversion internally.
/// Used by `main()` when `run()` returns an error.
pub(crate) fn show_error_dialog(message: &str) {
    let msg_wide: Vec<u16> = message.encode_utf16().chain(std::iter::once(0)).collect();

    // SAFETY: msg_wide is a valid null-terminated UTF-16 string that remains
    // allocated for the duration of the MessageBoxW call.
    // HWND::default() (null) means the dialog has no owner window.
    // Return value (button pressed) is intentionally unused for an error dialog.
    unsafe {
        let _ = MessageBoxW(
            HWND::default(),
            PCWSTR(msg_wide.as_ptr()),
            w!("Ferrhex — Fatal Error"),
            MB_OK | MB_ICONERROR,
        );
    }
}

// ── Startup helpers ───────────────────────────────────────────────────────────

/// Register the toolbar and status-bar window classes.
fn init_common_controls() {
    let icc = INITCOMMONCONTROLSEX {
        dwSize: std::mem::size_of::<INITCOMMONCONTROLSEX>() as u32,
        dwICC: ICC_BAR_CLASSES,
    };
    // SAFETY: icc is fully initialised.  A failure leaves the bar classes
    // unregistered and surfaces later as a window-creation error.
    unsafe {
        let _ = InitCommonControlsEx(&icc);
    }
}

/// Count existing top-level windows of the shell's window class.
fn count_instances() -> u32 {
    let mut count: u32 = 0;
    // SAFETY: the callback runs only within this call, and lparam points to a
    // local that outlives EnumWindows.
    unsafe {
        let _ = EnumWindows(
            Some(count_instances_proc),
            LPARAM(&mut count as *mut u32 as isize),
        );
    }
    count
}

// SAFETY: registered with EnumWindows above; lparam is the *mut u32 counter.
unsafe extern "system" fn count_instances_proc(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let mut buf = [0u16; 64];
    let len = GetClassNameW(hwnd, &mut buf) as usize;
    let class: Vec<u16> = CLASS_NAME_STR.encode_utf16().collect();
    if buf.get(..len) == Some(class.as_slice()) {
        *(lparam.0 as *mut u32) += 1;
    }
    BOOL(1) // keep enumerating
}

// ── Window class registration ─────────────────────────────────────────────────

fn register_class(hinstance: HINSTANCE) -> Result<()> {
    // SAFETY: LoadIconW with IDI_APPLICATION always succeeds; it loads the
    // built-in application icon resource, which exists on all Windows versions.
    let icon = unsafe { LoadIconW(None, IDI_APPLICATION) }.map_err(FerrhexError::from)?;

    // SAFETY: LoadCursorW with IDC_ARROW always succeeds; the arrow cursor is
    // a built-in resource guaranteed to exist on all Windows versions.
    let cursor = unsafe { LoadCursorW(None, IDC_ARROW) }.map_err(FerrhexError::from)?;

    // SAFETY: GetStockObject with WHITE_BRUSH always returns a valid HGDIOBJ.
    // Casting to HBRUSH is correct: stock brush objects are compatible types.
    let bg_brush = unsafe { HBRUSH(GetStockObject(WHITE_BRUSH).0) };

    let wndclass = WNDCLASSEXW {
        // WNDCLASSEXW is ~72 bytes; the cast to u32 is always lossless.
        cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
        style: CS_HREDRAW | CS_VREDRAW,
        lpfnWndProc: Some(wnd_proc),
        cbClsExtra: 0,
        cbWndExtra: 0,
        hInstance: hinstance,
        hIcon: icon,
        hCursor: cursor,
        hbrBackground: bg_brush,
        lpszMenuName: PCWSTR::null(),
        lpszClassName: CLASS_NAME,
        hIconSm: icon,
    };

    // SAFETY: wndclass is fully initialised with valid handles;
    // CLASS_NAME is a valid null-terminated UTF-16 string literal.
    let atom = unsafe { RegisterClassExW(&wndclass) };
    if atom == 0 {
        return Err(last_error("RegisterClassExW"));
    }

    Ok(())
}

// ── Window creation ───────────────────────────────────────────────────────────

fn create_window(hinstance: HINSTANCE, setup: &mut WindowSetup) -> Result<HWND> {
    // SAFETY: CLASS_NAME was just registered; hinstance is the exe's module.
    // WS_CLIPCHILDREN keeps the parent from painting over the control.
    // CW_USEDEFAULT everywhere — persisted placement is applied separately,
    // after creation, so first runs get the system-default frame.
    // lpParam carries `setup` into WM_CREATE; it outlives the call.
    let created = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            CLASS_NAME,
            APP_TITLE,
            WS_OVERLAPPEDWINDOW | WS_CLIPCHILDREN,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            HWND::default(),
            HMENU::default(),
            hinstance,
            Some(setup as *mut WindowSetup as *const core::ffi::c_void),
        )
    };

    let hwnd = match created {
        Ok(hwnd) => hwnd,
        // WM_CREATE aborts with -1 when a child cannot be created and leaves
        // the real failure in `setup`.
        Err(e) => {
            return Err(match setup.create_error.take() {
                Some(err) => err,
                None => FerrhexError::Win32 {
                    function: "CreateWindowExW",
                    code: e.code().0 as u32,
                },
            })
        }
    };

    // Build and attach the menu bar.
    let menu = build_menu()?;
    // SAFETY: hwnd and menu are valid handles.
    unsafe { SetMenu(hwnd, menu) }.map_err(FerrhexError::from)?;

    Ok(hwnd)
}

// ── Menu construction ─────────────────────────────────────────────────────────

fn build_menu() -> Result<HMENU> {
    // SAFETY: CreateMenu has no preconditions; it only fails when the system
    // is critically low on resources, in which case ? propagates the error.
    unsafe {
        let bar = CreateMenu().map_err(FerrhexError::from)?;

        // ── File ──────────────────────────────────────────────────────────────
        let file = CreateMenu().map_err(FerrhexError::from)?;
        AppendMenuW(file, MF_STRING, IDM_FILE_OPEN, w!("&Open…\tCtrl+O"))
            .map_err(FerrhexError::from)?;
        AppendMenuW(file, MF_STRING, IDM_FILE_SAVE, w!("&Save\tCtrl+S"))
            .map_err(FerrhexError::from)?;
        AppendMenuW(file, MF_STRING, IDM_FILE_SAVE_AS, w!("Save &As…"))
            .map_err(FerrhexError::from)?;
        AppendMenuW(file, MF_SEPARATOR, 0, PCWSTR::null()).map_err(FerrhexError::from)?;
        AppendMenuW(file, MF_STRING, IDM_FILE_EXIT, w!("E&xit\tAlt+F4"))
            .map_err(FerrhexError::from)?;

        // ── Edit ──────────────────────────────────────────────────────────────
        // The control grays these per document state via WM_INITMENUPOPUP.
        let edit = CreateMenu().map_err(FerrhexError::from)?;
        AppendMenuW(edit, MF_STRING, IDM_EDIT_UNDO, w!("&Undo\tCtrl+Z"))
            .map_err(FerrhexError::from)?;
        AppendMenuW(edit, MF_STRING, IDM_EDIT_REDO, w!("&Redo\tCtrl+Y"))
            .map_err(FerrhexError::from)?;
        AppendMenuW(edit, MF_SEPARATOR, 0, PCWSTR::null()).map_err(FerrhexError::from)?;
        AppendMenuW(edit, MF_STRING, IDM_EDIT_CUT, w!("Cu&t\tCtrl+X"))
            .map_err(FerrhexError::from)?;
        AppendMenuW(edit, MF_STRING, IDM_EDIT_COPY, w!("&Copy\tCtrl+C"))
            .map_err(FerrhexError::from)?;
        AppendMenuW(edit, MF_STRING, IDM_EDIT_PASTE, w!("&Paste\tCtrl+V"))
            .map_err(FerrhexError::from)?;
        AppendMenuW(edit, MF_STRING, IDM_EDIT_DELETE, w!("&Delete\tDel"))
            .map_err(FerrhexError::from)?;
        AppendMenuW(edit, MF_STRING, IDM_EDIT_SELECT_ALL, w!("Select A&ll\tCtrl+A"))
            .map_err(FerrhexError::from)?;
        AppendMenuW(edit, MF_SEPARATOR, 0, PCWSTR::null()).map_err(FerrhexError::from)?;
        AppendMenuW(edit, MF_STRING, IDM_EDIT_FIND, w!("&Find…\tCtrl+F"))
            .map_err(FerrhexError::from)?;
        AppendMenuW(edit, MF_STRING, IDM_EDIT_REPLACE, w!("R&eplace…\tCtrl+H"))
            .map_err(FerrhexError::from)?;
        AppendMenuW(edit, MF_STRING, IDM_EDIT_GOTO, w!("&Go To…\tCtrl+G"))
            .map_err(FerrhexError::from)?;

        // ── View ──────────────────────────────────────────────────────────────
        let view = CreateMenu().map_err(FerrhexError::from)?;
        AppendMenuW(view, MF_STRING, IDM_VIEW_SETTINGS, w!("&Preferences…"))
            .map_err(FerrhexError::from)?;

        // ── Help ──────────────────────────────────────────────────────────────
        let help = CreateMenu().map_err(FerrhexError::from)?;
        AppendMenuW(help, MF_STRING, IDM_HELP_ABOUT, w!("&About Ferrhex…"))
            .map_err(FerrhexError::from)?;

        // Attach drop-downs to the menu bar.
        // The uIDNewItem parameter for MF_POPUP is the child HMENU cast to usize.
        AppendMenuW(bar, MF_POPUP, file.0 as usize, w!("&File")).map_err(FerrhexError::from)?;
        AppendMenuW(bar, MF_POPUP, edit.0 as usize, w!("&Edit")).map_err(FerrhexError::from)?;
        AppendMenuW(bar, MF_POPUP, view.0 as usize, w!("&View")).map_err(FerrhexError::from)?;
        AppendMenuW(bar, MF_POPUP, help.0 as usize, w!("&Help")).map_err(FerrhexError::from)?;

        Ok(bar)
    }
}

// ── Status bar ────────────────────────────────────────────────────────────────

fn create_status_bar(parent: HWND, hinstance: HINSTANCE) -> Result<HWND> {
    // SAFETY: the status-bar class comes from the common-controls registration
    // performed at startup; parent and hinstance are valid handles.
    unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            STATUS_CLASS,
            PCWSTR::null(),
            WS_CHILD | WS_VISIBLE | WINDOW_STYLE(SBARS_SIZEGRIP | CCS_BOTTOM),
            0, 0, 0, 0,
            parent,
            HMENU::default(),
            hinstance,
            None,
        )
    }
    .map_err(|e| FerrhexError::Win32 {
        function: "CreateWindowExW (status bar)",
        code: e.code().0 as u32,
    })
}

// ── Placement ─────────────────────────────────────────────────────────────────

/// Apply the persisted placement, if any.  Degenerate and absent records were
/// filtered at load time, in which case the window keeps its system-default
/// frame and is shown with the default command.
fn apply_placement(hwnd: HWND, saved: Option<&SavedPlacement>) {
    match saved {
        Some(p) => {
            // Going through the placement API (rather than SetWindowPos)
            // prevents window creep when the taskbar sits at the top or left
            // of the screen.
            let mut wp = WINDOWPLACEMENT {
                length: std::mem::size_of::<WINDOWPLACEMENT>() as u32,
                ..Default::default()
            };
            // SAFETY: wp.length is initialised and hwnd is the freshly
            // created, still-hidden main window.
            unsafe {
                let _ = GetWindowPlacement(hwnd, &mut wp);
            }
            wp.showCmd = SHOW_WINDOW_CMD(p.show_cmd as _);
            wp.rcNormalPosition = RECT {
                left: p.x,
                top: p.y,
                right: p.x + p.width,
                bottom: p.y + p.height,
            };
            // SAFETY: wp is fully initialised; failures fall back to the
            // default frame, which is acceptable.
            unsafe {
                let _ = SetWindowPlacement(hwnd, &wp);
                let _ = ShowWindow(hwnd, SHOW_WINDOW_CMD(p.show_cmd as _));
            }
        }
        // SAFETY: hwnd is valid; SW_SHOWDEFAULT honors the STARTUPINFO wish.
        None => unsafe {
            let _ = ShowWindow(hwnd, SW_SHOWDEFAULT);
        },
    }
    // SAFETY: hwnd is valid; the success BOOL is intentionally ignored.
    unsafe {
        let _ = UpdateWindow(hwnd);
    }
}

/// Capture the live placement for the next run.
fn capture_placement(hwnd: HWND) -> Option<SavedPlacement> {
    let mut wp = WINDOWPLACEMENT {
        length: std::mem::size_of::<WINDOWPLACEMENT>() as u32,
        ..Default::default()
    };
    // SAFETY: hwnd is still valid inside WM_DESTROY; wp.length is set.
    unsafe { GetWindowPlacement(hwnd, &mut wp) }.ok()?;
    let r = wp.rcNormalPosition;
    Some(SavedPlacement {
        show_cmd: wp.showCmd.0 as i32,
        x: r.left,
        y: r.top,
        width: r.right - r.left,
        height: r.bottom - r.top,
    })
}

// ── Message loop ──────────────────────────────────────────────────────────────

fn message_loop(hwnd_main: HWND) -> Result<i32> {
    let mut msg = MSG::default();

    loop {
        // SAFETY: &mut msg is a valid MSG pointer; HWND::default() retrieves
        // messages for all windows on this thread; 0,0 filter accepts all.
        let ret = unsafe { GetMessageW(&mut msg, HWND::default(), 0, 0) };

        match ret.0 {
            // GetMessageW returns -1 on error.
            -1 => return Err(last_error("GetMessageW")),
            // Returns 0 when WM_QUIT is retrieved — exit the loop cleanly.
            0 => break,
            // Any other value: a normal message to dispatch.
            _ => {
                // The control gets first refusal on every message so its
                // accelerator table works without the shell knowing it.
                // After WM_NCDESTROY the state is gone and messages flow
                // straight through.
                if let Some(state) = state_mut(hwnd_main) {
                    if state.hex.translate_accelerator(&msg) {
                        continue;
                    }
                }
                // SAFETY: msg was populated by a successful GetMessageW call.
                // TranslateMessage return value (whether it generated WM_CHAR)
                // and DispatchMessageW's LRESULT are intentionally unused.
                unsafe {
                    let _ = TranslateMessage(&msg);
                    let _ = DispatchMessageW(&msg);
                }
            }
        }
    }

    // The quit sentinel's payload is the process exit code.
    Ok(msg.wParam.0 as i32)
}

// ── Per-window state access ───────────────────────────────────────────────────

/// The shell state stashed in the window's userdata slot.
///
/// Returns `None` before WM_CREATE completes and after WM_NCDESTROY; callers
/// fall back to default message handling.
fn state_mut(hwnd: HWND) -> Option<&'static mut WindowState> {
    // SAFETY: the slot holds either null or the Box::into_raw pointer
    // installed by WM_CREATE; the UI is single-threaded, so no aliasing
    // &mut can exist.
    unsafe { (GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *mut WindowState).as_mut() }
}

// ── Window procedure ──────────────────────────────────────────────────────────

// SAFETY: wnd_proc is registered as lpfnWndProc in WNDCLASSEXW.
// Windows guarantees that hwnd, msg, wparam, and lparam are valid for the
// lifetime of this call; we must not store hwnd beyond the message handler.
unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        // ── Lifecycle ─────────────────────────────────────────────────────────
        WM_CREATE => on_create(hwnd, lparam),

        WM_CLOSE => {
            // The control may veto (unsaved-changes prompt declined); the
            // window then stays open and nothing is persisted.
            if let Some(state) = state_mut(hwnd) {
                if !state.hex.confirm_close() {
                    return LRESULT(0);
                }
            }
            // SAFETY: default handling destroys the window, which triggers
            // WM_DESTROY below.
            DefWindowProcW(hwnd, msg, wparam, lparam)
        }

        WM_DESTROY => on_destroy(hwnd),

        WM_NCDESTROY => {
            // All children (the control included) are gone; reclaim the state
            // exactly once and let the DLL unload.
            // SAFETY: the slot swap returns the Box::into_raw pointer from
            // WM_CREATE (or null) and clears the slot atomically.
            let ptr = SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0) as *mut WindowState;
            if !ptr.is_null() {
                // SAFETY: ptr came from Box::into_raw and the slot is now
                // cleared, so this reclaim happens exactly once.
                drop(Box::from_raw(ptr));
            }
            DefWindowProcW(hwnd, msg, wparam, lparam)
        }

        // ── Layout ────────────────────────────────────────────────────────────
        WM_SIZE => {
            on_size(hwnd, lparam);
            LRESULT(0)
        }

        // ── Commands & notifications ──────────────────────────────────────────
        WM_COMMAND => on_command(hwnd, msg, wparam, lparam),

        WM_SETFOCUS => {
            // Keyboard focus always lands on the editing surface.
            if let Some(state) = state_mut(hwnd) {
                state.hex.focus();
            }
            LRESULT(0)
        }

        WM_INITMENUPOPUP => {
            // The control updates check marks and gray states for its items.
            if let Some(state) = state_mut(hwnd) {
                state.hex.menu_popup(wparam, lparam);
            }
            LRESULT(0)
        }

        // Default processing for all unhandled messages.
        // SAFETY: hwnd and message parameters are valid — provided by Windows.
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

// ── Message handlers ──────────────────────────────────────────────────────────

/// WM_CREATE: build the children and install `WindowState`.
///
/// Returning -1 makes `CreateWindowExW` fail, which `create_window` reports
/// using the error left in `WindowSetup`.
fn on_create(hwnd: HWND, lparam: LPARAM) -> LRESULT {
    // SAFETY: for WM_CREATE, lparam is a *const CREATESTRUCTW whose
    // lpCreateParams is the WindowSetup passed to CreateWindowExW; the struct
    // lives in `run`'s frame for the whole call.
    let setup = unsafe {
        let create = lparam.0 as *const CREATESTRUCTW;
        &mut *((*create).lpCreateParams as *mut WindowSetup)
    };

    let Some(hex_dll) = setup.hex_dll.take() else {
        return LRESULT(-1);
    };
    let Some(store) = setup.store.take() else {
        return LRESULT(-1);
    };

    let hex = match HexView::create(hwnd, setup.hinstance, &hex_dll) {
        Ok(v) => v,
        Err(e) => {
            setup.create_error = Some(e);
            return LRESULT(-1);
        }
    };
    let toolbar = match toolbar::create(hwnd, setup.hinstance) {
        Ok(t) => t,
        Err(e) => {
            setup.create_error = Some(e);
            return LRESULT(-1);
        }
    };
    let status_bar = match create_status_bar(hwnd, setup.hinstance) {
        Ok(s) => s,
        Err(e) => {
            setup.create_error = Some(e);
            return LRESULT(-1);
        }
    };

    // Initial façade preferences, then let the control name the window.
    hex.set_main_window(hwnd);
    hex.set_save_on_exit(store.save_on_exit());
    hex.set_center_caret(true);
    // SAFETY: GetThreadLocale has no preconditions; the LANGID is its low word.
    let langid = (unsafe { GetThreadLocale() } & 0xFFFF) as u16;
    hex.select_language(langid);
    hex.refresh_title();

    let state = Box::new(WindowState {
        hex,
        toolbar,
        status_bar,
        store,
        hex_dll,
    });
    // SAFETY: hwnd is valid; the slot was null until now and WM_NCDESTROY is
    // the only place that reclaims the pointer.
    unsafe {
        SetWindowLongPtrW(hwnd, GWLP_USERDATA, Box::into_raw(state) as isize);
    }

    LRESULT(0)
}

/// WM_SIZE: stretch the toolbar, re-dock the status bar, give the rest to the
/// control.
fn on_size(hwnd: HWND, lparam: LPARAM) {
    let cx = (lparam.0 & 0xFFFF) as i32;
    let cy = ((lparam.0 >> 16) & 0xFFFF) as i32;

    let Some(state) = state_mut(hwnd) else {
        return;
    };

    // Full client width first so the button rows wrap, then fix the height
    // from the bottom of the last row.
    // SAFETY: all child HWNDs are valid while the parent is alive; layout
    // moves never fail in a way the shell can act on.
    unsafe {
        let _ = SetWindowPos(state.toolbar, HWND::default(), 0, 0, cx, 0, SWP_NOZORDER);
        let toolbar_h = toolbar::height(state.toolbar);
        let _ = SetWindowPos(state.toolbar, HWND::default(), 0, 0, cx, toolbar_h, SWP_NOZORDER);

        // The status bar re-docks itself to the bottom on WM_SIZE.
        let _ = SendMessageW(state.status_bar, WM_SIZE, WPARAM(0), LPARAM(0));
        let status_h = window_height(state.status_bar);

        let parts = layout::status_parts(cx);
        let _ = SendMessageW(
            state.status_bar,
            SB_SETPARTS,
            WPARAM(parts.len()),
            LPARAM(parts.as_ptr() as isize),
        );

        let hex_h = layout::editor_height(cy, toolbar_h, status_h);
        let _ = SetWindowPos(
            state.hex.hwnd(),
            HWND::default(),
            0,
            toolbar_h,
            cx,
            hex_h,
            SWP_NOZORDER,
        );
    }
}

/// WM_COMMAND: Exit is the shell's own; everything else goes to the control.
fn on_command(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    let cmd = (wparam.0 & 0xFFFF) as u16;

    if cmd as usize == IDM_FILE_EXIT {
        // Route through WM_CLOSE so the close-confirmation contract applies.
        // SAFETY: hwnd is valid; sending to self on the UI thread.
        unsafe {
            let _ = SendMessageW(hwnd, WM_CLOSE, WPARAM(0), LPARAM(0));
        }
        return LRESULT(0);
    }

    match state_mut(hwnd) {
        Some(state) => {
            state.hex.dispatch_command(cmd);
            LRESULT(0)
        }
        // SAFETY: hwnd and message parameters are valid — provided by Windows.
        None => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}

/// WM_DESTROY: persist the placement exactly once and post the quit sentinel.
fn on_destroy(hwnd: HWND) -> LRESULT {
    if let Some(state) = state_mut(hwnd) {
        if state.store.save_on_exit() {
            if let Some(placement) = capture_placement(hwnd) {
                // Best-effort: a failed write must not block shutdown.
                let _ = state.store.persist(placement);
            }
        }
        // The control persists its own preferences, honoring its flag.
        state.hex.save_preferences();

        // SAFETY: PostQuitMessage with exit code 0 is always safe to call
        // from WM_DESTROY.  It posts WM_QUIT to the thread's message queue.
        unsafe { PostQuitMessage(0) };
    }
    LRESULT(0)
}

// ── Layout helpers ────────────────────────────────────────────────────────────

/// Outer height of a child window, for chrome measurements.
fn window_height(hwnd: HWND) -> i32 {
    let mut rect = RECT::default();
    // SAFETY: hwnd is a valid child window; rect outlives the call.
    unsafe {
        let _ = GetWindowRect(hwnd, &mut rect);
    }
    rect.bottom - rect.top
}

// ── Error helpers ─────────────────────────────────────────────────────────────

/// Capture the current Win32 last-error code and wrap it in a `FerrhexError`.
///
/// Call immediately after a Win32 function that signals failure — `GetLastError`
/// reads thread-local state that can be overwritten by any subsequent API call.
fn last_error(function: &'static str) -> FerrhexError {
    // SAFETY: GetLastError reads thread-local state set by the last Win32 call.
    // It is always safe to call and never fails.
    let code = unsafe { GetLastError() };
    FerrhexError::Win32 {
        function,
        code: code.0,
    }
}
