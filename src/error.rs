// ── Central error type ────────────────────────────────────────────────────────
//
// All fallible operations in Ferrhex return `error::Result<T>`.  No panics
// in production paths; errors surface as user-facing dialogs (see
// `platform::win32::window::show_error_dialog`) and as the process exit code.

/// Every error that the shell can produce.
#[derive(Debug)]
pub enum FerrhexError {
    /// The hexedit control DLL could not be loaded.
    EditorLoad {
        /// File name of the component that failed to load.
        dll: &'static str,
        /// The raw Win32 error code or HRESULT.
        code: u32,
    },

    /// The hexedit child window could not be created.
    EditorCreate {
        /// The raw Win32 error code.
        code: u32,
    },

    /// A Win32 API call returned a failure code.
    Win32 {
        /// The name of the failing function, for display purposes.
        function: &'static str,
        /// The raw Win32 error code (`GetLastError()` value) or HRESULT.
        code: u32,
    },

    /// A standard I/O error (placement store read/write, …).
    Io(std::io::Error),
}

impl FerrhexError {
    /// Process exit code for this error.
    ///
    /// A missing or broken editing component exits with 3; every other
    /// startup failure exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::EditorLoad { .. } | Self::EditorCreate { .. } => 3,
            _ => 1,
        }
    }
}

impl std::fmt::Display for FerrhexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EditorLoad { dll, code } => {
                write!(f, "Unable to load the {dll} (error {code:#010x})")
            }
            Self::EditorCreate { code } => {
                write!(f, "Unable to create the hexedit control (error {code:#010x})")
            }
            Self::Win32 { function, code } => {
                write!(f, "{function} failed (error {code:#010x})")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for FerrhexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FerrhexError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

// Convert a windows-crate error (HRESULT) directly into a FerrhexError so that
// `?` can be used on `windows::core::Result<T>` throughout the platform module.
impl From<windows::core::Error> for FerrhexError {
    fn from(e: windows::core::Error) -> Self {
        // HRESULT.0 is i32; reinterpret bits as u32 for display purposes.
        // Win32 errors appear as 0x8007xxxx HRESULTs.
        Self::Win32 {
            function: "windows",
            code: e.code().0 as u32,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FerrhexError>;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editor_failures_exit_with_3() {
        let load = FerrhexError::EditorLoad { dll: "hexedit.dll", code: 126 };
        let create = FerrhexError::EditorCreate { code: 0 };
        assert_eq!(load.exit_code(), 3);
        assert_eq!(create.exit_code(), 3);
    }

    #[test]
    fn other_failures_exit_with_1() {
        let win32 = FerrhexError::Win32 { function: "RegisterClassExW", code: 8 };
        assert_eq!(win32.exit_code(), 1);
        let io = FerrhexError::from(std::io::Error::other("disk"));
        assert_eq!(io.exit_code(), 1);
    }

    #[test]
    fn load_error_names_the_component() {
        let e = FerrhexError::EditorLoad { dll: "hexedit.dll", code: 2 };
        assert!(e.to_string().contains("hexedit.dll"));
    }
}
