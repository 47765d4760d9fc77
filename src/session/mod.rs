// ── Window-placement persistence ──────────────────────────────────────────────
//
// Reads and writes `%APPDATA%\Ferrhex\window.json`.
// No `unsafe` — pure safe Rust + serde_json.
//
// The store is deliberately forgiving: a missing file, a parse failure, an
// unknown version or a degenerate record all degrade to "use system default
// placement", and a failed write is discarded by the caller.  The hexedit
// control keeps its own preferences behind its load/save messages; only the
// shell's window geometry lives here.

use std::{fs, io, path::PathBuf};

use serde::{Deserialize, Serialize};

// ── On-disk types ─────────────────────────────────────────────────────────────

/// Root of the JSON placement file.
#[derive(Serialize, Deserialize)]
struct PlacementFile {
    version: u32,
    /// Whether the placement should be written back on exit.
    #[serde(default = "default_save_on_exit")] // absent in hand-edited files
    save_on_exit: bool,
    placement: Option<SavedPlacement>,
}

fn default_save_on_exit() -> bool {
    true
}

/// The last main-window placement, captured at destroy time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct SavedPlacement {
    /// Raw `SW_*` show command (normal / minimized / maximized).
    pub(crate) show_cmd: i32,
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) width: i32,
    pub(crate) height: i32,
}

impl SavedPlacement {
    /// A window collapsed to a bare title bar must never be round-tripped;
    /// such records are neither written nor applied.
    pub(crate) fn is_degenerate(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

// ── Format version ────────────────────────────────────────────────────────────

const PLACEMENT_VERSION: u32 = 1;

// ── Path ──────────────────────────────────────────────────────────────────────

/// Return the path to the placement file: `%APPDATA%\Ferrhex\window.json`.
///
/// Returns `None` if the `APPDATA` environment variable is not set.
fn store_path() -> Option<PathBuf> {
    let appdata = std::env::var_os("APPDATA")?;
    let mut p = PathBuf::from(appdata);
    p.push("Ferrhex");
    p.push("window.json");
    Some(p)
}

// ── Store ─────────────────────────────────────────────────────────────────────

/// In-memory view of the placement store for one run of the shell.
pub(crate) struct PlacementStore {
    save_on_exit: bool,
    placement: Option<SavedPlacement>,
}

impl PlacementStore {
    /// Read the store.  Never fails: any problem yields an empty store with
    /// the save-on-exit flag at its default.
    pub(crate) fn load() -> Self {
        let (save_on_exit, placement) = sanitize(read_file());
        Self { save_on_exit, placement }
    }

    /// The placement to restore, already filtered for degeneracy.
    pub(crate) fn placement(&self) -> Option<&SavedPlacement> {
        self.placement.as_ref()
    }

    /// Whether the shell should write the placement back at exit.
    pub(crate) fn save_on_exit(&self) -> bool {
        self.save_on_exit
    }

    /// Write `placement` back to disk, creating the directory on first run.
    ///
    /// Degenerate records are silently refused.  The caller (`window.rs`)
    /// discards any returned error; persistence is best-effort.
    pub(crate) fn persist(&self, placement: SavedPlacement) -> io::Result<()> {
        if placement.is_degenerate() {
            return Ok(());
        }
        let path = store_path()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "APPDATA not set"))?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let file = PlacementFile {
            version: PLACEMENT_VERSION,
            save_on_exit: self.save_on_exit,
            placement: Some(placement),
        };

        let out = fs::File::create(&path)?;
        serde_json::to_writer_pretty(out, &file).map_err(io::Error::other)
    }
}

/// Reduce whatever was on disk to the values the shell trusts.
fn sanitize(file: Option<PlacementFile>) -> (bool, Option<SavedPlacement>) {
    let save_on_exit = file.as_ref().map_or(true, |f| f.save_on_exit);
    let placement = file
        .and_then(|f| f.placement)
        .filter(|p| !p.is_degenerate());
    (save_on_exit, placement)
}

/// Read and parse the placement file.
///
/// Returns `None` on any error: file missing, JSON parse failure, or an
/// unrecognised version number.
fn read_file() -> Option<PlacementFile> {
    let data = fs::read(store_path()?).ok()?;
    let file: PlacementFile = serde_json::from_slice(&data).ok()?;
    if file.version != PLACEMENT_VERSION {
        return None;
    }
    Some(file)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_placement(width: i32, height: i32) -> SavedPlacement {
        SavedPlacement { show_cmd: 1, x: 40, y: 60, width, height }
    }

    #[test]
    fn roundtrip() {
        let file = PlacementFile {
            version: PLACEMENT_VERSION,
            save_on_exit: true,
            placement: Some(make_placement(800, 600)),
        };
        let json = serde_json::to_string(&file).expect("serialize");
        let file2: PlacementFile = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(file2.version, PLACEMENT_VERSION);
        assert!(file2.save_on_exit);
        let p = file2.placement.expect("placement");
        assert_eq!(p, make_placement(800, 600));
    }

    /// A fresh install has no file at all; the store must come up empty with
    /// saving enabled.
    #[test]
    fn absent_file_yields_defaults() {
        let (save_on_exit, placement) = sanitize(None);
        assert!(save_on_exit);
        assert_eq!(placement, None);
    }

    /// A placement with zero width or height must never be applied.
    #[test]
    fn degenerate_placement_is_filtered() {
        for (w, h) in [(0, 600), (800, 0), (0, 0), (-1, 600)] {
            let file = PlacementFile {
                version: PLACEMENT_VERSION,
                save_on_exit: true,
                placement: Some(make_placement(w, h)),
            };
            let (_, placement) = sanitize(Some(file));
            assert_eq!(placement, None, "({w}, {h}) must not survive sanitize");
        }
    }

    #[test]
    fn healthy_placement_survives_sanitize() {
        let file = PlacementFile {
            version: PLACEMENT_VERSION,
            save_on_exit: false,
            placement: Some(make_placement(1, 1)),
        };
        let (save_on_exit, placement) = sanitize(Some(file));
        assert!(!save_on_exit);
        assert_eq!(placement, Some(make_placement(1, 1)));
    }

    /// Files written by hand without the flag must parse with saving enabled.
    #[test]
    fn save_on_exit_defaults_to_true_when_absent() {
        let json = r#"{"version":1,"placement":null}"#;
        let file: PlacementFile = serde_json::from_str(json).expect("deserialize");
        assert!(file.save_on_exit);
    }

    /// A placement file with an unrecognised version number must be rejected
    /// by `read_file()`.  Test the parse-and-check logic directly.
    #[test]
    fn wrong_version_is_rejected() {
        let file = PlacementFile {
            version: 99,
            save_on_exit: true,
            placement: None,
        };
        let json = serde_json::to_string(&file).expect("serialize");
        let parsed: PlacementFile = serde_json::from_str(&json).expect("deserialize");
        // read_file() would return None for this version; assert the condition directly.
        assert_ne!(parsed.version, PLACEMENT_VERSION);
    }

    #[test]
    fn minimized_show_command_roundtrips() {
        let file = PlacementFile {
            version: PLACEMENT_VERSION,
            save_on_exit: true,
            placement: Some(SavedPlacement { show_cmd: 2, x: 0, y: 0, width: 640, height: 480 }),
        };
        let json = serde_json::to_string(&file).expect("serialize");
        let file2: PlacementFile = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(file2.placement.expect("placement").show_cmd, 2);
    }
}
