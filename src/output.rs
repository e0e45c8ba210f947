//! Writing emitted units to disk.
//!
//! All files of one write are staged as temp siblings first and renamed into
//! place only after every one of them was written. Files being replaced are
//! kept aside until the last rename succeeds and are put back otherwise, so
//! a failed run leaves the directory as it found it.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::emit::SourceUnit;
use crate::error::{GenerateError, GenerateResult};

pub const INDEX_FILE: &str = "mod.rs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLayout {
    /// One file per unit plus a `mod.rs` that `include!`s them all.
    PerType,
    /// Every unit concatenated into the named file.
    Combined(String),
}

pub fn render_combined(units: &[SourceUnit]) -> String {
    let parts: Vec<&str> = units.iter().map(|u| u.source.as_str()).collect();
    parts.join("\n")
}

pub fn render_index(units: &[SourceUnit]) -> String {
    let mut out = String::from("// @generated by json-wiregen. Do not edit.\n\n");
    for unit in units {
        out.push_str(&format!("include!({:?});\n", unit.file_name));
    }
    out
}

pub fn write_units(units: &[SourceUnit], out_dir: &Path, layout: &OutputLayout) -> GenerateResult<Vec<PathBuf>> {
    let files: Vec<(String, String)> = match layout {
        OutputLayout::PerType => {
            let mut files: Vec<(String, String)> = units
                .iter()
                .map(|u| (u.file_name.clone(), u.source.clone()))
                .collect();
            files.push((INDEX_FILE.to_string(), render_index(units)));
            files
        }
        OutputLayout::Combined(name) => {
            if name.is_empty() || name.contains(['/', '\\']) {
                return Err(GenerateError::Input(format!("`{name}` is not a plain file name")));
            }
            vec![(name.clone(), render_combined(units))]
        }
    };

    fs::create_dir_all(out_dir).map_err(|source| GenerateError::Write {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let mut staged: Vec<Staged> = Vec::with_capacity(files.len());
    for (name, contents) in &files {
        let tmp = out_dir.join(format!(".{name}.tmp"));
        if let Err(source) = fs::write(&tmp, contents) {
            discard(&staged);
            let _ = fs::remove_file(&tmp);
            return Err(GenerateError::Write { path: tmp, source });
        }
        staged.push(Staged {
            tmp,
            target: out_dir.join(name),
            backup: out_dir.join(format!(".{name}.bak")),
        });
    }

    // a directory in the way cannot be swapped out; refuse before touching anything
    if let Some(blocked) = staged.iter().find(|s| s.target.is_dir()) {
        let path = blocked.target.clone();
        discard(&staged);
        return Err(GenerateError::Write {
            path,
            source: io::Error::other("target is a directory"),
        });
    }

    let mut committed: Vec<(&Staged, bool)> = Vec::with_capacity(staged.len());
    for (i, s) in staged.iter().enumerate() {
        match commit(s) {
            Ok(had_old) => committed.push((s, had_old)),
            Err((path, source)) => {
                rollback(&committed);
                discard(&staged[i..]);
                return Err(GenerateError::Write { path, source });
            }
        }
        tracing::debug!(path = %s.target.display(), "wrote");
    }
    for (s, had_old) in &committed {
        if *had_old {
            let _ = fs::remove_file(&s.backup);
        }
    }
    Ok(staged.into_iter().map(|s| s.target).collect())
}

struct Staged {
    tmp: PathBuf,
    target: PathBuf,
    /// Where the previous contents of `target` wait until the write commits.
    backup: PathBuf,
}

/// Move `s` into place, keeping any old file aside. Returns whether there was one.
fn commit(s: &Staged) -> Result<bool, (PathBuf, io::Error)> {
    let had_old = s.target.exists();
    if had_old {
        fs::rename(&s.target, &s.backup).map_err(|e| (s.target.clone(), e))?;
    }
    if let Err(e) = fs::rename(&s.tmp, &s.target) {
        if had_old {
            let _ = fs::rename(&s.backup, &s.target);
        }
        return Err((s.target.clone(), e));
    }
    Ok(had_old)
}

/// Undo committed renames, newest first: old files come back, new ones go.
fn rollback(committed: &[(&Staged, bool)]) {
    for (s, had_old) in committed.iter().rev() {
        if *had_old {
            let _ = fs::rename(&s.backup, &s.target);
        } else {
            let _ = fs::remove_file(&s.target);
        }
    }
}

fn discard(staged: &[Staged]) {
    for s in staged {
        let _ = fs::remove_file(&s.tmp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(type_name: &str, file_name: &str, source: &str) -> SourceUnit {
        SourceUnit {
            package: "wire".into(),
            type_name: type_name.into(),
            file_name: file_name.into(),
            source: source.into(),
        }
    }

    fn units() -> Vec<SourceUnit> {
        vec![unit("Version", "version.rs", "// v\n"), unit("Main", "main.rs", "// m\n")]
    }

    fn leftovers(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .filter(|n| n.ends_with(".tmp") || n.ends_with(".bak"))
            .collect()
    }

    #[test]
    fn per_type_layout_writes_units_and_index() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_units(&units(), dir.path(), &OutputLayout::PerType).unwrap();
        assert_eq!(written.len(), 3);
        assert_eq!(fs::read_to_string(dir.path().join("version.rs")).unwrap(), "// v\n");
        let index = fs::read_to_string(dir.path().join("mod.rs")).unwrap();
        assert!(index.ends_with("include!(\"version.rs\");\ninclude!(\"main.rs\");\n"));

        assert!(leftovers(dir.path()).is_empty());
    }

    #[test]
    fn combined_layout_concatenates_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::Combined("wire.rs".into());
        write_units(&units(), dir.path(), &layout).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("wire.rs")).unwrap(), "// v\n\n// m\n");
    }

    #[test]
    fn combined_name_must_be_a_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::Combined("../escape.rs".into());
        assert!(matches!(write_units(&units(), dir.path(), &layout), Err(GenerateError::Input(_))));
    }

    #[test]
    fn failed_write_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        // a directory where the second unit's temp file should go
        fs::create_dir(dir.path().join(".main.rs.tmp")).unwrap();
        let err = write_units(&units(), dir.path(), &OutputLayout::PerType).unwrap_err();
        assert!(matches!(err, GenerateError::Write { .. }));
        assert!(!dir.path().join("version.rs").exists());
        assert!(!dir.path().join(".version.rs.tmp").exists());
        assert!(!dir.path().join("mod.rs").exists());
    }

    #[test]
    fn rewriting_replaces_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        write_units(&units(), dir.path(), &OutputLayout::PerType).unwrap();
        let newer = vec![unit("Version", "version.rs", "// v2\n"), unit("Main", "main.rs", "// m2\n")];
        write_units(&newer, dir.path(), &OutputLayout::PerType).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("version.rs")).unwrap(), "// v2\n");
        assert_eq!(fs::read_to_string(dir.path().join("main.rs")).unwrap(), "// m2\n");
        assert!(leftovers(dir.path()).is_empty());
    }

    #[test]
    fn blocked_target_leaves_previous_output_untouched() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("version.rs"), "// old\n").unwrap();
        fs::create_dir(dir.path().join("main.rs")).unwrap();
        fs::write(dir.path().join("main.rs").join("keep"), "x").unwrap();

        let err = write_units(&units(), dir.path(), &OutputLayout::PerType).unwrap_err();
        assert!(matches!(err, GenerateError::Write { ref path, .. } if path.ends_with("main.rs")));
        assert_eq!(fs::read_to_string(dir.path().join("version.rs")).unwrap(), "// old\n");
        assert!(dir.path().join("main.rs").join("keep").exists());
        assert!(!dir.path().join("mod.rs").exists());
        assert!(leftovers(dir.path()).is_empty());
    }

    #[test]
    fn rollback_restores_replaced_files_and_removes_new_ones() {
        let dir = tempfile::tempdir().unwrap();
        let staged = |name: &str| Staged {
            tmp: dir.path().join(format!(".{name}.tmp")),
            target: dir.path().join(name),
            backup: dir.path().join(format!(".{name}.bak")),
        };
        let replaced = staged("a.rs");
        let fresh = staged("b.rs");
        fs::write(&replaced.target, "old").unwrap();
        fs::write(&replaced.tmp, "new").unwrap();
        fs::write(&fresh.tmp, "new").unwrap();

        let committed = vec![(&replaced, commit(&replaced).unwrap()), (&fresh, commit(&fresh).unwrap())];
        assert!(committed[0].1);
        assert!(!committed[1].1);
        assert_eq!(fs::read_to_string(&replaced.target).unwrap(), "new");

        rollback(&committed);
        assert_eq!(fs::read_to_string(&replaced.target).unwrap(), "old");
        assert!(!fresh.target.exists());
        assert!(leftovers(dir.path()).is_empty());
    }
}
