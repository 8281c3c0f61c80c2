//! Helpers shared by the collaborators we drive as child processes.

use std::path::{Path, PathBuf};

/// Longest stderr excerpt we hand back to callers
pub const STDERR_EXCERPT_CHARS: usize = 500;

/// Resolve a configured program to an existing file.
///
/// Anything with a directory component is taken as a path; a bare name is
/// looked up on `PATH`. No other locations are searched.
pub fn locate_program(program: &Path) -> Option<PathBuf> {
    if program.as_os_str().is_empty() {
        return None;
    }

    if program.components().count() > 1 || program.is_absolute() {
        return program.is_file().then(|| program.to_path_buf());
    }

    let search_path = std::env::var_os("PATH")?;
    std::env::split_paths(&search_path)
        .flat_map(|dir| candidate_names(program).into_iter().map(move |name| dir.join(name)))
        .find(|candidate| candidate.is_file())
}

fn candidate_names(program: &Path) -> Vec<PathBuf> {
    let mut names = vec![program.to_path_buf()];
    if cfg!(windows) && program.extension().is_none() {
        names.push(program.with_extension("exe"));
    }
    names
}

/// Lossy-decode process output and keep at most `limit` characters
pub fn stderr_excerpt(stderr: &[u8], limit: usize) -> String {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();
    match text.char_indices().nth(limit) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text.to_string(),
    }
}
