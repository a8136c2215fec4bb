use once_cell::sync::Lazy;
use regex::Regex;

// "Game [v1.0] [5401]" -> "Game [v1.0][5401]"; the character before the
// space must be ']' so "Game (2017) [6702]" stays untouched.
static TRAILING_INDEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\]\s)(\[\d+\])$").unwrap());

/// Derives the human-readable display name from a raw filename.
///
/// The final extension is stripped (the whole name is kept if there is
/// none), every literal " [original]" marker is removed, and a trailing
/// "] [123]" run is collapsed to "][123]". Pure and idempotent; both the
/// listing pass and the download-resolution pass call this same function so
/// the two can never drift apart.
pub fn display_name(file_name: &str) -> String {
    let stem = match file_name.rfind('.') {
        Some(dot) => &file_name[..dot],
        None => file_name,
    };
    let cleaned = stem.replace(" [original]", "");
    TRAILING_INDEX.replace(&cleaned, "]$2").into_owned()
}
