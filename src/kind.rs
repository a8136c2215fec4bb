use std::fmt;
use std::str::FromStr;

use crate::error::CatalogError;

/// Media category served by the catalog. The set of kinds is closed: the
/// embedded client only ever asks for cartridge images or disk images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Rom,
    Dsk,
}

impl MediaKind {
    /// Accepted filename suffixes. Suffix matching is exact-case; these two
    /// casings are the only ones that occur on disk.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            MediaKind::Rom => &[".rom", ".ROM"],
            MediaKind::Dsk => &[".dsk", ".DSK"],
        }
    }

    /// Lowercase extension used in the download header's synthetic filename.
    pub fn wire_extension(self) -> &'static str {
        match self {
            MediaKind::Rom => "rom",
            MediaKind::Dsk => "dsk",
        }
    }

    /// Whether a raw filename carries one of the accepted suffixes.
    pub fn matches(self, file_name: &str) -> bool {
        self.extensions().iter().any(|ext| file_name.ends_with(ext))
    }
}

impl FromStr for MediaKind {
    type Err = CatalogError;

    /// Kind tokens are matched case-insensitively; anything other than
    /// ROM/DSK is rejected with the offending token.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ROM" => Ok(MediaKind::Rom),
            "DSK" => Ok(MediaKind::Dsk),
            other => Err(CatalogError::UnsupportedKind(other.to_string())),
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Rom => write!(f, "ROM"),
            MediaKind::Dsk => write!(f, "DSK"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("rom".parse::<MediaKind>().unwrap(), MediaKind::Rom);
        assert_eq!("Dsk".parse::<MediaKind>().unwrap(), MediaKind::Dsk);
        assert_eq!("ROM".parse::<MediaKind>().unwrap(), MediaKind::Rom);
    }

    #[test]
    fn test_unknown_kind_carries_token() {
        let err = "TAPE".parse::<MediaKind>().unwrap_err();
        assert!(err.to_string().contains("'TAPE'"));
    }

    #[test]
    fn test_suffix_match_is_exact_case() {
        assert!(MediaKind::Rom.matches("game.rom"));
        assert!(MediaKind::Rom.matches("game.ROM"));
        assert!(!MediaKind::Rom.matches("game.Rom"));
        assert!(!MediaKind::Rom.matches("game.dsk"));
        assert!(MediaKind::Dsk.matches("disk.DSK"));
    }
}
