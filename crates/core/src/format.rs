use std::{fmt, str::FromStr};

/// Output formats: two outline formats and two web flavors derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Format {
    Ttf,
    Otf,
    Woff,
    Woff2,
}

impl Format {
    pub const ALL: [Format; 4] = [Format::Ttf, Format::Otf, Format::Woff, Format::Woff2];

    pub const fn is_outline(self) -> bool {
        matches!(self, Format::Ttf | Format::Otf)
    }

    pub const fn is_web(self) -> bool {
        !self.is_outline()
    }

    /// File extension, also the configuration spelling.
    pub const fn extension(self) -> &'static str {
        match self {
            Format::Ttf => "ttf",
            Format::Otf => "otf",
            Format::Woff => "woff",
            Format::Woff2 => "woff2",
        }
    }

    /// Output directory component.
    pub const fn dir_name(self) -> &'static str {
        match self {
            Format::Ttf => "TTF",
            Format::Otf => "OTF",
            Format::Woff => "WOFF",
            Format::Woff2 => "WOFF2",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::ALL
            .into_iter()
            .find(|format| format.extension() == s)
            .ok_or_else(|| s.to_string())
    }
}
