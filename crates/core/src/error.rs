//! Error taxonomy of a build.

use std::{io, path::PathBuf, result};

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Malformed or missing settings, reported before a font is built.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing or empty top level “fonts” key")]
    MissingFonts,

    #[error("there are no fonts in the project")]
    NoFonts,

    #[error("{font}: font settings must be a mapping")]
    FontSettingsNotMapping { font: String },

    #[error("{font}: can’t build without a “source”")]
    MissingSource { font: String },

    #[error("{font}: “source” {} does not exist", path.display())]
    SourceNotFound { font: String, path: PathBuf },

    #[error("{font}: the only supported “DSIG” value is “dummy”, got “{value}”")]
    UnsupportedDsig { font: String, value: String },

    #[error("{font}: “featureparams” must be a mapping")]
    FeatureParamsNotMapping { font: String },

    #[error("{font}: “featureparams” are unsupported for feature “{tag}”")]
    UnsupportedFeatureParams { font: String, tag: String },

    #[error("{font}: “featureparams” of stylistic set “{tag}” must be a string")]
    StylisticSetNotString { font: String, tag: String },

    #[error("{font}: “featureparams” of character variant “{tag}” must be a mapping")]
    CharacterVariantNotRecord { font: String, tag: String },

    #[error("{font}: unsupported “instances” value: {value}")]
    UnsupportedInstances { font: String, value: String },

    #[error("{font}: instance “{key}” matches no named instance")]
    UnmatchedInstance { font: String, key: String },

    #[error("{font}: “STAT” table must have “axes”")]
    StatWithoutAxes { font: String },

    #[error("{font}: subset “{subset}” did not provide a glyph list")]
    SubsetWithoutGlyphList { font: String, subset: String },

    #[error("{font}: donor “source” must be a list for variable fonts")]
    DonorSourceNotList { font: String },

    #[error("{font}: {donors} donor sources for {masters} interpolation masters")]
    DonorCountMismatch { font: String, donors: usize, masters: usize },

    #[error("{font}: invalid table tag “{tag}” in “{setting}”")]
    InvalidTag { font: String, setting: &'static str, tag: String },

    #[error("{font}: unknown format “{value}” in “formats”")]
    UnknownFormat { font: String, value: String },

    #[error("{font}: “formats” requests no outline format (ttf or otf)")]
    NoOutlineFormat { font: String },

    #[error("{font}: unsupported “components.decompose” value “{value}”")]
    UnsupportedDecomposition { font: String, value: String },

    #[error("{font}: malformed glyph rename at {}:{line}", path.display())]
    MalformedRename { font: String, path: PathBuf, line: usize },

    #[error("{font}: can’t read designspace {}", path.display())]
    Designspace {
        font: String,
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("{font}: invalid “{setting}”")]
    Invalid {
        font: String,
        setting: &'static str,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{font}: can’t parse version string “{value}”")]
    Parse { font: String, value: String },

    #[error("{font}: {operation} failed")]
    Toolkit {
        operation: &'static str,
        font: String,
        #[source]
        source: BoxError,
    },

    #[error("{font}: failed to edit font tables")]
    Font {
        font: String,
        #[source]
        source: BoxError,
    },

    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read project {}", path.display())]
    Project {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

pub type Result<T> = result::Result<T, Error>;

/// Attach the font name to errors from the byte-level and toolkit crates.
pub(crate) trait ResultExt<T> {
    fn toolkit(self, operation: &'static str, font: &str) -> Result<T>;
    fn font_op(self, font: &str) -> Result<T>;
}

impl<T, E: Into<BoxError>> ResultExt<T> for result::Result<T, E> {
    fn toolkit(self, operation: &'static str, font: &str) -> Result<T> {
        self.map_err(|e| Error::Toolkit {
            operation,
            font: font.to_string(),
            source: e.into(),
        })
    }

    fn font_op(self, font: &str) -> Result<T> {
        self.map_err(|e| Error::Font {
            font: font.to_string(),
            source: e.into(),
        })
    }
}

pub(crate) fn io_error(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Error {
    let path = path.into();
    move |source| Error::Io { path, source }
}
