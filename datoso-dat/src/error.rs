use std::path::Path;

/// Errors that can occur while detecting, parsing, deduping or saving DAT files.
#[derive(Debug, thiserror::Error)]
pub enum DatError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("Unrecognized DAT format: {path}")]
    UnrecognizedFormat { path: String },

    #[error("Error parsing line: {line} from: {file}")]
    Parse { line: String, file: String },

    #[error("Missing header field '{field}' in {file}")]
    MissingHeaderField { field: &'static str, file: String },

    #[error("Invalid DAT file: {0}")]
    InvalidDat(String),

    #[error("Invalid dat reference: {0}")]
    InvalidReference(String),

    #[error("Lookup failed: {0}")]
    Lookup(String),

    #[error("No file path to save to")]
    NoPath,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DatError {
    pub fn invalid_dat(msg: impl Into<String>) -> Self {
        Self::InvalidDat(msg.into())
    }

    pub fn invalid_reference(msg: impl Into<String>) -> Self {
        Self::InvalidReference(msg.into())
    }

    pub fn lookup(msg: impl Into<String>) -> Self {
        Self::Lookup(msg.into())
    }

    pub fn unrecognized(path: &Path) -> Self {
        Self::UnrecognizedFormat {
            path: path.display().to_string(),
        }
    }

    pub fn parse(line: impl Into<String>, file: Option<&Path>) -> Self {
        Self::Parse {
            line: line.into(),
            file: origin_name(file),
        }
    }

    pub fn missing_header(field: &'static str, file: Option<&Path>) -> Self {
        Self::MissingHeaderField {
            field,
            file: origin_name(file),
        }
    }
}

/// Display name for the source of a parse, used in error messages.
pub(crate) fn origin_name(file: Option<&Path>) -> String {
    file.map(|p| p.display().to_string())
        .unwrap_or_else(|| "<memory>".to_string())
}
