use std::path::Path;

use crate::error::ParseError;

use super::header::{parse_timestamp, Header};
use super::table::RawTable;
use super::{single_band, two_band};

const TWO_BAND_EXTENSION: &str = "phc";
const SINGLE_BAND_PREFIX: &str = "ph";

/// Photometry file layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dialect {
    /// Legacy `.phc` files carrying B and V columns.
    TwoBand,
    /// `.ph<label>` files carrying one band. `label` is the band taken from
    /// the extension, if the file name had one.
    SingleBand { label: Option<String> },
}

impl Dialect {
    /// Select a dialect from the file extension alone.
    ///
    /// `.phc` (lowercase) is the two-band layout; any other `.ph<label>` is
    /// single band with that label, so `.phC` is a single-band clear filter.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = Path::new(filename).extension()?.to_str()?;
        if ext == TWO_BAND_EXTENSION {
            return Some(Self::TwoBand);
        }
        let label = ext.strip_prefix(SINGLE_BAND_PREFIX)?;
        if label.is_empty() {
            return None;
        }
        Some(Self::SingleBand {
            label: Some(label.to_string()),
        })
    }

    /// Guess the dialect from the first lines of the file.
    pub fn sniff(text: &str) -> Option<Self> {
        let first = text.lines().next()?;
        if parse_timestamp(first).is_ok() {
            return Some(Self::TwoBand);
        }
        let has_single_band_keys = text
            .lines()
            .take(single_band::HEADER_LINES)
            .any(|l| l.starts_with("# NORAD"));
        has_single_band_keys.then_some(Self::SingleBand { label: None })
    }

    /// Extension first, then header sniffing.
    pub fn detect(filename: &str, text: &str) -> Result<Self, ParseError> {
        Self::from_filename(filename)
            .or_else(|| Self::sniff(text))
            .ok_or_else(|| {
                let ext = Path::new(filename)
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or_default();
                ParseError::UnknownDialect(ext.to_string())
            })
    }

    pub fn parse_header(&self, text: &str) -> Result<Header, ParseError> {
        match self {
            Self::TwoBand => two_band::parse_header(text),
            Self::SingleBand { label } => single_band::parse_header(text, label.as_deref()),
        }
    }

    pub fn parse_table(&self, text: &str, header: Header) -> Result<RawTable, ParseError> {
        match self {
            Self::TwoBand => two_band::parse_table(text, header),
            Self::SingleBand { .. } => single_band::parse_table(text, header),
        }
    }

    pub fn parse(&self, text: &str) -> Result<RawTable, ParseError> {
        let header = self.parse_header(text)?;
        self.parse_table(text, header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_selects_dialect() {
        assert_eq!(Dialect::from_filename("pass.phc"), Some(Dialect::TwoBand));
        assert_eq!(
            Dialect::from_filename("/data/pass.phV"),
            Some(Dialect::SingleBand {
                label: Some("V".into())
            })
        );
        assert_eq!(
            Dialect::from_filename("pass.phC"),
            Some(Dialect::SingleBand {
                label: Some("C".into())
            })
        );
        assert_eq!(Dialect::from_filename("pass.ph"), None);
        assert_eq!(Dialect::from_filename("pass.txt"), None);
    }

    #[test]
    fn sniffing_recognises_two_band_start_line() {
        let text = "2025-01-30 17:19:41.000000\n2025-01-30 17:26:25.000000\n";
        assert_eq!(Dialect::sniff(text), Some(Dialect::TwoBand));
    }

    #[test]
    fn unknown_dialect_names_the_extension() {
        let err = Dialect::detect("notes.txt", "hello\n").unwrap_err();
        assert_eq!(err, ParseError::UnknownDialect("txt".into()));
    }
}
