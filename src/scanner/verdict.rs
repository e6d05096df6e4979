use crate::storage::ObjectTag;

/// Token the scanner prints on every line that reports a detection.
pub const DETECTION_MARKER: &str = "FOUND";

/// Tag written onto every scanned object.
pub const CLEAN_TAG_KEY: &str = "is_clean";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanVerdict {
    Clean,
    Infected,
}

impl ScanVerdict {
    /// Classifies captured scanner output. Anything without a detection marker is clean.
    pub fn from_output(output: &str) -> Self {
        if output.contains(DETECTION_MARKER) {
            Self::Infected
        } else {
            Self::Clean
        }
    }

    pub const fn is_clean(self) -> bool {
        matches!(self, Self::Clean)
    }

    pub const fn tag_value(self) -> &'static str {
        if self.is_clean() { "true" } else { "false" }
    }

    pub fn to_tag(self) -> ObjectTag {
        ObjectTag::new(CLEAN_TAG_KEY, self.tag_value())
    }
}

#[derive(Debug, Clone)]
pub struct ScanReport {
    verdict: ScanVerdict,
    exit_code: Option<i32>,
    output: String,
}

impl ScanReport {
    pub fn new(exit_code: Option<i32>, output: String) -> Self {
        Self {
            verdict: ScanVerdict::from_output(&output),
            exit_code,
            output,
        }
    }

    pub const fn get_verdict(&self) -> ScanVerdict {
        self.verdict
    }

    pub const fn get_exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    pub fn get_output(&self) -> &str {
        &self.output
    }
}
