mod command;
mod job;
mod scanned_object;
mod verdict;

pub use command::{CommandScanner, ScanError, Scanner};
pub use job::{decode_key, scan_object};
pub use scanned_object::ScannedObject;
pub use verdict::{ScanReport, ScanVerdict};
