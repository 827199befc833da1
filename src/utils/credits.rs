use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use csv::{ReaderBuilder, Trim};
use log::{debug, error, info, warn};
use crate::utils::extract::leading_number;

/// Credits used for any subject code missing from the table.
pub const DEFAULT_CREDITS: u32 = 3;

/// Read-only subject code -> credits lookup, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct CreditTable {
    credits: HashMap<String, u32>,
}

impl CreditTable {
    pub fn empty() -> Self {
        Self::default()
    }

    // Loads the table from a `code,credits` CSV file. Any failure is logged and yields an empty table.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::File::open(path) {
            Ok(file) => {
                let table = Self::from_reader(file);
                info!("Loaded {} subject credits from {}", table.len(), path.display());
                table
            }
            Err(e) => {
                error!("Error loading credits from {}: {}", path.display(), e);
                Self::empty()
            }
        }
    }

    // Parses CSV content, skipping the header row and any malformed record.
    pub fn from_reader<R: Read>(reader: R) -> Self {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut credits = HashMap::new();
        for (line, record) in csv_reader.records().enumerate() {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    debug!("Skipping unreadable credit row {}: {}", line + 2, e);
                    continue;
                }
            };
            let code = record.get(0).unwrap_or("");
            // Leading integer, so "4.0" reads as 4.
            let value = record.get(1).map(leading_number).filter(|c| *c > 0);
            match value {
                Some(value) if !code.is_empty() => {
                    credits.insert(code.to_string(), value);
                }
                _ => debug!("Skipping malformed credit row {}: {:?}", line + 2, record),
            }
        }

        Self { credits }
    }

    pub fn get(&self, code: &str) -> Option<u32> {
        self.credits.get(code).copied()
    }

    // Exact-match lookup; unknown codes fall back to DEFAULT_CREDITS with a warning.
    pub fn credits_for(&self, code: &str) -> u32 {
        match self.get(code) {
            Some(credits) => credits,
            None => {
                warn!("Subject code {} not found in credit table, using default {} credits", code, DEFAULT_CREDITS);
                DEFAULT_CREDITS
            }
        }
    }

    pub fn len(&self) -> usize {
        self.credits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credits.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for CreditTable {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        Self {
            credits: iter.into_iter().map(|(code, credits)| (code.into(), credits)).collect(),
        }
    }
}
