use crate::Result;
use crate::record::BookRecord;

/// Configuration for JSON output
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Pretty print JSON output
    pub pretty: bool,
}

/// Convert one record to JSON
pub fn record_to_json(record: &BookRecord, config: &JsonConfig) -> Result<String> {
    if config.pretty { Ok(serde_json::to_string_pretty(record)?) } else { Ok(serde_json::to_string(record)?) }
}

/// Convert a list of records to a JSON array
pub fn records_to_json(records: &[&BookRecord], config: &JsonConfig) -> Result<String> {
    if config.pretty { Ok(serde_json::to_string_pretty(records)?) } else { Ok(serde_json::to_string(records)?) }
}
