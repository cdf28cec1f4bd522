//! Data carried across port boundaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use scenescript_domain::Row;

/// Raw sheet contents: headers in sheet order plus rows keyed by header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetData {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

/// The last scenario sheet that was opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastAccess {
    pub source: String,
    #[serde(default)]
    pub sheet_name: String,
    pub accessed_at: DateTime<Utc>,
}
