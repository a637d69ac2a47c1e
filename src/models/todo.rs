use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Suffix left on dates by earlier bulk imports; date inputs refuse it.
const DATE_SENTINEL: char = 'T';

const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub notes: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub when: String,
    #[serde(rename = "dueBy", default, deserialize_with = "lenient_text")]
    pub due_by: String,
}

impl Todo {
    pub fn new(
        title: impl Into<String>,
        notes: impl Into<String>,
        when: impl Into<String>,
        due_by: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            notes: notes.into(),
            when: when.into(),
            due_by: due_by.into(),
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn formatted_when(&self) -> &str {
        format_date(&self.when)
    }

    pub fn formatted_due_by(&self) -> &str {
        format_date(&self.due_by)
    }
}

/// Reads whatever an earlier client stored: `null` becomes empty, other
/// non-string values become their JSON text.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Strips exactly one trailing sentinel character, if present.
pub fn format_date(date: &str) -> &str {
    date.strip_suffix(DATE_SENTINEL).unwrap_or(date)
}

/// Value a date-typed input would hold after being given `raw`.
///
/// Empty means "no date". Anything that is not a calendar date once the
/// sentinel is gone is refused with `None`.
pub fn date_input_value(raw: &str) -> Option<String> {
    let date = format_date(raw.trim());
    if date.is_empty() {
        return Some(String::new());
    }
    NaiveDate::parse_from_str(date, DATE_INPUT_FORMAT)
        .ok()
        .map(|d| d.format(DATE_INPUT_FORMAT).to_string())
}
