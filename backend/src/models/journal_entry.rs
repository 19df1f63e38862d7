use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the remote collection holding one row per user per day.
pub const JOURNAL_TABLE: &str = "journal_entries";

/// Columns the backend uses to decide between insert and overwrite.
pub const ENTRY_CONFLICT_KEY: [&str; 2] = ["user_id", "entry_date"];

/// Wire format of `entry_date`, matching a Postgres `date`.
pub const ENTRY_DATE_FORMAT: &str = "%Y-%m-%d";

pub const SAVED_STATUS: &str = "Saved ✅";

/// Daily mood rating, always within 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub struct Mood(u8);

impl Mood {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Mood> {
        (Self::MIN..=Self::MAX).map(Mood)
    }

    pub fn emoji(self) -> &'static str {
        match self.0 {
            1 => "😞",
            2 => "😕",
            3 => "😐",
            4 => "🙂",
            _ => "😄",
        }
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "Rough",
            2 => "Meh",
            3 => "Okay",
            4 => "Good",
            _ => "Great",
        }
    }
}

impl Default for Mood {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<i16> for Mood {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Mood::new)
            .ok_or_else(|| format!("Mood must be between 1 and 5, got {value}"))
    }
}

impl From<Mood> for i16 {
    fn from(mood: Mood) -> Self {
        i16::from(mood.0)
    }
}

/// The editable part of an entry. Defaults to a neutral mood and no text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDraft {
    pub mood: Mood,
    pub content: String,
}

/// Row as selected back from storage. Columns may be null.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoredEntry {
    pub mood: Option<i16>,
    pub content: Option<String>,
}

impl From<StoredEntry> for EntryDraft {
    fn from(row: StoredEntry) -> Self {
        Self {
            mood: row
                .mood
                .and_then(|m| Mood::try_from(m).ok())
                .unwrap_or_default(),
            content: row.content.unwrap_or_default(),
        }
    }
}

/// Full row written on save, keyed by `(user_id, entry_date)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub user_id: Uuid,
    pub entry_date: NaiveDate,
    pub mood: Mood,
    pub content: String,
}

impl JournalEntry {
    pub fn new(user_id: Uuid, entry_date: NaiveDate, draft: &EntryDraft) -> Self {
        Self {
            user_id,
            entry_date,
            mood: draft.mood,
            content: draft.content.clone(),
        }
    }
}

pub fn format_entry_date(date: NaiveDate) -> String {
    date.format(ENTRY_DATE_FORMAT).to_string()
}
