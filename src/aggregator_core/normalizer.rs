//! Post normalization from raw scored records to validated aggregation input

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Engagement counters as delivered by the ingestion backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Engagement {
    pub likes: u64,
    #[serde(alias = "retweets")]
    pub reposts: u64,
    pub replies: u64,
    pub views: u64,
    pub bookmarks: u64,
    #[serde(alias = "quote_tweets")]
    pub quoted_reposts: u64,
}

impl Engagement {
    /// Likes + reposts + replies, the dashboard's notion of "engagement"
    ///
    /// Saturates at `u64::MAX` instead of overflowing.
    pub fn interactions(&self) -> u64 {
        self.likes
            .saturating_add(self.reposts)
            .saturating_add(self.replies)
    }

    /// Add another post's counters, saturating per counter
    pub fn accumulate(&mut self, other: &Engagement) {
        self.likes = self.likes.saturating_add(other.likes);
        self.reposts = self.reposts.saturating_add(other.reposts);
        self.replies = self.replies.saturating_add(other.replies);
        self.views = self.views.saturating_add(other.views);
        self.bookmarks = self.bookmarks.saturating_add(other.bookmarks);
        self.quoted_reposts = self.quoted_reposts.saturating_add(other.quoted_reposts);
    }
}

/// A pre-scored post. Produced externally, never mutated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPost {
    #[serde(default, deserialize_with = "deserialize_text_or_number")]
    pub id: String,
    #[serde(default, alias = "username")]
    pub author_handle: String,
    #[serde(default)]
    pub text: String,
    #[serde(default = "missing_score", deserialize_with = "deserialize_score")]
    pub score: f64,
    #[serde(default, deserialize_with = "deserialize_text_or_number")]
    pub created_at: String,
    #[serde(default, deserialize_with = "deserialize_engagement")]
    pub engagement: Engagement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordError {
    MissingAuthor,
    NonFiniteScore,
    UnorderableTimestamp,
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordError::MissingAuthor => write!(f, "missing author handle"),
            RecordError::NonFiniteScore => write!(f, "score is not a finite number"),
            RecordError::UnorderableTimestamp => write!(f, "created_at cannot be ordered"),
        }
    }
}

impl std::error::Error for RecordError {}

/// Diagnostic for a record that was left out of (part of) a pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRecord {
    pub record_id: String,
    pub author_handle: String,
    pub reason: RecordError,
    pub detail: String,
}

impl SkippedRecord {
    fn new(post: &ScoredPost, reason: RecordError, detail: String) -> Self {
        Self {
            record_id: post.id.clone(),
            author_handle: post.author_handle.clone(),
            reason,
            detail,
        }
    }
}

/// A validated post borrowed from the caller's snapshot
#[derive(Debug, Clone, Copy)]
pub struct NormalizedPost<'a> {
    pub post: &'a ScoredPost,
    /// `None` when `created_at` could not be parsed
    pub created_at: Option<DateTime<Utc>>,
    /// Character count of `text`
    pub length: usize,
    /// Position in the input snapshot, used as the stable tie-break
    pub index: usize,
}

impl<'a> NormalizedPost<'a> {
    pub fn score(&self) -> f64 {
        self.post.score
    }

    pub fn author(&self) -> &'a str {
        &self.post.author_handle
    }
}

#[derive(Debug, Clone)]
pub struct NormalizedCorpus<'a> {
    pub posts: Vec<NormalizedPost<'a>>,
    /// Records dropped from every view
    pub skipped: Vec<SkippedRecord>,
    /// Valid records whose timestamp keeps their author out of trend views
    pub unorderable: Vec<SkippedRecord>,
    pub total_records: usize,
}

impl ScoredPost {
    /// Parse a post from a JSONL line
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// Check the fields every view depends on
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.author_handle.trim().is_empty() {
            return Err(RecordError::MissingAuthor);
        }
        if !self.score.is_finite() {
            return Err(RecordError::NonFiniteScore);
        }
        Ok(())
    }

    pub fn parsed_created_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }
}

/// Validate a snapshot, skipping bad records instead of failing the pass
pub fn normalize(posts: &[ScoredPost]) -> NormalizedCorpus<'_> {
    let mut normalized = Vec::with_capacity(posts.len());
    let mut skipped = Vec::new();
    let mut unorderable = Vec::new();

    for (index, post) in posts.iter().enumerate() {
        if let Err(reason) = post.validate() {
            let detail = match reason {
                RecordError::NonFiniteScore => format!("score={}", post.score),
                _ => String::new(),
            };
            log::warn!("⚠️  Skipping record {}: {}", post.id, reason);
            skipped.push(SkippedRecord::new(post, reason, detail));
            continue;
        }

        let created_at = post.parsed_created_at();
        if created_at.is_none() {
            log::debug!(
                "Record {} by {} has unorderable created_at '{}'",
                post.id,
                post.author_handle,
                post.created_at
            );
            unorderable.push(SkippedRecord::new(
                post,
                RecordError::UnorderableTimestamp,
                format!("created_at='{}'", post.created_at),
            ));
        }

        normalized.push(NormalizedPost {
            post,
            created_at,
            length: post.text.chars().count(),
            index,
        });
    }

    NormalizedCorpus {
        posts: normalized,
        skipped,
        unorderable,
        total_records: posts.len(),
    }
}

/// Parse the timestamp formats the ingestion backends emit
///
/// # Accepted
/// - RFC 3339 (`2024-05-01T12:00:00Z`)
/// - Naive ISO-8601, read as UTC (`2024-05-01 12:00:00`, `2024-05-01T12:00:00.123`)
/// - Twitter API (`Wed Oct 10 20:19:24 +0000 2018`)
/// - Integer Unix seconds
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(dt) = DateTime::parse_from_str(raw, "%a %b %d %H:%M:%S %z %Y") {
        return Some(dt.with_timezone(&Utc));
    }

    raw.parse::<i64>()
        .ok()
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
}

fn missing_score() -> f64 {
    f64::NAN
}

/// Scores arrive as numbers, numeric strings or null; anything unusable is NaN
fn deserialize_score<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawScore {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<RawScore>::deserialize(deserializer)? {
        Some(RawScore::Number(v)) => v,
        Some(RawScore::Text(s)) => s.trim().parse().unwrap_or(f64::NAN),
        None => f64::NAN,
    })
}

fn deserialize_text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawField {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<RawField>::deserialize(deserializer)? {
        Some(RawField::Text(s)) => s,
        Some(RawField::Int(v)) => v.to_string(),
        Some(RawField::Float(v)) => v.to_string(),
        None => String::new(),
    })
}

fn deserialize_engagement<'de, D>(deserializer: D) -> Result<Engagement, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Engagement>::deserialize(deserializer)?.unwrap_or_default())
}
