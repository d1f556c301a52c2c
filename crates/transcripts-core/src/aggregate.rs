//! Per-model and dataset-wide statistics
//!
//! Statistics are produced by folding every record into a [`Tally`] and then
//! finishing the tally into an immutable [`DatasetStats`]. Nothing outlives a
//! single call to [`aggregate`].
//!
//! Averages use round-half-up integer division. Any average or rate whose
//! denominator is zero is reported as `0`.

use chrono::{DateTime, NaiveDateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::record::ConversationRecord;

/// Statistics for one distinct model identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelStats {
    pub count: u64,
    pub success_count: u64,
    pub with_ratings_count: u64,
    pub avg_response_length: u64,
    pub avg_introspection_length: u64,
    /// Conversation ids in input order
    pub conversation_ids: Vec<usize>,
}

/// Earliest and latest timestamps, as written in the export
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimestampRange {
    pub earliest: Option<String>,
    pub latest: Option<String>,
}

/// Dataset-wide statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetStats {
    pub total_conversations: u64,
    pub successful_conversations: u64,
    pub conversations_with_ratings: u64,
    pub conversations_with_introspection: u64,
    /// Ordered by count descending, ties by first appearance
    pub models: IndexMap<String, ModelStats>,
    /// Distinct providers in first-seen order
    pub providers: Vec<String>,
    /// Record count per provider, first-seen order
    pub apis: IndexMap<String, u64>,
    /// Percentage in `[0, 100]`
    pub success_rate: f64,
    /// Mean `response_length` over all records
    pub avg_response_length: u64,
    /// Mean `prompt3_response_length` over records that have one
    pub avg_introspection_length: u64,
    /// Over successful records only
    pub min_response_length: u64,
    /// Over successful records only
    pub max_response_length: u64,
    pub timestamps: TimestampRange,
}

/// Integer mean rounded half up; zero when `count` is zero.
///
/// Sums are widened so that lengths near `u64::MAX` cannot overflow.
pub fn round_mean(sum: u128, count: u64) -> u64 {
    if count == 0 {
        return 0;
    }
    let count = u128::from(count);
    let mean = sum / count + u128::from(sum % count * 2 >= count);
    u64::try_from(mean).unwrap_or(u64::MAX)
}

/// Parse an export timestamp. Offsets are honoured; naive timestamps are
/// read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

#[derive(Debug, Default)]
struct ModelTally {
    count: u64,
    success_count: u64,
    rated_count: u64,
    response_length_sum: u128,
    introspection_length_sum: u128,
    conversation_ids: Vec<usize>,
}

impl ModelTally {
    fn finish(self) -> ModelStats {
        ModelStats {
            count: self.count,
            success_count: self.success_count,
            with_ratings_count: self.rated_count,
            avg_response_length: round_mean(self.response_length_sum, self.count),
            avg_introspection_length: round_mean(self.introspection_length_sum, self.count),
            conversation_ids: self.conversation_ids,
        }
    }
}

#[derive(Debug, Default)]
struct Tally {
    total: u64,
    successful: u64,
    rated: u64,
    introspected: u64,
    models: IndexMap<String, ModelTally>,
    apis: IndexMap<String, u64>,
    response_length_sum: u128,
    introspection_length_sum: u128,
    introspection_length_count: u64,
    success_length_range: Option<(u64, u64)>,
    earliest: Option<(DateTime<Utc>, String)>,
    latest: Option<(DateTime<Utc>, String)>,
}

impl Tally {
    fn absorb(mut self, id: usize, record: &ConversationRecord) -> Self {
        self.total += 1;
        self.response_length_sum += u128::from(record.response_length);

        let model = self.models.entry(record.model.clone()).or_default();
        model.count += 1;
        model.response_length_sum += u128::from(record.response_length);
        model.introspection_length_sum += u128::from(record.introspection_length);
        model.conversation_ids.push(id);

        if record.success {
            self.successful += 1;
            model.success_count += 1;
            let len = record.response_length;
            self.success_length_range = Some(match self.success_length_range {
                Some((min, max)) => (min.min(len), max.max(len)),
                None => (len, len),
            });
        }
        if record.is_rated() {
            self.rated += 1;
            model.rated_count += 1;
        }
        if record.has_introspection() {
            self.introspected += 1;
        }
        if record.introspection_length > 0 {
            self.introspection_length_sum += u128::from(record.introspection_length);
            self.introspection_length_count += 1;
        }

        *self.apis.entry(record.api.clone()).or_insert(0) += 1;

        if let Some(raw) = record.timestamp.as_deref() {
            self.observe_timestamp(id, raw);
        }

        self
    }

    fn observe_timestamp(&mut self, id: usize, raw: &str) {
        let Some(ts) = parse_timestamp(raw) else {
            tracing::warn!(record = id, timestamp = raw, "unparseable timestamp");
            return;
        };
        // Strict comparisons keep the first-seen value on ties
        if self.earliest.as_ref().is_none_or(|(e, _)| ts < *e) {
            self.earliest = Some((ts, raw.to_string()));
        }
        if self.latest.as_ref().is_none_or(|(l, _)| ts > *l) {
            self.latest = Some((ts, raw.to_string()));
        }
    }

    fn finish(self) -> DatasetStats {
        let mut models: Vec<(String, ModelStats)> = self
            .models
            .into_iter()
            .map(|(name, tally)| (name, tally.finish()))
            .collect();
        // Stable sort keeps first appearance order among equal counts
        models.sort_by(|a, b| b.1.count.cmp(&a.1.count));

        let success_rate = if self.total == 0 {
            0.0
        } else {
            self.successful as f64 * 100.0 / self.total as f64
        };
        let (min_response_length, max_response_length) =
            self.success_length_range.unwrap_or((0, 0));

        DatasetStats {
            total_conversations: self.total,
            successful_conversations: self.successful,
            conversations_with_ratings: self.rated,
            conversations_with_introspection: self.introspected,
            models: models.into_iter().collect(),
            providers: self.apis.keys().cloned().collect(),
            apis: self.apis,
            success_rate,
            avg_response_length: round_mean(self.response_length_sum, self.total),
            avg_introspection_length: round_mean(
                self.introspection_length_sum,
                self.introspection_length_count,
            ),
            min_response_length,
            max_response_length,
            timestamps: TimestampRange {
                earliest: self.earliest.map(|(_, raw)| raw),
                latest: self.latest.map(|(_, raw)| raw),
            },
        }
    }
}

/// Compute all statistics in one pass over `records`. Record ids are their
/// 0-based positions.
#[tracing::instrument(skip_all, fields(records = records.len()))]
pub fn aggregate(records: &[ConversationRecord]) -> DatasetStats {
    records
        .iter()
        .enumerate()
        .fold(Tally::default(), |tally, (id, record)| {
            tally.absorb(id, record)
        })
        .finish()
}
