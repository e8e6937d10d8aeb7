use std::{collections::BTreeMap, io::Read, path::Path};

use crate::foundation::error::{ScorecastError, ScorecastResult};

/// Parameter name -> string value, as one row of the input table (minus `timestamp`).
///
/// Two sets are equal iff every key/value pair matches exactly.
pub type ParamSet = BTreeMap<String, String>;

/// Header name of the mandatory time column.
pub const TIMESTAMP_COLUMN: &str = "timestamp";

/// One timestamped parameter snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// Seconds from the start of the overlay.
    pub timestamp: f64,
    /// Every non-`timestamp` column of the row.
    pub params: ParamSet,
}

impl Event {
    pub fn new(timestamp: f64, params: ParamSet) -> Self {
        Self { timestamp, params }
    }
}

/// Events sorted ascending by timestamp. Never empty; immutable once built.
#[derive(Clone, Debug)]
pub struct Timeline {
    events: Vec<Event>,
}

impl Timeline {
    /// Build a timeline from unsorted events.
    ///
    /// The sort is stable, so rows sharing a timestamp keep their input order and the later row
    /// wins during resolution.
    pub fn from_events(mut events: Vec<Event>) -> ScorecastResult<Self> {
        if events.is_empty() {
            return Err(ScorecastError::malformed_input(
                "input table contains no events",
            ));
        }
        events.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
        Ok(Self { events })
    }

    /// Read a CSV table (header line first) from `path`.
    pub fn from_path(path: &Path) -> ScorecastResult<Self> {
        let file = std::fs::File::open(path).map_err(|e| {
            ScorecastError::malformed_input(format!(
                "cannot open input table '{}': {e}",
                path.display()
            ))
        })?;
        Self::load(file)
    }

    /// Parse a CSV table with a `timestamp` column plus arbitrary string columns.
    ///
    /// Rows may be shorter than the header: their missing columns are simply absent from the
    /// event's parameters. Fields past the header are ignored.
    pub fn load<R: Read>(reader: R) -> ScorecastResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|e| ScorecastError::malformed_input(format!("cannot read header: {e}")))?
            .clone();
        let ts_col = headers
            .iter()
            .position(|h| h == TIMESTAMP_COLUMN)
            .ok_or_else(|| {
                ScorecastError::malformed_input(format!(
                    "header has no '{TIMESTAMP_COLUMN}' column"
                ))
            })?;

        let mut events = Vec::new();
        for (row_idx, record) in rdr.records().enumerate() {
            let row = row_idx + 1;
            let record = record
                .map_err(|e| ScorecastError::malformed_input(format!("row {row}: {e}")))?;

            let raw_ts = record.get(ts_col).unwrap_or_default();
            let timestamp = parse_timestamp(raw_ts).ok_or_else(|| {
                ScorecastError::malformed_input(format!(
                    "row {row}: timestamp '{raw_ts}' is not a decimal number"
                ))
            })?;

            if record.len() > headers.len() {
                tracing::debug!(
                    row,
                    fields = record.len(),
                    columns = headers.len(),
                    "ignoring fields past the header"
                );
            }

            let params = headers
                .iter()
                .zip(record.iter())
                .enumerate()
                .filter(|(col, _)| *col != ts_col)
                .map(|(_, (k, v))| (k.to_owned(), v.to_owned()))
                .collect::<ParamSet>();
            events.push(Event::new(timestamp, params));
        }

        let timeline = Self::from_events(events)?;
        tracing::debug!(
            events = timeline.len(),
            first = timeline.first().timestamp,
            last = timeline.last().timestamp,
            "loaded timeline"
        );
        Ok(timeline)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// `true` when the timeline holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn first(&self) -> &Event {
        &self.events[0]
    }

    pub fn last(&self) -> &Event {
        &self.events[self.events.len() - 1]
    }

    /// Duration used when none is configured: one second past the last change.
    pub fn default_duration(&self) -> f64 {
        self.last().timestamp + 1.0
    }

    /// Start a forward-only resolver at the first event.
    pub fn cursor(&self) -> TimelineCursor<'_> {
        TimelineCursor {
            events: &self.events,
            idx: 0,
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Forward-only clock resolver over a [`Timeline`].
///
/// Ordering contract: `resolve` is called with non-decreasing clock times. The cursor only ever
/// advances; an earlier clock time after a later one resolves to the current position.
#[derive(Clone, Debug)]
pub struct TimelineCursor<'a> {
    events: &'a [Event],
    idx: usize,
}

impl<'a> TimelineCursor<'a> {
    /// Return the last event with `timestamp <= clock_secs`, or the first event when the clock
    /// precedes every event (held-before-start).
    pub fn resolve(&mut self, clock_secs: f64) -> (usize, &'a Event) {
        let events = self.events;
        while self.idx + 1 < events.len() && clock_secs >= events[self.idx + 1].timestamp {
            self.idx += 1;
        }
        (self.idx, &events[self.idx])
    }

    /// Index of the most recently resolved event.
    pub fn position(&self) -> usize {
        self.idx
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/store.rs"]
mod tests;
