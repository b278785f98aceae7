use chrono::{Days, NaiveDate};

/// Inclusive date window sized for one extranet query (at most 30 days).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Chunk {
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Splits `[first, last]` into 30-day windows covering it exactly.
///
/// Each window starts 30 days after the previous one regardless of where the
/// previous window ended, so the grid stays aligned to `first + 30·k`; only
/// the final window's end is clamped to `last`. Returns an empty sequence
/// when `last` precedes `first`.
pub fn chunk_range(first: NaiveDate, last: NaiveDate) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut start = first;

    while start <= last {
        let end = start
            .checked_add_days(Days::new(29))
            .map(|candidate| candidate.min(last))
            .unwrap_or(last);
        chunks.push(Chunk { start, end });

        start = match start.checked_add_days(Days::new(30)) {
            Some(next) => next,
            None => break,
        };
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn assert_covers(chunks: &[Chunk], first: NaiveDate, last: NaiveDate) {
        assert_eq!(chunks.first().unwrap().start, first);
        assert_eq!(chunks.last().unwrap().end, last);
        for window in chunks.windows(2) {
            // Grid alignment: next start is exactly 30 days after the
            // previous start, which also leaves no uncovered day.
            assert_eq!((window[1].start - window[0].start).num_days(), 30);
            assert_eq!(window[1].start, window[0].end + Days::new(1));
        }
        for chunk in chunks {
            assert!(chunk.start <= chunk.end);
            assert!(chunk.num_days() <= 30);
        }
    }

    #[test]
    fn test_single_day() {
        let d = date(2026, 3, 1);
        let chunks = chunk_range(d, d);
        assert_eq!(chunks, vec![Chunk { start: d, end: d }]);
    }

    #[test]
    fn test_exactly_thirty_days() {
        let chunks = chunk_range(date(2026, 3, 1), date(2026, 3, 30));
        assert_eq!(chunks.len(), 1);
        assert_covers(&chunks, date(2026, 3, 1), date(2026, 3, 30));
    }

    #[test]
    fn test_thirty_one_days_spills_into_second_chunk() {
        let chunks = chunk_range(date(2026, 3, 1), date(2026, 3, 31));
        assert_eq!(chunks.len(), 2);
        assert_covers(&chunks, date(2026, 3, 1), date(2026, 3, 31));
        assert_eq!(chunks[1].num_days(), 1);
    }

    #[test]
    fn test_forty_five_day_span() {
        let chunks = chunk_range(date(2026, 3, 1), date(2026, 4, 14));
        assert_eq!(chunks.len(), 2);
        assert_covers(&chunks, date(2026, 3, 1), date(2026, 4, 14));
        assert_eq!(chunks[0].end, date(2026, 3, 30));
        assert_eq!(chunks[1].start, date(2026, 3, 31));
    }

    #[test]
    fn test_sixty_one_days_needs_three_chunks() {
        let chunks = chunk_range(date(2026, 1, 1), date(2026, 3, 2));
        assert_eq!(chunks.len(), 3);
        assert_covers(&chunks, date(2026, 1, 1), date(2026, 3, 2));
    }

    #[test]
    fn test_chunk_count_matches_ceiling() {
        let first = date(2026, 2, 10);
        for span in 1..=120i64 {
            let last = first + Days::new(span as u64 - 1);
            let chunks = chunk_range(first, last);
            assert_eq!(chunks.len() as i64, (span + 29) / 30, "span {}", span);
            assert_covers(&chunks, first, last);
        }
    }

    #[test]
    fn test_inverted_range_is_empty() {
        assert!(chunk_range(date(2026, 3, 2), date(2026, 3, 1)).is_empty());
    }
}
