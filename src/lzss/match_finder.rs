use rustc_hash::FxHashMap;

/// Minimum match length, and the width of the index key: a window of
/// exactly `MIN_MATCH` bytes packs into one u32 key.
pub const MIN_MATCH: usize = 4;
/// Longest run one reference may claim: an 8-bit length field biased by
/// `MIN_MATCH`, giving the range [4, 259].
pub const MAX_MATCH: usize = (1 << 8) - 1 + MIN_MATCH;
/// Distances are stored biased by one, so the shortest copy is one byte
/// back and a 16-bit field reaches the whole window.
pub const MIN_DISTANCE: usize = 1;
/// Sliding search window size.
pub const WINDOW: usize = (1 << 16) + MIN_DISTANCE;

/// A contiguous run at `pos` of `len` bytes duplicating the bytes that
/// start at `src` in the already-processed prefix. `len` may exceed
/// `pos - src`: the copy then reads cyclically from what it has itself
/// just written (run-length expansion of short repeating patterns).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub pos: usize,
    pub len: usize,
    pub src: usize,
}

/// Incrementally maintained index from each `MIN_MATCH`-byte substring
/// inside the sliding window to the ascending list of positions where it
/// occurs. Owned by a single encode pass and discarded with it.
pub struct MatchFinder<'a> {
    data: &'a [u8],
    index: FxHashMap<u32, Vec<u32>>,
    /// Next position not yet inserted into the index.
    insert_from: usize,
    /// Next position not yet evicted from the index.
    evict_from: usize,
}

impl<'a> MatchFinder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            index: FxHashMap::default(),
            insert_from: 0,
            evict_from: 0,
        }
    }

    fn key_at(&self, position: usize) -> u32 {
        u32::from_be_bytes(
            self.data[position..position + MIN_MATCH]
                .try_into()
                .expect("key window"),
        )
    }

    /// Slide the index up to `position`: insert every newly-in-range
    /// position (those with a full key window) and evict the ones fallen
    /// more than `WINDOW - 1` behind. True sliding maintenance, never a
    /// rebuild.
    fn advance(&mut self, position: usize) {
        let insert_to = (position + 1).min(self.data.len().saturating_sub(MIN_MATCH) + 1);
        while self.insert_from < insert_to {
            let key = self.key_at(self.insert_from);
            self.index
                .entry(key)
                .or_default()
                .push(self.insert_from as u32);
            self.insert_from += 1;
        }

        let evict_to = (position + 1).saturating_sub(WINDOW);
        while self.evict_from < evict_to {
            let key = self.key_at(self.evict_from);
            if let Some(positions) = self.index.get_mut(&key) {
                if let Ok(at) = positions.binary_search(&(self.evict_from as u32)) {
                    positions.remove(at);
                }
                if positions.is_empty() {
                    self.index.remove(&key);
                }
            }
            self.evict_from += 1;
        }
    }

    /// Slide to `position` and return the longest backward match starting
    /// there, or `None` when nothing in the window reaches `MIN_MATCH`.
    ///
    /// Candidates all share the first `MIN_MATCH` bytes by key equality.
    /// The length is extended one byte at a time, pruning candidates whose
    /// next byte mismatches; a source whose run overlaps `position` is
    /// re-read cyclically, which is what lets a match claim a length
    /// longer than its own distance. Ties go to the nearest surviving
    /// source.
    pub fn next_match(&mut self, position: usize) -> Option<Match> {
        // No full key window fits at tail positions, so nothing can match.
        if position + MIN_MATCH > self.data.len() {
            return None;
        }
        self.advance(position);

        let positions = self.index.get(&self.key_at(position))?;
        let before = positions.partition_point(|&p| (p as usize) < position);
        if before == 0 {
            return None;
        }

        // Collect in-window candidates nearest first.
        let mut candidates: Vec<usize> = Vec::with_capacity(before);
        for &p in positions[..before].iter().rev() {
            if position - p as usize >= WINDOW {
                break;
            }
            candidates.push(p as usize);
        }
        if candidates.is_empty() {
            return None;
        }

        let data = self.data;
        let mut length = MIN_MATCH;
        'extend: while length < MAX_MATCH {
            if position + length >= data.len() {
                break;
            }
            let target = data[position + length];
            let mut i = 0;
            while i < candidates.len() {
                let src = candidates[i];
                // Cyclic re-read once the source run catches up to the
                // match position.
                let rlength = if src + length >= position {
                    length % (position - src)
                } else {
                    length
                };
                if data[src + rlength] == target {
                    i += 1;
                    continue;
                }
                if candidates.len() == 1 {
                    break 'extend;
                }
                candidates.remove(i);
            }
            length += 1;
        }

        Some(Match {
            pos: position,
            len: length,
            src: candidates[0],
        })
    }
}

#[cfg(test)]
mod test {
    use super::{Match, MatchFinder, MAX_MATCH, MIN_MATCH, WINDOW};

    /// The property every match must satisfy: replaying the cyclic copy
    /// reproduces the original bytes exactly.
    fn assert_copy_replays(data: &[u8], m: Match) {
        let distance = m.pos - m.src;
        for i in 0..m.len {
            assert_eq!(
                data[m.pos + i],
                data[m.src + i % distance.max(1)],
                "byte {} of {:?}",
                i,
                m
            );
        }
    }

    #[test]
    fn finds_simple_repeat_test() {
        let data = b"abcdefgh_abcdefgh";
        let mut finder = MatchFinder::new(data);
        for pos in 0..9 {
            assert_eq!(finder.next_match(pos), None);
        }
        let m = finder.next_match(9).unwrap();
        assert_eq!(m, Match { pos: 9, len: 8, src: 0 });
        assert_copy_replays(data, m);
    }

    #[test]
    fn cyclic_match_exceeds_distance_test() {
        let data = b"abababababababab";
        let mut finder = MatchFinder::new(data);
        finder.next_match(0);
        finder.next_match(1);
        let m = finder.next_match(2).unwrap();
        // Distance 2, but the run extends to the end of the buffer.
        assert_eq!(m.src, 0);
        assert_eq!(m.len, data.len() - 2);
        assert_copy_replays(data, m);
    }

    #[test]
    fn nearest_source_wins_ties_test() {
        let data = b"wxyz--wxyz--wxyz";
        let mut finder = MatchFinder::new(data);
        for pos in 0..12 {
            finder.next_match(pos);
        }
        let m = finder.next_match(12).unwrap();
        assert_eq!(m.src, 6);
        assert_copy_replays(data, m);
    }

    #[test]
    fn length_is_capped_test() {
        let data = vec![0x55_u8; MAX_MATCH + 100];
        let mut finder = MatchFinder::new(&data);
        finder.next_match(0);
        let m = finder.next_match(1).unwrap();
        assert_eq!(m.len, MAX_MATCH);
        assert_copy_replays(&data, m);
    }

    #[test]
    fn no_match_below_minimum_test() {
        let data = b"abcXabcYabcZ";
        let mut finder = MatchFinder::new(data);
        for pos in 0..data.len() - MIN_MATCH {
            assert_eq!(finder.next_match(pos), None, "at {}", pos);
        }
    }

    #[test]
    fn tail_positions_return_none_test() {
        let data = b"tail tail tail tail";
        let mut finder = MatchFinder::new(data);
        for pos in data.len() - MIN_MATCH + 1..=data.len() {
            assert_eq!(finder.next_match(pos), None, "at {}", pos);
        }
        let mut empty = MatchFinder::new(&[]);
        assert_eq!(empty.next_match(0), None);
    }

    #[test]
    fn eviction_forgets_old_positions_test() {
        // A marker at the start, noise that never repeats it, then the
        // marker again once the window has slid past the first copy.
        let mut data = Vec::with_capacity(WINDOW + 16);
        data.extend_from_slice(b"MRKR");
        let mut x: u32 = 0x2545_f491;
        while data.len() < WINDOW + 8 {
            // Cheap xorshift noise, avoiding the marker byte values.
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            data.push((x % 64) as u8);
        }
        data.extend_from_slice(b"MRKR!");
        let marker_pos = data.len() - 5;

        let mut finder = MatchFinder::new(&data);
        let mut pos = 0;
        while pos + MIN_MATCH < data.len() {
            if let Some(m) = finder.next_match(pos) {
                assert_copy_replays(&data, m);
                assert!(
                    pos != marker_pos || m.src != 0,
                    "matched a source outside the window"
                );
                pos += m.len;
            } else {
                pos += 1;
            }
        }
    }
}
