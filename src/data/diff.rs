//! Extraction of newly written slots between two ring buffer reads.
//!
//! The server overwrites slots round-robin, so between two reads the fresh
//! data forms one circular run of changed slots. Its boundaries are found
//! by looking for unchanged→changed (start) and changed→unchanged (end)
//! transitions between neighbouring slots.
//!
//! A slot whose new value happens to equal the value it overwrote is
//! indistinguishable from an untouched slot. When that produces zero or
//! several boundary candidates, the pair spanning the longest arc is taken.

use crate::source::{CircularSnapshot, RING_SIZE};

/// Returns the values written into `current` since `previous`, oldest first.
///
/// With no baseline there is nothing to compare against and the result is
/// empty. Identical reads are also empty.
///
/// # Example
///
/// ```
/// use tickwatch::{new_ticks, CircularSnapshot};
///
/// let old = CircularSnapshot::new([10; 100]);
/// let mut slots = [10; 100];
/// slots[98] = 1;
/// slots[99] = 2;
/// slots[0] = 3;
/// let new = CircularSnapshot::new(slots);
///
/// assert_eq!(new_ticks(Some(&old), &new), vec![1, 2, 3]);
/// assert!(new_ticks(None, &new).is_empty());
/// ```
pub fn new_ticks(previous: Option<&CircularSnapshot>, current: &CircularSnapshot) -> Vec<u64> {
    let Some(previous) = previous else {
        return Vec::new();
    };

    if previous == current {
        return Vec::new();
    }

    let (start, end) = write_window(previous, current);
    read_arc(current, start, end)
}

/// Locate the first and last freshly written slot.
fn write_window(previous: &CircularSnapshot, current: &CircularSnapshot) -> (usize, usize) {
    let changed = |i: usize| previous[i] != current[i];

    let mut starts = Vec::new();
    let mut ends = Vec::new();
    for i in 0..RING_SIZE {
        let j = (i + 1) % RING_SIZE;
        if !changed(i) && changed(j) {
            starts.push(j);
        }
        if changed(i) && !changed(j) {
            ends.push(i);
        }
    }

    if let ([start], [end]) = (starts.as_slice(), ends.as_slice()) {
        return (*start, *end);
    }

    if starts.is_empty() {
        starts.push(0);
    }
    if ends.is_empty() {
        ends.push(RING_SIZE - 1);
    }

    let mut best = (starts[0], ends[0]);
    let mut best_len = None;
    for &start in &starts {
        for &end in &ends {
            let len = arc_span(start, end);
            if best_len.map_or(true, |best_len| len > best_len) {
                best_len = Some(len);
                best = (start, end);
            }
        }
    }
    best
}

/// Span used to rank candidate windows.
///
/// A non-wrapping window counts `end - start`, a wrapping one counts every
/// slot it covers.
fn arc_span(start: usize, end: usize) -> usize {
    if start <= end {
        end - start
    } else {
        RING_SIZE - start + end + 1
    }
}

fn read_arc(current: &CircularSnapshot, start: usize, end: usize) -> Vec<u64> {
    let slots = current.as_slice();
    if start <= end {
        slots[start..=end].to_vec()
    } else {
        let mut values = Vec::with_capacity(RING_SIZE - start + end + 1);
        values.extend_from_slice(&slots[start..]);
        values.extend_from_slice(&slots[..=end]);
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(value: u64) -> CircularSnapshot {
        CircularSnapshot::new([value; RING_SIZE])
    }

    fn with_slots(base: &CircularSnapshot, writes: &[(usize, u64)]) -> CircularSnapshot {
        let mut slots = [0; RING_SIZE];
        slots.copy_from_slice(base.as_slice());
        for &(index, value) in writes {
            slots[index] = value;
        }
        CircularSnapshot::new(slots)
    }

    /// Simulates the server: a ring that records ticks round-robin.
    struct Ring {
        slots: [u64; RING_SIZE],
        next: usize,
    }

    impl Ring {
        fn new(fill: u64) -> Self {
            Self {
                slots: [fill; RING_SIZE],
                next: 0,
            }
        }

        fn push(&mut self, value: u64) {
            self.slots[self.next] = value;
            self.next = (self.next + 1) % RING_SIZE;
        }

        fn snapshot(&self) -> CircularSnapshot {
            CircularSnapshot::new(self.slots)
        }
    }

    #[test]
    fn test_no_baseline() {
        assert!(new_ticks(None, &uniform(10)).is_empty());
        assert!(new_ticks(None, &with_slots(&uniform(10), &[(3, 4)])).is_empty());
    }

    #[test]
    fn test_identical_snapshots() {
        let snapshot = with_slots(&uniform(10), &[(7, 1), (8, 2)]);
        assert!(new_ticks(Some(&snapshot), &snapshot.clone()).is_empty());
    }

    #[test]
    fn test_contiguous_run() {
        let old = uniform(10);
        let new = with_slots(&old, &[(40, 5), (41, 6), (42, 7), (43, 8), (44, 9), (45, 11)]);
        assert_eq!(new_ticks(Some(&old), &new), vec![5, 6, 7, 8, 9, 11]);
    }

    #[test]
    fn test_trailing_value_equal_to_overwritten_value_is_invisible() {
        // Slot 45 is rewritten with the value it already held.
        let old = uniform(10);
        let new = with_slots(&old, &[(40, 5), (41, 6), (42, 7), (43, 8), (44, 9), (45, 10)]);
        assert_eq!(new_ticks(Some(&old), &new), vec![5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_wraparound_is_chronological() {
        let old = uniform(10);
        let new = with_slots(&old, &[(98, 1), (99, 2), (0, 3), (1, 4)]);
        assert_eq!(new_ticks(Some(&old), &new), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_run_ending_at_last_slot() {
        let old = uniform(10);
        let new = with_slots(&old, &[(97, 1), (98, 2), (99, 3)]);
        assert_eq!(new_ticks(Some(&old), &new), vec![1, 2, 3]);
    }

    #[test]
    fn test_run_starting_at_first_slot() {
        let old = uniform(10);
        let new = with_slots(&old, &[(0, 1), (1, 2)]);
        assert_eq!(new_ticks(Some(&old), &new), vec![1, 2]);
    }

    #[test]
    fn test_single_slot() {
        let old = uniform(10);
        let new = with_slots(&old, &[(50, 3)]);
        assert_eq!(new_ticks(Some(&old), &new), vec![3]);
    }

    #[test]
    fn test_every_slot_changed_reads_whole_buffer_in_index_order() {
        let old = uniform(10);
        let mut slots = [0; RING_SIZE];
        for (i, slot) in slots.iter_mut().enumerate() {
            *slot = i as u64 + 100;
        }
        let new = CircularSnapshot::new(slots);

        let ticks = new_ticks(Some(&old), &new);
        assert_eq!(ticks.len(), RING_SIZE);
        assert_eq!(ticks.first(), Some(&100));
        assert_eq!(ticks.last(), Some(&199));
    }

    #[test]
    fn test_ambiguous_runs_pick_longest_arc() {
        // Two changed runs: 10..=12 and 20..=29.
        // Candidates: starts {10, 20}, ends {12, 29}.
        // Spans: (10,12)=2, (10,29)=19, (20,12)=93, (20,29)=9.
        let old = uniform(10);
        let mut writes = vec![(10, 1), (11, 2), (12, 3)];
        writes.extend((20..30).map(|i| (i, i as u64)));
        let new = with_slots(&old, &writes);

        let ticks = new_ticks(Some(&old), &new);
        assert_eq!(ticks.len(), 93);
        assert_eq!(ticks[0], 20);
        assert_eq!(ticks[9], 29);
        assert_eq!(&ticks[90..], &[1, 2, 3]);
    }

    #[test]
    fn test_ambiguous_runs_may_wrap() {
        // Runs 10..=14 and 60..=64: starts {10, 60}, ends {14, 64}.
        // Spans: (10,14)=4, (10,64)=54, (60,14)=55, (60,64)=4.
        let old = uniform(10);
        let writes: Vec<_> = (10..15).chain(60..65).map(|i| (i, 1000 + i as u64)).collect();
        let new = with_slots(&old, &writes);

        let ticks = new_ticks(Some(&old), &new);
        assert_eq!(ticks.len(), 55);
        assert_eq!(ticks[0], 1060);
        assert_eq!(*ticks.last().unwrap(), 1014);
    }

    #[test]
    fn test_ambiguous_tie_keeps_first_pair() {
        // Runs 10..=14 and 60..=65: starts {10, 60}, ends {14, 65}.
        // Spans: (10,14)=4, (10,65)=55, (60,14)=55, (60,65)=5.
        let old = uniform(10);
        let writes: Vec<_> = (10..15).chain(60..66).map(|i| (i, 1000 + i as u64)).collect();
        let new = with_slots(&old, &writes);

        let ticks = new_ticks(Some(&old), &new);
        assert_eq!(ticks.len(), 56);
        assert_eq!(ticks[0], 1010);
        assert_eq!(*ticks.last().unwrap(), 1065);
    }

    #[test]
    fn test_arc_span() {
        assert_eq!(arc_span(40, 44), 4);
        assert_eq!(arc_span(0, 99), 99);
        assert_eq!(arc_span(98, 1), 4);
        assert_eq!(arc_span(5, 5), 0);
    }

    #[test]
    fn test_consecutive_polls_reproduce_tick_stream() {
        let mut ring = Ring::new(0);
        let mut previous = None;
        let mut written = Vec::new();
        let mut extracted = Vec::new();
        let mut value = 50_000_000u64;

        // Mix of batch sizes, including ones that wrap the ring.
        let batches = [0, 37, 1, 99, 50, 63, 12, 98, 2, 75, 40];
        for batch in batches {
            for _ in 0..batch {
                value += 7_919;
                ring.push(value);
                written.push(value);
            }
            let current = ring.snapshot();
            extracted.extend(new_ticks(previous.as_ref(), &current));
            previous = Some(current);
        }

        // The first read only establishes the baseline.
        assert_eq!(extracted, written);
    }
}
