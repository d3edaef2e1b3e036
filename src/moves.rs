//! Radius-parameterized path move primitives.
//!
//! A move table holds the 12 path fragments the tracer stitches together:
//! four straight moves of length 2 (one per direction, radius-independent)
//! and eight turn moves, one per (incoming, outgoing) direction pair. Each
//! turn is an optional straight lead of length `1 - r`, a 90-degree arc of
//! radius `r`, and an optional straight trail of length `1 - r`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A travel direction on the doubled-coordinate grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Heading {
    Right,
    Left,
    Up,
    Down,
}

impl Heading {
    /// Unit vector in SVG coordinates (y grows downward).
    fn vector(self) -> (f64, f64) {
        match self {
            Heading::Right => (1.0, 0.0),
            Heading::Left => (-1.0, 0.0),
            Heading::Up => (0.0, -1.0),
            Heading::Down => (0.0, 1.0),
        }
    }

    /// The relative-move command prefix for a segment in this direction,
    /// sign folded into the command text.
    fn segment_prefix(self) -> &'static str {
        match self {
            Heading::Right => "h",
            Heading::Left => "h-",
            Heading::Up => "v-",
            Heading::Down => "v",
        }
    }
}

/// A corner transition, named incoming-then-outgoing.
///
/// The enumeration order fixes both the table index and the arc sweep:
/// the first four turns are counterclockwise (sweep 0), the last four
/// clockwise (sweep 1).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Turn {
    LeftDown,
    UpLeft,
    RightUp,
    DownRight,
    UpRight,
    RightDown,
    DownLeft,
    LeftUp,
}

impl Turn {
    const ALL: [Turn; 8] = [
        Turn::LeftDown,
        Turn::UpLeft,
        Turn::RightUp,
        Turn::DownRight,
        Turn::UpRight,
        Turn::RightDown,
        Turn::DownLeft,
        Turn::LeftUp,
    ];

    fn headings(self) -> (Heading, Heading) {
        match self {
            Turn::LeftDown => (Heading::Left, Heading::Down),
            Turn::UpLeft => (Heading::Up, Heading::Left),
            Turn::RightUp => (Heading::Right, Heading::Up),
            Turn::DownRight => (Heading::Down, Heading::Right),
            Turn::UpRight => (Heading::Up, Heading::Right),
            Turn::RightDown => (Heading::Right, Heading::Down),
            Turn::DownLeft => (Heading::Down, Heading::Left),
            Turn::LeftUp => (Heading::Left, Heading::Up),
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Formats a coordinate the way the path grammar expects: shortest
/// round-trip decimal, integers without a fraction, negative zero
/// normalized to `0`.
pub(crate) fn fmt_num(v: f64) -> String {
    if v == 0.0 {
        String::from("0")
    } else {
        format!("{v}")
    }
}

/// The 12 move fragments for one rounding radius. Immutable once built.
#[derive(Debug)]
pub(crate) struct MoveTable {
    straights: [String; 4], // indexed right, left, up, down
    turns: [String; 8],
}

impl MoveTable {
    pub(crate) fn new(radius: f64) -> Self {
        let straights = [
            String::from("h2"),
            String::from("h-2"),
            String::from("v-2"),
            String::from("v2"),
        ];

        let mut turns: [String; 8] = Default::default();
        for (index, turn) in Turn::ALL.into_iter().enumerate() {
            let (incoming, outgoing) = turn.headings();
            let (ix, iy) = incoming.vector();
            let (ox, oy) = outgoing.vector();
            let sweep = if index > 3 { 1 } else { 0 };

            let mut fragment = String::new();
            if radius < 1.0 {
                fragment.push_str(incoming.segment_prefix());
                fragment.push_str(&fmt_num(1.0 - radius));
            }
            fragment.push_str(&format!(
                "a{r},{r} 0 0,{sweep} {x},{y}",
                r = fmt_num(radius),
                x = fmt_num((ix + ox) * radius),
                y = fmt_num((iy + oy) * radius),
            ));
            if radius < 1.0 {
                fragment.push_str(outgoing.segment_prefix());
                fragment.push_str(&fmt_num(1.0 - radius));
            }
            turns[index] = fragment;
        }

        MoveTable { straights, turns }
    }

    pub(crate) fn straight(&self, heading: Heading) -> &str {
        let index = match heading {
            Heading::Right => 0,
            Heading::Left => 1,
            Heading::Up => 2,
            Heading::Down => 3,
        };
        &self.straights[index]
    }

    pub(crate) fn turn(&self, turn: Turn) -> &str {
        &self.turns[turn.index()]
    }
}

/// Upper bound on distinct radii kept alive at once. Renders past the
/// bound evict an arbitrary entry rather than grow without limit.
const MAX_CACHED_RADII: usize = 16;

/// A concurrency-safe move-table cache keyed by radius.
///
/// Owned by the render pipeline (one per [`QrStyling`](crate::QrStyling),
/// or passed into [`generate_svg`](crate::generate_svg)); it is
/// deliberately not a process-wide singleton.
#[derive(Debug, Default)]
pub struct MoveCache {
    entries: Mutex<HashMap<u64, Arc<MoveTable>>>,
}

impl MoveCache {
    pub fn new() -> Self {
        MoveCache { entries: Mutex::new(HashMap::new()) }
    }

    /// Returns the table for `radius`, building it at most once.
    pub(crate) fn table(&self, radius: f64) -> Arc<MoveTable> {
        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let key = radius.to_bits();
        if let Some(table) = entries.get(&key) {
            return Arc::clone(table);
        }
        if entries.len() >= MAX_CACHED_RADII {
            if let Some(&evict) = entries.keys().next() {
                entries.remove(&evict);
            }
        }
        let table = Arc::new(MoveTable::new(radius));
        entries.insert(key, Arc::clone(&table));
        table
    }
}
