use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use rustc_hash::FxHashMap;

use crate::bitstream::BitReader;
use crate::error::Error;

/// A symbol-to-count table with unique keys, kept ascending by symbol so
/// encode and decode walk identical entry sequences.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FreqTable {
    entries: Vec<(u16, u32)>,
}

impl FreqTable {
    /// Build a table from a slot-per-symbol count array, dropping the
    /// symbols that never occur.
    pub fn from_counts(counts: &[u32]) -> Self {
        let entries = counts
            .iter()
            .enumerate()
            .filter(|(_, &freq)| freq > 0)
            .map(|(sym, &freq)| (sym as u16, freq))
            .collect();
        Self { entries }
    }

    /// Rebuild a table from header entries in any order. Fails if the same
    /// symbol appears twice.
    pub fn from_entries(mut entries: Vec<(u16, u32)>) -> Result<Self, Error> {
        entries.sort_unstable_by_key(|&(sym, _)| sym);
        if entries.windows(2).any(|w| w[0].0 == w[1].0) {
            return Err(Error::InconsistentHeader);
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[(u16, u32)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// One node of the coding tree. Ordered by ascending frequency with ties
/// broken by ascending symbol value, so tree construction is deterministic
/// and the decoder derives the identical tree from the identical table.
#[derive(Debug, Clone)]
pub struct Node {
    freq: u32,
    symbol: u16,
    kind: NodeKind,
}

#[derive(Debug, Clone)]
enum NodeKind {
    Leaf,
    /// Left child decodes bit 0, right child bit 1.
    Kids(Box<Node>, Box<Node>),
}

impl Node {
    fn leaf(symbol: u16, freq: u32) -> Self {
        Self {
            freq,
            symbol,
            kind: NodeKind::Leaf,
        }
    }

    fn parent(left: Node, right: Node) -> Self {
        Self {
            freq: left.freq + right.freq,
            symbol: 0,
            kind: NodeKind::Kids(Box::new(left), Box::new(right)),
        }
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        self.freq
            .cmp(&other.freq)
            .then(self.symbol.cmp(&other.symbol))
    }
}
impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for Node {}

/// A prefix-code tree plus the symbol-to-code lookup table derived from it.
#[derive(Debug, Default, Clone)]
pub struct HuffmanTree {
    root: Option<Box<Node>>,
    codes: FxHashMap<u16, (u64, u8)>,
}

impl HuffmanTree {
    /// Greedy bottom-up construction: repeatedly merge the two lowest
    /// nodes until one root remains. A lone entry is padded with one
    /// synthetic zero-frequency symbol-0 leaf so the tree always has at
    /// least two leaves; an empty table yields an empty tree.
    pub fn from_table(table: &FreqTable) -> Self {
        if table.is_empty() {
            return Self::default();
        }

        let mut queue = BinaryHeap::with_capacity(table.len() + 1);
        for &(symbol, freq) in table.entries() {
            queue.push(Reverse(Node::leaf(symbol, freq)));
        }
        if queue.len() == 1 {
            queue.push(Reverse(Node::leaf(0, 0)));
        }

        while queue.len() > 1 {
            let Reverse(left) = queue.pop().unwrap();
            let Reverse(right) = queue.pop().unwrap();
            queue.push(Reverse(Node::parent(left, right)));
        }
        let root = Box::new(queue.pop().unwrap().0);

        let mut codes = FxHashMap::default();
        build_codes(&root, 0, 0, &mut codes);
        Self {
            root: Some(root),
            codes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The (bits, length) code for a symbol, if it has a leaf.
    pub fn code(&self, symbol: u16) -> Option<(u64, u8)> {
        self.codes.get(&symbol).copied()
    }

    /// Walk the tree one bit at a time from the root - 0 descends left,
    /// 1 descends right - until a leaf is reached. The canonical decode
    /// for every prefix code in this crate.
    pub fn decode_symbol(&self, br: &mut BitReader<'_>) -> Result<u16, Error> {
        let mut node = self.root.as_deref().ok_or(Error::InconsistentHeader)?;
        loop {
            match &node.kind {
                NodeKind::Leaf => return Ok(node.symbol),
                NodeKind::Kids(left, right) => {
                    node = if br.get_bits(1)? == 0 { left } else { right };
                }
            }
        }
    }
}

/// Depth-first walk assigning the root-to-leaf path as each symbol's code.
fn build_codes(node: &Node, bits: u64, len: u8, codes: &mut FxHashMap<u16, (u64, u8)>) {
    match &node.kind {
        NodeKind::Leaf => {
            codes.insert(node.symbol, (bits, len));
        }
        NodeKind::Kids(left, right) => {
            build_codes(left, bits << 1, len + 1, codes);
            build_codes(right, bits << 1 | 1, len + 1, codes);
        }
    }
}
