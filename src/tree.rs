use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

use crate::bitvec::BitString;
use crate::frequency::FrequencyTable;
use crate::DecompressionError;


/// Bit code per symbol, unique to one Huffman tree. Codes are leaf paths in a
/// full binary tree, so the set is prefix-free by construction.
pub type CodeTable = HashMap<u8, BitString>;


#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Node {

    Leaf { frequency: usize, symbol: u8 },
    Internal { frequency: usize, left: Box<Node>, right: Box<Node> },

}

impl Node {

    pub const fn frequency(&self) -> usize {
        match self {
            Node::Leaf { frequency, .. } |
            Node::Internal { frequency, .. }
                => *frequency
        }
    }

}


/// Heap entry with the mandated deterministic ordering: frequency first, then
/// the leaf symbol (internal nodes sort before every leaf), then a strictly
/// increasing creation sequence so equal internal nodes stay well-ordered.
struct HeapEntry {

    node: Node,
    seq: u64,

}

impl HeapEntry {

    fn key(&self) -> (usize, i16, u64) {
        match &self.node {
            Node::Leaf { frequency, symbol } => (*frequency, *symbol as i16, self.seq),
            Node::Internal { frequency, .. } => (*frequency, -1, self.seq),
        }
    }

}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {

    root: Option<Node>,

}

impl HuffmanTree {

    pub(crate) const fn from_root(root: Option<Node>) -> Self {
        Self { root }
    }


    pub(crate) const fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }


    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }


    /// Builds the tree by greedy minimum-pair merging. The first of the two
    /// extracted nodes becomes the left child. An empty table yields an empty
    /// tree; a single-entry table yields a lone leaf as root.
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Self {

        let mut heap: BinaryHeap<Reverse<HeapEntry>> =
            BinaryHeap::with_capacity(frequencies.len());

        let mut seq = 0_u64;

        for (symbol, count) in frequencies.iter() {
            heap.push(Reverse(HeapEntry {
                node: Node::Leaf { frequency: count, symbol },
                seq,
            }));
            seq += 1;
        }

        while heap.len() > 1 {

            // Unwraps are safe: the loop guard guarantees two entries
            let Reverse(first) = heap.pop().unwrap();
            let Reverse(second) = heap.pop().unwrap();

            heap.push(Reverse(HeapEntry {
                node: Node::Internal {
                    frequency: first.node.frequency() + second.node.frequency(),
                    left: Box::new(first.node),
                    right: Box::new(second.node),
                },
                seq,
            }));
            seq += 1;
        }

        Self {
            root: heap.pop().map(|Reverse(entry)| entry.node),
        }
    }


    /// Walks the tree depth-first, '0' on the left branch and '1' on the
    /// right, recording the path at each leaf. A lone leaf root gets the
    /// single-bit code `0`: a zero-length code could not be observed while
    /// decoding.
    pub fn code_table(&self) -> CodeTable {

        let mut table = CodeTable::new();

        match &self.root {

            None => {}

            Some(Node::Leaf { symbol, .. }) => {
                let mut code = BitString::new();
                code.push_bit(false);
                table.insert(*symbol, code);
            }

            Some(root) => {
                let mut path = BitString::new();
                collect_codes(root, &mut path, &mut table);
            }
        }

        table
    }


    /// Replays the bit sequence against the tree, emitting a symbol and
    /// restarting from the root at every leaf. The sequence must land exactly
    /// on the root when it runs out; anything else is corruption.
    pub fn decode(&self, bits: &BitString) -> Result<Vec<u8>, DecompressionError> {

        let Some(root) = &self.root else {
            return if bits.is_empty() {
                Ok(Vec::new())
            } else {
                Err(DecompressionError::EmptyInput)
            };
        };

        if let Node::Leaf { symbol, .. } = root {

            // Single-symbol tree: the lone code is "0". A set bit would step
            // out of the leaf into a child that does not exist.

            let mut decoded = Vec::with_capacity(bits.len());

            for bit in bits.iter() {
                if bit {
                    return Err(DecompressionError::BitstreamUnderrun);
                }
                decoded.push(*symbol);
            }

            return Ok(decoded);
        }

        let mut decoded = Vec::new();
        let mut node = root;

        for bit in bits.iter() {

            let next = match node {
                Node::Internal { left, right, .. } => if bit { right } else { left },
                // The cursor resets to the root on every leaf, and the root
                // itself is internal here
                Node::Leaf { .. } => unreachable!(),
            };

            match next.as_ref() {

                Node::Leaf { symbol, .. } => {
                    decoded.push(*symbol);
                    node = root;
                }

                internal => {
                    node = internal;
                }
            }
        }

        if !std::ptr::eq(node, root) {
            // Ran out of bits in the middle of a code
            return Err(DecompressionError::BitstreamUnderrun);
        }

        Ok(decoded)
    }

}


fn collect_codes(node: &Node, path: &mut BitString, table: &mut CodeTable) {

    match node {

        Node::Leaf { symbol, .. } => {
            table.insert(*symbol, path.clone());
        }

        Node::Internal { left, right, .. } => {

            path.push_bit(false);
            collect_codes(left, path, table);
            path.pop_bit();

            path.push_bit(true);
            collect_codes(right, path, table);
            path.pop_bit();
        }
    }
}
