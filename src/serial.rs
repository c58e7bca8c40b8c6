//! Flat text serialization of the Huffman tree.
//!
//! One line of space-separated tokens, produced breadth-first: an internal
//! node is its frequency alone, a leaf is `<freq> -1 -1 <symbol>`, and a lone
//! `-1` marks an empty tree. Symbol bytes that collide with the format
//! (space, newline, carriage return, backslash) become two-byte escape
//! tokens, so the whole tree always fits on one self-delimited line.

use std::collections::VecDeque;

use crate::tree::{HuffmanTree, Node};
use crate::TreeError;


const SENTINEL: &[u8] = b"-1";


/// A parsed token-stream entry: either a "no child" marker or a node record.
enum Record {

    Sentinel,
    Node { frequency: usize, symbol: Option<u8> },

}


impl HuffmanTree {

    /// Emits the token stream for this tree. Empty tree serializes to an
    /// empty byte string.
    pub fn serialize(&self) -> Vec<u8> {

        let mut out = Vec::new();

        let Some(root) = self.root() else {
            return out;
        };

        let mut queue = VecDeque::new();
        queue.push_back(root);

        while let Some(node) = queue.pop_front() {

            if !out.is_empty() {
                out.push(b' ');
            }

            match node {

                Node::Internal { frequency, left, right } => {
                    out.extend_from_slice(frequency.to_string().as_bytes());
                    queue.push_back(left.as_ref());
                    queue.push_back(right.as_ref());
                }

                Node::Leaf { frequency, symbol } => {
                    out.extend_from_slice(frequency.to_string().as_bytes());
                    out.extend_from_slice(b" -1 -1 ");
                    push_symbol(&mut out, *symbol);
                }
            }
        }

        out
    }


    /// Rebuilds an isomorphic tree from a token stream alone. An empty or
    /// sentinel-first stream yields an empty tree.
    pub fn deserialize(line: &[u8]) -> Result<Self, TreeError> {

        let mut records = parse_records(line)?;

        let root = match records.pop_front() {
            None | Some(Record::Sentinel) => {
                return Ok(Self::from_root(None));
            }
            Some(Record::Node { frequency, symbol }) => {
                ProtoNode { frequency, symbol, left: None, right: None }
            }
        };

        let mut protos = vec![root];

        // Queue of proto indices still waiting for their two child records
        let mut queue = VecDeque::new();
        if protos[0].symbol.is_none() {
            queue.push_back(0_usize);
        }

        while let Some(parent) = queue.pop_front() {

            for right_side in [false, true] {

                let record = records.pop_front()
                    .ok_or(TreeError::ChildCountMismatch)?;

                let Record::Node { frequency, symbol } = record else {
                    // Sentinel: this side has no child
                    continue;
                };

                let child = protos.len();
                protos.push(ProtoNode { frequency, symbol, left: None, right: None });

                if right_side {
                    protos[parent].right = Some(child);
                } else {
                    protos[parent].left = Some(child);
                }

                if symbol.is_none() {
                    queue.push_back(child);
                }
            }
        }

        if !records.is_empty() {
            return Err(TreeError::ChildCountMismatch);
        }

        let root = build_node(&protos, 0)?;

        Ok(Self::from_root(Some(root)))
    }

}


struct ProtoNode {

    frequency: usize,
    symbol: Option<u8>,
    left: Option<usize>,
    right: Option<usize>,

}


fn build_node(protos: &[ProtoNode], index: usize) -> Result<Node, TreeError> {

    let proto = &protos[index];

    if let Some(symbol) = proto.symbol {
        return Ok(Node::Leaf { frequency: proto.frequency, symbol });
    }

    // An internal node must have both children: the tree is full binary
    let (Some(left), Some(right)) = (proto.left, proto.right) else {
        return Err(TreeError::ChildCountMismatch);
    };

    Ok(Node::Internal {
        frequency: proto.frequency,
        left: Box::new(build_node(protos, left)?),
        right: Box::new(build_node(protos, right)?),
    })
}


fn push_symbol(out: &mut Vec<u8>, symbol: u8) {
    match symbol {
        b'\n' => out.extend_from_slice(b"\\n"),
        b'\r' => out.extend_from_slice(b"\\r"),
        b' ' => out.extend_from_slice(b"\\s"),
        b'\\' => out.extend_from_slice(b"\\\\"),
        other => out.push(other),
    }
}


fn parse_symbol(token: &[u8]) -> Result<u8, TreeError> {
    match token {
        [symbol] => Ok(*symbol),
        [b'\\', b'n'] => Ok(b'\n'),
        [b'\\', b'r'] => Ok(b'\r'),
        [b'\\', b's'] => Ok(b' '),
        [b'\\', b'\\'] => Ok(b'\\'),
        other => Err(TreeError::InvalidSymbol(
            String::from_utf8_lossy(other).into_owned()
        )),
    }
}


fn parse_frequency(token: &[u8]) -> Result<usize, TreeError> {
    std::str::from_utf8(token)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| TreeError::InvalidFrequency(
            String::from_utf8_lossy(token).into_owned()
        ))
}


/// Splits the line into tokens and groups them into records. Leaves are
/// recognized by the `-1 -1` pair after their frequency; the symbol token is
/// taken verbatim from its fixed position, so sentinel-looking symbols never
/// confuse the parser.
fn parse_records(line: &[u8]) -> Result<VecDeque<Record>, TreeError> {

    let mut tokens = line
        .split(|&b| b == b' ' || b == b'\n' || b == b'\r')
        .filter(|token| !token.is_empty())
        .peekable();

    let mut records = VecDeque::new();

    while let Some(token) = tokens.next() {

        if token == SENTINEL {
            records.push_back(Record::Sentinel);
            continue;
        }

        let frequency = parse_frequency(token)?;

        if tokens.peek() == Some(&SENTINEL) {

            // Leaf record: <freq> -1 -1 <symbol>

            tokens.next();

            match tokens.next() {
                Some(second) if second == SENTINEL => {}
                _ => return Err(TreeError::UnexpectedEnd),
            }

            let symbol_token = tokens.next().ok_or(TreeError::UnexpectedEnd)?;

            records.push_back(Record::Node {
                frequency,
                symbol: Some(parse_symbol(symbol_token)?),
            });

        } else {
            records.push_back(Record::Node { frequency, symbol: None });
        }
    }

    Ok(records)
}
