//! Self-describing Huffman compression for byte streams.
//!
//! [`compress`] builds an optimal prefix code from the observed byte
//! frequencies (with deterministic tie-breaking, so identical input always
//! produces identical output) and packs the encoded stream into byte-aligned
//! storage. The tree travels alongside the payload as a flat token line, so
//! [`decompress`] can rebuild it without ever seeing the original input.

mod bitvec;
mod frequency;
mod serial;
mod tree;

use std::fmt;

pub use bitvec::{BitString, Bits};
pub use frequency::FrequencyTable;
pub use tree::{CodeTable, HuffmanTree};


/// Reasons a serialized tree token stream cannot be turned back into a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {

    /// A frequency token was not a decimal integer.
    InvalidFrequency(String),
    /// A symbol token was neither a single byte nor a known escape.
    InvalidSymbol(String),
    /// The stream ended in the middle of a leaf record.
    UnexpectedEnd,
    /// The record count does not match the tree shape: a node was left
    /// without its children, or records remained after reconstruction.
    ChildCountMismatch,

}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::InvalidFrequency(token)
                => write!(f, "invalid frequency token {:?}", token),
            TreeError::InvalidSymbol(token)
                => write!(f, "invalid symbol token {:?}", token),
            TreeError::UnexpectedEnd
                => write!(f, "token stream ended mid-record"),
            TreeError::ChildCountMismatch
                => write!(f, "record count does not match the tree shape"),
        }
    }
}

impl std::error::Error for TreeError {}


#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecompressionError {

    /// The serialized tree was empty but the payload still carried bits.
    EmptyInput,
    /// The serialized tree could not be reconstructed.
    MalformedTree(TreeError),
    /// The bit sequence ended in the middle of a code, or stepped out of a
    /// leaf: a corrupted payload or a padding-count mismatch.
    BitstreamUnderrun,
    /// The padding count was outside 0..=7 or exceeded the payload length.
    PaddingOutOfRange(u8),

}

impl fmt::Display for DecompressionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecompressionError::EmptyInput
                => write!(f, "empty tree cannot decode a non-empty payload"),
            DecompressionError::MalformedTree(err)
                => write!(f, "malformed serialized tree: {}", err),
            DecompressionError::BitstreamUnderrun
                => write!(f, "bit sequence ended mid-code"),
            DecompressionError::PaddingOutOfRange(padding)
                => write!(f, "padding count {} is out of range", padding),
        }
    }
}

impl std::error::Error for DecompressionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecompressionError::MalformedTree(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TreeError> for DecompressionError {
    fn from(err: TreeError) -> Self {
        DecompressionError::MalformedTree(err)
    }
}


/// The three artifacts a decoder needs: the packed payload, the serialized
/// tree, and the count of trailing zero bits added to byte-align the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compressed {

    /// Serialized tree: one line of space-separated tokens, no terminator.
    pub tree: Vec<u8>,
    /// Trailing zero bits in the last payload byte, 0..=7.
    pub padding_bits: u8,
    /// The packed code stream, most significant bit first.
    pub payload: Vec<u8>,

}


pub fn compress(input: &[u8]) -> Compressed {

    let frequencies = FrequencyTable::from_bytes(input);

    if frequencies.is_empty() {
        return Compressed {
            tree: Vec::new(),
            padding_bits: 0,
            payload: Vec::new(),
        };
    }

    let tree = HuffmanTree::from_frequencies(&frequencies);
    let table = tree.code_table();

    let mut bits = BitString::with_capacity(input.len());

    for byte in input {
        // Every input byte was counted, so it has a code
        bits.extend(&table[byte]);
    }

    let (payload, padding_bits) = bits.into_padded_bytes();

    Compressed {
        tree: tree.serialize(),
        padding_bits,
        payload,
    }
}


pub fn decompress(
    tree: &[u8],
    padding_bits: u8,
    payload: &[u8],
) -> Result<Vec<u8>, DecompressionError> {

    let tree = HuffmanTree::deserialize(tree)?;

    if padding_bits > 7 {
        return Err(DecompressionError::PaddingOutOfRange(padding_bits));
    }

    let bits = BitString::from_padded_bytes(payload, padding_bits)
        .ok_or(DecompressionError::PaddingOutOfRange(padding_bits))?;

    tree.decode(&bits)
}


#[cfg(test)]
mod tests {

    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;


    fn round_trip(data: &[u8]) {
        let compressed = compress(data);
        let decoded = decompress(
            &compressed.tree,
            compressed.padding_bits,
            &compressed.payload,
        ).unwrap();
        assert_eq!(decoded, data);
    }


    #[test]
    fn check_abracadabra() {

        let compressed = compress(b"ABRACADABRA");

        // 23 code bits: 0 111 10 0 1100 0 1101 0 111 10 0, one pad bit
        assert_eq!(compressed.payload, [0x79, 0x8d, 0x78]);
        assert_eq!(compressed.padding_bits, 1);
        assert_eq!(
            compressed.tree,
            b"11 5 -1 -1 A 6 2 -1 -1 R 4 2 2 -1 -1 B 1 -1 -1 C 1 -1 -1 D"
        );

        round_trip(b"ABRACADABRA");
    }


    #[test]
    fn check_encoded_bit_length() {

        let data = b"ABRACADABRA";

        let frequencies = FrequencyTable::from_bytes(data);
        let table = HuffmanTree::from_frequencies(&frequencies).code_table();

        let expected_bits: usize = frequencies.iter()
            .map(|(symbol, count)| count * table[&symbol].len())
            .sum();

        let compressed = compress(data);

        assert_eq!(
            compressed.payload.len() * 8 - compressed.padding_bits as usize,
            expected_bits
        );
    }


    #[test]
    fn check_empty_input() {

        let compressed = compress(b"");

        assert!(compressed.tree.is_empty());
        assert!(compressed.payload.is_empty());
        assert_eq!(compressed.padding_bits, 0);

        assert_eq!(decompress(b"", 0, b"").unwrap(), Vec::<u8>::new());
    }


    #[test]
    fn check_single_symbol() {

        let compressed = compress(b"AAAA");

        // Code "0" per occurrence: four bits, four bits of padding
        assert_eq!(compressed.payload, [0x00]);
        assert_eq!(compressed.padding_bits, 4);

        round_trip(b"AAAA");
    }


    #[test]
    fn check_determinism() {

        let data = b"deterministic tie-break paths: aabbccddee";

        assert_eq!(compress(data), compress(data));
    }


    #[test]
    fn check_delimiter_collisions_round_trip() {

        round_trip(b"line one\nline two\n");
        round_trip(b" \n\r\\ \n\r\\ -1 -1");
        round_trip(b"\n");
        round_trip(b"\\");
    }


    #[test]
    fn check_all_byte_values() {

        let data: Vec<u8> = (0..=255).collect();

        round_trip(&data);
    }


    #[test]
    fn check_random_round_trips() {

        let mut rng = StdRng::seed_from_u64(0);

        for _ in 0..50 {

            let len = rng.gen_range(1..2000);
            let data: Vec<u8> = (0..len).map(|_| rng.gen()).collect();

            round_trip(&data);
        }
    }


    #[test]
    fn check_padding_out_of_range() {

        let compressed = compress(b"ABRACADABRA");

        assert_eq!(
            decompress(&compressed.tree, 8, &compressed.payload),
            Err(DecompressionError::PaddingOutOfRange(8))
        );

        // A padding count larger than the payload itself
        assert_eq!(
            decompress(&compressed.tree, 3, b""),
            Err(DecompressionError::PaddingOutOfRange(3))
        );
    }


    #[test]
    fn check_truncated_payload_underruns() {

        let compressed = compress(b"ABRACADABRA");

        // Cutting the payload short leaves the cursor mid-code
        assert_eq!(
            decompress(&compressed.tree, 1, &compressed.payload[..2]),
            Err(DecompressionError::BitstreamUnderrun)
        );
    }


    #[test]
    fn check_empty_tree_with_payload() {

        assert_eq!(
            decompress(b"", 0, &[0xff]),
            Err(DecompressionError::EmptyInput)
        );
    }


    #[test]
    fn check_malformed_tree_reported() {

        let compressed = compress(b"ABRACADABRA");

        assert_eq!(
            decompress(&compressed.tree[..compressed.tree.len() - 2], 1, &compressed.payload),
            Err(DecompressionError::MalformedTree(TreeError::UnexpectedEnd))
        );
    }


    #[test]
    fn check_text_file_round_trip() {

        let text = std::fs::read("test_data/lorem.txt")
            .unwrap_or_else(|e| panic!("Could not read test_data/lorem.txt:\n{}", e));

        round_trip(&text);
    }

}
