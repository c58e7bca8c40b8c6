use std::fs;

use huffman_tree_compression::{compress, decompress};


fn main() {

    let original_text = fs::read("test_data/lorem.txt")
        .unwrap_or_else(|err| panic!("Could not open file: {}", err));

    let compressed = compress(&original_text);

    let decompressed = decompress(
        &compressed.tree,
        compressed.padding_bits,
        &compressed.payload,
    ).unwrap_or_else(|err| panic!("Could not decompress data: {}", err));

    assert_eq!(original_text, decompressed);

    println!("Original size: {} bytes\nPayload size: {} bytes\nTree size: {} bytes\nPadding bits: {}\nCompression ratio: {:.2}",
        original_text.len(),
        compressed.payload.len(),
        compressed.tree.len(),
        compressed.padding_bits,
        original_text.len() as f64 / (compressed.payload.len() + compressed.tree.len()) as f64);

}
