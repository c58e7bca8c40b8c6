use std::env;
use std::fs;
use std::process;

use huffman_tree_compression::{compress, decompress, DecompressionError};


/// Container layout: the serialized tree on the first line, the padding count
/// on the second, then the raw payload bytes.
fn write_container(tree: &[u8], padding_bits: u8, payload: &[u8]) -> Vec<u8> {

    let mut out = Vec::with_capacity(tree.len() + payload.len() + 4);

    out.extend_from_slice(tree);
    out.push(b'\n');
    out.extend_from_slice(padding_bits.to_string().as_bytes());
    out.push(b'\n');
    out.extend_from_slice(payload);

    out
}


fn parse_container(bytes: &[u8]) -> Result<(&[u8], u8, &[u8]), String> {

    let tree_end = bytes.iter().position(|&b| b == b'\n')
        .ok_or("missing tree line")?;
    let tree = &bytes[..tree_end];

    let rest = &bytes[tree_end + 1..];
    let padding_end = rest.iter().position(|&b| b == b'\n')
        .ok_or("missing padding line")?;

    let padding_bits: u8 = std::str::from_utf8(&rest[..padding_end])
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .ok_or("invalid padding line")?;

    Ok((tree, padding_bits, &rest[padding_end + 1..]))
}


fn run_compress(path: &str) -> Result<(), String> {

    let input = fs::read(path)
        .map_err(|e| format!("Could not read file {}: {}", path, e))?;

    let compressed = compress(&input);
    let container = write_container(
        &compressed.tree,
        compressed.padding_bits,
        &compressed.payload,
    );

    let out_path = format!("{}.htc", path);
    fs::write(&out_path, &container)
        .map_err(|e| format!("Could not write file {}: {}", out_path, e))?;

    let ratio = if input.is_empty() {
        0.0
    } else {
        container.len() as f64 / input.len() as f64 * 100.0
    };

    println!("Wrote {}\nOriginal size: {} bytes\nCompressed size: {} bytes\nDegree of compression: {:.2}%",
        out_path, input.len(), container.len(), ratio);

    Ok(())
}


fn run_decompress(path: &str) -> Result<(), String> {

    let container = fs::read(path)
        .map_err(|e| format!("Could not read file {}: {}", path, e))?;

    let (tree, padding_bits, payload) = parse_container(&container)?;

    let decoded = decompress(tree, padding_bits, payload)
        .map_err(|e: DecompressionError| format!("Could not decompress {}: {}", path, e))?;

    let out_path = format!("{}.out", path);
    fs::write(&out_path, &decoded)
        .map_err(|e| format!("Could not write file {}: {}", out_path, e))?;

    println!("Wrote {} ({} bytes)", out_path, decoded.len());

    Ok(())
}


fn main() {

    let args: Vec<String> = env::args().collect();

    let result = match args.as_slice() {
        [_, mode, path] if mode == "compress" => run_compress(path),
        [_, mode, path] if mode == "decompress" => run_decompress(path),
        _ => {
            eprintln!("Usage: huffman_tree_compression <compress|decompress> <file>");
            process::exit(2);
        }
    };

    if let Err(message) = result {
        eprintln!("{}", message);
        process::exit(1);
    }
}
