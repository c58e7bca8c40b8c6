use std::collections::HashMap;


/// Occurrence count for every byte value present in the input.
///
/// Symbols absent from the input have no entry, so an empty input produces an
/// empty table and the rest of the pipeline short-circuits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {

    counts: HashMap<u8, usize>,

}

impl FrequencyTable {

    pub fn from_bytes(data: &[u8]) -> Self {

        let mut counts: HashMap<u8, usize> = HashMap::new();

        for &byte in data {

            counts.entry(byte)
                .and_modify(|counter| *counter += 1)
                .or_insert(1);
        }

        Self { counts }
    }


    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }


    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }


    pub fn count(&self, symbol: u8) -> usize {
        self.counts.get(&symbol).copied().unwrap_or(0)
    }


    pub fn iter(&self) -> impl Iterator<Item = (u8, usize)> + '_ {
        self.counts.iter().map(|(&symbol, &count)| (symbol, count))
    }

}
