//! Growable bit sequence with explicit byte-boundary padding.
//!
//! Bits are stored MSB-first within each byte, so bit 0 of a group is worth
//! 128 and bit 7 is worth 1. Every bit position past `bits` is kept zeroed,
//! which makes byte-aligning the sequence a no-op and keeps derived equality
//! structural.


#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitString {

    /// The packed bits, most significant bit first.
    bytes: Vec<u8>,
    /// How many leading bits of `bytes` are meaningful.
    bits: usize,

}

impl BitString {

    pub const fn new() -> Self {
        Self {
            bytes: Vec::new(),
            bits: 0,
        }
    }


    pub fn with_capacity(bit_capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(least_bytes_for_bits(bit_capacity)),
            bits: 0,
        }
    }


    pub const fn len(&self) -> usize {
        self.bits
    }


    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }


    /// Zero bits needed to reach the next byte boundary, 0..=7.
    pub const fn padding_bits(&self) -> u8 {
        ((8 - self.bits % 8) % 8) as u8
    }


    pub fn push_bit(&mut self, bit: bool) {

        let offset = self.bits % 8;

        if offset == 0 {
            self.bytes.push((bit as u8) << 7);
        } else {
            // Unwrap is safe: a non-zero offset means the last byte exists
            *self.bytes.last_mut().unwrap() |= (bit as u8) << (7 - offset);
        }

        self.bits += 1;
    }


    /// Removes the last bit and clears its slot, so the unused-bits-are-zero
    /// invariant holds for whatever is pushed next.
    pub fn pop_bit(&mut self) -> Option<bool> {

        if self.bits == 0 {
            return None;
        }

        self.bits -= 1;

        let offset = self.bits % 8;
        let byte_i = self.bits / 8;

        let bit = (self.bytes[byte_i] >> (7 - offset)) & 1 != 0;

        if offset == 0 {
            self.bytes.pop();
        } else {
            self.bytes[byte_i] &= !(1 << (7 - offset));
        }

        Some(bit)
    }


    pub fn get(&self, index: usize) -> Option<bool> {

        if index >= self.bits {
            return None;
        }

        let byte = self.bytes[index / 8];

        Some((byte >> (7 - index % 8)) & 1 != 0)
    }


    pub fn extend(&mut self, other: &BitString) {

        if self.bits % 8 == 0 {

            // Byte-aligned, so the raw bytes can be spliced directly

            self.bytes.extend_from_slice(&other.bytes);
            self.bits += other.bits;

        } else {

            for bit in other.iter() {
                self.push_bit(bit);
            }

        }
    }


    pub fn iter(&self) -> Bits<'_> {
        Bits {
            source: self,
            i: 0,
        }
    }


    /// Byte-aligned view of the sequence plus the number of trailing zero
    /// bits appended to reach the boundary.
    pub fn into_padded_bytes(self) -> (Vec<u8>, u8) {
        let padding = self.padding_bits();
        (self.bytes, padding)
    }


    /// Rebuilds the logical sequence from packed bytes, trimming the last
    /// `padding` bits. `None` when the padding count is outside 0..=7 or
    /// exceeds the total bit count.
    pub fn from_padded_bytes(bytes: &[u8], padding: u8) -> Option<Self> {

        if padding > 7 {
            return None;
        }

        let bits = (bytes.len() * 8).checked_sub(padding as usize)?;

        let mut res = Self {
            bytes: bytes.to_vec(),
            bits,
        };

        // Padding bits carry no data; zero them so equality stays structural
        // even if the caller's last byte had garbage in the padded positions.
        if padding != 0 {
            if let Some(last) = res.bytes.last_mut() {
                *last &= 0xff << padding;
            }
        }

        Some(res)
    }


    pub fn from_bool_slice(bools: &[bool]) -> Self {

        let mut res = Self::with_capacity(bools.len());

        for &b in bools {
            res.push_bit(b);
        }

        res
    }


    pub fn to_bool_slice(&self) -> Box<[bool]> {
        self.iter().collect()
    }

}


pub const fn least_bytes_for_bits(bit_count: usize) -> usize {
    bit_count / 8 + (bit_count % 8 != 0) as usize
}


pub struct Bits<'a> {

    source: &'a BitString,
    i: usize,

}

impl Iterator for Bits<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<Self::Item> {
        let bit = self.source.get(self.i)?;
        self.i += 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.source.len() - self.i;
        (rest, Some(rest))
    }
}


#[cfg(test)]
mod tests {

    use super::*;


    #[test]
    fn check_push_and_get() {

        let expected = [true, true, false, true, false, true, false, true, true, true];

        let v = BitString::from_bool_slice(&expected);

        assert_eq!(v.len(), expected.len());
        assert_eq!(*v.to_bool_slice(), expected);
        assert_eq!(v.get(expected.len()), None);
    }


    #[test]
    fn check_pop_clears_slot() {

        let mut v = BitString::new();

        v.push_bit(true);
        v.push_bit(true);

        assert_eq!(v.pop_bit(), Some(true));

        v.push_bit(false);

        assert_eq!(*v.to_bool_slice(), [true, false]);

        // Popping down to empty releases the byte as well
        assert_eq!(v.pop_bit(), Some(false));
        assert_eq!(v.pop_bit(), Some(true));
        assert_eq!(v.pop_bit(), None);
        assert!(v.is_empty());
    }


    #[test]
    fn check_extend() {

        let a = [true, false, false, true, false];
        let b = [true, false, false, false, false, true];
        let c = [true, false, false, true, false, true, false, false, false, false, true];

        let mut va = BitString::from_bool_slice(&a);
        let vb = BitString::from_bool_slice(&b);

        va.extend(&vb);

        assert_eq!(*va.to_bool_slice(), c);

        // Aligned fast path
        let mut aligned = BitString::from_bool_slice(&[true; 8]);
        aligned.extend(&vb);

        assert_eq!(aligned.len(), 8 + b.len());
        assert_eq!(&aligned.to_bool_slice()[8..], &b);
    }


    #[test]
    fn check_padding_bound() {

        let mut v = BitString::new();

        assert_eq!(v.padding_bits(), 0);

        for i in 1..=16 {
            v.push_bit(true);
            let padding = v.padding_bits();
            assert!(padding <= 7);
            assert_eq!(padding == 0, i % 8 == 0);
        }
    }


    #[test]
    fn check_padded_round_trip() {

        let bools = [true, false, false, true, false, true, false, false, false, false, true];

        let v = BitString::from_bool_slice(&bools);

        let (bytes, padding) = v.clone().into_padded_bytes();

        assert_eq!(padding, 5);
        assert_eq!(bytes.len(), 2);

        let back = BitString::from_padded_bytes(&bytes, padding).unwrap();

        assert_eq!(back, v);
    }


    #[test]
    fn check_msb_first_weighting() {

        // 1001_0110 -> 0x96
        let v = BitString::from_bool_slice(
            &[true, false, false, true, false, true, true, false]
        );

        let (bytes, padding) = v.into_padded_bytes();

        assert_eq!(bytes, [0x96]);
        assert_eq!(padding, 0);
    }


    #[test]
    fn check_invalid_padding_rejected() {

        assert!(BitString::from_padded_bytes(&[0xff], 8).is_none());
        assert!(BitString::from_padded_bytes(&[], 3).is_none());

        assert_eq!(
            BitString::from_padded_bytes(&[], 0).unwrap(),
            BitString::new()
        );
    }


    #[test]
    fn check_garbage_padding_ignored() {

        // Padded positions with set bits must not leak into the sequence

        let clean = BitString::from_padded_bytes(&[0b1010_0000], 5).unwrap();
        let dirty = BitString::from_padded_bytes(&[0b1010_0111], 5).unwrap();

        assert_eq!(clean, dirty);
        assert_eq!(*clean.to_bool_slice(), [true, false, true]);
    }

}
