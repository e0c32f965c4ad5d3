/// Bit-level helpers for the packed archive.
///
/// Bytes are expanded most-significant bit first; runs of bits are folded
/// back into integers the same way.

/// Expand a byte into 8 bits, MSB first.
pub fn decode_bits(byte: u8) -> [bool; 8] {
    let mut bits = [false; 8];
    for (i, bit) in bits.iter_mut().enumerate() {
        *bit = byte & (0x80 >> i) != 0;
    }
    bits
}

/// Fold a run of bits (MSB first) into an unsigned integer.
pub fn bits_to_uint(bits: &[bool]) -> u32 {
    bits.iter().fold(0, |acc, &b| (acc << 1) | b as u32)
}

/// One door-event slot, assembled from the two 256-byte event arrays.
///
/// Layout (bits numbered MSB first):
///   room     = second[0..3] ++ first[1..3]   (5 bits)
///   tile     = first[3..8] + 1               (5 bits, 1-based)
///   continues = !first[0]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct EventRecord {
    pub room: u8,
    pub tile: u8,
    pub continues: bool,
}

impl EventRecord {
    pub fn from_bytes(first: u8, second: u8) -> Self {
        let f = decode_bits(first);
        let s = decode_bits(second);
        let room_bits = [s[0], s[1], s[2], f[1], f[2]];
        EventRecord {
            room: bits_to_uint(&room_bits) as u8,
            tile: bits_to_uint(&f[3..8]) as u8 + 1,
            continues: !f[0],
        }
    }
}
