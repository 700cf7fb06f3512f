//! CRC-8 over polynomial x^8 + x^2 + x + 1 (0x07), seed 0, no reflection,
//! no final XOR (the CRC-8/SMBUS parameter set).

/// Generator polynomial, implicit x^8 term dropped.
pub const POLY: u8 = 0x07;

const TABLE: [u8; 256] = build_table();

#[allow(clippy::cast_possible_truncation)] // i < 256
#[allow(clippy::indexing_slicing)] // i < 256 == TABLE.len()
#[allow(clippy::arithmetic_side_effects)] // loop counters bounded by 256 / 8
const fn build_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u8;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ POLY
            } else {
                crc << 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// CRC-8 of `bytes`, starting from seed 0.
pub fn crc8(bytes: &[u8]) -> u8 {
    update(0, bytes)
}

/// Continue a CRC over more bytes.
pub fn update(crc: u8, bytes: &[u8]) -> u8 {
    bytes.iter().fold(crc, |crc, &b| {
        TABLE.get(usize::from(crc ^ b)).copied().unwrap_or(0)
    })
}
