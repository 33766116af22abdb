//! AES-256 block cipher (FIPS 197)
//!
//! Single-block encrypt/decrypt over a 16-byte block with a 14-round key
//! schedule. Chaining, padding and IV handling live in [`crate::cbc`].
//!
//! The state is a 4×4 byte matrix indexed `state[row][col]`, loaded
//! column-major from the block. Every round step takes a state by value and
//! returns a new one.

use zeroize::Zeroize;

use crate::gf::gmul;
use crate::{BLOCK_SIZE, KEY_SIZE};

/// A single 128-bit cipher block
pub type Block = [u8; BLOCK_SIZE];

type State = [[u8; 4]; 4];
type Word = [u8; 4];

/// Words in the cipher key (Nk)
const KEY_WORDS: usize = KEY_SIZE / 4;

/// Number of rounds (Nr)
const ROUNDS: usize = 14;

/// Words in the expanded schedule: 4 * (Nr + 1)
const SCHEDULE_WORDS: usize = 4 * (ROUNDS + 1);

/// Round constants x^(i-1) in GF(2^8), indexed by i / Nk
const RCON: [u8; 8] = [0x00, 0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40];

/// Forward substitution box (FIPS 197 figure 7)
const SBOX: [u8; 256] = [
    0x63, 0x7c, 0x77, 0x7b, 0xf2, 0x6b, 0x6f, 0xc5, 0x30, 0x01, 0x67, 0x2b, 0xfe, 0xd7, 0xab, 0x76,
    0xca, 0x82, 0xc9, 0x7d, 0xfa, 0x59, 0x47, 0xf0, 0xad, 0xd4, 0xa2, 0xaf, 0x9c, 0xa4, 0x72, 0xc0,
    0xb7, 0xfd, 0x93, 0x26, 0x36, 0x3f, 0xf7, 0xcc, 0x34, 0xa5, 0xe5, 0xf1, 0x71, 0xd8, 0x31, 0x15,
    0x04, 0xc7, 0x23, 0xc3, 0x18, 0x96, 0x05, 0x9a, 0x07, 0x12, 0x80, 0xe2, 0xeb, 0x27, 0xb2, 0x75,
    0x09, 0x83, 0x2c, 0x1a, 0x1b, 0x6e, 0x5a, 0xa0, 0x52, 0x3b, 0xd6, 0xb3, 0x29, 0xe3, 0x2f, 0x84,
    0x53, 0xd1, 0x00, 0xed, 0x20, 0xfc, 0xb1, 0x5b, 0x6a, 0xcb, 0xbe, 0x39, 0x4a, 0x4c, 0x58, 0xcf,
    0xd0, 0xef, 0xaa, 0xfb, 0x43, 0x4d, 0x33, 0x85, 0x45, 0xf9, 0x02, 0x7f, 0x50, 0x3c, 0x9f, 0xa8,
    0x51, 0xa3, 0x40, 0x8f, 0x92, 0x9d, 0x38, 0xf5, 0xbc, 0xb6, 0xda, 0x21, 0x10, 0xff, 0xf3, 0xd2,
    0xcd, 0x0c, 0x13, 0xec, 0x5f, 0x97, 0x44, 0x17, 0xc4, 0xa7, 0x7e, 0x3d, 0x64, 0x5d, 0x19, 0x73,
    0x60, 0x81, 0x4f, 0xdc, 0x22, 0x2a, 0x90, 0x88, 0x46, 0xee, 0xb8, 0x14, 0xde, 0x5e, 0x0b, 0xdb,
    0xe0, 0x32, 0x3a, 0x0a, 0x49, 0x06, 0x24, 0x5c, 0xc2, 0xd3, 0xac, 0x62, 0x91, 0x95, 0xe4, 0x79,
    0xe7, 0xc8, 0x37, 0x6d, 0x8d, 0xd5, 0x4e, 0xa9, 0x6c, 0x56, 0xf4, 0xea, 0x65, 0x7a, 0xae, 0x08,
    0xba, 0x78, 0x25, 0x2e, 0x1c, 0xa6, 0xb4, 0xc6, 0xe8, 0xdd, 0x74, 0x1f, 0x4b, 0xbd, 0x8b, 0x8a,
    0x70, 0x3e, 0xb5, 0x66, 0x48, 0x03, 0xf6, 0x0e, 0x61, 0x35, 0x57, 0xb9, 0x86, 0xc1, 0x1d, 0x9e,
    0xe1, 0xf8, 0x98, 0x11, 0x69, 0xd9, 0x8e, 0x94, 0x9b, 0x1e, 0x87, 0xe9, 0xce, 0x55, 0x28, 0xdf,
    0x8c, 0xa1, 0x89, 0x0d, 0xbf, 0xe6, 0x42, 0x68, 0x41, 0x99, 0x2d, 0x0f, 0xb0, 0x54, 0xbb, 0x16,
];

const INV_SBOX: [u8; 256] = [
    0x52, 0x09, 0x6a, 0xd5, 0x30, 0x36, 0xa5, 0x38, 0xbf, 0x40, 0xa3, 0x9e, 0x81, 0xf3, 0xd7, 0xfb,
    0x7c, 0xe3, 0x39, 0x82, 0x9b, 0x2f, 0xff, 0x87, 0x34, 0x8e, 0x43, 0x44, 0xc4, 0xde, 0xe9, 0xcb,
    0x54, 0x7b, 0x94, 0x32, 0xa6, 0xc2, 0x23, 0x3d, 0xee, 0x4c, 0x95, 0x0b, 0x42, 0xfa, 0xc3, 0x4e,
    0x08, 0x2e, 0xa1, 0x66, 0x28, 0xd9, 0x24, 0xb2, 0x76, 0x5b, 0xa2, 0x49, 0x6d, 0x8b, 0xd1, 0x25,
    0x72, 0xf8, 0xf6, 0x64, 0x86, 0x68, 0x98, 0x16, 0xd4, 0xa4, 0x5c, 0xcc, 0x5d, 0x65, 0xb6, 0x92,
    0x6c, 0x70, 0x48, 0x50, 0xfd, 0xed, 0xb9, 0xda, 0x5e, 0x15, 0x46, 0x57, 0xa7, 0x8d, 0x9d, 0x84,
    0x90, 0xd8, 0xab, 0x00, 0x8c, 0xbc, 0xd3, 0x0a, 0xf7, 0xe4, 0x58, 0x05, 0xb8, 0xb3, 0x45, 0x06,
    0xd0, 0x2c, 0x1e, 0x8f, 0xca, 0x3f, 0x0f, 0x02, 0xc1, 0xaf, 0xbd, 0x03, 0x01, 0x13, 0x8a, 0x6b,
    0x3a, 0x91, 0x11, 0x41, 0x4f, 0x67, 0xdc, 0xea, 0x97, 0xf2, 0xcf, 0xce, 0xf0, 0xb4, 0xe6, 0x73,
    0x96, 0xac, 0x74, 0x22, 0xe7, 0xad, 0x35, 0x85, 0xe2, 0xf9, 0x37, 0xe8, 0x1c, 0x75, 0xdf, 0x6e,
    0x47, 0xf1, 0x1a, 0x71, 0x1d, 0x29, 0xc5, 0x89, 0x6f, 0xb7, 0x62, 0x0e, 0xaa, 0x18, 0xbe, 0x1b,
    0xfc, 0x56, 0x3e, 0x4b, 0xc6, 0xd2, 0x79, 0x20, 0x9a, 0xdb, 0xc0, 0xfe, 0x78, 0xcd, 0x5a, 0xf4,
    0x1f, 0xdd, 0xa8, 0x33, 0x88, 0x07, 0xc7, 0x31, 0xb1, 0x12, 0x10, 0x59, 0x27, 0x80, 0xec, 0x5f,
    0x60, 0x51, 0x7f, 0xa9, 0x19, 0xb5, 0x4a, 0x0d, 0x2d, 0xe5, 0x7a, 0x9f, 0x93, 0xc9, 0x9c, 0xef,
    0xa0, 0xe0, 0x3b, 0x4d, 0xae, 0x2a, 0xf5, 0xb0, 0xc8, 0xeb, 0xbb, 0x3c, 0x83, 0x53, 0x99, 0x61,
    0x17, 0x2b, 0x04, 0x7e, 0xba, 0x77, 0xd6, 0x26, 0xe1, 0x69, 0x14, 0x63, 0x55, 0x21, 0x0c, 0x7d,
];

/// Expanded round keys: 15 × 16 bytes. Zeroized on drop.
#[derive(Clone)]
pub struct KeySchedule {
    round_keys: [Block; ROUNDS + 1],
}

impl KeySchedule {
    pub fn round_key(&self, round: usize) -> &Block {
        &self.round_keys[round]
    }

    pub const fn rounds(&self) -> usize {
        ROUNDS
    }
}

impl Drop for KeySchedule {
    fn drop(&mut self) {
        self.round_keys.zeroize();
    }
}

impl std::fmt::Debug for KeySchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeySchedule")
            .field("rounds", &ROUNDS)
            .field("round_keys", &"[REDACTED]")
            .finish()
    }
}

fn sub_word(w: Word) -> Word {
    w.map(|b| SBOX[b as usize])
}

fn rot_word([a, b, c, d]: Word) -> Word {
    [b, c, d, a]
}

fn xor_word(a: Word, b: Word) -> Word {
    [a[0] ^ b[0], a[1] ^ b[1], a[2] ^ b[2], a[3] ^ b[3]]
}

/// Expand a 256-bit key into the 60-word schedule.
pub fn expand_key(key: &[u8; KEY_SIZE]) -> KeySchedule {
    let mut w = [[0u8; 4]; SCHEDULE_WORDS];
    for (i, chunk) in key.chunks_exact(4).enumerate() {
        w[i].copy_from_slice(chunk);
    }

    for i in KEY_WORDS..SCHEDULE_WORDS {
        let prev = w[i - 1];
        let temp = match i % KEY_WORDS {
            0 => {
                let mut t = sub_word(rot_word(prev));
                t[0] ^= RCON[i / KEY_WORDS];
                t
            }
            // AES-256 only: extra SubWord halfway through each key-length stride
            4 => sub_word(prev),
            _ => prev,
        };
        w[i] = xor_word(w[i - KEY_WORDS], temp);
    }

    let mut round_keys = [[0u8; BLOCK_SIZE]; ROUNDS + 1];
    for (round, rk) in round_keys.iter_mut().enumerate() {
        for (col, word) in w[round * 4..round * 4 + 4].iter().enumerate() {
            rk[col * 4..col * 4 + 4].copy_from_slice(word);
        }
    }
    w.zeroize();

    KeySchedule { round_keys }
}

fn load(block: &Block) -> State {
    let mut s = [[0u8; 4]; 4];
    for (i, &byte) in block.iter().enumerate() {
        s[i % 4][i / 4] = byte;
    }
    s
}

fn store(s: &State) -> Block {
    let mut block = [0u8; BLOCK_SIZE];
    for (i, byte) in block.iter_mut().enumerate() {
        *byte = s[i % 4][i / 4];
    }
    block
}

fn add_round_key(mut s: State, rk: &Block) -> State {
    for (i, &k) in rk.iter().enumerate() {
        s[i % 4][i / 4] ^= k;
    }
    s
}

fn sub_bytes(s: State) -> State {
    s.map(|row| row.map(|b| SBOX[b as usize]))
}

fn inv_sub_bytes(s: State) -> State {
    s.map(|row| row.map(|b| INV_SBOX[b as usize]))
}

/// Row r is rotated left by r positions.
fn shift_rows(s: State) -> State {
    let mut out = s;
    for (r, row) in out.iter_mut().enumerate() {
        row.rotate_left(r);
    }
    out
}

fn inv_shift_rows(s: State) -> State {
    let mut out = s;
    for (r, row) in out.iter_mut().enumerate() {
        row.rotate_right(r);
    }
    out
}

/// Multiply each column by the circulant matrix with first row `m`.
fn mix_with(s: State, m: [u8; 4]) -> State {
    let mut out = [[0u8; 4]; 4];
    for c in 0..4 {
        let col = [s[0][c], s[1][c], s[2][c], s[3][c]];
        for (r, out_row) in out.iter_mut().enumerate() {
            out_row[c] = (0..4).fold(0u8, |acc, k| acc ^ gmul(m[(k + 4 - r) % 4], col[k]));
        }
    }
    out
}

fn mix_columns(s: State) -> State {
    mix_with(s, [0x02, 0x03, 0x01, 0x01])
}

fn inv_mix_columns(s: State) -> State {
    mix_with(s, [0x0e, 0x0b, 0x0d, 0x09])
}

/// Encrypt one block.
pub fn encrypt_block(input: &Block, schedule: &KeySchedule) -> Block {
    let mut s = add_round_key(load(input), schedule.round_key(0));
    for round in 1..ROUNDS {
        s = add_round_key(
            mix_columns(shift_rows(sub_bytes(s))),
            schedule.round_key(round),
        );
    }
    s = add_round_key(shift_rows(sub_bytes(s)), schedule.round_key(ROUNDS));
    store(&s)
}

/// Decrypt one block (inverse cipher, round keys in reverse order).
pub fn decrypt_block(input: &Block, schedule: &KeySchedule) -> Block {
    let mut s = add_round_key(load(input), schedule.round_key(ROUNDS));
    for round in (1..ROUNDS).rev() {
        s = inv_mix_columns(add_round_key(
            inv_sub_bytes(inv_shift_rows(s)),
            schedule.round_key(round),
        ));
    }
    s = add_round_key(inv_sub_bytes(inv_shift_rows(s)), schedule.round_key(0));
    store(&s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn unhex<const N: usize>(s: &str) -> [u8; N] {
        let mut out = [0u8; N];
        hex::decode_to_slice(s, &mut out).unwrap();
        out
    }

    #[test]
    fn test_sbox_tables_are_inverse() {
        for b in 0..=255u8 {
            assert_eq!(INV_SBOX[SBOX[b as usize] as usize], b);
        }
    }

    #[test]
    fn test_sbox_spot_values() {
        assert_eq!(SBOX[0x00], 0x63);
        assert_eq!(SBOX[0x53], 0xed);
        assert_eq!(SBOX[0xff], 0x16);
        assert_eq!(INV_SBOX[0x63], 0x00);
    }

    #[test]
    fn test_mix_single_column() {
        // Column db 13 53 45 -> 8e 4d a1 bc
        let mut s = [[0u8; 4]; 4];
        for (r, v) in [0xdb, 0x13, 0x53, 0x45].into_iter().enumerate() {
            s[r][0] = v;
        }
        let out = mix_columns(s);
        assert_eq!([out[0][0], out[1][0], out[2][0], out[3][0]], [0x8e, 0x4d, 0xa1, 0xbc]);
        assert_eq!(inv_mix_columns(out), s);
    }

    #[test]
    fn test_shift_rows_inverse() {
        let block: Block = core::array::from_fn(|i| i as u8);
        let s = load(&block);
        assert_eq!(inv_shift_rows(shift_rows(s)), s);
        // Row 1 rotated left by one
        assert_eq!(shift_rows(s)[1], [s[1][1], s[1][2], s[1][3], s[1][0]]);
    }

    #[test]
    fn test_key_expansion_vector() {
        // FIPS 197 appendix A.3
        let key: [u8; 32] =
            unhex("603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4");
        let schedule = expand_key(&key);

        assert_eq!(schedule.round_key(0)[..], key[..16]);
        assert_eq!(schedule.round_key(1)[..], key[16..]);
        // w8..w11, then w12 (the i mod 8 == 4 SubWord step)
        assert_eq!(
            schedule.round_key(2),
            &unhex::<16>("9ba354118e6925afa51a8b5f2067fcde")
        );
        assert_eq!(schedule.round_key(3)[..4], unhex::<4>("a8b09c1a"));
        assert_eq!(
            schedule.round_key(14),
            &unhex::<16>("fe4890d1e6188d0b046df344706c631e")
        );
    }

    #[test]
    fn test_fips197_c3_vector() {
        let key: [u8; 32] = core::array::from_fn(|i| i as u8);
        let plaintext: Block = unhex("00112233445566778899aabbccddeeff");
        let expected: Block = unhex("8ea2b7ca516745bfeafc49904b496089");

        let schedule = expand_key(&key);
        let ciphertext = encrypt_block(&plaintext, &schedule);
        assert_eq!(ciphertext, expected);
        assert_eq!(decrypt_block(&ciphertext, &schedule), plaintext);
    }

    #[test]
    fn test_schedule_debug_is_redacted() {
        let schedule = expand_key(&[7u8; 32]);
        let dbg = format!("{schedule:?}");
        assert!(dbg.contains("REDACTED"));
        assert!(!dbg.contains("07"));
    }

    proptest! {
        #[test]
        fn block_roundtrip(key: [u8; 32], block: [u8; 16]) {
            let schedule = expand_key(&key);
            let ct = encrypt_block(&block, &schedule);
            prop_assert_eq!(decrypt_block(&ct, &schedule), block);
        }
    }
}
