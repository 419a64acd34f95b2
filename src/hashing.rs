//! MurmurHash3 (x86, 32-bit) as a streaming [`Hasher`].
//!
//! The shootout hashes its 128-bit keys with a fixed seed, so runs are
//! comparable across lock strategies and across processes.

use std::hash::{BuildHasher, Hasher};

const C1: u32 = 0xcc9e_2d51;
const C2: u32 = 0x1b87_3593;

/// Seed the shootout hashes its keys with.
pub const SHOOTOUT_SEED: u32 = 1_146_518_783;

/// Hashes `data` with MurmurHash3_x86_32.
pub fn murmur3_x86_32(data: &[u8], seed: u32) -> u32 {
    let mut hasher = Murmur3Hasher::with_seed(seed);
    hasher.write(data);
    hasher.finish32()
}

#[inline]
fn mix_k1(k1: u32) -> u32 {
    k1.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2)
}

#[inline]
fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

/// Streaming MurmurHash3_x86_32. Bytes may arrive in any split; the result
/// equals [`murmur3_x86_32`] over their concatenation.
#[derive(Debug, Clone)]
pub struct Murmur3Hasher {
    h1: u32,
    tail: u32,
    tail_len: u32,
    len: u32,
}

impl Murmur3Hasher {
    pub fn with_seed(seed: u32) -> Self {
        Self {
            h1: seed,
            tail: 0,
            tail_len: 0,
            len: 0,
        }
    }

    /// The 32-bit MurmurHash3 value of everything written so far.
    pub fn finish32(&self) -> u32 {
        let mut h1 = self.h1;
        if self.tail_len > 0 {
            h1 ^= mix_k1(self.tail);
        }
        h1 ^= self.len;
        fmix32(h1)
    }

    fn mix_block(&mut self, k1: u32) {
        self.h1 ^= mix_k1(k1);
        self.h1 = self.h1.rotate_left(13).wrapping_mul(5).wrapping_add(0xe654_6b64);
    }

    fn push_tail(&mut self, byte: u8) {
        self.tail |= u32::from(byte) << (8 * self.tail_len);
        self.tail_len += 1;
        if self.tail_len == 4 {
            let k1 = self.tail;
            self.tail = 0;
            self.tail_len = 0;
            self.mix_block(k1);
        }
    }
}

impl Default for Murmur3Hasher {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl Hasher for Murmur3Hasher {
    fn write(&mut self, mut bytes: &[u8]) {
        self.len = self.len.wrapping_add(bytes.len() as u32);

        // Complete a block left over from the previous write
        while self.tail_len > 0 {
            let Some((&byte, rest)) = bytes.split_first() else {
                return;
            };
            self.push_tail(byte);
            bytes = rest;
        }

        let mut blocks = bytes.chunks_exact(4);
        for block in &mut blocks {
            self.mix_block(u32::from_le_bytes([block[0], block[1], block[2], block[3]]));
        }
        for &byte in blocks.remainder() {
            self.push_tail(byte);
        }
    }

    /// The 32-bit hash is mirrored into both halves, so tables that take
    /// their tag bits from the top of the `u64` still see it.
    fn finish(&self) -> u64 {
        let h = u64::from(self.finish32());
        (h << 32) | h
    }
}

/// [`BuildHasher`] for [`Murmur3Hasher`] with a compile-time seed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Murmur3State<const SEED: u32 = SHOOTOUT_SEED>;

impl<const SEED: u32> BuildHasher for Murmur3State<SEED> {
    type Hasher = Murmur3Hasher;

    fn build_hasher(&self) -> Murmur3Hasher {
        Murmur3Hasher::with_seed(SEED)
    }
}
