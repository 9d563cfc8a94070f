// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Deterministic sources of uniform draws.
//!
//! The pipeline only ever asks for "the next number in [0, 1)".  The
//! canonical source is `FxRand`, the small sfc32 generator the minting
//! platform seeds from a token hash, so that a given hash renders the
//! same image here as it does on the platform.  Any `rand` generator
//! can stand in through `RngSource`.

use rand::Rng;

use crate::error::{Error, Result};

/// A stream of uniform draws in [0, 1).  Two sources built from the
/// same seed must yield the same stream.
pub trait RandomSource {
    /// The next draw.
    fn next(&mut self) -> f64;
}

/// The base58 alphabet token hashes are written in.
pub const ALPHABET: &str = "123456789abcdefghijkmnopqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ";

const HASH_PREFIX: &str = "oo";
const HASH_BODY: usize = 49;

/// The platform's generator: sfc32, seeded with four base58-decoded
/// chunks of the token hash.
#[derive(Clone, Debug, PartialEq)]
pub struct FxRand {
    state: [u32; 4],
}

impl FxRand {
    /// Seed from a hash.  The first two characters (the "oo" prefix)
    /// are dropped, the remainder is cut into chunks a quarter of the
    /// full hash length long, and the first four chunks become the
    /// state.  Chunks the hash is too short to provide are zero.
    pub fn from_hash(hash: &str) -> Result<FxRand> {
        let bad = |why: &str| Error::BadHash(hash.to_string(), why.to_string());
        if !hash.is_ascii() {
            return Err(bad("hashes are plain ASCII"));
        }
        let chunk = hash.len() / 4;
        if chunk == 0 {
            return Err(bad("too short"));
        }
        let body = hash.as_bytes().get(2..).unwrap_or(&[]);
        let mut state = [0u32; 4];
        for (slot, piece) in state.iter_mut().zip(body.chunks_exact(chunk)) {
            *slot = b58_decode(piece).ok_or_else(|| bad("not a base58 string"))?;
        }
        Ok(FxRand { state })
    }

    /// Seed directly.
    pub fn from_state(state: [u32; 4]) -> FxRand {
        FxRand { state }
    }

    /// The raw generator state.
    pub fn state(&self) -> [u32; 4] {
        self.state
    }

    /// One step of sfc32.
    pub fn next_u32(&mut self) -> u32 {
        let [a, b, c, d] = self.state;
        let t = a.wrapping_add(b).wrapping_add(d);
        self.state = [
            b ^ (b >> 9),
            c.wrapping_add(c << 3),
            c.rotate_left(21).wrapping_add(t),
            d.wrapping_add(1),
        ];
        t
    }
}

impl RandomSource for FxRand {
    fn next(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }
}

/// Fold base58 digits into a 32-bit word, wrapping on overflow.
fn b58_decode(digits: &[u8]) -> Option<u32> {
    let radix = ALPHABET.len() as u32;
    digits.iter().try_fold(0u32, |acc, &d| {
        let v = ALPHABET.bytes().position(|a| a == d)? as u32;
        Some(acc.wrapping_mul(radix).wrapping_add(v))
    })
}

/// Mint a fresh hash in the platform's shape: "oo" and 49 base58
/// characters.
pub fn random_hash<R: Rng>(rng: &mut R) -> String {
    let alphabet = ALPHABET.as_bytes();
    let body: String = (0..HASH_BODY)
        .map(|_| alphabet[rng.gen_range(0, alphabet.len())] as char)
        .collect();
    format!("{}{}", HASH_PREFIX, body)
}

/// Any `rand` generator as a draw source.
pub struct RngSource<R>(pub R);

impl<R: Rng> RandomSource for RngSource<R> {
    fn next(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}
