//! 1-bit cipher feedback over any block cipher.
//!
//! RustCrypto ships CFB128 (`cfb-mode`) and CFB8 (`cfb8`) but no 1-bit
//! variant, so this one is assembled from the raw block primitive. Bits are
//! processed most significant first within each byte.

use aes::cipher::{Block, BlockEncrypt};

/// Encrypt or decrypt `data` in place. `iv` must be exactly one block long.
pub(super) fn apply<C: BlockEncrypt>(cipher: &C, iv: &[u8], data: &mut [u8], decrypt: bool) {
    let mut register = Block::<C>::clone_from_slice(iv);
    for byte in data.iter_mut() {
        let mut out = 0u8;
        for bit in (0..8).rev() {
            let mut keystream = register.clone();
            cipher.encrypt_block(&mut keystream);
            let input = (*byte >> bit) & 1;
            let output = input ^ (keystream[0] >> 7);
            out |= output << bit;
            // Feedback is always the ciphertext bit.
            shift_in(&mut register[..], if decrypt { input } else { output });
        }
        *byte = out;
    }
}

/// Shift the register left by one bit, inserting `bit` at the low end.
fn shift_in(register: &mut [u8], bit: u8) {
    let mut carry = bit;
    for b in register.iter_mut().rev() {
        let next = *b >> 7;
        *b = (*b << 1) | carry;
        carry = next;
    }
}
