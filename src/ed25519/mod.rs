//! Ed25519 signatures (RFC 8032, SHA-512 variant, no context, no
//! prehash).
//!
//! Implemented from first principles over the 16-limb field arithmetic
//! in [`field`]: seeds are expanded and clamped with SHA-512, points run
//! through the constant-time ladder in [`curve`], and scalars are
//! reduced mod the group order L by a fixed byte-limb fold. The final
//! comparison in [`verify`] is branch-free.
//!
//! Scalar scratch on the signing path is wiped with volatile writes
//! before return.

pub mod curve;
pub mod field;
pub mod sha512;

/// Signature length in bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// Public key length in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Secret key length in bytes (seed followed by public key).
pub const SECRET_KEY_LENGTH: usize = 64;

/// Seed length in bytes.
pub const SEED_LENGTH: usize = 32;

/// Group order L = 2^252 + 27742317777372353535851937790883648493,
/// little-endian byte limbs.
const L: [i64; 32] = [
    0xed, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58,
    0xd6, 0x9c, 0xf7, 0xa2, 0xde, 0xf9, 0xde, 0x14,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x10,
];

/// Constant-time 32-byte comparison: OR of XORs folded to 0 (equal) or
/// -1 (different), with no data-dependent branch.
pub(crate) fn verify_32(x: &[u8; 32], y: &[u8; 32]) -> i64 {
    let mut d: u32 = 0;
    for i in 0..32 {
        d |= (x[i] ^ y[i]) as u32;
    }
    (1 & (d.wrapping_sub(1) >> 8)) as i64 - 1
}

/// Reduce a 64-byte value mod L into 32 bytes.
fn mod_l(r: &mut [u8], x: &mut [i64; 64]) {
    for i in (32..64).rev() {
        let mut carry: i64 = 0;
        for j in (i - 32)..(i - 12) {
            x[j] += carry - 16 * x[i] * L[j - (i - 32)];
            carry = (x[j] + 128) >> 8;
            x[j] -= carry << 8;
        }
        x[i - 12] += carry;
        x[i] = 0;
    }

    let mut carry: i64 = 0;
    for j in 0..32 {
        x[j] += carry - (x[31] >> 4) * L[j];
        carry = x[j] >> 8;
        x[j] &= 255;
    }
    for j in 0..32 {
        x[j] -= carry * L[j];
    }
    for i in 0..32 {
        x[i + 1] += x[i] >> 8;
        r[i] = (x[i] & 255) as u8;
    }
}

/// Reduce a 64-byte hash output mod L.
fn reduce(h: &[u8; 64]) -> [u8; 32] {
    let mut x = [0i64; 64];
    for (limb, &byte) in x.iter_mut().zip(h.iter()) {
        *limb = byte as i64;
    }
    let mut r = [0u8; 32];
    mod_l(&mut r, &mut x);
    wipe_words(&mut x);
    r
}

/// Volatile-write wipe for secret byte scratch.
fn wipe_bytes(bytes: &mut [u8]) {
    for byte in bytes.iter_mut() {
        unsafe { core::ptr::write_volatile(byte, 0) };
    }
    std::sync::atomic::compiler_fence(std::sync::atomic::Ordering::SeqCst);
}

/// Volatile-write wipe for secret limb scratch.
fn wipe_words(words: &mut [i64]) {
    for word in words.iter_mut() {
        unsafe { core::ptr::write_volatile(word, 0) };
    }
    std::sync::atomic::compiler_fence(std::sync::atomic::Ordering::SeqCst);
}

/// Expand and clamp a 32-byte seed into a scalar.
fn clamped_scalar(seed_half: &[u8]) -> [u8; 64] {
    let mut d = sha512::sha512(seed_half);
    d[0] &= 248;
    d[31] &= 127;
    d[31] |= 64;
    d
}

/// Derive a keypair from a 32-byte seed.
///
/// The secret key is the seed followed by the derived public key; the
/// public key is the compressed base-point multiple of the clamped
/// SHA-512 expansion of the seed.
pub fn keypair_from_seed(seed: &[u8; 32]) -> ([u8; 64], [u8; 32]) {
    let mut d = clamped_scalar(seed);
    let scalar: [u8; 32] = d[..32].try_into().unwrap();
    let public = curve::compress(&curve::scalarmult_base(&scalar));

    let mut secret = [0u8; 64];
    secret[..32].copy_from_slice(seed);
    secret[32..].copy_from_slice(&public);

    wipe_bytes(&mut d);
    (secret, public)
}

/// Return the public half of a 64-byte secret key.
pub fn public_from_secret(secret_key: &[u8; 64]) -> [u8; 32] {
    secret_key[32..].try_into().unwrap()
}

/// Produce a detached 64-byte signature over `message`.
pub fn sign(message: &[u8], secret_key: &[u8; 64]) -> [u8; 64] {
    let mut d = clamped_scalar(&secret_key[..32]);

    // r = H(d[32..] || M) mod L, R = r * B.
    let mut hasher = sha512::Sha512::new();
    hasher.update(&d[32..]);
    hasher.update(message);
    let mut r_hash = hasher.finalize();
    let mut r = reduce(&r_hash);
    let r_enc = curve::compress(&curve::scalarmult_base(&r));

    // k = H(R || A || M) mod L.
    let mut hasher = sha512::Sha512::new();
    hasher.update(&r_enc);
    hasher.update(&secret_key[32..]);
    hasher.update(message);
    let k = reduce(&hasher.finalize());

    // S = r + k * d[..32] mod L.
    let mut x = [0i64; 64];
    for (limb, &byte) in x.iter_mut().zip(r.iter()) {
        *limb = byte as i64;
    }
    for i in 0..32 {
        for j in 0..32 {
            x[i + j] += k[i] as i64 * d[j] as i64;
        }
    }

    let mut signature = [0u8; 64];
    signature[..32].copy_from_slice(&r_enc);
    mod_l(&mut signature[32..], &mut x);

    wipe_bytes(&mut d);
    wipe_bytes(&mut r_hash);
    wipe_bytes(&mut r);
    wipe_words(&mut x);
    signature
}

/// Check a detached signature. Returns `false` on any malformed input
/// rather than raising.
pub fn verify(signature: &[u8; 64], message: &[u8], public_key: &[u8; 32]) -> bool {
    let neg_a = match curve::decompress_neg(public_key) {
        Some(point) => point,
        None => return false,
    };

    // k = H(R || A || M) mod L.
    let mut hasher = sha512::Sha512::new();
    hasher.update(&signature[..32]);
    hasher.update(public_key);
    hasher.update(message);
    let k = reduce(&hasher.finalize());

    // R' = S * B + k * (-A); accept iff R' == R.
    let s: [u8; 32] = signature[32..].try_into().unwrap();
    let mut check = curve::scalarmult(&neg_a, &k);
    let sb = curve::scalarmult_base(&s);
    curve::add(&mut check, &sb);
    let r_enc = curve::compress(&check);

    let r: [u8; 32] = signature[..32].try_into().unwrap();
    verify_32(&r, &r_enc) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};

    fn hex32(s: &str) -> [u8; 32] {
        hex::decode(s).unwrap().try_into().unwrap()
    }

    fn hex64(s: &str) -> [u8; 64] {
        hex::decode(s).unwrap().try_into().unwrap()
    }

    // RFC 8032 §7.1 TEST 1: empty message.
    const T1_SEED: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
    const T1_PUBLIC: &str = "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";
    const T1_SIG: &str = "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e06522490155\
                          5fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b";

    // RFC 8032 §7.1 TEST 2: one-byte message 0x72.
    const T2_SEED: &str = "4ccd089b28ff96da9db6c346ec114e0f5b8a319f35aba624da8cf6ed4fb8a6fb";
    const T2_PUBLIC: &str = "3d4017c3e843895a92b70aa74d1b7ebc9c982ccf2ec4968cc0cd55f12af4660c";
    const T2_SIG: &str = "92a009a9f0d4cab8720e820b5f642540a2b27b5416503f8fb3762223ebdb69da\
                          085ac1e43e15996e458f3613d0f11d8c387b2eaeb4302aeeb00d291612bb0c00";

    // RFC 8032 §7.1 TEST 3: two-byte message af82.
    const T3_SEED: &str = "c5aa8df43f9f837bedb7442f31dcb7b166d38535076f094b85ce3a2e0b4458f7";
    const T3_PUBLIC: &str = "fc51cd8e6218a1a38da47ed00230f0580816ed13ba3303ac5deb911548908025";
    const T3_SIG: &str = "6291d657deec24024827e69c3abe01a30ce548a284743a445e3680d7db5ac3ac\
                          18ff9b538d16f290ae67f760984dc6594a7c15e9716ed28dc027beceea1ec40a";

    #[test]
    fn rfc8032_test_1() {
        let (secret, public) = keypair_from_seed(&hex32(T1_SEED));
        assert_eq!(public, hex32(T1_PUBLIC));
        let signature = sign(&[], &secret);
        assert_eq!(signature, hex64(T1_SIG));
        assert!(verify(&signature, &[], &public));
    }

    #[test]
    fn rfc8032_test_2() {
        let (secret, public) = keypair_from_seed(&hex32(T2_SEED));
        assert_eq!(public, hex32(T2_PUBLIC));
        let signature = sign(&[0x72], &secret);
        assert_eq!(signature, hex64(T2_SIG));
        assert!(verify(&signature, &[0x72], &public));
    }

    #[test]
    fn rfc8032_test_3() {
        let (secret, public) = keypair_from_seed(&hex32(T3_SEED));
        assert_eq!(public, hex32(T3_PUBLIC));
        let signature = sign(&[0xaf, 0x82], &secret);
        assert_eq!(signature, hex64(T3_SIG));
        assert!(verify(&signature, &[0xaf, 0x82], &public));
    }

    #[test]
    fn agrees_with_dalek_on_derivation_and_signing() {
        for seed_byte in [0u8, 1, 7, 42, 255] {
            let seed = [seed_byte; 32];
            let (secret, public) = keypair_from_seed(&seed);

            let dalek_sk = SigningKey::from_bytes(&seed);
            assert_eq!(public, dalek_sk.verifying_key().to_bytes());

            let message = b"umi transaction bytes";
            let signature = sign(message, &secret);
            assert_eq!(signature, dalek_sk.sign(message).to_bytes());
        }
    }

    #[test]
    fn dalek_accepts_our_signatures_and_vice_versa() {
        let seed = [9u8; 32];
        let (secret, public) = keypair_from_seed(&seed);
        let message = b"cross verification";

        let ours = sign(message, &secret);
        let vk = VerifyingKey::from_bytes(&public).unwrap();
        assert!(vk
            .verify(message, &ed25519_dalek::Signature::from_bytes(&ours))
            .is_ok());

        let theirs = SigningKey::from_bytes(&seed).sign(message).to_bytes();
        assert!(verify(&theirs, message, &public));
    }

    #[test]
    fn tampered_signature_rejected() {
        let (secret, public) = keypair_from_seed(&[3u8; 32]);
        let message = b"payload";
        let signature = sign(message, &secret);

        for position in [0usize, 31, 32, 63] {
            let mut bad = signature;
            bad[position] ^= 0x01;
            assert!(!verify(&bad, message, &public), "flip at {position}");
        }
    }

    #[test]
    fn tampered_message_rejected() {
        let (secret, public) = keypair_from_seed(&[4u8; 32]);
        let signature = sign(b"payload", &secret);
        assert!(!verify(&signature, b"payloae", &public));
        assert!(!verify(&signature, b"", &public));
    }

    #[test]
    fn wrong_public_key_rejected() {
        let (secret, _) = keypair_from_seed(&[5u8; 32]);
        let (_, other_public) = keypair_from_seed(&[6u8; 32]);
        let signature = sign(b"payload", &secret);
        assert!(!verify(&signature, b"payload", &other_public));
    }

    #[test]
    fn malformed_public_key_returns_false() {
        let (secret, _) = keypair_from_seed(&[7u8; 32]);
        let signature = sign(b"payload", &secret);
        // Sweep encodings until one fails decompression; verification
        // must report false, not panic.
        let mut saw_rejection = false;
        for y in 2u8..=65 {
            let mut candidate = [0u8; 32];
            candidate[0] = y;
            if curve::decompress_neg(&candidate).is_none() {
                assert!(!verify(&signature, b"payload", &candidate));
                saw_rejection = true;
                break;
            }
        }
        assert!(saw_rejection);
    }

    #[test]
    fn verify_32_is_exact() {
        let a = [0xabu8; 32];
        let mut b = a;
        assert_eq!(verify_32(&a, &b), 0);
        b[31] ^= 0x80;
        assert_eq!(verify_32(&a, &b), -1);
    }

    #[test]
    fn reduce_is_stable_for_small_values() {
        // Values already below L reduce to themselves.
        let mut h = [0u8; 64];
        h[0] = 5;
        let r = reduce(&h);
        let mut expected = [0u8; 32];
        expected[0] = 5;
        assert_eq!(r, expected);
    }
}
