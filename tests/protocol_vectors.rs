//! Protocol conformance — end-to-end golden vectors.
//!
//! Every vector here is shared with the other implementations of the
//! UMI protocol; the byte strings are fixed and must never change.
//! Only the public crate surface is exercised.

use umi_core::{Address, PublicKey, SecretKey, Transaction, UmiError};

const ZERO_PK_BECH32: &str =
    "umi1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqr5zcpj";
const ZERO_SEED_BECH32: &str =
    "umi18d4z00xwk6jz6c4r4rgz5mcdwdjny9thrh3y8f36cpy2rz6emg5s6rxnf6";
const GENESIS_BECH32: &str =
    "genesis1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqkxaddc";
const AAA_BECH32: &str =
    "aaa1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqq48c9jj";

/// Vector 1: hash of the all-zero transaction buffer.
#[test]
fn empty_transaction_hash() {
    let tx = Transaction::from_bytes(&[0u8; 150]).unwrap();
    assert_eq!(
        hex::encode(tx.hash()),
        "1d83518b897b14e2943990eff655838246cc0207a7c95a5f3dfccc2e395f8bbf"
    );
}

/// Vector 2: address derived from the all-zero 32-byte seed.
#[test]
fn address_from_zero_seed() {
    let key = SecretKey::from_seed(&[0u8; 32]).unwrap();
    let address = Address::from_secret_key(&key);
    assert_eq!(address.bech32().unwrap(), ZERO_SEED_BECH32);
}

/// Vector 3: address wrapping the all-zero public key.
#[test]
fn address_from_zero_public_key() {
    let pk = PublicKey::from_bytes(&[0u8; 32]).unwrap();
    let address = Address::from_public_key(&pk);
    assert_eq!(address.bech32().unwrap(), ZERO_PK_BECH32);
}

/// Vector 4: Bech32 round trip through an `aaa` address.
#[test]
fn bech32_round_trip() {
    let address = Address::from_bech32(AAA_BECH32).unwrap();
    assert_eq!(address.bech32().unwrap(), AAA_BECH32);
}

/// Vector 5: the all-zero address renders with the genesis prefix.
#[test]
fn genesis_address_bech32() {
    let address = Address::from_bytes(&[0u8; 34]).unwrap();
    assert_eq!(address.bech32().unwrap(), GENESIS_BECH32);
}

/// Vector 6: sign-and-verify with the zero-seed key.
#[test]
fn sign_and_verify_basic_transaction() {
    let key = SecretKey::from_seed(&[0u8; 32]).unwrap();

    let mut tx = Transaction::new();
    tx.set_version(Transaction::BASIC).unwrap();
    tx.set_sender(&Address::from_secret_key(&key)).unwrap();
    tx.sign(&key).unwrap();

    assert!(tx.verify().unwrap());
}

/// A full transfer survives serialization, reparse, and reverification.
#[test]
fn transfer_round_trip_via_wire_bytes() {
    let key = SecretKey::from_seed(b"integration seed").unwrap();
    let recipient = Address::from_bech32(ZERO_PK_BECH32).unwrap();

    let mut tx = Transaction::new();
    tx.set_version(Transaction::BASIC).unwrap();
    tx.set_sender(&Address::from_secret_key(&key)).unwrap();
    tx.set_recipient(&recipient).unwrap();
    tx.set_value(9_007_199_254_740_991).unwrap();
    tx.set_nonce(123_456).unwrap();
    tx.sign(&key).unwrap();

    let parsed = Transaction::from_bytes(&tx.bytes()).unwrap();
    assert_eq!(parsed.bytes(), tx.bytes());
    assert_eq!(parsed.value().unwrap(), 9_007_199_254_740_991);
    assert_eq!(parsed.nonce().unwrap(), 123_456);
    assert_eq!(parsed.recipient().unwrap().bech32().unwrap(), ZERO_PK_BECH32);
    assert!(parsed.verify().unwrap());
}

/// A structure registration survives the same trip.
#[test]
fn structure_round_trip_via_wire_bytes() {
    let key = SecretKey::from_seed(b"structure seed").unwrap();

    let mut tx = Transaction::new();
    tx.set_version(Transaction::CREATE_STRUCTURE).unwrap();
    tx.set_sender(&Address::from_secret_key(&key)).unwrap();
    tx.set_prefix("www").unwrap();
    tx.set_name("World Wide Web").unwrap();
    tx.set_profit_percent(100).unwrap();
    tx.set_fee_percent(2000).unwrap();
    tx.set_nonce(1).unwrap();
    tx.sign(&key).unwrap();

    let parsed = Transaction::from_bytes(&tx.bytes()).unwrap();
    assert_eq!(parsed.prefix().unwrap(), "www");
    assert_eq!(parsed.name().unwrap(), "World Wide Web");
    assert_eq!(parsed.profit_percent().unwrap(), 100);
    assert_eq!(parsed.fee_percent().unwrap(), 2000);
    assert!(parsed.verify().unwrap());
}

/// The signed message is exactly bytes 0..85: flipping the reserved
/// trailing byte leaves verification intact, flipping signed bytes or
/// the signature breaks it.
#[test]
fn signature_covers_first_85_bytes_only() {
    let key = SecretKey::from_seed(&[5u8; 32]).unwrap();
    let mut tx = Transaction::new();
    tx.set_version(Transaction::BASIC).unwrap();
    tx.set_sender(&Address::from_secret_key(&key)).unwrap();
    tx.set_nonce(77).unwrap();
    tx.sign(&key).unwrap();

    let mut raw = tx.bytes();
    raw[149] ^= 0xff;
    assert!(Transaction::from_bytes(&raw).unwrap().verify().unwrap());

    for position in [0usize, 84, 85, 148] {
        let mut raw = tx.bytes();
        raw[position] ^= 0x01;
        assert!(
            !Transaction::from_bytes(&raw).unwrap().verify().unwrap(),
            "flip at {position}"
        );
    }
}

/// Address <-> Bech32 is the identity on every valid address.
#[test]
fn address_bech32_identity() {
    for seed_byte in 0u8..8 {
        let key = SecretKey::from_seed(&[seed_byte; 32]).unwrap();
        let address = Address::from_secret_key(&key);
        let round = Address::from_bech32(&address.bech32().unwrap()).unwrap();
        assert_eq!(round.bytes(), address.bytes());
    }
}

/// The error split of `verify`: missing fields are an error, a failing
/// check is `false`.
#[test]
fn verify_error_contract() {
    let tx = Transaction::new();
    assert!(matches!(tx.verify(), Err(UmiError::FieldNotSet(_))));

    let key = SecretKey::from_seed(&[8u8; 32]).unwrap();
    let mut tx = Transaction::new();
    tx.set_version(Transaction::BASIC).unwrap();
    tx.set_sender(&Address::from_secret_key(&key)).unwrap();
    tx.set_signature(&[0u8; 64]).unwrap();
    assert!(!tx.verify().unwrap());
}
