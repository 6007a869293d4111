//! Known-answer vectors against standard bcrypt output

use cryypt_bcrypt::{hash_with_setting, verify, Bcrypt, BcryptHash, HashCost, Minor, Salt};

const ZERO_SALT_2B: &str = "$2b$04$......................";
const ZERO_SALT_2A: &str = "$2a$04$......................";

const VECTORS: &[(&[u8], &str)] = &[
    (b"", "$2b$04$......................w74bL5gU7LSJClZClCa.Pkz14aTv/XO"),
    (b"abc", "$2b$04$......................ini1L2hXWkegMV822DC6vks..mWmZHK"),
    (b"U*U", "$2b$04$......................OFozeos6d2lMGDeQ3d5irLzOX9aUXQa"),
    (b"password", "$2b$04$......................LAtw7/ohmmBAhnXqmkuIz83Rl5Qdjhm"),
    (
        b"U*U",
        "$2a$05$CCCCCCCCCCCCCCCCCCCCC.E5YPO9kmyuRGyh0XouQYb4YMJKvyOeW",
    ),
    (
        b"correct horse",
        "$2b$05$CCCCCCCCCCCCCCCCCCCCC.WrAwgFxicHZ3kL7zMvXYXHKosDn8ot2",
    ),
    (b"", "$2a$06$DCq7YPn5Rq63x1Lad4cll.TV4S6ytwfsfvkgY8jIucDrjc8deX1s."),
];

#[test]
fn test_known_vectors() {
    for (password, expected) in VECTORS {
        let hash = hash_with_setting(password, &expected[..29]).expect("valid setting");
        assert_eq!(hash.as_str(), *expected);
        assert!(verify(password, expected).expect("well-formed hash"));
    }
}

#[test]
fn test_full_hash_as_setting_reuses_salt() {
    for (password, expected) in VECTORS {
        let hash = hash_with_setting(password, expected).expect("valid setting");
        assert_eq!(hash.as_str(), *expected);
    }
}

#[test]
fn test_minor_a_and_b_agree_below_cap() {
    for password in [&b"U*U"[..], b"password"] {
        let b = hash_with_setting(password, ZERO_SALT_2B).expect("valid setting");
        let a = hash_with_setting(password, ZERO_SALT_2A).expect("valid setting");
        assert_eq!(a.digest_text(), b.digest_text());
        assert_eq!(a.minor(), Minor::A);
        assert_eq!(b.minor(), Minor::B);
    }
}

#[test]
fn test_long_passwords_are_capped_at_72() {
    const DIGEST: &str = "UaUp2CqHXn14N7RprrzoDsNv91ahi36";
    for len in [72, 73, 100] {
        let password = vec![b'a'; len];
        for setting in [ZERO_SALT_2B, ZERO_SALT_2A] {
            let hash = hash_with_setting(&password, setting).expect("valid setting");
            assert_eq!(hash.digest_text(), DIGEST, "{len} bytes under {setting}");
        }
    }
}

#[test]
fn test_password_ends_at_first_nul() {
    let truncated = hash_with_setting(b"abc\0ignored", ZERO_SALT_2B).expect("valid setting");
    assert_eq!(
        truncated.as_str(),
        "$2b$04$......................ini1L2hXWkegMV822DC6vks..mWmZHK"
    );
}

#[test]
fn test_deterministic_for_fixed_salt() {
    let salt = Salt::decode(b"CCCCCCCCCCCCCCCCCCCCC.").expect("valid salt");
    let bcrypt = Bcrypt::new().with_cost(HashCost::Minimum);
    let first = bcrypt.hash_with_salt("same input", salt.clone()).expect("hash");
    let second = bcrypt.hash_with_salt("same input", salt).expect("hash");
    assert_eq!(first, second);
    assert_eq!(first.as_str().len(), BcryptHash::LEN);
}

#[test]
fn test_verify_rejects_wrong_password() {
    let (_, stored) = VECTORS[1];
    assert!(!verify("abd", stored).expect("well-formed hash"));
    assert!(!verify("", stored).expect("well-formed hash"));
}
