//! Steam Guard codes and mobile confirmation keys.
//!
//! Both are HMAC-SHA1 over a big-endian time value keyed with a base64
//! secret taken from the authenticator export.
use crate::{Error, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha1::{Digest, Sha1};
use std::time::{SystemTime, UNIX_EPOCH};

type HmacSha1 = Hmac<Sha1>;

const CODE_ALPHABET: &[u8] = b"23456789BCDFGHJKMNPQRTVWXY";
const CODE_LENGTH: usize = 5;
const TIME_STEP: u64 = 30;
const MAX_TAG_LENGTH: usize = 32;

pub fn unix_time() -> Result<u64> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs())
}

/// Five character Steam Guard code for the 30 second step containing `time`.
pub fn generate_auth_code(shared_secret: &str, time: u64) -> Result<String> {
    let mac = sign(shared_secret, &(time / TIME_STEP).to_be_bytes())?;

    let offset = (mac[19] & 0x0f) as usize;
    let mut full_code =
        u32::from_be_bytes([mac[offset], mac[offset + 1], mac[offset + 2], mac[offset + 3]])
            & 0x7fff_ffff;

    let alphabet_len = CODE_ALPHABET.len() as u32;
    let code = (0..CODE_LENGTH)
        .map(|_| {
            let c = CODE_ALPHABET[(full_code % alphabet_len) as usize] as char;
            full_code /= alphabet_len;
            c
        })
        .collect();

    Ok(code)
}

/// Key authorizing a confirmation request with the given `tag` ("list", "allow", "cancel", ...).
pub fn generate_confirmation_key(identity_secret: &str, time: u64, tag: &str) -> Result<String> {
    let tag = &tag.as_bytes()[..tag.len().min(MAX_TAG_LENGTH)];

    let mut data = Vec::with_capacity(8 + tag.len());
    data.extend_from_slice(&time.to_be_bytes());
    data.extend_from_slice(tag);

    Ok(STANDARD.encode(sign(identity_secret, &data)?))
}

/// Device id the mobile app would report for `steam_id`.
pub fn device_id(steam_id: u64) -> String {
    let hash = hex::encode(Sha1::digest(steam_id.to_string().as_bytes()));
    format!(
        "android:{}-{}-{}-{}-{}",
        &hash[0..8],
        &hash[8..12],
        &hash[12..16],
        &hash[16..20],
        &hash[20..32]
    )
}

fn sign(secret: &str, data: &[u8]) -> Result<Vec<u8>> {
    let key = STANDARD.decode(secret.trim())?;
    let mut mac = HmacSha1::new_from_slice(&key)
        .map_err(|e| Error::InvalidSecret(e.to_string()))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHARED_SECRET: &str = "zvIayp3JPvtvX/QGHqsqKBk/44s=";

    #[test]
    fn auth_code_matches_known_value() {
        assert_eq!(generate_auth_code(SHARED_SECRET, 1_600_000_000).unwrap(), "KJDMM");
        assert_eq!(generate_auth_code("ABCD1234", 1_700_000_000).unwrap(), "J26D6");
    }

    #[test]
    fn auth_code_is_stable_within_a_time_step() {
        let first = generate_auth_code(SHARED_SECRET, 1_600_000_029).unwrap();
        let second = generate_auth_code(SHARED_SECRET, 1_600_000_030).unwrap();
        assert_eq!(first, "GVCDQ");
        assert_eq!(first, second);
        assert_ne!(first, generate_auth_code(SHARED_SECRET, 1_600_000_000).unwrap());
    }

    #[test]
    fn auth_code_uses_steam_alphabet() {
        let code = generate_auth_code(SHARED_SECRET, 1_234_567_890).unwrap();
        assert_eq!(code.len(), CODE_LENGTH);
        assert!(code.bytes().all(|c| CODE_ALPHABET.contains(&c)));
    }

    #[test]
    fn invalid_secret_is_rejected() {
        assert!(matches!(
            generate_auth_code("not base64!", 0),
            Err(Error::Base64(_))
        ));
    }

    #[test]
    fn confirmation_key_matches_known_value() {
        assert_eq!(
            generate_confirmation_key(SHARED_SECRET, 1_600_000_000, "allow").unwrap(),
            "+Y1Pnz11AvM0J6b4cgWOD5/BcrA="
        );
    }

    #[test]
    fn device_id_is_derived_from_steam_id() {
        assert_eq!(
            device_id(76561197960287930),
            "android:6d3f10d9-6369-a1ae-97a0-94df28b95192"
        );
    }
}
