use common::{Error, Result};
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use sha2::{Sha256, Sha384};
use std::collections::BTreeMap;
use url::form_urlencoded::byte_serialize;

type HmacSha256 = Hmac<Sha256>;
type HmacSha384 = Hmac<Sha384>;

/// Request parameters, kept sorted by key
pub type Params = BTreeMap<String, String>;

pub fn hmac_sha256_hex(secret: &str, message: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| Error::SigningError(format!("HMAC setup failed: {}", e)))?;
    mac.update(message.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

pub fn hmac_sha384_hex(secret: &str, message: &str) -> Result<String> {
    let mut mac = HmacSha384::new_from_slice(secret.as_bytes())
        .map_err(|e| Error::SigningError(format!("HMAC setup failed: {}", e)))?;
    mac.update(message.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

pub fn md5_hex(message: &str) -> String {
    hex::encode(Md5::digest(message.as_bytes()))
}

/// `k=v` pairs ordered by key and joined with `&`; values are form-encoded
pub fn map_to_url_query(params: &Params) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", key, byte_serialize(value.as_bytes()).collect::<String>()))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOX: &str = "The quick brown fox jumps over the lazy dog";

    #[test]
    fn hmac_sha256_matches_known_vector() {
        assert_eq!(
            hmac_sha256_hex("key", FOX).unwrap(),
            "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8"
        );
    }

    #[test]
    fn hmac_sha384_is_hex_of_48_bytes_and_keyed() {
        let a = hmac_sha384_hex("key", FOX).unwrap();
        let b = hmac_sha384_hex("other", FOX).unwrap();
        assert_eq!(a.len(), 96);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(a, b);
        assert_eq!(a, hmac_sha384_hex("key", FOX).unwrap());
    }

    #[test]
    fn md5_matches_known_vectors() {
        assert_eq!(md5_hex(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(md5_hex(FOX), "9e107d9d372bb6826bd81d3542a419d6");
    }

    #[test]
    fn url_query_is_sorted_and_encoded() {
        let mut params = Params::new();
        params.insert("symbol".to_string(), "eth_btc".to_string());
        params.insert("address".to_string(), "a b&c".to_string());
        params.insert("number".to_string(), "1.5".to_string());

        assert_eq!(
            map_to_url_query(&params),
            "address=a+b%26c&number=1.5&symbol=eth_btc"
        );
        assert_eq!(map_to_url_query(&Params::new()), "");
    }
}
