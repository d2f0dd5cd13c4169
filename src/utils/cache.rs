// Cache simples em memória com expiração por entrada.
// Usado para o documento de certificados x509 do Google (respeita o
// max-age retornado pelo endpoint).
use std::collections::HashMap;
use std::sync::RwLock;

lazy_static::lazy_static! {
    static ref CACHE: RwLock<HashMap<String, (String, i64)>> = RwLock::new(HashMap::new());
}

pub fn get_cached(key: &str) -> Option<String> {
    let cache = CACHE.read().ok()?;
    let (value, expires_at) = cache.get(key)?;
    if chrono::Utc::now().timestamp() >= *expires_at {
        return None;
    }
    Some(value.clone())
}

pub fn set_cache(key: String, value: String, ttl_secs: i64) {
    let expires_at = chrono::Utc::now().timestamp() + ttl_secs;
    if let Ok(mut cache) = CACHE.write() {
        cache.insert(key, (value, expires_at));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expired_entries_are_misses() {
        set_cache("expired-key".into(), "v".into(), -1);
        assert_eq!(get_cached("expired-key"), None);

        set_cache("live-key".into(), "v".into(), 3600);
        assert_eq!(get_cached("live-key").as_deref(), Some("v"));
    }
}
