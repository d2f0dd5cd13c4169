use crate::utils::{cache, AppError};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Certificados x509 rotativos publicados pelo Google para validar
/// assinaturas de ID tokens do Firebase.
const CERTS_URL: &str =
    "https://www.googleapis.com/robot/v1/metadata/x509/securetoken@system.gserviceaccount.com";

const CERTS_CACHE_KEY: &str = "firebase_x509_certs";

/// TTL de fallback quando o endpoint não manda Cache-Control utilizável
const DEFAULT_CERTS_TTL_SECS: i64 = 3600;

/// Claims verificadas de um ID token do Firebase
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenClaims {
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
    pub aud: String,
    pub iss: String,
    pub iat: usize,
    pub exp: usize,
}

/// Verificador de identidade. Construído uma vez no main e injetado
/// via web::Data; não guarda estado além do cache de certificados.
#[derive(Clone)]
pub struct FirebaseAuth {
    project_id: String,
    http: reqwest::Client,
}

impl FirebaseAuth {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Result<Self, String> {
        let project_id = std::env::var("FIREBASE_PROJECT_ID")
            .map_err(|_| "FIREBASE_PROJECT_ID must be set".to_string())?;
        Ok(Self::new(project_id))
    }

    /// Busca o mapa kid → certificado PEM, respeitando o max-age do endpoint.
    async fn fetch_certs(&self) -> Result<HashMap<String, String>, AppError> {
        if let Some(cached) = cache::get_cached(CERTS_CACHE_KEY) {
            return serde_json::from_str(&cached)
                .map_err(|e| AppError::GatewayError(format!("Corrupt cert cache: {}", e)));
        }

        let response = self
            .http
            .get(CERTS_URL)
            .send()
            .await
            .map_err(|e| AppError::GatewayError(format!("Failed to fetch Google certs: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::GatewayError(format!(
                "Google cert endpoint returned {}",
                response.status()
            )));
        }

        let ttl = response
            .headers()
            .get(reqwest::header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_max_age)
            .unwrap_or(DEFAULT_CERTS_TTL_SECS);

        let body = response
            .text()
            .await
            .map_err(|e| AppError::GatewayError(format!("Failed to read cert response: {}", e)))?;

        let certs: HashMap<String, String> = serde_json::from_str(&body)
            .map_err(|e| AppError::GatewayError(format!("Invalid cert response: {}", e)))?;

        cache::set_cache(CERTS_CACHE_KEY.to_string(), body, ttl);

        Ok(certs)
    }

    /// Verifica assinatura (RS256), expiração, audience e issuer de um
    /// ID token e devolve as claims com o email verificado.
    pub async fn verify_id_token(&self, token: &str) -> Result<TokenClaims, AppError> {
        let header = decode_header(token)
            .map_err(|_| AppError::Unauthenticated("Unauthorized Access".to_string()))?;

        let kid = header
            .kid
            .ok_or_else(|| AppError::Unauthenticated("Unauthorized Access".to_string()))?;

        let certs = self.fetch_certs().await?;

        let pem = certs
            .get(&kid)
            .ok_or_else(|| AppError::Unauthenticated("Unauthorized Access".to_string()))?;

        let key = DecodingKey::from_rsa_pem(pem.as_bytes())
            .map_err(|e| AppError::GatewayError(format!("Bad signing certificate: {}", e)))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);

        let mut issuers = HashSet::new();
        issuers.insert(format!("https://securetoken.google.com/{}", self.project_id));
        validation.iss = Some(issuers);

        decode::<TokenClaims>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                log::warn!("Token verification failed: {}", e);
                AppError::Unauthenticated("Unauthorized Access".to_string())
            })
    }
}

/// Extrai max-age de um header Cache-Control
fn parse_max_age(cache_control: &str) -> Option<i64> {
    cache_control
        .split(',')
        .map(|directive| directive.trim())
        .find_map(|directive| directive.strip_prefix("max-age="))
        .and_then(|secs| secs.parse::<i64>().ok())
        .filter(|secs| *secs > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_age_parsed_from_cache_control() {
        assert_eq!(
            parse_max_age("public, max-age=22158, must-revalidate, no-transform"),
            Some(22158)
        );
        assert_eq!(parse_max_age("max-age=600"), Some(600));
    }

    #[test]
    fn max_age_missing_or_invalid() {
        assert_eq!(parse_max_age("no-cache"), None);
        assert_eq!(parse_max_age("max-age=abc"), None);
        assert_eq!(parse_max_age("max-age=0"), None);
    }

    #[tokio::test]
    async fn garbage_token_is_unauthenticated() {
        let auth = FirebaseAuth::new("redlife-test");
        let result = auth.verify_id_token("not-a-jwt").await;
        assert!(matches!(result, Err(AppError::Unauthenticated(_))));
    }
}
