// src/common/i18n.rs

use std::collections::HashMap;
use std::sync::Arc;

use crate::middleware::i18n::Locale;

const DEFAULT_LANG: &str = "en";

// Catálogo de mensagens em memória. A agência atende em inglês e italiano;
// qualquer outro idioma cai no inglês.
#[derive(Clone)]
pub struct I18nStore {
    catalogs: Arc<HashMap<&'static str, HashMap<&'static str, &'static str>>>,
}

impl I18nStore {
    pub fn new() -> Self {
        let mut catalogs: HashMap<&'static str, HashMap<&'static str, &'static str>> =
            HashMap::new();

        catalogs.insert(
            "en",
            HashMap::from([
                ("validation_failed", "One or more fields are invalid."),
                ("email_exists", "This e-mail is already registered."),
                ("invalid_credentials", "Invalid e-mail or password."),
                ("account_blocked", "Account blocked. Contact the administrator."),
                ("invalid_token", "Missing or invalid authentication token."),
                ("not_found", "Resource not found"),
                ("conflict", "Conflict"),
                ("forbidden", "Not authorized"),
                ("invalid_transition", "Invalid status transition"),
                ("invalid_parameter", "Invalid parameter"),
                ("internal_error", "An unexpected error occurred."),
            ]),
        );

        catalogs.insert(
            "it",
            HashMap::from([
                ("validation_failed", "Uno o più campi non sono validi."),
                ("email_exists", "Questa e-mail è già registrata."),
                ("invalid_credentials", "E-mail o password non validi."),
                ("account_blocked", "Account bloccato. Contattare l'amministratore."),
                ("invalid_token", "Token di autenticazione mancante o non valido."),
                ("not_found", "Risorsa non trovata"),
                ("conflict", "Conflitto"),
                ("forbidden", "Non autorizzato"),
                ("invalid_transition", "Transizione di stato non valida"),
                ("invalid_parameter", "Parametro non valido"),
                ("internal_error", "Si è verificato un errore imprevisto."),
            ]),
        );

        Self {
            catalogs: Arc::new(catalogs),
        }
    }

    /// Busca a mensagem no idioma pedido, com fallback para o inglês.
    pub fn translate(&self, locale: &Locale, key: &str) -> String {
        let catalog = self
            .catalogs
            .get(locale.0.as_str())
            .or_else(|| self.catalogs.get(DEFAULT_LANG));

        catalog
            .and_then(|c| c.get(key))
            .copied()
            .unwrap_or(key)
            .to_string()
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_italian() {
        let store = I18nStore::new();
        let msg = store.translate(&Locale("it".to_string()), "not_found");
        assert_eq!(msg, "Risorsa non trovata");
    }

    #[test]
    fn test_unknown_language_falls_back_to_english() {
        let store = I18nStore::new();
        let msg = store.translate(&Locale("de".to_string()), "not_found");
        assert_eq!(msg, "Resource not found");
    }

    #[test]
    fn test_unknown_key_returns_key() {
        let store = I18nStore::new();
        let msg = store.translate(&Locale("en".to_string()), "no_such_key");
        assert_eq!(msg, "no_such_key");
    }
}
