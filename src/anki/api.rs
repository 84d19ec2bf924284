use std::collections::HashMap;

use reqwest::Client;
use serde::{
    Deserialize,
    Serialize,
};

use crate::core::KanjiGridError;

pub const DEFAULT_URL: &str = "http://localhost:8765/";
const API_VERSION: u32 = 6;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Field {
    pub value: String,
    pub order: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub card_id: u64,
    pub note: u64,
    pub deck_name: String,
    #[serde(default)]
    pub fields: HashMap<String, Field>,
    /// Days when positive, seconds when negative (learning steps).
    pub interval: i64,
    #[serde(rename = "type")]
    pub card_type: u8,
    pub queue: i32,
    pub due: i64,
    #[serde(default)]
    pub odue: i64,
    #[serde(rename = "mod", default)]
    pub modified: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub result: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn into_result(self, action: &str) -> Result<T, KanjiGridError> {
        if let Some(error) = self.error {
            return Err(KanjiGridError::AnkiConnect(format!("{}: {}", action, error)));
        }
        self.result
            .ok_or_else(|| KanjiGridError::AnkiConnect(format!("{}: empty response", action)))
    }
}

#[derive(Debug, Clone)]
pub struct AnkiConnect {
    client: Client,
    url: String,
}

impl Default for AnkiConnect {
    fn default() -> Self {
        Self::new(DEFAULT_URL)
    }
}

impl AnkiConnect {
    pub fn new(url: &str) -> Self {
        Self { client: Client::new(), url: url.to_string() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn make_request<T: for<'de> Deserialize<'de>>(
        &self,
        action: &str,
        params: Option<serde_json::Value>,
    ) -> Result<T, KanjiGridError> {
        let mut body = serde_json::Map::new();
        body.insert("action".to_string(), serde_json::Value::String(action.to_string()));
        body.insert("version".to_string(), serde_json::Value::Number(API_VERSION.into()));

        if let Some(params) = params {
            body.insert("params".to_string(), params);
        }

        let response: ApiResponse<T> =
            self.client.post(&self.url).json(&body).send().await?.json().await?;

        response.into_result(action)
    }

    //Will just use to check if ankiconnect is online
    pub async fn version(&self) -> Result<u32, KanjiGridError> {
        self.make_request("version", None).await
    }

    pub async fn deck_names(&self) -> Result<Vec<String>, KanjiGridError> {
        self.make_request("deckNames", None).await
    }

    pub async fn find_cards(&self, query: &str) -> Result<Vec<u64>, KanjiGridError> {
        let params = serde_json::json!({ "query": query });
        self.make_request("findCards", Some(params)).await
    }

    pub async fn cards_info(&self, card_ids: &[u64]) -> Result<Vec<Card>, KanjiGridError> {
        let params = serde_json::json!({ "cards": card_ids });
        self.make_request("cardsInfo", Some(params)).await
    }
}

/// `deck:"name"` for a named deck (sub-decks included), `deck:*` for everything.
///
/// `*` and `_` are search wildcards, so they are escaped along with quotes.
pub fn deck_query(deck: &str) -> String {
    if deck == "*" {
        return "deck:*".to_string();
    }
    let mut escaped = String::with_capacity(deck.len());
    for c in deck.chars() {
        if matches!(c, '\\' | '"' | '*' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!("deck:\"{}\"", escaped)
}
