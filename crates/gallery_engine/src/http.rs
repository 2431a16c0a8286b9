use futures_util::StreamExt;
use gallery_core::{Cursor, Hit, HitId, Page, Query, SearchError};
use gallery_logging::{gallery_debug, gallery_info};
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::{Deleter, EngineError, FetchSettings, Fetcher};

const APPLICATION_ID_HEADER: &str = "X-Search-Application-Id";
const API_KEY_HEADER: &str = "X-Search-API-Key";

/// Talks JSON to a generic hosted search endpoint:
///
/// - `GET {base}/indexes/{index}/hits?q=..&limit=..[&cursor=..][&filter=key:value]`
/// - `DELETE {base}/indexes/{index}/objects/{id}`
#[derive(Debug, Clone)]
pub struct HttpSearchClient {
    settings: FetchSettings,
    base: Url,
    client: reqwest::Client,
}

impl HttpSearchClient {
    pub fn new(settings: FetchSettings) -> Result<Self, EngineError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|err| EngineError::InvalidBaseUrl(format!("{}: {err}", settings.base_url)))?;
        if base.cannot_be_a_base() {
            return Err(EngineError::InvalidBaseUrl(settings.base_url.clone()));
        }
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| EngineError::Client(err.to_string()))?;
        Ok(Self {
            settings,
            base,
            client,
        })
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, SearchError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| SearchError::transport("base url cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn hits_url(&self, query: &Query, cursor: Option<&Cursor>) -> Result<Url, SearchError> {
        let mut url = self.endpoint(&["indexes", &self.settings.index, "hits"])?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", &query.term);
            pairs.append_pair("limit", &self.settings.hits_per_page.to_string());
            if let Some(cursor) = cursor {
                pairs.append_pair("cursor", cursor.as_str());
            }
            for (key, value) in &query.filters {
                pairs.append_pair("filter", &format!("{key}:{value}"));
            }
        }
        Ok(url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = match &self.settings.application_id {
            Some(id) => request.header(APPLICATION_ID_HEADER, id),
            None => request,
        };
        match &self.settings.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, SearchError> {
        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, content_len));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, next_len));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }

    async fn error_message(&self, response: reqwest::Response) -> String {
        let status = response.status();
        match self.read_body(response).await {
            Ok(body) => service_message(&body).unwrap_or_else(|| status.to_string()),
            Err(_) => status.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl Fetcher for HttpSearchClient {
    async fn fetch(&self, query: &Query, cursor: Option<&Cursor>) -> Result<Page, SearchError> {
        let url = self.hits_url(query, cursor)?;
        gallery_debug!("GET {}", url);

        let response = self
            .authorize(self.client.get(url))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(SearchError::invalid_query(self.error_message(response).await));
        }
        if !status.is_success() {
            let message = self.error_message(response).await;
            return Err(SearchError::transport(format!("http status {status}: {message}")));
        }

        let body = self.read_body(response).await?;
        let page = decode_page(&body, &self.settings.id_field)?;
        gallery_info!(
            "Fetched {} hits for {} (more: {})",
            page.hits.len(),
            query,
            !page.is_terminal()
        );
        Ok(page)
    }
}

#[async_trait::async_trait]
impl Deleter for HttpSearchClient {
    async fn delete_by_id(&self, id: &HitId) -> Result<(), SearchError> {
        let url = self.endpoint(&["indexes", &self.settings.index, "objects", id.as_str()])?;
        gallery_debug!("DELETE {}", url);

        let response = self
            .authorize(self.client.delete(url))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let message = self.error_message(response).await;
        if status == StatusCode::NOT_FOUND {
            Err(SearchError::not_found(format!("{id}: {message}")))
        } else {
            Err(SearchError::transport(format!("http status {status}: {message}")))
        }
    }
}

#[derive(Debug, Deserialize)]
struct WirePage {
    hits: Vec<serde_json::Value>,
    #[serde(default)]
    cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireError {
    message: String,
}

pub(crate) fn decode_page(body: &[u8], id_field: &str) -> Result<Page, SearchError> {
    let wire: WirePage = serde_json::from_slice(body)
        .map_err(|err| SearchError::transport(format!("malformed response: {err}")))?;
    let hits = wire
        .hits
        .into_iter()
        .map(|payload| decode_hit(payload, id_field))
        .collect::<Result<Vec<_>, _>>()?;
    // An empty cursor means the same as a missing one.
    let next = wire.cursor.filter(|token| !token.is_empty()).map(Cursor::new);
    Ok(Page::new(hits, next))
}

fn decode_hit(payload: serde_json::Value, id_field: &str) -> Result<Hit, SearchError> {
    let id = match payload.get(id_field) {
        Some(serde_json::Value::String(id)) => id.clone(),
        Some(serde_json::Value::Number(id)) => id.to_string(),
        _ => {
            return Err(SearchError::transport(format!(
                "malformed response: hit without `{id_field}`"
            )))
        }
    };
    Ok(Hit::new(id, payload))
}

fn service_message(body: &[u8]) -> Option<String> {
    if let Ok(error) = serde_json::from_slice::<WireError>(body) {
        return Some(error.message);
    }
    let text = String::from_utf8_lossy(body).trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn too_large(max_bytes: u64, actual: u64) -> SearchError {
    SearchError::transport(format!(
        "response too large (max {max_bytes}, actual {actual})"
    ))
}

fn map_reqwest_error(err: reqwest::Error) -> SearchError {
    if err.is_timeout() {
        return SearchError::transport(format!("timeout: {err}"));
    }
    SearchError::transport(err.to_string())
}
