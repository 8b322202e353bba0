//! REST backend using reqwest

use async_trait::async_trait;
use marker_domain::{Bookmark, Credentials, Mark, Tag};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::backend::Backend;
use crate::config::{ClientConfig, ConfigError};
use crate::error::{ClientError, Result};
use crate::session::TokenStore;

const BOOKMARKS: &str = "bookmarks";
const MARKS: &str = "marks";
const TAGS: &str = "tags";
const LOGIN: &str = "users/login";

pub struct HttpBackend {
    client: Client,
    base: Url,
    tokens: TokenStore,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig, tokens: TokenStore) -> std::result::Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            base: config.backend_base()?,
            tokens,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| ClientError::Network(format!("invalid endpoint {path}: {e}")))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match self.tokens.get() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder, what: &str) -> Result<T> {
        let body = self.send(builder, what).await?;
        decode_body(&body, what)
    }

    async fn send(&self, builder: RequestBuilder, what: &str) -> Result<String> {
        let response = builder.send().await.map_err(ClientError::network)?;
        let status = response.status();
        tracing::debug!(%status, what, "backend response");

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(what.to_string()));
        }
        if !status.is_success() {
            return Err(ClientError::Network(format!("{what}: HTTP {status}")));
        }
        response.text().await.map_err(ClientError::network)
    }

    async fn list<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>> {
        let url = self.endpoint(collection)?;
        self.fetch(self.request(Method::GET, url), collection).await
    }

    async fn get_one<T: DeserializeOwned>(&self, collection: &str, id: &str) -> Result<T> {
        let url = self.endpoint(&item_path(collection, id))?;
        self.fetch(self.request(Method::GET, url), &item_path(collection, id))
            .await
    }

    async fn by_url<T: DeserializeOwned>(&self, collection: &str, page_url: &str) -> Result<T> {
        let mut url = self.endpoint(&format!("{collection}/url"))?;
        url.query_pairs_mut().append_pair("url", page_url);
        self.fetch(self.request(Method::GET, url), &format!("{collection} for {page_url}"))
            .await
    }

    async fn write<B, T>(&self, method: Method, collection: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(collection)?;
        self.fetch(self.request(method, url).json(body), collection)
            .await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let path = item_path(collection, id);
        let url = self.endpoint(&path)?;
        self.send(self.request(Method::DELETE, url), &path).await?;
        Ok(())
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list_bookmarks(&self) -> Result<Vec<Bookmark>> {
        self.list(BOOKMARKS).await
    }

    async fn get_bookmark(&self, id: &str) -> Result<Bookmark> {
        self.get_one(BOOKMARKS, id).await
    }

    async fn find_bookmark_by_url(&self, url: &str) -> Result<Bookmark> {
        self.by_url(BOOKMARKS, url).await
    }

    async fn create_bookmark(&self, bookmark: &Bookmark) -> Result<Bookmark> {
        self.write(Method::POST, BOOKMARKS, bookmark).await
    }

    async fn update_bookmark(&self, bookmark: &Bookmark) -> Result<Bookmark> {
        self.write(Method::PUT, BOOKMARKS, bookmark).await
    }

    async fn delete_bookmark(&self, id: &str) -> Result<()> {
        self.delete(BOOKMARKS, id).await
    }

    async fn list_marks(&self) -> Result<Vec<Mark>> {
        self.list(MARKS).await
    }

    async fn get_mark(&self, id: &str) -> Result<Mark> {
        self.get_one(MARKS, id).await
    }

    async fn find_marks_by_url(&self, url: &str) -> Result<Vec<Mark>> {
        empty_if_not_found(self.by_url(MARKS, url).await)
    }

    async fn create_mark(&self, mark: &Mark) -> Result<Mark> {
        self.write(Method::POST, MARKS, mark).await
    }

    async fn update_mark(&self, mark: &Mark) -> Result<Mark> {
        self.write(Method::PUT, MARKS, mark).await
    }

    async fn delete_mark(&self, id: &str) -> Result<()> {
        self.delete(MARKS, id).await
    }

    async fn list_tags(&self) -> Result<Vec<Tag>> {
        self.list(TAGS).await
    }

    async fn create_tag(&self, tag: &Tag) -> Result<Tag> {
        self.write(Method::POST, TAGS, tag).await
    }

    async fn update_tag(&self, tag: &Tag) -> Result<Tag> {
        self.write(Method::PUT, TAGS, tag).await
    }

    async fn delete_tag(&self, id: &str) -> Result<()> {
        self.delete(TAGS, id).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<String> {
        let url = self.endpoint(LOGIN)?;
        // Sent without the current token.
        let builder = self.client.post(url).json(credentials);
        let body = self.send(builder, LOGIN).await?;
        extract_token(&body).ok_or_else(|| ClientError::Decode("login response has no token".into()))
    }
}

fn item_path(collection: &str, id: &str) -> String {
    format!("{collection}/{}", urlencoding::encode(id))
}

/// A list lookup that matched nothing is an empty list, not a missing entity.
fn empty_if_not_found<T>(result: Result<Vec<T>>) -> Result<Vec<T>> {
    match result {
        Err(ClientError::NotFound(_)) => Ok(Vec::new()),
        other => other,
    }
}

/// Parse a response body, treating `null` as a missing entity.
fn decode_body<T: DeserializeOwned>(body: &str, what: &str) -> Result<T> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| ClientError::Decode(e.to_string()))?;
    if value.is_null() {
        return Err(ClientError::NotFound(what.to_string()));
    }
    serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))
}

/// The token arrives as a bare string, a JSON string, or an object field.
fn extract_token(body: &str) -> Option<String> {
    let token = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::String(token)) => token,
        Ok(serde_json::Value::Object(fields)) => ["token", "accessToken", "jwt"]
            .iter()
            .find_map(|key| fields.get(*key).and_then(|v| v.as_str()))
            .map(str::to_string)?,
        Ok(_) => return None,
        Err(_) => body.trim().to_string(),
    };
    Some(token).filter(|t| !t.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn null_body_is_not_found() {
        let err = decode_body::<Bookmark>("null", "bookmarks/x").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn malformed_body_is_decode_error() {
        let err = decode_body::<Vec<Tag>>("{\"oops\":", "tags").unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[test]
    fn decodes_wire_bookmark() {
        let body = r#"{"id":"b1","url":"https://x","origin":"https://x","title":"X",
                       "createdAt":1700000000000,"isStarred":true,"tags":[{"id":"t","name":"a"}]}"#;
        let bookmark: Bookmark = decode_body(body, "bookmarks/b1").unwrap();
        assert!(bookmark.is_starred);
        assert_eq!(bookmark.tags[0].name, "a");
    }

    #[test]
    fn list_lookup_without_match_is_empty() {
        let missing = decode_body::<Vec<Mark>>("null", "marks for https://x");
        assert!(empty_if_not_found(missing).unwrap().is_empty());

        let network: Result<Vec<Mark>> = Err(ClientError::Network("HTTP 500".into()));
        assert!(matches!(
            empty_if_not_found(network),
            Err(ClientError::Network(_))
        ));
    }

    #[rstest]
    #[case("\"abc.def\"", Some("abc.def"))]
    #[case("{\"token\":\"abc\"}", Some("abc"))]
    #[case("{\"accessToken\":\"abc\"}", Some("abc"))]
    #[case("abc", Some("abc"))]
    #[case("\"\"", None)]
    #[case("{}", None)]
    #[case("42", None)]
    fn token_shapes(#[case] body: &str, #[case] expected: Option<&str>) {
        assert_eq!(extract_token(body).as_deref(), expected);
    }

    #[test]
    fn endpoints_hang_off_the_base_path() {
        let config = ClientConfig {
            backend_url: "https://marks.example.com/api".into(),
            ..ClientConfig::default()
        };
        let backend = HttpBackend::new(&config, TokenStore::new()).unwrap();
        assert_eq!(
            backend.endpoint(&item_path(BOOKMARKS, "a b")).unwrap().as_str(),
            "https://marks.example.com/api/bookmarks/a%20b"
        );
        assert_eq!(
            backend.endpoint(LOGIN).unwrap().as_str(),
            "https://marks.example.com/api/users/login"
        );
    }
}
