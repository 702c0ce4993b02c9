use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use crate::error::{GalleryError, RequestError, ResourceLoadError};
use crate::model::FilePath;
use crate::store::{parse_listing, ListSource, ResourceSource};

static LIST_ENDPOINT: &str = "/list";

/// Gallery server reached over HTTP.
#[derive(Clone)]
pub struct HttpStore {
    inner: Client,
    base: Url,
}

impl HttpStore {
    pub fn new(base_url: &str, timeout: Duration) -> Result<HttpStore, GalleryError> {
        let base = Url::parse(base_url).map_err(|err| GalleryError::InvalidUrl {
            url: base_url.to_owned(),
            reason: err.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(GalleryError::InvalidUrl {
                url: base_url.to_owned(),
                reason: "not a base url".to_owned(),
            });
        }

        let inner = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(RequestError::from)?;

        Ok(HttpStore { inner, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub async fn list_paths(&self) -> Result<Vec<FilePath>, RequestError> {
        let url = self
            .base
            .join(LIST_ENDPOINT)
            .map_err(|err| RequestError::Network(err.to_string()))?;
        debug!(%url, "requesting file list");

        let res = self.inner.get(url).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(RequestError::Status(status.as_u16()));
        }

        let body = res.bytes().await?;
        parse_listing(&body)
    }

    pub async fn get_object(&self, src: &str) -> Result<Vec<u8>, ResourceLoadError> {
        let fail = |reason: String| ResourceLoadError {
            path: src.to_owned(),
            reason,
        };

        let url = self.base.join(src).map_err(|err| fail(err.to_string()))?;
        let res = self
            .inner
            .get(url)
            .send()
            .await
            .map_err(|err| fail(err.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            return Err(fail(format!("status {}", status.as_u16())));
        }

        let body = res.bytes().await.map_err(|err| fail(err.to_string()))?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl ListSource for HttpStore {
    async fn list(&self) -> Result<Vec<FilePath>, RequestError> {
        self.list_paths().await
    }
}

#[async_trait]
impl ResourceSource for HttpStore {
    async fn fetch(&self, src: &str) -> Result<usize, ResourceLoadError> {
        let body = self.get_object(src).await?;
        check_image(src, &body)
    }
}

/// A body only counts as loaded when it decodes as an image, the way a
/// browser fires `error` for an html fallback page served at an image url.
fn check_image(src: &str, body: &[u8]) -> Result<usize, ResourceLoadError> {
    let reason = if body.is_empty() {
        "empty body"
    } else if !infer::is_image(body) {
        "not an image"
    } else {
        return Ok(body.len());
    };

    Err(ResourceLoadError {
        path: src.to_owned(),
        reason: reason.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_base_url() {
        let err = HttpStore::new("not a url", Duration::from_secs(1)).err().unwrap();
        assert!(matches!(err, GalleryError::InvalidUrl { .. }));
    }

    #[test]
    fn rejects_non_base_url() {
        let err = HttpStore::new("mailto:someone@example.com", Duration::from_secs(1))
            .err()
            .unwrap();
        assert!(matches!(err, GalleryError::InvalidUrl { .. }));
    }

    #[test]
    fn list_url_is_root_relative() {
        let store = HttpStore::new("http://127.0.0.1:8080/gallery/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            store.base().join(LIST_ENDPOINT).unwrap().as_str(),
            "http://127.0.0.1:8080/list"
        );
    }

    #[test]
    fn image_bytes_are_accepted() {
        let png = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
        assert_eq!(check_image("/a.png", &png), Ok(8));
    }

    #[test]
    fn html_body_is_not_an_image() {
        let err = check_image("/a.png", b"<html>Not Found</html>").unwrap_err();
        assert_eq!(
            err,
            ResourceLoadError {
                path: "/a.png".to_owned(),
                reason: "not an image".to_owned(),
            }
        );
    }

    #[test]
    fn empty_body_is_rejected() {
        let err = check_image("/a.png", b"").unwrap_err();
        assert_eq!(err.reason, "empty body");
    }
}
