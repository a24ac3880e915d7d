/// Drive v3 REST client
///
/// The three remote operations the gallery needs: list image files,
/// download file content, delete a file. Nothing else of the API surface
/// is wrapped.

use futures_util::StreamExt;
use serde::Deserialize;
use std::path::Path;

use super::auth::Authenticator;
use super::DriveError;

/// Base URL for file listing, content, and deletion.
const FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";

/// Server-side filter: only files whose MIME type marks them as images.
const IMAGE_QUERY: &str = "mimeType contains 'image/'";

/// The listing fields the gallery consumes.
const LIST_FIELDS: &str = "nextPageToken, files(id, name, mimeType)";

/// One file as returned by the listing call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DriveFile {
    /// Opaque Drive file id
    pub id: String,
    /// Display name (e.g. "IMG_0001.jpg")
    pub name: String,
    /// MIME type reported by Drive
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

impl DriveFile {
    /// Whether the reported MIME type is an image type proper.
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// One page of a files.list response.
#[derive(Debug, Deserialize)]
struct FileListResponse {
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
    #[serde(default)]
    files: Vec<DriveFile>,
}

/// Error payload shape of Drive API failures.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Authenticated handle to the Drive API.
#[derive(Debug)]
pub struct DriveClient {
    http: reqwest::Client,
    auth: Authenticator,
}

impl DriveClient {
    /// Build a client from a service-account key file.
    /// Fails fast on an unreadable or invalid key file.
    pub fn from_key_file(path: &Path) -> Result<Self, DriveError> {
        let http = reqwest::Client::new();
        let auth = Authenticator::from_key_file(path, http.clone())?;

        Ok(Self { http, auth })
    }

    /// The account this client acts as.
    pub fn account(&self) -> &str {
        self.auth.client_email()
    }

    /// List every image file in the account, following pagination until
    /// the listing is exhausted. Order is the server's listing order.
    pub async fn list_images(&self) -> Result<Vec<DriveFile>, DriveError> {
        let token = self.auth.access_token().await?;
        let mut files = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .http
                .get(FILES_URL)
                .bearer_auth(&token)
                .query(&[("q", IMAGE_QUERY), ("fields", LIST_FIELDS)]);
            if let Some(ref t) = page_token {
                request = request.query(&[("pageToken", t.as_str())]);
            }

            let page: FileListResponse = check(request.send().await?).await?.json().await?;
            files.extend(page.files);

            match page.next_page_token {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        // The query is matched by the server; keep only entries whose
        // type is an image regardless of what it returned.
        files.retain(DriveFile::is_image);

        Ok(files)
    }

    /// Download the full content of a file, streamed chunk by chunk.
    pub async fn download_file(&self, file_id: &str) -> Result<Vec<u8>, DriveError> {
        let token = self.auth.access_token().await?;
        let response = self
            .http
            .get(format!("{FILES_URL}/{file_id}"))
            .bearer_auth(&token)
            .query(&[("alt", "media")])
            .send()
            .await?;
        let response = check(response).await?;

        let mut content = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            content.extend_from_slice(&chunk?);
        }

        Ok(content)
    }

    /// Permanently delete a file from the account.
    pub async fn delete_file(&self, file_id: &str) -> Result<(), DriveError> {
        let token = self.auth.access_token().await?;
        let response = self
            .http
            .delete(format!("{FILES_URL}/{file_id}"))
            .bearer_auth(&token)
            .send()
            .await?;
        check(response).await?;

        Ok(())
    }
}

/// Map non-success responses to an API error carrying the server's own
/// message where one is present.
async fn check(response: reqwest::Response) -> Result<reqwest::Response, DriveError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = api_message(&body).unwrap_or(body);

    Err(DriveError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Extract the human-readable message from a Drive error body.
fn api_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorResponse>(body)
        .ok()
        .map(|e| e.error.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_page_parses() {
        let body = r#"{
            "nextPageToken": "token-2",
            "files": [
                {"id": "1aB", "name": "sunset.jpg", "mimeType": "image/jpeg"},
                {"id": "2cD", "name": "plot.png", "mimeType": "image/png"}
            ]
        }"#;

        let page: FileListResponse = serde_json::from_str(body).unwrap();

        assert_eq!(page.next_page_token.as_deref(), Some("token-2"));
        assert_eq!(page.files.len(), 2);
        assert_eq!(page.files[0].id, "1aB");
        assert_eq!(page.files[1].mime_type, "image/png");
    }

    #[test]
    fn test_final_listing_page_has_no_token() {
        let body = r#"{"files": [{"id": "1aB", "name": "a.gif", "mimeType": "image/gif"}]}"#;
        let page: FileListResponse = serde_json::from_str(body).unwrap();

        assert!(page.next_page_token.is_none());
        assert_eq!(page.files.len(), 1);
    }

    #[test]
    fn test_empty_listing_page_parses() {
        // Drive omits "files" entirely when nothing matches.
        let page: FileListResponse = serde_json::from_str("{}").unwrap();

        assert!(page.files.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn test_image_mime_filter() {
        let file = |mime: &str| DriveFile {
            id: "x".to_string(),
            name: "x".to_string(),
            mime_type: mime.to_string(),
        };

        assert!(file("image/jpeg").is_image());
        assert!(file("image/svg+xml").is_image());
        assert!(!file("application/pdf").is_image());
        assert!(!file("video/mp4").is_image());
    }

    #[test]
    fn test_api_error_message_extraction() {
        let body = r#"{"error": {"code": 404, "message": "File not found: 1aB"}}"#;
        assert_eq!(api_message(body).as_deref(), Some("File not found: 1aB"));

        // Proxies sometimes answer with HTML; fall back to the raw body.
        assert!(api_message("<html>502</html>").is_none());
    }
}
