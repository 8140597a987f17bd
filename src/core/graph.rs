//! Microsoft Graph client for site, library and item listing.

use crate::core::auth::AccessToken;
use crate::core::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::domain::config::SiteLocation;
use crate::domain::error::{ListerError, ListerResult};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use std::collections::HashSet;
use tracing::{debug, warn};

/// One page of a Graph collection
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Site {
    pub id: String,
}

/// A document library
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drive {
    pub id: String,
    pub name: String,
    pub web_url: Option<String>,
}

/// An item inside a library; size and dates are ignored
#[derive(Debug, Clone, Deserialize)]
pub struct DriveItem {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "webUrl", default)]
    pub web_url: Option<String>,
    /// Plain `url` some proxies and fixtures send instead of `webUrl`
    #[serde(default)]
    pub url: Option<String>,
    /// Only its presence matters
    #[serde(default)]
    pub folder: Option<IgnoredAny>,
}

impl DriveItem {
    pub fn is_folder(&self) -> bool {
        self.folder.is_some()
    }

    /// `webUrl` when present, else `url`
    pub fn link(&self) -> Option<&str> {
        self.web_url.as_deref().or(self.url.as_deref())
    }
}

/// What a request is for; drives error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Site,
    Drives,
    Children,
}

impl Target {
    fn describe(self) -> &'static str {
        match self {
            Target::Site => "site lookup",
            Target::Drives => "library lookup",
            Target::Children => "drive children",
        }
    }
}

pub struct GraphClient<'a> {
    transport: &'a dyn HttpTransport,
    endpoint: String,
    token: &'a AccessToken,
    page_size: u32,
}

impl<'a> GraphClient<'a> {
    pub fn new(
        transport: &'a dyn HttpTransport,
        endpoint: &str,
        token: &'a AccessToken,
        page_size: u32,
    ) -> Self {
        Self {
            transport,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token,
            page_size,
        }
    }

    pub fn site_url(&self, site: &SiteLocation) -> String {
        format!(
            "{}/sites/{}?$select=id,webUrl",
            self.endpoint,
            site.graph_address()
        )
    }

    pub fn drives_url(&self, site_id: &str) -> String {
        format!(
            "{}/sites/{}/drives?$select=id,name,webUrl",
            self.endpoint, site_id
        )
    }

    /// Children of the library root, or of a folder when `folder_id` is set
    pub fn children_url(&self, drive_id: &str, folder_id: Option<&str>) -> String {
        let parent = match folder_id {
            Some(id) => format!("items/{}", id),
            None => "root".to_string(),
        };
        format!(
            "{}/drives/{}/{}/children?$select=id,name,webUrl,folder&$top={}",
            self.endpoint, drive_id, parent, self.page_size
        )
    }

    pub async fn resolve_site(&self, site: &SiteLocation) -> ListerResult<Site> {
        let url = self.site_url(site);
        match self.get_json(&url, Target::Site).await {
            Err(ListerError::Api {
                status: Some(404), ..
            }) => Err(ListerError::not_found(format!(
                "site '{}' does not exist",
                site.url
            ))),
            other => other,
        }
    }

    pub async fn list_drives(&self, site_id: &str) -> ListerResult<Vec<Drive>> {
        let mut drives = Vec::new();
        self.drain(self.drives_url(site_id), Target::Drives, |page: Vec<Drive>| {
            drives.extend(page)
        })
        .await?;
        Ok(drives)
    }

    /// Find a library by display name.
    ///
    /// An exact match wins; otherwise a single case-insensitive match is accepted.
    pub async fn resolve_library(&self, site_id: &str, name: &str) -> ListerResult<Drive> {
        let drives = self.list_drives(site_id).await?;
        select_drive(drives, name)
    }

    /// Fetch every page of a folder listing, in order
    pub async fn list_children(
        &self,
        drive_id: &str,
        folder_id: Option<&str>,
    ) -> ListerResult<Vec<DriveItem>> {
        let mut items = Vec::new();
        self.drain(
            self.children_url(drive_id, folder_id),
            Target::Children,
            |page: Vec<DriveItem>| items.extend(page),
        )
        .await?;
        Ok(items)
    }

    async fn drain<T, F>(&self, first: String, target: Target, mut sink: F) -> ListerResult<usize>
    where
        T: DeserializeOwned,
        F: FnMut(Vec<T>),
    {
        let mut next = Some(first);
        let mut visited = HashSet::new();
        let mut pages = 0;

        while let Some(url) = next.take() {
            visited.insert(url.clone());
            let page: Page<T> = self.get_json(&url, target).await?;
            pages += 1;
            debug!(
                "{} page {} returned {} entries",
                target.describe(),
                pages,
                page.value.len()
            );
            sink(page.value);

            if let Some(link) = page.next_link {
                if visited.contains(&link) {
                    warn!("{} returned an already visited nextLink", target.describe());
                    return Err(ListerError::Api {
                        status: None,
                        body: format!("pagination loops back to {}", link),
                    });
                }
                next = Some(link);
            }
        }

        Ok(pages)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, target: Target) -> ListerResult<T> {
        let request = HttpRequest::get(url).bearer(self.token.bearer());
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| ListerError::Api {
                status: None,
                body: format!("{} request failed: {}", target.describe(), e),
            })?;

        check_status(&response, target)?;

        serde_json::from_str(&response.body).map_err(|e| ListerError::Api {
            status: Some(response.status),
            body: format!("invalid JSON in {} response: {}", target.describe(), e),
        })
    }
}

fn check_status(response: &HttpResponse, target: Target) -> ListerResult<()> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 429 {
        return Err(ListerError::RateLimit {
            endpoint: target.describe().to_string(),
            retry_after: response.retry_after(),
        });
    }
    Err(ListerError::Api {
        status: Some(response.status),
        body: response.body.clone(),
    })
}

fn select_drive(drives: Vec<Drive>, name: &str) -> ListerResult<Drive> {
    if let Some(drive) = drives.iter().find(|d| d.name == name) {
        return Ok(drive.clone());
    }

    let folded: Vec<&Drive> = drives
        .iter()
        .filter(|d| d.name.to_lowercase() == name.to_lowercase())
        .collect();

    match folded.as_slice() {
        [only] => Ok((*only).clone()),
        _ => {
            let available: Vec<&str> = drives.iter().map(|d| d.name.as_str()).collect();
            Err(ListerError::not_found(format!(
                "document library '{}' not found (available: {})",
                name,
                if available.is_empty() {
                    "none".to_string()
                } else {
                    available.join(", ")
                }
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive(id: &str, name: &str) -> Drive {
        Drive {
            id: id.to_string(),
            name: name.to_string(),
            web_url: None,
        }
    }

    #[test]
    fn test_select_drive_exact_wins() {
        let drives = vec![drive("1", "documents"), drive("2", "Documents")];
        assert_eq!(select_drive(drives, "Documents").unwrap().id, "2");
    }

    #[test]
    fn test_select_drive_case_insensitive_fallback() {
        let drives = vec![drive("1", "Site Assets"), drive("2", "Documents")];
        assert_eq!(select_drive(drives, "documents").unwrap().id, "2");
    }

    #[test]
    fn test_select_drive_ambiguous_fold() {
        let drives = vec![drive("1", "REPORTS"), drive("2", "Reports")];
        let err = select_drive(drives, "reports").unwrap_err();
        assert!(matches!(err, ListerError::NotFound { .. }));
    }

    #[test]
    fn test_select_drive_lists_available() {
        let drives = vec![drive("1", "Documents"), drive("2", "Site Assets")];
        let err = select_drive(drives, "Archive").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("'Archive'"));
        assert!(message.contains("Documents, Site Assets"));
    }

    #[test]
    fn test_drive_item_url_fields() {
        let item: DriveItem = serde_json::from_str(r#"{"name":"a.docx","url":"https://x/a.docx"}"#).unwrap();
        assert_eq!(item.link(), Some("https://x/a.docx"));
        assert!(!item.is_folder());

        let both: DriveItem = serde_json::from_str(
            r#"{"name":"a.docx","url":"https://proxy/a.docx","webUrl":"https://x/a.docx"}"#,
        )
        .unwrap();
        assert_eq!(both.link(), Some("https://x/a.docx"));

        let folder: DriveItem =
            serde_json::from_str(r#"{"id":"f1","name":"Reports","webUrl":"https://x/Reports","folder":{"childCount":3}}"#)
                .unwrap();
        assert!(folder.is_folder());
    }

    #[test]
    fn test_children_url() {
        let token = AccessToken::new("t");
        struct Never;
        #[async_trait::async_trait]
        impl HttpTransport for Never {
            async fn send(
                &self,
                _request: HttpRequest,
            ) -> Result<HttpResponse, crate::core::transport::TransportError> {
                unreachable!()
            }
        }
        let client = GraphClient::new(&Never, "https://graph.microsoft.com/v1.0/", &token, 50);
        assert_eq!(
            client.children_url("d1", None),
            "https://graph.microsoft.com/v1.0/drives/d1/root/children?$select=id,name,webUrl,folder&$top=50"
        );
        assert_eq!(
            client.children_url("d1", Some("f9")),
            "https://graph.microsoft.com/v1.0/drives/d1/items/f9/children?$select=id,name,webUrl,folder&$top=50"
        );
    }
}
