use crate::core::auth::acquire_token;
use crate::core::graph::{Drive, DriveItem, GraphClient};
use crate::core::transport::HttpTransport;
use crate::domain::config::{ListerConfig, ListerSettings, SiteLocation};
use crate::domain::error::{ListerError, ListerResult};
use crate::domain::model::{FileRecord, OutputDocument};
use crate::infrastructure::output_file::write_document;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Lists a document library and writes the result
pub struct Lister {
    transport: Arc<dyn HttpTransport>,
    settings: ListerSettings,
}

/// Folder waiting to be listed in recursive mode
struct PendingFolder {
    id: Option<String>,
    /// Path segments below the library root
    path: Vec<String>,
}

impl Lister {
    pub fn new(transport: Arc<dyn HttpTransport>, settings: ListerSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    /// Full pipeline: validate, authenticate, list, then write `config.output`
    pub async fn run(&self, config: &ListerConfig) -> ListerResult<OutputDocument> {
        let document = self.collect(config).await?;
        write_document(&config.output, &document, config.pretty)?;
        info!(
            "Wrote {} file record(s) to {}",
            document.len(),
            config.output.display()
        );
        Ok(document)
    }

    /// Everything `run` does except writing the output file
    pub async fn collect(&self, config: &ListerConfig) -> ListerResult<OutputDocument> {
        let site = config.validate()?;
        info!(
            "Listing library '{}' on {}",
            config.library_name, site.url
        );

        let token = acquire_token(self.transport.as_ref(), &self.settings, &config.credentials).await?;
        let graph = GraphClient::new(
            self.transport.as_ref(),
            &self.settings.graph_endpoint,
            &token,
            self.settings.page_size,
        );

        let resolved_site = graph.resolve_site(&site).await?;
        debug!("Resolved site id {}", resolved_site.id);

        let drive = graph
            .resolve_library(&resolved_site.id, &config.library_name)
            .await?;
        debug!("Resolved library '{}' to drive {}", drive.name, drive.id);

        let library_url = library_url(&site, &drive)?;

        let mut files = Vec::new();
        let mut queue = VecDeque::from([PendingFolder {
            id: None,
            path: Vec::new(),
        }]);

        while let Some(folder) = queue.pop_front() {
            let items = graph.list_children(&drive.id, folder.id.as_deref()).await?;
            debug!(
                "Folder '/{}' returned {} item(s)",
                folder.path.join("/"),
                items.len()
            );

            for item in items {
                files.push(to_record(&site, &library_url, &folder.path, &item)?);

                if config.recursive && item.is_folder() {
                    if let Some(id) = item.id.clone() {
                        let mut path = folder.path.clone();
                        path.push(item.name.clone());
                        queue.push_back(PendingFolder { id: Some(id), path });
                    }
                }
            }
        }

        info!("Collected {} file record(s)", files.len());
        Ok(OutputDocument::new(files))
    }
}

/// Web URL of the library root: the drive's own `webUrl`, else site URL + library name
fn library_url(site: &SiteLocation, drive: &Drive) -> ListerResult<Url> {
    if let Some(url) = drive.web_url.as_deref().and_then(|u| Url::parse(u).ok()) {
        return Ok(url);
    }
    append_segments(&site.url, std::iter::once(drive.name.as_str()))
}

fn append_segments<'s>(base: &Url, segments: impl IntoIterator<Item = &'s str>) -> ListerResult<Url> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|_| ListerError::config(format!("site URL '{}' cannot be a base", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Map a listed item to its output record
fn to_record(
    site: &SiteLocation,
    library_url: &Url,
    folder: &[String],
    item: &DriveItem,
) -> ListerResult<FileRecord> {
    let url = match item.link() {
        Some(web) if Url::parse(web).is_ok() => web.to_string(),
        Some(web) if web.starts_with('/') => site
            .url
            .join(web)
            .map(String::from)
            .map_err(|e| ListerError::Api {
                status: None,
                body: format!("unusable webUrl '{}' for '{}': {}", web, item.name, e),
            })?,
        _ => append_segments(
            library_url,
            folder
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(item.name.as_str())),
        )?
        .to_string(),
    };

    Ok(FileRecord {
        name: item.name.clone(),
        url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteLocation {
        SiteLocation::parse("https://t.sharepoint.com/sites/s").unwrap()
    }

    fn item(name: &str, web_url: Option<&str>) -> DriveItem {
        DriveItem {
            id: Some(format!("id-{}", name)),
            name: name.to_string(),
            web_url: web_url.map(str::to_string),
            url: None,
            folder: None,
        }
    }

    #[test]
    fn test_absolute_web_url_is_kept() {
        let lib = Url::parse("https://t.sharepoint.com/sites/s/Shared%20Documents").unwrap();
        let record = to_record(
            &site(),
            &lib,
            &[],
            &item("a.docx", Some("https://t.sharepoint.com/sites/s/Shared%20Documents/a.docx")),
        )
        .unwrap();
        assert_eq!(record.name, "a.docx");
        assert_eq!(
            record.url,
            "https://t.sharepoint.com/sites/s/Shared%20Documents/a.docx"
        );
    }

    #[test]
    fn test_web_url_preferred_over_url() {
        let lib = Url::parse("https://t.sharepoint.com/sites/s/Shared%20Documents").unwrap();
        let mut listed = item("a.docx", Some("https://t.sharepoint.com/sites/s/Shared%20Documents/a.docx"));
        listed.url = Some("https://proxy.example/a.docx".to_string());

        let record = to_record(&site(), &lib, &[], &listed).unwrap();
        assert_eq!(
            record.url,
            "https://t.sharepoint.com/sites/s/Shared%20Documents/a.docx"
        );

        listed.web_url = None;
        let record = to_record(&site(), &lib, &[], &listed).unwrap();
        assert_eq!(record.url, "https://proxy.example/a.docx");
    }

    #[test]
    fn test_server_relative_web_url_joined_to_origin() {
        let lib = Url::parse("https://t.sharepoint.com/sites/s/Shared%20Documents").unwrap();
        let record = to_record(
            &site(),
            &lib,
            &[],
            &item("b.xlsx", Some("/sites/s/Shared%20Documents/b.xlsx")),
        )
        .unwrap();
        assert_eq!(
            record.url,
            "https://t.sharepoint.com/sites/s/Shared%20Documents/b.xlsx"
        );
    }

    #[test]
    fn test_missing_web_url_built_from_folder_path() {
        let lib = Url::parse("https://t.sharepoint.com/sites/s/Shared%20Documents").unwrap();
        let folder = vec!["Q1 Reports".to_string()];
        let record = to_record(&site(), &lib, &folder, &item("plan #1.docx", None)).unwrap();
        assert_eq!(
            record.url,
            "https://t.sharepoint.com/sites/s/Shared%20Documents/Q1%20Reports/plan%20%231.docx"
        );
    }

    #[test]
    fn test_library_url_falls_back_to_name() {
        let drive = Drive {
            id: "d".to_string(),
            name: "Documents".to_string(),
            web_url: None,
        };
        assert_eq!(
            library_url(&site(), &drive).unwrap().as_str(),
            "https://t.sharepoint.com/sites/s/Documents"
        );

        let trailing = SiteLocation::parse("https://t.sharepoint.com/sites/s/").unwrap();
        assert_eq!(
            library_url(&trailing, &drive).unwrap().as_str(),
            "https://t.sharepoint.com/sites/s/Documents"
        );
    }
}
