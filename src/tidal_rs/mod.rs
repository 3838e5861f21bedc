use color_eyre::eyre::{Result, WrapErr};
use reqwest::{Client, RequestBuilder};
use url::Url;

pub mod content;
pub mod playlist;
pub mod tracks;
pub mod types;

pub use types::{TidalPage, TidalPlaylist, TidalTrack};

/// Page size used for every paginated Tidal listing.
pub const PAGE_SIZE: u32 = 100;

/// Everything needed to address the Tidal v1 API on behalf of one user.
///
/// `base_url` must end with a slash so relative endpoints join under it,
/// e.g. `https://api.tidal.com/v1/`.
#[derive(Debug, Clone)]
pub struct TidalSession {
    pub base_url: Url,
    pub access_token: String,
    pub user_id: String,
    pub country_code: String,
}

impl TidalSession {
    /// Builds an endpoint url with the `countryCode` query every v1 call needs.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let mut url = self
            .base_url
            .join(path)
            .wrap_err_with(|| format!("Invalid Tidal endpoint: {}", path))?;
        url.query_pairs_mut()
            .append_pair("countryCode", &self.country_code);
        Ok(url)
    }

    pub fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Accept", "application/json")
            .bearer_auth(&self.access_token)
    }
}

/// Fetches one page of a list endpoint.
pub async fn get_page<T>(
    client: &Client,
    session: &TidalSession,
    path: &str,
    offset: u32,
    limit: u32,
) -> Result<TidalPage<T>>
where
    T: serde::de::DeserializeOwned,
{
    let mut url = session.endpoint(path)?;
    url.query_pairs_mut()
        .append_pair("offset", &offset.to_string())
        .append_pair("limit", &limit.to_string());

    let page = session
        .authorize(client.get(url))
        .send()
        .await?
        .error_for_status()?
        .json::<TidalPage<T>>()
        .await
        .wrap_err_with(|| format!("Failed to deserialize Tidal page of {}", path))?;
    Ok(page)
}

/// Walks a list endpoint page by page and returns every item.
pub async fn get_all_pages<T>(
    client: &Client,
    session: &TidalSession,
    path: &str,
    page_size: u32,
) -> Result<Vec<T>>
where
    T: serde::de::DeserializeOwned,
{
    let mut out: Vec<T> = Vec::new();

    loop {
        let page = get_page::<T>(client, session, path, out.len() as u32, page_size).await?;
        let received = page.items.len();
        if received == 0 {
            break;
        }

        out.extend(page.items);

        if let Some(total) = page.total_number_of_items
            && out.len() as u32 >= total
        {
            break;
        }
        if (received as u32) < page_size {
            break;
        }
    }

    Ok(out)
}
