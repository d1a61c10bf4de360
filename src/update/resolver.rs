//! Cache-aware update resolution
//!
//! One check cycle runs through:
//!
//! ```text
//! CACHE_LOOKUP ─ hit ──────────────────────────────────────▶ DONE (cached)
//!      │
//!     miss
//!      ▼
//!   FETCHING ─ error ──────────────────────────────────────▶ DONE (empty, not cached)
//!      │
//!      ok
//!      ▼
//!  EVALUATING ─ not newer ─────────────────────────────────▶ DONE (empty, cached)
//!      │
//!    newer
//!      ▼
//!  ENRICHING ──────────────────────────────────────────────▶ DONE (record, cached)
//! ```

use std::sync::Arc;

use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::UPDATE_CACHE_TTL;
use crate::update::cache::UpdateCache;
use crate::update::client::{InfoResponse, RemoteInfoClient};
use crate::update::compare::is_newer;
use crate::update::types::{HostEnvironment, ProductEntity, UpdateCheck, UpdateRecord};

/// Resolves update availability for a product, throttled by the cache
///
/// At most one remote fetch happens per product per cache window, no matter
/// how often `resolve` is called. Remote failures are never cached.
pub struct UpdateResolver {
    client: Arc<dyn RemoteInfoClient>,
    cache: UpdateCache,
    channel: String,
}

impl UpdateResolver {
    pub fn new(client: Arc<dyn RemoteInfoClient>, cache: UpdateCache, channel: &str) -> Self {
        Self {
            client,
            cache,
            channel: channel.to_string(),
        }
    }

    /// Returns the update for `product`, or `None` when there is nothing to
    /// offer this cycle
    ///
    /// `force_refresh` drops the cached answer first, so exactly one fresh
    /// remote call is made.
    pub async fn resolve(
        &self,
        product: &ProductEntity,
        environment: &HostEnvironment,
        force_refresh: bool,
    ) -> Option<UpdateRecord> {
        if force_refresh {
            let _ = self.cache.invalidate(&product.id).inspect_err(|e| {
                error!("Failed to invalidate update cache for {}: {}", product.id, e)
            });
        }

        match self.cache.get(&product.id) {
            Ok(Some(check)) => return check.into_record(),
            Ok(None) => {}
            Err(e) => error!("Failed to read update cache for {}: {}", product.id, e),
        }

        let response = match self
            .client
            .fetch_info(&product.id, product.token(), &self.channel, true)
            .await
        {
            Ok(response) if !response.is_error => response,
            Ok(_) => {
                warn!("License server reported an error for product {}", product.id);
                return None;
            }
            Err(e) => {
                error!("Failed to fetch product info for {}: {}", product.id, e);
                return None;
            }
        };

        let check = UpdateCheck::from(build_update(product, &response, environment));

        let _ = self
            .cache
            .put(&product.id, &check, UPDATE_CACHE_TTL)
            .inspect_err(|e| error!("Failed to cache update check for {}: {}", product.id, e));

        check.into_record()
    }
}

/// Build the update record when the remote stable tag is newer than the
/// installed version
pub fn build_update(
    product: &ProductEntity,
    response: &InfoResponse,
    environment: &HostEnvironment,
) -> Option<UpdateRecord> {
    response.get(None)?;

    let new_version = response.get_str("details.stable_tag").unwrap_or_default();
    if !is_newer(new_version, &product.current_version) {
        debug!(
            "{} is up to date ({} >= {:?})",
            product.slug, product.current_version, new_version
        );
        return None;
    }

    info!(
        "Update available for {}: {} -> {}",
        product.slug, product.current_version, new_version
    );

    let package = response
        .get_str("download_url")
        .filter(|url| !url.is_empty())
        .map(|url| package_url(url, environment));

    Some(UpdateRecord {
        slug: product.slug.clone(),
        plugin: product.basename.clone(),
        url: product.purchase_url.clone(),
        new_version: new_version.to_string(),
        tested: response
            .get_str("details.tested")
            .unwrap_or_default()
            .to_string(),
        package,
    })
}

/// Append environment metadata to a download URL as `meta[...]` query
/// parameters. Unknown server software is left out.
pub fn package_url(download_url: &str, environment: &HostEnvironment) -> String {
    let mut params = vec![
        ("meta[wp_version]", environment.host_version.as_str()),
        ("meta[php_version]", environment.runtime_version.as_str()),
    ];
    if let Some(server) = environment.server_software.as_deref() {
        params.push(("meta[web_server]", server));
    }

    match Url::parse(download_url) {
        Ok(mut url) => {
            url.query_pairs_mut().extend_pairs(params);
            url.into()
        }
        Err(e) => {
            debug!("Download URL {:?} is not absolute ({}), appending query", download_url, e);
            let query = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(params)
                .finish();
            let separator = if download_url.contains('?') { '&' } else { '?' };
            format!("{}{}{}", download_url, separator, query)
        }
    }
}
