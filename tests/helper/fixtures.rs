//! Shared products, environments and adapters

use std::sync::Arc;

use plugin_update_checker::config::UpdaterConfig;
use plugin_update_checker::host::{HostAdapter, Updater};
use plugin_update_checker::update::store::Store;
use plugin_update_checker::update::types::{HostEnvironment, ProductEntity};

use super::client::{MockClient, RecordingHooks};

pub fn product(current_version: &str) -> ProductEntity {
    ProductEntity {
        id: "42".to_string(),
        slug: "acme-forms".to_string(),
        basename: "acme-forms/acme-forms.php".to_string(),
        current_version: current_version.to_string(),
        activation_token: Some("tok-123".to_string()),
        purchase_url: "https://acme.test/buy".to_string(),
        settings_url: "https://site.test/wp-admin/options-general.php?page=acme".to_string(),
    }
}

pub fn product_without_token(current_version: &str) -> ProductEntity {
    ProductEntity {
        activation_token: None,
        ..product(current_version)
    }
}

pub fn environment() -> HostEnvironment {
    HostEnvironment {
        host_version: "6.4.2".to_string(),
        runtime_version: "8.2.12".to_string(),
        server_software: None,
    }
}

/// Attach an adapter for `product` backed by `client` and `store`
pub fn adapter(
    product: ProductEntity,
    client: Arc<MockClient>,
    store: Arc<dyn Store>,
) -> HostAdapter {
    let updater = Updater {
        product,
        client,
        store,
        config: UpdaterConfig::default(),
    };
    HostAdapter::attach(updater, &mut RecordingHooks::new()).unwrap()
}
