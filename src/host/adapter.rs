use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::config::UpdaterConfig;
use crate::host::hooks::{
    HOOK_PRIORITY, Hook, HookOutput, HookRegistry, HostEvent, RequestContext, UpdateTransient,
};
use crate::update::cache::UpdateCache;
use crate::update::client::RemoteInfoClient;
use crate::update::details::format_details;
use crate::update::error::ConfigError;
use crate::update::notice::{Notice, select_notice};
use crate::update::resolver::UpdateResolver;
use crate::update::store::Store;
use crate::update::types::ProductEntity;

/// Host action that requests plugin details
const PLUGIN_INFORMATION_ACTION: &str = "plugin_information";

/// Everything the updater needs before it can be attached to a host
pub struct Updater {
    pub product: ProductEntity,
    pub client: Arc<dyn RemoteInfoClient>,
    pub store: Arc<dyn Store>,
    pub config: UpdaterConfig,
}

/// Connects the update engine to the host's hooks
///
/// Each entry point takes host-shaped input and returns host-shaped output;
/// remote failures always degrade to "nothing to add".
pub struct HostAdapter {
    product: ProductEntity,
    client: Arc<dyn RemoteInfoClient>,
    resolver: UpdateResolver,
    config: UpdaterConfig,
    hooks: Vec<Hook>,
}

impl HostAdapter {
    /// Validate the product and register the updater's hooks
    ///
    /// Fails when the host cannot register hooks or the product is missing
    /// required fields.
    pub fn attach(updater: Updater, registry: &mut dyn HookRegistry) -> Result<Self, ConfigError> {
        if !registry.supports_hooks() {
            return Err(ConfigError::HostUnavailable);
        }
        updater.product.validate()?;

        let hooks = vec![
            Hook::PluginDetails,
            Hook::UpdateCheck,
            Hook::UpdateMessage {
                basename: updater.product.basename.clone(),
            },
        ];
        for hook in &hooks {
            registry.add_hook(hook, HOOK_PRIORITY, hook.accepted_args());
            debug!("Registered hook {}", hook.name());
        }

        info!(
            "Update checks attached for {} ({})",
            updater.product.slug, updater.product.current_version
        );

        let resolver = UpdateResolver::new(
            updater.client.clone(),
            UpdateCache::new(updater.store),
            &updater.config.channel,
        );

        Ok(Self {
            product: updater.product,
            client: updater.client,
            resolver,
            config: updater.config,
            hooks,
        })
    }

    /// Hooks registered by [`HostAdapter::attach`]
    pub fn hooks(&self) -> &[Hook] {
        &self.hooks
    }

    pub fn product(&self) -> &ProductEntity {
        &self.product
    }

    /// Route a host event to its entry point
    pub async fn dispatch(&self, event: HostEvent, context: &RequestContext) -> HookOutput {
        match event {
            HostEvent::UpdateCheck(transient) => {
                HookOutput::Transient(self.enrich_update_transient(transient, context).await)
            }
            HostEvent::PluginDetails { action, slug } => {
                HookOutput::Details(self.plugin_details(&action, slug.as_deref()).await)
            }
            HostEvent::UpdateMessage => HookOutput::Notice(self.update_message().await),
        }
    }

    /// Add this product's update, if any, to the host's update transient
    ///
    /// The host may call this several times per request; the resolver's cache
    /// keeps it to one remote call per window.
    pub async fn enrich_update_transient(
        &self,
        mut transient: UpdateTransient,
        context: &RequestContext,
    ) -> UpdateTransient {
        let Some(response) = transient.response.as_mut() else {
            return transient;
        };

        let update = self
            .resolver
            .resolve(&self.product, &context.environment, context.force_check)
            .await;

        if let Some(update) = update {
            match serde_json::to_value(&update) {
                Ok(value) => {
                    response.insert(self.product.basename.clone(), value);
                }
                Err(e) => warn!("Failed to serialize update for {}: {}", self.product.slug, e),
            }
        }

        transient
    }

    /// Provide the "view details" payload for this product
    ///
    /// Returns `None` when the request is for another action or plugin, or
    /// when no valid details are available; the host then keeps its own result.
    pub async fn plugin_details(
        &self,
        action: &str,
        slug: Option<&str>,
    ) -> Option<Map<String, Value>> {
        if action != PLUGIN_INFORMATION_ACTION || slug.unwrap_or_default() != self.product.slug {
            return None;
        }

        let response = self
            .client
            .fetch_info(
                &self.product.id,
                self.product.token(),
                &self.config.channel,
                false,
            )
            .await
            .inspect_err(|e| warn!("Failed to fetch details for {}: {}", self.product.slug, e))
            .ok()?;

        if response.is_error {
            warn!("License server reported an error for {} details", self.product.slug);
            return None;
        }

        format_details(&response)
    }

    /// Select the license notice shown under this product's update row
    pub async fn update_message(&self) -> Notice {
        let license = match self.product.token() {
            Some(token) => self
                .client
                .fetch_license(token)
                .await
                .inspect_err(|e| warn!("Failed to look up license for {}: {}", self.product.slug, e))
                .ok(),
            None => None,
        };

        select_notice(&self.product, license.as_ref(), &self.config.date_format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::hooks::MockHookRegistry;
    use crate::update::client::InfoResponse;
    use crate::update::error::RemoteError;
    use crate::update::store::MemoryStore;
    use crate::update::types::LicenseState;
    use mockall::predicate::{always, eq};

    struct UnreachableClient;

    #[async_trait::async_trait]
    impl RemoteInfoClient for UnreachableClient {
        async fn fetch_info(
            &self,
            _product_id: &str,
            _token: Option<&str>,
            _channel: &str,
            _detailed: bool,
        ) -> Result<InfoResponse, RemoteError> {
            Err(RemoteError::InvalidResponse("unreachable".to_string()))
        }

        async fn fetch_license(&self, _token: &str) -> Result<LicenseState, RemoteError> {
            Err(RemoteError::InvalidResponse("unreachable".to_string()))
        }
    }

    fn updater(product: ProductEntity) -> Updater {
        Updater {
            product,
            client: Arc::new(UnreachableClient),
            store: Arc::new(MemoryStore::new()),
            config: UpdaterConfig::default(),
        }
    }

    fn product() -> ProductEntity {
        ProductEntity {
            id: "42".to_string(),
            slug: "acme-forms".to_string(),
            basename: "acme-forms/acme-forms.php".to_string(),
            current_version: "1.0.0".to_string(),
            activation_token: Some("tok".to_string()),
            purchase_url: "https://acme.test/buy".to_string(),
            settings_url: "https://site.test/settings".to_string(),
        }
    }

    #[test]
    fn attach_fails_when_host_has_no_hooks() {
        let mut registry = MockHookRegistry::new();
        registry.expect_supports_hooks().return_const(false);
        registry.expect_add_hook().never();

        let result = HostAdapter::attach(updater(product()), &mut registry);

        assert!(matches!(result, Err(ConfigError::HostUnavailable)));
    }

    #[test]
    fn attach_fails_for_incomplete_product() {
        let mut registry = MockHookRegistry::new();
        registry.expect_supports_hooks().return_const(true);
        registry.expect_add_hook().never();

        let product = ProductEntity {
            basename: String::new(),
            ..product()
        };
        let result = HostAdapter::attach(updater(product), &mut registry);

        assert!(matches!(
            result,
            Err(ConfigError::MissingField("basename"))
        ));
    }

    #[test]
    fn attach_registers_three_hooks_at_default_priority() {
        let mut registry = MockHookRegistry::new();
        registry.expect_supports_hooks().return_const(true);
        registry
            .expect_add_hook()
            .with(eq(Hook::PluginDetails), eq(HOOK_PRIORITY), eq(3))
            .times(1)
            .return_const(());
        registry
            .expect_add_hook()
            .with(eq(Hook::UpdateCheck), eq(HOOK_PRIORITY), eq(1))
            .times(1)
            .return_const(());
        registry
            .expect_add_hook()
            .with(
                eq(Hook::UpdateMessage {
                    basename: "acme-forms/acme-forms.php".to_string(),
                }),
                eq(HOOK_PRIORITY),
                always(),
            )
            .times(1)
            .return_const(());

        let adapter = HostAdapter::attach(updater(product()), &mut registry).unwrap();

        assert_eq!(adapter.hooks().len(), 3);
    }

    #[tokio::test]
    async fn enrich_update_transient_passes_through_transient_without_response() {
        let mut registry = MockHookRegistry::new();
        registry.expect_supports_hooks().return_const(true);
        registry.expect_add_hook().return_const(());
        let adapter = HostAdapter::attach(updater(product()), &mut registry).unwrap();

        let transient = UpdateTransient::default();
        let result = adapter
            .enrich_update_transient(transient.clone(), &RequestContext::default())
            .await;

        assert_eq!(result, transient);
    }

    #[tokio::test]
    async fn plugin_details_ignores_other_actions_and_slugs() {
        let mut registry = MockHookRegistry::new();
        registry.expect_supports_hooks().return_const(true);
        registry.expect_add_hook().return_const(());
        let adapter = HostAdapter::attach(updater(product()), &mut registry).unwrap();

        assert_eq!(adapter.plugin_details("query_plugins", Some("acme-forms")).await, None);
        assert_eq!(adapter.plugin_details(PLUGIN_INFORMATION_ACTION, Some("other")).await, None);
        assert_eq!(adapter.plugin_details(PLUGIN_INFORMATION_ACTION, None).await, None);
    }
}
