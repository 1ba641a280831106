use std::sync::{Arc, PoisonError, RwLock};

use indexmap::IndexMap;
use tracing::debug;

use crate::client::{IncogniaApi, IncogniaApiBuilder, IncogniaError, SecureString};

type ClientKey = (String, SecureString);

/// Keeps one shared client per credential set.
///
/// Creating a client per call would drop its token cache and connection pool each time.
/// Applications that cannot pass a client around hold a `ClientRegistry` instead, in
/// their own state: there is no process-wide instance.
///
/// # Example
///
/// ```rust
/// use incognia_api::{ClientRegistry, IncogniaApi};
///
/// # fn example() -> Result<(), incognia_api::IncogniaError> {
/// let registry = ClientRegistry::new();
///
/// let api = registry.get_or_init(IncogniaApi::builder("client-id", "client-secret"))?;
/// let same = registry.get_or_init(IncogniaApi::builder("client-id", "client-secret"))?;
/// assert!(std::sync::Arc::ptr_eq(&api, &same));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: RwLock<IndexMap<ClientKey, Arc<IncogniaApi>>>,
}

impl ClientRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the client registered for the builder credentials, building it first if needed.
    ///
    /// When a client already exists, the other builder settings are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`IncogniaError::Configuration`] if the client must be built and the builder
    /// configuration is invalid.
    pub fn get_or_init(&self, builder: IncogniaApiBuilder) -> Result<Arc<IncogniaApi>, IncogniaError> {
        let key = (
            builder.client_id().to_string(),
            builder.client_secret().clone(),
        );
        if let Some(api) = self.find(&key) {
            return Ok(api);
        }

        let mut clients = self.clients.write().unwrap_or_else(PoisonError::into_inner);
        // Registered by another thread meanwhile
        if let Some(api) = clients.get(&key) {
            return Ok(Arc::clone(api));
        }
        let api = Arc::new(builder.build()?);
        debug!(client_id = api.client_id(), "client registered");
        clients.insert(key, Arc::clone(&api));
        Ok(api)
    }

    /// Returns the client registered for these credentials.
    pub fn get(
        &self,
        client_id: impl Into<String>,
        client_secret: impl Into<SecureString>,
    ) -> Option<Arc<IncogniaApi>> {
        self.find(&(client_id.into(), client_secret.into()))
    }

    /// Returns the only registered client.
    ///
    /// # Errors
    ///
    /// Returns [`IncogniaError::Configuration`] if no client, or more than one, is registered.
    pub fn single(&self) -> Result<Arc<IncogniaApi>, IncogniaError> {
        let clients = self.clients.read().unwrap_or_else(PoisonError::into_inner);
        match clients.len() {
            0 => Err(IncogniaError::configuration("no client registered")),
            1 => clients
                .values()
                .next()
                .map(Arc::clone)
                .ok_or_else(|| IncogniaError::configuration("no client registered")),
            count => Err(IncogniaError::configuration(format!(
                "{count} clients registered, the credentials must be given"
            ))),
        }
    }

    /// Returns the number of registered clients.
    pub fn len(&self) -> usize {
        self.clients
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no client is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn find(&self, key: &ClientKey) -> Option<Arc<IncogniaApi>> {
        let clients = self.clients.read().unwrap_or_else(PoisonError::into_inner);
        clients.get(key).cloned()
    }
}
