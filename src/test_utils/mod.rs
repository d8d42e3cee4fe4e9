//! Shared helpers for unit tests: a resource builder and a channel-backed
//! fake resource provider.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::SystemTime;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::feed::ResourceProvider;
use crate::model::CommandState;
use crate::model::Resource;
use crate::model::ResourceChange;
use crate::model::ResourceCommand;
use crate::model::ResourceUrl;
use crate::Result;

/// Start building a test resource. Defaults: display name equals the name,
/// type `Container`, no state, no parent.
pub(crate) fn resource(name: &str) -> ResourceBuilder {
    ResourceBuilder {
        inner: Resource {
            name: name.to_string(),
            display_name: name.to_string(),
            resource_type: "Container".to_string(),
            state: None,
            start_timestamp: None,
            parent_name: None,
            uid: format!("uid-{name}"),
            commands: Vec::new(),
            properties: HashMap::new(),
            environment: HashMap::new(),
            urls: Vec::new(),
        },
    }
}

pub(crate) struct ResourceBuilder {
    inner: Resource,
}

impl ResourceBuilder {
    pub fn display_name(
        mut self,
        display_name: &str,
    ) -> Self {
        self.inner.display_name = display_name.to_string();
        self
    }

    pub fn resource_type(
        mut self,
        resource_type: &str,
    ) -> Self {
        self.inner.resource_type = resource_type.to_string();
        self
    }

    pub fn state(
        mut self,
        state: &str,
    ) -> Self {
        self.inner.state = Some(state.to_string());
        self
    }

    pub fn parent(
        mut self,
        parent: &str,
    ) -> Self {
        self.inner.parent_name = Some(parent.to_string());
        self
    }

    pub fn start_timestamp(
        mut self,
        timestamp: SystemTime,
    ) -> Self {
        self.inner.start_timestamp = Some(timestamp);
        self
    }

    pub fn command(
        mut self,
        name: &str,
        is_highlighted: bool,
        state: CommandState,
    ) -> Self {
        self.inner.commands.push(ResourceCommand {
            name: name.to_string(),
            display_name: name.to_string(),
            confirmation_message: None,
            is_highlighted,
            state,
        });
        self
    }

    pub fn property(
        mut self,
        key: &str,
        value: &str,
    ) -> Self {
        self.inner.properties.insert(key.to_string(), value.to_string());
        self
    }

    pub fn env(
        mut self,
        key: &str,
        value: &str,
    ) -> Self {
        self.inner.environment.insert(key.to_string(), value.to_string());
        self
    }

    pub fn url(
        mut self,
        url: &str,
        is_internal: bool,
    ) -> Self {
        self.inner.urls.push(ResourceUrl {
            name: None,
            url: url.to_string(),
            is_internal,
        });
        self
    }

    pub fn build(self) -> Resource {
        self.inner
    }
}

/// Channel-backed provider: the test pushes change batches through the
/// returned sender. The channel is pre-created so the sender is available
/// before subscription; the capacity the engine requested is recorded for
/// assertions instead. Subscribing twice panics, mirroring the one
/// subscription per session contract.
pub(crate) struct FakeResourceProvider {
    snapshot: Vec<Resource>,
    changes: Mutex<Option<mpsc::Receiver<Vec<ResourceChange>>>>,
    requested_capacity: Mutex<Option<usize>>,
}

impl FakeResourceProvider {
    pub fn with_snapshot(snapshot: Vec<Resource>) -> (Arc<Self>, mpsc::Sender<Vec<ResourceChange>>) {
        let (tx, rx) = mpsc::channel(16);
        let provider = Arc::new(Self {
            snapshot,
            changes: Mutex::new(Some(rx)),
            requested_capacity: Mutex::new(None),
        });
        (provider, tx)
    }

    /// The buffer capacity the engine asked for on subscribe, if any.
    pub fn requested_capacity(&self) -> Option<usize> {
        *self.requested_capacity.lock()
    }
}

#[async_trait]
impl ResourceProvider for FakeResourceProvider {
    async fn subscribe(
        &self,
        buffer_capacity: usize,
        _cancellation: CancellationToken,
    ) -> Result<(Vec<Resource>, mpsc::Receiver<Vec<ResourceChange>>)> {
        *self.requested_capacity.lock() = Some(buffer_capacity);
        let changes = self
            .changes
            .lock()
            .take()
            .expect("fake provider supports a single subscription");
        Ok((self.snapshot.clone(), changes))
    }
}
