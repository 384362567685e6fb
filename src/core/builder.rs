use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{
    catalog::MessageCatalog, config::FeedConfig, connection::ConnectionSupervisor, feed::UpdateFeed,
    hub::UpdateHub, source::UpdateSource,
};
use crate::{
    error::FeedError,
    events::StatusBus,
    policies::{Dice, RandomSource},
    subscribers::Subscribe,
};

/// Builder for constructing an [`UpdateFeed`] with injected dependencies.
pub struct FeedBuilder {
    cfg: FeedConfig,
    dice: Option<Dice>,
    catalog: MessageCatalog,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl FeedBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: FeedConfig) -> Self {
        Self {
            cfg,
            dice: None,
            catalog: MessageCatalog::default(),
            subscribers: Vec::new(),
        }
    }

    /// Replaces the random source (default: thread-local `rand`).
    ///
    /// Scheduled emission and connection checks draw from this one source.
    pub fn with_random(mut self, source: impl RandomSource) -> Self {
        self.dice = Some(Dice::new(source));
        self
    }

    /// Shares an existing [`Dice`] handle with the feed.
    pub fn with_dice(mut self, dice: Dice) -> Self {
        self.dice = Some(dice);
        self
    }

    /// Replaces the message pools used for scheduled updates.
    pub fn with_catalog(mut self, catalog: MessageCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Subscribers registered before the feed is handed out, in order.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Validates the configuration and wires every component.
    ///
    /// No timers run until [`UpdateFeed::start`].
    pub fn build(self) -> Result<UpdateFeed, FeedError> {
        self.cfg.validate()?;

        let dice = self.dice.unwrap_or_default();
        let root = CancellationToken::new();
        let bus = StatusBus::new(self.cfg.status_capacity_clamped());
        let hub = Arc::new(UpdateHub::new(self.cfg.max_updates_clamped()));

        let connection = Arc::new(ConnectionSupervisor::new(
            &self.cfg,
            dice.clone(),
            bus.clone(),
            root.clone(),
        ));
        let source = Arc::new(UpdateSource::new(
            &self.cfg,
            self.catalog,
            dice,
            hub.clone(),
            connection.clone(),
            root.clone(),
        ));
        for sub in self.subscribers {
            hub.registry.subscribe_arc(sub);
        }
        debug!(event = "feed.built", subscribers = hub.registry.len());

        Ok(UpdateFeed {
            cfg: self.cfg,
            hub,
            source,
            connection,
            bus,
            root,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::Template;
    use crate::events::{Update, UpdateKind};
    use crate::policies::ScriptedRandom;

    #[test]
    fn test_build_registers_initial_subscribers() {
        let subs: Vec<Arc<dyn Subscribe>> = vec![
            Arc::new(|_: &Update| {}),
            Arc::new(|_: &Update| {}),
        ];
        let feed = FeedBuilder::new(FeedConfig::default())
            .with_subscribers(subs)
            .build()
            .unwrap();
        assert_eq!(feed.subscriber_count(), 2);
    }

    #[test]
    fn test_build_uses_injected_catalog_and_dice() {
        let catalog = MessageCatalog::empty()
            .with_pool(UpdateKind::Audit, vec![Template::new("Only", "One")]);
        // kind 0.2 → Audit, no escalation, template index 0
        let feed = FeedBuilder::new(FeedConfig::default())
            .with_catalog(catalog)
            .with_random(ScriptedRandom::new([0.2, 0.9, 0.0]))
            .build()
            .unwrap();

        let up = feed.source.synthesize();
        assert_eq!(up.kind, UpdateKind::Audit);
        assert_eq!(up.title, "Only");
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let mut cfg = FeedConfig::default();
        cfg.emission.escalate = 3.0;
        assert!(FeedBuilder::new(cfg).build().is_err());
    }
}
