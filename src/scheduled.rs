// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Entry point invoked by the scheduler: fetch one event, publish it.

use crate::error::Result;
use crate::logging::AppLogger;
use crate::providers::DataSource;
use crate::publisher::EventPublisher;
use tracing::{error, info, Instrument};
use uuid::Uuid;

pub struct ScheduledCollector {
    queue: String,
    datasource: Box<dyn DataSource>,
    publisher: Box<dyn EventPublisher>,
}

impl ScheduledCollector {
    pub fn new(
        queue: impl Into<String>,
        datasource: Box<dyn DataSource>,
        publisher: Box<dyn EventPublisher>,
    ) -> Self {
        Self {
            queue: queue.into(),
            datasource,
            publisher,
        }
    }

    pub fn queue(&self) -> &str {
        &self.queue
    }

    /// Run one collection cycle.
    ///
    /// A failed fetch publishes nothing and the error is returned to the scheduler.
    pub async fn run(&self) -> Result<()> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "collector",
            run.id = %run_id,
            source = self.datasource.source_name(),
            queue = %self.queue
        );

        self.run_cycle().instrument(span).await
    }

    async fn run_cycle(&self) -> Result<()> {
        let event = match self.datasource.fetch().await {
            Ok(event) => event,
            Err(e) => {
                error!(error = %e, "Collecting data failed");
                return Err(e);
            }
        };

        let result = self.publisher.publish(&self.queue, &event).await;
        AppLogger::log_publish_event(&self.queue, event.activities.len(), result.is_ok());
        result?;

        info!("Collection cycle completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DatasourceError;
    use crate::models::{ActivityStats, AthleteStats, Timestamp};
    use crate::publisher::MemoryPublisher;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct FixedSource(Option<AthleteStats>);

    #[async_trait]
    impl DataSource for FixedSource {
        async fn fetch(&self) -> Result<AthleteStats> {
            self.0
                .clone()
                .ok_or_else(|| DatasourceError::Upstream("HTTP 500 Internal Server Error".into()))
        }

        fn source_name(&self) -> &'static str {
            "fixed"
        }
    }

    fn event() -> AthleteStats {
        AthleteStats {
            activity_stats: ActivityStats::default(),
            activities: vec![],
            timestamp: Timestamp::default(),
        }
    }

    #[tokio::test]
    async fn test_run_publishes_to_queue() {
        let publisher = Arc::new(MemoryPublisher::new());
        let collector = ScheduledCollector::new(
            "de.tsl.hdb.strava",
            Box::new(FixedSource(Some(event()))),
            Box::new(publisher.clone()),
        );

        assert_eq!(collector.queue(), "de.tsl.hdb.strava");
        collector.run().await.unwrap();

        let published = publisher.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].0, "de.tsl.hdb.strava");
    }

    #[tokio::test]
    async fn test_failed_fetch_publishes_nothing() {
        let publisher = Arc::new(MemoryPublisher::new());
        let collector = ScheduledCollector::new(
            "de.tsl.hdb.strava",
            Box::new(FixedSource(None)),
            Box::new(publisher.clone()),
        );

        let err = collector.run().await.unwrap_err();
        assert!(err.is_upstream_error());
        assert!(publisher.published().is_empty());
    }
}
