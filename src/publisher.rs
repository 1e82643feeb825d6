// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Handoff of produced events to the message queue.
//!
//! The queue transport lives outside this crate. [`StdoutPublisher`] writes one
//! JSON envelope per event to stdout, where the function runtime's forwarder
//! picks it up.

use crate::error::{DatasourceError, Result};
use crate::models::AthleteStats;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tokio::io::AsyncWriteExt;

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, queue: &str, event: &AthleteStats) -> Result<()>;
}

#[async_trait]
impl<P: EventPublisher + ?Sized> EventPublisher for Arc<P> {
    async fn publish(&self, queue: &str, event: &AthleteStats) -> Result<()> {
        (**self).publish(queue, event).await
    }
}

/// Envelope written for every published event
#[derive(Debug, Serialize)]
pub struct QueueMessage<'a> {
    pub queue: &'a str,
    pub event: &'a AthleteStats,
}

/// Render the envelope for one event as a single JSON line.
pub fn encode_message(queue: &str, event: &AthleteStats) -> Result<String> {
    let mut line = serde_json::to_string(&QueueMessage { queue, event })?;
    line.push('\n');
    Ok(line)
}

#[derive(Debug, Default, Clone)]
pub struct StdoutPublisher;

#[async_trait]
impl EventPublisher for StdoutPublisher {
    async fn publish(&self, queue: &str, event: &AthleteStats) -> Result<()> {
        let line = encode_message(queue, event)?;
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(line.as_bytes())
            .await
            .map_err(|e| DatasourceError::Publish(e.to_string()))?;
        stdout
            .flush()
            .await
            .map_err(|e| DatasourceError::Publish(e.to_string()))
    }
}

/// Keeps published events in memory
#[derive(Debug, Default)]
pub struct MemoryPublisher {
    published: Mutex<Vec<(String, AthleteStats)>>,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events published so far, with their queue names.
    pub fn published(&self) -> Vec<(String, AthleteStats)> {
        self.published
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl EventPublisher for MemoryPublisher {
    async fn publish(&self, queue: &str, event: &AthleteStats) -> Result<()> {
        self.published
            .lock()
            .map_err(|e| DatasourceError::Publish(e.to_string()))?
            .push((queue.to_string(), event.clone()));
        Ok(())
    }
}
