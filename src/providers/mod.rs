// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::error::Result;
use crate::models::AthleteStats;
use async_trait::async_trait;

pub mod strava;

/// A source producing one event per scheduled collection cycle
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch(&self) -> Result<AthleteStats>;

    fn source_name(&self) -> &'static str;
}
