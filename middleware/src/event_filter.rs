use async_trait::async_trait;
use mbot_core::{Event, Middleware, Result};

/// Lets through only the listed event kinds (`posted`, `reaction_added`, ...).
#[derive(Debug, Clone)]
pub struct EventFilter {
    kinds: Vec<String>,
}

impl EventFilter {
    pub fn new<I, K>(kinds: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            kinds: kinds.into_iter().map(Into::into).collect(),
        }
    }

    /// Keeps new posts only.
    pub fn posts() -> Self {
        Self::new(["posted"])
    }

    pub fn kinds(&self) -> &[String] {
        &self.kinds
    }
}

#[async_trait]
impl<C> Middleware<C> for EventFilter
where
    C: Send + Sync + ?Sized,
{
    fn name(&self) -> &str {
        "event_filter"
    }

    async fn process(&self, _ctx: &C, event: &mut Event) -> Result<bool> {
        let kind = event.kind();
        Ok(self.kinds.iter().any(|k| k == kind))
    }
}
