use crate::adapters::selector::PromptSelector;
use crate::core::session::Session;
use crate::domain::model::CustomerId;
use crate::domain::ports::{CustomerSelector, Pipeline};
use crate::render::Dashboard;
use crate::utils::error::Result;
use crate::utils::monitor::{Phase, SystemMonitor};
use std::io::{BufRead, Write};

#[derive(Debug, Clone)]
pub struct RenderOutcome {
    pub output_path: String,
    pub dashboard: Dashboard,
}

pub struct DashboardEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> DashboardEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Loads the dataset once; the session is reused for every render.
    pub async fn open_session(&self) -> Result<Session> {
        self.monitor.mark(Phase::Start);
        let session = self.pipeline.extract().await?;
        self.monitor.mark(Phase::Fetch);
        Ok(session)
    }

    pub async fn render(&self, session: &Session, customer_id: &CustomerId) -> Result<RenderOutcome> {
        let dashboard = self.pipeline.transform(session, customer_id).await?;
        self.monitor.mark(Phase::Build);

        let output_path = self.pipeline.load(&dashboard).await?;
        self.monitor.mark(Phase::Write);
        tracing::info!("🖼️ Dashboard for customer {} written to {}", customer_id, output_path);

        Ok(RenderOutcome {
            output_path,
            dashboard,
        })
    }

    pub async fn run(&self, selector: &mut dyn CustomerSelector) -> Result<RenderOutcome> {
        let session = self.open_session().await?;
        let customer_id = selector.select(&session.customer_ids())?;
        let outcome = self.render(&session, &customer_id).await?;
        self.monitor.finish(1);
        Ok(outcome)
    }

    /// Renders the initial selection, then re-renders for each customer picked at
    /// the prompt until the user quits. The dataset is fetched only once.
    pub async fn run_interactive<R, W, F>(
        &self,
        initial: &mut dyn CustomerSelector,
        prompt: &mut PromptSelector<R, W>,
        mut on_render: F,
    ) -> Result<Vec<RenderOutcome>>
    where
        R: BufRead,
        W: Write,
        F: FnMut(&RenderOutcome),
    {
        let session = self.open_session().await?;
        let ids = session.customer_ids();

        let mut current = initial.select(&ids)?;
        let mut outcomes = Vec::new();

        loop {
            let outcome = self.render(&session, &current).await?;
            on_render(&outcome);
            outcomes.push(outcome);

            match prompt.next_choice(&ids, Some(&current))? {
                Some(next) => current = next,
                None => break,
            }
        }

        self.monitor.finish(outcomes.len());
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::selector::DefaultSelector;
    use crate::core::pipeline::test_support::*;
    use crate::core::pipeline::DashboardPipeline;
    use crate::domain::model::fixtures::sample_table;
    use std::io::Cursor;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_run_uses_first_customer_by_default() {
        let storage = MockStorage::default();
        let pipeline = DashboardPipeline::new(
            storage.clone(),
            MockConfig::new(),
            Box::new(StaticSource::new(sample_table())),
        );
        let engine = DashboardEngine::new(pipeline);

        let outcome = engine.run(&mut DefaultSelector::default()).await.unwrap();

        assert_eq!(outcome.dashboard.customer_id, CustomerId::from("C001"));
        assert_eq!(outcome.output_path, "test_output/customer_C001.html");
        assert!(storage.get_file("customer_C001.html").await.is_some());
    }

    #[tokio::test]
    async fn test_interactive_session_fetches_once() {
        let storage = MockStorage::default();
        let source = StaticSource::new(sample_table());
        let fetches = source.fetches.clone();
        let pipeline = DashboardPipeline::new(storage.clone(), MockConfig::new(), Box::new(source));
        let engine = DashboardEngine::new(pipeline);

        let mut prompt = PromptSelector::new(Cursor::new("3\nC004\n\n"), Vec::new());
        let mut rendered = Vec::new();
        let outcomes = engine
            .run_interactive(&mut DefaultSelector::default(), &mut prompt, |o| {
                rendered.push(o.dashboard.customer_id.to_string())
            })
            .await
            .unwrap();

        assert_eq!(rendered, vec!["C001", "C003", "C004"]);
        assert_eq!(outcomes.len(), 3);
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert!(storage.get_file("customer_C003.html").await.is_some());

        // 切換客戶只改變參考線，不改變分布
        assert_eq!(outcomes[0].dashboard.histogram.bins, outcomes[2].dashboard.histogram.bins);
        assert_ne!(
            outcomes[0].dashboard.histogram.reference,
            outcomes[2].dashboard.histogram.reference
        );
    }
}
