//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, LoadTypeArg, OutputFormat};
use crate::config::{load_config, PagerConfig};
use crate::engine::{EngineFactory, Item, PagingEngine};
use crate::error::{Error, Result, ResultExt};
use crate::fault::{EveryNth, FaultPolicy, OneShotFault};
use crate::params::LoadParams;
use crate::result::{LoadResult, Page};
use crate::retry::{load_page, RetryPolicy};
use crate::source::{SequenceSource, SourceAdapter};
use crate::types::{Generation, LoadType};
use crate::window::{Applied, PageWindow};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

type SeqPage = Page<usize, Item<String>>;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;
        match &self.cli.command {
            Commands::Load {
                load_type,
                key,
                load_size,
                page_size,
                fail_next,
            } => {
                self.load(&config, *load_type, *key, *load_size, *page_size, *fail_next)
                    .await
            }
            Commands::Walk {
                anchor,
                fail_every,
                max_pages,
                generations,
                max_rounds,
            } => {
                self.walk(
                    &config,
                    *anchor,
                    *fail_every,
                    *max_pages,
                    *generations,
                    *max_rounds,
                )
                .await
            }
            Commands::Config => self.show_config(&config),
        }
    }

    /// Load the configuration file, or defaults
    fn load_config(&self) -> Result<PagerConfig> {
        match &self.cli.config {
            Some(path) => load_config(path).map_err(|e| {
                Error::from(
                    anyhow::Error::new(e).context(format!("while loading {}", path.display())),
                )
            }),
            None => Ok(PagerConfig::default()),
        }
    }

    fn factory(
        &self,
        config: &PagerConfig,
        faults: Arc<dyn FaultPolicy>,
    ) -> EngineFactory<SequenceSource> {
        EngineFactory::new(Arc::new(config.source()), config.engine.clone()).with_faults(faults)
    }

    /// Run one load
    async fn load(
        &self,
        config: &PagerConfig,
        load_type: LoadTypeArg,
        key: Option<usize>,
        load_size: Option<usize>,
        page_size: Option<usize>,
        fail_next: bool,
    ) -> Result<()> {
        let load_type = LoadType::from(load_type);
        let fault = Arc::new(OneShotFault::new());
        if fail_next {
            fault.arm();
        }
        let (engine, generation) = self.factory(config, fault).create();

        let default_size = match load_type {
            LoadType::Refresh => config.engine.initial_load_size.get(),
            LoadType::Prepend | LoadType::Append => config.engine.page_size.get(),
        };
        let params = LoadParams::new(
            load_type,
            key,
            load_size.unwrap_or(default_size),
            page_size.unwrap_or(config.engine.page_size.get()),
        )?;

        let result = engine.load(&params).await?;
        match self.cli.format {
            OutputFormat::Json => {
                self.emit_json(&json!({
                    "generation": generation,
                    "params": params,
                    "result": result,
                }))?;
            }
            OutputFormat::Pretty => match &result {
                LoadResult::Page(page) => println!("{}", describe_page(load_type, page)),
                LoadResult::Error(error) => println!("{load_type} {generation}: {error}"),
            },
        }
        Ok(())
    }

    /// Refresh and grow a window to both boundaries, once per generation
    async fn walk(
        &self,
        config: &PagerConfig,
        anchor: Option<usize>,
        fail_every: usize,
        max_pages: Option<usize>,
        generations: u32,
        max_rounds: usize,
    ) -> Result<()> {
        let start = Instant::now();
        let factory = self.factory(config, Arc::new(EveryNth::new(fail_every)));
        let mut window = match max_pages {
            Some(max) => PageWindow::new().with_max_pages(max),
            None => PageWindow::new(),
        };
        let mut stale_page: Option<(Generation, SeqPage)> = None;

        for _ in 0..generations.max(1) {
            let (engine, generation) = factory.create();
            window.reset(generation);

            // A page loaded by the previous generation must not survive the swap.
            if let Some((old, page)) = stale_page.take() {
                let applied = window.apply(old, LoadType::Append, page)?;
                debug_assert_eq!(applied, Applied::Stale);
                self.emit_event("stale", old, &json!({ "dropped": true }))?;
            }

            let params = engine.initial_params(anchor);
            let page = load_page(&engine, &params, &config.retry)
                .await
                .with_context(|| format!("{generation}: initial refresh failed"))?;
            self.emit_page(LoadType::Refresh, generation, &page)?;
            window.apply(generation, LoadType::Refresh, page.clone())?;
            stale_page = Some((generation, page));

            let loaded = self
                .extend(&engine, &mut window, &config.retry, max_rounds)
                .await?;

            info!(
                "{generation}: loaded {loaded} more pages, window holds {} items in {} pages",
                window.len(),
                window.page_count()
            );
            self.emit_event(
                "window",
                generation,
                &json!({
                    "items": window.len(),
                    "pages": window.page_count(),
                    "placeholders_before": window.placeholders_before(),
                    "placeholders_after": window.placeholders_after(),
                    "variant": engine.variant(),
                }),
            )?;
        }

        info!("Walk finished in {}ms", start.elapsed().as_millis());
        Ok(())
    }

    /// Load both edges concurrently until each has reached its boundary
    ///
    /// An edge stops once a page without a continuation key in that
    /// direction has been seen, even if a bounded window later evicts it.
    /// Returns the number of pages added.
    async fn extend<S>(
        &self,
        engine: &PagingEngine<S>,
        window: &mut PageWindow<String>,
        retry: &RetryPolicy,
        max_rounds: usize,
    ) -> Result<usize>
    where
        S: SourceAdapter<Item = String>,
    {
        let generation = engine.generation();
        let mut start_reached = window.prev_key().is_none();
        let mut end_reached = window.next_key().is_none();
        let mut loaded = 0;

        for _ in 0..max_rounds {
            let prev = if start_reached {
                None
            } else {
                window.prev_request(engine.config())
            };
            let next = if end_reached {
                None
            } else {
                window.next_request(engine.config())
            };
            if prev.is_none() && next.is_none() {
                return Ok(loaded);
            }

            let (before, after) = futures::join!(
                async {
                    match &prev {
                        Some(params) => load_page(engine, params, retry).await.map(Some),
                        None => Ok(None),
                    }
                },
                async {
                    match &next {
                        Some(params) => load_page(engine, params, retry).await.map(Some),
                        None => Ok(None),
                    }
                }
            );

            if let Some(page) = before? {
                start_reached |= page.at_start();
                self.emit_page(LoadType::Prepend, generation, &page)?;
                window.apply(generation, LoadType::Prepend, page)?;
                loaded += 1;
            }
            if let Some(page) = after? {
                // A bounded window may have evicted the back page while prepending
                if window.next_key() != Some(page.items_before()) {
                    debug!("Discarding append at {}, window edge moved", page.items_before());
                    continue;
                }
                end_reached |= page.at_end();
                self.emit_page(LoadType::Append, generation, &page)?;
                window.apply(generation, LoadType::Append, page)?;
                loaded += 1;
            }
        }
        info!("{generation}: stopped after {max_rounds} rounds");
        Ok(loaded)
    }

    /// Print the effective configuration
    fn show_config(&self, config: &PagerConfig) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => self.emit_json(&serde_json::to_value(config)?),
            OutputFormat::Pretty => {
                print!("{}", serde_yaml::to_string(config)?);
                Ok(())
            }
        }
    }

    fn emit_page(&self, load_type: LoadType, generation: Generation, page: &SeqPage) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => self.emit_json(&json!({
                "type": "page",
                "load_type": load_type,
                "generation": generation,
                "page": page,
            })),
            OutputFormat::Pretty => {
                println!("{generation} {}", describe_page(load_type, page));
                Ok(())
            }
        }
    }

    fn emit_event(&self, kind: &str, generation: Generation, data: &Value) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => self.emit_json(&json!({
                "type": kind,
                "generation": generation,
                "data": data,
            })),
            OutputFormat::Pretty => {
                println!("{generation} {kind}: {data}");
                Ok(())
            }
        }
    }

    fn emit_json(&self, value: &Value) -> Result<()> {
        let line = serde_json::to_string(value).map_err(Error::from)?;
        println!("{line}");
        Ok(())
    }
}

/// One-line summary of a page
fn describe_page(load_type: LoadType, page: &SeqPage) -> String {
    let range = match (page.items().first(), page.items().last()) {
        (Some(first), Some(last)) => format!("[{}..={}]", first.position, last.position),
        _ => "[]".to_string(),
    };
    let after = page
        .items_after()
        .map_or_else(|| "?".to_string(), |n| n.to_string());
    format!(
        "{load_type} {range} prev={:?} next={:?} before={} after={after}",
        page.prev_key(),
        page.next_key(),
        page.items_before()
    )
}
