//! Competitive research stage: search, scrape and aggregate competitor pages
use crate::extract::extract_competitors;
use async_trait::async_trait;
use launch_core::data_model::CompetitorSummary;
use launch_core::{
    AnalysisContext, CompetitorRecord, PageScraper, ScrapedPage, SearchHit, SearchProvider, Stage,
    StageKind,
};
use std::sync::Arc;

/// Search hits per competitor considered for scraping
const PAGES_PER_COMPETITOR: usize = 2;

/// Competitive research: search each competitor named in the task, scrape the
/// top hits and fold the pages into a [`CompetitorRecord`].
pub struct ResearchStage {
    search: Arc<dyn SearchProvider>,
    scraper: Arc<dyn PageScraper>,
}

impl ResearchStage {
    pub fn new(search: Arc<dyn SearchProvider>, scraper: Arc<dyn PageScraper>) -> Self {
        Self { search, scraper }
    }
}

#[async_trait]
impl Stage for ResearchStage {
    fn name(&self) -> &'static str {
        "CompetitiveResearcher"
    }

    fn role(&self) -> &'static str {
        "Competitive Intelligence Analyst"
    }

    fn kind(&self) -> StageKind {
        StageKind::Research
    }

    async fn execute(&self, mut ctx: AnalysisContext, task: &str) -> AnalysisContext {
        self.log_action(&mut ctx, &format!("Starting competitive research for: {}", task));

        let competitors = extract_competitors(task);

        for competitor in &competitors {
            self.log_action(&mut ctx, &format!("Researching competitor: {}", competitor));

            let hits = self.search.search_competitor(competitor).await;
            tracing::debug!(competitor = %competitor, hits = hits.len(), "search finished");

            for hit in hits.iter().take(PAGES_PER_COMPETITOR).filter(|h| h.has_url()) {
                let page = self.scraper.scrape(&hit.url).await;
                if page.is_success() {
                    ctx.scraped_pages.push(page);
                } else {
                    tracing::debug!(url = %hit.url, error = ?page.error, "scrape dropped");
                }
            }

            ctx.search_hits.extend(hits);
        }

        ctx.competitor_record = Some(aggregate(&ctx.scraped_pages, &ctx.search_hits));

        self.log_action(
            &mut ctx,
            &format!("Completed research on {} competitors", competitors.len()),
        );
        ctx
    }
}

/// Fold scraped pages and search hits into a competitor record
pub fn aggregate(pages: &[ScrapedPage], hits: &[SearchHit]) -> CompetitorRecord {
    let competitor_details = pages
        .iter()
        .map(|page| {
            let url = if page.url.is_empty() { "unknown" } else { page.url.as_str() };
            (
                url.to_string(),
                CompetitorSummary {
                    title: page.title.clone(),
                    pricing_info: page.pricing_mentions.clone(),
                    features: page.feature_mentions.clone(),
                    description: page.description.clone(),
                },
            )
        })
        .collect();

    CompetitorRecord {
        competitors_analyzed: pages.len(),
        total_sources: hits.len(),
        competitor_details,
        key_findings: key_findings(pages),
    }
}

fn key_findings(pages: &[ScrapedPage]) -> Vec<String> {
    let mut findings = Vec::new();

    let pricing = pages.iter().filter(|p| !p.pricing_mentions.is_empty()).count();
    if pricing > 0 {
        findings.push(format!("Found pricing information for {} competitors", pricing));
    }

    let features = pages.iter().filter(|p| !p.feature_mentions.is_empty()).count();
    if features > 0 {
        findings.push(format!("Identified features for {} competitors", features));
    }

    findings
}
