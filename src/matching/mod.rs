//! Icon similarity search
//!
//! [`IconMatcher`] runs the whole pipeline for one request: decode the user
//! input, rasterize it, then fan out over the catalog reading, rasterizing
//! and comparing every icon before ranking the scores.
//!
//! Catalog entries are processed as a `buffered` stream so results come back
//! in catalog order, which the stable sort in [`rank_results`] relies on for
//! deterministic tie-breaking. The CPU-bound work runs on tokio's blocking
//! pool.

pub mod ranker;

use futures::{StreamExt, TryStreamExt, stream};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::config::{EntryErrorPolicy, MatchingConfig};
use crate::errors::{AppError, AppResult, MatchError, MatchResultOf};
use crate::imaging::{
    CompareOptions, RasterBuffer, Rasterizer, compare, decode_png_input, decode_svg_input,
};
use crate::models::{IconRecord, InputKind, MatchResult};

pub use ranker::rank_results;

/// Origin label used for the user's image in error messages
const USER_INPUT: &str = "user input";

#[derive(Debug, Clone)]
pub struct IconMatcher {
    catalog: Arc<Catalog>,
    config: Arc<MatchingConfig>,
    rasterizer: Rasterizer,
}

impl IconMatcher {
    pub fn new(catalog: Arc<Catalog>, config: MatchingConfig) -> Self {
        let rasterizer = Rasterizer::new(config.raster_size);
        Self {
            catalog,
            config: Arc::new(config),
            rasterizer,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Mismatch ratio at or above which a match is dropped for this input kind
    pub fn filter_limit(&self, kind: InputKind) -> f64 {
        match kind {
            InputKind::Png => self.config.png_filter_limit,
            InputKind::Svg => self.config.svg_filter_limit,
        }
    }

    fn compare_options(&self) -> CompareOptions {
        CompareOptions {
            threshold: self.config.threshold,
            include_aa: self.config.include_aa,
        }
    }

    /// Decode the raw request value and return the best catalog matches
    pub async fn find_similar(&self, kind: InputKind, raw: &str) -> AppResult<Vec<MatchResult>> {
        let bytes = match kind {
            InputKind::Png => decode_png_input(raw)?,
            InputKind::Svg => decode_svg_input(raw),
        };
        debug!("Decoded {} input ({} bytes)", kind, bytes.len());

        let filter_limit = self.filter_limit(kind);
        let run = async {
            let input = self.rasterize_input(bytes).await?;
            self.rank(input, filter_limit).await
        };

        match self.config.timeout {
            Some(deadline) => tokio::time::timeout(deadline, run)
                .await
                .map_err(|_| AppError::timeout(deadline))?,
            None => run.await,
        }
    }

    /// Rasterize the user's image on the blocking pool
    pub async fn rasterize_input(&self, bytes: Vec<u8>) -> AppResult<RasterBuffer> {
        let rasterizer = self.rasterizer.clone();
        let raster =
            run_blocking(USER_INPUT, move || rasterizer.rasterize(&bytes, USER_INPUT)).await?;
        Ok(raster)
    }

    /// Score every catalog icon against `input` and rank the scores
    pub async fn rank(&self, input: RasterBuffer, filter_limit: f64) -> AppResult<Vec<MatchResult>> {
        let input = Arc::new(input);
        let concurrency = self
            .config
            .max_concurrency
            .unwrap_or(self.catalog.len())
            .max(1);

        let records = self.catalog.records();
        let scored = stream::iter(0..records.len())
            .map(|i| self.score_entry(&records[i], Arc::clone(&input)))
            .buffered(concurrency);

        let results: Vec<MatchResult> = match self.config.on_entry_error {
            EntryErrorPolicy::Abort => scored.try_collect().await?,
            EntryErrorPolicy::Skip => {
                scored
                    .filter_map(|outcome| async move {
                        match outcome {
                            Ok(result) => Some(result),
                            Err(e) => {
                                warn!("Skipping catalog entry: {}", e);
                                None
                            }
                        }
                    })
                    .collect()
                    .await
            }
        };

        debug!(
            "Scored {} of {} catalog icons (filter limit {})",
            results.len(),
            self.catalog.len(),
            filter_limit
        );

        Ok(rank_results(results, filter_limit, self.config.slice_limit))
    }

    async fn score_entry(
        &self,
        record: &IconRecord,
        input: Arc<RasterBuffer>,
    ) -> MatchResultOf<MatchResult> {
        let path = self.catalog.resolve(record);
        let origin = path.display().to_string();
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| MatchError::rasterization(&origin, e))?;

        let rasterizer = self.rasterizer.clone();
        let options = self.compare_options();
        let total_pixels = self.config.pixel_count();
        let id = record.id.clone();

        run_blocking(&path.display().to_string(), move || {
            let raster = rasterizer.rasterize(&bytes, &origin)?;
            let different = compare(&input, &raster, &options)?;
            Ok(MatchResult::from_count(id, different, total_pixels))
        })
        .await
    }
}

/// Run image work on the blocking pool
///
/// A panic inside the image backends surfaces as a rasterization error for
/// `origin` instead of tearing down the request.
async fn run_blocking<T, F>(origin: &str, work: F) -> MatchResultOf<T>
where
    F: FnOnce() -> MatchResultOf<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| MatchError::rasterization(origin, e))?
}
