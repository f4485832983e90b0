use rayon::prelude::*;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::events::source::EventSource;
use crate::foundation::error::{PlaceError, PlaceResult};
use crate::render::raster::{HeatScale, RenderedFrame, render_snapshot};
use crate::sim::config::GenerateConfig;
use crate::sim::driver::{FrameSnapshot, SimulationDriver};

#[derive(Clone, Debug)]
pub struct RenderThreading {
    pub parallel: bool,
    pub chunk_size: usize,
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 16,
            threads: None,
        }
    }
}

/// Presentation and threading options for [`generate`].
#[derive(Clone, Debug, Default)]
pub struct RenderOpts {
    pub heat_scale: HeatScale,
    pub threading: RenderThreading,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerateStats {
    pub frames: u64,
    pub events_applied: u64,
}

/// Replay `source` under `cfg` and push every rendered frame pair into `sink`.
///
/// Snapshots are always produced sequentially. With `threading.parallel`, each chunk of
/// snapshots is rendered on a rayon pool and then pushed in frame order.
#[tracing::instrument(skip(source, sink))]
pub fn generate<S: EventSource>(
    source: S,
    cfg: &GenerateConfig,
    opts: &RenderOpts,
    sink: &mut dyn FrameSink,
) -> PlaceResult<GenerateStats> {
    let canvas = source.canvas();
    let mut driver = SimulationDriver::new(source, cfg)?;
    let pool = if opts.threading.parallel {
        Some(build_thread_pool(opts.threading.threads)?)
    } else {
        None
    };

    sink.begin(SinkConfig {
        canvas,
        frames: driver.timeline().len(),
        fps: u32::try_from(cfg.fps)
            .map_err(|_| PlaceError::config(format!("fps {} does not fit in u32", cfg.fps)))?,
    })?;

    let chunk_size = normalized_chunk_size(opts.threading.chunk_size);
    let mut frames = 0u64;
    loop {
        let mut chunk = Vec::with_capacity(chunk_size);
        while chunk.len() < chunk_size {
            match driver.next_frame()? {
                Some(snapshot) => chunk.push(snapshot),
                None => break,
            }
        }
        if chunk.is_empty() {
            break;
        }

        let rendered = match &pool {
            Some(pool) => render_chunk_parallel(&chunk, opts.heat_scale, pool)?,
            None => render_chunk_sequential(&chunk, opts.heat_scale)?,
        };
        for frame in &rendered {
            sink.push_frame(frame)?;
        }
        frames += rendered.len() as u64;
        tracing::debug!(
            frames_done = frames,
            events_applied = driver.events_applied(),
            "chunk rendered"
        );
    }

    sink.end()?;
    let stats = GenerateStats {
        frames,
        events_applied: driver.events_applied(),
    };
    tracing::info!(
        frames = stats.frames,
        events_applied = stats.events_applied,
        "generate complete"
    );
    Ok(stats)
}

fn render_chunk_sequential(
    chunk: &[FrameSnapshot],
    scale: HeatScale,
) -> PlaceResult<Vec<RenderedFrame>> {
    chunk.iter().map(|s| render_snapshot(s, scale)).collect()
}

fn render_chunk_parallel(
    chunk: &[FrameSnapshot],
    scale: HeatScale,
    pool: &rayon::ThreadPool,
) -> PlaceResult<Vec<RenderedFrame>> {
    // `collect` on an indexed parallel iterator keeps frame order.
    pool.install(|| {
        chunk
            .par_iter()
            .map(|s| render_snapshot(s, scale))
            .collect::<PlaceResult<Vec<_>>>()
    })
}

fn build_thread_pool(threads: Option<usize>) -> PlaceResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(PlaceError::config(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| PlaceError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> usize {
    chunk_size.max(1)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
