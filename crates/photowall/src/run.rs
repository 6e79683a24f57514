use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use gallery::{GalleryHost, Manifest};
use renderer::{Renderer, RendererConfig};

use crate::cli::Cli;
use crate::defaults;

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub fn run(cli: Cli) -> Result<()> {
    let manifest = Manifest::load(&cli.manifest)
        .with_context(|| format!("failed to load manifest {}", cli.manifest.display()))?;
    tracing::info!(
        manifest = %cli.manifest.display(),
        images = manifest.images.len(),
        "gallery manifest loaded"
    );

    let host = GalleryHost::new(&manifest);

    let config = RendererConfig {
        surface_size: cli.size,
        vertex_source: cli
            .vertex
            .unwrap_or_else(|| defaults::DEFAULT_VERTEX.to_string()),
        fragment_source: cli
            .fragment
            .unwrap_or_else(|| defaults::DEFAULT_FRAGMENT.to_string()),
        geometry: cli.geometry,
        distortion: cli.distortion,
        policy: cli.policy,
    };

    let renderer = Renderer::new(config).context("invalid renderer configuration")?;
    renderer.run(Box::new(host))
}
