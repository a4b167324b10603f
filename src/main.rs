use anyhow::Context;
use clap::Parser;
use graphview::{load_graph, Cli};
use graphview_core::RenderableGraph;
use graphview_visualization::GraphViewer;
use simple_logger::SimpleLogger;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    SimpleLogger::new()
        .with_level(cli.log_level())
        .init()
        .context("Failed to initialize logging")?;

    let mut stdout = std::io::stdout();
    let Some(graph) = load_graph(&cli.vertices, &cli.edges, &mut stdout)? else {
        return Ok(());
    };

    let geometry = RenderableGraph::from(&graph);
    log::info!(
        "Rendering {} points and {} lines",
        geometry.point_count(),
        geometry.line_count()
    );

    GraphViewer::new(geometry, cli.viewer_config())
        .run()
        .context("Viewer failed")?;

    Ok(())
}
