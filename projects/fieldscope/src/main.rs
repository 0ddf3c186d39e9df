mod cli;
mod commands;
mod web;

use anyhow::Result;
use cli::{Args, Command};
use commands::SeriesSource;
use fieldscope::engine::grid::GridConfig;
use web::server::run_server;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let args = Args::parse_args();
    let grid = GridConfig::new(args.rows, args.cols);

    match args.command {
        Command::Serve { host, port } => run_server(host, port, grid).await?,
        Command::Grid {
            boundary,
            series,
            predictions,
            field_id,
            format,
            out,
        } => {
            let source = match (&series, &predictions, &field_id) {
                (Some(path), _, _) => SeriesSource::File(path),
                (None, Some(path), Some(field_id)) => SeriesSource::Prediction { path, field_id },
                _ => SeriesSource::Empty,
            };
            let values = commands::load_series(source)?;
            commands::run_grid(&boundary, &values, &grid, format, out.as_deref())?;
        }
        Command::Measure { points } => {
            commands::run_measure(&points)?;
        }
        Command::Slot { from, to } => commands::run_slot(&from, to.as_deref())?,
    }

    Ok(())
}
