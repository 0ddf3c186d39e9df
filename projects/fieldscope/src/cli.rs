use clap::{Parser, Subcommand, ValueEnum};
use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Grid rows used when a request does not specify them
    #[arg(long, global = true, default_value_t = 15, env = "FIELDSCOPE_GRID_ROWS")]
    pub rows: usize,

    /// Grid columns used when a request does not specify them
    #[arg(long, global = true, default_value_t = 15, env = "FIELDSCOPE_GRID_COLS")]
    pub cols: usize,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the engine over HTTP
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1", env = "FIELDSCOPE_HOST")]
        host: IpAddr,

        /// Port to bind to
        #[arg(long, default_value_t = 12207, env = "FIELDSCOPE_PORT")]
        port: u16,
    },
    /// Rasterize an index series over a GeoJSON polygon
    Grid {
        /// GeoJSON Polygon geometry file
        #[arg(long)]
        boundary: PathBuf,

        /// JSON array of index values
        #[arg(long, conflicts_with = "predictions")]
        series: Option<PathBuf>,

        /// JSON array of prediction records; the latest one for --field-id is used
        #[arg(long, requires = "field_id")]
        predictions: Option<PathBuf>,

        #[arg(long)]
        field_id: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Measure a path given as `lat,lng` pairs
    Measure {
        #[arg(required = true, num_args = 2.., allow_hyphen_values = true)]
        points: Vec<String>,
    },
    /// Compute or check a 14-day monitoring slot
    Slot {
        /// Start date (YYYY-MM-DD or RFC 3339 timestamp)
        #[arg(long)]
        from: String,

        /// End date to check against the computed one
        #[arg(long)]
        to: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Csv,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_grid_command() {
        let args = Args::try_parse_from([
            "fieldscope",
            "grid",
            "--boundary",
            "field.geojson",
            "--series",
            "ndvi.json",
            "--format",
            "csv",
            "--rows",
            "10",
        ])
        .unwrap();
        assert_eq!(args.rows, 10);
        assert_eq!(args.cols, 15);
        match args.command {
            Command::Grid { format, series, .. } => {
                assert_eq!(format, OutputFormat::Csv);
                assert_eq!(series, Some(PathBuf::from("ndvi.json")));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_predictions_require_field_id() {
        let res = Args::try_parse_from([
            "fieldscope",
            "grid",
            "--boundary",
            "field.geojson",
            "--predictions",
            "preds.json",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn test_measure_needs_two_points() {
        assert!(Args::try_parse_from(["fieldscope", "measure", "0,0"]).is_err());
        let args = Args::try_parse_from(["fieldscope", "measure", "0,0", "0,1"]).unwrap();
        match args.command {
            Command::Measure { points } => assert_eq!(points, vec!["0,0", "0,1"]),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
