use octopus::example::example_metro_map;
use octopus::{MakeSpaceOptions, MakeSpaceReport, MetroMap, Strategy, make_space};
use octopus_graph::SignatureKind;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Octopus(octopus::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Octopus(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<octopus::Error> for CliError {
    fn from(value: octopus::Error) -> Self {
        Self::Octopus(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug)]
struct Args {
    strategy: Strategy,
    config: Option<String>,
    route_margin: Option<f64>,
    edge_margin: Option<f64>,
    pretty: bool,
    verbose: bool,
    out: Option<String>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            strategy: Strategy::Displace,
            config: None,
            route_margin: None,
            edge_margin: None,
            pretty: false,
            verbose: false,
            out: None,
        }
    }
}

#[derive(Serialize)]
struct NodeOut<'a> {
    id: usize,
    name: Option<&'a str>,
    kind: SignatureKind,
    x: f64,
    y: f64,
}

#[derive(Serialize)]
struct EdgeOut {
    id: usize,
    a: usize,
    b: usize,
    routes: Vec<usize>,
    octilinear: bool,
}

#[derive(Serialize)]
struct LayoutOut<'a> {
    nodes: Vec<NodeOut<'a>>,
    edges: Vec<EdgeOut>,
    report: &'a MakeSpaceReport,
}

fn usage() -> &'static str {
    "octopus-cli\n\
\n\
USAGE:\n\
  octopus-cli [--strategy scale|displace] [--config <options.json>] [--route-margin <n>] [--edge-margin <n>] [--pretty] [--verbose] [--out <path>]\n\
\n\
NOTES:\n\
  - Runs the chosen strategy on the built-in demo map and prints nodes, edges and a report as JSON.\n\
  - --config loads MakeSpaceOptions from JSON; margin flags override it.\n\
  - Logs go to stderr; RUST_LOG overrides the default `warn` filter, --verbose sets `debug`.\n\
"
}

fn parse_margin(value: Option<&String>) -> Result<f64, CliError> {
    let Some(value) = value else {
        return Err(CliError::Usage(usage()));
    };
    let margin = value.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
    if !(margin.is_finite() && margin >= 0.0) {
        return Err(CliError::Usage(usage()));
    }
    Ok(margin)
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "--pretty" => args.pretty = true,
            "--verbose" | "-v" => args.verbose = true,
            "--strategy" => {
                let Some(strategy) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.strategy = strategy
                    .parse::<Strategy>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--route-margin" => args.route_margin = Some(parse_margin(it.next())?),
            "--edge-margin" => args.edge_margin = Some(parse_margin(it.next())?),
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            _ => return Err(CliError::Usage(usage())),
        }
    }

    Ok(args)
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_options(args: &Args) -> Result<MakeSpaceOptions, CliError> {
    let mut options = match args.config.as_deref() {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => MakeSpaceOptions::default(),
    };
    if let Some(margin) = args.route_margin {
        options.route_margin = margin;
    }
    if let Some(margin) = args.edge_margin {
        options.edge_margin = margin;
    }
    Ok(options)
}

fn layout_out<'a>(map: &'a MetroMap, report: &'a MakeSpaceReport) -> LayoutOut<'a> {
    let graph = map.graph();
    let nodes = graph
        .nodes()
        .map(|n| NodeOut {
            id: n.id().index(),
            name: n.name(),
            kind: n.signature().kind(),
            x: n.x(),
            y: n.y(),
        })
        .collect();
    let edges = graph
        .edges()
        .into_iter()
        .map(|id| {
            let e = graph.edge(id);
            EdgeOut {
                id: id.index(),
                a: e.node_a().index(),
                b: e.node_b().index(),
                routes: e.routes().iter().map(|r| r.id().index()).collect(),
                octilinear: e.is_octilinear(),
            }
        })
        .collect();
    LayoutOut {
        nodes,
        edges,
        report,
    }
}

fn write_json(value: &impl Serialize, pretty: bool, out: Option<&str>) -> Result<(), CliError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    match out {
        None | Some("-") => println!("{text}"),
        Some(path) => std::fs::write(path, text)?,
    }
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    init_tracing(args.verbose);
    let options = load_options(&args)?;
    let mut map = example_metro_map(options)?;
    tracing::info!(strategy = %args.strategy, "making space in the demo map");
    let report = make_space(&mut map, args.strategy)?;
    write_json(&layout_out(&map, &report), args.pretty, args.out.as_deref())
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
