mod cmd;
mod output;
mod session;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, history::HistorySubcommand};
use session::Session;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "kft",
    about = "Browse Kubernetes pods and copy files to and from them through kubectl",
    version,
    propagate_version = true
)]
struct Cli {
    /// Directory holding config.yaml and history.yaml (default: ~/.kft)
    #[arg(long, global = true, env = "KFT_HOME")]
    home: Option<PathBuf>,

    /// kubectl binary to invoke (default: kubectl.binary from config, then PATH)
    #[arg(long, global = true, env = "KFT_KUBECTL")]
    kubectl: Option<PathBuf>,

    /// kubeconfig context (default: config, then the only context, then current-context)
    #[arg(long, global = true)]
    context: Option<String>,

    /// Namespace (default: config, then `default` if it exists)
    #[arg(long, short = 'n', global = true)]
    namespace: Option<String>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List kubeconfig contexts
    Contexts,

    /// List namespaces in the selected context
    Namespaces,

    /// List pods in the selected namespace
    Pods,

    /// List the containers of a pod
    Containers { pod: String },

    /// List files at a path inside a pod (`ls -la`)
    Ls {
        pod: String,
        /// Path inside the pod (default: defaults.pod_path)
        path: Option<String>,
        /// Container to exec into
        #[arg(long, short = 'c')]
        container: Option<String>,
    },

    /// Copy local files or directories into a pod
    Upload {
        pod: String,
        /// Local files or directories (each is copied separately)
        #[arg(required = true)]
        local: Vec<String>,
        /// Destination path inside the pod (default: defaults.pod_path)
        #[arg(long = "to", value_name = "POD_PATH")]
        pod_path: Option<String>,
        #[arg(long, short = 'c')]
        container: Option<String>,
    },

    /// Copy a file or directory out of a pod
    Download {
        pod: String,
        /// Source path inside the pod
        pod_path: String,
        /// Local destination
        #[arg(long = "to", value_name = "LOCAL_PATH", default_value = ".")]
        local: String,
        #[arg(long, short = 'c')]
        container: Option<String>,
    },

    /// Show or clear the transfer history
    History {
        #[command(subcommand)]
        subcommand: Option<HistorySubcommand>,
    },

    /// Inspect and modify ~/.kft/config.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Run the local JSON bridge for UI front ends
    Serve {
        /// Port to listen on (0 = OS-assigned; default: server.port)
        #[arg(long)]
        port: Option<u16>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = Session::open(
        cli.home.as_deref(),
        cli.kubectl,
        cli.context,
        cli.namespace,
        cli.json,
    )
    .and_then(|session| match cli.command {
        Commands::Contexts => cmd::cluster::contexts(&session),
        Commands::Namespaces => cmd::cluster::namespaces(&session),
        Commands::Pods => cmd::cluster::pods(&session),
        Commands::Containers { pod } => cmd::cluster::containers(&session, &pod),
        Commands::Ls {
            pod,
            path,
            container,
        } => cmd::files::ls(&session, &pod, path, container),
        Commands::Upload {
            pod,
            local,
            pod_path,
            container,
        } => cmd::transfer::upload(&session, &pod, &local, pod_path, container),
        Commands::Download {
            pod,
            pod_path,
            local,
            container,
        } => cmd::transfer::download(&session, &pod, &pod_path, &local, container),
        Commands::History { subcommand } => cmd::history::run(&session, subcommand),
        Commands::Config { subcommand } => cmd::config::run(&session, subcommand),
        Commands::Serve { port } => cmd::serve::run(&session, port),
    });

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
