use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{eyre, Result};
use serde::Serialize;

use socialgraph_core::config::DEFAULT_PAGE_SIZE;
use socialgraph_core::logging::init_logging;
use socialgraph_core::models::{HobbyCambio, NuevoUsuario, UsuarioCambios};
use socialgraph_core::{Catalog, Config, HobbyRepository, SocialGraph, UsuarioRepository};

#[derive(Parser)]
#[command(name = "socialgraph")]
#[command(about = "Manage and analyze a social network stored as a property graph", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./socialgraph.toml or the user config)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use a throwaway in-memory store
    #[arg(long, global = true)]
    memory: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the schema and load the hobby catalog
    Init,
    /// List hobbies with their category
    Hobbies,
    /// Manage users
    #[command(subcommand)]
    User(UserCommand),
    /// Connect one user to another
    Connect { origin: i64, dest: i64 },
    /// Remove a connection
    Disconnect { origin: i64, dest: i64 },
    /// List the outgoing connections of a user
    Connections { id: i64 },
    /// Shortest path between two users
    Path {
        origin: i64,
        dest: i64,
        #[arg(long)]
        max_depth: Option<usize>,
    },
    /// Friend-of-friend recommendations
    Recommend {
        id: i64,
        #[arg(long)]
        min_common: Option<usize>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// One-hop neighborhood of a user
    Ego {
        id: i64,
        #[arg(long)]
        max_nodes: Option<usize>,
    },
    /// Group users by hobby
    Communities {
        /// Group by hobby category instead
        #[arg(long)]
        by_category: bool,
    },
    /// Every connection in the graph
    AllConnections,
}

#[derive(Subcommand)]
enum UserCommand {
    /// Create a user
    Create(UserFields),
    /// Show a user
    Get { id: i64 },
    /// Update a user; omitted fields keep their value
    Update {
        id: i64,
        #[arg(long)]
        nombre: Option<String>,
        #[arg(long)]
        apellidos: Option<String>,
        #[arg(long)]
        edad: Option<i64>,
        #[arg(long, allow_hyphen_values = true)]
        latitud: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        longitud: Option<f64>,
        #[arg(long, conflicts_with = "clear_hobby")]
        hobby: Option<i64>,
        /// Remove the current hobby
        #[arg(long)]
        clear_hobby: bool,
    },
    /// Delete a user and its connections
    Delete { id: i64 },
    /// List users
    List {
        #[arg(long, default_value_t = 0)]
        skip: usize,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        limit: usize,
    },
}

#[derive(Args)]
struct UserFields {
    #[arg(long)]
    nombre: String,
    #[arg(long)]
    apellidos: String,
    #[arg(long)]
    edad: i64,
    #[arg(long, allow_hyphen_values = true)]
    latitud: f64,
    #[arg(long, allow_hyphen_values = true)]
    longitud: f64,
    #[arg(long)]
    hobby: Option<i64>,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    if cli.memory {
        config.store.in_memory = true;
    }
    init_logging(&config.logging);
    tracing::debug!(
        in_memory = config.store.in_memory,
        path = %config.store.path,
        "socialgraph starting"
    );

    let graph = SocialGraph::open(&config.store).await?;
    let analysis = &config.analysis;

    match cli.command {
        Commands::Init => {
            let loaded = graph.load_catalog(&Catalog::default()).await?;
            if !loaded {
                tracing::info!("hobby catalog already present, nothing loaded");
            }
            print_json(&serde_json::json!({ "catalog_loaded": loaded }))?;
        }
        Commands::Hobbies => print_json(&graph.hobbies().list().await?)?,
        Commands::User(command) => run_user(&graph, command).await?,
        Commands::Connect { origin, dest } => {
            graph.usuarios().create_connection(origin, dest).await?;
            print_json(&serde_json::json!({ "origen": origin, "destino": dest }))?;
        }
        Commands::Disconnect { origin, dest } => {
            graph.usuarios().delete_connection(origin, dest).await?;
            print_json(&serde_json::json!({ "origen": origin, "destino": dest, "deleted": true }))?;
        }
        Commands::Connections { id } => print_json(&graph.usuarios().list_connections(id).await?)?,
        Commands::Path {
            origin,
            dest,
            max_depth,
        } => {
            let depth = max_depth.unwrap_or(analysis.default_max_depth);
            print_json(&graph.shortest_path().find(origin, dest, depth).await?)?;
        }
        Commands::Recommend {
            id,
            min_common,
            limit,
        } => {
            let min_common = min_common.unwrap_or(analysis.default_min_common_friends);
            let limit = limit.unwrap_or(analysis.default_recommendation_limit);
            print_json(&graph.recommender().recommend(id, min_common, limit).await?)?;
        }
        Commands::Ego { id, max_nodes } => {
            let max_nodes = max_nodes.unwrap_or(analysis.default_ego_max_nodes);
            print_json(&graph.ego_networks().extract(id, max_nodes).await?)?;
        }
        Commands::Communities { by_category } => {
            let report = if by_category {
                graph.communities().by_category().await?
            } else {
                graph.communities().by_hobby().await?
            };
            print_json(&report)?;
        }
        Commands::AllConnections => print_json(&graph.connections().list_all().await?)?,
    }

    Ok(())
}

async fn run_user(graph: &SocialGraph, command: UserCommand) -> Result<()> {
    let usuarios = graph.usuarios();

    match command {
        UserCommand::Create(fields) => {
            let mut nuevo = NuevoUsuario::new(
                fields.nombre,
                fields.apellidos,
                fields.edad,
                fields.latitud,
                fields.longitud,
            );
            nuevo.hobby_id = fields.hobby;
            print_json(&usuarios.create(nuevo).await?)?;
        }
        UserCommand::Get { id } => {
            let usuario = usuarios
                .find_by_id(id)
                .await?
                .ok_or_else(|| eyre!("usuario {} not found", id))?;
            print_json(&usuario)?;
        }
        UserCommand::Update {
            id,
            nombre,
            apellidos,
            edad,
            latitud,
            longitud,
            hobby,
            clear_hobby,
        } => {
            let hobby = match (hobby, clear_hobby) {
                (Some(hobby_id), _) => HobbyCambio::Set(hobby_id),
                (None, true) => HobbyCambio::Clear,
                (None, false) => HobbyCambio::Keep,
            };
            let cambios = UsuarioCambios {
                nombre,
                apellidos,
                edad,
                latitud,
                longitud,
                hobby,
            };
            if cambios.is_empty() {
                return Err(eyre!("nothing to update"));
            }
            print_json(&usuarios.update(id, cambios).await?)?;
        }
        UserCommand::Delete { id } => {
            usuarios.delete(id).await?;
            print_json(&serde_json::json!({ "id_usuario": id, "deleted": true }))?;
        }
        UserCommand::List { skip, limit } => {
            let page = usuarios.find_all(skip, limit).await?;
            print_json(&serde_json::json!({
                "usuarios": page.items,
                "total": page.total,
                "page": page.current_page(),
                "pages": page.total_pages(),
            }))?;
        }
    }

    Ok(())
}
