use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use client::models::{LoginParams, Orientation, RegisterParams, Terrain, TerrainParams, TerrainQuery};
use client::routes::Route;
use client::{BackendClient, DEFAULT_BASE_URL, TokenStore};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "terrains", version, about = "Browse and publish land plots for sale")]
struct Cli {
    /// Backend base URL.
    #[arg(long, global = true, env = "TERRAINS_BACKEND_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Where the login token is kept. Defaults to the user config directory.
    #[arg(long, global = true, env = "TERRAINS_TOKEN_FILE")]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List terrains (route `/`).
    Home(ListArgs),
    /// Create an account (route `/register`).
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        /// Display name.
        #[arg(long)]
        name: String,
    },
    /// Log in and remember the token (route `/login`).
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored token.
    Logout,
    /// Publish a terrain with photos (route `/terrains/create`).
    CreateTerrain(CreateArgs),
    /// Show one terrain with its photo URLs.
    Show { id: Uuid },
    /// Delete one of your terrains.
    Delete { id: Uuid },
    /// Resolve a front-end path to its subcommand.
    Route { path: String },
}

#[derive(Args)]
struct ListArgs {
    #[arg(long)]
    page: Option<u64>,
    #[arg(long)]
    items_per_page: Option<u64>,
    /// Name contains (case-insensitive).
    #[arg(long)]
    nom: Option<String>,
    /// Price bound, `lte.<n>` or `gte.<n>`.
    #[arg(long)]
    prix: Option<String>,
    /// Only terrains owned by this user.
    #[arg(long)]
    user_id: Option<Uuid>,
}

#[derive(Args)]
struct CreateArgs {
    #[arg(long)]
    nom: String,
    #[arg(long, allow_hyphen_values = true)]
    latitude: f64,
    #[arg(long, allow_hyphen_values = true)]
    longitude: f64,
    #[arg(long)]
    surface: f64,
    #[arg(long)]
    surface_constructible: f64,
    #[arg(long)]
    prix: f64,
    #[arg(long)]
    longueur_facade: f64,
    /// NORD, SUD, EST or OUEST.
    #[arg(long)]
    orientation_facade: Orientation,
    /// Photo file to attach; repeat for several.
    #[arg(long = "photo")]
    photos: Vec<PathBuf>,
}

impl Command {
    fn route(&self) -> Option<Route> {
        match self {
            Command::Home(_) => Some(Route::Home),
            Command::Register { .. } => Some(Route::Register),
            Command::Login { .. } => Some(Route::Login),
            Command::CreateTerrain(_) => Some(Route::CreateTerrain),
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let tokens = cli
        .token_file
        .map(TokenStore::new)
        .unwrap_or_else(TokenStore::default_location);
    let client = BackendClient::new(cli.base_url, tokens)?;

    if let Some(route) = cli.command.route() {
        tracing::debug!(%route, "Opening view");
    }

    match cli.command {
        Command::Home(args) => {
            let query = TerrainQuery {
                page: args.page,
                items_per_page: args.items_per_page,
                nom: args.nom,
                prix: args.prix,
                user_id: args.user_id,
            };
            let terrains = client.list_terrains(&query).await?;
            if terrains.is_empty() {
                println!("No terrains found.");
            }
            for terrain in &terrains {
                print_summary(terrain);
            }
        }
        Command::Register {
            username,
            password,
            name,
        } => {
            let user = client
                .register(&RegisterParams {
                    username,
                    password,
                    name,
                })
                .await?;
            println!("Registered {} ({})", user.username, user.id);
        }
        Command::Login { username, password } => {
            client.login(&LoginParams { username, password }).await?;
            println!(
                "Logged in. Token stored in {}",
                client.tokens().path().display()
            );
        }
        Command::Logout => {
            client.logout()?;
            println!("Logged out.");
        }
        Command::CreateTerrain(args) => {
            let params = TerrainParams {
                nom: args.nom,
                latitude: args.latitude,
                longitude: args.longitude,
                surface: args.surface,
                surface_constructible: args.surface_constructible,
                prix: args.prix,
                longueur_facade: args.longueur_facade,
                orientation_facade: args.orientation_facade,
            };
            let terrain = client
                .create_terrain(&params, &args.photos)
                .await
                .context("Failed to publish terrain")?;
            println!("Created terrain {}", terrain.id);
            print_details(&terrain);
        }
        Command::Show { id } => {
            let terrain = client.get_terrain(id).await?;
            print_details(&terrain);
        }
        Command::Delete { id } => {
            client.delete_terrain(id).await?;
            println!("Deleted terrain {id}");
        }
        Command::Route { path } => match Route::from_path(&path) {
            Some(route) => println!("{path} -> terrains {}", route.name()),
            None => anyhow::bail!("No view for path '{path}'"),
        },
    }

    Ok(())
}

fn print_summary(terrain: &Terrain) {
    println!(
        "{}  {:<32} {:>12.2} EUR  {:>8.1} m²  {} photo(s)",
        terrain.id,
        terrain.nom,
        terrain.prix,
        terrain.surface,
        terrain.photos.len()
    );
}

fn print_details(terrain: &Terrain) {
    println!("{}", terrain.nom);
    println!("  id:                  {}", terrain.id);
    println!("  owner:               {}", terrain.user_id);
    println!(
        "  position:            {}, {}",
        terrain.latitude, terrain.longitude
    );
    println!("  surface:             {} m²", terrain.surface);
    println!("  buildable surface:   {} m²", terrain.surface_constructible);
    println!("  price:               {} EUR", terrain.prix);
    println!(
        "  facade:              {} m facing {}",
        terrain.longueur_facade, terrain.orientation_facade
    );
    for photo in &terrain.photos {
        println!("  photo {}: {}", photo.id, photo.url);
    }
}
