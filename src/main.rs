use clap::{Parser, Subcommand, ValueEnum};
use showtimes::{ClientConfig, Showtimes, feed};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "showtimes", about = "Movie showtimes near a location")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Listing endpoint
    #[arg(long, global = true, default_value = showtimes::config::DEFAULT_BASE_URL)]
    base_url: String,

    #[arg(long, global = true, default_value = showtimes::config::DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Stop after this many pages
    #[arg(long, global = true, default_value_t = 50)]
    max_pages: u32,

    #[arg(long, global = true, value_enum, default_value_t = Format::Json)]
    format: Format,
}

#[derive(Subcommand)]
enum Command {
    /// Theaters near a location, with the movies each one plays
    Theaters(Where),
    /// Movies near a location, with the theaters playing each one
    Movies(Where),
    /// A single movie by id
    Movie {
        mid: String,
        #[command(flatten)]
        place: Where,
    },
}

#[derive(clap::Args)]
struct Where {
    /// Zip code, city or "lat,lon"
    #[arg(long)]
    near: String,

    /// Days from today
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    date: i32,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Rss,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("showtimes=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::default()
        .with_base_url(cli.base_url.clone())
        .with_user_agent(cli.user_agent.clone())
        .with_max_pages(cli.max_pages);
    let link = config.base_url.clone();
    let showtimes = Showtimes::new(config);

    let output = match cli.command {
        Command::Theaters(place) => {
            let theaters = showtimes.theaters(&place.near, place.date).await?;
            match cli.format {
                Format::Json => serde_json::to_string_pretty(&theaters)?,
                Format::Rss => feed::theaters_rss(
                    &theaters,
                    &format!("Showtimes near {}", place.near),
                    &link,
                    feed::target_date(place.date),
                )?,
            }
        }
        Command::Movies(place) => {
            let movies = showtimes.movies(&place.near, place.date).await?;
            match cli.format {
                Format::Json => serde_json::to_string_pretty(&movies)?,
                Format::Rss => feed::movies_rss(
                    &movies,
                    &format!("Movies near {}", place.near),
                    &link,
                    feed::target_date(place.date),
                )?,
            }
        }
        Command::Movie { mid, place } => {
            let movie = showtimes.movie(&place.near, &mid, place.date).await?;
            match cli.format {
                Format::Json => serde_json::to_string_pretty(&movie)?,
                Format::Rss => feed::movies_rss(
                    std::slice::from_ref(&movie),
                    &movie.name,
                    &link,
                    feed::target_date(place.date),
                )?,
            }
        }
    };

    println!("{}", output);
    Ok(())
}
