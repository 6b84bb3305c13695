//! shipquote CLI - Shipping quotes for Brazilian postal codes.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use shipquote::geo::state_capital;
use shipquote::models::CoordinatesSource;
use shipquote::{
    CartLineItem, Config, Destination, PostalAddress, PostalCode, QuoteEngine, QuoteRequest,
    QuoteResult, haversine_km,
};
use std::path::{Path, PathBuf};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "shipquote")]
#[command(author = "Infernet <dev@infernet.org>")]
#[command(version)]
#[command(about = "Shipping-rate estimation for Brazilian postal codes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file (defaults apply when it does not exist)
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote shipping for a cart
    Quote {
        /// JSON quote request file ({"origin", "destination", "items"})
        #[arg(short, long, conflicts_with_all = ["to", "items"])]
        request: Option<PathBuf>,

        /// Origin postal code (defaults to quote.origin_postal_code)
        #[arg(long)]
        from: Option<String>,

        /// Destination postal code
        #[arg(long, required_unless_present = "request")]
        to: Option<String>,

        /// Cart item as <grams>x<quantity> (quantity defaults to 1; 0 grams means unknown)
        #[arg(short, long = "item", value_parser = parse_item)]
        items: Vec<CartLineItem>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve a postal code to an address and coordinates
    Resolve {
        postal_code: String,
    },

    /// Great-circle distance between two postal codes
    Distance {
        from: String,
        to: String,
    },

    /// Show the effective rate table
    Tiers,

    /// Validate configuration file
    Validate,

    /// Show example configuration
    Example,
}

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")
}

/// Parse `<grams>x<quantity>` or `<grams>`.
fn parse_item(s: &str) -> std::result::Result<CartLineItem, String> {
    let (weight, quantity) = match s.split_once(['x', 'X']) {
        Some((w, q)) => (w, q),
        None => (s, "1"),
    };
    let weight_grams: f64 = weight
        .trim()
        .parse()
        .map_err(|e| format!("invalid weight '{weight}': {e}"))?;
    let quantity: u32 = quantity
        .trim()
        .parse()
        .map_err(|e| format!("invalid quantity '{quantity}': {e}"))?;
    Ok(CartLineItem::new(weight_grams, quantity))
}

fn print_example_config() {
    let example = r#"# shipquote configuration file

[address_lookup]
base_url = "https://viacep.com.br"
timeout_secs = 5

[geocoding]
base_url = "https://nominatim.openstreetmap.org"
timeout_secs = 5
# Nominatim requires an identifying User-Agent
user_agent = "shipquote/0.1 (${SHIPQUOTE_CONTACT})"
country_code = "br"

[quote]
origin_postal_code = "01310-100"
default_item_weight_grams = 200.0

# Optional per-tier overrides; omitted fields keep the built-in values
[tiers.express]
base_price = 39.9
carrier_label = "Correios SEDEX"
"#;
    println!("{example}");
}

fn load_config(path: &Path) -> Result<Config> {
    let config = Config::load_or_default(path)
        .with_context(|| format!("Failed to load config from {path:?}"))?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn load_request(path: &Path) -> Result<QuoteRequest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read quote request {path:?}"))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse quote request {path:?}"))
}

/// Reject malformed origin or destination codes before quoting.
fn check_postal_codes(request: &QuoteRequest) -> Result<()> {
    if let Some(origin) = &request.origin {
        PostalCode::parse(origin).context("Invalid origin postal code")?;
    }
    PostalCode::parse(&request.destination.postal_code)
        .context("Invalid destination postal code")?;
    Ok(())
}

fn describe_coordinates(address: &PostalAddress) -> String {
    match (address.coordinates, address.coordinates_source) {
        (Some(c), Some(CoordinatesSource::StateCapital)) => {
            let capital = state_capital(&address.state_code)
                .map(|capital| capital.city)
                .unwrap_or("state capital");
            format!("{:.5}, {:.5} (approximated by {capital})", c.lat, c.lng)
        }
        (Some(c), _) => format!("{:.5}, {:.5}", c.lat, c.lng),
        (None, _) => "unavailable".to_string(),
    }
}

fn print_quote(result: &QuoteResult) {
    if result.success {
        println!("\n=== Shipping Options ===");
    } else {
        println!("\n=== Shipping Options (estimated) ===");
        if let Some(error) = &result.error {
            println!("Reason:      {error}");
        }
    }
    for option in &result.options {
        println!(
            "{:<10} {:<18} R$ {:>8.2}   {:<18} {}",
            option.name, option.carrier, option.price, option.lead_time_label, option.description
        );
    }
    if let Some(cheapest) = result.cheapest() {
        println!("Cheapest:    {} (R$ {:.2})", cheapest.name, cheapest.price);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Example => {
            print_example_config();
        }

        Commands::Validate => {
            let config = Config::from_file(&cli.config)
                .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
            config.validate().context("Invalid configuration")?;

            info!("Configuration is valid");
            info!("  Origin: {}", config.quote.origin_postal_code);
            info!(
                "  Default item weight: {:.0} g",
                config.quote.default_item_weight_grams
            );
            info!("  Address lookup: {}", config.address_lookup.base_url);
            info!("  Geocoding: {}", config.geocoding.base_url);
        }

        Commands::Tiers => {
            let config = load_config(&cli.config)?;
            println!("\n=== Rate Table ===");
            for (id, tier) in config.rate_table().iter() {
                println!("{id}: {} ({})", tier.display_name, tier.carrier_label);
                println!("  Base:      R$ {:.2} (first kg included)", tier.base_price);
                println!("  Per km:    R$ {:.4}", tier.price_per_km);
                println!("  Per kg:    R$ {:.2}", tier.price_per_kg);
                println!(
                    "  Lead time: {} days + {} per km",
                    tier.base_lead_days, tier.extra_lead_days_per_km
                );
                println!(
                    "  Fallback:  R$ {:.2} per started kg, {}",
                    tier.fallback_price, tier.fallback_lead_time
                );
            }
        }

        Commands::Resolve { postal_code } => {
            let config = load_config(&cli.config)?;
            let engine = QuoteEngine::from_config(&config)?;
            let address = engine
                .resolver()
                .resolve(&postal_code)
                .await
                .with_context(|| format!("Failed to resolve {postal_code}"))?;

            println!("\n=== {} ===", address.postal_code);
            println!("Street:       {}", address.street);
            println!("Neighborhood: {}", address.neighborhood);
            println!("City:         {} - {}", address.city, address.state_code);
            println!("Coordinates:  {}", describe_coordinates(&address));
        }

        Commands::Distance { from, to } => {
            let config = load_config(&cli.config)?;
            let engine = QuoteEngine::from_config(&config)?;
            let resolver = engine.resolver();
            let (a, b) = tokio::join!(resolver.resolve(&from), resolver.resolve(&to));
            let a = a.with_context(|| format!("Failed to resolve {from}"))?;
            let b = b.with_context(|| format!("Failed to resolve {to}"))?;

            let (Some(ca), Some(cb)) = (a.coordinates, b.coordinates) else {
                bail!("Coordinates unavailable for {} or {}", a.postal_code, b.postal_code);
            };
            println!(
                "{} ({}) -> {} ({}): {:.1} km",
                a.postal_code,
                a.city,
                b.postal_code,
                b.city,
                haversine_km(ca, cb)
            );
        }

        Commands::Quote {
            request,
            from,
            to,
            items,
            json,
        } => {
            let config = load_config(&cli.config)?;

            let mut request = match (request, to) {
                (Some(path), _) => load_request(&path)?,
                (None, Some(to)) => QuoteRequest {
                    origin: None,
                    destination: Destination::new(to),
                    items,
                },
                (None, None) => bail!("Either --request or --to is required"),
            };
            if from.is_some() {
                request.origin = from;
            }

            request.validate().context("Invalid quote request")?;
            check_postal_codes(&request)?;

            let engine = QuoteEngine::from_config(&config)?;
            let result = engine.quote(&request).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_quote(&result);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item() {
        assert_eq!(parse_item("800x2").unwrap(), CartLineItem::new(800.0, 2));
        assert_eq!(parse_item("250").unwrap(), CartLineItem::new(250.0, 1));
        assert_eq!(parse_item("0X3").unwrap(), CartLineItem::new(0.0, 3));
        assert!(parse_item("heavy").is_err());
        assert!(parse_item("800x-1").is_err());
    }

    #[test]
    fn test_cli_parses_quote_items() {
        let cli = Cli::try_parse_from([
            "shipquote", "quote", "--to", "20040-020", "-i", "800x1", "-i", "500x2",
        ])
        .unwrap();
        match cli.command {
            Commands::Quote { to, items, .. } => {
                assert_eq!(to.as_deref(), Some("20040-020"));
                assert_eq!(items.len(), 2);
            }
            _ => panic!("expected quote command"),
        }
    }

    fn request(origin: Option<&str>, destination: &str) -> QuoteRequest {
        QuoteRequest {
            origin: origin.map(str::to_string),
            destination: Destination::new(destination),
            items: vec![CartLineItem::new(800.0, 1)],
        }
    }

    #[test]
    fn test_check_postal_codes() {
        assert!(check_postal_codes(&request(None, "20040-020")).is_ok());
        assert!(check_postal_codes(&request(Some("01310-100"), "20040-020")).is_ok());

        let err = check_postal_codes(&request(Some("0131"), "20040-020")).unwrap_err();
        assert!(err.to_string().contains("origin"), "{err}");

        let err = check_postal_codes(&request(None, "2004")).unwrap_err();
        assert!(err.to_string().contains("destination"), "{err}");
    }

    #[test]
    fn test_describe_coordinates_names_capital() {
        let code = PostalCode::parse("69900-000").unwrap();
        let record = shipquote::models::AddressRecord {
            city: "Rio Branco".to_string(),
            state_code: "AC".to_string(),
            ..Default::default()
        };
        let address = PostalAddress::from_record(code.clone(), record.clone());
        assert_eq!(describe_coordinates(&address), "unavailable");

        let capital = state_capital("AC").unwrap();
        let address = PostalAddress::from_record(code, record)
            .with_coordinates(capital.coordinates, CoordinatesSource::StateCapital);
        let line = describe_coordinates(&address);
        assert!(line.ends_with(&format!("(approximated by {})", capital.city)), "{line}");
    }

    #[test]
    fn test_cli_requires_destination() {
        assert!(Cli::try_parse_from(["shipquote", "quote", "-i", "800"]).is_err());
    }
}
