//! `convoylog` - CLI for the convoy obstacle log
//!
//! This binary records road obstacles with an optional GPS or manually
//! entered position, lists and deletes them, and carries the emergency
//! contact directory for the route.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process;

use chrono::Local;
use clap::Parser;
use tracing::{debug, error, warn};

use convoylog::cli::{
    format_date_fr, AddCommand, Cli, ClearCommand, Command, ConfigCommand, ContactsCommand,
    ListCommand, LocateCommand, OutputFormat, RemoveCommand, StatusCommand,
};
use convoylog::contacts::{contacts_of_kind, emergency_contacts, Contact, ContactKind};
use convoylog::coords::{
    classify_location_error, format_coordinates_precision, parse_coordinates, validate_coordinates,
};
use convoylog::location::gpsd::GpsdProvider;
use convoylog::location::LocationProvider;
use convoylog::notify::{Notification, NotificationSink, TerminalSink};
use convoylog::obstacle::{Coordinates, NewObstacle, Obstacle};
use convoylog::store::ObstacleStore;
use convoylog::{init_logging, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    let sink = TerminalSink::new();

    // Execute the command
    match cli.command {
        Command::Add(cmd) => handle_add(&config, &sink, cmd).await,
        Command::List(cmd) => handle_list(&config, &sink, &cmd),
        Command::Remove(cmd) => handle_remove(&config, &sink, &cmd),
        Command::Clear(cmd) => handle_clear(&config, &sink, &cmd),
        Command::Contacts(cmd) => handle_contacts(&cmd),
        Command::Locate(cmd) => handle_locate(&config, &sink, &cmd).await,
        Command::Status(cmd) => handle_status(&config, &cmd).await,
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

async fn handle_add(
    config: &Config,
    sink: &TerminalSink,
    cmd: AddCommand,
) -> anyhow::Result<()> {
    let title = cmd.title.trim();
    let description = cmd.description.trim();

    if title.is_empty() {
        sink.notify(Notification::error("Le titre est obligatoire"));
        process::exit(1);
    }
    if description.is_empty() {
        sink.notify(Notification::error("La description est obligatoire"));
        process::exit(1);
    }

    let coordinates = if cmd.gps {
        Some(gps_position(config, sink).await)
    } else if cmd.lat.is_some() || cmd.lon.is_some() {
        Some(manual_position(sink, cmd.lat.as_deref(), cmd.lon.as_deref()))
    } else {
        None
    };

    let store = ObstacleStore::open(config.database_path())?;
    let mut new = NewObstacle::new(title, description);
    if let Some(coordinates) = coordinates {
        new = new.with_coordinates(coordinates);
    }

    match store.add(new) {
        Ok(obstacle) => {
            sink.notify(Notification::success("Obstacle ajouté avec succès !"));
            println!("Identifiant : {}", obstacle.id);
            Ok(())
        }
        Err(err) => {
            error!("Saving obstacle failed: {err}");
            sink.notify(Notification::error("Impossible de sauvegarder l'obstacle"));
            process::exit(1);
        }
    }
}

/// Resolve a manually entered coordinate pair or exit with the per-field
/// validation messages.
fn manual_position(sink: &TerminalSink, lat: Option<&str>, lon: Option<&str>) -> Coordinates {
    if let (Some(lat_raw), Some(lon_raw)) = (lat, lon) {
        if let Some(coordinates) = parse_coordinates(lat_raw, lon_raw) {
            return coordinates;
        }
    }

    let validation = validate_coordinates(lat, lon);
    if let Some(message) = validation.latitude_message() {
        sink.notify(Notification::error(message));
    }
    if let Some(message) = validation.longitude_message() {
        sink.notify(Notification::error(message));
    }
    process::exit(1);
}

/// Read the current position from the device or exit with the classified
/// failure reason and a manual-entry hint.
async fn gps_position(config: &Config, sink: &TerminalSink) -> Coordinates {
    let provider = GpsdProvider::new(config.gpsd_provider_config());

    if !provider.services_enabled().await {
        sink.notify(Notification::warning(
            "Les services de localisation sont désactivés. Veuillez les activer dans les paramètres.",
        ));
        eprintln!("Vous pouvez aussi saisir la position manuellement avec --lat et --lon.");
        process::exit(1);
    }

    match provider.current_fix().await {
        Ok(fix) => {
            sink.notify(Notification::info(format!(
                "Position GPS : {}",
                format_coordinates_precision(
                    Some(fix.latitude),
                    Some(fix.longitude),
                    config.display.coordinate_precision
                )
            )));
            fix.coordinates()
        }
        Err(err) => {
            debug!("Location lookup failed: {err}");
            sink.notify(Notification::error(classify_location_error(&err)));
            eprintln!("Réessayez ou saisissez la position manuellement avec --lat et --lon.");
            process::exit(1);
        }
    }
}

fn handle_list(
    config: &Config,
    sink: &TerminalSink,
    cmd: &ListCommand,
) -> anyhow::Result<()> {
    let store = ObstacleStore::open(config.database_path())?;
    let obstacles = match store.try_list() {
        Ok(items) => items,
        Err(err) => {
            error!("Loading obstacles failed: {err}");
            sink.notify(Notification::error("Impossible de charger les obstacles"));
            process::exit(1);
        }
    };
    let precision = config.display.coordinate_precision;

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&obstacles)?),
        OutputFormat::Table => print_obstacles_table(&obstacles, precision),
        OutputFormat::Plain => print_obstacles_plain(&obstacles, precision),
    }
    Ok(())
}

fn print_obstacles_plain(obstacles: &[Obstacle], precision: usize) {
    if obstacles.is_empty() {
        println!("Aucun obstacle enregistré");
        println!("Utilisez `convoylog add` pour ajouter votre premier obstacle et informer les autres conducteurs.");
        return;
    }

    println!("Obstacles à venir");
    for obstacle in obstacles {
        println!();
        println!("{} [{}]", obstacle.title, obstacle.id);
        println!("  {}", obstacle.description);
        if let Some(coordinates) = obstacle.coordinates {
            println!(
                "  📍 {}",
                format_coordinates_precision(
                    Some(coordinates.latitude),
                    Some(coordinates.longitude),
                    precision
                )
            );
        }
        println!(
            "  Créé le {}",
            format_date_fr(&obstacle.created_at.with_timezone(&Local))
        );
    }
    println!();
    println!("{} obstacle(s)", obstacles.len());
}

fn print_obstacles_table(obstacles: &[Obstacle], precision: usize) {
    if obstacles.is_empty() {
        println!("Aucun obstacle enregistré");
        return;
    }

    println!(
        "{:<16} {:<28} {:<22} CRÉÉ",
        "IDENTIFIANT", "TITRE", "POSITION"
    );
    for obstacle in obstacles {
        let position = obstacle.coordinates.map_or_else(
            || "-".to_string(),
            |c| format_coordinates_precision(Some(c.latitude), Some(c.longitude), precision),
        );
        println!(
            "{:<16} {:<28} {:<22} {}",
            obstacle.id,
            obstacle.title,
            position,
            format_date_fr(&obstacle.created_at.with_timezone(&Local))
        );
    }
}

fn handle_remove(
    config: &Config,
    sink: &TerminalSink,
    cmd: &RemoveCommand,
) -> anyhow::Result<()> {
    let store = ObstacleStore::open(config.database_path())?;

    let known = match store.try_list() {
        Ok(obstacles) => obstacles.iter().any(|obstacle| obstacle.id == cmd.id),
        Err(err) => {
            error!("Loading obstacles failed: {err}");
            sink.notify(Notification::error("Impossible de supprimer l'obstacle"));
            process::exit(1);
        }
    };
    if !known {
        sink.notify(Notification::info(format!(
            "Aucun obstacle avec l'identifiant {}",
            cmd.id
        )));
        return Ok(());
    }

    match store.remove(&cmd.id) {
        Ok(()) => {
            sink.notify(Notification::success("Obstacle supprimé"));
            Ok(())
        }
        Err(err) => {
            error!("Removing obstacle failed: {err}");
            sink.notify(Notification::error("Impossible de supprimer l'obstacle"));
            process::exit(1);
        }
    }
}

fn handle_clear(
    config: &Config,
    sink: &TerminalSink,
    cmd: &ClearCommand,
) -> anyhow::Result<()> {
    if !cmd.yes {
        println!("Cette action supprimera tous les obstacles enregistrés.");
        println!("Relancez avec --yes pour confirmer.");
        return Ok(());
    }

    let store = ObstacleStore::open(config.database_path())?;
    let count = store.count().ok();

    match store.clear() {
        Ok(()) => {
            sink.notify(Notification::success("Tous les obstacles ont été supprimés"));
            if let Some(count) = count {
                println!("{count} obstacle(s) supprimé(s)");
            }
            Ok(())
        }
        Err(err) => {
            error!("Clearing obstacles failed: {err}");
            sink.notify(Notification::error("Impossible de supprimer les obstacles"));
            process::exit(1);
        }
    }
}

fn handle_contacts(cmd: &ContactsCommand) -> anyhow::Result<()> {
    let contacts: Vec<Contact> = match cmd.kind {
        Some(kind) => contacts_of_kind(kind.into()),
        None => emergency_contacts().to_vec(),
    };

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&contacts)?),
        OutputFormat::Table => print_contacts_table(&contacts),
        OutputFormat::Plain => print_contacts_plain(&contacts),
    }
    Ok(())
}

fn print_contacts_plain(contacts: &[Contact]) {
    println!("Contacts utiles");
    for kind in ContactKind::ALL {
        let of_kind: Vec<&Contact> = contacts.iter().filter(|c| c.kind == kind).collect();
        if of_kind.is_empty() {
            continue;
        }
        println!();
        println!("[{kind}]");
        for contact in of_kind {
            println!("{} - {}", contact.name, contact.role);
            println!("  📞 {}", contact.phone);
            if let Some(email) = contact.email {
                println!("  ✉️ {email}");
            }
        }
    }
}

fn print_contacts_table(contacts: &[Contact]) {
    println!("{:<26} {:<24} {:<16} EMAIL", "NOM", "RÔLE", "TÉLÉPHONE");
    for contact in contacts {
        println!(
            "{:<26} {:<24} {:<16} {}",
            contact.name,
            contact.role,
            contact.phone,
            contact.email.unwrap_or("-")
        );
    }
}

async fn handle_locate(
    config: &Config,
    sink: &TerminalSink,
    cmd: &LocateCommand,
) -> anyhow::Result<()> {
    let provider = GpsdProvider::new(config.gpsd_provider_config());

    match provider.current_fix().await {
        Ok(fix) => {
            if cmd.json {
                println!("{}", serde_json::to_string_pretty(&fix)?);
            } else {
                println!(
                    "Position  : {}",
                    format_coordinates_precision(
                        Some(fix.latitude),
                        Some(fix.longitude),
                        config.display.coordinate_precision
                    )
                );
                println!("Latitude  : {:.6}", fix.latitude);
                println!("Longitude : {:.6}", fix.longitude);
                println!("Précision : {:.1} m", fix.accuracy);
            }
            Ok(())
        }
        Err(err) => {
            debug!("Location lookup failed: {err}");
            sink.notify(Notification::error(classify_location_error(&err)));
            process::exit(1);
        }
    }
}

async fn handle_status(
    config: &Config,
    cmd: &StatusCommand,
) -> anyhow::Result<()> {
    let store = ObstacleStore::open(config.database_path())?;
    let stats = match store.stats() {
        Ok(stats) => Some(stats),
        Err(err) => {
            warn!("Could not read collection stats: {err}");
            None
        }
    };

    let provider = GpsdProvider::new(config.gpsd_provider_config());
    let gpsd_reachable = provider.services_enabled().await;

    if cmd.json {
        let status = serde_json::json!({
            "database_path": store.path(),
            "database_size_bytes": stats.as_ref().map(|s| s.db_size_bytes),
            "total_obstacles": stats.as_ref().map(|s| s.total_obstacles),
            "oldest_record": stats.as_ref().and_then(|s| s.oldest_record),
            "newest_record": stats.as_ref().and_then(|s| s.newest_record),
            "gpsd_endpoint": format!("{}:{}", config.location.host, config.location.port),
            "gpsd_reachable": gpsd_reachable,
            "location_consent": config.location.consent,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("convoylog status");
        println!("----------------");
        println!("Base de données : {}", store.path().display());
        if let Some(stats) = &stats {
            println!("Obstacles       : {}", stats.total_obstacles);
            if let Some(oldest) = stats.oldest_record {
                println!(
                    "Plus ancien     : {}",
                    format_date_fr(&oldest.with_timezone(&Local))
                );
            }
            if let Some(newest) = stats.newest_record {
                println!(
                    "Plus récent     : {}",
                    format_date_fr(&newest.with_timezone(&Local))
                );
            }
            println!("Taille          : {} octets", stats.db_size_bytes);
        } else {
            println!("Obstacles       : collection illisible");
        }
        println!(
            "gpsd            : {}:{} ({})",
            config.location.host,
            config.location.port,
            if gpsd_reachable {
                "joignable"
            } else {
                "injoignable"
            }
        );
        println!(
            "Consentement    : {}",
            if config.location.consent { "oui" } else { "non" }
        );
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Configuration actuelle");
                println!("======================");
                println!();
                println!("[storage]");
                println!("  database_path        : {}", config.database_path().display());
                println!();
                println!("[location]");
                println!("  consent              : {}", config.location.consent);
                println!("  host                 : {}", config.location.host);
                println!("  port                 : {}", config.location.port);
                println!("  timeout_secs         : {}", config.location.timeout_secs);
                println!("  max_age_secs         : {}", config.location.max_age_secs);
                println!();
                println!("[display]");
                println!(
                    "  coordinate_precision : {}",
                    config.display.coordinate_precision
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validation de {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration valide."),
                Err(err) => {
                    println!("Erreur de configuration : {err}");
                    process::exit(1);
                }
            }
        }
    }
    Ok(())
}
