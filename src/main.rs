//! GeoNote CLI
//!
//! Usage:
//!     geonote insert --note journal.md
//!     geonote frontmatter trip.md --update
//!     geonote capture "Home"
//!     geonote --at 52.2297,21.0122 insert

mod prompt;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use geonote_compose::{BuiltinFormat, Composer, FrontmatterOutcome, InsertMode, MarkdownNote};
use geonote_core::{AppError, Config, ConfigError, SavedPlace, DEFAULT_PLACE_RADIUS_METERS};
use geonote_location::{DevicePositioner, StaticPositioner, UnsupportedPositioner};

use crate::prompt::TerminalPicker;

/// Insert your current location, address and weather into Markdown notes
#[derive(Parser)]
#[command(name = "geonote")]
#[command(version)]
#[command(about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to <config dir>/geonote/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use this position as the device fix: LAT,LON[,ACCURACY_METERS]
    #[arg(long, global = true, value_parser = parse_fix, allow_hyphen_values = true)]
    at: Option<StaticPositioner>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the current location and append it to a note, or print it
    Insert {
        /// Note to append to
        #[arg(long)]
        note: Option<PathBuf>,
    },

    /// Add location fields to a note's frontmatter
    Frontmatter {
        /// Markdown note
        path: PathBuf,

        /// Overwrite an existing location
        #[arg(long)]
        update: bool,
    },

    /// Save the current location as a named place
    Capture {
        name: String,
    },

    /// List saved places
    Places,

    /// List output formats and templates
    Templates,

    /// Select the output format (built-in id or template id)
    Format {
        id: String,
    },

    /// Manage templates
    Template {
        #[command(subcommand)]
        action: TemplateAction,
    },

    /// Manage saved places
    Place {
        #[command(subcommand)]
        action: PlaceAction,
    },
}

#[derive(Subcommand)]
enum TemplateAction {
    /// Add a template, e.g. `template add Diary "{date}: {address}"`
    Add { name: String, body: String },
    /// Rename a template and replace its text
    Edit { id: String, name: String, body: String },
    /// Delete a template by id
    Remove { id: String },
}

#[derive(Subcommand)]
enum PlaceAction {
    /// Add a place by hand
    Add {
        name: String,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        lon: f64,
        #[arg(long, default_value_t = DEFAULT_PLACE_RADIUS_METERS)]
        radius: f64,
        /// Template used when this place is chosen
        #[arg(long)]
        template: Option<String>,
    },
    /// Delete a place by id
    Remove { id: String },
}

fn parse_fix(value: &str) -> Result<StaticPositioner, String> {
    let parts: Vec<f64> = value
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("invalid number in '{}': {}", value, e))?;

    match parts.as_slice() {
        [latitude, longitude] => Ok(StaticPositioner {
            latitude: *latitude,
            longitude: *longitude,
            accuracy_meters: 0.0,
        }),
        [latitude, longitude, accuracy] => Ok(StaticPositioner {
            latitude: *latitude,
            longitude: *longitude,
            accuracy_meters: *accuracy,
        }),
        _ => Err("expected LAT,LON or LAT,LON,ACCURACY".to_string()),
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = geonote_core::init() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        tracing::error!("{}", e);
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config_path = match cli.config {
        Some(path) => path,
        None => Config::config_path()?,
    };
    let (mut config, _) = Config::load_validated(Some(&config_path))?;

    let positioner: Arc<dyn DevicePositioner> = match cli.at {
        Some(fix) => Arc::new(fix),
        None => Arc::new(UnsupportedPositioner),
    };

    match cli.command {
        Commands::Insert { note } => {
            let composer = composer(&config, positioner)?;
            let text = composer.compose_text(&config).await?;
            match note {
                Some(path) => {
                    let mut document = MarkdownNote::load(&path)?;
                    document.append_text(&text);
                    document.save(&path)?;
                    eprintln!("Added location to {}", path.display());
                }
                None => println!("{}", text),
            }
        }

        Commands::Frontmatter { path, update } => {
            let mode = if update {
                InsertMode::Update
            } else {
                InsertMode::Insert
            };

            let mut document = MarkdownNote::load(&path)?;
            let composer = composer(&config, positioner)?;
            match composer.write_fields(&config, &mut document, mode).await? {
                FrontmatterOutcome::AlreadyPresent => {
                    eprintln!(
                        "{} already has a location. Use --update to overwrite it.",
                        path.display()
                    );
                }
                FrontmatterOutcome::NothingEnabled => {
                    eprintln!(
                        "All frontmatter fields are disabled; {} was not changed.",
                        path.display()
                    );
                }
                FrontmatterOutcome::Inserted | FrontmatterOutcome::Updated => {
                    document.save(&path)?;
                    eprintln!("Updated frontmatter of {}", path.display());
                }
            }
        }

        Commands::Capture { name } => {
            let composer = composer(&config, positioner)?;
            let place = composer.capture_place(&name).await?;
            println!(
                "Saved '{}' at {:.6}, {:.6} ({} m radius)",
                place.name, place.latitude, place.longitude, place.radius
            );
            config.add_place(place);
            save(&config, &config_path)?;
        }

        Commands::Places => {
            if config.places.is_empty() {
                println!("No saved places");
            }
            for place in &config.places {
                println!(
                    "{}  {}  {:.6}, {:.6}  r={} m",
                    place.id, place.name, place.latitude, place.longitude, place.radius
                );
            }
        }

        Commands::Templates => {
            for builtin in [BuiltinFormat::Full, BuiltinFormat::Compact, BuiltinFormat::Coords] {
                let builtin = builtin.id();
                let marker = if config.output.format == builtin { "*" } else { " " };
                println!("{} {}  (built-in)", marker, builtin);
            }
            for template in &config.templates {
                let marker = if config.output.format == template.id { "*" } else { " " };
                println!("{} {}  {}  {}", marker, template.id, template.name, template.body);
            }
        }

        Commands::Format { id } => {
            if !config.is_known_format(&id) {
                return Err(ConfigError::UnknownFormat(id).into());
            }
            config.output.format = id;
            save(&config, &config_path)?;
        }

        Commands::Template { action } => match action {
            TemplateAction::Add { name, body } => {
                let id = config.add_template(name, body);
                save(&config, &config_path)?;
                println!("{}", id);
            }
            TemplateAction::Edit { id, name, body } => {
                if !config.update_template(&id, name, body) {
                    return Err(ConfigError::UnknownTemplate(id).into());
                }
                save(&config, &config_path)?;
            }
            TemplateAction::Remove { id } => {
                config
                    .remove_template(&id)
                    .ok_or(ConfigError::UnknownTemplate(id))?;
                save(&config, &config_path)?;
            }
        },

        Commands::Place { action } => match action {
            PlaceAction::Add {
                name,
                lat,
                lon,
                radius,
                template,
            } => {
                let mut place = SavedPlace::at(name, lat, lon).with_radius(radius);
                if let Some(template) = template {
                    place = place.with_template(template);
                }
                let id = config.add_place(place);
                save(&config, &config_path)?;
                println!("{}", id);
            }
            PlaceAction::Remove { id } => {
                config
                    .remove_place(&id)
                    .ok_or(ConfigError::UnknownPlace(id))?;
                save(&config, &config_path)?;
            }
        },
    }

    Ok(())
}

fn composer(config: &Config, positioner: Arc<dyn DevicePositioner>) -> Result<Composer, AppError> {
    Ok(Composer::from_config(
        config,
        positioner,
        Arc::new(TerminalPicker),
    )?)
}

fn save(config: &Config, path: &Path) -> Result<(), AppError> {
    config.save_to(path)?;
    tracing::debug!("Saved configuration to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fix() {
        let fix = parse_fix("52.2297,21.0122").unwrap();
        assert_eq!(fix.latitude, 52.2297);
        assert_eq!(fix.accuracy_meters, 0.0);

        let fix = parse_fix("-33.8688, 151.2093, 12").unwrap();
        assert_eq!(fix.longitude, 151.2093);
        assert_eq!(fix.accuracy_meters, 12.0);

        assert!(parse_fix("52.2297").is_err());
        assert!(parse_fix("a,b").is_err());
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from(["geonote", "--at", "1,2", "frontmatter", "note.md", "--update"])
            .unwrap();
        assert!(cli.at.is_some());
        assert!(matches!(cli.command, Commands::Frontmatter { update: true, .. }));
    }

    #[test]
    fn test_cli_parses_template_edit() {
        let cli = Cli::try_parse_from(["geonote", "template", "edit", "t1", "Diary", "{date}"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Template {
                action: TemplateAction::Edit { ref id, ref name, ref body },
            } if id == "t1" && name == "Diary" && body == "{date}"
        ));
    }

    #[test]
    fn test_cli_accepts_negative_fix() {
        let cli = Cli::try_parse_from(["geonote", "--at", "-33.8688,151.2093", "insert"]).unwrap();
        assert_eq!(cli.at.map(|fix| fix.latitude), Some(-33.8688));
    }
}
