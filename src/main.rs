// SPDX-License-Identifier: MPL-2.0
//! Command-line front end: identify a pet photo or browse the encyclopedia.

use animal_lens::config::{self, Config};
use animal_lens::encyclopedia::{self, AnimalRecord, EncyclopediaStore};
use animal_lens::i18n::{self, resolve_locale, tr, Locale};
use animal_lens::identify::{self, http::completions_endpoint, IdentificationOutcome};
use animal_lens::media;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

const HELP: &str = "\
animal_lens - pet identification and animal encyclopedia

USAGE:
  animal_lens identify <IMAGE>        Identify the pet in a photo
  animal_lens categories              List encyclopedia categories
  animal_lens animals <CATEGORY-ID>   List the animals of a category
  animal_lens detail <ANIMAL-ID>      Show everything about one animal
  animal_lens language <CODE>         Save the preferred language
  animal_lens about                   About this application

OPTIONS:
  --lang <CODE>         Output language for this run
  --config-dir <DIR>    Directory holding settings.toml
  -h, --help            Print this help

ENVIRONMENT:
  DASHSCOPE_API_KEY     Credential for the vision model (demo mode when unset)
  DASHSCOPE_BASE_URL    OpenAI-compatible endpoint
  QWEN_VL_MODEL         Model identifier
  RUST_LOG              Log filter (default: info)
";

struct Flags {
    lang: Option<String>,
    config_dir: Option<String>,
    command: Command,
}

enum Command {
    Identify(PathBuf),
    Categories,
    Animals(String),
    Detail(String),
    Language(String),
    About,
    Help,
}

fn parse_flags() -> Result<Flags, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();

    let subcommand = args.subcommand()?;
    let help = args.contains(["-h", "--help"]);
    let lang = args.opt_value_from_str("--lang")?;
    let config_dir = args.opt_value_from_str("--config-dir")?;

    let command = match subcommand.as_deref() {
        _ if help => Command::Help,
        Some("identify") => Command::Identify(args.free_from_str()?),
        Some("categories") => Command::Categories,
        Some("animals") => Command::Animals(args.free_from_str()?),
        Some("detail") => Command::Detail(args.free_from_str()?),
        Some("language") => Command::Language(args.free_from_str()?),
        Some("about") => Command::About,
        _ => Command::Help,
    };

    let remaining = args.finish();
    if !remaining.is_empty() {
        warn!("ignoring unused arguments: {:?}", remaining);
    }

    Ok(Flags {
        lang,
        config_dir,
        command,
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let flags = match parse_flags() {
        Ok(flags) => flags,
        Err(err) => {
            eprintln!("{err}\n\n{HELP}");
            return ExitCode::from(2);
        }
    };

    let config_dir = flags.config_dir.map(PathBuf::from);
    let (file_config, warning) = config::load_with_override(config_dir.clone());
    let config = file_config
        .clone()
        .with_env_overrides(|name| std::env::var(name).ok());
    let locale = resolve_locale(flags.lang.as_deref(), config.general.language.as_deref());
    let settings_unreadable = warning.is_some();
    if let Some(key) = warning {
        warn!("{}", tr(&key, locale));
    }

    match flags.command {
        Command::Identify(path) => identify(&path, &config, locale).await,
        Command::Categories => with_store(locale, |store| list_categories(store, locale)),
        Command::Animals(category_id) => {
            with_store(locale, |store| list_animals(store, &category_id, locale))
        }
        Command::Detail(animal_id) => {
            with_store(locale, |store| show_detail(store, &animal_id, locale))
        }
        Command::Language(_) if settings_unreadable => {
            println!("{}", tr("config_load_error", locale));
            ExitCode::FAILURE
        }
        Command::Language(code) => save_language(file_config, config_dir, &code),
        Command::About => {
            print_about(locale);
            ExitCode::SUCCESS
        }
        Command::Help => {
            print_help();
            ExitCode::SUCCESS
        }
    }
}

fn print_help() {
    print!("{HELP}");
    println!();
    println!("LANGUAGES:");
    for locale in i18n::catalog().locales() {
        println!("  {:<6}{}", locale.code(), locale.native_name());
    }
    println!();
    println!("PHOTO FORMATS:");
    println!("  {}", media::ACCEPTED_EXTENSIONS.join(", "));
}

fn print_about(locale: Locale) {
    println!("{}", tr("app_title", locale));
    println!();
    println!("{}", tr("about_text", locale));
    println!("{}", tr("about_goal", locale));
    println!();
    println!("{}", tr("security_note", locale));
}

/// Persists the language preference. Only what the settings file already
/// held is written back, so credentials from the environment never reach
/// the disk.
fn save_language(mut file_config: Config, config_dir: Option<PathBuf>, code: &str) -> ExitCode {
    let locale = match code.parse::<Locale>() {
        Ok(locale) => locale,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(2);
        }
    };
    file_config.general.language = Some(locale.code().to_string());
    match config::save_with_override(&file_config, config_dir) {
        Ok(()) => {
            info!(language = %locale, "saved language preference");
            println!("{}", locale.native_name());
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("cannot save settings: {err}");
            println!("{}", tr(err.i18n_key(), locale));
            ExitCode::FAILURE
        }
    }
}

fn with_store<F>(locale: Locale, run: F) -> ExitCode
where
    F: FnOnce(&EncyclopediaStore) -> ExitCode,
{
    match encyclopedia::builtin() {
        Ok(store) => run(store),
        Err(err) => {
            error!("encyclopedia unavailable: {err}");
            println!("{}", tr(err.i18n_key(), locale));
            ExitCode::FAILURE
        }
    }
}

async fn identify(path: &Path, config: &Config, locale: Locale) -> ExitCode {
    let image = match media::load_upload(path) {
        Ok(image) => image,
        Err(err) => {
            warn!(path = %path.display(), "rejected upload: {err}");
            println!("{}", tr(err.i18n_key(), locale));
            return ExitCode::from(2);
        }
    };

    if config.remote.credential().is_none() {
        info!("no credential configured, running in demo mode");
    } else {
        info!(
            model = %config.remote.model,
            endpoint = %completions_endpoint(&config.remote.base_url),
            "sending photo"
        );
        eprintln!("{}", tr("analyzing", locale));
    }

    let outcome = identify::identify_over_http(config, &image, locale).await;
    match &outcome {
        IdentificationOutcome::Success { text } => {
            println!("{}\n\n{}", tr(outcome.message_key(), locale), text);
            println!("\n{}", tr("pet_tip", locale));
            ExitCode::SUCCESS
        }
        IdentificationOutcome::NoCredential => {
            println!("{}", tr(outcome.message_key(), locale));
            println!("{}", tr("demo_result", locale));
            ExitCode::SUCCESS
        }
        IdentificationOutcome::RemoteFailure { message } => {
            warn!("identification failed: {message}");
            println!("{}", tr(outcome.message_key(), locale));
            ExitCode::FAILURE
        }
    }
}

fn list_categories(store: &EncyclopediaStore, locale: Locale) -> ExitCode {
    println!("{}", tr("ency_pick_cat", locale));
    for category in store.categories() {
        println!(
            "  {} {} [{}]: {} ({} {})",
            category.icon,
            category.name.get(locale),
            category.id,
            category.description.get(locale),
            store.count_in_category(&category.id),
            tr("ency_animals", locale),
        );
    }
    ExitCode::SUCCESS
}

fn list_animals(store: &EncyclopediaStore, category_id: &str, locale: Locale) -> ExitCode {
    match store.category(category_id) {
        Some(category) => println!("{} {}", category.icon, category.name.get(locale)),
        None => println!("{}", tr("ency_animals", locale)),
    }
    for animal in store.by_category(category_id) {
        println!(
            "  [{}] {} ({})",
            animal.id,
            animal.name.get(locale),
            animal.scientific_name
        );
    }
    ExitCode::SUCCESS
}

fn show_detail(store: &EncyclopediaStore, animal_id: &str, locale: Locale) -> ExitCode {
    match store.detail(animal_id) {
        Ok(animal) => {
            print_record(animal, locale);
            ExitCode::SUCCESS
        }
        Err(not_found) => {
            info!("{not_found}");
            println!("{}", tr("not_found", locale));
            ExitCode::FAILURE
        }
    }
}

fn print_record(animal: &AnimalRecord, locale: Locale) {
    println!("{}", animal.name.get(locale));
    println!("{} | {}", animal.scientific_name, animal.image);
    println!();
    println!("{}", animal.summary.get(locale));
    println!();
    println!("{}", tr("habitat", locale));
    println!("{}", animal.habitat.get(locale));
    println!();
    println!("{}", tr("facts", locale));
    for fact in animal.facts.get(locale) {
        println!("- {fact}");
    }
}
