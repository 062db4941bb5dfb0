use reading_settings::config::Config;
use reading_settings::services::{Notice, Session, WordByWordSectionView};
use reading_settings::types::{WordByWordDisplay, WordByWordType};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HELP: &str = "commands: open | close | show | locale <code> | audio on|off | \
inline on|off | tooltip on|off | translation on|off | transliteration on|off | url | quit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reading_settings=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let session = Session::from_config(&config).await?;
    info!("Starting on {}", config.page_url);

    // Print persistence failures as toasts
    {
        let mut notices = session.coordinator().subscribe();
        tokio::spawn(async move {
            while let Ok(notice) = notices.recv().await {
                if let Notice::PersistFailed { key, message, .. } = notice {
                    println!("! could not save {} ({}), change undone", key, message);
                }
            }
        });
    }

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => continue,
            ["quit"] | ["exit"] => break,
            ["open"] => {
                session.drawer().open();
                print_view(session.drawer().render());
            }
            ["close"] => session.drawer().close(),
            ["show"] => print_view(session.drawer().render()),
            ["url"] => println!("{}", session.current_url()),
            [command, rest @ ..] => {
                let Some(body) = session.drawer().body() else {
                    println!("settings drawer is closed, type `open` first");
                    continue;
                };
                let controller = body.controller();

                match (*command, rest) {
                    ("locale", [code]) => {
                        if let Err(e) = controller.change_locale(code) {
                            println!("{}", e);
                        }
                    }
                    ("audio", [flag]) => match parse_flag(flag) {
                        Some(on) => {
                            controller.change_click_functionality(on);
                        }
                        None => println!("{}", HELP),
                    },
                    ("inline" | "tooltip", [flag]) => match parse_flag(flag) {
                        Some(on) => {
                            if controller.display_toggles_disabled() {
                                println!("display options need a content type");
                                continue;
                            }
                            let mode = if *command == "inline" {
                                WordByWordDisplay::Inline
                            } else {
                                WordByWordDisplay::Tooltip
                            };
                            controller.change_display_mode(mode, on);
                        }
                        None => println!("{}", HELP),
                    },
                    ("translation" | "transliteration", [flag]) => match parse_flag(flag) {
                        Some(on) => {
                            let content = if *command == "translation" {
                                WordByWordType::Translation
                            } else {
                                WordByWordType::Transliteration
                            };
                            controller.change_content_type(content, on);
                        }
                        None => println!("{}", HELP),
                    },
                    _ => println!("{}", HELP),
                }
                print_view(session.drawer().render());
            }
        }
    }

    let timeout = std::time::Duration::from_millis(config.persist_timeout_ms);
    if let Err(e) = session.shutdown(timeout).await {
        error!("Failed to save local state: {}", e);
    }

    Ok(())
}

fn parse_flag(flag: &str) -> Option<bool> {
    match flag {
        "on" | "true" | "1" => Some(true),
        "off" | "false" | "0" => Some(false),
        _ => None,
    }
}

fn print_view(view: Option<WordByWordSectionView>) {
    let Some(view) = view else {
        println!("(settings drawer closed)");
        return;
    };

    let mark = |checked: bool, disabled: bool| match (checked, disabled) {
        (true, false) => "[x]",
        (false, false) => "[ ]",
        (true, true) => "(x)",
        (false, true) => "( )",
    };

    println!(
        "word by word{}",
        if view.is_loading { " (saving...)" } else { "" }
    );
    println!(
        "  {} translation  {} transliteration  {} recitation",
        mark(view.translation.checked, view.translation.disabled),
        mark(view.transliteration.checked, view.transliteration.disabled),
        mark(view.recitation.checked, view.recitation.disabled),
    );
    let locales: Vec<String> = view
        .locale_options
        .iter()
        .map(|option| {
            if option.value == view.selected_locale {
                format!("*{} ({})", option.value, option.label)
            } else {
                option.value.to_string()
            }
        })
        .collect();
    println!("  language: {}", locales.join(" "));
    println!(
        "  display: {} inline  {} tooltip",
        mark(view.inline.checked, view.inline.disabled),
        mark(view.tooltip.checked, view.tooltip.disabled),
    );
}
