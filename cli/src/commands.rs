use crate::error::AppResult;
use crate::host::Session;
use clap::Subcommand;
use engine::catalog::ThemeDiscovery;
use engine::page::PageModel;
use engine::persistence::{KeyValueStore, LegacyStylesheetSwitcher, ThemePreferences};
use engine::{ApplyOutcome, ThemeCatalog};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Discover the published themes and list them
    Themes,
    /// Run the page-load lifecycle and print the resulting page
    Init,
    /// Run the page-load lifecycle, then select a theme as the user would
    Select {
        /// Theme id, e.g. cyrodiil
        theme: String,
    },
    /// Print the saved theme selection
    Current,
    /// Restore, or change, the stylesheet of the older demo switcher
    Legacy {
        /// Stylesheet filename to switch to, e.g. style2.css
        filename: Option<String>,
    },
}

#[derive(Debug, Serialize)]
pub struct LifecycleOutput {
    pub current_theme: String,
    pub outcome: ApplyOutcome,
    pub page: PageModel,
}

#[derive(Debug, Serialize)]
pub struct LegacyOutput {
    pub stylesheet: String,
    pub page: PageModel,
}

/// Runs `command` and returns what should be printed on stdout.
pub async fn execute<K: KeyValueStore>(command: &Command, session: Session<K>) -> AppResult<String> {
    match command {
        Command::Themes => list_themes(&session).await,
        Command::Init => {
            let controller = session.into_controller();
            let outcome = controller.initialize().await;
            let output = LifecycleOutput {
                current_theme: controller.current_theme(),
                outcome,
                page: controller.into_page(),
            };
            Ok(serde_json::to_string_pretty(&output)?)
        }
        Command::Select { theme } => {
            let controller = session.into_controller();
            controller.initialize().await;
            let outcome = controller.select(theme).await;
            if let ApplyOutcome::UnknownTheme { theme_id } = &outcome {
                log::warn!("Theme \"{theme_id}\" is not available, selection ignored");
            }
            let output = LifecycleOutput {
                current_theme: controller.current_theme(),
                outcome,
                page: controller.into_page(),
            };
            Ok(serde_json::to_string_pretty(&output)?)
        }
        Command::Current => {
            let catalog = discover(&session).await;
            let preferences = ThemePreferences::new(&session.store, &session.settings.storage_key);
            Ok(preferences.resolve(&catalog).await)
        }
        Command::Legacy { filename } => {
            let Session {
                mut page,
                store,
                settings,
                ..
            } = session;
            let switcher = LegacyStylesheetSwitcher::new(
                store,
                &settings.slots.primary_link,
                &settings.slots.selector,
            );
            let stylesheet = match filename {
                Some(filename) => {
                    switcher.change(&mut page, filename).await?;
                    filename.clone()
                }
                None => switcher.restore(&mut page).await,
            };
            Ok(serde_json::to_string_pretty(&LegacyOutput { stylesheet, page })?)
        }
    }
}

async fn discover<K: KeyValueStore>(session: &Session<K>) -> ThemeCatalog {
    ThemeDiscovery::new(session.source.clone(), session.settings.catalog.clone())
        .discover()
        .await
}

async fn list_themes<K: KeyValueStore>(session: &Session<K>) -> AppResult<String> {
    let catalog = discover(session).await;
    if catalog.is_empty() {
        return Ok("No themes found".to_string());
    }

    let names = &session.settings.display_names;
    let lines: Vec<String> = catalog
        .sorted_ids()
        .iter()
        .filter_map(|id| catalog.get(id))
        .map(|theme| {
            format!(
                "{}\t{}\t{}\t{}",
                theme.id,
                names.display_name(&theme.id),
                theme.main_stylesheet,
                theme.fragment_root
            )
        })
        .collect();
    Ok(lines.join("\n"))
}
