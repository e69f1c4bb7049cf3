use colored::*;
use eyre::Result;

use crate::cli::{OutputFormat, SettingsAction};
use crate::store::TrailStore;
use crate::store::settings::SettingsField;

pub fn run(action: SettingsAction, store: &mut TrailStore) -> Result<()> {
    match action {
        SettingsAction::Show { format } => show(OutputFormat::resolve(format), store),
        SettingsAction::Get { field } => {
            println!("{}", store.settings().get(field));
            Ok(())
        }
        SettingsAction::Set { field, value } => set(field, &value, store),
    }
}

fn show(format: OutputFormat, store: &TrailStore) -> Result<()> {
    let settings = store.settings();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(settings)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(settings)?),
        OutputFormat::Text => {
            println!("{}", "Overlay settings".bold());
            println!();
            println!("  {:16} {}", "session".cyan(), settings.current_session);
            for field in [
                SettingsField::Color,
                SettingsField::Transparency,
                SettingsField::Mode,
                SettingsField::Thickness,
                SettingsField::GroupSize,
                SettingsField::Subdivisions,
                SettingsField::RenderDistance,
            ] {
                println!("  {:16} {}", field.key().cyan(), settings.get(field));
            }
        }
    }
    Ok(())
}

fn set(field: SettingsField, value: &str, store: &mut TrailStore) -> Result<()> {
    store.set_setting(field, value)?;
    println!(
        "{} {} set to {}",
        "✓".green(),
        field.key().cyan(),
        store.settings().get(field).green()
    );
    Ok(())
}
