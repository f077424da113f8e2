use anyhow::{Context, Result};
use inquire::{InquireError, Select, Text};
use skysense_core::{Controller, Unit, render};

const HELP: &str = "Type a city to search. Commands: /c /f /u (units), /h (history), \
                    /clear (forget history), /q (quit)";

/// What a line typed at the prompt asks for.
#[derive(Debug, PartialEq, Eq)]
enum Action {
    Search(String),
    SetUnit(Unit),
    ToggleUnit,
    PickHistory,
    ClearHistory,
    Help,
    Quit,
    Nothing,
}

fn parse_action(input: &str) -> Action {
    let input = input.trim();

    match input.to_lowercase().as_str() {
        "" => Action::Nothing,
        "/c" => Action::SetUnit(Unit::Celsius),
        "/f" => Action::SetUnit(Unit::Fahrenheit),
        "/u" => Action::ToggleUnit,
        "/h" => Action::PickHistory,
        "/clear" => Action::ClearHistory,
        "/q" | "/quit" | "/exit" => Action::Quit,
        cmd if cmd.starts_with('/') => Action::Help,
        _ => Action::Search(input.to_string()),
    }
}

/// Interactive search loop. Starts by searching the default city.
pub async fn run(mut controller: Controller) -> Result<()> {
    println!("{HELP}\n");

    controller.bootstrap().await;
    print!("{}", render::render_view(&controller));

    loop {
        let line = match Text::new("City:").prompt() {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read input"),
        };

        match parse_action(&line) {
            Action::Search(city) => {
                controller.set_city_input(city);
                controller.submit().await;
            }
            Action::SetUnit(unit) => controller.set_unit(unit),
            Action::ToggleUnit => controller.toggle_unit(),
            Action::PickHistory => {
                if !pick_history(&mut controller).await? {
                    continue;
                }
            }
            Action::ClearHistory => controller.clear_history(),
            Action::Help => {
                println!("{HELP}");
                continue;
            }
            Action::Quit => break,
            Action::Nothing => continue,
        }

        println!();
        print!("{}", render::render_view(&controller));
    }

    Ok(())
}

/// Returns `false` when nothing was picked.
async fn pick_history(controller: &mut Controller) -> Result<bool> {
    if controller.history().is_empty() {
        println!("No recent searches.");
        return Ok(false);
    }

    let options: Vec<String> = controller.history().iter().map(|h| h.city.clone()).collect();

    match Select::new("Recent searches:", options).raw_prompt() {
        Ok(choice) => {
            controller.select_history(choice.index).await;
            Ok(true)
        }
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(false),
        Err(err) => Err(err).context("Failed to read selection"),
    }
}
