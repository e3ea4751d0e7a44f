use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Select, Text};
use rain_core::{Config, RequestError, Session, Verdict, ViewState, pipeline_from_config};
use std::process::ExitCode;

use crate::{configure, render::TerminalRenderer};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "willitrain", version, about = "Will it rain? Asks Open-Meteo.")]
pub struct Cli {
    /// Without a subcommand, starts an interactive session.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Is it raining in a city right now?
    City {
        /// City name, e.g. "Tokyo" or "New York".
        #[arg(required = true)]
        name: Vec<String>,
    },

    /// Is it raining where this machine is?
    Here,

    /// Set endpoints and this machine's position.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Some(Command::Configure) => {
                configure::run()?;
                Ok(ExitCode::SUCCESS)
            }
            Some(Command::City { name }) => {
                let session = new_session()?;
                let city = name.join(" ");
                match session.submit_city(&city).await {
                    Some(result) => Ok(exit_code(&result)),
                    None => {
                        eprintln!("Please enter a city name.");
                        Ok(ExitCode::from(2))
                    }
                }
            }
            Some(Command::Here) => {
                let session = new_session()?;
                let result = session.use_current_location().await;
                Ok(result.as_ref().map_or(ExitCode::FAILURE, exit_code))
            }
            None => {
                let session = new_session()?;
                interactive(&session).await?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn new_session() -> anyhow::Result<Session<TerminalRenderer>> {
    let config = Config::load()?;
    let pipeline = pipeline_from_config(&config).context("Invalid configuration")?;
    Ok(Session::new(pipeline, TerminalRenderer))
}

fn exit_code(result: &Result<Verdict, RequestError>) -> ExitCode {
    if result.is_ok() { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

const CHECK_CITY: &str = "Check a city";
const CHECK_HERE: &str = "Use my location";
const AGAIN: &str = "Check again";
const QUIT: &str = "Quit";

/// Input → Loading → Answer/Error → Input, until the user quits.
async fn interactive(session: &Session<TerminalRenderer>) -> anyhow::Result<()> {
    session.start();

    loop {
        match prompt_for(&session.state()) {
            Prompt::Input => {
                let Some(choice) =
                    answered(Select::new("Will it rain?", vec![CHECK_CITY, CHECK_HERE, QUIT]).prompt())?
                else {
                    return Ok(());
                };

                match choice {
                    CHECK_CITY => {
                        let Some(city) = answered(Text::new("City:").prompt())? else {
                            continue;
                        };
                        // blank input keeps us on the input screen
                        session.submit_city(&city).await;
                    }
                    CHECK_HERE => {
                        session.use_current_location().await;
                    }
                    _ => return Ok(()),
                }
            }
            Prompt::Next => match answered(Select::new("Next?", vec![AGAIN, QUIT]).prompt())? {
                Some(AGAIN) => session.reset(),
                _ => return Ok(()),
            },
            Prompt::Stop => return Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prompt {
    Input,
    Next,
    Stop,
}

/// What to ask for in a given view state.
///
/// `Loading` cannot be reset, so the loop stops instead of offering a retry
/// that would never leave it.
fn prompt_for(state: &ViewState) -> Prompt {
    match state {
        ViewState::Input => Prompt::Input,
        ViewState::Answer(_) | ViewState::Error(_) => Prompt::Next,
        ViewState::Loading => Prompt::Stop,
    }
}

/// `None` when the user escapes or interrupts the prompt.
fn answered<T>(result: Result<T, InquireError>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e).context("Prompt failed"),
    }
}
