//! Interactive kiosk loop.
//!
//! Reads one command per stdin line and re-renders after each intent. While
//! the thank-you screen is up the loop also waits on the auto-reset deadline,
//! so the kiosk returns to the welcome screen without anyone typing.

use clap::Args;
use survey_core::{
    AnswerStore, Clock, Config, MemoryAnswerStore, QuestionCatalog, SqliteAnswerStore,
    StorageBackend, SurveyController,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::input::{parse_command, Command, HELP};
use crate::render::{feedback, render};

#[derive(Args)]
pub struct RunArgs {
    /// Seconds before the thank-you screen returns to welcome
    #[arg(long)]
    pub reset_delay_secs: Option<u64>,
    /// Keep answers in memory only (nothing is written to disk)
    #[arg(long)]
    pub memory: bool,
}

pub fn run(args: RunArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = config.clone();
    if let Some(secs) = args.reset_delay_secs {
        config.kiosk.reset_delay_secs = secs;
        config.validate()?;
    }
    let backend = if args.memory {
        StorageBackend::Memory
    } else {
        config.kiosk.storage
    };

    let store: Box<dyn AnswerStore> = match backend {
        StorageBackend::Sqlite => Box::new(SqliteAnswerStore::open(&config)?),
        StorageBackend::Memory => Box::new(MemoryAnswerStore::new()),
    };
    tracing::info!(?backend, reset_delay_secs = config.kiosk.reset_delay_secs, "kiosk starting");

    let mut flow = SurveyController::new(QuestionCatalog::customer_satisfaction(), store)
        .with_reset_delay(config.reset_delay());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let result = runtime.block_on(kiosk_loop(&mut flow));
    // A stdin read may still be parked on the blocking pool.
    runtime.shutdown_background();
    result
}

async fn kiosk_loop<S: AnswerStore, C: Clock>(
    flow: &mut SurveyController<S, C>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print!("{}", render(&flow.current_screen()));

    loop {
        let wait = flow.reset_remaining().and_then(|d| d.to_std().ok());
        let line = match wait {
            Some(wait) => {
                tokio::select! {
                    line = lines.next_line() => line?,
                    _ = tokio::time::sleep(wait) => {
                        if flow.tick() {
                            log_events(flow);
                            print!("{}", render(&flow.current_screen()));
                        }
                        continue;
                    }
                }
            }
            None => lines.next_line().await?,
        };

        // End of input.
        let Some(line) = line else { break };

        if flow.tick() {
            log_events(flow);
        }

        match parse_command(&line, &flow.current_screen()) {
            Ok(Command::Empty) => {}
            Ok(Command::Help) => println!("{HELP}"),
            Ok(Command::Quit) => break,
            Ok(Command::Intent(intent)) => match flow.submit(intent) {
                Ok(view) => print!("{}", render(&view)),
                Err(e) => println!("{}", feedback(&e)),
            },
            Err(msg) => println!("{msg}"),
        }
        log_events(flow);
    }

    tracing::info!("kiosk stopped");
    Ok(())
}

fn log_events<S: AnswerStore, C: Clock>(flow: &mut SurveyController<S, C>) {
    for event in flow.drain_events() {
        match serde_json::to_string(&event) {
            Ok(json) => tracing::debug!(event = %json, "survey event"),
            Err(e) => tracing::warn!(error = %e, "could not encode survey event"),
        }
    }
}
