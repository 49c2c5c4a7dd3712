use std::io::{self, BufRead, Write};

use colored::Colorize;

use vk_roster::{Session, SessionConfig};

use crate::prompt::LinePrompt;

pub fn run(config: SessionConfig) -> Result<(), String> {
    let data_dir = config.data_dir.clone();
    let mut session = Session::open(config);

    println!("  {} Vowkeeper", "Starting".bold());
    println!("  Data: {}", data_dir.display());
    println!("  Type 'help' for commands, 'quit' to exit.\n");

    for violation in session.last_report().violations() {
        println!("{}", violation.to_string().yellow());
    }
    if let Some(character) = session.active_character() {
        println!("Welcome back, {}\n", character.name);
    }

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("{}", session.prompt());
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut prompt = LinePrompt::new(&mut reader);
        match session.process(input, &mut prompt) {
            Ok(output) => {
                if !output.is_empty() {
                    println!("{output}\n");
                }
                if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("q") {
                    return Ok(());
                }
            }
            Err(e) => {
                println!("{}\n", e.to_string().yellow());
            }
        }
    }

    session
        .close()
        .map_err(|e| format!("failed to save on exit: {e}"))
}
