//! The tracking session: one roster and at most one active character.
//!
//! `Session` owns everything the player works with. A command either
//! succeeds and returns the text to show, or fails with a [`SessionError`]
//! and leaves the session as it was.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vk_core::creation::ask_for_value;
use vk_core::validate::ValidationReport;
use vk_core::{
    ActivityKind, Character, CharacterId, Debility, Difficulty, Direction, MutationError, Prompt,
    Stat, create_character,
};

use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult, StoreError};
use crate::roster::Roster;
use crate::store::RosterStore;

/// An interactive tracking session.
pub struct Session {
    store: RosterStore,
    roster: Roster,
    active: Option<Character>,
    rng: StdRng,
    last_report: ValidationReport,
}

impl Session {
    /// Open a session on the data directory in `config`.
    ///
    /// The roster is read and the last used character resumed. A missing or
    /// unreadable roster file is not an error: the session starts empty and
    /// the first save creates the file.
    pub fn open(config: SessionConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut session = Self {
            store: RosterStore::new(&config.data_dir),
            roster: Roster::new(),
            active: None,
            rng: StdRng::seed_from_u64(seed),
            last_report: ValidationReport::new(),
        };

        let summary = match session.store.load_roster_summary() {
            Ok(summary) => summary,
            Err(StoreError::Missing(path)) => {
                tracing::debug!(path = %path.display(), "no character file yet");
                return session;
            }
            Err(e) => {
                tracing::warn!(error = %e, "cannot read the roster, starting empty");
                return session;
            }
        };
        session.roster = summary.roster;

        if let Some(id) = summary.resume {
            match session.store.load(id) {
                Ok(loaded) => {
                    tracing::debug!(%id, name = %loaded.character.name, "resuming character");
                    session.active = Some(loaded.character);
                    session.last_report = loaded.report;
                }
                Err(e) => tracing::warn!(%id, error = %e, "cannot resume last character"),
            }
        }
        session
    }

    /// The loaded character, if any.
    pub fn active_character(&self) -> Option<&Character> {
        self.active.as_ref()
    }

    /// Every known character.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Fields corrected during the most recent load.
    pub fn last_report(&self) -> &ValidationReport {
        &self.last_report
    }

    /// The prompt to show before the next command.
    pub fn prompt(&self) -> String {
        match &self.active {
            Some(c) => c.prompt_label(),
            None => "> ".to_string(),
        }
    }

    /// Process a line of input and return the response.
    ///
    /// `prompt` is used by commands that ask follow-up questions, such as
    /// `create`.
    pub fn process(&mut self, input: &str, prompt: &mut dyn Prompt) -> SessionResult<String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(String::new());
        }

        let parts: Vec<&str> = trimmed.splitn(2, ' ').collect();
        let cmd = parts[0].to_lowercase();
        let rest = parts.get(1).map(|s| s.trim()).unwrap_or("");

        match cmd.as_str() {
            "create" => self.create(rest, prompt),
            "cd" => self.switch(rest),
            "delete" => self.delete(),
            "ls" => Ok(self.list()),
            "print" => self.print_current(),
            "toggle" => self.toggle(rest),
            "increase" => self.increase(rest),
            "decrease" => self.decrease(rest),
            "progress" => self.mark_progress(),
            "journey" => self.start_progress(ActivityKind::Journey, rest, prompt),
            "fight" => self.start_progress(ActivityKind::Fight, rest, prompt),
            "delve" => self.start_progress(ActivityKind::Delve, rest, prompt),
            "initiative" => self.toggle_initiative(),
            "end" => self.end_progress(),
            "save" => self.persist(),
            "help" => Ok(help_text()),
            "quit" | "q" => {
                self.close()?;
                Ok("Goodbye!".to_string())
            }
            _ => Err(SessionError::Usage(format!(
                "Unknown command: {cmd}. Type 'help' for commands."
            ))),
        }
    }

    /// Create a new character and make it the active one.
    ///
    /// An empty `name` is asked for through `prompt`. The current character
    /// is saved and unloaded before the name is checked.
    pub fn create(&mut self, name: &str, prompt: &mut dyn Prompt) -> SessionResult<String> {
        self.release()?;
        let name = name.trim();
        if self.roster.contains_name(name) {
            return Err(SessionError::DuplicateName(name.to_string()));
        }

        let id = self.fresh_id();
        let roster = &self.roster;
        let character = create_character(id, name, |n| roster.contains_name(n), prompt)?;
        self.roster.add(character.id, character.name.as_str());

        let mut out = character.to_string();
        if let Err(e) = self.store.save(&character) {
            tracing::warn!(id = %character.id, error = %e, "new character not saved");
            out.push_str(&format!("\n\nCould not save the new character yet: {e}"));
        }

        self.last_report = ValidationReport::new();
        self.active = Some(character);
        Ok(out)
    }

    /// Load the character called `name`, saving the current one first.
    ///
    /// With an empty name the current character is saved and unloaded.
    pub fn switch(&mut self, name: &str) -> SessionResult<String> {
        let name = name.trim();
        if name.is_empty() {
            if self.active.is_none() {
                return Err(SessionError::Usage(
                    "Provide the name of a character as argument\n\n\
                     Example: cd Delkash - load the character named Delkash"
                        .to_string(),
                ));
            }
            self.release()?;
            self.store.unset_last_used()?;
            return Ok(String::new());
        }

        let id = self
            .roster
            .find_by_name(name)
            .map(|e| e.id)
            .ok_or_else(|| SessionError::UnknownCharacter(name.to_string()))?;

        self.release()?;
        let loaded = self.store.load(id)?;
        let mut out = String::new();
        for violation in loaded.report.violations() {
            out.push_str(&format!("{violation}\n"));
        }
        out.push_str(&loaded.character.to_string());

        self.last_report = loaded.report;
        self.active = Some(loaded.character);
        Ok(out)
    }

    /// Delete the active character from the roster and from disk.
    pub fn delete(&mut self) -> SessionResult<String> {
        let character = self.active.as_ref().ok_or(SessionError::NoCharacter)?;
        let id = character.id;
        self.store.delete(id)?;

        if self.roster.remove(id).is_none() {
            tracing::debug!(%id, "deleted character had no roster entry");
        }
        let name = self
            .active
            .take()
            .map(|c| c.name)
            .unwrap_or_default();
        Ok(format!("Deleted {name}"))
    }

    /// Names of all characters, one per line.
    pub fn list(&self) -> String {
        self.roster.names().join("\n")
    }

    /// The active character's sheet.
    pub fn print_current(&self) -> SessionResult<String> {
        Ok(self.current()?.to_string())
    }

    /// Flip a debility on the active character.
    pub fn toggle(&mut self, arg: &str) -> SessionResult<String> {
        let character = self.current_mut()?;
        if arg.trim().is_empty() {
            return Err(SessionError::Usage(toggle_usage()));
        }
        let debility: Debility = arg.parse()?;
        Ok(character.toggle(debility)?.to_string())
    }

    /// Increase a stat, or mark progress with `increase progress`.
    pub fn increase(&mut self, arg: &str) -> SessionResult<String> {
        self.change(arg, Direction::Increase)
    }

    /// Decrease a stat, or unmark progress with `decrease progress`.
    pub fn decrease(&mut self, arg: &str) -> SessionResult<String> {
        self.change(arg, Direction::Decrease)
    }

    /// Mark progress on the running activity.
    pub fn mark_progress(&mut self) -> SessionResult<String> {
        let character = self.current_mut()?;
        Ok(character.mark_progress(Direction::Increase)?.to_string())
    }

    /// Start a journey, fight or delve.
    ///
    /// `arg` is the difficulty from 1 to 5. When it is empty the difficulty
    /// is asked for through `prompt`.
    pub fn start_progress(
        &mut self,
        kind: ActivityKind,
        arg: &str,
        prompt: &mut dyn Prompt,
    ) -> SessionResult<String> {
        self.current()?;
        let difficulty = if arg.trim().is_empty() {
            prompt.say(&difficulty_menu(kind));
            let level = ask_for_value(prompt, "Enter a value between 1 and 5: ", 1, 5)?;
            Difficulty::from_level(i64::from(level))
        } else {
            arg.trim().parse::<i64>().ok().and_then(Difficulty::from_level)
        };
        let difficulty = difficulty.ok_or_else(|| {
            SessionError::Usage("Invalid range. The value has to be between 1 and 5".to_string())
        })?;

        let character = self.current_mut()?;
        let previous = character.start_activity(kind, difficulty);
        let mut out = format!(
            "Starting a {} {}",
            difficulty.name().to_lowercase(),
            kind.title().to_lowercase()
        );
        if let Some(previous) = previous {
            out.push_str(&format!(" (the {} was abandoned)", previous.title().to_lowercase()));
        }
        Ok(out)
    }

    /// End the running activity.
    pub fn end_progress(&mut self) -> SessionResult<String> {
        let character = self.current_mut()?;
        let kind = character
            .end_activity()
            .ok_or(MutationError::NoActiveProgress)?;
        Ok(format!("{kind} ended"))
    }

    /// Flip initiative in the running fight.
    pub fn toggle_initiative(&mut self) -> SessionResult<String> {
        let character = self.current_mut()?;
        match character.toggle_initiative() {
            Some(true) => Ok("You have the initiative".to_string()),
            Some(false) => Ok("You lost the initiative".to_string()),
            None => Err(SessionError::Usage("You are not in a fight".to_string())),
        }
    }

    /// Save the active character.
    pub fn persist(&mut self) -> SessionResult<String> {
        let character = self.current()?;
        self.store.save(character)?;
        Ok(format!("Saved {}", character.name))
    }

    /// Save and unload the active character. Does nothing when empty.
    pub fn close(&mut self) -> SessionResult<()> {
        self.release()
    }

    fn release(&mut self) -> SessionResult<()> {
        let Some(character) = &self.active else {
            tracing::debug!("no character loaded");
            return Ok(());
        };
        self.store.save(character)?;
        self.active = None;
        Ok(())
    }

    fn change(&mut self, arg: &str, direction: Direction) -> SessionResult<String> {
        let character = self.current_mut()?;
        let arg = arg.trim();
        if arg.is_empty() {
            return Err(SessionError::Usage(change_usage(direction)));
        }
        if arg.eq_ignore_ascii_case("progress") {
            return Ok(character.mark_progress(direction)?.to_string());
        }
        let stat: Stat = arg.parse()?;
        Ok(character.adjust(stat, direction)?.to_string())
    }

    fn current(&self) -> SessionResult<&Character> {
        self.active.as_ref().ok_or(SessionError::NoCharacter)
    }

    fn current_mut(&mut self) -> SessionResult<&mut Character> {
        self.active.as_mut().ok_or(SessionError::NoCharacter)
    }

    fn fresh_id(&mut self) -> CharacterId {
        loop {
            let raw = self.rng.random_range(1..=CharacterId::MAX);
            let id = CharacterId::new(i64::from(raw)).filter(|id| !self.roster.contains_id(*id));
            if let Some(id) = id {
                return id;
            }
        }
    }
}

fn toggle_usage() -> String {
    let mut text = String::from(
        "Please specify the stat you want to toggle\n\n\
         Example: toggle wounded\n\n\
         You can toggle the following values:\n",
    );
    for debility in Debility::ALL {
        text.push_str(&format!("\n-{}", debility.title()));
    }
    text
}

fn change_usage(direction: Direction) -> String {
    let verb = direction.verb();
    let mut text = format!(
        "Please specify the stat you want to {verb}\n\n\
         Example: {verb} wits\t- {verb} 'wits' by 1\n\n\
         You can change the following values:\n"
    );
    for stat in Stat::ALL {
        text.push_str(&format!("\n-{stat}"));
    }
    text.push_str("\n-progress");
    text
}

fn difficulty_menu(kind: ActivityKind) -> String {
    let noun = kind.title().to_lowercase();
    let mut text = format!("Please set a difficulty for your {noun}\n");
    for difficulty in Difficulty::ALL {
        let per_mark = difficulty.progress_per_mark();
        let amount = if difficulty.uses_ticks() {
            let ticks = (per_mark * 4.0).round() as i32;
            if ticks == 1 {
                "1 tick".to_string()
            } else {
                format!("{ticks} ticks")
            }
        } else {
            format!("{per_mark:.0} progress")
        };
        text.push_str(&format!(
            "\n{}\t - {} {noun} ({amount} per mark)",
            difficulty.level(),
            difficulty.name()
        ));
    }
    text
}

fn help_text() -> String {
    "\
Characters:
  create [name]        Create a new character
  cd [name]            Load a character, or unload the current one
  delete               Delete the current character
  ls                   List all characters
  print                Show the character sheet
  save                 Save the current character

Stats:
  increase <stat>      Increase a stat by one
  decrease <stat>      Decrease a stat by one
  toggle <debility>    Set or clear a debility

Progress:
  journey <1-5>        Start a journey
  fight <1-5>          Start a fight
  delve <1-5>          Start a delve
  progress             Mark progress on the running activity
  initiative           Take or lose initiative in a fight
  end                  End the running activity

  help                 Show this help
  quit                 Save and exit"
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use vk_core::ScriptedPrompt;

    fn config(dir: &TempDir) -> SessionConfig {
        SessionConfig::default()
            .with_data_dir(dir.path())
            .with_seed(42)
    }

    fn session(dir: &TempDir) -> Session {
        Session::open(config(dir))
    }

    fn attributes() -> ScriptedPrompt {
        ScriptedPrompt::new(["3", "2", "2", "1", "1"])
    }

    fn with_kira(dir: &TempDir) -> Session {
        let mut s = session(dir);
        s.create("Kira", &mut attributes()).unwrap();
        s
    }

    #[test]
    fn empty_directory_opens_empty() {
        let dir = TempDir::new().unwrap();
        let s = session(&dir);
        assert!(s.active_character().is_none());
        assert!(s.roster().is_empty());
        assert_eq!(s.prompt(), "> ");
    }

    #[test]
    fn create_activates_and_persists() {
        let dir = TempDir::new().unwrap();
        let s = with_kira(&dir);
        let c = s.active_character().unwrap();
        assert_eq!(c.name, "Kira");
        assert_eq!(c.edge, 3);
        assert_eq!(s.prompt(), "Kira > ");
        assert!(dir.path().join("characters.json").exists());
        assert_eq!(s.list(), "Kira");
    }

    #[test]
    fn reopen_resumes_last_character() {
        let dir = TempDir::new().unwrap();
        let mut s = with_kira(&dir);
        s.increase("wits").unwrap();
        s.close().unwrap();

        let s = session(&dir);
        let c = s.active_character().unwrap();
        assert_eq!(c.name, "Kira");
        assert_eq!(c.wits, 2);
        assert!(s.last_report().is_empty());
    }

    #[test]
    fn failed_switch_leaves_the_session_empty() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("characters.json");
        std::fs::write(
            &file,
            r#"{ "characters": [ { "id": 5, "name": "Kira" }, { "id": 6, "name": "Asha" } ], "last_used": 6 }"#,
        )
        .unwrap();
        let mut s = session(&dir);
        assert_eq!(s.active_character().unwrap().name, "Asha");

        std::fs::write(&file, r#"{ "characters": [ { "id": 6, "name": "Asha" } ] }"#).unwrap();
        let err = s.switch("kira").unwrap_err();
        assert!(matches!(err, SessionError::Store(StoreError::NotFound(_))));
        assert!(s.active_character().is_none());

        s.switch("asha").unwrap();
        assert_eq!(s.active_character().unwrap().name, "Asha");
    }

    #[test]
    fn create_rejects_duplicate_names() {
        let dir = TempDir::new().unwrap();
        let mut s = with_kira(&dir);
        s.decrease("health").unwrap();
        let err = s.create("kira", &mut attributes()).unwrap_err();
        assert!(matches!(err, SessionError::DuplicateName(_)));
        assert_eq!(s.roster().len(), 1);
        assert!(s.active_character().is_none());
        assert_eq!(s.prompt(), "> ");

        s.switch("Kira").unwrap();
        assert_eq!(s.active_character().unwrap().health, 4);
    }

    #[test]
    fn create_saves_the_previous_character() {
        let dir = TempDir::new().unwrap();
        let mut s = with_kira(&dir);
        s.decrease("health").unwrap();
        s.create("Asha", &mut attributes()).unwrap();
        assert_eq!(s.roster().len(), 2);

        s.switch("Kira").unwrap();
        assert_eq!(s.active_character().unwrap().health, 4);
    }

    #[test]
    fn create_with_prompted_name() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir);
        let mut prompt = ScriptedPrompt::new(["Asha", "1", "1", "1", "1", "1"]);
        s.process("create", &mut prompt).unwrap();
        assert_eq!(s.active_character().unwrap().name, "Asha");
    }

    #[test]
    fn switch_unknown_name() {
        let dir = TempDir::new().unwrap();
        let mut s = with_kira(&dir);
        let err = s.switch("Nobody").unwrap_err();
        assert_eq!(err.to_string(), "No character named Nobody found.");
        assert_eq!(s.active_character().unwrap().name, "Kira");
    }

    #[test]
    fn switch_without_name() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir);
        assert!(matches!(s.switch(""), Err(SessionError::Usage(_))));

        let mut s = with_kira(&dir);
        s.switch("").unwrap();
        assert!(s.active_character().is_none());

        let s = session(&dir);
        assert!(s.active_character().is_none());
        assert_eq!(s.roster().len(), 1);
    }

    #[test]
    fn delete_removes_everything() {
        let dir = TempDir::new().unwrap();
        let mut s = with_kira(&dir);
        assert_eq!(s.delete().unwrap(), "Deleted Kira");
        assert!(s.active_character().is_none());
        assert!(s.roster().is_empty());
        assert!(matches!(s.delete(), Err(SessionError::NoCharacter)));

        let s = session(&dir);
        assert!(s.roster().is_empty());
    }

    #[test]
    fn commands_need_a_character() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir);
        assert!(matches!(s.toggle("wounded"), Err(SessionError::NoCharacter)));
        assert!(matches!(s.increase("wits"), Err(SessionError::NoCharacter)));
        assert!(matches!(s.mark_progress(), Err(SessionError::NoCharacter)));
        assert!(matches!(s.print_current(), Err(SessionError::NoCharacter)));
        assert!(matches!(s.persist(), Err(SessionError::NoCharacter)));
    }

    #[test]
    fn empty_arguments_show_usage() {
        let dir = TempDir::new().unwrap();
        let mut s = with_kira(&dir);
        let Err(SessionError::Usage(text)) = s.toggle("") else {
            panic!("expected usage");
        };
        assert!(text.contains("-Maimed"));
        let Err(SessionError::Usage(text)) = s.increase(" ") else {
            panic!("expected usage");
        };
        assert!(text.contains("-expspent"));
        assert!(text.contains("increase wits"));
    }

    #[test]
    fn toggle_and_adjust_messages() {
        let dir = TempDir::new().unwrap();
        let mut s = with_kira(&dir);
        let out = s.toggle("Wounded").unwrap();
        assert!(out.starts_with("Toggle wounded from 0 to 1"));
        assert!(out.contains("Your max momentum changed from 10 to 9"));

        let err = s.increase("health").unwrap_err();
        assert_eq!(err.to_string(), "You are wounded, you cannot increase health");
        assert_eq!(s.decrease("health").unwrap(), "Decreasing health from 5 to 4");
        assert!(matches!(
            s.increase("charisma"),
            Err(SessionError::Mutation(MutationError::UnknownStat(_)))
        ));
    }

    #[test]
    fn progress_flow() {
        let dir = TempDir::new().unwrap();
        let mut s = with_kira(&dir);
        assert!(matches!(
            s.mark_progress(),
            Err(SessionError::Mutation(MutationError::NoActiveProgress))
        ));

        let mut prompt = ScriptedPrompt::new(Vec::<String>::new());
        s.start_progress(ActivityKind::Journey, "2", &mut prompt).unwrap();
        assert_eq!(s.prompt(), "Kira > Journey 0/10 > ");
        s.mark_progress().unwrap();
        assert_eq!(s.prompt(), "Kira > Journey 2/10 > ");
        s.decrease("progress").unwrap();
        assert_eq!(s.prompt(), "Kira > Journey 0/10 > ");

        let out = s.start_progress(ActivityKind::Fight, "4", &mut prompt).unwrap();
        assert!(out.contains("journey was abandoned"));
        s.toggle_initiative().unwrap();
        assert_eq!(s.prompt(), "Kira > Fight 0.00/10 [I] > ");

        assert_eq!(s.end_progress().unwrap(), "Fight ended");
        assert!(matches!(s.toggle_initiative(), Err(SessionError::Usage(_))));
    }

    #[test]
    fn difficulty_is_asked_when_missing() {
        let dir = TempDir::new().unwrap();
        let mut s = with_kira(&dir);
        let mut prompt = ScriptedPrompt::new(["7", "3"]);
        s.start_progress(ActivityKind::Delve, "", &mut prompt).unwrap();
        let track = s.active_character().unwrap().activity.track().copied().unwrap();
        assert_eq!(track.difficulty, Difficulty::Formidable);
        assert!(prompt.transcript[0].contains("Please set a difficulty for your delve"));
    }

    #[test]
    fn bad_difficulty_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut s = with_kira(&dir);
        let mut prompt = ScriptedPrompt::default();
        assert!(matches!(
            s.start_progress(ActivityKind::Journey, "6", &mut prompt),
            Err(SessionError::Usage(_))
        ));
        assert!(s.active_character().unwrap().activity.kind().is_none());
    }

    #[test]
    fn activity_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let mut s = with_kira(&dir);
        let mut prompt = ScriptedPrompt::default();
        s.process("fight 2", &mut prompt).unwrap();
        s.process("progress", &mut prompt).unwrap();
        s.process("initiative", &mut prompt).unwrap();
        s.process("quit", &mut prompt).unwrap();

        let s = session(&dir);
        assert_eq!(s.prompt(), "Kira > Fight 2/10 [I] > ");
    }

    #[test]
    fn process_dispatch() {
        let dir = TempDir::new().unwrap();
        let mut s = with_kira(&dir);
        let mut prompt = ScriptedPrompt::default();
        assert_eq!(s.process("", &mut prompt).unwrap(), "");
        assert!(s.process("help", &mut prompt).unwrap().contains("journey <1-5>"));
        assert!(s.process("print", &mut prompt).unwrap().starts_with("Name: Kira"));
        assert_eq!(s.process("save", &mut prompt).unwrap(), "Saved Kira");
        assert!(matches!(
            s.process("dance", &mut prompt),
            Err(SessionError::Usage(_))
        ));
        assert_eq!(s.process("quit", &mut prompt).unwrap(), "Goodbye!");
        assert!(s.active_character().is_none());
    }

    #[test]
    fn same_seed_same_ids() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        let id_a = with_kira(&a).active_character().unwrap().id;
        let id_b = with_kira(&b).active_character().unwrap().id;
        assert_eq!(id_a, id_b);
    }
}
