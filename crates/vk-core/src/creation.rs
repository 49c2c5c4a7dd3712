//! Interactive character creation.
//!
//! The flow only talks to the player through the [`Prompt`] trait, so the
//! command line can drive it from stdin and tests can drive it from a script.

use crate::character::{ATTRIBUTE_MAX, Character, CharacterId};
use crate::error::CreationError;

/// A line-oriented conversation with the player.
pub trait Prompt {
    /// Show `question` and read one line of input. `None` at end of input.
    fn ask(&mut self, question: &str) -> Option<String>;

    /// Show an informational line.
    fn say(&mut self, message: &str);
}

/// Ask for an integer until the answer lies in `[min, max]`.
pub fn ask_for_value(
    prompt: &mut dyn Prompt,
    question: &str,
    min: i32,
    max: i32,
) -> Result<i32, CreationError> {
    loop {
        let line = prompt.ask(question).ok_or(CreationError::Aborted)?;
        match line.trim().parse::<i32>() {
            Ok(value) if (min..=max).contains(&value) => return Ok(value),
            _ => prompt.say(&format!(
                "Invalid range. The value has to be between {min} and {max}"
            )),
        }
    }
}

/// Walk the player through creating a character.
///
/// An empty `name` means the name is asked for; the answer must be
/// non-empty and not `is_taken`. A given name is trusted, the caller has
/// already checked it. The attribute budget is shown as guidance only.
pub fn create_character(
    id: CharacterId,
    name: &str,
    is_taken: impl Fn(&str) -> bool,
    prompt: &mut dyn Prompt,
) -> Result<Character, CreationError> {
    let name = if name.trim().is_empty() {
        let answer = prompt
            .ask("Enter a name for your character: ")
            .ok_or(CreationError::Aborted)?;
        let answer = answer.trim().to_string();
        if answer.is_empty() {
            return Err(CreationError::EmptyName);
        }
        if is_taken(&answer) {
            return Err(CreationError::DuplicateName(answer));
        }
        answer
    } else {
        let name = name.trim().to_string();
        prompt.say(&format!("Creating a character named {name}"));
        name
    };

    let mut character = Character::new(id, name);
    prompt.say("Now distribute the following values to your attributes: 3,2,2,1,1");

    character.edge = ask_for_value(prompt, "Edge   : ", 0, ATTRIBUTE_MAX)?;
    character.heart = ask_for_value(prompt, "Heart  : ", 0, ATTRIBUTE_MAX)?;
    character.iron = ask_for_value(prompt, "Iron   : ", 0, ATTRIBUTE_MAX)?;
    character.wits = ask_for_value(prompt, "Wits   : ", 0, ATTRIBUTE_MAX)?;
    character.shadow = ask_for_value(prompt, "Shadow : ", 0, ATTRIBUTE_MAX)?;

    tracing::debug!(id = %character.id, name = %character.name, "character created");
    Ok(character)
}

/// A [`Prompt`] that answers from a fixed list of lines, for tests and
/// scripted creation.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompt {
    answers: std::collections::VecDeque<String>,
    /// Every question and message shown, in order.
    pub transcript: Vec<String>,
}

impl ScriptedPrompt {
    /// Create a prompt that replies with `answers` in order.
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&mut self, question: &str) -> Option<String> {
        self.transcript.push(question.to_string());
        self.answers.pop_front()
    }

    fn say(&mut self, message: &str) {
        self.transcript.push(message.to_string());
    }
}
