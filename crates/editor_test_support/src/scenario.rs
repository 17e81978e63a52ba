//! TOML-described editing sessions.
//!
//! ```toml
//! [[scenario]]
//! name = "enter commits"
//! seed = ["a@b.com"]
//! steps = ["focus", { type = "x@y.z" }, "enter"]
//! emails = ["a@b.com", "x@y.z"]
//! valid = [true, true]
//! changes = 1
//! ```

use crate::Harness;
use emails_editor::EditorConfig;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Focus,
    Blur,
    Enter,
    Backspace,
    Frames,
    Type(String),
    Paste(String),
    ClickRemove(usize),
    MouseDownChip(usize),
    Add(String),
    Set(Vec<String>),
    Remove(usize),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub seed: Vec<String>,
    pub steps: Vec<Step>,
    pub emails: Vec<String>,
    #[serde(default)]
    pub valid: Option<Vec<bool>>,
    /// Expected number of listener invocations.
    #[serde(default)]
    pub changes: Option<usize>,
}

#[derive(Deserialize)]
struct ScenarioFile {
    #[serde(default)]
    scenario: Vec<Scenario>,
}

pub fn load_scenarios(path: &Path) -> Vec<Scenario> {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read scenario file {path:?}: {err}"));
    let file: ScenarioFile = toml::from_str(&content)
        .unwrap_or_else(|err| panic!("failed to parse scenario file {path:?}: {err}"));
    assert!(!file.scenario.is_empty(), "scenario file {path:?} has no scenarios");
    file.scenario
}

impl Scenario {
    /// Replay the steps against a freshly seeded editor.
    pub fn run(&self) -> Harness {
        let mut harness = Harness::new(EditorConfig {
            initial_emails: self.seed.clone(),
            ..EditorConfig::default()
        });
        for step in &self.steps {
            apply(&mut harness, step, &self.name);
        }
        harness
    }

    /// Replay and check the expectations, panicking with the scenario name.
    pub fn check(&self) {
        let harness = self.run();
        assert_eq!(harness.values(), self.emails, "emails for '{}'", self.name);
        if let Some(valid) = &self.valid {
            let actual: Vec<bool> = harness.editor().get_emails().iter().map(|r| r.valid).collect();
            assert_eq!(&actual, valid, "validity for '{}'", self.name);
        }
        if let Some(changes) = self.changes {
            assert_eq!(
                harness.change_count(),
                changes,
                "change notifications for '{}'",
                self.name
            );
        }
    }
}

fn apply(harness: &mut Harness, step: &Step, name: &str) {
    let result = match step {
        Step::Focus => {
            harness.focus();
            Ok(())
        }
        Step::Blur => {
            harness.blur();
            Ok(())
        }
        Step::Enter => {
            harness.enter();
            Ok(())
        }
        Step::Backspace => {
            harness.backspace();
            Ok(())
        }
        Step::Frames => {
            harness.run_frames();
            Ok(())
        }
        Step::Type(text) => {
            harness.type_text(text);
            Ok(())
        }
        Step::Paste(text) => {
            harness.paste(text);
            Ok(())
        }
        Step::ClickRemove(index) => {
            harness.click_remove(*index);
            Ok(())
        }
        Step::MouseDownChip(index) => {
            harness.mouse_down_on_chip(*index);
            Ok(())
        }
        Step::Add(email) => harness.editor_mut().add_email(email),
        Step::Set(emails) => harness.editor_mut().set_emails(emails),
        Step::Remove(index) => harness.editor_mut().remove_email_at_index(*index),
    };
    if let Err(err) = result {
        panic!("step {step:?} of '{name}' failed: {err}");
    }
}
