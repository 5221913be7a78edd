//! Interactive Shell
//!
//! Reedline loop wiring the two user actions to the session manager and the
//! news driver: plain input is a chat message, dot-commands cover the rest.

use std::env;
use std::sync::Arc;

use nu_ansi_term::Color;
use reedline::{DefaultPrompt, DefaultPromptSegment, Reedline, Signal};

use crate::chat::ChatSession;
use crate::config::{self, AppConfig};
use crate::errors::{Result, TechdeskError};
use crate::news::NewsFetcher;
use crate::profile::ProfileStore;
use crate::providers::TextGenerator;

/// Interactive REPL
pub struct Shell {
    config: AppConfig,
    profile: ProfileStore,
    chat: ChatSession,
    /// Separate session so article prompts don't pollute the chat context
    news_session: ChatSession,
    editor: Reedline,
}

impl Shell {
    pub fn new(config: AppConfig, generator: Arc<dyn TextGenerator>) -> Self {
        let profile = ProfileStore::open_default();
        let chat = ChatSession::new(Arc::clone(&generator), config.prompt_strategy);
        let news_session = ChatSession::new(generator, config.prompt_strategy);

        Self {
            config,
            profile,
            chat,
            news_session,
            editor: Reedline::create(),
        }
    }

    /// Run the shell until exit
    pub async fn run(&mut self) -> Result<()> {
        self.print_banner();

        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("techdesk".to_string()),
            DefaultPromptSegment::Empty,
        );

        loop {
            match self.editor.read_line(&prompt) {
                Ok(Signal::Success(line)) => {
                    let line = line.trim().to_string();
                    if line.is_empty() {
                        continue;
                    }

                    match self.handle_input(&line).await {
                        Ok(true) => break,
                        Ok(false) => {}
                        Err(e) => {
                            eprintln!("{}", Color::Red.paint(format!("error: {e}")));
                        }
                    }
                }
                Ok(Signal::CtrlC) => {
                    println!(
                        "{}",
                        Color::DarkGray.paint("(Press Ctrl+D or type .exit to quit)")
                    );
                }
                Ok(Signal::CtrlD) => break,
                Err(e) => return Err(TechdeskError::InputError(e.to_string())),
            }
        }

        println!("{}", Color::DarkGray.paint("bye!"));
        Ok(())
    }

    async fn handle_input(&mut self, line: &str) -> Result<bool> {
        if line.starts_with('.') {
            return self.handle_command(line).await;
        }

        self.send_chat(line).await;
        Ok(false)
    }

    async fn handle_command(&mut self, line: &str) -> Result<bool> {
        let (cmd, args) = match line.split_once(' ') {
            Some((c, a)) => (c, Some(a.trim())),
            None => (line, None),
        };

        match cmd.to_lowercase().as_str() {
            ".exit" | ".quit" | ".q" => Ok(true),
            ".help" | ".?" => {
                self.print_help();
                Ok(false)
            }
            ".news" => {
                self.load_news().await;
                Ok(false)
            }
            ".clear" => {
                self.chat.clear_history();
                println!("{}", Color::DarkGray.paint("Chat history cleared."));
                Ok(false)
            }
            ".profile" => {
                self.handle_profile(args);
                Ok(false)
            }
            _ => {
                println!(
                    "{}",
                    Color::Red.paint(format!(
                        "Unknown command: {cmd}\nType .help to see available commands."
                    ))
                );
                Ok(false)
            }
        }
    }

    /// Gate shared by both network actions: reports missing keys and how to
    /// obtain them before any call goes out.
    fn keys_ok(&self) -> bool {
        if config::validate_api_keys().is_err() {
            let missing = config::missing_api_keys();
            println!("{}", Color::Red.paint(config::key_report(&missing)));
            return false;
        }
        true
    }

    async fn send_chat(&mut self, message: &str) {
        if !self.keys_ok() {
            return;
        }

        let reply = self.chat.send_message(message).await;
        println!("{} {}\n", Color::Cyan.bold().paint("assistant:"), reply);
    }

    async fn load_news(&mut self) {
        if !self.keys_ok() {
            return;
        }

        let api_key = env::var(config::NEWS_API_KEY).unwrap_or_default();
        println!("{}", Color::DarkGray.paint("Loading news..."));

        let fetcher = NewsFetcher::new(&api_key, &self.config);
        let items = fetcher
            .fetch_and_summarize(&self.profile.profile, &mut self.news_session)
            .await;

        println!();
        for item in &items {
            println!("{}", Color::Cyan.bold().paint(item.title.as_str()));
            if !item.published_at.is_empty() {
                println!("  {}", Color::DarkGray.paint(format_timestamp(&item.published_at)));
            }
            println!("  {}", item.summary);
            if !item.url.is_empty() {
                println!("  {}", Color::Blue.underline().paint(item.url.as_str()));
            }
            println!();
        }
    }

    fn handle_profile(&mut self, args: Option<&str>) {
        let Some(rest) = args else {
            self.print_profile();
            return;
        };

        let (field, value) = match rest.split_once(' ') {
            Some((f, v)) => (f, v.trim()),
            None => (rest, ""),
        };

        match field {
            "name" if !value.is_empty() => {
                self.profile.update(Some(value.to_string()), None, None);
                println!("{}", Color::Green.paint("Profile updated."));
            }
            "stack" if !value.is_empty() => {
                self.profile.update(None, Some(split_list(value)), None);
                println!("{}", Color::Green.paint("Profile updated."));
            }
            "interests" if !value.is_empty() => {
                self.profile.update(None, None, Some(split_list(value)));
                println!("{}", Color::Green.paint("Profile updated."));
            }
            _ => {
                println!("Usage: .profile [name <text> | stack <a,b,..> | interests <a,b,..>]");
            }
        }
    }

    fn print_profile(&self) {
        let profile = &self.profile.profile;
        println!();
        println!("{}", Color::White.bold().paint("Profile:"));
        println!(
            "  {} {}",
            Color::DarkGray.paint("name:"),
            if profile.name.is_empty() { "(unset)" } else { &profile.name }
        );
        println!("  {} {}", Color::DarkGray.paint("stack:"), profile.stack.join(", "));
        println!(
            "  {} {}",
            Color::DarkGray.paint("interests:"),
            profile.interests.join(", ")
        );
        println!();
    }

    fn print_banner(&self) {
        let name = if self.profile.profile.name.is_empty() {
            "there"
        } else {
            &self.profile.profile.name
        };

        println!();
        println!(
            "{} v{}",
            Color::Cyan.bold().paint("techdesk"),
            env!("CARGO_PKG_VERSION")
        );
        println!("Hello, {name}!");
        println!();
        println!(
            "{}",
            Color::DarkGray.paint("Type a message to chat, .news for headlines, .help for commands.")
        );
        println!();
    }

    fn print_help(&self) {
        println!();
        println!("{}", Color::White.bold().paint("Commands:"));
        println!();

        let commands = [
            (".news", "Fetch and summarize the latest technology news"),
            (".profile", "Show the profile; add name/stack/interests to update"),
            (".clear", "Clear the chat history"),
            (".help", "Show this help"),
            (".exit", "Quit (also .quit, .q, Ctrl+D)"),
        ];

        for (name, desc) in commands {
            println!("  {:<12} {}", Color::Yellow.paint(name), desc);
        }
        println!();
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Formats an RFC 3339 timestamp for display, falling back to the raw text
fn format_timestamp(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
