// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Line-oriented interactive session.
//!
//! Each stdin line is one command.  Edits go to the engine, which debounces
//! them; every published snapshot is redrawn.

use std::path::PathBuf;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use regplay_config::Config;
use regplay_core::presets::{self, Preset};
use regplay_core::{permalink, textfile, Engine, EngineEvent, RunInput};

use crate::render;

const HELP: &str = "\
commands:
  text <TEXT>       replace the text (\\n for newline, \\t for tab)
  pattern <REGEX>   replace the pattern
  preset [N|NAME]   use a built-in pattern; without argument, list them
  flag <i|m|s>      toggle ignore-case, multiline or dot-all
  run               run now without waiting
  next | prev       move to the next or previous match
  select <N>        jump to match N
  load <PATH>       replace the text with a file's contents
  save [PATH]       write the text to a file (default input.txt)
  link              print the shareable link of the last settled input
  help              show this list
  quit              leave";

#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionCommand {
    Text(String),
    Pattern(String),
    Preset(&'static Preset),
    Presets,
    Flag(char),
    Run,
    Next,
    Prev,
    Select(usize),
    Load(PathBuf),
    Save(Option<PathBuf>),
    Link,
    Help,
    Quit,
}

/// Resolve `\n`, `\t` and `\\`; any other escape is kept as written.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn parse(line: &str) -> Result<SessionCommand, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (word, rest) = match line.trim_start().split_once(' ') {
        Some((w, r)) => (w, r),
        None => (line.trim(), ""),
    };
    let cmd = match word {
        "text" => SessionCommand::Text(unescape(rest)),
        "pattern" => SessionCommand::Pattern(rest.to_string()),
        "preset" if rest.trim().is_empty() => SessionCommand::Presets,
        "preset" => match presets::find(rest) {
            Some(p) => SessionCommand::Preset(p),
            None => return Err(format!("no preset {:?}; type preset to list them", rest.trim())),
        },
        "flag" => match rest.trim() {
            f @ ("i" | "m" | "s") => SessionCommand::Flag(f.chars().next().unwrap_or('i')),
            other => return Err(format!("unknown flag {other:?}; use i, m or s")),
        },
        "run" => SessionCommand::Run,
        "next" => SessionCommand::Next,
        "prev" => SessionCommand::Prev,
        "select" => match rest.trim().parse::<usize>() {
            Ok(n) if n > 0 => SessionCommand::Select(n - 1),
            _ => return Err("select takes a match number starting at 1".to_string()),
        },
        "load" if !rest.trim().is_empty() => SessionCommand::Load(PathBuf::from(rest.trim())),
        "load" => return Err("load needs a path".to_string()),
        "save" => match rest.trim() {
            "" => SessionCommand::Save(None),
            p => SessionCommand::Save(Some(PathBuf::from(p))),
        },
        "link" => SessionCommand::Link,
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" => SessionCommand::Quit,
        "" => return Err(String::new()),
        other => return Err(format!("unknown command {other:?}; try help")),
    };
    Ok(cmd)
}

pub async fn run(config: &Config, initial: RunInput, color: bool) -> anyhow::Result<()> {
    let share = crate::share_base(config)?;
    let matcher = regplay_matcher::from_config(&config.matcher)?;
    info!(matcher = matcher.name(), url = %config.matcher.base_url, "session started");
    let engine = Engine::new(matcher, config.engine.clone(), config.matcher.max_matches);
    let (engine, mut events) = engine.spawn(initial.clone());
    let mut view = engine.subscribe();

    let mut link = permalink::encode(&share, &initial);
    let mut draft = initial;
    if !draft.pattern.is_empty() {
        engine.run_now()?;
    }
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                let cmd = match parse(&line) {
                    Ok(cmd) => cmd,
                    Err(msg) => {
                        if !msg.is_empty() {
                            eprintln!("{msg}");
                        }
                        continue;
                    }
                };
                match cmd {
                    SessionCommand::Text(text) => {
                        draft.text = text;
                        engine.edit(draft.clone())?;
                    }
                    SessionCommand::Pattern(pattern) => {
                        draft.pattern = pattern;
                        engine.edit(draft.clone())?;
                    }
                    SessionCommand::Preset(preset) => {
                        println!("{}: {}", preset.label, preset.pattern);
                        draft.pattern = preset.pattern.to_string();
                        engine.edit(draft.clone())?;
                    }
                    SessionCommand::Presets => print!("{}", presets::listing()),
                    SessionCommand::Flag(f) => {
                        match f {
                            'i' => draft.flags.ignore_case = !draft.flags.ignore_case,
                            'm' => draft.flags.multiline = !draft.flags.multiline,
                            _ => draft.flags.dot_all = !draft.flags.dot_all,
                        }
                        engine.edit(draft.clone())?;
                    }
                    SessionCommand::Run => engine.run_now()?,
                    SessionCommand::Next => engine.next()?,
                    SessionCommand::Prev => engine.previous()?,
                    SessionCommand::Select(i) => engine.select(i)?,
                    SessionCommand::Load(path) => match textfile::import(&path) {
                        Ok(text) => {
                            draft.text = text;
                            engine.edit(draft.clone())?;
                        }
                        Err(e) => eprintln!("{e:#}"),
                    },
                    SessionCommand::Save(path) => {
                        let path = path.unwrap_or_else(|| PathBuf::from(textfile::DEFAULT_EXPORT_NAME));
                        match textfile::export(&path, &draft.text) {
                            Ok(()) => println!("saved {}", path.display()),
                            Err(e) => eprintln!("{e:#}"),
                        }
                    }
                    SessionCommand::Link => println!("{link}"),
                    SessionCommand::Help => println!("{HELP}"),
                    SessionCommand::Quit => break,
                }
            }
            changed = view.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = view.borrow_and_update().clone();
                print!("{}", render::view(&state, color));
            }
            Some(ev) = events.recv() => match ev {
                EngineEvent::Settled(input) => {
                    link = permalink::encode(&share, &input);
                    debug!(%link, "view state updated");
                }
                EngineEvent::Reveal { match_index, start, end } => {
                    println!("-> match {} at {start}..{end}", match_index + 1);
                }
                _ => {}
            },
        }
    }

    engine.shutdown().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_resolves_escapes_pattern_does_not() {
        assert_eq!(parse(r"text a\nb\\c").unwrap(), SessionCommand::Text("a\nb\\c".into()));
        assert_eq!(parse(r"pattern \d+\n").unwrap(), SessionCommand::Pattern(r"\d+\n".into()));
    }

    #[test]
    fn unknown_escapes_stay_literal() {
        assert_eq!(unescape(r"\d \"), r"\d \");
    }

    #[test]
    fn text_keeps_inner_spaces() {
        assert_eq!(parse("text  two  spaces ").unwrap(), SessionCommand::Text(" two  spaces ".into()));
    }

    #[test]
    fn select_is_one_based() {
        assert_eq!(parse("select 3").unwrap(), SessionCommand::Select(2));
        assert!(parse("select 0").is_err());
        assert!(parse("select x").is_err());
    }

    #[test]
    fn flag_accepts_only_known_letters() {
        assert_eq!(parse("flag m").unwrap(), SessionCommand::Flag('m'));
        assert!(parse("flag x").is_err());
    }

    #[test]
    fn save_path_is_optional() {
        assert_eq!(parse("save").unwrap(), SessionCommand::Save(None));
        assert_eq!(
            parse("save out/a.txt").unwrap(),
            SessionCommand::Save(Some(PathBuf::from("out/a.txt")))
        );
        assert!(parse("load").is_err());
    }

    #[test]
    fn preset_by_number_or_name() {
        let email = presets::find("email").unwrap();
        assert_eq!(parse("preset 1").unwrap(), SessionCommand::Preset(email));
        assert_eq!(parse("preset Email").unwrap(), SessionCommand::Preset(email));
        assert_eq!(parse("preset").unwrap(), SessionCommand::Presets);
        assert!(parse("preset 9").unwrap_err().contains("9"));
    }

    #[test]
    fn blank_and_unknown_lines() {
        assert_eq!(parse("   "), Err(String::new()));
        assert!(parse("frobnicate").unwrap_err().contains("frobnicate"));
        assert_eq!(parse("quit").unwrap(), SessionCommand::Quit);
    }
}
