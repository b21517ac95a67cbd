// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use regplay_config::MatcherKind;
use regplay_core::{presets, Flags, RunInput};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "regplay",
    about = "Interactive regular expression playground for the terminal",
    version,
    long_about = None,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file (overrides auto-discovery)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the matching service
    #[arg(long, env = "REGPLAY_MATCHER_URL", global = true)]
    pub url: Option<String>,

    /// Matcher backend (http | mock)
    #[arg(long, value_enum, global = true)]
    pub provider: Option<MatcherKind>,

    /// Seed text, pattern and flags from a shared link
    #[arg(long, value_name = "URL", global = true)]
    pub from_url: Option<String>,

    /// Increase verbosity (-v = debug, -vv = trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Text, pattern and flags as given on the command line.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Text to search
    #[arg(long, short = 't', conflicts_with = "text_file")]
    pub text: Option<String>,

    /// Read the text to search from a file
    #[arg(long, value_name = "PATH")]
    pub text_file: Option<PathBuf>,

    /// Regular expression
    #[arg(long, short = 'p', conflicts_with = "preset")]
    pub pattern: Option<String>,

    /// Use a built-in pattern, by number or name (email, url, ipv4, date, iban)
    #[arg(long, value_name = "N|NAME")]
    pub preset: Option<String>,

    /// Case-insensitive matching
    #[arg(long, short = 'i')]
    pub ignore_case: bool,

    /// `^` and `$` match at line boundaries
    #[arg(long, short = 'm')]
    pub multiline: bool,

    /// `.` also matches newlines
    #[arg(long, short = 's')]
    pub dot_all: bool,
}

impl InputArgs {
    fn flags(&self) -> Option<Flags> {
        if self.ignore_case || self.multiline || self.dot_all {
            Some(Flags {
                ignore_case: self.ignore_case,
                multiline: self.multiline,
                dot_all: self.dot_all,
            })
        } else {
            None
        }
    }

    /// Overlay these arguments on `base`.  Flags given on the command line
    /// replace the base flags as a set.
    pub fn apply(&self, base: RunInput) -> anyhow::Result<RunInput> {
        let mut input = base;
        if let Some(path) = &self.text_file {
            input.text = regplay_core::textfile::import(path)?;
        } else if let Some(text) = &self.text {
            input.text = text.clone();
        }
        if let Some(key) = &self.preset {
            let preset = presets::find(key).ok_or_else(|| {
                anyhow::anyhow!("unknown preset {key:?}; available:\n{}", presets::listing())
            })?;
            input.pattern = preset.pattern.to_string();
        } else if let Some(pattern) = &self.pattern {
            input.pattern = pattern.clone();
        }
        if let Some(flags) = self.flags() {
            input.flags = flags;
        }
        Ok(input)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one pattern against a text and print the matches
    Run {
        #[command(flatten)]
        input: InputArgs,
        /// Print the result set as JSON instead of highlighted text
        #[arg(long)]
        json: bool,
    },
    /// Interactive session: edit text and pattern, results follow as you type.
    ///
    /// Commands: text, pattern, flag, run, next, prev, select, load, save,
    /// link, help, quit.
    Session {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Build a shareable link, or decode one with --decode
    Link {
        #[command(flatten)]
        input: InputArgs,
        /// Decode a link and print its text, pattern and flags
        #[arg(long, value_name = "URL", conflicts_with_all = ["text", "text_file", "pattern", "preset"])]
        decode: Option<String>,
    },
    /// Check that the matching service answers
    Ping,
    /// Generate shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Print the effective configuration and exit
    ShowConfig,
}

pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "regplay", &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_flags_replace_base_flags() {
        let cli = Cli::parse_from(["regplay", "run", "-t", "abc", "-p", "b", "-i"]);
        let Commands::Run { input, json } = cli.command else {
            panic!("expected run");
        };
        assert!(!json);
        let base = RunInput::default().with_flags(Flags {
            ignore_case: false,
            multiline: true,
            dot_all: false,
        });
        let got = input.apply(base).unwrap();
        assert_eq!(got.text, "abc");
        assert_eq!(got.pattern, "b");
        assert_eq!(got.flags, Flags { ignore_case: true, multiline: false, dot_all: false });
    }

    #[test]
    fn absent_arguments_keep_the_base() {
        let cli = Cli::parse_from(["regplay", "session"]);
        let Commands::Session { input } = cli.command else {
            panic!("expected session");
        };
        let base = RunInput::default().with_text("kept").with_pattern("k");
        assert_eq!(input.apply(base.clone()).unwrap(), base);
    }

    #[test]
    fn preset_replaces_the_pattern_only() {
        let cli = Cli::parse_from(["regplay", "run", "--preset", "ipv4"]);
        let Commands::Run { input, .. } = cli.command else {
            panic!("expected run");
        };
        let got = input.apply(presets::sample_input()).unwrap();
        assert_eq!(got.pattern, presets::find("ipv4").unwrap().pattern);
        assert_eq!(got.text, presets::SAMPLE_TEXT);
        assert!(got.flags.ignore_case);
    }

    #[test]
    fn unknown_preset_lists_the_choices() {
        let cli = Cli::parse_from(["regplay", "run", "--preset", "phone"]);
        let Commands::Run { input, .. } = cli.command else {
            panic!("expected run");
        };
        let err = input.apply(RunInput::default()).unwrap_err().to_string();
        assert!(err.contains("phone"));
        assert!(err.contains("iban"));
    }

    #[test]
    fn preset_and_pattern_are_exclusive() {
        assert!(Cli::try_parse_from(["regplay", "run", "-p", "a", "--preset", "1"]).is_err());
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::parse_from(["regplay", "ping", "--provider", "mock", "-vv"]);
        assert_eq!(cli.provider, Some(MatcherKind::Mock));
        assert_eq!(cli.verbose, 2);
    }
}
