// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arrowboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Arrowboard CLI entrypoint.
//!
//! Opens the interactive editor on the diagram carried by a permalink (or a bare fragment).
//! The last copied permalink is printed when the editor exits.

use std::error::Error;
use std::time::Duration;

use arrowboard::format::{Codec, Gateway};
use arrowboard::session::{Controller, Location, MemoryLocation, SessionConfig, SystemClock};
use arrowboard::tui::HostClipboard;

const DEFAULT_BASE_URL: &str = "https://arrowboard.invalid/";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<url-or-fragment>] [--base-url <url>] [--coalesce-ms <ms>] [--confirm-ms <ms>] [--no-clipboard]\n  {program} --demo [--base-url <url>] [--no-clipboard]\n  {program} [<url-or-fragment> | --demo] --print-markup\n\nA full URL is split at `#`; anything else is taken as the fragment itself.\n--base-url sets the address permalinks are built on (default {DEFAULT_BASE_URL}) and cannot\nbe combined with a full URL.\n--coalesce-ms groups edits closer together than this into one undo step (default 500).\n--confirm-ms sets how long \"Link copied\" stays up (default 1000).\n--no-clipboard always shows the permalink instead of copying it via OSC 52.\n--print-markup prints the diagram as text and exits."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    target: Option<String>,
    base_url: Option<String>,
    coalesce_ms: Option<u64>,
    confirm_ms: Option<u64>,
    demo: bool,
    print_markup: bool,
    no_clipboard: bool,
}

fn set_once<T>(slot: &mut Option<T>, value: T) -> Result<(), ()> {
    if slot.is_some() {
        return Err(());
    }
    *slot = Some(value);
    Ok(())
}

fn set_flag(flag: &mut bool) -> Result<(), ()> {
    if *flag {
        return Err(());
    }
    *flag = true;
    Ok(())
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--base-url" => set_once(&mut options.base_url, args.next().ok_or(())?)?,
            "--coalesce-ms" => {
                let raw = args.next().ok_or(())?;
                set_once(&mut options.coalesce_ms, raw.parse().map_err(|_| ())?)?;
            }
            "--confirm-ms" => {
                let raw = args.next().ok_or(())?;
                set_once(&mut options.confirm_ms, raw.parse().map_err(|_| ())?)?;
            }
            "--demo" => set_flag(&mut options.demo)?,
            "--print-markup" => set_flag(&mut options.print_markup)?,
            "--no-clipboard" => set_flag(&mut options.no_clipboard)?,
            _ if arg.starts_with('-') => return Err(()),
            _ => set_once(&mut options.target, arg)?,
        }
    }

    if options.demo && options.target.is_some() {
        return Err(());
    }

    let target_is_url = options.target.as_deref().is_some_and(|target| target.contains("://"));
    if target_is_url && options.base_url.is_some() {
        return Err(());
    }

    Ok(options)
}

fn session_config(options: &CliOptions) -> SessionConfig {
    let mut config = SessionConfig::default();
    if let Some(ms) = options.coalesce_ms {
        config.coalesce_window = Duration::from_millis(ms);
    }
    if let Some(ms) = options.confirm_ms {
        config.link_confirm_duration = Duration::from_millis(ms);
    }
    config
}

fn initial_location(options: &CliOptions) -> MemoryLocation {
    match options.target.as_deref() {
        Some(target) if target.contains("://") => MemoryLocation::parse(target),
        target => {
            let mut location =
                MemoryLocation::new(options.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL));
            let fragment = target.map(|target| target.trim().trim_start_matches('#'));
            if let Some(fragment) = fragment.filter(|fragment| !fragment.is_empty()) {
                location.replace_fragment(fragment);
            }
            location
        }
    }
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "arrowboard".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let config = session_config(&options);
        let location = initial_location(&options);

        if options.print_markup {
            let diagram = if options.demo {
                arrowboard::tui::demo_diagram()
            } else {
                match location.fragment() {
                    Some(fragment) => Codec.decode_compact(fragment)?,
                    None => Default::default(),
                }
            };
            print!("{}", Codec.encode_markup(&diagram));
            return Ok(());
        }

        let controller = if options.demo {
            Controller::new(arrowboard::tui::demo_diagram(), config, Codec, SystemClock)
        } else {
            Controller::start_default(location.fragment(), config)
        };
        let clipboard =
            if options.no_clipboard { HostClipboard::Disabled } else { HostClipboard::Osc52 };

        let location = arrowboard::tui::run(controller, location, clipboard)?;
        if location.fragment().is_some() {
            println!("{}", location.url());
        }

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("arrowboard: {err}");
        std::process::exit(1);
    }
}
