// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arrowboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use arrowboard::format::{decode_markup, encode_markup, Codec};
use arrowboard::model::{Diagram, EdgePatch, LabelPosition};
use arrowboard::session::{
    Clipboard, ClipboardError, Controller, Location, ManualClock, MemoryLocation, Notice,
    PermalinkCopy, SessionConfig, Tool,
};

#[derive(Debug, Default)]
struct LastCopy(Option<String>);

impl Clipboard for LastCopy {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.0 = Some(text.to_owned());
        Ok(())
    }
}

const SQUARE: &str = "diagram
a @ 0,0 [A]
b @ 1,0 [B]
c @ 0,1 [C]
d @ 1,1 [D]
a -->|f| b
b -->|g| d
a -->|h| c
c -->|k| d {swap}
";

fn open(location: &MemoryLocation, clock: &ManualClock) -> Controller<Codec, ManualClock> {
    Controller::start(location.fragment(), SessionConfig::default(), Codec, clock.clone())
}

#[test]
fn edited_diagram_survives_a_permalink_round_trip() {
    let clock = ManualClock::new();
    let mut location = MemoryLocation::new("https://example.test/");
    let mut editor = open(&location, &clock);
    assert!(editor.diagram().is_empty());

    editor.apply_document_change(decode_markup(SQUARE).expect("square markup"));
    clock.advance(Duration::from_secs(1));
    editor.select_edge(1);
    editor
        .update_selected_edge(&EdgePatch::label_position(LabelPosition::Inside))
        .expect("edge selected");

    let mut clipboard = LastCopy::default();
    let PermalinkCopy::Copied { url } = editor.copy_permalink(&mut location, &mut clipboard)
    else {
        panic!("clipboard accepts the link");
    };
    assert_eq!(clipboard.0.as_deref(), Some(url.as_str()));
    assert_eq!(location.url(), url);

    let reopened = open(&MemoryLocation::parse(&url), &clock);
    assert_eq!(reopened.diagram(), editor.diagram());
    assert!(reopened.notice().is_none());
    assert_eq!(reopened.tool(), Tool::Pan);
    assert_eq!(reopened.selected_edge(), None);
    assert!(!reopened.can_undo());
}

#[test]
fn markup_round_trip_is_canonical() {
    let diagram = decode_markup(SQUARE).expect("square markup");
    assert_eq!(encode_markup(&diagram), SQUARE);
}

#[test]
fn corrupted_permalink_opens_empty_with_notice() {
    let clock = ManualClock::new();
    let location = MemoryLocation::parse("https://example.test/#%%not-a-diagram%%");
    let mut editor = open(&location, &clock);

    assert_eq!(**editor.diagram(), Diagram::default());
    assert!(matches!(editor.notice(), Some(Notice::InvalidLink(_))));
    assert!(!editor.needs_leave_confirmation());

    editor.acknowledge_notice();
    assert!(editor.notice().is_none());
}
