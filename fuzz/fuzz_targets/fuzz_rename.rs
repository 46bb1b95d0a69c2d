#![no_main]

use std::collections::BTreeMap;

use libfuzzer_sys::fuzz_target;
use scribe_core::{apply_text_edits, TextEdit};
use scribe_refactor::{
    find_text_occurrences, locate_references, BatchOffsetRenamer, DocumentId, InMemoryWorkspace,
    Occurrence, OccurrenceOrder, RenameOptions,
};

mod utils;

const NEW_NAMES: [&str; 4] = ["x", "Renamed", "ÿ", "a_much_longer_identifier"];

fuzz_target!(|data: &[u8]| {
    let Some((&control, rest)) = data.split_first() else {
        return;
    };
    let Some(text) = utils::truncate_utf8(rest) else {
        return;
    };

    let order = if control & 1 == 0 {
        OccurrenceOrder::Sorted
    } else {
        OccurrenceOrder::Input
    };
    let new_name = NEW_NAMES[usize::from(control >> 1) % NEW_NAMES.len()];
    let renamer = BatchOffsetRenamer::new(RenameOptions { order });
    let doc = DocumentId::new("Fuzz.cs");

    // Whole-word matches never overlap, so the result must agree with
    // applying the same replacements against the original text.
    if let Some(name) = text.split(|c: char| !c.is_alphanumeric() && c != '_').find(|w| !w.is_empty()) {
        let occurrences = find_text_occurrences(&doc, text, name);
        let mut workspace = InMemoryWorkspace::new();
        workspace.insert(doc.clone(), text);

        if let Ok(outcome) = renamer.rename_all(&occurrences, new_name, &mut workspace) {
            assert!(outcome.is_complete());
            let edits: Vec<TextEdit> = occurrences
                .iter()
                .map(|occurrence| TextEdit::new(occurrence.range(), new_name))
                .collect();
            let expected = apply_text_edits(text, &edits).expect("whole-word matches are disjoint");
            assert_eq!(workspace.text(&doc), Some(expected.as_str()));
        }
    }

    // Arbitrary spans: overlapping, out of range, mid-codepoint or near
    // `usize::MAX`. Must not panic.
    let spans: Vec<Occurrence> = rest
        .chunks_exact(3)
        .take(32)
        .map(|chunk| {
            let low = usize::from(u16::from_le_bytes([chunk[0], chunk[1]]));
            let offset = match chunk[2] >> 6 {
                0 | 1 => low % 512,
                2 => usize::MAX - low,
                _ => (isize::MAX as usize).wrapping_add(low),
            };
            Occurrence::new(doc.clone(), offset, usize::from(chunk[2] % 8) + 1)
        })
        .collect();
    let texts = BTreeMap::from([(doc.clone(), text.to_string())]);
    let _ = locate_references(&spans, &texts);

    let mut workspace = InMemoryWorkspace::new();
    workspace.insert(doc.clone(), text);
    let _ = renamer.rename_all(&spans, new_name, &mut workspace);
});
