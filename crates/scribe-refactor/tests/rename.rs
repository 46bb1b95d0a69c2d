use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use scribe_core::{apply_text_edits, TextEdit};
use scribe_refactor::{
    find_text_occurrences, BatchOffsetRenamer, DocumentId, InMemoryWorkspace, Occurrence,
    OccurrenceOrder, RenameOptions, SkipReason, TextRange,
};

const PROPTEST_CASES: u32 = 256;

fn arb_char() -> impl Strategy<Value = char> {
    prop_oneof![
        10 => prop::sample::select(vec!['a', 'b', 'F', 'o', '.', '(', ')', ' ']),
        2 => Just('\n'),
        1 => Just('é'),
        1 => Just('中'),
    ]
}

fn arb_text(min: usize, max: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(arb_char(), min..=max).prop_map(|chars| chars.into_iter().collect())
}

/// Text plus non-overlapping, non-empty spans aligned to char boundaries.
fn arb_document(name: &'static str) -> impl Strategy<Value = (String, Vec<Occurrence>)> {
    (arb_text(0, 40), prop::collection::vec((0usize..3, 1usize..4), 0..8)).prop_map(
        move |(text, plan)| {
            let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
            boundaries.push(text.len());

            let mut occurrences = Vec::new();
            let mut cursor = 0usize;
            for (gap, width) in plan {
                let start = cursor + gap;
                let end = start + width;
                if end >= boundaries.len() {
                    break;
                }
                occurrences.push(Occurrence::new(
                    name,
                    boundaries[start],
                    boundaries[end] - boundaries[start],
                ));
                cursor = end;
            }
            (text, occurrences)
        },
    )
}

fn arb_case() -> impl Strategy<Value = (Vec<(String, Vec<Occurrence>)>, String, u64)> {
    (
        arb_document("a.cs"),
        arb_document("b.cs"),
        arb_text(1, 6),
        any::<u64>(),
    )
        .prop_map(|(a, b, new_name, seed)| (vec![a, b], new_name, seed))
}

fn shuffle_with_seed<T>(items: &mut [T], mut seed: u64) {
    for i in (1..items.len()).rev() {
        seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let j = (seed >> 33) as usize % (i + 1);
        items.swap(i, j);
    }
}

fn expected_texts(docs: &[(String, Vec<Occurrence>)], new_name: &str) -> BTreeMap<DocumentId, String> {
    let ids = ["a.cs", "b.cs"];
    docs.iter()
        .zip(ids)
        .map(|((text, occurrences), id)| {
            let edits: Vec<TextEdit> = occurrences
                .iter()
                .map(|occurrence| TextEdit::new(occurrence.range(), new_name))
                .collect();
            (DocumentId::new(id), apply_text_edits(text, &edits).unwrap())
        })
        .collect()
}

fn workspace(docs: &[(String, Vec<Occurrence>)]) -> InMemoryWorkspace {
    docs.iter()
        .zip(["a.cs", "b.cs"])
        .map(|((text, _), id)| (id, text.clone()))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(PROPTEST_CASES))]

    #[test]
    fn sorted_rename_matches_snapshot_edits_for_any_input_order((docs, new_name, seed) in arb_case()) {
        let mut occurrences: Vec<Occurrence> =
            docs.iter().flat_map(|(_, occurrences)| occurrences.clone()).collect();
        shuffle_with_seed(&mut occurrences, seed);

        let mut ws = workspace(&docs);
        let outcome = BatchOffsetRenamer::default()
            .rename_all(&occurrences, &new_name, &mut ws)
            .unwrap();

        prop_assert!(outcome.is_complete());
        prop_assert_eq!(outcome.replaced, occurrences.len());
        prop_assert_eq!(ws.into_texts(), expected_texts(&docs, &new_name));
    }

    #[test]
    fn input_order_is_exact_for_descending_offsets((docs, new_name, _seed) in arb_case()) {
        let mut occurrences: Vec<Occurrence> =
            docs.iter().flat_map(|(_, occurrences)| occurrences.clone()).collect();
        occurrences.sort_by(|a, b| b.offset.cmp(&a.offset));

        let mut ws = workspace(&docs);
        let renamer = BatchOffsetRenamer::new(RenameOptions { order: OccurrenceOrder::Input });
        renamer.rename_all(&occurrences, &new_name, &mut ws).unwrap();

        prop_assert_eq!(ws.into_texts(), expected_texts(&docs, &new_name));
    }
}

#[test]
fn overlapping_occurrences_are_skipped_not_applied() {
    let mut ws = InMemoryWorkspace::from_iter([("a.cs", "FooFoo bar")]);
    let occurrences = [
        Occurrence::new("a.cs", 0, 6),
        Occurrence::new("a.cs", 3, 3),
        Occurrence::new("a.cs", 0, 6),
    ];

    let outcome = BatchOffsetRenamer::default()
        .rename_all(&occurrences, "X", &mut ws)
        .unwrap();

    assert_eq!(ws.text(&"a.cs".into()), Some("X bar"));
    assert_eq!(outcome.replaced, 1);
    assert_eq!(outcome.skipped.len(), 2);
    for skipped in &outcome.skipped {
        assert_eq!(
            skipped.reason,
            SkipReason::Overlapping {
                with: TextRange::new(0, 6)
            }
        );
    }
}

#[test]
fn span_past_end_of_document_is_reported() {
    let mut ws = InMemoryWorkspace::from_iter([("a.cs", "Foo")]);

    let outcome = BatchOffsetRenamer::default()
        .rename_all(&[Occurrence::new("a.cs", 2, 5)], "Bar", &mut ws)
        .unwrap();

    assert_eq!(ws.text(&"a.cs".into()), Some("Foo"));
    assert_eq!(outcome.replaced, 0);
    assert!(matches!(outcome.skipped[0].reason, SkipReason::InvalidSpan(_)));
    // The document was opened, so callers still re-analyse it.
    assert!(outcome.touched.contains(&DocumentId::new("a.cs")));
}

#[test]
fn offsets_near_usize_max_are_invalid_spans() {
    let mut ws = InMemoryWorkspace::from_iter([("a.cs", "Foo Foo")]);
    let occurrences = [
        Occurrence::new("a.cs", usize::MAX, 1),
        Occurrence::new("a.cs", usize::MAX - 2, 1),
        Occurrence::new("a.cs", 4, 3),
    ];

    for order in [OccurrenceOrder::Sorted, OccurrenceOrder::Input] {
        let mut ws = ws.clone();
        let outcome = BatchOffsetRenamer::new(RenameOptions { order })
            .rename_all(&occurrences, "Bar", &mut ws)
            .unwrap();

        assert_eq!(ws.text(&"a.cs".into()), Some("Foo Bar"), "{order:?}");
        assert_eq!(outcome.replaced, 1);
        assert_eq!(outcome.skipped.len(), 2);
        for skipped in &outcome.skipped {
            assert!(
                matches!(skipped.reason, SkipReason::InvalidSpan(_)),
                "{order:?}: {:?}",
                skipped.reason
            );
        }
    }

    let outcome = BatchOffsetRenamer::default()
        .rename_all(&occurrences[..1], "Bar", &mut ws)
        .unwrap();
    assert_eq!(outcome.skipped[0].occurrence.range().end, usize::MAX);
}

#[test]
fn rename_found_references_across_documents() {
    let a = DocumentId::new("Shape.cs");
    let b = DocumentId::new("Circle.cs");
    let shape = "abstract class Shape {\n  public abstract double Area();\n}\n";
    let circle = "class Circle : Shape {\n  public override double Area() => r * r * Area0;\n}\n";

    let mut ws = InMemoryWorkspace::new();
    ws.insert(a.clone(), shape);
    ws.insert(b.clone(), circle);

    let mut occurrences = find_text_occurrences(&a, shape, "Area");
    occurrences.extend(find_text_occurrences(&b, circle, "Area"));
    assert_eq!(occurrences.len(), 2);

    let outcome = BatchOffsetRenamer::default()
        .rename_all(&occurrences, "ComputeArea", &mut ws)
        .unwrap();

    assert_eq!(outcome.touched.len(), 2);
    assert_eq!(
        ws.text(&a),
        Some("abstract class Shape {\n  public abstract double ComputeArea();\n}\n")
    );
    assert_eq!(
        ws.text(&b),
        Some("class Circle : Shape {\n  public override double ComputeArea() => r * r * Area0;\n}\n")
    );
}
