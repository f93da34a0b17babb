//! Property tests for separator-based chunking.

use std::collections::HashSet;

use preprint_rag::ingestion::TextChunker;
use proptest::prelude::*;

/// Lines that are unique, non-blank and free of surrounding whitespace.
fn arb_lines() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[a-z]{0,20}", 1..40).prop_map(|words| {
        words
            .into_iter()
            .enumerate()
            .map(|(i, word)| format!("L{}x{}", i, word))
            .collect()
    })
}

/// Chunker whose size exceeds every generated line (at most 25 chars).
fn arb_chunker() -> impl Strategy<Value = TextChunker> {
    (30usize..200, 0usize..60).prop_map(|(size, overlap)| {
        TextChunker::new(size, overlap.min(size), "\n").unwrap()
    })
}

/// Upper bound on the length of a line from `arb_lines`.
const MAX_LINE_LEN: usize = 25;

/// Chunker whose overlap can always carry a whole line into the next segment.
fn arb_overlapping_chunker() -> impl Strategy<Value = TextChunker> {
    (MAX_LINE_LEN..60)
        .prop_flat_map(|overlap| (2 * MAX_LINE_LEN + overlap..250, Just(overlap)))
        .prop_map(|(size, overlap)| TextChunker::new(size, overlap, "\n").unwrap())
}

mod prop_chunking {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn every_line_lands_in_some_segment(lines in arb_lines(), chunker in arb_chunker()) {
            let text = lines.join("\n");
            let segments = chunker.chunk(&text);

            for line in &lines {
                prop_assert!(
                    segments.iter().any(|s| s.content.split('\n').any(|l| l == line)),
                    "line {} missing",
                    line
                );
            }
        }

        #[test]
        fn segments_respect_chunk_size(lines in arb_lines(), chunker in arb_chunker()) {
            let text = lines.join("\n");

            for segment in chunker.chunk(&text) {
                prop_assert!(segment.char_len() <= chunker.chunk_size());
                prop_assert!(!segment.content.trim().is_empty());
            }
        }

        #[test]
        fn ordinals_are_dense_and_ordered(lines in arb_lines(), chunker in arb_chunker()) {
            let text = lines.join("\n");
            let segments = chunker.chunk(&text);

            prop_assert!(!segments.is_empty());
            for (i, segment) in segments.iter().enumerate() {
                prop_assert_eq!(segment.ordinal, i);
            }
        }

        #[test]
        fn shared_text_between_neighbours_fits_in_overlap(
            lines in arb_lines(),
            chunker in arb_chunker(),
        ) {
            let text = lines.join("\n");
            let segments = chunker.chunk(&text);

            for pair in segments.windows(2) {
                let previous: HashSet<&str> = pair[0].content.split('\n').collect();
                let shared: Vec<&str> = pair[1]
                    .content
                    .split('\n')
                    .filter(|l| previous.contains(l))
                    .collect();

                if !shared.is_empty() {
                    let shared_len: usize = shared.iter().map(|l| l.chars().count()).sum::<usize>()
                        + shared.len() - 1;
                    prop_assert!(shared_len <= chunker.overlap());
                }
            }
        }

        #[test]
        fn neighbours_share_a_line_when_overlap_fits_one(
            lines in arb_lines(),
            chunker in arb_overlapping_chunker(),
        ) {
            let text = lines.join("\n");
            let segments = chunker.chunk(&text);

            for pair in segments.windows(2) {
                let first_line = pair[1].content.split('\n').next().unwrap_or("");
                prop_assert!(
                    pair[0].content.split('\n').any(|l| l == first_line),
                    "segment {} does not start inside segment {}",
                    pair[1].ordinal,
                    pair[0].ordinal
                );
            }
        }

        #[test]
        fn chunking_is_deterministic(lines in arb_lines(), chunker in arb_chunker()) {
            let text = lines.join("\n");
            prop_assert_eq!(chunker.chunk(&text), chunker.chunk(&text));
        }
    }
}

#[test]
fn zero_overlap_partitions_lines() {
    let lines: Vec<String> = (0..30).map(|i| format!("line number {:02}", i)).collect();
    let chunker = TextChunker::new(50, 0, "\n").unwrap();

    let rejoined: Vec<String> = chunker
        .chunk(&lines.join("\n"))
        .iter()
        .flat_map(|s| s.content.split('\n').map(str::to_string).collect::<Vec<_>>())
        .collect();

    assert_eq!(rejoined, lines);
}
