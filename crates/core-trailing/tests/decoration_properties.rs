//! Property-based tests for decoration presence and the active-count invariant.

use core_events::{DocumentId, HookSet};
use core_state::{OpenRequest, Workspace};
use core_trailing::{LOCAL_HOOKS, ToggleArg, TrailingNewlineDecorator};
use proptest::prelude::*;

fn content_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just('a'),
            Just('\n'),
            Just('é'),
            Just(' '),
            Just('\x0c'),
            Just('\u{b}'),
            Just('\u{85}'),
            Just('\u{2028}'),
        ],
        0..40,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

#[derive(Debug, Clone)]
enum Op {
    Enable(usize),
    Disable(usize),
    Toggle(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..4).prop_map(Op::Enable),
        (0usize..4).prop_map(Op::Disable),
        (0usize..4).prop_map(Op::Toggle),
    ]
}

// Page breaks and Unicode line separators stay inside a line.
#[test]
fn non_lf_separators_do_not_advance_the_line_number() {
    for content in ["page1\x0cpage2\n", "a\u{2028}b\n", "a\u{85}b\n", "a\u{b}b\n"] {
        let mut ws = Workspace::new();
        let doc = ws.open(OpenRequest::scratch("ff", content)).unwrap().document();
        let mut deco = TrailingNewlineDecorator::default();
        deco.enable(&mut ws, doc);
        let (_, d) = ws.decorations.for_document(doc).next().unwrap();
        assert_eq!(d.text(), "\u{23CE} 2", "content {content:?}");
    }
}

proptest! {
    // Decoration exists after recompute iff the content is non-empty and ends with '\n'.
    #[test]
    fn decoration_iff_trailing_newline(content in content_strategy()) {
        let mut ws = Workspace::new();
        let doc = ws.open(OpenRequest::scratch("p", content.clone())).unwrap().document();
        let mut deco = TrailingNewlineDecorator::default();
        deco.recompute(&mut ws, doc);
        let expected = !content.is_empty() && content.ends_with('\n');
        prop_assert_eq!(ws.decorations.count_for(doc), usize::from(expected));
        if expected {
            let (_, d) = ws.decorations.for_document(doc).next().unwrap();
            let next_line = content.matches('\n').count() + 1;
            prop_assert_eq!(d.text(), format!("\u{23CE} {next_line}"));
            prop_assert_eq!(d.anchor, content.chars().count());
        }
    }

    // After any sequence of enable/disable/toggle the count equals the number of
    // enabled documents, hooks are registered once per enabled document, and the
    // structural listener is attached iff anything is enabled.
    #[test]
    fn active_count_matches_enabled_documents(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let mut ws = Workspace::new();
        let docs: Vec<DocumentId> = (0..4)
            .map(|i| ws.open(OpenRequest::scratch(format!("d{i}"), "x\n")).unwrap().document())
            .collect();
        let mut deco = TrailingNewlineDecorator::default();
        for op in ops {
            match op {
                Op::Enable(i) => { deco.enable(&mut ws, docs[i]); }
                Op::Disable(i) => { deco.disable(&mut ws, docs[i]); }
                Op::Toggle(i) => { deco.toggle(&mut ws, docs[i], ToggleArg::Toggle); }
            }
            let enabled = docs.iter().filter(|d| deco.is_enabled(**d)).count();
            prop_assert_eq!(deco.registry().active_count(), enabled);
            prop_assert_eq!(deco.states().enabled_count(), enabled);
            prop_assert_eq!(ws.structural_listener_count(), usize::from(enabled > 0));
        }
        for d in &docs {
            let expected = usize::from(deco.is_enabled(*d));
            for hook in LOCAL_HOOKS.iter() {
                prop_assert_eq!(ws.hook_count(*d, hook), expected);
            }
            prop_assert_eq!(ws.decorations.count_for(*d), expected);
        }
    }

    // Enabling n times is indistinguishable from enabling once.
    #[test]
    fn repeated_enable_is_idempotent(times in 1usize..6) {
        let mut ws = Workspace::new();
        let doc = ws.open(OpenRequest::scratch("i", "a\n")).unwrap().document();
        let mut deco = TrailingNewlineDecorator::default();
        for _ in 0..times {
            deco.enable(&mut ws, doc);
        }
        prop_assert_eq!(deco.registry().active_count(), 1);
        prop_assert_eq!(ws.hook_count(doc, HookSet::CONTENT_CHANGED), 1);
        prop_assert_eq!(ws.structural_listener_count(), 1);
        prop_assert_eq!(ws.decorations.count_for(doc), 1);
    }
}
