use crate::document::{TaggedNode, UntrustedMarkupSink};
use crate::fragment;
use crate::plan::InjectionPlan;
use crate::slot::Slot;
use tracing::debug;

/// Replaces every previously injected node in `sink` with the nodes of `plan`.
///
/// All nine slots are cleared first, whether or not the plan uses them, so a later plan fully
/// supersedes an earlier one and applying the same plan twice leaves the same document.
pub fn apply<S: UntrustedMarkupSink + ?Sized>(sink: &mut S, plan: &InjectionPlan) {
    let removed: usize = Slot::ALL.into_iter().map(|slot| sink.remove_tagged(slot)).sum();

    let mut inserted = 0usize;
    for block in plan {
        for html in fragment::render_block(block.slot(), &block.content) {
            sink.insert_tagged(TaggedNode::new(block.slot(), html));
            inserted += 1;
        }
    }

    debug!(removed, inserted, "Customization applied");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::compute_plan;
    use folio_domain::settings::SettingsDocument;

    /// Records calls instead of editing a document.
    #[derive(Debug, Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl UntrustedMarkupSink for Recorder {
        fn remove_tagged(&mut self, slot: Slot) -> usize {
            self.calls.push(format!("remove {}", slot.marker()));
            0
        }

        fn insert_tagged(&mut self, node: TaggedNode) {
            self.calls.push(format!("insert {}", node.html()));
        }
    }

    #[test]
    fn test_removal_precedes_insertion() {
        let settings = SettingsDocument::new()
            .with("customFooterJs", "done()")
            .with("customBodyHtml", "<a>1</a><b>2</b>");
        let mut sink = Recorder::default();

        apply(&mut sink, &compute_plan(&settings, &SettingsDocument::new()));

        assert!(sink.calls[..9].iter().all(|call| call.starts_with("remove ")));
        assert_eq!(
            &sink.calls[9..],
            [
                "insert <a data-custom-slot=\"body-html\">1</a>",
                "insert <b data-custom-slot=\"body-html\">2</b>",
                "insert <script data-custom-slot=\"footer-js\">done()</script>",
            ]
        );
    }

    #[test]
    fn test_empty_plan_only_clears() {
        let mut sink = Recorder::default();
        apply(&mut sink, &InjectionPlan::default());
        assert_eq!(sink.calls.len(), 9);
    }
}
