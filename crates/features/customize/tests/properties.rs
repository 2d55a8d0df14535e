use folio_customize::{HtmlDocument, Region, Slot, apply, compute_plan};
use folio_domain::settings::SettingsDocument;
use proptest::prelude::*;

const SHELL: &str = "<!doctype html><html><head><title>t</title></head><body><div id=\"root\"></div></body></html>";

fn snippet() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("   ".to_owned()),
        "[a-z{}:;. ]{1,24}",
        (prop_oneof![Just("div"), Just("p"), Just("span")], "[a-z ]{0,12}")
            .prop_map(|(tag, text)| format!("<{tag}>{text}</{tag}>")),
        Just("<div>a</div>\n<p>b</p>text".to_owned()),
        Just("<br><img src=x>".to_owned()),
    ]
}

fn settings() -> impl Strategy<Value = SettingsDocument> {
    proptest::collection::vec(snippet(), Slot::ALL.len()).prop_map(|values| {
        Slot::ALL.into_iter().zip(values).map(|(slot, value)| (slot.settings_key().to_owned(), value.into())).collect()
    })
}

proptest! {
    #[test]
    fn applying_twice_equals_applying_once(settings in settings(), defaults in settings()) {
        let plan = compute_plan(&settings, &defaults);

        let mut once = HtmlDocument::parse(SHELL);
        apply(&mut once, &plan);

        let mut twice = once.clone();
        apply(&mut twice, &plan);

        prop_assert_eq!(once.render(), twice.render());
    }

    #[test]
    fn later_plan_fully_replaces_earlier(a in settings(), b in settings()) {
        let empty = SettingsDocument::new();
        let plan_b = compute_plan(&b, &empty);

        let mut page = HtmlDocument::parse(SHELL);
        apply(&mut page, &compute_plan(&a, &empty));
        apply(&mut page, &plan_b);

        let mut fresh = HtmlDocument::parse(SHELL);
        apply(&mut fresh, &plan_b);

        prop_assert_eq!(page.render(), fresh.render());
    }

    #[test]
    fn rendered_output_reparses_to_the_same_tagged_set(settings in settings()) {
        let mut page = HtmlDocument::parse(SHELL);
        apply(&mut page, &compute_plan(&settings, &SettingsDocument::new()));

        let reparsed = HtmlDocument::parse(&page.render());
        let before: Vec<_> = page.all_tagged().cloned().collect();
        let after: Vec<_> = reparsed.all_tagged().cloned().collect();
        prop_assert_eq!(before, after);

        let mut again = reparsed;
        apply(&mut again, &compute_plan(&settings, &SettingsDocument::new()));
        prop_assert_eq!(again.render(), page.render());
    }

    #[test]
    fn plan_has_no_blank_blocks(settings in settings(), defaults in settings()) {
        for block in &compute_plan(&settings, &defaults) {
            prop_assert!(!block.content.trim().is_empty());
        }
    }

    #[test]
    fn only_empty_settings_fall_back(settings in settings(), defaults in settings()) {
        let plan = compute_plan(&settings, &defaults);
        for slot in Slot::ALL {
            let key = slot.settings_key();
            let own = settings.get(key).and_then(|v| v.as_text()).filter(|t| !t.is_empty());
            let effective = own.or_else(|| defaults.get(key).and_then(|v| v.as_text()).filter(|t| !t.is_empty()));
            let expected = effective.filter(|t| !t.trim().is_empty());
            prop_assert_eq!(plan.get(slot).map(|b| b.content.as_str()), expected);
        }
    }
}

#[test]
fn regions_keep_markup_style_script_order() {
    let settings = SettingsDocument::new()
        .with("customFooterJs", "end()")
        .with("customFooterCss", "p{}")
        .with("customFooterHtml", "<p>bye</p>");

    let mut page = HtmlDocument::parse(SHELL);
    apply(&mut page, &compute_plan(&settings, &SettingsDocument::new()));

    let markers: Vec<_> = page.tagged(Region::Footer).iter().map(|n| n.slot().marker()).collect();
    assert_eq!(markers, ["footer-html", "footer-css", "footer-js"]);
}
