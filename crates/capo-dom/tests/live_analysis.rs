use capo_core::{AnalysisContext, AnalyzeOptions, ElementCategory, analyze, check_ordering};
use capo_dom::{DomAdapter, Document};

#[test]
fn test_reanalyze_after_mutation() {
    let adapter = DomAdapter;
    let ctx = AnalysisContext::new();
    let doc = Document::new();
    let stylesheet = doc
        .append_to_head("link", &[("rel", "stylesheet"), ("href", "a.css")])
        .unwrap();
    let charset = doc.append_to_head("meta", &[("charset", "utf-8")]).unwrap();

    let before = analyze(&doc.head(), &adapter, &ctx, AnalyzeOptions::default());
    let weights: Vec<u8> = before.weights.iter().map(|w| w.weight).collect();
    assert_eq!(weights, vec![4, 10]);
    let violations = check_ordering(&before.weights);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].element, charset);

    // Fix the order in place; the old handles stay usable
    doc.insert_before(&doc.head(), &charset, Some(&stylesheet)).unwrap();
    let after = analyze(&doc.head(), &adapter, &ctx, AnalyzeOptions::default());
    assert!(check_ordering(&after.weights).is_empty());
    assert_eq!(after.weights[0].element, charset);
    assert_eq!(after.weights[0].category, ElementCategory::Meta);
}

#[test]
fn test_attribute_edits_change_classification() {
    let adapter = DomAdapter;
    let ctx = AnalysisContext::new();
    let doc = Document::new();
    let script = doc.append_to_head("script", &[("src", "app.js")]).unwrap();

    let sync = analyze(&doc.head(), &adapter, &ctx, AnalyzeOptions::weights_only());
    assert_eq!(sync.weights[0].category, ElementCategory::SyncScript);

    doc.set_attribute(&script, "defer", "").unwrap();
    let deferred = analyze(&doc.head(), &adapter, &ctx, AnalyzeOptions::weights_only());
    assert_eq!(deferred.weights[0].category, ElementCategory::DeferScript);
    assert_eq!(deferred.weights[0].element, script);
}

#[test]
fn test_duplicate_viewport_is_flagged() {
    let adapter = DomAdapter;
    let doc = Document::new();
    let title = doc.append_to_head("title", &[]).unwrap();
    doc.set_text(&title, "Live").unwrap();
    let first = doc
        .append_to_head("meta", &[("name", "viewport"), ("content", "width=device-width")])
        .unwrap();
    let second = doc
        .append_to_head("meta", &[("name", "viewport"), ("content", "width=device-width")])
        .unwrap();

    let result = analyze(&doc.head(), &adapter, &AnalysisContext::new(), AnalyzeOptions::default());

    assert_eq!(result.validation_warnings.len(), 1);
    assert_eq!(result.validation_warnings[0].message, "Expected exactly 1 viewport meta, found 2");
    assert_eq!(result.validation_warnings[0].elements, vec![first.clone(), second.clone()]);
    let duplicate = result.custom_validation(&second).unwrap();
    assert!(duplicate.warnings[0].contains("already been declared"));
    assert!(result.custom_validation(&first).unwrap().warnings.is_empty());
}
