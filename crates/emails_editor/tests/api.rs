use editor_test_support::Harness;
use email_core::validate;
use emails_editor::{EditorConfig, EditorError, EmailsEditor, PLACEHOLDER_ATTR};
use serde_json::json;
use std::cell::Cell;
use std::rc::Rc;
use surface::{DomSurface, Surface};

#[test]
fn set_emails_round_trips_values_and_verdicts() {
    let sequences: &[&[&str]] = &[
        &[],
        &["a@b.com"],
        &["a@b.com", "a@b.com", "nope"],
        &["x", "y@z", "first.last+tag@sub.example.org", "UPPER@CASE.IO"],
    ];
    let mut h = Harness::with_emails(&["seed@x.y"]);
    for tokens in sequences {
        h.editor_mut().set_emails(tokens.iter()).unwrap();
        let emails = h.editor().get_emails();
        let values: Vec<&str> = emails.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, *tokens);
        for record in &emails {
            assert_eq!(record.valid, validate(&record.value), "{}", record.value);
        }
    }
    assert_eq!(h.change_count(), sequences.len());
}

#[test]
fn construction_is_silent_and_first_add_notifies_once() {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let dom = DomSurface::new();
    let host = dom.body();
    let mut editor = EmailsEditor::builder(dom, host)
        .initial_emails(["a@b.com", "x"])
        .on_change(move |_| counter.set(counter.get() + 1))
        .build()
        .unwrap();
    assert_eq!(calls.get(), 0);

    editor.add_email("c@d.com").unwrap();
    assert_eq!(calls.get(), 1);
    assert_eq!(editor.get_emails().len(), 3);
}

#[test]
fn empty_add_changes_nothing() {
    let mut h = Harness::with_emails(&["a@b.com"]);
    h.editor_mut().add_email("").unwrap();
    assert_eq!(h.values(), vec!["a@b.com"]);
    assert_eq!(h.change_count(), 0);
}

#[test]
fn non_string_values_are_usage_errors() {
    let mut h = Harness::with_emails(&["a@b.com"]);
    let err = h.editor_mut().add_email_value(&json!(123)).unwrap_err();
    assert!(matches!(err, EditorError::InvalidEmailValue { .. }));
    let err = h.editor_mut().set_emails_value(&json!([123])).unwrap_err();
    assert!(matches!(err, EditorError::InvalidEmailList { index: Some(0), .. }));
    let err = h.editor_mut().set_emails_value(&json!({ "emails": [] })).unwrap_err();
    assert!(matches!(err, EditorError::InvalidEmailList { index: None, .. }));

    assert_eq!(h.values(), vec!["a@b.com"]);
    assert_eq!(h.change_count(), 0);
}

#[test]
fn add_tokenizes_each_input() {
    let mut h = Harness::with_emails(&[]);
    h.editor_mut().add_email("a@b.c, d@e.f").unwrap();
    h.editor_mut().add_emails(["g@h.i", "j@k.l m"]).unwrap();
    assert_eq!(h.values(), vec!["a@b.c", "d@e.f", "g@h.i", "j@k.l", "m"]);
    assert_eq!(h.change_count(), 2);
}

#[test]
fn set_discards_uncommitted_text() {
    let mut h = Harness::with_emails(&["a@b.com"]);
    h.focus();
    h.type_text("draft");
    h.editor_mut().set_emails(["z@z.z"]).unwrap();
    assert_eq!(h.values(), vec!["z@z.z"]);
    h.assert_snapshot(&["sep", "chip valid \"z@z.z\"", "sep"]);
    h.blur();
    assert_eq!(h.values(), vec!["z@z.z"]);
}

#[test]
fn valid_count_counts_syntactic_matches() {
    let mut h = Harness::with_emails(&["a@b.com", "nope", "c@d.org"]);
    assert_eq!(h.editor().valid_count(), 2);
    for n in 1..=3 {
        h.editor_mut().add_email(&format!("email-{n}@test.com")).unwrap();
    }
    assert_eq!(h.editor().valid_count(), 5);
}

#[test]
fn placeholder_tracks_emptiness() {
    let mut h = Harness::new(EditorConfig {
        placeholder: "Enter email addresses…".into(),
        add_more_placeholder: "add more people…".into(),
        ..EditorConfig::default()
    });
    let root = h.root();
    assert_eq!(
        h.dom().attribute(root, PLACEHOLDER_ATTR),
        Some("Enter email addresses…")
    );
    h.editor_mut().add_email("a@b.com").unwrap();
    assert_eq!(h.dom().attribute(root, PLACEHOLDER_ATTR), Some("add more people…"));
    h.editor_mut().reset_emails().unwrap();
    assert_eq!(
        h.dom().attribute(root, PLACEHOLDER_ATTR),
        Some("Enter email addresses…")
    );
}

#[test]
fn width_grows_with_free_text() {
    let mut h = Harness::new(EditorConfig {
        placeholder: "type".into(),
        ..EditorConfig::default()
    });
    let root = h.root();
    assert_eq!(h.dom().attribute(root, "style"), Some("min-width: 32px"));
    h.focus();
    h.type_text("abcdef");
    assert_eq!(h.dom().attribute(root, "style"), Some("min-width: 48px"));
}

#[test]
fn config_loads_from_toml_and_builds() {
    let config = EditorConfig::from_toml_str(
        r#"
className = "compact"
placeholder = "Enter email addresses…"
initialEmails = ["john@miro.com", "invalid.email"]
"#,
    )
    .unwrap();
    let h = Harness::new(config);
    assert_eq!(h.values(), vec!["john@miro.com", "invalid.email"]);
    assert!(h.dom().has_class(h.root(), "compact"));
}

#[test]
fn editor_hands_back_its_surface() {
    let dom = DomSurface::new();
    let host = dom.body();
    let editor = EmailsEditor::builder(dom, host)
        .initial_emails(["a@b.com"])
        .build()
        .unwrap();
    let root = editor.root();
    let dom = editor.into_surface();
    assert_eq!(dom.children(host), &[root]);
    assert!(dom.inner_html(root).contains("a@b.com"));
}

#[test]
fn building_under_a_dead_host_fails() {
    let mut dom = DomSurface::new();
    let host = dom.create_element("div");
    let body = dom.body();
    dom.append_child(body, host).unwrap();
    dom.remove(host).unwrap();
    let err = EmailsEditor::builder(dom, host).build().err().unwrap();
    assert!(matches!(err, EditorError::Surface(_)));
}
