//! Init, Clear, Add and Walk helpers

use autowrap_core::{GeneratorConfig, SharedDocument, Wrapper, WrapperError, WrapperGenerator};
use autowrap_dom::NodeId;
use autowrap_schema::Value;
use autowrap_session::SessionError;
use autowrap_test_utils::fixtures::{
    ArrayElementWithAddMethod, DictionaryElementWithAddMethod,
    DictionaryElementWithAddMethodAndInherited, ExplicitHelpers, ListElementWithAddMethod,
    SingleElementWithClearMethod, SingleElementWithInitMethod, SingleProperty,
    WithElementContainerAsDictionaryOfLists, WithElementContainerAsList,
};
use autowrap_test_utils::{append_keyed, create_document, init_tracing};
use pretty_assertions::assert_eq;

fn empty(root: &str) -> (SharedDocument, NodeId) {
    let (doc, node) = create_document(root);
    (SharedDocument::from_document(doc), node)
}

fn with_keyed(root: &str, item: &str, keys: &[&str]) -> (SharedDocument, NodeId) {
    let (doc, node) = create_document(root);
    append_keyed(&doc, node, item, keys);
    (SharedDocument::from_document(doc), node)
}

fn key_of(item: &Wrapper) -> String {
    item.get_as::<String>("Key").unwrap().unwrap_or_default()
}

// Init

#[test]
fn init_creates_child_with_key() {
    init_tracing();
    let (doc, root) = empty("Root");
    let parent = WrapperGenerator::new()
        .wrap::<SingleElementWithInitMethod>(&doc, root)
        .unwrap();

    let created = parent.invoke("InitSingle", &[Value::from("a")]).unwrap().unwrap();
    assert_eq!(key_of(&created), "a");
    assert_eq!(doc.to_xml(), r#"<Root><Single Key="a"/></Root>"#);

    let child = parent.child("Single").unwrap().unwrap();
    assert!(child.same_node(&created));
}

#[test]
fn init_reuses_existing_element() {
    let (doc, root) = with_keyed("Root", "Single", &["a"]);
    let parent = WrapperGenerator::new()
        .wrap::<SingleElementWithInitMethod>(&doc, root)
        .unwrap();
    let before = parent.child("Single").unwrap().unwrap();

    let after = parent.invoke("InitSingle", &[Value::from("b")]).unwrap().unwrap();
    assert!(after.same_node(&before));
    assert_eq!(key_of(&before), "b");
    assert_eq!(doc.to_xml(), r#"<Root><Single Key="b"/></Root>"#);
}

#[test]
fn init_on_attribute_is_rejected() {
    let (doc, root) = empty("Single");
    let single = WrapperGenerator::new().wrap::<SingleProperty>(&doc, root).unwrap();

    assert!(matches!(
        single.init("Key", &[]).unwrap_err(),
        WrapperError::WrongBinding { .. }
    ));
}

// Clear

#[test]
fn clear_removes_child() {
    let (doc, root) = with_keyed("Root", "Single", &["a"]);
    let parent = WrapperGenerator::new()
        .wrap::<SingleElementWithClearMethod>(&doc, root)
        .unwrap();
    assert!(parent.child("Single").unwrap().is_some());

    assert!(parent.invoke("ClearSingle", &[]).unwrap().is_none());
    assert!(parent.child("Single").unwrap().is_none());
    assert_eq!(doc.to_xml(), "<Root/>");

    // Nothing left to remove
    parent.invoke("ClearSingle", &[]).unwrap();
}

#[test]
fn strict_clear_reports_missing_element() {
    let (doc, root) = empty("Root");
    let generator = WrapperGenerator::with_config(GeneratorConfig::new().with_strict_clear(true));
    let parent = generator.wrap::<SingleElementWithClearMethod>(&doc, root).unwrap();

    let err = parent.invoke("ClearSingle", &[]).unwrap_err();
    assert!(matches!(err, WrapperError::ElementNotFound { ref name } if name == "Single"));
}

#[test]
fn clear_empties_list_view() {
    let (doc, root) = with_keyed("Root", "Single", &["a", "b"]);
    let parent = WrapperGenerator::new()
        .wrap::<ListElementWithAddMethod>(&doc, root)
        .unwrap();
    let view = parent.list("Single").unwrap();
    assert_eq!(view.read().len(), 2);

    parent.invoke("ClearSingle", &[]).unwrap();
    assert!(view.read().is_empty());
    assert_eq!(doc.to_xml(), "<Root/>");
}

#[test]
fn container_init_and_clear() {
    let (doc, root) = empty("Single");
    let parent = WrapperGenerator::new()
        .wrap::<WithElementContainerAsList>(&doc, root)
        .unwrap();

    parent.invoke("InitChildren", &[]).unwrap();
    assert_eq!(doc.to_xml(), "<Single><Children/></Single>");

    let view = parent.list("Child").unwrap();
    parent.add("Child", &[("Key", Value::from("a"))]).unwrap();
    assert_eq!(view.read().len(), 1);
    assert_eq!(
        doc.to_xml(),
        r#"<Single><Children><Child Key="a"/></Children></Single>"#
    );

    parent.invoke("ClearChild", &[]).unwrap();
    assert!(view.read().is_empty());
    assert_eq!(doc.to_xml(), "<Single/>");
}

// Add

#[test]
fn add_to_array_needs_refetch() {
    let (doc, root) = empty("Root");
    let parent = WrapperGenerator::new()
        .wrap::<ArrayElementWithAddMethod>(&doc, root)
        .unwrap();
    let before = parent.array("Single").unwrap();
    assert_eq!(before.len(), 0);

    let added = parent.invoke("AddSingle", &[Value::from("a")]).unwrap().unwrap();
    assert_eq!(key_of(&added), "a");
    assert_eq!(before.len(), 0);

    let after = parent.array("Single").unwrap();
    assert_eq!(after.len(), 1);
    assert_eq!(key_of(&after[0]), "a");
    assert_eq!(doc.to_xml(), r#"<Root><Single Key="a"/></Root>"#);
}

#[test]
fn add_to_list_updates_view() {
    let (doc, root) = empty("Root");
    let parent = WrapperGenerator::new()
        .wrap::<ListElementWithAddMethod>(&doc, root)
        .unwrap();
    let view = parent.list("Single").unwrap();

    parent.invoke("AddSingle", &[Value::from("a")]).unwrap();
    parent.invoke("AddSingle", &[Value::from("b")]).unwrap();

    let keys: Vec<String> = view.read().iter().map(key_of).collect();
    assert_eq!(keys, vec!["a", "b"]);
}

#[test]
fn add_to_dictionary_with_value() {
    let (doc, root) = empty("Root");
    let parent = WrapperGenerator::new()
        .wrap::<DictionaryElementWithAddMethod>(&doc, root)
        .unwrap();
    let view = parent.dict("Double").unwrap();

    parent
        .invoke("AddDouble", &[Value::from("a"), Value::from(0.8)])
        .unwrap();

    let entry = view.read()["a"].clone();
    assert_eq!(entry.get_as::<f64>("Value").unwrap(), Some(0.8));
    assert_eq!(doc.to_xml(), r#"<Root><Double Key="a" Value="0.8"/></Root>"#);
}

#[test]
fn add_coerces_integer_argument() {
    let (doc, root) = empty("Root");
    let parent = WrapperGenerator::new()
        .wrap::<DictionaryElementWithAddMethod>(&doc, root)
        .unwrap();

    let added = parent
        .invoke("AddDouble", &[Value::from("a"), Value::from(2_i64)])
        .unwrap()
        .unwrap();
    assert_eq!(added.get("Value").unwrap(), Some(Value::Float(2.0)));
}

#[test]
fn add_with_inherited_entry_type() {
    let (doc, root) = empty("Root");
    let parent = WrapperGenerator::new()
        .wrap::<DictionaryElementWithAddMethodAndInherited>(&doc, root)
        .unwrap();

    parent
        .invoke("AddDouble", &[Value::from("a"), Value::from(0.5)])
        .unwrap();

    let dict = parent.dict("Double").unwrap();
    let entry = dict.read()["a"].clone();
    assert_eq!(entry.get_as::<f64>("Value").unwrap(), Some(0.5));
}

#[test]
fn add_to_grouped_dictionary() {
    let (doc, root) = empty("Single");
    let parent = WrapperGenerator::new()
        .wrap::<WithElementContainerAsDictionaryOfLists>(&doc, root)
        .unwrap();
    let groups = parent.dict_of_lists("Child").unwrap();

    for key in ["a", "a", "b"] {
        parent.invoke("AddChild", &[Value::from(key)]).unwrap();
    }

    let groups = groups.read();
    assert_eq!(groups["a"].len(), 2);
    assert_eq!(groups["b"].len(), 1);
}

#[test]
fn add_matches_properties_ignoring_case() {
    let (doc, root) = empty("Root");
    let parent = WrapperGenerator::new()
        .wrap::<ListElementWithAddMethod>(&doc, root)
        .unwrap();

    let added = parent.add("Single", &[("key", Value::from("z"))]).unwrap();
    assert_eq!(key_of(&added), "z");
}

#[test]
fn add_rejects_before_writing() {
    let (doc, root) = empty("Root");
    let generator = WrapperGenerator::new();

    let list = generator.wrap::<ListElementWithAddMethod>(&doc, root).unwrap();
    let err = list.add("Single", &[("Nope", Value::from("x"))]).unwrap_err();
    assert!(matches!(err, WrapperError::UnknownProperty { ref property, .. } if property == "Nope"));

    let dict = generator
        .wrap::<DictionaryElementWithAddMethod>(&doc, root)
        .unwrap();
    let err = dict.add("Double", &[("Value", Value::from(1.5))]).unwrap_err();
    assert!(matches!(err, WrapperError::MissingKey { ref key, .. } if key == "Key"));

    assert_eq!(doc.to_xml(), "<Root/>");
}

#[test]
fn invoke_checks_arguments() {
    let (doc, root) = empty("Root");
    let parent = WrapperGenerator::new()
        .wrap::<DictionaryElementWithAddMethod>(&doc, root)
        .unwrap();

    let err = parent.invoke("AddDouble", &[Value::from("a")]).unwrap_err();
    assert!(matches!(
        err,
        WrapperError::ArgumentCount {
            expected: 2,
            actual: 1,
            ..
        }
    ));

    let err = parent.invoke("RemoveDouble", &[]).unwrap_err();
    assert!(matches!(err, WrapperError::UnknownMethod { .. }));

    let err = parent
        .invoke("AddDouble", &[Value::from("a"), Value::from("high")])
        .unwrap_err();
    assert!(matches!(err, WrapperError::Convert(_)));
}

#[test]
fn explicitly_targeted_helpers() {
    let (doc, root) = empty("Root");
    let parent = WrapperGenerator::new().wrap::<ExplicitHelpers>(&doc, root).unwrap();

    parent.invoke("Append", &[Value::from("k")]).unwrap();
    assert_eq!(doc.to_xml(), r#"<Root><Entry Key="k"/></Root>"#);
    assert_eq!(parent.items("Entries").unwrap().len(), 1);

    parent.invoke("Reset", &[]).unwrap();
    assert_eq!(doc.to_xml(), "<Root/>");
    assert!(parent.items("Entries").unwrap().is_empty());
}

// Walk and re-keying

#[test]
fn walk_removes_matching_items() {
    let (doc, root) = with_keyed("Root", "Single", &["a", "b", "c"]);
    let parent = WrapperGenerator::new()
        .wrap::<ListElementWithAddMethod>(&doc, root)
        .unwrap();
    let view = parent.list("Single").unwrap();

    let removed = parent.walk("Single", |item| key_of(item) == "b").unwrap();
    assert_eq!(removed, 1);

    let keys: Vec<String> = view.read().iter().map(key_of).collect();
    assert_eq!(keys, vec!["a", "c"]);
    assert_eq!(doc.dom().child_elements(root).unwrap().len(), 2);
}

#[test]
fn walk_over_array_refreshes_snapshot() {
    let (doc, root) = with_keyed("Root", "Single", &["a", "b"]);
    let parent = WrapperGenerator::new()
        .wrap::<ArrayElementWithAddMethod>(&doc, root)
        .unwrap();

    assert_eq!(parent.walk("Single", |_| true).unwrap(), 2);
    assert!(parent.array("Single").unwrap().is_empty());
    assert_eq!(doc.to_xml(), "<Root/>");
}

#[test]
fn key_write_rekeys_dictionary() {
    let (doc, root) = with_keyed("Root", "Double", &["a", "b"]);
    let parent = WrapperGenerator::new()
        .wrap::<DictionaryElementWithAddMethod>(&doc, root)
        .unwrap();
    let view = parent.dict("Double").unwrap();

    let entry = view.read()["a"].clone();
    entry.set("Key", "z").unwrap();

    let keys: Vec<String> = view.read().keys().cloned().collect();
    assert_eq!(keys, vec!["b", "z"]);
    assert!(view.read()["z"].same_node(&entry));
}

#[test]
fn walk_reaches_shadowed_duplicates() {
    let (doc, root) = with_keyed("Root", "Double", &["a", "a"]);
    let parent = WrapperGenerator::new()
        .wrap::<DictionaryElementWithAddMethod>(&doc, root)
        .unwrap();
    assert_eq!(parent.dict("Double").unwrap().read().len(), 1);

    let mut seen = 0;
    let removed = parent
        .walk("Double", |_| {
            seen += 1;
            true
        })
        .unwrap();
    assert_eq!(seen, 2);
    assert_eq!(removed, 2);
    assert_eq!(doc.to_xml(), "<Root/>");
    assert!(parent.dict("Double").unwrap().read().is_empty());
}

#[test]
fn walk_surfaces_shadowed_entry() {
    let (doc, root) = with_keyed("Root", "Double", &["a", "a"]);
    let parent = WrapperGenerator::new()
        .wrap::<DictionaryElementWithAddMethod>(&doc, root)
        .unwrap();
    let view = parent.dict("Double").unwrap();
    let first = view.read()["a"].clone();

    assert_eq!(parent.walk("Double", |item| item.same_node(&first)).unwrap(), 1);

    let survivor = view.read()["a"].clone();
    assert!(!survivor.same_node(&first));
    assert_eq!(doc.dom().child_elements(root).unwrap(), vec![survivor.node()]);
}

#[test]
fn add_rejects_duplicate_key() {
    let (doc, root) = empty("Root");
    let parent = WrapperGenerator::new()
        .wrap::<DictionaryElementWithAddMethod>(&doc, root)
        .unwrap();
    parent
        .invoke("AddDouble", &[Value::from("a"), Value::from(0.5)])
        .unwrap();
    let before = doc.to_xml();

    let err = parent
        .invoke("AddDouble", &[Value::from("a"), Value::from(0.25)])
        .unwrap_err();
    assert!(matches!(err, WrapperError::DuplicateKey { ref key, .. } if key == "a"));

    assert_eq!(doc.to_xml(), before);
    assert_eq!(doc.dom().child_elements(root).unwrap().len(), 1);
    let view = parent.dict("Double").unwrap();
    assert_eq!(view.read().len(), 1);
    assert_eq!(view.read()["a"].get_as::<f64>("Value").unwrap(), Some(0.5));
}

#[test]
fn key_write_rejects_taken_key() {
    let (doc, root) = with_keyed("Root", "Double", &["a", "b"]);
    let parent = WrapperGenerator::new()
        .wrap::<DictionaryElementWithAddMethod>(&doc, root)
        .unwrap();
    let view = parent.dict("Double").unwrap();
    let before = doc.to_xml();

    let entry = view.read()["a"].clone();
    let err = entry.set("Key", "b").unwrap_err();
    assert!(matches!(err, WrapperError::DuplicateKey { ref key, .. } if key == "b"));

    assert_eq!(doc.to_xml(), before);
    assert_eq!(key_of(&entry), "a");
    let keys: Vec<String> = view.read().keys().cloned().collect();
    assert_eq!(keys, vec!["a", "b"]);

    // Writing the current key back is not a collision
    entry.set("Key", "a").unwrap();
}

// Sessions

#[test]
fn one_signal_per_helper_call() {
    let (doc, root) = empty("Root");
    let parent = WrapperGenerator::new()
        .wrap::<DictionaryElementWithAddMethod>(&doc, root)
        .unwrap();
    let completed = doc.subscribe();

    parent
        .invoke("AddDouble", &[Value::from("a"), Value::from(0.8)])
        .unwrap();
    assert_eq!(completed.try_iter().count(), 1);

    parent.dict("Double").unwrap();
    assert_eq!(completed.try_iter().count(), 0);
}

#[test]
fn helper_inside_read_session_is_refused() {
    let (doc, root) = empty("Root");
    let parent = WrapperGenerator::new()
        .wrap::<ListElementWithAddMethod>(&doc, root)
        .unwrap();

    {
        let _read = doc.read();
        let err = parent.invoke("AddSingle", &[Value::from("a")]).unwrap_err();
        assert!(matches!(
            err,
            WrapperError::Session(SessionError::PossibleDeadlock)
        ));
    }

    assert_eq!(doc.to_xml(), "<Root/>");
    assert!(parent.invoke("AddSingle", &[Value::from("a")]).is_ok());
}
